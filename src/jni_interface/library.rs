//! JNI methods for library availability checks

use crate::core::globals;
use crate::ext::jni::{JniResult, JniResultExt};
use jni::JNIEnv;
use jni::objects::JClass;
use jni::sys::{JNI_FALSE, JNI_TRUE, jboolean, jstring};

#[unsafe(no_mangle)]
pub extern "system" fn Java_com_github_fastnoise_FastNoise_nativeIsAvailable(_env: JNIEnv, _class: JClass) -> jboolean {
    if globals::is_available() { JNI_TRUE } else { JNI_FALSE }
}

/// 可用时返回 null
#[unsafe(no_mangle)]
pub extern "system" fn Java_com_github_fastnoise_FastNoise_nativeUnavailabilityCause(
    mut env: JNIEnv,
    _class: JClass,
) -> jstring {
    (|| -> JniResult<jstring> {
        if globals::is_available() {
            return Ok(std::ptr::null_mut());
        }
        let cause = globals::unavailability_cause().unwrap_or_else(|| "unknown".to_string());
        Ok(env.new_string(cause)?.into_raw())
    })()
    .or_throw(&mut env)
}

#[unsafe(no_mangle)]
pub extern "system" fn Java_com_github_fastnoise_FastNoise_nativeGetNodeTypeNames(
    mut env: JNIEnv,
    _class: JClass,
) -> jstring {
    (|| -> JniResult<jstring> {
        let names = globals::library()?.node_names().join(",");
        Ok(env.new_string(names)?.into_raw())
    })()
    .or_throw(&mut env)
}
