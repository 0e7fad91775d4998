//! JNI helpers shared by the exported functions
//!
//! 所有导出函数都写成 `(|| -> JniResult<T> { ... })().or_throw(&mut env)` 的形式，
//! 错误在这里统一转换成 Java 异常，返回值用对应类型的零值。

use crate::core::error::FastNoiseError;
use crate::noise::output::OutputMinMax;
use jni::JNIEnv;
use jni::objects::{JFloatArray, JString};
use jni::sys::{jboolean, jfloat, jint, jlong, jobject};
use log::debug;

pub type JniResult<T> = anyhow::Result<T>;

pub const EXTERNAL_LIBRARY_EXCEPTION: &str = "com/github/fastnoise/ExternalLibraryException";
pub const ILLEGAL_ARGUMENT_EXCEPTION: &str = "java/lang/IllegalArgumentException";
pub const INDEX_OUT_OF_BOUNDS_EXCEPTION: &str = "java/lang/IndexOutOfBoundsException";
pub const RUNTIME_EXCEPTION: &str = "java/lang/RuntimeException";

/// 抛出异常后返回给 JVM 的占位值
pub trait JniDefault {
    fn jni_default() -> Self;
}

impl JniDefault for () {
    fn jni_default() -> Self {}
}

impl JniDefault for jboolean {
    fn jni_default() -> Self {
        jni::sys::JNI_FALSE
    }
}

impl JniDefault for jint {
    fn jni_default() -> Self {
        0
    }
}

impl JniDefault for jlong {
    fn jni_default() -> Self {
        0
    }
}

impl JniDefault for jfloat {
    fn jni_default() -> Self {
        0.0
    }
}

impl JniDefault for jobject {
    fn jni_default() -> Self {
        std::ptr::null_mut()
    }
}

pub trait JniResultExt<T> {
    fn or_throw(self, env: &mut JNIEnv<'_>) -> T;
}

impl<T: JniDefault> JniResultExt<T> for JniResult<T> {
    fn or_throw(self, env: &mut JNIEnv<'_>) -> T {
        match self {
            Ok(value) => value,
            Err(err) => {
                debug!("JNI call failed: {:#}", err);
                throw(env, exception_class(&err), &format!("{:#}", err));
                T::jni_default()
            },
        }
    }
}

/// 根据错误类型选择 Java 异常类
pub fn exception_class(err: &anyhow::Error) -> &'static str {
    match err.downcast_ref::<FastNoiseError>() {
        Some(FastNoiseError::BufferTooSmall { .. }) => INDEX_OUT_OF_BOUNDS_EXCEPTION,
        Some(e) if e.is_argument_error() => ILLEGAL_ARGUMENT_EXCEPTION,
        Some(_) => EXTERNAL_LIBRARY_EXCEPTION,
        None => RUNTIME_EXCEPTION,
    }
}

fn throw(env: &mut JNIEnv<'_>, class: &str, message: &str) {
    // jni 调用失败时 Java 侧通常已经有挂起的异常，不要覆盖它
    if env.exception_check().unwrap_or(false) {
        return;
    }

    if env.throw_new(class, message).is_err() {
        // 找不到自定义异常类时会留下 NoClassDefFoundError，换成 RuntimeException
        let _ = env.exception_clear();
        let _ = env.throw_new(RUNTIME_EXCEPTION, message);
    }
}

pub fn get_string(env: &mut JNIEnv<'_>, value: &JString<'_>) -> JniResult<String> {
    if value.is_null() {
        return Err(FastNoiseError::InvalidArgument("string argument is null".to_string()).into());
    }
    Ok(env.get_string(value)?.into())
}

pub fn array_len(env: &JNIEnv<'_>, array: &JFloatArray<'_>) -> JniResult<usize> {
    if array.is_null() {
        return Err(FastNoiseError::InvalidArgument("float array argument is null".to_string()).into());
    }
    Ok(env.get_array_length(array)? as usize)
}

pub fn read_float_array(env: &JNIEnv<'_>, array: &JFloatArray<'_>) -> JniResult<Vec<f32>> {
    let mut buffer = vec![0f32; array_len(env, array)?];
    env.get_float_array_region(array, 0, &mut buffer)?;
    Ok(buffer)
}

pub fn write_float_array(env: &JNIEnv<'_>, array: &JFloatArray<'_>, data: &[f32]) -> JniResult<()> {
    env.set_float_array_region(array, 0, data)?;
    Ok(())
}

/// {min, max}，和原生接口的 outputMinMax 布局一致
pub fn new_min_max_array<'local>(env: &mut JNIEnv<'local>, min_max: &OutputMinMax) -> JniResult<JFloatArray<'local>> {
    let array = env.new_float_array(2)?;
    env.set_float_array_region(&array, 0, &[min_max.min, min_max.max])?;
    Ok(array)
}
