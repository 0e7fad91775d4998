//! JNI interface implementations
//!
//! All JNI methods are centralized here for better organization.
//! Java side: `com.github.fastnoise.FastNoise`, node handles are passed around as `long`.

pub mod library;
pub mod node;

use crate::core::logger::init_logger_from_env;
use jni::sys::{JNI_VERSION_1_8, jint};
use log::info;
use std::ffi::c_void;

#[unsafe(no_mangle)]
pub extern "system" fn JNI_OnLoad(_vm: *mut jni::sys::JavaVM, _reserved: *mut c_void) -> jint {
    init_logger_from_env();
    info!("FastNoise2 JNI bindings loaded (v{})", env!("CARGO_PKG_VERSION"));
    JNI_VERSION_1_8
}
