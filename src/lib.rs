//! Bindings for the FastNoise2 noise generation library
//!
//! The native library is loaded at runtime, see [`crate::core::LoaderConfig`] for how it is located.
//! The same crate doubles as the JNI backend of `com.github.fastnoise.FastNoise`.

pub mod core;
pub mod ext;
pub mod jni_interface;
pub mod native;
pub mod noise;

pub use crate::core::{FastNoiseError, LoaderConfig, Result, SimdLevel};
pub use crate::native::FastNoiseLibrary;
pub use crate::noise::{FastNoise, MemberType, MemberValue, OutputMinMax};
