//! Core building blocks shared by the native loader, the node API and the JNI layer
//!
//! This module contains error types, configuration, platform detection and global state.

pub mod config;
pub mod error;
pub mod globals;
pub mod logger;
pub mod platform;
pub mod simd;

// Re-export commonly used items
pub use config::LoaderConfig;
pub use error::{FastNoiseError, Result};
pub use globals::{ensure_available, init_library, install_library, is_available, library, unavailability_cause};
pub use platform::Platform;
pub use simd::SimdLevel;
