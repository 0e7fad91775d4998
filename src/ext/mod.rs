//! Extension traits and helpers for third-party APIs

pub mod jni;
