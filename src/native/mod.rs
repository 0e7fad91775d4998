//! Dynamic loading of the FastNoise2 shared library

pub mod api;
pub mod library;

pub use api::FastNoiseApi;
pub use library::FastNoiseLibrary;
