pub mod bmp;
pub mod metadata;
pub mod node;
pub mod output;
pub mod parallel;

#[cfg(test)]
pub mod tests;

pub use metadata::{Member, MemberType, Metadata, MetadataRegistry, format_dimension_member, format_lookup};
pub use node::{FastNoise, MemberValue};
pub use output::OutputMinMax;
pub use parallel::{DEFAULT_BAND_ROWS, gen_uniform_grid_2d_par, gen_uniform_grid_3d_par};
