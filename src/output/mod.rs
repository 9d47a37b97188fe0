//! Output side of the pipeline.

pub mod writer;

pub use writer::{render_row, write_combined, write_combined_to_path};
