//! Input simplification ahead of offset curve generation.

mod buffer_input;

pub use buffer_input::simplify_buffer_input;
