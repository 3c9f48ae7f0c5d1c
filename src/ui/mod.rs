pub mod render;
pub mod report;

pub use render::render_table;
pub use report::{build_rows, header_row, MissingFieldPolicy};
