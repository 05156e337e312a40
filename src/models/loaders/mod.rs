pub mod section_loader;

pub use section_loader::{load_section_table, parse_section_table};
