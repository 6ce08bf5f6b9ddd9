mod catalog;
mod reader;

pub use catalog::Catalog;
pub use reader::SystemReader;
