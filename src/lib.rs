pub mod cli;
pub mod commands;
pub mod config;
pub mod diagnostics;
pub mod logging;
pub mod parser;
pub mod tree;

pub use parser::parse_save_file;
pub use parser::parse_save_text;
pub use parser::validate_collection;
