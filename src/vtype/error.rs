// Wed Oct 14 2026 - Alex

use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum VTypeError {
    #[error("Structure not found: {0}")]
    NotFound(String),
    #[error("Syntax error on line {line}: {message}")]
    Syntax { line: usize, message: String },
}
