use crate::archive::ArchiveError;
use crate::parser::InlineImageParseError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PdfError {
    #[error("Parse error: {0}")]
    ParseError(String),

    #[error(transparent)]
    InlineImage(#[from] InlineImageParseError),

    #[error(transparent)]
    Archive(#[from] ArchiveError),
}

pub type Result<T> = std::result::Result<T, PdfError>;
