//! PDF Parser Module
//!
//! Content-stream tokenization and inline image extraction according to
//! ISO 32000-1 Section 7.8 (content streams) and Section 8.9.7 (inline images).

pub mod content;
pub mod filters;
pub mod inline_image;
pub mod objects;

use crate::error::PdfError;

pub use self::content::{ContentOperation, ContentParser, ContentTokenizer};
pub use self::filters::Filter;
pub use self::inline_image::{InlineImage, InlineImageExtractor, InlineImageParams, InlineImageSpan};
pub use self::objects::{PdfArray, PdfDictionary, PdfName, PdfObject, PdfStream, PdfString};

/// Result type for parser operations
pub type ParseResult<T> = Result<T, ParseError>;

/// PDF Parser errors
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("Syntax error at position {position}: {message}")]
    SyntaxError { position: usize, message: String },

    #[error("Unexpected token: expected {expected}, found {found}")]
    UnexpectedToken { expected: String, found: String },

    #[error(transparent)]
    InlineImage(#[from] InlineImageParseError),
}

/// Errors raised while resolving an inline image's color space or locating
/// its data.
///
/// The color-space variants always carry the name the caller asked about,
/// never an alias or family tag found while resolving it, and they share one
/// message so a diagnostic reads the same whatever the cause.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InlineImageParseError {
    /// Not a device space and not present in the color-space resources
    #[error("Unexpected color space: {0}")]
    UnresolvedColorSpace(PdfName),

    /// Array definition whose family does not have a fixed component count
    #[error("Unexpected color space: {0}")]
    UnsupportedColorSpaceFamily(PdfName),

    /// Definition missing a required element, such as the ICC stream or `/N`
    #[error("Unexpected color space: {0}")]
    MalformedColorSpaceDefinition(PdfName),

    #[error("Inline image at offset {offset}: end of image marker not found")]
    TerminatorNotFound { offset: usize },

    #[error("Inline image at offset {offset}: expected {expected} data bytes, only {available} available")]
    Truncated {
        offset: usize,
        expected: usize,
        available: usize,
    },

    #[error("Inline image at offset {offset}: invalid or missing /{key}")]
    InvalidParameter { offset: usize, key: String },
}

impl InlineImageParseError {
    /// The color space named by a color-space failure
    pub fn color_space(&self) -> Option<&PdfName> {
        match self {
            InlineImageParseError::UnresolvedColorSpace(name)
            | InlineImageParseError::UnsupportedColorSpaceFamily(name)
            | InlineImageParseError::MalformedColorSpaceDefinition(name) => Some(name),
            _ => None,
        }
    }

    /// True for failures produced while resolving the color space
    pub fn is_color_space_error(&self) -> bool {
        self.color_space().is_some()
    }
}

/// Options controlling how forgiving content-stream parsing is
#[derive(Debug, Clone, PartialEq)]
pub struct ParseOptions {
    /// Fall back to scanning for `EI` when an unfiltered image is not
    /// followed by its marker at the computed length
    pub lenient_inline_images: bool,
    /// Tokens lexed after a candidate `EI` of filtered data. The candidate is
    /// rejected when one of them is not content-stream syntax.
    pub inline_lookahead: usize,
    /// Record recoverable problems in [`ContentParser::warnings`]
    pub collect_warnings: bool,
    /// Upper bound on bytes scanned past the computed length when recovering
    pub max_recovery_bytes: usize,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            lenient_inline_images: false,
            inline_lookahead: 8,
            collect_warnings: false,
            max_recovery_bytes: 1000,
        }
    }
}

impl ParseOptions {
    /// Accept slightly malformed streams produced by common writers
    pub fn lenient() -> Self {
        Self {
            lenient_inline_images: true,
            inline_lookahead: 4,
            collect_warnings: true,
            max_recovery_bytes: 5000,
        }
    }

    /// Reject any deviation from ISO 32000-1 syntax
    pub fn strict() -> Self {
        Self {
            lenient_inline_images: false,
            inline_lookahead: 8,
            collect_warnings: false,
            max_recovery_bytes: 0,
        }
    }
}

impl From<ParseError> for PdfError {
    fn from(err: ParseError) -> Self {
        match err {
            ParseError::InlineImage(inner) => PdfError::InlineImage(inner),
            other => PdfError::ParseError(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_space_errors_share_message() {
        let name = PdfName::new("ICCBased");
        let errors = [
            InlineImageParseError::UnresolvedColorSpace(name.clone()),
            InlineImageParseError::UnsupportedColorSpaceFamily(name.clone()),
            InlineImageParseError::MalformedColorSpaceDefinition(name.clone()),
        ];

        for error in errors {
            assert_eq!(error.to_string(), "Unexpected color space: /ICCBased");
            assert_eq!(error.color_space(), Some(&name));
            assert!(error.is_color_space_error());
        }
    }

    #[test]
    fn test_extraction_errors_name_offset() {
        let error = InlineImageParseError::TerminatorNotFound { offset: 42 };
        assert!(error.to_string().contains("offset 42"));
        assert!(error.color_space().is_none());

        let error = InlineImageParseError::Truncated {
            offset: 7,
            expected: 12,
            available: 3,
        };
        assert_eq!(
            error.to_string(),
            "Inline image at offset 7: expected 12 data bytes, only 3 available"
        );
    }

    #[test]
    fn test_parse_error_wraps_inline_image_error() {
        let err: ParseError = InlineImageParseError::TerminatorNotFound { offset: 3 }.into();
        assert_eq!(
            err.to_string(),
            "Inline image at offset 3: end of image marker not found"
        );

        match PdfError::from(err) {
            PdfError::InlineImage(InlineImageParseError::TerminatorNotFound { offset }) => {
                assert_eq!(offset, 3)
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_parse_options_presets() {
        let default = ParseOptions::default();
        assert!(!default.lenient_inline_images);
        assert_eq!(default.max_recovery_bytes, 1000);

        let lenient = ParseOptions::lenient();
        assert!(lenient.lenient_inline_images);
        assert!(lenient.collect_warnings);
        assert_eq!(lenient.max_recovery_bytes, 5000);

        let strict = ParseOptions::strict();
        assert!(!strict.lenient_inline_images);
        assert_eq!(strict.max_recovery_bytes, 0);
    }
}
