//! # inline-pdf
//!
//! Inline image extraction for PDF content streams.
//!
//! ## Features
//!
//! - **Color Space Resolution**: Components per pixel for device spaces, named
//!   resources, `Indexed` and `ICCBased` definitions
//! - **Inline Images**: Locate the data of `BI … ID … EI` images, using the
//!   computed length when the data is unfiltered and filter end markers or a
//!   guarded `EI` scan when it is not
//! - **Content Parsing**: Operators with their operands, inline images as a unit
//! - **Archives**: Read-only access to zip archives of auxiliary resources
//!
//! ## Quick Start
//!
//! ```rust
//! use inline_pdf::{ContentOperation, ContentParser, Result};
//!
//! # fn main() -> Result<()> {
//! let content = b"q 2 0 0 2 0 0 cm BI /W 2 /H 2 /BPC 8 /CS /G ID \x00\x7F\x7F\xFF EI Q";
//!
//! for operation in ContentParser::parse(content)? {
//!     if let ContentOperation::InlineImage(image) = operation {
//!         println!(
//!             "{}x{} image, {} component(s), {} bytes",
//!             image.params.width,
//!             image.params.height,
//!             image.components,
//!             image.data.len()
//!         );
//!     }
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ### Resolving Color Spaces
//!
//! ```rust
//! use inline_pdf::graphics::components_per_pixel;
//! use inline_pdf::{PdfDictionary, PdfName, PdfObject};
//!
//! let mut color_spaces = PdfDictionary::new();
//! color_spaces.insert("CS0".to_string(), PdfObject::Name(PdfName::new("DeviceCMYK")));
//!
//! let n = components_per_pixel(Some(&PdfName::new("CS0")), Some(&color_spaces)).unwrap();
//! assert_eq!(n, 4);
//! ```

pub mod archive;
pub mod error;
pub mod graphics;
pub mod parser;

pub use archive::{ArchiveError, ArchiveReader};
pub use error::{PdfError, Result};
pub use graphics::{components_per_pixel, ColorSpaceResolver, DeviceColorSpace};
pub use parser::{
    ContentOperation, ContentParser, Filter, InlineImage, InlineImageExtractor,
    InlineImageParams, InlineImageParseError, ParseError, ParseOptions, PdfArray, PdfDictionary,
    PdfName, PdfObject, PdfStream, PdfString,
};

/// Current version of inline-pdf
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
