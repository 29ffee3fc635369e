//! PDF Stream Filters
//!
//! Identifies the filters applied to inline image data according to
//! ISO 32000-1 Section 7.4 and Table 94 (abbreviated names). Image payloads
//! are never decoded here; a filter is only asked where its encoded data ends.

use super::objects::PdfObject;
use super::InlineImageParseError;

#[cfg(feature = "compression")]
use flate2::{Decompress, FlushDecompress, Status};

/// PDF filters that may appear on inline images
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// ASCII hex decode
    ASCIIHexDecode,

    /// ASCII 85 decode
    ASCII85Decode,

    /// LZW decode
    LZWDecode,

    /// Flate decode (zlib/deflate compression)
    FlateDecode,

    /// Run length decode
    RunLengthDecode,

    /// CCITT fax decode
    CCITTFaxDecode,

    /// JBIG2 decode
    JBIG2Decode,

    /// DCT decode (JPEG)
    DCTDecode,

    /// JPX decode (JPEG 2000)
    JPXDecode,

    /// Crypt filter
    Crypt,

    /// A filter name this crate does not know
    Unknown(String),
}

impl Filter {
    /// Parse filter from its full or abbreviated name
    pub fn from_name(name: &str) -> Self {
        match name {
            "ASCIIHexDecode" | "AHx" => Filter::ASCIIHexDecode,
            "ASCII85Decode" | "A85" => Filter::ASCII85Decode,
            "LZWDecode" | "LZW" => Filter::LZWDecode,
            "FlateDecode" | "Fl" => Filter::FlateDecode,
            "RunLengthDecode" | "RL" => Filter::RunLengthDecode,
            "CCITTFaxDecode" | "CCF" => Filter::CCITTFaxDecode,
            "JBIG2Decode" => Filter::JBIG2Decode,
            "DCTDecode" | "DCT" => Filter::DCTDecode,
            "JPXDecode" => Filter::JPXDecode,
            "Crypt" => Filter::Crypt,
            other => Filter::Unknown(other.to_string()),
        }
    }

    /// Full filter name as written in a stream dictionary
    pub fn name(&self) -> &str {
        match self {
            Filter::ASCIIHexDecode => "ASCIIHexDecode",
            Filter::ASCII85Decode => "ASCII85Decode",
            Filter::LZWDecode => "LZWDecode",
            Filter::FlateDecode => "FlateDecode",
            Filter::RunLengthDecode => "RunLengthDecode",
            Filter::CCITTFaxDecode => "CCITTFaxDecode",
            Filter::JBIG2Decode => "JBIG2Decode",
            Filter::DCTDecode => "DCTDecode",
            Filter::JPXDecode => "JPXDecode",
            Filter::Crypt => "Crypt",
            Filter::Unknown(name) => name,
        }
    }

    /// Length of the encoded payload at the start of `data`, including any
    /// end-of-data marker, when the encoding makes it knowable.
    pub fn encoded_length(&self, data: &[u8]) -> Option<usize> {
        match self {
            Filter::ASCIIHexDecode => data.iter().position(|&b| b == b'>').map(|p| p + 1),
            Filter::ASCII85Decode => data.windows(2).position(|w| w == b"~>").map(|p| p + 2),
            Filter::FlateDecode => flate_encoded_length(data),
            _ => None,
        }
    }
}

/// Read the `/Filter` value of the inline image whose `BI` is at `offset`.
///
/// A single name and an array of names are both accepted; the result is in
/// decoding order, so the first entry describes the bytes as stored.
pub fn filters_from_object(
    obj: Option<&PdfObject>,
    offset: usize,
) -> Result<Vec<Filter>, InlineImageParseError> {
    let invalid = || InlineImageParseError::InvalidParameter {
        offset,
        key: "Filter".to_string(),
    };

    match obj {
        None | Some(PdfObject::Null) => Ok(Vec::new()),
        Some(PdfObject::Name(name)) => Ok(vec![Filter::from_name(name.as_str())]),
        Some(PdfObject::Array(array)) => array
            .iter()
            .map(|obj| {
                obj.as_name()
                    .map(|name| Filter::from_name(name.as_str()))
                    .ok_or_else(invalid)
            })
            .collect(),
        Some(_) => Err(invalid()),
    }
}

#[cfg(feature = "compression")]
fn flate_encoded_length(data: &[u8]) -> Option<usize> {
    let mut decompress = Decompress::new(true);
    let mut scratch = vec![0u8; 16 * 1024];

    loop {
        let consumed = decompress.total_in() as usize;
        let produced = decompress.total_out();
        let status = decompress
            .decompress(&data[consumed..], &mut scratch, FlushDecompress::None)
            .ok()?;

        match status {
            Status::StreamEnd => return Some(decompress.total_in() as usize),
            Status::Ok | Status::BufError => {
                let stalled =
                    decompress.total_in() as usize == consumed && decompress.total_out() == produced;
                if stalled || decompress.total_in() as usize >= data.len() {
                    return None;
                }
            }
        }
    }
}

#[cfg(not(feature = "compression"))]
fn flate_encoded_length(_data: &[u8]) -> Option<usize> {
    None
}
