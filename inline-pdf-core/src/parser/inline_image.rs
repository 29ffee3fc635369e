//! Inline Image Extraction
//!
//! Locates the data of a `BI … ID … EI` inline image according to
//! ISO 32000-1 Section 8.9.7. The data is not framed: its end is found either
//! from the byte length implied by width, height, bits per component and the
//! color space, or, for filtered images whose length cannot be computed, by
//! scanning for an `EI` that stands as a token of its own.

use super::content::{ContentTokenizer, Token};
use super::filters::{filters_from_object, Filter};
use super::objects::{PdfArray, PdfDictionary, PdfName, PdfObject};
use super::{InlineImageParseError, ParseOptions};
use crate::graphics::color_space::{components_of_definition, ColorSpaceDefinition, ColorSpaceResolver};
use tracing::{debug, warn};

/// Abbreviated keys allowed in an inline image dictionary (Table 93)
const KEY_ABBREVIATIONS: &[(&str, &str)] = &[
    ("BPC", "BitsPerComponent"),
    ("CS", "ColorSpace"),
    ("D", "Decode"),
    ("DP", "DecodeParms"),
    ("F", "Filter"),
    ("H", "Height"),
    ("IM", "ImageMask"),
    ("I", "Interpolate"),
    ("L", "Length"),
    ("W", "Width"),
];

/// Abbreviated color space names (Table 94)
const COLOR_SPACE_ABBREVIATIONS: &[(&str, &str)] = &[
    ("G", "DeviceGray"),
    ("RGB", "DeviceRGB"),
    ("CMYK", "DeviceCMYK"),
    ("I", "Indexed"),
];

/// Abbreviated filter names (Table 94)
const FILTER_ABBREVIATIONS: &[(&str, &str)] = &[
    ("AHx", "ASCIIHexDecode"),
    ("A85", "ASCII85Decode"),
    ("LZW", "LZWDecode"),
    ("Fl", "FlateDecode"),
    ("RL", "RunLengthDecode"),
    ("CCF", "CCITTFaxDecode"),
    ("DCT", "DCTDecode"),
];

fn expand<'a>(name: &'a str, table: &[(&str, &'a str)]) -> &'a str {
    table
        .iter()
        .find(|(short, _)| *short == name)
        .map(|(_, full)| *full)
        .unwrap_or(name)
}

fn expand_name(obj: PdfObject, table: &[(&str, &str)]) -> PdfObject {
    match obj {
        PdfObject::Name(name) => PdfObject::Name(PdfName::new(expand(name.as_str(), table))),
        PdfObject::Array(array) => PdfObject::Array(PdfArray(
            array.0.into_iter().map(|item| expand_name(item, table)).collect(),
        )),
        other => other,
    }
}

/// Parameters of one inline image, with abbreviations expanded
#[derive(Debug, Clone, PartialEq)]
pub struct InlineImageParams {
    /// Byte offset of the `BI` operator in the content stream
    pub offset: usize,
    pub width: u32,
    pub height: u32,
    /// `None` only when absent on an image that does not need it
    pub bits_per_component: Option<u32>,
    /// A name, an inline array, or `None` for an image mask / DeviceGray
    pub color_space: Option<PdfObject>,
    pub filters: Vec<Filter>,
    pub image_mask: bool,
    /// The full dictionary with every key and value spelled out
    pub dict: PdfDictionary,
}

impl InlineImageParams {
    /// Rewrite abbreviated keys and values to their full names
    pub fn expand_dictionary(raw: PdfDictionary) -> PdfDictionary {
        let mut dict = PdfDictionary::new();
        for (key, value) in raw.0 {
            let key = expand(key.as_str(), KEY_ABBREVIATIONS).to_string();
            let value = match key.as_str() {
                "ColorSpace" => expand_name(value, COLOR_SPACE_ABBREVIATIONS),
                "Filter" => expand_name(value, FILTER_ABBREVIATIONS),
                _ => value,
            };
            dict.insert(key, value);
        }
        dict
    }

    /// Read the parameters of an inline image whose `BI` is at `offset`
    pub fn from_dictionary(raw: PdfDictionary, offset: usize) -> Result<Self, InlineImageParseError> {
        let dict = Self::expand_dictionary(raw);
        let invalid = |key: &str| InlineImageParseError::InvalidParameter {
            offset,
            key: key.to_string(),
        };

        let width = positive(dict.get("Width")).ok_or_else(|| invalid("Width"))?;
        let height = positive(dict.get("Height")).ok_or_else(|| invalid("Height"))?;
        let image_mask = dict
            .get("ImageMask")
            .and_then(PdfObject::as_bool)
            .unwrap_or(false);

        let bits_per_component = match dict.get("BitsPerComponent") {
            Some(obj) => Some(positive(Some(obj)).ok_or_else(|| invalid("BitsPerComponent"))?),
            None if image_mask => Some(1),
            None => None,
        };
        if image_mask && bits_per_component != Some(1) {
            return Err(invalid("BitsPerComponent"));
        }

        let filters = filters_from_object(dict.get("Filter"), offset)?;
        let color_space = dict.get("ColorSpace").filter(|obj| !obj.is_null()).cloned();

        Ok(Self {
            offset,
            width,
            height,
            bits_per_component,
            color_space,
            filters,
            image_mask,
            dict,
        })
    }

    /// Components per pixel of this image's color space
    pub fn components(&self, color_spaces: &ColorSpaceResolver<'_>) -> Result<u32, InlineImageParseError> {
        if self.image_mask {
            return Ok(1);
        }

        match &self.color_space {
            None => color_spaces.resolve(None),
            Some(PdfObject::Name(name)) => color_spaces.resolve(Some(name)),
            Some(PdfObject::Array(array)) => {
                let outer = array
                    .get(0)
                    .and_then(PdfObject::as_name)
                    .cloned()
                    .unwrap_or_else(|| PdfName::new("ColorSpace"));
                components_of_definition(
                    &outer,
                    ColorSpaceDefinition::Compound(array),
                    color_spaces.dictionary(),
                )
            }
            Some(_) => Err(InlineImageParseError::InvalidParameter {
                offset: self.offset,
                key: "ColorSpace".to_string(),
            }),
        }
    }

    /// Unfiltered data length: whole bytes per row, times the row count
    pub fn expected_length(&self, components: u32) -> Option<usize> {
        let bits_per_row = u64::from(self.width)
            .checked_mul(u64::from(components))?
            .checked_mul(u64::from(self.bits_per_component?))?;
        let row_bytes = bits_per_row.div_ceil(8);
        let total = row_bytes.checked_mul(u64::from(self.height))?;
        usize::try_from(total).ok()
    }
}

fn positive(obj: Option<&PdfObject>) -> Option<u32> {
    obj?.as_integer()
        .and_then(|n| u32::try_from(n).ok())
        .filter(|&n| n > 0)
}

/// Where an inline image's data sits in its content stream
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InlineImageSpan {
    /// Components per pixel of the image's color space
    pub components: u32,
    pub data_start: usize,
    pub data_len: usize,
    /// Position right after `EI`
    pub end: usize,
}

impl InlineImageSpan {
    /// The raw (still encoded) image bytes
    pub fn data<'c>(&self, content: &'c [u8]) -> &'c [u8] {
        &content[self.data_start..self.data_start + self.data_len]
    }
}

/// An inline image as produced by the content parser
#[derive(Debug, Clone, PartialEq)]
pub struct InlineImage {
    pub params: InlineImageParams,
    pub components: u32,
    /// Raw data, still encoded when filters are present
    pub data: Vec<u8>,
}

/// Finds the data and `EI` of inline images
#[derive(Debug, Clone)]
pub struct InlineImageExtractor<'a> {
    color_spaces: ColorSpaceResolver<'a>,
    options: ParseOptions,
}

impl<'a> InlineImageExtractor<'a> {
    /// `color_spaces` is the `/ColorSpace` resource dictionary in scope
    pub fn new(color_spaces: Option<&'a PdfDictionary>) -> Self {
        Self {
            color_spaces: ColorSpaceResolver::new(color_spaces),
            options: ParseOptions::default(),
        }
    }

    pub fn with_options(mut self, options: ParseOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &ParseOptions {
        &self.options
    }

    /// Locate the image data following an `ID` operator.
    ///
    /// `after_id` is the position right after the `ID` keyword; the single
    /// whitespace byte separating it from the data is skipped here.
    pub fn extract(
        &self,
        content: &[u8],
        after_id: usize,
        params: &InlineImageParams,
    ) -> Result<InlineImageSpan, InlineImageParseError> {
        let components = params.components(&self.color_spaces)?;

        let mut data_start = after_id.min(content.len());
        if data_start < content.len() && is_whitespace(content[data_start]) {
            data_start += 1;
        }

        let (data_len, end) = if params.filters.is_empty() {
            self.unfiltered_span(content, data_start, params, components)?
        } else {
            self.filtered_span(content, data_start, params)?
        };

        debug!(
            offset = params.offset,
            components, data_start, data_len, "located inline image data"
        );

        Ok(InlineImageSpan {
            components,
            data_start,
            data_len,
            end,
        })
    }

    fn unfiltered_span(
        &self,
        content: &[u8],
        data_start: usize,
        params: &InlineImageParams,
        components: u32,
    ) -> Result<(usize, usize), InlineImageParseError> {
        let expected = params.expected_length(components).ok_or_else(|| {
            InlineImageParseError::InvalidParameter {
                offset: params.offset,
                key: "BitsPerComponent".to_string(),
            }
        })?;
        let available = content.len() - data_start;

        // Strict readings need the whitespace that ends the data
        let require_space = !self.options.lenient_inline_images;
        if expected <= available {
            if let Some(end) = terminator_at(content, data_start + expected, require_space) {
                return Ok((expected, end));
            }
        }

        if !self.options.lenient_inline_images {
            return Err(if expected > available {
                InlineImageParseError::Truncated {
                    offset: params.offset,
                    expected,
                    available,
                }
            } else {
                InlineImageParseError::TerminatorNotFound {
                    offset: params.offset,
                }
            });
        }

        warn!(
            offset = params.offset,
            expected, available, "inline image length does not match its parameters, scanning for EI"
        );
        let limit = data_start
            .saturating_add(expected)
            .saturating_add(self.options.max_recovery_bytes)
            .min(content.len());
        self.scan_for_terminator(content, data_start, limit, params.offset)
    }

    fn filtered_span(
        &self,
        content: &[u8],
        data_start: usize,
        params: &InlineImageParams,
    ) -> Result<(usize, usize), InlineImageParseError> {
        // The first filter in decoding order describes the stored bytes
        if let Some(len) = params
            .filters
            .first()
            .and_then(|filter| filter.encoded_length(&content[data_start..]))
        {
            if let Some(end) = terminator_at(content, data_start + len, false) {
                return Ok((len, end));
            }
            debug!(
                offset = params.offset,
                estimate = len,
                "no EI after encoded data, scanning"
            );
        }

        self.scan_for_terminator(content, data_start, content.len(), params.offset)
    }

    /// Find the first `EI` in `content[from..limit]` preceded by whitespace
    /// (or starting the data), followed by whitespace, a delimiter or the end
    /// of the stream, and followed by bytes that lex as content-stream tokens.
    fn scan_for_terminator(
        &self,
        content: &[u8],
        from: usize,
        limit: usize,
        offset: usize,
    ) -> Result<(usize, usize), InlineImageParseError> {
        let mut i = from;
        while i + 2 <= limit {
            if &content[i..i + 2] == b"EI"
                && (i == from || is_whitespace(content[i - 1]))
                && content.get(i + 2).map_or(true, |&b| is_whitespace(b) || is_delimiter(b))
                && self.plausible_tail(&content[i + 2..])
            {
                let mut data_end = i;
                if data_end > from && is_whitespace(content[data_end - 1]) {
                    data_end -= 1;
                    if content[data_end] == b'\n' && data_end > from && content[data_end - 1] == b'\r' {
                        data_end -= 1;
                    }
                }
                return Ok((data_end - from, i + 2));
            }
            i += 1;
        }

        Err(InlineImageParseError::TerminatorNotFound { offset })
    }

    /// Bytes after a real `EI` are operands and operators, not binary data.
    ///
    /// Up to `inline_lookahead` tokens are lexed. String operands may hold
    /// any bytes. Lexing stops at the `ID` of a following inline image,
    /// whose data is not made of tokens.
    fn plausible_tail(&self, tail: &[u8]) -> bool {
        let mut tokenizer = ContentTokenizer::new(tail);
        for _ in 0..self.options.inline_lookahead {
            match tokenizer.next_token() {
                Ok(None) => return true,
                Ok(Some(Token::Operator(op))) if op == "ID" => return true,
                Ok(Some(Token::Operator(op))) if !is_operator_like(&op) => return false,
                Ok(Some(_)) => {}
                Err(_) => return false,
            }
        }
        true
    }
}

/// If whitespace then a bounded `EI` starts at `pos`, the position right
/// after it. The whitespace may be empty unless `require_space` is set.
fn terminator_at(content: &[u8], pos: usize, require_space: bool) -> Option<usize> {
    let mut i = pos;
    while i < content.len() && is_whitespace(content[i]) {
        i += 1;
    }
    if require_space && i == pos {
        return None;
    }
    if content.get(i..i + 2) != Some(b"EI".as_slice()) {
        return None;
    }
    match content.get(i + 2) {
        None => Some(i + 2),
        Some(&b) if is_whitespace(b) || is_delimiter(b) => Some(i + 2),
        Some(_) => None,
    }
}

/// Keywords and operator names: `true`, `BDC`, `d0`, `'`, `"`, `f*`
fn is_operator_like(op: &str) -> bool {
    matches!(op, "true" | "false" | "null")
        || (op.len() <= 3
            && op
                .bytes()
                .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'\'' | b'"' | b'*')))
}

pub(crate) fn is_whitespace(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\r' | b'\n' | b'\x0C' | b'\x00')
}

pub(crate) fn is_delimiter(b: u8) -> bool {
    matches!(
        b,
        b'(' | b')' | b'<' | b'>' | b'[' | b']' | b'{' | b'}' | b'/' | b'%'
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::objects::PdfStream;

    fn raw(entries: &[(&str, PdfObject)]) -> PdfDictionary {
        let mut dict = PdfDictionary::new();
        for (key, value) in entries {
            dict.insert(key.to_string(), value.clone());
        }
        dict
    }

    fn name(s: &str) -> PdfObject {
        PdfObject::Name(PdfName::new(s))
    }

    fn gray_params(width: i64, height: i64, bpc: i64) -> InlineImageParams {
        InlineImageParams::from_dictionary(
            raw(&[
                ("W", PdfObject::Integer(width)),
                ("H", PdfObject::Integer(height)),
                ("BPC", PdfObject::Integer(bpc)),
                ("CS", name("G")),
            ]),
            0,
        )
        .unwrap()
    }

    #[test]
    fn test_expand_abbreviations() {
        let dict = InlineImageParams::expand_dictionary(raw(&[
            ("W", PdfObject::Integer(4)),
            ("CS", name("RGB")),
            ("F", PdfObject::Array(PdfArray(vec![name("A85"), name("Fl")]))),
            ("I", PdfObject::Boolean(true)),
        ]));

        assert_eq!(dict.get("Width"), Some(&PdfObject::Integer(4)));
        assert_eq!(dict.get("ColorSpace"), Some(&name("DeviceRGB")));
        assert_eq!(
            dict.get("Filter"),
            Some(&PdfObject::Array(PdfArray(vec![
                name("ASCII85Decode"),
                name("FlateDecode")
            ])))
        );
        assert_eq!(dict.get("Interpolate"), Some(&PdfObject::Boolean(true)));
    }

    #[test]
    fn test_resource_names_are_not_expanded() {
        let dict = InlineImageParams::expand_dictionary(raw(&[("CS", name("CS0"))]));
        assert_eq!(dict.get("ColorSpace"), Some(&name("CS0")));
    }

    #[test]
    fn test_expected_length_rounds_rows_up() {
        let params = gray_params(10, 3, 1);
        // 10 one-bit samples need 2 bytes per row
        assert_eq!(params.expected_length(1), Some(6));
        assert_eq!(params.expected_length(3), Some(12));

        let params = gray_params(5, 2, 8);
        assert_eq!(params.expected_length(4), Some(40));
    }

    #[test]
    fn test_missing_dimensions_are_rejected() {
        let err = InlineImageParams::from_dictionary(raw(&[("H", PdfObject::Integer(2))]), 17)
            .unwrap_err();
        assert_eq!(
            err,
            InlineImageParseError::InvalidParameter {
                offset: 17,
                key: "Width".to_string()
            }
        );
    }

    #[test]
    fn test_image_mask_defaults() {
        let params = InlineImageParams::from_dictionary(
            raw(&[
                ("W", PdfObject::Integer(8)),
                ("H", PdfObject::Integer(2)),
                ("IM", PdfObject::Boolean(true)),
            ]),
            0,
        )
        .unwrap();
        assert_eq!(params.bits_per_component, Some(1));
        assert_eq!(params.components(&ColorSpaceResolver::default()).unwrap(), 1);
        assert_eq!(params.expected_length(1), Some(2));
    }

    #[test]
    fn test_extract_unfiltered() {
        let content = b"ID \x00\x45\x49\x00\nEI Q";
        let params = gray_params(2, 2, 8);
        let span = InlineImageExtractor::new(None)
            .extract(content, 2, &params)
            .unwrap();

        assert_eq!(span.components, 1);
        assert_eq!(span.data_start, 3);
        assert_eq!(span.data_len, 4);
        assert_eq!(span.data(content), b"\x00\x45\x49\x00");
        assert_eq!(span.end, 10);
    }

    #[test]
    fn test_extract_unfiltered_without_terminator() {
        let content = b"ID \x01\x02\x03\x04XX EI";
        let err = InlineImageExtractor::new(None)
            .extract(content, 2, &gray_params(2, 2, 8))
            .unwrap_err();
        assert_eq!(err, InlineImageParseError::TerminatorNotFound { offset: 0 });
    }

    #[test]
    fn test_extract_unfiltered_truncated() {
        let content = b"ID \x01\x02";
        let err = InlineImageExtractor::new(None)
            .extract(content, 2, &gray_params(2, 2, 8))
            .unwrap_err();
        assert_eq!(
            err,
            InlineImageParseError::Truncated {
                offset: 0,
                expected: 4,
                available: 2
            }
        );
    }

    #[test]
    fn test_lenient_recovers_wrong_length() {
        let content = b"ID \x01\x02\x03\x04\x05\x06\nEI Q";
        let params = gray_params(2, 2, 8);

        assert!(InlineImageExtractor::new(None)
            .extract(content, 2, &params)
            .is_err());

        let span = InlineImageExtractor::new(None)
            .with_options(ParseOptions::lenient())
            .extract(content, 2, &params)
            .unwrap();
        assert_eq!(span.data(content), b"\x01\x02\x03\x04\x05\x06");
        assert_eq!(span.end, 12);
    }

    #[test]
    fn test_color_space_error_aborts_extraction() {
        let params = InlineImageParams::from_dictionary(
            raw(&[
                ("W", PdfObject::Integer(1)),
                ("H", PdfObject::Integer(1)),
                ("BPC", PdfObject::Integer(8)),
                ("CS", name("CS9")),
            ]),
            0,
        )
        .unwrap();
        let err = InlineImageExtractor::new(None)
            .extract(b"ID \x00 EI", 2, &params)
            .unwrap_err();
        assert_eq!(err.to_string(), "Unexpected color space: /CS9");
    }

    #[test]
    fn test_icc_resource_sets_length() {
        let mut icc = PdfDictionary::new();
        icc.insert("N".to_string(), PdfObject::Integer(4));
        let color_spaces = raw(&[(
            "CS0",
            PdfObject::Array(PdfArray(vec![
                name("ICCBased"),
                PdfObject::Stream(PdfStream::new(icc, Vec::new())),
            ])),
        )]);
        let params = InlineImageParams::from_dictionary(
            raw(&[
                ("W", PdfObject::Integer(1)),
                ("H", PdfObject::Integer(1)),
                ("BPC", PdfObject::Integer(8)),
                ("CS", name("CS0")),
            ]),
            0,
        )
        .unwrap();

        let content = b"ID EI\x01\x02 EI";
        let span = InlineImageExtractor::new(Some(&color_spaces))
            .extract(content, 2, &params)
            .unwrap();
        assert_eq!(span.components, 4);
        assert_eq!(span.data(content), b"EI\x01\x02");
    }

    #[test]
    fn test_filtered_skips_embedded_marker() {
        let params = InlineImageParams::from_dictionary(
            raw(&[
                ("W", PdfObject::Integer(16)),
                ("H", PdfObject::Integer(16)),
                ("BPC", PdfObject::Integer(8)),
                ("F", name("DCT")),
            ]),
            5,
        )
        .unwrap();
        // "EI" inside the payload is followed by binary bytes
        let content = b"ID \xFF\xD8 EI \x9A\xFF\x00\xD9\nEI\nQ";
        let span = InlineImageExtractor::new(None)
            .extract(content, 2, &params)
            .unwrap();
        assert_eq!(span.data(content), b"\xFF\xD8 EI \x9A\xFF\x00\xD9");
        assert_eq!(span.end, content.len() - 2);
    }

    #[test]
    fn test_filtered_uses_ascii85_end_marker() {
        let params = InlineImageParams::from_dictionary(
            raw(&[
                ("W", PdfObject::Integer(1)),
                ("H", PdfObject::Integer(1)),
                ("BPC", PdfObject::Integer(8)),
                ("F", name("A85")),
            ]),
            0,
        )
        .unwrap();
        let content = b"ID 5s EI z~> EI";
        let span = InlineImageExtractor::new(None)
            .extract(content, 2, &params)
            .unwrap();
        assert_eq!(span.data(content), b"5s EI z~>");
        assert_eq!(span.end, content.len());
    }

    #[test]
    fn test_filtered_without_terminator() {
        let params = InlineImageParams::from_dictionary(
            raw(&[
                ("W", PdfObject::Integer(1)),
                ("H", PdfObject::Integer(1)),
                ("F", name("RL")),
            ]),
            9,
        )
        .unwrap();
        let err = InlineImageExtractor::new(None)
            .extract(b"ID \x01\x02EIQ", 2, &params)
            .unwrap_err();
        assert_eq!(err, InlineImageParseError::TerminatorNotFound { offset: 9 });
    }

    #[test]
    fn test_terminator_at() {
        assert_eq!(terminator_at(b" \nEI Q", 0, true), Some(4));
        assert_eq!(terminator_at(b"EI", 0, false), Some(2));
        assert_eq!(terminator_at(b"EI", 0, true), None);
        assert_eq!(terminator_at(b"EI/F1", 0, false), Some(2));
        assert_eq!(terminator_at(b"EIX", 0, false), None);
        assert_eq!(terminator_at(b"E", 0, false), None);
    }

    #[test]
    fn test_unfiltered_marker_glued_to_data() {
        let content = b"ID \x01EI Q";
        let params = gray_params(1, 1, 8);

        for options in [ParseOptions::default(), ParseOptions::strict()] {
            let err = InlineImageExtractor::new(None)
                .with_options(options)
                .extract(content, 2, &params)
                .unwrap_err();
            assert_eq!(err, InlineImageParseError::TerminatorNotFound { offset: 0 });
        }

        let span = InlineImageExtractor::new(None)
            .with_options(ParseOptions::lenient())
            .extract(content, 2, &params)
            .unwrap();
        assert_eq!(span.data(content), b"\x01");
        assert_eq!(span.end, 6);
    }

    #[test]
    fn test_terminator_followed_by_next_inline_image() {
        let params = InlineImageParams::from_dictionary(
            raw(&[
                ("W", PdfObject::Integer(1)),
                ("H", PdfObject::Integer(1)),
                ("BPC", PdfObject::Integer(8)),
                ("F", name("RL")),
            ]),
            0,
        )
        .unwrap();
        // The next image's binary data follows its ID within a few bytes
        let content = b"ID \x00\x41\x80\nEI BI/W 1/H 1 ID \x9A EI Q";

        for options in [
            ParseOptions::default(),
            ParseOptions::lenient(),
            ParseOptions::strict(),
        ] {
            let span = InlineImageExtractor::new(None)
                .with_options(options)
                .extract(content, 2, &params)
                .unwrap();
            assert_eq!(span.data(content), b"\x00\x41\x80");
            assert_eq!(span.end, 9);
        }
    }

    #[test]
    fn test_terminator_followed_by_binary_string_operand() {
        let params = InlineImageParams::from_dictionary(
            raw(&[
                ("W", PdfObject::Integer(1)),
                ("H", PdfObject::Integer(1)),
                ("BPC", PdfObject::Integer(8)),
                ("F", name("DCT")),
            ]),
            0,
        )
        .unwrap();
        let content = b"ID \xFF\xD8\xFF\xD9\nEI\nBT\n/F1 1 Tf\n(\x01\x02) Tj\nET\nQ";

        for inline_lookahead in [1, 4, 8, 16, 64] {
            let options = ParseOptions {
                inline_lookahead,
                ..ParseOptions::default()
            };
            let span = InlineImageExtractor::new(None)
                .with_options(options)
                .extract(content, 2, &params)
                .unwrap();
            assert_eq!(span.data(content), b"\xFF\xD8\xFF\xD9");
            assert_eq!(span.end, 10);
        }
    }

    #[test]
    fn test_binary_tail_rejects_candidate() {
        let extractor = InlineImageExtractor::new(None);
        assert!(extractor.plausible_tail(b""));
        assert!(extractor.plausible_tail(b"\nQ q 1 0 0 1 0 0 cm"));
        assert!(extractor.plausible_tail(b" [(a) -20 (b)] TJ T* ' \""));
        assert!(extractor.plausible_tail(b" <</MCID 0>> BDC EMC"));
        assert!(!extractor.plausible_tail(b" \x9A\xFF\x00\xD9"));
        assert!(!extractor.plausible_tail(b" ) Q"));
        assert!(!extractor.plausible_tail(b" Q qqqqq"));
    }

    #[test]
    fn test_operator_like() {
        for op in ["Q", "cm", "BDC", "T*", "'", "\"", "d0", "true", "null"] {
            assert!(is_operator_like(op), "{op}");
        }
        for op in ["ABCD", "x~", "EI\u{9a}"] {
            assert!(!is_operator_like(op), "{op}");
        }
    }
}
