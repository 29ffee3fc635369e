//! PDF Content Stream Parser
//!
//! This module implements parsing of PDF content streams according to ISO 32000-1 Section 7.8.
//! Operators are reported with their operands; inline images are read as a unit, with their
//! data located by [`InlineImageExtractor`] so that binary payloads are never tokenized.

use super::inline_image::{InlineImage, InlineImageExtractor, InlineImageParams};
use super::objects::{PdfArray, PdfDictionary, PdfName, PdfObject, PdfString};
use super::{ParseError, ParseOptions, ParseResult};
use tracing::warn;

/// A single operation in a PDF content stream
#[derive(Debug, Clone, PartialEq)]
pub enum ContentOperation {
    /// Any operator other than the inline image group, with its operands in stream order
    Operator {
        operator: String,
        operands: Vec<PdfObject>,
    },

    /// `BI … ID … EI`
    InlineImage(InlineImage),
}

impl ContentOperation {
    /// Operator name; `BI` for inline images
    pub fn operator(&self) -> &str {
        match self {
            ContentOperation::Operator { operator, .. } => operator,
            ContentOperation::InlineImage(_) => "BI",
        }
    }

    pub fn as_inline_image(&self) -> Option<&InlineImage> {
        match self {
            ContentOperation::InlineImage(image) => Some(image),
            _ => None,
        }
    }
}

/// Token types in content streams
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Token {
    Number(f64),
    Integer(i64),
    String(Vec<u8>),
    HexString(Vec<u8>),
    Name(String),
    Operator(String),
    ArrayStart,
    ArrayEnd,
    DictStart,
    DictEnd,
}

/// Content stream tokenizer
pub struct ContentTokenizer<'a> {
    input: &'a [u8],
    position: usize,
    token_start: usize,
}

impl<'a> ContentTokenizer<'a> {
    /// Create a new tokenizer for the given input
    pub fn new(input: &'a [u8]) -> Self {
        Self {
            input,
            position: 0,
            token_start: 0,
        }
    }

    /// Current byte offset
    pub fn position(&self) -> usize {
        self.position
    }

    /// Continue tokenizing from `position`, e.g. after inline image data
    pub fn set_position(&mut self, position: usize) {
        self.position = position.min(self.input.len());
    }

    /// Offset at which the most recently returned token starts
    pub fn token_start(&self) -> usize {
        self.token_start
    }

    pub fn input(&self) -> &'a [u8] {
        self.input
    }

    /// Get the next token from the stream
    pub(crate) fn next_token(&mut self) -> ParseResult<Option<Token>> {
        self.skip_whitespace();
        self.token_start = self.position;

        if self.position >= self.input.len() {
            return Ok(None);
        }

        let ch = self.input[self.position];

        match ch {
            // Numbers
            b'+' | b'-' | b'.' | b'0'..=b'9' => self.read_number(),

            // Strings
            b'(' => self.read_literal_string(),
            b'<' => {
                if self.peek_next() == Some(b'<') {
                    self.position += 2;
                    Ok(Some(Token::DictStart))
                } else {
                    self.read_hex_string()
                }
            }
            b'>' => {
                if self.peek_next() == Some(b'>') {
                    self.position += 2;
                    Ok(Some(Token::DictEnd))
                } else {
                    Err(ParseError::SyntaxError {
                        position: self.position,
                        message: "Unexpected '>'".to_string(),
                    })
                }
            }

            // Arrays
            b'[' => {
                self.position += 1;
                Ok(Some(Token::ArrayStart))
            }
            b']' => {
                self.position += 1;
                Ok(Some(Token::ArrayEnd))
            }

            // Names
            b'/' => self.read_name(),

            // Operators or other tokens
            _ => self.read_operator(),
        }
    }

    fn skip_whitespace(&mut self) {
        while self.position < self.input.len() {
            match self.input[self.position] {
                b' ' | b'\t' | b'\r' | b'\n' | b'\x0C' | b'\x00' => self.position += 1,
                b'%' => self.skip_comment(),
                _ => break,
            }
        }
    }

    fn skip_comment(&mut self) {
        while self.position < self.input.len()
            && self.input[self.position] != b'\n'
            && self.input[self.position] != b'\r'
        {
            self.position += 1;
        }
    }

    fn peek_next(&self) -> Option<u8> {
        self.input.get(self.position + 1).copied()
    }

    fn read_number(&mut self) -> ParseResult<Option<Token>> {
        let start = self.position;
        let mut has_dot = false;

        // Handle optional sign
        if matches!(self.input[self.position], b'+' | b'-') {
            self.position += 1;
        }

        // Read digits and optional decimal point
        while self.position < self.input.len() {
            match self.input[self.position] {
                b'0'..=b'9' => self.position += 1,
                b'.' if !has_dot => {
                    has_dot = true;
                    self.position += 1;
                }
                _ => break,
            }
        }

        let num_str = std::str::from_utf8(&self.input[start..self.position]).map_err(|_| {
            ParseError::SyntaxError {
                position: start,
                message: "Invalid number format".to_string(),
            }
        })?;

        if has_dot {
            // "5." and "-.5" are valid reals
            let normalized = match num_str {
                "." | "+." | "-." => "0",
                s => s,
            };
            let value = normalized
                .parse::<f64>()
                .map_err(|_| ParseError::SyntaxError {
                    position: start,
                    message: "Invalid float number".to_string(),
                })?;
            Ok(Some(Token::Number(value)))
        } else {
            let value = num_str
                .parse::<i64>()
                .map_err(|_| ParseError::SyntaxError {
                    position: start,
                    message: "Invalid integer number".to_string(),
                })?;
            Ok(Some(Token::Integer(value)))
        }
    }

    fn read_literal_string(&mut self) -> ParseResult<Option<Token>> {
        let start = self.position;
        self.position += 1; // Skip opening '('
        let mut result = Vec::new();
        let mut paren_depth = 1;
        let mut escape = false;

        while self.position < self.input.len() && paren_depth > 0 {
            let ch = self.input[self.position];
            self.position += 1;

            if escape {
                match ch {
                    b'n' => result.push(b'\n'),
                    b'r' => result.push(b'\r'),
                    b't' => result.push(b'\t'),
                    b'b' => result.push(b'\x08'),
                    b'f' => result.push(b'\x0C'),
                    b'(' => result.push(b'('),
                    b')' => result.push(b')'),
                    b'\\' => result.push(b'\\'),
                    b'0'..=b'7' => {
                        // Octal escape sequence
                        self.position -= 1;
                        result.push(self.read_octal_escape());
                    }
                    // Line continuation
                    b'\r' => {
                        if self.input.get(self.position) == Some(&b'\n') {
                            self.position += 1;
                        }
                    }
                    b'\n' => {}
                    _ => result.push(ch), // Unknown escape, treat as literal
                }
                escape = false;
            } else {
                match ch {
                    b'\\' => escape = true,
                    b'(' => {
                        paren_depth += 1;
                        result.push(ch);
                    }
                    b')' => {
                        paren_depth -= 1;
                        if paren_depth > 0 {
                            result.push(ch);
                        }
                    }
                    _ => result.push(ch),
                }
            }
        }

        if paren_depth > 0 {
            return Err(ParseError::SyntaxError {
                position: start,
                message: "Unterminated literal string".to_string(),
            });
        }

        Ok(Some(Token::String(result)))
    }

    fn read_octal_escape(&mut self) -> u8 {
        let mut value = 0u8;
        let mut count = 0;

        while count < 3 && self.position < self.input.len() {
            match self.input[self.position] {
                b'0'..=b'7' => {
                    value = value
                        .wrapping_mul(8)
                        .wrapping_add(self.input[self.position] - b'0');
                    self.position += 1;
                    count += 1;
                }
                _ => break,
            }
        }

        value
    }

    fn read_hex_string(&mut self) -> ParseResult<Option<Token>> {
        self.position += 1; // Skip opening '<'
        let mut result = Vec::new();
        let mut nibble = None;

        while self.position < self.input.len() {
            let ch = self.input[self.position];

            match ch {
                b'>' => {
                    self.position += 1;
                    // Handle odd number of hex digits
                    if let Some(n) = nibble {
                        result.push(n << 4);
                    }
                    return Ok(Some(Token::HexString(result)));
                }
                b'0'..=b'9' | b'A'..=b'F' | b'a'..=b'f' => {
                    let digit = if ch <= b'9' {
                        ch - b'0'
                    } else if ch <= b'F' {
                        ch - b'A' + 10
                    } else {
                        ch - b'a' + 10
                    };

                    if let Some(n) = nibble {
                        result.push((n << 4) | digit);
                        nibble = None;
                    } else {
                        nibble = Some(digit);
                    }
                    self.position += 1;
                }
                b' ' | b'\t' | b'\r' | b'\n' | b'\x0C' => {
                    // Skip whitespace in hex strings
                    self.position += 1;
                }
                _ => {
                    return Err(ParseError::SyntaxError {
                        position: self.position,
                        message: format!("Invalid character in hex string: {:?}", ch as char),
                    });
                }
            }
        }

        Err(ParseError::SyntaxError {
            position: self.position,
            message: "Unterminated hex string".to_string(),
        })
    }

    fn read_name(&mut self) -> ParseResult<Option<Token>> {
        self.position += 1; // Skip '/'
        let start = self.position;

        while self.position < self.input.len() && !is_token_boundary(self.input[self.position]) {
            self.position += 1;
        }

        let name = self.decode_name(&self.input[start..self.position])?;
        Ok(Some(Token::Name(name)))
    }

    fn decode_name(&self, bytes: &[u8]) -> ParseResult<String> {
        let mut result = Vec::with_capacity(bytes.len());
        let mut i = 0;

        while i < bytes.len() {
            if bytes[i] == b'#' && i + 2 < bytes.len() {
                // Hex escape
                let hex_str = std::str::from_utf8(&bytes[i + 1..i + 3]).map_err(|_| {
                    ParseError::SyntaxError {
                        position: self.position,
                        message: "Invalid hex escape in name".to_string(),
                    }
                })?;
                let value =
                    u8::from_str_radix(hex_str, 16).map_err(|_| ParseError::SyntaxError {
                        position: self.position,
                        message: "Invalid hex escape in name".to_string(),
                    })?;
                result.push(value);
                i += 3;
            } else {
                result.push(bytes[i]);
                i += 1;
            }
        }

        String::from_utf8(result).map_err(|_| ParseError::SyntaxError {
            position: self.position,
            message: "Invalid UTF-8 in name".to_string(),
        })
    }

    fn read_operator(&mut self) -> ParseResult<Option<Token>> {
        let start = self.position;

        while self.position < self.input.len() && !is_token_boundary(self.input[self.position]) {
            self.position += 1;
        }

        if self.position == start {
            // A lone delimiter such as ')' or '{'
            return Err(ParseError::SyntaxError {
                position: start,
                message: format!("Unexpected character: {:?}", self.input[start] as char),
            });
        }

        let op_bytes = &self.input[start..self.position];
        let op = std::str::from_utf8(op_bytes).map_err(|_| ParseError::SyntaxError {
            position: start,
            message: "Invalid operator".to_string(),
        })?;

        Ok(Some(Token::Operator(op.to_string())))
    }
}

fn is_token_boundary(ch: u8) -> bool {
    matches!(
        ch,
        b' ' | b'\t'
            | b'\r'
            | b'\n'
            | b'\x0C'
            | b'\x00'
            | b'('
            | b')'
            | b'<'
            | b'>'
            | b'['
            | b']'
            | b'{'
            | b'}'
            | b'/'
            | b'%'
    )
}

/// Content stream parser
pub struct ContentParser<'a> {
    tokenizer: ContentTokenizer<'a>,
    extractor: InlineImageExtractor<'a>,
    warnings: Vec<String>,
}

impl<'a> ContentParser<'a> {
    /// Create a parser with no color space resources in scope
    pub fn new(content: &'a [u8]) -> Self {
        Self::with_resources(content, None)
    }

    /// Create a parser for a content stream whose `/Resources` is `resources`
    pub fn with_resources(content: &'a [u8], resources: Option<&'a PdfDictionary>) -> Self {
        let color_spaces = resources
            .and_then(|r| r.get("ColorSpace"))
            .and_then(PdfObject::as_dict);
        Self {
            tokenizer: ContentTokenizer::new(content),
            extractor: InlineImageExtractor::new(color_spaces),
            warnings: Vec::new(),
        }
    }

    pub fn with_options(mut self, options: ParseOptions) -> Self {
        self.extractor = self.extractor.with_options(options);
        self
    }

    /// Parse a content stream into a vector of operations
    pub fn parse(content: &[u8]) -> ParseResult<Vec<ContentOperation>> {
        ContentParser::new(content).parse_operations()
    }

    /// Parse a content stream using the color spaces of `resources`
    pub fn parse_with_resources(
        content: &[u8],
        resources: Option<&PdfDictionary>,
        options: ParseOptions,
    ) -> ParseResult<Vec<ContentOperation>> {
        ContentParser::with_resources(content, resources)
            .with_options(options)
            .parse_operations()
    }

    /// Problems skipped over because of lenient options
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// Parse all remaining operations
    pub fn parse_operations(&mut self) -> ParseResult<Vec<ContentOperation>> {
        let mut operations = Vec::new();
        while let Some(operation) = self.next_operation()? {
            operations.push(operation);
        }
        Ok(operations)
    }

    /// Parse the next operation, or `None` at the end of the stream
    pub fn next_operation(&mut self) -> ParseResult<Option<ContentOperation>> {
        let mut operands = Vec::new();

        loop {
            let Some(token) = self.tokenizer.next_token()? else {
                if !operands.is_empty() {
                    self.warn(format!(
                        "{} operand(s) left without an operator at end of stream",
                        operands.len()
                    ));
                }
                return Ok(None);
            };

            match token {
                Token::Operator(op) => match op.as_str() {
                    "true" => operands.push(PdfObject::Boolean(true)),
                    "false" => operands.push(PdfObject::Boolean(false)),
                    "null" => operands.push(PdfObject::Null),
                    "BI" => {
                        let offset = self.tokenizer.token_start();
                        return self.parse_inline_image(offset).map(Some);
                    }
                    "ID" | "EI" => {
                        let position = self.tokenizer.token_start();
                        if !self.extractor.options().lenient_inline_images {
                            return Err(ParseError::SyntaxError {
                                position,
                                message: format!("Unexpected '{op}' outside an inline image"),
                            });
                        }
                        self.warn(format!("Skipped stray '{op}' at {position}"));
                        operands.clear();
                    }
                    _ => {
                        return Ok(Some(ContentOperation::Operator {
                            operator: op,
                            operands,
                        }))
                    }
                },
                other => operands.push(self.read_object(other)?),
            }
        }
    }

    /// Turn a token (and, for containers, the tokens that follow) into an operand
    fn read_object(&mut self, token: Token) -> ParseResult<PdfObject> {
        match token {
            Token::Number(n) => Ok(PdfObject::Real(n)),
            Token::Integer(i) => Ok(PdfObject::Integer(i)),
            Token::String(s) | Token::HexString(s) => Ok(PdfObject::String(PdfString::new(s))),
            Token::Name(n) => Ok(PdfObject::Name(PdfName(n))),
            Token::ArrayStart => self.read_array(),
            Token::DictStart => self.read_dictionary().map(PdfObject::Dictionary),
            Token::Operator(op) => match op.as_str() {
                "true" => Ok(PdfObject::Boolean(true)),
                "false" => Ok(PdfObject::Boolean(false)),
                "null" => Ok(PdfObject::Null),
                _ => Err(ParseError::UnexpectedToken {
                    expected: "operand".to_string(),
                    found: op,
                }),
            },
            Token::ArrayEnd | Token::DictEnd => Err(ParseError::SyntaxError {
                position: self.tokenizer.token_start(),
                message: format!("Unbalanced {token:?}"),
            }),
        }
    }

    fn read_array(&mut self) -> ParseResult<PdfObject> {
        let mut elements = Vec::new();

        loop {
            match self.tokenizer.next_token()? {
                Some(Token::ArrayEnd) => return Ok(PdfObject::Array(PdfArray(elements))),
                Some(token) => elements.push(self.read_object(token)?),
                None => {
                    return Err(ParseError::SyntaxError {
                        position: self.tokenizer.position(),
                        message: "Unterminated array".to_string(),
                    })
                }
            }
        }
    }

    fn read_dictionary(&mut self) -> ParseResult<PdfDictionary> {
        let mut dict = PdfDictionary::new();

        loop {
            match self.tokenizer.next_token()? {
                Some(Token::DictEnd) => return Ok(dict),
                Some(Token::Name(key)) => {
                    let value = self.next_value()?;
                    dict.insert(key, value);
                }
                Some(token) => {
                    return Err(ParseError::UnexpectedToken {
                        expected: "dictionary key (name) or >>".to_string(),
                        found: format!("{token:?}"),
                    })
                }
                None => {
                    return Err(ParseError::SyntaxError {
                        position: self.tokenizer.position(),
                        message: "Unterminated dictionary".to_string(),
                    })
                }
            }
        }
    }

    fn next_value(&mut self) -> ParseResult<PdfObject> {
        match self.tokenizer.next_token()? {
            Some(token) => self.read_object(token),
            None => Err(ParseError::SyntaxError {
                position: self.tokenizer.position(),
                message: "Missing dictionary value".to_string(),
            }),
        }
    }

    /// Read `key value ... ID <data> EI` following a `BI` at `offset`
    fn parse_inline_image(&mut self, offset: usize) -> ParseResult<ContentOperation> {
        let mut raw = PdfDictionary::new();

        loop {
            match self.tokenizer.next_token()? {
                Some(Token::Name(key)) => {
                    let value = self.next_value()?;
                    raw.insert(key, value);
                }
                Some(Token::Operator(op)) if op == "ID" => break,
                Some(token) => {
                    return Err(ParseError::UnexpectedToken {
                        expected: "inline image key or ID".to_string(),
                        found: format!("{token:?}"),
                    })
                }
                None => {
                    return Err(ParseError::SyntaxError {
                        position: offset,
                        message: "Inline image dictionary not terminated by ID".to_string(),
                    })
                }
            }
        }

        let params = InlineImageParams::from_dictionary(raw, offset)?;
        let content = self.tokenizer.input();
        let span = self
            .extractor
            .extract(content, self.tokenizer.position(), &params)?;
        self.tokenizer.set_position(span.end);

        Ok(ContentOperation::InlineImage(InlineImage {
            components: span.components,
            data: span.data(content).to_vec(),
            params,
        }))
    }

    fn warn(&mut self, message: String) {
        warn!("{}", message);
        if self.extractor.options().collect_warnings {
            self.warnings.push(message);
        }
    }
}
