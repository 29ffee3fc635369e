//! PDF Object Model
//!
//! Typed values for the objects a content stream and its resources refer to,
//! according to ISO 32000-1 Section 7.3. Parsing of whole files is not done
//! here; content-stream operands are built by [`super::content`].

use std::collections::HashMap;
use std::fmt;

/// PDF Name object
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PdfName(pub String);

/// PDF String object
#[derive(Debug, Clone, PartialEq)]
pub struct PdfString(pub Vec<u8>);

/// PDF Array object
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PdfArray(pub Vec<PdfObject>);

/// PDF Dictionary object
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PdfDictionary(pub HashMap<PdfName, PdfObject>);

/// PDF Stream object
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PdfStream {
    pub dict: PdfDictionary,
    pub data: Vec<u8>,
}

impl PdfStream {
    /// Create a stream from its dictionary and raw data
    pub fn new(dict: PdfDictionary, data: Vec<u8>) -> Self {
        Self { dict, data }
    }
}

/// PDF Object types
#[derive(Debug, Clone, PartialEq)]
pub enum PdfObject {
    Null,
    Boolean(bool),
    Integer(i64),
    Real(f64),
    String(PdfString),
    Name(PdfName),
    Array(PdfArray),
    Dictionary(PdfDictionary),
    Stream(PdfStream),
    Reference(u32, u16), // object number, generation number
}

impl PdfObject {
    /// Check if this object is null
    pub fn is_null(&self) -> bool {
        matches!(self, PdfObject::Null)
    }

    /// Get as boolean
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            PdfObject::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Get as integer
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            PdfObject::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Get as name
    pub fn as_name(&self) -> Option<&PdfName> {
        match self {
            PdfObject::Name(n) => Some(n),
            _ => None,
        }
    }

    /// Get as array
    pub fn as_array(&self) -> Option<&PdfArray> {
        match self {
            PdfObject::Array(a) => Some(a),
            _ => None,
        }
    }

    /// Get as dictionary
    pub fn as_dict(&self) -> Option<&PdfDictionary> {
        match self {
            PdfObject::Dictionary(d) => Some(d),
            PdfObject::Stream(s) => Some(&s.dict),
            _ => None,
        }
    }
}

impl From<PdfName> for PdfObject {
    fn from(name: PdfName) -> Self {
        PdfObject::Name(name)
    }
}

impl From<PdfArray> for PdfObject {
    fn from(array: PdfArray) -> Self {
        PdfObject::Array(array)
    }
}

impl From<PdfDictionary> for PdfObject {
    fn from(dict: PdfDictionary) -> Self {
        PdfObject::Dictionary(dict)
    }
}

impl From<PdfStream> for PdfObject {
    fn from(stream: PdfStream) -> Self {
        PdfObject::Stream(stream)
    }
}

impl From<i64> for PdfObject {
    fn from(value: i64) -> Self {
        PdfObject::Integer(value)
    }
}

impl PdfDictionary {
    /// Create a new empty dictionary
    pub fn new() -> Self {
        PdfDictionary(HashMap::new())
    }

    /// Get a value by key
    pub fn get(&self, key: &str) -> Option<&PdfObject> {
        self.0.get(&PdfName(key.to_string()))
    }

    /// Get a value by name key
    pub fn get_by_name(&self, key: &PdfName) -> Option<&PdfObject> {
        self.0.get(key)
    }

    /// Insert a key-value pair
    pub fn insert(&mut self, key: String, value: PdfObject) {
        self.0.insert(PdfName(key), value);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl PdfArray {
    /// Create a new empty array
    pub fn new() -> Self {
        PdfArray(Vec::new())
    }

    /// Get array length
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if array is empty
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Get element at index
    pub fn get(&self, index: usize) -> Option<&PdfObject> {
        self.0.get(index)
    }

    /// Push an element
    pub fn push(&mut self, obj: PdfObject) {
        self.0.push(obj);
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PdfObject> {
        self.0.iter()
    }
}

impl PdfString {
    /// Create a new PDF string
    pub fn new(data: Vec<u8>) -> Self {
        PdfString(data)
    }
}

impl PdfName {
    /// Create a new PDF name
    pub fn new(name: impl Into<String>) -> Self {
        PdfName(name.into())
    }

    /// Get the name as a string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for PdfName {
    fn from(name: &str) -> Self {
        PdfName(name.to_string())
    }
}

impl PartialEq<str> for PdfName {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for PdfName {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// Writes the name the way it appears in a PDF file: a leading solidus, with
/// delimiters, whitespace, `#` and bytes outside `!`..=`~` escaped as `#xx`.
impl fmt::Display for PdfName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("/")?;
        for &byte in self.0.as_bytes() {
            match byte {
                b'(' | b')' | b'<' | b'>' | b'[' | b']' | b'{' | b'}' | b'/' | b'%' | b'#' => {
                    write!(f, "#{byte:02X}")?
                }
                b'!'..=b'~' => write!(f, "{}", byte as char)?,
                _ => write!(f, "#{byte:02X}")?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_display_is_canonical() {
        assert_eq!(PdfName::new("ICCBased").to_string(), "/ICCBased");
        assert_eq!(PdfName::new("Name with spaces").to_string(), "/Name#20with#20spaces");
        assert_eq!(PdfName::new("A#B").to_string(), "/A#23B");
        assert_eq!(PdfName::new("").to_string(), "/");
    }

    #[test]
    fn test_dictionary_accessors() {
        let mut dict = PdfDictionary::new();
        dict.insert("Type".to_string(), PdfObject::Name(PdfName::new("XObject")));
        dict.insert("N".to_string(), PdfObject::Integer(3));

        assert_eq!(dict.get("N").and_then(PdfObject::as_integer), Some(3));
        assert!(dict.get_by_name(&PdfName::new("N")).is_some());
        assert!(dict.get("Subtype").is_none());
        assert_eq!(dict.len(), 2);
    }

    #[test]
    fn test_stream_exposes_dictionary() {
        let mut dict = PdfDictionary::new();
        dict.insert("N".to_string(), PdfObject::Integer(4));
        let obj = PdfObject::Stream(PdfStream::new(dict, b"profile".to_vec()));

        assert_eq!(obj.as_dict().and_then(|d| d.get("N")), Some(&PdfObject::Integer(4)));
        assert!(matches!(obj, PdfObject::Stream(ref s) if s.data == b"profile"));
    }

    #[test]
    fn test_array_accessors() {
        let mut array = PdfArray::new();
        array.push(PdfObject::Name(PdfName::new("Indexed")));
        array.push(PdfObject::Integer(255));

        assert_eq!(array.len(), 2);
        assert_eq!(array.get(0).and_then(PdfObject::as_name), Some(&PdfName::new("Indexed")));
        assert_eq!(array.get(1).and_then(PdfObject::as_integer), Some(255));
        assert!(array.get(2).is_none());
    }

    #[test]
    fn test_name_compares_with_str() {
        let name = PdfName::from("DeviceRGB");
        assert!(name == "DeviceRGB");
        assert_eq!(name.as_str(), "DeviceRGB");
    }
}
