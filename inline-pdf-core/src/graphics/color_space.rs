//! Color space component counts according to ISO 32000-1 Section 8.6
//!
//! Inline image data has no length prefix, so the number of bytes an image
//! occupies depends on how many components each pixel carries. This module
//! answers that question for a color space named in a content stream:
//!
//! - Device spaces have fixed counts and never consult the resources
//! - Names found in the `/ColorSpace` resource dictionary are resolved
//!   through their definition, which is either another name or an array
//! - `Indexed` arrays always store one index per pixel
//! - `ICCBased` arrays declare their count in the profile stream's `/N`

use crate::parser::objects::{PdfArray, PdfDictionary, PdfName, PdfObject};
use crate::parser::InlineImageParseError;
use tracing::debug;

/// Upper bound on alias chains (`/CS0 /CS1`, `/CS1 /DeviceRGB`, ...) followed
/// within one resource dictionary.
const MAX_ALIAS_DEPTH: usize = 8;

/// Device color spaces with a fixed number of components
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceColorSpace {
    Gray,
    Rgb,
    Cmyk,
}

impl DeviceColorSpace {
    /// Match a full device color space name
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "DeviceGray" => Some(DeviceColorSpace::Gray),
            "DeviceRGB" => Some(DeviceColorSpace::Rgb),
            "DeviceCMYK" => Some(DeviceColorSpace::Cmyk),
            _ => None,
        }
    }

    /// Get the number of components for this color space
    pub fn component_count(&self) -> u32 {
        match self {
            DeviceColorSpace::Gray => 1,
            DeviceColorSpace::Rgb => 3,
            DeviceColorSpace::Cmyk => 4,
        }
    }

    /// Get the PDF name for this color space
    pub fn pdf_name(&self) -> &'static str {
        match self {
            DeviceColorSpace::Gray => "DeviceGray",
            DeviceColorSpace::Rgb => "DeviceRGB",
            DeviceColorSpace::Cmyk => "DeviceCMYK",
        }
    }
}

/// Shape of an entry in a `/ColorSpace` resource dictionary
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ColorSpaceDefinition<'a> {
    /// The entry names another color space
    Alias(&'a PdfName),
    /// `[/Family param ...]`
    Compound(&'a PdfArray),
}

impl<'a> ColorSpaceDefinition<'a> {
    /// Classify a resource entry; `None` for any other object type
    pub fn classify(obj: &'a PdfObject) -> Option<Self> {
        match obj {
            PdfObject::Name(name) => Some(ColorSpaceDefinition::Alias(name)),
            PdfObject::Array(array) => Some(ColorSpaceDefinition::Compound(array)),
            _ => None,
        }
    }
}

/// Borrowed view of a `/ColorSpace` resource dictionary
#[derive(Debug, Clone, Copy, Default)]
pub struct ColorSpaceResolver<'a> {
    dictionary: Option<&'a PdfDictionary>,
}

impl<'a> ColorSpaceResolver<'a> {
    pub fn new(dictionary: Option<&'a PdfDictionary>) -> Self {
        Self { dictionary }
    }

    /// Build a resolver from a page or form `/Resources` dictionary
    pub fn from_resources(resources: Option<&'a PdfDictionary>) -> Self {
        Self::new(resources.and_then(|r| r.get("ColorSpace")).and_then(PdfObject::as_dict))
    }

    pub fn dictionary(&self) -> Option<&'a PdfDictionary> {
        self.dictionary
    }

    /// Components per pixel for `color_space`; see [`components_per_pixel`]
    pub fn resolve(&self, color_space: Option<&PdfName>) -> Result<u32, InlineImageParseError> {
        components_per_pixel(color_space, self.dictionary)
    }
}

/// Number of color components per pixel for a color space reference.
///
/// An absent reference means DeviceGray. Device spaces resolve without
/// looking at `dictionary`. Every failure names `color_space` itself, even
/// when the problem was found in the definition it points to.
pub fn components_per_pixel(
    color_space: Option<&PdfName>,
    dictionary: Option<&PdfDictionary>,
) -> Result<u32, InlineImageParseError> {
    let Some(name) = color_space else {
        return Ok(1);
    };

    let components = resolve_name(name, name, dictionary, 0)?;
    debug!(color_space = %name, components, "resolved color space");
    Ok(components)
}

/// Number of components for a definition already in hand, such as the array
/// of an inline image's `/CS [...]`. `outer` is the name reported on failure.
pub fn components_of_definition(
    outer: &PdfName,
    definition: ColorSpaceDefinition<'_>,
    dictionary: Option<&PdfDictionary>,
) -> Result<u32, InlineImageParseError> {
    definition_components(outer, definition, dictionary, 0)
}

fn resolve_name(
    outer: &PdfName,
    name: &PdfName,
    dictionary: Option<&PdfDictionary>,
    depth: usize,
) -> Result<u32, InlineImageParseError> {
    if let Some(device) = DeviceColorSpace::from_name(name.as_str()) {
        return Ok(device.component_count());
    }

    let entry = dictionary
        .and_then(|dict| dict.get_by_name(name))
        .ok_or_else(|| InlineImageParseError::UnresolvedColorSpace(outer.clone()))?;

    let definition = ColorSpaceDefinition::classify(entry)
        .ok_or_else(|| InlineImageParseError::MalformedColorSpaceDefinition(outer.clone()))?;

    definition_components(outer, definition, dictionary, depth)
}

fn definition_components(
    outer: &PdfName,
    definition: ColorSpaceDefinition<'_>,
    dictionary: Option<&PdfDictionary>,
    depth: usize,
) -> Result<u32, InlineImageParseError> {
    match definition {
        ColorSpaceDefinition::Alias(alias) => {
            if depth >= MAX_ALIAS_DEPTH {
                return Err(InlineImageParseError::UnresolvedColorSpace(outer.clone()));
            }
            resolve_name(outer, alias, dictionary, depth + 1)
        }
        ColorSpaceDefinition::Compound(array) => compound_components(outer, array),
    }
}

fn compound_components(outer: &PdfName, array: &PdfArray) -> Result<u32, InlineImageParseError> {
    let family = array
        .get(0)
        .and_then(PdfObject::as_name)
        .ok_or_else(|| InlineImageParseError::MalformedColorSpaceDefinition(outer.clone()))?;

    match family.as_str() {
        // One palette index per pixel, whatever the base space
        "Indexed" => Ok(1),
        "ICCBased" => icc_component_count(array)
            .ok_or_else(|| InlineImageParseError::MalformedColorSpaceDefinition(outer.clone())),
        _ => Err(InlineImageParseError::UnsupportedColorSpaceFamily(
            outer.clone(),
        )),
    }
}

fn icc_component_count(array: &PdfArray) -> Option<u32> {
    let profile = array.get(1)?.as_dict()?;
    let n = profile.get("N")?.as_integer()?;
    u32::try_from(n).ok().filter(|&n| n > 0)
}
