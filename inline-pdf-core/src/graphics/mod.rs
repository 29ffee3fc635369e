//! Graphics state resources consulted while reading content streams

pub mod color_space;

pub use color_space::{
    components_of_definition, components_per_pixel, ColorSpaceDefinition, ColorSpaceResolver,
    DeviceColorSpace,
};
