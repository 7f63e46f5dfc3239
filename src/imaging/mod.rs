//! Image delivery URLs: pure geometry plus query-string assembly.
//!
//! | Stage | Function |
//! |---|---|
//! | **Crop box** | [`crop_box`]: clamp insets, convert to pixels |
//! | **Hotspot** | [`hotspot_bounds`]: fractional center and size to pixels |
//! | **Aspect fit** | [`fit_to_aspect`]: largest target-ratio rect inside the crop, centered on the hotspot |
//! | **URL** | [`ImageUrlBuilder::build`]: path from stored dimensions, ordered query |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for rect math (unit testable)
//! - **Parameters**: Data structures describing transform options
//! - **Url**: [`ImageUrlBuilder`] and [`file_url`]

mod calculations;
mod params;
mod url;

pub use calculations::{
    CropBox, GeometryError, HotspotBounds, SourceCrop, SourceRect, compute_source_rect, crop_box,
    fit_to_aspect, hotspot_bounds,
};
pub use params::{
    Auto, CropMode, Fit, Flip, FocalPoint, ImageFormat, Orientation, ParseParamError,
    TransformParams,
};
pub use self::url::{ImageUrlBuilder, file_url};
