//! Transform options for image delivery URLs.
//!
//! These types describe *what* the CDN should do with an image; the
//! [`url`](super::url) module decides how they appear in the query string.
//! Every option is `Option<T>`: unset options are never serialized.
//!
//! ## Types
//!
//! - [`Fit`]: how the image is fitted into the requested box.
//! - [`CropMode`]: which part of the image to keep when `fit=crop` cuts.
//! - [`ImageFormat`] / [`Auto`]: output encoding.
//! - [`Orientation`]: rotation in 90° steps.
//! - [`FocalPoint`]: explicit focal point override (fractions).
//! - [`TransformParams`]: the full accumulated set.
//!
//! The enums parse from and display as their wire names (`fillmax`,
//! `focalpoint`, `pjpg`).

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown {kind} {value:?}, expected one of: {expected}")]
pub struct ParseParamError {
    pub kind: &'static str,
    pub value: String,
    pub expected: String,
}

/// How the image is fitted into the requested width/height.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Fit {
    Clip,
    Crop,
    Fill,
    FillMax,
    Max,
    Scale,
    Min,
}

impl Fit {
    pub fn as_str(self) -> &'static str {
        match self {
            Fit::Clip => "clip",
            Fit::Crop => "crop",
            Fit::Fill => "fill",
            Fit::FillMax => "fillmax",
            Fit::Max => "max",
            Fit::Scale => "scale",
            Fit::Min => "min",
        }
    }
}

/// Which region to keep when cropping to the requested aspect ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CropMode {
    Top,
    Bottom,
    Left,
    Right,
    Center,
    FocalPoint,
    Entropy,
}

impl CropMode {
    pub fn as_str(self) -> &'static str {
        match self {
            CropMode::Top => "top",
            CropMode::Bottom => "bottom",
            CropMode::Left => "left",
            CropMode::Right => "right",
            CropMode::Center => "center",
            CropMode::FocalPoint => "focalpoint",
            CropMode::Entropy => "entropy",
        }
    }
}

/// Output encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageFormat {
    Jpg,
    /// Progressive JPEG.
    Pjpg,
    Png,
    Webp,
}

impl ImageFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            ImageFormat::Jpg => "jpg",
            ImageFormat::Pjpg => "pjpg",
            ImageFormat::Png => "png",
            ImageFormat::Webp => "webp",
        }
    }
}

/// Automatic CDN behaviors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Auto {
    /// Serve the best format the requesting client accepts.
    Format,
}

impl Auto {
    pub fn as_str(self) -> &'static str {
        match self {
            Auto::Format => "format",
        }
    }
}

/// Clockwise rotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Orientation {
    D0,
    D90,
    D180,
    D270,
}

impl Orientation {
    pub fn degrees(self) -> u32 {
        match self {
            Orientation::D0 => 0,
            Orientation::D90 => 90,
            Orientation::D180 => 180,
            Orientation::D270 => 270,
        }
    }

    pub fn from_degrees(degrees: u32) -> Option<Self> {
        match degrees {
            0 => Some(Orientation::D0),
            90 => Some(Orientation::D90),
            180 => Some(Orientation::D180),
            270 => Some(Orientation::D270),
            _ => None,
        }
    }
}

/// Explicit focal point, as fractions of the image width and height.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FocalPoint {
    pub x: f64,
    pub y: f64,
}

impl FocalPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Mirroring. Horizontal and vertical flips collapse into one `flip` value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Flip {
    pub horizontal: bool,
    pub vertical: bool,
}

impl Flip {
    /// `"hv"`, `"h"`, `"v"`, or `None` when neither axis is flipped.
    pub fn as_param(self) -> Option<&'static str> {
        match (self.horizontal, self.vertical) {
            (true, true) => Some("hv"),
            (true, false) => Some("h"),
            (false, true) => Some("v"),
            (false, false) => None,
        }
    }
}

/// Every transform option a caller may set. All unset by default.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TransformParams {
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub max_width: Option<u32>,
    pub max_height: Option<u32>,
    pub min_width: Option<u32>,
    pub min_height: Option<u32>,
    pub blur: Option<u32>,
    pub sharpen: Option<u32>,
    pub dpr: Option<u32>,
    pub quality: Option<u32>,
    pub saturation: Option<i32>,
    pub pad: Option<f64>,
    pub invert: Option<bool>,
    pub flip_horizontal: Option<bool>,
    pub flip_vertical: Option<bool>,
    pub focal_point: Option<FocalPoint>,
    pub auto: Option<Auto>,
    pub format: Option<ImageFormat>,
    pub orientation: Option<Orientation>,
    pub fit: Option<Fit>,
    pub crop: Option<CropMode>,
}

impl TransformParams {
    pub fn flip(&self) -> Flip {
        Flip {
            horizontal: self.flip_horizontal.unwrap_or(false),
            vertical: self.flip_vertical.unwrap_or(false),
        }
    }
}

macro_rules! impl_wire_name {
    ($($ty:ident => $kind:literal [$($variant:ident),+];)*) => {
        $(
            impl fmt::Display for $ty {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str(self.as_str())
                }
            }

            impl FromStr for $ty {
                type Err = ParseParamError;

                fn from_str(s: &str) -> Result<Self, Self::Err> {
                    let all = [$($ty::$variant),+];
                    all.into_iter().find(|v| v.as_str() == s).ok_or_else(|| {
                        let names: Vec<&str> = all.iter().map(|v| v.as_str()).collect();
                        ParseParamError {
                            kind: $kind,
                            value: s.to_string(),
                            expected: names.join(", "),
                        }
                    })
                }
            }
        )*
    };
}

impl_wire_name! {
    Fit => "fit" [Clip, Crop, Fill, FillMax, Max, Scale, Min];
    CropMode => "crop mode" [Top, Bottom, Left, Right, Center, FocalPoint, Entropy];
    ImageFormat => "format" [Jpg, Pjpg, Png, Webp];
    Auto => "auto mode" [Format];
}
