//! Typed document values the client understands.
//!
//! The transport layer hands these over already decoded from JSON. Each type
//! with a `_type` discriminator rejects a mismatching discriminator instead
//! of silently decoding a different shape.
//!
//! Crop and hotspot on an image are decoded leniently: a malformed `crop` or
//! `hotspot` object is dropped (treated as absent) rather than failing the
//! whole image, since the image itself is still renderable.

use crate::asset::AssetReference;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("expected _type {expected:?}, found {found:?}")]
    InvalidType {
        expected: &'static str,
        found: String,
    },
}

fn expect_type(expected: &'static str, found: String) -> Result<(), DecodeError> {
    if found == expected {
        Ok(())
    } else {
        Err(DecodeError::InvalidType { expected, found })
    }
}

/// A reference to another document or asset.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Reference {
    #[serde(rename = "_ref")]
    pub target: String,
    #[serde(rename = "_type", default = "default_reference_type")]
    pub kind: String,
}

fn default_reference_type() -> String {
    "reference".to_string()
}

impl Reference {
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            kind: default_reference_type(),
        }
    }

    /// Parse the target as an asset reference.
    pub fn asset(&self) -> AssetReference {
        AssetReference::parse(&self.target)
    }
}

/// Fractional insets removed from each edge of an image, each in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Crop {
    pub top: f64,
    pub bottom: f64,
    pub left: f64,
    pub right: f64,
}

impl Crop {
    pub fn new(top: f64, bottom: f64, left: f64, right: f64) -> Self {
        Self {
            top,
            bottom,
            left,
            right,
        }
    }
}

/// Focal region of an image: fractional center and fractional size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hotspot {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Hotspot {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn is_finite(&self) -> bool {
        [self.x, self.y, self.width, self.height]
            .iter()
            .all(|v| v.is_finite())
    }
}

/// The whole image, centered.
impl Default for Hotspot {
    fn default() -> Self {
        Self::new(0.5, 0.5, 1.0, 1.0)
    }
}

/// An image field: asset reference plus optional crop and hotspot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawImage", into = "RawImage")]
pub struct Image {
    pub asset: Reference,
    pub crop: Option<Crop>,
    pub hotspot: Option<Hotspot>,
}

impl Image {
    pub fn new(asset: Reference, crop: Option<Crop>, hotspot: Option<Hotspot>) -> Self {
        Self {
            asset,
            crop,
            hotspot,
        }
    }

    /// Image with just an asset reference string.
    pub fn from_ref(asset_ref: impl Into<String>) -> Self {
        Self::new(Reference::new(asset_ref), None, None)
    }

    pub fn with_crop(mut self, crop: Crop) -> Self {
        self.crop = Some(crop);
        self
    }

    pub fn with_hotspot(mut self, hotspot: Hotspot) -> Self {
        self.hotspot = Some(hotspot);
        self
    }

    pub fn asset_reference(&self) -> AssetReference {
        self.asset.asset()
    }
}

#[derive(Serialize, Deserialize)]
struct RawImage {
    #[serde(rename = "_type")]
    kind: String,
    asset: Reference,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    crop: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    hotspot: Option<serde_json::Value>,
}

impl TryFrom<RawImage> for Image {
    type Error = DecodeError;

    fn try_from(raw: RawImage) -> Result<Self, Self::Error> {
        expect_type("image", raw.kind)?;
        Ok(Self {
            asset: raw.asset,
            crop: raw.crop.and_then(|v| serde_json::from_value(v).ok()),
            hotspot: raw.hotspot.and_then(|v| serde_json::from_value(v).ok()),
        })
    }
}

impl From<Image> for RawImage {
    fn from(image: Image) -> Self {
        Self {
            kind: "image".to_string(),
            asset: image.asset,
            crop: image.crop.and_then(|c| serde_json::to_value(c).ok()),
            hotspot: image.hotspot.and_then(|h| serde_json::to_value(h).ok()),
        }
    }
}

/// A file field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawFile", into = "RawFile")]
pub struct File {
    pub asset: Reference,
}

impl File {
    pub fn new(asset: Reference) -> Self {
        Self { asset }
    }

    pub fn asset_reference(&self) -> AssetReference {
        self.asset.asset()
    }
}

#[derive(Serialize, Deserialize)]
struct RawFile {
    #[serde(rename = "_type")]
    kind: String,
    asset: Reference,
}

impl TryFrom<RawFile> for File {
    type Error = DecodeError;

    fn try_from(raw: RawFile) -> Result<Self, Self::Error> {
        expect_type("file", raw.kind)?;
        Ok(Self { asset: raw.asset })
    }
}

impl From<File> for RawFile {
    fn from(file: File) -> Self {
        Self {
            kind: "file".to_string(),
            asset: file.asset,
        }
    }
}

/// A URL slug.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "RawSlug")]
pub struct Slug {
    pub current: String,
}

#[derive(Deserialize)]
struct RawSlug {
    #[serde(rename = "_type")]
    kind: String,
    current: String,
}

impl TryFrom<RawSlug> for Slug {
    type Error = DecodeError;

    fn try_from(raw: RawSlug) -> Result<Self, Self::Error> {
        expect_type("slug", raw.kind)?;
        Ok(Self {
            current: raw.current,
        })
    }
}
