//! Delivery URLs for image and file assets.
//!
//! [`ImageUrlBuilder`] is a value: every setter consumes the builder and
//! returns the updated one, so two renditions derived from a common base
//! (`base.clone().width(300)` / `base.width(600)`) never alias.
//!
//! The path always embeds the asset's *stored* dimensions; the requested
//! output size travels only in the query string:
//!
//! ```text
//! https://cdn.sanity.io/images/{project}/{dataset}/{id}-{W}x{H}.{format}?rect=..&w=..&h=..
//! ```
//!
//! Query parameters appear in a fixed order and only when set. `rect` is
//! omitted when it would cover the whole asset.

use super::calculations::{GeometryError, SourceCrop, compute_source_rect};
use super::params::{Auto, CropMode, Fit, FocalPoint, ImageFormat, Orientation, TransformParams};
use crate::asset::AssetReference;
use crate::config::CdnEndpoint;
use crate::types::{Crop, Hotspot, Image};

macro_rules! transform_setters {
    ($($(#[$doc:meta])* $name:ident: $ty:ty;)*) => {
        $(
            $(#[$doc])*
            pub fn $name(mut self, value: $ty) -> Self {
                self.params.$name = Some(value);
                self
            }
        )*
    };
}

/// Accumulates transform options for one image rendition.
#[derive(Debug, Clone, PartialEq)]
#[must_use]
pub struct ImageUrlBuilder {
    endpoint: CdnEndpoint,
    reference: AssetReference,
    image_crop: Option<Crop>,
    hotspot: Option<Hotspot>,
    params: TransformParams,
}

impl ImageUrlBuilder {
    /// Builder for an image field, taking its crop and hotspot along.
    pub fn new(endpoint: CdnEndpoint, image: &Image) -> Self {
        Self {
            endpoint,
            reference: image.asset_reference(),
            image_crop: image.crop,
            hotspot: image.hotspot,
            params: TransformParams::default(),
        }
    }

    /// Builder for a bare asset reference, without crop or hotspot.
    pub fn for_reference(endpoint: CdnEndpoint, reference: AssetReference) -> Self {
        Self {
            endpoint,
            reference,
            image_crop: None,
            hotspot: None,
            params: TransformParams::default(),
        }
    }

    pub fn reference(&self) -> &AssetReference {
        &self.reference
    }

    pub fn params(&self) -> &TransformParams {
        &self.params
    }

    /// Replace every transform option at once; fields left `None` are unset.
    pub fn transform(mut self, params: TransformParams) -> Self {
        self.params = params;
        self
    }

    /// Replace the image crop insets.
    pub fn image_crop(mut self, crop: impl Into<Option<Crop>>) -> Self {
        self.image_crop = crop.into();
        self
    }

    /// Replace the image hotspot.
    pub fn hotspot(mut self, hotspot: impl Into<Option<Hotspot>>) -> Self {
        self.hotspot = hotspot.into();
        self
    }

    transform_setters! {
        /// Output width in pixels (`w`).
        width: u32;
        /// Output height in pixels (`h`).
        height: u32;
        max_width: u32;
        max_height: u32;
        min_width: u32;
        min_height: u32;
        blur: u32;
        /// Sharpening amount (`sharp`).
        sharpen: u32;
        /// Device pixel ratio multiplier.
        dpr: u32;
        /// Lossy encoding quality, 0-100 (`q`).
        quality: u32;
        /// -100 (grayscale) to 100 (`sat`).
        saturation: i32;
        pad: f64;
        invert: bool;
        flip_horizontal: bool;
        flip_vertical: bool;
        /// Overrides the hotspot for `crop=focalpoint` (`fp-x`, `fp-y`).
        focal_point: FocalPoint;
        auto: Auto;
        /// Output encoding (`fm`).
        format: ImageFormat;
        /// Rotation (`or`).
        orientation: Orientation;
        fit: Fit;
        /// Crop mode used when `fit=crop` cuts (`crop`).
        crop: CropMode;
    }

    /// Build the URL, or explain why none can be built.
    pub fn try_build(&self) -> Result<String, GeometryError> {
        if self.params.pad.is_some_and(|pad| !pad.is_finite()) {
            return Err(GeometryError::NonFinite("pad"));
        }
        if self.params.focal_point.is_some_and(|fp| !fp.is_finite()) {
            return Err(GeometryError::NonFinite("focal point"));
        }

        let fit = compute_source_rect(
            &self.reference,
            self.image_crop.as_ref(),
            self.hotspot.as_ref(),
            self.params.width,
            self.params.height,
        )?;

        let mut url = format!(
            "https://{}/images/{}/{}/{}-{}x{}.{}",
            self.endpoint.host,
            self.endpoint.project_id,
            self.endpoint.dataset,
            self.reference.id(),
            self.reference.width(),
            self.reference.height(),
            self.reference.format(),
        );

        let pairs = self.query_pairs(&fit);
        if !pairs.is_empty() {
            let query: Vec<String> = pairs
                .into_iter()
                .map(|(name, value)| format!("{name}={value}"))
                .collect();
            url.push('?');
            url.push_str(&query.join("&"));
        }

        Ok(url)
    }

    /// Build the URL. `None` whenever [`try_build`](Self::try_build) fails.
    pub fn build(&self) -> Option<String> {
        self.try_build().ok()
    }

    fn query_pairs(&self, fit: &SourceCrop) -> Vec<(&'static str, String)> {
        let p = &self.params;
        let mut pairs: Vec<(&'static str, String)> = Vec::new();

        if !fit
            .rect
            .is_full(self.reference.width(), self.reference.height())
        {
            pairs.push(("rect", fit.rect.to_param()));
        }

        let numeric = [
            ("w", fit.width),
            ("h", fit.height),
            ("max-w", p.max_width),
            ("max-h", p.max_height),
            ("min-w", p.min_width),
            ("min-h", p.min_height),
            ("blur", p.blur),
            ("sharp", p.sharpen),
            ("dpr", p.dpr),
            ("or", p.orientation.map(Orientation::degrees)),
        ];
        for (name, value) in numeric {
            if let Some(value) = value {
                pairs.push((name, value.to_string()));
            }
        }

        if let Some(mode) = p.fit {
            pairs.push(("fit", mode.to_string()));
        }
        if let Some(flip) = p.flip().as_param() {
            pairs.push(("flip", flip.to_string()));
        }
        if let Some(fp) = p.focal_point {
            pairs.push(("fp-x", fp.x.to_string()));
            pairs.push(("fp-y", fp.y.to_string()));
        }
        if p.invert == Some(true) {
            pairs.push(("invert", "true".to_string()));
        }
        if let Some(format) = p.format {
            pairs.push(("fm", format.to_string()));
        }
        if let Some(quality) = p.quality {
            pairs.push(("q", quality.to_string()));
        }
        if let Some(saturation) = p.saturation {
            pairs.push(("sat", saturation.to_string()));
        }
        if let Some(pad) = p.pad {
            pairs.push(("pad", pad.to_string()));
        }
        if let Some(auto) = p.auto {
            pairs.push(("auto", auto.to_string()));
        }
        if let Some(crop) = p.crop {
            pairs.push(("crop", crop.to_string()));
        }

        pairs
    }
}

/// Delivery URL for a file asset: `https://{host}/files/{project}/{dataset}/{id}.{ext}`.
///
/// `None` unless `reference` is a valid file reference.
pub fn file_url(endpoint: &CdnEndpoint, reference: &AssetReference) -> Option<String> {
    if !reference.is_file() {
        log::debug!("no file URL for non-file reference {reference:?}");
        return None;
    }
    Some(format!(
        "https://{}/files/{}/{}/{}.{}",
        endpoint.host,
        endpoint.project_id,
        endpoint.dataset,
        reference.id(),
        reference.format()
    ))
}
