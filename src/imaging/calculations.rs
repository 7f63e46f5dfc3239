//! Source-rectangle geometry for image delivery URLs.
//!
//! All functions here are pure: they work on the dimensions embedded in the
//! asset reference and never touch pixels.
//!
//! The pipeline is:
//!
//! ```text
//! crop fractions   → CropBox        (asset pixels, f64)
//! hotspot fractions → HotspotBounds  (asset pixels, f64)
//! CropBox + HotspotBounds + target size → SourceRect (rounded, u32)
//! ```
//!
//! Hotspot-centered cutting only happens when both target width and height
//! are known. With zero or one target dimension the CDN scales
//! proportionally, so the source rectangle is just the crop box.

use crate::asset::AssetReference;
use crate::types::{Crop, Hotspot};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeometryError {
    #[error("not a valid image asset reference")]
    InvalidAsset,
    #[error("crop leaves a {width}x{height} pixel region, smaller than 1x1")]
    DegenerateCrop { width: f64, height: f64 },
    #[error("fitting to the requested aspect leaves a {width}x{height} pixel region")]
    DegenerateRect { width: u32, height: u32 },
    #[error("requested output size must be non-zero")]
    ZeroTargetSize,
    #[error("{0} must be a finite number")]
    NonFinite(&'static str),
}

/// Crop region in asset pixel coordinates, before rounding.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CropBox {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl CropBox {
    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    pub fn aspect_ratio(&self) -> f64 {
        self.width / self.height
    }

    fn is_degenerate(&self) -> bool {
        // negated so NaN counts as degenerate
        !(self.width >= 1.0 && self.height >= 1.0)
    }
}

/// Hotspot bounding box in asset pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HotspotBounds {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl HotspotBounds {
    pub fn center_x(&self) -> f64 {
        (self.right - self.left) / 2.0 + self.left
    }

    pub fn center_y(&self) -> f64 {
        (self.bottom - self.top) / 2.0 + self.top
    }
}

/// Rectangle of the source image to extract, in whole pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceRect {
    pub left: u32,
    pub top: u32,
    pub width: u32,
    pub height: u32,
}

impl SourceRect {
    /// True when the rectangle is exactly the full `width`×`height` image.
    pub fn is_full(&self, width: u32, height: u32) -> bool {
        self.left == 0 && self.top == 0 && self.width == width && self.height == height
    }

    /// `"left,top,width,height"`, the `rect` query value.
    pub fn to_param(&self) -> String {
        format!("{},{},{},{}", self.left, self.top, self.width, self.height)
    }
}

/// Source rectangle plus the output size that goes with it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceCrop {
    pub rect: SourceRect,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

/// Convert crop insets into a pixel rectangle. No crop means the full image.
///
/// Each inset is clamped to `[0, 1]` first; insets that still sum past 1 on
/// an axis produce a zero or negative extent (see [`compute_source_rect`]).
pub fn crop_box(width: u32, height: u32, crop: Option<&Crop>) -> CropBox {
    let (w, h) = (width as f64, height as f64);
    match crop {
        Some(crop) => {
            let left = crop.left.clamp(0.0, 1.0) * w;
            let top = crop.top.clamp(0.0, 1.0) * h;
            CropBox {
                left,
                top,
                width: w - crop.right.clamp(0.0, 1.0) * w - left,
                height: h - crop.bottom.clamp(0.0, 1.0) * h - top,
            }
        }
        None => CropBox {
            left: 0.0,
            top: 0.0,
            width: w,
            height: h,
        },
    }
}

/// Convert a fractional hotspot into pixel bounds. No hotspot means the
/// whole image, centered.
pub fn hotspot_bounds(width: u32, height: u32, hotspot: Option<&Hotspot>) -> HotspotBounds {
    let hotspot = hotspot.copied().unwrap_or_default();
    let (w, h) = (width as f64, height as f64);

    let radius_x = (hotspot.width * w) / 2.0;
    let radius_y = (hotspot.height * h) / 2.0;
    let center_x = hotspot.x * w;
    let center_y = hotspot.y * h;

    HotspotBounds {
        left: center_x - radius_x,
        top: center_y - radius_y,
        right: center_x + radius_x,
        bottom: center_y + radius_y,
    }
}

/// Cut the crop box down to the target aspect ratio, centered on the
/// hotspot and kept inside the crop box.
///
/// A crop box wider than the target keeps its full height and slides
/// horizontally; otherwise (including an exact ratio match) it keeps its
/// full width and slides vertically.
pub fn fit_to_aspect(
    crop: &CropBox,
    hotspot: &HotspotBounds,
    target_width: u32,
    target_height: u32,
) -> SourceRect {
    let desired = target_width as f64 / target_height as f64;

    if crop.aspect_ratio() > desired {
        let height = crop.height;
        let width = height * desired;

        let mut left = hotspot.center_x() - width / 2.0;
        if left < crop.left {
            left = crop.left;
        } else if left + width > crop.right() {
            left = crop.right() - width;
        }

        rounded(left, crop.top, width, height)
    } else {
        let width = crop.width;
        let height = width / desired;

        let mut top = hotspot.center_y() - height / 2.0;
        if top < crop.top {
            top = crop.top;
        } else if top + height > crop.bottom() {
            top = crop.bottom() - height;
        }

        rounded(crop.left, top, width, height)
    }
}

/// Round every edge half-away-from-zero; origin never goes negative.
/// A `.5` origin rounds up, so a centered cut of odd size leans right/down.
fn rounded(left: f64, top: f64, width: f64, height: f64) -> SourceRect {
    SourceRect {
        left: left.round().max(0.0) as u32,
        top: top.round().max(0.0) as u32,
        width: width.round().max(0.0) as u32,
        height: height.round().max(0.0) as u32,
    }
}

/// Compute the source rectangle for an image rendition.
///
/// # Errors
/// * [`GeometryError::InvalidAsset`]: `reference` is not a valid image reference
/// * [`GeometryError::ZeroTargetSize`]: a requested dimension is `0`
/// * [`GeometryError::DegenerateCrop`]: the crop leaves less than one pixel
/// * [`GeometryError::DegenerateRect`]: the fitted rectangle rounds to zero width or height
/// * [`GeometryError::NonFinite`]: a hotspot value is NaN or infinite
///
/// # Examples
/// ```
/// # use content_lake::asset::AssetReference;
/// # use content_lake::imaging::compute_source_rect;
/// let asset = AssetReference::parse("image-abc-2000x3000-jpg");
/// let fit = compute_source_rect(&asset, None, None, Some(30), Some(100)).unwrap();
/// assert_eq!(fit.rect.to_param(), "550,0,900,3000");
/// ```
pub fn compute_source_rect(
    reference: &AssetReference,
    crop: Option<&Crop>,
    hotspot: Option<&Hotspot>,
    target_width: Option<u32>,
    target_height: Option<u32>,
) -> Result<SourceCrop, GeometryError> {
    if !reference.is_image() {
        return Err(GeometryError::InvalidAsset);
    }
    if target_width == Some(0) || target_height == Some(0) {
        return Err(GeometryError::ZeroTargetSize);
    }

    let (asset_w, asset_h) = (reference.width(), reference.height());
    let crop_box = crop_box(asset_w, asset_h, crop);
    if crop_box.is_degenerate() {
        log::debug!(
            "degenerate crop {crop:?} on {reference}: {}x{}",
            crop_box.width,
            crop_box.height
        );
        return Err(GeometryError::DegenerateCrop {
            width: crop_box.width,
            height: crop_box.height,
        });
    }

    let rect = match (target_width, target_height) {
        (Some(w), Some(h)) => {
            if hotspot.is_some_and(|spot| !spot.is_finite()) {
                return Err(GeometryError::NonFinite("hotspot"));
            }
            let bounds = hotspot_bounds(asset_w, asset_h, hotspot);
            fit_to_aspect(&crop_box, &bounds, w, h)
        }
        _ => rounded(crop_box.left, crop_box.top, crop_box.width, crop_box.height),
    };
    if rect.width == 0 || rect.height == 0 {
        log::debug!("target ratio leaves an empty rect on {reference}: {rect:?}");
        return Err(GeometryError::DegenerateRect {
            width: rect.width,
            height: rect.height,
        });
    }

    Ok(SourceCrop {
        rect,
        width: target_width,
        height: target_height,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn asset(w: u32, h: u32) -> AssetReference {
        AssetReference::image("Tb9Ew8CXIwaY6R1kjMvI0uRR", w, h, "jpg")
    }

    fn rect(left: u32, top: u32, width: u32, height: u32) -> SourceRect {
        SourceRect {
            left,
            top,
            width,
            height,
        }
    }

    // =========================================================================
    // crop_box tests
    // =========================================================================

    #[test]
    fn crop_box_without_crop_is_full_image() {
        let b = crop_box(2000, 3000, None);
        assert_eq!((b.left, b.top, b.width, b.height), (0.0, 0.0, 2000.0, 3000.0));
    }

    #[test]
    fn crop_box_applies_insets() {
        let b = crop_box(2000, 3000, Some(&Crop::new(0.1, 0.1, 0.1, 0.1)));
        assert_eq!((b.left, b.top, b.width, b.height), (200.0, 300.0, 1600.0, 2400.0));
        assert_eq!(b.right(), 1800.0);
        assert_eq!(b.bottom(), 2700.0);
    }

    #[test]
    fn crop_box_clamps_out_of_range_insets() {
        let b = crop_box(1000, 1000, Some(&Crop::new(-0.5, 0.0, 0.0, 0.0)));
        assert_eq!(b.top, 0.0);
        assert_eq!(b.height, 1000.0);
    }

    // =========================================================================
    // hotspot_bounds tests
    // =========================================================================

    #[test]
    fn hotspot_bounds_default_is_full_image() {
        let h = hotspot_bounds(2000, 3000, None);
        assert_eq!((h.left, h.top, h.right, h.bottom), (0.0, 0.0, 2000.0, 3000.0));
        assert_eq!(h.center_x(), 1000.0);
        assert_eq!(h.center_y(), 1500.0);
    }

    #[test]
    fn hotspot_bounds_from_fractions() {
        let h = hotspot_bounds(2000, 3000, Some(&Hotspot::new(0.3, 0.3, 0.3, 0.3)));
        assert_eq!(h.center_x(), 600.0);
        assert_eq!(h.center_y(), 900.0);
    }

    // =========================================================================
    // compute_source_rect tests
    // =========================================================================

    #[test]
    fn tall_target_on_wide_crop_centers_on_hotspot() {
        let hotspot = Hotspot::new(0.3, 0.3, 0.3, 0.3);
        let fit =
            compute_source_rect(&asset(2000, 3000), None, Some(&hotspot), Some(30), Some(100))
                .unwrap();
        assert_eq!(fit.rect, rect(150, 0, 900, 3000));
        assert_eq!((fit.width, fit.height), (Some(30), Some(100)));
    }

    #[test]
    fn wide_target_cuts_vertically() {
        let hotspot = Hotspot::new(0.3, 0.3, 0.3, 0.3);
        let fit =
            compute_source_rect(&asset(2000, 3000), None, Some(&hotspot), Some(100), Some(30))
                .unwrap();
        assert_eq!(fit.rect, rect(0, 600, 2000, 600));
    }

    #[test]
    fn default_hotspot_centers_the_cut() {
        let a = asset(2000, 3000);
        let tall = compute_source_rect(&a, None, None, Some(30), Some(100)).unwrap();
        assert_eq!(tall.rect, rect(550, 0, 900, 3000));
        let wide = compute_source_rect(&a, None, None, Some(100), Some(30)).unwrap();
        assert_eq!(wide.rect, rect(0, 1200, 2000, 600));
    }

    #[test]
    fn cut_stays_inside_crop() {
        let crop = Crop::new(0.1, 0.1, 0.1, 0.1);
        let hotspot = Hotspot::new(0.3, 0.3, 0.3, 0.3);
        let fit = compute_source_rect(
            &asset(2000, 3000),
            Some(&crop),
            Some(&hotspot),
            Some(30),
            Some(100),
        )
        .unwrap();
        assert_eq!(fit.rect, rect(240, 300, 720, 2400));
    }

    #[test]
    fn hotspot_near_left_edge_is_clamped() {
        let hotspot = Hotspot::new(0.05, 0.5, 0.1, 0.1);
        let fit =
            compute_source_rect(&asset(2000, 3000), None, Some(&hotspot), Some(30), Some(100))
                .unwrap();
        assert_eq!(fit.rect, rect(0, 0, 900, 3000));
    }

    #[test]
    fn hotspot_near_right_edge_is_clamped() {
        let hotspot = Hotspot::new(0.95, 0.5, 0.1, 0.1);
        let fit =
            compute_source_rect(&asset(2000, 3000), None, Some(&hotspot), Some(30), Some(100))
                .unwrap();
        assert_eq!(fit.rect, rect(1100, 0, 900, 3000));
    }

    #[test]
    fn hotspot_near_bottom_edge_is_clamped() {
        let hotspot = Hotspot::new(0.5, 0.99, 0.1, 0.1);
        let fit =
            compute_source_rect(&asset(2000, 3000), None, Some(&hotspot), Some(100), Some(30))
                .unwrap();
        assert_eq!(fit.rect, rect(0, 2400, 2000, 600));
    }

    #[test]
    fn matching_aspect_ratio_yields_full_rect() {
        let fit =
            compute_source_rect(&asset(1000, 1200), None, None, Some(500), Some(600)).unwrap();
        assert!(fit.rect.is_full(1000, 1200));
    }

    #[test]
    fn single_dimension_ignores_hotspot() {
        let hotspot = Hotspot::new(0.1, 0.1, 0.1, 0.1);
        let crop = Crop::new(0.1, 0.1, 0.1, 0.1);
        let a = asset(2000, 3000);

        let width_only = compute_source_rect(&a, Some(&crop), Some(&hotspot), Some(100), None)
            .unwrap();
        let height_only = compute_source_rect(&a, Some(&crop), Some(&hotspot), None, Some(100))
            .unwrap();
        let crop_only = compute_source_rect(&a, Some(&crop), None, None, None).unwrap();

        assert_eq!(width_only.rect, rect(200, 300, 1600, 2400));
        assert_eq!(height_only.rect, width_only.rect);
        assert_eq!(crop_only.rect, width_only.rect);
        assert_eq!((width_only.width, width_only.height), (Some(100), None));
    }

    #[test]
    fn no_target_and_no_crop_is_full_image() {
        let fit = compute_source_rect(
            &asset(2000, 3000),
            None,
            Some(&Hotspot::new(0.3, 0.3, 0.3, 0.3)),
            None,
            None,
        )
        .unwrap();
        assert!(fit.rect.is_full(2000, 3000));
    }

    #[test]
    fn invalid_reference_is_rejected() {
        let invalid = AssetReference::parse("not-a-reference");
        assert_eq!(
            compute_source_rect(&invalid, None, None, Some(10), Some(10)),
            Err(GeometryError::InvalidAsset)
        );
    }

    #[test]
    fn file_reference_is_rejected() {
        let file = AssetReference::parse("file-abc-pdf");
        assert_eq!(
            compute_source_rect(&file, None, None, None, None),
            Err(GeometryError::InvalidAsset)
        );
    }

    #[test]
    fn zero_target_is_rejected() {
        let a = asset(100, 100);
        assert_eq!(
            compute_source_rect(&a, None, None, Some(0), Some(10)),
            Err(GeometryError::ZeroTargetSize)
        );
        assert_eq!(
            compute_source_rect(&a, None, None, None, Some(0)),
            Err(GeometryError::ZeroTargetSize)
        );
    }

    // Insets summing to 1 or more on an axis leave nothing to render.
    #[test]
    fn degenerate_crop_is_rejected() {
        let a = asset(2000, 3000);
        let overlapping = Crop::new(0.6, 0.6, 0.0, 0.0);
        assert!(matches!(
            compute_source_rect(&a, Some(&overlapping), None, Some(30), Some(100)),
            Err(GeometryError::DegenerateCrop { .. })
        ));

        let exact = Crop::new(0.0, 0.0, 0.5, 0.5);
        assert!(matches!(
            compute_source_rect(&a, Some(&exact), None, None, None),
            Err(GeometryError::DegenerateCrop { .. })
        ));
    }

    #[test]
    fn sub_pixel_crop_is_rejected() {
        let a = asset(100, 100);
        let sliver = Crop::new(0.0, 0.0, 0.498, 0.498);
        assert!(matches!(
            compute_source_rect(&a, Some(&sliver), None, None, None),
            Err(GeometryError::DegenerateCrop { .. })
        ));
    }

    #[test]
    fn extreme_wide_target_is_rejected() {
        let result = compute_source_rect(&asset(2000, 3000), None, None, Some(100_000), Some(1));
        assert_eq!(
            result,
            Err(GeometryError::DegenerateRect {
                width: 2000,
                height: 0
            })
        );
    }

    #[test]
    fn extreme_tall_target_is_rejected() {
        let result = compute_source_rect(&asset(2000, 3000), None, None, Some(1), Some(100_000));
        assert_eq!(
            result,
            Err(GeometryError::DegenerateRect {
                width: 0,
                height: 3000
            })
        );
    }

    // Centre 128 minus half of a 1px cut puts the origin at 127.5.
    #[test]
    fn half_pixel_origin_rounds_up() {
        let a = asset(256, 256);
        let wide = compute_source_rect(&a, None, None, Some(256), Some(1)).unwrap();
        assert_eq!(wide.rect, rect(0, 128, 256, 1));
        let tall = compute_source_rect(&a, None, None, Some(1), Some(256)).unwrap();
        assert_eq!(tall.rect, rect(128, 0, 1, 256));
    }

    #[test]
    fn non_finite_hotspot_is_rejected() {
        let a = asset(2000, 3000);
        let nan = Hotspot::new(f64::NAN, 0.5, 0.1, 0.1);
        assert_eq!(
            compute_source_rect(&a, None, Some(&nan), Some(30), Some(100)),
            Err(GeometryError::NonFinite("hotspot"))
        );
        let infinite = Hotspot::new(0.5, 0.5, f64::INFINITY, 0.1);
        assert_eq!(
            compute_source_rect(&a, None, Some(&infinite), Some(100), Some(30)),
            Err(GeometryError::NonFinite("hotspot"))
        );
    }

    #[test]
    fn non_finite_crop_is_degenerate() {
        let nan = Crop::new(f64::NAN, 0.0, 0.0, 0.0);
        assert!(matches!(
            compute_source_rect(&asset(2000, 3000), Some(&nan), None, None, None),
            Err(GeometryError::DegenerateCrop { .. })
        ));
    }

    #[test]
    fn source_rect_param_format() {
        assert_eq!(rect(150, 0, 900, 3000).to_param(), "150,0,900,3000");
    }
}
