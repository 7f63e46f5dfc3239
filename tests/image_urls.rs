//! End-to-end image URL scenarios through the public API.
//!
//! Fixture image: `image-Tb9Ew8CXIwaY6R1kjMvI0uRR-2000x3000-jpg` in project
//! `zp7mbokg`, dataset `production`.

use content_lake::config::ClientConfig;
use content_lake::imaging::{Fit, GeometryError, ImageFormat, ImageUrlBuilder};
use content_lake::types::{Crop, Hotspot, Image};

const TALL: &str = "image-Tb9Ew8CXIwaY6R1kjMvI0uRR-2000x3000-jpg";
const BASE: &str =
    "https://cdn.sanity.io/images/zp7mbokg/production/Tb9Ew8CXIwaY6R1kjMvI0uRR-2000x3000.jpg";

fn builder(image: &Image) -> ImageUrlBuilder {
    let endpoint = ClientConfig::new("zp7mbokg", "production")
        .cdn_endpoint()
        .unwrap();
    ImageUrlBuilder::new(endpoint, image)
}

fn hotspot_image() -> Image {
    Image::from_ref(TALL).with_hotspot(Hotspot::new(0.3, 0.3, 0.3, 0.3))
}

#[test]
fn no_size_means_no_query() {
    assert_eq!(builder(&hotspot_image()).build().as_deref(), Some(BASE));
    assert_eq!(builder(&Image::from_ref(TALL)).build().as_deref(), Some(BASE));
}

#[test]
fn tall_target_centers_on_hotspot() {
    let url = builder(&hotspot_image()).width(30).height(100).build();
    assert_eq!(
        url,
        Some(format!("{BASE}?rect=150,0,900,3000&w=30&h=100"))
    );
}

#[test]
fn wide_target_centers_on_hotspot() {
    let url = builder(&hotspot_image()).width(100).height(30).build();
    assert_eq!(url, Some(format!("{BASE}?rect=0,600,2000,600&w=100&h=30")));
}

#[test]
fn missing_hotspot_centers_on_image() {
    let url = builder(&Image::from_ref(TALL)).width(30).height(100).build();
    assert_eq!(url, Some(format!("{BASE}?rect=550,0,900,3000&w=30&h=100")));
}

#[test]
fn crop_and_hotspot_combine() {
    let image = hotspot_image().with_crop(Crop::new(0.1, 0.1, 0.1, 0.1));
    let url = builder(&image).width(30).height(100).build();
    assert_eq!(
        url,
        Some(format!("{BASE}?rect=240,300,720,2400&w=30&h=100"))
    );
}

#[test]
fn unparseable_reference_builds_nothing() {
    let image = Image::from_ref("image-Tb9Ew8CXIwaY6R1kjMvI0uRR-jpg")
        .with_hotspot(Hotspot::new(0.3, 0.3, 0.3, 0.3))
        .with_crop(Crop::new(0.1, 0.1, 0.1, 0.1));
    let b = builder(&image)
        .width(30)
        .height(100)
        .fit(Fit::Crop)
        .format(ImageFormat::Png);
    assert_eq!(b.build(), None);
    assert_eq!(b.try_build(), Err(GeometryError::InvalidAsset));
}

#[test]
fn single_dimension_ignores_hotspot() {
    let image = hotspot_image();
    assert_eq!(
        builder(&image).width(100).build(),
        Some(format!("{BASE}?w=100"))
    );
    assert_eq!(
        builder(&image).height(100).build(),
        Some(format!("{BASE}?h=100"))
    );

    let cropped = image.with_crop(Crop::new(0.1, 0.1, 0.1, 0.1));
    assert_eq!(
        builder(&cropped).width(100).build(),
        Some(format!("{BASE}?rect=200,300,1600,2400&w=100"))
    );
}

#[test]
fn matching_aspect_needs_no_rect() {
    let image = Image::from_ref("image-Tb9Ew8CXIwaY6R1kjMvI0uRR-1000x1200-png");
    assert_eq!(
        builder(&image).width(500).height(600).build().as_deref(),
        Some(
            "https://cdn.sanity.io/images/zp7mbokg/production/\
             Tb9Ew8CXIwaY6R1kjMvI0uRR-1000x1200.png?w=500&h=600"
        )
    );
}

#[test]
fn wide_source_without_hotspot() {
    let image = Image::from_ref(TALL);
    assert_eq!(
        builder(&image).width(100).height(30).build(),
        Some(format!("{BASE}?rect=0,1200,2000,600&w=100&h=30"))
    );
}

#[test]
fn repeated_chains_are_identical() {
    let image = hotspot_image();
    let chain = || {
        builder(&image)
            .width(30)
            .height(100)
            .fit(Fit::Crop)
            .format(ImageFormat::Webp)
            .build()
    };
    assert_eq!(chain(), chain());
}

#[test]
fn derived_builders_are_independent() {
    let base = builder(&hotspot_image()).fit(Fit::Max);
    let thumb = base.clone().width(30).height(100);
    let full = base.clone().width(100).height(30);

    assert_eq!(base.build(), Some(format!("{BASE}?fit=max")));
    assert_eq!(
        thumb.build(),
        Some(format!("{BASE}?rect=150,0,900,3000&w=30&h=100&fit=max"))
    );
    assert_eq!(
        full.build(),
        Some(format!("{BASE}?rect=0,600,2000,600&w=100&h=30&fit=max"))
    );
}

#[test]
fn builder_is_shareable_across_threads() {
    let base = builder(&hotspot_image());
    let handles: Vec<_> = [30u32, 60, 90]
        .into_iter()
        .map(|w| {
            let b = base.clone();
            std::thread::spawn(move || b.width(w).build())
        })
        .collect();
    for handle in handles {
        assert!(handle.join().unwrap().is_some());
    }
}

#[test]
fn decoded_document_image() {
    let image: Image = serde_json::from_value(serde_json::json!({
        "_type": "image",
        "asset": {"_ref": TALL, "_type": "reference"},
        "crop": {"top": 0.1, "bottom": 0.1, "left": 0.1, "right": 0.1},
        "hotspot": {"x": 0.3, "y": 0.3, "width": 0.3, "height": 0.3}
    }))
    .unwrap();
    assert_eq!(
        builder(&image).width(30).height(100).build(),
        Some(format!("{BASE}?rect=240,300,720,2400&w=30&h=100"))
    );
}
