//! Element conversion entry points
//!
//! A minimal model of the host document's elements: a tag name, an
//! attribute map and a converted marker. Rendering stays pure; these
//! entry points only resolve configuration layers, call the core
//! transforms and enforce conversion idempotence. Injecting the
//! artifact back into a display tree is the host's business.

use std::collections::HashMap;

use crate::banner::TextBlock;
use crate::buffer::Surface;
use crate::error::{CoreError, Result};
use crate::fontstore::FontStore;
use crate::ramp::Ramp;
use crate::raster::{self, sample_dims, Grid, RenderOptions, RenderOverrides};

/// Attribute names recognized on elements
const ATTR_SCALE: &str = "asciiscale";
const ATTR_COLOR: &str = "asciicolor";
const ATTR_ALPHA: &str = "asciialpha";
const ATTR_BLOCK: &str = "asciiblock";
const ATTR_INVERT: &str = "asciiinvert";
const ATTR_RESOLUTION: &str = "asciiresolution";
const ATTR_CHARS: &str = "asciichars";

/// A text- or image-bearing element of the host document
#[derive(Debug, Clone, Default)]
pub struct Element {
    tag: String,
    attrs: HashMap<String, String>,
    text: String,
    converted: bool,
}

impl Element {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_lowercase(),
            ..Default::default()
        }
    }

    pub fn with_attr(mut self, name: &str, value: &str) -> Self {
        self.set_attr(name, value);
        self
    }

    pub fn with_text(mut self, text: &str) -> Self {
        self.text = text.to_string();
        self
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(String::as_str)
    }

    pub fn set_attr(&mut self, name: &str, value: &str) {
        self.attrs.insert(name.to_lowercase(), value.to_string());
    }

    pub fn is_converted(&self) -> bool {
        self.converted
    }

    fn mark_converted(&mut self) {
        self.converted = true;
    }

    /// Rendering overrides declared through element attributes
    pub fn render_overrides(&self) -> Result<RenderOverrides> {
        let mut overrides = RenderOverrides::default();
        if let Some(value) = self.attr(ATTR_SCALE) {
            let scale = value
                .parse::<f64>()
                .map_err(|_| CoreError::Config(format!("invalid {ATTR_SCALE} '{value}'")))?;
            overrides.scale = Some(scale);
        }
        if let Some(value) = self.attr(ATTR_RESOLUTION) {
            overrides.resolution = Some(value.parse()?);
        }
        if let Some(value) = self.attr(ATTR_CHARS) {
            overrides.ramp = Some(Ramp::parse(value)?);
        }
        overrides.color = self.flag_attr(ATTR_COLOR);
        overrides.alpha = self.flag_attr(ATTR_ALPHA);
        overrides.block = self.flag_attr(ATTR_BLOCK);
        overrides.invert = self.flag_attr(ATTR_INVERT);
        Ok(overrides)
    }

    fn flag_attr(&self, name: &str) -> Option<bool> {
        self.attr(name).map(|value| value == "true")
    }
}

/// Mapping from element tag name to banner font name
#[derive(Debug, Clone, Default)]
pub struct TagMap {
    tags: HashMap<String, String>,
}

impl TagMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn map(&mut self, tag: &str, font: &str) {
        self.tags.insert(tag.to_lowercase(), font.to_string());
    }

    pub fn font_for(&self, tag: &str) -> Option<&str> {
        self.tags.get(&tag.to_lowercase()).map(String::as_str)
    }
}

impl FromIterator<(String, String)> for TagMap {
    fn from_iter<T: IntoIterator<Item = (String, String)>>(iter: T) -> Self {
        let mut tags = Self::new();
        for (tag, font) in iter {
            tags.map(&tag, &font);
        }
        tags
    }
}

/// Convert an image-bearing element into a glyph grid.
///
/// Options resolve call-site over element attributes over defaults,
/// once, here. An element already marked converted is left alone and
/// yields `None`.
pub fn convert_image(
    surface: &dyn Surface,
    element: &mut Element,
    call: &RenderOverrides,
    defaults: &RenderOptions,
) -> Result<Option<Grid>> {
    if element.is_converted() {
        tracing::debug!(tag = element.tag(), "element already converted");
        return Ok(None);
    }
    let options = call.over(&element.render_overrides()?).resolve(defaults)?;
    let (width, height) = surface.dimensions();
    let (sample_width, sample_height) = sample_dims(width, height, options.resolution);
    let buffer = surface.snapshot(sample_width, sample_height)?;
    let grid = raster::render(&buffer, &options)?;
    element.mark_converted();
    Ok(Some(grid))
}

/// Convert a text-bearing element into a banner.
///
/// The element's tag must be mapped to a font name; an unmapped tag is
/// an error for that element only. Already-converted elements yield
/// `None`.
pub async fn convert_text(
    element: &mut Element,
    tags: &TagMap,
    store: &FontStore,
) -> Result<Option<TextBlock>> {
    if element.is_converted() {
        tracing::debug!(tag = element.tag(), "element already converted");
        return Ok(None);
    }
    let font = tags
        .font_for(element.tag())
        .ok_or_else(|| CoreError::UnmappedElement(element.tag().to_string()))?;
    let block = store.write(element.text(), font).await?;
    element.mark_converted();
    Ok(Some(block))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::ImageSurface;
    use crate::fontstore::{DirFontSource, FontStore};
    use crate::raster::Resolution;
    use image::{DynamicImage, RgbaImage};

    fn black_surface(width: u32, height: u32) -> ImageSurface {
        let image = RgbaImage::from_pixel(width, height, image::Rgba([0, 0, 0, 255]));
        ImageSurface::new(DynamicImage::ImageRgba8(image))
    }

    #[test]
    fn test_attribute_overrides() {
        let element = Element::new("img")
            .with_attr("asciiscale", "2")
            .with_attr("asciicolor", "true")
            .with_attr("asciiresolution", "high")
            .with_attr("asciichars", " #");
        let overrides = element.render_overrides().unwrap();
        assert_eq!(overrides.scale, Some(2.0));
        assert_eq!(overrides.color, Some(true));
        assert_eq!(overrides.resolution, Some(Resolution::High));
        assert_eq!(overrides.ramp, Some(Ramp::new(" #").unwrap()));
        assert_eq!(overrides.invert, None);
    }

    #[test]
    fn test_preset_name_attribute() {
        let element = Element::new("img").with_attr("asciichars", "bits");
        let overrides = element.render_overrides().unwrap();
        assert_eq!(overrides.ramp, Some(Ramp::preset("bits").unwrap()));
    }

    #[test]
    fn test_bad_attribute_rejected() {
        let element = Element::new("img").with_attr("asciiscale", "huge");
        assert!(element.render_overrides().is_err());
    }

    #[test]
    fn test_convert_image_idempotent() {
        let surface = black_surface(6, 4);
        let mut element = Element::new("img").with_attr("asciiresolution", "high");
        let call = RenderOverrides::default();
        let defaults = RenderOptions::default();

        let first = convert_image(&surface, &mut element, &call, &defaults).unwrap();
        assert!(first.is_some());
        assert!(element.is_converted());

        let second = convert_image(&surface, &mut element, &call, &defaults).unwrap();
        assert!(second.is_none());
    }

    #[test]
    fn test_convert_image_resolution_scales_snapshot() {
        let surface = black_surface(8, 8);
        let mut element = Element::new("img");
        let call = RenderOverrides {
            resolution: Some(Resolution::Medium),
            ..Default::default()
        };
        let grid = convert_image(&surface, &mut element, &call, &RenderOptions::default())
            .unwrap()
            .unwrap();
        // 8x8 at factor 0.5 samples a 4x4 buffer: rows y=0,2
        assert_eq!(grid.rows().len(), 2);
    }

    #[test]
    fn test_call_overrides_beat_attributes() {
        let surface = black_surface(4, 2);
        let mut element = Element::new("img")
            .with_attr("asciichars", " #")
            .with_attr("asciiinvert", "true")
            .with_attr("asciiresolution", "high");
        let call = RenderOverrides {
            invert: Some(false),
            ..Default::default()
        };
        let grid = convert_image(&surface, &mut element, &call, &RenderOptions::default())
            .unwrap()
            .unwrap();
        // Not inverted: black pixels pick the dense glyph
        assert_eq!(grid.rows()[0][0].ch(), '#');
    }

    #[tokio::test]
    async fn test_convert_text_unmapped_tag() {
        let dir = tempfile::tempdir().unwrap();
        let store = FontStore::new(DirFontSource::new(dir.path()));
        let mut element = Element::new("h1").with_text("HI");
        match convert_text(&mut element, &TagMap::new(), &store).await {
            Err(CoreError::UnmappedElement(tag)) => assert_eq!(tag, "h1"),
            other => panic!("expected UnmappedElement, got {other:?}"),
        }
        // A failed conversion leaves the element unconverted
        assert!(!element.is_converted());
    }

    #[tokio::test]
    async fn test_convert_text_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("tiny.flf"), "$ 1 1 4 0 0\nH@\nI@\n").unwrap();
        let store = FontStore::new(DirFontSource::new(dir.path()));
        let mut tags = TagMap::new();
        tags.map("h1", "tiny");

        let mut element = Element::new("h1").with_text("!");
        let first = convert_text(&mut element, &tags, &store).await.unwrap();
        assert_eq!(first.unwrap().to_text(), "I\n");

        let second = convert_text(&mut element, &tags, &store).await.unwrap();
        assert!(second.is_none());
    }
}
