//! # Asciify Core
//!
//! The rendering engine for asciify.
//!
//! This crate provides:
//! - Image-to-ASCII rasterization via brightness ramps
//! - Banner rendering with FIGfont-style font definitions
//! - An async font store with single-flight fetching
//! - Element conversion glue with layered option resolution
//! - Plain-text and HTML emitters for the rendered artifacts
//!
//! ```text
//!  _  _  ____  __    __     __
//! / )( \(  __)(  )  (  )   /  \
//! ) __ ( ) _) / (_/\/ (_/\(  O )
//! \_)(_/(____)\____/\____/ \__/
//! ```

pub mod banner;
pub mod buffer;
pub mod element;
pub mod error;
pub mod fontstore;
pub mod output;
pub mod ramp;
pub mod raster;

pub use banner::{FontDef, TextBlock};
pub use buffer::{ImageSurface, PixelBuffer, Rgb, Rgba, Surface};
pub use element::{convert_image, convert_text, Element, TagMap};
pub use error::{CoreError, Result};
pub use fontstore::{DirFontSource, FontSource, FontStore};
pub use output::{grid_to_html, grid_to_text, wrap_html};
pub use ramp::Ramp;
pub use raster::{render, sample_dims, Glyph, Grid, RenderOptions, RenderOverrides, Resolution};

/// Core version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_set() {
        assert!(!VERSION.is_empty());
    }
}
