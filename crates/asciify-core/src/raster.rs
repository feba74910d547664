//! Image-to-ASCII rasterizer
//!
//! Maps a pixel buffer to a grid of glyphs by quantizing per-pixel
//! luminance onto a brightness ramp. The buffer handed to `render` is
//! already at sample resolution (the `Surface` snapshot does the
//! scaling); the rasterizer walks it with a fixed subsampling pattern
//! that compensates for character cell aspect ratio.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::buffer::{PixelBuffer, Rgb};
use crate::error::{CoreError, Result};
use crate::ramp::Ramp;

/// Fraction of source pixel dimensions actually sampled
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Resolution {
    Low,
    Medium,
    High,
    /// Explicit factor in (0, 1]
    #[serde(untagged)]
    Factor(f64),
}

impl Resolution {
    /// Numeric sampling factor
    pub fn factor(self) -> f64 {
        match self {
            Resolution::Low => 0.25,
            Resolution::Medium => 0.5,
            Resolution::High => 1.0,
            Resolution::Factor(f) => f,
        }
    }
}

impl Default for Resolution {
    fn default() -> Self {
        Resolution::Medium
    }
}

impl FromStr for Resolution {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "low" => Ok(Resolution::Low),
            "medium" => Ok(Resolution::Medium),
            "high" => Ok(Resolution::High),
            other => other
                .parse::<f64>()
                .map(Resolution::Factor)
                .map_err(|_| CoreError::Config(format!("unknown resolution '{other}'"))),
        }
    }
}

/// Fully resolved rendering configuration
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Display scale multiplier (styling only, must be positive)
    pub scale: f64,
    /// Sampling resolution
    pub resolution: Resolution,
    /// Brightness ramp, lightest glyph first
    pub ramp: Ramp,
    /// Emit styled glyphs carrying the pixel color
    pub color: bool,
    /// Factor the alpha channel into brightness and opacity
    pub alpha: bool,
    /// With color mode, also paint the glyph background
    pub block: bool,
    /// Reflect the brightness-to-glyph mapping
    pub invert: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            scale: 1.0,
            resolution: Resolution::default(),
            ramp: Ramp::default(),
            color: false,
            alpha: false,
            block: false,
            invert: false,
        }
    }
}

impl RenderOptions {
    /// Reject configurations the rasterizer cannot honor
    pub fn validate(&self) -> Result<()> {
        if !(self.scale > 0.0) {
            return Err(CoreError::Config(format!(
                "scale must be positive, got {}",
                self.scale
            )));
        }
        let factor = self.resolution.factor();
        if !(factor > 0.0 && factor <= 1.0) {
            return Err(CoreError::Config(format!(
                "resolution factor must be in (0, 1], got {factor}"
            )));
        }
        if self.ramp.is_empty() {
            return Err(CoreError::Config("character ramp is empty".into()));
        }
        Ok(())
    }
}

/// Partial options for the layered configuration merge.
///
/// Resolution order is call-site overrides, then element attribute
/// overrides, then global defaults, resolved once at the call boundary.
#[derive(Debug, Clone, Default)]
pub struct RenderOverrides {
    pub scale: Option<f64>,
    pub resolution: Option<Resolution>,
    pub ramp: Option<Ramp>,
    pub color: Option<bool>,
    pub alpha: Option<bool>,
    pub block: Option<bool>,
    pub invert: Option<bool>,
}

impl RenderOverrides {
    /// Merge two override layers, `self` winning
    pub fn over(&self, lower: &RenderOverrides) -> RenderOverrides {
        RenderOverrides {
            scale: self.scale.or(lower.scale),
            resolution: self.resolution.or(lower.resolution),
            ramp: self.ramp.clone().or_else(|| lower.ramp.clone()),
            color: self.color.or(lower.color),
            alpha: self.alpha.or(lower.alpha),
            block: self.block.or(lower.block),
            invert: self.invert.or(lower.invert),
        }
    }

    /// Resolve against global defaults into validated options.
    ///
    /// When no layer names a ramp and color mode ends up active, the
    /// dedicated color ramp is used instead of the monochrome default.
    pub fn resolve(&self, defaults: &RenderOptions) -> Result<RenderOptions> {
        let color = self.color.unwrap_or(defaults.color);
        let ramp = match &self.ramp {
            Some(ramp) => ramp.clone(),
            None if color => Ramp::preset("color").expect("color preset exists"),
            None => defaults.ramp.clone(),
        };
        let options = RenderOptions {
            scale: self.scale.unwrap_or(defaults.scale),
            resolution: self.resolution.unwrap_or(defaults.resolution),
            ramp,
            color,
            alpha: self.alpha.unwrap_or(defaults.alpha),
            block: self.block.unwrap_or(defaults.block),
            invert: self.invert.unwrap_or(defaults.invert),
        };
        options.validate()?;
        Ok(options)
    }
}

/// One rendered character cell
#[derive(Debug, Clone, PartialEq)]
pub enum Glyph {
    /// Bare character
    Plain(char),
    /// Character with color styling
    Styled {
        ch: char,
        fg: Rgb,
        /// Present in block mode, same triple as the foreground
        bg: Option<Rgb>,
        /// Present in alpha mode, alpha/255
        opacity: Option<f32>,
    },
}

impl Glyph {
    /// The character regardless of styling
    pub fn ch(&self) -> char {
        match self {
            Glyph::Plain(ch) => *ch,
            Glyph::Styled { ch, .. } => *ch,
        }
    }
}

/// Immutable grid of rendered glyphs, one row per sampled scanline
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Grid {
    rows: Vec<Vec<Glyph>>,
}

impl Grid {
    pub fn rows(&self) -> &[Vec<Glyph>] {
        &self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Effective sample dimensions for a source size and resolution
pub fn sample_dims(width: u32, height: u32, resolution: Resolution) -> (u32, u32) {
    let factor = resolution.factor();
    (
        (width as f64 * factor).round() as u32,
        (height as f64 * factor).round() as u32,
    )
}

/// Threshold below which a translucent pixel renders blank in
/// non-color alpha mode
const ALPHA_BLANK_THRESHOLD: f64 = 0.3;

/// Render a pixel buffer into a glyph grid.
///
/// Rows are walked in steps of 2 and every column whose index is a
/// multiple of 3 is skipped. This corrects an assumed 3:2 character
/// cell aspect ratio against the 2:2 sampling grid and is a fixed
/// property of the algorithm, not a tunable.
pub fn render(pixels: &PixelBuffer, options: &RenderOptions) -> Result<Grid> {
    options.validate()?;

    let (width, height) = (pixels.width(), pixels.height());
    if width == 0 || height == 0 {
        return Ok(Grid::default());
    }

    let mut rows = Vec::new();
    for y in (0..height).step_by(2) {
        let mut row = Vec::new();
        for x in 0..width {
            if x % 3 == 0 {
                continue;
            }
            let pixel = pixels.pixel(x, y);
            // Fully transparent pixels always land on the blank end of
            // the ramp, regardless of their color channels.
            let index = if pixel.a == 0 {
                0
            } else {
                let mut brightness =
                    0.3 * pixel.r as f64 + 0.59 * pixel.g as f64 + 0.11 * pixel.b as f64;
                if options.alpha {
                    brightness *= pixel.a as f64 / 255.0;
                }
                options.ramp.index_for(brightness / 255.0, options.invert)
            };
            let ch = options.ramp.char_at(index);

            let glyph = if options.color {
                Glyph::Styled {
                    ch,
                    fg: pixel.rgb(),
                    bg: options.block.then(|| pixel.rgb()),
                    opacity: options.alpha.then(|| pixel.a as f32 / 255.0),
                }
            } else if options.alpha && (pixel.a as f64 / 255.0) < ALPHA_BLANK_THRESHOLD {
                // A near-transparent pixel renders blank even if its
                // luminance picked a denser glyph.
                Glyph::Plain(' ')
            } else {
                Glyph::Plain(ch)
            };
            row.push(glyph);
        }
        rows.push(row);
    }

    tracing::debug!(
        width,
        height,
        rows = rows.len(),
        color = options.color,
        "rendered pixel buffer"
    );
    Ok(Grid { rows })
}
