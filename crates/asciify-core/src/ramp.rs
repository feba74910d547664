//! Brightness ramps
//!
//! A ramp is an ordered list of characters representing brightness
//! levels. The canonical ordering throughout this crate is light to
//! dark: index 0 is the lightest (blankest) glyph, the last index the
//! densest. All presets are stored in that order.

use crate::error::{CoreError, Result};

/// Default preset used for monochrome rendering
pub const DEFAULT_VARIANT: &str = "variant1";

/// Preset used when color mode is active and no ramp was given
pub const COLOR: &str = " CGO08@";

const VARIANT1: &str = " .,:;i1tfLCG08@";
const VARIANT2: &str = " .:-=+*#%@";
const VARIANT3: &str = "    .,-=++°oo0ø$$ØØ®®¥¥#";
const VARIANT4: &str = " .,:;=+itIYVXRBMW#";
const ULTRA_WIDE: &str = "       .........,,,,,,:,:::::::iiiiiiiii;;;;;;;;rrrrrrr7777777XXXXXXXXXXXSSSSSSS2222222aaaaaaZaZZZZZZZZZ888888800000000BBBBBBBBWWWWWWWWW@@@@@@@MMMMMMM";
const WIDE: &str = "        ........,,,,,,,:::::::;;;;;;;;rrrrrrrssssiiiiSSS552222XXX3399hhGG&&AAAAHHHBBMMM######@@@@@@@";
const HATCHING: &str = "    ...,,;;---===+++xxxXX##";
const BITS: &str = " #";
const BINARY: &str = " 10";
const GREYSCALE: &str = " ░▒▓█\"";

/// An ordered, non-empty sequence of characters from lightest to darkest
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ramp {
    chars: Vec<char>,
}

impl Ramp {
    /// Build a ramp from a light-to-dark character string
    pub fn new(chars: &str) -> Result<Self> {
        let chars: Vec<char> = chars.chars().collect();
        if chars.is_empty() {
            return Err(CoreError::Config("character ramp is empty".into()));
        }
        Ok(Self { chars })
    }

    /// Look up a named preset
    pub fn preset(name: &str) -> Option<Self> {
        let chars = match name {
            "variant1" => VARIANT1,
            "variant2" => VARIANT2,
            "variant3" => VARIANT3,
            "variant4" => VARIANT4,
            "ultra-wide" => ULTRA_WIDE,
            "wide" => WIDE,
            "hatching" => HATCHING,
            "bits" => BITS,
            "binary" => BINARY,
            "greyscale" => GREYSCALE,
            "color" => COLOR,
            _ => return None,
        };
        // Presets are non-empty literals
        Some(Self::new(chars).unwrap())
    }

    /// Interpret a value as a preset name, falling back to literal
    /// ramp characters
    pub fn parse(value: &str) -> Result<Self> {
        match Self::preset(value) {
            Some(ramp) => Ok(ramp),
            None => Self::new(value),
        }
    }

    /// Names of all built-in presets
    pub fn preset_names() -> &'static [&'static str] {
        &[
            "variant1",
            "variant2",
            "variant3",
            "variant4",
            "ultra-wide",
            "wide",
            "hatching",
            "bits",
            "binary",
            "greyscale",
            "color",
        ]
    }

    /// Number of brightness levels
    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    /// Character at a brightness index
    pub fn char_at(&self, index: usize) -> char {
        self.chars[index.min(self.chars.len() - 1)]
    }

    /// Map a luminance in [0, 1] to a ramp index.
    ///
    /// Brighter pixels select lower indices (lighter glyphs):
    /// `index = (n - 1) - round(lum * (n - 1))`. With `invert` the index
    /// is reflected, so applying it twice round-trips to the identity.
    pub fn index_for(&self, luminance: f64, invert: bool) -> usize {
        let max = self.chars.len() - 1;
        let lum = luminance.clamp(0.0, 1.0);
        let mut index = max - (lum * max as f64).round() as usize;
        if invert {
            index = max - index;
        }
        index
    }
}

impl Default for Ramp {
    fn default() -> Self {
        Self::new(VARIANT1).unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_ramp_rejected() {
        assert!(Ramp::new("").is_err());
    }

    #[test]
    fn test_all_presets_resolve() {
        for name in Ramp::preset_names() {
            let ramp = Ramp::preset(name).unwrap();
            assert!(!ramp.is_empty(), "preset {name} is empty");
        }
        assert!(Ramp::preset("nope").is_none());
    }

    #[test]
    fn test_presets_ordered_light_to_dark() {
        // Every preset must start at its blankest glyph so that fully
        // transparent pixels (index 0) render as emptiness.
        for name in Ramp::preset_names() {
            let ramp = Ramp::preset(name).unwrap();
            assert_eq!(ramp.char_at(0), ' ', "preset {name} index 0 not blank");
        }
    }

    #[test]
    fn test_index_monotonically_non_increasing() {
        let ramp = Ramp::preset("variant1").unwrap();
        let mut prev = ramp.len();
        for step in 0..=100 {
            let lum = step as f64 / 100.0;
            let index = ramp.index_for(lum, false);
            assert!(index < ramp.len());
            assert!(index <= prev, "index rose as luminance increased");
            prev = index;
        }
        assert_eq!(ramp.index_for(0.0, false), ramp.len() - 1);
        assert_eq!(ramp.index_for(1.0, false), 0);
    }

    #[test]
    fn test_invert_round_trip() {
        let ramp = Ramp::preset("variant2").unwrap();
        for step in 0..=20 {
            let lum = step as f64 / 20.0;
            let plain = ramp.index_for(lum, false);
            let inverted = ramp.index_for(lum, true);
            assert_eq!(ramp.len() - 1 - inverted, plain);
        }
    }

    #[test]
    fn test_single_char_ramp() {
        let ramp = Ramp::new("#").unwrap();
        assert_eq!(ramp.index_for(0.0, false), 0);
        assert_eq!(ramp.index_for(1.0, false), 0);
        assert_eq!(ramp.index_for(0.5, true), 0);
    }

    #[test]
    fn test_luminance_clamped() {
        let ramp = Ramp::preset("bits").unwrap();
        assert_eq!(ramp.index_for(-2.0, false), 1);
        assert_eq!(ramp.index_for(7.0, false), 0);
    }
}
