//! Banner renderer
//!
//! Renders strings into large block letters using FIGfont-style font
//! definitions: a header line, a run of comment lines, then a glyph
//! line table laid out as consecutive `height`-line blocks per
//! character code starting at 32 (space).

use parking_lot::Mutex;
use std::collections::HashMap;

use crate::error::{CoreError, Result};

/// Highest character code with a glyph entry
const MAX_CODE: u32 = 122;

/// First character code in the glyph line table
const FIRST_CODE: u32 = 32;

/// A parsed banner font.
///
/// Parsed once per font resource and treated as immutable afterwards;
/// the per-character glyph cache fills lazily as codes are looked up.
#[derive(Debug)]
pub struct FontDef {
    name: String,
    height: u32,
    hardblank: char,
    lines: Vec<String>,
    glyphs: Mutex<HashMap<u32, Option<Vec<String>>>>,
}

impl FontDef {
    /// Parse a font definition from its raw text.
    ///
    /// Header fields are whitespace separated: the last character of
    /// the first field is the hardblank marker, the second field the
    /// glyph height, and the sixth field the number of comment lines
    /// between the header and the glyph line table.
    pub fn parse(name: &str, text: &str) -> Result<Self> {
        let mut lines = text.split('\n');
        let header = lines.next().unwrap_or_default();
        let fields: Vec<&str> = header.split_whitespace().collect();

        let hardblank = fields
            .first()
            .and_then(|f| f.chars().last())
            .ok_or_else(|| CoreError::FontLoad {
                name: name.to_string(),
                reason: "empty header line".into(),
            })?;
        let height: u32 = fields
            .get(1)
            .and_then(|f| f.parse().ok())
            .filter(|h| *h > 0)
            .ok_or_else(|| CoreError::FontLoad {
                name: name.to_string(),
                reason: "missing or invalid glyph height".into(),
            })?;
        let comments: usize = fields
            .get(5)
            .and_then(|f| f.parse().ok())
            .ok_or_else(|| CoreError::FontLoad {
                name: name.to_string(),
                reason: "missing comment line count".into(),
            })?;

        let lines: Vec<String> = lines.skip(comments).map(str::to_string).collect();
        tracing::debug!(name, height, comments, lines = lines.len(), "parsed font");

        Ok(Self {
            name: name.to_string(),
            height,
            hardblank,
            lines,
            glyphs: Mutex::new(HashMap::new()),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared lines per glyph
    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn hardblank(&self) -> char {
        self.hardblank
    }

    /// Resolve the glyph rows for a character code.
    ///
    /// Codes outside 32..=122 have no glyph, as do codes whose block
    /// runs past the end of the line table (a malformed or truncated
    /// font). Both resolve to `None` and the caller drops the
    /// character; this is a defined degrade, not an error. Results are
    /// memoized per code.
    pub fn glyph(&self, code: u32) -> Option<Vec<String>> {
        if !(FIRST_CODE..=MAX_CODE).contains(&code) {
            return None;
        }
        let mut cache = self.glyphs.lock();
        if let Some(cached) = cache.get(&code) {
            return cached.clone();
        }
        let resolved = self.parse_glyph(code);
        cache.insert(code, resolved.clone());
        resolved
    }

    fn parse_glyph(&self, code: u32) -> Option<Vec<String>> {
        let start = (code - FIRST_CODE) as usize * self.height as usize;
        let mut rows = Vec::with_capacity(self.height as usize);
        for i in 0..self.height as usize {
            let raw = self.lines.get(start + i)?;
            // End-of-line markers first, then hardblanks: a font whose
            // hardblank is '@' keeps its interior blanks.
            let row = raw
                .trim_end_matches('@')
                .replace(self.hardblank, " ");
            rows.push(row);
        }
        Some(rows)
    }
}

/// A rendered banner: `height` newline-terminated output lines
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextBlock {
    lines: Vec<String>,
}

impl TextBlock {
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// The banner as one newline-terminated string
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        for line in &self.lines {
            out.push_str(line);
            out.push('\n');
        }
        out
    }

    /// The banner wrapped in a `<pre>` fragment
    pub fn to_pre(&self) -> String {
        format!("<pre>{}</pre>", self.to_text())
    }
}

/// Render a string into block letters.
///
/// Characters without a glyph contribute nothing, not even spacing.
/// Output height comes from the first character that resolves a glyph,
/// falling back to the font's declared height when none do.
pub fn render(text: &str, font: &FontDef) -> TextBlock {
    let glyphs: Vec<Vec<String>> = text.chars().filter_map(|ch| font.glyph(ch as u32)).collect();
    let height = glyphs
        .first()
        .map(|g| g.len())
        .unwrap_or(font.height() as usize);

    let mut lines = Vec::with_capacity(height);
    for i in 0..height {
        let mut line = String::new();
        for glyph in &glyphs {
            if let Some(row) = glyph.get(i) {
                line.push_str(row);
            }
        }
        lines.push(line);
    }
    TextBlock { lines }
}
