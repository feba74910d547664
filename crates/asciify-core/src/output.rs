//! Output emitters
//!
//! Rendering produces plain artifact values (`Grid`, `TextBlock`);
//! turning them into display text or markup happens here, separately,
//! so the core stays testable without any display tree.

use crate::raster::{Glyph, Grid, RenderOptions};

/// Emit a grid as plain text, one line per sampled row.
///
/// Spaces stay literal spaces; the non-breaking-space substitution only
/// applies to markup output.
pub fn grid_to_text(grid: &Grid) -> String {
    let mut out = String::new();
    for row in grid.rows() {
        for glyph in row {
            out.push(glyph.ch());
        }
        out.push('\n');
    }
    out
}

/// Emit a grid as an HTML fragment.
///
/// Styled glyphs become spans carrying the pixel color inline; spaces
/// become `&nbsp;` so runs of blank cells survive markup collapsing.
/// Each row ends with `<br/>`.
pub fn grid_to_html(grid: &Grid) -> String {
    let mut out = String::new();
    for row in grid.rows() {
        for glyph in row {
            match glyph {
                Glyph::Plain(ch) => push_char(&mut out, *ch),
                Glyph::Styled {
                    ch,
                    fg,
                    bg,
                    opacity,
                } => {
                    out.push_str(&format!(
                        "<span style=\"color:rgb({},{},{});",
                        fg.r, fg.g, fg.b
                    ));
                    if let Some(bg) = bg {
                        out.push_str(&format!(
                            "background-color:rgb({},{},{});",
                            bg.r, bg.g, bg.b
                        ));
                    }
                    if let Some(opacity) = opacity {
                        out.push_str(&format!("opacity:{opacity};"));
                    }
                    out.push_str("\">");
                    push_char(&mut out, *ch);
                    out.push_str("</span>");
                }
            }
        }
        out.push_str("<br/>");
    }
    out
}

/// Wrap an HTML fragment in a block container sized for the render.
///
/// Font size and line height are `2 / resolution * scale` pixels, which
/// keeps the glyph grid at roughly the source image's footprint.
pub fn wrap_html(fragment: &str, options: &RenderOptions) -> String {
    let size = 2.0 / options.resolution.factor() * options.scale;
    format!(
        "<div style=\"display:block;white-space:pre;margin:0;padding:0;\
         font-family:monospace;font-size:{size}px;line-height:{size}px;\
         text-align:left;\">{fragment}</div>"
    )
}

fn push_char(out: &mut String, ch: char) {
    match ch {
        ' ' => out.push_str("&nbsp;"),
        '&' => out.push_str("&amp;"),
        '<' => out.push_str("&lt;"),
        '>' => out.push_str("&gt;"),
        _ => out.push(ch),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::PixelBuffer;
    use crate::ramp::Ramp;
    use crate::raster::{render, Resolution};
    use pretty_assertions::assert_eq;

    fn buffer(pixels: &[[u8; 4]], width: u32, height: u32) -> PixelBuffer {
        let data = pixels.iter().flatten().copied().collect();
        PixelBuffer::from_raw(width, height, data).unwrap()
    }

    fn options(color: bool, block: bool) -> RenderOptions {
        RenderOptions {
            ramp: Ramp::new(" #").unwrap(),
            resolution: Resolution::High,
            color,
            block,
            ..Default::default()
        }
    }

    #[test]
    fn test_text_emission() {
        let black = [0u8, 0, 0, 255];
        let grid = render(&buffer(&[black; 9], 3, 3), &options(false, false)).unwrap();
        assert_eq!(grid_to_text(&grid), "##\n##\n");
    }

    #[test]
    fn test_html_space_becomes_nbsp() {
        let white = [255u8, 255, 255, 255];
        let grid = render(&buffer(&[white; 2], 2, 1), &options(false, false)).unwrap();
        assert_eq!(grid_to_html(&grid), "&nbsp;<br/>");
        assert_eq!(grid_to_text(&grid), " \n");
    }

    #[test]
    fn test_html_styled_span() {
        let red = [200u8, 10, 20, 255];
        let grid = render(&buffer(&[red; 2], 2, 1), &options(true, false)).unwrap();
        assert_eq!(
            grid_to_html(&grid),
            "<span style=\"color:rgb(200,10,20);\">#</span><br/>"
        );
    }

    #[test]
    fn test_html_block_span_paints_background() {
        let red = [200u8, 10, 20, 255];
        let grid = render(&buffer(&[red; 2], 2, 1), &options(true, true)).unwrap();
        let html = grid_to_html(&grid);
        assert!(html.contains("background-color:rgb(200,10,20);"));
    }

    #[test]
    fn test_wrap_html_sizing() {
        let opts = RenderOptions {
            scale: 2.0,
            resolution: Resolution::Medium,
            ..Default::default()
        };
        let wrapped = wrap_html("x", &opts);
        assert!(wrapped.contains("font-size:8px"));
        assert!(wrapped.contains("line-height:8px"));
        assert!(wrapped.ends_with("x</div>"));
    }

    #[test]
    fn test_markup_escapes() {
        let mut out = String::new();
        push_char(&mut out, '<');
        push_char(&mut out, '&');
        push_char(&mut out, '@');
        assert_eq!(out, "&lt;&amp;@");
    }
}
