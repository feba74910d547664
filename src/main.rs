//! asciify - ASCII-art conversion for images and banner text

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use asciify_core::{
    convert_image, convert_text, grid_to_html, grid_to_text, wrap_html, DirFontSource, Element,
    FontStore, Ramp, RenderOverrides, Resolution,
};

/// asciify - turn images and text into ASCII art
#[derive(Parser, Debug)]
#[command(name = "asciify")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Config file path
    #[arg(short = 'c', long)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long)]
    debug: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Convert an image file to ASCII art
    Image {
        /// Path to the image file
        path: PathBuf,

        /// Display scale multiplier
        #[arg(long)]
        scale: Option<f64>,

        /// Sampling resolution: low, medium, high or a factor in (0, 1]
        #[arg(short = 'r', long)]
        resolution: Option<Resolution>,

        /// Ramp preset name or literal light-to-dark characters
        #[arg(long)]
        characters: Option<String>,

        /// Emit color spans (implies HTML output)
        #[arg(long)]
        color: bool,

        /// Factor the alpha channel into brightness
        #[arg(long)]
        alpha: bool,

        /// Paint glyph backgrounds in color mode
        #[arg(long)]
        block: bool,

        /// Reflect the brightness mapping
        #[arg(long)]
        invert: bool,

        /// Emit an HTML fragment instead of plain text
        #[arg(long)]
        html: bool,
    },
    /// Render text as a banner with a FIGfont-style font
    Banner {
        /// The text to render
        text: String,

        /// Font name, resolved as <dir>/<name>.flf
        #[arg(short = 'f', long)]
        font: String,

        /// Directory holding font files (defaults to the configured one)
        #[arg(long)]
        font_dir: Option<PathBuf>,

        /// Emit a <pre> fragment instead of plain text
        #[arg(long)]
        html: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Set up logging
    let log_level = if args.debug { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| format!("asciify={}", log_level)),
        ))
        .init();

    tracing::debug!("asciify v{}", env!("CARGO_PKG_VERSION"));

    let config = match &args.config {
        Some(path) => asciify_config::Config::load_from(path)?,
        None => asciify_config::Config::load()?,
    };

    match args.command {
        Command::Image {
            path,
            scale,
            resolution,
            characters,
            color,
            alpha,
            block,
            invert,
            html,
        } => {
            let defaults = config.render.to_options()?;
            let overrides = RenderOverrides {
                scale,
                resolution,
                ramp: characters.as_deref().map(Ramp::parse).transpose()?,
                color: color.then_some(true),
                alpha: alpha.then_some(true),
                block: block.then_some(true),
                invert: invert.then_some(true),
            };

            let surface = asciify_core::ImageSurface::open(&path)
                .with_context(|| format!("failed to open image {}", path.display()))?;
            let mut element = Element::new("img");
            let grid = convert_image(&surface, &mut element, &overrides, &defaults)?
                .expect("fresh element converts");

            if html || color {
                let options = overrides.resolve(&defaults)?;
                println!("{}", wrap_html(&grid_to_html(&grid), &options));
            } else {
                print!("{}", grid_to_text(&grid));
            }
        }
        Command::Banner {
            text,
            font,
            font_dir,
            html,
        } => {
            let dir = font_dir.unwrap_or_else(|| config.fonts.dir.clone());
            let store =
                FontStore::with_timeout(DirFontSource::new(dir), config.fonts.fetch_timeout());

            // Tags mapped in config route through convert_text; a plain
            // font name loads directly.
            let tags = config.fonts.tag_map();
            let block = match tags.font_for(&font) {
                Some(_) => {
                    let mut element = Element::new(&font).with_text(&text);
                    convert_text(&mut element, &tags, &store)
                        .await?
                        .expect("fresh element converts")
                }
                None => store.write(&text, &font).await?,
            };

            if html {
                println!("{}", block.to_pre());
            } else {
                print!("{}", block.to_text());
            }
        }
    }

    Ok(())
}
