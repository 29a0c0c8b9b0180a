use std::path::Path;

use log::debug;
use resvg::usvg;
use tiny_skia::{Pixmap, Transform};

use crate::error::{ErdrawError, Result};

const LOCAL_FONTS_DIR: &str = "fonts";

/// Output format chosen from the file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Svg,
    Png,
    Pdf,
}

impl OutputFormat {
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .ok_or_else(|| ErdrawError::Export("Output file has no extension".to_string()))?
            .to_ascii_lowercase();

        match ext.as_str() {
            "svg" => Ok(OutputFormat::Svg),
            "png" => Ok(OutputFormat::Png),
            "pdf" => Ok(OutputFormat::Pdf),
            _ => Err(ErdrawError::Export(format!(
                "Unsupported output format: .{} (use .svg, .png or .pdf)",
                ext
            ))),
        }
    }
}

pub fn svg_to_png(svg: &str, scale: f32) -> Result<Vec<u8>> {
    if !scale.is_finite() || scale <= 0.0 {
        return Err(ErdrawError::Export(format!("Invalid --png-scale value: {}", scale)));
    }

    let mut opts = usvg::Options::default();
    {
        let fontdb = opts.fontdb_mut();
        fontdb.load_system_fonts();

        let local_fonts = Path::new(LOCAL_FONTS_DIR);
        if local_fonts.is_dir() {
            fontdb.load_fonts_dir(local_fonts);
        }

        let fallbacks = FontFallbacks::pick(
            fontdb
                .faces()
                .flat_map(|face| face.families.iter().map(|(family, _)| family.as_str())),
        );
        if let Some(family) = &fallbacks.sans {
            fontdb.set_sans_serif_family(family);
        }
        if let Some(family) = &fallbacks.serif {
            fontdb.set_serif_family(family);
        }
        if let Some(family) = &fallbacks.mono {
            fontdb.set_monospace_family(family);
        }
    }

    let tree = usvg::Tree::from_str(svg, &opts)
        .map_err(|e| ErdrawError::Export(format!("Failed to parse SVG: {}", e)))?;

    let svg_width = (tree.size().width() * scale).ceil() as u32;
    let svg_height = (tree.size().height() * scale).ceil() as u32;
    debug!("rasterising {}x{} PNG", svg_width, svg_height);

    let mut pixmap = Pixmap::new(svg_width, svg_height)
        .ok_or_else(|| ErdrawError::Export("Failed to create pixmap".to_string()))?;
    let transform = Transform::from_scale(scale, scale);

    resvg::render(&tree, transform, &mut pixmap.as_mut());

    pixmap
        .encode_png()
        .map_err(|e| ErdrawError::Export(format!("Failed to encode PNG: {}", e)))
}

pub fn svg_to_pdf(svg: &str) -> Result<Vec<u8>> {
    use svg2pdf::usvg::fontdb;

    let mut fontdb = fontdb::Database::new();
    fontdb.load_system_fonts();

    let local_fonts = Path::new(LOCAL_FONTS_DIR);
    if local_fonts.is_dir() {
        fontdb.load_fonts_dir(local_fonts);
    }

    let fallbacks = FontFallbacks::pick(
        fontdb
            .faces()
            .flat_map(|face| face.families.iter().map(|(family, _)| family.as_str())),
    );
    if let Some(family) = &fallbacks.sans {
        fontdb.set_sans_serif_family(family);
    }
    if let Some(family) = &fallbacks.serif {
        fontdb.set_serif_family(family);
    }
    if let Some(family) = &fallbacks.mono {
        fontdb.set_monospace_family(family);
    }

    let mut opts = svg2pdf::usvg::Options::default();
    opts.fontdb = std::sync::Arc::new(fontdb);

    let tree = svg2pdf::usvg::Tree::from_str(svg, &opts)
        .map_err(|e| ErdrawError::Export(format!("Failed to parse SVG: {}", e)))?;

    // Text as paths: viewers without the font still show table names.
    let mut options = svg2pdf::ConversionOptions::default();
    options.embed_text = false;
    let page_options = svg2pdf::PageOptions::default();

    svg2pdf::to_pdf(&tree, options, page_options)
        .map_err(|e| ErdrawError::Export(format!("Failed to convert SVG to PDF: {}", e)))
}

/// Generic family names resolved against what is installed.
#[derive(Debug, Default, PartialEq)]
struct FontFallbacks {
    sans: Option<String>,
    serif: Option<String>,
    mono: Option<String>,
}

impl FontFallbacks {
    fn pick<'a>(families: impl IntoIterator<Item = &'a str>) -> Self {
        let mut sans_family: Option<String> = None;
        let mut serif_family: Option<String> = None;
        let mut mono_family: Option<String> = None;
        let mut first_family: Option<String> = None;

        for family in families {
            if first_family.is_none() {
                first_family = Some(family.to_string());
            }

            let lower = family.to_ascii_lowercase();
            if sans_family.is_none() && lower.contains("sans") {
                sans_family = Some(family.to_string());
            }
            if serif_family.is_none() && lower.contains("serif") {
                serif_family = Some(family.to_string());
            }
            if mono_family.is_none() && (lower.contains("mono") || lower.contains("code")) {
                mono_family = Some(family.to_string());
            }
        }

        Self {
            sans: sans_family.clone().or(first_family.clone()),
            serif: serif_family.or(first_family.clone()),
            mono: mono_family.or(sans_family).or(first_family),
        }
    }
}
