use std::path::PathBuf;
use std::str::FromStr;

use clap::Parser;
use erdraw::diagram::DiagramDocument;
use erdraw::export::{OutputFormat, svg_to_pdf, svg_to_png};
use erdraw::fonts::CosmicTextMeasure;
use erdraw::render::{DiagramRenderer, DiagramStyle};
use erdraw::theme::Theme;
use log::{LevelFilter, info};

/// Render an ER diagram document with crow's foot relationship notation
#[derive(Parser, Debug)]
#[command(name = "erdraw")]
#[command(version)]
#[command(about = "Render ER diagram documents to SVG, PNG or PDF", long_about = None)]
struct Args {
    /// Input diagram JSON (use "-" for stdin)
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Output file path (extension determines format: .svg, .png or .pdf)
    #[arg(short, long, value_name = "OUTPUT")]
    output: PathBuf,

    /// Built-in theme name or path to an Alacritty theme file (YAML or TOML)
    #[arg(short, long, value_name = "THEME")]
    theme: Option<String>,

    /// Padding around the diagram in pixels
    #[arg(long, default_value_t = 20.0)]
    padding: f64,

    /// Raster scale multiplier for PNG output
    #[arg(long, default_value_t = 1.0)]
    png_scale: f32,

    /// Use the declared table sizes instead of measuring table contents
    #[arg(long)]
    no_measure: bool,

    /// Omit the background grid
    #[arg(long)]
    no_grid: bool,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "warn")]
    log_level: String,
}

fn main() -> Result<(), String> {
    let args = Args::parse();

    let log_level = LevelFilter::from_str(&args.log_level).unwrap_or_else(|_| {
        eprintln!("Invalid log level: {}. Using 'warn' instead.", args.log_level);
        LevelFilter::Warn
    });
    env_logger::Builder::from_env(env_logger::Env::default())
        .filter_level(log_level)
        .init();

    let theme = match args.theme.as_deref() {
        Some(spec) => Theme::resolve(spec).map_err(|e| e.to_string())?,
        None => Theme::default(),
    };

    let loaded = if args.input.to_str() == Some("-") {
        let mut buffer = String::new();
        std::io::Read::read_to_string(&mut std::io::stdin(), &mut buffer)
            .map_err(|e| format!("Failed to read from stdin: {}", e))?;
        DiagramDocument::from_json(&buffer)
    } else {
        DiagramDocument::load(&args.input)
    };
    let document =
        loaded.map_err(|e| format!("Failed to load {}: {}", args.input.display(), e))?;

    let format = OutputFormat::from_path(&args.output).map_err(|e| e.to_string())?;

    let diagram = document.to_diagram();
    let renderer = DiagramRenderer::new(DiagramStyle::from_theme(&theme))
        .with_padding(args.padding)
        .with_grid(!args.no_grid);

    let svg = if args.no_measure {
        renderer.render::<CosmicTextMeasure>(&diagram, None)
    } else {
        let mut measure = CosmicTextMeasure::new();
        renderer.render(&diagram, Some(&mut measure))
    };

    match format {
        OutputFormat::Svg => {
            std::fs::write(&args.output, &svg).map_err(|e| format!("Failed to write SVG: {}", e))?;
        }
        OutputFormat::Png => {
            let png_data = svg_to_png(&svg, args.png_scale).map_err(|e| e.to_string())?;
            std::fs::write(&args.output, png_data)
                .map_err(|e| format!("Failed to write PNG: {}", e))?;
        }
        OutputFormat::Pdf => {
            let pdf_data = svg_to_pdf(&svg).map_err(|e| e.to_string())?;
            std::fs::write(&args.output, pdf_data)
                .map_err(|e| format!("Failed to write PDF: {}", e))?;
        }
    }

    info!("{:?} saved to {}", format, args.output.display());
    eprintln!("Saved to: {}", args.output.display());
    Ok(())
}
