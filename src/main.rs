use clap::{Parser, ValueEnum};
use glyphmorph::{CostModel, MorphConfig, StartKey};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "glyphmorph", about = "Correspondence and interpolation between two drawings of a glyph")]
struct Cli {
    /// First source UFO (outline A)
    font1: PathBuf,

    /// Second source UFO (outline B)
    font2: PathBuf,

    /// Glyph name, looked up in the default layer of both sources
    glyph: String,

    /// Blend factor in [0, 1]; repeat for several in-betweens
    #[arg(short, long = "blend", default_value = "0.5")]
    blends: Vec<f64>,

    /// Lookback window: most segments one side may merge against one segment
    #[arg(short, long, default_value = "6")]
    window: usize,

    /// Resampling tolerance in font units (0 = keep segments as drawn)
    #[arg(short, long, default_value = "20")]
    tolerance: f64,

    /// Segment comparison model
    #[arg(long, value_enum, default_value = "direction")]
    cost: Cost,

    /// Canonical start point of each contour
    #[arg(long, value_enum, default_value = "min-x")]
    start: Start,

    /// Weight of the positional phase penalty (0 = off)
    #[arg(long, default_value_t = std::f64::consts::PI)]
    phase_weight: f64,

    /// UFO to write the interpolated glyph(s) into
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// PNG overlay of A, B, the in-betweens and the anchor lines
    #[arg(short, long)]
    render: Option<PathBuf>,

    /// Overlay size in pixels
    #[arg(long, default_value = "1024")]
    size: u32,
}

#[derive(Clone, Copy, ValueEnum)]
enum Cost {
    Direction,
    Turning,
}

#[derive(Clone, Copy, ValueEnum)]
enum Start {
    MinX,
    MinY,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("glyphmorph=warn".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = MorphConfig {
        window: cli.window,
        tolerance: (cli.tolerance > 0.0).then_some(cli.tolerance),
        cost: match cli.cost {
            Cost::Direction => CostModel::Direction,
            Cost::Turning => CostModel::Turning,
        },
        start: match cli.start {
            Start::MinX => StartKey::MinX,
            Start::MinY => StartKey::MinY,
        },
        phase_weight: cli.phase_weight,
        ..MorphConfig::default()
    };

    // Header
    eprintln!();
    eprintln!("  glyphmorph \u{00b7} {}", cli.glyph);
    eprintln!();

    let a = glyphmorph::ufo::load_glyph(&cli.font1, &cli.glyph)?;
    eprintln!("  Load A      {}  ({} contours)", cli.font1.display(), a.contours.len());
    let b = glyphmorph::ufo::load_glyph(&cli.font2, &cli.glyph)?;
    eprintln!("  Load B      {}  ({} contours)", cli.font2.display(), b.contours.len());

    let result = glyphmorph::morph_glyphs(&a.contours, &b.contours, &config)?;
    for (k, contour) in result.contours.iter().enumerate() {
        eprintln!(
            "  Contour {:<3} {} \u{2194} {} segments  {} steps  cost {:.2}",
            k,
            contour.outline_a().len(),
            contour.outline_b().len(),
            contour.correspondence().steps().len(),
            contour.cost()
        );
    }
    eprintln!("  Total       cost {:.2}", result.cost());

    let mut blended = Vec::new();
    for &t in &cli.blends {
        blended.push((t, result.interpolate(t)?));
    }

    if let Some(output) = &cli.output {
        eprintln!();
        for (t, paths) in &blended {
            let name = if blended.len() == 1 {
                cli.glyph.clone()
            } else {
                format!("{}.{:03}", cli.glyph, (t * 100.0).round() as u32)
            };
            let width = a.width + (b.width - a.width) * t;
            let glyph = glyphmorph::ufo::to_glyph(&name, paths, width)?;
            glyphmorph::ufo::insert_glyph(output, glyph)?;
            eprintln!("  Blend {:.2}  {}", t, name);
        }
        eprintln!("  \u{2713} {}", output.display());
    }

    if let Some(render_path) = &cli.render {
        let in_betweens: Vec<_> = blended.iter().flat_map(|(_, p)| p.iter().cloned()).collect();
        let anchors: Vec<_> = result.contours.iter().flat_map(|m| m.anchors()).collect();
        let overlay = glyphmorph::render::Overlay {
            a: &a.contours,
            b: &b.contours,
            blended: &in_betweens,
            anchors: &anchors,
        };
        glyphmorph::render::render_overlay(&overlay, render_path, cli.size)?;
        eprintln!("  Overlay     {}", render_path.display());
    }

    eprintln!();

    Ok(())
}
