//! Raster overlay of two compared outlines for visual inspection.
//!
//! Draws outline A in red and outline B in blue, the in-between outlines in
//! black and the correspondence anchors as grey lines, via tiny-skia.

use std::path::Path;

use kurbo::{BezPath, PathEl, Point};

use crate::error::MorphError;

/// Everything drawn into one overlay image. All coordinates are in outline
/// units (Y up).
#[derive(Debug, Clone, Copy, Default)]
pub struct Overlay<'a> {
    pub a: &'a [BezPath],
    pub b: &'a [BezPath],
    pub blended: &'a [BezPath],
    pub anchors: &'a [(Point, Point)],
}

/// Convert a kurbo `BezPath` to a `tiny_skia::Path`, mapping every point
/// through `to_canvas`.
fn kurbo_to_tinyskia(
    bezpath: &BezPath,
    to_canvas: &impl Fn(Point) -> (f32, f32),
) -> Option<tiny_skia::Path> {
    let mut pb = tiny_skia::PathBuilder::new();
    for el in bezpath.elements() {
        match *el {
            PathEl::MoveTo(p) => {
                let (x, y) = to_canvas(p);
                pb.move_to(x, y);
            }
            PathEl::LineTo(p) => {
                let (x, y) = to_canvas(p);
                pb.line_to(x, y);
            }
            PathEl::QuadTo(c, p) => {
                let (cx, cy) = to_canvas(c);
                let (px, py) = to_canvas(p);
                pb.quad_to(cx, cy, px, py);
            }
            PathEl::CurveTo(c1, c2, p) => {
                let (c1x, c1y) = to_canvas(c1);
                let (c2x, c2y) = to_canvas(c2);
                let (px, py) = to_canvas(p);
                pb.cubic_to(c1x, c1y, c2x, c2y, px, py);
            }
            PathEl::ClosePath => pb.close(),
        }
    }
    pb.finish()
}

/// Encode a pixmap to PNG bytes.
fn encode_png(pixmap: &tiny_skia::Pixmap) -> Result<Vec<u8>, png::EncodingError> {
    let mut buf = Vec::new();
    let mut encoder = png::Encoder::new(&mut buf, pixmap.width(), pixmap.height());
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);
    let mut writer = encoder.write_header()?;
    writer.write_image_data(pixmap.data())?;
    writer.finish()?;
    Ok(buf)
}

/// Union of the control-point bounds of every path, as (min, max).
/// Off-curve handles are included so they stay on canvas.
fn control_bounds<'a>(paths: impl IntoIterator<Item = &'a BezPath>) -> Option<(Point, Point)> {
    paths
        .into_iter()
        .flat_map(|path| path.elements().iter())
        .flat_map(control_points)
        .fold(None, |bounds, p| Some(grow(bounds, p)))
}

fn control_points(el: &PathEl) -> Vec<Point> {
    match *el {
        PathEl::QuadTo(a, p) => vec![a, p],
        PathEl::CurveTo(a, b, p) => vec![a, b, p],
        PathEl::MoveTo(p) | PathEl::LineTo(p) => vec![p],
        PathEl::ClosePath => vec![],
    }
}

fn grow(bounds: Option<(Point, Point)>, p: Point) -> (Point, Point) {
    match bounds {
        None => (p, p),
        Some((lo, hi)) => (
            Point::new(lo.x.min(p.x), lo.y.min(p.y)),
            Point::new(hi.x.max(p.x), hi.y.max(p.y)),
        ),
    }
}

fn stroke_all(
    pixmap: &mut tiny_skia::Pixmap,
    paths: &[BezPath],
    color: tiny_skia::Color,
    width: f32,
    to_canvas: &impl Fn(Point) -> (f32, f32),
) {
    let mut paint = tiny_skia::Paint::default();
    paint.set_color(color);
    paint.anti_alias = true;
    let stroke = tiny_skia::Stroke {
        width,
        ..tiny_skia::Stroke::default()
    };
    for path in paths {
        if let Some(sk_path) = kurbo_to_tinyskia(path, to_canvas) {
            pixmap.stroke_path(
                &sk_path,
                &paint,
                &stroke,
                tiny_skia::Transform::identity(),
                None,
            );
        }
    }
}

/// Render an overlay PNG of `size` × `size` pixels.
///
/// The canvas fits the union of the control bounds of A and B with a 10%
/// margin, keeping the aspect ratio, with Y flipped for display.
pub fn render_overlay(overlay: &Overlay<'_>, output_path: &Path, size: u32) -> Result<(), MorphError> {
    let mut pixmap = tiny_skia::Pixmap::new(size, size).ok_or_else(|| {
        MorphError::InvalidConfig(format!("cannot create a {}x{} canvas", size, size))
    })?;
    pixmap.fill(tiny_skia::Color::WHITE);

    let (lo, hi) = control_bounds(overlay.a.iter().chain(overlay.b))
        .unwrap_or((Point::ZERO, Point::new(1.0, 1.0)));
    let w = (hi.x - lo.x).max(1e-6);
    let h = (hi.y - lo.y).max(1e-6);
    let margin = w.max(h) * 0.1;
    let extent = w.max(h) + 2.0 * margin;
    let s = size as f64 / extent;
    // Center the shorter dimension.
    let ox = (extent - w) / 2.0;
    let oy = (extent - h) / 2.0;
    let to_canvas = |p: Point| {
        (
            ((p.x - lo.x + ox) * s) as f32,
            ((hi.y - p.y + oy) * s) as f32,
        )
    };

    let mut anchor_lines = Vec::with_capacity(overlay.anchors.len());
    for &(p, q) in overlay.anchors {
        let mut line = BezPath::new();
        line.move_to(p);
        line.line_to(q);
        anchor_lines.push(line);
    }

    let line_width = (size as f32 / 400.0).max(1.0);
    stroke_all(
        &mut pixmap,
        &anchor_lines,
        tiny_skia::Color::from_rgba8(160, 160, 160, 255),
        line_width * 0.5,
        &to_canvas,
    );
    stroke_all(
        &mut pixmap,
        overlay.a,
        tiny_skia::Color::from_rgba8(255, 0, 0, 255),
        line_width,
        &to_canvas,
    );
    stroke_all(
        &mut pixmap,
        overlay.b,
        tiny_skia::Color::from_rgba8(0, 0, 255, 255),
        line_width,
        &to_canvas,
    );
    stroke_all(
        &mut pixmap,
        overlay.blended,
        tiny_skia::Color::BLACK,
        line_width,
        &to_canvas,
    );

    std::fs::write(output_path, encode_png(&pixmap)?)?;
    tracing::debug!(path = %output_path.display(), size, "overlay written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle(dx: f64) -> BezPath {
        let mut path = BezPath::new();
        path.move_to((dx, 0.0));
        path.line_to((dx + 10.0, 0.0));
        path.curve_to((dx + 12.0, 4.0), (dx + 8.0, 8.0), (dx + 5.0, 10.0));
        path.close_path();
        path
    }

    #[test]
    fn bounds_include_handles() {
        let paths = [triangle(0.0), triangle(2.0)];
        let (lo, hi) = control_bounds(paths.iter()).expect("non-empty");
        assert_eq!(lo, Point::new(0.0, 0.0));
        assert_eq!(hi, Point::new(14.0, 10.0));
        assert!(control_bounds(std::iter::empty()).is_none());
    }

    #[test]
    fn zero_sized_canvas_is_rejected() {
        let paths = [triangle(0.0)];
        let overlay = Overlay {
            a: &paths,
            ..Overlay::default()
        };
        let out = std::env::temp_dir().join("glyphmorph_zero_canvas.png");
        assert!(matches!(
            render_overlay(&overlay, &out, 0),
            Err(MorphError::InvalidConfig(_))
        ));
    }

    #[test]
    fn overlay_writes_png() {
        let a = [triangle(0.0)];
        let b = [triangle(2.0)];
        let blended = [triangle(1.0)];
        let anchors = [(Point::new(0.0, 0.0), Point::new(2.0, 0.0))];
        let overlay = Overlay {
            a: &a,
            b: &b,
            blended: &blended,
            anchors: &anchors,
        };
        let out = std::env::temp_dir().join("glyphmorph_overlay_test.png");
        render_overlay(&overlay, &out, 64).expect("rendered");
        let bytes = std::fs::read(&out).expect("written");
        assert_eq!(&bytes[1..4], b"PNG");
        let _ = std::fs::remove_file(&out);
    }
}
