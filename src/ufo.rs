//! Read and write glyph outlines in UFO sources.

use std::path::Path;

use kurbo::{BezPath, PathEl, Point};
use norad::{Contour, ContourPoint, Glyph, PointType};

use crate::error::MorphError;

/// Outline and metrics of one glyph read from a source.
#[derive(Debug, Clone)]
pub struct SourceGlyph {
    pub contours: Vec<BezPath>,
    pub width: f64,
}

/// Load every contour of `glyph_name` from the default layer of a UFO.
pub fn load_glyph(ufo_path: &Path, glyph_name: &str) -> Result<SourceGlyph, MorphError> {
    let font = norad::Font::load(ufo_path)?;
    let glyph = font
        .default_layer()
        .get_glyph(glyph_name)
        .ok_or_else(|| MorphError::MissingGlyph(glyph_name.to_string()))?;
    Ok(SourceGlyph {
        contours: glyph
            .contours
            .iter()
            .map(from_contour)
            .collect::<Result<_, _>>()?,
        width: glyph.width,
    })
}

/// Convert a closed `norad::Contour` to a `kurbo::BezPath`.
///
/// UFO contours are cyclic: the off-curve points before the first on-curve
/// point belong to the closing segment. Runs of quadratic off-curves get
/// implied on-curve points at their midpoints.
pub fn from_contour(contour: &Contour) -> Result<BezPath, MorphError> {
    let points = &contour.points;
    let Some(start) = points.iter().position(|p| p.typ != PointType::OffCurve) else {
        return Err(MorphError::ContourConvert(
            "contour has no on-curve point".into(),
        ));
    };

    let n = points.len();
    let mut path = BezPath::new();
    path.move_to(to_kurbo(&points[start]));
    let mut offs: Vec<Point> = Vec::new();
    for k in 1..=n {
        let pt = &points[(start + k) % n];
        let p = to_kurbo(pt);
        match pt.typ {
            PointType::OffCurve => offs.push(p),
            PointType::Line => {
                if !offs.is_empty() {
                    return Err(MorphError::ContourConvert(
                        "line point preceded by off-curve points".into(),
                    ));
                }
                path.line_to(p);
            }
            PointType::Curve => match offs[..] {
                [] => path.line_to(p),
                [c] => path.quad_to(c, p),
                [c1, c2] => path.curve_to(c1, c2, p),
                _ => {
                    return Err(MorphError::ContourConvert(format!(
                        "cubic segment with {} off-curve points",
                        offs.len()
                    )))
                }
            },
            PointType::QCurve => match offs.split_last() {
                None => path.line_to(p),
                Some((&last, rest)) => {
                    for (k, &c) in rest.iter().enumerate() {
                        path.quad_to(c, c.midpoint(offs[k + 1]));
                    }
                    path.quad_to(last, p);
                }
            },
            PointType::Move => {
                return Err(MorphError::ContourConvert(
                    "open contours are not supported".into(),
                ))
            }
        }
        if pt.typ != PointType::OffCurve {
            offs.clear();
        }
    }
    path.close_path();
    Ok(path)
}

fn to_kurbo(pt: &ContourPoint) -> Point {
    Point::new(pt.x, pt.y)
}

/// Build a `norad::Glyph` from interpolated contours.
pub fn to_glyph(name: &str, paths: &[BezPath], width: f64) -> Result<Glyph, MorphError> {
    let mut glyph = Glyph::new(name);
    glyph.width = width;
    for path in paths.iter().filter(|p| !p.elements().is_empty()) {
        glyph.contours.push(to_contour(path)?);
    }
    Ok(glyph)
}

/// Insert (or replace) a glyph in the default layer of an existing UFO.
pub fn insert_glyph(ufo_path: &Path, glyph: Glyph) -> Result<(), MorphError> {
    let mut font = norad::Font::load(ufo_path)?;
    font.default_layer_mut().insert_glyph(glyph);
    font.save(ufo_path)?;
    Ok(())
}

/// Convert a closed `kurbo::BezPath` to a `norad::Contour`.
pub fn to_contour(path: &BezPath) -> Result<Contour, MorphError> {
    let elements = path.elements();
    let Some(&PathEl::MoveTo(first)) = elements.first() else {
        return Err(MorphError::InvalidPath("path must start with MoveTo".into()));
    };

    let mut points: Vec<ContourPoint> = Vec::new();
    for el in &elements[1..] {
        match *el {
            PathEl::LineTo(p) => points.push(contour_point(p, PointType::Line)),
            PathEl::QuadTo(a, p) => {
                points.push(contour_point(a, PointType::OffCurve));
                points.push(contour_point(p, PointType::QCurve));
            }
            PathEl::CurveTo(a, b, p) => {
                points.push(contour_point(a, PointType::OffCurve));
                points.push(contour_point(b, PointType::OffCurve));
                points.push(contour_point(p, PointType::Curve));
            }
            PathEl::ClosePath => {}
            PathEl::MoveTo(_) => {
                return Err(MorphError::InvalidPath("unexpected MoveTo mid-path".into()))
            }
        }
    }

    // The start point takes the type of the segment that closes onto it.
    // An explicit closing segment that ends on the start replaces it.
    let closes_on_start = points
        .last()
        .is_some_and(|p| p.typ != PointType::OffCurve && to_kurbo(p) == first);
    let first_type = if closes_on_start {
        points.pop().map_or(PointType::Line, |p| p.typ)
    } else {
        PointType::Line
    };
    points.insert(0, contour_point(first, first_type));

    Ok(Contour::new(points, None, None))
}

fn contour_point(p: Point, typ: PointType) -> ContourPoint {
    ContourPoint::new(p.x, p.y, typ, false, None, None, None)
}
