//! Gradient handle geometry to CSS
//!
//! Figma gradients are defined by control handles in normalized node-local
//! coordinates, not by a CSS angle. Linear gradients get their angle from the
//! first two handles, and their stops are re-parameterized onto the CSS
//! gradient line (which always spans the whole box) by extending the handle
//! line to the unit-square boundary. Radial, angular and diamond gradients
//! keep literal stop positions and derive their center from the first handle.

use crate::error::{Result, SimplifyError};
use crate::transform::colors::{convert_color, round2};
use crate::types::{ColorStop, Paint, PaintType, Vector};

/// Direction lengths below this are treated as degenerate
const DEGENERATE_EPSILON: f64 = 1e-6;

/// Build a CSS gradient string from a gradient paint
///
/// Fails when the paint is missing handles or stops, which indicates a
/// malformed upstream response rather than a representable design.
pub fn build_gradient_css(paint: &Paint) -> Result<String> {
    let handles = paint
        .gradient_handle_positions
        .as_ref()
        .filter(|h| h.len() >= 2)
        .ok_or_else(|| {
            SimplifyError::MalformedResponse("gradient paint without handle positions".to_string())
        })?;
    let stops = paint
        .gradient_stops
        .as_ref()
        .filter(|s| !s.is_empty())
        .ok_or_else(|| {
            SimplifyError::MalformedResponse("gradient paint without stops".to_string())
        })?;

    match paint.paint_type {
        PaintType::GradientLinear => Ok(linear_gradient(&handles[0], &handles[1], stops)),
        PaintType::GradientRadial | PaintType::GradientDiamond => {
            Ok(radial_gradient(&handles[0], stops))
        }
        PaintType::GradientAngular => Ok(angular_gradient(&handles[0], &handles[1], stops)),
        other => Err(SimplifyError::MalformedResponse(format!(
            "not a gradient paint: {other:?}"
        ))),
    }
}

/// Linear gradient: CSS angle from the handle direction, stops re-mapped
/// onto the unit-square span of the extended handle line
fn linear_gradient(start: &Vector, end: &Vector, stops: &[ColorStop]) -> String {
    let dx = end.x - start.x;
    let dy = end.y - start.y;

    if (dx * dx + dy * dy).sqrt() < DEGENERATE_EPSILON {
        // Zero-length direction: fall back to 0deg with literal stops
        let stops = format_stops(stops, |p| p * 100.0);
        return format!("linear-gradient(0deg, {stops})");
    }

    let angle = normalize_degrees(dy.atan2(dx).to_degrees() + 90.0);

    // Parameterize the infinite handle line as p(t) = start + t * (end - start)
    // and intersect it with the unit square. The CSS gradient line spans the
    // whole box, so a stop at handle position s lands at
    // (s - t_enter) / (t_exit - t_enter) of the CSS line.
    let stops = match unit_square_span(start, dx, dy) {
        Some((t_enter, t_exit)) if (t_exit - t_enter).abs() > DEGENERATE_EPSILON => {
            format_stops(stops, |p| {
                ((p - t_enter) / (t_exit - t_enter)).clamp(0.0, 1.0) * 100.0
            })
        }
        _ => format_stops(stops, |p| p * 100.0),
    };

    format!("linear-gradient({}deg, {stops})", round2(angle))
}

/// Radial (and diamond) gradient: center from the first handle, literal stops
fn radial_gradient(center: &Vector, stops: &[ColorStop]) -> String {
    let stops = format_stops(stops, |p| p * 100.0);
    format!(
        "radial-gradient(at {}% {}%, {stops})",
        round2(center.x * 100.0),
        round2(center.y * 100.0)
    )
}

/// Angular gradient: conic-gradient with the start angle taken from the
/// second handle relative to the center, literal stops
fn angular_gradient(center: &Vector, direction: &Vector, stops: &[ColorStop]) -> String {
    let angle = normalize_degrees(
        (direction.y - center.y)
            .atan2(direction.x - center.x)
            .to_degrees()
            + 90.0,
    );
    let stops = format_stops(stops, |p| p * 100.0);
    format!(
        "conic-gradient(from {}deg at {}% {}%, {stops})",
        round2(angle),
        round2(center.x * 100.0),
        round2(center.y * 100.0)
    )
}

/// Intersect the line `p(t) = origin + t * (dx, dy)` with the unit square,
/// returning the parameter range where the line is inside the square
fn unit_square_span(origin: &Vector, dx: f64, dy: f64) -> Option<(f64, f64)> {
    let mut t_min = f64::NEG_INFINITY;
    let mut t_max = f64::INFINITY;

    for (o, d) in [(origin.x, dx), (origin.y, dy)] {
        if d.abs() < DEGENERATE_EPSILON {
            // Line parallel to this axis: inside the slab or not at all
            if !(0.0..=1.0).contains(&o) {
                return None;
            }
        } else {
            let t0 = (0.0 - o) / d;
            let t1 = (1.0 - o) / d;
            t_min = t_min.max(t0.min(t1));
            t_max = t_max.min(t0.max(t1));
        }
    }

    (t_min <= t_max).then_some((t_min, t_max))
}

/// Render stops as `"color pos%, color pos%"` with a position mapping
fn format_stops(stops: &[ColorStop], map: impl Fn(f64) -> f64) -> String {
    stops
        .iter()
        .map(|stop| {
            let color = convert_color(&stop.color, 1.0);
            format!("{} {}%", color.css, round2(map(stop.position)))
        })
        .collect::<Vec<_>>()
        .join(", ")
}

fn normalize_degrees(angle: f64) -> f64 {
    angle.rem_euclid(360.0)
}
