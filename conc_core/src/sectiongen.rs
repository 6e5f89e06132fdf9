//! # Section Generators
//!
//! Helpers that produce outline vertices, rebar layouts and neutral-axis
//! sweep locations for common cases. Outlines are returned as vertex lists
//! suitable for [`SectionInput::vertices`](crate::section::SectionInput).
//!
//! ## Example
//!
//! ```rust
//! use conc_core::sectiongen::{circle, rebars_on_circle};
//!
//! let outline = circle(600.0, 64).unwrap();
//! let bars = rebars_on_circle(240.0, 10, 25.0, [0.0, 0.0]).unwrap();
//! assert_eq!(outline.len(), 64);
//! assert_eq!(bars.len(), 10);
//! ```

use std::f64::consts::PI;

use crate::errors::{CalcError, CalcResult};
use crate::section::Rebar;

/// Sentinel magnitude standing in for a neutral axis at infinity (mm)
pub const DEFAULT_SENTINEL: f64 = 1.0e5;

/// Rectangle with its bottom-left corner at the origin, counter-clockwise
pub fn rectangle(width: f64, height: f64) -> CalcResult<Vec<[f64; 2]>> {
    positive("width", width)?;
    positive("height", height)?;
    Ok(vec![[0.0, 0.0], [width, 0.0], [width, height], [0.0, height]])
}

/// Regular polygon approximating a circle centred at the origin
pub fn circle(diameter: f64, segments: usize) -> CalcResult<Vec<[f64; 2]>> {
    positive("diameter", diameter)?;
    if segments < 3 {
        return Err(CalcError::invalid_input(
            "segments",
            segments.to_string(),
            "A circle needs at least 3 segments",
        ));
    }
    let r = diameter / 2.0;
    Ok(evenly_spaced_angles(segments)
        .map(|theta| [r * theta.cos(), r * theta.sin()])
        .collect())
}

/// `n` bars evenly spaced on a circle, the first one at angle zero
pub fn rebars_on_circle(radius: f64, n: usize, diameter: f64, centre: [f64; 2]) -> CalcResult<Vec<Rebar>> {
    positive("radius", radius)?;
    positive("diameter", diameter)?;
    Ok(evenly_spaced_angles(n)
        .map(|theta| Rebar::new(centre[0] + radius * theta.cos(), centre[1] + radius * theta.sin(), diameter))
        .collect())
}

/// `n` bars evenly spaced from `start` to `end`, both ends included
pub fn rebars_along_line(start: [f64; 2], end: [f64; 2], n: usize, diameter: f64) -> CalcResult<Vec<Rebar>> {
    positive("diameter", diameter)?;
    Ok(match n {
        0 => Vec::new(),
        1 => vec![Rebar::new(start[0], start[1], diameter)],
        _ => linspace(0.0, 1.0, n)
            .map(|t| {
                Rebar::new(
                    start[0] + t * (end[0] - start[0]),
                    start[1] + t * (end[1] - start[1]),
                    diameter,
                )
            })
            .collect(),
    })
}

/// Neutral-axis y-intercepts for a sweep.
///
/// `n` evenly spaced values over `bounds = (lower, upper)`, with the first
/// replaced by `-sentinel` and the last by `+sentinel`. When
/// `traverse_upwards` is false the order is reversed.
pub fn neutral_axis_locations(
    bounds: (f64, f64),
    n: usize,
    traverse_upwards: bool,
    sentinel: f64,
) -> CalcResult<Vec<f64>> {
    if n < 2 {
        return Err(CalcError::invalid_input(
            "n_locations",
            n.to_string(),
            "At least 2 neutral axis locations are needed per direction",
        ));
    }
    let (lower, upper) = bounds;
    if !(lower < upper) {
        return Err(CalcError::invalid_input(
            "bounds",
            format!("({lower}, {upper})"),
            "Lower bound must be below the upper bound",
        ));
    }
    positive("sentinel", sentinel)?;

    let mut locations: Vec<f64> = linspace(lower, upper, n).collect();
    locations[0] = -sentinel;
    locations[n - 1] = sentinel;
    if !traverse_upwards {
        locations.reverse();
    }
    Ok(locations)
}

fn linspace(start: f64, end: f64, n: usize) -> impl Iterator<Item = f64> {
    let step = (end - start) / (n.max(2) - 1) as f64;
    (0..n).map(move |i| if i + 1 == n { end } else { start + step * i as f64 })
}

fn evenly_spaced_angles(n: usize) -> impl Iterator<Item = f64> {
    (0..n).map(move |i| 2.0 * PI * i as f64 / n as f64)
}

fn positive(field: &str, value: f64) -> CalcResult<()> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(CalcError::invalid_input(field, value.to_string(), "Must be a positive number"))
    }
}
