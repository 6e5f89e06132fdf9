//! # Zone Classifier
//!
//! Partitions a section into its compression and tension zones for one
//! neutral axis position.
//!
//! A point is "above" the axis when `slope·x + b − y ≤ 0`, so points on the
//! line count as above. [`CompressionSide`] says which of the two sides is
//! in compression.
//!
//! ## Example
//!
//! ```rust
//! use conc_core::calculations::zones::{classify, CompressionSide};
//! use conc_core::geometry::{zone_area, zone_from_polygon, NeutralAxis};
//! use geo::polygon;
//!
//! let shape = zone_from_polygon(polygon![
//!     (x: 0.0, y: 0.0), (x: 250.0, y: 0.0), (x: 250.0, y: 500.0), (x: 0.0, y: 500.0),
//! ]);
//! let zones = classify(&shape, &NeutralAxis::horizontal(300.0), CompressionSide::Above).unwrap();
//! assert!((zone_area(&zones.compression) - 50_000.0).abs() < 1e-6);
//! ```

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};
use crate::geometry::{self, NeutralAxis, Zone};

/// Side of the neutral axis that is in compression
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompressionSide {
    Above,
    Below,
}

impl CompressionSide {
    /// Sweep order used by the diagram driver
    pub const ALL: [CompressionSide; 2] = [CompressionSide::Above, CompressionSide::Below];

    pub fn display_name(&self) -> &'static str {
        match self {
            CompressionSide::Above => "above",
            CompressionSide::Below => "below",
        }
    }

    pub fn opposite(&self) -> Self {
        match self {
            CompressionSide::Above => CompressionSide::Below,
            CompressionSide::Below => CompressionSide::Above,
        }
    }

    /// Whether a point classified as above/below lies on the compression side
    pub fn is_compression(&self, above: bool) -> bool {
        above == (*self == CompressionSide::Above)
    }
}

impl std::fmt::Display for CompressionSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Compression and tension zone for one neutral axis. Either may be empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Zones {
    pub compression: Zone,
    pub tension: Zone,
}

impl Zones {
    fn assign(above: Zone, below: Zone, side: CompressionSide) -> Self {
        match side {
            CompressionSide::Above => Zones {
                compression: above,
                tension: below,
            },
            CompressionSide::Below => Zones {
                compression: below,
                tension: above,
            },
        }
    }

    pub fn compression_is_empty(&self) -> bool {
        geometry::is_empty_zone(&self.compression)
    }

    pub fn tension_is_empty(&self) -> bool {
        geometry::is_empty_zone(&self.tension)
    }
}

/// Split `shape` into compression and tension zones.
///
/// When the axis does not cross the shape, or only cuts off a piece below
/// the area tolerance, the shape's centroid decides which zone receives the
/// whole shape. Otherwise the shape is split and each
/// side's centroid must land on its own side of the axis; a split that
/// violates this is numerically degenerate and reported as
/// [`CalcError::ClassificationFailed`].
pub fn classify(shape: &Zone, axis: &NeutralAxis, side: CompressionSide) -> CalcResult<Zones> {
    if geometry::is_empty_zone(shape) {
        return Err(CalcError::invalid_input("shape", "empty", "Cannot classify an empty section"));
    }

    if !geometry::crosses(shape, axis) {
        return whole_shape(shape, axis, side);
    }

    let (above, below) = geometry::split_by_line(shape, axis);
    if geometry::is_empty_zone(&above) || geometry::is_empty_zone(&below) {
        // Only a sliver lay past the line
        return whole_shape(shape, axis, side);
    }
    let above_centroid = geometry::zone_centroid(&above)
        .ok_or_else(|| CalcError::classification_failed(axis.to_string(), "split left nothing above the axis"))?;
    let below_centroid = geometry::zone_centroid(&below)
        .ok_or_else(|| CalcError::classification_failed(axis.to_string(), "split left nothing below the axis"))?;

    if !axis.is_above(above_centroid) || axis.is_above(below_centroid) {
        return Err(CalcError::classification_failed(
            axis.to_string(),
            "both parts of the split evaluate to the same side",
        ));
    }

    tracing::trace!(
        neutral_axis = %axis,
        above_area = geometry::zone_area(&above),
        below_area = geometry::zone_area(&below),
        "section split"
    );

    Ok(Zones::assign(above, below, side))
}

/// Whole shape to the side of the axis holding its centroid
fn whole_shape(shape: &Zone, axis: &NeutralAxis, side: CompressionSide) -> CalcResult<Zones> {
    let centroid = geometry::zone_centroid(shape)
        .ok_or_else(|| CalcError::classification_failed(axis.to_string(), "section has no centroid"))?;
    let whole = shape.clone();
    Ok(if axis.is_above(centroid) {
        Zones::assign(whole, geometry::empty_zone(), side)
    } else {
        Zones::assign(geometry::empty_zone(), whole, side)
    })
}
