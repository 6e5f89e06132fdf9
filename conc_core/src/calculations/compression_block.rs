//! # Compression Block Splitter
//!
//! Reduces a compression zone to the rectangular stress block: the part of
//! the zone within `λ·x` of the extreme compression fibre, where `x` is the
//! depth of the zone measured perpendicular to the neutral axis. The rest of
//! the zone (the remainder) carries no concrete stress.

use geo::Coord;
use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};
use crate::geometry::{self, NeutralAxis, Zone};

/// Stress block and remainder of one compression zone
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompressionBlock {
    /// Part of the zone carrying the uniform design stress
    pub block: Zone,
    /// Part of the zone between the block and the neutral axis
    pub remainder: Zone,
    /// Zone vertex farthest from the neutral axis
    pub extreme_fiber: Coord,
    /// Full compression zone depth `x` (mm)
    pub depth: f64,
    /// The neutral axis moved to depth `λ·x` from the extreme fibre
    pub splitting_axis: NeutralAxis,
}

/// Split `zone` into the stress block and the remainder.
///
/// Fails with [`CalcError::EmptyCompressionZone`] for an empty zone. When the
/// splitting line misses the zone, the whole zone is the block.
pub fn split_block(zone: &Zone, axis: &NeutralAxis, lambda: f64) -> CalcResult<CompressionBlock> {
    if !(lambda > 0.0 && lambda <= 1.0) {
        return Err(CalcError::invalid_input(
            "lambda",
            lambda.to_string(),
            "Stress block factor must be in (0, 1]",
        ));
    }
    if geometry::is_empty_zone(zone) {
        return Err(CalcError::EmptyCompressionZone);
    }
    let (extreme_fiber, depth) = geometry::furthest_vertex(zone, axis).ok_or(CalcError::EmptyCompressionZone)?;

    let foot = axis.project(extreme_fiber);
    let shift = 1.0 - lambda;
    let splitting_axis = axis.translated(
        shift * (extreme_fiber.x - foot.x),
        shift * (extreme_fiber.y - foot.y),
    );

    let (above, below) = geometry::split_by_line(zone, &splitting_axis);
    let (block, remainder) = if geometry::is_empty_zone(&above) || geometry::is_empty_zone(&below) {
        (zone.clone(), geometry::empty_zone())
    } else {
        let farther = |part: &Zone| geometry::zone_centroid(part).map(|c| axis.distance(c)).unwrap_or(0.0);
        if farther(&above) >= farther(&below) {
            (above, below)
        } else {
            (below, above)
        }
    };

    Ok(CompressionBlock {
        block,
        remainder,
        extreme_fiber,
        depth,
        splitting_axis,
    })
}
