//! Lookup of sleeves that are already placed, for clash avoidance.

use crate::error::Result;
use crate::math::Point3;

use super::model::ElementId;
use super::spatial_index::{Footprint, Located, SpatialIndex, DEFAULT_CELL_SIZE};

/// A sleeve already present in the model.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlacedSleeve {
    pub id: ElementId,
    pub location: Point3,
}

impl Located for PlacedSleeve {
    fn footprint(&self) -> Footprint {
        Footprint::Point(self.location)
    }
}

/// Point-mode index over placed sleeves.
#[derive(Debug, Clone)]
pub struct SleeveLocator {
    index: SpatialIndex<PlacedSleeve>,
}

impl SleeveLocator {
    /// # Errors
    ///
    /// Returns an error if the grid cannot be built.
    pub fn new(sleeves: Vec<PlacedSleeve>) -> Result<Self> {
        Self::build(sleeves, DEFAULT_CELL_SIZE)
    }

    /// # Errors
    ///
    /// Returns an error if `cell_size` is not positive.
    pub fn build(sleeves: Vec<PlacedSleeve>, cell_size: f64) -> Result<Self> {
        Ok(Self {
            index: SpatialIndex::build(sleeves, cell_size)?,
        })
    }

    /// Broad-phase neighbours of `point`; may contain sleeves farther than
    /// `radius` away.
    #[must_use]
    pub fn sleeves_near(&self, point: &Point3, radius: f64) -> Vec<&PlacedSleeve> {
        self.index.query_radius(point, radius)
    }

    /// Whether some sleeve lies within `radius` of `point` in plan.
    ///
    /// The grid only indexes X and Y, so the distance is measured in plan as
    /// well.
    #[must_use]
    pub fn has_sleeve_within(&self, point: &Point3, radius: f64) -> bool {
        let r2 = radius * radius;
        self.sleeves_near(point, radius).into_iter().any(|s| {
            let dx = s.location.x - point.x;
            let dy = s.location.y - point.y;
            dx * dx + dy * dy <= r2
        })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.index.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn sleeve(id: u64, x: f64, y: f64) -> PlacedSleeve {
        PlacedSleeve {
            id: ElementId(id),
            location: Point3::new(x, y, 3.0),
        }
    }

    #[test]
    fn exact_check_filters_broad_phase() {
        let locator = SleeveLocator::new(vec![sleeve(1, 0.0, 0.0), sleeve(2, 8.0, 0.0)]).unwrap();
        let at = Point3::new(1.0, 0.0, 3.0);

        // Both sit in the same cell, so the broad phase returns both.
        assert_eq!(locator.sleeves_near(&at, 2.0).len(), 2);
        assert!(locator.has_sleeve_within(&at, 2.0));
        assert!(!locator.has_sleeve_within(&Point3::new(4.0, 0.0, 3.0), 2.0));
    }

    #[test]
    fn empty_locator_finds_nothing() {
        let locator = SleeveLocator::new(vec![]).unwrap();
        assert!(locator.is_empty());
        assert!(!locator.has_sleeve_within(&Point3::origin(), 100.0));
    }

    #[test]
    fn far_sleeves_are_not_candidates() {
        let locator =
            SleeveLocator::build(vec![sleeve(1, 0.0, 0.0), sleeve(2, 50.0, 50.0)], 5.0).unwrap();
        let near = locator.sleeves_near(&Point3::new(49.0, 49.0, 0.0), 1.5);
        assert_eq!(near.len(), 1);
        assert_eq!(near[0].id, ElementId(2));
        assert_eq!(locator.len(), 2);
    }
}
