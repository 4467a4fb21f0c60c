//! The full pipeline: collect, index, resolve, intersect.

use tracing::{debug, info, instrument};

use crate::error::{OperationError, Result};
use crate::geometry::{Aabb, Centerline};

use super::capability::BoundarySolid;
use super::collector::{CandidateCollector, StructuralCandidate};
use super::diagnostics::DiagnosticSink;
use super::intersector::{IntersectionRecord, LineSolidIntersector};
use super::model::{Category, ElementId, LinkInstance, ModelDocument};
use super::spatial_index::{SpatialIndex, DEFAULT_CELL_SIZE};

/// Tuning for [`PenetrationDetector`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DetectorConfig {
    /// Edge length of the broad-phase grid cells.
    pub cell_size: f64,
    /// Extra growth of each conduit footprint before the grid query.
    pub search_margin: f64,
    /// Run the exact per-candidate tests on the rayon pool.
    pub parallel: bool,
    /// Structural categories conduits are tested against.
    pub categories: Vec<Category>,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            cell_size: DEFAULT_CELL_SIZE,
            search_margin: 0.0,
            parallel: false,
            categories: Category::STRUCTURAL.to_vec(),
        }
    }
}

impl DetectorConfig {
    #[must_use]
    pub fn with_cell_size(mut self, cell_size: f64) -> Self {
        self.cell_size = cell_size;
        self
    }

    #[must_use]
    pub fn with_search_margin(mut self, search_margin: f64) -> Self {
        self.search_margin = search_margin;
        self
    }

    #[must_use]
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Repeats are dropped; the first occurrence keeps its place.
    #[must_use]
    pub fn with_categories(mut self, categories: Vec<Category>) -> Self {
        self.categories = Category::distinct(categories);
        self
    }

    /// # Errors
    ///
    /// Returns `OperationError::InvalidInput` for a non-positive cell size or
    /// a negative search margin.
    pub fn validate(&self) -> Result<()> {
        if !(self.cell_size.is_finite() && self.cell_size > 0.0) {
            return Err(OperationError::InvalidInput(format!(
                "cell size must be positive, got {}",
                self.cell_size
            ))
            .into());
        }
        if !(self.search_margin.is_finite() && self.search_margin >= 0.0) {
            return Err(OperationError::InvalidInput(format!(
                "search margin must be non-negative, got {}",
                self.search_margin
            ))
            .into());
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ConduitKind {
    CableTray,
    Duct,
    Pipe,
}

/// A linear building-service run.
#[derive(Debug, Clone)]
pub struct Conduit {
    pub id: ElementId,
    pub kind: ConduitKind,
    /// `None` when the host could not produce an axis for the element.
    pub centerline: Option<Centerline>,
    /// Half the cross-section width (or the radius for pipes).
    pub half_width: f64,
}

impl Conduit {
    #[must_use]
    pub fn new(id: ElementId, kind: ConduitKind, centerline: Centerline, half_width: f64) -> Self {
        Self {
            id,
            kind,
            centerline: Some(centerline),
            half_width,
        }
    }

    /// Region swept by the conduit, grown by `margin`.
    #[must_use]
    pub fn footprint(&self, margin: f64) -> Option<Aabb> {
        self.centerline
            .as_ref()
            .map(|c| c.bounding_box().expanded(self.half_width.max(0.0) + margin))
    }
}

/// Records found for one conduit.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ConduitPenetrations {
    pub conduit: ElementId,
    pub records: Vec<IntersectionRecord>,
}

/// Finds where conduits pass through structural elements.
///
/// Candidates are indexed once at construction; every query after that is
/// read-only, so one detector can serve many conduits.
pub struct PenetrationDetector<'a, 's, S> {
    index: SpatialIndex<StructuralCandidate<'a, S>>,
    config: DetectorConfig,
    sink: &'s dyn DiagnosticSink,
}

impl<'a, 's, S: BoundarySolid + Sync> PenetrationDetector<'a, 's, S> {
    /// Indexes an already collected candidate set.
    ///
    /// # Errors
    ///
    /// Returns an error if `config` is invalid.
    #[instrument(skip_all, fields(candidates = candidates.len()))]
    pub fn new(
        candidates: Vec<StructuralCandidate<'a, S>>,
        config: DetectorConfig,
        sink: &'s dyn DiagnosticSink,
    ) -> Result<Self> {
        config.validate()?;
        let index = SpatialIndex::build(candidates, config.cell_size)?;
        info!(
            candidates = index.len(),
            columns = index.columns(),
            rows = index.rows(),
            "penetration detector ready"
        );
        Ok(Self {
            index,
            config,
            sink,
        })
    }

    /// Collects candidates from `host` and its visible `links`, then indexes
    /// them.
    ///
    /// # Errors
    ///
    /// Returns an error if `config` is invalid.
    pub fn from_models<D>(
        host: &'a D,
        links: &'a [LinkInstance<'a, D>],
        config: DetectorConfig,
        sink: &'s dyn DiagnosticSink,
    ) -> Result<Self>
    where
        D: ModelDocument<Solid = S>,
    {
        config.validate()?;
        let candidates = CandidateCollector::new(host, links)
            .with_categories(config.categories.clone())
            .collect(sink);
        Self::new(candidates, config, sink)
    }

    #[must_use]
    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    #[must_use]
    pub fn candidates(&self) -> &[StructuralCandidate<'a, S>] {
        self.index.payloads()
    }

    /// Broad-phase candidates for `conduit`, in collection order.
    #[must_use]
    pub fn candidates_near(&self, conduit: &Conduit) -> Vec<&StructuralCandidate<'a, S>> {
        conduit
            .footprint(self.config.search_margin)
            .map(|region| self.index.query_box(&region))
            .unwrap_or_default()
    }

    /// Every structural element `conduit` passes through.
    #[instrument(skip_all, fields(conduit = %conduit.id, kind = ?conduit.kind))]
    pub fn detect_conduit(&self, conduit: &Conduit) -> ConduitPenetrations {
        let near = self.candidates_near(conduit);
        debug!(near = near.len(), "broad phase done");

        let intersector = LineSolidIntersector::new(self.sink);
        let centerline = conduit.centerline.as_ref();
        let records = if self.config.parallel {
            intersector.par_intersect_candidates(centerline, &near)
        } else {
            intersector.intersect_candidates(centerline, &near)
        };

        ConduitPenetrations {
            conduit: conduit.id,
            records,
        }
    }

    /// Runs [`detect_conduit`](Self::detect_conduit) for each conduit, in
    /// order.
    #[instrument(skip_all, fields(conduits = conduits.len()))]
    pub fn detect(&self, conduits: &[Conduit]) -> Vec<ConduitPenetrations> {
        let results: Vec<_> = conduits.iter().map(|c| self.detect_conduit(c)).collect();
        info!(
            records = results.iter().map(|r| r.records.len()).sum::<usize>(),
            "penetration detection finished"
        );
        results
    }
}
