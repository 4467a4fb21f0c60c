//! Uniform-grid broad phase over the plan (X/Y) axes.
//!
//! The index is built once over a payload set and then only queried. Each
//! payload lands in every cell its footprint touches; queries return an
//! over-approximation that callers refine with an exact test.

use rustc_hash::FxHashMap;
use tracing::debug;

use crate::error::{OperationError, Result};
use crate::geometry::Aabb;
use crate::math::Point3;

/// Default cell edge length in model units.
pub const DEFAULT_CELL_SIZE: f64 = 10.0;

/// Upper bound on payload-to-cell entries a single build may create.
pub const MAX_CELL_ENTRIES: usize = 1 << 24;

/// The region a payload occupies.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Footprint {
    Box(Aabb),
    Point(Point3),
}

impl Footprint {
    #[must_use]
    pub fn bounds(&self) -> Aabb {
        match self {
            Self::Box(bb) => *bb,
            Self::Point(p) => Aabb::from_point(*p),
        }
    }
}

/// Anything that can be placed in a [`SpatialIndex`].
pub trait Located {
    fn footprint(&self) -> Footprint;
}

impl Located for Aabb {
    fn footprint(&self) -> Footprint {
        Footprint::Box(*self)
    }
}

impl Located for Point3 {
    fn footprint(&self) -> Footprint {
        Footprint::Point(*self)
    }
}

impl<T: Located> Located for &T {
    fn footprint(&self) -> Footprint {
        (**self).footprint()
    }
}

/// Immutable uniform grid keyed by `row * columns + column`.
#[derive(Debug, Clone)]
pub struct SpatialIndex<T> {
    payloads: Vec<T>,
    bounds: Aabb,
    cell_size: f64,
    columns: usize,
    rows: usize,
    cells: FxHashMap<usize, Vec<usize>>,
}

/// Inclusive cell range on one axis.
#[derive(Debug, Clone, Copy)]
struct Span {
    first: usize,
    last: usize,
}

impl Span {
    fn len(self) -> usize {
        self.last - self.first + 1
    }
}

impl<T: Located> SpatialIndex<T> {
    /// Builds an index with the default cell size.
    ///
    /// # Errors
    ///
    /// Returns an error if the grid would have more cells than fit in `usize`.
    pub fn new(payloads: Vec<T>) -> Result<Self> {
        Self::build(payloads, DEFAULT_CELL_SIZE)
    }

    /// Builds an index whose cells are `cell_size` wide on X and Y.
    ///
    /// An empty payload set gives an index with zero-size bounds that never
    /// returns anything.
    ///
    /// # Errors
    ///
    /// Returns `OperationError::InvalidInput` if `cell_size` is not a
    /// positive finite number, the grid dimensions overflow, or the
    /// footprints would occupy more than [`MAX_CELL_ENTRIES`] cell slots.
    pub fn build(payloads: Vec<T>, cell_size: f64) -> Result<Self> {
        if !(cell_size.is_finite() && cell_size > 0.0) {
            return Err(
                OperationError::InvalidInput(format!("cell size must be positive, got {cell_size}"))
                    .into(),
            );
        }

        let footprints: Vec<Aabb> = payloads.iter().map(|p| p.footprint().bounds()).collect();
        let Some(bounds) = footprints.iter().copied().reduce(|acc, bb| acc.union(&bb)) else {
            return Ok(Self {
                payloads,
                bounds: Aabb::from_point(Point3::origin()),
                cell_size,
                columns: 0,
                rows: 0,
                cells: FxHashMap::default(),
            });
        };

        let extent = bounds.extent();
        let columns = axis_cells(extent.x, cell_size)?;
        let rows = axis_cells(extent.y, cell_size)?;
        if columns.checked_mul(rows).is_none() {
            return Err(OperationError::InvalidInput(format!(
                "grid of {columns} x {rows} cells is too large"
            ))
            .into());
        }

        let mut index = Self {
            payloads: Vec::new(),
            bounds,
            cell_size,
            columns,
            rows,
            cells: FxHashMap::default(),
        };

        let spans: Vec<Option<(Span, Span)>> = footprints
            .iter()
            .map(|f| Some((index.column_span(f)?, index.row_span(f)?)))
            .collect();
        let entries = spans.iter().flatten().fold(0usize, |acc, (xs, ys)| {
            acc.saturating_add(xs.len().saturating_mul(ys.len()))
        });
        if entries > MAX_CELL_ENTRIES {
            return Err(OperationError::InvalidInput(format!(
                "footprints cover {entries} cells of size {cell_size}, limit is {MAX_CELL_ENTRIES}"
            ))
            .into());
        }

        for (i, span) in spans.into_iter().enumerate() {
            let Some((xs, ys)) = span else {
                continue;
            };
            for row in ys.first..=ys.last {
                for col in xs.first..=xs.last {
                    index.cells.entry(row * columns + col).or_default().push(i);
                }
            }
        }
        index.payloads = payloads;

        debug!(
            payloads = index.payloads.len(),
            columns,
            rows,
            occupied = index.cells.len(),
            "built spatial index"
        );
        Ok(index)
    }

    /// Payloads whose cells overlap `region`, each at most once, in
    /// insertion order.
    #[must_use]
    pub fn query_box(&self, region: &Aabb) -> Vec<&T> {
        let mut hits = self.cell_hits(region);
        hits.sort_unstable();
        hits.dedup();
        hits.into_iter().map(|i| &self.payloads[i]).collect()
    }

    /// Payloads whose cells overlap the square of half-width `radius` around
    /// `center`. A payload spanning several of those cells is returned once
    /// per cell.
    #[must_use]
    pub fn query_radius(&self, center: &Point3, radius: f64) -> Vec<&T> {
        let region = Aabb::from_point(*center).expanded(radius.abs());
        self.cell_hits(&region)
            .into_iter()
            .map(|i| &self.payloads[i])
            .collect()
    }

    fn cell_hits(&self, region: &Aabb) -> Vec<usize> {
        let (Some(xs), Some(ys)) = (self.column_span(region), self.row_span(region)) else {
            return Vec::new();
        };
        let mut hits = Vec::new();
        for row in ys.first..=ys.last {
            for col in xs.first..=xs.last {
                if let Some(bucket) = self.cells.get(&(row * self.columns + col)) {
                    hits.extend_from_slice(bucket);
                }
            }
        }
        hits
    }

    fn column_span(&self, region: &Aabb) -> Option<Span> {
        self.span(region.min.x, region.max.x, self.bounds.min.x, self.columns)
    }

    fn row_span(&self, region: &Aabb) -> Option<Span> {
        self.span(region.min.y, region.max.y, self.bounds.min.y, self.rows)
    }

    /// Cells covering `[lo, hi]` on an axis starting at `origin`, clamped to
    /// the grid. `None` when the interval misses the grid entirely.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
    fn span(&self, lo: f64, hi: f64, origin: f64, count: usize) -> Option<Span> {
        if count == 0 || lo.is_nan() || hi.is_nan() {
            return None;
        }
        let end = origin + count as f64 * self.cell_size;
        if hi < origin || lo > end {
            return None;
        }
        let last_cell = (count - 1) as f64;
        let cell = |v: f64| ((v - origin) / self.cell_size).floor().clamp(0.0, last_cell) as usize;
        Some(Span {
            first: cell(lo),
            last: cell(hi),
        })
    }
}

impl<T> SpatialIndex<T> {
    /// Union of all payload footprints.
    #[must_use]
    pub fn bounds(&self) -> &Aabb {
        &self.bounds
    }

    #[must_use]
    pub fn cell_size(&self) -> f64 {
        self.cell_size
    }

    #[must_use]
    pub fn columns(&self) -> usize {
        self.columns
    }

    #[must_use]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[must_use]
    pub fn payloads(&self) -> &[T] {
        &self.payloads
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.payloads.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.payloads.is_empty()
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn axis_cells(extent: f64, cell_size: f64) -> Result<usize> {
    let cells = (extent / cell_size).ceil().max(1.0);
    if !cells.is_finite() || cells >= usize::MAX as f64 {
        return Err(OperationError::InvalidInput(format!(
            "extent {extent} needs too many cells of size {cell_size}"
        ))
        .into());
    }
    Ok(cells as usize)
}
