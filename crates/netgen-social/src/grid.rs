//! Occupancy grid used while placing agents, with radius queries.
//!
//! A cell holds `0` when empty and the occupant's reach otherwise. The dense
//! backend stores every cell; above [`MAX_DENSE_CELLS`], or when that
//! allocation is refused, the generator falls back to a hash map holding only
//! occupied cells.

use std::collections::HashMap;
use std::ops::Range;

use netgen_core::errors::{ErrorInfo, NetgenError};
use netgen_core::rng::RngHandle;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Largest grid, in cells, stored densely (1 GiB of `u32` cells).
///
/// Zero-filling commits every page, so an overcommitted reservation that
/// succeeds could still exhaust memory once written.
pub const MAX_DENSE_CELLS: usize = 1 << 28;

/// Whether the far edge of a reach bounding box is scanned.
///
/// The box spans `max(0, c - reach)` to `min(dim - 1, c + reach)` on each axis.
/// `Inclusive` scans that upper bound; `HalfOpen` stops one cell short of it,
/// which is how the original generator iterated and which misses agents sitting
/// exactly `reach` cells to the right or below (and the last row and column of
/// the grid).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NeighborhoodBounds {
    /// Scan `[low, high]`.
    #[default]
    Inclusive,
    /// Scan `[low, high)`.
    HalfOpen,
}

impl NeighborhoodBounds {
    fn axis(self, center: usize, reach: usize, dim: usize) -> Range<usize> {
        let low = center.saturating_sub(reach);
        let high = center.saturating_add(reach).min(dim - 1);
        match self {
            NeighborhoodBounds::Inclusive => low..high + 1,
            NeighborhoodBounds::HalfOpen => low..high,
        }
    }
}

/// Storage contract for the placement grid.
pub trait PlacementGrid {
    /// Returns `(width, height)`.
    fn dims(&self) -> (usize, usize);

    /// Returns the value of a cell; `0` means empty.
    fn get(&self, x: usize, y: usize) -> u32;

    /// Stores `value` in a cell.
    fn set(&mut self, x: usize, y: usize, value: u32);

    /// Number of occupied cells.
    fn occupied(&self) -> usize;

    /// Occupied cells within the given window, in row-major order.
    fn occupied_in(&self, xs: Range<usize>, ys: Range<usize>) -> Vec<(usize, usize)> {
        let mut cells = Vec::new();
        for i in xs {
            for j in ys.clone() {
                if self.get(i, j) > 0 {
                    cells.push((i, j));
                }
            }
        }
        cells
    }

    /// Total number of cells, saturating at `usize::MAX`.
    fn cell_count(&self) -> usize {
        let (width, height) = self.dims();
        width.saturating_mul(height)
    }
}

/// Grid backed by one contiguous allocation.
#[derive(Debug, Clone)]
pub struct DenseGrid {
    width: usize,
    height: usize,
    cells: Vec<u32>,
    occupied: usize,
}

impl DenseGrid {
    /// Allocates an empty grid, reporting a refused allocation as an error.
    ///
    /// Grids above [`MAX_DENSE_CELLS`] are refused without allocating.
    pub fn try_new(width: usize, height: usize) -> Result<Self, NetgenError> {
        let len = width
            .checked_mul(height)
            .filter(|&len| len <= MAX_DENSE_CELLS)
            .ok_or_else(|| too_large(width, height))?;
        let mut cells = Vec::new();
        cells
            .try_reserve_exact(len)
            .map_err(|_| too_large(width, height))?;
        cells.resize(len, 0);
        Ok(Self {
            width,
            height,
            cells,
            occupied: 0,
        })
    }
}

fn too_large(width: usize, height: usize) -> NetgenError {
    NetgenError::Grid(
        ErrorInfo::new("grid-too-large", "grid cannot be stored densely")
            .with_context("width", width)
            .with_context("height", height)
            .with_context("max_cells", MAX_DENSE_CELLS),
    )
}

impl PlacementGrid for DenseGrid {
    fn dims(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    fn get(&self, x: usize, y: usize) -> u32 {
        self.cells[x * self.height + y]
    }

    fn set(&mut self, x: usize, y: usize, value: u32) {
        let cell = &mut self.cells[x * self.height + y];
        match (*cell > 0, value > 0) {
            (false, true) => self.occupied += 1,
            (true, false) => self.occupied -= 1,
            _ => {}
        }
        *cell = value;
    }

    fn occupied(&self) -> usize {
        self.occupied
    }
}

/// Grid storing only occupied cells.
#[derive(Debug, Clone, Default)]
pub struct SparseGrid {
    width: usize,
    height: usize,
    cells: HashMap<(usize, usize), u32>,
}

impl SparseGrid {
    /// Creates an empty sparse grid.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: HashMap::new(),
        }
    }
}

impl PlacementGrid for SparseGrid {
    fn dims(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    fn get(&self, x: usize, y: usize) -> u32 {
        self.cells.get(&(x, y)).copied().unwrap_or(0)
    }

    fn set(&mut self, x: usize, y: usize, value: u32) {
        if value == 0 {
            self.cells.remove(&(x, y));
        } else {
            self.cells.insert((x, y), value);
        }
    }

    fn occupied(&self) -> usize {
        self.cells.len()
    }

    fn occupied_in(&self, xs: Range<usize>, ys: Range<usize>) -> Vec<(usize, usize)> {
        let window = xs.len().saturating_mul(ys.len());
        if window <= self.cells.len() {
            let mut cells = Vec::new();
            for i in xs {
                for j in ys.clone() {
                    if self.cells.contains_key(&(i, j)) {
                        cells.push((i, j));
                    }
                }
            }
            return cells;
        }
        let mut cells: Vec<(usize, usize)> = self
            .cells
            .keys()
            .filter(|(i, j)| xs.contains(i) && ys.contains(j))
            .copied()
            .collect();
        cells.sort_unstable();
        cells
    }
}

/// Grid storage chosen at allocation time.
#[derive(Debug, Clone)]
pub enum GridBackend {
    /// Contiguous storage.
    Dense(DenseGrid),
    /// Hash map fallback.
    Sparse(SparseGrid),
}

impl GridBackend {
    /// Allocates a dense grid, falling back to the sparse representation when
    /// the grid exceeds [`MAX_DENSE_CELLS`] or the dense allocation is refused.
    pub fn allocate(width: usize, height: usize) -> Self {
        match DenseGrid::try_new(width, height) {
            Ok(grid) => GridBackend::Dense(grid),
            Err(err) => {
                warn!(width, height, error = %err, "switching to a sparse grid");
                GridBackend::Sparse(SparseGrid::new(width, height))
            }
        }
    }

    /// Returns whether the sparse fallback is in use.
    pub fn is_sparse(&self) -> bool {
        matches!(self, GridBackend::Sparse(_))
    }

    fn inner(&self) -> &dyn PlacementGrid {
        match self {
            GridBackend::Dense(grid) => grid as &dyn PlacementGrid,
            GridBackend::Sparse(grid) => grid,
        }
    }

    fn inner_mut(&mut self) -> &mut dyn PlacementGrid {
        match self {
            GridBackend::Dense(grid) => grid as &mut dyn PlacementGrid,
            GridBackend::Sparse(grid) => grid,
        }
    }
}

impl PlacementGrid for GridBackend {
    fn dims(&self) -> (usize, usize) {
        self.inner().dims()
    }

    fn get(&self, x: usize, y: usize) -> u32 {
        self.inner().get(x, y)
    }

    fn set(&mut self, x: usize, y: usize, value: u32) {
        self.inner_mut().set(x, y, value)
    }

    fn occupied(&self) -> usize {
        self.inner().occupied()
    }

    fn occupied_in(&self, xs: Range<usize>, ys: Range<usize>) -> Vec<(usize, usize)> {
        self.inner().occupied_in(xs, ys)
    }
}

/// Picks a uniformly random empty cell by rejection sampling.
///
/// At most `max_draws` cells are drawn; a grid that is full (or so dense that
/// every draw hit an occupant) yields `grid-saturated`.
pub fn choose_empty_spot<G: PlacementGrid + ?Sized>(
    grid: &G,
    rng: &mut RngHandle,
    max_draws: usize,
) -> Result<(usize, usize), NetgenError> {
    let (width, height) = grid.dims();
    if grid.occupied() < grid.cell_count() {
        for _ in 0..max_draws {
            let x = rng.gen_range(0..width);
            let y = rng.gen_range(0..height);
            if grid.get(x, y) == 0 {
                return Ok((x, y));
            }
        }
    }
    Err(NetgenError::Grid(
        ErrorInfo::new("grid-saturated", "no empty cell found for the next agent")
            .with_context("draws", max_draws)
            .with_context("occupied", grid.occupied())
            .with_context("cells", grid.cell_count())
            .with_hint("lower the agent density or enlarge the grid"),
    ))
}

/// Returns the occupied cells within the reach of the agent at `(x, y)`.
///
/// The reach is the value stored in the agent's own cell and distance is
/// Euclidean; the agent itself is never returned.
pub fn search_for_neighbors<G: PlacementGrid + ?Sized>(
    grid: &G,
    x: usize,
    y: usize,
    bounds: NeighborhoodBounds,
) -> Vec<(usize, usize)> {
    let reach = grid.get(x, y) as usize;
    if reach == 0 {
        return Vec::new();
    }
    let (width, height) = grid.dims();
    let reach_sq = (reach * reach) as u64;
    grid.occupied_in(bounds.axis(x, reach, width), bounds.axis(y, reach, height))
        .into_iter()
        .filter(|&(i, j)| {
            let dx = x.abs_diff(i) as u64;
            let dy = y.abs_diff(j) as u64;
            (i, j) != (x, y) && dx * dx + dy * dy <= reach_sq
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid_with(width: usize, height: usize, cells: &[(usize, usize, u32)]) -> DenseGrid {
        let mut grid = DenseGrid::try_new(width, height).unwrap();
        for &(x, y, value) in cells {
            grid.set(x, y, value);
        }
        grid
    }

    #[test]
    fn inclusive_bounds_reach_the_far_edge() {
        let grid = grid_with(10, 10, &[(4, 4, 2), (6, 4, 1), (4, 6, 1), (2, 4, 1)]);
        let mut found = search_for_neighbors(&grid, 4, 4, NeighborhoodBounds::Inclusive);
        found.sort();
        assert_eq!(found, vec![(2, 4), (4, 6), (6, 4)]);
    }

    #[test]
    fn half_open_bounds_skip_the_far_edge() {
        let grid = grid_with(10, 10, &[(4, 4, 2), (6, 4, 1), (4, 6, 1), (2, 4, 1)]);
        let found = search_for_neighbors(&grid, 4, 4, NeighborhoodBounds::HalfOpen);
        assert_eq!(found, vec![(2, 4)]);
    }

    #[test]
    fn distance_is_euclidean() {
        // (6, 6) is inside the box but sqrt(8) > 2
        let grid = grid_with(10, 10, &[(4, 4, 2), (6, 6, 1), (5, 5, 1)]);
        let found = search_for_neighbors(&grid, 4, 4, NeighborhoodBounds::Inclusive);
        assert_eq!(found, vec![(5, 5)]);
    }

    #[test]
    fn windows_are_clamped_to_the_grid() {
        let grid = grid_with(3, 3, &[(0, 0, 5), (2, 2, 1)]);
        let found = search_for_neighbors(&grid, 0, 0, NeighborhoodBounds::Inclusive);
        assert_eq!(found, vec![(2, 2)]);
        let found = search_for_neighbors(&grid, 0, 0, NeighborhoodBounds::HalfOpen);
        assert!(found.is_empty());
    }

    #[test]
    fn sparse_and_dense_agree() {
        let cells = [(1, 1, 3), (2, 3, 1), (4, 1, 2), (0, 0, 1), (3, 3, 2)];
        let dense = grid_with(6, 6, &cells);
        let mut sparse = SparseGrid::new(6, 6);
        for &(x, y, value) in &cells {
            sparse.set(x, y, value);
        }
        assert_eq!(sparse.occupied(), dense.occupied());
        for bounds in [NeighborhoodBounds::Inclusive, NeighborhoodBounds::HalfOpen] {
            for &(x, y, _) in &cells {
                assert_eq!(
                    search_for_neighbors(&sparse, x, y, bounds),
                    search_for_neighbors(&dense, x, y, bounds)
                );
            }
        }
    }

    #[test]
    fn full_grid_is_saturated() {
        let grid = grid_with(2, 1, &[(0, 0, 1), (1, 0, 1)]);
        let mut rng = RngHandle::from_seed(3);
        let err = choose_empty_spot(&grid, &mut rng, 1_000).unwrap_err();
        assert_eq!(err.code(), "grid-saturated");
    }

    #[test]
    fn empty_spot_is_found_on_a_nearly_full_grid() {
        let grid = grid_with(2, 2, &[(0, 0, 1), (0, 1, 1), (1, 0, 1)]);
        let mut rng = RngHandle::from_seed(11);
        assert_eq!(choose_empty_spot(&grid, &mut rng, 10_000).unwrap(), (1, 1));
    }

    #[test]
    fn impossible_dense_allocation_reports_an_error() {
        let err = DenseGrid::try_new(usize::MAX, 2).unwrap_err();
        assert_eq!(err.code(), "grid-too-large");
        assert!(GridBackend::allocate(usize::MAX, 2).is_sparse());
    }

    #[test]
    fn grids_above_the_dense_ceiling_are_sparse() {
        let side = 1 << 14;
        assert_eq!(side * side, MAX_DENSE_CELLS);
        let err = DenseGrid::try_new(side, side + 1).unwrap_err();
        assert_eq!(err.code(), "grid-too-large");
        assert_eq!(err.info().context["max_cells"], MAX_DENSE_CELLS.to_string());
        assert!(GridBackend::allocate(side + 1, side).is_sparse());
        assert!(!GridBackend::allocate(64, 64).is_sparse());
    }

    #[test]
    fn cell_count_saturates_on_huge_grids() {
        let grid = SparseGrid::new(usize::MAX, 3);
        assert_eq!(grid.cell_count(), usize::MAX);
        let mut rng = RngHandle::from_seed(4);
        let (x, y) = choose_empty_spot(&grid, &mut rng, 10).unwrap();
        assert!(y < 3 && grid.get(x, y) == 0);
    }
}
