// Copyright (c) 2026, Chad Hogan
// All rights reserved.
//
// This source code is licensed under the BSD-3-Clause license found in the
// LICENSE file in the root directory of this source tree.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use ordered_float::OrderedFloat;
use tracing::debug;

use crate::core::{frozen, inside, linear_size, GridViewMut, IndexIter, FAR};
use crate::error::{EikonalError, Result};
use crate::solver::{EikonalSolver, UniformSpeedSolver};
use crate::topology::signed_narrow_bands;

/// Min-heap of tentative (arrival time, index) pairs.
///
/// Multiple entries for the same index may coexist; only the first popped
/// (smallest time) is authoritative, later ones are discarded by the march
/// when it finds the cell already frozen.
struct NarrowBand<const N: usize> {
    heap: BinaryHeap<Reverse<(OrderedFloat<f64>, [i32; N])>>,
}

impl<const N: usize> NarrowBand<N> {
    fn new() -> Self {
        NarrowBand {
            heap: BinaryHeap::new(),
        }
    }

    fn push(&mut self, distance: f64, index: [i32; N]) {
        self.heap.push(Reverse((OrderedFloat(distance), index)));
    }

    fn pop(&mut self) -> Option<(f64, [i32; N])> {
        self.heap
            .pop()
            .map(|Reverse((distance, index))| (distance.into_inner(), index))
    }

    fn len(&self) -> usize {
        self.heap.len()
    }
}

fn check_grid_size<const N: usize>(grid_size: [usize; N]) -> Result<()> {
    if grid_size.iter().any(|&s| s == 0) {
        return Err(EikonalError::InvalidGridSize {
            size: grid_size.to_vec(),
        });
    }
    Ok(())
}

/// Write `multiplier * distance` into the grid for every frozen cell, after
/// validating the frozen input.
///
/// The distance buffer itself doubles as the occupancy map: a target cell
/// that is already frozen reveals a duplicate index.
///
/// # Errors
/// `EmptyFrozenSet`, `SizeMismatch`, `IndexOutOfGrid`,
/// `InvalidFrozenDistance` (per `valid_distance`), `DuplicateIndex`, and
/// `WholeGridFrozen`.
fn set_boundary_condition<const N: usize, P>(
    indices: &[[i32; N]],
    distances: &[f64],
    multiplier: f64,
    valid_distance: P,
    distance_grid: &mut GridViewMut<'_, f64, N>,
) -> Result<()>
where
    P: Fn(f64) -> bool,
{
    if indices.is_empty() {
        return Err(EikonalError::EmptyFrozenSet);
    }
    if indices.len() != distances.len() {
        return Err(EikonalError::SizeMismatch {
            expected: vec![indices.len()],
            got: vec![distances.len()],
        });
    }

    for (&index, &distance) in indices.iter().zip(distances.iter()) {
        if !inside(index, distance_grid.size()) {
            return Err(EikonalError::IndexOutOfGrid {
                index: index.to_vec(),
                size: distance_grid.size().to_vec(),
            });
        }
        if !valid_distance(distance) {
            return Err(EikonalError::InvalidFrozenDistance(distance));
        }

        let cell = distance_grid.cell_mut(index);
        if frozen(*cell) {
            return Err(EikonalError::DuplicateIndex {
                index: index.to_vec(),
            });
        }
        *cell = multiplier * distance;
    }

    // All indices are unique and in bounds at this point.
    if indices.len() == linear_size(distance_grid.size()) {
        return Err(EikonalError::WholeGridFrozen);
    }

    Ok(())
}

/// Seed the narrow band with the face neighbours of the frozen cells.
///
/// A scoped label grid keeps cells with several frozen neighbours from being
/// pushed more than once during seeding.
fn initial_unsigned_narrow_band<const N: usize, S>(
    frozen_indices: &[[i32; N]],
    distance_grid: &GridViewMut<'_, f64, N>,
    solver: &S,
) -> Result<NarrowBand<N>>
where
    S: EikonalSolver<N>,
{
    let mut seeded_buffer = vec![false; linear_size(distance_grid.size())];
    let mut seeded = GridViewMut::new(distance_grid.size(), &mut seeded_buffer)?;

    let mut narrow_band = NarrowBand::new();
    let distances = distance_grid.as_view();

    for &frozen_index in frozen_indices {
        debug_assert!(frozen(*distances.cell(frozen_index)));
        for axis in 0..N {
            for step in [-1i32, 1] {
                let mut neighbor = frozen_index;
                neighbor[axis] += step;
                if !inside(neighbor, distances.size()) {
                    continue;
                }
                if frozen(*distances.cell(neighbor)) || *seeded.cell(neighbor) {
                    continue;
                }
                *seeded.cell_mut(neighbor) = true;
                narrow_band.push(solver.solve(neighbor, &distances)?, neighbor);
            }
        }
    }

    Ok(narrow_band)
}

/// Push precomputed seed cells (already deduplicated by the topology
/// analysis) onto the narrow band.
fn push_seeds<const N: usize, S>(
    seed_indices: &[[i32; N]],
    distance_grid: &GridViewMut<'_, f64, N>,
    solver: &S,
    narrow_band: &mut NarrowBand<N>,
) -> Result<()>
where
    S: EikonalSolver<N>,
{
    let distances = distance_grid.as_view();
    for &index in seed_indices {
        debug_assert!(!frozen(*distances.cell(index)));
        narrow_band.push(solver.solve(index, &distances)?, index);
    }
    Ok(())
}

/// Drain the narrow band: repeatedly freeze the smallest tentative arrival
/// time and relax the face neighbours of the newly frozen cell.
///
/// Stale heap entries (cell already frozen) are discarded silently. Arrival
/// times are popped in non-decreasing order.
fn march_narrow_band<const N: usize, S>(
    solver: &S,
    narrow_band: &mut NarrowBand<N>,
    distance_grid: &mut GridViewMut<'_, f64, N>,
) -> Result<()>
where
    S: EikonalSolver<N>,
{
    while let Some((distance, index)) = narrow_band.pop() {
        {
            let cell = distance_grid.cell_mut(index);
            if frozen(*cell) {
                continue;
            }
            *cell = distance;
        }

        for axis in 0..N {
            for step in [-1i32, 1] {
                let mut neighbor = index;
                neighbor[axis] += step;
                if !inside(neighbor, distance_grid.size()) {
                    continue;
                }
                if frozen(*distance_grid.cell(neighbor)) {
                    continue;
                }
                // No decrease-key: a cheaper entry for the same cell simply
                // outranks the old one, which is later dropped as stale.
                let tentative = solver.solve(neighbor, &distance_grid.as_view())?;
                narrow_band.push(tentative, neighbor);
            }
        }
    }

    Ok(())
}

/// Compute an unsigned distance field on a grid.
///
/// Every cell of the returned buffer holds the arrival time of the front
/// started at the frozen cells, propagating at the solver's speed: the
/// Euclidean distance to the frozen set when the speed is one.
///
/// # Parameters
/// - `grid_size`: Number of grid cells in each dimension
/// - `frozen_indices`: Integer coordinates of cells with given distances
/// - `frozen_distances`: Non-negative distances assigned to frozen cells
/// - `solver`: Per-cell eikonal solver, any of the four variants
///
/// # Errors
/// Returns the input-validation errors (`InvalidGridSize`, `SizeMismatch`,
/// `EmptyFrozenSet`, `IndexOutOfGrid`, `DuplicateIndex`, `WholeGridFrozen`,
/// `InvalidFrozenDistance`), or `NoRealRoot` if marching hits a cell with
/// inconsistent upwind data.
pub fn unsigned_distance<const N: usize, S>(
    grid_size: [usize; N],
    frozen_indices: &[[i32; N]],
    frozen_distances: &[f64],
    solver: &S,
) -> Result<Vec<f64>>
where
    S: EikonalSolver<N>,
{
    assert!(N > 0, "grid dimension must be at least 1");

    check_grid_size(grid_size)?;
    solver.check_distance_grid(grid_size)?;

    let mut distance_buffer = vec![FAR; linear_size(grid_size)];
    let mut distance_grid = GridViewMut::new(grid_size, &mut distance_buffer)?;

    set_boundary_condition(
        frozen_indices,
        frozen_distances,
        1.0,
        // The far sentinel itself is not a usable distance.
        |d| d.is_finite() && frozen(d) && d >= 0.0,
        &mut distance_grid,
    )?;

    let mut narrow_band = initial_unsigned_narrow_band(frozen_indices, &distance_grid, solver)?;
    debug!(seeds = narrow_band.len(), "unsigned narrow band seeded");

    march_narrow_band(solver, &mut narrow_band, &mut distance_grid)?;

    debug_assert!(distance_buffer.iter().all(|&d| frozen(d)));
    Ok(distance_buffer)
}

/// Compute a signed distance field on a grid: negative inside the closed
/// frozen interface, positive outside.
///
/// The topology analysis splits the cells bordering the frozen set into
/// inside and outside narrow bands. The inside is marched first on negated
/// boundary values; all frozen cells are then negated, which restores the
/// boundary input and gives inside cells their negative sign, and the
/// outside is marched second. The outside seeds must not enter the band
/// before the flip — they would freeze with the wrong sign.
///
/// # Parameters
/// - `grid_size`: Number of grid cells in each dimension
/// - `grid_spacing`: Cell physical size in each dimension
/// - `speed`: Uniform interface speed; one gives Euclidean distance
/// - `frozen_indices`: Integer coordinates of cells with given distances
/// - `frozen_distances`: Signed distances assigned to frozen cells
///
/// # Errors
/// Returns the input-validation errors (`InvalidGridSize`,
/// `InvalidGridSpacing`, `InvalidSpeed`, `SizeMismatch`, `EmptyFrozenSet`,
/// `IndexOutOfGrid`, `DuplicateIndex`, `WholeGridFrozen`,
/// `InvalidFrozenDistance`), `UnsupportedTopology` for an open interface,
/// or `NoRealRoot` for inconsistent upwind data.
pub fn signed_distance<const N: usize>(
    grid_size: [usize; N],
    grid_spacing: [f64; N],
    speed: f64,
    frozen_indices: &[[i32; N]],
    frozen_distances: &[f64],
) -> Result<Vec<f64>> {
    assert!(N > 1, "signed distance requires at least two dimensions");

    check_grid_size(grid_size)?;
    let solver = UniformSpeedSolver::new(grid_spacing, speed)?;

    let mut distance_buffer = vec![FAR; linear_size(grid_size)];
    let mut distance_grid = GridViewMut::new(grid_size, &mut distance_buffer)?;

    set_boundary_condition(
        frozen_indices,
        frozen_distances,
        -1.0,
        |d| d.is_finite(),
        &mut distance_grid,
    )?;

    let bands = signed_narrow_bands(frozen_indices, grid_size)?;

    let mut narrow_band = NarrowBand::new();
    push_seeds(&bands.inside, &distance_grid, &solver, &mut narrow_band)?;
    march_narrow_band(&solver, &mut narrow_band, &mut distance_grid)?;

    // Exactly the inside cells and the boundary input are frozen here.
    // Negating them flips the inside to negative arrival times and restores
    // the boundary cells to their original sign.
    for index in IndexIter::new(grid_size) {
        let cell = distance_grid.cell_mut(index);
        if frozen(*cell) {
            *cell = -*cell;
        }
    }

    let mut narrow_band = NarrowBand::new();
    push_seeds(&bands.outside, &distance_grid, &solver, &mut narrow_band)?;
    march_narrow_band(&solver, &mut narrow_band, &mut distance_grid)?;

    debug_assert!(distance_buffer.iter().all(|&d| frozen(d)));
    Ok(distance_buffer)
}
