// Copyright (c) 2026, Chad Hogan
// All rights reserved.
//
// This source code is licensed under the BSD-3-Clause license found in the
// LICENSE file in the root directory of this source tree.

use crate::core::{frozen, inside, GridView, FAR};
use crate::error::{EikonalError, Result};

/// Solve `q[0] + q[1]*t + q[2]*t^2 = 0` and return the larger root.
///
/// # Errors
/// Returns `NoRealRoot` if the discriminant is negative or the larger root
/// is negative; both indicate inconsistent upwind data.
fn solve_quadratic(q: [f64; 3]) -> Result<f64> {
    // At least one axis must have contributed a frozen neighbour.
    debug_assert!(q[2] > 0.0);

    let discriminant = q[1] * q[1] - 4.0 * q[2] * q[0];
    if discriminant < 0.0 {
        return Err(EikonalError::NoRealRoot);
    }

    let root = (-q[1] + discriminant.sqrt()) / (2.0 * q[2]);
    debug_assert!(!root.is_nan());
    if root < 0.0 {
        return Err(EikonalError::NoRealRoot);
    }

    Ok(root)
}

/// First-order arrival time at `index`.
///
/// Each axis with at least one frozen face neighbour contributes the upwind
/// term `(t - m)^2 / dx^2`, where `m` is the smaller of the two neighbour
/// arrival times along that axis. Axes without frozen neighbours contribute
/// nothing.
fn solve_first_order<const N: usize>(
    index: [i32; N],
    distances: &GridView<'_, f64, N>,
    speed: f64,
    grid_spacing: &[f64; N],
) -> Result<f64> {
    debug_assert!(inside(index, distances.size()));

    let mut q = [-1.0 / (speed * speed), 0.0, 0.0];

    for axis in 0..N {
        let mut min_distance = FAR;
        for step in [-1i32, 1] {
            let mut neighbor = index;
            neighbor[axis] += step;
            if inside(neighbor, distances.size()) {
                // Non-frozen neighbours hold the far sentinel and never win.
                let d = *distances.cell(neighbor);
                if d < min_distance {
                    min_distance = d;
                }
            }
        }

        if frozen(min_distance) {
            let inv_spacing_sq = 1.0 / (grid_spacing[axis] * grid_spacing[axis]);
            q[0] += min_distance * min_distance * inv_spacing_sq;
            q[1] += -2.0 * min_distance * inv_spacing_sq;
            q[2] += inv_spacing_sq;
        }
    }

    solve_quadratic(q)
}

/// High-accuracy arrival time at `index`.
///
/// Like [`solve_first_order`], but an axis whose upwind direction also has a
/// frozen neighbour two cells out, with arrival time no larger than the
/// adjacent one, contributes the second-order term with effective value
/// `(4*m - m2) / 3` and coefficient `9 / (4*dx^2)`. Axes where the two-step
/// neighbour is unusable fall back to the first-order term.
fn solve_high_accuracy<const N: usize>(
    index: [i32; N],
    distances: &GridView<'_, f64, N>,
    speed: f64,
    grid_spacing: &[f64; N],
) -> Result<f64> {
    debug_assert!(inside(index, distances.size()));

    let mut q = [-1.0 / (speed * speed), 0.0, 0.0];

    for axis in 0..N {
        let mut min_distance = FAR;
        let mut min_distance2 = FAR;

        for step in [-1i32, 1] {
            let mut neighbor = index;
            neighbor[axis] += step;
            if !inside(neighbor, distances.size()) {
                continue;
            }
            let d = *distances.cell(neighbor);
            if d < min_distance {
                min_distance = d;
                // The two-step neighbour must lie in the same direction as
                // the adjacent minimum; a candidate from the other direction
                // is no longer upwind.
                min_distance2 = FAR;

                let mut neighbor2 = neighbor;
                neighbor2[axis] += step;
                if inside(neighbor2, distances.size()) {
                    let d2 = *distances.cell(neighbor2);
                    if d2 <= d {
                        min_distance2 = d2;
                    }
                }
            }
        }

        if frozen(min_distance) {
            if frozen(min_distance2) {
                let alpha = 9.0 / (4.0 * grid_spacing[axis] * grid_spacing[axis]);
                let t = (4.0 * min_distance - min_distance2) / 3.0;
                q[0] += t * t * alpha;
                q[1] += -2.0 * t * alpha;
                q[2] += alpha;
            } else {
                let inv_spacing_sq = 1.0 / (grid_spacing[axis] * grid_spacing[axis]);
                q[0] += min_distance * min_distance * inv_spacing_sq;
                q[1] += -2.0 * min_distance * inv_spacing_sq;
                q[2] += inv_spacing_sq;
            }
        }
    }

    solve_quadratic(q)
}

fn check_grid_spacing<const N: usize>(grid_spacing: &[f64; N]) -> Result<()> {
    if grid_spacing.iter().any(|&dx| !dx.is_finite() || dx <= 0.0) {
        return Err(EikonalError::InvalidGridSpacing {
            spacing: grid_spacing.to_vec(),
        });
    }
    Ok(())
}

fn check_speed(speed: f64) -> Result<()> {
    if !speed.is_finite() || speed <= 0.0 {
        return Err(EikonalError::InvalidSpeed(speed));
    }
    Ok(())
}

/// Capability supplied to seeding and marching: derive the arrival time of a
/// single cell from its already-frozen face neighbours.
pub trait EikonalSolver<const N: usize> {
    /// Arrival time for the cell at `index` given the current distance grid.
    ///
    /// # Errors
    /// Returns `NoRealRoot` if the cell's quadratic has no admissible
    /// solution.
    fn solve(&self, index: [i32; N], distances: &GridView<'_, f64, N>) -> Result<f64>;

    /// Check this solver against the distance grid size it will be used
    /// with. The default accepts any size; varying-speed solvers reject a
    /// shape that differs from their speed grid.
    ///
    /// # Errors
    /// Returns `SizeMismatch` on a shape conflict.
    fn check_distance_grid(&self, _grid_size: [usize; N]) -> Result<()> {
        Ok(())
    }
}

/// First-order solver with uniform propagation speed.
pub struct UniformSpeedSolver<const N: usize> {
    grid_spacing: [f64; N],
    speed: f64,
}

impl<const N: usize> UniformSpeedSolver<N> {
    /// Create a solver for the given grid spacing and scalar speed.
    ///
    /// # Errors
    /// Returns `InvalidGridSpacing` or `InvalidSpeed` if either parameter is
    /// not positive and finite.
    pub fn new(grid_spacing: [f64; N], speed: f64) -> Result<Self> {
        check_grid_spacing(&grid_spacing)?;
        check_speed(speed)?;
        Ok(UniformSpeedSolver {
            grid_spacing,
            speed,
        })
    }
}

impl<const N: usize> EikonalSolver<N> for UniformSpeedSolver<N> {
    fn solve(&self, index: [i32; N], distances: &GridView<'_, f64, N>) -> Result<f64> {
        solve_first_order(index, distances, self.speed, &self.grid_spacing)
    }
}

/// High-accuracy (second-order upwind) solver with uniform speed.
pub struct HighAccuracyUniformSpeedSolver<const N: usize> {
    grid_spacing: [f64; N],
    speed: f64,
}

impl<const N: usize> HighAccuracyUniformSpeedSolver<N> {
    /// Create a solver for the given grid spacing and scalar speed.
    ///
    /// # Errors
    /// Returns `InvalidGridSpacing` or `InvalidSpeed` if either parameter is
    /// not positive and finite.
    pub fn new(grid_spacing: [f64; N], speed: f64) -> Result<Self> {
        check_grid_spacing(&grid_spacing)?;
        check_speed(speed)?;
        Ok(HighAccuracyUniformSpeedSolver {
            grid_spacing,
            speed,
        })
    }
}

impl<const N: usize> EikonalSolver<N> for HighAccuracyUniformSpeedSolver<N> {
    fn solve(&self, index: [i32; N], distances: &GridView<'_, f64, N>) -> Result<f64> {
        solve_high_accuracy(index, distances, self.speed, &self.grid_spacing)
    }
}

/// First-order solver reading the speed per cell from a borrowed grid.
///
/// The speed grid must have the same shape as the distance grid it is used
/// with; the buffer is borrowed for the lifetime of the solver.
pub struct VaryingSpeedSolver<'a, const N: usize> {
    grid_spacing: [f64; N],
    speed: GridView<'a, f64, N>,
}

impl<'a, const N: usize> VaryingSpeedSolver<'a, N> {
    /// Create a solver over a dense speed field.
    ///
    /// # Errors
    /// Returns `InvalidGridSpacing` for a bad spacing, `InvalidGridSize` or
    /// `SizeMismatch` for an inconsistent speed grid, and `InvalidSpeed` if
    /// any sample is not positive and finite.
    pub fn new(
        grid_spacing: [f64; N],
        speed_grid_size: [usize; N],
        speed_buffer: &'a [f64],
    ) -> Result<Self> {
        check_grid_spacing(&grid_spacing)?;
        let speed = GridView::new(speed_grid_size, speed_buffer)?;
        for &sample in speed_buffer {
            check_speed(sample)?;
        }
        Ok(VaryingSpeedSolver {
            grid_spacing,
            speed,
        })
    }
}

impl<'a, const N: usize> EikonalSolver<N> for VaryingSpeedSolver<'a, N> {
    fn solve(&self, index: [i32; N], distances: &GridView<'_, f64, N>) -> Result<f64> {
        solve_first_order(index, distances, *self.speed.cell(index), &self.grid_spacing)
    }

    fn check_distance_grid(&self, grid_size: [usize; N]) -> Result<()> {
        if self.speed.size() != grid_size {
            return Err(EikonalError::SizeMismatch {
                expected: grid_size.to_vec(),
                got: self.speed.size().to_vec(),
            });
        }
        Ok(())
    }
}

/// High-accuracy solver reading the speed per cell from a borrowed grid.
pub struct HighAccuracyVaryingSpeedSolver<'a, const N: usize> {
    grid_spacing: [f64; N],
    speed: GridView<'a, f64, N>,
}

impl<'a, const N: usize> HighAccuracyVaryingSpeedSolver<'a, N> {
    /// Create a solver over a dense speed field.
    ///
    /// # Errors
    /// Returns `InvalidGridSpacing` for a bad spacing, `InvalidGridSize` or
    /// `SizeMismatch` for an inconsistent speed grid, and `InvalidSpeed` if
    /// any sample is not positive and finite.
    pub fn new(
        grid_spacing: [f64; N],
        speed_grid_size: [usize; N],
        speed_buffer: &'a [f64],
    ) -> Result<Self> {
        check_grid_spacing(&grid_spacing)?;
        let speed = GridView::new(speed_grid_size, speed_buffer)?;
        for &sample in speed_buffer {
            check_speed(sample)?;
        }
        Ok(HighAccuracyVaryingSpeedSolver {
            grid_spacing,
            speed,
        })
    }
}

impl<'a, const N: usize> EikonalSolver<N> for HighAccuracyVaryingSpeedSolver<'a, N> {
    fn solve(&self, index: [i32; N], distances: &GridView<'_, f64, N>) -> Result<f64> {
        solve_high_accuracy(index, distances, *self.speed.cell(index), &self.grid_spacing)
    }

    fn check_distance_grid(&self, grid_size: [usize; N]) -> Result<()> {
        if self.speed.size() != grid_size {
            return Err(EikonalError::SizeMismatch {
                expected: grid_size.to_vec(),
                got: self.speed.size().to_vec(),
            });
        }
        Ok(())
    }
}
