// Copyright (c) 2026, Chad Hogan
// All rights reserved.
//
// This source code is licensed under the BSD-3-Clause license found in the
// LICENSE file in the root directory of this source tree.

//! A Fast Marching Method solver for the eikonal equation.
//!
//! This library computes arrival-time (distance) fields on N-dimensional
//! Cartesian grids by solving the eikonal equation |∇T| = 1/F, where T is
//! the arrival time and F is a positive propagation speed. Starting from a
//! set of frozen cells with prescribed values, a Dijkstra-like narrow-band
//! sweep freezes cells in order of increasing arrival time.
//!
//! Two flavours are provided: [`unsigned_distance`] (non-negative arrival
//! times) and [`signed_distance`] (negative inside a closed interface,
//! positive outside). The per-cell upwind discretisation comes in
//! first-order and high-accuracy variants, with uniform or spatially
//! varying speed.

#![warn(missing_docs)]

/// Grid views, indexing, and neighbour-offset tables.
pub mod core;
/// Error types for the library.
pub mod error;
/// Narrow-band marching and the distance-field entry points.
pub mod march;
/// Per-cell eikonal solvers.
pub mod solver;
/// Connectivity analysis for the signed pipeline.
pub mod topology;

pub use crate::error::{EikonalError, Result};
pub use crate::march::{signed_distance, unsigned_distance};
pub use crate::solver::{
    EikonalSolver, HighAccuracyUniformSpeedSolver, HighAccuracyVaryingSpeedSolver,
    UniformSpeedSolver, VaryingSpeedSolver,
};
