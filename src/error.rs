// Copyright (c) 2026, Chad Hogan
// All rights reserved.
//
// This source code is licensed under the BSD-3-Clause license found in the
// LICENSE file in the root directory of this source tree.

use std::fmt;

/// Errors that can occur during distance-field setup or marching.
#[derive(Debug, Clone, PartialEq)]
pub enum EikonalError {
    /// Grid size has a zero element.
    InvalidGridSize {
        /// The size that was provided.
        size: Vec<usize>,
    },
    /// Grid spacing is not positive and finite on every axis.
    InvalidGridSpacing {
        /// The spacing that was provided.
        spacing: Vec<f64>,
    },
    /// Speed (scalar, or a sample of a speed grid) is not positive and finite.
    InvalidSpeed(f64),
    /// Two lengths or shapes that must agree do not.
    SizeMismatch {
        /// The expected length or shape.
        expected: Vec<usize>,
        /// The length or shape encountered.
        got: Vec<usize>,
    },
    /// No frozen cells were supplied.
    EmptyFrozenSet,
    /// A frozen index lies outside the grid.
    IndexOutOfGrid {
        /// The offending index.
        index: Vec<i32>,
        /// The grid size.
        size: Vec<usize>,
    },
    /// The same index appears more than once in the frozen input.
    DuplicateIndex {
        /// The repeated index.
        index: Vec<i32>,
    },
    /// Every cell of the grid was supplied as frozen.
    WholeGridFrozen,
    /// A frozen distance is NaN, infinite, or (for the unsigned flavour)
    /// negative.
    InvalidFrozenDistance(f64),
    /// The eikonal quadratic for a cell has no admissible root, which
    /// indicates inconsistent upwind data.
    NoRealRoot,
    /// The frozen set contains an open (non-closed) interface component,
    /// for which inside and outside are undefined.
    UnsupportedTopology,
}

impl fmt::Display for EikonalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EikonalError::InvalidGridSize { size } => {
                write!(f, "invalid grid size: {:?} (every axis must be >= 1)", size)
            }
            EikonalError::InvalidGridSpacing { spacing } => {
                write!(
                    f,
                    "invalid grid spacing: {:?} (must be positive and finite)",
                    spacing
                )
            }
            EikonalError::InvalidSpeed(value) => {
                write!(
                    f,
                    "invalid speed: {} (must be positive and finite)",
                    value
                )
            }
            EikonalError::SizeMismatch { expected, got } => {
                write!(f, "size mismatch: expected {:?}, got {:?}", expected, got)
            }
            EikonalError::EmptyFrozenSet => {
                write!(f, "empty frozen set: at least one frozen cell is required")
            }
            EikonalError::IndexOutOfGrid { index, size } => {
                write!(f, "frozen index {:?} outside grid of size {:?}", index, size)
            }
            EikonalError::DuplicateIndex { index } => {
                write!(f, "duplicate frozen index: {:?}", index)
            }
            EikonalError::WholeGridFrozen => {
                write!(f, "whole grid frozen: nothing to march")
            }
            EikonalError::InvalidFrozenDistance(value) => {
                write!(f, "invalid frozen distance: {}", value)
            }
            EikonalError::NoRealRoot => {
                write!(f, "eikonal quadratic has no admissible root")
            }
            EikonalError::UnsupportedTopology => {
                write!(f, "open interface component: inside/outside is undefined")
            }
        }
    }
}

impl std::error::Error for EikonalError {}

/// Convenience type alias for Results with EikonalError.
pub type Result<T> = std::result::Result<T, EikonalError>;
