// Copyright (c) 2026, Chad Hogan
// All rights reserved.
//
// This source code is licensed under the BSD-3-Clause license found in the
// LICENSE file in the root directory of this source tree.

//! Connectivity analysis for the signed-distance pipeline.
//!
//! The signed flavour must decide which side of the frozen interface is
//! inside. Frozen cells are grouped into vertex-connected components; each
//! component is dilated by one vertex step and the dilated shell is split
//! into face-connected bands. A closed component produces one outer band
//! (largest bounding box) and one or more inner bands (holes); a component
//! with a single band is open and unsupported.

use tracing::debug;

use crate::core::{
    face_neighbor_offsets, inside, linear_size, offset_index, shift_index,
    vertex_neighbor_offsets, GridViewMut,
};
use crate::error::{EikonalError, Result};

/// Partition `indices` into connected components.
///
/// Two indices belong to the same component iff one is reachable from the
/// other by chaining steps from `neighbor_offsets`. Indices must lie inside
/// the grid.
pub fn connected_components<const N: usize>(
    indices: &[[i32; N]],
    grid_size: [usize; N],
    neighbor_offsets: &[[i32; N]],
) -> Result<Vec<Vec<[i32; N]>>> {
    if indices.is_empty() {
        return Ok(Vec::new());
    }

    #[derive(Clone, Copy, PartialEq, Eq)]
    enum LabelCell {
        Background,
        Foreground,
        Labelled,
    }

    let mut label_buffer = vec![LabelCell::Background; linear_size(grid_size)];
    let mut label_grid = GridViewMut::new(grid_size, &mut label_buffer)?;

    for &index in indices {
        debug_assert!(inside(index, grid_size));
        *label_grid.cell_mut(index) = LabelCell::Foreground;
    }

    let mut components = Vec::new();
    let mut stack: Vec<[i32; N]> = Vec::new();

    for &index in indices {
        if *label_grid.cell(index) != LabelCell::Foreground {
            continue;
        }

        // Start a new component and flood-fill it.
        *label_grid.cell_mut(index) = LabelCell::Labelled;
        let mut component = vec![index];
        stack.push(index);

        while let Some(current) = stack.pop() {
            for &offset in neighbor_offsets {
                let neighbor = offset_index(current, offset);
                if inside(neighbor, grid_size)
                    && *label_grid.cell(neighbor) == LabelCell::Foreground
                {
                    *label_grid.cell_mut(neighbor) = LabelCell::Labelled;
                    component.push(neighbor);
                    stack.push(neighbor);
                }
            }
        }

        components.push(component);
    }

    Ok(components)
}

/// Compute the dilation bands of `indices` within a grid.
///
/// The set is dilated by one vertex step in a grid padded by one cell on
/// every side (so cells on the boundary can dilate outward), the dilated
/// shell is partitioned into face-connected components, and each component
/// is translated back into the original frame with out-of-grid cells
/// dropped. The bands are disjoint and surround the components of the set.
pub fn dilation_bands<const N: usize>(
    indices: &[[i32; N]],
    grid_size: [usize; N],
) -> Result<Vec<Vec<[i32; N]>>> {
    if indices.is_empty() {
        return Ok(Vec::new());
    }

    #[derive(Clone, Copy, PartialEq, Eq)]
    enum DilationCell {
        Background,
        Foreground,
        Dilated,
    }

    let mut padded_size = grid_size;
    for s in padded_size.iter_mut() {
        *s += 2;
    }

    let mut dilation_buffer = vec![DilationCell::Background; linear_size(padded_size)];
    let mut dilation_grid = GridViewMut::new(padded_size, &mut dilation_buffer)?;

    for &index in indices {
        debug_assert!(inside(index, grid_size));
        *dilation_grid.cell_mut(shift_index(index, 1)) = DilationCell::Foreground;
    }

    let offsets = vertex_neighbor_offsets::<N>();
    let mut dilated = Vec::new();
    for &index in indices {
        let padded = shift_index(index, 1);
        for &offset in &offsets {
            // The one-cell padding keeps every vertex neighbour in bounds.
            let neighbor = offset_index(padded, offset);
            if *dilation_grid.cell(neighbor) == DilationCell::Background {
                *dilation_grid.cell_mut(neighbor) = DilationCell::Dilated;
                dilated.push(neighbor);
            }
        }
    }

    let components = connected_components(&dilated, padded_size, &face_neighbor_offsets::<N>())?;

    let mut bands = Vec::new();
    for component in components {
        let band: Vec<[i32; N]> = component
            .into_iter()
            .map(|index| shift_index(index, -1))
            .filter(|&index| inside(index, grid_size))
            .collect();
        if !band.is_empty() {
            bands.push(band);
        }
    }

    Ok(bands)
}

/// Axis-aligned bounding box of a non-empty index set, as inclusive
/// (min, max) pairs per axis.
pub fn bounding_box<const N: usize>(indices: &[[i32; N]]) -> [(i32, i32); N] {
    assert!(!indices.is_empty(), "bounding box of empty index set");

    let mut bbox = [(i32::MAX, i32::MIN); N];
    for index in indices {
        for axis in 0..N {
            bbox[axis].0 = bbox[axis].0.min(index[axis]);
            bbox[axis].1 = bbox[axis].1.max(index[axis]);
        }
    }
    bbox
}

/// Number of cells covered by an inclusive bounding box.
pub fn hyper_volume<const N: usize>(bbox: &[(i32, i32); N]) -> usize {
    bbox.iter()
        .map(|&(lo, hi)| {
            debug_assert!(lo <= hi);
            (hi - lo + 1) as usize
        })
        .product()
}

/// Initial narrow-band seed sets for the signed pipeline, split by side.
pub(crate) struct SignedBands<const N: usize> {
    /// Seed cells on the inside of the interface.
    pub inside: Vec<[i32; N]>,
    /// Seed cells on the outside of the interface.
    pub outside: Vec<[i32; N]>,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum NarrowBandCell {
    Background,
    Frozen,
    Band,
}

fn has_frozen_face_neighbor<const N: usize>(
    index: [i32; N],
    band_grid: &GridViewMut<'_, NarrowBandCell, N>,
) -> bool {
    for axis in 0..N {
        for step in [-1i32, 1] {
            let mut neighbor = index;
            neighbor[axis] += step;
            if inside(neighbor, band_grid.size())
                && *band_grid.cell(neighbor) == NarrowBandCell::Frozen
            {
                return true;
            }
        }
    }
    false
}

/// Classify the dilation cells around each frozen component into inside and
/// outside narrow-band seeds.
///
/// Per component, the band with the largest bounding-box hyper-volume is the
/// outer one; every other band lines a hole and is inside. A dilation cell
/// becomes a seed only if one of its face neighbours is frozen. Outer bands
/// of distinct components may share cells (union semantics); inner bands are
/// pairwise disjoint by construction.
///
/// # Errors
/// Returns `UnsupportedTopology` if any component has a single dilation
/// band, i.e. no hole: an open interface.
pub(crate) fn signed_narrow_bands<const N: usize>(
    frozen_indices: &[[i32; N]],
    grid_size: [usize; N],
) -> Result<SignedBands<N>> {
    let components =
        connected_components(frozen_indices, grid_size, &vertex_neighbor_offsets::<N>())?;
    debug_assert!(!components.is_empty());

    let mut band_buffer = vec![NarrowBandCell::Background; linear_size(grid_size)];
    let mut band_grid = GridViewMut::new(grid_size, &mut band_buffer)?;
    for &index in frozen_indices {
        *band_grid.cell_mut(index) = NarrowBandCell::Frozen;
    }

    let mut seeds = SignedBands {
        inside: Vec::new(),
        outside: Vec::new(),
    };

    for component in &components {
        let bands = dilation_bands(component, grid_size)?;
        debug_assert!(!bands.is_empty());
        if bands.len() == 1 {
            return Err(EikonalError::UnsupportedTopology);
        }

        let mut order: Vec<usize> = (0..bands.len()).collect();
        order.sort_by_key(|&b| std::cmp::Reverse(hyper_volume(&bounding_box(&bands[b]))));

        for (rank, &b) in order.iter().enumerate() {
            let is_inner = rank > 0;
            for &index in &bands[b] {
                // Skip frozen cells and cells already claimed by another
                // component's outer band.
                if *band_grid.cell(index) != NarrowBandCell::Background {
                    continue;
                }
                if has_frozen_face_neighbor(index, &band_grid) {
                    *band_grid.cell_mut(index) = NarrowBandCell::Band;
                    if is_inner {
                        seeds.inside.push(index);
                    } else {
                        seeds.outside.push(index);
                    }
                }
            }
        }
    }

    debug!(
        components = components.len(),
        inside = seeds.inside.len(),
        outside = seeds.outside.len(),
        "signed narrow bands classified"
    );

    Ok(seeds)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// The 8-cell ring around `center` (all vertex neighbours).
    fn ring_2d(center: [i32; 2]) -> Vec<[i32; 2]> {
        vertex_neighbor_offsets::<2>()
            .into_iter()
            .map(|offset| offset_index(center, offset))
            .collect()
    }

    #[test]
    fn diagonal_cells_vertex_connected_face_disconnected() {
        let indices = [[0, 0], [1, 1]];
        let vertex =
            connected_components(&indices, [3, 3], &vertex_neighbor_offsets::<2>()).unwrap();
        assert_eq!(vertex.len(), 1);
        assert_eq!(vertex[0].len(), 2);

        let face = connected_components(&indices, [3, 3], &face_neighbor_offsets::<2>()).unwrap();
        assert_eq!(face.len(), 2);
    }

    #[test]
    fn separate_clusters_are_separate_components() {
        let indices = [[0, 0], [1, 0], [5, 5], [5, 6], [6, 6]];
        let components =
            connected_components(&indices, [8, 8], &vertex_neighbor_offsets::<2>()).unwrap();
        assert_eq!(components.len(), 2);
        let mut sizes: Vec<usize> = components.iter().map(|c| c.len()).collect();
        sizes.sort_unstable();
        assert_eq!(sizes, vec![2, 3]);
    }

    #[test]
    fn empty_input_yields_no_components() {
        let components =
            connected_components::<2>(&[], [4, 4], &vertex_neighbor_offsets::<2>()).unwrap();
        assert!(components.is_empty());
    }

    #[test]
    fn single_cell_has_one_band() {
        // A lone cell dilates to a single shell: open topology.
        let bands = dilation_bands(&[[2, 2]], [5, 5]).unwrap();
        assert_eq!(bands.len(), 1);
        assert_eq!(bands[0].len(), 8);
    }

    #[test]
    fn closed_ring_has_outer_and_inner_bands() {
        let ring = ring_2d([2, 2]);
        let mut bands = dilation_bands(&ring, [5, 5]).unwrap();
        assert_eq!(bands.len(), 2);

        bands.sort_by_key(|band| band.len());
        // Inner band is exactly the hole.
        assert_eq!(bands[0], vec![[2, 2]]);
        // Outer band is the 16-cell border of the 5x5 grid.
        assert_eq!(bands[1].len(), 16);
        assert!(hyper_volume(&bounding_box(&bands[1])) > hyper_volume(&bounding_box(&bands[0])));
    }

    #[test]
    fn boundary_cells_dilate_outward() {
        // A ring touching the grid boundary: the outer band survives only
        // where it stays inside the grid.
        let ring = ring_2d([1, 1]);
        let bands = dilation_bands(&ring, [3, 3]).unwrap();
        // Outer shell is clipped away entirely; only the hole remains.
        assert_eq!(bands.len(), 1);
        assert_eq!(bands[0], vec![[1, 1]]);
    }

    #[test]
    fn bounding_box_and_volume() {
        let bbox = bounding_box(&[[1, 4], [3, 2], [2, 2]]);
        assert_eq!(bbox, [(1, 3), (2, 4)]);
        assert_eq!(hyper_volume(&bbox), 9);
    }

    #[test]
    fn ring_seeds_split_into_inside_and_outside() {
        let ring = ring_2d([2, 2]);
        let seeds = signed_narrow_bands(&ring, [5, 5]).unwrap();
        assert_eq!(seeds.inside, vec![[2, 2]]);
        // Border cells sharing a face with the ring: everything but the
        // four grid corners.
        assert_eq!(seeds.outside.len(), 12);
        for index in &seeds.outside {
            assert!(index.iter().any(|&i| i == 0 || i == 4));
        }
    }

    #[test]
    fn open_row_is_unsupported() {
        let row: Vec<[i32; 2]> = (0..4).map(|i| [i, 0]).collect();
        let result = signed_narrow_bands(&row, [4, 4]);
        assert!(matches!(result, Err(EikonalError::UnsupportedTopology)));
    }

    #[test]
    fn single_cell_component_is_unsupported() {
        let result = signed_narrow_bands(&[[2, 2]], [5, 5]);
        assert!(matches!(result, Err(EikonalError::UnsupportedTopology)));
    }

    #[test]
    fn two_rings_share_no_inner_seeds() {
        let mut frozen = ring_2d([2, 2]);
        frozen.extend(ring_2d([7, 2]));
        let seeds = signed_narrow_bands(&frozen, [10, 5]).unwrap();
        let mut inner = seeds.inside.clone();
        inner.sort_unstable();
        assert_eq!(inner, vec![[2, 2], [7, 2]]);
        // Outer seeds are unique even where the outer bands meet.
        let mut outer = seeds.outside.clone();
        outer.sort_unstable();
        outer.dedup();
        assert_eq!(outer.len(), seeds.outside.len());
    }
}
