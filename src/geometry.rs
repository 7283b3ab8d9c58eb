//! Geometry volume tiling for the fragmented survey cube.
//!
//! A survey is a dense 3D cube of samples, cut into fixed-size fragments for
//! storage and distribution. This module answers the purely arithmetic
//! questions the scheduler asks about that tiling: how many fragments exist
//! along an axis, which fragments a hyperplane passes through, which fragment
//! owns a given sample, and where the sample sits inside it.
//!
//! Everything here is integer math on indices. Line-number labels never reach
//! this module; they are translated away beforehand (see `translate`).

use crate::error::StrataError;
use crate::types::{FragmentId, Point3};

fn ceil_div(n: usize, d: usize) -> usize {
    (n + (d - 1)) / d
}

/// The tiling of a 3D survey cube into fixed-size fragments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CubeGeometry {
    /// Samples per axis of the full cube.
    cube: Point3,
    /// Samples per axis of a single fragment.
    frag: Point3,
}

impl CubeGeometry {
    pub fn new(cube: Point3, frag: Point3) -> Self {
        debug_assert!(frag.iter().all(|&f| f > 0));
        Self { cube, frag }
    }

    pub fn ndims(&self) -> usize {
        3
    }

    /// Validates an axis index against the cube's dimensionality.
    ///
    /// Dimensions arrive straight from client requests, so an out-of-range
    /// value is a bad request rather than a bug.
    pub fn mkdim(&self, i: usize) -> Result<usize, StrataError> {
        if i >= self.ndims() {
            return Err(StrataError::NotFound(format!(
                "dimension (= {}) not in [0, {})",
                i,
                self.ndims()
            )));
        }
        Ok(i)
    }

    /// Samples per axis of a single fragment.
    pub fn fragment_shape(&self) -> Point3 {
        self.frag
    }

    /// Number of fragments along `axis`. The last fragment may be partial.
    pub fn fragment_count(&self, axis: usize) -> usize {
        ceil_div(self.cube[axis], self.frag[axis])
    }

    /// Number of real samples along `axis`.
    pub fn nsamples(&self, axis: usize) -> usize {
        self.cube[axis]
    }

    /// Number of samples along `axis` including the zero padding of a partial
    /// trailing fragment. This is the extent a client must allocate when it
    /// assembles whole fragments.
    pub fn nsamples_padded(&self, axis: usize) -> usize {
        self.fragment_count(axis) * self.frag[axis]
    }

    /// Removes `axis`, yielding the geometry of the remaining plane with axis
    /// order preserved.
    pub fn squeeze(&self, axis: usize) -> ReducedGeometry {
        let keep = |xs: &Point3| -> Vec<usize> {
            xs.iter()
                .enumerate()
                .filter(|&(i, _)| i != axis)
                .map(|(_, &x)| x)
                .collect()
        };
        ReducedGeometry {
            cube: keep(&self.cube),
            frag: keep(&self.frag),
        }
    }

    /// All fragments whose extent intersects the hyperplane `axis = pin`,
    /// where `pin` is a global sample index.
    ///
    /// Ids are enumerated with the free axes ascending and the last free axis
    /// varying fastest, i.e. in lexicographic order. The scheduler leans on
    /// this: chunk order carries locality meaning downstream.
    pub fn slice(&self, axis: usize, pin: usize) -> Vec<FragmentId> {
        let pinned = pin / self.frag[axis];
        let (a, b) = match axis {
            0 => (1, 2),
            1 => (0, 2),
            _ => (0, 1),
        };

        let mut ids = Vec::with_capacity(self.fragment_count(a) * self.fragment_count(b));
        for i in 0..self.fragment_count(a) {
            for j in 0..self.fragment_count(b) {
                let mut id = [0; 3];
                id[axis] = pinned;
                id[a] = i;
                id[b] = j;
                ids.push(FragmentId(id));
            }
        }
        ids
    }

    /// The fragment containing the global sample `point`.
    pub fn frag_id(&self, point: Point3) -> FragmentId {
        FragmentId([
            point[0] / self.frag[0],
            point[1] / self.frag[1],
            point[2] / self.frag[2],
        ])
    }

    /// The offset of the global sample `point` within its owning fragment.
    pub fn to_local(&self, point: Point3) -> Point3 {
        [
            point[0] % self.frag[0],
            point[1] % self.frag[1],
            point[2] % self.frag[2],
        ]
    }
}

/// A geometry with one axis squeezed away. Only the per-axis sample counts
/// survive the reduction; fragment enumeration is a 3D affair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReducedGeometry {
    cube: Vec<usize>,
    frag: Vec<usize>,
}

impl ReducedGeometry {
    pub fn ndims(&self) -> usize {
        self.cube.len()
    }

    pub fn nsamples(&self, axis: usize) -> usize {
        self.cube[axis]
    }

    pub fn nsamples_padded(&self, axis: usize) -> usize {
        ceil_div(self.cube[axis], self.frag[axis]) * self.frag[axis]
    }
}
