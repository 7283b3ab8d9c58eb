//! Small shared types for addressing the survey cube.
//!
//! The survey is partitioned into fixed-size 3D fragments; a `FragmentId` is
//! the address of one fragment in that grid. Ordering matters: fetch
//! descriptors keep their id lists in lexicographic order, which is what the
//! derived `Ord` on the inner array gives us.

use serde::{Deserialize, Serialize};

/// A global sample coordinate inside the survey cube.
pub type Point3 = [usize; 3];

/// A fragment-local 2D offset, as recorded in curtain buckets.
pub type Coordinate2 = [usize; 2];

/// The address of a storage fragment in the fragment grid.
///
/// Components are per-axis fragment indices, always within the geometry's
/// declared fragment counts. Serializes as a plain 3-element JSON array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FragmentId(pub [usize; 3]);

impl FragmentId {
    /// The fragment index along `axis`.
    pub fn index(&self, axis: usize) -> usize {
        self.0[axis]
    }
}
