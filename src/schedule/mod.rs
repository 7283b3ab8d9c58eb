// ====================================================================================
// ARCHITECTURAL OVERVIEW: The Scheduling Skeleton
// ====================================================================================
//
// Scheduling in this context means the process of:
//   1. decode an incoming query, e.g. /slice/<dim>/<lineno>
//   2. build the fetch descriptor (fragment ids + what to extract from each
//      fragment)
//   3. split the descriptor into bounded units of work, one task blob each
//   4. append a process header describing the output
//
// I/O, the delivery of task blobs to worker nodes, is outside this scope.
//
// The high-level algorithm is largely independent of the task description, so
// it lives once in `schedule()`, parameterized over an `Endpoint`. An endpoint
// only supplies `build()` and `header()`; partitioning and assembly are shared.
// Adding a new query kind means one new `Endpoint` implementation and a
// dispatcher arm, nothing else.
//
// Every step is a pure function of its inputs. A failure at any step aborts
// the whole compilation; no partial schedule ever escapes.
//
// ====================================================================================

pub mod curtain;
pub mod slice;

use serde::de::DeserializeOwned;

use crate::error::StrataError;
use crate::geometry::CubeGeometry;
use crate::messages::{Manifest, ProcessHeader, QueryAttributes};

pub use curtain::CurtainEndpoint;
pub use slice::SliceEndpoint;

/// A decoded query document. Gives the skeleton access to the common
/// attribute block, most importantly the embedded manifest.
pub trait TaskQuery: DeserializeOwned {
    fn attrs(&self) -> &QueryAttributes;
}

/// A fetch descriptor that can serialize contiguous windows of its id list.
///
/// Windows are read-only: packing a window borrows the descriptor's other
/// fields as-is and substitutes the id sub-slice, so chunk emissions never
/// alias or mutate shared state.
pub trait Partition {
    /// Number of ids to be distributed over tasks.
    fn njobs(&self) -> usize;

    /// Serializes this descriptor with its id list replaced by `lo..hi`.
    fn pack_window(&self, lo: usize, hi: usize) -> Result<Vec<u8>, StrataError>;
}

/// One query kind's contribution to the scheduling algorithm.
pub trait Endpoint {
    type Query: TaskQuery;
    type Fetch: Partition;

    /// Builds the fetch descriptor: which fragments to read and what to
    /// extract from each. Specific to the shape (slice, curtain, ...).
    fn build(&self, query: &Self::Query, manifest: &Manifest)
        -> Result<Self::Fetch, StrataError>;

    /// Builds the process header. The header is crucial for efficient
    /// client-side assembly: results arrive in arbitrary order, and without
    /// it clients would have to buffer the full response before making sense
    /// of shape and line numbers.
    fn header(
        &self,
        query: &Self::Query,
        manifest: &Manifest,
        ntasks: usize,
    ) -> Result<ProcessHeader, StrataError>;
}

/// Constructs the tiling geometry for a query against a manifest: cube extent
/// from the per-axis label counts, fragment extent from the query.
///
/// The fragment shape comes straight from the request document, so a zero
/// axis is a bad request, not a bug; every division in the geometry relies
/// on fragment extents being positive.
pub(crate) fn geometry(
    manifest: &Manifest,
    shape: [usize; 3],
) -> Result<CubeGeometry, StrataError> {
    if shape.iter().any(|&f| f < 1) {
        return Err(StrataError::Config(format!(
            "fragment shape (= {:?}) must be positive in every axis",
            shape
        )));
    }
    Ok(CubeGeometry::new(
        [
            manifest.axis(0)?.len(),
            manifest.axis(1)?.len(),
            manifest.axis(2)?.len(),
        ],
        shape,
    ))
}

/// Number of task-size'd tasks needed to process all jobs.
///
/// The precondition `task_size >= 1` is checked by `partition()`; the guards
/// here are a second, independent layer against arithmetic leaving the
/// supported domain. A zero task count for a nonempty job list must never be
/// silently accepted.
pub(crate) fn task_count(jobs: usize, task_size: usize) -> Result<usize, StrataError> {
    let ntasks = jobs
        .checked_add(task_size - 1)
        .map(|n| n / task_size)
        .ok_or_else(|| {
            StrataError::Internal("task-count overflowed; job count near integer limit".into())
        })?;

    if ntasks == 0 && jobs > 0 {
        return Err(StrataError::Internal(
            "task-count = 0 for a nonempty job list".into(),
        ));
    }
    Ok(ntasks)
}

/// Splits a fetch descriptor into task blobs of at most `task_size` ids each.
///
/// Windows are contiguous and order-preserving: all but the last have exactly
/// `task_size` ids, the last carries the remainder. Chunk order matches id
/// order, which already carries locality meaning (see the curtain endpoint).
pub fn partition<F: Partition>(fetch: &F, task_size: usize) -> Result<Vec<Vec<u8>>, StrataError> {
    if task_size < 1 {
        return Err(StrataError::Config(format!(
            "task_size (= {}) < 1",
            task_size
        )));
    }

    let njobs = fetch.njobs();
    let ntasks = task_count(njobs, task_size)?;

    let mut xs = Vec::with_capacity(ntasks);
    for i in 0..ntasks {
        let lo = i * task_size;
        let hi = usize::min(lo + task_size, njobs);
        xs.push(fetch.pack_window(lo, hi)?);
    }
    Ok(xs)
}

/// Runs the full scheduling algorithm for one endpoint: decode, build,
/// partition, header. The packed header is always the last element, so a
/// streaming consumer can treat it as a terminator.
pub fn schedule<E: Endpoint>(
    endpoint: &E,
    doc: &[u8],
    task_size: usize,
) -> Result<Vec<Vec<u8>>, StrataError> {
    let query: E::Query = serde_json::from_slice(doc)?;
    let manifest = Manifest::parse(&query.attrs().manifest)?;

    let fetch = endpoint.build(&query, &manifest)?;
    let mut sched = partition(&fetch, task_size)?;

    let head = endpoint.header(&query, &manifest, sched.len())?;
    sched.push(head.pack()?);
    Ok(sched)
}
