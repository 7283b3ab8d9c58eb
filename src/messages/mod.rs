//! Wire message types for the scheduling pipeline.
//!
//! This module is the single source of truth for everything that crosses the
//! process boundary: incoming query documents, the fetch descriptors that are
//! partitioned into task blobs for workers, and the process header that
//! trails every schedule. All of it is JSON via serde, matching the service
//! layer and the workers.
//!
//! A request document is parsed in two phases. The dispatcher first peeks
//! only the `function` field to select an endpoint, then the endpoint's
//! skeleton decodes the full typed query. The survey manifest rides inside
//! the query as an embedded JSON string and is parsed separately again; that
//! keeps the query types independent of manifest evolution.

use serde::{Deserialize, Serialize};

use crate::error::StrataError;
use crate::types::{Coordinate2, FragmentId};

//==================================================================================
// Manifest
//==================================================================================

/// The survey's addressable coordinate space: one sorted, duplicate-free
/// line-number sequence per axis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Manifest {
    pub dimensions: Vec<Vec<i64>>,
}

impl Manifest {
    /// Parses the manifest document embedded in a query.
    pub fn parse(doc: &str) -> Result<Self, StrataError> {
        Ok(serde_json::from_str(doc)?)
    }

    /// Number of axes described by the manifest.
    pub fn ndims(&self) -> usize {
        self.dimensions.len()
    }

    /// The label sequence of `axis`, or NotFound past the end.
    pub fn axis(&self, axis: usize) -> Result<&[i64], StrataError> {
        self.dimensions.get(axis).map(Vec::as_slice).ok_or_else(|| {
            StrataError::NotFound(format!(
                "dimension (= {}) not in [0, {})",
                axis,
                self.dimensions.len()
            ))
        })
    }
}

//==================================================================================
// Queries
//==================================================================================

/// Used by the dispatcher to peek the declared function of a request without
/// decoding the full typed body.
#[derive(Debug, Deserialize)]
pub struct FunctionProbe {
    pub function: String,
}

/// The common block shared by every query and forwarded verbatim into every
/// task blob. `token`, `guid` and `storage_endpoint` are opaque to the core;
/// workers need them to reach the fragment store.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QueryAttributes {
    pub pid: String,
    #[serde(default)]
    pub token: String,
    #[serde(default)]
    pub guid: String,
    #[serde(default)]
    pub storage_endpoint: String,
    pub function: String,
    /// Fragment shape, samples per axis.
    pub shape: [usize; 3],
    /// The survey manifest as an embedded JSON document.
    pub manifest: String,
}

/// A slice request: one plane at a fixed line number along one axis.
#[derive(Debug, Clone, Deserialize)]
pub struct SliceQuery {
    #[serde(flatten)]
    pub attrs: QueryAttributes,
    pub dim: usize,
    pub lineno: i64,
}

/// A curtain request: a depth-spanning ribbon along an arbitrary path of
/// (dim0, dim1) surface points, given as line numbers.
#[derive(Debug, Clone, Deserialize)]
pub struct CurtainQuery {
    #[serde(flatten)]
    pub attrs: QueryAttributes,
    pub dim0s: Vec<i64>,
    pub dim1s: Vec<i64>,
}

//==================================================================================
// Fetch descriptors
//==================================================================================

/// The slice endpoint's fetch descriptor. `ids` is the full fragment list
/// before partitioning; task blobs carry contiguous windows of it.
#[derive(Debug, Clone)]
pub struct SliceFetch {
    pub attrs: QueryAttributes,
    /// Full per-axis label counts of the survey.
    pub shape_cube: Vec<usize>,
    /// The requested line's offset within a single fragment.
    pub lineno: usize,
    pub ids: Vec<FragmentId>,
}

/// Per-fragment accumulator of local trace coordinates, built during curtain
/// construction. The bucket list is kept sorted and unique by id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FragmentBucket {
    pub id: FragmentId,
    pub coordinates: Vec<Coordinate2>,
}

/// The curtain endpoint's fetch descriptor.
#[derive(Debug, Clone)]
pub struct CurtainFetch {
    pub attrs: QueryAttributes,
    /// Cartesian (translated) path coordinates, in request order.
    pub dim0s: Vec<usize>,
    pub dim1s: Vec<usize>,
    pub ids: Vec<FragmentBucket>,
}

// Borrowed views so a partition window can be serialized against the
// descriptor's other fields without copying or mutating the descriptor.

#[derive(Serialize)]
struct SliceFetchView<'a> {
    #[serde(flatten)]
    attrs: &'a QueryAttributes,
    shape_cube: &'a [usize],
    lineno: usize,
    ids: &'a [FragmentId],
}

#[derive(Serialize)]
struct CurtainFetchView<'a> {
    #[serde(flatten)]
    attrs: &'a QueryAttributes,
    dim0s: &'a [usize],
    dim1s: &'a [usize],
    ids: &'a [FragmentBucket],
}

impl SliceFetch {
    /// Serializes this descriptor with `ids` replaced by the given window.
    pub fn pack(&self, lo: usize, hi: usize) -> Result<Vec<u8>, StrataError> {
        Ok(serde_json::to_vec(&SliceFetchView {
            attrs: &self.attrs,
            shape_cube: &self.shape_cube,
            lineno: self.lineno,
            ids: &self.ids[lo..hi],
        })?)
    }
}

impl CurtainFetch {
    pub fn pack(&self, lo: usize, hi: usize) -> Result<Vec<u8>, StrataError> {
        Ok(serde_json::to_vec(&CurtainFetchView {
            attrs: &self.attrs,
            dim0s: &self.dim0s,
            dim1s: &self.dim1s,
            ids: &self.ids[lo..hi],
        })?)
    }
}

//==================================================================================
// Process header
//==================================================================================

/// The final message of every schedule.
///
/// The header gives clients enough to pre-allocate the output array and to
/// make sense of task results as they stream in, in arbitrary order: `shape`
/// is the output extent, `index` the real line numbers behind each output
/// position, and `ntasks` how many task messages to expect before this
/// terminator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessHeader {
    pub pid: String,
    pub ntasks: usize,
    pub shape: Vec<usize>,
    pub index: Vec<Vec<i64>>,
}

impl ProcessHeader {
    pub fn pack(&self) -> Result<Vec<u8>, StrataError> {
        Ok(serde_json::to_vec(self)?)
    }
}
