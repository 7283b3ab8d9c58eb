//! The slice endpoint: a 2D plane at a fixed line number along one axis.
//!
//! Building a slice is mostly a geometry question. Once the requested line
//! number is located in its axis' label sequence, the tiling answers which
//! fragments the resulting hyperplane passes through; workers then extract
//! the same fragment-local plane from each of them.

use crate::error::StrataError;
use crate::messages::{Manifest, ProcessHeader, QueryAttributes, SliceFetch, SliceQuery};
use crate::schedule::{geometry, Endpoint, Partition, TaskQuery};

pub struct SliceEndpoint;

impl TaskQuery for SliceQuery {
    fn attrs(&self) -> &QueryAttributes {
        &self.attrs
    }
}

impl Partition for SliceFetch {
    fn njobs(&self) -> usize {
        self.ids.len()
    }

    fn pack_window(&self, lo: usize, hi: usize) -> Result<Vec<u8>, StrataError> {
        self.pack(lo, hi)
    }
}

impl Endpoint for SliceEndpoint {
    type Query = SliceQuery;
    type Fetch = SliceFetch;

    fn build(&self, query: &SliceQuery, manifest: &Manifest) -> Result<SliceFetch, StrataError> {
        if query.dim >= manifest.ndims() {
            return Err(StrataError::NotFound(format!(
                "param.dimension (= {}) not in [0, {})",
                query.dim,
                manifest.ndims()
            )));
        }

        // First exact match wins; no sortedness is assumed here, unlike the
        // binary searches on the curtain path.
        let index = manifest.axis(query.dim)?;
        let pin = index
            .iter()
            .position(|&label| label == query.lineno)
            .ok_or_else(|| {
                StrataError::NotFound(format!("line (= {}) not found in index", query.lineno))
            })?;

        let gvt = geometry(manifest, query.attrs.shape)?;
        let dim = gvt.mkdim(query.dim)?;

        let shape_cube = manifest.dimensions.iter().map(Vec::len).collect();
        let lineno = pin % gvt.fragment_shape()[dim];
        let ids = gvt.slice(dim, pin);

        Ok(SliceFetch {
            attrs: query.attrs.clone(),
            shape_cube,
            lineno,
            ids,
        })
    }

    fn header(
        &self,
        query: &SliceQuery,
        manifest: &Manifest,
        ntasks: usize,
    ) -> Result<ProcessHeader, StrataError> {
        let gvt = geometry(manifest, query.attrs.shape)?;
        let dim = gvt.mkdim(query.dim)?;
        let squeezed = gvt.squeeze(dim);

        // The shape of a slice is the survey squeezed in that dimension.
        let shape = (0..squeezed.ndims())
            .map(|axis| squeezed.nsamples(axis))
            .collect();

        // The index keeps the raw line numbers of the remaining directions,
        // so clients see real-world labels per output position.
        let index = manifest
            .dimensions
            .iter()
            .enumerate()
            .filter(|&(axis, _)| axis != query.dim)
            .map(|(_, labels)| labels.clone())
            .collect();

        Ok(ProcessHeader {
            pid: query.attrs.pid.clone(),
            ntasks,
            shape,
            index,
        })
    }
}
