//! The curtain endpoint: a depth-spanning ribbon along an arbitrary path of
//! surface points.
//!
//! Each requested (dim0, dim1) pair selects a full column of fragments down
//! the depth axis. Many path points land in the same column, so descriptor
//! construction is really a set-building problem: one bucket per (column,
//! depth-fragment), each accumulating the fragment-local trace positions to
//! extract.
//!
//! The bucket list is a sorted vector used as a set, with binary-search
//! insert and lookup instead of hashing. That is deliberate: the whole input
//! batch is known up front, and a sorted vector gives deterministic,
//! order-stable output where ids come out lexicographically sorted. Do not
//! substitute a hash set here.

use crate::error::StrataError;
use crate::messages::{
    CurtainFetch, CurtainQuery, FragmentBucket, Manifest, ProcessHeader, QueryAttributes,
};
use crate::schedule::{geometry, Endpoint, Partition, TaskQuery};
use crate::translate::to_cartesian;
use crate::types::FragmentId;

pub struct CurtainEndpoint;

impl TaskQuery for CurtainQuery {
    fn attrs(&self) -> &QueryAttributes {
        &self.attrs
    }
}

impl Partition for CurtainFetch {
    fn njobs(&self) -> usize {
        self.ids.len()
    }

    fn pack_window(&self, lo: usize, hi: usize) -> Result<Vec<u8>, StrataError> {
        self.pack(lo, hi)
    }
}

impl Endpoint for CurtainEndpoint {
    type Query = CurtainQuery;
    type Fetch = CurtainFetch;

    fn build(&self, query: &CurtainQuery, manifest: &Manifest) -> Result<CurtainFetch, StrataError> {
        if query.dim0s.len() != query.dim1s.len() {
            return Err(StrataError::Config(format!(
                "dim0s (= {} points) and dim1s (= {} points) must pair up",
                query.dim0s.len(),
                query.dim1s.len()
            )));
        }

        let dim0s = to_cartesian(manifest.axis(0)?, &query.dim0s)?;
        let dim1s = to_cartesian(manifest.axis(1)?, &query.dim1s)?;

        let gvt = geometry(manifest, query.attrs.shape)?;
        let zfrags = gvt.fragment_count(gvt.mkdim(2)?);
        let frag = gvt.fragment_shape();

        // A depthless survey has no fragments to fetch. The path still
        // translates; the id list is just empty.
        if zfrags == 0 {
            return Ok(CurtainFetch {
                attrs: query.attrs.clone(),
                dim0s,
                dim1s,
                ids: Vec::new(),
            });
        }

        /*
         * Guess the number of coordinates per fragment. A reasonable
         * assumption is a plane going through a fragment, with a little bit
         * of margin. Not pre-reserving is perfectly fine, but guessing well
         * saves a bunch of allocations in the average case.
         */
        let approx_coordinates_per_fragment = (frag[0].max(frag[1]) as f64 * 1.2) as usize;

        /*
         * Pass 1: materialize the buckets by scanning the input, sorted by id
         * lexicographically. All fragments in the column (z-axis) are
         * generated from the x-y pair at once, so each distinct column exists
         * exactly once no matter how many path points map to it.
         *
         * This is effectively
         *   ids = set(frag_id(x, y, z) for z in 0..zfrags for (x, y) in input)
         * but without any intermediary structures. Fixing bucket identity and
         * order before any coordinate is appended means pass 2 never moves a
         * bucket that already holds data.
         */
        let mut ids: Vec<FragmentBucket> = Vec::new();
        for (&x, &y) in dim0s.iter().zip(&dim1s) {
            let fid = gvt.frag_id([x, y, 0]);
            if let Err(pos) = ids.binary_search_by(|bucket| bucket.id.cmp(&fid)) {
                let run = (0..zfrags).map(|z| FragmentBucket {
                    id: FragmentId([fid.index(0), fid.index(1), z]),
                    coordinates: Vec::with_capacity(approx_coordinates_per_fragment),
                });
                ids.splice(pos..pos, run);
            }
        }

        /*
         * Pass 2: traverse the path again and record every point's local
         * offset in the correct bin. The same trace position goes into every
         * bucket of its z-run, since the full column must be fetched.
         */
        for (&x, &y) in dim0s.iter().zip(&dim1s) {
            let point = [x, y, 0];
            let fid = gvt.frag_id(point);
            let local = gvt.to_local(point);

            let pos = ids
                .binary_search_by(|bucket| bucket.id.cmp(&fid))
                .map_err(|_| {
                    StrataError::Internal(format!("no bucket run for fragment {:?}", fid))
                })?;
            for bucket in &mut ids[pos..pos + zfrags] {
                bucket.coordinates.push([local[0], local[1]]);
            }
        }

        Ok(CurtainFetch {
            attrs: query.attrs.clone(),
            dim0s,
            dim1s,
            ids,
        })
    }

    fn header(
        &self,
        query: &CurtainQuery,
        manifest: &Manifest,
        ntasks: usize,
    ) -> Result<ProcessHeader, StrataError> {
        let gvt = geometry(manifest, query.attrs.shape)?;
        let zpad = gvt.nsamples_padded(gvt.mkdim(gvt.ndims() - 1)?);

        // One trace per path point, each spanning the padded depth.
        let shape = vec![query.dim0s.len(), zpad];

        let as_index = |xs: Vec<usize>| -> Vec<i64> { xs.into_iter().map(|x| x as i64).collect() };
        let index = vec![
            as_index(to_cartesian(manifest.axis(0)?, &query.dim0s)?),
            as_index(to_cartesian(manifest.axis(1)?, &query.dim1s)?),
            // depth is always the trailing axis, whatever the axis count
            manifest.axis(manifest.ndims() - 1)?.to_vec(),
        ];

        Ok(ProcessHeader {
            pid: query.attrs.pid.clone(),
            ntasks,
            shape,
            index,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manifest() -> Manifest {
        Manifest {
            dimensions: vec![
                vec![1, 2, 3, 4],
                vec![10, 20, 30, 40],
                vec![100, 200, 300],
            ],
        }
    }

    fn query(dim0s: Vec<i64>, dim1s: Vec<i64>) -> CurtainQuery {
        CurtainQuery {
            attrs: QueryAttributes {
                pid: "pid".into(),
                function: "curtain".into(),
                shape: [2, 2, 2],
                manifest: String::new(),
                ..Default::default()
            },
            dim0s,
            dim1s,
        }
    }

    #[test]
    fn test_build_creates_one_z_run_per_distinct_column() {
        // (1,10) and (2,20) share fragment column (0,0); (3,30) is in (1,1).
        // Depth is 3 samples in fragments of 2, so Z = 2.
        let fetch = CurtainEndpoint
            .build(&query(vec![1, 2, 3], vec![10, 20, 30]), &manifest())
            .unwrap();

        let got: Vec<FragmentId> = fetch.ids.iter().map(|b| b.id).collect();
        assert_eq!(
            got,
            vec![
                FragmentId([0, 0, 0]),
                FragmentId([0, 0, 1]),
                FragmentId([1, 1, 0]),
                FragmentId([1, 1, 1]),
            ]
        );
    }

    #[test]
    fn test_build_records_each_point_in_every_bucket_of_its_column() {
        let fetch = CurtainEndpoint
            .build(&query(vec![1, 2, 3], vec![10, 20, 30]), &manifest())
            .unwrap();

        // Column (0,0) holds the first two points at local offsets (0,0) and
        // (1,1); column (1,1) holds the third at (0,0). Both depth fragments
        // of a column carry identical coordinate lists.
        assert_eq!(fetch.ids[0].coordinates, vec![[0, 0], [1, 1]]);
        assert_eq!(fetch.ids[1].coordinates, vec![[0, 0], [1, 1]]);
        assert_eq!(fetch.ids[2].coordinates, vec![[0, 0]]);
        assert_eq!(fetch.ids[3].coordinates, vec![[0, 0]]);

        assert_eq!(fetch.dim0s, vec![0, 1, 2]);
        assert_eq!(fetch.dim1s, vec![0, 1, 2]);
    }

    #[test]
    fn test_build_bucket_ids_are_unique_and_sorted() {
        let fetch = CurtainEndpoint
            .build(
                &query(vec![4, 1, 3, 2, 1], vec![40, 10, 30, 20, 10]),
                &manifest(),
            )
            .unwrap();

        let ids: Vec<FragmentId> = fetch.ids.iter().map(|b| b.id).collect();
        let mut deduped = ids.clone();
        deduped.sort();
        deduped.dedup();
        assert_eq!(ids, deduped);
    }

    #[test]
    fn test_build_repeated_point_appends_per_occurrence() {
        let fetch = CurtainEndpoint
            .build(&query(vec![1, 1], vec![10, 10]), &manifest())
            .unwrap();

        // One column, materialized once, with the trace recorded twice.
        assert_eq!(fetch.ids.len(), 2);
        assert_eq!(fetch.ids[0].coordinates, vec![[0, 0], [0, 0]]);
    }

    #[test]
    fn test_build_distinct_columns_times_zfrags_is_bucket_count() {
        let fetch = CurtainEndpoint
            .build(&query(vec![1, 1, 4], vec![10, 20, 40]), &manifest())
            .unwrap();
        // (1,10) and (1,20) land in column (0,0); (4,40) in (1,1).
        // Two distinct columns, Z = 2.
        assert_eq!(fetch.ids.len(), 2 * 2);
    }

    #[test]
    fn test_build_rejects_unknown_label() {
        let err = CurtainEndpoint
            .build(&query(vec![1], vec![99]), &manifest())
            .unwrap_err();
        assert!(matches!(err, StrataError::NotFound(_)));
    }

    #[test]
    fn test_build_rejects_mismatched_path_lengths() {
        let err = CurtainEndpoint
            .build(&query(vec![1, 2], vec![10]), &manifest())
            .unwrap_err();
        assert!(matches!(err, StrataError::Config(_)));
    }

    #[test]
    fn test_build_empty_path_yields_no_buckets() {
        let fetch = CurtainEndpoint
            .build(&query(vec![], vec![]), &manifest())
            .unwrap();
        assert!(fetch.ids.is_empty());
    }

    #[test]
    fn test_build_depthless_survey_yields_no_buckets() {
        let manifest = Manifest {
            dimensions: vec![vec![1, 2], vec![10, 20], vec![]],
        };
        let fetch = CurtainEndpoint
            .build(&query(vec![1, 2], vec![10, 20]), &manifest)
            .unwrap();
        assert!(fetch.ids.is_empty());
        // the path itself still translates
        assert_eq!(fetch.dim0s, vec![0, 1]);
        assert_eq!(fetch.dim1s, vec![0, 1]);
    }

    #[test]
    fn test_header_depth_index_is_the_trailing_axis() {
        // four axes: depth labels are the last entry, not the third
        let manifest = Manifest {
            dimensions: vec![
                vec![1, 2, 3, 4],
                vec![10, 20, 30, 40],
                vec![7, 8],
                vec![100, 200, 300],
            ],
        };
        let head = CurtainEndpoint
            .header(&query(vec![1], vec![10]), &manifest, 1)
            .unwrap();
        assert_eq!(head.index[2], vec![100, 200, 300]);
    }

    #[test]
    fn test_header_shape_is_path_length_by_padded_depth() {
        let head = CurtainEndpoint
            .header(&query(vec![1, 2, 3], vec![10, 20, 30]), &manifest(), 4)
            .unwrap();

        assert_eq!(head.ntasks, 4);
        // 3 samples of depth padded up to 2 whole fragments of 2
        assert_eq!(head.shape, vec![3, 4]);
        assert_eq!(
            head.index,
            vec![vec![0, 1, 2], vec![0, 1, 2], vec![100, 200, 300]]
        );
    }
}
