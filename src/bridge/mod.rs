// ====================================================================================
// ARCHITECTURAL OVERVIEW: The Bridge Layer
// ====================================================================================
//
// The `bridge` is the sole public-facing API of the strata scheduling
// library. It encapsulates the pure scheduling engine behind a byte-oriented
// boundary: the service layer hands in an opaque request document, and gets
// back opaque task blobs to forward to workers.
//
// Data flow:
//
//   1. [Service layer]              -> request document (JSON bytes) + task size
//         |
//   2. [Dispatcher (mkschedule)]    -> peeks the `function` field only
//         |
//         `-> selects the matching endpoint and runs the shared skeleton:
//             decode -> build -> partition -> header
//         |
//   3. [Scheduling engine]          -> Vec of task blobs, header last
//
// The two-phase parse in step 2 is what keeps the engine free of a single
// polymorphic request type: the full typed body is only decoded once the kind
// is known.
//
// ====================================================================================
pub mod stateless_api;

pub use stateless_api::{init_logging, mkschedule};
