//! Stateless public API over the scheduling engine.

use crate::error::StrataError;
use crate::messages::FunctionProbe;
use crate::schedule::{self, CurtainEndpoint, SliceEndpoint};

/// Compiles a request document into an ordered sequence of task blobs.
///
/// The final element is always the packed process header; consumers must
/// treat it as a terminator, not a task. Every call is a pure function of its
/// inputs and may run concurrently with any other call.
///
/// Errors are returned untranslated: `NotFound` for requests naming unknown
/// dimensions or line numbers, `Config` for a bad `task_size` or an
/// unsupported function, `Internal` for violated scheduler invariants.
pub fn mkschedule(doc: &[u8], task_size: usize) -> Result<Vec<Vec<u8>>, StrataError> {
    let probe: FunctionProbe = serde_json::from_slice(doc)?;
    log::debug!("scheduling function={} task_size={}", probe.function, task_size);

    let sched = match probe.function.as_str() {
        "slice" => schedule::schedule(&SliceEndpoint, doc, task_size),
        "curtain" => schedule::schedule(&CurtainEndpoint, doc, task_size),
        other => Err(StrataError::Config(format!(
            "no handler for function {}",
            other
        ))),
    }?;

    log::debug!("function={} ntasks={}", probe.function, sched.len() - 1);
    Ok(sched)
}

/// Initializes env_logger for embedders, tests and benches. Safe to call more
/// than once; later calls are no-ops.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(cfg!(test)).try_init();
}
