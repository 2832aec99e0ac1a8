// src/batch.rs
//
// Independent records share nothing, so each one is its own rayon task.

use log::debug;
use rayon::prelude::*;

use crate::error::Result;
use crate::protocol::{reconstruct, Reconstruction, ReconstructOptions};
use crate::types::ShareRecord;

/// Reconstruct every record in parallel. Results keep the input order.
pub fn reconstruct_all(
    records: &[ShareRecord],
    opts: &ReconstructOptions,
) -> Vec<Result<Reconstruction>> {
    debug!(
        target: "batch",
        "reconstructing {} record(s) on {} thread(s)",
        records.len(),
        rayon::current_num_threads()
    );
    records.par_iter().map(|r| reconstruct(r, opts)).collect()
}
