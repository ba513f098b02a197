//! `driftcast simulate` — trajectories only, no analysis.

use std::fs;
use std::path::Path;

use driftcast_core::write_trajectories_csv;

use super::{build_scenario, fail};
use crate::SimArgs;

pub fn run(args: &SimArgs, out: &Path) {
    let (_, schedule, transition, set) = build_scenario(args);

    if let Err(err) = fs::create_dir_all(out) {
        fail(err.into());
    }
    let path = out.join("trajectories.csv");
    if let Err(err) = write_trajectories_csv(&set, &path) {
        fail(err);
    }

    let samples: usize = set.iter().map(|t| t.len()).sum();
    println!(
        "Wrote {} samples across {} realization(s) to {} (schedule crosses critical at t = {:.2}, control ends at {:.3})",
        samples,
        set.len(),
        path.display(),
        transition,
        schedule.values().last().copied().unwrap_or_default()
    );
}
