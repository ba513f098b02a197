//! Subcommand implementations.

pub mod run;
pub mod simulate;

use std::error::Error as _;

use driftcast_core::{
    ControlSchedule, Error, FoldDrift, NoiseGenerator, RealizationSet, SimConfig,
    simulate_ensemble,
};

use crate::SimArgs;

/// Name of the simulated state variable in every exported artifact.
pub const VARIABLE: &str = "x";

/// Print a pipeline error and exit.
pub fn fail(err: Error) -> ! {
    eprintln!("Error: {err}");
    let mut source = err.source();
    while let Some(cause) = source {
        eprintln!("  caused by: {cause}");
        source = cause.source();
    }
    std::process::exit(1);
}

/// Build the fold scenario and simulate its realization set.
pub fn build_scenario(args: &SimArgs) -> (SimConfig, ControlSchedule, f64, RealizationSet) {
    let config = SimConfig {
        dt: args.dt,
        t0: args.t0,
        t_max: args.tmax,
        burn_in: args.burn_in,
        sigma: args.sigma,
        x0: FoldDrift::equilibrium(args.control_from),
    };
    let grid = match config.grid() {
        Ok(grid) => grid,
        Err(err) => fail(err),
    };

    let schedule = ControlSchedule::linear(grid, args.control_from, args.control_to);
    let transition = match schedule.transition_time(args.critical) {
        Some(t) => t,
        None => fail(Error::invalid_config(format!(
            "control schedule [{}, {}] never exceeds the critical value {}",
            args.control_from, args.control_to, args.critical
        ))),
    };

    println!(
        "Simulating {} realization(s): dt={}, horizon=[{}, {}), burn-in={}, sigma={}, seed={}",
        args.sims, args.dt, args.t0, args.tmax, args.burn_in, args.sigma, args.seed
    );

    let mut noise = NoiseGenerator::new(args.seed);
    let set = match simulate_ensemble(
        &config,
        args.sims,
        VARIABLE,
        &FoldDrift::default(),
        &schedule,
        &mut noise,
    ) {
        Ok(set) => set,
        Err(err) => fail(err),
    };

    (config, schedule, transition, set)
}
