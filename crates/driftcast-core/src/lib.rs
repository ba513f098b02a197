//! # driftcast-core
//!
//! Simulation-and-orchestration engine for early-warning-signal (EWS)
//! studies of slow drifts through a bifurcation: a seeded Euler–Maruyama
//! integrator produces pre-transition trajectories under a piecewise,
//! state-dependent drift, and the pipeline layer slices them, invokes an EWS
//! analysis collaborator per realization, and assembles the resulting
//! artifacts into queryable multi-indexed tables.
//!
//! ## Quick start
//!
//! ```no_run
//! use driftcast_core::{
//!     ControlSchedule, FoldDrift, NoiseGenerator, SimConfig, simulate_ensemble,
//! };
//!
//! let config = SimConfig {
//!     dt: 0.01,
//!     t0: 0.0,
//!     t_max: 500.0,
//!     burn_in: 100.0,
//!     sigma: 0.1,
//!     x0: FoldDrift::equilibrium(-1.0),
//! };
//! let schedule = ControlSchedule::linear(config.grid().unwrap(), -1.0, 0.2);
//! let mut noise = NoiseGenerator::new(2);
//!
//! let set = simulate_ensemble(
//!     &config,
//!     10,
//!     "x",
//!     &FoldDrift::default(),
//!     &schedule,
//!     &mut noise,
//! )
//! .unwrap();
//! assert_eq!(set.len(), 10);
//! ```
//!
//! ## Architecture
//!
//! Simulator → Aggregator → Orchestrator → EWS collaborator → Assembler
//!
//! Everything runs sequentially off one explicitly owned noise stream, so a
//! fixed seed reproduces every trajectory and every downstream table row
//! bit-for-bit. The EWS analysis itself sits behind the [`EwsAnalyzer`]
//! trait; `driftcast-ews` ships the spectral implementation.

pub mod ensemble;
pub mod error;
pub mod ews;
pub mod export;
pub mod grid;
pub mod model;
pub mod noise;
pub mod pipeline;
pub mod schedule;
pub mod simulate;
pub mod table;

pub use ensemble::{RealizationSet, Trajectory, simulate_ensemble};
pub use error::{BoxError, Error, Result};
pub use ews::{
    EwsAnalyzer, EwsBundle, EwsConfig, Metric, MetricsRow, SpectrumRow, TrendStat, TrendStats,
    lag_label,
};
pub use export::{
    write_empirical_spectra_csv, write_metrics_csv, write_trajectories_csv, write_trend_csv,
};
pub use grid::TimeGrid;
pub use model::{Drift, FoldDrift};
pub use noise::NoiseGenerator;
pub use pipeline::{EwsTables, PipelineConfig, run_ews_pipeline};
pub use schedule::ControlSchedule;
pub use simulate::{SimConfig, simulate};
pub use table::{MetricsKey, Ordered, SeriesKey, SpectrumKey, Table, TableKey};

/// Library version (from Cargo.toml).
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
