//! CLI for driftcast — drive a fold-bifurcation scenario end to end.

mod commands;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "driftcast")]
#[command(about = "driftcast — simulate slow drift through a fold bifurcation and compute its early warning signals")]
#[command(version = driftcast_core::VERSION)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Simulation parameters shared by every subcommand.
#[derive(clap::Args)]
struct SimArgs {
    /// Number of independent realizations
    #[arg(long, default_value_t = 1)]
    sims: u32,

    /// Random seed for the shared noise stream
    #[arg(long, default_value_t = 2)]
    seed: u64,

    /// Integration step
    #[arg(long, default_value_t = 0.01)]
    dt: f64,

    /// Start of the simulation horizon
    #[arg(long, default_value_t = 0.0)]
    t0: f64,

    /// End of the simulation horizon (exclusive)
    #[arg(long, default_value_t = 500.0)]
    tmax: f64,

    /// Burn-in duration discarded before the main phase
    #[arg(long, default_value_t = 100.0)]
    burn_in: f64,

    /// Noise intensity
    #[arg(long, default_value_t = 0.1)]
    sigma: f64,

    /// Initial control parameter value
    #[arg(long, default_value_t = -1.0)]
    control_from: f64,

    /// Final control parameter value
    #[arg(long, default_value_t = 0.2)]
    control_to: f64,

    /// Critical (bifurcation) value of the control parameter
    #[arg(long, default_value_t = 0.0)]
    critical: f64,
}

#[derive(Subcommand)]
enum Commands {
    /// Simulate realizations, run the EWS analysis, export all artifacts
    Run {
        #[command(flatten)]
        sim: SimArgs,

        /// Time spacing of the analyzed series (integer multiple of dt)
        #[arg(long, default_value_t = 1.0)]
        dt2: f64,

        /// Rolling window as a fraction of the analyzed series length
        #[arg(long, default_value_t = 0.4)]
        roll_window: f64,

        /// Detrending bandwidth as a fraction of the analyzed series length
        #[arg(long, default_value_t = 0.1)]
        band_width: f64,

        /// Comma-separated autocorrelation lags
        #[arg(long, default_value = "1,2,3", value_delimiter = ',')]
        lags: Vec<usize>,

        /// Points per Hamming window of the spectral estimate
        #[arg(long, default_value_t = 40)]
        ham_length: usize,

        /// Fraction of the Hamming window to advance between segments
        #[arg(long, default_value_t = 0.5)]
        ham_offset: f64,

        /// Samples between successive rolling spectra
        #[arg(long, default_value_t = 20)]
        pspec_roll_offset: usize,

        /// Output directory for CSV artifacts and the run manifest
        #[arg(long, default_value = "data_export")]
        out: std::path::PathBuf,
    },

    /// Simulate realizations and export the raw trajectories only
    Simulate {
        #[command(flatten)]
        sim: SimArgs,

        /// Output directory for the trajectory CSV
        #[arg(long, default_value = "data_export")]
        out: std::path::PathBuf,
    },
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            sim,
            dt2,
            roll_window,
            band_width,
            lags,
            ham_length,
            ham_offset,
            pspec_roll_offset,
            out,
        } => commands::run::run(
            &sim,
            dt2,
            roll_window,
            band_width,
            lags,
            ham_length,
            ham_offset,
            pspec_roll_offset,
            &out,
        ),
        Commands::Simulate { sim, out } => commands::simulate::run(&sim, &out),
    }
}
