//! # CERL Runtime
//!
//! Entry point for the CERL training binary.
//!
//! Ties together the evolutionary search, the TD3 gradient trainer and the
//! built-in point-mass environment behind a command-line surface. Run with
//! `--algo cem-rl` (the default) for the combined loop, or `--algo td3` /
//! `--algo ppo` for the plain agents.

mod run;

use anyhow::Result;
use clap::{Parser, ValueEnum};
use rl::UpdateStyle;

#[derive(Clone, Copy, Debug, ValueEnum)]
pub(crate) enum Algo {
    CemRl,
    Td3,
    Ppo,
}

/// Command-line configuration for a training run.
#[derive(Parser, Debug)]
#[command(name = "cerl", about = "Evolutionary reinforcement-learning trainer")]
pub(crate) struct Args {
    /// Training algorithm.
    #[arg(long, value_enum, default_value_t = Algo::CemRl)]
    pub(crate) algo: Algo,

    /// Total environment-step budget.
    #[arg(long, default_value_t = 30_000)]
    pub(crate) timesteps: usize,

    /// Population size for the evolutionary search.
    #[arg(long, default_value_t = 10)]
    pub(crate) pop_size: usize,

    /// Number of population members receiving gradient updates.
    #[arg(long, default_value_t = 5)]
    pub(crate) n_grad: usize,

    /// Gradient pacing: original, original_td3, td3_like or other.
    #[arg(long, default_value = "original")]
    pub(crate) update_style: UpdateStyle,

    /// Initial variance of the search distribution.
    #[arg(long, default_value_t = 1e-3)]
    pub(crate) sigma_init: f32,

    /// Keep the best individual ever seen in every population.
    #[arg(long)]
    pub(crate) elitism: bool,

    /// Episodes collected per individual during evaluation.
    #[arg(long, default_value_t = 1)]
    pub(crate) episodes: usize,

    /// Adam learning rate.
    #[arg(long, default_value_t = 1e-3)]
    pub(crate) lr: f32,

    /// Episode length of the point-mass environment.
    #[arg(long, default_value_t = 200)]
    pub(crate) horizon: usize,

    /// If set, the best parameter vector is checkpointed here as JSON.
    #[arg(long)]
    pub(crate) checkpoint: Option<std::path::PathBuf>,

    #[arg(long, default_value_t = 0)]
    pub(crate) seed: u64,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let args = Args::parse();
    tracing::info!(algo = ?args.algo, timesteps = args.timesteps, "starting training");

    match args.algo {
        Algo::CemRl => run::cem_rl(&args),
        Algo::Td3 => run::td3(&args),
        Algo::Ppo => run::ppo(&args),
    }
}
