//! Off-policy and evolutionary reinforcement-learning training loops.
//!
//! The centre of the crate is [`CemRl`], which interleaves Cross-Entropy
//! Method search over actor parameter vectors with TD3 gradient updates for
//! part of the population. The surrounding pieces — environments, replay
//! buffer, action noise, rollout collection, callbacks — are narrow
//! interfaces the training loops are composed from.

pub mod buffer;
pub mod callback;
pub mod cem_rl;
pub mod collector;
pub mod env;
pub mod error;
pub mod noise;
pub mod pacing;
pub mod ppo;
pub mod schedule;
pub mod td3;

pub use buffer::{Batch, ReplayBuffer};
pub use callback::{Callback, CheckpointCallback, NoopCallback, StopTrainingCallback};
pub use cem_rl::{CemRl, CemRlConfig, CemRlStats};
pub use collector::{collect_rollouts, Rollout};
pub use env::{Env, PointMassEnv};
pub use error::ConfigError;
pub use noise::{ActionNoise, GaussianActionNoise, OrnsteinUhlenbeckNoise};
pub use pacing::UpdateStyle;
pub use ppo::Ppo;
pub use schedule::LearningRate;
pub use td3::{Td3, Td3Config};
