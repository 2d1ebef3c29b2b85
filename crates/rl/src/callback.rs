use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use serde::Serialize;

/// Lifecycle hooks invoked by the training loops.
///
/// `on_step` is the only cancellation point: returning `false` asks the
/// loop to stop, which the orchestrator honours by discarding the current
/// generation without a distribution update.
pub trait Callback {
    fn on_training_start(&mut self) {}

    /// Called once per environment step. Return `false` to stop training.
    fn on_step(&mut self, _num_timesteps: usize) -> bool {
        true
    }

    /// Called after each completed generation with the best individual.
    fn on_generation_end(
        &mut self,
        _generation: usize,
        _best_fitness: f32,
        _best_params: &[f32],
    ) {
    }

    fn on_training_end(&mut self) {}
}

/// Does nothing; the default collaborator.
pub struct NoopCallback;

impl Callback for NoopCallback {}

/// Stops training once a step budget is reached. Mostly test support.
pub struct StopTrainingCallback {
    pub max_steps: usize,
}

impl Callback for StopTrainingCallback {
    fn on_step(&mut self, num_timesteps: usize) -> bool {
        num_timesteps < self.max_steps
    }
}

#[derive(Serialize)]
struct Checkpoint<'a> {
    generation: usize,
    fitness: f32,
    params: &'a [f32],
}

/// Persists the best parameter vector as JSON every `save_freq` generations,
/// skipping save points whose generation did not improve on the best
/// fitness seen so far.
pub struct CheckpointCallback {
    path: PathBuf,
    save_freq: usize,
    best_fitness: f32,
}

impl CheckpointCallback {
    pub fn new(path: impl Into<PathBuf>, save_freq: usize) -> Self {
        Self { path: path.into(), save_freq: save_freq.max(1), best_fitness: f32::NEG_INFINITY }
    }
}

impl Callback for CheckpointCallback {
    fn on_generation_end(&mut self, generation: usize, best_fitness: f32, best_params: &[f32]) {
        let improved = best_fitness > self.best_fitness;
        if improved {
            self.best_fitness = best_fitness;
        }
        if generation % self.save_freq != 0 || !improved {
            return;
        }
        let checkpoint = Checkpoint { generation, fitness: best_fitness, params: best_params };
        match File::create(&self.path) {
            Ok(file) => {
                if let Err(e) = serde_json::to_writer(BufWriter::new(file), &checkpoint) {
                    tracing::warn!(error = %e, "failed to serialize checkpoint");
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, path = %self.path.display(), "failed to create checkpoint file");
            }
        }
    }
}
