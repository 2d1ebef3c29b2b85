/// Learning rate, either constant or a function of training progress.
///
/// The schedule receives the remaining-progress fraction, going from 1.0 at
/// the start of training to 0.0 at the timestep budget.
#[derive(Clone, Copy)]
pub enum LearningRate {
    Constant(f32),
    Schedule(fn(f32) -> f32),
}

impl LearningRate {
    pub fn value(&self, progress_remaining: f32) -> f32 {
        match self {
            LearningRate::Constant(lr) => *lr,
            LearningRate::Schedule(f) => f(progress_remaining),
        }
    }
}

impl Default for LearningRate {
    fn default() -> Self {
        LearningRate::Constant(1e-3)
    }
}
