/// Reinforcement learning environment trait.
///
/// Inspired by classic frameworks like OpenAI Gym. Each call to [`step`]
/// advances the simulation by one action and returns the new observation
/// vector, a reward signal, and whether the episode has terminated. Actions
/// are vectors with components in `[-1, 1]`.
///
/// [`step`]: Env::step
pub trait Env {
    /// Advance the environment by one action.
    ///
    /// Returns `(obs, reward, done)` where `obs` is the new observation
    /// vector, `reward` is the scalar reward, and `done` indicates episode
    /// termination.
    fn step(&mut self, action: &[f32]) -> (Vec<f32>, f32, bool);

    /// Reset the environment to its starting state and return the initial
    /// observation vector.
    fn reset(&mut self) -> Vec<f32>;

    /// Size of the observation vector.
    fn obs_size(&self) -> usize;

    /// Size of the action vector.
    fn action_size(&self) -> usize;
}

/// A 2-D point mass that must be driven to the origin.
///
/// Observations are `[pos, vel]`, actions are accelerations clamped to
/// `[-1, 1]` per axis. Reward is the negative distance to the origin, so
/// good policies reach it early and stay. Episodes run for a fixed
/// `horizon`.
pub struct PointMassEnv {
    pos: [f32; 2],
    vel: [f32; 2],
    steps: usize,
    horizon: usize,
}

impl PointMassEnv {
    pub fn new() -> Self {
        Self::with_horizon(200)
    }

    pub fn with_horizon(horizon: usize) -> Self {
        Self { pos: [0.0; 2], vel: [0.0; 2], steps: 0, horizon }
    }
}

impl Default for PointMassEnv {
    fn default() -> Self {
        Self::new()
    }
}

const DT: f32 = 0.1;
const DRAG: f32 = 0.95;

impl Env for PointMassEnv {
    fn step(&mut self, action: &[f32]) -> (Vec<f32>, f32, bool) {
        for i in 0..2 {
            let a = action[i].clamp(-1.0, 1.0);
            self.vel[i] = self.vel[i] * DRAG + a * DT;
            self.pos[i] += self.vel[i] * DT;
        }
        self.steps += 1;

        let dist = (self.pos[0].powi(2) + self.pos[1].powi(2)).sqrt();
        let reward = -dist;
        let done = self.steps >= self.horizon;
        (
            vec![self.pos[0], self.pos[1], self.vel[0], self.vel[1]],
            reward,
            done,
        )
    }

    fn reset(&mut self) -> Vec<f32> {
        self.pos = [
            fastrand::f32() * 2.0 - 1.0,
            fastrand::f32() * 2.0 - 1.0,
        ];
        self.vel = [0.0, 0.0];
        self.steps = 0;
        vec![self.pos[0], self.pos[1], 0.0, 0.0]
    }

    fn obs_size(&self) -> usize {
        4
    }

    fn action_size(&self) -> usize {
        2
    }
}
