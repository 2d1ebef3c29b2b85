use nets::{Activation, Adam, Grads, Mlp};
use rand::rngs::StdRng;
use rand_distr::{Distribution, StandardNormal};

use crate::buffer::ReplayBuffer;
use crate::callback::Callback;
use crate::collector::collect_rollouts;
use crate::env::Env;
use crate::error::ConfigError;
use crate::noise::ActionNoise;

/// Hyperparameters for the [`Td3`] trainer.
#[derive(Clone, Debug)]
pub struct Td3Config {
    pub learning_rate: f32,
    pub gamma: f32,
    pub tau: f32,
    pub policy_delay: usize,
    pub target_policy_noise: f32,
    pub target_noise_clip: f32,
    pub batch_size: usize,
    /// Hidden layer sizes shared by actor and critics.
    pub hidden: Vec<usize>,
}

impl Default for Td3Config {
    fn default() -> Self {
        Self {
            learning_rate: 1e-3,
            gamma: 0.99,
            tau: 0.005,
            policy_delay: 2,
            target_policy_noise: 0.2,
            target_noise_clip: 0.5,
            batch_size: 100,
            hidden: vec![64, 64],
        }
    }
}

/// Twin-delayed actor-critic trainer.
///
/// Owns one live actor/critic set plus target copies. The actor weights are
/// deliberately a single shared resource: the CEM-RL orchestrator overwrites
/// them once per population member and reads them back after training.
pub struct Td3 {
    pub actor: Mlp,
    actor_target: Mlp,
    critic_1: Mlp,
    critic_2: Mlp,
    critic_1_target: Mlp,
    critic_2_target: Mlp,
    actor_opt: Adam,
    critic_1_opt: Adam,
    critic_2_opt: Adam,
    obs_dim: usize,
    pub config: Td3Config,
    /// Completed critic gradient iterations.
    pub critic_grad_steps: usize,
    /// Completed actor gradient iterations.
    pub actor_grad_steps: usize,
}

impl Td3 {
    pub fn new(obs_dim: usize, action_dim: usize, config: Td3Config) -> Result<Self, ConfigError> {
        if config.batch_size == 0 {
            return Err(ConfigError::ZeroBatchSize);
        }
        if config.policy_delay == 0 {
            return Err(ConfigError::ZeroPolicyDelay);
        }

        let mut actor_sizes = vec![obs_dim];
        actor_sizes.extend_from_slice(&config.hidden);
        actor_sizes.push(action_dim);
        let mut critic_sizes = vec![obs_dim + action_dim];
        critic_sizes.extend_from_slice(&config.hidden);
        critic_sizes.push(1);

        let actor = Mlp::new(&actor_sizes, Activation::Relu, Activation::Tanh);
        let critic_1 = Mlp::new(&critic_sizes, Activation::Relu, Activation::Linear);
        let critic_2 = Mlp::new(&critic_sizes, Activation::Relu, Activation::Linear);

        let actor_opt = Adam::new(config.learning_rate, &actor.param_sizes());
        let critic_1_opt = Adam::new(config.learning_rate, &critic_1.param_sizes());
        let critic_2_opt = Adam::new(config.learning_rate, &critic_2.param_sizes());

        Ok(Self {
            actor_target: actor.clone(),
            critic_1_target: critic_1.clone(),
            critic_2_target: critic_2.clone(),
            actor,
            critic_1,
            critic_2,
            actor_opt,
            critic_1_opt,
            critic_2_opt,
            obs_dim,
            config,
            critic_grad_steps: 0,
            actor_grad_steps: 0,
        })
    }

    /// Flat parameter vector of the live actor.
    pub fn actor_vector(&self) -> Vec<f32> {
        self.actor.to_vector()
    }

    /// Flat parameter vector of the actor target.
    pub fn actor_target_vector(&self) -> Vec<f32> {
        self.actor_target.to_vector()
    }

    /// Overwrites the live actor only. Used during evaluation rollouts.
    pub fn load_actor(&mut self, vector: &[f32]) {
        self.actor.load_from_vector(vector);
    }

    /// Overwrites the live actor and the actor target. Used before gradient
    /// updates so the individual starts from a consistent pair.
    pub fn load_actor_vector(&mut self, vector: &[f32]) {
        self.actor.load_from_vector(vector);
        self.actor_target.load_from_vector(vector);
    }

    /// Replaces the actor optimizer with a fresh one.
    ///
    /// The CEM-RL orchestrator calls this per gradient-updated individual so
    /// each one is descended with clean moment estimates instead of being
    /// warm-started from whichever individual trained before it.
    pub fn reset_actor_optimizer(&mut self, lr: f32) {
        self.actor_opt = Adam::new(lr, &self.actor.param_sizes());
    }

    pub fn critic_value(&self, obs: &[f32], action: &[f32]) -> f32 {
        let mut input = obs.to_vec();
        input.extend_from_slice(action);
        self.critic_1.forward(&input)[0]
    }

    /// Mean squared error of critic 1 against the TD3 target on a batch.
    /// Diagnostic only, no gradients.
    pub fn critic_loss(&self, buffer: &ReplayBuffer, batch_size: usize, rng: &mut StdRng) -> f32 {
        let batch = buffer.sample(batch_size, rng);
        let mut loss = 0.0;
        for j in 0..batch.len() {
            let y = self.td_target(&batch.next_obs[j], batch.rewards[j], batch.dones[j], rng);
            let mut input = batch.obs[j].clone();
            input.extend_from_slice(&batch.actions[j]);
            let q = self.critic_1.forward(&input)[0];
            loss += (q - y) * (q - y);
        }
        loss / batch.len() as f32
    }

    fn td_target(&self, next_obs: &[f32], reward: f32, done: f32, rng: &mut StdRng) -> f32 {
        let clip = self.config.target_noise_clip;
        let mut next_action = self.actor_target.forward(next_obs);
        for a in next_action.iter_mut() {
            let z: f32 = StandardNormal.sample(rng);
            let eps = z * self.config.target_policy_noise;
            *a = (*a + eps.clamp(-clip, clip)).clamp(-1.0, 1.0);
        }
        let mut input = next_obs.to_vec();
        input.extend_from_slice(&next_action);
        let q1 = self.critic_1_target.forward(&input)[0];
        let q2 = self.critic_2_target.forward(&input)[0];
        reward + self.config.gamma * (1.0 - done) * q1.min(q2)
    }

    /// Runs `n_iterations` critic gradient steps.
    ///
    /// Each iteration samples a fresh batch, regresses both critics towards
    /// the smoothed twin target, and soft-updates the critic targets by
    /// `tau`. With `tau == 0` the targets are left unchanged (sync deferred
    /// to the actor step).
    pub fn train_critic(
        &mut self,
        n_iterations: usize,
        buffer: &ReplayBuffer,
        tau: f32,
        rng: &mut StdRng,
    ) {
        if buffer.is_empty() {
            return;
        }
        for _ in 0..n_iterations {
            let batch = buffer.sample(self.config.batch_size, rng);
            let n = batch.len() as f32;

            let targets: Vec<f32> = (0..batch.len())
                .map(|j| self.td_target(&batch.next_obs[j], batch.rewards[j], batch.dones[j], rng))
                .collect();

            let mut grads_1 = Grads::zeros_like(&self.critic_1);
            let mut grads_2 = Grads::zeros_like(&self.critic_2);
            for j in 0..batch.len() {
                let mut input = batch.obs[j].clone();
                input.extend_from_slice(&batch.actions[j]);

                let (q1, cache_1) = self.critic_1.forward_cached(&input);
                let g1 = 2.0 * (q1[0] - targets[j]) / n;
                let (_, sample_grads) = self.critic_1.backward(&cache_1, &[g1]);
                grads_1.add(&sample_grads);

                let (q2, cache_2) = self.critic_2.forward_cached(&input);
                let g2 = 2.0 * (q2[0] - targets[j]) / n;
                let (_, sample_grads) = self.critic_2.backward(&cache_2, &[g2]);
                grads_2.add(&sample_grads);
            }
            self.critic_1_opt.step_mlp(&mut self.critic_1, &grads_1);
            self.critic_2_opt.step_mlp(&mut self.critic_2, &grads_2);

            if tau > 0.0 {
                soft_update(&mut self.critic_1_target, &self.critic_1, tau);
                soft_update(&mut self.critic_2_target, &self.critic_2, tau);
            }
            self.critic_grad_steps += 1;
        }
    }

    /// Runs `n_iterations` actor gradient-ascent steps on `Q1(s, pi(s))`.
    ///
    /// Soft-updates the actor target by `tau_actor` and the critic targets
    /// by `tau_critic` after every iteration; a zero tau skips the
    /// corresponding sync. Policy delay is applied by the caller's pacing
    /// loop, not here.
    pub fn train_actor(
        &mut self,
        n_iterations: usize,
        buffer: &ReplayBuffer,
        tau_actor: f32,
        tau_critic: f32,
        rng: &mut StdRng,
    ) {
        if buffer.is_empty() {
            return;
        }
        for _ in 0..n_iterations {
            let batch = buffer.sample(self.config.batch_size, rng);
            let n = batch.len() as f32;

            let mut grads = Grads::zeros_like(&self.actor);
            for j in 0..batch.len() {
                let (action, actor_cache) = self.actor.forward_cached(&batch.obs[j]);
                let mut input = batch.obs[j].clone();
                input.extend_from_slice(&action);

                let (_, critic_cache) = self.critic_1.forward_cached(&input);
                let (input_grad, _) = self.critic_1.backward(&critic_cache, &[1.0]);
                // Maximize Q: descend on -Q, so flip the action gradient.
                let out_grad: Vec<f32> =
                    input_grad[self.obs_dim..].iter().map(|g| -g / n).collect();

                let (_, sample_grads) = self.actor.backward(&actor_cache, &out_grad);
                grads.add(&sample_grads);
            }
            self.actor_opt.step_mlp(&mut self.actor, &grads);

            if tau_actor > 0.0 {
                soft_update(&mut self.actor_target, &self.actor, tau_actor);
            }
            if tau_critic > 0.0 {
                soft_update(&mut self.critic_1_target, &self.critic_1, tau_critic);
                soft_update(&mut self.critic_2_target, &self.critic_2, tau_critic);
            }
            self.actor_grad_steps += 1;
        }
    }

    /// Standalone TD3 training loop (no evolutionary search).
    ///
    /// Collects one rollout at a time, then runs as many critic iterations
    /// as steps were collected, with policy-delayed actor/target updates.
    pub fn learn<E: Env>(
        &mut self,
        env: &mut E,
        buffer: &mut ReplayBuffer,
        total_timesteps: usize,
        learning_starts: usize,
        mut noise: Option<Box<dyn ActionNoise>>,
        callback: &mut dyn Callback,
        rng: &mut StdRng,
    ) -> usize {
        let mut num_timesteps = 0;
        callback.on_training_start();

        while num_timesteps < total_timesteps {
            let rollout = collect_rollouts(
                &self.actor,
                env,
                1,
                noise.as_deref_mut(),
                buffer,
                learning_starts,
                &mut num_timesteps,
                callback,
            );
            if !rollout.continue_training {
                break;
            }
            tracing::debug!(
                num_timesteps,
                episode_reward = rollout.episode_reward,
                "td3 rollout complete"
            );

            if num_timesteps >= learning_starts {
                for it in 0..rollout.episode_timesteps {
                    self.train_critic(1, buffer, 0.0, rng);
                    if it % self.config.policy_delay == 0 {
                        self.train_actor(1, buffer, self.config.tau, self.config.tau, rng);
                    }
                }
            }
        }

        callback.on_training_end();
        num_timesteps
    }
}

/// Polyak averaging: `target = tau * live + (1 - tau) * target`.
pub fn soft_update(target: &mut Mlp, live: &Mlp, tau: f32) {
    let live_vec = live.to_vector();
    let mut target_vec = target.to_vector();
    for (t, l) in target_vec.iter_mut().zip(&live_vec) {
        *t = tau * l + (1.0 - tau) * *t;
    }
    target.load_from_vector(&target_vec);
}
