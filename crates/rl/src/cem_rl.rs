use es::{Cem, CemConfig};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::buffer::ReplayBuffer;
use crate::callback::Callback;
use crate::collector::collect_rollouts;
use crate::env::Env;
use crate::error::ConfigError;
use crate::noise::ActionNoise;
use crate::pacing::{Pacing, UpdateStyle};
use crate::schedule::LearningRate;
use crate::td3::{Td3, Td3Config};

/// Configuration for [`CemRl`], fixed for the lifetime of a run.
#[derive(Clone)]
pub struct CemRlConfig {
    pub learning_rate: LearningRate,
    pub buffer_size: usize,
    pub learning_starts: usize,
    pub batch_size: usize,
    pub tau: f32,
    pub gamma: f32,
    /// Episodes collected per population member during evaluation.
    pub n_episodes_rollout: usize,
    pub policy_delay: usize,
    pub target_policy_noise: f32,
    pub target_noise_clip: f32,
    pub sigma_init: f32,
    pub pop_size: usize,
    pub damping_init: f32,
    pub damping_final: f32,
    pub elitism: bool,
    /// Number of population members receiving gradient updates each
    /// generation. Half the population in the paper; zero degenerates to
    /// pure evolutionary search.
    pub n_grad: usize,
    pub update_style: UpdateStyle,
    /// Hidden layer sizes for actor and critics.
    pub hidden: Vec<usize>,
    pub seed: u64,
}

impl Default for CemRlConfig {
    fn default() -> Self {
        Self {
            learning_rate: LearningRate::Constant(1e-3),
            buffer_size: 1_000_000,
            learning_starts: 100,
            batch_size: 100,
            tau: 0.005,
            gamma: 0.99,
            n_episodes_rollout: 1,
            policy_delay: 2,
            target_policy_noise: 0.2,
            target_noise_clip: 0.5,
            sigma_init: 1e-3,
            pop_size: 10,
            damping_init: 1e-3,
            damping_final: 1e-5,
            elitism: false,
            n_grad: 5,
            update_style: UpdateStyle::Original,
            hidden: vec![64, 64],
            seed: 0,
        }
    }
}

/// Counters exposed for tests and reporting.
#[derive(Clone, Copy, Debug, Default)]
pub struct CemRlStats {
    /// Completed generations (ask..tell cycles).
    pub generations: usize,
    /// Per-individual gradient phases run.
    pub grad_phases: usize,
    /// Rollout-collection calls.
    pub rollouts: usize,
    /// Distribution updates performed.
    pub tells: usize,
}

/// CEM-RL: Cross-Entropy-Method search over actor parameter vectors with
/// TD3 gradient updates applied to the first `n_grad` individuals of each
/// generation.
///
/// The trainer holds a single live actor/critic set that is overwritten per
/// individual; the load/train/evaluate/store cycle for each one completes
/// before the next begins, so the aliasing is controlled by this loop's
/// strictly sequential phases rather than by locks.
pub struct CemRl<E: Env> {
    env: E,
    td3: Td3,
    es: Cem,
    buffer: ReplayBuffer,
    noise: Option<Box<dyn ActionNoise>>,
    config: CemRlConfig,
    num_timesteps: usize,
    progress_remaining: f32,
    rng: StdRng,
    stats: CemRlStats,
}

impl<E: Env> CemRl<E> {
    pub fn new(
        env: E,
        noise: Option<Box<dyn ActionNoise>>,
        config: CemRlConfig,
    ) -> Result<Self, ConfigError> {
        if config.pop_size == 0 {
            return Err(ConfigError::ZeroPopulation);
        }
        if config.n_grad > config.pop_size {
            return Err(ConfigError::GradExceedsPopulation {
                n_grad: config.n_grad,
                pop_size: config.pop_size,
            });
        }

        fastrand::seed(config.seed);
        let td3 = Td3::new(
            env.obs_size(),
            env.action_size(),
            Td3Config {
                learning_rate: config.learning_rate.value(1.0),
                gamma: config.gamma,
                tau: config.tau,
                policy_delay: config.policy_delay,
                target_policy_noise: config.target_policy_noise,
                target_noise_clip: config.target_noise_clip,
                batch_size: config.batch_size,
                hidden: config.hidden.clone(),
            },
        )?;

        // The search distribution starts centred on the freshly initialized
        // actor.
        let es = Cem::new(
            td3.actor_vector(),
            &CemConfig {
                sigma_init: config.sigma_init,
                damping_init: config.damping_init,
                damping_final: config.damping_final,
                pop_size: config.pop_size,
                parents: None,
                elitism: config.elitism,
                seed: config.seed,
            },
        );

        let buffer = ReplayBuffer::new(config.buffer_size);
        let rng = StdRng::seed_from_u64(config.seed.wrapping_add(1));

        Ok(Self {
            env,
            td3,
            es,
            buffer,
            noise,
            config,
            num_timesteps: 0,
            progress_remaining: 1.0,
            rng,
            stats: CemRlStats::default(),
        })
    }

    /// Runs the generation loop until the timestep budget is exhausted or
    /// the callback aborts training.
    pub fn learn(&mut self, total_timesteps: usize, callback: &mut dyn Callback) -> anyhow::Result<()> {
        let mut actor_steps = 0;
        callback.on_training_start();

        while self.num_timesteps < total_timesteps {
            let mut population = self.es.ask(self.config.pop_size);
            let mut fitnesses = Vec::with_capacity(population.len());

            // Gradient phase. Skipped on the very first generation: no
            // transitions exist yet and actor_steps is still zero.
            if self.num_timesteps > 0 {
                for individual in population.iter_mut().take(self.config.n_grad) {
                    self.gradient_phase(individual, actor_steps);
                }
            }

            // Evaluation phase: every individual, gradient-updated or not,
            // runs rollouts with the single shared actor.
            actor_steps = 0;
            let mut continue_training = true;
            for params in &population {
                self.td3.load_actor(params);
                let rollout = collect_rollouts(
                    &self.td3.actor,
                    &mut self.env,
                    self.config.n_episodes_rollout,
                    self.noise.as_deref_mut(),
                    &mut self.buffer,
                    self.config.learning_starts,
                    &mut self.num_timesteps,
                    callback,
                );
                self.stats.rollouts += 1;

                if !rollout.continue_training {
                    continue_training = false;
                    break;
                }
                actor_steps += rollout.episode_timesteps;
                fitnesses.push(rollout.episode_reward);
            }

            if !continue_training {
                // Aborted generations never reach `tell`: the distribution
                // only ever sees fully evaluated populations.
                tracing::info!(
                    num_timesteps = self.num_timesteps,
                    "stop requested, discarding current generation"
                );
                break;
            }

            self.progress_remaining =
                1.0 - (self.num_timesteps as f32 / total_timesteps as f32).min(1.0);
            self.es.tell(&population, &fitnesses);
            self.stats.tells += 1;
            self.stats.generations += 1;

            let mut best_idx = 0;
            for (i, f) in fitnesses.iter().enumerate() {
                if *f > fitnesses[best_idx] {
                    best_idx = i;
                }
            }
            let best_fitness = fitnesses[best_idx];
            let mean_fitness = fitnesses.iter().sum::<f32>() / fitnesses.len() as f32;
            tracing::info!(
                generation = self.stats.generations,
                num_timesteps = self.num_timesteps,
                best_fitness,
                mean_fitness,
                damping = self.es.damping(),
                "generation complete"
            );
            callback.on_generation_end(self.stats.generations, best_fitness, &population[best_idx]);
        }

        callback.on_training_end();
        Ok(())
    }

    /// Runs the configured pacing schedule for one gradient-receiving
    /// individual and writes the trained parameters back into its slot.
    fn gradient_phase(&mut self, individual: &mut Vec<f32>, actor_steps: usize) {
        self.td3.load_actor_vector(individual);
        // Fresh moment estimates per individual: each one is descended
        // independently, not warm-started from the previous individual's
        // optimizer state.
        let lr = self.config.learning_rate.value(self.progress_remaining);
        self.td3.reset_actor_optimizer(lr);

        let tau = self.config.tau;
        match self.config.update_style.pacing(actor_steps, self.config.n_grad, tau) {
            Pacing::Phased {
                critic_iterations,
                critic_tau,
                actor_iterations,
                actor_tau,
                actor_critic_tau,
            } => {
                self.td3.train_critic(critic_iterations, &self.buffer, critic_tau, &mut self.rng);
                self.td3.train_actor(
                    actor_iterations,
                    &self.buffer,
                    actor_tau,
                    actor_critic_tau,
                    &mut self.rng,
                );
            }
            Pacing::Interleaved { iterations } => {
                for it in 0..iterations {
                    self.td3.train_critic(1, &self.buffer, 0.0, &mut self.rng);
                    if it % self.config.policy_delay == 0 {
                        self.td3.train_actor(1, &self.buffer, tau, tau, &mut self.rng);
                    }
                }
            }
        }

        *individual = self.td3.actor_vector();
        self.stats.grad_phases += 1;
    }

    pub fn stats(&self) -> CemRlStats {
        self.stats
    }

    pub fn num_timesteps(&self) -> usize {
        self.num_timesteps
    }

    /// Best individual observed so far with its fitness.
    pub fn best(&self) -> Option<(&[f32], f32)> {
        self.es.best()
    }

    /// Current mean of the search distribution.
    pub fn distribution_mean(&self) -> &[f32] {
        self.es.mean()
    }

    pub fn trainer(&self) -> &Td3 {
        &self.td3
    }
}
