//! Wires the command-line arguments to the training loops.

use anyhow::Result;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rl::{
    Callback, CemRl, CemRlConfig, CheckpointCallback, GaussianActionNoise, LearningRate,
    NoopCallback, PointMassEnv, Ppo, ReplayBuffer, Td3, Td3Config,
};

fn make_env(args: &crate::Args) -> PointMassEnv {
    PointMassEnv::with_horizon(args.horizon)
}

fn make_callback(args: &crate::Args) -> Box<dyn Callback> {
    match &args.checkpoint {
        Some(path) => Box::new(CheckpointCallback::new(path, 10)),
        None => Box::new(NoopCallback),
    }
}

pub(crate) fn cem_rl(args: &crate::Args) -> Result<()> {
    let config = CemRlConfig {
        learning_rate: LearningRate::Constant(args.lr),
        sigma_init: args.sigma_init,
        pop_size: args.pop_size,
        n_grad: args.n_grad,
        elitism: args.elitism,
        update_style: args.update_style,
        n_episodes_rollout: args.episodes,
        seed: args.seed,
        ..CemRlConfig::default()
    };
    let env = make_env(args);
    let action_dim = 2;
    let noise = GaussianActionNoise::scalar(action_dim, 0.1, args.seed);

    let mut algo = CemRl::new(env, Some(Box::new(noise)), config)?;
    let mut callback = make_callback(args);
    algo.learn(args.timesteps, &mut *callback)?;

    let stats = algo.stats();
    match algo.best() {
        Some((_, fitness)) => tracing::info!(
            generations = stats.generations,
            num_timesteps = algo.num_timesteps(),
            best_fitness = fitness,
            "training finished"
        ),
        None => tracing::warn!("training ended before any generation completed"),
    }
    Ok(())
}

pub(crate) fn td3(args: &crate::Args) -> Result<()> {
    let mut env = make_env(args);
    let mut td3 = Td3::new(
        4,
        2,
        Td3Config { learning_rate: args.lr, ..Td3Config::default() },
    )?;
    let mut buffer = ReplayBuffer::new(1_000_000);
    let noise = GaussianActionNoise::scalar(2, 0.1, args.seed);
    let mut rng = StdRng::seed_from_u64(args.seed);
    let mut callback = make_callback(args);

    let steps = td3.learn(
        &mut env,
        &mut buffer,
        args.timesteps,
        100,
        Some(Box::new(noise)),
        &mut *callback,
        &mut rng,
    );
    tracing::info!(
        num_timesteps = steps,
        critic_grad_steps = td3.critic_grad_steps,
        actor_grad_steps = td3.actor_grad_steps,
        "training finished"
    );
    Ok(())
}

pub(crate) fn ppo(args: &crate::Args) -> Result<()> {
    let horizon = args.horizon;
    let mut trainer = Ppo::new_with(|| PointMassEnv::with_horizon(horizon), args.seed);
    let mut steps = 0;
    let mut iteration = 0;
    while steps < args.timesteps {
        let mean_reward = trainer.step();
        // Eight envs, 64 steps each per iteration.
        steps += 8 * 64;
        iteration += 1;
        if iteration % 10 == 0 {
            tracing::info!(iteration, steps, mean_reward, "ppo progress");
        }
    }
    tracing::info!(iterations = iteration, num_timesteps = steps, "training finished");
    Ok(())
}
