use rand::rngs::StdRng;
use rand::Rng;

/// A minibatch of transitions sampled from a [`ReplayBuffer`].
pub struct Batch {
    pub obs: Vec<Vec<f32>>,
    pub actions: Vec<Vec<f32>>,
    pub rewards: Vec<f32>,
    pub next_obs: Vec<Vec<f32>>,
    /// 1.0 when the transition ended its episode, else 0.0.
    pub dones: Vec<f32>,
}

impl Batch {
    pub fn len(&self) -> usize {
        self.rewards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rewards.is_empty()
    }
}

/// Ring buffer of transitions shared by rollouts and gradient updates.
///
/// Once `capacity` transitions have been stored, new entries overwrite the
/// oldest ones.
pub struct ReplayBuffer {
    capacity: usize,
    pos: usize,
    full: bool,
    obs: Vec<Vec<f32>>,
    actions: Vec<Vec<f32>>,
    rewards: Vec<f32>,
    next_obs: Vec<Vec<f32>>,
    dones: Vec<bool>,
}

impl ReplayBuffer {
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "replay buffer capacity must be positive");
        Self {
            capacity,
            pos: 0,
            full: false,
            obs: Vec::with_capacity(capacity),
            actions: Vec::with_capacity(capacity),
            rewards: Vec::with_capacity(capacity),
            next_obs: Vec::with_capacity(capacity),
            dones: Vec::with_capacity(capacity),
        }
    }

    pub fn add(
        &mut self,
        obs: Vec<f32>,
        action: Vec<f32>,
        reward: f32,
        next_obs: Vec<f32>,
        done: bool,
    ) {
        if self.full {
            self.obs[self.pos] = obs;
            self.actions[self.pos] = action;
            self.rewards[self.pos] = reward;
            self.next_obs[self.pos] = next_obs;
            self.dones[self.pos] = done;
        } else {
            self.obs.push(obs);
            self.actions.push(action);
            self.rewards.push(reward);
            self.next_obs.push(next_obs);
            self.dones.push(done);
        }
        self.pos += 1;
        if self.pos == self.capacity {
            self.pos = 0;
            self.full = true;
        }
    }

    pub fn len(&self) -> usize {
        if self.full {
            self.capacity
        } else {
            self.pos
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Samples `batch_size` transitions uniformly with replacement.
    pub fn sample(&self, batch_size: usize, rng: &mut StdRng) -> Batch {
        assert!(!self.is_empty(), "cannot sample from an empty replay buffer");
        let n = self.len();
        let mut batch = Batch {
            obs: Vec::with_capacity(batch_size),
            actions: Vec::with_capacity(batch_size),
            rewards: Vec::with_capacity(batch_size),
            next_obs: Vec::with_capacity(batch_size),
            dones: Vec::with_capacity(batch_size),
        };
        for _ in 0..batch_size {
            let i = rng.gen_range(0..n);
            batch.obs.push(self.obs[i].clone());
            batch.actions.push(self.actions[i].clone());
            batch.rewards.push(self.rewards[i]);
            batch.next_obs.push(self.next_obs[i].clone());
            batch.dones.push(if self.dones[i] { 1.0 } else { 0.0 });
        }
        batch
    }
}
