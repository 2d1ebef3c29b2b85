use std::fmt;
use std::str::FromStr;

/// How gradient iterations are paced across critic and actor for one
/// gradient-updated individual.
///
/// These are pacing policies, not different algorithms: the critic/actor
/// math is identical across variants, only iteration counts and target-sync
/// timing differ. `actor_steps` is the step count collected during the
/// previous evaluation phase, so the `actor_steps / n_grad` critic budget
/// shrinks as the population grows.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UpdateStyle {
    /// Critic gets `actor_steps / n_grad` iterations with target sync,
    /// actor gets `actor_steps` iterations syncing only the actor target.
    Original,
    /// Same budgets, but all target syncs deferred to the actor step.
    OriginalTd3,
    /// Interleaved critic/actor loop of `actor_steps` iterations with
    /// policy delay, closest to plain TD3.
    Td3Like,
    /// Interleaved loop of `2 * (actor_steps / n_grad)` iterations.
    Other,
}

/// Iteration counts and tau routing produced by [`UpdateStyle::pacing`].
#[derive(Clone, Copy, Debug)]
pub enum Pacing {
    /// Run the critic phase then the actor phase, back to back.
    Phased {
        critic_iterations: usize,
        critic_tau: f32,
        actor_iterations: usize,
        actor_tau: f32,
        actor_critic_tau: f32,
    },
    /// Alternate single critic and (delayed) actor iterations.
    Interleaved { iterations: usize },
}

impl UpdateStyle {
    pub fn pacing(&self, actor_steps: usize, n_grad: usize, tau: f32) -> Pacing {
        match self {
            UpdateStyle::Original => Pacing::Phased {
                critic_iterations: actor_steps / n_grad,
                critic_tau: tau,
                actor_iterations: actor_steps,
                actor_tau: tau,
                actor_critic_tau: 0.0,
            },
            UpdateStyle::OriginalTd3 => Pacing::Phased {
                critic_iterations: actor_steps / n_grad,
                critic_tau: 0.0,
                actor_iterations: actor_steps,
                actor_tau: tau,
                actor_critic_tau: tau,
            },
            UpdateStyle::Td3Like => Pacing::Interleaved { iterations: actor_steps },
            UpdateStyle::Other => {
                Pacing::Interleaved { iterations: 2 * (actor_steps / n_grad) }
            }
        }
    }
}

impl fmt::Display for UpdateStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            UpdateStyle::Original => "original",
            UpdateStyle::OriginalTd3 => "original_td3",
            UpdateStyle::Td3Like => "td3_like",
            UpdateStyle::Other => "other",
        };
        f.write_str(s)
    }
}

impl FromStr for UpdateStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "original" => Ok(UpdateStyle::Original),
            "original_td3" => Ok(UpdateStyle::OriginalTd3),
            "td3_like" => Ok(UpdateStyle::Td3Like),
            "other" => Ok(UpdateStyle::Other),
            other => Err(format!(
                "unknown update style `{other}` (expected original, original_td3, td3_like or other)"
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn original_splits_critic_budget_across_grad_individuals() {
        match UpdateStyle::Original.pacing(1000, 5, 0.005) {
            Pacing::Phased { critic_iterations, actor_iterations, actor_critic_tau, .. } => {
                assert_eq!(critic_iterations, 200);
                assert_eq!(actor_iterations, 1000);
                assert_eq!(actor_critic_tau, 0.0);
            }
            Pacing::Interleaved { .. } => panic!("original style is phased"),
        }
    }

    #[test]
    fn other_style_doubles_the_per_individual_share() {
        match UpdateStyle::Other.pacing(1000, 5, 0.005) {
            Pacing::Interleaved { iterations } => assert_eq!(iterations, 400),
            Pacing::Phased { .. } => panic!("other style is interleaved"),
        }
    }

    #[test]
    fn parses_all_known_styles() {
        for s in ["original", "original_td3", "td3_like", "other"] {
            let style: UpdateStyle = s.parse().unwrap();
            assert_eq!(style.to_string(), s);
        }
        assert!("frobnicate".parse::<UpdateStyle>().is_err());
    }
}
