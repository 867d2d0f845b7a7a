//! Per-individual life cycle: death, reproduction and mutation.
//!
//! The rule only decides what happens to one individual. Applying the
//! decision (flagging the death, allocating an ID for the offspring) is left
//! to the engine, which owns the population.

use rand::Rng;
use rand_distr::{Distribution, Normal};
use shared::{Config, ConfigError, ProbabilityKind, ProbabilityPolicy, SimError};

/// Exponent applied to turbidity sensitivity in the reproduction term
const SENSITIVITY_EXPONENT: i32 = 4;

/// State shared by every transition within one tick.
#[derive(Debug, Clone, Copy)]
pub struct TickContext {
    pub timestep: usize,
    /// M_t, population size before this tick's deaths and births
    pub population_size: usize,
    /// T_{t+1}, already advanced for this tick
    pub turbidity: f64,
}

/// What happened to one individual during a tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Fate {
    Died,
    Survived,
    /// Survived and produced one offspring with this trait value
    Reproduced { offspring_z: f64 },
}

/// Immutable per-replicate constants for the transition rule.
#[derive(Debug, Clone)]
pub struct TransitionRule {
    growth_rate: f64,
    carrying_capacity: f64,
    sensitivity_coefficient: f64,
    death_probability: f64,
    mutation: Normal<f64>,
    policy: ProbabilityPolicy,
}

impl TransitionRule {
    pub fn new(config: &Config) -> Result<Self, ConfigError> {
        let params = config.params();
        let mutation = Normal::new(0.0, params.mutation_sd).map_err(|_| ConfigError::NegativeRate {
            name: "mutation_sd",
            value: params.mutation_sd,
        })?;

        Ok(Self {
            growth_rate: params.growth_rate,
            carrying_capacity: params.carrying_capacity,
            sensitivity_coefficient: params.sensitivity_coefficient,
            death_probability: params.death_probability,
            mutation,
            policy: params.probability_policy,
        })
    }

    /// h_T = exp(c * z)
    pub fn sensitivity(&self, z: f64) -> f64 {
        (self.sensitivity_coefficient * z).exp()
    }

    /// Raw reproduction probability. May fall outside [0, 1].
    pub fn reproduction_probability(&self, z: f64, ctx: &TickContext) -> f64 {
        let m = ctx.population_size as f64;
        let h = self.sensitivity(z).powi(SENSITIVITY_EXPONENT);
        self.growth_rate * m * (1.0 - (m / self.carrying_capacity) * (h + ctx.turbidity) / h)
    }

    /// Decide the fate of an individual with trait `z`.
    pub fn decide<R: Rng + ?Sized>(
        &self,
        z: f64,
        ctx: &TickContext,
        rng: &mut R,
    ) -> Result<Fate, SimError> {
        // 1. Death draw
        let death = self.resolve(ProbabilityKind::Death, self.death_probability, z, ctx)?;
        if rng.gen_bool(death) {
            return Ok(Fate::Died);
        }

        // 2. Reproduction draw against the updated turbidity
        let raw = self.reproduction_probability(z, ctx);
        let birth = self.resolve(ProbabilityKind::Reproduction, raw, z, ctx)?;
        if !rng.gen_bool(birth) {
            return Ok(Fate::Survived);
        }

        // 3. Mutate the offspring trait
        let noise = self.mutation.sample(rng);
        Ok(Fate::Reproduced {
            offspring_z: z + noise,
        })
    }

    /// Apply the probability policy. NaN is rejected under either policy.
    fn resolve(
        &self,
        kind: ProbabilityKind,
        value: f64,
        z: f64,
        ctx: &TickContext,
    ) -> Result<f64, SimError> {
        if (0.0..=1.0).contains(&value) {
            return Ok(value);
        }

        let invalid = || SimError::InvalidProbability {
            kind,
            value,
            timestep: ctx.timestep,
            trait_value: z,
            population_size: ctx.population_size,
            turbidity: ctx.turbidity,
        };

        match self.policy {
            ProbabilityPolicy::Clamp if !value.is_nan() => {
                tracing::trace!(
                    %kind,
                    value,
                    timestep = ctx.timestep,
                    trait_value = z,
                    "clamping probability"
                );
                Ok(value.clamp(0.0, 1.0))
            }
            _ => Err(invalid()),
        }
    }
}
