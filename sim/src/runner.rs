use crate::engine::{SimulationState, Status};
use crate::sampler;
use crate::transition::TransitionRule;
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;
use rayon::prelude::*;
use shared::{
    BatchConfig, BatchResult, Config, ConfigError, Outcome, Population, ReplicateSeries, SimError,
};

/// Seed for replicate `index` of a batch run with `run_seed`.
///
/// SplitMix64 finaliser over the run seed and index, so neighbouring
/// replicates get unrelated streams and the founder stream (seeded with
/// `run_seed` directly) is not reused.
pub fn derive_seed(run_seed: u64, index: usize) -> u64 {
    let mut z = run_seed ^ (index as u64 + 1).wrapping_mul(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// Run one replicate from an already-built founding population.
///
/// Founders already marked dead are ignored.
///
/// Index 0 of every series holds the initial state; each later index is the
/// state after one more tick. If the population dies out, the remaining
/// entries (including the one where it happened) stay zero.
pub fn run_replicate<R: Rng>(
    initial: &Population,
    initial_turbidity: f64,
    horizon: usize,
    config: &Config,
    rng: R,
) -> Result<ReplicateSeries, SimError> {
    if horizon < 1 {
        return Err(ConfigError::Horizon(horizon).into());
    }
    if !initial_turbidity.is_finite() {
        return Err(ConfigError::NonFinite("initial_turbidity").into());
    }
    if initial_turbidity < 0.0 {
        return Err(ConfigError::InitialTurbidity(initial_turbidity).into());
    }

    let rule = TransitionRule::new(config)?;
    let params = config.params();
    let mut state = SimulationState::new(initial.clone(), initial_turbidity, rng);
    let mut series = ReplicateSeries::zeroed(horizon);

    if state.status() == Status::Extinct {
        series.outcome = Outcome::Extinct { timestep: 0 };
        return Ok(series);
    }
    record(&mut series, 0, &state);

    for t in 1..horizon {
        let report = state.tick(params, &rule)?;
        series.births += report.births as u64;
        series.deaths += report.deaths as u64;

        if state.status() == Status::Extinct {
            series.outcome = Outcome::Extinct { timestep: t };
            break;
        }
        record(&mut series, t, &state);
    }

    tracing::debug!(
        outcome = ?series.outcome,
        births = series.births,
        deaths = series.deaths,
        "replicate finished"
    );

    Ok(series)
}

fn record<R>(series: &mut ReplicateSeries, t: usize, state: &SimulationState<R>) {
    series.population[t] = state.population.len();
    series.turbidity[t] = state.turbidity;
    series.trait_mean[t] = state.population.trait_mean();
    series.trait_sd[t] = state.population.trait_sd();
}

/// Sample one founding population and run every replicate from it.
pub fn run_batch(config: &Config, batch: &BatchConfig) -> Result<BatchResult, SimError> {
    batch.validate()?;
    let seed = batch.seed.unwrap_or_else(|| rand::thread_rng().gen());

    let mut founder_rng = Xoshiro256PlusPlus::seed_from_u64(seed);
    let initial = sampler::initial_population(&mut founder_rng, config)?;

    let batch = BatchConfig {
        seed: Some(seed),
        ..batch.clone()
    };
    run_batch_from(&initial, config, &batch)
}

/// Run every replicate of a batch from a caller-supplied founding population.
///
/// Replicate `i` draws from its own stream seeded with
/// `derive_seed(seed, i)`, so results do not depend on `parallel` or on the
/// size of the thread pool.
pub fn run_batch_from(
    initial: &Population,
    config: &Config,
    batch: &BatchConfig,
) -> Result<BatchResult, SimError> {
    batch.validate()?;
    let seed = batch.seed.unwrap_or_else(|| rand::thread_rng().gen());
    let params = config.params();

    tracing::info!(
        seed,
        replicates = batch.replicates,
        horizon = params.horizon,
        founders = initial.len(),
        parallel = batch.parallel,
        "starting batch"
    );

    let run_one = |index: usize| {
        let rng = Xoshiro256PlusPlus::seed_from_u64(derive_seed(seed, index));
        tracing::debug!(replicate = index, "replicate started");
        run_replicate(initial, params.initial_turbidity, params.horizon, config, rng)
    };

    let series: Vec<ReplicateSeries> = if batch.parallel {
        (0..batch.replicates)
            .into_par_iter()
            .map(run_one)
            .collect::<Result<Vec<_>, _>>()?
    } else {
        (0..batch.replicates)
            .map(run_one)
            .collect::<Result<Vec<_>, _>>()?
    };

    let extinct = series.iter().filter(|s| s.is_extinct()).count();
    tracing::info!(seed, extinct, "batch finished");

    Ok(BatchResult::from_series(seed, initial.traits(), series))
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::Parameters;

    fn rng(seed: u64) -> Xoshiro256PlusPlus {
        Xoshiro256PlusPlus::seed_from_u64(seed)
    }

    #[test]
    fn test_series_has_horizon_length() {
        let config = Config::default();
        let founders = Population::from_traits(vec![0.0; 10]);

        let series = run_replicate(&founders, 0.5, 25, &config, rng(1)).unwrap();

        assert_eq!(series.horizon(), 25);
        assert_eq!(series.population[0], 10);
        assert_eq!(series.turbidity[0], 0.5);
        assert_eq!(series.trait_mean[0], 0.0);
    }

    #[test]
    fn test_single_timestep_horizon_records_only_initial_state() {
        let config = Config::default();
        let founders = Population::from_traits(vec![1.0, -1.0]);

        let series = run_replicate(&founders, 0.8, 1, &config, rng(1)).unwrap();

        assert_eq!(series.population, vec![2]);
        assert_eq!(series.turbidity, vec![0.8]);
        assert_eq!(series.trait_sd, vec![1.0]);
        assert_eq!(series.outcome, Outcome::Completed);
    }

    #[test]
    fn test_extinction_zero_fills_remaining_entries() {
        let config = Config::new(Parameters {
            death_probability: 1.0,
            ..Default::default()
        })
        .unwrap();
        let founders = Population::from_traits(vec![0.5; 10]);

        let series = run_replicate(&founders, 0.5, 10, &config, rng(2)).unwrap();

        assert_eq!(series.outcome, Outcome::Extinct { timestep: 1 });
        assert_eq!(series.population[0], 10);
        assert_eq!(series.deaths, 10);
        for t in 1..10 {
            assert_eq!(series.population[t], 0);
            assert_eq!(series.turbidity[t], 0.0);
            assert_eq!(series.trait_mean[t], 0.0);
            assert_eq!(series.trait_sd[t], 0.0);
        }
    }

    #[test]
    fn test_empty_founders_are_extinct_immediately() {
        let config = Config::default();
        let series = run_replicate(&Population::default(), 0.5, 5, &config, rng(3)).unwrap();

        assert_eq!(series.outcome, Outcome::Extinct { timestep: 0 });
        assert!(series.turbidity.iter().all(|&t| t == 0.0));
    }

    #[test]
    fn test_dead_founders_do_not_reproduce() {
        let config = Config::new(Parameters {
            growth_rate: 1.0,
            carrying_capacity: 1.0e6,
            death_probability: 0.0,
            ..Default::default()
        })
        .unwrap();
        let mut founders = Population::from_traits(vec![1.0; 4]);
        founders.iter_mut().for_each(|i| i.kill());

        let series = run_replicate(&founders, 0.5, 4, &config, rng(4)).unwrap();

        assert_eq!(series.outcome, Outcome::Extinct { timestep: 0 });
        assert_eq!(series.population, vec![0; 4]);
        assert_eq!(series.births, 0);
    }

    #[test]
    fn test_partially_dead_founders_record_only_the_living() {
        let config = Config::new(Parameters {
            growth_rate: 1.0,
            carrying_capacity: 1.0e6,
            death_probability: 0.0,
            ..Default::default()
        })
        .unwrap();
        let mut founders = Population::from_traits(vec![1.0, 1.0, -1.0]);
        if let Some(individual) = founders.get_mut(2) {
            individual.kill();
        }

        let series = run_replicate(&founders, 0.5, 3, &config, rng(5)).unwrap();

        assert_eq!(series.population, vec![2, 4, 8]);
        assert_eq!(series.trait_mean[0], 1.0);
        assert_eq!(series.births, 6);
    }

    #[test]
    fn test_rejects_bad_replicate_inputs() {
        let config = Config::default();
        let founders = Population::from_traits(vec![0.0]);

        assert!(matches!(
            run_replicate(&founders, 0.5, 0, &config, rng(1)),
            Err(SimError::Config(ConfigError::Horizon(0)))
        ));
        assert!(matches!(
            run_replicate(&founders, -0.5, 5, &config, rng(1)),
            Err(SimError::Config(ConfigError::InitialTurbidity(_)))
        ));
    }

    #[test]
    fn test_derive_seed_spreads_replicates() {
        let seeds: Vec<u64> = (0..100).map(|i| derive_seed(42, i)).collect();
        let mut unique = seeds.clone();
        unique.sort_unstable();
        unique.dedup();

        assert_eq!(unique.len(), seeds.len());
        assert!(!seeds.contains(&42));
        assert_eq!(derive_seed(42, 3), derive_seed(42, 3));
    }

    #[test]
    fn test_batch_reports_drawn_seed() {
        let config = Config::new(Parameters {
            horizon: 5,
            ..Default::default()
        })
        .unwrap();
        let batch = BatchConfig {
            replicates: 2,
            seed: None,
            parallel: false,
        };

        let first = run_batch(&config, &batch).unwrap();
        let replay = run_batch(
            &config,
            &BatchConfig {
                seed: Some(first.seed),
                ..batch
            },
        )
        .unwrap();

        assert_eq!(first, replay);
    }

    #[test]
    fn test_batch_rejects_zero_replicates() {
        let batch = BatchConfig {
            replicates: 0,
            ..Default::default()
        };
        assert!(matches!(
            run_batch(&Config::default(), &batch),
            Err(SimError::Config(ConfigError::NoReplicates))
        ));
    }
}
