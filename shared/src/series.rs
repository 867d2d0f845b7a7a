use serde::{Deserialize, Serialize};

/// How a replicate ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Outcome {
    /// Reached the configured horizon with a living population
    Completed,
    /// Population hit zero; `timestep` is the first zero-filled index
    Extinct { timestep: usize },
}

/// Time series for one replicate, one entry per timestep.
///
/// Index 0 holds the initial state. Entries at and after an extinction are
/// left at zero in all four series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplicateSeries {
    pub population: Vec<usize>,
    pub turbidity: Vec<f64>,
    pub trait_mean: Vec<f64>,
    pub trait_sd: Vec<f64>,
    pub outcome: Outcome,
    pub births: u64,
    pub deaths: u64,
}

impl ReplicateSeries {
    /// Zero-initialised series of the given length
    pub fn zeroed(horizon: usize) -> Self {
        Self {
            population: vec![0; horizon],
            turbidity: vec![0.0; horizon],
            trait_mean: vec![0.0; horizon],
            trait_sd: vec![0.0; horizon],
            outcome: Outcome::Completed,
            births: 0,
            deaths: 0,
        }
    }

    pub fn horizon(&self) -> usize {
        self.population.len()
    }

    pub fn is_extinct(&self) -> bool {
        matches!(self.outcome, Outcome::Extinct { .. })
    }
}

/// Output of a batch: four `[replicate][timestep]` matrices plus run metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchResult {
    /// Seed the batch was run with (drawn if none was supplied)
    pub seed: u64,
    /// Founding traits shared by every replicate
    pub initial_traits: Vec<f64>,
    pub population: Vec<Vec<usize>>,
    pub turbidity: Vec<Vec<f64>>,
    pub trait_mean: Vec<Vec<f64>>,
    pub trait_sd: Vec<Vec<f64>>,
    pub outcomes: Vec<Outcome>,
}

impl BatchResult {
    /// Assemble matrices from per-replicate series, preserving order.
    pub fn from_series(seed: u64, initial_traits: Vec<f64>, series: Vec<ReplicateSeries>) -> Self {
        let mut result = Self {
            seed,
            initial_traits,
            population: Vec::with_capacity(series.len()),
            turbidity: Vec::with_capacity(series.len()),
            trait_mean: Vec::with_capacity(series.len()),
            trait_sd: Vec::with_capacity(series.len()),
            outcomes: Vec::with_capacity(series.len()),
        };

        for replicate in series {
            result.population.push(replicate.population);
            result.turbidity.push(replicate.turbidity);
            result.trait_mean.push(replicate.trait_mean);
            result.trait_sd.push(replicate.trait_sd);
            result.outcomes.push(replicate.outcome);
        }

        result
    }

    pub fn replicates(&self) -> usize {
        self.population.len()
    }

    pub fn horizon(&self) -> usize {
        self.population.first().map(Vec::len).unwrap_or(0)
    }
}
