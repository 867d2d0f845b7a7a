//! Individual-based simulation of a macrophyte population coupled to lake
//! turbidity.
//!
//! Each tick advances turbidity from the previous population size, then lets
//! every plant present at tick start die, survive, or reproduce with a
//! trait-dependent probability. Replicates share one sampled founding
//! population and differ only in their random streams.

pub mod engine;
pub mod runner;
pub mod sampler;
pub mod transition;
pub mod turbidity;

pub use engine::{SimulationState, Status, TickReport};
pub use runner::{derive_seed, run_batch, run_batch_from, run_replicate};
pub use transition::{Fate, TickContext, TransitionRule};

use shared::{BatchConfig, BatchResult, Config, SimError};

/// Run a complete batch of replicates and return the four result matrices
pub fn run_simulation(config: &Config, batch: &BatchConfig) -> Result<BatchResult, SimError> {
    run_batch(config, batch)
}
