use crate::transition::{Fate, TickContext, TransitionRule};
use crate::turbidity;
use rand::Rng;
use shared::{Individual, Parameters, Population, SimError};

/// Where a replicate stands after a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Running,
    Extinct,
}

/// Counts from a single tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    pub deaths: usize,
    pub births: usize,
}

/// Mutable state of one replicate.
///
/// The random stream lives here so each replicate draws from its own,
/// explicitly seeded generator.
#[derive(Debug, Clone)]
pub struct SimulationState<R> {
    pub population: Population,
    pub turbidity: f64,
    pub timestep: usize,
    rng: R,
}

impl<R: Rng> SimulationState<R> {
    /// Members already marked dead are dropped before the first tick.
    pub fn new(mut population: Population, turbidity: f64, rng: R) -> Self {
        population.compact(Vec::new());
        Self {
            population,
            turbidity,
            timestep: 0,
            rng,
        }
    }

    pub fn status(&self) -> Status {
        if self.population.is_empty() {
            Status::Extinct
        } else {
            Status::Running
        }
    }

    /// Advance the replicate by one timestep.
    pub fn tick(
        &mut self,
        params: &Parameters,
        rule: &TransitionRule,
    ) -> Result<TickReport, SimError> {
        // Only living members count toward M_t or get visited
        self.population.compact(Vec::new());
        let size_before = self.population.len();
        self.timestep += 1;

        // 1. Update turbidity from the pre-tick population size
        self.turbidity = turbidity::next_turbidity(self.turbidity, size_before, params);

        let ctx = TickContext {
            timestep: self.timestep,
            population_size: size_before,
            turbidity: self.turbidity,
        };

        // 2. Transition everyone present at tick start, in ID order.
        // Offspring wait in `arrivals` and are not visited until next tick.
        let mut arrivals: Vec<Individual> = Vec::new();
        let mut report = TickReport::default();

        for idx in 0..size_before {
            let z = match self.population.get(idx) {
                Some(individual) => individual.z(),
                None => break,
            };

            match rule.decide(z, &ctx, &mut self.rng)? {
                Fate::Died => {
                    if let Some(individual) = self.population.get_mut(idx) {
                        individual.kill();
                    }
                    report.deaths += 1;
                }
                Fate::Survived => {}
                Fate::Reproduced { offspring_z } => {
                    arrivals.push(self.population.spawn(offspring_z));
                    report.births += 1;
                }
            }
        }

        // 3. Compaction
        self.population.compact(arrivals);

        Ok(report)
    }
}
