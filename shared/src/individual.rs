/// A single macrophyte.
///
/// The trait value is fixed at birth. Only the engine flips `alive`.
#[derive(Debug, Clone, PartialEq)]
pub struct Individual {
    id: u64,
    z: f64,
    alive: bool,
}

impl Individual {
    fn new(id: u64, z: f64) -> Self {
        Self { id, z, alive: true }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    /// Heritable trait controlling turbidity sensitivity
    pub fn z(&self) -> f64 {
        self.z
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    /// Mark this individual dead. It is dropped at the next compaction.
    pub fn kill(&mut self) {
        self.alive = false;
    }
}

/// Ordered collection of living individuals for one replicate.
///
/// Members are kept in ID order. The population also owns the ID counter, so
/// IDs keep increasing across deaths and are never handed out twice.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Population {
    individuals: Vec<Individual>,
    next_id: u64,
}

impl Population {
    /// Build a founding population, assigning IDs 0..n in trait order.
    pub fn from_traits<I>(traits: I) -> Self
    where
        I: IntoIterator<Item = f64>,
    {
        let individuals: Vec<Individual> = traits
            .into_iter()
            .enumerate()
            .map(|(idx, z)| Individual::new(idx as u64, z))
            .collect();
        let next_id = individuals.len() as u64;

        Self {
            individuals,
            next_id,
        }
    }

    /// Create a newborn with a fresh ID. The newborn is not inserted; the
    /// caller holds it until `compact`.
    pub fn spawn(&mut self, z: f64) -> Individual {
        let child = Individual::new(self.next_id, z);
        self.next_id += 1;
        child
    }

    /// Drop dead members and append the given arrivals (already in ID order).
    pub fn compact(&mut self, arrivals: Vec<Individual>) {
        self.individuals.retain(Individual::is_alive);
        self.individuals
            .extend(arrivals.into_iter().filter(Individual::is_alive));
    }

    pub fn len(&self) -> usize {
        self.individuals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.individuals.is_empty()
    }

    /// The ID the next newborn will receive
    pub fn next_id(&self) -> u64 {
        self.next_id
    }

    pub fn get(&self, idx: usize) -> Option<&Individual> {
        self.individuals.get(idx)
    }

    pub fn get_mut(&mut self, idx: usize) -> Option<&mut Individual> {
        self.individuals.get_mut(idx)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Individual> {
        self.individuals.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Individual> {
        self.individuals.iter_mut()
    }

    pub fn traits(&self) -> Vec<f64> {
        self.individuals.iter().map(Individual::z).collect()
    }

    /// Mean trait value, 0.0 for an empty population
    pub fn trait_mean(&self) -> f64 {
        if self.individuals.is_empty() {
            return 0.0;
        }

        let total: f64 = self.individuals.iter().map(Individual::z).sum();
        total / self.individuals.len() as f64
    }

    /// Population (not sample) standard deviation of the trait, 0.0 when empty
    pub fn trait_sd(&self) -> f64 {
        if self.individuals.is_empty() {
            return 0.0;
        }

        let mean = self.trait_mean();
        let variance: f64 = self
            .individuals
            .iter()
            .map(|i| (i.z - mean).powi(2))
            .sum::<f64>()
            / self.individuals.len() as f64;
        variance.sqrt()
    }
}
