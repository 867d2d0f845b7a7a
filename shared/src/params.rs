use crate::ConfigError;
use serde::{Deserialize, Serialize};

/// What to do when a computed probability falls outside [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProbabilityPolicy {
    /// Clamp into [0, 1] before drawing
    #[default]
    Clamp,
    /// Abort the replicate with the offending state
    Strict,
}

/// Raw model parameters, as read from a configuration file.
///
/// Defaults reproduce the reference scenario (K = 50, n0 = 10, horizon 100).
/// A `Parameters` value is not usable by the simulator until it has been
/// validated into a [`Config`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Parameters {
    /// K
    pub carrying_capacity: f64,
    /// r_M
    pub growth_rate: f64,
    /// r_T
    pub turbidity_growth_rate: f64,
    /// h_M
    pub half_saturation: f64,
    /// c, maps trait to turbidity sensitivity
    pub sensitivity_coefficient: f64,
    /// T0
    pub background_turbidity: f64,
    /// μ
    pub death_probability: f64,
    /// σ
    pub mutation_sd: f64,
    /// z1
    pub trait_shape_a: f64,
    /// z2
    pub trait_shape_b: f64,
    /// n0
    pub initial_population: usize,
    pub initial_turbidity: f64,
    /// Number of recorded timesteps, including the initial state
    pub horizon: usize,
    pub probability_policy: ProbabilityPolicy,
}

impl Default for Parameters {
    fn default() -> Self {
        Self {
            carrying_capacity: 50.0,
            growth_rate: 0.1,
            turbidity_growth_rate: 0.1,
            half_saturation: 0.2,
            sensitivity_coefficient: 0.5,
            background_turbidity: 3.0,
            death_probability: 0.05,
            mutation_sd: 0.01,
            trait_shape_a: 2.0,
            trait_shape_b: 2.0,
            initial_population: 10,
            initial_turbidity: 0.5,
            horizon: 100,
            probability_policy: ProbabilityPolicy::Clamp,
        }
    }
}

impl Parameters {
    /// Check every constraint the simulator relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let finite = [
            ("carrying_capacity", self.carrying_capacity),
            ("growth_rate", self.growth_rate),
            ("turbidity_growth_rate", self.turbidity_growth_rate),
            ("half_saturation", self.half_saturation),
            ("sensitivity_coefficient", self.sensitivity_coefficient),
            ("background_turbidity", self.background_turbidity),
            ("death_probability", self.death_probability),
            ("mutation_sd", self.mutation_sd),
            ("trait_shape_a", self.trait_shape_a),
            ("trait_shape_b", self.trait_shape_b),
            ("initial_turbidity", self.initial_turbidity),
        ];
        if let Some(&(name, _)) = finite.iter().find(|(_, v)| !v.is_finite()) {
            return Err(ConfigError::NonFinite(name));
        }

        if self.carrying_capacity <= 0.0 {
            return Err(ConfigError::CarryingCapacity(self.carrying_capacity));
        }

        let rates = [
            ("growth_rate", self.growth_rate),
            ("turbidity_growth_rate", self.turbidity_growth_rate),
            ("mutation_sd", self.mutation_sd),
        ];
        if let Some(&(name, value)) = rates.iter().find(|(_, v)| *v < 0.0) {
            return Err(ConfigError::NegativeRate { name, value });
        }

        if self.half_saturation <= 0.0 {
            return Err(ConfigError::HalfSaturation(self.half_saturation));
        }
        if self.background_turbidity <= 0.0 {
            return Err(ConfigError::BackgroundTurbidity(self.background_turbidity));
        }
        if self.initial_turbidity < 0.0 {
            return Err(ConfigError::InitialTurbidity(self.initial_turbidity));
        }
        if !(0.0..=1.0).contains(&self.death_probability) {
            return Err(ConfigError::DeathProbability(self.death_probability));
        }
        if self.trait_shape_a <= 0.0 || self.trait_shape_b <= 0.0 {
            return Err(ConfigError::TraitShape(
                self.trait_shape_a,
                self.trait_shape_b,
            ));
        }
        if self.horizon < 1 {
            return Err(ConfigError::Horizon(self.horizon));
        }

        Ok(())
    }
}

/// Validated, immutable parameter set.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(try_from = "Parameters", into = "Parameters")]
pub struct Config {
    params: Parameters,
}

impl Config {
    pub fn new(params: Parameters) -> Result<Self, ConfigError> {
        params.validate()?;
        Ok(Self { params })
    }

    /// Parse and validate a JSON parameter object
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let params: Parameters = serde_json::from_str(json)?;
        Self::new(params)
    }

    pub fn params(&self) -> &Parameters {
        &self.params
    }

    /// Copy of this configuration with a different initial turbidity.
    /// Sweep drivers use this to vary one knob at a time.
    pub fn with_initial_turbidity(&self, initial_turbidity: f64) -> Result<Self, ConfigError> {
        Self::new(Parameters {
            initial_turbidity,
            ..self.params.clone()
        })
    }
}

impl TryFrom<Parameters> for Config {
    type Error = ConfigError;

    fn try_from(params: Parameters) -> Result<Self, Self::Error> {
        Self::new(params)
    }
}

impl From<Config> for Parameters {
    fn from(config: Config) -> Self {
        config.params
    }
}

/// How many replicates to run and how to seed them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    pub replicates: usize,
    /// Run seed. `None` draws one from the thread RNG (and reports it back).
    pub seed: Option<u64>,
    /// Spread replicates over the rayon thread pool
    pub parallel: bool,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            replicates: 30,
            seed: None,
            parallel: true,
        }
    }
}

impl BatchConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.replicates == 0 {
            return Err(ConfigError::NoReplicates);
        }
        Ok(())
    }
}
