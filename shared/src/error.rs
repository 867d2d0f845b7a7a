use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Rejected parameter configurations. Raised before any replicate starts.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("carrying capacity must be positive, got {0}")]
    CarryingCapacity(f64),

    #[error("{name} must be non-negative, got {value}")]
    NegativeRate { name: &'static str, value: f64 },

    #[error("half-saturation constant must be positive, got {0}")]
    HalfSaturation(f64),

    #[error("background turbidity must be positive, got {0}")]
    BackgroundTurbidity(f64),

    #[error("initial turbidity must be non-negative, got {0}")]
    InitialTurbidity(f64),

    #[error("death probability must be within [0, 1], got {0}")]
    DeathProbability(f64),

    #[error("trait shape parameters must be positive, got ({0}, {1})")]
    TraitShape(f64, f64),

    #[error("{0} must be a finite number")]
    NonFinite(&'static str),

    #[error("horizon must be at least 1 timestep, got {0}")]
    Horizon(usize),

    #[error("replicate count must be at least 1")]
    NoReplicates,

    #[error("failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Which per-individual draw produced a probability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProbabilityKind {
    Death,
    Reproduction,
}

impl std::fmt::Display for ProbabilityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProbabilityKind::Death => write!(f, "death"),
            ProbabilityKind::Reproduction => write!(f, "reproduction"),
        }
    }
}

/// Failures raised while a replicate is running.
#[derive(Debug, Error)]
pub enum SimError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A computed probability fell outside [0, 1] (or was NaN) and the
    /// active policy does not allow clamping it.
    #[error(
        "invalid {kind} probability {value} at timestep {timestep} \
         (trait {trait_value}, population {population_size}, turbidity {turbidity})"
    )]
    InvalidProbability {
        kind: ProbabilityKind,
        value: f64,
        timestep: usize,
        trait_value: f64,
        population_size: usize,
        turbidity: f64,
    },
}
