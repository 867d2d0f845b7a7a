use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use shared::{BatchConfig, BatchResult, Config};
use std::fs;
use std::io::Write;
use std::path::Path;

/// A run description: model parameters plus batch settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunSpec {
    #[serde(default)]
    pub parameters: Config,

    #[serde(flatten)]
    pub batch: BatchConfig,
}

impl RunSpec {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Failed to parse run spec")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path)
            .with_context(|| format!("Failed to read run spec {}", path.display()))?;
        Self::from_json(&json)
    }
}

/// Load the run description (or defaults), run the batch, write the result JSON.
pub fn run(spec_path: Option<&Path>, output: Option<&Path>) -> Result<()> {
    let spec = match spec_path {
        Some(path) => RunSpec::load(path)?,
        None => RunSpec::default(),
    };

    let result = execute(&spec)?;
    let json = serde_json::to_string_pretty(&result).context("Failed to encode results")?;

    match output {
        Some(path) => {
            fs::write(path, json)
                .with_context(|| format!("Failed to write results to {}", path.display()))?;
            tracing::info!("Results written to {}", path.display());
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{json}").context("Failed to write results to stdout")?;
        }
    }

    Ok(())
}

pub fn execute(spec: &RunSpec) -> Result<BatchResult> {
    let result = sim::run_simulation(&spec.parameters, &spec.batch)?;

    let extinct = result
        .outcomes
        .iter()
        .filter(|o| matches!(o, shared::Outcome::Extinct { .. }))
        .count();
    tracing::info!(
        "Finished {} replicates x {} timesteps (seed {}, {} extinct)",
        result.replicates(),
        result.horizon(),
        result.seed,
        extinct
    );

    Ok(result)
}
