mod run;

use anyhow::Result;
use std::env;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> Result<()> {
    // Logs go to stderr so stdout stays clean JSON
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "runner=info,sim=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let spec_path = env::args().nth(1).map(PathBuf::from);
    let output = env::var("OUTPUT").ok().map(PathBuf::from);

    tracing::info!("Starting macrophyte batch");
    if let Some(path) = &spec_path {
        tracing::info!("Run spec: {}", path.display());
    }

    run::run(spec_path.as_deref(), output.as_deref())
}
