use tracing_subscriber::EnvFilter;

use repo_index::config::Config;
use repo_index::engine::open_engine;
use repo_index::pipeline;

fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env();
    tracing::info!("Repository: {}", config.repo_url);
    tracing::info!("Clone directory: {}", config.clone_dir().display());

    let engine = open_engine(&config)?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    pipeline::run(&config, engine.as_ref(), &mut out)?;
    Ok(())
}
