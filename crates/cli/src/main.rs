use std::env;

use anyhow::{bail, Result};
use filehash_cli::args::parse_args;
use filehash_cli::config::{self, Config, Settings};
use filehash_cli::{analyze_file, render_report};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args = parse_args(env::args().skip(1))?;
    let cfg = match &args.config {
        Some(path) => {
            info!(?path, "loading config file");
            config::load_config(path)?
        }
        None => Config::default(),
    };

    let mut settings = Settings::from_config(&cfg).with_overrides(|key| env::var(key).ok())?;
    settings.pretty |= args.pretty;
    info!(chunk_size = settings.chunk_size, actions = ?settings.actions, "analyzing files");

    let mut failed = 0usize;
    for path in &args.files {
        match analyze_file(path, &settings) {
            Ok(report) => println!("{}", render_report(&report, settings.pretty)?),
            Err(e) => {
                error!(path = %path.display(), error = ?e, "analysis failed");
                failed += 1;
            }
        }
    }

    if failed > 0 {
        bail!("{failed} of {} files could not be analyzed", args.files.len());
    }
    Ok(())
}
