use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Result, bail};
use tracing_subscriber::EnvFilter;

use draw_heatmap::compose::{self, Config};

fn main() -> ExitCode {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    match run() {
        Ok(path) => {
            println!("{}", path.display());
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<PathBuf> {
    let mut args = std::env::args_os().skip(1);
    let Some(input) = args.next() else {
        bail!("usage: draw_heatmap <path to results csv>");
    };
    if args.next().is_some() {
        bail!("usage: draw_heatmap <path to results csv>");
    }
    compose::generate(&PathBuf::from(input), &Config::default())
}
