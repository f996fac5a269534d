use std::{io::Write as _, path::PathBuf};

use anyhow::Context as _;
use clap::Parser;
use tracing_subscriber::EnvFilter;

/// Compose images according to a pipeline expression and write the result to
/// stdout as PNG.
#[derive(Parser, Debug)]
#[command(name = "imfx", version)]
struct Cli {
    /// Pipeline expression, e.g. `0.ft(1280x720).pi(1.gb(150))`.
    expr: String,

    /// Input image paths; the expression refers to them by position (0-9).
    #[arg(required = true)]
    images: Vec<PathBuf>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            use clap::error::ErrorKind;
            if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) {
                print!("{err}");
                return;
            }
            eprintln!("imfx: {}", imfx::ImfxError::usage("imfx <EXPR> <IMAGE>..."));
            std::process::exit(1);
        }
    };

    if let Err(err) = run(cli) {
        eprintln!("imfx: {err:#}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let program = imfx::parse(&cli.expr, cli.images.len())?;

    if tracing::enabled!(tracing::Level::DEBUG) {
        tracing::debug!(words = %imfx::dump::render_words(&program), "compiled program");
        for line in imfx::dump::render_tree(&program)?.lines() {
            tracing::debug!("{line}");
        }
    }

    let mut images = Vec::with_capacity(cli.images.len());
    for path in &cli.images {
        images.push(imfx::ops::load(path)?);
    }

    let result = imfx::evaluate(&program, &images)?;

    // Encode fully before touching stdout so a failure writes no bytes.
    let png = imfx::ops::encode_png(&result)?;
    let mut stdout = std::io::stdout().lock();
    stdout.write_all(&png).context("write png to stdout")?;
    stdout.flush().context("flush stdout")?;
    Ok(())
}
