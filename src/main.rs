use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use mpls_chapters::{HumanDuration, Playlist};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// Prints the length and chapter list of Blu-ray playlist files.
#[derive(Parser)]
#[command(name = "parse_mpls")]
#[command(version, about)]
struct Cli {
    /// MPLS files to decode, in order
    #[arg(required = true, value_name = "FILE")]
    files: Vec<PathBuf>,

    /// Print each playlist as JSON instead of the text report
    #[arg(long)]
    json: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    configure_tracing(cli.verbose);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn configure_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run(cli: &Cli) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();

    // Stops at the first file that fails; later files are not attempted.
    for path in &cli.files {
        let playlist = Playlist::open(path)?;
        info!(
            path = %path.display(),
            clips = playlist.stream_clips.len(),
            chapters = playlist.chapter_count(),
            "decoded playlist"
        );

        if cli.json {
            write_json(&mut out, &playlist, path)?;
        } else {
            write_report(&mut out, &playlist)?;
        }
    }

    out.flush()?;
    Ok(())
}

fn write_report<W: Write>(out: &mut W, playlist: &Playlist) -> io::Result<()> {
    writeln!(out, "Playlist length: {}", HumanDuration(playlist.duration_sec))?;
    writeln!(out, "Chapter count: {}", playlist.chapter_count())?;
    for (i, chapter) in playlist.chapters.iter().enumerate() {
        writeln!(
            out,
            "Chapter {:2}: {}",
            i + 1,
            HumanDuration(chapter.relative_time_sec)
        )?;
    }
    writeln!(out)
}

fn write_json<W: Write>(out: &mut W, playlist: &Playlist, path: &Path) -> Result<()> {
    debug!(path = %path.display(), "writing json");
    serde_json::to_writer_pretty(&mut *out, playlist)
        .with_context(|| format!("failed to serialize {}", path.display()))?;
    writeln!(out)?;
    Ok(())
}
