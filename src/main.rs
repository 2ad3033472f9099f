use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::{info, warn};

use stairs_parser::config::Settings;
use stairs_parser::error::Error;
use stairs_parser::{analysis, detect_frameworks, parse, probe_all, FrameworkKind, FrameworkResult};

#[derive(Parser)]
#[command(
    name = "stairs_parser",
    about = "Recover strategy-framework worksheets from AI advisor responses"
)]
struct Cli {
    /// Compact JSON output (overrides the `pretty` setting)
    #[arg(long, global = true)]
    compact: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse one response into a worksheet (JSON, or null when nothing usable)
    Parse {
        /// ife, efe, space, bcg or porter (default: `default_framework` setting)
        #[arg(short, long)]
        framework: Option<String>,
        /// Response file; stdin when omitted or "-"
        file: Option<PathBuf>,
    },
    /// List frameworks mentioned by name
    Detect {
        file: Option<PathBuf>,
    },
    /// Try every framework and print all that yield data
    Probe {
        file: Option<PathBuf>,
    },
    /// Parse and print a markdown report with scores
    Analyze {
        #[arg(short, long)]
        framework: Option<String>,
        file: Option<PathBuf>,
    },
    /// Parse many responses in parallel, one JSON line per file
    Batch {
        #[arg(short, long)]
        framework: Option<String>,
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
}

fn init_tracing(settings: &Settings) {
    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| settings.log_level.as_str().into()),
        )
        .try_init();
}

fn main() -> anyhow::Result<()> {
    let settings = Settings::load().context("loading settings")?;
    init_tracing(&settings);

    let t0 = Instant::now();
    let cli = Cli::parse();
    let pretty = settings.pretty && !cli.compact;

    match cli.command {
        Commands::Parse { framework, file } => {
            let kind = require_framework(&settings, framework.as_deref())?;
            let text = read_input(file.as_deref())?;
            let result = parse(&text, kind);
            info!(framework = %kind, found = result.is_some(), "parse");
            println!("{}", to_json(&result, pretty)?);
        }
        Commands::Detect { file } => {
            let text = read_input(file.as_deref())?;
            for kind in detect_frameworks(&text) {
                println!("{}", kind);
            }
        }
        Commands::Probe { file } => {
            let text = read_input(file.as_deref())?;
            let results = probe_all(&text);
            info!(found = results.len(), "probe");
            println!("{}", to_json(&results, pretty)?);
        }
        Commands::Analyze { framework, file } => {
            let kind = require_framework(&settings, framework.as_deref())?;
            let text = read_input(file.as_deref())?;
            match parse(&text, kind) {
                Some(result) => print!("{}", analysis::render_markdown(&result)),
                None => println!("No {} data found.", kind.display_name()),
            }
        }
        Commands::Batch { framework, files } => {
            let kind = require_framework(&settings, framework.as_deref())?;
            let counts = process_files(&files, kind)?;
            counts.print();
        }
    }

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        eprintln!("\nDone in {}", format_duration(elapsed));
    }

    Ok(())
}

fn require_framework(settings: &Settings, explicit: Option<&str>) -> anyhow::Result<FrameworkKind> {
    settings
        .framework(explicit)?
        .context("no framework given; pass --framework or set STAIRS_DEFAULT_FRAMEWORK")
}

fn read_input(path: Option<&Path>) -> Result<String, Error> {
    match path {
        None => read_stdin(),
        Some(p) if p == Path::new("-") => read_stdin(),
        Some(p) => std::fs::read_to_string(p).map_err(|source| Error::Io {
            path: p.to_path_buf(),
            source,
        }),
    }
}

fn read_stdin() -> Result<String, Error> {
    let mut buf = String::new();
    std::io::stdin()
        .read_to_string(&mut buf)
        .map_err(|source| Error::Io {
            path: PathBuf::from("<stdin>"),
            source,
        })?;
    Ok(buf)
}

fn to_json<T: serde::Serialize>(value: &T, pretty: bool) -> Result<String, Error> {
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    Ok(json)
}

struct BatchCounts {
    files: usize,
    parsed: usize,
    empty: usize,
    errors: usize,
}

impl BatchCounts {
    fn print(&self) {
        eprintln!(
            "Processed {} files: {} with data, {} empty, {} unreadable.",
            self.files, self.parsed, self.empty, self.errors,
        );
    }
}

fn process_files(files: &[PathBuf], kind: FrameworkKind) -> anyhow::Result<BatchCounts> {
    use indicatif::{ProgressBar, ProgressStyle};
    use rayon::prelude::*;

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({per_sec})")?
            .progress_chars("#>-"),
    );

    let results: Vec<(&PathBuf, Result<Option<FrameworkResult>, Error>)> = files
        .par_iter()
        .map(|path| {
            let parsed = read_input(Some(path)).map(|text| parse(&text, kind));
            pb.inc(1);
            (path, parsed)
        })
        .collect();
    pb.finish_and_clear();

    let mut counts = BatchCounts {
        files: files.len(),
        parsed: 0,
        empty: 0,
        errors: 0,
    };

    for (path, parsed) in results {
        let result = match parsed {
            Ok(result) => result,
            Err(e) => {
                warn!(error = %e, "skipping file");
                counts.errors += 1;
                continue;
            }
        };
        if result.is_some() {
            counts.parsed += 1;
        } else {
            counts.empty += 1;
        }
        let line = serde_json::json!({ "file": path.display().to_string(), "result": result });
        println!("{}", to_json(&line, false)?);
    }

    Ok(counts)
}

fn format_duration(d: std::time::Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        format!("{:.1}s", d.as_secs_f64())
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m {}s", secs / 3600, (secs % 3600) / 60, secs % 60)
    }
}
