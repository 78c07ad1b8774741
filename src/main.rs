mod cli;

use moovmend::{
    config,
    repair::{EventSink, RepairEvent, RepairJob, RepairWorker, TracingSink},
};
use moovmend_core::CorruptedCapture;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// Exit status when the batch completed but some files failed.
const EXIT_PARTIAL: u8 = 2;

struct RepairArgs {
    corrupted_dir: PathBuf,
    reference: PathBuf,
    output: Option<PathBuf>,
    keep_extension: bool,
    header_skip: Option<usize>,
    trailer_trim: Option<usize>,
    json: bool,
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // Respect RUST_LOG env var if set, otherwise use defaults based on verbose flag
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "moovmend=debug,moovmend_core=debug".to_string()
        } else {
            "moovmend=info,moovmend_core=info".to_string()
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Repair {
            corrupted_dir,
            reference,
            output,
            keep_extension,
            header_skip,
            trailer_trim,
            json,
        } => {
            let args = RepairArgs {
                corrupted_dir,
                reference,
                output,
                keep_extension,
                header_skip,
                trailer_trim,
                json,
            };
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(run_repair(args, cli.config.as_deref()))
        }
        Commands::Inspect { file, json } => {
            inspect_file(&file, cli.config.as_deref(), json).map(|_| ExitCode::SUCCESS)
        }
        Commands::Validate {
            config: config_path,
        } => {
            let path = config_path.or(cli.config);
            validate_config(path.as_deref()).map(|_| ExitCode::SUCCESS)
        }
        Commands::InitConfig { path } => init_config(&path).map(|_| ExitCode::SUCCESS),
        Commands::Version => {
            println!("moovmend {}", env!("CARGO_PKG_VERSION"));
            Ok(ExitCode::SUCCESS)
        }
    }
}

async fn run_repair(args: RepairArgs, config_path: Option<&Path>) -> Result<ExitCode> {
    let mut config = config::load_config_or_default(config_path)?;

    if let Some(bytes) = args.header_skip {
        config.profile.header_skip_bytes = bytes;
    }
    if let Some(bytes) = args.trailer_trim {
        config.profile.trailer_trim_bytes = bytes;
    }
    if args.keep_extension {
        config.output.strip_extension = false;
    }
    config::validate_config(&config)?;

    if !args.corrupted_dir.is_dir() {
        anyhow::bail!("Input directory does not exist: {:?}", args.corrupted_dir);
    }

    let mut job = RepairJob::new(&args.corrupted_dir, &args.reference, &config);
    if let Some(output) = args.output {
        job = job.with_output_dir(output);
    }

    tracing::debug!("Device profile: {:?}", job.profile);

    // With --json, stdout carries only the report; progress goes to the log.
    let json = args.json;
    let mut log_sink = TracingSink;
    let report = RepairWorker::spawn(job)
        .run_to_completion(|event| {
            if json {
                log_sink.emit(event.clone());
            } else {
                print_event(event);
            }
        })
        .await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("Repaired files saved to {}", report.output_dir.display());
    }

    if report.failed() > 0 {
        Ok(ExitCode::from(EXIT_PARTIAL))
    } else {
        Ok(ExitCode::SUCCESS)
    }
}

fn print_event(event: &RepairEvent) {
    let stamp = chrono::Local::now().format("%H:%M:%S");
    if event.is_error() {
        eprintln!("[{}] {}", stamp, event.log_line());
    } else {
        println!("[{}] {}", stamp, event.log_line());
    }
}

fn inspect_file(file: &Path, config_path: Option<&Path>, json: bool) -> Result<()> {
    if !file.exists() {
        anyhow::bail!("File does not exist: {:?}", file);
    }

    let config = config::load_config_or_default(config_path)?;
    let capture = CorruptedCapture::read(file)
        .with_context(|| format!("Failed to read capture: {:?}", file))?;
    let plan = capture
        .plan(&config.profile)
        .with_context(|| format!("Cannot repair {:?}", file))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&plan)?);
        return Ok(());
    }

    println!("File: {}", file.display());
    println!("Size: {} bytes", plan.input_len);
    println!("moov tags: {}", plan.marker_offsets.len());
    for offset in &plan.marker_offsets {
        println!("  at {} (0x{:x})", offset, offset);
    }
    println!("Anchor offset: {}", plan.anchor);
    println!(
        "Declared mdat size: {} (0x{:016x})",
        plan.declared_size, plan.declared_size
    );
    println!(
        "Profile: skip {} header bytes, trim {} trailer bytes",
        config.profile.header_skip_bytes, config.profile.trailer_trim_bytes
    );
    println!("Repaired size: {} bytes", plan.output_len);

    Ok(())
}

fn validate_config(path: Option<&Path>) -> Result<()> {
    let config = match path {
        Some(p) => {
            println!("Validating config: {:?}", p);
            let config = config::load_config(p)?;
            println!("✓ Configuration is valid");
            config
        }
        None => {
            println!("No config file specified, using defaults");
            config::Config::default()
        }
    };

    println!(
        "  Profile: header skip {} bytes, trailer trim {} bytes",
        config.profile.header_skip_bytes, config.profile.trailer_trim_bytes
    );
    println!("  Output dir name: {}", config.output.dir_name);
    println!(
        "  Temp extension: .{} (strip: {})",
        config.output.temp_extension, config.output.strip_extension
    );
    if config.scan.extensions.is_empty() {
        println!("  Extensions: all files");
    } else {
        println!("  Extensions: {}", config.scan.extensions.join(", "));
    }

    Ok(())
}

fn init_config(path: &Path) -> Result<()> {
    if path.exists() {
        anyhow::bail!("Refusing to overwrite existing file: {:?}", path);
    }
    config::save_config(path, &config::Config::default())?;
    println!("Wrote default config to {}", path.display());
    Ok(())
}
