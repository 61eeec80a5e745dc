//! Cinetag - Movie Poster Embedding
//!
//! Command-line entry point: embeds poster art into MP4 and MKV files.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing::{info, Level};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use tracing_appender::{non_blocking, rolling};

use cinetag::batch::{collect_jobs, run_batch};
use cinetag::cli::{Args, Commands};
use cinetag::config::Config;
use cinetag::error::CinetagError;
use cinetag::mkv::AttachmentEditorFactory;
use cinetag::{mp4, CoverImage, MediaFormat, TagEvent, TagWriter};

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Setup logging to both console and file
    setup_logging(args.verbose)?;

    // Load configuration
    let config = match &args.config {
        Some(config_path) => Config::from_file(config_path)?,
        None => {
            if Path::new("config.toml").exists() {
                info!("Found config.toml in current directory, loading...");
                Config::from_file("config.toml")?
            } else {
                Config::default()
            }
        }
    };

    match args.command {
        Commands::Write { video, poster } => {
            let cover = CoverImage::from_path(&poster)?;
            let writer = TagWriter::new(&config);
            let json = args.json;

            // The terminal event already reports failures; only the exit status is left
            let outcome = writer.write_tags_to_file(&video, &cover, |event| print_event(&event, json));
            if outcome.is_err() {
                std::process::exit(1);
            }
        }
        Commands::Batch { input_dir, max_parallel } => {
            info!("Processing directory: {}", input_dir.display());

            let max_parallel = max_parallel.unwrap_or(config.batch.max_parallel);
            if max_parallel == 0 {
                return Err(CinetagError::Config("max-parallel must be at least 1".to_string()).into());
            }

            let (jobs, skipped) = collect_jobs(&input_dir, &config.batch)?;
            let writer = Arc::new(TagWriter::new(&config));
            let report = run_batch(writer, jobs, skipped, max_parallel, !args.json).await;

            let relative = |path: &PathBuf| relative_to(path, &input_dir);

            if args.json {
                let summary = serde_json::json!({
                    "written": report.written.iter().map(relative).collect::<Vec<_>>(),
                    "failed": report.failed.iter().map(|(p, e)| serde_json::json!({"file": relative(p), "error": e})).collect::<Vec<_>>(),
                    "skipped": report.skipped.iter().map(relative).collect::<Vec<_>>(),
                });
                println!("{}", serde_json::to_string(&summary)?);
            } else {
                println!("\nBatch Summary:");
                println!("{:<10} {:<60}", "Status", "File");
                println!("{}", "-".repeat(70));
                for path in &report.written {
                    println!("{:<10} {:<60}", "written", relative(path));
                }
                for path in &report.skipped {
                    println!("{:<10} {:<60}", "skipped", relative(path));
                }
                for (path, error) in &report.failed {
                    println!("{:<10} {:<60} {}", "failed", relative(path), error);
                }
                println!(
                    "\n{} written, {} skipped, {} failed",
                    report.written.len(),
                    report.skipped.len(),
                    report.failed.len()
                );
            }

            if !report.is_success() {
                std::process::exit(1);
            }
        }
        Commands::Detect { input } => {
            let format = MediaFormat::from_path(&input);
            let covers = match format {
                MediaFormat::Mp4 => Some(mp4::read_cover_art(&input)?.len()),
                _ => None,
            };

            if args.json {
                let value = serde_json::json!({ "file": input, "format": format, "cover_art_items": covers });
                println!("{}", serde_json::to_string(&value)?);
            } else {
                println!("{}: {}", input.display(), format);
                if let Some(count) = covers {
                    println!("Cover art items: {}", count);
                }
            }
        }
        Commands::Check => {
            let editor = AttachmentEditorFactory::create_editor(config.mkv.clone());
            editor.check_availability()?;
            println!("{}", editor.version()?);
        }
        Commands::InitConfig { output } => {
            config.save_to_file(&output)?;
            println!("Configuration written to {}", output.display());
        }
    }

    Ok(())
}

/// Display `path` relative to `base` when possible
fn relative_to(path: &Path, base: &Path) -> String {
    pathdiff::diff_paths(path, base)
        .unwrap_or_else(|| path.to_path_buf())
        .display()
        .to_string()
}

fn print_event(event: &TagEvent, json: bool) {
    if json {
        match serde_json::to_string(event) {
            Ok(line) => println!("{}", line),
            Err(e) => eprintln!("Failed to serialize event: {}", e),
        }
    } else if let TagEvent::Error(message) = event {
        eprintln!("Error: {}", message);
    } else {
        println!("{}", event.message());
    }
}

/// Setup logging to both console and file
fn setup_logging(verbose: bool) -> Result<()> {
    let log_dir = std::env::current_dir()?.join(".cinetag").join("log");
    std::fs::create_dir_all(&log_dir)?;

    // Set up file appender with daily rotation
    let file_appender = rolling::daily(&log_dir, "cinetag.log");
    let (non_blocking_file, guard) = non_blocking(file_appender);
    // Keep the guard alive for the duration of the program
    std::mem::forget(guard);

    let log_level = if verbose { Level::DEBUG } else { Level::INFO };

    // Console logs go to stderr so event output on stdout stays clean
    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_file(true)
        .with_line_number(true);

    let file_layer = fmt::layer()
        .with_writer(non_blocking_file)
        .with_target(false)
        .with_thread_ids(true)
        .with_thread_names(true)
        .with_file(true)
        .with_line_number(true)
        .with_ansi(false);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive(log_level.into()))
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    info!("Logging initialized - console: {}, file: {}",
          log_level, log_dir.join("cinetag.log").display());

    Ok(())
}
