//! quill - render markdown documentation to HTML
//!
//! Headings get unique permalink anchors and fenced code blocks of the
//! configured languages are re-highlighted with tree-sitter grammars.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use eyre::{Result, WrapErr};
use owo_colors::OwoColorize;
use quill::config::{self, DEFAULT_CONFIG_PATH};
use quill::output::{OutputFormat, format_document, output_path};
use quill::render_file;
use quill_core::RenderOptions;
use tracing_subscriber::EnvFilter;

/// CLI arguments
#[derive(Debug, Parser)]
#[command(name = "quill", version, about)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

/// Subcommands
#[derive(Debug, Subcommand)]
enum Command {
    /// Render markdown files to HTML
    Render {
        /// Markdown files to render
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Path to config file (default: .config/quill/config.yaml)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Output file, or directory when several files are given (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Html)]
        format: OutputFormat,

        /// Leave code blocks as plain escaped text
        #[arg(long)]
        no_highlight: bool,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("QUILL_LOG").unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    match args.command {
        Command::Render {
            files,
            config,
            output,
            format,
            no_highlight,
        } => {
            let config_path = config.unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));
            let config = config::load(&config_path)?;
            let options = config.to_render_options(no_highlight);

            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_time()
                .build()
                .wrap_err("Failed to start async runtime")?;
            runtime.block_on(run_render_command(&files, &options, output.as_deref(), format))
        }
    }
}

async fn run_render_command(
    files: &[PathBuf],
    options: &RenderOptions,
    output: Option<&Path>,
    format: OutputFormat,
) -> Result<()> {
    let several = files.len() > 1;
    if let (Some(dir), true) = (output, several) {
        std::fs::create_dir_all(dir)
            .wrap_err_with(|| format!("Failed to create {}", dir.display()))?;
    }

    let mut to_stdout = Vec::new();

    for file in files {
        eprintln!("{} Rendering {}...", "->".blue().bold(), file.display());

        let doc = render_file(file, options).await?;
        eprintln!(
            "   Anchored {} headings",
            doc.headings.len().to_string().green()
        );

        let rendered = format_document(file, &doc, format)?;

        match output {
            Some(dir) if several => write_output(&output_path(dir, file, format), &rendered)?,
            Some(path) => write_output(path, &rendered)?,
            None => to_stdout.push(rendered),
        }
    }

    if !to_stdout.is_empty() {
        if format == OutputFormat::Json && several {
            println!("[{}]", to_stdout.join(",\n"));
        } else {
            for rendered in &to_stdout {
                print!("{rendered}");
                if !rendered.ends_with('\n') {
                    println!();
                }
            }
        }
    }

    Ok(())
}

fn write_output(path: &Path, content: &str) -> Result<()> {
    std::fs::write(path, content).wrap_err_with(|| format!("Failed to write {}", path.display()))?;
    eprintln!("   {} Wrote {}", "OK".green().bold(), path.display());
    Ok(())
}
