//! pdfsift CLI - PDF metadata and text extraction tool

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use pdfsift::{extract_metadata, extract_text, parse_pdf_date, process_batch, ResultAggregator};

#[derive(Parser)]
#[command(name = "pdfsift")]
#[command(version)]
#[command(about = "Extract PDF metadata and text, and export batch tables", long_about = None)]
#[command(args_conflicts_with_subcommands = true)]
struct Cli {
    /// Input PDF files (shortcut for the export command)
    #[arg(value_name = "FILES")]
    inputs: Vec<PathBuf>,

    /// Output file for the shortcut export
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show metadata for each file
    #[command(alias = "meta")]
    Metadata {
        /// Input PDF files
        #[arg(value_name = "FILES", required = true)]
        inputs: Vec<PathBuf>,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Extract plain text from a file
    Text {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Export a batch of files to a CSV or JSON table
    Export {
        /// Input PDF files
        #[arg(value_name = "FILES", required = true)]
        inputs: Vec<PathBuf>,

        /// Output file (timestamped name if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Include extracted text in the table
        #[arg(long)]
        include_text: bool,

        /// Write JSON instead of CSV
        #[arg(long)]
        json: bool,
    },

    /// Show version information
    Version,
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Metadata { inputs, json }) => cmd_metadata(&inputs, json),
        Some(Commands::Text { input, output }) => cmd_text(&input, output.as_deref()),
        Some(Commands::Export {
            inputs,
            output,
            include_text,
            json,
        }) => cmd_export(&inputs, output.as_deref(), include_text, json),
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        None => {
            if !cli.inputs.is_empty() {
                cmd_export(&cli.inputs, cli.output.as_deref(), false, false)
            } else {
                println!("{}", "Usage: pdfsift <FILES...> [-o OUTPUT]".yellow());
                println!("       pdfsift --help for more information");
                Ok(())
            }
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn cmd_metadata(inputs: &[PathBuf], json: bool) -> Result<(), Box<dyn std::error::Error>> {
    for path in inputs {
        let name = display_name(path);

        match extract_metadata(path) {
            Ok(metadata) => {
                if json {
                    println!("{}", serde_json::to_string_pretty(&metadata)?);
                    continue;
                }

                println!("{}", name.cyan().bold());
                if metadata.is_empty() {
                    println!("  {}", "no metadata found".yellow());
                }
                for (key, value) in &metadata.fields {
                    if key.contains("XML") {
                        println!("  {}: ({} bytes of raw XML)", key, value.len());
                    } else if key == "CreationDate" || key == "ModDate" {
                        match parse_pdf_date(value) {
                            Some(date) => println!(
                                "  {}: {} ({})",
                                key,
                                value,
                                date.format("%Y-%m-%d %H:%M:%S")
                            ),
                            None => println!("  {}: {}", key, value),
                        }
                    } else {
                        println!("  {}: {}", key, value);
                    }
                }
            }
            Err(e) => {
                eprintln!("{}: {}: {}", "Error".red().bold(), name, e);
            }
        }
    }

    Ok(())
}

fn cmd_text(input: &Path, output: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let extraction = extract_text(input);

    if extraction.is_failed() {
        eprintln!(
            "{}: {}: {}",
            "Warning".yellow().bold(),
            display_name(input),
            extraction.display_text()
        );
    }

    match output {
        Some(path) => {
            fs::write(path, extraction.display_text())?;
            println!("{} Text written to {}", "✓".green(), path.display());
        }
        None => println!("{}", extraction.display_text()),
    }

    Ok(())
}

fn cmd_export(
    inputs: &[PathBuf],
    output: Option<&Path>,
    include_text: bool,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let pb = ProgressBar::new(inputs.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap()
            .progress_chars("#>-"),
    );

    let mut aggregator = ResultAggregator::new();
    let mut warnings: Vec<String> = Vec::new();

    for path in inputs {
        let name = display_name(path);
        pb.set_message(name.clone());

        match fs::read(path) {
            Ok(data) => {
                let report = process_batch(&mut aggregator, std::iter::once((name, data)));
                warnings.extend(report.warnings.iter().map(|w| w.to_string()));
            }
            Err(e) => warnings.push(format!("{}: {}", name, e)),
        }

        pb.inc(1);
    }
    pb.finish_and_clear();

    for warning in &warnings {
        eprintln!("{} {}", "Warning:".yellow().bold(), warning);
    }

    if aggregator.is_empty() {
        println!("{}", "Nothing to export: no document contributed metadata.".yellow());
        return Ok(());
    }

    let table = aggregator.to_table(include_text);
    let serialized = if json {
        table.to_json(true)?
    } else {
        table.to_csv()?
    };

    let output_path = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| default_export_name(json));
    fs::write(&output_path, serialized)?;

    println!(
        "{} Exported metadata from {} file(s) to {}",
        "✓".green(),
        aggregator.len(),
        output_path.display()
    );

    Ok(())
}

fn cmd_version() {
    println!("pdfsift {}", env!("CARGO_PKG_VERSION"));
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn default_export_name(json: bool) -> PathBuf {
    let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
    let ext = if json { "json" } else { "csv" };
    PathBuf::from(format!("pdf_metadata_export_{}.{}", timestamp, ext))
}
