use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use hazard_utils::logging::{init_logging, LogConfig};
use hazard_utils::{
    classify_files_with, collect_files, print_simple_summary, print_summary_report,
    validate_upload, BatchSummary, ClassificationResult, ClassifierConfig, HazardAnalysis,
    HazardClassifier, HazardValidation, UploadPolicy, IMAGE_EXTENSIONS,
};
use indicatif::{ProgressBar, ProgressStyle};
use serde_json::json;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::Level;

#[derive(Parser)]
#[command(name = "hazard-check")]
#[command(version, about = "Heuristic hazard photo classifier", long_about = None)]
struct Cli {
    /// Debug-level logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Log directory (default: system temp dir)
    #[arg(long, global = true, value_name = "DIR")]
    log_dir: Option<PathBuf>,

    /// JSON file overriding classifier thresholds and keyword tables
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Score an image (or every image in a directory) and show the breakdown
    Analyze {
        /// Input file or directory
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Recursive directory scan
        #[arg(short, long)]
        recursive: bool,

        /// Output format
        #[arg(short, long, value_enum, default_value = "human")]
        output: OutputFormat,

        /// Name to score instead of the file's own name (single file only)
        #[arg(long)]
        name: Option<String>,

        /// Directory mode: print only the one-line summary (human output)
        #[arg(short, long)]
        quiet: bool,
    },

    /// Run the upload gate on one file and print the report record as JSON
    Validate {
        /// Uploaded image
        input: PathBuf,

        /// Name the image was uploaded under (default: the file's own name)
        #[arg(long)]
        name: Option<String>,
    },
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON output (for API use)
    Json,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut log_config = LogConfig::default().with_level(if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    });
    if let Some(dir) = &cli.log_dir {
        log_config = log_config.with_log_dir(dir);
    }
    init_logging("hazard-check", log_config)?;

    let classifier = build_classifier(cli.config.as_deref())?;

    match cli.command {
        Commands::Analyze {
            input,
            recursive,
            output,
            name,
            quiet,
        } => {
            if input.is_file() {
                analyze_single_file(&classifier, &input, name.as_deref(), output)?;
            } else if input.is_dir() {
                analyze_directory(&classifier, &input, recursive, output, quiet)?;
            } else {
                eprintln!("❌ Error: Input path does not exist: {}", input.display());
                std::process::exit(1);
            }
        }

        Commands::Validate { input, name } => {
            let code = validate_file(&classifier, &input, name.as_deref())?;
            if code != 0 {
                std::process::exit(code);
            }
        }
    }

    Ok(())
}

fn build_classifier(config_path: Option<&Path>) -> anyhow::Result<HazardClassifier> {
    let config = match config_path {
        Some(path) => ClassifierConfig::from_json_file(path)
            .with_context(|| format!("Failed to load classifier config {}", path.display()))?,
        None => ClassifierConfig::default(),
    };
    Ok(HazardClassifier::new(config)?)
}

fn display_name(path: &Path, name: Option<&str>) -> String {
    match name {
        Some(n) => n.to_string(),
        None => path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default(),
    }
}

fn analyze_single_file(
    classifier: &HazardClassifier,
    path: &Path,
    name: Option<&str>,
    output_format: OutputFormat,
) -> anyhow::Result<()> {
    let file_name = display_name(path, name);

    match classifier.try_analyze_path(path, &file_name) {
        Ok(analysis) => {
            if output_format == OutputFormat::Json {
                println!("{}", serde_json::to_string_pretty(&analysis)?);
            } else {
                print_analysis_human(path, &analysis);
            }
        }
        Err(e) => {
            // Same decision the upload gate would take.
            let result = classifier.classify_path_as(path, &file_name);
            if output_format == OutputFormat::Json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&json!({
                        "file_name": file_name,
                        "error": e.to_string(),
                        "result": result,
                    }))?
                );
            } else {
                eprintln!("⚠️  Failed to analyze {}: {}", path.display(), e);
                print_result_human(&result);
            }
        }
    }

    Ok(())
}

fn analyze_directory(
    classifier: &HazardClassifier,
    dir: &Path,
    recursive: bool,
    output_format: OutputFormat,
    quiet: bool,
) -> anyhow::Result<()> {
    let files = collect_files(dir, IMAGE_EXTENSIONS, recursive);
    if files.is_empty() {
        eprintln!("⚠️  No images found in {}", dir.display());
        return Ok(());
    }

    let start = Instant::now();
    let pb = if output_format == OutputFormat::Human && !quiet {
        create_progress_bar(files.len() as u64)
    } else {
        ProgressBar::hidden()
    };
    let results = classify_files_with(classifier, &files, || pb.inc(1));
    pb.finish_and_clear();

    let summary: BatchSummary = results.iter().collect();

    if output_format == OutputFormat::Json {
        let entries: Vec<_> = results
            .iter()
            .map(|(path, result)| {
                json!({
                    "path": path.display().to_string(),
                    "result": result,
                })
            })
            .collect();
        println!(
            "{}",
            serde_json::to_string_pretty(&json!({
                "total": summary.total,
                "accepted": summary.accepted,
                "rejected": summary.rejected,
                "failed_open": summary.failed_open,
                "results": entries,
            }))?
        );
    } else if quiet {
        print_simple_summary(&summary);
    } else {
        for (path, result) in &results {
            println!(
                "{} {:<50} {:>6.2}%  {}",
                if result.accepted { "✅" } else { "🚫" },
                path.display(),
                result.confidence,
                result.category
            );
        }
        print_summary_report(&summary, start.elapsed());
    }

    Ok(())
}

/// Returns the process exit code: 0 accepted, 1 rejected, 2 upload refused.
fn validate_file(
    classifier: &HazardClassifier,
    path: &Path,
    name: Option<&str>,
) -> anyhow::Result<i32> {
    let file_name = display_name(path, name);
    let bytes =
        std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;

    match validate_upload(classifier, &UploadPolicy::default(), &file_name, &bytes) {
        Ok(record) => {
            println!("{}", serde_json::to_string_pretty(&record_json(&record))?);
            Ok(if record.is_hazard { 0 } else { 1 })
        }
        Err(e) => {
            tracing::warn!(file_name = %file_name, error = %e, "Upload refused");
            println!(
                "{}",
                serde_json::to_string_pretty(&json!({
                    "success": false,
                    "message": e.to_string(),
                }))?
            );
            Ok(2)
        }
    }
}

fn record_json(record: &HazardValidation) -> serde_json::Value {
    json!({
        "success": record.is_hazard,
        "is_hazard": record.is_hazard,
        "confidence": record.confidence,
        "hazard_type": record.hazard_type,
        "message": record.message,
    })
}

fn create_progress_bar(total: u64) -> ProgressBar {
    let pb = ProgressBar::new(total);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("🔍 [{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} ({eta})")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▓░"),
    );
    pb
}

fn print_analysis_human(path: &Path, analysis: &HazardAnalysis) {
    println!("\n📊 Hazard Image Analysis Report");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("📁 File: {}", path.display());
    println!("🏷️  Scored as: {}", analysis.file_name);
    println!("📐 Dimensions: {}x{}", analysis.width, analysis.height);

    println!("\n📈 Component Scores");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    let v = &analysis.visual;
    println!(
        "👁️  Visual:   {:>3}  (dark {:.1}%, variance {:.0}, edges {:.1}%)",
        v.score,
        v.dark_ratio * 100.0,
        v.variance,
        v.edge_density * 100.0
    );
    println!(
        "📝 Filename: {:>3}  ({})",
        analysis.filename.score,
        if analysis.filename.matched.is_empty() {
            "no keywords".to_string()
        } else {
            analysis.filename.matched.join(", ")
        }
    );
    let c = &analysis.color;
    println!(
        "🎨 Color:    {:>3}  (dark {:.0}%, brown {:.0}%, red {:.0}%, gray {:.0}%, orange {:.0}% of {} samples)",
        c.score,
        c.dark_ratio * 100.0,
        c.brown_ratio * 100.0,
        c.red_ratio * 100.0,
        c.gray_ratio * 100.0,
        c.orange_ratio * 100.0,
        c.sampled
    );
    let t = &analysis.texture;
    if t.total_blocks == 0 {
        println!("🧱 Texture:  {:>3}  (image below texture floor)", t.score);
    } else {
        println!(
            "🧱 Texture:  {:>3}  ({}/{} irregular blocks)",
            t.score, t.high_variance_blocks, t.total_blocks
        );
    }
    println!("Σ  Total:    {:>3}", analysis.total_score);

    print_result_human(&analysis.result);
}

fn print_result_human(result: &ClassificationResult) {
    println!("\n🧭 Decision");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!(
        "{} {}",
        if result.accepted { "✅ Accepted" } else { "🚫 Rejected" },
        HazardValidation::from(result).message
    );
    println!("📊 Confidence: {:.2}%", result.confidence);
    println!("🏷️  Hazard type: {}", result.category);
    println!("💬 {}", result.reason);
}
