//! Build-time content validator.
//!
//! Checks `lessons.yaml` and `training.yaml` and exits non-zero on any error,
//! so the web build can refuse to bundle broken content.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use colored::Colorize;
use drum_trainer::content::validate::{validate_content, ValidationReport};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "validate-content")]
#[command(about = "Validate drum lesson and training content")]
struct Args {
    /// Directory holding lessons.yaml and training.yaml
    #[arg(short, long, default_value = "content")]
    content_dir: PathBuf,
}

fn read(path: &Path) -> Option<String> {
    match fs::read_to_string(path) {
        Ok(text) => Some(text),
        Err(e) => {
            eprintln!("{}", format!("  ✗ Failed to read {}: {}", path.display(), e).red());
            None
        }
    }
}

fn print_section(report: &ValidationReport, section: &str, ok_message: String) {
    println!("\n{}", section.bold());
    let mut any = false;
    for issue in report.errors_in(section) {
        any = true;
        eprintln!("{}", format!("  ✗ {}", issue.message).red());
    }
    if !any {
        println!("{}", format!("  ✓ {}", ok_message).green());
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    println!("{}", "Validating drum content...".bold());

    let lessons = read(&args.content_dir.join("lessons.yaml"));
    let training = read(&args.content_dir.join("training.yaml"));
    let (lessons, training) = match (lessons, training) {
        (Some(l), Some(t)) => (l, t),
        _ => {
            eprintln!("{}", "\nContent files missing, cannot validate.".red().bold());
            return ExitCode::FAILURE;
        }
    };

    let report = validate_content(&lessons, &training);
    tracing::debug!(
        "{} lessons, {} exercises, {} errors",
        report.lesson_count,
        report.exercise_count,
        report.errors.len()
    );

    print_section(
        &report,
        "lessons.yaml",
        format!("{} lessons validated successfully", report.lesson_count),
    );
    print_section(
        &report,
        "training.yaml",
        format!("{} exercises validated", report.exercise_count),
    );
    print_section(
        &report,
        "references",
        "All exercise → lesson references are valid".to_string(),
    );

    if report.is_valid() {
        println!("\n{}", "All content is valid! ✓".green().bold());
        ExitCode::SUCCESS
    } else {
        eprintln!(
            "\n{}",
            "Validation failed. Fix the errors above before building.".red().bold()
        );
        ExitCode::FAILURE
    }
}
