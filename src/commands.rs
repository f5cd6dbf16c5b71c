//! Command-line interface definition for dirzip.
//!
//! This module defines the CLI flags and the interactive flow around a run:
//! previewing the directory, asking for confirmation and printing the summary.

use crate::application::{Level, Settings};
use crate::archive::{ArchiveOptions, ArchiveReport, create_archive};
use crate::{path_util, walker};
use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use std::env;
use std::fs;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

/// Command-line interface definition for dirzip.
#[derive(Parser, Debug)]
#[command(
    version,
    about = "Create a zip file of all contents in the current directory",
    long_about = None
)]
pub struct Cli {
    /// Output zip filename (default: timestamped filename).
    #[arg(short, long)]
    pub output: Option<String>,
    /// Include hidden files and directories (those starting with .).
    #[arg(long)]
    pub include_hidden: bool,
    /// Verbose output (show each file being added). Skips the confirmation.
    #[arg(short, long)]
    pub verbose: bool,
    /// Create the archive without asking for confirmation.
    #[arg(short, long)]
    pub yes: bool,
    /// Directory to archive (default: current directory).
    #[arg(short = 'C', long)]
    pub directory: Option<PathBuf>,
    /// Compression level.
    #[arg(short, long)]
    pub level: Option<Level>,
}

impl Cli {
    /// Merges the flags with the persistent settings. Flags win.
    fn options(&self, root: PathBuf, output: PathBuf, settings: Settings) -> ArchiveOptions {
        let level = self.level.or(settings.level).unwrap_or_default();
        ArchiveOptions::new(root, output)
            .include_hidden(self.include_hidden || settings.include_hidden)
            .level(level)
            .extra_suffixes(settings.exclude_suffixes)
    }
}

/// Runs the whole command: preview, confirmation, archive creation and summary.
///
/// # Errors
/// Returns an error if the settings are invalid, the directory cannot be
/// archived or the archive cannot be created.
pub fn run(cli: Cli) -> Result<()> {
    let settings = Settings::load()?;
    let cwd = env::current_dir().context("Unable to find current path")?;
    let root = cli.directory.clone().unwrap_or_else(|| cwd.clone());
    path_util::check_dir(&root)?;

    println!("Working directory: {}", root.display());
    println!(
        "Found {} items to potentially zip",
        walker::count_entries(&root)
    );

    if !(cli.verbose || cli.yes) {
        let stdin = io::stdin();
        let proceed = confirm(
            &mut stdin.lock(),
            &mut io::stdout(),
            "\nProceed with creating zip? (y/N): ",
        )?;
        if !proceed {
            println!("Operation cancelled.");
            return Ok(());
        }
    }

    let now = Local::now().naive_local();
    let output = path_util::resolve_output(&cwd, cli.output.as_deref(), now);
    println!("Creating zip file: {}", output.display());
    println!("Source directory: {}", root.display());

    let report = create_archive(cli.options(root, output, settings))?;
    print!("{}", summary(&report));
    println!("\nZip creation completed successfully!");
    Ok(())
}

/// Asks a yes/no question. Only `y` and `yes` (any case) count as consent;
/// end of input counts as no.
pub(crate) fn confirm<R: BufRead, W: Write>(
    input: &mut R,
    out: &mut W,
    prompt: &str,
) -> io::Result<bool> {
    write!(out, "{prompt}")?;
    out.flush()?;
    let mut answer = String::new();
    input.read_line(&mut answer)?;
    let answer = answer.trim().to_lowercase();
    Ok(answer == "y" || answer == "yes")
}

fn summary(report: &ArchiveReport) -> String {
    let location = fs::canonicalize(&report.output).unwrap_or_else(|_| report.output.clone());
    let mut s = String::from("\n✓ Zip file created successfully!\n");
    s.push_str(&format!("Files added: {}\n", report.files_added));
    s.push_str(&format!("Folders added: {}\n", report.folders_added));
    s.push_str(&format!(
        "Zip file size: {}\n",
        format_megabytes(report.archive_size)
    ));
    s.push_str(&format!("Location: {}\n", location.display()));
    if !report.warnings.is_empty() {
        s.push_str(&format!(
            "Skipped {} entries that could not be added\n",
            report.warnings.len()
        ));
    }
    s
}

fn format_megabytes(bytes: u64) -> String {
    format!("{:.2} MB", bytes as f64 / (1024.0 * 1024.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archive::EntryWarning;
    use std::io::Cursor;

    fn ask(answer: &str) -> bool {
        let mut input = Cursor::new(answer.as_bytes().to_vec());
        let mut out = Vec::new();
        let result = confirm(&mut input, &mut out, "Proceed? ").unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "Proceed? ");
        result
    }

    #[test]
    fn test_confirm_answers() {
        assert!(ask("y\n"));
        assert!(ask("yes\n"));
        assert!(ask("  YES  \n"));
        assert!(!ask("n\n"));
        assert!(!ask("\n"));
        assert!(!ask("yep\n"));
        assert!(!ask(""));
    }

    #[test]
    fn test_format_megabytes() {
        assert_eq!(format_megabytes(0), "0.00 MB");
        assert_eq!(format_megabytes(1024 * 1024), "1.00 MB");
        assert_eq!(format_megabytes(3 * 1024 * 1024 / 2), "1.50 MB");
    }

    #[test]
    fn test_summary() {
        let mut report = ArchiveReport {
            output: PathBuf::from("/nowhere/backup.zip"),
            files_added: 2,
            folders_added: 1,
            archive_size: 2048,
            ..Default::default()
        };
        let s = summary(&report);
        assert!(s.contains("Files added: 2"));
        assert!(s.contains("Folders added: 1"));
        assert!(s.contains("Location: /nowhere/backup.zip"));
        assert!(!s.contains("Skipped"));

        report.warnings.push(EntryWarning {
            path: PathBuf::from("gone.txt"),
            message: "No such file or directory".to_string(),
        });
        assert!(summary(&report).contains("Skipped 1 entries"));
    }

    #[test]
    fn test_flags_override_settings() {
        let cli = Cli::parse_from(["dz", "--level", "best"]);
        let settings = Settings {
            include_hidden: true,
            level: Some(Level::Fastest),
            exclude_suffixes: vec![".log".to_string()],
        };
        let options = cli.options(PathBuf::from("."), PathBuf::from("out.zip"), settings);
        assert_eq!(options.level, Level::Best);
        assert!(options.include_hidden);
        assert_eq!(options.extra_suffixes, vec![".log"]);

        let cli = Cli::parse_from(["dz", "--include-hidden"]);
        let options = cli.options(
            PathBuf::from("."),
            PathBuf::from("out.zip"),
            Settings::default(),
        );
        assert_eq!(options.level, Level::Default);
        assert!(options.include_hidden);
    }
}
