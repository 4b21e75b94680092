use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use clap::Args;
use tracing::warn;

use crate::cli::OutputFormat;
use crate::core::options::ValidationOptions;
use crate::core::types::{Category, CountKind, Severity};
use crate::utils::validation::is_fasta_file;
use crate::validation::engine::FastaValidator;
use crate::validation::report::ValidationReport;

#[derive(Args)]
pub struct ValidateArgs {
    /// Input FASTA file (.fasta, .fa, .faa, .fna, optionally .gz/.bgz)
    #[arg(required = true)]
    pub input: PathBuf,

    /// JSON parameter file; keys present override command-line options
    #[arg(short = 'p', long)]
    pub parameter_file: Option<PathBuf>,

    /// Accept '*' as a residue character
    #[arg(long)]
    pub allow_asterisk: bool,

    /// Do not warn about blank lines between entries
    #[arg(long)]
    pub no_blank_line_warnings: bool,

    /// Treat a missing final line terminator as corrected rather than reporting it
    #[arg(long)]
    pub add_missing_line_feed: bool,

    /// Detailed records retained per category (totals are always exact)
    #[arg(long, default_value = "100")]
    pub max_detailed: usize,

    /// Minimum protein name length before a warning
    #[arg(long, default_value = "3")]
    pub min_name_length: usize,

    /// Maximum protein name length before a warning
    #[arg(long, default_value = "34")]
    pub max_name_length: usize,

    /// Write a statistics file next to the input
    #[arg(long)]
    pub stats: bool,

    /// Write the sequence hash to names mapping next to the input
    #[arg(long)]
    pub save_hash_info: bool,

    /// Exit with an error if any Error-severity defect is found
    #[arg(long)]
    pub strict: bool,
}

impl ValidateArgs {
    fn options(&self) -> ValidationOptions {
        ValidationOptions {
            output_to_stats_file: self.stats,
            add_missing_line_feed_at_end_of_file: self.add_missing_line_feed,
            allow_asterisk_in_residues: self.allow_asterisk,
            warn_on_blank_lines_between_entries: !self.no_blank_line_warnings,
            save_sequence_hash_info: self.save_hash_info,
            maximum_detailed_records_per_category: self.max_detailed,
            minimum_name_length: self.min_name_length,
            maximum_name_length: self.max_name_length,
        }
    }
}

/// Execute validate subcommand
///
/// # Errors
///
/// Returns an error if the run did not complete, if an output file cannot be
/// written, or with `--strict` when Error-severity defects were found.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(args: ValidateArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    if !is_fasta_file(&args.input) {
        warn!(
            "{} does not have a FASTA extension; validating anyway",
            args.input.display()
        );
    }

    let mut validator = FastaValidator::new(args.options());
    let succeeded = validator.process_file(&args.input, args.parameter_file.as_deref());
    let options = validator.effective_options().clone();
    let report = validator
        .take_report()
        .ok_or_else(|| anyhow::anyhow!("No report produced"))?;

    match format {
        OutputFormat::Text => print_text_report(&args.input, &report, verbose),
        OutputFormat::Json => print_json_report(&args.input, &report)?,
        OutputFormat::Tsv => print_tsv_report(&report),
    }

    if !succeeded {
        anyhow::bail!(
            "Validation failed: {}",
            report.fatal_error_message().unwrap_or("unknown error")
        );
    }

    // Side-effect files are only written for completed runs
    if options.output_to_stats_file {
        let path = sibling_path(&args.input, "_stats.txt");
        std::fs::write(&path, format_stats(&args.input, &report))?;
        if verbose {
            eprintln!("Wrote statistics to {}", path.display());
        }
    }

    if options.save_sequence_hash_info {
        let path = sibling_path(&args.input, "_sequence_hashes.tsv");
        std::fs::write(&path, format_hash_info(&report))?;
        if verbose {
            eprintln!("Wrote sequence hash info to {}", path.display());
        }
    }

    if args.strict && report.has_errors() {
        anyhow::bail!(
            "{} error(s) found in {}",
            report.error_count(CountKind::Total),
            args.input.display()
        );
    }

    Ok(())
}

/// Path next to `input` with compression and FASTA extensions replaced by `suffix`
fn sibling_path(input: &Path, suffix: &str) -> PathBuf {
    let name = input
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    let lower = name.to_lowercase();

    let without_compression = [".gz", ".bgz"]
        .iter()
        .find(|ext| lower.ends_with(*ext))
        .map_or(name.as_str(), |ext| &name[..name.len() - ext.len()]);

    let stem = Path::new(without_compression)
        .file_stem()
        .map_or_else(String::new, |s| s.to_string_lossy().to_string());

    input.with_file_name(format!("{stem}{suffix}"))
}

fn print_text_report(input: &Path, report: &ValidationReport, verbose: bool) {
    println!("Validation Results");
    println!("{}", "=".repeat(60));
    println!("\nInput: {}", input.display());

    if !report.succeeded {
        println!(
            "\nValidation failed: {}",
            report.fatal_error_message().unwrap_or("unknown error")
        );
        return;
    }

    let summary = &report.summary;
    println!("  Entries: {}", summary.entries);
    println!("  Residues: {}", summary.residues);
    println!("  Lines: {}", summary.lines);
    if verbose {
        println!("  Bytes: {}", summary.bytes);
        println!("  Distinct sequences: {}", summary.distinct_sequences);
        println!("  Encoding: {}", summary.encoding);
    }

    println!(
        "\nErrors: {} ({} shown)",
        report.error_count(CountKind::Total),
        report.error_count(CountKind::Tracked)
    );
    println!(
        "Warnings: {} ({} shown)",
        report.warning_count(CountKind::Total),
        report.warning_count(CountKind::Tracked)
    );

    if !report.counts.is_empty() {
        println!("\nBy Category:");
        for (category, tally) in report.counts.iter() {
            println!(
                "  {:<8} {:<34} {}",
                category.severity().to_string(),
                category.label(),
                tally.total
            );
        }
    }

    for severity in [Severity::Error, Severity::Warning] {
        let records = report.records(severity);
        if records.is_empty() {
            continue;
        }
        println!("\n{severity}s:");
        for record in records {
            println!("  line {}: {}", record.line_number(), record.message());
        }
    }
}

fn print_json_report(input: &Path, report: &ValidationReport) -> anyhow::Result<()> {
    let output = serde_json::json!({
        "input": input.display().to_string(),
        "succeeded": report.succeeded,
        "fatal_error_message": report.fatal_error_message(),
        "summary": report.summary,
        "error_count": {
            "total": report.error_count(CountKind::Total),
            "tracked": report.error_count(CountKind::Tracked),
        },
        "warning_count": {
            "total": report.warning_count(CountKind::Total),
            "tracked": report.warning_count(CountKind::Tracked),
        },
        "counts": report.counts,
        "errors": report.errors,
        "warnings": report.warnings,
    });

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn print_tsv_report(report: &ValidationReport) {
    println!("severity\tcategory\tline\tmessage");
    for severity in [Severity::Error, Severity::Warning] {
        for record in report.records(severity) {
            println!(
                "{}\t{}\t{}\t{}",
                record.severity(),
                record.category(),
                record.line_number(),
                record.message()
            );
        }
    }
}

/// Tab-delimited statistics file contents
fn format_stats(input: &Path, report: &ValidationReport) -> String {
    let summary = &report.summary;
    let mut out = String::new();

    let _ = writeln!(out, "created_at\t{}", chrono::Utc::now().to_rfc3339());
    let _ = writeln!(out, "input\t{}", input.display());
    let _ = writeln!(out, "entries\t{}", summary.entries);
    let _ = writeln!(out, "residues\t{}", summary.residues);
    let _ = writeln!(out, "lines\t{}", summary.lines);
    let _ = writeln!(out, "bytes\t{}", summary.bytes);
    let _ = writeln!(out, "distinct_sequences\t{}", summary.distinct_sequences);
    let _ = writeln!(out, "encoding\t{}", summary.encoding);
    let _ = writeln!(out, "errors\t{}", report.error_count(CountKind::Total));
    let _ = writeln!(out, "warnings\t{}", report.warning_count(CountKind::Total));

    let _ = writeln!(out, "\nseverity\tcategory\ttotal\tretained");
    for category in Category::ALL {
        let tally = report.counts.tally(category);
        let _ = writeln!(
            out,
            "{}\t{}\t{}\t{}",
            category.severity(),
            category.label(),
            tally.total,
            tally.retained
        );
    }
    out
}

/// Hash info file: one row per distinct sequence
fn format_hash_info(report: &ValidationReport) -> String {
    let mut out = String::from("hash\tsequence_length\tname_count\tfirst_seen_name\tadditional_names\n");
    for entry in &report.sequence_hashes {
        let _ = writeln!(
            out,
            "{}\t{}\t{}\t{}\t{}",
            entry.hash,
            entry.sequence_length,
            entry.additional_names.len() + 1,
            entry.first_seen_name,
            entry.additional_names.join(",")
        );
    }
    out
}
