//! CLI tool for converting decoded PDF page text into PowerPoint slides.

use anyhow::{Context, Result};
use clap::Parser;
use slidecast_core::pipeline::GENERATE_PERCENT;
use slidecast_core::{
    Conversion, Converter, JsonFragmentSource, PageWarning, Progress, StyleProfile,
};
use slidecast_pptx::PptxWriter;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Convert PDF text dumps into PowerPoint presentations.
#[derive(Parser, Debug)]
#[command(name = "slidecast")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Decoder output file(s): JSON pages of positioned text fragments
    #[arg(required_unless_present = "dump_profile")]
    input: Vec<PathBuf>,

    /// Style profile (JSON). Uses the built-in profile if omitted
    #[arg(short = 'c', long)]
    profile: Option<PathBuf>,

    /// Output directory (default: same as input file)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Vertical tolerance for grouping fragments into lines
    #[arg(short, long)]
    tolerance: Option<f64>,

    /// Write slide descriptions as JSON instead of PPTX
    #[arg(long)]
    json: bool,

    /// Print slide descriptions as JSON to stdout instead of writing files
    #[arg(short, long)]
    print: bool,

    /// Map pages in parallel
    #[arg(long)]
    parallel: bool,

    /// Print the built-in style profile and exit
    #[arg(long)]
    dump_profile: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    if args.verbose {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    }

    if args.dump_profile {
        println!("{}", StyleProfile::default().to_json_pretty()?);
        return Ok(());
    }

    let mut profile = match &args.profile {
        Some(path) => StyleProfile::from_path(path)
            .with_context(|| format!("Failed to load profile {}", path.display()))?,
        None => StyleProfile::default(),
    };
    if let Some(tolerance) = args.tolerance {
        profile = profile.with_line_tolerance(tolerance);
    }

    let converter = Converter::new(profile);
    let writer = PptxWriter::new();

    for input_path in &args.input {
        if args.verbose {
            eprintln!("Processing: {}", input_path.display());
        }

        if let Err(e) = process_file(input_path, &args, &converter, &writer) {
            eprintln!("Error processing {}: {:#}", input_path.display(), e);
        }
    }

    Ok(())
}

/// Convert a single decoder dump.
fn process_file(
    input_path: &Path,
    args: &Args,
    converter: &Converter,
    writer: &PptxWriter,
) -> Result<()> {
    report(args, &Progress::new("Reading input", 0));
    let source = JsonFragmentSource::from_path(input_path)
        .with_context(|| format!("Failed to read {}", input_path.display()))?;

    report(args, &Progress::new("Parsing pages", 10));
    let conversion = if args.parallel {
        converter.convert_parallel(&source)?
    } else {
        converter.convert(&source, |p| report(args, p))?
    };

    for warning in &conversion.warnings {
        log::warn!("{}", describe_warning(warning));
    }

    if args.verbose {
        eprintln!("  Converted {} pages", conversion.slides.len());
    }

    if args.print {
        println!("{}", serde_json::to_string_pretty(&conversion.slides)?);
        return Ok(());
    }

    report(args, &Progress::new("Generating presentation", GENERATE_PERCENT));
    let extension = if args.json { "json" } else { "pptx" };
    let output_path = get_output_path(input_path, args.output.as_ref(), extension)?;

    if args.json {
        write_json(&output_path, &conversion)?;
    } else {
        writer
            .write_to_path(&output_path, &conversion, converter.profile())
            .with_context(|| format!("Failed to write {}", output_path.display()))?;
    }

    report(args, &Progress::new("Done", 100));
    if args.verbose {
        eprintln!("Written to: {}", output_path.display());
    }

    Ok(())
}

fn report(args: &Args, progress: &Progress) {
    if args.verbose {
        eprintln!("  [{:>3}%] {}", progress.percent, progress.message);
    }
}

fn describe_warning(warning: &PageWarning) -> String {
    match warning {
        PageWarning::EmptyPage { page } => format!("Page {} has no text", page),
        PageWarning::SkippedFragments { page, count } => {
            format!("Page {}: skipped {} malformed fragments", page, count)
        }
        PageWarning::DecodeFailed { page, reason } => {
            format!("Page {} could not be read: {}", page, reason)
        }
    }
}

/// Output file name without extension: the input name minus `.json` and a
/// trailing `.pdf`, plus `_converted`.
fn output_stem(file_name: &str) -> String {
    let mut base = file_name;
    for suffix in [".json", ".pdf"] {
        if base.len() > suffix.len() && base.to_ascii_lowercase().ends_with(suffix) {
            base = &base[..base.len() - suffix.len()];
        }
    }
    format!("{}_converted", base)
}

/// Determine the output path for a processed file.
fn get_output_path(
    input_path: &Path,
    output_dir: Option<&PathBuf>,
    extension: &str,
) -> Result<PathBuf> {
    let file_name = input_path
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or("output");

    let output_filename = format!("{}.{}", output_stem(file_name), extension);

    let output_path = match output_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create output directory: {}", dir.display()))?;
            dir.join(output_filename)
        }
        None => {
            if let Some(parent) = input_path.parent() {
                parent.join(output_filename)
            } else {
                PathBuf::from(output_filename)
            }
        }
    };

    Ok(output_path)
}

/// Write slide descriptions to a JSON file.
fn write_json(path: &Path, conversion: &Conversion) -> Result<()> {
    let mut file =
        File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;

    let json = serde_json::to_string_pretty(conversion)?;
    file.write_all(json.as_bytes())
        .with_context(|| format!("Failed to write to {}", path.display()))?;

    Ok(())
}
