use anyhow::{Context, Result};
use clap::Parser;
use entity_finder::cli::{Cli, Commands, OutputFormat};
use entity_finder::driver::{AnnotationDriver, DEFAULT_ENTITY_ANNOTATIONS};
use entity_finder::parse::{TypeDeclaration, hash_content, parse_declarations};
use entity_finder::reader::SourceAnnotationReader;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.debug);

    match cli.command.clone() {
        Commands::Scan {
            paths,
            exclude,
            ext,
            markers,
            format,
        } => {
            let report = run_scan(paths, exclude, ext, markers)?;
            print_output(&report, format, scan_report_text)?;
        }
        Commands::Inspect { file, format } => {
            let report = inspect_file(&file)?;
            print_output(&report, format, inspect_report_text)?;
        }
    }

    Ok(())
}

fn init_logging(debug: bool) {
    let level = if debug { Level::DEBUG } else { Level::WARN };
    FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

#[derive(Debug, Serialize)]
struct ScanReport {
    roots: Vec<String>,
    markers: Vec<String>,
    extension: String,
    scanned_classes: usize,
    classes: Vec<String>,
    duration_ms: u64,
}

fn run_scan(
    paths: Vec<PathBuf>,
    exclude: Vec<PathBuf>,
    ext: String,
    markers: Vec<String>,
) -> Result<ScanReport> {
    let start = Instant::now();

    let markers = if markers.is_empty() {
        DEFAULT_ENTITY_ANNOTATIONS.map(String::from).to_vec()
    } else {
        markers
    };

    let mut driver = AnnotationDriver::new(SourceAnnotationReader::new(), markers.clone());
    driver.set_file_extension(ext.clone());
    driver.add_paths(paths.clone());
    driver.add_exclude_paths(exclude);

    let classes = driver.all_class_names()?;

    Ok(ScanReport {
        roots: paths.iter().map(|p| p.display().to_string()).collect(),
        markers,
        extension: ext,
        scanned_classes: driver.reader().known_classes(),
        classes,
        duration_ms: start.elapsed().as_millis() as u64,
    })
}

#[derive(Debug, Serialize)]
struct InspectReport {
    file: String,
    source_hash: String,
    declarations: Vec<TypeDeclaration>,
}

fn inspect_file(file: &Path) -> Result<InspectReport> {
    let source = std::fs::read_to_string(file)
        .with_context(|| format!("failed to read source file: {}", file.display()))?;
    let declarations = parse_declarations(&source)
        .with_context(|| format!("failed to parse source file: {}", file.display()))?;

    Ok(InspectReport {
        file: file.display().to_string(),
        source_hash: hash_content(&source),
        declarations,
    })
}

fn print_output<T, F>(report: &T, format: OutputFormat, to_text: F) -> Result<()>
where
    T: Serialize,
    F: Fn(&T) -> String,
{
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(report)?),
        OutputFormat::Text => print!("{}", to_text(report)),
    }
    Ok(())
}

fn scan_report_text(report: &ScanReport) -> String {
    let mut out = String::new();
    out.push_str(&format!("roots: {}\n", report.roots.join(", ")));
    out.push_str(&format!("markers: {}\n", report.markers.join(", ")));
    out.push_str(&format!("scanned_classes: {}\n", report.scanned_classes));
    out.push_str(&format!("duration_ms: {}\n", report.duration_ms));
    for class in &report.classes {
        out.push_str(&format!("- {class}\n"));
    }
    out
}

fn inspect_report_text(report: &InspectReport) -> String {
    let mut out = String::new();
    out.push_str(&format!("file: {}\n", report.file));
    out.push_str(&format!("source_hash: {}\n", report.source_hash));
    for declaration in &report.declarations {
        let annotations: Vec<&str> = declaration
            .annotations
            .iter()
            .map(|a| a.name())
            .collect();
        out.push_str(&format!(
            "- {} [{}]\n",
            declaration.name,
            annotations.join(", ")
        ));
    }
    out
}
