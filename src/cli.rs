use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "entity-finder")]
#[command(about = "Discover annotated entity classes in Java source trees")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbose diagnostic logging on stderr.
    #[arg(long, global = true)]
    pub debug: bool,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Scan lookup paths and list the mapped (non-transient) classes.
    Scan {
        /// Directory to scan; repeat for multiple roots.
        #[arg(long = "path", value_name = "DIR", required = true)]
        paths: Vec<PathBuf>,

        /// Directory excluded from the scan; repeat for multiple roots.
        #[arg(long = "exclude", value_name = "DIR")]
        exclude: Vec<PathBuf>,

        /// Extension candidate files must carry.
        #[arg(long, value_name = "EXT", default_value = ".java")]
        ext: String,

        /// Marker annotation identifying mapped types; repeat to extend.
        /// Defaults to Entity, MappedSuperclass and Embeddable.
        #[arg(long = "marker", value_name = "NAME")]
        markers: Vec<String>,

        #[arg(short = 'f', long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,
    },
    /// Parse one source file and report its type declarations.
    Inspect {
        file: PathBuf,

        #[arg(short = 'f', long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,
    },
}

#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Text,
}
