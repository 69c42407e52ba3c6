use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by the mapping layer.
///
/// Every variant carries the offending path, class, alias, or manager name
/// so a failure can be traced back to the configuration that caused it.
/// Failures propagate to the immediate caller; nothing here is retried.
#[derive(Debug, Error)]
pub enum MappingError {
    /// A scan was requested before any lookup path was configured.
    #[error("file mapping drivers require at least one configured lookup path")]
    PathRequired,

    /// A configured lookup path does not resolve to an existing directory.
    #[error("configured lookup path is not a readable directory: {path}")]
    InvalidDirectory { path: PathBuf },

    /// The annotation reader was asked about a class no scanned source declares.
    #[error("class {class} was not declared by any scanned source file")]
    NonExistentClass { class: String },

    /// A namespace alias is not registered with any object manager.
    #[error("unknown namespace alias: {alias}")]
    UnknownAlias { alias: String },

    /// A named object manager is not registered.
    #[error("unknown object manager: {name}")]
    UnknownManager { name: String },

    #[error("failed to read source file: {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to traverse lookup path: {path}")]
    Walk {
        path: PathBuf,
        #[source]
        source: ignore::Error,
    },

    /// The Java grammar failed to load or produce a syntax tree.
    #[error("source file could not be parsed: {path}")]
    UnparsableSource { path: PathBuf },
}
