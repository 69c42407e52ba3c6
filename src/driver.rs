use std::collections::BTreeSet;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing::{debug, info};

use crate::error::MappingError;
use crate::parse::Annotation;
use crate::paths::PathSet;
use crate::reader::{AnnotationReader, SourceAnnotationReader};
use crate::scan;

pub const DEFAULT_FILE_EXTENSION: &str = ".java";

/// Marker annotations identifying mapped persistence types by default.
pub const DEFAULT_ENTITY_ANNOTATIONS: [&str; 3] = ["Entity", "MappedSuperclass", "Embeddable"];

/// Annotation-driven index of the mapped classes under the configured
/// lookup paths.
///
/// Scanning is lazy: the first call to [`Self::all_class_names`] walks the
/// include roots, parses every candidate file, and caches the filtered class
/// list for the lifetime of the driver. Configuration changes made after
/// that do not invalidate the populated cache; they only affect drivers that
/// have not scanned yet.
pub struct AnnotationDriver<R> {
    reader: R,
    paths: PathSet,
    file_extension: String,
    entity_annotations: BTreeSet<String>,
    class_names: Mutex<Option<Vec<String>>>,
}

impl<R: AnnotationReader> AnnotationDriver<R> {
    /// Creates a driver over `reader` that treats the given annotation
    /// names as markers for mapped types. Entries may be simple names
    /// (`Entity`) or fully qualified (`jakarta.persistence.Entity`).
    pub fn new<I, S>(reader: R, entity_annotations: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            reader,
            paths: PathSet::new(),
            file_extension: DEFAULT_FILE_EXTENSION.to_string(),
            entity_annotations: entity_annotations.into_iter().map(Into::into).collect(),
            class_names: Mutex::new(None),
        }
    }

    pub fn reader(&self) -> &R {
        &self.reader
    }

    /// Appends lookup paths. Affects only scans that have not run yet.
    pub fn add_paths<I>(&mut self, paths: I)
    where
        I: IntoIterator<Item = PathBuf>,
    {
        self.paths.add_include_paths(paths);
    }

    pub fn paths(&self) -> &[PathBuf] {
        self.paths.include_paths()
    }

    /// Appends exclude roots. Affects only scans that have not run yet.
    pub fn add_exclude_paths<I>(&mut self, paths: I)
    where
        I: IntoIterator<Item = PathBuf>,
    {
        self.paths.add_exclude_paths(paths);
    }

    pub fn exclude_paths(&self) -> &[PathBuf] {
        self.paths.exclude_paths()
    }

    pub fn file_extension(&self) -> &str {
        &self.file_extension
    }

    /// Sets the extension candidate files must carry. Affects only scans
    /// that have not run yet.
    pub fn set_file_extension<S: Into<String>>(&mut self, file_extension: S) {
        self.file_extension = file_extension.into();
    }

    /// Whether the named class is irrelevant to the mapping layer.
    ///
    /// Only non-transient classes, those carrying at least one marker
    /// annotation, should have their metadata loaded. A class without
    /// annotations is always transient; reader failures propagate.
    pub fn is_transient(&self, class_name: &str) -> Result<bool, MappingError> {
        let annotations = self.reader.class_annotations(class_name)?;
        Ok(!annotations
            .iter()
            .any(|annotation| self.is_entity_annotation(annotation)))
    }

    /// All mapped class names under the configured lookup paths, in scan
    /// order.
    ///
    /// The first successful call populates a cache that every later call
    /// returns verbatim. Concurrent first calls serialize on the cache
    /// lock: one scan runs, the rest share its result. A failed scan leaves
    /// the cache unpopulated so a later call can retry after
    /// reconfiguration.
    pub fn all_class_names(&self) -> Result<Vec<String>, MappingError> {
        let mut cache = self
            .class_names
            .lock()
            .expect("class name cache lock poisoned");
        if let Some(names) = cache.as_ref() {
            return Ok(names.clone());
        }

        let units = scan::scan(
            self.paths.include_paths(),
            self.paths.exclude_paths(),
            &self.file_extension,
        )?;
        for unit in &units {
            self.reader.observe_source(unit);
        }

        let mut names = Vec::new();
        for record in scan::class_records(&units) {
            if self.is_transient(&record.class_name)? {
                debug!(class = %record.class_name, "transient class skipped");
                continue;
            }
            names.push(record.class_name);
        }

        info!(
            classes = names.len(),
            files = units.len(),
            "mapped class index populated"
        );
        *cache = Some(names.clone());
        Ok(names)
    }

    fn is_entity_annotation(&self, annotation: &Annotation) -> bool {
        self.entity_annotations.contains(annotation.name())
            || self.entity_annotations.contains(annotation.simple_name())
    }
}

impl AnnotationDriver<SourceAnnotationReader> {
    /// Driver wired to a scan-backed reader with the default markers.
    pub fn with_default_markers() -> Self {
        Self::new(SourceAnnotationReader::new(), DEFAULT_ENTITY_ANNOTATIONS)
    }
}
