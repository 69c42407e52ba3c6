use std::collections::HashMap;
use std::sync::RwLock;

use crate::error::MappingError;
use crate::parse::Annotation;
use crate::scan::SourceUnit;

/// Read access to the annotations attached to a class declaration.
///
/// This is the seam between the class index and whatever mechanism knows
/// about annotations: the scan-backed [`SourceAnnotationReader`], or a
/// fixture reader in tests.
pub trait AnnotationReader {
    /// Returns the annotations written on the named class declaration.
    fn class_annotations(&self, class_name: &str) -> Result<Vec<Annotation>, MappingError>;

    /// Invoked as source files are brought into the scanned set.
    ///
    /// Readers that resolve annotations from live sources extend their view
    /// here; a class becomes visible to [`Self::class_annotations`] only
    /// after its declaring unit was observed. Readers holding external
    /// knowledge can ignore the hook.
    fn observe_source(&self, _unit: &SourceUnit) {}
}

/// Annotation reader backed by the declarations observed during scans.
#[derive(Debug, Default)]
pub struct SourceAnnotationReader {
    classes: RwLock<HashMap<String, Vec<Annotation>>>,
}

impl SourceAnnotationReader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of class declarations currently visible to the reader.
    pub fn known_classes(&self) -> usize {
        self.classes
            .read()
            .expect("annotation index lock poisoned")
            .len()
    }
}

impl AnnotationReader for SourceAnnotationReader {
    fn class_annotations(&self, class_name: &str) -> Result<Vec<Annotation>, MappingError> {
        let classes = self.classes.read().expect("annotation index lock poisoned");
        classes
            .get(class_name)
            .cloned()
            .ok_or_else(|| MappingError::NonExistentClass {
                class: class_name.to_string(),
            })
    }

    fn observe_source(&self, unit: &SourceUnit) {
        let mut classes = self.classes.write().expect("annotation index lock poisoned");
        for declaration in &unit.declarations {
            classes.insert(declaration.name.clone(), declaration.annotations.clone());
        }
    }
}

/// Fixture reader over a fixed class-to-annotations table.
#[derive(Debug, Default)]
pub struct InMemoryAnnotationReader {
    classes: HashMap<String, Vec<Annotation>>,
}

impl InMemoryAnnotationReader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert<S: Into<String>>(&mut self, class_name: S, annotations: Vec<Annotation>) {
        self.classes.insert(class_name.into(), annotations);
    }
}

impl AnnotationReader for InMemoryAnnotationReader {
    fn class_annotations(&self, class_name: &str) -> Result<Vec<Annotation>, MappingError> {
        self.classes
            .get(class_name)
            .cloned()
            .ok_or_else(|| MappingError::NonExistentClass {
                class: class_name.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::parse_declarations;
    use std::path::PathBuf;

    fn unit_from(source: &str) -> SourceUnit {
        SourceUnit {
            file: PathBuf::from("/virtual/Unit.java"),
            declarations: parse_declarations(source).unwrap(),
        }
    }

    #[test]
    fn source_reader_resolves_observed_classes() {
        let reader = SourceAnnotationReader::new();
        reader.observe_source(&unit_from(
            "package m; @Entity class User {} class Helper {}",
        ));

        assert_eq!(reader.known_classes(), 2);

        let annotations = reader.class_annotations("m.User").unwrap();
        assert_eq!(annotations.len(), 1);
        assert_eq!(annotations[0].name(), "Entity");

        assert!(reader.class_annotations("m.Helper").unwrap().is_empty());
    }

    #[test]
    fn source_reader_fails_loudly_on_unknown_class() {
        let reader = SourceAnnotationReader::new();
        let err = reader.class_annotations("m.Ghost").unwrap_err();
        match err {
            MappingError::NonExistentClass { class } => assert_eq!(class, "m.Ghost"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn in_memory_reader_serves_fixtures() {
        let mut reader = InMemoryAnnotationReader::new();
        reader.insert("m.User", vec![Annotation::new("Entity")]);

        assert_eq!(
            reader.class_annotations("m.User").unwrap()[0].name(),
            "Entity"
        );
        assert!(reader.class_annotations("m.Other").is_err());
    }
}
