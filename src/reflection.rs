use crate::error::MappingError;

/// Resolved view of a class, as far as the backing reflection mechanism can
/// provide one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassHandle {
    name: String,
}

impl ClassHandle {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Resolved view of a readable property on a class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyHandle {
    class: String,
    property: String,
}

impl PropertyHandle {
    pub fn new(class: impl Into<String>, property: impl Into<String>) -> Self {
        Self {
            class: class.into(),
            property: property.into(),
        }
    }

    pub fn class(&self) -> &str {
        &self.class
    }

    pub fn property(&self) -> &str {
        &self.property
    }
}

/// Very simple reflection abstraction.
///
/// Metadata layers consume this instead of a concrete reflection mechanism
/// so they can run against either live type information or the name-only
/// view of [`StaticReflectionService`].
pub trait ReflectionService {
    /// Parent classes (not interfaces) of `class`, nearest first.
    fn parent_classes(&self, class: &str) -> Result<Vec<String>, MappingError>;

    /// The unqualified name of a class.
    fn class_short_name(&self, class: &str) -> String;

    /// The package portion of a qualified class name.
    fn class_namespace(&self, class: &str) -> String;

    /// A handle onto the class, or `None` when the mechanism cannot
    /// resolve one.
    fn class(&self, class: &str) -> Option<ClassHandle>;

    /// A readable property handle, or `None` when the mechanism cannot
    /// resolve one.
    fn accessible_property(&self, class: &str, property: &str) -> Option<PropertyHandle>;

    /// Whether the class has a public method with the given name.
    fn has_public_method(&self, class: &str, method: &str) -> bool;
}

/// Name-based reflection service for metadata layers that never load the
/// classes they describe.
///
/// Everything is derived from the qualified name itself: no parents, no
/// handles, and method probes answer optimistically.
#[derive(Debug, Default, Clone, Copy)]
pub struct StaticReflectionService;

impl ReflectionService for StaticReflectionService {
    fn parent_classes(&self, _class: &str) -> Result<Vec<String>, MappingError> {
        Ok(Vec::new())
    }

    fn class_short_name(&self, class: &str) -> String {
        class.rsplit('.').next().unwrap_or(class).to_string()
    }

    fn class_namespace(&self, class: &str) -> String {
        match class.rfind('.') {
            Some(index) => class[..index].to_string(),
            None => String::new(),
        }
    }

    fn class(&self, _class: &str) -> Option<ClassHandle> {
        None
    }

    fn accessible_property(&self, _class: &str, _property: &str) -> Option<PropertyHandle> {
        None
    }

    fn has_public_method(&self, _class: &str, _method: &str) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_name_and_namespace_split_on_last_separator() {
        let service = StaticReflectionService;
        assert_eq!(service.class_short_name("app.models.User"), "User");
        assert_eq!(service.class_namespace("app.models.User"), "app.models");
    }

    #[test]
    fn unqualified_names_have_empty_namespace() {
        let service = StaticReflectionService;
        assert_eq!(service.class_short_name("User"), "User");
        assert_eq!(service.class_namespace("User"), "");
    }

    #[test]
    fn static_service_resolves_no_handles() {
        let service = StaticReflectionService;
        assert!(service.parent_classes("app.models.User").unwrap().is_empty());
        assert!(service.class("app.models.User").is_none());
        assert!(service.accessible_property("app.models.User", "id").is_none());
        assert!(service.has_public_method("app.models.User", "getId"));
    }
}
