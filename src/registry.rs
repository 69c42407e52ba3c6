use std::collections::BTreeMap;

use crate::error::MappingError;

/// Contract for registries that track the object managers of a persistence
/// layer.
///
/// Implementations live in the integration layer that wires managers and
/// repositories together; this crate only consumes the contract.
pub trait ManagerRegistry {
    /// The object manager type handled by this registry.
    type Manager;
    /// The repository type produced for persistent object lookups.
    type Repository;

    /// Name of the default object manager.
    fn default_manager_name(&self) -> &str;

    /// A named object manager, or the default one when `name` is `None`.
    fn manager(&self, name: Option<&str>) -> Result<&Self::Manager, MappingError>;

    /// All registered object managers, keyed by name.
    fn managers(&self) -> BTreeMap<String, &Self::Manager>;

    /// Replaces a closed manager with a fresh instance and returns it.
    ///
    /// Anything still holding the previous instance keeps an obsolete
    /// reference; callers that need resilience should hold the registry
    /// instead of a manager.
    fn reset_manager(&mut self, name: Option<&str>) -> Result<&Self::Manager, MappingError>;

    /// Resolves a registered namespace alias to the full namespace.
    ///
    /// The alias is looked up across all registered managers; an alias no
    /// manager claims fails with [`MappingError::UnknownAlias`].
    fn alias_namespace(&self, alias: &str) -> Result<String, MappingError>;

    /// All object manager names, keyed by manager name.
    fn manager_names(&self) -> BTreeMap<String, String>;

    /// The repository serving the named persistent type, drawn from the
    /// given manager or the default one.
    fn repository(
        &self,
        persistent_type: &str,
        manager_name: Option<&str>,
    ) -> Result<&Self::Repository, MappingError>;

    /// The manager responsible for `class_name`, if any claims it.
    fn manager_for_class(&self, class_name: &str) -> Option<&Self::Manager>;
}
