//! Entity catalog
//!
//! Maps logical entity names ("invoices", "folder_items") to the endpoint
//! descriptor used to fetch them. A catalog is built once per vendor and is
//! read-only afterwards, so it can be shared across tasks without locking.

use crate::error::ConnectorError;
use crate::transport::HttpMethod;
use std::collections::BTreeMap;

/// How to reach one entity on a remote API
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointDescriptor {
    template: String,
    root_path: String,
    required_filters: Vec<String>,
    defaults: Vec<(String, String)>,
    fixed_query: Vec<(String, String)>,
    /// Accepted mutation methods and the root their reply is wrapped in
    writes: Vec<(HttpMethod, Option<String>)>,
}

impl EndpointDescriptor {
    /// Create a descriptor from a path template and the JSON root to unwrap
    ///
    /// An empty `root_path` means the whole payload is the entity.
    pub fn new(template: impl Into<String>, root_path: impl Into<String>) -> Self {
        Self {
            template: template.into(),
            root_path: root_path.into(),
            required_filters: Vec::new(),
            defaults: Vec::new(),
            fixed_query: Vec::new(),
            writes: Vec::new(),
        }
    }

    /// Require a filter to be present and non-blank before the call
    pub fn require(mut self, filter: impl Into<String>) -> Self {
        self.required_filters.push(filter.into());
        self
    }

    /// Value used for an optional parameter when the caller omits it
    pub fn default_value(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.defaults.push((name.into(), value.into()));
        self
    }

    /// Query parameter sent on every call to this endpoint
    pub fn fixed(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fixed_query.push((name.into(), value.into()));
        self
    }

    /// Allow a mutation method against this endpoint
    ///
    /// The reply is unwrapped with the read `root_path`.
    pub fn writable(self, method: HttpMethod) -> Self {
        self.register_write(method, None)
    }

    /// Allow a mutation method whose reply wraps the entity in a different
    /// root, e.g. `POST invoices` answering `{"invoice": {...}}`
    ///
    /// An empty root means the reply is the bare entity.
    pub fn writable_into(self, method: HttpMethod, root_path: impl Into<String>) -> Self {
        self.register_write(method, Some(root_path.into()))
    }

    fn register_write(mut self, method: HttpMethod, root_path: Option<String>) -> Self {
        match self.writes.iter_mut().find(|(m, _)| *m == method) {
            Some(entry) => entry.1 = root_path,
            None => self.writes.push((method, root_path)),
        }
        self
    }

    pub fn template(&self) -> &str {
        &self.template
    }

    pub fn root_path(&self) -> &str {
        &self.root_path
    }

    pub fn required_filters(&self) -> &[String] {
        &self.required_filters
    }

    pub fn defaults(&self) -> &[(String, String)] {
        &self.defaults
    }

    pub fn fixed_query(&self) -> &[(String, String)] {
        &self.fixed_query
    }

    /// Check whether a mutation method is accepted
    pub fn accepts(&self, method: HttpMethod) -> bool {
        self.writes.iter().any(|(m, _)| *m == method)
    }

    /// Root to unwrap a mutation reply with, if the method is accepted
    pub fn write_root(&self, method: HttpMethod) -> Option<&str> {
        self.writes
            .iter()
            .find(|(m, _)| *m == method)
            .map(|(_, root)| root.as_deref().unwrap_or(self.root_path.as_str()))
    }
}

/// Immutable table of entity name -> endpoint descriptor
#[derive(Debug, Clone)]
pub struct EntityCatalog {
    connector: String,
    /// Keyed by lowercased name; value keeps the registered spelling
    entries: BTreeMap<String, (String, EndpointDescriptor)>,
}

impl EntityCatalog {
    /// Start building a catalog for the named connector
    pub fn builder(connector: impl Into<String>) -> CatalogBuilder {
        CatalogBuilder {
            connector: connector.into(),
            entries: Vec::new(),
        }
    }

    /// Connector this catalog belongs to
    pub fn connector(&self) -> &str {
        &self.connector
    }

    /// Look up an entity by name (case-insensitive, exact match only)
    ///
    /// # Errors
    ///
    /// Returns `UnknownEntity` if the name is not registered
    pub fn resolve(&self, entity: &str) -> Result<&EndpointDescriptor, ConnectorError> {
        self.entries
            .get(&entity.to_lowercase())
            .map(|(_, descriptor)| descriptor)
            .ok_or_else(|| ConnectorError::UnknownEntity {
                connector: self.connector.clone(),
                entity: entity.to_string(),
            })
    }

    /// Registered entity names, sorted
    pub fn entity_names(&self) -> Vec<&str> {
        self.entries.values().map(|(name, _)| name.as_str()).collect()
    }

    /// Iterate over (name, descriptor) pairs
    pub fn iter(&self) -> impl Iterator<Item = (&str, &EndpointDescriptor)> {
        self.entries
            .values()
            .map(|(name, descriptor)| (name.as_str(), descriptor))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Builder for [`EntityCatalog`]
#[derive(Debug)]
pub struct CatalogBuilder {
    connector: String,
    entries: Vec<(String, EndpointDescriptor)>,
}

impl CatalogBuilder {
    /// Register an entity
    pub fn entity(mut self, name: impl Into<String>, descriptor: EndpointDescriptor) -> Self {
        self.entries.push((name.into(), descriptor));
        self
    }

    /// Finish the catalog
    ///
    /// # Errors
    ///
    /// Returns `Init` if an entity name is blank or registered twice
    /// (names are compared case-insensitively).
    pub fn build(self) -> Result<EntityCatalog, ConnectorError> {
        let mut entries = BTreeMap::new();
        for (name, descriptor) in self.entries {
            if name.trim().is_empty() {
                return Err(ConnectorError::Init(format!(
                    "{} catalog has a blank entity name",
                    self.connector
                )));
            }
            let key = name.to_lowercase();
            if entries.contains_key(&key) {
                return Err(ConnectorError::Init(format!(
                    "{} catalog registers '{}' twice",
                    self.connector, name
                )));
            }
            entries.insert(key, (name, descriptor));
        }
        Ok(EntityCatalog {
            connector: self.connector,
            entries,
        })
    }
}
