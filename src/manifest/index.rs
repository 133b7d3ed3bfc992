//! An index of manifest resources keyed by kind and name.

use std::collections::BTreeMap;
use std::path::Path;

use crate::error::{LookupError, ParseError};
use crate::manifest::object::*;
use crate::manifest::parser::parse_yaml;

/// Compound key identifying a resource within one manifest.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResourceKey {
    pub kind: ResourceKind,
    pub name: String,
}

impl ResourceKey {
    pub fn new(kind: ResourceKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
        }
    }
}

#[derive(Debug, Clone)]
struct Entry {
    document: usize,
    resource: Resource,
}

/// Result of looking a resource up by name as a particular type.
///
/// Distinguishes "nothing with that name" from "something with that name,
/// but declared as another kind", which callers checking for a resource's
/// absence usually want to treat differently from a broken manifest.
#[derive(Debug, PartialEq, Eq)]
pub enum Lookup<'a, T> {
    Absent,
    Present(&'a T),
    KindMismatch { declared: &'a ResourceKind },
}

impl<'a, T> Lookup<'a, T> {
    /// The resource, if it was found as the requested type.
    pub fn present(self) -> Option<&'a T> {
        match self {
            Self::Present(resource) => Some(resource),
            _ => None,
        }
    }

    pub fn is_present(&self) -> bool {
        matches!(self, Self::Present(_))
    }
}

impl<'a, T> From<Option<&'a T>> for Lookup<'a, T> {
    fn from(resource: Option<&'a T>) -> Self {
        match resource {
            Some(resource) => Self::Present(resource),
            None => Self::Absent,
        }
    }
}

impl<'a, T> From<&'a T> for Lookup<'a, T> {
    fn from(resource: &'a T) -> Self {
        Self::Present(resource)
    }
}

/// All resources of a manifest, indexed by `(kind, metadata.name)`.
///
/// Built once and read-only afterwards. Lookups do not depend on where a
/// document sits in the stream.
#[derive(Debug, Clone, Default)]
pub struct ResourceIndex {
    entries: BTreeMap<ResourceKey, Entry>,
}

impl ResourceIndex {
    /// Read and index a multi-document manifest file.
    pub fn from_file(path: &Path) -> Result<Self, ParseError> {
        let content = std::fs::read_to_string(path).map_err(|source| ParseError::IoError {
            path: path.to_path_buf(),
            source,
        })?;

        let index = Self::from_yaml_str(&content)?;
        log::info!(
            "Indexed {} resources from {}",
            index.len(),
            path.display()
        );
        Ok(index)
    }

    /// Index a multi-document manifest held in memory.
    pub fn from_yaml_str(content: &str) -> Result<Self, ParseError> {
        Self::from_documents(parse_yaml(content)?)
    }

    /// Index already parsed resources, each tagged with its document number.
    pub fn from_documents(
        documents: impl IntoIterator<Item = (usize, Resource)>,
    ) -> Result<Self, ParseError> {
        let mut entries: BTreeMap<ResourceKey, Entry> = BTreeMap::new();

        for (document, resource) in documents {
            let key = ResourceKey::new(resource.kind(), resource.name());
            if let Some(existing) = entries.get(&key) {
                return Err(ParseError::DuplicateResource {
                    kind: key.kind,
                    name: key.name,
                    first: existing.document,
                    second: document,
                });
            }
            entries.insert(key, Entry { document, resource });
        }

        Ok(Self { entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, kind: &ResourceKind, name: &str) -> Option<&Resource> {
        self.entries
            .get(&ResourceKey::new(kind.clone(), name))
            .map(|entry| &entry.resource)
    }

    /// The 1-indexed document a resource was read from.
    pub fn document_of(&self, kind: &ResourceKind, name: &str) -> Option<usize> {
        self.entries
            .get(&ResourceKey::new(kind.clone(), name))
            .map(|entry| entry.document)
    }

    /// Iterate over every resource in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&ResourceKey, &Resource)> {
        self.entries.iter().map(|(key, entry)| (key, &entry.resource))
    }

    /// Every resource declaring `name`, whatever its kind.
    pub fn with_name<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Resource> + 'a {
        self.entries
            .iter()
            .filter(move |(key, _)| key.name == name)
            .map(|(_, entry)| &entry.resource)
    }

    /// Look `name` up as a `T`, reporting a kind mismatch when the name is
    /// only declared under other kinds.
    pub fn lookup<T: TypedResource>(&self, name: &str) -> Lookup<'_, T> {
        if let Some(resource) = self.get(&T::KIND, name).and_then(T::from_resource) {
            return Lookup::Present(resource);
        }

        match self.entries.keys().find(|key| key.name == name) {
            Some(key) => Lookup::KindMismatch {
                declared: &key.kind,
            },
            None => Lookup::Absent,
        }
    }

    /// Like [`Self::lookup`] but turns anything other than a hit into an error.
    pub fn require<T: TypedResource>(&self, name: &str) -> Result<&T, LookupError> {
        match self.lookup::<T>(name) {
            Lookup::Present(resource) => Ok(resource),
            Lookup::Absent => Err(LookupError::NotFound {
                kind: T::KIND,
                name: name.to_string(),
            }),
            Lookup::KindMismatch { declared } => Err(LookupError::TypeMismatch {
                name: name.to_string(),
                requested: T::KIND,
                declared: declared.clone(),
            }),
        }
    }

    pub fn config_map(&self, name: &str) -> Option<&ConfigMap> {
        self.lookup(name).present()
    }

    pub fn secret(&self, name: &str) -> Option<&Secret> {
        self.lookup(name).present()
    }

    pub fn deployment(&self, name: &str) -> Option<&Deployment> {
        self.lookup(name).present()
    }

    pub fn service(&self, name: &str) -> Option<&Service> {
        self.lookup(name).present()
    }
}
