//! Immutable catalog snapshot

use crate::error::Result;
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use taptune_core::{Catalog, ContentDescriptor};
use tracing::warn;

/// An id-keyed, read-only view of the content catalog
///
/// The catalog itself is owned elsewhere (a remote store, a bundled file);
/// the snapshot is what the scan pipeline resolves against. Lookups are
/// pure: an unknown id is reported as `None`, never guessed.
#[derive(Debug, Clone, Default)]
pub struct CatalogSnapshot {
    entries: Vec<ContentDescriptor>,
    index: HashMap<String, usize>,
}

/// Accepted catalog file shapes: a plain list, or the id-keyed map the
/// companion app keeps its bundled catalog in.
#[derive(Deserialize)]
#[serde(untagged)]
enum CatalogFile {
    List(Vec<ContentDescriptor>),
    Map(BTreeMap<String, ContentDescriptor>),
}

impl CatalogSnapshot {
    /// Build a snapshot from a list of descriptors
    ///
    /// Entries failing the one-URL-per-kind invariant are skipped with a
    /// warning. Duplicate ids keep the last occurrence, also warned.
    pub fn from_descriptors(descriptors: Vec<ContentDescriptor>) -> Self {
        let mut snapshot = Self::default();
        for descriptor in descriptors {
            if let Err(error) = descriptor.validate() {
                warn!(id = %descriptor.id, %error, "skipping invalid catalog entry");
                continue;
            }
            snapshot.insert(descriptor);
        }
        snapshot
    }

    /// Load a snapshot from catalog JSON
    pub fn from_json_str(json: &str) -> Result<Self> {
        let file: CatalogFile = serde_json::from_str(json)?;
        Ok(Self::from_descriptors(file.into_descriptors()))
    }

    /// Load a snapshot from a catalog JSON reader
    pub fn from_json_reader(reader: impl std::io::Read) -> Result<Self> {
        let file: CatalogFile = serde_json::from_reader(reader)?;
        Ok(Self::from_descriptors(file.into_descriptors()))
    }

    fn insert(&mut self, descriptor: ContentDescriptor) {
        if let Some(&position) = self.index.get(&descriptor.id) {
            warn!(id = %descriptor.id, "duplicate catalog id, keeping the later entry");
            self.entries[position] = descriptor;
        } else {
            self.index.insert(descriptor.id.clone(), self.entries.len());
            self.entries.push(descriptor);
        }
    }

    /// Look up a descriptor by id
    pub fn resolve(&self, id: &str) -> Option<&ContentDescriptor> {
        self.index.get(id).map(|&position| &self.entries[position])
    }

    /// Iterate over every entry in load order
    pub fn iter(&self) -> impl Iterator<Item = &ContentDescriptor> {
        self.entries.iter()
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the snapshot holds no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl CatalogFile {
    fn into_descriptors(self) -> Vec<ContentDescriptor> {
        match self {
            Self::List(descriptors) => descriptors,
            Self::Map(map) => map
                .into_iter()
                .map(|(key, descriptor)| {
                    if key != descriptor.id {
                        warn!(
                            %key,
                            id = %descriptor.id,
                            "catalog map key differs from entry id, using the entry id"
                        );
                    }
                    descriptor
                })
                .collect(),
        }
    }
}

#[async_trait]
impl Catalog for CatalogSnapshot {
    async fn get_by_id(&self, id: &str) -> taptune_core::Result<Option<ContentDescriptor>> {
        Ok(self.resolve(id).cloned())
    }

    async fn list_all(&self) -> taptune_core::Result<Vec<ContentDescriptor>> {
        Ok(self.entries.clone())
    }
}
