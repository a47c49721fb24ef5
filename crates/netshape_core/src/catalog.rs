//! Attribute catalog shared with the remote system.

use crate::types::AttrId;
use std::collections::{BTreeMap, HashMap};

/// An attribute definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttrDef {
    /// Catalog identity.
    pub id: AttrId,
    /// Unique attribute name.
    pub name: String,
    /// Physical dimension, if declared.
    pub dimension: Option<String>,
}

/// Bidirectional name/identity mapping of attribute definitions.
#[derive(Debug, Clone, Default)]
pub struct AttributeCatalog {
    by_id: BTreeMap<AttrId, AttrDef>,
    ids: HashMap<String, AttrId>,
}

impl AttributeCatalog {
    /// Creates an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a definition, replacing any previous entry with the same id.
    pub fn insert(&mut self, def: AttrDef) {
        if let Some(old) = self.by_id.get(&def.id) {
            if old.name != def.name {
                self.ids.remove(&old.name);
            }
        }
        self.ids.insert(def.name.clone(), def.id);
        self.by_id.insert(def.id, def);
    }

    /// Looks up a definition by identity.
    #[must_use]
    pub fn get(&self, id: AttrId) -> Option<&AttrDef> {
        self.by_id.get(&id)
    }

    /// Looks up the identity for a name.
    #[must_use]
    pub fn id_of(&self, name: &str) -> Option<AttrId> {
        self.ids.get(name).copied()
    }

    /// Number of definitions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    /// True when the catalog holds no definitions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    /// Iterates definitions in identity order.
    pub fn iter(&self) -> impl Iterator<Item = &AttrDef> {
        self.by_id.values()
    }
}

impl FromIterator<AttrDef> for AttributeCatalog {
    fn from_iter<I: IntoIterator<Item = AttrDef>>(iter: I) -> Self {
        let mut catalog = Self::new();
        for def in iter {
            catalog.insert(def);
        }
        catalog
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn def(id: i64, name: &str) -> AttrDef {
        AttrDef {
            id: AttrId::new(id),
            name: name.to_string(),
            dimension: None,
        }
    }

    #[test]
    fn lookup_both_ways() {
        let catalog: AttributeCatalog = vec![def(1, "depth"), def(2, "width")]
            .into_iter()
            .collect();
        assert_eq!(catalog.id_of("width"), Some(AttrId::new(2)));
        assert_eq!(catalog.get(AttrId::new(1)).unwrap().name, "depth");
        assert_eq!(catalog.id_of("missing"), None);
        assert_eq!(catalog.len(), 2);
    }

    #[test]
    fn renamed_definition_drops_old_name() {
        let mut catalog = AttributeCatalog::new();
        catalog.insert(def(1, "depth"));
        catalog.insert(def(1, "max_depth"));
        assert_eq!(catalog.id_of("depth"), None);
        assert_eq!(catalog.id_of("max_depth"), Some(AttrId::new(1)));
        assert_eq!(catalog.len(), 1);
    }
}
