//! Pass-scoped identity registry and node table
//!
//! Identities are reserved before a type's children are walked, and the
//! matching table slot stays a placeholder until the record is finished. A
//! second `reserve` of the same key reports that resolution already started,
//! which is what stops cycles.

use std::collections::{BTreeMap, HashMap};

use predef_core::{HostSymbolId, HostTypeId, StableId, TypeRecord};
use tracing::trace;

use crate::error::ResolveError;

/// What a stable id is assigned for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IdentityKey {
    Type(HostTypeId),
    Alias(HostSymbolId),
}

#[derive(Debug, Default)]
pub struct IdentityRegistry {
    ids: HashMap<IdentityKey, StableId>,
    next: u32,
}

impl IdentityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assign an id to `key`, or return the existing one.
    ///
    /// The flag is `true` when the key was already reserved earlier in the pass.
    pub fn reserve(&mut self, key: IdentityKey) -> (StableId, bool) {
        if let Some(&id) = self.ids.get(&key) {
            return (id, true);
        }
        let id = StableId(self.next);
        self.next += 1;
        self.ids.insert(key, id);
        trace!(?key, %id, "reserved identity");
        (id, false)
    }

    /// Make `key` resolve to an id that was reserved for another key
    pub fn bind(&mut self, key: IdentityKey, id: StableId) {
        self.ids.entry(key).or_insert(id);
    }

    pub fn get(&self, key: &IdentityKey) -> Option<StableId> {
        self.ids.get(key).copied()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// Append-only table of finished records, keyed by stable id
#[derive(Debug, Default)]
pub struct NodeTable {
    slots: BTreeMap<StableId, Option<TypeRecord>>,
}

impl NodeTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim a placeholder slot for `id` before its children are resolved
    pub fn reserve(&mut self, id: StableId) {
        self.slots.entry(id).or_insert(None);
    }

    /// Complete the placeholder for `record.id`. A slot is filled at most once.
    pub fn fill(&mut self, record: TypeRecord) {
        let slot = self.slots.entry(record.id).or_insert(None);
        if slot.is_none() {
            *slot = Some(record);
        }
    }

    pub fn contains(&self, id: StableId) -> bool {
        self.slots.contains_key(&id)
    }

    pub fn is_complete(&self, id: StableId) -> bool {
        matches!(self.slots.get(&id), Some(Some(_)))
    }

    pub fn get(&self, id: StableId) -> Option<&TypeRecord> {
        self.slots.get(&id).and_then(Option::as_ref)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Freeze the table into records ordered by id
    pub fn into_records(self) -> Result<Vec<TypeRecord>, ResolveError> {
        self.slots
            .into_iter()
            .map(|(id, slot)| slot.ok_or(ResolveError::IncompleteRecord(id)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use predef_core::TypeInfo;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_reserve_is_idempotent() {
        let mut registry = IdentityRegistry::new();
        let key = IdentityKey::Type(HostTypeId(10));

        let (first, started) = registry.reserve(key);
        assert!(!started);
        let (second, started) = registry.reserve(key);
        assert!(started);
        assert_eq!(first, second);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_alias_and_type_keys_are_distinct() {
        let mut registry = IdentityRegistry::new();
        let (a, _) = registry.reserve(IdentityKey::Type(HostTypeId(1)));
        let (b, _) = registry.reserve(IdentityKey::Alias(HostSymbolId(1)));
        assert_ne!(a, b);
    }

    #[test]
    fn test_bind_shares_existing_id() {
        let mut registry = IdentityRegistry::new();
        let (alias, _) = registry.reserve(IdentityKey::Alias(HostSymbolId(3)));
        registry.bind(IdentityKey::Type(HostTypeId(8)), alias);

        let (id, started) = registry.reserve(IdentityKey::Type(HostTypeId(8)));
        assert_eq!(id, alias);
        assert!(started);
    }

    #[test]
    fn test_table_placeholder_then_fill() {
        let mut table = NodeTable::new();
        table.reserve(StableId(0));
        assert!(table.contains(StableId(0)));
        assert!(!table.is_complete(StableId(0)));

        table.fill(TypeRecord::anonymous(StableId(0), TypeInfo::any()));
        assert!(table.is_complete(StableId(0)));

        // a second fill never replaces the first record
        table.fill(TypeRecord::anonymous(StableId(0), TypeInfo::Id(StableId(0))));
        assert_eq!(table.get(StableId(0)).unwrap().body, TypeInfo::any());
    }

    #[test]
    fn test_freeze_orders_by_id() {
        let mut table = NodeTable::new();
        table.reserve(StableId(2));
        table.reserve(StableId(0));
        table.fill(TypeRecord::anonymous(StableId(2), TypeInfo::any()));
        table.fill(TypeRecord::anonymous(StableId(0), TypeInfo::any()));

        let ids: Vec<_> = table.into_records().unwrap().iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![StableId(0), StableId(2)]);
    }

    #[test]
    fn test_freeze_rejects_placeholder() {
        let mut table = NodeTable::new();
        table.reserve(StableId(4));
        assert_eq!(
            table.into_records(),
            Err(ResolveError::IncompleteRecord(StableId(4)))
        );
    }
}
