//! Local catalog changes.
//!
//! The catalog starts from a base snapshot (the bundled seed or a configured
//! data file). Once anything changes it, the whole snapshot is saved under
//! [`CATALOG_KEY`] and that copy wins over the base from then on.

use evd_core::{Catalog, DataSnapshot};

use crate::{CATALOG_KEY, DbError, KvStore, get_json, set_json};

pub struct CatalogStore<S> {
    kv: S,
}

impl<S: KvStore> CatalogStore<S> {
    pub const fn new(kv: S) -> Self {
        Self { kv }
    }

    /// The saved catalog, or `base` when nothing usable is saved.
    pub fn load(&self, base: DataSnapshot) -> Catalog {
        match get_json::<DataSnapshot, _>(&self.kv, CATALOG_KEY) {
            Ok(Some(saved)) => Catalog::new(saved),
            Ok(None) => Catalog::new(base),
            Err(err) => {
                tracing::warn!(%err, "ignoring saved catalog");
                Catalog::new(base)
            }
        }
    }

    pub fn save(&mut self, catalog: &Catalog) -> Result<(), DbError> {
        set_json(&mut self.kv, CATALOG_KEY, catalog.snapshot())?;
        tracing::debug!(events = catalog.events().len(), "catalog saved");
        Ok(())
    }

    /// Drops local changes so the base snapshot is used again.
    pub fn reset(&mut self) -> Result<(), DbError> {
        self.kv.remove(CATALOG_KEY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use evd_core::EventId;

    use crate::{BrokenStore, Database, MemoryStore};

    fn seed() -> DataSnapshot {
        DataSnapshot::seed().unwrap()
    }

    #[test]
    fn nothing_saved_uses_base() {
        let store = CatalogStore::new(MemoryStore::new());
        assert_eq!(store.load(seed()).snapshot(), &seed());
    }

    #[test]
    fn saved_changes_survive_reopen() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("evd.db");
        let evt3 = EventId::new("evt3").unwrap();
        {
            let mut db = Database::open(&path).unwrap();
            let mut store = CatalogStore::new(&mut db);
            let mut catalog = store.load(seed());
            catalog.increment_registration(&evt3).unwrap();
            store.save(&catalog).unwrap();
        }
        let db = Database::open(&path).unwrap();
        let catalog = CatalogStore::new(db).load(seed());
        assert_eq!(catalog.event(&evt3).unwrap().registrations, 52);
    }

    #[test]
    fn malformed_saved_catalog_falls_back_to_base() {
        let mut mem = MemoryStore::new();
        mem.set(CATALOG_KEY, "[1, 2").unwrap();
        let catalog = CatalogStore::new(mem).load(seed());
        assert_eq!(catalog.events().len(), 5);
    }

    #[test]
    fn saved_event_without_seats_falls_back_to_base() {
        let mut mem = MemoryStore::new();
        mem.set(
            CATALOG_KEY,
            r#"{"events":[{"id":"evt1","title":"Tech Symposium","date":"2024-07-10","capacity":0}]}"#,
        )
        .unwrap();
        let catalog = CatalogStore::new(mem).load(seed());
        let evt1 = EventId::new("evt1").unwrap();
        assert_eq!(catalog.event(&evt1).unwrap().capacity, 120);
    }

    #[test]
    fn unreadable_storage_falls_back_to_base() {
        let catalog = CatalogStore::new(BrokenStore).load(seed());
        assert_eq!(catalog.users().len(), 4);
    }

    #[test]
    fn reset_restores_base() {
        let mut store = CatalogStore::new(MemoryStore::new());
        store.save(&Catalog::new(DataSnapshot::default())).unwrap();
        assert!(store.load(seed()).events().is_empty());
        store.reset().unwrap();
        assert_eq!(store.load(seed()).events().len(), 5);
    }
}
