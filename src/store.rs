//! In-memory contact store.
//!
//! One `Vec` in insertion order plus a counter for the next id, both behind a
//! single mutex. Every operation holds the lock for its whole
//! read-modify-write and never across an `.await`, so the store can be shared
//! as `Arc<ContactStore>` between connection tasks.
//!
//! Ids come from the counter, not from the length of the list: after a
//! delete, a new contact still gets a fresh id instead of colliding with a
//! live one.

use std::fmt;
use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::debug;

use crate::contact::{Contact, ContactPatch, Deleted};

/// Failure of a mutating store operation.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum StoreError {
    /// No live contact has this id.
    NotFound(u64),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound(id) => write!(f, "contact {id} not found"),
        }
    }
}

impl std::error::Error for StoreError {}

#[derive(Default)]
struct Inner {
    contacts: Vec<Contact>,
    next_id: u64,
}

impl Inner {
    fn position(&self, id: u64) -> Option<usize> {
        self.contacts.iter().position(|c| c.id == id)
    }

    fn filter(&self, pred: impl Fn(&Contact) -> bool) -> Vec<Contact> {
        self.contacts.iter().filter(|&c| pred(c)).cloned().collect()
    }
}

/// The authoritative owner of every contact.
///
/// Reads hand out clones; nothing outside the store holds a reference into
/// the collection.
#[derive(Default)]
pub struct ContactStore {
    inner: Mutex<Inner>,
}

impl ContactStore {
    /// An empty store. The first contact created gets id `0`.
    pub fn new() -> Self {
        Self::default()
    }

    /// A store holding the demo contact the service has always shipped with.
    pub fn seeded() -> Self {
        let seed = Contact {
            id: 0,
            first_name: "Scotty".to_owned(),
            last_name: "Labs".to_owned(),
            phone: "0123456789".to_owned(),
            email: "hello@scottylabs.org".to_owned(),
        };
        Self {
            inner: Mutex::new(Inner { contacts: vec![seed], next_id: 1 }),
        }
    }

    // No operation can leave `Inner` half-written, so a poisoned lock still
    // guards consistent data.
    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn len(&self) -> usize {
        self.lock().contacts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Every contact, in insertion order.
    pub fn list_all(&self) -> Vec<Contact> {
        self.lock().contacts.clone()
    }

    /// The contact with `id`, as a sequence of zero or one element.
    pub fn get_by_id(&self, id: u64) -> Vec<Contact> {
        self.lock().filter(|c| c.id == id)
    }

    pub fn find_by_first_name(&self, first_name: &str) -> Vec<Contact> {
        self.lock().filter(|c| c.first_name == first_name)
    }

    pub fn find_by_last_name(&self, last_name: &str) -> Vec<Contact> {
        self.lock().filter(|c| c.last_name == last_name)
    }

    pub fn find_by_full_name(&self, first_name: &str, last_name: &str) -> Vec<Contact> {
        self.lock()
            .filter(|c| c.first_name == first_name && c.last_name == last_name)
    }

    /// Appends a new contact built from `patch` and returns it.
    ///
    /// Never fails: no field is mandatory.
    pub fn create(&self, patch: ContactPatch) -> Contact {
        let mut inner = self.lock();
        let id = inner.next_id;
        inner.next_id += 1;

        let contact = Contact::from_patch(id, patch);
        inner.contacts.push(contact.clone());
        debug!(id, total = inner.contacts.len(), "contact created");
        contact
    }

    /// Overwrites the fields present in `patch` on contact `id`.
    pub fn update(&self, id: u64, patch: ContactPatch) -> Result<Contact, StoreError> {
        let mut inner = self.lock();
        let idx = inner.position(id).ok_or(StoreError::NotFound(id))?;

        let contact = &mut inner.contacts[idx];
        contact.apply(patch);
        debug!(id, "contact updated");
        Ok(contact.clone())
    }

    /// Removes contact `id`, preserving the order of the rest.
    pub fn delete(&self, id: u64) -> Result<Deleted, StoreError> {
        let mut inner = self.lock();
        let idx = inner.position(id).ok_or(StoreError::NotFound(id))?;

        let deleted = inner.contacts.remove(idx);
        debug!(id, total = inner.contacts.len(), "contact deleted");
        Ok(Deleted { deleted })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::sync::Arc;

    use super::*;

    fn ada() -> ContactPatch {
        ContactPatch::new().first_name("Ada")
    }

    #[test]
    fn scotty_labs_walkthrough() {
        let store = ContactStore::seeded();

        let created = store.create(ada());
        assert_eq!(
            created,
            Contact { id: 1, first_name: "Ada".into(), ..Contact::default() }
        );

        let updated = store.update(1, ContactPatch::new().last_name("Lovelace")).unwrap();
        assert_eq!(
            updated,
            Contact {
                id: 1,
                first_name: "Ada".into(),
                last_name: "Lovelace".into(),
                ..Contact::default()
            }
        );

        let gone = store.delete(0).unwrap();
        assert_eq!(gone.deleted.first_name, "Scotty");
        assert!(store.get_by_id(0).is_empty());

        let all = store.list_all();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].id, 1);
    }

    #[test]
    fn create_then_get_returns_the_same_contact() {
        let store = ContactStore::new();
        let c = store.create(ada().email("ada@example.org"));
        assert_eq!(store.get_by_id(c.id), vec![c]);
    }

    #[test]
    fn get_by_unknown_id_is_empty_not_an_error() {
        let store = ContactStore::seeded();
        assert!(store.get_by_id(42).is_empty());
    }

    #[test]
    fn ids_are_not_reused_after_delete() {
        let store = ContactStore::new();
        let a = store.create(ada());
        let b = store.create(ada());
        store.delete(a.id).unwrap();
        let c = store.create(ada());

        assert_ne!(c.id, b.id);
        assert_ne!(c.id, a.id);
        let ids: HashSet<u64> = store.list_all().iter().map(|c| c.id).collect();
        assert_eq!(ids.len(), store.len());
    }

    #[test]
    fn update_changes_only_the_target_field_and_contact() {
        let store = ContactStore::seeded();
        let ada = store.create(ada().phone("555"));
        let before_seed = store.get_by_id(0);

        let after = store.update(ada.id, ContactPatch::new().email("ada@example.org")).unwrap();
        assert_eq!(after.first_name, "Ada");
        assert_eq!(after.phone, "555");
        assert_eq!(after.email, "ada@example.org");
        assert_eq!(store.get_by_id(0), before_seed);
    }

    #[test]
    fn update_and_delete_missing_id_report_not_found() {
        let store = ContactStore::seeded();
        store.delete(0).unwrap();

        assert_eq!(store.delete(0), Err(StoreError::NotFound(0)));
        assert_eq!(
            store.update(0, ContactPatch::new().phone("1")),
            Err(StoreError::NotFound(0))
        );
        assert!(store.is_empty());
    }

    #[test]
    fn len_tracks_creates_minus_deletes() {
        let store = ContactStore::new();
        for _ in 0..5 {
            store.create(ada());
        }
        store.delete(1).unwrap();
        store.delete(3).unwrap();
        assert_eq!(store.list_all().len(), 3);
        assert_eq!(
            store.list_all().iter().map(|c| c.id).collect::<Vec<_>>(),
            vec![0, 2, 4]
        );
    }

    #[test]
    fn name_lookups_are_exact_matches() {
        let store = ContactStore::seeded();
        store.create(ada().last_name("Lovelace"));
        store.create(ada().last_name("Byron"));
        store.create(ContactPatch::new().first_name("Adam").last_name("Lovelace"));

        assert_eq!(store.find_by_first_name("Ada").len(), 2);
        assert_eq!(store.find_by_last_name("Lovelace").len(), 2);
        assert_eq!(store.find_by_full_name("Ada", "Byron").len(), 1);
        assert!(store.find_by_first_name("ada").is_empty());
    }

    #[test]
    fn error_message_names_the_id() {
        assert_eq!(StoreError::NotFound(9).to_string(), "contact 9 not found");
    }

    #[test]
    fn concurrent_creates_get_distinct_ids() {
        let store = Arc::new(ContactStore::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = Arc::clone(&store);
                std::thread::spawn(move || {
                    (0..50).map(|_| store.create(ContactPatch::new()).id).collect::<Vec<_>>()
                })
            })
            .collect();

        let mut ids = HashSet::new();
        for h in handles {
            for id in h.join().unwrap() {
                assert!(ids.insert(id), "duplicate id {id}");
            }
        }
        assert_eq!(ids.len(), 400);
        assert_eq!(store.len(), 400);
    }
}
