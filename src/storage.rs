use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::constants::FRIENDS_KEY;
use crate::error::StorageError;
use crate::models::Contact;

/// Persistence for the address book: one list under one fixed key
pub trait ContactStore: Send {
    /// Load the persisted list; an absent entry is an empty list
    fn load(&self) -> Result<Vec<Contact>, StorageError>;

    /// Replace the persisted list
    fn save(&self, contacts: &[Contact]) -> Result<(), StorageError>;
}

/// JSON file store at `<dir>/friends.json`
pub struct FileContactStore {
    path: PathBuf,
}

impl FileContactStore {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        FileContactStore {
            path: dir.as_ref().join(format!("{}.json", FRIENDS_KEY)),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ContactStore for FileContactStore {
    fn load(&self) -> Result<Vec<Contact>, StorageError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let content = fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&content)?)
    }

    fn save(&self, contacts: &[Contact]) -> Result<(), StorageError> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir)?;
        }
        let content = serde_json::to_string(contacts)?;
        fs::write(&self.path, content)?;
        Ok(())
    }
}

/// In-memory store holding the serialized string, like a browser
/// key-value entry. Clones share the same entry.
#[derive(Clone, Default)]
pub struct MemoryContactStore {
    entry: Arc<Mutex<Option<String>>>,
}

impl MemoryContactStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw stored string, if any
    pub fn raw(&self) -> Option<String> {
        self.entry.lock().ok().and_then(|e| e.clone())
    }

    /// Overwrite the raw stored string
    pub fn set_raw(&self, raw: impl Into<String>) {
        if let Ok(mut entry) = self.entry.lock() {
            *entry = Some(raw.into());
        }
    }
}

impl ContactStore for MemoryContactStore {
    fn load(&self) -> Result<Vec<Contact>, StorageError> {
        match self.raw() {
            Some(raw) => Ok(serde_json::from_str(&raw)?),
            None => Ok(Vec::new()),
        }
    }

    fn save(&self, contacts: &[Contact]) -> Result<(), StorageError> {
        self.set_raw(serde_json::to_string(contacts)?);
        Ok(())
    }
}

/// Address book: in-memory list mirrored to a `ContactStore`
pub struct AddressBook {
    contacts: Vec<Contact>,
    store: Box<dyn ContactStore>,
}

impl AddressBook {
    /// Create an empty book; call `reload` to read persisted entries
    pub fn new(store: Box<dyn ContactStore>) -> Self {
        AddressBook {
            contacts: Vec::new(),
            store,
        }
    }

    pub fn contacts(&self) -> &[Contact] {
        &self.contacts
    }

    pub fn get(&self, index: usize) -> Option<&Contact> {
        self.contacts.get(index)
    }

    pub fn len(&self) -> usize {
        self.contacts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contacts.is_empty()
    }

    /// Replace the in-memory list with what the store holds.
    /// On error the in-memory list is left untouched.
    pub fn reload(&mut self) -> Result<(), StorageError> {
        self.contacts = self.store.load()?;
        Ok(())
    }

    /// Append a contact: read current persisted list, append, write back,
    /// then mirror in memory. No validation or duplicate check.
    pub fn add(&mut self, contact: Contact) -> Result<(), StorageError> {
        let mut contacts = self.store.load()?;
        contacts.push(contact);
        self.store.save(&contacts)?;
        tracing::info!(count = contacts.len(), "Address book saved");
        self.contacts = contacts;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_add_to_empty_store() {
        let store = MemoryContactStore::new();
        let mut book = AddressBook::new(Box::new(store.clone()));

        book.add(Contact::new("alice", "AddrA")).unwrap();

        assert_eq!(store.load().unwrap(), vec![Contact::new("alice", "AddrA")]);
        assert_eq!(book.contacts(), &[Contact::new("alice", "AddrA")]);
    }

    #[test]
    fn test_add_appends_after_existing_entries() {
        let store = MemoryContactStore::new();
        store
            .save(&[Contact::new("a", "1"), Contact::new("b", "2")])
            .unwrap();
        let mut book = AddressBook::new(Box::new(store.clone()));

        book.add(Contact::new("c", "3")).unwrap();

        let names: Vec<_> = store.load().unwrap().into_iter().map(|c| c.name).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_add_allows_duplicates() {
        let store = MemoryContactStore::new();
        let mut book = AddressBook::new(Box::new(store.clone()));
        book.add(Contact::new("a", "1")).unwrap();
        book.add(Contact::new("a", "1")).unwrap();
        assert_eq!(book.len(), 2);
    }

    #[test]
    fn test_fresh_load_reproduces_persisted_list() {
        let dir = tempdir().unwrap();
        {
            let mut book = AddressBook::new(Box::new(FileContactStore::new(dir.path())));
            book.add(Contact::new("alice", "AddrA")).unwrap();
            book.add(Contact::new("bob", "AddrB")).unwrap();
        }

        let mut reloaded = AddressBook::new(Box::new(FileContactStore::new(dir.path())));
        assert!(reloaded.is_empty());
        reloaded.reload().unwrap();
        assert_eq!(
            reloaded.contacts(),
            &[Contact::new("alice", "AddrA"), Contact::new("bob", "AddrB")]
        );
    }

    #[test]
    fn test_file_store_missing_file_is_empty() {
        let dir = tempdir().unwrap();
        let store = FileContactStore::new(dir.path().join("nested"));
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn test_file_store_writes_plain_json_array() {
        let dir = tempdir().unwrap();
        let store = FileContactStore::new(dir.path());
        store.save(&[Contact::new("alice", "AddrA")]).unwrap();
        let raw = fs::read_to_string(store.path()).unwrap();
        assert_eq!(raw, r#"[{"name":"alice","address":"AddrA"}]"#);
    }

    #[test]
    fn test_corrupt_entry_is_reported_and_list_kept() {
        let store = MemoryContactStore::new();
        let mut book = AddressBook::new(Box::new(store.clone()));
        book.add(Contact::new("a", "1")).unwrap();

        store.set_raw("{not json");
        assert!(matches!(book.reload(), Err(StorageError::Corrupt(_))));
        assert!(matches!(book.add(Contact::new("b", "2")), Err(StorageError::Corrupt(_))));
        assert_eq!(book.contacts(), &[Contact::new("a", "1")]);
    }
}
