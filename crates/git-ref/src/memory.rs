//! In-memory reference store.
//!
//! [`MemoryRefStore`] keeps references in a `BTreeMap` behind a `RwLock`,
//! which gives name-ordered iteration for free. Logs are kept oldest first
//! and reversed on read. Data is lost when the store is dropped.

use std::collections::{BTreeMap, HashMap};
use std::sync::{PoisonError, RwLock};

use crate::error::RefError;
use crate::name::RefName;
use crate::reflog::ReflogEntry;
use crate::store::RefStore;
use crate::Reference;

#[derive(Debug, Default)]
pub struct MemoryRefStore {
    refs: RwLock<BTreeMap<RefName, Reference>>,
    logs: RwLock<HashMap<RefName, Vec<ReflogEntry>>>,
}

impl MemoryRefStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.refs.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl RefStore for MemoryRefStore {
    fn get(&self, name: &RefName) -> Result<Option<Reference>, RefError> {
        let refs = self.refs.read().unwrap_or_else(PoisonError::into_inner);
        Ok(refs.get(name).cloned())
    }

    fn put(&self, reference: &Reference) -> Result<(), RefError> {
        let mut refs = self.refs.write().unwrap_or_else(PoisonError::into_inner);
        refs.insert(reference.name().clone(), reference.clone());
        Ok(())
    }

    fn delete(&self, name: &RefName) -> Result<bool, RefError> {
        let existed = self
            .refs
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(name)
            .is_some();
        self.logs
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(name);
        Ok(existed)
    }

    fn iter(
        &self,
        prefix: Option<&str>,
    ) -> Result<Box<dyn Iterator<Item = Result<Reference, RefError>> + '_>, RefError> {
        let refs = self.refs.read().unwrap_or_else(PoisonError::into_inner);
        let prefix = prefix.unwrap_or("");
        let snapshot: Vec<Reference> = refs
            .values()
            .filter(|r| r.name().as_str().starts_with(prefix))
            .cloned()
            .collect();
        Ok(Box::new(snapshot.into_iter().map(Ok)))
    }

    fn reflog(&self, name: &RefName) -> Result<Vec<ReflogEntry>, RefError> {
        let logs = self.logs.read().unwrap_or_else(PoisonError::into_inner);
        Ok(logs
            .get(name)
            .map(|entries| entries.iter().rev().cloned().collect())
            .unwrap_or_default())
    }

    fn append_reflog(&self, name: &RefName, entry: &ReflogEntry) -> Result<(), RefError> {
        let mut logs = self.logs.write().unwrap_or_else(PoisonError::into_inner);
        logs.entry(name.clone()).or_default().push(entry.clone());
        Ok(())
    }

    fn rename_reflog(&self, from: &RefName, to: &RefName) -> Result<(), RefError> {
        let mut logs = self.logs.write().unwrap_or_else(PoisonError::into_inner);
        if let Some(moved) = logs.remove(from) {
            logs.entry(to.clone()).or_default().extend(moved);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::ops::ControlFlow;

    use git_hash::ObjectId;

    use super::*;
    use crate::store::Enumeration;

    fn name(s: &str) -> RefName {
        RefName::new(s).unwrap()
    }

    fn oid(n: u8) -> ObjectId {
        ObjectId::from_raw(&[n; 20])
    }

    fn populated() -> MemoryRefStore {
        let store = MemoryRefStore::new();
        for (i, n) in ["refs/heads/main", "refs/heads/topic", "refs/tags/v1"].iter().enumerate() {
            store.put(&Reference::direct(name(n), oid(i as u8 + 1))).unwrap();
        }
        store
    }

    #[test]
    fn put_get_delete() {
        let store = populated();
        assert_eq!(store.len(), 3);
        let main = store.get(&name("refs/heads/main")).unwrap().unwrap();
        assert_eq!(main.target_oid(), Some(oid(1)));

        assert!(store.delete(&name("refs/heads/main")).unwrap());
        assert!(!store.delete(&name("refs/heads/main")).unwrap());
        assert!(store.get(&name("refs/heads/main")).unwrap().is_none());
        assert!(store.find(&name("refs/heads/main")).unwrap_err().is_not_found());
    }

    #[test]
    fn iter_is_sorted_and_filtered() {
        let store = populated();
        let heads: Vec<String> = store
            .iter(Some("refs/heads/"))
            .unwrap()
            .map(|r| r.unwrap().name().to_string())
            .collect();
        assert_eq!(heads, ["refs/heads/main", "refs/heads/topic"]);
        assert_eq!(store.iter(None).unwrap().count(), 3);
    }

    #[test]
    fn for_each_stops_on_break() {
        let store = populated();
        let mut seen = 0;
        let outcome = store
            .for_each(&mut |_| {
                seen += 1;
                if seen == 2 {
                    ControlFlow::Break(())
                } else {
                    ControlFlow::Continue(())
                }
            })
            .unwrap();
        assert_eq!(outcome, Enumeration::Stopped);
        assert_eq!(seen, 2);

        let outcome = store.for_each(&mut |_| ControlFlow::Continue(())).unwrap();
        assert_eq!(outcome, Enumeration::Completed);
        assert!(!outcome.is_stopped());
    }

    #[test]
    fn list_by_glob() {
        let store = populated();
        assert_eq!(store.list("refs/heads/*").unwrap().len(), 2);
        assert_eq!(store.list("refs/tags/v?").unwrap(), [name("refs/tags/v1")]);
        assert!(store.list("refs/remotes/*").unwrap().is_empty());
    }

    #[test]
    fn reflog_is_newest_first_and_follows_renames() {
        let store = populated();
        let who = git_utils::date::Signature::now("T", "t@example.com");
        let main = name("refs/heads/main");
        for (old, new) in [(0, 1), (1, 2)] {
            let entry = ReflogEntry {
                old_oid: oid(old),
                new_oid: oid(new),
                identity: who.clone(),
                message: "update".into(),
            };
            store.append_reflog(&main, &entry).unwrap();
        }
        let log = store.reflog(&main).unwrap();
        assert_eq!(log[0].new_oid, oid(2));

        let moved = name("refs/heads/moved");
        store.rename_reflog(&main, &moved).unwrap();
        assert!(store.reflog(&main).unwrap().is_empty());
        assert_eq!(store.reflog(&moved).unwrap().len(), 2);

        store.delete(&moved).unwrap();
        assert!(store.reflog(&moved).unwrap().is_empty());
    }
}
