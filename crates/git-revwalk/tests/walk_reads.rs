//! Object reads performed by a walk, counted at the store.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use git_hash::{ObjectId, Prefix};
use git_object::{FileMode, ObjectType, Tree, TreeEntry};
use git_odb::{MemoryObjectStore, ObjectStore, OdbError, RawObject};
use git_ref::MemoryRefStore;
use git_repository::{NewCommit, Repository, RepositoryOptions};
use git_revwalk::{RevWalk, Sort};
use git_utils::date::{GitDate, Signature};

/// Memory store that counts `read` calls.
struct CountingStore {
    inner: MemoryObjectStore,
    reads: Arc<AtomicUsize>,
}

impl ObjectStore for CountingStore {
    fn read(&self, oid: &ObjectId) -> Result<Option<RawObject>, OdbError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.inner.read(oid)
    }

    fn write(&self, kind: ObjectType, data: &[u8]) -> Result<ObjectId, OdbError> {
        self.inner.write(kind, data)
    }

    fn contains(&self, oid: &ObjectId) -> bool {
        self.inner.contains(oid)
    }

    fn ids_with_prefix(&self, prefix: &Prefix) -> Result<Vec<ObjectId>, OdbError> {
        self.inner.ids_with_prefix(prefix)
    }
}

const MAIN_LEN: usize = 200;
const FEATURE_LEN: usize = 3;

/// `MAIN_LEN` commits on main with `FEATURE_LEN` more on top for feature.
/// Returns the repository, the read counter and both tips.
fn long_history() -> (Repository, Arc<AtomicUsize>, ObjectId, ObjectId) {
    let reads = Arc::new(AtomicUsize::new(0));
    let store = CountingStore {
        inner: MemoryObjectStore::new(),
        reads: Arc::clone(&reads),
    };
    let repo = Repository::new(store, MemoryRefStore::new(), RepositoryOptions::default());
    let blob = repo.create_blob(b"content").unwrap();
    let tree = repo
        .create_tree(&Tree {
            entries: vec![TreeEntry::new(FileMode::Regular, "f", blob)],
        })
        .unwrap();

    let mut tip: Option<ObjectId> = None;
    let mut main = None;
    for i in 0..MAIN_LEN + FEATURE_LEN {
        let who = Signature {
            name: "Walker".into(),
            email: "walker@example.com".into(),
            date: GitDate::new(1_000 + i as i64, 0),
        };
        let parents: Vec<ObjectId> = tip.into_iter().collect();
        let msg = format!("commit {i}\n");
        tip = Some(
            repo.create_commit(None, &NewCommit::new(&who, &who, &msg, tree, &parents))
                .unwrap(),
        );
        if i + 1 == MAIN_LEN {
            main = tip;
        }
    }
    (repo, reads, main.unwrap(), tip.unwrap())
}

#[test]
fn hidden_history_is_read_once_before_the_first_commit() {
    let (repo, reads, main, feature) = long_history();
    reads.store(0, Ordering::SeqCst);

    let mut walk = RevWalk::new(&repo);
    walk.push(feature).unwrap();
    walk.hide(main).unwrap();
    // Each push reads its own start and nothing else.
    assert_eq!(reads.load(Ordering::SeqCst), 2);

    assert_eq!(walk.next_commit().unwrap(), Some(feature));
    assert!(reads.load(Ordering::SeqCst) >= MAIN_LEN + 1);

    let rest: Vec<ObjectId> = walk.collect::<Result<_, _>>().unwrap();
    assert_eq!(rest.len(), FEATURE_LEN - 1);
    // Every commit came from the store exactly once.
    assert_eq!(reads.load(Ordering::SeqCst), MAIN_LEN + FEATURE_LEN);
}

#[test]
fn walks_without_hidden_starts_read_as_they_go() {
    let (repo, reads, _, feature) = long_history();
    reads.store(0, Ordering::SeqCst);

    for sort in [Sort::NONE, Sort::TIME] {
        repo.odb().clear_cache();
        reads.store(0, Ordering::SeqCst);
        let mut walk = RevWalk::new(&repo);
        walk.set_sorting(sort);
        walk.push(feature).unwrap();
        assert_eq!(walk.next_commit().unwrap(), Some(feature));
        assert!(reads.load(Ordering::SeqCst) <= 2, "under {sort:?}");
    }
}
