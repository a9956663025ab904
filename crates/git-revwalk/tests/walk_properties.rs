//! Walk invariants over randomly generated histories.

use std::collections::{BTreeSet, HashMap, HashSet};

use git_hash::ObjectId;
use git_object::{FileMode, Tree, TreeEntry};
use git_repository::{NewCommit, Repository};
use git_revwalk::{RevWalk, Sort};
use git_utils::date::{GitDate, Signature};
use proptest::prelude::*;

/// A history: for each commit, its committer time and parent indices, all
/// lower than its own.
#[derive(Debug, Clone)]
struct Dag {
    commits: Vec<(i64, Vec<usize>)>,
}

fn dag() -> impl Strategy<Value = Dag> {
    (1usize..14)
        .prop_flat_map(|n| {
            proptest::collection::vec((0i64..50, proptest::collection::btree_set(0usize..n, 0..3)), n)
        })
        .prop_map(|raw| Dag {
            commits: raw
                .into_iter()
                .enumerate()
                .map(|(i, (time, parents))| {
                    (time, parents.into_iter().filter(|&p| p < i).collect())
                })
                .collect(),
        })
}

fn build(dag: &Dag) -> (Repository, Vec<ObjectId>) {
    let repo = Repository::in_memory().unwrap();
    let blob = repo.create_blob(b"content").unwrap();
    let tree = repo
        .create_tree(&Tree {
            entries: vec![TreeEntry::new(FileMode::Regular, "f", blob)],
        })
        .unwrap();
    let mut ids = Vec::with_capacity(dag.commits.len());
    for (i, (time, parents)) in dag.commits.iter().enumerate() {
        let who = Signature {
            name: "Walker".into(),
            email: "walker@example.com".into(),
            date: GitDate::new(*time, 0),
        };
        let parents: Vec<ObjectId> = parents.iter().map(|&p| ids[p]).collect();
        let msg = format!("commit {i}\n");
        let oid = repo
            .create_commit(None, &NewCommit::new(&who, &who, &msg, tree, &parents))
            .unwrap();
        ids.push(oid);
    }
    (repo, ids)
}

fn ancestors(dag: &Dag, starts: &BTreeSet<usize>) -> HashSet<usize> {
    let mut out = HashSet::new();
    let mut stack: Vec<usize> = starts.iter().copied().collect();
    while let Some(i) = stack.pop() {
        if out.insert(i) {
            stack.extend(dag.commits[i].1.iter().copied());
        }
    }
    out
}

fn run(repo: &Repository, ids: &[ObjectId], sort: Sort, push: &BTreeSet<usize>, hide: &BTreeSet<usize>) -> Vec<ObjectId> {
    let mut walk = RevWalk::new(repo);
    walk.set_sorting(sort);
    for &i in push {
        walk.push(ids[i]).unwrap();
    }
    for &i in hide {
        walk.hide(ids[i]).unwrap();
    }
    walk.collect::<Result<Vec<_>, _>>().unwrap()
}

fn starts(n: usize) -> impl Strategy<Value = BTreeSet<usize>> {
    proptest::collection::btree_set(0..n, 0..4)
}

fn case() -> impl Strategy<Value = (Dag, BTreeSet<usize>, BTreeSet<usize>)> {
    dag().prop_flat_map(|dag| {
        let n = dag.commits.len();
        (Just(dag), starts(n), starts(n))
    })
}

const SORTS: [Sort; 4] = [
    Sort::NONE,
    Sort::TIME,
    Sort::TOPOLOGICAL,
    Sort::TOPOLOGICAL.union(Sort::TIME),
];

proptest! {
    #[test]
    fn walks_yield_exactly_the_visible_commits((dag, push, hide) in case()) {
        let (repo, ids) = build(&dag);
        let hidden = ancestors(&dag, &hide);
        let expected: HashSet<ObjectId> = ancestors(&dag, &push)
            .difference(&hidden)
            .map(|&i| ids[i])
            .collect();

        for sort in SORTS {
            let out = run(&repo, &ids, sort, &push, &hide);
            let unique: HashSet<ObjectId> = out.iter().copied().collect();
            prop_assert_eq!(unique.len(), out.len(), "duplicate emitted under {:?}", sort);
            prop_assert_eq!(&unique, &expected, "wrong commit set under {:?}", sort);
        }
    }

    #[test]
    fn topological_walks_emit_parents_after_children((dag, push, hide) in case()) {
        let (repo, ids) = build(&dag);
        let index: HashMap<ObjectId, usize> = ids.iter().enumerate().map(|(i, id)| (*id, i)).collect();

        for sort in [Sort::TOPOLOGICAL, Sort::TOPOLOGICAL | Sort::TIME] {
            let out = run(&repo, &ids, sort, &push, &hide);
            let position: HashMap<ObjectId, usize> = out.iter().enumerate().map(|(p, id)| (*id, p)).collect();
            for (pos, id) in out.iter().enumerate() {
                for &parent in &dag.commits[index[id]].1 {
                    if let Some(&parent_pos) = position.get(&ids[parent]) {
                        prop_assert!(parent_pos > pos, "parent emitted before child under {:?}", sort);
                    }
                }
            }
        }
    }

    #[test]
    fn time_walks_without_topology_are_newest_first(dag in dag()) {
        let (repo, ids) = build(&dag);
        let push: BTreeSet<usize> = (0..ids.len()).collect();
        let out = run(&repo, &ids, Sort::TIME, &push, &BTreeSet::new());
        let times: Vec<(i64, ObjectId)> = out
            .iter()
            .map(|id| (repo.find_commit(id).unwrap().time(), *id))
            .collect();
        // Every commit is pushed, so the queue holds them all from the start.
        for pair in times.windows(2) {
            prop_assert!(pair[0].0 > pair[1].0 || (pair[0].0 == pair[1].0 && pair[0].1 < pair[1].1));
        }
    }

    #[test]
    fn reverse_is_an_involution((dag, push, hide) in case()) {
        let (repo, ids) = build(&dag);
        for sort in SORTS {
            let mut forward = run(&repo, &ids, sort, &push, &hide);
            forward.reverse();
            let backward = run(&repo, &ids, sort | Sort::REVERSE, &push, &hide);
            prop_assert_eq!(backward, forward, "under {:?}", sort);
        }
    }
}
