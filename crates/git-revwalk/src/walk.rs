//! Core revision walk iterator.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, VecDeque};

use bstr::BStr;
use git_hash::collections::{OidMap, OidSet};
use git_hash::ObjectId;
use git_object::CommitView;
use git_ref::{RefError, Reference};
use git_repository::Repository;
use git_utils::wildmatch::has_glob_chars;

use crate::range::parse_range;
use crate::RevWalkError;

bitflags::bitflags! {
    /// Emission order of a walk. Flags combine: `TIME | TOPOLOGICAL`
    /// breaks topological ties by committer time, and `REVERSE` flips
    /// whatever order the other flags produce.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Sort: u32 {
        /// Breadth-first from the starting points, in push order.
        const NONE = 0;
        /// Newest committer time first; ties by ascending object id.
        const TIME = 1 << 0;
        /// Every commit before all of its walked parents.
        const TOPOLOGICAL = 1 << 1;
        const REVERSE = 1 << 2;
    }
}

/// Options for revision walking.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WalkOptions {
    /// Follow only the first parent of merge commits.
    pub first_parent_only: bool,
}

/// A starting point as given to `push`/`hide`. Globs are expanded when the
/// walk is prepared, so references created in between are seen.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Start {
    Commit(ObjectId),
    Glob(String),
}

/// An entry in the committer-time priority queue.
struct TimeEntry {
    time: i64,
    commit: CommitView,
}

impl PartialEq for TimeEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for TimeEntry {}

impl PartialOrd for TimeEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TimeEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Max-heap: newest first, then the smaller id.
        self.time
            .cmp(&other.time)
            .then_with(|| other.commit.id().cmp(&self.commit.id()))
    }
}

impl From<CommitView> for TimeEntry {
    fn from(commit: CommitView) -> Self {
        Self {
            time: commit.time(),
            commit,
        }
    }
}

/// Commits waiting to be emitted, ordered by the sort mode.
enum Queue {
    Fifo(VecDeque<CommitView>),
    Time(BinaryHeap<TimeEntry>),
}

impl Queue {
    fn new(sort: Sort) -> Self {
        if sort.contains(Sort::TIME) {
            Queue::Time(BinaryHeap::new())
        } else {
            Queue::Fifo(VecDeque::new())
        }
    }

    fn push(&mut self, commit: CommitView) {
        match self {
            Queue::Fifo(queue) => queue.push_back(commit),
            Queue::Time(heap) => heap.push(commit.into()),
        }
    }

    fn pop(&mut self) -> Option<CommitView> {
        match self {
            Queue::Fifo(queue) => queue.pop_front(),
            Queue::Time(heap) => heap.pop().map(|entry| entry.commit),
        }
    }
}

/// Traversal progress. Anything other than `Fresh` is discarded when the
/// configuration changes.
enum State {
    Fresh,
    /// Parents are expanded as commits are emitted.
    Streaming(Queue),
    /// The whole sequence was computed up front.
    Buffered(VecDeque<CommitView>),
    Done,
}

/// Revision walk iterator over commits.
///
/// Yields the ids of commits reachable from the pushed starting points and
/// not reachable from the hidden ones, each at most once. No object is read
/// from the database after a push until the first call to `next`.
///
/// Hiding is exact rather than bounded by committer time: the first call to
/// `next` reads the full history reachable from the hidden starting points,
/// once, before anything is emitted. `push(feature); hide(main)` therefore
/// costs one read per commit on `main`, and the hidden set is held until the
/// walk is reset. Visible commits are still read only as they are reached.
pub struct RevWalk<'a> {
    /// Reference to the repository.
    repo: &'a Repository,
    pushed: Vec<Start>,
    hidden_starts: Vec<Start>,
    sort: Sort,
    options: WalkOptions,
    state: State,
    /// Hidden commits and all of their ancestors.
    hidden: OidSet,
    /// Commits already queued; nothing enters the queue twice.
    seen: OidSet,
    /// Failures found during expansion, reported before further commits.
    errors: VecDeque<RevWalkError>,
}

impl<'a> RevWalk<'a> {
    /// Create a new revision walker for the given repository.
    pub fn new(repo: &'a Repository) -> Self {
        Self {
            repo,
            pushed: Vec::new(),
            hidden_starts: Vec::new(),
            sort: Sort::NONE,
            options: WalkOptions::default(),
            state: State::Fresh,
            hidden: OidSet::new(),
            seen: OidSet::new(),
            errors: VecDeque::new(),
        }
    }

    pub fn repository(&self) -> &'a Repository {
        self.repo
    }

    pub fn sorting(&self) -> Sort {
        self.sort
    }

    /// Change the emission order. A walk in progress restarts from its
    /// starting points in the new order.
    pub fn set_sorting(&mut self, sort: Sort) {
        self.sort = sort;
        self.rewind();
    }

    pub fn options(&self) -> WalkOptions {
        self.options
    }

    /// Set walk options. A walk in progress restarts.
    pub fn set_options(&mut self, options: WalkOptions) {
        self.options = options;
        self.rewind();
    }

    /// Forget all starting points and traversal state. Sorting and options
    /// are kept.
    pub fn reset(&mut self) {
        self.pushed.clear();
        self.hidden_starts.clear();
        self.rewind();
    }

    // --- Starting points ---
    //
    // Adding a starting point to a walk in progress restarts it.

    /// Add a starting commit. Tags are peeled; anything that does not peel
    /// to a commit is `NotACommit`.
    pub fn push(&mut self, oid: ObjectId) -> Result<(), RevWalkError> {
        let commit = self.commit_of(&oid)?;
        self.add(true, Start::Commit(commit));
        Ok(())
    }

    pub fn push_commit(&mut self, commit: &CommitView) {
        self.add(true, Start::Commit(commit.id()));
    }

    /// Add the commit a reference resolves to.
    pub fn push_ref(&mut self, name: &str) -> Result<(), RevWalkError> {
        let oid = self.repo.resolve_reference(name)?;
        self.push(oid)
    }

    /// Add the commit a reference handle designates, following symbolic
    /// targets in the current store.
    pub fn push_reference(&mut self, reference: &Reference) -> Result<(), RevWalkError> {
        let oid = self.reference_target(reference)?;
        self.push(oid)
    }

    /// Add the tips of every reference matching `glob`, expanded when the
    /// walk starts. A leading `refs/` is implied and so is a trailing `/*`
    /// when the glob has no wildcard. Matches that do not peel to a commit
    /// are skipped.
    pub fn push_glob(&mut self, glob: &str) {
        self.add(true, Start::Glob(glob_pattern(glob)));
    }

    /// Add the commit `HEAD` resolves to. An unborn `HEAD` is an error.
    pub fn push_head(&mut self) -> Result<(), RevWalkError> {
        let oid = self.repo.head_id()?;
        self.push(oid)
    }

    /// Add an `A..B` range: commits reachable from `B` but not from `A`.
    /// An empty side stands for `HEAD`. Both sides are resolved before
    /// anything is added, so a bad range leaves the walker untouched.
    pub fn push_range(&mut self, range: &str) -> Result<(), RevWalkError> {
        let (from, to) = parse_range(self.repo, range)?;
        let from = self.commit_of(&from)?;
        let to = self.commit_of(&to)?;
        self.add(false, Start::Commit(from));
        self.add(true, Start::Commit(to));
        Ok(())
    }

    /// Exclude a commit and all of its ancestors.
    pub fn hide(&mut self, oid: ObjectId) -> Result<(), RevWalkError> {
        let commit = self.commit_of(&oid)?;
        self.add(false, Start::Commit(commit));
        Ok(())
    }

    pub fn hide_commit(&mut self, commit: &CommitView) {
        self.add(false, Start::Commit(commit.id()));
    }

    pub fn hide_ref(&mut self, name: &str) -> Result<(), RevWalkError> {
        let oid = self.repo.resolve_reference(name)?;
        self.hide(oid)
    }

    pub fn hide_reference(&mut self, reference: &Reference) -> Result<(), RevWalkError> {
        let oid = self.reference_target(reference)?;
        self.hide(oid)
    }

    /// Exclude the tips of every reference matching `glob` and their
    /// ancestors; see [`push_glob`](Self::push_glob) for the pattern rules.
    pub fn hide_glob(&mut self, glob: &str) {
        self.add(false, Start::Glob(glob_pattern(glob)));
    }

    pub fn hide_head(&mut self) -> Result<(), RevWalkError> {
        let oid = self.repo.head_id()?;
        self.hide(oid)
    }

    /// The next commit in walk order, loaded.
    pub fn next_commit(&mut self) -> Option<Result<CommitView, RevWalkError>> {
        if let Some(err) = self.errors.pop_front() {
            return Some(Err(err));
        }
        if matches!(self.state, State::Fresh) {
            if let Err(err) = self.prepare() {
                self.state = State::Done;
                return Some(Err(err));
            }
            if let Some(err) = self.errors.pop_front() {
                return Some(Err(err));
            }
        }

        let mut state = std::mem::replace(&mut self.state, State::Done);
        let next = match &mut state {
            State::Streaming(queue) => {
                let next = queue.pop();
                if let Some(commit) = &next {
                    self.expand(commit, |c| queue.push(c));
                }
                next
            }
            State::Buffered(commits) => commits.pop_front(),
            State::Fresh | State::Done => None,
        };

        match next {
            Some(commit) => {
                self.state = state;
                Some(Ok(commit))
            }
            None => self.errors.pop_front().map(Err),
        }
    }

    // --- Internal helpers ---

    fn add(&mut self, push: bool, start: Start) {
        if push {
            self.pushed.push(start);
        } else {
            self.hidden_starts.push(start);
        }
        self.rewind();
    }

    fn rewind(&mut self) {
        self.state = State::Fresh;
        self.hidden.clear();
        self.seen.clear();
        self.errors.clear();
    }

    fn reference_target(&self, reference: &Reference) -> Result<ObjectId, RevWalkError> {
        let resolved = reference.resolve(self.repo.refs())?;
        resolved
            .target_oid()
            .ok_or_else(|| RefError::NotFound(resolved.name().to_string()).into())
    }

    /// The commit `oid` designates, peeling tags.
    fn commit_of(&self, oid: &ObjectId) -> Result<ObjectId, RevWalkError> {
        let obj = self.repo.lookup(oid)?;
        Ok(self.repo.peel_to_commit(&obj)?.id())
    }

    /// Commit ids of the starting points, globs expanded.
    fn expand_starts(&self, starts: &[Start]) -> Result<Vec<ObjectId>, RevWalkError> {
        let mut out = Vec::with_capacity(starts.len());
        for start in starts {
            match start {
                Start::Commit(oid) => out.push(*oid),
                Start::Glob(pattern) => self.expand_glob(pattern, &mut out)?,
            }
        }
        Ok(out)
    }

    fn expand_glob(&self, pattern: &str, out: &mut Vec<ObjectId>) -> Result<(), RevWalkError> {
        let names = self.repo.list_references(pattern)?;
        tracing::debug!(pattern, matches = names.len(), "expanding reference glob");
        for name in names {
            let Ok(oid) = self.repo.refs().resolve_to_oid(&name) else {
                tracing::trace!(%name, "skipping unresolvable reference");
                continue;
            };
            match self.commit_of(&oid) {
                Ok(commit) => out.push(commit),
                Err(RevWalkError::NotACommit { .. }) => {
                    tracing::trace!(%name, %oid, "skipping non-commit reference");
                }
                Err(err) => return Err(err),
            }
        }
        Ok(())
    }

    /// Resolve the starting points, mark the hidden closure and set up the
    /// queue or the precomputed sequence for the sort mode.
    fn prepare(&mut self) -> Result<(), RevWalkError> {
        let pushed = self.expand_starts(&self.pushed)?;
        let hidden = self.expand_starts(&self.hidden_starts)?;
        self.mark_hidden(&hidden)?;
        tracing::debug!(
            pushed = pushed.len(),
            hidden_starts = hidden.len(),
            hidden = self.hidden.len(),
            sort = ?self.sort,
            "preparing revision walk"
        );

        let mut queue = Queue::new(self.sort);
        for oid in pushed {
            if self.hidden.contains(&oid) || !self.seen.insert(oid) {
                continue;
            }
            queue.push(self.repo.find_commit(&oid)?);
        }

        self.state = if self.sort.contains(Sort::TOPOLOGICAL) {
            let mut order = self.topo_order(queue);
            if self.sort.contains(Sort::REVERSE) {
                order.make_contiguous().reverse();
            }
            State::Buffered(order)
        } else if self.sort.contains(Sort::REVERSE) {
            let mut order = VecDeque::new();
            while let Some(commit) = queue.pop() {
                self.expand(&commit, |c| queue.push(c));
                order.push_front(commit);
            }
            State::Buffered(order)
        } else {
            State::Streaming(queue)
        };
        Ok(())
    }

    /// Mark every commit reachable from `starts` as hidden, through all
    /// parents even in first-parent walks. Missing ancestors end the
    /// closure on that path.
    fn mark_hidden(&mut self, starts: &[ObjectId]) -> Result<(), RevWalkError> {
        let mut stack: Vec<ObjectId> = starts.to_vec();
        while let Some(oid) = stack.pop() {
            if !self.hidden.insert(oid) {
                continue;
            }
            match self.repo.find_commit(&oid) {
                Ok(commit) => {
                    stack.extend(commit.parents.iter().filter(|p| !self.hidden.contains(*p)));
                }
                Err(err) if err.is_not_found() => {
                    tracing::debug!(%oid, "hidden ancestor is missing");
                }
                Err(err) => return Err(err.into()),
            }
        }
        Ok(())
    }

    fn walked_parents<'c>(&self, commit: &'c CommitView) -> &'c [ObjectId] {
        if self.options.first_parent_only {
            &commit.parents[..commit.parents.len().min(1)]
        } else {
            &commit.parents
        }
    }

    /// Load the unseen, unhidden parents of `commit` and hand them to
    /// `enqueue`. A missing parent is recorded as `BrokenHistory` and
    /// skipped.
    fn expand(&mut self, commit: &CommitView, mut enqueue: impl FnMut(CommitView)) {
        for parent in self.walked_parents(commit) {
            if self.hidden.contains(parent) || !self.seen.insert(*parent) {
                continue;
            }
            match self.repo.find_commit(parent) {
                Ok(loaded) => enqueue(loaded),
                Err(err) if err.is_not_found() => {
                    tracing::debug!(commit = %commit.id(), %parent, "broken history");
                    self.errors.push_back(RevWalkError::BrokenHistory {
                        commit: commit.id(),
                        parent: *parent,
                    });
                }
                Err(err) => self.errors.push_back(err.into()),
            }
        }
    }

    /// Discover every walked commit, then emit each one once all of its
    /// walked children have been emitted. Ready commits leave in the
    /// order they became ready, or newest first under `TIME`.
    fn topo_order(&mut self, mut tips: Queue) -> VecDeque<CommitView> {
        let mut discovered: Vec<CommitView> = Vec::new();
        let mut pending = VecDeque::new();
        while let Some(commit) = tips.pop() {
            pending.push_back(commit);
        }
        while let Some(commit) = pending.pop_front() {
            self.expand(&commit, |c| pending.push_back(c));
            discovered.push(commit);
        }

        let by_id: OidMap<CommitView> = discovered.iter().map(|c| (c.id(), c.clone())).collect();
        let mut indegree: OidMap<usize> = OidMap::new();
        for commit in &discovered {
            for parent in self.walked_parents(commit) {
                if by_id.contains_key(parent) {
                    *indegree.entry(*parent).or_insert(0) += 1;
                }
            }
        }
        tracing::debug!(commits = by_id.len(), "topological order prepared");

        let mut ready = Queue::new(self.sort);
        for commit in &discovered {
            if !indegree.contains_key(&commit.id()) {
                ready.push(commit.clone());
            }
        }

        let mut order = VecDeque::with_capacity(discovered.len());
        while let Some(commit) = ready.pop() {
            for parent in self.walked_parents(&commit) {
                let Some(count) = indegree.get_mut(parent) else {
                    continue;
                };
                *count -= 1;
                if *count == 0 {
                    if let Some(loaded) = by_id.get(parent) {
                        ready.push(loaded.clone());
                    }
                }
            }
            order.push_back(commit);
        }
        order
    }
}

/// Apply the glob conventions: `refs/` is implied, and a pattern without
/// wildcards names a hierarchy.
fn glob_pattern(glob: &str) -> String {
    let mut pattern = if glob.starts_with("refs/") {
        glob.to_owned()
    } else {
        format!("refs/{glob}")
    };
    if !has_glob_chars(BStr::new(&pattern)) {
        if !pattern.ends_with('/') {
            pattern.push('/');
        }
        pattern.push('*');
    }
    pattern
}

impl Iterator for RevWalk<'_> {
    type Item = Result<ObjectId, RevWalkError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_commit().map(|res| res.map(|commit| commit.id()))
    }
}

impl std::fmt::Debug for RevWalk<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RevWalk")
            .field("pushed", &self.pushed)
            .field("hidden", &self.hidden_starts)
            .field("sort", &self.sort)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn glob_conventions() {
        assert_eq!(glob_pattern("heads"), "refs/heads/*");
        assert_eq!(glob_pattern("refs/tags/"), "refs/tags/*");
        assert_eq!(glob_pattern("heads/feat-*"), "refs/heads/feat-*");
        assert_eq!(glob_pattern("refs/remotes/*/main"), "refs/remotes/*/main");
        assert_eq!(glob_pattern("tags/v[12]"), "refs/tags/v[12]");
    }

    #[test]
    fn sort_flags_combine() {
        let sort = Sort::TIME | Sort::TOPOLOGICAL;
        assert!(sort.contains(Sort::TIME));
        assert!(!sort.contains(Sort::REVERSE));
        assert_eq!(Sort::default(), Sort::NONE);
        assert!(Sort::NONE.is_empty());
    }
}
