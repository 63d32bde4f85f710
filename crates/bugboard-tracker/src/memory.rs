//! In-memory storage for bugs and comments.

use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::{
    Bug, BugPatch, BugStatus, BugStore, Comment, NewBug, NewComment, Result, TrackerError,
};

/// In-memory store for bugs and comments.
///
/// Tables are keyed by id in a `BTreeMap`, so iteration order is insertion
/// order. Locks are always taken bugs first, then comments.
#[derive(Default)]
pub struct MemoryStore {
    /// Bugs indexed by id.
    bugs: RwLock<BTreeMap<u64, Bug>>,
    /// Comments indexed by id.
    comments: RwLock<BTreeMap<u64, Comment>>,
    /// Last assigned bug id.
    bug_seq: AtomicU64,
    /// Last assigned comment id.
    comment_seq: AtomicU64,
}

impl MemoryStore {
    /// Creates a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn next_bug_id(&self) -> u64 {
        self.bug_seq.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn next_comment_id(&self) -> u64 {
        self.comment_seq.fetch_add(1, Ordering::SeqCst) + 1
    }
}

impl BugStore for MemoryStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    fn create_bug(&self, new: NewBug) -> Result<Bug> {
        let mut bugs = self.bugs.write();
        let bug = Bug::from_new(self.next_bug_id(), new);

        bugs.insert(bug.id, bug.clone());
        tracing::debug!(bug_id = bug.id, "Stored bug in memory");
        Ok(bug)
    }

    fn get_bug(&self, id: u64) -> Result<Bug> {
        self.bugs
            .read()
            .get(&id)
            .cloned()
            .ok_or(TrackerError::BugNotFound { id })
    }

    fn list_bugs(&self, status: Option<BugStatus>) -> Result<Vec<Bug>> {
        Ok(self
            .bugs
            .read()
            .values()
            .filter(|bug| status.is_none_or(|s| bug.status == s))
            .cloned()
            .collect())
    }

    fn update_bug(&self, id: u64, patch: BugPatch) -> Result<Bug> {
        let mut bugs = self.bugs.write();
        let bug = bugs
            .get_mut(&id)
            .ok_or(TrackerError::BugNotFound { id })?;

        bug.apply(patch);
        tracing::debug!(bug_id = id, "Patched bug in memory");
        Ok(bug.clone())
    }

    fn delete_bug(&self, id: u64) -> Result<()> {
        let mut bugs = self.bugs.write();
        let mut comments = self.comments.write();

        if !bugs.contains_key(&id) {
            return Err(TrackerError::BugNotFound { id });
        }

        let before = comments.len();
        comments.retain(|_, comment| !comment.belongs_to(id));
        bugs.remove(&id);

        tracing::debug!(bug_id = id, comments = before - comments.len(), "Cascaded bug delete");
        Ok(())
    }

    fn create_comment(&self, bug_id: u64, new: NewComment) -> Result<Comment> {
        // Holding the bugs lock keeps the owner alive until the insert lands.
        let bugs = self.bugs.read();
        if !bugs.contains_key(&bug_id) {
            return Err(TrackerError::BugNotFound { id: bug_id });
        }

        let comment = Comment::from_new(self.next_comment_id(), bug_id, new);
        self.comments.write().insert(comment.id, comment.clone());
        Ok(comment)
    }

    fn get_comment(&self, bug_id: u64, comment_id: u64) -> Result<Comment> {
        self.comments
            .read()
            .get(&comment_id)
            .filter(|comment| comment.belongs_to(bug_id))
            .cloned()
            .ok_or(TrackerError::CommentNotFound { id: comment_id })
    }

    fn delete_comment(&self, bug_id: u64, comment_id: u64) -> Result<()> {
        let mut comments = self.comments.write();
        let owned = comments
            .get(&comment_id)
            .is_some_and(|comment| comment.belongs_to(bug_id));
        if !owned {
            return Err(TrackerError::CommentNotFound { id: comment_id });
        }

        comments.remove(&comment_id);
        Ok(())
    }

    fn count_bugs(&self) -> Result<usize> {
        Ok(self.bugs.read().len())
    }

    fn count_comments(&self) -> Result<usize> {
        Ok(self.comments.read().len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::conformance;
    use std::sync::Arc;

    #[test]
    fn test_memory_store_conformance() {
        conformance::run_all(|| Box::new(MemoryStore::new()));
    }

    #[test]
    fn test_store_default() {
        let store: MemoryStore = Default::default();
        assert!(store.list_bugs(None).unwrap().is_empty());
        assert_eq!(store.count_comments().unwrap(), 0);
        assert_eq!(store.backend(), "memory");
    }

    #[test]
    fn test_comment_ids_have_their_own_sequence() {
        let store = MemoryStore::new();
        let bug = store.create_bug(NewBug::new("t", "d")).unwrap();
        let comment = store
            .create_comment(bug.id, NewComment::new("t", "b"))
            .unwrap();

        assert_eq!(bug.id, 1);
        assert_eq!(comment.id, 1);
    }

    #[test]
    fn test_concurrent_id_generation() {
        use std::thread;

        let store = Arc::new(MemoryStore::new());
        let mut handles = vec![];

        for i in 0..10 {
            let store = Arc::clone(&store);
            handles.push(thread::spawn(move || {
                store
                    .create_bug(NewBug::new(format!("Concurrent bug {i}"), "Desc"))
                    .unwrap()
            }));
        }

        let ids: std::collections::HashSet<u64> =
            handles.into_iter().map(|h| h.join().unwrap().id).collect();
        assert_eq!(ids.len(), 10);
        assert_eq!(store.count_bugs().unwrap(), 10);
    }
}
