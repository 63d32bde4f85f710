//! Storage interface for bugs and comments.
//!
//! Every method is one atomic operation against the backend: a caller never
//! observes a half-applied patch or a bug deleted without its comments.

use std::sync::Arc;

use crate::{Bug, BugPatch, BugStatus, Comment, NewBug, NewComment, Result};

/// Trait for bug storage backends.
///
/// Implementations include the in-memory [`MemoryStore`](crate::MemoryStore)
/// and, with the `sqlite` feature, [`SqliteStore`](crate::SqliteStore).
pub trait BugStore: Send + Sync {
    /// Short backend name, used in logs and health output.
    fn backend(&self) -> &'static str;

    /// Persists a new bug and returns it with its assigned id.
    fn create_bug(&self, new: NewBug) -> Result<Bug>;

    /// Gets a bug by id.
    fn get_bug(&self, id: u64) -> Result<Bug>;

    /// Lists bugs in insertion order, optionally only those with `status`.
    fn list_bugs(&self, status: Option<BugStatus>) -> Result<Vec<Bug>>;

    /// Overlays `patch` on the stored bug and returns the result.
    fn update_bug(&self, id: u64, patch: BugPatch) -> Result<Bug>;

    /// Deletes a bug together with all of its comments.
    fn delete_bug(&self, id: u64) -> Result<()>;

    /// Persists a comment owned by `bug_id`. Fails if the bug does not exist.
    fn create_comment(&self, bug_id: u64, new: NewComment) -> Result<Comment>;

    /// Gets a comment by id, scoped to its owning bug.
    fn get_comment(&self, bug_id: u64, comment_id: u64) -> Result<Comment>;

    /// Deletes a comment by id, scoped to its owning bug.
    fn delete_comment(&self, bug_id: u64, comment_id: u64) -> Result<()>;

    /// Number of stored bugs.
    fn count_bugs(&self) -> Result<usize>;

    /// Number of stored comments across all bugs.
    fn count_comments(&self) -> Result<usize>;
}

impl<T: BugStore + ?Sized> BugStore for Arc<T> {
    fn backend(&self) -> &'static str {
        (**self).backend()
    }

    fn create_bug(&self, new: NewBug) -> Result<Bug> {
        (**self).create_bug(new)
    }

    fn get_bug(&self, id: u64) -> Result<Bug> {
        (**self).get_bug(id)
    }

    fn list_bugs(&self, status: Option<BugStatus>) -> Result<Vec<Bug>> {
        (**self).list_bugs(status)
    }

    fn update_bug(&self, id: u64, patch: BugPatch) -> Result<Bug> {
        (**self).update_bug(id, patch)
    }

    fn delete_bug(&self, id: u64) -> Result<()> {
        (**self).delete_bug(id)
    }

    fn create_comment(&self, bug_id: u64, new: NewComment) -> Result<Comment> {
        (**self).create_comment(bug_id, new)
    }

    fn get_comment(&self, bug_id: u64, comment_id: u64) -> Result<Comment> {
        (**self).get_comment(bug_id, comment_id)
    }

    fn delete_comment(&self, bug_id: u64, comment_id: u64) -> Result<()> {
        (**self).delete_comment(bug_id, comment_id)
    }

    fn count_bugs(&self) -> Result<usize> {
        (**self).count_bugs()
    }

    fn count_comments(&self) -> Result<usize> {
        (**self).count_comments()
    }
}

/// Behavioral checks every backend must pass.
#[cfg(test)]
pub(crate) mod conformance {
    use super::*;
    use crate::TrackerError;

    fn seed(store: &dyn BugStore, title: &str, status: BugStatus) -> Bug {
        store
            .create_bug(NewBug::new(title, format!("{title} description")).with_status(status))
            .unwrap()
    }

    pub fn create_and_get_round_trip(store: &dyn BugStore) {
        for status in [BugStatus::Resolved, BugStatus::Unresolved] {
            let new = NewBug::new("Crash", "On boot")
                .with_status(status)
                .with_assignee("7");
            let created = store.create_bug(new.clone()).unwrap();
            let fetched = store.get_bug(created.id).unwrap();

            assert_eq!(fetched, created);
            assert_eq!(fetched.title, new.title);
            assert_eq!(fetched.description, new.description);
            assert_eq!(fetched.status, status);
            assert_eq!(fetched.assignee_id.as_deref(), Some("7"));
        }
    }

    pub fn ids_are_unique_and_increasing(store: &dyn BugStore) {
        let a = seed(store, "a", BugStatus::Unresolved);
        let b = seed(store, "b", BugStatus::Unresolved);
        assert!(b.id > a.id);
        assert_eq!(a.id, 1);
    }

    pub fn list_filters_in_insertion_order(store: &dyn BugStore) {
        for i in 0..3 {
            seed(store, &format!("Test bug {i}"), BugStatus::Unresolved);
        }
        seed(store, "Resolved bug", BugStatus::Resolved);

        let all = store.list_bugs(None).unwrap();
        assert_eq!(all.len(), 4);

        let resolved = store.list_bugs(Some(BugStatus::Resolved)).unwrap();
        assert_eq!(resolved.len(), 1);
        assert_eq!(resolved[0].title, "Resolved bug");

        let unresolved = store.list_bugs(Some(BugStatus::Unresolved)).unwrap();
        let titles: Vec<&str> = unresolved.iter().map(|b| b.title.as_str()).collect();
        assert_eq!(titles, vec!["Test bug 0", "Test bug 1", "Test bug 2"]);
    }

    pub fn partial_update(store: &dyn BugStore) {
        let bug = seed(store, "Test bug", BugStatus::Unresolved);

        let updated = store
            .update_bug(
                bug.id,
                BugPatch {
                    title: Some("Test bug edited".to_string()),
                    ..BugPatch::default()
                },
            )
            .unwrap();
        assert_eq!(updated.title, "Test bug edited");
        assert_eq!(updated.description, bug.description);
        assert_eq!(updated.status, BugStatus::Unresolved);

        let resolved = store
            .update_bug(bug.id, BugPatch::status(BugStatus::Resolved))
            .unwrap();
        assert_eq!(resolved.title, "Test bug edited");
        assert!(resolved.is_resolved());

        let assigned = store.update_bug(bug.id, BugPatch::assignee("123")).unwrap();
        assert_eq!(assigned.assignee_id.as_deref(), Some("123"));
        assert_eq!(store.get_bug(bug.id).unwrap(), assigned);
    }

    pub fn missing_bug_is_not_found(store: &dyn BugStore) {
        let bug = seed(store, "only", BugStatus::Unresolved);
        let missing = bug.id + 100;

        assert!(matches!(
            store.get_bug(missing),
            Err(TrackerError::BugNotFound { id }) if id == missing
        ));
        assert!(matches!(
            store.update_bug(missing, BugPatch::status(BugStatus::Resolved)),
            Err(TrackerError::BugNotFound { .. })
        ));
        assert!(matches!(
            store.delete_bug(missing),
            Err(TrackerError::BugNotFound { .. })
        ));
        assert!(matches!(
            store.create_comment(missing, NewComment::new("t", "b")),
            Err(TrackerError::BugNotFound { .. })
        ));

        assert_eq!(store.count_bugs().unwrap(), 1);
        assert_eq!(store.count_comments().unwrap(), 0);
        assert_eq!(store.get_bug(bug.id).unwrap(), bug);
    }

    pub fn delete_cascades_to_comments(store: &dyn BugStore) {
        let doomed = seed(store, "doomed", BugStatus::Unresolved);
        let kept = seed(store, "kept", BugStatus::Unresolved);
        store
            .create_comment(doomed.id, NewComment::new("c1", "b1"))
            .unwrap();
        store
            .create_comment(doomed.id, NewComment::new("c2", "b2"))
            .unwrap();
        let survivor = store
            .create_comment(kept.id, NewComment::new("c3", "b3"))
            .unwrap();
        assert_eq!(store.count_comments().unwrap(), 3);

        store.delete_bug(doomed.id).unwrap();

        assert_eq!(store.count_bugs().unwrap(), 1);
        assert_eq!(store.count_comments().unwrap(), 1);
        assert_eq!(store.get_comment(kept.id, survivor.id).unwrap(), survivor);
        assert!(store.get_bug(doomed.id).unwrap_err().is_not_found());
    }

    pub fn comments_are_scoped_to_their_bug(store: &dyn BugStore) {
        let bug = seed(store, "owner", BugStatus::Unresolved);
        let other = seed(store, "other", BugStatus::Unresolved);
        let comment = store
            .create_comment(bug.id, NewComment::new("Test comment", "Test body"))
            .unwrap();

        assert_eq!(comment.bug, bug.id);
        assert_eq!(store.get_comment(bug.id, comment.id).unwrap(), comment);

        assert!(matches!(
            store.get_comment(other.id, comment.id),
            Err(TrackerError::CommentNotFound { .. })
        ));
        assert!(matches!(
            store.delete_comment(other.id, comment.id),
            Err(TrackerError::CommentNotFound { .. })
        ));
        assert_eq!(store.count_comments().unwrap(), 1);

        store.delete_comment(bug.id, comment.id).unwrap();
        assert_eq!(store.count_comments().unwrap(), 0);
        assert!(matches!(
            store.delete_comment(bug.id, comment.id),
            Err(TrackerError::CommentNotFound { .. })
        ));
    }

    /// Runs every check above, each against a fresh store.
    pub fn run_all(make: impl Fn() -> Box<dyn BugStore>) {
        create_and_get_round_trip(make().as_ref());
        ids_are_unique_and_increasing(make().as_ref());
        list_filters_in_insertion_order(make().as_ref());
        partial_update(make().as_ref());
        missing_bug_is_not_found(make().as_ref());
        delete_cascades_to_comments(make().as_ref());
        comments_are_scoped_to_their_bug(make().as_ref());
    }
}
