use std::collections::HashSet;

use sugi_api::{Backend, Error, Essay, EssayId};

use crate::KvStore;

pub const KEY_PENDING_DELETIONS: &str = "pending-deletions";

/// Essay ids believed deleted, persisted across reloads.
///
/// This set only bridges the gap between an optimistic local removal and
/// the authoritative list confirming it; `BoardState::reconcile` garbage
/// collects it. Any id still present in fresh authoritative data is, by
/// definition, not deleted and gets dropped from the set.
#[derive(Debug)]
pub struct PendingDeletions<S> {
    store: S,
    ids: HashSet<EssayId>,
}

impl<S: KvStore> PendingDeletions<S> {
    pub fn load(store: S) -> PendingDeletions<S> {
        let ids = store
            .get(KEY_PENDING_DELETIONS)
            .and_then(|raw| match serde_json::from_str(&raw) {
                Ok(ids) => Some(ids),
                Err(err) => {
                    tracing::warn!(?err, "discarding unparseable pending-deletion set");
                    None
                }
            })
            .unwrap_or_default();
        PendingDeletions { store, ids }
    }

    pub fn contains(&self, id: &EssayId) -> bool {
        self.ids.contains(id)
    }

    pub fn ids(&self) -> &HashSet<EssayId> {
        &self.ids
    }

    pub fn insert(&mut self, id: EssayId) {
        if self.ids.insert(id) {
            self.persist();
        }
    }

    /// Keeps only the ids for which `f` returns true
    pub fn retain(&mut self, f: impl FnMut(&EssayId) -> bool) {
        let before = self.ids.len();
        self.ids.retain(f);
        if self.ids.len() != before {
            self.persist();
        }
    }

    fn persist(&mut self) {
        let raw = serde_json::to_string(&self.ids.iter().collect::<Vec<_>>())
            .expect("serializing pending-deletion set");
        self.store.set(KEY_PENDING_DELETIONS, &raw);
    }
}

/// Issues independent deletes for all ids and waits for all to settle.
///
/// Returns the ids whose delete call succeeded, plus the first error if
/// any call failed. Partial outcomes are expected; the next `reconcile`
/// against a fresh authoritative list sorts out what actually happened
/// server-side.
pub async fn delete_all<B: Backend + ?Sized>(
    backend: &B,
    ids: &[EssayId],
) -> (Vec<EssayId>, Option<Error>) {
    let results =
        futures::future::join_all(ids.iter().map(|id| backend.delete_essay(*id))).await;
    let mut deleted = Vec::new();
    let mut first_error = None;
    for (id, res) in ids.iter().zip(results) {
        match res {
            Ok(()) => deleted.push(*id),
            Err(err) => {
                tracing::warn!(?err, id = ?id.0, "delete failed");
                if first_error.is_none() {
                    first_error = Some(err);
                }
            }
        }
    }
    (deleted, first_error)
}

/// The visible essay list of one view, kept consistent with optimistic
/// deletions and the authoritative server list.
#[derive(Debug)]
pub struct BoardState<S> {
    essays: Vec<Essay>,
    pending: PendingDeletions<S>,
}

impl<S: KvStore> BoardState<S> {
    pub fn load(store: S) -> BoardState<S> {
        BoardState {
            essays: Vec::new(),
            pending: PendingDeletions::load(store),
        }
    }

    pub fn essays(&self) -> &[Essay] {
        &self.essays
    }

    pub fn pending(&self) -> &PendingDeletions<S> {
        &self.pending
    }

    /// Optimistic local removal, applied once the backend confirmed the
    /// delete call. Persists the id so a reload cannot resurrect the essay
    /// before the authoritative list catches up.
    pub fn mark_deleted(&mut self, id: EssayId) {
        self.essays.retain(|e| e.id != id);
        self.pending.insert(id);
    }

    /// Folds a freshly fetched authoritative list into local state.
    ///
    /// The authoritative list wins both ways: ids in the pending set are
    /// hidden from view (covers the window where our fetch raced ahead of
    /// delete propagation), and pending ids that the list still contains
    /// are dropped from the set so stale local state can never mask valid
    /// data forever. Idempotent.
    pub fn reconcile(&mut self, authoritative: Vec<Essay>) {
        let listed: HashSet<EssayId> = authoritative.iter().map(|e| e.id).collect();
        // an id still present in fresh authoritative data is not deleted;
        // drop it first so stale local state cannot mask valid data forever
        self.pending.retain(|id| !listed.contains(id));
        // defensive: hide anything still pending, in case a fetch raced
        // ahead of delete propagation
        self.essays = authoritative
            .into_iter()
            .filter(|e| !self.pending.contains(&e.id))
            .collect();
    }

    /// Deletes one essay through the backend, then removes it locally.
    /// On failure, surfaces the error and leaves state unchanged.
    pub async fn request_delete<B: Backend + ?Sized>(
        &mut self,
        backend: &B,
        id: EssayId,
    ) -> Result<(), Error> {
        backend.delete_essay(id).await?;
        self.mark_deleted(id);
        Ok(())
    }

    /// Bulk variant of `request_delete`: all deletions are issued
    /// concurrently and are independent of each other. Successes are
    /// removed locally even when some calls fail; the error reported is
    /// the first failure.
    pub async fn request_bulk_delete<B: Backend + ?Sized>(
        &mut self,
        backend: &B,
        ids: &[EssayId],
    ) -> Result<(), Error> {
        let (deleted, first_error) = delete_all(backend, ids).await;
        for id in deleted {
            self.mark_deleted(id);
        }
        match first_error {
            None => Ok(()),
            Some(err) => Err(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryStore;
    use std::cell::RefCell;
    use sugi_api::{Comment, EssayForm, NewComment, Time, ANSWER_COUNT};

    fn essay(id: EssayId) -> Essay {
        Essay {
            id,
            nickname: None,
            answers: [""; ANSWER_COUNT].map(String::from),
            created_at: Time::default(),
            likes_count: 0,
            comments_count: 0,
        }
    }

    fn id(n: u128) -> EssayId {
        EssayId(uuid::Uuid::from_u128(n))
    }

    /// Backend that deletes from an in-memory list, failing for chosen ids
    struct FakeBackend {
        essays: RefCell<Vec<Essay>>,
        fail: HashSet<EssayId>,
    }

    impl FakeBackend {
        fn new(ids: &[EssayId]) -> FakeBackend {
            FakeBackend {
                essays: RefCell::new(ids.iter().map(|i| essay(*i)).collect()),
                fail: HashSet::new(),
            }
        }

        fn current_list(&self) -> Vec<Essay> {
            self.essays.borrow().clone()
        }
    }

    #[async_trait::async_trait(?Send)]
    impl Backend for FakeBackend {
        async fn list_essays(&self, _limit: Option<usize>) -> Result<Vec<Essay>, Error> {
            Ok(self.current_list())
        }

        async fn get_essay(&self, id: EssayId) -> Result<Option<Essay>, Error> {
            Ok(self.essays.borrow().iter().find(|e| e.id == id).cloned())
        }

        async fn create_essay(&self, _form: EssayForm) -> Result<Essay, Error> {
            unimplemented!("not needed by reconciler tests")
        }

        async fn delete_essay(&self, id: EssayId) -> Result<(), Error> {
            if self.fail.contains(&id) {
                return Err(Error::Unknown(String::from("injected failure")));
            }
            self.essays.borrow_mut().retain(|e| e.id != id);
            Ok(())
        }

        async fn like_essay(&self, _id: EssayId) -> Result<i64, Error> {
            unimplemented!("not needed by reconciler tests")
        }

        async fn unlike_essay(&self, _id: EssayId) -> Result<i64, Error> {
            unimplemented!("not needed by reconciler tests")
        }

        async fn list_comments(&self, _essay: EssayId) -> Result<Vec<Comment>, Error> {
            unimplemented!("not needed by reconciler tests")
        }

        async fn create_comment(
            &self,
            _essay: EssayId,
            _c: NewComment,
        ) -> Result<Comment, Error> {
            unimplemented!("not needed by reconciler tests")
        }
    }

    fn block_on<T>(f: impl std::future::Future<Output = T>) -> T {
        futures::executor::block_on(f)
    }

    #[test]
    fn delete_removes_locally_and_persists() {
        let backend = FakeBackend::new(&[id(1), id(2)]);
        let mut state = BoardState::load(MemoryStore::new());
        state.reconcile(backend.current_list());
        assert_eq!(state.essays().len(), 2);

        block_on(state.request_delete(&backend, id(1))).unwrap();
        assert_eq!(state.essays().len(), 1);
        assert!(state.pending().contains(&id(1)));
    }

    #[test]
    fn failed_delete_changes_nothing() {
        let mut backend = FakeBackend::new(&[id(1)]);
        backend.fail.insert(id(1));
        let mut state = BoardState::load(MemoryStore::new());
        state.reconcile(backend.current_list());

        let res = block_on(state.request_delete(&backend, id(1)));
        assert!(res.is_err());
        assert_eq!(state.essays().len(), 1);
        assert!(!state.pending().contains(&id(1)));
    }

    #[test]
    fn pending_set_survives_a_reload() {
        let mut store = MemoryStore::new();
        {
            let backend = FakeBackend::new(&[id(1), id(2)]);
            let mut state = BoardState::load(store.clone());
            state.reconcile(backend.current_list());
            block_on(state.request_delete(&backend, id(2))).unwrap();
            // MemoryStore is by-value; carry the written state over
            store = state.pending.store.clone();
        }
        let state = BoardState::load(store);
        assert!(state.pending().contains(&id(2)));
        assert!(!state.pending().contains(&id(1)));
    }

    #[test]
    fn reconcile_hides_pending_and_prunes_confirmed() {
        // pending = {A, B}; authoritative list contains B but not A
        let a = id(1);
        let b = id(2);
        let mut state = BoardState::load(MemoryStore::new());
        state.mark_deleted(a);
        state.mark_deleted(b);

        state.reconcile(vec![essay(b), essay(id(3))]);
        // B reappeared in authoritative data: visible again, pruned from
        // the pending set. A stays pending (its deletion went through).
        let visible: Vec<_> = state.essays().iter().map(|e| e.id).collect();
        assert_eq!(visible, vec![b, id(3)]);
        assert!(state.pending().contains(&a));
        assert!(!state.pending().contains(&b));
    }

    #[test]
    fn reconcile_is_idempotent() {
        let mut state = BoardState::load(MemoryStore::new());
        state.mark_deleted(id(1));
        state.mark_deleted(id(2));

        let list = vec![essay(id(2)), essay(id(3))];
        state.reconcile(list.clone());
        let essays_once: Vec<_> = state.essays().to_vec();
        let pending_once = state.pending().ids().clone();

        state.reconcile(list);
        assert_eq!(state.essays(), &essays_once[..]);
        assert_eq!(state.pending().ids(), &pending_once);
    }

    #[test]
    fn bulk_delete_with_partial_failure() {
        let mut backend = FakeBackend::new(&[id(1), id(2), id(3)]);
        backend.fail.insert(id(2));
        let mut state = BoardState::load(MemoryStore::new());
        state.reconcile(backend.current_list());

        let res = block_on(state.request_bulk_delete(&backend, &[id(1), id(2), id(3)]));
        assert!(res.is_err());
        // the two confirmed deletions applied optimistically
        let visible: Vec<_> = state.essays().iter().map(|e| e.id).collect();
        assert_eq!(visible, vec![id(2)]);

        // fresh authoritative fetch: only the failed id remains server-side
        state.reconcile(backend.current_list());
        let visible: Vec<_> = state.essays().iter().map(|e| e.id).collect();
        assert_eq!(visible, vec![id(2)]);
        // the failed id never entered the pending set; the confirmed ones
        // stay there as a race-guard since the list no longer mentions them
        assert!(!state.pending().contains(&id(2)));
        assert!(state.pending().contains(&id(1)));
        assert!(state.pending().contains(&id(3)));
    }

    #[test]
    fn bulk_delete_full_success() {
        let backend = FakeBackend::new(&[id(1), id(2)]);
        let mut state = BoardState::load(MemoryStore::new());
        state.reconcile(backend.current_list());

        block_on(state.request_bulk_delete(&backend, &[id(1), id(2)])).unwrap();
        assert!(state.essays().is_empty());
        assert!(state.pending().contains(&id(1)));
        assert!(state.pending().contains(&id(2)));
    }

    #[test]
    fn corrupt_persisted_set_is_discarded() {
        let mut store = MemoryStore::new();
        store.set(KEY_PENDING_DELETIONS, "not json at all");
        let state = BoardState::load(store);
        assert!(state.pending().ids().is_empty());
    }
}
