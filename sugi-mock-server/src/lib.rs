use std::{
    cell::RefCell,
    collections::{HashMap, HashSet},
};

use async_trait::async_trait;
use chrono::Utc;
use sugi_api::{
    Backend, Comment, CommentId, Error, Essay, EssayForm, EssayId, NewComment, Uuid,
};

/// In-memory stand-in for the persistence backend, with the same contract:
/// newest-first listing with comment counts, idempotent deletes, counters
/// that never go below zero.
///
/// Interior mutability so it can sit behind the shared-reference `Backend`
/// trait the way the real HTTP client does.
pub struct MockServer {
    essays: RefCell<Vec<Essay>>,
    comments: RefCell<HashMap<EssayId, Vec<Comment>>>,
    fail_deletes: RefCell<HashSet<EssayId>>,
}

impl MockServer {
    pub fn new() -> MockServer {
        MockServer {
            essays: RefCell::new(Vec::new()),
            comments: RefCell::new(HashMap::new()),
            fail_deletes: RefCell::new(HashSet::new()),
        }
    }

    /// Makes every delete of `id` fail with a transient error until
    /// `test_heal_deletes` is called
    pub fn test_fail_deletes_of(&self, id: EssayId) {
        self.fail_deletes.borrow_mut().insert(id);
    }

    pub fn test_heal_deletes(&self) {
        self.fail_deletes.borrow_mut().clear();
    }

    pub fn test_num_essays(&self) -> usize {
        self.essays.borrow().len()
    }

    fn annotated(&self, mut essay: Essay) -> Essay {
        essay.comments_count = self
            .comments
            .borrow()
            .get(&essay.id)
            .map(|c| c.len() as i64)
            .unwrap_or(0);
        essay
    }

    fn with_essay_mut<T>(
        &self,
        id: EssayId,
        f: impl FnOnce(&mut Essay) -> T,
    ) -> Result<T, Error> {
        let mut essays = self.essays.borrow_mut();
        let essay = essays
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or(Error::EssayNotFound(id.0))?;
        Ok(f(essay))
    }
}

impl Default for MockServer {
    fn default() -> MockServer {
        MockServer::new()
    }
}

#[async_trait(?Send)]
impl Backend for MockServer {
    async fn list_essays(&self, limit: Option<usize>) -> Result<Vec<Essay>, Error> {
        let mut essays = self.essays.borrow().clone();
        // newest first; creation order breaks timestamp ties
        essays.reverse();
        essays.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        if let Some(limit) = limit {
            essays.truncate(limit);
        }
        Ok(essays.into_iter().map(|e| self.annotated(e)).collect())
    }

    async fn get_essay(&self, id: EssayId) -> Result<Option<Essay>, Error> {
        Ok(self
            .essays
            .borrow()
            .iter()
            .find(|e| e.id == id)
            .cloned()
            .map(|e| self.annotated(e)))
    }

    async fn create_essay(&self, form: EssayForm) -> Result<Essay, Error> {
        form.validate()?;
        let form = form.normalized();
        let essay = Essay {
            id: EssayId(Uuid::new_v4()),
            nickname: form.nickname,
            answers: form.answers,
            created_at: Utc::now(),
            likes_count: 0,
            comments_count: 0,
        };
        self.essays.borrow_mut().push(essay.clone());
        Ok(essay)
    }

    async fn delete_essay(&self, id: EssayId) -> Result<(), Error> {
        if self.fail_deletes.borrow().contains(&id) {
            return Err(Error::Unknown(String::from("injected delete failure")));
        }
        // deleting an absent id is fine
        self.essays.borrow_mut().retain(|e| e.id != id);
        self.comments.borrow_mut().remove(&id);
        Ok(())
    }

    async fn like_essay(&self, id: EssayId) -> Result<i64, Error> {
        self.with_essay_mut(id, |e| {
            e.likes_count += 1;
            e.likes_count
        })
    }

    async fn unlike_essay(&self, id: EssayId) -> Result<i64, Error> {
        self.with_essay_mut(id, |e| {
            e.likes_count = (e.likes_count - 1).max(0);
            e.likes_count
        })
    }

    async fn list_comments(&self, essay: EssayId) -> Result<Vec<Comment>, Error> {
        let mut comments = self
            .comments
            .borrow()
            .get(&essay)
            .cloned()
            .unwrap_or_default();
        comments.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(comments)
    }

    async fn create_comment(&self, essay: EssayId, c: NewComment) -> Result<Comment, Error> {
        c.validate()?;
        if !self.essays.borrow().iter().any(|e| e.id == essay) {
            return Err(Error::EssayNotFound(essay.0));
        }
        let comment = Comment {
            id: CommentId(Uuid::new_v4()),
            essay_id: essay,
            nickname: c.nickname,
            content: c.content,
            created_at: Utc::now(),
        };
        self.comments
            .borrow_mut()
            .entry(essay)
            .or_insert_with(Vec::new)
            .push(comment.clone());
        Ok(comment)
    }
}
