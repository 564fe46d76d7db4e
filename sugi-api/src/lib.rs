use async_trait::async_trait;
use chrono::Utc;

pub use uuid::{uuid, Uuid};
pub type Time = chrono::DateTime<Utc>;

mod error;
mod question;

pub use error::Error;
pub use question::{AnsweredQuestion, Question, ANSWER_COUNT, QUESTIONS};

pub const STUB_UUID: Uuid = uuid!("ffffffff-ffff-ffff-ffff-ffffffffffff");

/// Longest accepted answer, in characters
pub const MAX_ANSWER_LEN: usize = 10_000;

#[derive(
    Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, serde::Deserialize, serde::Serialize,
)]
pub struct EssayId(pub Uuid);

impl EssayId {
    pub fn stub() -> EssayId {
        EssayId(STUB_UUID)
    }
}

#[derive(
    Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, serde::Deserialize, serde::Serialize,
)]
pub struct CommentId(pub Uuid);

impl CommentId {
    pub fn stub() -> CommentId {
        CommentId(STUB_UUID)
    }
}

/// One submitted essay: answers to the fixed question list, plus counters.
///
/// Essays are immutable once created apart from `likes_count`, which moves
/// with like/unlike, and `comments_count`, which is a computed annotation
/// filled in by `Backend::list_essays`.
#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct Essay {
    pub id: EssayId,
    pub nickname: Option<String>,
    /// Pairs positionally with `QUESTIONS`; an empty string means unanswered
    pub answers: [String; ANSWER_COUNT],
    pub created_at: Time,
    pub likes_count: i64,
    #[serde(default)]
    pub comments_count: i64,
}

impl Essay {
    /// Total length, in characters, of all answered questions
    pub fn content_len(&self) -> usize {
        self.answered_questions()
            .iter()
            .map(|q| q.answer.chars().count())
            .sum()
    }
}

#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct Comment {
    pub id: CommentId,
    pub essay_id: EssayId,
    pub nickname: Option<String>,
    pub content: String,
    pub created_at: Time,
}

/// Form payload for essay submission
#[derive(Clone, Debug, Default, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct EssayForm {
    pub nickname: Option<String>,
    pub answers: [String; ANSWER_COUNT],
}

impl EssayForm {
    pub fn validate(&self) -> Result<(), Error> {
        for s in self.nickname.iter().chain(self.answers.iter()) {
            if s.contains('\0') {
                return Err(Error::NullByteInString(s.clone()));
            }
        }
        for a in &self.answers {
            let len = a.chars().count();
            if len > MAX_ANSWER_LEN {
                return Err(Error::AnswerTooLong(len));
            }
        }
        if self.answers.iter().all(|a| a.trim().is_empty()) {
            return Err(Error::EmptyContent);
        }
        Ok(())
    }

    /// Normalizes the form before storage: empty nickname becomes anonymous
    pub fn normalized(mut self) -> EssayForm {
        if self.nickname.as_deref().map_or(false, |n| n.trim().is_empty()) {
            self.nickname = None;
        }
        self
    }
}

#[derive(Clone, Debug, Default, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct NewComment {
    pub nickname: Option<String>,
    pub content: String,
}

impl NewComment {
    pub fn validate(&self) -> Result<(), Error> {
        for s in self.nickname.iter().chain(std::iter::once(&self.content)) {
            if s.contains('\0') {
                return Err(Error::NullByteInString(s.clone()));
            }
        }
        if self.content.trim().is_empty() {
            return Err(Error::EmptyContent);
        }
        Ok(())
    }
}

/// The persistence collaborator both subsystems depend on.
///
/// `?Send` because the web frontend drives it from a single-threaded wasm
/// event loop where reqwest futures are not `Send`.
#[async_trait(?Send)]
pub trait Backend {
    /// Essays ordered newest-first, each annotated with its comment count
    async fn list_essays(&self, limit: Option<usize>) -> Result<Vec<Essay>, Error>;

    async fn get_essay(&self, id: EssayId) -> Result<Option<Essay>, Error>;

    async fn create_essay(&self, form: EssayForm) -> Result<Essay, Error>;

    /// Idempotent: deleting an already-absent id is not an error
    async fn delete_essay(&self, id: EssayId) -> Result<(), Error>;

    /// Returns the new like count
    async fn like_essay(&self, id: EssayId) -> Result<i64, Error>;

    /// Returns the new like count; never goes below zero
    async fn unlike_essay(&self, id: EssayId) -> Result<i64, Error>;

    /// Comments ordered oldest-first
    async fn list_comments(&self, essay: EssayId) -> Result<Vec<Comment>, Error>;

    async fn create_comment(&self, essay: EssayId, c: NewComment) -> Result<Comment, Error>;
}
