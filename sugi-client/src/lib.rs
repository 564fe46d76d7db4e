mod admin;
pub use admin::AdminMode;

mod display;
pub use display::{
    grid_columns, page_duration, question_duration, should_split, split_pages,
    whole_essay_duration, Direction, DisplayEngine, DisplayEssay, DisplayQuestion, Transition,
    TransitionStyle, Unit, Viewport, FADE_OUT, FADE_SETTLE, SLIDE_SETTLE,
};

mod reconcile;
pub use reconcile::{delete_all, BoardState, PendingDeletions, KEY_PENDING_DELETIONS};

mod storage;
pub use storage::{KvStore, MemoryStore};

pub mod api {
    pub use sugi_api::*;
}
