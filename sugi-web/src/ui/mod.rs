mod app;
pub use app::{App, Page};

mod board;
pub use board::Board;

mod card;
pub use card::EssayCard;

mod detail;
pub use detail::Detail;

mod display;
pub use display::Display;

mod home;
pub use home::Home;

mod write;
pub use write::Write;
