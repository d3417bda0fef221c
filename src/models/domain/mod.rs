pub mod game_mode;
pub mod game_session;
pub mod player;
pub mod question;
pub mod quiz;
pub use game_mode::GameMode;
pub use game_session::{GameSession, PlayerProgress};
pub use player::Player;
pub use question::{MediaKind, Question, QuestionType};
pub use quiz::Quiz;
