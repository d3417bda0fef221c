pub mod media_store;
pub mod player_repository;
pub mod quiz_repository;

pub use media_store::{LocalMediaStore, MediaPayload, MediaStore};
pub use player_repository::{MongoPlayerRepository, PlayerRepository};
pub use quiz_repository::{MongoQuizRepository, QuizRepository};
