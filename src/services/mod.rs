pub mod answer_evaluator;
pub mod game_service;
pub mod play_service;
pub mod play_session;
pub mod player_service;
pub mod quiz_service;
pub mod scoring;

pub use answer_evaluator::AnswerEvaluator;
pub use game_service::GameService;
pub use play_service::PlayService;
pub use play_session::{PlaySession, PlayState, QuizResult};
pub use player_service::PlayerService;
pub use quiz_service::QuizService;
