use std::sync::Arc;

use crate::{
    config::Config,
    db::Database,
    errors::AppResult,
    repositories::{
        LocalMediaStore, MediaStore, MongoPlayerRepository, MongoQuizRepository, PlayerRepository,
        QuizRepository,
    },
    services::{GameService, PlayService, PlayerService, QuizService},
};

#[derive(Clone)]
pub struct AppState {
    pub quiz_service: Arc<QuizService>,
    pub play_service: Arc<PlayService>,
    pub game_service: Arc<GameService>,
    pub player_service: Arc<PlayerService>,
    pub media_store: Arc<dyn MediaStore>,
    /// Absent when the state is built over non-Mongo repositories.
    pub db: Option<Database>,
    pub config: Arc<Config>,
}

impl AppState {
    pub async fn new(config: Config) -> AppResult<Self> {
        let db = Database::connect(&config).await?;

        let quiz_repository = Arc::new(MongoQuizRepository::new(&db, &config));
        quiz_repository.ensure_indexes().await?;

        let player_repository = Arc::new(MongoPlayerRepository::new(&db, &config));
        player_repository.ensure_indexes().await?;

        let media_store = Arc::new(LocalMediaStore::from_config(&config)?);

        let mut state = Self::with_repositories(config, quiz_repository, player_repository, media_store);
        state.db = Some(db);
        Ok(state)
    }

    pub fn with_repositories(
        config: Config,
        quiz_repository: Arc<dyn QuizRepository>,
        player_repository: Arc<dyn PlayerRepository>,
        media_store: Arc<dyn MediaStore>,
    ) -> Self {
        let quiz_service = Arc::new(QuizService::new(quiz_repository));
        let player_service = Arc::new(PlayerService::new(player_repository));
        let play_service = Arc::new(PlayService::new(
            quiz_service.clone(),
            player_service.clone(),
            config.shuffle_questions,
        ));
        let game_service = Arc::new(GameService::new(quiz_service.clone(), player_service.clone()));

        Self {
            quiz_service,
            play_service,
            game_service,
            player_service,
            media_store,
            db: None,
            config: Arc::new(config),
        }
    }
}
