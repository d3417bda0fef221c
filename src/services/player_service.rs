use std::{collections::HashMap, sync::Arc};

use serde_json::Value;
use validator::Validate;

use crate::{
    errors::{AppError, AppResult},
    models::{domain::Player, dto::request::CreatePlayerRequest},
    repositories::PlayerRepository,
};

/// Profile changes produced by one finished play or game.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlayRecord<'a> {
    pub player_id: &'a str,
    pub quiz_id: &'a str,
    pub category: Option<&'a str>,
    pub points: i32,
    pub won: bool,
}

pub struct PlayerService {
    repository: Arc<dyn PlayerRepository>,
}

impl PlayerService {
    pub fn new(repository: Arc<dyn PlayerRepository>) -> Self {
        Self { repository }
    }

    pub async fn get_player(&self, id: &str) -> AppResult<Player> {
        self.repository
            .find_player(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Player with id '{}' not found", id)))
    }

    pub async fn create_player(&self, request: CreatePlayerRequest) -> AppResult<Player> {
        request.validate()?;

        if self.repository.find_player(&request.id).await?.is_some() {
            return Err(AppError::AlreadyExists(format!(
                "Player with id '{}' already exists",
                request.id
            )));
        }

        let mut player = Player::new(&request.id, &request.username, &request.email);
        player.photo_url = request.photo_url;
        let player = self.repository.save_player(player).await?;
        log::info!("Created player profile {}", player.id);
        Ok(player)
    }

    pub async fn record_login(&self, id: &str) -> AppResult<Player> {
        let mut player = self.get_player(id).await?;
        player.record_login();
        self.repository.save_player(player).await
    }

    pub async fn add_favorite(&self, id: &str, quiz_id: &str) -> AppResult<Player> {
        let mut player = self.get_player(id).await?;
        player.add_favorite_quiz(quiz_id);
        self.repository.save_player(player).await
    }

    pub async fn remove_favorite(&self, id: &str, quiz_id: &str) -> AppResult<Player> {
        let mut player = self.get_player(id).await?;
        player.remove_favorite_quiz(quiz_id);
        self.repository.save_player(player).await
    }

    /// Merges `settings` into the stored ones; keys not given keep their value.
    pub async fn update_settings(&self, id: &str, settings: HashMap<String, Value>) -> AppResult<Player> {
        let mut player = self.get_player(id).await?;
        for (key, value) in settings {
            player.update_setting(&key, value);
        }
        self.repository.save_player(player).await
    }

    /// Applies a finished play to the player's profile. Anonymous plays have
    /// no profile; an unknown id is skipped and reported as `false`.
    pub async fn record_play(&self, record: PlayRecord<'_>) -> AppResult<bool> {
        let Some(mut player) = self.repository.find_player(record.player_id).await? else {
            log::debug!("No profile for player {}, skipping result", record.player_id);
            return Ok(false);
        };

        player.add_quiz_played();
        player.add_points(i64::from(record.points.max(0)), record.category);
        player.add_completed_quiz(record.quiz_id);
        if record.won {
            player.add_win();
        }
        self.repository.save_player(player).await?;
        Ok(true)
    }
}
