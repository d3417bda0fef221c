use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{AppError, AppResult};
use crate::models::domain::game_mode::GameMode;

/// Per-player state inside one game session.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerProgress {
    pub score: i32,
    pub response_times: Vec<u64>, // ms, one per answered question
    pub lives: u32,
    pub answers: Vec<bool>, // correctness, one per answered question
}

/// Multiplayer session for a fixed roster. `Active -> Ended`, never reactivated;
/// mutations after `end_session` are ignored.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSession {
    id: String,
    quiz_id: String,
    game_mode: GameMode,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    start_time: DateTime<Utc>,
    #[serde(default, with = "chrono::serde::ts_milliseconds_option")]
    end_time: Option<DateTime<Utc>>,
    active: bool,
    winner_id: Option<String>,
    player_ids: Vec<String>,
    progress: HashMap<String, PlayerProgress>,
    current_question_index: usize,
    #[serde(default)]
    game_rules: HashMap<String, serde_json::Value>,
}

impl GameSession {
    /// Starts a session for `player_ids`. Duplicate ids collapse onto their first
    /// roster position.
    pub fn create(quiz_id: &str, player_ids: &[String], game_mode: GameMode) -> AppResult<Self> {
        let mut roster: Vec<String> = Vec::with_capacity(player_ids.len());
        for id in player_ids {
            if !roster.contains(id) {
                roster.push(id.clone());
            }
        }
        if roster.is_empty() {
            return Err(AppError::ValidationError(
                "A game session needs at least one player".to_string(),
            ));
        }

        let progress = roster
            .iter()
            .map(|id| {
                (
                    id.clone(),
                    PlayerProgress {
                        lives: game_mode.starting_lives(),
                        ..PlayerProgress::default()
                    },
                )
            })
            .collect();

        Ok(GameSession {
            id: Uuid::new_v4().to_string(),
            quiz_id: quiz_id.to_string(),
            game_mode,
            start_time: Utc::now(),
            end_time: None,
            active: true,
            winner_id: None,
            player_ids: roster,
            progress,
            current_question_index: 0,
            game_rules: HashMap::new(),
        })
    }

    pub fn record_answer(&mut self, player_id: &str, is_correct: bool) {
        let survival = self.game_mode.uses_lives();
        if let Some(player) = self.active_player_mut(player_id) {
            player.answers.push(is_correct);
            if survival && !is_correct {
                player.lives = player.lives.saturating_sub(1);
            }
        }
    }

    pub fn record_response_time(&mut self, player_id: &str, response_time_ms: u64) {
        if let Some(player) = self.active_player_mut(player_id) {
            player.response_times.push(response_time_ms);
        }
    }

    pub fn update_player_score(&mut self, player_id: &str, delta: i32) {
        if let Some(player) = self.active_player_mut(player_id) {
            player.score = player.score.saturating_add(delta);
        }
    }

    pub fn is_player_eliminated(&self, player_id: &str) -> bool {
        if !self.game_mode.uses_lives() {
            return false;
        }
        self.progress
            .get(player_id)
            .map(|p| p.lives == 0)
            .unwrap_or(true)
    }

    /// Advances the shared index; turn synchronization is the caller's job.
    pub fn next_question(&mut self) {
        if self.active {
            self.current_question_index += 1;
        }
    }

    /// Ends the session and picks the winner: the first player in roster order
    /// holding the highest score. Calling it again returns the stored winner.
    pub fn end_session(&mut self) -> Option<String> {
        if !self.active {
            return self.winner_id.clone();
        }
        self.end_time = Some(Utc::now());
        self.active = false;

        let mut winner: Option<(&String, i32)> = None;
        for id in &self.player_ids {
            let score = self.progress.get(id).map(|p| p.score).unwrap_or_default();
            match winner {
                Some((_, best)) if score <= best => {}
                _ => winner = Some((id, score)),
            }
        }
        self.winner_id = winner.map(|(id, _)| id.clone());
        self.winner_id.clone()
    }

    /// Elapsed time; live while the session is active.
    pub fn game_duration(&self) -> Duration {
        self.end_time.unwrap_or_else(Utc::now) - self.start_time
    }

    pub fn average_response_time(&self, player_id: &str) -> f64 {
        match self.progress.get(player_id) {
            Some(p) if !p.response_times.is_empty() => {
                p.response_times.iter().sum::<u64>() as f64 / p.response_times.len() as f64
            }
            _ => 0.0,
        }
    }

    pub fn correct_answer_rate(&self, player_id: &str) -> f64 {
        match self.progress.get(player_id) {
            Some(p) if !p.answers.is_empty() => {
                p.answers.iter().filter(|&&correct| correct).count() as f64 / p.answers.len() as f64
            }
            _ => 0.0,
        }
    }

    pub fn add_game_rule(&mut self, key: &str, value: serde_json::Value) {
        self.game_rules.insert(key.to_string(), value);
    }

    fn active_player_mut(&mut self, player_id: &str) -> Option<&mut PlayerProgress> {
        if !self.active {
            return None;
        }
        self.progress.get_mut(player_id)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn quiz_id(&self) -> &str {
        &self.quiz_id
    }

    pub fn game_mode(&self) -> GameMode {
        self.game_mode
    }

    pub fn start_time(&self) -> DateTime<Utc> {
        self.start_time
    }

    pub fn end_time(&self) -> Option<DateTime<Utc>> {
        self.end_time
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn winner_id(&self) -> Option<&str> {
        self.winner_id.as_deref()
    }

    pub fn current_question_index(&self) -> usize {
        self.current_question_index
    }

    pub fn player_ids(&self) -> &[String] {
        &self.player_ids
    }

    pub fn has_player(&self, player_id: &str) -> bool {
        self.progress.contains_key(player_id)
    }

    pub fn score(&self, player_id: &str) -> Option<i32> {
        self.progress.get(player_id).map(|p| p.score)
    }

    pub fn lives(&self, player_id: &str) -> Option<u32> {
        self.progress.get(player_id).map(|p| p.lives)
    }

    /// Copy of one player's progress.
    pub fn player_progress(&self, player_id: &str) -> Option<PlayerProgress> {
        self.progress.get(player_id).cloned()
    }

    pub fn player_scores(&self) -> HashMap<String, i32> {
        self.progress
            .iter()
            .map(|(id, p)| (id.clone(), p.score))
            .collect()
    }

    pub fn player_lives(&self) -> HashMap<String, u32> {
        self.progress
            .iter()
            .map(|(id, p)| (id.clone(), p.lives))
            .collect()
    }

    pub fn game_rules(&self) -> HashMap<String, serde_json::Value> {
        self.game_rules.clone()
    }

    /// Roster ordered by score, highest first; ties keep roster order.
    pub fn standings(&self) -> Vec<(String, i32)> {
        let mut standings: Vec<(String, i32)> = self
            .player_ids
            .iter()
            .map(|id| (id.clone(), self.score(id).unwrap_or_default()))
            .collect();
        standings.sort_by(|a, b| b.1.cmp(&a.1));
        standings
    }
}
