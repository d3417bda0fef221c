use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const POINTS_PER_LEVEL: i64 = 1000;

/// Persistent player profile, updated after each completed session.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub id: String,
    pub username: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
    #[serde(default, with = "chrono::serde::ts_milliseconds_option")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, with = "chrono::serde::ts_milliseconds_option")]
    pub last_login_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub total_quizzes_played: i64,
    #[serde(default)]
    pub total_quizzes_won: i64,
    #[serde(default)]
    pub total_points: i64,
    #[serde(default = "first_level")]
    pub level: i64,
    #[serde(default)]
    pub badges: Vec<String>,
    #[serde(default)]
    pub category_scores: HashMap<String, i64>,
    #[serde(default)]
    pub favorite_quizzes: Vec<String>,
    #[serde(default)]
    pub completed_quizzes: Vec<String>,
    #[serde(default = "default_settings")]
    pub settings: HashMap<String, Value>,
}

fn first_level() -> i64 {
    1
}

fn default_settings() -> HashMap<String, Value> {
    HashMap::from([
        ("notifications".to_string(), Value::Bool(true)),
        ("sound".to_string(), Value::Bool(true)),
        ("vibration".to_string(), Value::Bool(true)),
        ("darkMode".to_string(), Value::Bool(false)),
    ])
}

/// Level reached with `total_points`: one level every thousand points.
pub fn level_for(total_points: i64) -> i64 {
    total_points.max(0) / POINTS_PER_LEVEL + 1
}

impl Player {
    pub fn new(id: &str, username: &str, email: &str) -> Self {
        let now = Utc::now();
        Player {
            id: id.to_string(),
            username: username.to_string(),
            email: email.to_string(),
            photo_url: None,
            created_at: Some(now),
            last_login_at: Some(now),
            total_quizzes_played: 0,
            total_quizzes_won: 0,
            total_points: 0,
            level: first_level(),
            badges: Vec::new(),
            category_scores: HashMap::new(),
            favorite_quizzes: Vec::new(),
            completed_quizzes: Vec::new(),
            settings: default_settings(),
        }
    }

    pub fn add_points(&mut self, points: i64, category: Option<&str>) {
        self.total_points += points;
        if let Some(category) = category.filter(|c| !c.is_empty()) {
            *self.category_scores.entry(category.to_string()).or_insert(0) += points;
        }
        self.level = level_for(self.total_points);
    }

    pub fn add_badge(&mut self, badge: &str) {
        push_unique(&mut self.badges, badge);
    }

    pub fn add_favorite_quiz(&mut self, quiz_id: &str) {
        push_unique(&mut self.favorite_quizzes, quiz_id);
    }

    pub fn remove_favorite_quiz(&mut self, quiz_id: &str) {
        self.favorite_quizzes.retain(|id| id != quiz_id);
    }

    pub fn add_completed_quiz(&mut self, quiz_id: &str) {
        push_unique(&mut self.completed_quizzes, quiz_id);
    }

    pub fn add_win(&mut self) {
        self.total_quizzes_won += 1;
    }

    pub fn add_quiz_played(&mut self) {
        self.total_quizzes_played += 1;
    }

    pub fn update_setting(&mut self, key: &str, value: Value) {
        self.settings.insert(key.to_string(), value);
    }

    pub fn record_login(&mut self) {
        self.last_login_at = Some(Utc::now());
    }
}

fn push_unique(list: &mut Vec<String>, value: &str) {
    if !list.iter().any(|v| v == value) {
        list.push(value.to_string());
    }
}

#[cfg(test)]
impl Player {
    pub fn test_player(id: &str) -> Self {
        Player::new(id, id, &format!("{}@example.com", id))
    }
}
