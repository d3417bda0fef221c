use chrono::{DateTime, Utc};
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::domain::{game_mode::GameMode, question::Question};

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Quiz {
    #[serde(default)]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_category: Option<String>,
    #[serde(default)]
    pub author_id: String,
    #[serde(default)]
    pub author_name: Option<String>,
    #[serde(default)]
    pub question_ids: Vec<String>,
    // Materialized on load, never persisted with the quiz document.
    #[serde(skip)]
    pub questions: Vec<Question>,
    #[serde(default)]
    pub game_mode: GameMode,
    #[serde(default = "default_difficulty")]
    pub difficulty: u8,
    #[serde(default = "default_public")]
    pub is_public: bool,
    #[serde(default)]
    pub time_limit: u32, // total seconds, 0 = unlimited
    #[serde(default)]
    pub play_count: i64,
    #[serde(default)]
    pub rating: f64,
    #[serde(default, with = "chrono::serde::ts_milliseconds_option")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, with = "chrono::serde::ts_milliseconds_option")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_rules: Option<String>,
}

fn default_difficulty() -> u8 {
    1
}

fn default_public() -> bool {
    true
}

impl Quiz {
    pub fn new(title: &str, author_id: &str, game_mode: GameMode) -> Self {
        let now = Utc::now();
        Quiz {
            id: Uuid::new_v4().to_string(),
            title: title.to_string(),
            description: None,
            image_url: None,
            category: None,
            sub_category: None,
            author_id: author_id.to_string(),
            author_name: None,
            question_ids: Vec::new(),
            questions: Vec::new(),
            game_mode,
            difficulty: default_difficulty(),
            is_public: true,
            time_limit: 0,
            play_count: 0,
            rating: 0.0,
            created_at: Some(now),
            updated_at: Some(now),
            custom_rules: None,
        }
    }

    pub fn add_question(&mut self, question: Question) {
        self.question_ids.push(question.id.clone());
        self.questions.push(question);
        self.touch();
    }

    pub fn remove_question(&mut self, question_id: &str) {
        self.question_ids.retain(|id| id != question_id);
        self.questions.retain(|q| q.id != question_id);
        self.touch();
    }

    /// Replaces the materialized questions and rebuilds the id list from them.
    pub fn set_questions(&mut self, questions: Vec<Question>) {
        self.question_ids = questions
            .iter()
            .filter(|q| !q.id.is_empty())
            .map(|q| q.id.clone())
            .collect();
        self.questions = questions;
    }

    /// True when no questions are materialized, or when ids and objects agree
    /// in content and order.
    pub fn is_consistent(&self) -> bool {
        self.questions.is_empty()
            || (self.questions.len() == self.question_ids.len()
                && self
                    .questions
                    .iter()
                    .zip(&self.question_ids)
                    .all(|(q, id)| &q.id == id))
    }

    pub fn shuffle_questions(&mut self) {
        let mut rng = rand::thread_rng();
        self.questions.shuffle(&mut rng);
        self.question_ids = self.questions.iter().map(|q| q.id.clone()).collect();
    }

    pub fn shuffle_all_options(&mut self) {
        let mut rng = rand::thread_rng();
        self.questions = self
            .questions
            .iter()
            .map(|q| q.with_shuffled_options(&mut rng))
            .collect();
    }

    pub fn increment_play_count(&mut self) {
        self.play_count += 1;
    }

    pub fn max_possible_score(&self) -> i32 {
        self.questions.iter().map(|q| q.points.max(0)).sum()
    }

    fn touch(&mut self) {
        self.updated_at = Some(Utc::now());
    }
}
