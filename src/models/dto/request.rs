use serde::Deserialize;
use validator::Validate;

use crate::models::domain::{GameMode, MediaKind, QuestionType};

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateQuizRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: String,

    #[validate(length(max = 2000))]
    pub description: Option<String>,

    pub image_url: Option<String>,

    #[validate(length(min = 1, max = 100))]
    pub category: Option<String>,

    pub sub_category: Option<String>,

    #[validate(length(min = 1))]
    pub author_id: String,

    pub author_name: Option<String>,

    #[serde(default)]
    pub question_ids: Vec<String>,

    pub game_mode: Option<GameMode>,

    #[validate(range(min = 1, max = 5))]
    pub difficulty: Option<u8>,

    pub is_public: Option<bool>,

    pub time_limit: Option<u32>,

    pub custom_rules: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateQuizRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,

    #[validate(length(max = 2000))]
    pub description: Option<String>,

    pub category: Option<String>,

    /// Replaces the question list; order is play order.
    pub question_ids: Option<Vec<String>>,

    pub game_mode: Option<GameMode>,

    #[validate(range(min = 1, max = 5))]
    pub difficulty: Option<u8>,

    pub is_public: Option<bool>,

    pub time_limit: Option<u32>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateQuestionRequest {
    /// When set, the new question is appended to this quiz.
    pub quiz_id: Option<String>,

    #[validate(length(min = 1, max = 1000))]
    pub text: String,

    #[serde(rename = "type", default)]
    pub question_type: QuestionType,

    #[serde(default)]
    pub options: Vec<String>,

    pub correct_option: Option<String>,

    pub correct_answers: Option<Vec<String>>,

    pub media_url: Option<String>,

    pub media_type: Option<MediaKind>,

    pub explanation: Option<String>,

    #[validate(range(min = 1, max = 5))]
    pub difficulty: Option<u8>,

    pub category: Option<String>,

    #[validate(range(min = 0, max = 1000))]
    pub points: Option<i32>,

    pub time_limit: Option<u32>,

    pub created_by: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct StartPlayRequest {
    #[validate(length(min = 1))]
    pub quiz_id: String,

    pub player_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SubmitAnswerRequest {
    /// Selected option value(s), the free-text entry, or matching pairs in order.
    pub answer: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateGameRequest {
    #[validate(length(min = 1))]
    pub quiz_id: String,

    #[validate(length(min = 1, message = "A game needs at least one player"))]
    pub player_ids: Vec<String>,

    /// Defaults to the quiz's own mode.
    pub game_mode: Option<GameMode>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct GameAnswerRequest {
    #[validate(length(min = 1))]
    pub player_id: String,

    pub answer: Vec<String>,

    /// Client-measured response time; measured from the round start when absent.
    pub response_time_ms: Option<u64>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreatePlayerRequest {
    #[validate(length(min = 1))]
    pub id: String,

    #[validate(length(min = 3, max = 50))]
    pub username: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(url)]
    pub photo_url: Option<String>,
}
