use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::{
    models::domain::{GameMode, GameSession, MediaKind, Question, QuestionType, Quiz},
    services::play_session::{AnswerOutcome, PlaySession, PlayState, QuizResult},
};

/// A question as shown to players. Never carries the expected answers.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionView {
    pub id: String,
    pub text: String,
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    pub options: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media_type: Option<MediaKind>,
    pub points: i32,
    pub time_limit: u32,
    pub difficulty: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl From<&Question> for QuestionView {
    fn from(question: &Question) -> Self {
        QuestionView {
            id: question.id.clone(),
            text: question.text.clone(),
            question_type: question.question_type,
            options: question.options.clone(),
            media_url: question.media_url.clone(),
            media_type: question.media_type,
            points: question.points,
            time_limit: question.time_limit,
            difficulty: question.difficulty,
            category: question.category.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizDetails {
    #[serde(flatten)]
    pub quiz: Quiz,
    pub questions: Vec<QuestionView>,
    pub max_possible_score: i32,
}

impl From<Quiz> for QuizDetails {
    fn from(quiz: Quiz) -> Self {
        let questions = quiz.questions.iter().map(QuestionView::from).collect();
        let max_possible_score = quiz.max_possible_score();
        QuizDetails {
            quiz,
            questions,
            max_possible_score,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayView {
    pub id: String,
    pub quiz_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub player_id: Option<String>,
    pub state: PlayState,
    pub score: i32,
    pub total_questions: usize,
    pub answered_count: usize,
    pub current_question: Option<QuestionView>,
    pub current_answered: bool,
    pub result: Option<QuizResult>,
}

impl From<&PlaySession> for PlayView {
    fn from(session: &PlaySession) -> Self {
        PlayView {
            id: session.id().to_string(),
            quiz_id: session.quiz_id().to_string(),
            player_id: session.player_id().map(str::to_string),
            state: session.state(),
            score: session.score(),
            total_questions: session.total_questions(),
            answered_count: session.answered_count(),
            current_question: session.current_question().map(QuestionView::from),
            current_answered: session.is_current_answered(),
            result: session.result().cloned(),
        }
    }
}

/// Feedback for one submitted (or timed out) answer, revealing the solution.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerResponse {
    #[serde(flatten)]
    pub outcome: AnswerOutcome,
    pub score: i32,
    pub correct_answers: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correct_index: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerStanding {
    pub player_id: String,
    pub score: i32,
    pub lives: u32,
    pub eliminated: bool,
    pub answered: usize,
    pub average_response_time_ms: f64,
    pub correct_answer_rate: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameView {
    pub id: String,
    pub quiz_id: String,
    pub game_mode: GameMode,
    pub active: bool,
    pub current_question_index: usize,
    pub total_questions: usize,
    pub current_question: Option<QuestionView>,
    /// Highest score first; ties keep roster order.
    pub standings: Vec<PlayerStanding>,
    pub winner_id: Option<String>,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub start_time: DateTime<Utc>,
    #[serde(with = "chrono::serde::ts_milliseconds_option")]
    pub end_time: Option<DateTime<Utc>>,
    pub duration_ms: i64,
}

impl GameView {
    pub fn build(session: &GameSession, questions: &[Question]) -> Self {
        let standings = session
            .standings()
            .into_iter()
            .map(|(player_id, score)| {
                let progress = session.player_progress(&player_id).unwrap_or_default();
                PlayerStanding {
                    lives: progress.lives,
                    eliminated: session.is_player_eliminated(&player_id),
                    answered: progress.answers.len(),
                    average_response_time_ms: session.average_response_time(&player_id),
                    correct_answer_rate: session.correct_answer_rate(&player_id),
                    player_id,
                    score,
                }
            })
            .collect();

        let current_question = if session.is_active() {
            questions
                .get(session.current_question_index())
                .map(QuestionView::from)
        } else {
            None
        };

        GameView {
            id: session.id().to_string(),
            quiz_id: session.quiz_id().to_string(),
            game_mode: session.game_mode(),
            active: session.is_active(),
            current_question_index: session.current_question_index(),
            total_questions: questions.len(),
            current_question,
            standings,
            winner_id: session.winner_id().map(str::to_string),
            start_time: session.start_time(),
            end_time: session.end_time(),
            duration_ms: session.game_duration().num_milliseconds(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameAnswerResponse {
    /// False when the answer was ignored: unknown or eliminated player, a
    /// repeated answer in the same round, or a game that already ended.
    pub accepted: bool,
    pub player_id: String,
    pub question_id: Option<String>,
    pub correct: bool,
    pub points_awarded: i32,
    pub score: i32,
    pub lives: u32,
    pub eliminated: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteResponse {
    pub id: String,
    pub deleted: bool,
}
