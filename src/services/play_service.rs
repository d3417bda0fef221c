use std::{collections::HashMap, sync::Arc};

use tokio::sync::Mutex;
use validator::Validate;

use crate::{
    errors::{AppError, AppResult},
    models::dto::{
        request::StartPlayRequest,
        response::{AnswerResponse, PlayView},
    },
    services::{
        play_session::{AnswerOutcome, PlaySession, QuizResult},
        player_service::{PlayRecord, PlayerService},
        quiz_service::QuizService,
    },
};

/// Owns the single-player sessions of this process. Each command runs under
/// the session map lock, so commands for one play are applied in order.
pub struct PlayService {
    quizzes: Arc<QuizService>,
    players: Arc<PlayerService>,
    sessions: Mutex<HashMap<String, PlaySession>>,
    shuffle_questions: bool,
}

impl PlayService {
    pub fn new(quizzes: Arc<QuizService>, players: Arc<PlayerService>, shuffle_questions: bool) -> Self {
        Self {
            quizzes,
            players,
            sessions: Mutex::new(HashMap::new()),
            shuffle_questions,
        }
    }

    pub async fn start_play(&self, request: StartPlayRequest) -> AppResult<PlayView> {
        request.validate()?;

        let mut quiz = self.quizzes.load_quiz(&request.quiz_id).await?;
        for question in &quiz.questions {
            question.validate_playable()?;
        }
        if self.shuffle_questions {
            quiz.shuffle_questions();
        }

        let mut session = PlaySession::new(request.player_id.as_deref());
        let questions = quiz.questions.clone();
        session.start(&quiz, questions)?;

        let view = PlayView::from(&session);
        log::info!(
            "Started play {} of quiz {} ({} questions)",
            session.id(),
            quiz.id,
            session.total_questions()
        );
        self.sessions.lock().await.insert(session.id().to_string(), session);
        Ok(view)
    }

    pub async fn get_play(&self, id: &str) -> AppResult<PlayView> {
        let sessions = self.sessions.lock().await;
        let session = sessions.get(id).ok_or_else(|| not_found(id))?;
        Ok(PlayView::from(session))
    }

    pub async fn submit_answer(&self, id: &str, answer: &[String]) -> AppResult<AnswerResponse> {
        self.answer(id, |session| session.submit_answer(answer)).await
    }

    pub async fn time_out(&self, id: &str) -> AppResult<AnswerResponse> {
        self.answer(id, PlaySession::time_out).await
    }

    async fn answer<F>(&self, id: &str, apply: F) -> AppResult<AnswerResponse>
    where
        F: FnOnce(&mut PlaySession) -> AppResult<AnswerOutcome>,
    {
        let mut sessions = self.sessions.lock().await;
        let session = sessions.get_mut(id).ok_or_else(|| not_found(id))?;

        let outcome = apply(session)?;
        let question = session
            .current_question()
            .ok_or_else(|| AppError::InternalError("Answered question is no longer current".to_string()))?;

        Ok(AnswerResponse {
            score: session.score(),
            correct_answers: question.expected_answers().map(<[String]>::to_vec).unwrap_or_default(),
            correct_index: question.correct_index(),
            explanation: question.explanation.clone(),
            outcome,
        })
    }

    pub async fn advance(&self, id: &str) -> AppResult<PlayView> {
        let mut sessions = self.sessions.lock().await;
        let session = sessions.get_mut(id).ok_or_else(|| not_found(id))?;
        session.advance()?;
        Ok(PlayView::from(&*session))
    }

    /// Ends the play. Only the call that completes it bumps the quiz's play
    /// count and updates the player's profile; both are best effort.
    pub async fn finish(&self, id: &str) -> AppResult<QuizResult> {
        let (outcome, quiz_id, player_id, category) = {
            let mut sessions = self.sessions.lock().await;
            let session = sessions.get_mut(id).ok_or_else(|| not_found(id))?;
            let outcome = session.finish()?;
            (
                outcome,
                session.quiz_id().to_string(),
                session.player_id().map(str::to_string),
                session.category().map(str::to_string),
            )
        };

        if !outcome.newly_finished {
            return Ok(outcome.result);
        }

        log::info!(
            "Play {} finished with {}/{} points",
            id,
            outcome.result.score,
            outcome.result.max_possible_score
        );

        if let Err(err) = self.quizzes.record_play(&quiz_id).await {
            log::warn!("Failed to increment play count for quiz {}: {}", quiz_id, err);
        }

        if let Some(player_id) = player_id.as_deref() {
            let record = PlayRecord {
                player_id,
                quiz_id: &quiz_id,
                category: category.as_deref(),
                points: outcome.result.score,
                won: false,
            };
            if let Err(err) = self.players.record_play(record).await {
                log::warn!("Failed to update profile of player {}: {}", player_id, err);
            }
        }

        Ok(outcome.result)
    }

    pub async fn discard(&self, id: &str) -> AppResult<()> {
        self.sessions
            .lock()
            .await
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| not_found(id))
    }
}

fn not_found(id: &str) -> AppError {
    AppError::NotFound(format!("Play session with id '{}' not found", id))
}
