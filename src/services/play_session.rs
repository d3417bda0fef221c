//! Single-player play loop.
//!
//! `Loading -> InProgress(index) -> Finished`. Every question must be answered
//! (or timed out) before the session advances; the first `finish` call is the
//! one that reports the play as completed.

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::Serialize;
use uuid::Uuid;

use crate::errors::{AppError, AppResult};
use crate::models::domain::{Question, Quiz};
use crate::services::answer_evaluator::AnswerEvaluator;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum PlayState {
    Loading,
    InProgress { index: usize },
    Finished,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerOutcome {
    pub question_id: String,
    pub correct: bool,
    pub points_awarded: i32,
    pub elapsed_ms: u64,
    pub timed_out: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ResultRating {
    Excellent,
    Good,
    Fair,
    KeepPracticing,
}

impl ResultRating {
    pub fn from_percentage(percentage: u32) -> Self {
        match percentage {
            80.. => ResultRating::Excellent,
            60..=79 => ResultRating::Good,
            40..=59 => ResultRating::Fair,
            _ => ResultRating::KeepPracticing,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizResult {
    pub score: i32,
    pub total_questions: usize,
    pub correct_answers: usize,
    pub max_possible_score: i32,
    pub percentage: u32,
    pub rating: ResultRating,
}

impl QuizResult {
    pub fn compute(score: i32, total_questions: usize, correct_answers: usize, max_possible_score: i32) -> Self {
        let percentage = if max_possible_score > 0 {
            (f64::from(score.max(0)) * 100.0 / f64::from(max_possible_score)).round() as u32
        } else {
            0
        };
        QuizResult {
            score,
            total_questions,
            correct_answers,
            max_possible_score,
            percentage,
            rating: ResultRating::from_percentage(percentage),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FinishOutcome {
    pub result: QuizResult,
    /// True only for the call that completed the play.
    pub newly_finished: bool,
}

#[derive(Clone, Debug)]
pub struct PlaySession {
    id: String,
    player_id: Option<String>,
    quiz_id: String,
    category: Option<String>,
    questions: Vec<Question>,
    state: PlayState,
    score: i32,
    outcomes: Vec<Option<AnswerOutcome>>,
    question_shown_at: DateTime<Utc>,
    result: Option<QuizResult>,
}

impl PlaySession {
    pub fn new(player_id: Option<&str>) -> Self {
        PlaySession {
            id: Uuid::new_v4().to_string(),
            player_id: player_id.map(str::to_string),
            quiz_id: String::new(),
            category: None,
            questions: Vec::new(),
            state: PlayState::Loading,
            score: 0,
            outcomes: Vec::new(),
            question_shown_at: Utc::now(),
            result: None,
        }
    }

    pub fn start(&mut self, quiz: &Quiz, questions: Vec<Question>) -> AppResult<()> {
        self.start_with(quiz, questions, &mut rand::thread_rng())
    }

    /// Loads the questions and shuffles choice options once. Nothing changes
    /// when this fails.
    pub fn start_with<R: Rng + ?Sized>(
        &mut self,
        quiz: &Quiz,
        questions: Vec<Question>,
        rng: &mut R,
    ) -> AppResult<()> {
        if self.state != PlayState::Loading {
            return Err(AppError::InvalidState("Play session already started".to_string()));
        }
        if questions.is_empty() {
            return Err(AppError::ValidationError(format!(
                "Quiz '{}' has no questions",
                quiz.id
            )));
        }

        self.questions = questions
            .iter()
            .map(|q| {
                if q.question_type.is_choice() {
                    AnswerEvaluator::shuffle_options_with(q, rng)
                } else {
                    q.clone()
                }
            })
            .collect();
        self.quiz_id = quiz.id.clone();
        self.category = quiz.category.clone();
        self.outcomes = vec![None; self.questions.len()];
        self.score = 0;
        self.state = PlayState::InProgress { index: 0 };
        self.question_shown_at = Utc::now();
        Ok(())
    }

    /// Evaluates the answer to the current question. A repeated submission
    /// returns the first outcome unchanged.
    pub fn submit_answer(&mut self, candidate: &[String]) -> AppResult<AnswerOutcome> {
        self.answer_current(Some(candidate))
    }

    /// Called by an external timer when the current question's limit expires.
    pub fn time_out(&mut self) -> AppResult<AnswerOutcome> {
        self.answer_current(None)
    }

    fn answer_current(&mut self, candidate: Option<&[String]>) -> AppResult<AnswerOutcome> {
        let index = self.current_index_or_err()?;
        if let Some(outcome) = &self.outcomes[index] {
            return Ok(outcome.clone());
        }

        let question = &self.questions[index];
        let correct = AnswerEvaluator::evaluate(question, candidate);
        let points_awarded = if correct { question.points } else { 0 };
        let elapsed_ms = (Utc::now() - self.question_shown_at).num_milliseconds().max(0) as u64;

        let outcome = AnswerOutcome {
            question_id: question.id.clone(),
            correct,
            points_awarded,
            elapsed_ms,
            timed_out: candidate.is_none(),
        };
        self.score += points_awarded;
        self.outcomes[index] = Some(outcome.clone());
        Ok(outcome)
    }

    /// Moves past an answered question; the last question moves to `Finished`.
    pub fn advance(&mut self) -> AppResult<PlayState> {
        let index = self.current_index_or_err()?;
        if self.outcomes[index].is_none() {
            return Err(AppError::InvalidState(
                "Current question has not been answered".to_string(),
            ));
        }

        self.state = if index + 1 >= self.questions.len() {
            PlayState::Finished
        } else {
            self.question_shown_at = Utc::now();
            PlayState::InProgress { index: index + 1 }
        };
        Ok(self.state)
    }

    /// Ends the play (early if still in progress) and returns the result.
    /// Idempotent: later calls return the same result with `newly_finished`
    /// unset.
    pub fn finish(&mut self) -> AppResult<FinishOutcome> {
        if self.state == PlayState::Loading {
            return Err(AppError::InvalidState("Play session has not started".to_string()));
        }
        if let Some(result) = &self.result {
            return Ok(FinishOutcome {
                result: result.clone(),
                newly_finished: false,
            });
        }

        self.state = PlayState::Finished;
        let result = QuizResult::compute(
            self.score,
            self.questions.len(),
            self.correct_count(),
            self.max_possible_score(),
        );
        self.result = Some(result.clone());
        Ok(FinishOutcome {
            result,
            newly_finished: true,
        })
    }

    fn current_index_or_err(&self) -> AppResult<usize> {
        match self.state {
            PlayState::InProgress { index } => Ok(index),
            PlayState::Loading => Err(AppError::InvalidState("Play session has not started".to_string())),
            PlayState::Finished => Err(AppError::InvalidState("Play session is finished".to_string())),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn player_id(&self) -> Option<&str> {
        self.player_id.as_deref()
    }

    pub fn quiz_id(&self) -> &str {
        &self.quiz_id
    }

    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    pub fn state(&self) -> PlayState {
        self.state
    }

    pub fn score(&self) -> i32 {
        self.score
    }

    pub fn total_questions(&self) -> usize {
        self.questions.len()
    }

    pub fn current_index(&self) -> Option<usize> {
        match self.state {
            PlayState::InProgress { index } => Some(index),
            _ => None,
        }
    }

    pub fn current_question(&self) -> Option<&Question> {
        self.current_index().and_then(|i| self.questions.get(i))
    }

    pub fn is_current_answered(&self) -> bool {
        self.current_index()
            .map(|i| self.outcomes[i].is_some())
            .unwrap_or(false)
    }

    pub fn answered_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_some()).count()
    }

    pub fn outcomes(&self) -> Vec<AnswerOutcome> {
        self.outcomes.iter().flatten().cloned().collect()
    }

    pub fn result(&self) -> Option<&QuizResult> {
        self.result.as_ref()
    }

    fn correct_count(&self) -> usize {
        self.outcomes.iter().flatten().filter(|o| o.correct).count()
    }

    fn max_possible_score(&self) -> i32 {
        self.questions.iter().map(|q| q.points.max(0)).sum()
    }
}
