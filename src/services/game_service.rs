use std::{
    collections::{HashMap, HashSet},
    sync::Arc,
};

use chrono::{DateTime, Utc};
use tokio::sync::Mutex;
use validator::Validate;

use crate::{
    errors::{AppError, AppResult},
    models::{
        domain::{GameSession, Question},
        dto::{
            request::{CreateGameRequest, GameAnswerRequest},
            response::{GameAnswerResponse, GameView},
        },
    },
    services::{
        answer_evaluator::AnswerEvaluator,
        player_service::{PlayRecord, PlayerService},
        quiz_service::QuizService,
        scoring::{scoring_rule_for, ScoringContext},
    },
};

struct HostedGame {
    session: GameSession,
    questions: Vec<Question>,
    category: Option<String>,
    round_started_at: DateTime<Utc>,
    answered_this_round: HashSet<String>,
}

/// Everything needed to apply an ended game outside the lock.
struct FinishedGame {
    quiz_id: String,
    category: Option<String>,
    winner_id: Option<String>,
    scores: Vec<(String, i32)>,
}

/// Host-authoritative multiplayer games kept in this process.
pub struct GameService {
    quizzes: Arc<QuizService>,
    players: Arc<PlayerService>,
    games: Mutex<HashMap<String, HostedGame>>,
}

impl GameService {
    pub fn new(quizzes: Arc<QuizService>, players: Arc<PlayerService>) -> Self {
        Self {
            quizzes,
            players,
            games: Mutex::new(HashMap::new()),
        }
    }

    pub async fn create_game(&self, request: CreateGameRequest) -> AppResult<GameView> {
        request.validate()?;

        let mut quiz = self.quizzes.load_quiz(&request.quiz_id).await?;
        if quiz.questions.is_empty() {
            return Err(AppError::ValidationError(format!(
                "Quiz '{}' has no questions",
                quiz.id
            )));
        }
        for question in &quiz.questions {
            question.validate_playable()?;
        }
        // Every player sees the same option order.
        quiz.shuffle_all_options();

        let mode = request.game_mode.unwrap_or(quiz.game_mode);
        let mut session = GameSession::create(&quiz.id, &request.player_ids, mode)?;
        if let Some(rules) = &quiz.custom_rules {
            session.add_game_rule("customRules", serde_json::Value::String(rules.clone()));
        }
        if quiz.time_limit > 0 {
            session.add_game_rule("timeLimit", serde_json::Value::from(quiz.time_limit));
        }

        let game = HostedGame {
            session,
            questions: quiz.questions,
            category: quiz.category,
            round_started_at: Utc::now(),
            answered_this_round: HashSet::new(),
        };
        let view = GameView::build(&game.session, &game.questions);
        log::info!(
            "Created {:?} game {} for quiz {} with {} players",
            mode,
            view.id,
            view.quiz_id,
            game.session.player_ids().len()
        );
        self.games.lock().await.insert(view.id.clone(), game);
        Ok(view)
    }

    pub async fn get_game(&self, id: &str) -> AppResult<GameView> {
        let games = self.games.lock().await;
        let game = games.get(id).ok_or_else(|| not_found(id))?;
        Ok(GameView::build(&game.session, &game.questions))
    }

    /// Scores one player's answer to the current question. Answers that do
    /// not count come back with `accepted` unset and change nothing.
    pub async fn submit_answer(&self, id: &str, request: GameAnswerRequest) -> AppResult<GameAnswerResponse> {
        request.validate()?;

        let mut games = self.games.lock().await;
        let game = games.get_mut(id).ok_or_else(|| not_found(id))?;
        let player_id = request.player_id.as_str();
        let session = &mut game.session;
        let question = game.questions.get(session.current_question_index());

        let question = match question {
            Some(question)
                if session.is_active()
                    && session.has_player(player_id)
                    && !session.is_player_eliminated(player_id)
                    && !game.answered_this_round.contains(player_id) =>
            {
                question
            }
            _ => {
                log::debug!("Ignoring answer from {} in game {}", player_id, id);
                return Ok(standing(session, player_id, None, false, false, 0));
            }
        };

        let correct = AnswerEvaluator::evaluate(question, Some(request.answer.as_slice()));
        let response_time_ms = request.response_time_ms.unwrap_or_else(|| {
            (Utc::now() - game.round_started_at).num_milliseconds().max(0) as u64
        });
        let delta = scoring_rule_for(session.game_mode()).score(&ScoringContext {
            is_correct: correct,
            points: question.points,
            response_time_ms,
            time_limit_secs: question.time_limit,
        });

        session.record_answer(player_id, correct);
        session.record_response_time(player_id, response_time_ms);
        session.update_player_score(player_id, delta);
        game.answered_this_round.insert(player_id.to_string());

        Ok(standing(session, player_id, Some(question.id.as_str()), true, correct, delta))
    }

    /// Moves every player to the next question. Moving past the last
    /// question ends the game.
    pub async fn next_question(&self, id: &str) -> AppResult<GameView> {
        let (view, finished) = {
            let mut games = self.games.lock().await;
            let game = games.get_mut(id).ok_or_else(|| not_found(id))?;
            if !game.session.is_active() {
                return Err(AppError::InvalidState(format!("Game '{}' has ended", id)));
            }

            game.session.next_question();
            game.answered_this_round.clear();
            game.round_started_at = Utc::now();

            let finished = if game.session.current_question_index() >= game.questions.len() {
                end_hosted(game)
            } else {
                None
            };
            (GameView::build(&game.session, &game.questions), finished)
        };

        if let Some(finished) = finished {
            self.apply_results(finished).await;
        }
        Ok(view)
    }

    /// Ends the game and settles profiles once; later calls only report the
    /// stored outcome.
    pub async fn end_game(&self, id: &str) -> AppResult<GameView> {
        let (view, finished) = {
            let mut games = self.games.lock().await;
            let game = games.get_mut(id).ok_or_else(|| not_found(id))?;
            let finished = end_hosted(game);
            (GameView::build(&game.session, &game.questions), finished)
        };

        if let Some(finished) = finished {
            self.apply_results(finished).await;
        }
        Ok(view)
    }

    /// Drops the game from memory. An active game is abandoned without
    /// settling any profile.
    pub async fn discard(&self, id: &str) -> AppResult<()> {
        let game = self.games.lock().await.remove(id).ok_or_else(|| not_found(id))?;
        if game.session.is_active() {
            log::info!("Discarded active game {} without results", id);
        }
        Ok(())
    }

    async fn apply_results(&self, finished: FinishedGame) {
        log::info!(
            "Game for quiz {} ended, winner: {}",
            finished.quiz_id,
            finished.winner_id.as_deref().unwrap_or("none")
        );

        if let Err(err) = self.quizzes.record_play(&finished.quiz_id).await {
            log::warn!("Failed to increment play count for quiz {}: {}", finished.quiz_id, err);
        }

        for (player_id, score) in &finished.scores {
            let record = PlayRecord {
                player_id,
                quiz_id: &finished.quiz_id,
                category: finished.category.as_deref(),
                points: *score,
                won: finished.winner_id.as_deref() == Some(player_id.as_str()),
            };
            if let Err(err) = self.players.record_play(record).await {
                log::warn!("Failed to update profile of player {}: {}", player_id, err);
            }
        }
    }
}

fn end_hosted(game: &mut HostedGame) -> Option<FinishedGame> {
    if !game.session.is_active() {
        return None;
    }
    let winner_id = game.session.end_session();
    Some(FinishedGame {
        quiz_id: game.session.quiz_id().to_string(),
        category: game.category.clone(),
        winner_id,
        scores: game.session.standings(),
    })
}

fn standing(
    session: &GameSession,
    player_id: &str,
    question_id: Option<&str>,
    accepted: bool,
    correct: bool,
    points_awarded: i32,
) -> GameAnswerResponse {
    GameAnswerResponse {
        accepted,
        player_id: player_id.to_string(),
        question_id: question_id.map(str::to_string),
        correct,
        points_awarded,
        score: session.score(player_id).unwrap_or_default(),
        lives: session.lives(player_id).unwrap_or_default(),
        eliminated: session.is_player_eliminated(player_id),
    }
}

fn not_found(id: &str) -> AppError {
    AppError::NotFound(format!("Game with id '{}' not found", id))
}
