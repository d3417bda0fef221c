#![allow(dead_code)]

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use tokio::sync::RwLock;

use quizplay_server::{
    errors::{AppError, AppResult},
    models::domain::{GameMode, Player, Question, Quiz},
    repositories::{quiz_repository::order_by_ids, PlayerRepository, QuizRepository},
};

#[derive(Default)]
pub struct InMemoryQuizRepository {
    pub quizzes: Arc<RwLock<HashMap<String, Quiz>>>,
    pub questions: Arc<RwLock<HashMap<String, Question>>>,
}

impl InMemoryQuizRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn play_count(&self, quiz_id: &str) -> i64 {
        self.quizzes
            .read()
            .await
            .get(quiz_id)
            .map(|q| q.play_count)
            .unwrap_or_default()
    }
}

fn sorted_by<F>(mut quizzes: Vec<Quiz>, key: F, limit: Option<i64>) -> Vec<Quiz>
where
    F: Fn(&Quiz, &Quiz) -> std::cmp::Ordering,
{
    quizzes.sort_by(key);
    if let Some(limit) = limit {
        quizzes.truncate(limit.max(0) as usize);
    }
    quizzes
}

#[async_trait]
impl QuizRepository for InMemoryQuizRepository {
    async fn find_quiz(&self, id: &str) -> AppResult<Option<Quiz>> {
        Ok(self.quizzes.read().await.get(id).cloned())
    }

    async fn find_question(&self, id: &str) -> AppResult<Option<Question>> {
        Ok(self.questions.read().await.get(id).cloned())
    }

    async fn find_questions_by_ids(&self, ids: &[String]) -> AppResult<Vec<Question>> {
        let questions = self.questions.read().await;
        let found: Vec<Question> = questions
            .values()
            .filter(|q| ids.contains(&q.id))
            .cloned()
            .collect();
        Ok(order_by_ids(ids, found))
    }

    async fn increment_play_count(&self, quiz_id: &str) -> AppResult<()> {
        if let Some(quiz) = self.quizzes.write().await.get_mut(quiz_id) {
            quiz.increment_play_count();
        }
        Ok(())
    }

    async fn create_quiz(&self, quiz: Quiz) -> AppResult<String> {
        let mut quizzes = self.quizzes.write().await;
        if quizzes.contains_key(&quiz.id) {
            return Err(AppError::AlreadyExists(format!(
                "Quiz with id '{}' already exists",
                quiz.id
            )));
        }
        let id = quiz.id.clone();
        quizzes.insert(id.clone(), quiz);
        Ok(id)
    }

    async fn add_question(&self, question: Question) -> AppResult<String> {
        let mut questions = self.questions.write().await;
        if questions.contains_key(&question.id) {
            return Err(AppError::AlreadyExists(format!(
                "Question with id '{}' already exists",
                question.id
            )));
        }
        let id = question.id.clone();
        questions.insert(id.clone(), question);
        Ok(id)
    }

    async fn update_quiz(&self, quiz: Quiz) -> AppResult<Quiz> {
        let mut quizzes = self.quizzes.write().await;
        if !quizzes.contains_key(&quiz.id) {
            return Err(AppError::NotFound(format!("Quiz with id '{}' not found", quiz.id)));
        }
        quizzes.insert(quiz.id.clone(), quiz.clone());
        Ok(quiz)
    }

    async fn delete_quiz(&self, id: &str) -> AppResult<()> {
        self.quizzes
            .write()
            .await
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| AppError::NotFound(format!("Quiz with id '{}' not found", id)))
    }

    async fn delete_question(&self, id: &str) -> AppResult<()> {
        self.questions
            .write()
            .await
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| AppError::NotFound(format!("Question with id '{}' not found", id)))
    }

    async fn list_popular(&self, limit: i64) -> AppResult<Vec<Quiz>> {
        let quizzes = self.quizzes.read().await;
        let public: Vec<Quiz> = quizzes.values().filter(|q| q.is_public).cloned().collect();
        Ok(sorted_by(public, |a, b| b.play_count.cmp(&a.play_count), Some(limit)))
    }

    async fn list_recent(&self, limit: i64) -> AppResult<Vec<Quiz>> {
        let quizzes = self.quizzes.read().await;
        let public: Vec<Quiz> = quizzes.values().filter(|q| q.is_public).cloned().collect();
        Ok(sorted_by(public, |a, b| b.created_at.cmp(&a.created_at), Some(limit)))
    }

    async fn list_by_author(&self, author_id: &str) -> AppResult<Vec<Quiz>> {
        let quizzes = self.quizzes.read().await;
        let own: Vec<Quiz> = quizzes
            .values()
            .filter(|q| q.author_id == author_id)
            .cloned()
            .collect();
        Ok(sorted_by(own, |a, b| b.created_at.cmp(&a.created_at), None))
    }
}

#[derive(Default)]
pub struct InMemoryPlayerRepository {
    pub players: Arc<RwLock<HashMap<String, Player>>>,
}

impl InMemoryPlayerRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PlayerRepository for InMemoryPlayerRepository {
    async fn find_player(&self, id: &str) -> AppResult<Option<Player>> {
        Ok(self.players.read().await.get(id).cloned())
    }

    async fn save_player(&self, player: Player) -> AppResult<Player> {
        self.players
            .write()
            .await
            .insert(player.id.clone(), player.clone());
        Ok(player)
    }
}

pub fn make_questions() -> Vec<Question> {
    vec![
        Question::single_choice(
            "q1",
            "Which planet is the largest?",
            &["Mars", "Jupiter", "Venus", "Mercury"],
            "Jupiter",
        ),
        Question::free_text("q2", "Name the red planet", "Mars").with_points(20),
        Question::multiple_choice(
            "q3",
            "Which are gas giants?",
            &["Jupiter", "Earth", "Saturn", "Mars"],
            &["Jupiter", "Saturn"],
        ),
    ]
}

pub fn make_quiz(id: &str, author_id: &str, mode: GameMode) -> Quiz {
    let mut quiz = Quiz::new("Solar system", author_id, mode);
    quiz.id = id.to_string();
    quiz.category = Some("Science".to_string());
    quiz.set_questions(make_questions());
    quiz
}

/// Repository holding one quiz (`quiz-1`) and its three questions.
pub async fn seeded_quiz_repository(mode: GameMode) -> InMemoryQuizRepository {
    let repo = InMemoryQuizRepository::new();
    for question in make_questions() {
        repo.add_question(question).await.expect("seed question");
    }
    repo.create_quiz(make_quiz("quiz-1", "author-1", mode))
        .await
        .expect("seed quiz");
    repo
}

pub fn answer(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}
