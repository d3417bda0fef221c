use chrono::{DateTime, Utc};
use rand::{seq::SliceRandom, Rng};
use serde::{Deserialize, Serialize};

use crate::errors::{AppError, AppResult};

pub const DEFAULT_POINTS: i32 = 10;
pub const MIN_CHOICE_OPTIONS: usize = 2;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QuestionType {
    #[default]
    SingleChoice,
    MultipleChoice,
    FreeText,
    FillInBlanks,
    Matching,
}

impl QuestionType {
    /// Single and multiple choice; the only types whose options get shuffled.
    pub fn is_choice(self) -> bool {
        matches!(self, QuestionType::SingleChoice | QuestionType::MultipleChoice)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Video,
    Audio,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    #[serde(default)]
    pub id: String,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_url: Option<String>, // url, local path or inline data uri
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_type: Option<MediaKind>,
    #[serde(default)]
    pub options: Vec<String>,
    #[serde(rename = "type", default)]
    pub question_type: QuestionType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correct_option: Option<String>, // single choice, tracked by value
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correct_answers: Option<Vec<String>>,
    #[serde(default)]
    pub explanation: Option<String>,
    #[serde(default = "default_difficulty")]
    pub difficulty: u8,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default = "default_points")]
    pub points: i32,
    #[serde(default)]
    pub time_limit: u32, // seconds, 0 = unlimited
    #[serde(default)]
    pub created_by: Option<String>,
    #[serde(default, with = "chrono::serde::ts_milliseconds_option")]
    pub created_at: Option<DateTime<Utc>>,
}

fn default_points() -> i32 {
    DEFAULT_POINTS
}

fn default_difficulty() -> u8 {
    1
}

impl Question {
    pub fn new(id: &str, text: &str, question_type: QuestionType) -> Self {
        Question {
            id: id.to_string(),
            text: text.to_string(),
            media_url: None,
            media_type: None,
            options: Vec::new(),
            question_type,
            correct_option: None,
            correct_answers: None,
            explanation: None,
            difficulty: default_difficulty(),
            category: None,
            points: DEFAULT_POINTS,
            time_limit: 0,
            created_by: None,
            created_at: Some(Utc::now()),
        }
    }

    pub fn single_choice(id: &str, text: &str, options: &[&str], correct: &str) -> Self {
        let mut question = Self::new(id, text, QuestionType::SingleChoice);
        question.options = to_strings(options);
        question.correct_option = Some(correct.to_string());
        question
    }

    pub fn multiple_choice(id: &str, text: &str, options: &[&str], correct: &[&str]) -> Self {
        let mut question = Self::new(id, text, QuestionType::MultipleChoice);
        question.options = to_strings(options);
        question.correct_answers = Some(to_strings(correct));
        question
    }

    pub fn free_text(id: &str, text: &str, expected: &str) -> Self {
        let mut question = Self::new(id, text, QuestionType::FreeText);
        question.correct_answers = Some(vec![expected.to_string()]);
        question
    }

    pub fn fill_in_blanks(id: &str, text: &str, expected: &str) -> Self {
        let mut question = Self::new(id, text, QuestionType::FillInBlanks);
        question.correct_answers = Some(vec![expected.to_string()]);
        question
    }

    /// `options` are the left-hand items shown in order; `pairs` the expected
    /// right-hand value for each position.
    pub fn matching(id: &str, text: &str, options: &[&str], pairs: &[&str]) -> Self {
        let mut question = Self::new(id, text, QuestionType::Matching);
        question.options = to_strings(options);
        question.correct_answers = Some(to_strings(pairs));
        question
    }

    pub fn with_points(mut self, points: i32) -> Self {
        self.points = points;
        self
    }

    /// Expected answer values. Single choice prefers `correctOption` and falls
    /// back to `correctAnswers` for documents written the other way.
    pub fn expected_answers(&self) -> Option<&[String]> {
        match (self.question_type, &self.correct_option) {
            (QuestionType::SingleChoice, Some(correct)) => Some(std::slice::from_ref(correct)),
            _ => self.correct_answers.as_deref(),
        }
    }

    /// Index of the correct option in the current option order.
    /// Duplicate option text resolves to the first occurrence.
    pub fn correct_index(&self) -> Option<usize> {
        let expected = self.expected_answers()?;
        let [correct] = expected else {
            return None;
        };
        self.options.iter().position(|option| option == correct)
    }

    /// Copy with the options permuted. Correct answers are stored by value,
    /// so the permutation never changes which option is right. Matching
    /// questions and lists shorter than two keep their order.
    pub fn with_shuffled_options<R: Rng + ?Sized>(&self, rng: &mut R) -> Question {
        let mut shuffled = self.clone();
        if self.question_type != QuestionType::Matching && shuffled.options.len() >= 2 {
            shuffled.options.shuffle(rng);
        }
        shuffled
    }

    pub fn validate_playable(&self) -> AppResult<()> {
        if self.question_type.is_choice() && self.options.len() < MIN_CHOICE_OPTIONS {
            return Err(AppError::ValidationError(format!(
                "Question '{}' needs at least {} options",
                self.id, MIN_CHOICE_OPTIONS
            )));
        }
        let expected = match self.expected_answers() {
            Some(expected) if !expected.is_empty() => expected,
            _ => {
                return Err(AppError::ValidationError(format!(
                    "Question '{}' has no correct answer",
                    self.id
                )))
            }
        };
        if self.question_type.is_choice() {
            if let Some(stray) = expected.iter().find(|answer| !self.options.contains(*answer)) {
                return Err(AppError::ValidationError(format!(
                    "Question '{}' expects '{}', which is not one of its options",
                    self.id, stray
                )));
            }
        }
        Ok(())
    }
}

fn to_strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn question_type_uses_document_names() {
        let json = serde_json::to_string(&QuestionType::FillInBlanks).expect("type should serialize");
        assert_eq!(json, "\"FILL_IN_BLANKS\"");

        let parsed: QuestionType = serde_json::from_str("\"MULTIPLE_CHOICE\"").expect("type should parse");
        assert_eq!(parsed, QuestionType::MultipleChoice);
    }

    #[test]
    fn question_document_defaults_points_and_type() {
        let json = r#"{
            "id": "q1",
            "text": "Capital of France?",
            "options": ["Paris", "Lyon"],
            "correctOption": "Paris"
        }"#;

        let question: Question = serde_json::from_str(json).expect("question should parse");
        assert_eq!(question.question_type, QuestionType::SingleChoice);
        assert_eq!(question.points, DEFAULT_POINTS);
        assert_eq!(question.time_limit, 0);
        assert_eq!(question.correct_index(), Some(0));
    }

    #[test]
    fn question_document_uses_camel_case_fields() {
        let mut question = Question::free_text("q2", "Largest planet?", "Jupiter");
        question.media_url = Some("https://cdn.example.com/jupiter.png".to_string());
        question.media_type = Some(MediaKind::Image);

        let value = serde_json::to_value(&question).expect("question should serialize");
        assert_eq!(value["type"], "FREE_TEXT");
        assert_eq!(value["mediaType"], "image");
        assert_eq!(value["correctAnswers"][0], "Jupiter");
        assert!(value.get("timeLimit").is_some());
        assert!(value.get("createdAt").is_some());
    }

    #[test]
    fn single_choice_falls_back_to_correct_answers() {
        let mut question = Question::new("q3", "Pick one", QuestionType::SingleChoice);
        question.options = vec!["a".to_string(), "b".to_string()];
        question.correct_answers = Some(vec!["b".to_string()]);

        assert_eq!(question.expected_answers(), Some(&["b".to_string()][..]));
        assert_eq!(question.correct_index(), Some(1));
    }

    #[test]
    fn correct_index_resolves_duplicates_to_first_occurrence() {
        let question = Question::single_choice("q4", "Dupes", &["x", "y", "x"], "x");
        assert_eq!(question.correct_index(), Some(0));
    }

    #[test]
    fn validate_playable_rejects_short_option_lists() {
        let question = Question::single_choice("q5", "Only one", &["a"], "a");
        assert!(matches!(
            question.validate_playable(),
            Err(AppError::ValidationError(_))
        ));

        let question = Question::new("q6", "No answer", QuestionType::FreeText);
        assert!(question.validate_playable().is_err());

        let question = Question::matching("q7", "Match", &["1", "2"], &["one", "two"]);
        assert!(question.validate_playable().is_ok());
    }

    #[test]
    fn validate_playable_requires_correct_answers_among_options() {
        let question = Question::single_choice("q8", "Capital of Peru?", &["Quito", "Bogota"], "Lima");
        assert!(matches!(
            question.validate_playable(),
            Err(AppError::ValidationError(message)) if message.contains("Lima")
        ));

        let question = Question::multiple_choice("q9", "Primes?", &["2", "3", "4"], &["2", "5"]);
        assert!(question.validate_playable().is_err());

        let question = Question::multiple_choice("q10", "Primes?", &["2", "3", "4"], &["2", "3"]);
        assert!(question.validate_playable().is_ok());
    }
}
