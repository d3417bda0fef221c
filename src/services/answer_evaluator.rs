use std::collections::HashSet;

use rand::Rng;

use crate::models::domain::{Question, QuestionType};

/// Stateless answer checking per question type.
pub struct AnswerEvaluator;

impl AnswerEvaluator {
    /// Judges a candidate answer. A missing candidate or a question without
    /// expected answers is never correct.
    pub fn evaluate(question: &Question, candidate: Option<&[String]>) -> bool {
        let (Some(candidate), Some(expected)) = (candidate, question.expected_answers()) else {
            return false;
        };

        match question.question_type {
            QuestionType::FreeText | QuestionType::FillInBlanks => match (candidate, expected) {
                ([given], [wanted]) => given.trim().to_lowercase() == wanted.trim().to_lowercase(),
                _ => false,
            },
            QuestionType::MultipleChoice => {
                let given: HashSet<&str> = candidate.iter().map(String::as_str).collect();
                let wanted: HashSet<&str> = expected.iter().map(String::as_str).collect();
                given.len() == wanted.len() && given.is_superset(&wanted)
            }
            QuestionType::SingleChoice => match (candidate, expected) {
                ([given], [wanted]) => given == wanted,
                _ => false,
            },
            QuestionType::Matching => candidate == expected,
        }
    }

    pub fn is_correct(question: &Question, candidate: &[String]) -> bool {
        Self::evaluate(question, Some(candidate))
    }

    pub fn shuffle_options(question: &Question) -> Question {
        Self::shuffle_options_with(question, &mut rand::thread_rng())
    }

    pub fn shuffle_options_with<R: Rng + ?Sized>(question: &Question, rng: &mut R) -> Question {
        question.with_shuffled_options(rng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    fn answer(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    fn permutations(items: &[String]) -> Vec<Vec<String>> {
        if items.len() <= 1 {
            return vec![items.to_vec()];
        }
        let mut result = Vec::new();
        for i in 0..items.len() {
            let mut rest = items.to_vec();
            let head = rest.remove(i);
            for mut tail in permutations(&rest) {
                tail.insert(0, head.clone());
                result.push(tail);
            }
        }
        result
    }

    #[test]
    fn free_text_trims_and_ignores_case() {
        let question = Question::free_text("q1", "Capital of France?", "paris");

        assert!(AnswerEvaluator::is_correct(&question, &answer(&["Paris "])));
        assert!(AnswerEvaluator::is_correct(&question, &answer(&["  PARIS"])));
        assert!(!AnswerEvaluator::is_correct(&question, &answer(&["Pariss"])));
        assert!(!AnswerEvaluator::is_correct(&question, &answer(&["Paris", "paris"])));
        assert!(!AnswerEvaluator::is_correct(&question, &answer(&[])));
    }

    #[test]
    fn fill_in_blanks_follows_free_text_rules() {
        let question = Question::fill_in_blanks("q2", "The ___ is round", "Earth");
        assert!(AnswerEvaluator::is_correct(&question, &answer(&["earth"])));

        let mut two_expected = question.clone();
        two_expected.correct_answers = Some(answer(&["Earth", "Globe"]));
        assert!(!AnswerEvaluator::is_correct(&two_expected, &answer(&["Earth"])));
    }

    #[test]
    fn multiple_choice_requires_equal_sets() {
        let question = Question::multiple_choice(
            "q3",
            "Which are planets?",
            &["Mars", "Moon", "Venus", "Sun"],
            &["Mars", "Venus"],
        );

        assert!(AnswerEvaluator::is_correct(&question, &answer(&["Mars", "Venus"])));
        assert!(AnswerEvaluator::is_correct(&question, &answer(&["Venus", "Mars"])));
        assert!(!AnswerEvaluator::is_correct(&question, &answer(&["Mars"])));
        assert!(!AnswerEvaluator::is_correct(&question, &answer(&["Mars", "Venus", "Moon"])));
        assert!(!AnswerEvaluator::is_correct(&question, &answer(&["Mars", "Moon"])));
    }

    #[test]
    fn single_choice_compares_by_value() {
        let question = Question::single_choice("q4", "Intel 4004 year?", &["1969", "1971", "1975"], "1971");

        assert!(AnswerEvaluator::is_correct(&question, &answer(&["1971"])));
        assert!(!AnswerEvaluator::is_correct(&question, &answer(&["1969"])));
        assert!(!AnswerEvaluator::is_correct(&question, &answer(&["1971", "1969"])));
    }

    #[test]
    fn matching_is_positional() {
        let question = Question::matching(
            "q5",
            "Match the inventors",
            &["Turing", "Lovelace"],
            &["Computability", "First program"],
        );

        assert!(AnswerEvaluator::is_correct(&question, &answer(&["Computability", "First program"])));
        assert!(!AnswerEvaluator::is_correct(&question, &answer(&["First program", "Computability"])));
        assert!(!AnswerEvaluator::is_correct(&question, &answer(&["Computability"])));
    }

    #[test]
    fn missing_candidate_or_expected_is_false() {
        let question = Question::free_text("q6", "Anything", "x");
        assert!(!AnswerEvaluator::evaluate(&question, None));

        let mut no_expected = Question::single_choice("q7", "Pick", &["a", "b"], "a");
        no_expected.correct_option = None;
        assert!(!AnswerEvaluator::is_correct(&no_expected, &answer(&["a"])));
    }

    #[test]
    fn every_permutation_keeps_single_choice_answer_correct() {
        let question = Question::single_choice(
            "q8",
            "Father of modern computing?",
            &["Alan Turing", "John von Neumann", "Ada Lovelace", "Grace Hopper"],
            "Alan Turing",
        );
        let correct = answer(&["Alan Turing"]);
        let all = permutations(&question.options);
        assert_eq!(all.len(), 24);

        for order in all {
            let mut permuted = question.clone();
            permuted.options = order;

            assert!(AnswerEvaluator::is_correct(&permuted, &correct));
            let index = permuted.correct_index().expect("correct option should be found");
            assert_eq!(permuted.options[index], "Alan Turing");
        }
    }

    #[test]
    fn shuffle_keeps_the_same_options() {
        let question = Question::single_choice("q9", "Pick", &["a", "b", "c", "d", "e"], "c");
        let mut rng = StdRng::seed_from_u64(7);

        for _ in 0..20 {
            let shuffled = AnswerEvaluator::shuffle_options_with(&question, &mut rng);
            let mut sorted = shuffled.options.clone();
            sorted.sort();
            assert_eq!(sorted, question.options);
            assert_eq!(shuffled.correct_option.as_deref(), Some("c"));
            assert!(AnswerEvaluator::is_correct(&shuffled, &answer(&["c"])));
        }
    }

    #[test]
    fn matching_and_short_lists_are_not_shuffled() {
        let mut rng = StdRng::seed_from_u64(1);
        let matching = Question::matching("q10", "Match", &["1", "2", "3", "4"], &["a", "b", "c", "d"]);
        for _ in 0..10 {
            let shuffled = AnswerEvaluator::shuffle_options_with(&matching, &mut rng);
            assert_eq!(shuffled.options, matching.options);
        }

        let single = Question::single_choice("q11", "Only", &["a"], "a");
        let shuffled = AnswerEvaluator::shuffle_options_with(&single, &mut rng);
        assert_eq!(shuffled, single);
    }
}
