//! Questions and the immutable, cyclic question bank.
//!
//! Question sources are described by `QuestionRecord`, which accepts the
//! correct answer either as an index or as the text of one of the choices.
//! Both forms are translated to an index when the bank is built, so the rest
//! of the engine only ever compares indices.

use crate::common::CHOICE_COUNT;
use crate::error::{QuizError, Result};
use serde::Deserialize;

/// A question as it appears in a configuration source.
#[derive(Debug, Clone, Deserialize)]
pub struct QuestionRecord {
    pub prompt: String,
    pub choices: Vec<String>,
    #[serde(default, alias = "correctIndex")]
    pub correct_index: Option<usize>,
    /// The text of the correct choice, for sources that name the answer instead of indexing it.
    #[serde(default)]
    pub answer: Option<String>,
}

impl QuestionRecord {
    pub fn with_index(prompt: &str, choices: [&str; CHOICE_COUNT], correct_index: usize) -> Self {
        Self {
            prompt: prompt.to_string(),
            choices: choices.iter().map(|c| c.to_string()).collect(),
            correct_index: Some(correct_index),
            answer: None,
        }
    }

    pub fn with_answer(prompt: &str, choices: [&str; CHOICE_COUNT], answer: &str) -> Self {
        Self {
            prompt: prompt.to_string(),
            choices: choices.iter().map(|c| c.to_string()).collect(),
            correct_index: None,
            answer: Some(answer.to_string()),
        }
    }
}

/// A validated multiple-choice question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    prompt: String,
    choices: [String; CHOICE_COUNT],
    correct_index: usize,
}

impl Question {
    /// Validates a record and resolves its answer to an index.
    ///
    /// `index` is the record's position in the source and is only used for
    /// error reporting.
    pub fn from_record(index: usize, record: QuestionRecord) -> Result<Self> {
        let malformed = |reason: String| QuizError::MalformedQuestion { index, reason };

        if record.prompt.trim().is_empty() {
            return Err(malformed("prompt is empty".to_string()));
        }
        let choices: [String; CHOICE_COUNT] = record.choices.try_into().map_err(|c: Vec<String>| {
            malformed(format!("expected {} choices, found {}", CHOICE_COUNT, c.len()))
        })?;

        let correct_index = match (record.correct_index, record.answer) {
            (Some(i), None) if i < CHOICE_COUNT => i,
            (Some(i), None) => {
                return Err(malformed(format!(
                    "correct index {} is outside 0..{}",
                    i, CHOICE_COUNT
                )))
            }
            (None, Some(answer)) => {
                let mut matches = choices
                    .iter()
                    .enumerate()
                    .filter(|(_, choice)| **choice == answer)
                    .map(|(i, _)| i);
                match (matches.next(), matches.next()) {
                    (Some(i), None) => i,
                    (None, _) => {
                        return Err(malformed(format!("answer {:?} is not one of the choices", answer)))
                    }
                    (Some(_), Some(_)) => {
                        return Err(malformed(format!("answer {:?} matches more than one choice", answer)))
                    }
                }
            }
            (Some(_), Some(_)) => {
                return Err(malformed("both correct_index and answer are set".to_string()))
            }
            (None, None) => return Err(malformed("no correct answer given".to_string())),
        };

        Ok(Self {
            prompt: record.prompt,
            choices,
            correct_index,
        })
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn choices(&self) -> &[String; CHOICE_COUNT] {
        &self.choices
    }

    pub fn correct_index(&self) -> usize {
        self.correct_index
    }

    pub fn is_correct(&self, choice_index: usize) -> bool {
        choice_index == self.correct_index
    }
}

/// An ordered, non-empty, immutable sequence of questions.
///
/// The bank is shared by reference (`Arc`) with the session and is indexed
/// modulo its length, so a quiz cycles through it for as long as the clock runs.
#[derive(Debug, Clone)]
pub struct QuestionBank {
    questions: Vec<Question>,
}

impl QuestionBank {
    /// Builds a bank from already-validated questions.
    pub fn new(questions: Vec<Question>) -> Result<Self> {
        if questions.is_empty() {
            return Err(QuizError::EmptyQuestionBank);
        }
        Ok(Self { questions })
    }

    /// Validates every record and builds a bank, failing on the first bad one.
    pub fn from_records(records: Vec<QuestionRecord>) -> Result<Self> {
        let questions = records
            .into_iter()
            .enumerate()
            .map(|(i, record)| Question::from_record(i, record))
            .collect::<Result<Vec<_>>>()?;
        Self::new(questions)
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    /// Always `false`; kept for API symmetry with collections.
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// Returns the question at `index` modulo the bank length.
    pub fn get(&self, index: usize) -> &Question {
        &self.questions[index % self.questions.len()]
    }

    /// Returns the index that follows `index`, wrapping to the start.
    pub fn next_index(&self, index: usize) -> usize {
        (index + 1) % self.questions.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Question> {
        self.questions.iter()
    }
}

/// The built-in sample questions used when no source is configured.
pub fn sample_records() -> Vec<QuestionRecord> {
    ["a", "b", "c", "d"]
        .iter()
        .map(|answer| {
            QuestionRecord::with_answer(
                &format!("What is the answer ({})?", answer),
                ["a", "b", "c", "d"],
                answer,
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn answer_text_resolves_to_index() {
        let q = Question::from_record(0, QuestionRecord::with_answer("Q?", ["w", "x", "y", "z"], "y"))
            .unwrap();
        assert_eq!(q.correct_index(), 2);
        assert!(q.is_correct(2));
        assert!(!q.is_correct(0));
    }

    #[test]
    fn ambiguous_answer_text_is_rejected() {
        let err = Question::from_record(3, QuestionRecord::with_answer("Q?", ["x", "x", "y", "z"], "x"))
            .unwrap_err();
        assert!(matches!(err, QuizError::MalformedQuestion { index: 3, .. }));
    }

    #[test]
    fn unknown_answer_text_is_rejected() {
        let err = Question::from_record(0, QuestionRecord::with_answer("Q?", ["w", "x", "y", "z"], "q"))
            .unwrap_err();
        assert!(matches!(err, QuizError::MalformedQuestion { .. }));
    }

    #[test]
    fn out_of_range_index_is_rejected() {
        let err = Question::from_record(1, QuestionRecord::with_index("Q?", ["a", "b", "c", "d"], 4))
            .unwrap_err();
        assert!(err.is_fatal());
    }

    #[test]
    fn wrong_choice_count_is_rejected() {
        let record = QuestionRecord {
            prompt: "Q?".into(),
            choices: vec!["a".into(), "b".into(), "c".into()],
            correct_index: Some(0),
            answer: None,
        };
        assert!(Question::from_record(0, record).is_err());
    }

    #[test]
    fn both_answer_forms_are_rejected() {
        let mut record = QuestionRecord::with_index("Q?", ["a", "b", "c", "d"], 0);
        record.answer = Some("a".into());
        assert!(Question::from_record(0, record).is_err());
    }

    #[test]
    fn empty_bank_is_a_configuration_error() {
        let err = QuestionBank::from_records(Vec::new()).unwrap_err();
        assert!(matches!(err, QuizError::EmptyQuestionBank));
        assert!(err.is_fatal());
    }

    #[test]
    fn bank_cycles_modulo_length() {
        let bank = QuestionBank::from_records(sample_records()).unwrap();
        assert_eq!(bank.len(), 4);
        assert_eq!(bank.next_index(3), 0);
        assert_eq!(bank.get(5).prompt(), "What is the answer (b)?");
        assert_eq!(bank.get(3).correct_index(), 3);
    }

    #[test]
    fn camel_case_index_is_accepted() {
        let record: QuestionRecord = serde_json::from_str(
            r#"{"prompt":"Q?","choices":["a","b","c","d"],"correctIndex":1}"#,
        )
        .unwrap();
        assert_eq!(Question::from_record(0, record).unwrap().correct_index(), 1);
    }
}
