use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::{Answer, Form, QuestionId, QuestionType};

/// Error type for response access and recording.
#[derive(Debug, thiserror::Error)]
pub enum ResponseError {
    #[error("Missing answer for question {0}")]
    MissingAnswer(QuestionId),

    #[error("Question {0} does not exist in this form")]
    UnknownQuestion(QuestionId),

    #[error("Type mismatch for question {question}: expected {expected}, got {actual}")]
    TypeMismatch {
        question: QuestionId,
        expected: &'static str,
        actual: &'static str,
    },

    #[error("'{value}' is not an option of question {question}")]
    UnknownChoice { question: QuestionId, value: String },

    #[error("Point {point} is outside the {points}-point scale of question {question}")]
    OutOfScale {
        question: QuestionId,
        point: u8,
        points: u8,
    },
}

/// Answers collected from a respondent, keyed by question id.
///
/// This is what the dependency evaluator reads to decide visibility.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Responses {
    values: HashMap<QuestionId, Answer>,
}

impl Responses {
    /// Create a new empty responses collection.
    pub fn new() -> Self {
        Self {
            values: HashMap::new(),
        }
    }

    /// Insert an answer without checking it against a form.
    pub fn insert(&mut self, question_id: QuestionId, answer: impl Into<Answer>) {
        self.values.insert(question_id, answer.into());
    }

    /// Builder-style [`Responses::insert`].
    pub fn with(mut self, question_id: QuestionId, answer: impl Into<Answer>) -> Self {
        self.insert(question_id, answer);
        self
    }

    /// Insert an answer after checking that it fits the question it answers.
    ///
    /// Rejects answers to unknown questions, answer kinds that do not match
    /// the question type, choices that are not among the question's options,
    /// and scale points beyond the question's range.
    pub fn record(
        &mut self,
        form: &Form,
        question_id: QuestionId,
        answer: impl Into<Answer>,
    ) -> Result<(), ResponseError> {
        let answer = answer.into();
        let question = form
            .question(&question_id)
            .ok_or(ResponseError::UnknownQuestion(question_id))?;

        if !answer.accepts(question.question_type) {
            return Err(ResponseError::TypeMismatch {
                question: question_id,
                expected: question.question_type.as_str(),
                actual: answer.type_name(),
            });
        }

        match (&answer, question.question_type) {
            (Answer::Choice(value), QuestionType::SingleSelect) => {
                if question.option_by_value(value).is_none() {
                    return Err(ResponseError::UnknownChoice {
                        question: question_id,
                        value: value.clone(),
                    });
                }
            }
            (Answer::Choices(values), QuestionType::MultiSelect) => {
                if let Some(value) = values
                    .iter()
                    .find(|v| question.option_by_value(v).is_none())
                {
                    return Err(ResponseError::UnknownChoice {
                        question: question_id,
                        value: value.clone(),
                    });
                }
            }
            (Answer::Scale(point), QuestionType::LinearScale) => {
                let points = question.scale_range.unwrap_or_default().points();
                if *point == 0 || *point > points {
                    return Err(ResponseError::OutOfScale {
                        question: question_id,
                        point: *point,
                        points,
                    });
                }
            }
            _ => {}
        }

        self.values.insert(question_id, answer);
        Ok(())
    }

    /// Get the answer to a question.
    pub fn get(&self, question_id: &QuestionId) -> Option<&Answer> {
        self.values.get(question_id)
    }

    /// Check if a question has been answered.
    pub fn contains(&self, question_id: &QuestionId) -> bool {
        self.values.contains_key(question_id)
    }

    /// Remove the answer to a question.
    pub fn remove(&mut self, question_id: &QuestionId) -> Option<Answer> {
        self.values.remove(question_id)
    }

    /// Get an iterator over all question-answer pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&QuestionId, &Answer)> {
        self.values.iter()
    }

    /// Get the number of answers.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if there are no answers.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Merge another responses collection into this one.
    pub fn extend(&mut self, other: Responses) {
        self.values.extend(other.values);
    }

    // === Convenience accessors ===

    /// Get a text answer.
    pub fn get_text(&self, question_id: &QuestionId) -> Result<&str, ResponseError> {
        match self.get(question_id) {
            Some(Answer::Text(s)) => Ok(s),
            Some(other) => Err(mismatch(question_id, "Text", other)),
            None => Err(ResponseError::MissingAnswer(*question_id)),
        }
    }

    /// Get a single-select answer.
    pub fn get_choice(&self, question_id: &QuestionId) -> Result<&str, ResponseError> {
        match self.get(question_id) {
            Some(Answer::Choice(s)) => Ok(s),
            Some(other) => Err(mismatch(question_id, "Choice", other)),
            None => Err(ResponseError::MissingAnswer(*question_id)),
        }
    }

    /// Get a multi-select answer.
    pub fn get_choices(&self, question_id: &QuestionId) -> Result<&[String], ResponseError> {
        match self.get(question_id) {
            Some(Answer::Choices(values)) => Ok(values),
            Some(other) => Err(mismatch(question_id, "Choices", other)),
            None => Err(ResponseError::MissingAnswer(*question_id)),
        }
    }

    /// Get an integer answer.
    pub fn get_integer(&self, question_id: &QuestionId) -> Result<i64, ResponseError> {
        match self.get(question_id) {
            Some(Answer::Integer(i)) => Ok(*i),
            Some(other) => Err(mismatch(question_id, "Integer", other)),
            None => Err(ResponseError::MissingAnswer(*question_id)),
        }
    }

    /// Get a number answer.
    pub fn get_number(&self, question_id: &QuestionId) -> Result<f64, ResponseError> {
        match self.get(question_id) {
            Some(Answer::Number(n)) => Ok(*n),
            Some(other) => Err(mismatch(question_id, "Number", other)),
            None => Err(ResponseError::MissingAnswer(*question_id)),
        }
    }

    /// Get a linear-scale answer.
    pub fn get_scale(&self, question_id: &QuestionId) -> Result<u8, ResponseError> {
        match self.get(question_id) {
            Some(Answer::Scale(point)) => Ok(*point),
            Some(other) => Err(mismatch(question_id, "Scale", other)),
            None => Err(ResponseError::MissingAnswer(*question_id)),
        }
    }
}

fn mismatch(question_id: &QuestionId, expected: &'static str, actual: &Answer) -> ResponseError {
    ResponseError::TypeMismatch {
        question: *question_id,
        expected,
        actual: actual.type_name(),
    }
}

impl IntoIterator for Responses {
    type Item = (QuestionId, Answer);
    type IntoIter = std::collections::hash_map::IntoIter<QuestionId, Answer>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.into_iter()
    }
}

impl<'a> IntoIterator for &'a Responses {
    type Item = (&'a QuestionId, &'a Answer);
    type IntoIter = std::collections::hash_map::Iter<'a, QuestionId, Answer>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.iter()
    }
}
