//! Sample forms assembled entirely through [`FormEditor`].
//!
//! Each builder returns the finished form together with the ids of its
//! sections and questions, so tests and demos can answer and edit it.

pub mod course_evaluation;
pub mod customer_feedback;

pub use course_evaluation::{CourseEvaluation, course_evaluation};
pub use customer_feedback::{CustomerFeedback, customer_feedback};

use formgraph::{DependencyCondition, Form, FormEditor, OptionId, QuestionId, SectionId};

/// Append a question with the given text and return its id along with the new form.
pub(crate) fn ask(
    editor: &FormEditor,
    form: &Form,
    section: &SectionId,
    text: &str,
    dependency: Option<DependencyCondition>,
) -> anyhow::Result<(Form, QuestionId)> {
    let form = editor.add_question(form, section, dependency)?;
    let id = form
        .section(section)
        .and_then(|s| s.questions.last())
        .map(|q| q.question_id)
        .ok_or_else(|| anyhow::anyhow!("question was not added"))?;
    let form = editor.update_question_title(&form, section, &id, text)?;
    Ok((form, id))
}

pub(crate) fn with_options(
    editor: &FormEditor,
    form: Form,
    section: &SectionId,
    question: &QuestionId,
    values: &[&str],
) -> anyhow::Result<Form> {
    values
        .iter()
        .try_fold(form, |form, value| -> anyhow::Result<Form> {
            Ok(editor.add_option(&form, section, question, Some(*value))?)
        })
}

/// Look up an option of a question by its value.
pub fn option_id(form: &Form, question: &QuestionId, value: &str) -> anyhow::Result<OptionId> {
    form.question(question)
        .and_then(|q| q.option_by_value(value))
        .map(|o| o.option_id)
        .ok_or_else(|| anyhow::anyhow!("question {question} has no option '{value}'"))
}
