use tracing::debug;

use super::{FormEditor, find_question, find_question_mut, find_section, find_section_mut};
use crate::{
    DependencyCondition, Form, FormError, FormResult, Question, QuestionId, QuestionType,
    ScaleLabels, ScaleRange, SectionId, guard, likert,
};

impl FormEditor {
    /// Append a question to a section.
    ///
    /// Without a dependency, the question gets the configured default text.
    /// With one, the condition is validated, the text is seeded from the
    /// parent's text behind the dependent prefix, and the question is marked
    /// as a dependent child of the parent.
    pub fn add_question(
        &self,
        form: &Form,
        section_id: &SectionId,
        dependency: Option<DependencyCondition>,
    ) -> FormResult<Form> {
        let section = find_section(form, section_id)?;
        let order = section.questions.len() as u32;
        let mut question = Question::new(*section_id, &self.config.default_question_text, order);

        if let Some(condition) = dependency {
            guard::validate_condition_at(form, None, (section.order, order), &condition)?;
            if let Some(parent) = form.question(&condition.question_id) {
                question.question_text =
                    format!("{} {}", self.config.dependent_prefix, parent.question_text);
            }
            question.dependent_on = Some(condition.question_id);
            question.dependencies.push(condition);
        }

        debug!(question_id = %question.question_id, %section_id, "adding question");
        let mut next = form.clone();
        find_section_mut(&mut next, section_id)?.questions.push(question);
        Ok(self.commit(next, "add_question"))
    }

    /// Change a question's prompt text.
    pub fn update_question_title(
        &self,
        form: &Form,
        section_id: &SectionId,
        question_id: &QuestionId,
        text: impl Into<String>,
    ) -> FormResult<Form> {
        let mut next = form.clone();
        find_question_mut(&mut next, section_id, question_id)?.question_text = text.into();
        Ok(self.commit(next, "update_question_title"))
    }

    /// Mark a question as required or optional.
    pub fn update_question_required(
        &self,
        form: &Form,
        section_id: &SectionId,
        question_id: &QuestionId,
        required: bool,
    ) -> FormResult<Form> {
        let mut next = form.clone();
        find_question_mut(&mut next, section_id, question_id)?.is_required = required;
        Ok(self.commit(next, "update_question_required"))
    }

    /// Change a question's type.
    ///
    /// Scalar types drop all options. `linear-scale` replaces the options
    /// with generated points and default Likert captions. `table` drops normal
    /// options. Switching between single- and multi-select keeps options.
    /// Blocked when options carrying or targeted by dependencies would be
    /// discarded.
    pub fn update_answer_type(
        &self,
        form: &Form,
        section_id: &SectionId,
        question_id: &QuestionId,
        new_type: QuestionType,
    ) -> FormResult<Form> {
        let (_, current) = find_question(form, section_id, question_id)?;
        if current.question_type == new_type {
            return Ok(self.commit(form.clone(), "update_answer_type"));
        }
        guard::check_type_change(form, question_id, new_type)?;

        let mut next = form.clone();
        let question = find_question_mut(&mut next, section_id, question_id)?;
        let previous = question.question_type;
        match new_type {
            QuestionType::LinearScale => {
                let range = question
                    .scale_range
                    .unwrap_or(self.config.default_scale_range);
                question.options = likert::scale_options(question.question_id, range);
                question.scale_range = Some(range);
                question.scale_labels = Some(likert::default_labels(range));
            }
            QuestionType::Table => {
                question.options.retain(|o| o.is_table());
                clear_scale(question);
            }
            QuestionType::SingleSelect | QuestionType::MultiSelect => {
                if guard::discards_options(previous, new_type) {
                    question.options.clear();
                }
                clear_scale(question);
            }
            QuestionType::Integer | QuestionType::Number | QuestionType::Text => {
                question.options.clear();
                clear_scale(question);
            }
        }
        question.question_type = new_type;
        debug!(%question_id, from = %previous, to = %new_type, "changed answer type");
        Ok(self.commit(next, "update_answer_type"))
    }

    /// Switch a linear-scale question between 5 and 10 points.
    ///
    /// The options are regenerated from scratch and relabelled, so any
    /// hand-edited points are discarded. Blocked while a condition still
    /// references one of the current points.
    pub fn update_scale_range(
        &self,
        form: &Form,
        section_id: &SectionId,
        question_id: &QuestionId,
        range: ScaleRange,
    ) -> FormResult<Form> {
        let (section, current) = find_question(form, section_id, question_id)?;
        if current.question_type != QuestionType::LinearScale {
            return Err(FormError::invalid_input(format!(
                "question '{}' is {}, not linear-scale",
                current.question_text, current.question_type
            )));
        }
        guard::check_options_discard(form, section, current)?;

        let mut next = form.clone();
        let question = find_question_mut(&mut next, section_id, question_id)?;
        question.options = likert::scale_options(question.question_id, range);
        question.scale_range = Some(range);
        question.scale_labels = Some(likert::default_labels(range));
        Ok(self.commit(next, "update_scale_range"))
    }

    /// Replace the start/end captions of a linear-scale question.
    pub fn update_scale_labels(
        &self,
        form: &Form,
        section_id: &SectionId,
        question_id: &QuestionId,
        labels: ScaleLabels,
    ) -> FormResult<Form> {
        let (_, current) = find_question(form, section_id, question_id)?;
        if current.question_type != QuestionType::LinearScale {
            return Err(FormError::invalid_input(format!(
                "question '{}' has no scale to label",
                current.question_text
            )));
        }
        let mut next = form.clone();
        find_question_mut(&mut next, section_id, question_id)?.scale_labels = Some(labels);
        Ok(self.commit(next, "update_scale_labels"))
    }

    /// Remove a question.
    ///
    /// Blocked while other questions or options test it (and, for dependent
    /// questions, while it still has dependencies of its own). After removal
    /// every remaining reference to it is stripped from the form.
    pub fn delete_question(
        &self,
        form: &Form,
        section_id: &SectionId,
        question_id: &QuestionId,
    ) -> FormResult<Form> {
        find_question(form, section_id, question_id)?;
        guard::check_question_delete(form, question_id)?;

        let mut next = form.clone();
        let section = find_section_mut(&mut next, section_id)?;
        section.questions.retain(|q| &q.question_id != question_id);
        section.reindex_questions();
        guard::strip_references(&mut next, question_id);
        Ok(self.commit(next, "delete_question"))
    }
}

fn clear_scale(question: &mut Question) {
    question.scale_range = None;
    question.scale_labels = None;
}
