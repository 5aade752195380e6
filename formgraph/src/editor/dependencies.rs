use tracing::debug;

use super::{FormEditor, find_option, find_option_mut, find_question, find_question_mut};
use crate::{
    DependencyCondition, EntityKind, Form, FormError, FormResult, OptionId, QuestionId, SectionId,
    guard,
};

fn remove_at(
    conditions: &mut Vec<DependencyCondition>,
    index: usize,
    container: String,
) -> FormResult<DependencyCondition> {
    if index >= conditions.len() {
        return Err(FormError::not_found(
            EntityKind::Dependency,
            format!("#{index}"),
            container,
        ));
    }
    Ok(conditions.remove(index))
}

impl FormEditor {
    /// Attach a condition to a question.
    ///
    /// The condition must test an earlier question of the form.
    pub fn add_question_dependency(
        &self,
        form: &Form,
        section_id: &SectionId,
        question_id: &QuestionId,
        condition: DependencyCondition,
    ) -> FormResult<Form> {
        find_question(form, section_id, question_id)?;
        guard::validate_condition(form, question_id, &condition)?;

        debug!(
            %question_id,
            on = %condition.question_id,
            kind = %condition.dependency_type,
            "adding question dependency"
        );
        let mut next = form.clone();
        find_question_mut(&mut next, section_id, question_id)?
            .dependencies
            .push(condition);
        Ok(self.commit(next, "add_question_dependency"))
    }

    /// Attach a condition to one option of a question.
    pub fn add_option_dependency(
        &self,
        form: &Form,
        section_id: &SectionId,
        question_id: &QuestionId,
        option_id: &OptionId,
        condition: DependencyCondition,
    ) -> FormResult<Form> {
        find_option(form, section_id, question_id, option_id)?;
        guard::validate_condition(form, question_id, &condition)?;

        debug!(
            %option_id,
            on = %condition.question_id,
            kind = %condition.dependency_type,
            "adding option dependency"
        );
        let mut next = form.clone();
        find_option_mut(&mut next, section_id, question_id, option_id)?
            .dependencies
            .push(condition);
        Ok(self.commit(next, "add_option_dependency"))
    }

    /// Detach the condition at `index` from a question.
    ///
    /// Removing the last condition of a dependent question keeps its
    /// `dependent_on` marker; the question can then be deleted.
    pub fn remove_question_dependency(
        &self,
        form: &Form,
        section_id: &SectionId,
        question_id: &QuestionId,
        index: usize,
    ) -> FormResult<Form> {
        let mut next = form.clone();
        let question = find_question_mut(&mut next, section_id, question_id)?;
        let container = format!("question '{}'", question.question_text);
        remove_at(&mut question.dependencies, index, container)?;
        Ok(self.commit(next, "remove_question_dependency"))
    }

    /// Detach the condition at `index` from an option.
    pub fn remove_option_dependency(
        &self,
        form: &Form,
        section_id: &SectionId,
        question_id: &QuestionId,
        option_id: &OptionId,
        index: usize,
    ) -> FormResult<Form> {
        let mut next = form.clone();
        let option = find_option_mut(&mut next, section_id, question_id, option_id)?;
        let container = format!("option '{}'", option.value);
        remove_at(&mut option.dependencies, index, container)?;
        Ok(self.commit(next, "remove_option_dependency"))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{QuestionType, ValueRange};

    struct Setup {
        editor: FormEditor,
        form: Form,
        section: SectionId,
        age: QuestionId,
        drink: QuestionId,
    }

    fn setup() -> Setup {
        let editor = FormEditor::new();
        let form = editor.add_section(&Form::new("Bar"));
        let section = form.sections[0].section_id;
        let form = editor.add_question(&form, &section, None).unwrap();
        let age = form.sections[0].questions[0].question_id;
        let form = editor
            .update_answer_type(&form, &section, &age, QuestionType::Integer)
            .unwrap();
        let form = editor.add_question(&form, &section, None).unwrap();
        let drink = form.sections[0].questions[1].question_id;
        let form = editor.add_option(&form, &section, &drink, Some("Beer")).unwrap();
        Setup {
            editor,
            form,
            section,
            age,
            drink,
        }
    }

    #[test]
    fn range_condition_on_numeric_question() {
        let s = setup();
        let adult = DependencyCondition::visibility(s.age, "").with_range(ValueRange::at_least(18.0));
        let form = s
            .editor
            .add_question_dependency(&s.form, &s.section, &s.drink, adult.clone())
            .unwrap();
        assert_eq!(form.question(&s.drink).unwrap().dependencies, vec![adult]);
    }

    #[test]
    fn inverted_range_is_rejected() {
        let s = setup();
        let condition =
            DependencyCondition::visibility(s.age, "").with_range(ValueRange::between(65.0, 18.0));
        let err = s
            .editor
            .add_question_dependency(&s.form, &s.section, &s.drink, condition)
            .unwrap_err();
        assert!(err.is_invalid_input());
    }

    #[test]
    fn question_cannot_depend_on_later_question() {
        let s = setup();
        let err = s
            .editor
            .add_question_dependency(
                &s.form,
                &s.section,
                &s.age,
                DependencyCondition::visibility(s.drink, "Beer"),
            )
            .unwrap_err();
        assert!(err.is_invalid_input());
        assert!(err.to_string().contains("earlier"));
    }

    #[test]
    fn option_dependency_round_trip() {
        let s = setup();
        let beer = s.form.question(&s.drink).unwrap().options[0].option_id;
        let condition =
            DependencyCondition::visibility(s.age, "").with_range(ValueRange::at_least(18.0));
        let form = s
            .editor
            .add_option_dependency(&s.form, &s.section, &s.drink, &beer, condition)
            .unwrap();
        assert!(form.question(&s.drink).unwrap().options[0].has_dependencies());

        let form = s
            .editor
            .remove_option_dependency(&form, &s.section, &s.drink, &beer, 0)
            .unwrap();
        assert!(!form.question(&s.drink).unwrap().options[0].has_dependencies());
    }

    #[test]
    fn removing_missing_index_is_not_found() {
        let s = setup();
        let err = s
            .editor
            .remove_question_dependency(&s.form, &s.section, &s.drink, 3)
            .unwrap_err();
        assert!(err.is_not_found());
    }
}
