//! Decides what a respondent sees, given the answers so far.
//!
//! Question gating is conjunctive: every visibility condition on a question
//! must hold. Option gating is disjunctive: any one condition on an option
//! reveals it.

use crate::{DependencyCondition, Form, FormOption, Question, Responses, Section};

/// Check whether a question with these dependencies should be displayed.
///
/// Vacuously true without dependencies. Otherwise every condition of type
/// `visibility` must hold; `options` conditions do not gate questions.
pub fn should_display_question(
    dependencies: Option<&[DependencyCondition]>,
    responses: &Responses,
) -> bool {
    let Some(dependencies) = dependencies else {
        return true;
    };
    dependencies
        .iter()
        .filter(|condition| condition.is_visibility())
        .all(|condition| condition_holds(condition, responses))
}

/// Check whether `option` should be offered, given its dependencies.
///
/// Vacuously true without dependencies. Otherwise at least one condition
/// must hold; an `options` condition additionally requires the option's own
/// value to be among its target options.
pub fn should_display_option(
    option: &FormOption,
    responses: &Responses,
    dependencies: Option<&[DependencyCondition]>,
) -> bool {
    let Some(dependencies) = dependencies.filter(|d| !d.is_empty()) else {
        return true;
    };
    dependencies.iter().any(|condition| {
        condition_holds(condition, responses)
            && (!condition.is_options() || condition.targets(&option.value))
    })
}

/// Check a single condition against the recorded answers.
///
/// An unanswered question never satisfies a condition. When the condition
/// carries a range, the answer must be numeric and inside it, and a blank
/// expected answer means "any value in range".
pub fn condition_holds(condition: &DependencyCondition, responses: &Responses) -> bool {
    let Some(answer) = responses.get(&condition.question_id) else {
        return false;
    };
    match &condition.range {
        Some(range) => {
            let in_range = answer.as_number().is_some_and(|n| range.contains(n));
            in_range
                && (condition.expected_answer.is_empty()
                    || answer.matches_expected(&condition.expected_answer))
        }
        None => answer.matches_expected(&condition.expected_answer),
    }
}

/// Questions of a section the respondent should see.
///
/// Everything in the introduction section is shown ungated.
pub fn visible_questions<'a>(section: &'a Section, responses: &Responses) -> Vec<&'a Question> {
    if section.is_introduction() {
        return section.questions.iter().collect();
    }
    section
        .questions
        .iter()
        .filter(|question| should_display_question(Some(&question.dependencies), responses))
        .collect()
}

/// Options of a question the respondent should be offered.
///
/// An option is gated by its own conditions together with the question's
/// `options` conditions that target it; any one of them reveals it.
pub fn visible_options<'a>(question: &'a Question, responses: &Responses) -> Vec<&'a FormOption> {
    question
        .options
        .iter()
        .filter(|option| {
            let gates: Vec<DependencyCondition> = question
                .dependencies
                .iter()
                .filter(|c| c.is_options() && c.targets(&option.value))
                .chain(&option.dependencies)
                .cloned()
                .collect();
            should_display_option(option, responses, Some(&gates))
        })
        .collect()
}

/// Sections the respondent should see, in form order.
///
/// The introduction section is always shown. Any other section is shown when
/// at least one of its questions is visible.
pub fn visible_sections<'a>(form: &'a Form, responses: &Responses) -> Vec<&'a Section> {
    form.sections
        .iter()
        .filter(|section| {
            section.is_introduction() || !visible_questions(section, responses).is_empty()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Answer, DependencyCondition, QuestionId, ValueRange};

    #[test]
    fn no_dependencies_is_always_visible() {
        let responses = Responses::new();
        assert!(should_display_question(None, &responses));
        assert!(should_display_question(Some(&[]), &responses));
    }

    #[test]
    fn visibility_conditions_are_conjunctive() {
        let q1 = QuestionId::generate();
        let q2 = QuestionId::generate();
        let conditions = [
            DependencyCondition::visibility(q1, "A"),
            DependencyCondition::visibility(q2, "B"),
        ];

        let partial = Responses::new()
            .with(q1, Answer::choice("A"))
            .with(q2, Answer::choice("X"));
        assert!(!should_display_question(Some(&conditions), &partial));

        let full = Responses::new()
            .with(q1, Answer::choice("A"))
            .with(q2, Answer::choice("B"));
        assert!(should_display_question(Some(&conditions), &full));
    }

    #[test]
    fn options_conditions_do_not_gate_questions() {
        let q1 = QuestionId::generate();
        let conditions = [DependencyCondition::options(q1, "Yes", ["A"])];
        assert!(should_display_question(Some(&conditions), &Responses::new()));
    }

    #[test]
    fn unanswered_question_fails_condition() {
        let q1 = QuestionId::generate();
        let conditions = [DependencyCondition::visibility(q1, "Yes")];
        assert!(!should_display_question(Some(&conditions), &Responses::new()));
    }

    #[test]
    fn option_conditions_are_disjunctive() {
        let q1 = QuestionId::generate();
        let q2 = QuestionId::generate();
        let option = FormOption::normal(QuestionId::generate(), "Vegan menu");
        let conditions = [
            DependencyCondition::visibility(q1, "Vegan"),
            DependencyCondition::visibility(q2, "Yes"),
        ];

        let first = Responses::new().with(q1, Answer::choice("Vegan"));
        let second = Responses::new().with(q2, Answer::choice("Yes"));
        let neither = Responses::new().with(q1, Answer::choice("Omnivore"));

        assert!(should_display_option(&option, &first, Some(&conditions)));
        assert!(should_display_option(&option, &second, Some(&conditions)));
        assert!(!should_display_option(&option, &neither, Some(&conditions)));
    }

    #[test]
    fn options_condition_requires_target_membership() {
        let q1 = QuestionId::generate();
        let owner = QuestionId::generate();
        let listed = FormOption::normal(owner, "Red");
        let unlisted = FormOption::normal(owner, "Blue");
        let conditions = [DependencyCondition::options(q1, "Colour", ["Red"])];
        let responses = Responses::new().with(q1, Answer::choice("Colour"));

        assert!(should_display_option(&listed, &responses, Some(&conditions)));
        assert!(!should_display_option(&unlisted, &responses, Some(&conditions)));
    }

    #[test]
    fn question_level_options_condition_gates_its_targets() {
        let colour = QuestionId::generate();
        let mut shade = Question::new(crate::SectionId::generate(), "Which shade?", 1);
        shade.options.push(FormOption::normal(shade.question_id, "Crimson"));
        shade.options.push(FormOption::normal(shade.question_id, "Navy"));
        shade
            .dependencies
            .push(DependencyCondition::options(colour, "Red", ["Crimson"]));

        let offered = |responses: &Responses| -> Vec<String> {
            visible_options(&shade, responses)
                .into_iter()
                .map(|o| o.value.clone())
                .collect()
        };
        assert_eq!(offered(&Responses::new()), ["Navy"]);
        assert_eq!(
            offered(&Responses::new().with(colour, Answer::choice("Red"))),
            ["Crimson", "Navy"]
        );
    }

    #[test]
    fn range_gates_numeric_answers() {
        let age = QuestionId::generate();
        let condition =
            DependencyCondition::visibility(age, "").with_range(ValueRange::between(18.0, 65.0));

        let adult = Responses::new().with(age, 30);
        let minor = Responses::new().with(age, 12);
        let text = Responses::new().with(age, "30");

        assert!(condition_holds(&condition, &adult));
        assert!(!condition_holds(&condition, &minor));
        assert!(!condition_holds(&condition, &text));
    }

    #[test]
    fn range_with_expected_answer_needs_both() {
        let score = QuestionId::generate();
        let condition =
            DependencyCondition::visibility(score, "3").with_range(ValueRange::at_least(2.0));

        assert!(condition_holds(&condition, &Responses::new().with(score, Answer::Scale(3))));
        assert!(!condition_holds(&condition, &Responses::new().with(score, Answer::Scale(4))));
    }
}
