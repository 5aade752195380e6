//! Integrity checks run before destructive edits.
//!
//! Every check walks the whole form and collects *all* offending
//! dependencies before failing, so callers can present one complete
//! remediation list instead of the first conflict found.

use std::collections::HashSet;
use std::fmt;

use tracing::debug;

use crate::{
    DependencyCondition, DependentRef, EntityKind, Form, FormError, FormOption, FormResult,
    OptionId, Question, QuestionId, QuestionType, Section, SectionId,
};

/// A dependency condition together with the entities that own it.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Edge<'a> {
    pub section: &'a Section,
    pub question: &'a Question,
    pub option: Option<&'a FormOption>,
    pub condition: &'a DependencyCondition,
}

impl Edge<'_> {
    pub fn dependent(&self) -> DependentRef {
        DependentRef::new(
            self.section,
            self.question,
            self.option,
            self.condition.dependency_type,
        )
    }

    /// Evaluation position of the owner.
    pub fn position(&self) -> (u32, u32) {
        (self.section.order, self.question.order)
    }

    /// Owner and tested question, which identify the edge across reorderings.
    fn key(&self) -> (QuestionId, Option<OptionId>, QuestionId) {
        (
            self.question.question_id,
            self.option.map(|o| o.option_id),
            self.condition.question_id,
        )
    }

    fn owned_by_option(&self, option_id: &OptionId) -> bool {
        self.option.is_some_and(|o| &o.option_id == option_id)
    }
}

/// Iterate over every dependency condition in the form, with its owners.
pub(crate) fn edges(form: &Form) -> impl Iterator<Item = Edge<'_>> {
    form.sections.iter().flat_map(|section| {
        section.questions.iter().flat_map(move |question| {
            let own = question.dependencies.iter().map(move |condition| Edge {
                section,
                question,
                option: None,
                condition,
            });
            let via_options = question.options.iter().flat_map(move |option| {
                option.dependencies.iter().map(move |condition| Edge {
                    section,
                    question,
                    option: Some(option),
                    condition,
                })
            });
            own.chain(via_options)
        })
    })
}

fn blocked(target: String, dependents: Vec<DependentRef>) -> FormResult<()> {
    if dependents.is_empty() {
        return Ok(());
    }
    debug!(%target, dependents = dependents.len(), "edit blocked by dependency guard");
    Err(FormError::integrity(target, dependents))
}

fn form_container(form: &Form) -> String {
    format!("form '{}'", form.form_title)
}

/// Dependents that would be orphaned if `option` disappeared.
///
/// Conditions attached to the option itself go away with it and are not counted.
fn option_dependents(form: &Form, question: &Question, option: &FormOption) -> Vec<DependentRef> {
    if option.is_table() {
        let labels = option.labels();
        return edges(form)
            .filter(|edge| !edge.owned_by_option(&option.option_id))
            .filter(|edge| edge.condition.question_id == question.question_id)
            .filter(|edge| labels.iter().any(|label| names_label(edge.condition, label)))
            .map(|edge| edge.dependent())
            .collect();
    }
    edges(form)
        .filter(|edge| !edge.owned_by_option(&option.option_id))
        .filter(|edge| {
            let condition = edge.condition;
            (condition.is_options() && condition.targets(&option.value))
                || condition.trigger_option_id == Some(option.option_id)
                || expects_value(condition, question, &option.value)
        })
        .map(|edge| edge.dependent())
        .collect()
}

/// Whether `condition` waits for `question` to be answered with `value`.
fn expects_value(condition: &DependencyCondition, question: &Question, value: &str) -> bool {
    condition.question_id == question.question_id && condition.expected_answer == value
}

fn names_label(condition: &DependencyCondition, label: &str) -> bool {
    condition.expected_answer == label || condition.targets(label)
}

/// Check that no condition in the form still names this option.
///
/// An option is named when an `options` condition targets its value, when a
/// condition uses it as trigger, or when a condition testing its question
/// expects its value as the answer.
pub fn check_option_delete(form: &Form, option_id: &OptionId) -> FormResult<()> {
    let (_, question, option) = form
        .locate_option(option_id)
        .ok_or_else(|| FormError::not_found(EntityKind::Option, option_id, form_container(form)))?;

    blocked(
        format!(
            "option '{}' of question '{}'",
            option.value, question.question_text
        ),
        option_dependents(form, question, option),
    )
}

/// Check that a question can be removed without orphaning dependencies.
///
/// Any question is blocked while another question or option tests its
/// answer. A dependent question (one with `dependent_on` set) is also
/// blocked while its own dependency list is non-empty.
pub fn check_question_delete(form: &Form, question_id: &QuestionId) -> FormResult<()> {
    let (section, question) = form.locate_question(question_id).ok_or_else(|| {
        FormError::not_found(EntityKind::Question, question_id, form_container(form))
    })?;

    let mut dependents = Vec::new();
    if question.is_dependent() {
        dependents.extend(question.dependencies.iter().map(|condition| {
            DependentRef::new(section, question, None, condition.dependency_type)
        }));
    }
    dependents.extend(
        edges(form)
            .filter(|edge| &edge.question.question_id != question_id)
            .filter(|edge| &edge.condition.question_id == question_id)
            .map(|edge| edge.dependent()),
    );

    blocked(format!("question '{}'", question.question_text), dependents)
}

/// Check that no question outside the section tests a question inside it.
pub fn check_section_delete(form: &Form, section_id: &SectionId) -> FormResult<()> {
    let section = form.section(section_id).ok_or_else(|| {
        FormError::not_found(EntityKind::Section, section_id, form_container(form))
    })?;
    let inside: HashSet<QuestionId> = section.questions.iter().map(|q| q.question_id).collect();

    let dependents = edges(form)
        .filter(|edge| &edge.section.section_id != section_id)
        .filter(|edge| inside.contains(&edge.condition.question_id))
        .map(|edge| edge.dependent())
        .collect();

    blocked(format!("section '{}'", section.section_title), dependents)
}

/// Check whether switching from `from` to `to` throws the current options away.
pub fn discards_options(from: QuestionType, to: QuestionType) -> bool {
    if from == to {
        return false;
    }
    match to {
        QuestionType::Integer | QuestionType::Number | QuestionType::Text => true,
        QuestionType::LinearScale | QuestionType::Table => true,
        QuestionType::SingleSelect | QuestionType::MultiSelect => from == QuestionType::Table,
    }
}

/// Check that a question's type can change to `new_type`.
///
/// Fails when the change discards options that carry dependencies or that
/// other conditions still reference, by value or by id.
pub fn check_type_change(
    form: &Form,
    question_id: &QuestionId,
    new_type: QuestionType,
) -> FormResult<()> {
    let (section, question) = form.locate_question(question_id).ok_or_else(|| {
        FormError::not_found(EntityKind::Question, question_id, form_container(form))
    })?;
    if !discards_options(question.question_type, new_type) {
        return Ok(());
    }
    check_options_discard(form, section, question)
}

/// Check that every option of `question` may be thrown away.
pub(crate) fn check_options_discard(
    form: &Form,
    section: &Section,
    question: &Question,
) -> FormResult<()> {
    let mut dependents = Vec::new();
    for option in &question.options {
        dependents.extend(
            option
                .dependencies
                .iter()
                .map(|c| DependentRef::new(section, question, Some(option), c.dependency_type)),
        );
        dependents.extend(option_dependents(form, question, option));
    }
    blocked(
        format!("the options of question '{}'", question.question_text),
        dependents,
    )
}

/// Check that no condition testing a table question names `label`.
///
/// Used before removing a column or row from one of its table options.
pub fn check_table_label(form: &Form, question_id: &QuestionId, label: &str) -> FormResult<()> {
    let question = form.question(question_id).ok_or_else(|| {
        FormError::not_found(EntityKind::Question, question_id, form_container(form))
    })?;
    let dependents = edges(form)
        .filter(|edge| &edge.condition.question_id == question_id)
        .filter(|edge| names_label(edge.condition, label))
        .map(|edge| edge.dependent())
        .collect();
    blocked(
        format!("'{label}' of table question '{}'", question.question_text),
        dependents,
    )
}

/// Validate a condition about to be attached to `owner` (or one of its options).
pub fn validate_condition(
    form: &Form,
    owner: &QuestionId,
    condition: &DependencyCondition,
) -> FormResult<()> {
    let position = form.question_position(owner).ok_or_else(|| {
        FormError::not_found(EntityKind::Question, owner, form_container(form))
    })?;
    validate_condition_at(form, Some(owner), position, condition)
}

/// Validate a condition for an owner at `position`, which may not exist yet.
pub(crate) fn validate_condition_at(
    form: &Form,
    owner: Option<&QuestionId>,
    position: (u32, u32),
    condition: &DependencyCondition,
) -> FormResult<()> {
    let (section, referenced) = form
        .locate_question(&condition.question_id)
        .ok_or_else(|| {
            FormError::not_found(
                EntityKind::Question,
                condition.question_id,
                form_container(form),
            )
        })?;

    if owner == Some(&condition.question_id) {
        return Err(FormError::invalid_input(format!(
            "question '{}' cannot depend on itself",
            referenced.question_text
        )));
    }
    if (section.order, referenced.order) >= position {
        return Err(FormError::invalid_input(format!(
            "question '{}' does not come before its dependent; conditions may only test earlier questions",
            referenced.question_text
        )));
    }
    if let Some(section_id) = condition.section_id
        && section_id != section.section_id
    {
        return Err(FormError::invalid_input(format!(
            "question '{}' is not in section {section_id}",
            referenced.question_text
        )));
    }
    if let Some(trigger) = condition.trigger_option_id
        && referenced.option(&trigger).is_none()
    {
        return Err(FormError::not_found(
            EntityKind::Option,
            trigger,
            format!("question '{}'", referenced.question_text),
        ));
    }
    if condition.is_options()
        && condition.target_options.is_empty()
        && condition.trigger_option_id.is_none()
    {
        return Err(FormError::invalid_input(
            "an options dependency must name target options or a trigger option",
        ));
    }
    match &condition.range {
        Some(range) => {
            if !referenced.question_type.is_numeric() {
                return Err(FormError::invalid_input(format!(
                    "a range needs a numeric question, but '{}' is {}",
                    referenced.question_text, referenced.question_type
                )));
            }
            if !range.is_well_formed() {
                return Err(FormError::invalid_input("range minimum exceeds its maximum"));
            }
        }
        None if condition.expected_answer.is_empty() => {
            return Err(FormError::invalid_input("expected answer must not be empty"));
        }
        None => {}
    }
    Ok(())
}

fn forward_edges(form: &Form) -> impl Iterator<Item = Edge<'_>> {
    edges(form)
        .filter(|edge| edge.condition.question_id != edge.question.question_id)
        .filter(|edge| {
            form.question_position(&edge.condition.question_id)
                .is_some_and(|referenced| referenced > edge.position())
        })
}

/// Conditions testing a question that comes later than their owner.
pub fn forward_references(form: &Form) -> Vec<DependentRef> {
    forward_edges(form).map(|edge| edge.dependent()).collect()
}

/// Forward references in `after` that `before` did not already have.
///
/// A reordering edit is judged only by what it breaks, so a document loaded
/// with an unrelated forward reference can still be rearranged.
pub fn introduced_forward_references(before: &Form, after: &Form) -> Vec<DependentRef> {
    let existing: HashSet<_> = forward_edges(before).map(|edge| edge.key()).collect();
    forward_edges(after)
        .filter(|edge| !existing.contains(&edge.key()))
        .map(|edge| edge.dependent())
        .collect()
}

/// Remove every condition testing `question_id` and clear matching `dependent_on` markers.
///
/// Returns the number of conditions removed.
pub fn strip_references(form: &mut Form, question_id: &QuestionId) -> usize {
    let mut removed = 0;
    for question in form.sections.iter_mut().flat_map(|s| s.questions.iter_mut()) {
        let before = question.dependencies.len();
        question
            .dependencies
            .retain(|c| &c.question_id != question_id);
        removed += before - question.dependencies.len();

        for option in &mut question.options {
            let before = option.dependencies.len();
            option.dependencies.retain(|c| &c.question_id != question_id);
            removed += before - option.dependencies.len();
        }

        if question.dependent_on.as_ref() == Some(question_id) {
            question.dependent_on = None;
        }
    }
    if removed > 0 {
        debug!(%question_id, removed, "stripped stale dependency references");
    }
    removed
}

/// A structural problem found by [`audit`].
#[derive(Debug, Clone, PartialEq)]
pub enum AuditIssue {
    /// A condition tests a question that does not exist.
    DanglingReference {
        dependent: DependentRef,
        missing: QuestionId,
    },

    /// A condition names a trigger option the tested question does not have.
    DanglingTrigger {
        dependent: DependentRef,
        trigger: OptionId,
    },

    /// A condition tests the question it is attached to.
    SelfReference { dependent: DependentRef },

    /// A condition tests a question that comes later in evaluation order.
    ForwardReference {
        dependent: DependentRef,
        referenced: QuestionId,
    },

    /// A condition expects an answer that none of the tested question's options offer.
    UnreachableAnswer {
        dependent: DependentRef,
        referenced: QuestionId,
        expected: String,
    },

    /// A `dependent_on` marker names a question that does not exist.
    DanglingParent {
        question_id: QuestionId,
        parent: QuestionId,
    },
}

impl fmt::Display for AuditIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DanglingReference { dependent, missing } => {
                write!(f, "{dependent} tests missing question {missing}")
            }
            Self::DanglingTrigger { dependent, trigger } => {
                write!(f, "{dependent} names missing trigger option {trigger}")
            }
            Self::SelfReference { dependent } => write!(f, "{dependent} tests itself"),
            Self::ForwardReference {
                dependent,
                referenced,
            } => write!(f, "{dependent} tests later question {referenced}"),
            Self::UnreachableAnswer {
                dependent,
                referenced,
                expected,
            } => write!(
                f,
                "{dependent} expects '{expected}', which question {referenced} does not offer"
            ),
            Self::DanglingParent {
                question_id,
                parent,
            } => write!(f, "question {question_id} is marked dependent on missing question {parent}"),
        }
    }
}

/// Check a whole document for references the guards would have prevented.
///
/// Useful for documents that arrive from storage rather than from the editor.
pub fn audit(form: &Form) -> Vec<AuditIssue> {
    let mut issues = Vec::new();

    for edge in edges(form) {
        let condition = edge.condition;
        if condition.question_id == edge.question.question_id {
            issues.push(AuditIssue::SelfReference {
                dependent: edge.dependent(),
            });
            continue;
        }
        let Some((section, referenced)) = form.locate_question(&condition.question_id) else {
            issues.push(AuditIssue::DanglingReference {
                dependent: edge.dependent(),
                missing: condition.question_id,
            });
            continue;
        };
        if (section.order, referenced.order) > edge.position() {
            issues.push(AuditIssue::ForwardReference {
                dependent: edge.dependent(),
                referenced: condition.question_id,
            });
        }
        if let Some(trigger) = condition.trigger_option_id
            && referenced.option(&trigger).is_none()
        {
            issues.push(AuditIssue::DanglingTrigger {
                dependent: edge.dependent(),
                trigger,
            });
        }
        if offers_no_such_answer(referenced, condition) {
            issues.push(AuditIssue::UnreachableAnswer {
                dependent: edge.dependent(),
                referenced: condition.question_id,
                expected: condition.expected_answer.clone(),
            });
        }
    }

    for question in form.questions() {
        if let Some(parent) = question.dependent_on
            && form.question(&parent).is_none()
        {
            issues.push(AuditIssue::DanglingParent {
                question_id: question.question_id,
                parent,
            });
        }
    }

    issues
}

/// Select and scale answers can only be one of the question's option values.
fn offers_no_such_answer(referenced: &Question, condition: &DependencyCondition) -> bool {
    let fixed_answers =
        referenced.question_type.is_choice() || referenced.question_type == QuestionType::LinearScale;
    fixed_answers
        && condition.range.is_none()
        && referenced.option_by_value(&condition.expected_answer).is_none()
}
