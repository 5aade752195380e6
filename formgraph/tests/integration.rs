use formgraph::{
    Answer, DependencyCondition, DependencyType, EditorConfig, Form, FormEditor, FormError,
    FormStore, MemoryStore, OptionId, QuestionId, QuestionType, Responses, ScaleLabels,
    ScaleRange, SectionId, evaluate, guard,
};
use pretty_assertions::assert_eq;

fn option_values(form: &Form, question: &QuestionId) -> Vec<String> {
    form.question(question)
        .unwrap()
        .options
        .iter()
        .map(|o| o.value.clone())
        .collect()
}

fn option_id(form: &Form, question: &QuestionId, value: &str) -> OptionId {
    form.question(question)
        .unwrap()
        .option_by_value(value)
        .unwrap()
        .option_id
}

/// A pet survey:
///
/// Section 0: "Do you have a pet?" (Yes/No), "Which animal?" (Cat/Dog/Fish)
///            shown after "Yes".
/// Section 1: "Favourite food?" (Kibble/Tuna) whose "Tuna" option is only
///            offered to cat owners.
struct Pets {
    editor: FormEditor,
    form: Form,
    home: SectionId,
    food_section: SectionId,
    has_pet: QuestionId,
    animal: QuestionId,
    food: QuestionId,
}

fn pets() -> Pets {
    let editor = FormEditor::new();
    let form = editor.add_section(&editor.add_section(&Form::new("Pets")));
    let home = form.sections[0].section_id;
    let food_section = form.sections[1].section_id;

    let form = editor.add_question(&form, &home, None).unwrap();
    let has_pet = form.sections[0].questions[0].question_id;
    let form = editor
        .update_question_title(&form, &home, &has_pet, "Do you have a pet?")
        .unwrap();
    let form = editor.add_option(&form, &home, &has_pet, Some("Yes")).unwrap();
    let form = editor.add_option(&form, &home, &has_pet, Some("No")).unwrap();

    let form = editor
        .add_question(
            &form,
            &home,
            Some(DependencyCondition::visibility(has_pet, "Yes")),
        )
        .unwrap();
    let animal = form.sections[0].questions[1].question_id;
    let form = ["Cat", "Dog", "Fish"].iter().fold(form, |form, value| {
        editor.add_option(&form, &home, &animal, Some(*value)).unwrap()
    });

    let form = editor.add_question(&form, &food_section, None).unwrap();
    let food = form.sections[1].questions[0].question_id;
    let form = editor
        .update_question_title(&form, &food_section, &food, "Favourite food?")
        .unwrap();
    let form = editor.add_option(&form, &food_section, &food, Some("Kibble")).unwrap();
    let form = editor.add_option(&form, &food_section, &food, Some("Tuna")).unwrap();
    let form = editor
        .add_question_dependency(
            &form,
            &food_section,
            &food,
            DependencyCondition::options(animal, "Cat", ["Tuna"]),
        )
        .unwrap();

    Pets {
        editor,
        form,
        home,
        food_section,
        has_pet,
        animal,
        food,
    }
}

#[test]
fn end_to_end_linear_scale_conversion() {
    let editor = FormEditor::new();
    let form = Form::new("Scenario");
    assert!(form.sections.is_empty());

    let form = editor.add_section(&form);
    assert_eq!(form.sections.len(), 1);
    assert_eq!(form.sections[0].section_title, "New Section");
    assert_eq!(form.sections[0].order, 0);
    let section = form.sections[0].section_id;

    let form = editor.add_question(&form, &section, None).unwrap();
    let question = form.sections[0].questions[0].question_id;
    assert_eq!(
        form.sections[0].questions[0].question_type,
        QuestionType::SingleSelect
    );
    assert!(form.sections[0].questions[0].options.is_empty());

    let form = editor.add_option(&form, &section, &question, Some("Yes")).unwrap();
    let form = editor.add_option(&form, &section, &question, Some("No")).unwrap();
    assert_eq!(option_values(&form, &question), ["Yes", "No"]);

    let form = editor
        .update_answer_type(&form, &section, &question, QuestionType::LinearScale)
        .unwrap();
    assert_eq!(option_values(&form, &question), ["1", "2", "3", "4", "5"]);
    assert_eq!(
        form.question(&question).unwrap().scale_labels,
        Some(ScaleLabels::new("Strongly Disagree", "Strongly Agree"))
    );
}

#[test]
fn no_dependencies_means_visible() {
    let responses = Responses::new();
    assert!(evaluate::should_display_question(None, &responses));
    assert!(evaluate::should_display_question(Some(&[]), &responses));
}

#[test]
fn visibility_conditions_must_all_hold() {
    let q1 = QuestionId::generate();
    let q2 = QuestionId::generate();
    let conditions = [
        DependencyCondition::visibility(q1, "A"),
        DependencyCondition::visibility(q2, "B"),
    ];

    let mixed = Responses::new()
        .with(q1, Answer::choice("A"))
        .with(q2, Answer::choice("X"));
    let both = Responses::new()
        .with(q1, Answer::choice("A"))
        .with(q2, Answer::choice("B"));

    assert!(!evaluate::should_display_question(Some(&conditions), &mixed));
    assert!(evaluate::should_display_question(Some(&conditions), &both));
}

#[test]
fn either_option_condition_reveals_the_option() {
    let p = pets();
    let tuna = option_id(&p.form, &p.food, "Tuna");
    let form = p
        .editor
        .add_option_dependency(
            &p.form,
            &p.food_section,
            &p.food,
            &tuna,
            DependencyCondition::visibility(p.has_pet, "No"),
        )
        .unwrap();
    let food = form.question(&p.food).unwrap();
    let shown = |r: &Responses| {
        evaluate::visible_options(food, r)
            .iter()
            .any(|o| o.option_id == tuna)
    };

    let cat = Responses::new().with(p.animal, Answer::choice("Cat"));
    let none = Responses::new().with(p.has_pet, Answer::choice("No"));
    let dog = Responses::new()
        .with(p.has_pet, Answer::choice("Yes"))
        .with(p.animal, Answer::choice("Dog"));

    assert!(shown(&cat));
    assert!(shown(&none));
    assert!(!shown(&dog));
}

#[test]
fn rename_propagates_to_target_options_only() {
    let p = pets();
    let tuna = option_id(&p.form, &p.food, "Tuna");
    let untouched = p.form.question(&p.animal).unwrap().dependencies.clone();

    let form = p
        .editor
        .update_option_value(&p.form, &p.food_section, &p.food, &tuna, "Salmon")
        .unwrap();

    let food = form.question(&p.food).unwrap();
    assert_eq!(food.dependencies[0].target_options, ["Salmon"]);
    assert_eq!(food.dependencies[0].expected_answer, "Cat");
    assert_eq!(form.question(&p.animal).unwrap().dependencies, untouched);
    assert_eq!(option_values(&form, &p.food), ["Kibble", "Salmon"]);
}

#[test]
fn guarded_delete_names_the_blocking_condition() {
    let p = pets();
    let tuna = option_id(&p.form, &p.food, "Tuna");

    let err = p
        .editor
        .delete_option(&p.form, &p.food_section, &p.food, &tuna)
        .unwrap_err();
    let FormError::IntegrityViolation { dependents, .. } = &err else {
        panic!("expected an integrity violation, got {err}");
    };
    assert_eq!(dependents.len(), 1);
    assert_eq!(dependents[0].question_id, p.food);
    assert_eq!(dependents[0].dependency_type, DependencyType::Options);
}

#[test]
fn option_named_as_expected_answer_cannot_be_deleted() {
    let p = pets();
    let yes = option_id(&p.form, &p.has_pet, "Yes");

    let err = p
        .editor
        .delete_option(&p.form, &p.home, &p.has_pet, &yes)
        .unwrap_err();
    assert!(err.is_integrity_violation());
    assert_eq!(err.dependents()[0].question_id, p.animal);
    assert_eq!(err.dependents()[0].dependency_type, DependencyType::Visibility);

    let no = option_id(&p.form, &p.has_pet, "No");
    let form = p
        .editor
        .delete_option(&p.form, &p.home, &p.has_pet, &no)
        .unwrap();
    assert!(guard::audit(&form).is_empty());
}

#[test]
fn type_change_cannot_strand_an_expected_answer() {
    let p = pets();
    let err = p
        .editor
        .update_answer_type(&p.form, &p.home, &p.has_pet, QuestionType::Integer)
        .unwrap_err();
    assert!(err.is_integrity_violation());
    assert_eq!(err.dependents()[0].question_id, p.animal);

    // Once the child stops testing "Yes" the change goes through.
    let form = p
        .editor
        .remove_question_dependency(&p.form, &p.home, &p.animal, 0)
        .unwrap();
    let form = p
        .editor
        .update_answer_type(&form, &p.home, &p.has_pet, QuestionType::Integer)
        .unwrap();
    assert!(form.question(&p.has_pet).unwrap().options.is_empty());
    assert!(guard::audit(&form).is_empty());
}

#[test]
fn successful_delete_strips_dangling_references() {
    let p = pets();
    // Detach everything that tests "Which animal?", then drop it.
    let form = p
        .editor
        .remove_question_dependency(&p.form, &p.food_section, &p.food, 0)
        .unwrap();
    let form = p
        .editor
        .remove_question_dependency(&form, &p.home, &p.animal, 0)
        .unwrap();
    let form = p.editor.delete_question(&form, &p.home, &p.animal).unwrap();

    assert!(form.question(&p.animal).is_none());
    assert_eq!(form.sections[0].questions.len(), 1);
    assert!(guard::audit(&form).is_empty());
}

#[test]
fn delete_cascade_clears_dependent_markers() {
    let p = pets();
    // The animal question still points at has_pet via dependent_on. Once
    // has_pet's inbound edges are gone, deleting it clears the marker.
    let form = p
        .editor
        .remove_question_dependency(&p.form, &p.home, &p.animal, 0)
        .unwrap();
    assert_eq!(form.question(&p.animal).unwrap().dependent_on, Some(p.has_pet));

    let form = p.editor.delete_question(&form, &p.home, &p.has_pet).unwrap();
    assert_eq!(form.question(&p.animal).unwrap().dependent_on, None);
    assert_eq!(form.question(&p.animal).unwrap().order, 0);
}

#[test]
fn referenced_question_lists_all_dependents() {
    let p = pets();
    let err = p
        .editor
        .delete_question(&p.form, &p.home, &p.animal)
        .unwrap_err();
    // Its own visibility condition, plus the food question that tests it.
    assert_eq!(err.dependents().len(), 2);
    assert!(err.to_string().contains("Favourite food?"));
}

#[test]
fn scale_range_regenerates_ten_options() {
    let editor = FormEditor::new();
    let form = editor.add_section(&Form::new("Scale"));
    let s = form.sections[0].section_id;
    let form = editor.add_question(&form, &s, None).unwrap();
    let q = form.sections[0].questions[0].question_id;
    let form = editor
        .update_answer_type(&form, &s, &q, QuestionType::LinearScale)
        .unwrap();
    let form = editor
        .update_scale_range(&form, &s, &q, ScaleRange::Ten)
        .unwrap();

    let expected: Vec<String> = (1..=10).map(|n| n.to_string()).collect();
    assert_eq!(option_values(&form, &q), expected);
    assert_eq!(form.question(&q).unwrap().scale_range, Some(ScaleRange::Ten));
}

#[test]
fn scale_range_change_is_blocked_by_dependents() {
    let editor = FormEditor::new();
    let form = editor.add_section(&Form::new("Scale"));
    let s = form.sections[0].section_id;
    let form = editor.add_question(&form, &s, None).unwrap();
    let q = form.sections[0].questions[0].question_id;
    let form = editor
        .update_answer_type(&form, &s, &q, QuestionType::LinearScale)
        .unwrap();
    let form = editor
        .add_question(&form, &s, Some(DependencyCondition::options(q, "5", ["5"])))
        .unwrap();

    let err = editor
        .update_scale_range(&form, &s, &q, ScaleRange::Ten)
        .unwrap_err();
    assert!(err.is_integrity_violation());
}

#[test]
fn section_zero_cannot_depend_on_section_one() {
    let p = pets();
    let condition = DependencyCondition::visibility(p.food, "Kibble");

    let err = guard::validate_condition(&p.form, &p.has_pet, &condition).unwrap_err();
    assert!(err.is_invalid_input());

    let err = p
        .editor
        .add_question_dependency(&p.form, &p.home, &p.has_pet, condition)
        .unwrap_err();
    assert!(err.is_invalid_input());
}

#[test]
fn cross_section_reference_blocks_section_delete() {
    let p = pets();
    let err = p.editor.delete_section(&p.form, &p.home).unwrap_err();
    assert_eq!(err.dependents()[0].question_id, p.food);

    let form = p.editor.delete_section(&p.form, &p.food_section).unwrap();
    assert_eq!(form.sections.len(), 1);
    assert!(guard::audit(&form).is_empty());
}

#[test]
fn type_change_blocked_while_options_are_referenced() {
    let p = pets();
    let err = p
        .editor
        .update_answer_type(&p.form, &p.food_section, &p.food, QuestionType::Text)
        .unwrap_err();
    assert!(err.is_integrity_violation());

    let form = p
        .editor
        .update_answer_type(&p.form, &p.food_section, &p.food, QuestionType::MultiSelect)
        .unwrap();
    assert_eq!(option_values(&form, &p.food), ["Kibble", "Tuna"]);
}

#[test]
fn answers_are_checked_against_their_question() {
    let p = pets();
    let mut responses = Responses::new();
    assert!(responses.record(&p.form, p.has_pet, Answer::choice("Yes")).is_ok());
    assert!(responses.record(&p.form, p.has_pet, Answer::choice("Maybe")).is_err());
    assert!(responses.record(&p.form, p.has_pet, 3).is_err());
    assert!(responses.record(&p.form, QuestionId::generate(), "x").is_err());
}

#[test]
fn configured_defaults_are_used() {
    let config = EditorConfig::from_toml(
        r#"
        default_section_title = "Part"
        default_question_text = "Untitled"
        dependent_prefix = "Follow-up:"
        default_scale_range = 10
        "#,
    )
    .unwrap();
    let editor = FormEditor::with_config(config);

    let form = editor.add_section(&Form::new("Custom"));
    let s = form.sections[0].section_id;
    let form = editor.add_question(&form, &s, None).unwrap();
    let q = form.sections[0].questions[0].question_id;
    let form = editor
        .add_question(&form, &s, Some(DependencyCondition::visibility(q, "x")))
        .unwrap();
    let form = editor
        .update_answer_type(&form, &s, &q, QuestionType::LinearScale)
        .unwrap();

    assert_eq!(form.sections[0].section_title, "Part");
    assert_eq!(form.sections[0].questions[0].question_text, "Untitled");
    assert_eq!(form.sections[0].questions[1].question_text, "Follow-up: Untitled");
    assert_eq!(form.question(&q).unwrap().options.len(), 10);
}

#[test]
fn persistence_is_an_explicit_step() {
    let p = pets();
    let mut store = MemoryStore::new();
    store.save(&p.form).unwrap();

    let edited = p
        .editor
        .update_section_title(&p.form, &p.home, "At home")
        .unwrap();
    assert_eq!(store.load(&p.form.form_id).unwrap(), p.form);

    store.save(&edited).unwrap();
    let loaded = store.load(&p.form.form_id).unwrap();
    assert_eq!(loaded.sections[0].section_title, "At home");
    assert_eq!(store.len(), 1);
}
