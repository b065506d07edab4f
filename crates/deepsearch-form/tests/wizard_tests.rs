use std::cell::RefCell;
use std::rc::Rc;

use deepsearch_form::{
    Advance, AnswerBag, AnswerValue, ChoiceOption, Condition, FieldKind, FieldSpec,
    LocationSelection, LocationSource, RangeValue, StepSpec, StepTitle, WizardController,
    WizardEvent, property_search_form,
};

fn indiranagar() -> AnswerValue {
    AnswerValue::Location(LocationSelection {
        lat: 12.9719,
        lng: 77.6412,
        address: "Indiranagar, Bengaluru".into(),
        source: LocationSource::Suggestion,
    })
}

fn step_ids(wizard: &WizardController) -> Vec<String> {
    wizard
        .visible_steps()
        .into_iter()
        .map(|step| step.id.clone())
        .collect()
}

fn recorder(wizard: &mut WizardController) -> Rc<RefCell<Vec<WizardEvent>>> {
    let events = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&events);
    wizard.subscribe(move |event| sink.borrow_mut().push(event.clone()));
    events
}

#[test]
fn location_step_needs_a_resolved_location() {
    let mut wizard = WizardController::new(property_search_form());
    assert_eq!(wizard.current_step().map(|step| step.id.as_str()), Some("location"));
    assert!(!wizard.can_advance());
    assert_eq!(wizard.advance(), Advance::Blocked);

    wizard.set_answer("location", AnswerValue::Text("Indiranagar".into()));
    let validation = wizard.validation();
    assert!(!validation.complete);
    assert_eq!(validation.errors[0].code, "unresolved_location");

    wizard.commit_selection("location", indiranagar());
    assert!(wizard.can_advance());
    assert_eq!(wizard.advance(), Advance::Moved(1));
    assert_eq!(wizard.current_step().map(|step| step.id.as_str()), Some("propertyType"));
}

#[test]
fn property_type_drives_which_steps_are_visible() {
    let mut wizard = WizardController::new(property_search_form());
    assert_eq!(
        step_ids(&wizard),
        vec!["location", "propertyType", "budget", "projectType", "developer"]
    );

    wizard.toggle_choice("propertyType", "plot");
    assert_eq!(
        step_ids(&wizard),
        vec!["location", "propertyType", "plotSize", "budget", "projectType", "developer"]
    );

    wizard.toggle_choice("propertyType", "villament");
    assert!(step_ids(&wizard).contains(&"configuration".to_string()));
    assert_eq!(step_ids(&wizard).len(), 7);
}

#[test]
fn visible_steps_keep_declaration_order_and_are_repeatable() {
    let spec = property_search_form();
    let declared: Vec<&str> = spec.steps.iter().map(|step| step.id.as_str()).collect();
    let answers = AnswerBag::new()
        .with("propertyType", AnswerValue::choices(["rowHouses", "plot"]))
        .with("budget", AnswerValue::Range(RangeValue::new(0.0, 1e6)));

    let first: Vec<&str> = deepsearch_form::visible_steps(&spec, &answers)
        .into_iter()
        .map(|step| step.id.as_str())
        .collect();
    let second: Vec<&str> = deepsearch_form::visible_steps(&spec, &answers)
        .into_iter()
        .map(|step| step.id.as_str())
        .collect();

    assert_eq!(first, second);
    let positions: Vec<usize> = first
        .iter()
        .map(|id| declared.iter().position(|declared| declared == id).unwrap())
        .collect();
    assert!(positions.windows(2).all(|pair| pair[0] < pair[1]));
}

#[test]
fn step_index_is_clamped_when_visible_steps_shrink() {
    let answers = AnswerBag::new()
        .with("location", indiranagar())
        .with("propertyType", AnswerValue::choices(["plot", "apartment"]))
        .with("plotSize", AnswerValue::Range(RangeValue::new(0.0, 10_000.0)))
        .with("configuration", AnswerValue::choices(["2bhk"]))
        .with("budget", AnswerValue::Range(RangeValue::new(1e6, 5e6)))
        .with("projectType", AnswerValue::choices(["readyToMove"]));
    let mut wizard = WizardController::with_answers(property_search_form(), answers);
    for expected in 1..=6 {
        assert_eq!(wizard.advance(), Advance::Moved(expected));
    }
    assert!(wizard.is_last_step());

    let events = recorder(&mut wizard);
    wizard.clear_answer("propertyType");

    assert_eq!(wizard.visible_steps().len(), 5);
    assert_eq!(wizard.step_index(), 4);
    assert_eq!(wizard.current_step().map(|step| step.id.as_str()), Some("developer"));
    assert!(events.borrow().contains(&WizardEvent::StepChanged(4)));
}

#[test]
fn possession_is_required_only_for_under_construction() {
    let spec = property_search_form();
    let step = spec.step("projectType").unwrap();

    let under_construction =
        AnswerBag::new().with("projectType", AnswerValue::choices(["underConstruction"]));
    let validation = deepsearch_form::check_step(step, &under_construction);
    assert!(!validation.complete);
    assert_eq!(validation.missing_required, vec!["possessionBy".to_string()]);

    let with_possession =
        under_construction.with("possessionBy", AnswerValue::Choice("within1yr".into()));
    assert!(deepsearch_form::is_step_complete(step, &with_possession));

    let ready = AnswerBag::new().with("projectType", AnswerValue::choices(["readyToMove"]));
    assert!(deepsearch_form::is_step_complete(step, &ready));
}

#[test]
fn possession_field_appears_once_a_project_type_is_chosen() {
    let spec = property_search_form();
    let step = spec.step("projectType").unwrap();
    let names = |answers: &AnswerBag| -> Vec<String> {
        deepsearch_form::visible_fields(step, answers)
            .into_iter()
            .map(|field| field.name.clone())
            .collect()
    };

    assert_eq!(names(&AnswerBag::new()), vec!["projectType"]);
    let chosen = AnswerBag::new().with("projectType", AnswerValue::choices(["preLaunch"]));
    assert_eq!(names(&chosen), vec!["projectType", "possessionBy"]);
}

#[test]
fn conditional_requirement_is_waived_while_its_field_is_hidden() {
    let choices = || FieldKind::MultiSelect {
        options: vec![ChoiceOption::new("x", "X"), ChoiceOption::new("y", "Y")],
        searchable: false,
    };
    let step = StepSpec::new(
        "details",
        StepTitle::Text("Details".into()),
        vec![
            FieldSpec::new("kind", "Kind", choices()).required(),
            FieldSpec::new("extra", "Extra", choices())
                .visible_if(Condition::includes("kind", "y")),
        ],
    )
    .require_when("extra", Condition::includes("kind", "x"));

    let answers = AnswerBag::new().with("kind", AnswerValue::choices(["x"]));
    let validation = deepsearch_form::check_step(&step, &answers);
    assert!(validation.complete);
    assert!(validation.missing_required.is_empty());

    let both = AnswerBag::new().with("kind", AnswerValue::choices(["x", "y"]));
    let validation = deepsearch_form::check_step(&step, &both);
    assert_eq!(validation.missing_required, vec!["extra".to_string()]);
}

#[test]
fn range_needs_both_bounds_in_order() {
    let spec = property_search_form();
    let step = spec.step("budget").unwrap();

    let half = spec.parse_answers(&serde_json::json!({ "budget": { "min": 2500000 } }));
    let validation = deepsearch_form::check_step(step, &half);
    assert!(!validation.complete);
    assert_eq!(validation.missing_required, vec!["budget".to_string()]);

    let full =
        spec.parse_answers(&serde_json::json!({ "budget": { "min": 2500000, "max": 31000000 } }));
    assert!(deepsearch_form::is_step_complete(step, &full));

    let inverted = AnswerBag::new().with("budget", AnswerValue::Range(RangeValue::new(5e6, 1e6)));
    let validation = deepsearch_form::check_step(step, &inverted);
    assert!(!validation.complete);
    assert!(validation.missing_required.is_empty());
    assert_eq!(validation.errors[0].code, "range_inverted");
}

#[test]
fn range_editing_keeps_max_at_or_above_min() {
    let mut wizard = WizardController::new(property_search_form());
    wizard.set_range_min("budget", Some(2_000_000.0));
    assert_eq!(
        wizard.answers().get("budget").and_then(AnswerValue::as_range),
        Some(&RangeValue::new(2_000_000.0, 50_000_000.0))
    );

    wizard.set_range_max("budget", Some(1_000_000.0));
    assert_eq!(
        wizard.answers().get("budget").and_then(AnswerValue::as_range),
        Some(&RangeValue::new(2_000_000.0, 2_000_000.0))
    );

    wizard.set_range_min("budget", None);
    assert_eq!(
        wizard
            .answers()
            .get("budget")
            .and_then(AnswerValue::as_range)
            .and_then(|range| range.min),
        Some(0.0)
    );

    wizard.set_range_min("developer", Some(5.0));
    assert!(!wizard.answers().contains("developer"));
}

#[test]
fn configuration_title_echoes_property_types() {
    let answers = AnswerBag::new()
        .with("location", indiranagar())
        .with("propertyType", AnswerValue::choices(["apartment", "villa"]));
    let mut wizard = WizardController::with_answers(property_search_form(), answers);
    wizard.advance();
    wizard.advance();

    assert_eq!(wizard.current_step().map(|step| step.id.as_str()), Some("configuration"));
    assert_eq!(
        wizard.current_title(),
        "Perfect. Which specific configurations do you have in mind for your Apartment, Villa?"
    );

    wizard.toggle_choice("propertyType", "villa");
    assert_eq!(
        wizard.current_title(),
        "Perfect. Which specific configurations do you have in mind for your Apartment?"
    );
}

#[test]
fn progress_tracks_position_in_visible_steps() {
    let mut wizard = WizardController::with_answers(
        property_search_form(),
        AnswerBag::new().with("location", indiranagar()),
    );
    assert_eq!(wizard.progress_percent(), 0.0);
    wizard.advance();
    assert_eq!(wizard.progress_percent(), 25.0);
}

#[test]
fn skip_moves_past_optional_steps_but_not_the_last() {
    let answers = AnswerBag::new()
        .with("location", indiranagar())
        .with("propertyType", AnswerValue::choices(["plot"]));
    let mut wizard = WizardController::with_answers(property_search_form(), answers);
    assert!(!wizard.can_skip());
    assert_eq!(wizard.skip(), Advance::Blocked);

    wizard.advance();
    wizard.advance();
    assert_eq!(wizard.current_step().map(|step| step.id.as_str()), Some("plotSize"));
    assert!(!wizard.can_advance());

    assert_eq!(wizard.skip(), Advance::Moved(3));
    assert_eq!(wizard.skip(), Advance::Moved(4));
    assert_eq!(wizard.skip(), Advance::Moved(5));
    assert!(wizard.is_last_step());
    assert!(!wizard.can_skip());
    assert_eq!(wizard.skip(), Advance::Blocked);
    assert_eq!(wizard.advance(), Advance::Submitted);
}

#[test]
fn events_follow_answer_and_step_changes() {
    let mut wizard = WizardController::new(property_search_form());
    let events = recorder(&mut wizard);

    wizard.commit_selection("location", indiranagar());
    wizard.advance();
    wizard.toggle_choice("propertyType", "apartment");
    wizard.retreat();

    let expected_bag = AnswerBag::new().with("location", indiranagar());
    let with_type = expected_bag.with("propertyType", AnswerValue::choices(["apartment"]));
    assert_eq!(
        *events.borrow(),
        vec![
            WizardEvent::AnswersChanged(expected_bag),
            WizardEvent::ValidationChanged(true),
            WizardEvent::StepChanged(1),
            WizardEvent::ValidationChanged(false),
            WizardEvent::AnswersChanged(with_type),
            WizardEvent::ValidationChanged(true),
            WizardEvent::StepChanged(0),
        ]
    );
}

#[test]
fn submit_delivers_the_answer_bag() {
    let answers = AnswerBag::new()
        .with("location", indiranagar())
        .with("propertyType", AnswerValue::choices(["plot"]))
        .with("plotSize", AnswerValue::Range(RangeValue::new(1_000.0, 4_000.0)))
        .with("budget", AnswerValue::Range(RangeValue::new(1e6, 2e7)))
        .with("projectType", AnswerValue::choices(["readyToMove"]));
    let mut wizard = WizardController::with_answers(property_search_form(), answers);
    for _ in 0..5 {
        wizard.advance();
    }
    assert!(wizard.is_last_step());

    let events = recorder(&mut wizard);
    wizard.toggle_choice("developer", "sobha");
    assert_eq!(wizard.advance(), Advance::Submitted);

    let submitted = events.borrow().iter().find_map(|event| match event {
        WizardEvent::Submitted(bag) => Some(bag.to_plain_json()),
        _ => None,
    });
    let submitted = submitted.expect("submitted event");
    assert_eq!(submitted["location"]["type"], "suggestion");
    assert_eq!(submitted["developer"], serde_json::json!(["sobha"]));
    assert_eq!(submitted["budget"]["max"], serde_json::json!(2e7));
}

#[test]
fn leaving_a_step_resets_the_active_field() {
    let mut wizard = WizardController::with_answers(
        property_search_form(),
        AnswerBag::new().with("location", indiranagar()),
    );
    wizard.set_active_field(Some("location"));
    assert_eq!(wizard.active_field(), Some("location"));
    wizard.advance();
    assert_eq!(wizard.active_field(), None);
}

#[test]
fn retreat_stops_at_the_first_step() {
    let mut wizard = WizardController::new(property_search_form());
    assert_eq!(wizard.retreat(), 0);
    assert_eq!(wizard.step_index(), 0);
}
