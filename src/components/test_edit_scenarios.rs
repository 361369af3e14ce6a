use std::cell::RefCell;
use std::rc::Rc;
use std::thread;
use std::time::Duration;

use futures::executor::block_on;

use super::{
    ActivationEvent, EditKey, Modifiers, NumberInput, RepeatSchedule, RepeatingActivation,
    SelectionDirection, SelectionState, StepDirection, stepper_action,
};
use crate::i18n::{LocaleConfig, LocalePreset};
use crate::number::Precision;

type ChangeLog = Rc<RefCell<Vec<(Option<f64>, String)>>>;

fn recorded(field: NumberInput) -> (NumberInput, ChangeLog) {
    let log: ChangeLog = Rc::default();
    let sink = log.clone();
    let field = field.on_change(move |value, name| sink.borrow_mut().push((value, name.into())));
    (field, log)
}

fn focused(mut field: NumberInput, caret: usize) -> NumberInput {
    field.focus();
    field.render();
    field.selection_changed(SelectionState::caret(caret));
    field
}

fn euro(value: impl Into<Option<f64>>) -> (NumberInput, ChangeLog) {
    recorded(
        NumberInput::new()
            .name("price")
            .preset(LocalePreset::Euro)
            .value(value),
    )
}

fn last_value(log: &ChangeLog) -> Option<Option<f64>> {
    log.borrow().last().map(|(value, _)| *value)
}

#[test]
fn backspace_over_separator_only_moves_the_caret() {
    let (field, log) = euro(100.0);
    let mut field = focused(field, 4);
    let key_before = field.element_key();

    let response = field.text_changed("10000 €", SelectionState::caret(3));
    assert_eq!(response.commit, None);
    assert_eq!(field.display_text(), "100,00 €");
    assert_eq!(field.selection(), SelectionState::caret(3));
    assert!(log.borrow().is_empty());

    let props = field.render();
    assert_eq!(props.display_text, "100,00 €");
    assert_ne!(props.element_key, key_before);
    assert_eq!(
        field.after_render().map(|request| request.selection),
        Some(SelectionState::caret(3))
    );
}

#[test]
fn school_grade_steps_stay_rounded_and_clamped() {
    let (field, log) = recorded(
        NumberInput::new()
            .preset(LocalePreset::SchoolGrade)
            .value(1.3),
    );
    let mut field = focused(field, 0);

    let response = field.key_down(&EditKey::ArrowUp, Modifiers::none());
    assert!(response.prevent_default);
    assert_eq!(field.display_text(), "1,4");
    assert_eq!(field.selection(), SelectionState::caret(3));
    assert_eq!(last_value(&log), Some(Some(1.4)));

    field.set_value(Some(1.0));
    field.key_down(&EditKey::ArrowDown, Modifiers::none());
    assert_eq!(field.current_value(), Some(1.0));

    field.set_value(Some(5.5));
    field.key_down(&EditKey::ArrowUp, Modifiers::shift());
    assert_eq!(field.display_text(), "6,0");
    assert!(log.borrow().iter().all(|(_, name)| name == field.field_name()));
}

#[test]
fn precise_modifier_step_is_floored_by_precision() {
    let (field, log) = euro(1.0);
    let mut field = focused(field, 0);
    let response = field.step_value(StepDirection::Up, Modifiers::alt());
    assert!(response.commit.is_some_and(|commit| commit.bounded));
    assert_eq!(field.display_text(), "1,20 €");
    assert_eq!(field.selection(), SelectionState::caret(4));
    assert_eq!(last_value(&log), Some(Some(1.2)));

    let mut grade = NumberInput::new()
        .preset(LocalePreset::SchoolGrade)
        .value(2.0);
    grade.focus();
    grade.step_value(StepDirection::Down, Modifiers::alt());
    assert_eq!(grade.display_text(), "1,9");
}

#[test]
fn lone_minus_waits_for_a_digit() {
    let (field, log) = recorded(NumberInput::new());
    let mut field = focused(field, 0);

    let response = field.text_changed("-", SelectionState::caret(1));
    assert_eq!(response.commit, None);
    assert_eq!(field.display_text(), "-");
    assert!(log.borrow().is_empty());

    field.text_changed("-0", SelectionState::caret(2));
    assert_eq!(field.display_text(), "0");
    assert_eq!(field.selection(), SelectionState::caret(1));
    assert_eq!(last_value(&log), Some(Some(0.0)));
}

#[test]
fn lone_minus_is_rejected_for_non_negative_ranges() {
    let (field, log) = recorded(NumberInput::new().min(0.0));
    let mut field = focused(field, 0);
    let key_before = field.element_key();

    field.text_changed("-", SelectionState::caret(1));
    assert_eq!(field.display_text(), "");
    assert!(log.borrow().is_empty());
    assert_ne!(field.render().element_key, key_before);
}

#[test]
fn lone_minus_replaces_a_fully_selected_value() {
    let mut field = NumberInput::new().value(42.0);
    field.focus();
    field.selection_changed(SelectionState::range(0, 2, SelectionDirection::Forward));
    field.text_changed("-", SelectionState::caret(1));
    assert_eq!(field.display_text(), "-");
    assert_eq!(field.current_value(), Some(42.0));
}

#[test]
fn blur_turns_a_transient_minus_into_no_value() {
    let (field, log) = recorded(NumberInput::new());
    let mut field = focused(field, 0);
    field.text_changed("-", SelectionState::caret(1));

    let response = field.blur();
    assert_eq!(response.commit.map(|commit| commit.value), Some(None));
    assert_eq!(field.display_text(), "");
    assert_eq!(last_value(&log), Some(None));
}

#[test]
fn delete_steps_over_the_separator() {
    let (field, log) = euro(100.0);
    let mut field = focused(field, 3);

    let response = field.key_down(&EditKey::Delete, Modifiers::none());
    assert!(response.prevent_default);
    assert_eq!(response.commit, None);
    assert_eq!(field.display_text(), "100,00 €");
    assert_eq!(field.selection(), SelectionState::caret(4));
    assert!(log.borrow().is_empty());
}

#[test]
fn delete_in_the_decimals_overwrites_forward() {
    let (field, log) = euro(100.0);
    let mut field = focused(field, 4);

    let response = field.key_down(&EditKey::Delete, Modifiers::none());
    assert!(response.prevent_default);
    assert_eq!(field.display_text(), "100,00 €");
    assert_eq!(field.selection(), SelectionState::caret(5));
    assert_eq!(last_value(&log), Some(Some(100.0)));
}

#[test]
fn delete_of_the_leading_digit_keeps_the_caret() {
    let (field, _log) = euro(100.0);
    let mut field = focused(field, 0);

    let response = field.key_down(&EditKey::Delete, Modifiers::none());
    assert!(response.commit.is_some_and(|commit| !commit.bounded));
    assert_eq!(field.display_text(), "0,00 €");
    assert_eq!(field.selection(), SelectionState::caret(0));
}

#[test]
fn delete_never_touches_the_suffix() {
    let (field, log) = euro(100.0);
    let mut field = focused(field, 6);

    let response = field.key_down(&EditKey::Delete, Modifiers::none());
    assert!(response.prevent_default);
    assert_eq!(field.display_text(), "100,00 €");
    assert!(log.borrow().is_empty());
}

#[test]
fn typed_duplicate_separator_collapses_and_skips() {
    let (field, log) = euro(100.0);
    let mut field = focused(field, 3);

    field.text_changed("100,,00 €", SelectionState::caret(4));
    assert_eq!(field.display_text(), "100,00 €");
    assert_eq!(field.selection(), SelectionState::caret(4));

    field.text_changed("100.,00 €", SelectionState::caret(4));
    assert_eq!(field.display_text(), "100,00 €");
    assert_eq!(last_value(&log), Some(Some(100.0)));
}

#[test]
fn typed_space_is_stripped() {
    let (field, log) = euro(100.0);
    let mut field = focused(field, 1);
    let key_before = field.element_key();

    let response = field.text_changed("1 00,00 €", SelectionState::caret(2));
    assert!(response.commit.is_some());
    assert_eq!(field.display_text(), "100,00 €");
    assert_eq!(field.selection(), SelectionState::caret(2));
    assert_eq!(last_value(&log), Some(Some(100.0)));
    assert_ne!(field.render().element_key, key_before);
}

#[test]
fn stray_typed_characters_are_rejected() {
    let (field, log) = euro(100.0);
    let mut field = focused(field, 2);
    let key_before = field.element_key();

    let response = field.text_changed("10a0,00 €", SelectionState::caret(3));
    assert_eq!(response.commit, None);
    assert_eq!(field.display_text(), "100,00 €");
    assert_eq!(field.selection(), SelectionState::caret(2));
    assert_eq!(field.current_value(), Some(100.0));
    assert_ne!(field.render().element_key, key_before);

    field.text_changed("1+00,00 €", SelectionState::caret(2));
    assert_eq!(field.display_text(), "100,00 €");
    assert_eq!(field.selection(), SelectionState::caret(2));

    field.text_changed("10-0,00 €", SelectionState::caret(3));
    assert_eq!(field.display_text(), "100,00 €");
    assert!(log.borrow().is_empty());
}

#[test]
fn leading_minus_is_typed_only_where_negatives_are_allowed() {
    let (field, log) = euro(100.0);
    let mut field = focused(field, 0);
    field.text_changed("-100,00 €", SelectionState::caret(1));
    assert_eq!(field.display_text(), "-100,00 €");
    assert_eq!(field.selection(), SelectionState::caret(1));
    assert_eq!(last_value(&log), Some(Some(-100.0)));

    let mut field = NumberInput::new().min(0.0).value(5.0);
    field.focus();
    field.selection_changed(SelectionState::caret(0));
    field.text_changed("-5", SelectionState::caret(1));
    assert_eq!(field.display_text(), "5");
    assert_eq!(field.current_value(), Some(5.0));
}

#[test]
fn pasted_text_is_sanitized() {
    let mut field = NumberInput::new()
        .precision(Precision::Fixed(2))
        .locale(LocaleConfig::new(','));
    field.focus();

    field.text_changed("1 234,5", SelectionState::caret(7));
    assert_eq!(field.current_value(), Some(1234.5));
    assert_eq!(field.display_text(), "1234,50");
    assert_eq!(field.selection(), SelectionState::caret(6));
}

#[test]
fn typing_keeps_the_caret_next_to_the_separator() {
    let (field, log) = euro(None::<f64>);
    let mut field = focused(field, 0);

    field.text_changed("5", SelectionState::caret(1));
    assert_eq!(field.display_text(), "5,00 €");
    assert_eq!(field.selection(), SelectionState::caret(1));

    field.text_changed("50,00 €", SelectionState::caret(2));
    assert_eq!(field.display_text(), "50,00 €");
    assert_eq!(field.selection(), SelectionState::caret(2));
    assert_eq!(last_value(&log), Some(Some(50.0)));
    assert!(log.borrow().iter().all(|(_, name)| name == "price"));
}

#[test]
fn leading_zero_is_dropped_without_losing_the_caret() {
    let (field, _log) = euro(0.0);
    let mut field = focused(field, 1);

    field.text_changed("05,00 €", SelectionState::caret(2));
    assert_eq!(field.display_text(), "5,00 €");
    assert_eq!(field.selection(), SelectionState::caret(1));
}

#[test]
fn erasing_the_only_integer_digit() {
    let (field, log) = euro(5.0);
    let mut field = focused(field, 1);
    field.text_changed(",00 €", SelectionState::caret(0));
    assert_eq!(field.display_text(), "");
    assert_eq!(last_value(&log), Some(None));

    let (field, log) = euro(5.5);
    let mut field = focused(field, 1);
    field.text_changed(",50 €", SelectionState::caret(0));
    assert_eq!(field.display_text(), ",50 €");
    assert_eq!(field.selection(), SelectionState::caret(0));
    assert_eq!(last_value(&log), Some(Some(0.5)));

    field.text_changed("3,50 €", SelectionState::caret(1));
    assert_eq!(field.display_text(), "3,50 €");
}

#[test]
fn keystrokes_commit_unbounded_and_blur_clamps() {
    let (field, log) = recorded(NumberInput::new().range(0.0, 10.0));
    let mut field = focused(field, 0);

    let response = field.text_changed("25", SelectionState::caret(2));
    assert!(response.commit.is_some_and(|commit| !commit.bounded));
    assert_eq!(field.display_text(), "25");

    let response = field.blur();
    assert!(response.commit.is_some_and(|commit| commit.bounded));
    assert_eq!(field.display_text(), "10");
    assert_eq!(last_value(&log), Some(Some(10.0)));
}

#[test]
fn cleared_field_commits_no_value() {
    let (field, log) = recorded(NumberInput::new().value(10.0));
    let mut field = focused(field, 0);
    field.selection_changed(SelectionState::range(0, 2, SelectionDirection::Forward));

    field.text_changed("", SelectionState::caret(0));
    assert_eq!(last_value(&log), Some(None));
    field.blur();
    assert_eq!(last_value(&log), Some(None));
    assert_eq!(field.display_text(), "");
}

#[test]
fn enter_commits_and_optionally_blocks_submit() {
    let (field, log) = recorded(NumberInput::new().max(5.0));
    let mut field = focused(field, 0);
    field.text_changed("9", SelectionState::caret(1));

    let response = field.key_down(&EditKey::Enter, Modifiers::none());
    assert!(!response.prevent_default);
    assert_eq!(field.display_text(), "5");
    assert_eq!(last_value(&log), Some(Some(5.0)));

    let mut field = NumberInput::new().prevent_submit_on_enter(true);
    field.focus();
    assert!(
        field
            .key_down(&EditKey::Enter, Modifiers::none())
            .prevent_default
    );
}

#[test]
fn element_is_kept_after_blur() {
    let mut field = NumberInput::new().value(10.0);
    field.focus();
    let key = field.render().element_key;
    field.blur();
    assert_eq!(field.render().element_key, key);
    assert_eq!(field.after_render(), None);
}

#[test]
fn disabled_field_ignores_edits() {
    let (field, log) = euro(100.0);
    let mut field = field.disabled(true);
    field.focus();
    assert!(!field.holds_focus());

    field.text_changed("1", SelectionState::caret(1));
    field.step_value(StepDirection::Up, Modifiers::none());
    field.blur();
    assert_eq!(field.display_text(), "100,00 €");
    assert!(log.borrow().is_empty());
    assert!(field.render().disabled);
}

#[test]
fn programmatic_updates_do_not_notify() {
    let (field, log) = euro(100.0);
    let mut field = focused(field, 5);
    field.set_value(Some(7.0));
    assert_eq!(field.display_text(), "7,00 €");
    assert!(log.borrow().is_empty());
    assert_eq!(field.selection(), SelectionState::caret(5));
}

#[test]
fn quick_stepper_press_steps_once() {
    let field = Rc::new(RefCell::new(
        NumberInput::new()
            .preset(LocalePreset::SchoolGrade)
            .value(1.0),
    ));
    let mut activation = RepeatingActivation::new();
    let task = activation.activate(stepper_action(&field, StepDirection::Up, Modifiers::none()));
    activation.deactivate();

    assert_eq!(block_on(task), 0);
    assert_eq!(field.borrow().current_value(), Some(1.1));
    assert!(field.borrow().holds_focus());
}

#[test]
fn held_stepper_repeats_until_released() {
    let (field, log) = recorded(
        NumberInput::new()
            .preset(LocalePreset::SchoolGrade)
            .value(1.0),
    );
    let field = Rc::new(RefCell::new(field));
    let mut activation = RepeatingActivation::with_schedule(RepeatSchedule {
        initial_delay: Duration::from_millis(20),
        interval: Duration::from_millis(10),
    });
    let task = activation
        .handle_event(
            ActivationEvent::PointerDown,
            stepper_action(&field, StepDirection::Up, Modifiers::none()),
        )
        .expect("press starts a chain");
    let handle = activation.handle().expect("running chain");

    let releaser = thread::spawn(move || {
        thread::sleep(Duration::from_millis(80));
        handle.cancel();
    });
    let repeats = block_on(task);
    releaser.join().expect("releaser thread");

    assert!(repeats >= 1);
    assert_eq!(log.borrow().len() as u32, repeats + 1);
    assert!(field.borrow().current_value() > Some(1.1));
    assert!(
        activation
            .handle_event(ActivationEvent::PointerUp, || {})
            .is_none()
    );
}

#[test]
fn dropped_field_is_not_stepped() {
    let field = Rc::new(RefCell::new(NumberInput::new()));
    let mut action = stepper_action(&field, StepDirection::Up, Modifiers::none());
    drop(field);
    action();
}
