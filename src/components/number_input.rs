use std::cell::RefCell;
use std::rc::{Rc, Weak};

use crate::i18n::{LocaleConfig, LocalePreset};
use crate::id::{ElementKey, stable_auto_id};
use crate::number::{
    MAX_PRECISION, Precision, contains_number, format_value, parse_value, parse_value_unbounded,
};

use super::key_diff::{InferredKey, find_key_from_diff};
use super::number_input_text::{
    char_at, collapse_adjacent_separators, has_adjacent_separators, numeric_end, remove_spaces,
    remove_suffix, sanitize_input_value, separator_index, trailing_suffix_start,
};
use super::selection_state::{SelectionMemory, SelectionState};
use super::stepper::{StepConfig, StepDirection};
use super::text_input_actions::{EditKey, Modifiers};
use super::text_input_state::InputState;

type ChangeHandler = Rc<dyn Fn(Option<f64>, &str)>;

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum FieldPhase {
    #[default]
    Unfocused,
    FocusedIdle,
    Editing,
}

/// A value reported to `on_change`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Commit {
    pub value: Option<f64>,
    /// Whether min/max were applied. Keystroke commits are unbounded so the
    /// user can pass through out-of-range text while typing.
    pub bounded: bool,
}

/// What the host should do with the platform event it just forwarded.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct EventResponse {
    pub prevent_default: bool,
    pub commit: Option<Commit>,
}

impl EventResponse {
    fn prevented() -> Self {
        Self {
            prevent_default: true,
            commit: None,
        }
    }
}

/// Everything the external text-field renderer needs for one frame.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TextFieldProps {
    pub name: String,
    pub display_text: String,
    pub placeholder: Option<String>,
    pub disabled: bool,
    /// Changes whenever the element must be recreated rather than patched.
    pub element_key: ElementKey,
}

/// Issued after a render while the field holds focus.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct FocusRequest {
    pub selection: SelectionState,
}

/// Numeric text field: keeps the text the user edits in step with a bound
/// number, a caret that stays where the user expects it, and `on_change`
/// notifications for every commit.
///
/// The host forwards platform events (`focus`, `key_down`, `text_changed`,
/// `selection_changed`, `blur`), calls [`render`](Self::render) to get the
/// props for its text element, then [`after_render`](Self::after_render) to
/// learn whether focus and selection must be put back.
pub struct NumberInput {
    name: String,
    value: Option<f64>,
    min: Option<f64>,
    max: Option<f64>,
    step: f64,
    precision: Precision,
    locale: LocaleConfig,
    placeholder: Option<String>,
    disabled: bool,
    prevent_submit_on_enter: bool,
    on_change: Option<ChangeHandler>,

    phase: FieldPhase,
    override_text: Option<String>,
    selection: SelectionMemory,
    rendered_text: Option<String>,
    element_key: ElementKey,
    holds_focus: bool,
    edited_since_render: bool,
    blurred_since_render: bool,
}

impl Default for NumberInput {
    #[track_caller]
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for NumberInput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NumberInput")
            .field("name", &self.name)
            .field("value", &self.value)
            .field("display_text", &self.display_text())
            .field("phase", &self.phase)
            .field("selection", &self.selection.snapshot())
            .finish_non_exhaustive()
    }
}

impl NumberInput {
    #[track_caller]
    pub fn new() -> Self {
        Self {
            name: stable_auto_id("number-input"),
            value: None,
            min: None,
            max: None,
            step: 1.0,
            precision: Precision::default(),
            locale: LocaleConfig::default(),
            placeholder: None,
            disabled: false,
            prevent_submit_on_enter: false,
            on_change: None,
            phase: FieldPhase::Unfocused,
            override_text: None,
            selection: SelectionMemory::default(),
            rendered_text: None,
            element_key: ElementKey::default(),
            holds_focus: false,
            edited_since_render: false,
            blurred_since_render: false,
        }
    }

    pub fn name(mut self, value: impl Into<String>) -> Self {
        self.name = value.into();
        self
    }

    pub fn value(mut self, value: impl Into<Option<f64>>) -> Self {
        self.value = value.into().filter(|value| value.is_finite());
        self
    }

    /// Inverted ranges are accepted as given; clamping then resolves to `max`.
    pub fn min(mut self, value: f64) -> Self {
        self.min = Some(value);
        self.warn_on_inverted_range();
        self
    }

    pub fn max(mut self, value: f64) -> Self {
        self.max = Some(value);
        self.warn_on_inverted_range();
        self
    }

    pub fn range(self, min: f64, max: f64) -> Self {
        self.min(min).max(max)
    }

    pub fn step(mut self, value: f64) -> Self {
        self.step = value.abs().max(0.000_001);
        self
    }

    pub fn precision(mut self, value: Precision) -> Self {
        self.precision = match value {
            Precision::Fixed(digits) => Precision::Fixed(digits.min(MAX_PRECISION)),
            Precision::Unbounded => Precision::Unbounded,
        };
        self
    }

    pub fn locale(mut self, value: LocaleConfig) -> Self {
        self.locale = value;
        self
    }

    /// Applies the preset's separator, suffix, precision and, when it has
    /// one, its range and step.
    pub fn preset(mut self, preset: LocalePreset) -> Self {
        self.locale = preset.config();
        self = self.precision(preset.precision());
        if let Some((min, max, step)) = preset.range() {
            self = self.range(min, max).step(step);
        }
        self
    }

    pub fn placeholder(mut self, value: impl Into<String>) -> Self {
        self.placeholder = Some(value.into());
        self
    }

    pub fn disabled(mut self, value: bool) -> Self {
        self.disabled = value;
        self
    }

    /// Report Enter as handled so an enclosing form is not submitted.
    pub fn prevent_submit_on_enter(mut self, value: bool) -> Self {
        self.prevent_submit_on_enter = value;
        self
    }

    pub fn on_change(mut self, handler: impl Fn(Option<f64>, &str) + 'static) -> Self {
        self.on_change = Some(Rc::new(handler));
        self
    }

    fn warn_on_inverted_range(&self) {
        if let (Some(min), Some(max)) = (self.min, self.max)
            && min > max
        {
            log::warn!("{}: min {min} is greater than max {max}", self.name);
        }
    }
}

impl NumberInput {
    pub fn field_name(&self) -> &str {
        &self.name
    }

    pub fn current_value(&self) -> Option<f64> {
        self.value
    }

    pub fn phase(&self) -> FieldPhase {
        self.phase
    }

    pub fn holds_focus(&self) -> bool {
        self.holds_focus
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    pub fn selection(&self) -> SelectionState {
        self.selection.restore(self.display_text().chars().count())
    }

    pub fn element_key(&self) -> ElementKey {
        self.element_key
    }

    pub fn locale_config(&self) -> &LocaleConfig {
        &self.locale
    }

    pub fn step_config(&self) -> StepConfig {
        StepConfig {
            step: self.step,
            precision: self.precision,
            min: self.min,
            max: self.max,
        }
    }

    /// The transient override if one is active, else the formatted value.
    pub fn display_text(&self) -> String {
        match &self.override_text {
            Some(text) => text.clone(),
            None => self.formatted(self.value),
        }
    }

    /// Programmatic update from the owner. Listeners are not notified.
    pub fn set_value(&mut self, value: Option<f64>) {
        self.value = value.filter(|value| value.is_finite());
        self.override_text = None;
    }

    pub fn set_disabled(&mut self, disabled: bool) {
        self.disabled = disabled;
        if disabled {
            self.holds_focus = false;
            self.phase = FieldPhase::Unfocused;
        }
    }

    fn formatted(&self, value: Option<f64>) -> String {
        format_value(&value, self.precision, &self.locale)
    }

    /// Mid-edit parse: text with nothing numeric left in it clears the field.
    fn unbounded_value(&self, text: &str) -> Option<f64> {
        if remove_spaces(&remove_suffix(text, &self.locale)).is_empty() {
            return None;
        }
        Some(parse_value_unbounded(
            text,
            self.precision,
            self.locale.decimal_separator,
        ))
    }

    fn bounded_value(&self, text: &str) -> Option<f64> {
        contains_number(text, self.locale.decimal_separator).then(|| {
            parse_value(
                text,
                self.precision,
                self.min,
                self.max,
                self.locale.decimal_separator,
            )
        })
    }

    fn commit(&mut self, value: Option<f64>, bounded: bool) -> Commit {
        self.value = value;
        log::debug!(
            "{} committed {value:?} ({})",
            self.name,
            if bounded { "bounded" } else { "unbounded" }
        );
        if let Some(handler) = self.on_change.clone() {
            (handler)(value, &self.name);
        }
        Commit { value, bounded }
    }

    fn place_caret(&mut self, at: usize) {
        let text = self.display_text();
        let at = at.min(numeric_end(&text, &self.locale));
        log::trace!("{} caret -> {at}", self.name);
        self.selection.place_caret(at);
    }

    fn caret_at_numeric_end(&mut self) {
        let end = numeric_end(&self.display_text(), &self.locale);
        self.place_caret(end);
    }

    /// Moves a caret from raw typed text onto its reformatted version,
    /// keeping its distance to the decimal separator.
    fn map_caret(&self, raw: &str, caret: usize, formatted: &str) -> usize {
        let raw_anchor = separator_index(raw, &self.locale)
            .unwrap_or_else(|| trailing_suffix_start(raw, &self.locale));
        let formatted_anchor = separator_index(formatted, &self.locale)
            .unwrap_or_else(|| numeric_end(formatted, &self.locale));

        if caret <= raw_anchor {
            formatted_anchor.saturating_sub(raw_anchor - caret)
        } else {
            formatted_anchor + (caret - raw_anchor)
        }
    }
}

impl NumberInput {
    pub fn focus(&mut self) {
        if self.disabled {
            return;
        }
        self.phase = FieldPhase::FocusedIdle;
        self.holds_focus = true;
        self.blurred_since_render = false;
    }

    /// Forces the text through the bounded parse. Empty or unparsable text
    /// commits `None`, so a field can always be cleared.
    pub fn blur(&mut self) -> EventResponse {
        if self.disabled {
            return EventResponse::default();
        }
        let text = self.display_text();
        let value = self.bounded_value(&text);
        self.override_text = None;
        self.phase = FieldPhase::Unfocused;
        self.holds_focus = false;
        self.blurred_since_render = true;
        EventResponse {
            prevent_default: false,
            commit: Some(self.commit(value, true)),
        }
    }

    pub fn selection_changed(&mut self, selection: SelectionState) {
        if self.disabled {
            return;
        }
        let len = self.display_text().chars().count();
        self.selection.capture(selection.clamped(len));
    }

    /// Handles keys the platform reports discretely. Text edits that are not
    /// intercepted here arrive through [`text_changed`](Self::text_changed).
    pub fn key_down(&mut self, key: &EditKey, modifiers: Modifiers) -> EventResponse {
        if self.disabled {
            return EventResponse::default();
        }
        self.phase = FieldPhase::Editing;

        match key {
            EditKey::Enter => {
                let value = self.bounded_value(&self.display_text());
                self.override_text = None;
                self.edited_since_render = true;
                self.phase = FieldPhase::FocusedIdle;
                let commit = self.commit(value, true);
                let caret = self.selection.snapshot().focus();
                self.place_caret(caret);
                EventResponse {
                    prevent_default: self.prevent_submit_on_enter,
                    commit: Some(commit),
                }
            }
            EditKey::ArrowUp => self.step_value(StepDirection::Up, modifiers),
            EditKey::ArrowDown => self.step_value(StepDirection::Down, modifiers),
            EditKey::Delete => self.delete_forward(),
            _ => EventResponse::default(),
        }
    }

    /// Forward delete, done here instead of by the platform so the separator
    /// can be stepped over rather than removed.
    fn delete_forward(&mut self) -> EventResponse {
        let text = self.display_text();
        let selection = self.selection.restore(text.chars().count());
        if !selection.is_collapsed() {
            return EventResponse::default();
        }

        let caret = selection.start;
        let end = numeric_end(&text, &self.locale);
        self.edited_since_render = true;

        if char_at(&text, caret).is_some_and(|ch| self.locale.is_separator_like(ch)) {
            self.place_caret(caret + 1);
            return EventResponse::prevented();
        }
        if caret >= end {
            return EventResponse::prevented();
        }

        let mut state = InputState::new(text.clone(), selection);
        state.delete_forward();
        let value = self.unbounded_value(&state.value);
        let next_text = self.formatted(value);

        let separator = separator_index(&text, &self.locale).unwrap_or(end);
        let advance = (caret < separator
            && next_text.chars().count() == text.chars().count())
            || (caret > separator && next_text == text);

        self.override_text = None;
        let commit = self.commit(value, false);
        self.place_caret(if advance { caret + 1 } else { caret });
        EventResponse {
            prevent_default: true,
            commit: Some(commit),
        }
    }

    /// Steps the value up or down, then puts the caret after the digits.
    /// A pointer-driven step hands keyboard focus back to the field.
    pub fn step_value(&mut self, direction: StepDirection, modifiers: Modifiers) -> EventResponse {
        if self.disabled {
            return EventResponse::default();
        }
        let config = self.step_config();
        let current = self.bounded_value(&self.display_text());
        let next = config.stepped_value(current, direction, modifiers);
        log::debug!(
            "{} stepping {direction:?} by {} to {next}",
            self.name,
            config.step_size(modifiers)
        );

        self.override_text = None;
        self.holds_focus = true;
        self.edited_since_render = true;
        self.phase = FieldPhase::FocusedIdle;
        let commit = self.commit(Some(next), true);
        self.caret_at_numeric_end();
        EventResponse {
            prevent_default: true,
            commit: Some(commit),
        }
    }

    /// The element's text changed to `new_text`, leaving the caret at
    /// `selection`. Works the same for hardware keys, IME and paste: the key
    /// that caused the change is inferred from the text difference.
    pub fn text_changed(&mut self, new_text: &str, selection: SelectionState) -> EventResponse {
        if self.disabled {
            return EventResponse::default();
        }

        let previous = self.display_text();
        let previous_selection = self.selection.restore(previous.chars().count());
        let selection = selection.clamped(new_text.chars().count());
        let caret = selection.focus();
        let key = find_key_from_diff(&previous, new_text);
        log::trace!("{}: {previous:?} -> {new_text:?} reads as {key:?}", self.name);

        self.phase = FieldPhase::Editing;
        self.edited_since_render = true;

        if key == InferredKey::Backspace
            && selection.is_collapsed()
            && let Some(response) = self.backspace_near_separator(&previous, new_text, caret)
        {
            return response;
        }

        if new_text == "-" {
            return self.lone_minus(&previous, previous_selection);
        }

        if self.override_text.as_deref() == Some("-") && new_text == "-0" {
            self.override_text = None;
            let commit = self.commit(Some(0.0), false);
            self.place_caret(1);
            return EventResponse {
                prevent_default: false,
                commit: Some(commit),
            };
        }

        if let InferredKey::Char(ch) = key
            && !self.accepts_typed(ch, new_text)
        {
            // the platform already inserted it; re-rendering puts the old text back
            log::trace!("{}: rejected typed {ch:?}", self.name);
            self.selection.capture(previous_selection);
            return EventResponse::default();
        }

        let (new_text, caret) = match key {
            InferredKey::Ambiguous => self.sanitize_paste(new_text, caret),
            _ => (new_text.to_string(), caret),
        };

        if has_adjacent_separators(&new_text, &self.locale) {
            return self.collapse_separators(&new_text, caret);
        }

        let suffix_start = trailing_suffix_start(&new_text, &self.locale);
        let typed_space = key.is_char(' ');
        if typed_space || new_text.chars().take(suffix_start).any(char::is_whitespace) {
            return self.strip_spaces(&new_text, caret, typed_space);
        }

        let value = self.unbounded_value(&new_text);
        self.override_text = None;
        let commit = self.commit(value, false);
        let formatted = self.display_text();
        let mapped = self.map_caret(&new_text, caret, &formatted);
        self.place_caret(mapped);
        EventResponse {
            prevent_default: false,
            commit: Some(commit),
        }
    }

    /// Digits, separators and whitespace are always accepted. A minus only as
    /// the single leading sign of a field that allows negatives.
    fn accepts_typed(&self, ch: char, new_text: &str) -> bool {
        if ch == '-' {
            return self.negatives_allowed()
                && new_text.starts_with('-')
                && new_text.matches('-').count() == 1;
        }
        ch.is_ascii_digit() || ch.is_whitespace() || self.locale.is_separator_like(ch)
    }

    fn negatives_allowed(&self) -> bool {
        self.min.is_none_or(|min| min < 0.0)
    }

    /// Pastes and replaced selections are reduced to sign, digits and one
    /// separator. The caret keeps its place among the characters that stay.
    fn sanitize_paste(&self, text: &str, caret: usize) -> (String, usize) {
        let sanitized = sanitize_input_value(text, &self.locale);
        let head = text.chars().take(caret).collect::<String>();
        let kept_head = sanitize_input_value(&head, &self.locale);
        let suffix_len = if kept_head.is_empty() {
            0
        } else {
            self.locale.suffix().chars().count()
        };
        (sanitized, kept_head.chars().count() - suffix_len)
    }

    fn backspace_near_separator(
        &mut self,
        previous: &str,
        new_text: &str,
        caret: usize,
    ) -> Option<EventResponse> {
        let removed_separator = char_at(previous, caret)
            .is_some_and(|ch| self.locale.is_separator_like(ch))
            && {
                let mut state = InputState::new(previous, SelectionState::caret(caret));
                state.delete_forward();
                state.value == new_text
            };
        if removed_separator {
            // the separator is never deleted, only stepped over
            self.place_caret(caret);
            return Some(EventResponse::default());
        }

        let leading_separator =
            char_at(new_text, 0).is_some_and(|ch| self.locale.is_separator_like(ch));
        if caret != 0 || !leading_separator {
            return None;
        }

        let remainder =
            parse_value_unbounded(new_text, self.precision, self.locale.decimal_separator);
        let commit = if remainder == 0.0 {
            self.override_text = None;
            self.commit(None, false)
        } else {
            self.override_text = Some(new_text.to_string());
            self.commit(Some(remainder), false)
        };
        self.place_caret(0);
        Some(EventResponse {
            prevent_default: false,
            commit: Some(commit),
        })
    }

    fn collapse_separators(&mut self, new_text: &str, caret: usize) -> EventResponse {
        let (collapsed, removed) = collapse_adjacent_separators(new_text, &self.locale);
        let removed_before = removed.iter().filter(|&&index| index < caret).count();
        let mut caret = caret - removed_before;
        if char_at(&collapsed, caret).is_some_and(|ch| self.locale.is_separator_like(ch)) {
            caret += 1;
        }

        let value = self.unbounded_value(&collapsed);
        self.override_text = None;
        let commit = self.commit(value, false);
        self.place_caret(caret);
        EventResponse {
            prevent_default: false,
            commit: Some(commit),
        }
    }

    fn strip_spaces(&mut self, new_text: &str, caret: usize, typed_space: bool) -> EventResponse {
        let suffix_start = trailing_suffix_start(new_text, &self.locale);
        let head = new_text.chars().take(suffix_start).collect::<String>();
        let spaces_before_caret = new_text
            .chars()
            .take(caret.min(suffix_start))
            .filter(|ch| ch.is_whitespace())
            .count();
        let mut cleaned = remove_spaces(&head);
        cleaned.push_str(self.locale.suffix());

        let value = self.unbounded_value(&cleaned);
        self.override_text = None;
        let commit = self.commit(value, false);

        // a typed space moves the caret one step right, other whitespace
        // keeps it next to the character it followed
        let caret = if typed_space {
            caret
        } else {
            caret - spaces_before_caret
        };
        self.place_caret(caret);
        EventResponse {
            prevent_default: false,
            commit: Some(commit),
        }
    }

    fn lone_minus(&mut self, previous: &str, previous_selection: SelectionState) -> EventResponse {
        let field_replaced =
            previous.is_empty() || previous_selection.selects_all(previous.chars().count());
        if field_replaced && self.negatives_allowed() {
            self.override_text = Some("-".to_string());
            self.selection.place_caret(1);
        } else {
            log::trace!("{}: rejected lone minus", self.name);
            self.selection.capture(previous_selection);
        }
        EventResponse::default()
    }
}

impl NumberInput {
    /// Props for the next frame. When the text did not change but the
    /// platform element holds an edit, the element key changes so the
    /// renderer recreates it instead of keeping the stale edit. This never
    /// happens right after a blur, which would break Tab traversal.
    pub fn render(&mut self) -> TextFieldProps {
        let display_text = self.display_text();
        if self.edited_since_render
            && self.holds_focus
            && !self.blurred_since_render
            && self.rendered_text.as_deref() == Some(display_text.as_str())
        {
            self.element_key = self.element_key.next();
            log::trace!("{} recreating element as {:?}", self.name, self.element_key);
        }

        self.rendered_text = Some(display_text.clone());
        self.edited_since_render = false;
        self.blurred_since_render = false;

        TextFieldProps {
            name: self.name.clone(),
            display_text,
            placeholder: self.placeholder.clone(),
            disabled: self.disabled,
            element_key: self.element_key,
        }
    }

    /// Focus and selection to restore once the rendered element exists.
    pub fn after_render(&self) -> Option<FocusRequest> {
        if !self.holds_focus || self.disabled {
            return None;
        }
        Some(FocusRequest {
            selection: self.selection(),
        })
    }
}

/// Callback for a stepper control, usually handed to
/// [`RepeatingActivation::activate`](super::repeat_activation::RepeatingActivation::activate).
/// Does nothing once the field is gone or while it is borrowed elsewhere.
pub fn stepper_action(
    field: &Rc<RefCell<NumberInput>>,
    direction: StepDirection,
    modifiers: Modifiers,
) -> impl FnMut() + 'static {
    let field: Weak<RefCell<NumberInput>> = Rc::downgrade(field);
    move || {
        let Some(field) = field.upgrade() else {
            return;
        };
        if let Ok(mut field) = field.try_borrow_mut() {
            field.step_value(direction, modifiers);
        }
    }
}
