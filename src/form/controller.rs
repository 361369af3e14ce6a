use std::cell::{Ref, RefCell, RefMut};
use std::fmt::{Display, Formatter};
use std::rc::Rc;

use super::lens::FormModel;
use crate::components::NumberInput;
use crate::i18n::{LocaleConfig, LocalePreset};
use crate::number::Precision;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct FieldKey(&'static str);

impl FieldKey {
    pub const fn new(value: &'static str) -> Self {
        Self(value)
    }

    pub const fn as_str(self) -> &'static str {
        self.0
    }
}

impl Display for FieldKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.0)
    }
}

/// Position of a field in its form, in insertion order.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct FieldIndex(pub usize);

impl Display for FieldIndex {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub enum FormError {
    UnknownField(FieldIndex),
    UnknownName(String),
    UnknownKey(FieldKey),
    StateBorrowed(&'static str),
}

impl Display for FormError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            FormError::UnknownField(index) => write!(f, "form has no field {index}"),
            FormError::UnknownName(name) => write!(f, "form has no field named `{name}`"),
            FormError::UnknownKey(key) => write!(f, "form has no field bound to `{key}`"),
            FormError::StateBorrowed(context) => {
                write!(f, "form state already borrowed while {context}")
            }
        }
    }
}

impl std::error::Error for FormError {}

pub type FormResult<T> = Result<T, FormError>;

/// How one field of a form is configured. Its name is assigned by the form.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FieldDescriptor {
    pub key: Option<FieldKey>,
    pub initial: Option<f64>,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub step: Option<f64>,
    pub precision: Option<Precision>,
    pub preset: Option<LocalePreset>,
    pub locale: Option<LocaleConfig>,
    pub placeholder: Option<String>,
}

impl FieldDescriptor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn key(mut self, key: FieldKey) -> Self {
        self.key = Some(key);
        self
    }

    pub fn initial(mut self, value: impl Into<Option<f64>>) -> Self {
        self.initial = value.into();
        self
    }

    pub fn range(mut self, min: f64, max: f64) -> Self {
        self.min = Some(min);
        self.max = Some(max);
        self
    }

    pub fn step(mut self, step: f64) -> Self {
        self.step = Some(step);
        self
    }

    pub fn precision(mut self, precision: Precision) -> Self {
        self.precision = Some(precision);
        self
    }

    pub fn preset(mut self, preset: LocalePreset) -> Self {
        self.preset = Some(preset);
        self
    }

    pub fn locale(mut self, locale: LocaleConfig) -> Self {
        self.locale = Some(locale);
        self
    }

    pub fn placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    /// An unbound input carrying this configuration. Explicit settings win
    /// over the preset's.
    pub fn build_input(&self, name: &str) -> NumberInput {
        let mut input = NumberInput::new().name(name);
        if let Some(preset) = self.preset {
            input = input.preset(preset);
        }
        if let Some(locale) = &self.locale {
            input = input.locale(locale.clone());
        }
        if let Some(precision) = self.precision {
            input = input.precision(precision);
        }
        if let Some(min) = self.min {
            input = input.min(min);
        }
        if let Some(max) = self.max {
            input = input.max(max);
        }
        if let Some(step) = self.step {
            input = input.step(step);
        }
        if let Some(placeholder) = &self.placeholder {
            input = input.placeholder(placeholder.clone());
        }
        input
    }
}

#[derive(Debug)]
pub(super) struct FieldSlot {
    pub(super) name: String,
    pub(super) descriptor: FieldDescriptor,
    pub(super) value: Option<f64>,
}

#[derive(Debug, Default)]
pub(super) struct FormState {
    pub(super) fields: Vec<FieldSlot>,
}

impl FormState {
    pub(super) fn slot(&self, index: FieldIndex) -> FormResult<&FieldSlot> {
        self.fields
            .get(index.0)
            .ok_or(FormError::UnknownField(index))
    }

    pub(super) fn position(&self, name: &str) -> FormResult<FieldIndex> {
        self.fields
            .iter()
            .position(|slot| slot.name == name)
            .map(FieldIndex)
            .ok_or_else(|| FormError::UnknownName(name.to_string()))
    }
}

pub(super) type ChangeListener = Rc<dyn Fn(FieldIndex, Option<f64>, &str)>;

/// An ordered arena of numeric fields. Bound inputs write their commits into
/// the form's value table; nothing else holds field state.
#[derive(Clone)]
pub struct NumberForm {
    name: String,
    pub(super) state: Rc<RefCell<FormState>>,
    pub(super) listener: Option<ChangeListener>,
}

impl std::fmt::Debug for NumberForm {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NumberForm")
            .field("name", &self.name)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl NumberForm {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            state: Rc::default(),
            listener: None,
        }
    }

    /// One field per key of `T`, in declaration order, seeded from `model`.
    pub fn from_model<T: FormModel>(
        name: impl Into<String>,
        model: &T,
        template: FieldDescriptor,
    ) -> FormResult<Self> {
        let form = Self::new(name);
        for &key in T::FIELD_KEYS {
            let initial = model.field_value(key).ok_or(FormError::UnknownKey(key))?;
            form.add_field(template.clone().key(key).initial(initial))?;
        }
        Ok(form)
    }

    /// Called with every change routed into the form, after the value table
    /// has been updated.
    pub fn on_change(mut self, handler: impl Fn(FieldIndex, Option<f64>, &str) + 'static) -> Self {
        self.listener = Some(Rc::new(handler));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> FormResult<usize> {
        Ok(self.read("counting fields")?.fields.len())
    }

    pub fn is_empty(&self) -> FormResult<bool> {
        Ok(self.len()? == 0)
    }

    /// Appends a field named `{form}_v{n}`, `n` counting from 1.
    pub fn add_field(&self, descriptor: FieldDescriptor) -> FormResult<FieldIndex> {
        let mut state = self.write("adding a field")?;
        let index = FieldIndex(state.fields.len());
        let name = format!("{}_v{}", self.name, index.0 + 1);
        log::debug!("form {} added field {name}", self.name);
        state.fields.push(FieldSlot {
            name,
            value: descriptor.initial,
            descriptor,
        });
        Ok(index)
    }

    pub fn field_name(&self, index: FieldIndex) -> FormResult<String> {
        Ok(self.read("reading a field name")?.slot(index)?.name.clone())
    }

    pub fn index_of(&self, name: &str) -> FormResult<FieldIndex> {
        self.read("looking up a field name")?.position(name)
    }

    pub fn index_of_key(&self, key: FieldKey) -> FormResult<FieldIndex> {
        self.read("looking up a field key")?
            .fields
            .iter()
            .position(|slot| slot.descriptor.key == Some(key))
            .map(FieldIndex)
            .ok_or(FormError::UnknownKey(key))
    }

    pub fn value(&self, index: FieldIndex) -> FormResult<Option<f64>> {
        Ok(self.read("reading a value")?.slot(index)?.value)
    }

    /// `(name, value)` for every field, in insertion order.
    pub fn values(&self) -> FormResult<Vec<(String, Option<f64>)>> {
        Ok(self
            .read("collecting values")?
            .fields
            .iter()
            .map(|slot| (slot.name.clone(), slot.value))
            .collect())
    }

    /// Routes a change reported under `name` to its field.
    pub fn apply_change(&self, name: &str, value: Option<f64>) -> FormResult<FieldIndex> {
        let index = {
            let mut state = self.write("applying a change")?;
            let index = state.position(name)?;
            state.fields[index.0].value = value;
            index
        };
        log::trace!("form {} field {name} <- {value:?}", self.name);
        if let Some(listener) = &self.listener {
            listener(index, value, name);
        }
        Ok(index)
    }

    /// Copies every keyed field's value into `model`.
    pub fn write_model<T: FormModel>(&self, model: &mut T) -> FormResult<()> {
        let state = self.read("writing the model")?;
        for slot in &state.fields {
            let Some(key) = slot.descriptor.key else {
                continue;
            };
            if !model.set_field_value(key, slot.value) {
                return Err(FormError::UnknownKey(key));
            }
        }
        Ok(())
    }

    pub(super) fn read(&self, context: &'static str) -> FormResult<Ref<'_, FormState>> {
        self.state
            .try_borrow()
            .map_err(|_| FormError::StateBorrowed(context))
    }

    pub(super) fn write(&self, context: &'static str) -> FormResult<RefMut<'_, FormState>> {
        self.state
            .try_borrow_mut()
            .map_err(|_| FormError::StateBorrowed(context))
    }
}
