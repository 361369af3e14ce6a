use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

use super::controller::FieldKey;
use crate::number::decimal_from_f64;

/// A model field type a number input can edit. `None` is "no value".
pub trait NumericField: Clone + 'static {
    fn to_field_value(&self) -> Option<f64>;
    fn from_field_value(value: Option<f64>) -> Self;
}

impl NumericField for Option<f64> {
    fn to_field_value(&self) -> Option<f64> {
        self.filter(|value| value.is_finite())
    }

    fn from_field_value(value: Option<f64>) -> Self {
        value
    }
}

impl NumericField for Option<Decimal> {
    fn to_field_value(&self) -> Option<f64> {
        self.and_then(|value| value.to_f64())
    }

    fn from_field_value(value: Option<f64>) -> Self {
        value.and_then(decimal_from_f64)
    }
}

pub trait FieldLens<T>: Copy + 'static {
    type Value: NumericField;

    fn key(self) -> FieldKey;
    fn get<'a>(self, model: &'a T) -> &'a Self::Value;
    fn set(self, model: &mut T, value: Self::Value);
}

/// A struct of numeric fields, usually implemented with
/// `#[derive(FormModel)]`.
pub trait FormModel: Clone + 'static {
    type Fields;

    /// Field keys in declaration order.
    const FIELD_KEYS: &'static [FieldKey];

    fn fields() -> Self::Fields;

    /// `None` when `key` is not a field of this model.
    fn field_value(&self, key: FieldKey) -> Option<Option<f64>>;

    /// Returns `false` when `key` is not a field of this model.
    fn set_field_value(&mut self, key: FieldKey, value: Option<f64>) -> bool;
}
