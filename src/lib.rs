pub mod components;
pub mod form;
pub mod i18n;
pub mod id;
pub mod number;
pub mod prelude;

#[cfg(test)]
mod test_public_api;

pub use components::{NumberInput, RepeatingActivation, TextFieldProps};
pub use i18n::{LocaleConfig, LocalePreset};
pub use number::{Precision, format_value, parse_value, parse_value_unbounded};
