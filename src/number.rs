use std::borrow::Cow;
use std::str::FromStr;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::i18n::LocaleConfig;

/// Digits kept when rounding a value whose precision is [`Precision::Unbounded`].
pub const UNBOUNDED_ROUNDING_DIGITS: u32 = 10;

/// Largest fixed precision a field accepts.
pub const MAX_PRECISION: u32 = 15;

const MAX_DECIMAL_SCALE: u32 = 28;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Precision {
    Fixed(u32),
    Unbounded,
}

impl Default for Precision {
    fn default() -> Self {
        Self::Fixed(0)
    }
}

impl Precision {
    pub fn rounding_digits(self) -> u32 {
        match self {
            Self::Fixed(digits) => digits,
            Self::Unbounded => UNBOUNDED_ROUNDING_DIGITS,
        }
    }

    /// Lower bound of a stepper step: a tenth of the digit count for fixed
    /// precisions, `1` for whole numbers.
    pub fn step_floor(self) -> f64 {
        match self {
            Self::Fixed(0) => 1.0,
            Self::Fixed(digits) => f64::from(digits) / 10.0,
            Self::Unbounded => 10f64.powi(-(UNBOUNDED_ROUNDING_DIGITS as i32)),
        }
    }
}

/// Anything the formatter can try to read a number out of.
pub trait NumericInput {
    fn to_number(&self) -> Option<f64>;
}

impl NumericInput for f64 {
    fn to_number(&self) -> Option<f64> {
        self.is_finite().then_some(*self)
    }
}

impl NumericInput for Option<f64> {
    fn to_number(&self) -> Option<f64> {
        self.and_then(|value| value.to_number())
    }
}

impl NumericInput for str {
    fn to_number(&self) -> Option<f64> {
        parse_to_number(self, '.')
    }
}

impl NumericInput for String {
    fn to_number(&self) -> Option<f64> {
        self.as_str().to_number()
    }
}

/// Reads the leading number of `text`, accepting `decimal_separator` in place
/// of `.`. Leading whitespace and any trailing garbage (a currency suffix, a
/// dangling separator) are ignored. Returns `None` when no finite number can
/// be read.
pub fn parse_to_number(text: &str, decimal_separator: char) -> Option<f64> {
    let normalized = if decimal_separator == '.' {
        Cow::Borrowed(text)
    } else {
        Cow::Owned(text.replacen(decimal_separator, ".", 1))
    };

    let prefix = float_prefix(normalized.trim_start());
    if prefix.is_empty() {
        return None;
    }
    f64::from_str(prefix).ok().filter(|number| number.is_finite())
}

pub fn contains_number(text: &str, decimal_separator: char) -> bool {
    parse_to_number(text, decimal_separator).is_some()
}

/// Bounded parse: unparsable text becomes `0` before rounding and clamping.
pub fn parse_value(
    text: &str,
    precision: Precision,
    min: Option<f64>,
    max: Option<f64>,
    decimal_separator: char,
) -> f64 {
    let number = parse_to_number(text, decimal_separator).unwrap_or(0.0);
    bound_number(round_with_precision(number, precision), min, max)
}

/// Unbounded parse used while the user is still typing.
pub fn parse_value_unbounded(text: &str, precision: Precision, decimal_separator: char) -> f64 {
    parse_value(text, precision, None, None, decimal_separator)
}

pub fn format_value<V>(value: &V, precision: Precision, locale: &LocaleConfig) -> String
where
    V: NumericInput + ?Sized,
{
    let Some(number) = value.to_number() else {
        return String::new();
    };

    let mut text = render_fixed(number, precision);
    if locale.decimal_separator != '.' {
        text = text.replacen('.', locale.decimal_separator.encode_utf8(&mut [0; 4]), 1);
    }
    if let Some(suffix) = locale.currency_suffix.as_deref() {
        text.push_str(suffix);
    }
    text
}

/// Rounds half away from zero at `precision` digits.
pub fn round_with_precision(number: f64, precision: Precision) -> f64 {
    if !number.is_finite() {
        return number;
    }

    let digits = precision.rounding_digits();
    match decimal_from_f64(number) {
        Some(decimal) => round_decimal(decimal, digits).to_f64().unwrap_or(number),
        None => {
            let multiplier = 10f64.powi(digits as i32);
            let scaled = number * multiplier;
            if scaled.is_finite() {
                normalize_zero(scaled.round() / multiplier)
            } else {
                number
            }
        }
    }
}

/// Clamps into `[min, max]`. NaN is returned unchanged rather than coerced,
/// so callers decide what "no number" means for them.
pub fn bound_number(number: f64, min: Option<f64>, max: Option<f64>) -> f64 {
    if number.is_nan() {
        return number;
    }

    let mut bounded = number;
    if let Some(min) = min.filter(|min| min.is_finite()) {
        bounded = bounded.max(min);
    }
    if let Some(max) = max.filter(|max| max.is_finite()) {
        bounded = bounded.min(max);
    }
    bounded
}

pub(crate) fn decimal_from_f64(value: f64) -> Option<Decimal> {
    if !value.is_finite() {
        return None;
    }
    Decimal::from_str(&value.to_string()).ok()
}

fn round_decimal(value: Decimal, digits: u32) -> Decimal {
    let mut rounded = value.round_dp_with_strategy(
        digits.min(MAX_DECIMAL_SCALE),
        RoundingStrategy::MidpointAwayFromZero,
    );
    if rounded.is_zero() {
        rounded.set_sign_positive(true);
    }
    rounded
}

fn render_fixed(number: f64, precision: Precision) -> String {
    match precision {
        Precision::Fixed(digits) => match decimal_from_f64(number) {
            Some(decimal) => format!("{:.*}", digits as usize, round_decimal(decimal, digits)),
            None => format!(
                "{:.*}",
                digits as usize,
                round_with_precision(number, precision)
            ),
        },
        Precision::Unbounded => normalize_zero(round_with_precision(number, precision)).to_string(),
    }
}

fn normalize_zero(value: f64) -> f64 {
    if value == 0.0 { 0.0 } else { value }
}

// sign, digits, optional fraction, optional exponent; at least one mantissa digit
fn float_prefix(text: &str) -> &str {
    let bytes = text.as_bytes();
    let digits_from = |mut index: usize| {
        while index < bytes.len() && bytes[index].is_ascii_digit() {
            index += 1;
        }
        index
    };

    let mut end = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
    let integer_end = digits_from(end);
    let mut mantissa_digits = integer_end - end;
    end = integer_end;

    if bytes.get(end) == Some(&b'.') {
        let fraction_end = digits_from(end + 1);
        mantissa_digits += fraction_end - (end + 1);
        if mantissa_digits > 0 {
            end = fraction_end;
        }
    }

    if mantissa_digits == 0 {
        return "";
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exponent = end + 1;
        if matches!(bytes.get(exponent), Some(b'+' | b'-')) {
            exponent += 1;
        }
        let exponent_end = digits_from(exponent);
        if exponent_end > exponent {
            end = exponent_end;
        }
    }

    &text[..end]
}
