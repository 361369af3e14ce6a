use crate::number::{Precision, bound_number, round_with_precision};

use super::text_input_actions::Modifiers;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum StepDirection {
    Up,
    Down,
}

impl StepDirection {
    pub fn sign(self) -> f64 {
        match self {
            Self::Up => 1.0,
            Self::Down => -1.0,
        }
    }
}

/// `0.1` for precise stepping, `10` for coarse stepping, `1` otherwise.
pub fn step_multiplier(modifiers: Modifiers) -> f64 {
    if modifiers.is_precise() {
        0.1
    } else if modifiers.is_coarse() {
        10.0
    } else {
        1.0
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StepConfig {
    pub step: f64,
    pub precision: Precision,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl Default for StepConfig {
    fn default() -> Self {
        Self {
            step: 1.0,
            precision: Precision::default(),
            min: None,
            max: None,
        }
    }
}

impl StepConfig {
    /// Never smaller than [`Precision::step_floor`].
    pub fn step_size(&self, modifiers: Modifiers) -> f64 {
        (self.step * step_multiplier(modifiers)).max(self.precision.step_floor())
    }

    /// Rounds and clamps a raw value the way a bounded commit does.
    pub fn settle(&self, value: f64) -> f64 {
        bound_number(round_with_precision(value, self.precision), self.min, self.max)
    }

    /// The value one step away from `current`. An empty field steps from `0`.
    pub fn stepped_value(
        &self,
        current: Option<f64>,
        direction: StepDirection,
        modifiers: Modifiers,
    ) -> f64 {
        let base = self.settle(current.filter(|value| value.is_finite()).unwrap_or(0.0));
        self.settle(base + direction.sign() * self.step_size(modifiers))
    }
}
