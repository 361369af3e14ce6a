pub mod key_diff;
pub mod number_input;
pub mod number_input_text;
pub mod repeat_activation;
pub mod selection_state;
pub mod stepper;
pub mod text_input_actions;
pub mod text_input_state;

#[cfg(test)]
mod test_edit_scenarios;

pub use key_diff::{InferredKey, find_key_from_diff};
pub use number_input::{
    Commit, EventResponse, FieldPhase, FocusRequest, NumberInput, TextFieldProps, stepper_action,
};
pub use repeat_activation::{
    ActivationEvent, CancellationHandle, RepeatSchedule, RepeatingActivation,
};
pub use selection_state::{SelectionDirection, SelectionMemory, SelectionState};
pub use stepper::{StepConfig, StepDirection};
pub use text_input_actions::{EditKey, Modifiers};
