pub use crate::components::{
    ActivationEvent, Commit, EditKey, EventResponse, FieldPhase, FocusRequest, Modifiers,
    NumberInput, RepeatSchedule, RepeatingActivation, SelectionDirection, SelectionState,
    StepDirection, TextFieldProps, stepper_action,
};
pub use crate::form::{
    FieldDescriptor, FieldIndex, FieldKey, FieldLens, FormError, FormModel, FormResult,
    NumberForm,
};
pub use crate::i18n::{LocaleConfig, LocalePreset};
pub use crate::number::Precision;
