mod binding;
mod controller;
mod lens;


pub use calmnum_form_derive::FormModel;
pub use controller::{
    FieldDescriptor, FieldIndex, FieldKey, FormError, FormResult, NumberForm,
};
pub use lens::{FieldLens, FormModel, NumericField};
