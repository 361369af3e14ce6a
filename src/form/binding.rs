use super::controller::{FieldIndex, FormResult, NumberForm};
use super::lens::{FieldLens, FormModel};
use crate::components::NumberInput;

impl NumberForm {
    /// An input for the field at `index`, configured from its descriptor,
    /// showing the form's current value and committing back into the form.
    pub fn bind(&self, index: FieldIndex) -> FormResult<NumberInput> {
        let input = {
            let state = self.read("binding a field")?;
            let slot = state.slot(index)?;
            slot.descriptor.build_input(&slot.name)
        };
        self.bind_with(index, input)
    }

    /// Binds a caller-configured input. Its name, value and change handler
    /// are replaced by the form's.
    pub fn bind_with(&self, index: FieldIndex, input: NumberInput) -> FormResult<NumberInput> {
        let (name, value) = {
            let state = self.read("binding a field")?;
            let slot = state.slot(index)?;
            (slot.name.clone(), slot.value)
        };

        let form = self.clone();
        let route = name.clone();
        Ok(input.name(name).value(value).on_change(move |next, _name| {
            if let Err(error) = form.apply_change(&route, next) {
                log::warn!("dropped change for {route}: {error}");
            }
        }))
    }

    pub fn bind_lens<T, L>(&self, lens: L) -> FormResult<NumberInput>
    where
        T: FormModel,
        L: FieldLens<T>,
    {
        self.bind(self.index_of_key(lens.key())?)
    }
}
