use super::selection_state::SelectionState;

/// A text value with a caret, edited by character index.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct InputState {
    pub value: String,
    pub caret: usize,
    pub selection: Option<(usize, usize)>,
}

impl InputState {
    pub fn new(value: impl Into<String>, selection: SelectionState) -> Self {
        let value = value.into();
        let len = value.chars().count();
        let selection = selection.clamped(len);
        Self {
            value,
            caret: selection.focus(),
            selection: (!selection.is_collapsed()).then_some((selection.start, selection.end)),
        }
    }

    pub fn len(&self) -> usize {
        self.value.chars().count()
    }

    pub fn delete_forward(&mut self) -> bool {
        if let Some((start, end)) = self.selection {
            self.replace_char_range(start, end, "");
            return true;
        }
        if self.caret >= self.len() {
            return false;
        }
        self.replace_char_range(self.caret, self.caret + 1, "");
        true
    }

    pub fn replace_char_range(&mut self, start: usize, end: usize, insert: &str) {
        let len = self.len();
        let start = start.min(len);
        let end = end.min(len).max(start);
        let byte_start = Self::byte_index_at_char(&self.value, start);
        let byte_end = Self::byte_index_at_char(&self.value, end);
        self.value.replace_range(byte_start..byte_end, insert);
        self.caret = (start + insert.chars().count()).min(self.len());
        self.selection = None;
    }

    pub fn byte_index_at_char(value: &str, char_index: usize) -> usize {
        value
            .char_indices()
            .nth(char_index)
            .map(|(index, _)| index)
            .unwrap_or(value.len())
    }
}
