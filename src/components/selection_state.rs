#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum SelectionDirection {
    #[default]
    None,
    Forward,
    Backward,
}

/// Caret or range inside the display text, in character indices.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct SelectionState {
    pub start: usize,
    pub end: usize,
    pub direction: SelectionDirection,
}

impl SelectionState {
    pub fn caret(at: usize) -> Self {
        Self {
            start: at,
            end: at,
            direction: SelectionDirection::None,
        }
    }

    pub fn range(start: usize, end: usize, direction: SelectionDirection) -> Self {
        let (start, end) = if start <= end {
            (start, end)
        } else {
            (end, start)
        };
        Self {
            start,
            end,
            direction,
        }
    }

    pub fn is_collapsed(&self) -> bool {
        self.start == self.end
    }

    /// Where the caret is drawn: the moving end of a range.
    pub fn focus(&self) -> usize {
        match self.direction {
            SelectionDirection::Backward => self.start,
            _ => self.end,
        }
    }

    pub fn selects_all(&self, len: usize) -> bool {
        len > 0 && self.start == 0 && self.end >= len
    }

    pub fn clamped(self, len: usize) -> Self {
        Self {
            start: self.start.min(len),
            end: self.end.min(len),
            direction: self.direction,
        }
    }
}

/// Remembers the last selection so it can be put back after the text element
/// has been recreated or refocused.
#[derive(Clone, Copy, Debug, Default)]
pub struct SelectionMemory {
    snapshot: SelectionState,
}

impl SelectionMemory {
    pub fn snapshot(&self) -> SelectionState {
        self.snapshot
    }

    pub fn capture(&mut self, selection: SelectionState) {
        self.snapshot = selection;
    }

    pub fn place_caret(&mut self, at: usize) {
        self.snapshot = SelectionState::caret(at);
    }

    /// The stored selection, clamped into a text of `len` characters.
    pub fn restore(&self, len: usize) -> SelectionState {
        self.snapshot.clamped(len)
    }
}
