/// Keys the number input reacts to on key-down. Everything else reaches the
/// engine only as a text change.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum EditKey {
    Enter,
    ArrowUp,
    ArrowDown,
    Delete,
    Backspace,
    Character(char),
    Other(String),
}

impl EditKey {
    /// Accepts both DOM-style (`ArrowUp`, `Enter`) and keystroke-style
    /// (`up`, `enter`) names.
    pub fn from_key_name(name: &str) -> Self {
        let mut chars = name.chars();
        if let (Some(ch), None) = (chars.next(), chars.next()) {
            return Self::Character(ch);
        }

        match name.to_ascii_lowercase().as_str() {
            "enter" | "return" => Self::Enter,
            "arrowup" | "up" => Self::ArrowUp,
            "arrowdown" | "down" => Self::ArrowDown,
            "delete" | "del" => Self::Delete,
            "backspace" => Self::Backspace,
            "space" | "spacebar" => Self::Character(' '),
            _ => Self::Other(name.to_string()),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Modifiers {
    pub shift: bool,
    pub control: bool,
    pub alt: bool,
    pub platform: bool,
}

impl Modifiers {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn shift() -> Self {
        Self {
            shift: true,
            ..Self::default()
        }
    }

    pub fn alt() -> Self {
        Self {
            alt: true,
            ..Self::default()
        }
    }

    /// Fine-grained stepping.
    pub fn is_precise(&self) -> bool {
        self.alt || self.control
    }

    /// Large stepping.
    pub fn is_coarse(&self) -> bool {
        self.shift
    }
}
