use std::collections::VecDeque;

/// The key a text change most likely came from. On-screen keyboards and IME
/// composition often report no key at all, so the engine reconstructs it from
/// the before/after text.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum InferredKey {
    Char(char),
    Backspace,
    Ambiguous,
}

impl InferredKey {
    pub fn is_char(self, expected: char) -> bool {
        self == Self::Char(expected)
    }
}

/// Characters of `b` that could not be matched, in order, against a queue of
/// the characters of `a`.
pub fn find_char_additions(a: &str, b: &str) -> Vec<char> {
    let mut pending = a.chars().collect::<VecDeque<_>>();
    let mut additions = Vec::new();
    for ch in b.chars() {
        if pending.front() == Some(&ch) {
            pending.pop_front();
        } else {
            additions.push(ch);
        }
    }
    additions
}

pub fn find_key_from_diff(previous: &str, current: &str) -> InferredKey {
    let previous_len = previous.chars().count();
    let current_len = current.chars().count();

    if current_len == previous_len + 1 {
        if let [added] = find_char_additions(previous, current)[..] {
            return InferredKey::Char(added);
        }
    } else if current_len + 1 == previous_len
        && find_char_additions(current, previous).len() == 1
    {
        return InferredKey::Backspace;
    }

    InferredKey::Ambiguous
}
