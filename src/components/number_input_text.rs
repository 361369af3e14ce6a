use crate::i18n::LocaleConfig;

pub fn has_decimal_separator(text: &str, locale: &LocaleConfig) -> bool {
    text.chars().any(|ch| locale.is_separator_like(ch))
}

/// Char index of the first separator in `text`, counting `.` as a separator
/// too.
pub fn separator_index(text: &str, locale: &LocaleConfig) -> Option<usize> {
    text.chars().position(|ch| locale.is_separator_like(ch))
}

/// Keeps only the first separator-like character, rewritten to the locale's
/// separator.
pub fn remove_duplicate_separators(text: &str, locale: &LocaleConfig) -> String {
    let mut seen = false;
    text.chars()
        .filter_map(|ch| {
            if !locale.is_separator_like(ch) {
                return Some(ch);
            }
            if seen {
                return None;
            }
            seen = true;
            Some(locale.decimal_separator)
        })
        .collect()
}

/// Collapses runs of adjacent separator-like characters into the first one.
/// Returns the new text and the indices (in `text`) of the removed characters.
pub fn collapse_adjacent_separators(text: &str, locale: &LocaleConfig) -> (String, Vec<usize>) {
    let mut collapsed = String::with_capacity(text.len());
    let mut removed = Vec::new();
    let mut previous_was_separator = false;

    for (index, ch) in text.chars().enumerate() {
        let is_separator = locale.is_separator_like(ch);
        if is_separator && previous_was_separator {
            removed.push(index);
            continue;
        }
        collapsed.push(if is_separator {
            locale.decimal_separator
        } else {
            ch
        });
        previous_was_separator = is_separator;
    }

    (collapsed, removed)
}

pub fn has_adjacent_separators(text: &str, locale: &LocaleConfig) -> bool {
    let chars = text.chars().collect::<Vec<_>>();
    chars
        .windows(2)
        .any(|pair| locale.is_separator_like(pair[0]) && locale.is_separator_like(pair[1]))
}

/// Start of the trailing run of characters that are neither digits nor
/// separators, i.e. where a (possibly damaged) suffix begins.
pub fn trailing_suffix_start(text: &str, locale: &LocaleConfig) -> usize {
    let chars = text.chars().collect::<Vec<_>>();
    let mut start = chars.len();
    while start > 0 {
        let ch = chars[start - 1];
        if ch.is_ascii_digit() || locale.is_separator_like(ch) {
            break;
        }
        start -= 1;
    }
    start
}

/// Drops the trailing suffix run and normalizes a `.` to the locale separator.
pub fn remove_suffix(text: &str, locale: &LocaleConfig) -> String {
    let end = trailing_suffix_start(text, locale);
    text.chars()
        .take(end)
        .map(|ch| {
            if locale.is_separator_like(ch) {
                locale.decimal_separator
            } else {
                ch
            }
        })
        .collect()
}

pub fn remove_spaces(text: &str) -> String {
    text.chars().filter(|ch| !ch.is_whitespace()).collect()
}

/// Reduces arbitrary input (typically a paste) to sign, digits and a single
/// separator, then re-appends the suffix.
pub fn sanitize_input_value(text: &str, locale: &LocaleConfig) -> String {
    let mut kept = String::with_capacity(text.len());
    for ch in text.chars() {
        if ch.is_ascii_digit() || locale.is_separator_like(ch) || (ch == '-' && kept.is_empty()) {
            kept.push(ch);
        }
    }

    let mut sanitized = remove_duplicate_separators(&kept, locale);
    if sanitized.is_empty() {
        return sanitized;
    }
    sanitized.push_str(locale.suffix());
    sanitized
}

/// Length of the part of a formatted text that precedes the suffix.
pub fn numeric_end(text: &str, locale: &LocaleConfig) -> usize {
    let len = text.chars().count();
    let suffix = locale.suffix();
    if !suffix.is_empty() && text.ends_with(suffix) {
        len - suffix.chars().count()
    } else {
        len
    }
}

pub fn char_at(text: &str, index: usize) -> Option<char> {
    text.chars().nth(index)
}
