use crate::number::Precision;

/// How numbers are written for one locale: the decimal separator and an
/// optional suffix such as `" €"` appended after the digits.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct LocaleConfig {
    pub decimal_separator: char,
    pub currency_suffix: Option<String>,
}

impl Default for LocaleConfig {
    fn default() -> Self {
        Self::new('.')
    }
}

impl LocaleConfig {
    pub fn new(decimal_separator: char) -> Self {
        Self {
            decimal_separator,
            currency_suffix: None,
        }
    }

    pub fn with_suffix(mut self, suffix: impl Into<String>) -> Self {
        let suffix = suffix.into();
        self.currency_suffix = (!suffix.is_empty()).then_some(suffix);
        self
    }

    pub fn suffix(&self) -> &str {
        self.currency_suffix.as_deref().unwrap_or_default()
    }

    /// `.` always counts as a separator keystroke, whatever the locale uses.
    pub fn is_separator_like(&self, ch: char) -> bool {
        ch == self.decimal_separator || ch == '.'
    }

    /// Picks the separator for a locale tag such as `de-DE`, `de_DE.UTF-8` or
    /// `en`. Unknown languages fall back to `.`.
    pub fn from_locale_tag(tag: &str) -> Self {
        let normalized = normalize_locale_tag(tag);
        let language = normalized.split('-').next().unwrap_or_default();
        if COMMA_LANGUAGES.contains(&language) {
            Self::new(',')
        } else {
            Self::default()
        }
    }

    #[cfg(feature = "i18n")]
    pub fn system() -> Self {
        match sys_locale::get_locale() {
            Some(tag) => {
                log::debug!("resolving number locale from system tag {tag}");
                Self::from_locale_tag(&tag)
            }
            None => Self::default(),
        }
    }
}

const COMMA_LANGUAGES: &[&str] = &[
    "bg", "cs", "da", "de", "el", "es", "fi", "fr", "hr", "hu", "id", "it", "lt", "lv", "nb",
    "nl", "nn", "no", "pl", "pt", "ro", "ru", "sk", "sl", "sr", "sv", "tr", "uk", "vi",
];

/// Named formats a field can be configured from.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum LocalePreset {
    Invariant,
    German,
    Euro,
    SchoolGrade,
}

impl LocalePreset {
    pub fn config(self) -> LocaleConfig {
        match self {
            Self::Invariant => LocaleConfig::default(),
            Self::German | Self::SchoolGrade => LocaleConfig::new(','),
            Self::Euro => LocaleConfig::new(',').with_suffix(" €"),
        }
    }

    pub fn precision(self) -> Precision {
        match self {
            Self::Invariant | Self::German => Precision::Fixed(0),
            Self::Euro => Precision::Fixed(2),
            Self::SchoolGrade => Precision::Fixed(1),
        }
    }

    /// Range and step implied by the preset, if any.
    pub fn range(self) -> Option<(f64, f64, f64)> {
        match self {
            Self::SchoolGrade => Some((1.0, 6.0, 0.1)),
            _ => None,
        }
    }
}

fn normalize_locale_tag(tag: &str) -> String {
    let trimmed = tag.trim();
    let without_encoding = trimmed.split('.').next().unwrap_or(trimmed);
    let without_variant = without_encoding
        .split('@')
        .next()
        .unwrap_or(without_encoding);
    without_variant
        .replace('_', "-")
        .split('-')
        .filter(|segment| !segment.is_empty())
        .map(|segment| segment.to_ascii_lowercase())
        .collect::<Vec<_>>()
        .join("-")
}
