use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Locale code used to key localized text (`en`, `ar`, `fr-CA`, ...).
///
/// Codes are normalized to lowercase with `-` separators so `ar_SA` and `AR-sa` resolve to the
/// same entry.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct Locale(String);

const DEFAULT_LOCALE: &str = "en";
const RTL_LANGUAGES: [&str; 4] = ["ar", "fa", "he", "ur"];

impl Locale {
    pub fn new(code: impl AsRef<str>) -> Self {
        let normalized = code.as_ref().trim().replace('_', "-").to_ascii_lowercase();
        if normalized.is_empty() {
            Self::english()
        } else {
            Self(normalized)
        }
    }

    pub fn english() -> Self {
        Self(DEFAULT_LOCALE.to_string())
    }

    pub fn arabic() -> Self {
        Self("ar".to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Primary language subtag (`ar` for `ar-sa`).
    pub fn language(&self) -> &str {
        self.0.split('-').next().unwrap_or(&self.0)
    }

    pub fn direction(&self) -> TextDirection {
        if RTL_LANGUAGES.contains(&self.language()) {
            TextDirection::Rtl
        } else {
            TextDirection::Ltr
        }
    }

    pub fn is_default(&self) -> bool {
        self.language() == DEFAULT_LOCALE
    }
}

impl Default for Locale {
    fn default() -> Self {
        Self::english()
    }
}

impl From<String> for Locale {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl From<&str> for Locale {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<Locale> for String {
    fn from(value: Locale) -> Self {
        value.0
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextDirection {
    Ltr,
    Rtl,
}

/// Text keyed by locale.
///
/// Lookups fall back from the exact locale to its language, then to English, then to whatever
/// entry exists, so a catalog can gain a locale without every string being translated at once.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LocalizedText(BTreeMap<Locale, String>);

impl LocalizedText {
    pub fn new() -> Self {
        Self::default()
    }

    /// English/Arabic pair, the two locales the standard catalog ships with.
    pub fn en_ar(en: impl Into<String>, ar: impl Into<String>) -> Self {
        Self::new()
            .with(Locale::english(), en)
            .with(Locale::arabic(), ar)
    }

    pub fn with(mut self, locale: impl Into<Locale>, text: impl Into<String>) -> Self {
        self.insert(locale, text);
        self
    }

    pub fn insert(&mut self, locale: impl Into<Locale>, text: impl Into<String>) {
        self.0.insert(locale.into(), text.into());
    }

    pub fn get_exact(&self, locale: &Locale) -> Option<&str> {
        self.0.get(locale).map(String::as_str)
    }

    pub fn get(&self, locale: &Locale) -> &str {
        if let Some(text) = self.get_exact(locale) {
            return text;
        }

        let language = Locale::new(locale.language());
        if let Some(text) = self.get_exact(&language) {
            return text;
        }

        if let Some(text) = self.get_exact(&Locale::english()) {
            return text;
        }

        self.0.values().next().map(String::as_str).unwrap_or("")
    }

    pub fn locales(&self) -> impl Iterator<Item = &Locale> {
        self.0.keys()
    }

    pub fn is_empty(&self) -> bool {
        self.0.values().all(|text| text.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_locale_codes() {
        assert_eq!(Locale::new(" AR_sa "), Locale::new("ar-SA"));
        assert_eq!(Locale::new("ar-SA").language(), "ar");
        assert_eq!(Locale::new(""), Locale::english());
    }

    #[test]
    fn arabic_is_right_to_left() {
        assert_eq!(Locale::arabic().direction(), TextDirection::Rtl);
        assert_eq!(Locale::new("ar-EG").direction(), TextDirection::Rtl);
        assert_eq!(Locale::english().direction(), TextDirection::Ltr);
    }

    #[test]
    fn lookup_falls_back_through_language_then_english() {
        let text = LocalizedText::en_ar("Licensing", "التراخيص");

        assert_eq!(text.get(&Locale::arabic()), "التراخيص");
        assert_eq!(text.get(&Locale::new("ar-SA")), "التراخيص");
        assert_eq!(text.get(&Locale::new("fr")), "Licensing");
    }

    #[test]
    fn lookup_uses_any_entry_when_english_missing() {
        let text = LocalizedText::new().with("fr", "Licences");
        assert_eq!(text.get(&Locale::english()), "Licences");
        assert_eq!(LocalizedText::new().get(&Locale::english()), "");
    }

    #[test]
    fn additional_locales_need_no_schema_change() {
        let text: LocalizedText =
            serde_json::from_str(r#"{"en":"Yes","ar":"نعم","fr":"Oui"}"#).expect("valid json");
        assert_eq!(text.get(&Locale::new("FR")), "Oui");
        assert_eq!(text.locales().count(), 3);
    }
}
