use anyhow::{Result, anyhow};
use isolang::Language;
use once_cell::sync::Lazy;
use regex::Regex;

/// Language utilities for locale code handling
///
/// Locale codes follow the BCP 47 subset the localization engine accepts:
/// a 2 or 3 letter language, an optional 4 letter script and an optional
/// 2 letter or 3 digit region (`en`, `pt-BR`, `zh-Hant-TW`, `es-419`).
/// Language identity is resolved through ISO 639 via `isolang`.
static LOCALE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-z]{2,3}(-[A-Z][a-z]{3})?(-([A-Z]{2}|[0-9]{3}))?$")
        .expect("locale pattern is a valid regex")
});

/// Target languages accepted by the pipeline unless the configuration narrows them
pub const SUPPORTED_LANGUAGES: &[&str] = &[
    "ar", "bg", "bn", "ca", "cs", "da", "de", "el", "en", "en-GB", "en-US", "es", "es-419",
    "et", "fa", "fi", "fr", "fr-CA", "he", "hi", "hr", "hu", "id", "it", "ja", "ko", "lt",
    "lv", "ms", "nl", "no", "pl", "pt", "pt-BR", "pt-PT", "ro", "ru", "sk", "sl", "sr",
    "sv", "sw", "ta", "te", "th", "tr", "uk", "ur", "vi", "zh", "zh-Hans", "zh-Hant",
];

/// The built-in supported set as owned strings, for configuration defaults
pub fn default_supported_languages() -> Vec<String> {
    SUPPORTED_LANGUAGES.iter().map(|s| s.to_string()).collect()
}

/// Normalize the casing and separators of a locale code
///
/// `pt_br` becomes `pt-BR`, `ZH-hant-tw` becomes `zh-Hant-TW`. The result is
/// not validated; use `validate_locale` for that.
pub fn normalize_locale(code: &str) -> String {
    code.trim()
        .split(['-', '_'])
        .enumerate()
        .map(|(i, part)| {
            if i == 0 {
                part.to_lowercase()
            } else if part.len() == 4 {
                let mut chars = part.chars();
                match chars.next() {
                    Some(first) => {
                        first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
                    }
                    None => String::new(),
                }
            } else {
                part.to_uppercase()
            }
        })
        .collect::<Vec<_>>()
        .join("-")
}

/// Validate that a locale code is well formed and names a known ISO 639 language
pub fn validate_locale(code: &str) -> Result<()> {
    if code.trim().is_empty() {
        return Err(anyhow!("Locale code is empty"));
    }

    let normalized = normalize_locale(code);
    if !LOCALE_PATTERN.is_match(&normalized) {
        return Err(anyhow!("Invalid locale code: {}", code));
    }

    lookup_language(base_language(&normalized))
        .map(|_| ())
        .ok_or_else(|| anyhow!("Unknown language in locale code: {}", code))
}

/// Language subtag of a locale code (`en-US` → `en`)
pub fn base_language(code: &str) -> &str {
    let code = code.trim();
    code.split(['-', '_']).next().unwrap_or(code)
}

fn lookup_language(code: &str) -> Option<Language> {
    let code = code.to_lowercase();
    match code.len() {
        2 => Language::from_639_1(&code),
        3 => Language::from_639_3(&code),
        _ => None,
    }
}

/// Normalize the language of a locale code to ISO 639-3 (`pt-BR` → `por`)
pub fn normalize_to_part3(code: &str) -> Result<String> {
    lookup_language(base_language(code))
        .map(|lang| lang.to_639_3().to_string())
        .ok_or_else(|| anyhow!("Cannot normalize invalid language code: {}", code))
}

/// Check if two locale codes name the same language, ignoring script and region
pub fn language_codes_match(code1: &str, code2: &str) -> bool {
    match (normalize_to_part3(code1), normalize_to_part3(code2)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

/// Check whether `code` is a member of the supported set (exact locale match after normalization)
pub fn is_supported_language(code: &str, supported: &[String]) -> bool {
    let normalized = normalize_locale(code);
    supported
        .iter()
        .any(|candidate| normalize_locale(candidate) == normalized)
}

/// Get the English language name from a locale code
pub fn get_language_name(code: &str) -> Result<String> {
    let lang = lookup_language(base_language(code))
        .ok_or_else(|| anyhow!("Failed to get language from code: {}", code))?;

    Ok(lang.to_name().to_string())
}
