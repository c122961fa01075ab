//! Static language registry and panel limits.
//! All strings are &'static str; the registry is never mutated.

/// Registry entry: language code and its display name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Language {
    pub code: &'static str,
    pub name: &'static str,
}

impl Language {
    const fn new(code: &'static str, name: &'static str) -> Self {
        Self { code, name }
    }
}

/// Code used for both sides of a freshly mounted panel
pub const FALLBACK_CODE: &str = "en";

/// Display name returned for codes missing from the registry
pub const FALLBACK_NAME: &str = "English";

/// Language registry. Order here is the order of the picker.
pub static LANGUAGES: &[Language] = &[
    Language::new("en", "English"),
    Language::new("es", "Spanish"),
    Language::new("fr", "French"),
    Language::new("de", "German"),
    Language::new("it", "Italian"),
    Language::new("pt", "Portuguese"),
    Language::new("nl", "Dutch"),
    Language::new("pl", "Polish"),
    Language::new("ru", "Russian"),
    Language::new("uk", "Ukrainian"),
    Language::new("tr", "Turkish"),
    Language::new("ar", "Arabic"),
    Language::new("hy", "Armenian"),
    Language::new("fa", "Persian"),
    Language::new("hi", "Hindi"),
    Language::new("bn", "Bengali"),
    Language::new("zh", "Chinese"),
    Language::new("ja", "Japanese"),
    Language::new("ko", "Korean"),
    Language::new("vi", "Vietnamese"),
    Language::new("th", "Thai"),
    Language::new("id", "Indonesian"),
    Language::new("sv", "Swedish"),
    Language::new("fi", "Finnish"),
    Language::new("el", "Greek"),
];

/// Exact-match lookup by code
#[inline]
pub fn find_language(code: &str) -> Option<&'static Language> {
    LANGUAGES.iter().find(|l| l.code == code)
}

/// Display name for a code, falling back to English for unknown codes
#[inline]
pub fn lookup(code: &str) -> &'static str {
    find_language(code).map_or(FALLBACK_NAME, |l| l.name)
}

/// All registry entries in display order
#[inline]
pub fn entries() -> impl Iterator<Item = &'static Language> {
    LANGUAGES.iter()
}

/// HTTP client settings
pub mod headers {
    pub const USER_AGENT: &str = concat!("langpair_bot/", env!("CARGO_PKG_VERSION"));
}

/// Limits and thresholds
pub mod limits {
    pub const MAX_INPUT_CHARS: usize = 200;
    /// Appended to the escaped query text, kept for endpoint compatibility
    pub const QUERY_SUFFIX: &str = "!";
    pub const REQUEST_TIMEOUT_SECS: u64 = 15;
    pub const PICKER_COLUMNS: usize = 3;
}

/// Environment variable names
pub mod env_keys {
    pub const BOT_TOKEN: &str = "TELOXIDE_TOKEN";
    pub const API_URL: &str = "TRANSLATOR_API_URL";
}
