//! Internationalization (i18n) support: the locale table, localized URLs
//! and translated UI messages

use anyhow::Result;
use indexmap::IndexMap;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;

use crate::config::SiteConfig;

/// A language the site can be published in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Language {
    pub code: &'static str,
    /// Native name
    pub name: &'static str,
    pub flag: &'static str,
    /// Language-REGION tag used for hreflang and `<html lang>`
    pub region_tag: &'static str,
}

const fn lang(
    code: &'static str,
    name: &'static str,
    flag: &'static str,
    region_tag: &'static str,
) -> Language {
    Language {
        code,
        name,
        flag,
        region_tag,
    }
}

pub const LANGUAGES: &[Language] = &[
    lang("en", "English", "🇺🇸", "en-US"),
    lang("zh", "中文", "🇨🇳", "zh-CN"),
    lang("ja", "日本語", "🇯🇵", "ja-JP"),
    lang("ko", "한국어", "🇰🇷", "ko-KR"),
    lang("de", "Deutsch", "🇩🇪", "de-DE"),
    lang("fr", "Français", "🇫🇷", "fr-FR"),
    lang("es", "Español", "🇪🇸", "es-ES"),
    lang("ru", "Русский", "🇷🇺", "ru-RU"),
    lang("nl", "Nederlands", "🇳🇱", "nl-NL"),
    lang("no", "Norsk", "🇳🇴", "no-NO"),
    lang("sv", "Svenska", "🇸🇪", "sv-SE"),
    lang("fi", "Suomi", "🇫🇮", "fi-FI"),
    lang("da", "Dansk", "🇩🇰", "da-DK"),
    lang("pt", "Português", "🇵🇹", "pt-PT"),
    lang("it", "Italiano", "🇮🇹", "it-IT"),
    lang("pl", "Polski", "🇵🇱", "pl-PL"),
    lang("uk", "Українська", "🇺🇦", "uk-UA"),
    lang("cs", "Čeština", "🇨🇿", "cs-CZ"),
    lang("tr", "Türkçe", "🇹🇷", "tr-TR"),
    lang("ar", "العربية", "🇸🇦", "ar-SA"),
    lang("th", "ไทย", "🇹🇭", "th-TH"),
    lang("vi", "Tiếng Việt", "🇻🇳", "vi-VN"),
    lang("id", "Bahasa Indonesia", "🇮🇩", "id-ID"),
    lang("ms", "Bahasa Melayu", "🇲🇾", "ms-MY"),
    lang("hi", "हिन्दी", "🇮🇳", "hi-IN"),
    lang("bn", "বাংলা", "🇧🇩", "bn-BD"),
    lang("he", "עברית", "🇮🇱", "he-IL"),
    lang("el", "Ελληνικά", "🇬🇷", "el-GR"),
    lang("hu", "Magyar", "🇭🇺", "hu-HU"),
    lang("ro", "Română", "🇷🇴", "ro-RO"),
];

pub fn language(code: &str) -> Option<&'static Language> {
    LANGUAGES.iter().find(|l| l.code == code)
}

/// Language-REGION tag for a locale, or the locale itself when unknown
pub fn region_tag(locale: &str) -> String {
    language(locale)
        .map(|l| l.region_tag.to_string())
        .unwrap_or_else(|| locale.to_string())
}

/// OpenGraph locale (`en_US`), falling back to the default locale's
pub fn og_locale(locale: Option<&str>, default_locale: &str) -> String {
    let tag = match locale.and_then(language) {
        Some(l) => l.region_tag.to_string(),
        None => region_tag(default_locale),
    };
    tag.replace('-', "_")
}

/// Builds absolute, locale-prefixed URLs
#[derive(Debug, Clone)]
pub struct LocaleRouting {
    base_url: String,
    locales: Vec<String>,
    default_locale: String,
    hide_default_locale: bool,
}

impl LocaleRouting {
    pub fn new(config: &SiteConfig) -> Self {
        Self {
            base_url: config.url.trim_end_matches('/').to_string(),
            locales: config.locales.clone(),
            default_locale: config.default_locale.clone(),
            hide_default_locale: config.hide_default_locale,
        }
    }

    pub fn default_locale(&self) -> &str {
        &self.default_locale
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Site-relative path with the locale prefix applied
    pub fn localized_path(&self, path: &str, locale: Option<&str>) -> String {
        let path = if path.is_empty() || path.starts_with('/') {
            path.to_string()
        } else {
            format!("/{}", path)
        };

        match locale {
            Some(locale) if !(self.hide_default_locale && locale == self.default_locale) => {
                format!("/{}{}", locale, path)
            }
            _ => path,
        }
    }

    /// Absolute URL for `path` in `locale`; no locale means the unprefixed URL
    pub fn url(&self, path: &str, locale: Option<&str>) -> String {
        let localized = self.localized_path(path, locale);
        if localized.is_empty() {
            format!("{}/", self.base_url)
        } else {
            format!("{}{}", self.base_url, localized)
        }
    }

    /// hreflang tag -> URL for every locale, plus `x-default`
    pub fn alternates(&self, path: &str) -> IndexMap<String, String> {
        let mut languages: IndexMap<String, String> = self
            .locales
            .iter()
            .map(|locale| (region_tag(locale), self.url(path, Some(locale))))
            .collect();
        languages.insert(
            "x-default".to_string(),
            self.url(path, Some(&self.default_locale)),
        );
        languages
    }
}

/// Translated UI strings, keyed by locale
pub struct Messages {
    default_locale: String,
    /// Language data: lang -> key -> translation
    translations: HashMap<String, HashMap<String, serde_yaml::Value>>,
}

impl Messages {
    pub fn new(default_locale: &str) -> Self {
        Self {
            default_locale: default_locale.to_string(),
            translations: HashMap::new(),
        }
    }

    /// Load `<locale>.yml`, `.yaml` or `.json` message files from a directory.
    ///
    /// When one locale has several files, `.yml` wins over `.yaml`, which
    /// wins over `.json`; the others are skipped.
    pub fn load_dir<P: AsRef<Path>>(&mut self, dir: P) -> Result<()> {
        let dir = dir.as_ref();
        if !dir.exists() {
            return Ok(());
        }

        let mut files = Vec::new();
        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            if !path.is_file() {
                continue;
            }
            let Some(rank) = path
                .extension()
                .and_then(|e| e.to_str())
                .and_then(extension_rank)
            else {
                continue;
            };
            let Some(lang) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            files.push((lang.to_string(), rank, path));
        }
        files.sort();

        let mut loaded = HashSet::new();
        for (lang, _, path) in files {
            if loaded.contains(&lang) {
                tracing::debug!("Skipping messages {:?}: {} already loaded", path, lang);
                continue;
            }

            // JSON is a subset of YAML, so one parser covers every format
            let content = fs::read_to_string(&path)?;
            match serde_yaml::from_str::<HashMap<String, serde_yaml::Value>>(&content) {
                Ok(data) => {
                    self.translations.insert(lang.clone(), data);
                    loaded.insert(lang);
                    tracing::debug!("Loaded messages: {:?}", path);
                }
                Err(e) => tracing::warn!("Failed to parse messages {:?}: {}", path, e),
            }
        }

        Ok(())
    }

    pub fn insert(&mut self, locale: &str, data: HashMap<String, serde_yaml::Value>) {
        self.translations.insert(locale.to_string(), data);
    }

    /// Translation for a dotted key like `blog.allPosts`, falling back to the
    /// default locale and then to the key itself
    pub fn get(&self, locale: &str, key: &str) -> String {
        self.lookup(locale, key)
            .or_else(|| self.lookup(&self.default_locale, key))
            .unwrap_or_else(|| key.to_string())
    }

    /// Like [`Messages::get`], but with a caller-supplied last resort
    pub fn get_or(&self, locale: &str, key: &str, fallback: &str) -> String {
        self.lookup(locale, key)
            .or_else(|| self.lookup(&self.default_locale, key))
            .unwrap_or_else(|| fallback.to_string())
    }

    /// Translation with `{count}` replaced
    pub fn format_count(&self, locale: &str, key: &str, count: usize) -> String {
        self.get(locale, key).replace("{count}", &count.to_string())
    }

    fn lookup(&self, locale: &str, key: &str) -> Option<String> {
        let data = self.translations.get(locale)?;
        get_nested_value(data, key).and_then(yaml_value_to_string)
    }
}

/// Precedence of message file formats, lowest first
fn extension_rank(ext: &str) -> Option<u8> {
    match ext {
        "yml" => Some(0),
        "yaml" => Some(1),
        "json" => Some(2),
        _ => None,
    }
}

/// Get a nested value from a YAML map using dot notation
fn get_nested_value<'a>(
    data: &'a HashMap<String, serde_yaml::Value>,
    key: &str,
) -> Option<&'a serde_yaml::Value> {
    let mut parts = key.split('.');
    let mut current = data.get(parts.next()?)?;

    for part in parts {
        current = current.as_mapping()?.get(part)?;
    }

    Some(current)
}

/// Scalar YAML values as strings; mappings and sequences have no string form
fn yaml_value_to_string(value: &serde_yaml::Value) -> Option<String> {
    match value {
        serde_yaml::Value::String(s) => Some(s.clone()),
        serde_yaml::Value::Number(n) => Some(n.to_string()),
        serde_yaml::Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn routing(hide_default_locale: bool) -> LocaleRouting {
        LocaleRouting::new(&SiteConfig {
            url: "https://blog.example.com/".to_string(),
            locales: vec!["en".into(), "zh".into()],
            default_locale: "en".into(),
            hide_default_locale,
            ..Default::default()
        })
    }

    #[test]
    fn test_og_locale() {
        assert_eq!(og_locale(Some("zh"), "en"), "zh_CN");
        assert_eq!(og_locale(None, "en"), "en_US");
        assert_eq!(og_locale(Some("xx"), "de"), "de_DE");
    }

    #[test]
    fn test_url_hides_default_locale() {
        let routing = routing(true);
        assert_eq!(routing.url("", Some("en")), "https://blog.example.com/");
        assert_eq!(routing.url("", Some("zh")), "https://blog.example.com/zh");
        assert_eq!(
            routing.url("/posts/hello", Some("en")),
            "https://blog.example.com/posts/hello"
        );
        assert_eq!(
            routing.url("posts/hello", Some("zh")),
            "https://blog.example.com/zh/posts/hello"
        );
        assert_eq!(
            routing.url("/sitemap.xml", None),
            "https://blog.example.com/sitemap.xml"
        );
    }

    #[test]
    fn test_url_with_visible_default_locale() {
        let routing = routing(false);
        assert_eq!(
            routing.url("/tags", Some("en")),
            "https://blog.example.com/en/tags"
        );
    }

    #[test]
    fn test_alternates() {
        let alternates = routing(true).alternates("/posts");
        let keys: Vec<&str> = alternates.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["en-US", "zh-CN", "x-default"]);
        assert_eq!(alternates["zh-CN"], "https://blog.example.com/zh/posts");
        assert_eq!(alternates["x-default"], "https://blog.example.com/posts");
    }

    #[test]
    fn test_messages_lookup_and_fallback() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("en.yml"),
            "blog:\n  allPosts: All Posts\n  postsCount: \"{count} posts\"\n",
        )
        .unwrap();
        fs::write(dir.path().join("zh.json"), r#"{"blog": {"allPosts": "全部文章"}}"#).unwrap();
        fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let mut messages = Messages::new("en");
        messages.load_dir(dir.path()).unwrap();

        assert_eq!(messages.get("zh", "blog.allPosts"), "全部文章");
        assert_eq!(messages.get("en", "blog.allPosts"), "All Posts");
        assert_eq!(messages.format_count("zh", "blog.postsCount", 3), "3 posts");
        assert_eq!(messages.get("zh", "blog.missing"), "blog.missing");
        assert_eq!(messages.get("zh", "blog"), "blog");
        assert_eq!(messages.get_or("zh", "tags.title", "Tags"), "Tags");
    }

    #[test]
    fn test_messages_extension_precedence() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("en.json"), r#"{"nav": {"home": "json"}}"#).unwrap();
        fs::write(dir.path().join("en.yaml"), "nav:\n  home: yaml\n").unwrap();
        fs::write(dir.path().join("en.yml"), "nav:\n  home: yml\n").unwrap();
        fs::write(dir.path().join("de.json"), r#"{"nav": {"home": "json"}}"#).unwrap();
        fs::write(dir.path().join("de.yaml"), "nav:\n  home: yaml\n").unwrap();

        for _ in 0..3 {
            let mut messages = Messages::new("en");
            messages.load_dir(dir.path()).unwrap();
            assert_eq!(messages.get("en", "nav.home"), "yml");
            assert_eq!(messages.get("de", "nav.home"), "yaml");
        }
    }

    #[test]
    fn test_messages_unparsable_file_falls_through() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("en.yml"), "nav: [unclosed\n").unwrap();
        fs::write(dir.path().join("en.json"), r#"{"nav": {"home": "Home"}}"#).unwrap();

        let mut messages = Messages::new("en");
        messages.load_dir(dir.path()).unwrap();
        assert_eq!(messages.get("en", "nav.home"), "Home");
    }
}
