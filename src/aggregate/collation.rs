//! Locale-aware string ordering for category and tag listings

use icu_collator::{Collator as IcuCollator, CollatorOptions};
use icu_locid::Locale;
use std::cmp::Ordering;
use std::fmt;

/// A string comparison strategy
pub trait Collator {
    fn compare(&self, a: &str, b: &str) -> Ordering;
}

impl<F> Collator for F
where
    F: Fn(&str, &str) -> Ordering,
{
    fn compare(&self, a: &str, b: &str) -> Ordering {
        self(a, b)
    }
}

/// Plain code point order
#[derive(Debug, Clone, Copy, Default)]
pub struct ByteOrderCollator;

impl Collator for ByteOrderCollator {
    fn compare(&self, a: &str, b: &str) -> Ordering {
        a.cmp(b)
    }
}

/// Collator backed by the CLDR collation rules for one locale.
///
/// Tailorings come from the locale's CLDR data: Czech `ch` after `h`,
/// Turkish `ç` after `c`, Swedish `å ä ö` after `z`, pinyin order for
/// Chinese. Locales without tailoring use the root collation, which still
/// orders every script by its alphabet rather than by code point.
/// Strings the rules consider equal fall back to code point order, so the
/// result is a total order.
pub struct LocaleCollator {
    locale: String,
    inner: Option<IcuCollator>,
}

impl LocaleCollator {
    pub fn new(locale: &str) -> Self {
        let tag = parse_locale(locale).unwrap_or_else(|| {
            tracing::warn!("Unparseable locale `{}`, using root collation", locale);
            Locale::UND
        });

        let inner = match IcuCollator::try_new(&(&tag).into(), CollatorOptions::new()) {
            Ok(collator) => Some(collator),
            Err(e) => {
                tracing::warn!(
                    "No collation data for `{}` ({}), using code point order",
                    locale,
                    e
                );
                None
            }
        };

        Self {
            locale: locale.to_string(),
            inner,
        }
    }

    pub fn locale(&self) -> &str {
        &self.locale
    }
}

impl fmt::Debug for LocaleCollator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocaleCollator")
            .field("locale", &self.locale)
            .field("tailored", &self.inner.is_some())
            .finish()
    }
}

impl Collator for LocaleCollator {
    fn compare(&self, a: &str, b: &str) -> Ordering {
        match &self.inner {
            Some(collator) => collator.compare(a, b).then_with(|| a.cmp(b)),
            None => a.cmp(b),
        }
    }
}

/// BCP 47 tag for a configured locale; `en_US` is accepted as `en-US`
fn parse_locale(locale: &str) -> Option<Locale> {
    locale.replace('_', "-").parse::<Locale>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sorted(collator: &dyn Collator, words: &[&str]) -> Vec<String> {
        let mut words: Vec<String> = words.iter().map(|w| w.to_string()).collect();
        words.sort_by(|a, b| collator.compare(a, b));
        words
    }

    #[test]
    fn test_case_insensitive_primary_order() {
        let collator = LocaleCollator::new("en");
        assert_eq!(
            sorted(&collator, &["banana", "Apple", "cherry"]),
            vec!["Apple", "banana", "cherry"]
        );
        // Byte order would put every uppercase letter first
        assert_eq!(
            sorted(&ByteOrderCollator, &["banana", "Apple", "Cherry"]),
            vec!["Apple", "Cherry", "banana"]
        );
    }

    #[test]
    fn test_accents_sort_with_base_letter() {
        let collator = LocaleCollator::new("fr");
        assert_eq!(
            sorted(&collator, &["zèbre", "école", "eclair", "Etude"]),
            vec!["eclair", "école", "Etude", "zèbre"]
        );
    }

    #[test]
    fn test_swedish_letters_after_z() {
        let words = ["öl", "zon", "åka", "apa"];
        assert_eq!(
            sorted(&LocaleCollator::new("sv-SE"), &words),
            vec!["apa", "zon", "åka", "öl"]
        );
        assert_eq!(
            sorted(&LocaleCollator::new("de"), &words),
            vec!["åka", "apa", "öl", "zon"]
        );
    }

    #[test]
    fn test_spanish_enye() {
        assert_eq!(
            sorted(&LocaleCollator::new("es"), &["ñu", "nube", "oso"]),
            vec!["nube", "ñu", "oso"]
        );
    }

    #[test]
    fn test_total_order_on_case_variants() {
        let collator = LocaleCollator::new("en");
        assert_eq!(collator.compare("rust", "Rust"), Ordering::Less);
        assert_eq!(collator.compare("Rust", "Rust"), Ordering::Equal);
    }

    #[test]
    fn test_cyrillic_and_greek_alphabet_order() {
        assert_eq!(
            sorted(&LocaleCollator::new("ru"), &["жук", "яблоко", "ёж"]),
            vec!["ёж", "жук", "яблоко"]
        );
        assert_eq!(
            sorted(&LocaleCollator::new("el"), &["άγαλμα", "ωμέγα", "αβγό"]),
            vec!["αβγό", "άγαλμα", "ωμέγα"]
        );
    }

    #[test]
    fn test_czech_ch_after_h() {
        assert_eq!(
            sorted(&LocaleCollator::new("cs"), &["chata", "čaj", "hrad", "cukr", "dům"]),
            vec!["cukr", "čaj", "dům", "hrad", "chata"]
        );
    }

    #[test]
    fn test_turkish_and_polish_letters() {
        assert_eq!(
            sorted(&LocaleCollator::new("tr"), &["çay", "cz", "d"]),
            vec!["cz", "çay", "d"]
        );
        assert_eq!(
            sorted(&LocaleCollator::new("pl"), &["łódź", "m", "lz"]),
            vec!["lz", "łódź", "m"]
        );
    }

    #[test]
    fn test_chinese_pinyin_order() {
        assert_eq!(
            sorted(&LocaleCollator::new("zh"), &["中文", "北京", "安全"]),
            vec!["安全", "北京", "中文"]
        );
    }

    #[test]
    fn test_region_and_unknown_locales() {
        let collator = LocaleCollator::new("sv_SE");
        assert_eq!(sorted(&collator, &["öl", "zon"]), vec!["zon", "öl"]);
        // Unknown languages fall back to the root order
        assert_eq!(
            sorted(&LocaleCollator::new("not a locale"), &["b", "A", "a"]),
            vec!["a", "A", "b"]
        );
    }

    #[test]
    fn test_closure_collator() {
        let reverse = |a: &str, b: &str| b.cmp(a);
        assert_eq!(sorted(&reverse, &["a", "c", "b"]), vec!["c", "b", "a"]);
    }
}
