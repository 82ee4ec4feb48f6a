//! Input validation and slug helpers.

use std::sync::OnceLock;

use regex::Regex;

/// URL-friendly slug from a business name: lowercase, common diacritics
/// folded, everything else collapsed to single dashes.
///
/// Slugs are stable once published (they live in shared links), so this is
/// only called at registration time.
pub fn slug_from_name(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut last_dash = true; // suppress leading dash
    for ch in name.trim().to_lowercase().chars() {
        let folded: &str = match ch {
            'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' => "a",
            'è' | 'é' | 'ê' | 'ë' => "e",
            'ì' | 'í' | 'î' | 'ï' => "i",
            'ò' | 'ó' | 'ô' | 'õ' | 'ö' => "o",
            'ù' | 'ú' | 'û' | 'ü' => "u",
            'ñ' => "n",
            'ç' => "c",
            'a'..='z' | '0'..='9' => {
                slug.push(ch);
                last_dash = false;
                continue;
            }
            _ => {
                if !last_dash {
                    slug.push('-');
                    last_dash = true;
                }
                continue;
            }
        };
        slug.push_str(folded);
        last_dash = false;
    }
    if slug.ends_with('-') {
        slug.pop();
    }
    slug
}

fn phone_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^[+]?[(]?[0-9]{3}[)]?[-\s.]?[0-9]{3}[-\s.]?[0-9]{4,6}$").expect("valid regex")
    })
}

fn email_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid regex"))
}

/// Plausibility check for phone numbers. This does NOT normalize: the stored
/// string is whatever the caller sent, and customer identity matches on the
/// exact string.
pub fn is_valid_phone(phone: &str) -> bool {
    let stripped: String = phone.chars().filter(|c| !c.is_whitespace()).collect();
    phone_regex().is_match(&stripped)
}

pub fn is_valid_email(email: &str) -> bool {
    email_regex().is_match(email)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slug_basic() {
        assert_eq!(slug_from_name("Salone da Anna"), "salone-da-anna");
    }

    #[test]
    fn test_slug_folds_diacritics() {
        assert_eq!(slug_from_name("Beauté Café"), "beaute-cafe");
        assert_eq!(slug_from_name("Peluquería Niño"), "peluqueria-nino");
    }

    #[test]
    fn test_slug_collapses_punctuation() {
        assert_eq!(slug_from_name("  Anna & Co. -- Parrucchieri  "), "anna-co-parrucchieri");
    }

    #[test]
    fn test_slug_no_leading_or_trailing_dash() {
        assert_eq!(slug_from_name("!Ciao!"), "ciao");
    }

    #[test]
    fn test_valid_phones() {
        assert!(is_valid_phone("3331234567"));
        assert!(is_valid_phone("333 123 4567"));
        assert!(is_valid_phone("333-123-4567"));
        assert!(is_valid_phone("+393331234567"));
    }

    #[test]
    fn test_invalid_phones() {
        assert!(!is_valid_phone("12"));
        assert!(!is_valid_phone("not a phone"));
        assert!(!is_valid_phone(""));
    }

    #[test]
    fn test_emails() {
        assert!(is_valid_email("mario.rossi@example.it"));
        assert!(!is_valid_email("mario rossi@example.it"));
        assert!(!is_valid_email("mario@"));
    }
}
