//! Organization name normalization.
//!
//! Estonian legal-form markers are moved to the end of the name in their
//! abbreviated form: `"AS Näidis"` and `"Näidis aktsiaselts"` both become
//! `"Näidis AS"`.

use once_cell::sync::Lazy;
use regex::Regex;

static PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^(AS |OÜ |SAS |MTÜ )[\s.\-]*").expect("valid prefix pattern"));

static LEGAL_FORMS: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    [
        // ASCII word boundaries: a legal form right after a non-ASCII letter still counts
        (r"(?i)(?-u:\b)aktsiaselts(?-u:\b)", "AS"),
        (r"(?i)(?-u:\b)osaühing(?-u:\b)", "OÜ"),
        (r"(?i)(?-u:\b)sihtasutus(?-u:\b)", "SAS"),
        (r"(?i)(?-u:\b)mittetulundusühing(?-u:\b)", "MTÜ"),
    ]
    .into_iter()
    .map(|(pattern, abbreviation)| (Regex::new(pattern).expect("valid legal form pattern"), abbreviation))
    .collect()
});

/// Canonical display form of an organization name. Never fails.
///
/// Every full-word legal form is checked in a fixed order and the last one
/// found decides the suffix, overriding an abbreviated prefix. Commas are
/// stripped from the result, including the one separating the suffix.
pub fn normalize_company_name(raw: &str) -> String {
    let mut name = raw.trim().to_string();
    let mut suffix = String::new();

    if let Some(found) = PREFIX.find(&name) {
        suffix = found.as_str().trim().to_string();
        name = name[found.end()..].to_string();
    }

    for (pattern, abbreviation) in LEGAL_FORMS.iter() {
        if pattern.is_match(&name) {
            name = pattern.replace(&name, "").trim().to_string();
            suffix = abbreviation.to_string();
        }
    }

    if !suffix.is_empty() {
        name = format!("{}, {}", name, suffix);
    }

    name.replace(',', "")
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLES: &[&str] = &[
        "Example Osaühing",
        "AS Näidis",
        "OÜ - Koduabi",
        "  Tartu Sihtasutus  ",
        "Rahvaülikool MITTETULUNDUSÜHING",
        "Kala, Liha ja Piim aktsiaselts",
        "Plain Name",
        "Example OÜ",
        "mtü Kodukant",
        "",
    ];

    #[test]
    fn test_full_word_suffix_is_abbreviated() {
        assert_eq!(normalize_company_name("Example Osaühing"), "Example OÜ");
        assert_eq!(normalize_company_name("Näidis aktsiaselts"), "Näidis AS");
        assert_eq!(normalize_company_name("Tartu Sihtasutus"), "Tartu SAS");
        assert_eq!(normalize_company_name("Küla mittetulundusühing"), "Küla MTÜ");
    }

    #[test]
    fn test_prefix_moves_to_end() {
        assert_eq!(normalize_company_name("AS Näidis"), "Näidis AS");
        assert_eq!(normalize_company_name("mtü Kodukant"), "Kodukant mtü");
        assert_eq!(normalize_company_name("OÜ - Koduabi"), "Koduabi OÜ -");
    }

    #[test]
    fn test_full_word_overrides_prefix() {
        assert_eq!(normalize_company_name("AS Näidis osaühing"), "Näidis OÜ");
    }

    #[test]
    fn test_last_full_word_form_wins() {
        // aktsiaselts is checked before osaühing, so osaühing decides the suffix
        assert_eq!(normalize_company_name("Osaühing Aktsiaselts Segane"), "Segane OÜ");
    }

    #[test]
    fn test_word_boundary_is_ascii() {
        assert_eq!(normalize_company_name("Lõosaühing"), "Lõ OÜ");
        assert_eq!(normalize_company_name("Osaühingud Grupp"), "Osaühingud Grupp");
    }

    #[test]
    fn test_prefix_requires_trailing_space() {
        assert_eq!(normalize_company_name("ASTRA"), "ASTRA");
        assert_eq!(normalize_company_name("AS"), "AS");
    }

    #[test]
    fn test_no_commas_in_output() {
        for sample in SAMPLES {
            assert!(!normalize_company_name(sample).contains(','), "comma left in {:?}", sample);
        }
        assert_eq!(normalize_company_name("Kala, Liha ja Piim"), "Kala Liha ja Piim");
    }

    #[test]
    fn test_idempotent() {
        for sample in SAMPLES {
            let once = normalize_company_name(sample);
            assert_eq!(normalize_company_name(&once), once, "not idempotent for {:?}", sample);
        }
    }
}
