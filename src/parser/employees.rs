use super::{element_text, next_element};
use crate::constants::{
    EMPLOYEES_LABEL, EMPLOYEES_LABEL_SELECTOR, EMPLOYEE_COUNT_MAX, EMPLOYEE_COUNT_MIN,
};
use crate::types::EmployeeCount;
use once_cell::sync::Lazy;
use scraper::{Html, Selector};

static EMPLOYEES_LABEL_BLOCK: Lazy<Selector> =
    Lazy::new(|| Selector::parse(EMPLOYEES_LABEL_SELECTOR).expect("valid employees selector"));

/// Inclusive range of employee counts accepted as plausible.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmployeeBounds {
    pub min: i64,
    pub max: i64,
}

impl Default for EmployeeBounds {
    fn default() -> Self {
        Self {
            min: EMPLOYEE_COUNT_MIN,
            max: EMPLOYEE_COUNT_MAX,
        }
    }
}

impl EmployeeBounds {
    pub fn contains(&self, value: i64) -> bool {
        (self.min..=self.max).contains(&value)
    }
}

/// Reads the employee count from a client-rendered profile DOM: the text of
/// the element right after the "Töötajate arv" label.
pub fn extract_employee_count(rendered_html: &str, bounds: EmployeeBounds) -> EmployeeCount {
    let document = Html::parse_document(rendered_html);

    let Some(label) = document
        .select(&EMPLOYEES_LABEL_BLOCK)
        .find(|el| element_text(el) == EMPLOYEES_LABEL)
    else {
        return EmployeeCount::LabelNotFound;
    };

    let Some(value) = next_element(&label) else {
        return EmployeeCount::NextSiblingNotFound;
    };

    let text = element_text(&value);
    match parse_leading_int(&text) {
        Some(count) if bounds.contains(count) => EmployeeCount::Count(count),
        Some(_) => EmployeeCount::InvalidNumber,
        None => EmployeeCount::NotANumber(text),
    }
}

/// Integer prefix of `text` after leading whitespace, with an optional sign:
/// `"12 inimest"` is 12, `"1 234"` is 1 and `"puudub"` is `None`.
/// Values beyond `i64` saturate.
pub fn parse_leading_int(text: &str) -> Option<i64> {
    let trimmed = text.trim_start();
    let (negative, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let digits: &str = {
        let end = digits
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(digits.len());
        &digits[..end]
    };
    if digits.is_empty() {
        return None;
    }

    let magnitude = digits.bytes().fold(0i64, |acc, b| {
        acc.saturating_mul(10).saturating_add(i64::from(b - b'0'))
    });
    Some(if negative { -magnitude } else { magnitude })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rendered_page(value: &str) -> String {
        format!(
            r#"<div class="row">
                 <div class="col-md-6 text-muted">Käive</div>
                 <div class="col-md-6">120 000</div>
                 <div class="col-md-6 text-muted">Töötajate arv</div>
                 <div class="col-md-6">{}</div>
               </div>"#,
            value
        )
    }

    #[test]
    fn test_count_within_bounds() {
        let count = extract_employee_count(&rendered_page(" 42 "), EmployeeBounds::default());
        assert_eq!(count, EmployeeCount::Count(42));
        let count = extract_employee_count(&rendered_page("5000"), EmployeeBounds::default());
        assert_eq!(count, EmployeeCount::Count(5000));
    }

    #[test]
    fn test_zero_is_invalid() {
        let count = extract_employee_count(&rendered_page("0"), EmployeeBounds::default());
        assert_eq!(count, EmployeeCount::InvalidNumber);
        assert_eq!(count.to_string(), "Invalid number");
    }

    #[test]
    fn test_above_upper_bound_is_invalid() {
        let count = extract_employee_count(&rendered_page("5001"), EmployeeBounds::default());
        assert_eq!(count, EmployeeCount::InvalidNumber);
    }

    #[test]
    fn test_non_numeric_text() {
        let count = extract_employee_count(&rendered_page("andmed puuduvad"), EmployeeBounds::default());
        assert_eq!(count, EmployeeCount::NotANumber("andmed puuduvad".into()));
        assert_eq!(count.to_string(), "Parsed value is NaN for text: andmed puuduvad");
    }

    #[test]
    fn test_label_missing() {
        let html = r#"<div class="col-md-6 text-muted">Käive</div><div>1</div>"#;
        assert_eq!(
            extract_employee_count(html, EmployeeBounds::default()),
            EmployeeCount::LabelNotFound
        );
    }

    #[test]
    fn test_label_without_sibling() {
        let html = r#"<div><div class="col-md-6 text-muted">Töötajate arv</div></div>"#;
        assert_eq!(
            extract_employee_count(html, EmployeeBounds::default()),
            EmployeeCount::NextSiblingNotFound
        );
    }

    #[test]
    fn test_parse_leading_int() {
        assert_eq!(parse_leading_int("12"), Some(12));
        assert_eq!(parse_leading_int("  7 inimest"), Some(7));
        assert_eq!(parse_leading_int("1 234"), Some(1));
        assert_eq!(parse_leading_int("-3"), Some(-3));
        assert_eq!(parse_leading_int("+8"), Some(8));
        assert_eq!(parse_leading_int("abc"), None);
        assert_eq!(parse_leading_int(""), None);
        assert_eq!(parse_leading_int("-"), None);
        assert_eq!(parse_leading_int("99999999999999999999999"), Some(i64::MAX));
    }
}
