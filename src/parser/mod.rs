//! Field extraction from registry profile pages.
//!
//! The server-rendered page carries the activity code, its label and the
//! address; the employee count only exists after client-side rendering and is
//! read from a separate DOM snapshot.

pub mod county;
pub mod employees;
pub mod profile;

pub use county::CountyMap;
pub use employees::{extract_employee_count, parse_leading_int, EmployeeBounds};
pub use profile::{extract_static_fields, StaticFields};

use scraper::ElementRef;

/// Whitespace-trimmed text content of an element and all its descendants.
pub(crate) fn element_text(element: &ElementRef) -> String {
    element.text().collect::<String>().trim().to_string()
}

pub(crate) fn previous_element<'a>(element: &ElementRef<'a>) -> Option<ElementRef<'a>> {
    element.prev_siblings().find_map(ElementRef::wrap)
}

pub(crate) fn next_element<'a>(element: &ElementRef<'a>) -> Option<ElementRef<'a>> {
    element.next_siblings().find_map(ElementRef::wrap)
}
