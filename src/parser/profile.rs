use super::{element_text, previous_element, CountyMap};
use crate::constants::{
    ACTIVITY_CODE_SELECTOR, ACTIVITY_LABEL_SELECTOR, ADDRESS_LABEL, COUNTY_WORD,
    INFO_VALUE_SELECTOR, NOT_FOUND,
};
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use tracing::debug;

static ACTIVITY_CODE: Lazy<Selector> =
    Lazy::new(|| Selector::parse(ACTIVITY_CODE_SELECTOR).expect("valid activity code selector"));
static ACTIVITY_LABEL: Lazy<Selector> =
    Lazy::new(|| Selector::parse(ACTIVITY_LABEL_SELECTOR).expect("valid activity label selector"));
static INFO_VALUE: Lazy<Selector> =
    Lazy::new(|| Selector::parse(INFO_VALUE_SELECTOR).expect("valid info block selector"));

/// Fields available in the server-rendered profile page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticFields {
    pub activity_code: String,
    pub activity_label: String,
    pub county: String,
}

pub fn extract_static_fields(html: &str, counties: &CountyMap) -> StaticFields {
    let document = Html::parse_document(html);

    let code_cell = document.select(&ACTIVITY_CODE).next();
    let activity_code = code_cell
        .as_ref()
        .map(element_text)
        .unwrap_or_else(|| NOT_FOUND.to_string());

    let activity_label = code_cell
        .and_then(|cell| enclosing_row(&cell))
        .and_then(|row| row.select(&ACTIVITY_LABEL).next())
        .and_then(|link| link.value().attr("title"))
        .map(|title| title.trim().to_string())
        .unwrap_or_else(|| NOT_FOUND.to_string());

    let county = address_block(&document)
        .map(|block| county_from_address(&element_text(&block), counties))
        .unwrap_or_else(|| NOT_FOUND.to_string());

    debug!(
        "Static profile fields: code={} label={} county={}",
        activity_code, activity_label, county
    );

    StaticFields {
        activity_code,
        activity_label,
        county,
    }
}

fn enclosing_row<'a>(cell: &ElementRef<'a>) -> Option<ElementRef<'a>> {
    cell.ancestors()
        .filter_map(ElementRef::wrap)
        .find(|el| el.value().name() == "tr")
}

/// The info value whose preceding label reads "Aadress".
fn address_block(document: &Html) -> Option<ElementRef<'_>> {
    document.select(&INFO_VALUE).find(|block| {
        previous_element(block)
            .map(|label| element_text(&label) == ADDRESS_LABEL)
            .unwrap_or(false)
    })
}

/// `"Harju maakond, Tallinn, ..."` resolves the `"Harju"` segment.
pub(crate) fn county_from_address(address: &str, counties: &CountyMap) -> String {
    let first_segment = address.split(',').next().unwrap_or_default();
    let county_name = first_segment.replacen(COUNTY_WORD, "", 1);
    counties.resolve(county_name.trim())
}

#[cfg(test)]
mod tests {
    use super::*;

    const PROFILE_PAGE: &str = r#"
        <html><body>
          <div class="row">
            <div class="col text-muted">Registrikood</div>
            <div class="col font-weight-bold">12345678</div>
          </div>
          <div class="row">
            <div class="col text-muted">Aadress</div>
            <div class="col font-weight-bold">Harju maakond, Tallinn, Kesklinna linnaosa, Narva mnt 5</div>
          </div>
          <table>
            <tr>
              <td class="text-nowrap px-1">62011</td>
              <td><a href="/emtak/62011" title=" Programmeerimine ">Programmeerimine</a></td>
            </tr>
            <tr>
              <td class="text-nowrap px-1">47911</td>
              <td><a href="/emtak/47911" title="Jaemüük posti teel">Jaemüük</a></td>
            </tr>
          </table>
        </body></html>
    "#;

    #[test]
    fn test_extracts_all_static_fields() {
        let fields = extract_static_fields(PROFILE_PAGE, &CountyMap::default());
        assert_eq!(fields.activity_code, "62011");
        assert_eq!(fields.activity_label, "Programmeerimine");
        assert_eq!(fields.county, "Harjumaa");
    }

    #[test]
    fn test_missing_fields_use_sentinel() {
        let fields = extract_static_fields("<html><body><p>Ei leitud</p></body></html>", &CountyMap::default());
        assert_eq!(fields.activity_code, NOT_FOUND);
        assert_eq!(fields.activity_label, NOT_FOUND);
        assert_eq!(fields.county, NOT_FOUND);
    }

    #[test]
    fn test_label_missing_when_row_has_no_titled_link() {
        let html = r#"<table><tr><td class="text-nowrap px-1">01111</td><td><a href="/x">Teravili</a></td></tr></table>"#;
        let fields = extract_static_fields(html, &CountyMap::default());
        assert_eq!(fields.activity_code, "01111");
        assert_eq!(fields.activity_label, NOT_FOUND);
    }

    #[test]
    fn test_info_block_without_address_label_is_ignored() {
        let html = r#"<div><div class="col">Kontakt</div><div class="col font-weight-bold">Tartu maakond</div></div>"#;
        let fields = extract_static_fields(html, &CountyMap::default());
        assert_eq!(fields.county, NOT_FOUND);
    }

    #[test]
    fn test_county_from_address() {
        assert_eq!(county_from_address("Harju maakond, Tallinn", &CountyMap::default()), "Harjumaa");
        assert_eq!(county_from_address("Harju maakond, Tallinn", &CountyMap::empty()), "Harjumaa");
        assert_eq!(county_from_address("Kihnu maakond", &CountyMap::empty()), "Kihnumaa");
        assert_eq!(county_from_address("Tallinn, Lasnamäe", &CountyMap::default()), "Harjumaa");
    }
}
