/// Registry defaults. The profile URL is `<base>/<locale>/company/<code>`.
pub const REGISTRY_BASE_URL: &str = "https://ariregister.rik.ee";
pub const REGISTRY_LOCALE: &str = "est";
pub const REGISTRY_CODE_PREFIX: &str = "EE";

/// Politeness delay awaited before each row's fetch.
pub const DEFAULT_ROW_DELAY_MS: u64 = 3000;
/// Upper bound on waiting for the client-rendered employee block.
pub const DEFAULT_RENDER_TIMEOUT_SECS: u64 = 5;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

pub const EMPLOYEE_COUNT_MIN: i64 = 1;
pub const EMPLOYEE_COUNT_MAX: i64 = 5000;

// Sentinels carried into the output tables
pub const NOT_FOUND: &str = "Not found";
pub const ROW_ERROR: &str = "Error";
pub const INVALID_NUMBER: &str = "Invalid number";
pub const ELEMENT_NOT_FOUND: &str = "Element not found";
pub const NEXT_SIBLING_NOT_FOUND: &str = "Next sibling element (employee count) not found";
pub const EMPLOYEE_LABEL_NOT_FOUND: &str = "Employee label not found";
pub const PARSED_NAN_PREFIX: &str = "Parsed value is NaN for text: ";

// Localized page labels (Estonian)
pub const ADDRESS_LABEL: &str = "Aadress";
pub const COUNTY_WORD: &str = " maakond";
pub const COUNTY_FALLBACK_SUFFIX: &str = "maa";
pub const EMPLOYEES_LABEL: &str = "Töötajate arv";

// Profile page selectors
pub const ACTIVITY_CODE_SELECTOR: &str = "td.text-nowrap.px-1";
pub const ACTIVITY_LABEL_SELECTOR: &str = "a[title]";
pub const INFO_VALUE_SELECTOR: &str = "div.col.font-weight-bold";
pub const EMPLOYEES_LABEL_SELECTOR: &str = "div.col-md-6.text-muted";

/// Input rows whose header is shorter than this get the canonical header.
pub const MIN_HEADER_CELLS: usize = 9;
/// Cells from this index on are overwritten with `ROW_ERROR` when a row fails.
pub const ENRICHED_FIELDS_START: usize = 4;

pub const INPUT_HEADER: [&str; 9] = [
    "Property",
    "Kliendihaldur",
    "People",
    "Registry Code",
    "Location",
    "EMTAK",
    "Main field of activity",
    "Employees",
    "Turnover",
];

pub const OUTPUT_HEADER: [&str; 10] = [
    "Property",
    "Kliendihaldur",
    "People",
    "Registry Code",
    "Location",
    "EMTAK",
    "Main field of activity",
    "Employees",
    "Turnover",
    "Link",
];

pub const MATCHING_SHEET_NAME: &str = "Matching EMTAK";
pub const NON_MATCHING_SHEET_NAME: &str = "Non-Matching EMTAK";
pub const MATCHING_FILE_NAME: &str = "Clients.xlsx";
pub const NON_MATCHING_FILE_NAME: &str = "Ecosystem.xlsx";
