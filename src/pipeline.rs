use crate::app::ports::PacerPort;
use crate::classify::ActivityAllowList;
use crate::config::Config;
use crate::constants::{ENRICHED_FIELDS_START, INPUT_HEADER, MIN_HEADER_CELLS, ROW_ERROR};
use crate::error::{EnrichError, Result};
use crate::infra::FixedDelayPacer;
use crate::normalize::normalize_company_name;
use crate::parser::{extract_employee_count, extract_static_fields, CountyMap, EmployeeBounds};
use crate::registry::{strip_country_prefix, RegistryClient};
use crate::types::{
    Bucket, CellValue, EmployeeCount, InputRow, OutputRow, RegistryProfile, RowFailure, RowOutcome,
    SheetTable,
};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, info_span, instrument, warn, Instrument};

/// Result of one enrichment run.
#[derive(Debug)]
pub struct ProcessedTables {
    /// The input header, repaired if it was too short.
    pub source_header: Vec<CellValue>,
    pub matching: SheetTable,
    pub non_matching: SheetTable,
    pub skipped: usize,
    pub failures: Vec<RowFailure>,
}

impl ProcessedTables {
    pub fn processed(&self) -> usize {
        self.matching.len() + self.non_matching.len()
    }
}

/// Replaces a header shorter than nine cells with the canonical header
/// followed by the original header from its third cell on.
pub fn repair_header(header: Vec<CellValue>) -> Vec<CellValue> {
    if header.len() >= MIN_HEADER_CELLS {
        return header;
    }
    INPUT_HEADER
        .iter()
        .map(|h| CellValue::from(*h))
        .chain(header.into_iter().skip(2))
        .collect()
}

/// Per-row fetch, parse, normalize and classify. Rows run strictly one after
/// another with the pacer's delay before each registry request.
pub struct EnrichmentPipeline {
    registry: RegistryClient,
    pacer: Arc<dyn PacerPort>,
    allow_list: ActivityAllowList,
    counties: CountyMap,
    employee_bounds: EmployeeBounds,
}

/// The parts of a row that are known before any network access.
struct RowBase {
    registry_code: String,
    profile_url: String,
}

impl EnrichmentPipeline {
    pub fn new(
        registry: RegistryClient,
        pacer: Arc<dyn PacerPort>,
        allow_list: ActivityAllowList,
        counties: CountyMap,
        employee_bounds: EmployeeBounds,
    ) -> Self {
        Self {
            registry,
            pacer,
            allow_list,
            counties,
            employee_bounds,
        }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        let allow_list = match &config.classification.activity_codes {
            Some(codes) => ActivityAllowList::new(codes.iter().cloned()),
            None => ActivityAllowList::default(),
        };
        if allow_list.is_empty() {
            warn!("EMTAK allow-list is empty; every row will be non-matching");
        } else {
            info!("EMTAK allow-list has {} codes", allow_list.len());
        }
        Ok(Self::new(
            RegistryClient::from_config(config)?,
            Arc::new(FixedDelayPacer::new(config.row_delay())),
            allow_list,
            CountyMap::with_overrides(&config.counties),
            EmployeeBounds {
                min: config.employees.min,
                max: config.employees.max,
            },
        ))
    }

    /// Enriches every data row of `rows` (the first row is the header) and
    /// splits the results into matching and non-matching tables. Row failures
    /// are collected, never propagated; only an input without a header fails the run.
    #[instrument(skip(self, rows), fields(rows = rows.len()))]
    pub async fn process_data(&self, rows: Vec<Vec<CellValue>>) -> Result<ProcessedTables> {
        info!("Starting to process data. Number of rows: {}", rows.len());
        let started = Instant::now();

        let mut rows = rows.into_iter();
        let header = rows.next().ok_or(EnrichError::EmptyInput)?;

        let mut tables = ProcessedTables {
            source_header: repair_header(header),
            matching: SheetTable::with_output_header(),
            non_matching: SheetTable::with_output_header(),
            skipped: 0,
            failures: Vec::new(),
        };

        for (row_number, cells) in rows.enumerate().map(|(i, c)| (i + 1, c)) {
            let input = InputRow::new(cells);
            let row_started = Instant::now();
            let outcome = self
                .process_row(row_number, &input)
                .instrument(info_span!("row", row = row_number))
                .await;

            match outcome {
                RowOutcome::Skipped => {
                    tables.skipped += 1;
                    crate::metrics::rows::skipped();
                }
                RowOutcome::Classified { bucket, row } => {
                    crate::metrics::rows::classified(bucket);
                    match bucket {
                        Bucket::Matching => tables.matching.rows.push(row.to_cells()),
                        Bucket::NonMatching => tables.non_matching.rows.push(row.to_cells()),
                    }
                }
                RowOutcome::Failed(failure) => {
                    crate::metrics::rows::failed(failure.error.kind());
                    tables.failures.push(failure);
                }
            }
            crate::metrics::rows::duration(row_started.elapsed().as_secs_f64());
        }

        crate::metrics::run::duration(started.elapsed().as_secs_f64());
        info!(
            "Finished processing all data: {} matching, {} non-matching, {} skipped, {} failed",
            tables.matching.len(),
            tables.non_matching.len(),
            tables.skipped,
            tables.failures.len()
        );
        Ok(tables)
    }

    /// Runs one row to its terminal state.
    pub async fn process_row(&self, row_number: usize, input: &InputRow) -> RowOutcome {
        debug!("Processing row {}: {:?}", row_number, input.cells);
        if input.is_skippable() {
            info!("Skipping empty or invalid row {}", row_number);
            return RowOutcome::Skipped;
        }

        let registry_code = strip_country_prefix(&input.raw_registry_code()).to_string();
        let base = RowBase {
            profile_url: self.registry.profile_url(&registry_code),
            registry_code,
        };
        info!("Fetching URL for row {}: {}", row_number, base.profile_url);

        let outcome = match self.enrich(input, &base).await {
            Ok(row) => {
                let bucket = self.allow_list.classify(&row.profile.activity_code);
                info!(
                    "Row {} classified as {} (EMTAK {})",
                    row_number,
                    bucket.as_str(),
                    row.profile.activity_code
                );
                RowOutcome::Classified { bucket, row }
            }
            Err((partial, error)) => {
                error!("Error processing row {}: {}", row_number, error);
                let cells = match partial {
                    Some(row) => row.to_cells(),
                    None => error_cells(input, &base),
                };
                RowOutcome::Failed(RowFailure {
                    row_number,
                    cells,
                    error,
                })
            }
        };
        info!("Finished processing row {}", row_number);
        outcome
    }

    /// Fetches and extracts everything for one row. A render timeout returns
    /// the partially enriched row alongside the error.
    async fn enrich(
        &self,
        input: &InputRow,
        base: &RowBase,
    ) -> std::result::Result<OutputRow, (Option<OutputRow>, EnrichError)> {
        self.pacer.wait_turn().await;

        let raw_name = input.name();
        let name = normalize_company_name(&raw_name);
        debug!("Normalized company name: {:?} -> {:?}", raw_name, name);

        let html = self
            .registry
            .fetch_static(&base.profile_url)
            .await
            .map_err(|e| (None, e))?;
        let fields = extract_static_fields(&html, &self.counties);

        let mut row = OutputRow {
            name,
            people: input.cell(InputRow::PEOPLE),
            registry_code: base.registry_code.clone(),
            profile: RegistryProfile {
                activity_code: fields.activity_code,
                activity_label: fields.activity_label,
                county: fields.county,
                employee_count: EmployeeCount::ElementNotFound,
            },
            turnover: input.cell(InputRow::TURNOVER),
            profile_url: base.profile_url.clone(),
            extra: input.cells.iter().skip(InputRow::EXTRA_START).cloned().collect(),
        };

        let rendered = match self.registry.fetch_rendered(&base.profile_url).await {
            Ok(rendered) => rendered,
            Err(e @ EnrichError::RenderTimeout { .. }) => {
                warn!("Element not found for {}", base.profile_url);
                return Err((Some(row), e));
            }
            Err(e) => return Err((None, e)),
        };

        row.profile.employee_count = extract_employee_count(&rendered, self.employee_bounds);
        info!("Employees count: {}", row.profile.employee_count);
        Ok(row)
    }
}

/// The row as written back on failure: name normalized, account manager
/// blanked, registry code stripped, profile URL appended and every field from
/// index 4 on set to "Error".
fn error_cells(input: &InputRow, base: &RowBase) -> Vec<CellValue> {
    let mut cells = input.cells.clone();
    if cells.len() <= InputRow::REGISTRY_CODE {
        cells.resize(InputRow::REGISTRY_CODE + 1, CellValue::Empty);
    }
    cells[InputRow::NAME] = CellValue::from(normalize_company_name(&input.name()));
    cells[InputRow::ACCOUNT_MANAGER] = CellValue::from("");
    cells[InputRow::REGISTRY_CODE] = CellValue::from(base.registry_code.as_str());
    cells.push(CellValue::from(base.profile_url.as_str()));
    for cell in cells.iter_mut().skip(ENRICHED_FIELDS_START) {
        *cell = CellValue::from(ROW_ERROR);
    }
    cells
}
