//! Reference List Loader
//!
//! Reads the GADSL reference list from Excel (XLSX/XLS) or CSV into typed
//! records. Headers are matched after collapsing whitespace and case, so
//! the multi-line headers of the published spreadsheet resolve directly.

use std::path::Path;

use chemsure_models::{ReferenceRecord, DEFAULT_REPORTING_THRESHOLD};
use sha2::{Digest, Sha256};
use tracing::{info, warn};

use crate::error::{ChemsureError, ChemsureResult};

/// Supported reference list formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceFormat {
    Csv,
    Excel, // XLSX/XLS
}

impl ReferenceFormat {
    /// Detect format from file extension
    pub fn from_extension(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_lowercase();
        match ext.as_str() {
            "csv" => Some(Self::Csv),
            "xlsx" | "xls" | "xlsm" => Some(Self::Excel),
            _ => None,
        }
    }
}

/// Record fields a list column can map to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Column {
    CatalogId,
    ReferenceId,
    SubstanceName,
    CasNumber,
    Classification,
    ReasonCode,
    Source,
    GenericExamples,
    ReportingThreshold,
    FirstAdded,
    LastRevised,
}

impl Column {
    const ALL: [Column; 11] = [
        Column::CatalogId,
        Column::ReferenceId,
        Column::SubstanceName,
        Column::CasNumber,
        Column::Classification,
        Column::ReasonCode,
        Column::Source,
        Column::GenericExamples,
        Column::ReportingThreshold,
        Column::FirstAdded,
        Column::LastRevised,
    ];

    /// Header as printed on the published list.
    fn display_header(self) -> &'static str {
        match self {
            Column::CatalogId => "GADSL #",
            Column::ReferenceId => "REF #",
            Column::SubstanceName => "Substance",
            Column::CasNumber => "CAS RN",
            Column::Classification => "Classification",
            Column::ReasonCode => "Reason Code",
            Column::Source => "Source (Legal requirements, regulations)",
            Column::GenericExamples => "Generic examples",
            Column::ReportingThreshold => "Reporting threshold (0.1% unless otherwise stated)",
            Column::FirstAdded => "First added",
            Column::LastRevised => "Last revised",
        }
    }

    /// Matches a normalized header. `Effective date` maps to nothing.
    fn from_header(normalized: &str) -> Option<Self> {
        match normalized {
            "gadsl #" => Some(Column::CatalogId),
            "ref #" => Some(Column::ReferenceId),
            "substance" => Some(Column::SubstanceName),
            "cas rn" => Some(Column::CasNumber),
            "classification" => Some(Column::Classification),
            "reason code" => Some(Column::ReasonCode),
            "generic examples" => Some(Column::GenericExamples),
            "first added" => Some(Column::FirstAdded),
            "last revised" => Some(Column::LastRevised),
            h if h.starts_with("source") => Some(Column::Source),
            h if h.starts_with("reporting threshold") => Some(Column::ReportingThreshold),
            _ => None,
        }
    }
}

/// Raw header row plus cell rows, before field mapping.
#[derive(Debug, Default)]
struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

/// Loaded reference list with provenance.
#[derive(Debug, Clone)]
pub struct ReferenceDataset {
    pub records: Vec<ReferenceRecord>,
    pub source: String,
    /// SHA-256 of the raw source bytes.
    pub fingerprint: String,
    pub warnings: Vec<String>,
}

/// GADSL reference list loader
#[derive(Debug, Clone, Default)]
pub struct ReferenceLoader {
    sheet: Option<String>,
}

impl ReferenceLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read a named worksheet instead of the first one.
    pub fn with_sheet(mut self, sheet: Option<String>) -> Self {
        self.sheet = sheet;
        self
    }

    /// Load the reference list from disk
    pub fn load_path(&self, path: &Path) -> ChemsureResult<ReferenceDataset> {
        info!(path = %path.display(), "Loading GADSL reference list");

        let data = std::fs::read(path).map_err(|e| {
            ChemsureError::reference_data(format!("cannot read {}: {}", path.display(), e))
        })?;

        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());

        self.load_bytes(&filename, &data)
    }

    /// Load the reference list from in-memory bytes
    pub fn load_bytes(&self, filename: &str, data: &[u8]) -> ChemsureResult<ReferenceDataset> {
        let format = ReferenceFormat::from_extension(Path::new(filename)).ok_or_else(|| {
            ChemsureError::reference_data(format!("unsupported reference list format: {}", filename))
        })?;

        let table = match format {
            ReferenceFormat::Csv => self.read_csv(data)?,
            ReferenceFormat::Excel => self.read_excel(data)?,
        };

        let (records, warnings) = self.map_records(&table)?;
        for warning in &warnings {
            warn!(source = %filename, "{}", warning);
        }

        Ok(ReferenceDataset {
            records,
            source: filename.to_string(),
            fingerprint: hex::encode(Sha256::digest(data)),
            warnings,
        })
    }

    fn read_csv(&self, data: &[u8]) -> ChemsureResult<Table> {
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_reader(data);

        let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            rows.push(record.iter().map(str::to_string).collect());
        }

        Ok(Table { headers, rows })
    }

    fn read_excel(&self, data: &[u8]) -> ChemsureResult<Table> {
        use calamine::{open_workbook_auto_from_rs, Reader};

        let cursor = std::io::Cursor::new(data);
        let mut workbook = open_workbook_auto_from_rs(cursor)?;

        let sheet_name = match &self.sheet {
            Some(name) => name.clone(),
            None => workbook
                .sheet_names()
                .first()
                .cloned()
                .ok_or_else(|| ChemsureError::reference_data("no sheets found in workbook"))?,
        };

        let range = workbook
            .worksheet_range(&sheet_name)
            .ok_or_else(|| ChemsureError::reference_data(format!("worksheet '{}' not found", sheet_name)))??;

        let mut rows_iter = range.rows();
        let headers: Vec<String> = match rows_iter.next() {
            Some(row) => row.iter().map(cell_text).collect(),
            None => return Ok(Table::default()),
        };
        let rows = rows_iter.map(|row| row.iter().map(cell_text).collect()).collect();

        Ok(Table { headers, rows })
    }

    /// Map table columns onto record fields
    fn map_records(&self, table: &Table) -> ChemsureResult<(Vec<ReferenceRecord>, Vec<String>)> {
        let mut positions: Vec<(Column, usize)> = Vec::new();
        for (idx, header) in table.headers.iter().enumerate() {
            if let Some(column) = Column::from_header(&normalize_header(header)) {
                if !positions.iter().any(|(c, _)| *c == column) {
                    positions.push((column, idx));
                }
            }
        }

        let missing: Vec<&str> = Column::ALL
            .iter()
            .filter(|column| !positions.iter().any(|(c, _)| c == *column))
            .map(|column| column.display_header())
            .collect();

        if table.rows.is_empty() || !missing.is_empty() {
            return Err(ChemsureError::reference_data(format!(
                "reference list is empty or missing required columns. Missing: {:?}",
                missing
            )));
        }

        let mut records = Vec::with_capacity(table.rows.len());
        let mut warnings = Vec::new();

        for (idx, row) in table.rows.iter().enumerate() {
            if row.iter().all(|cell| cell.trim().is_empty()) {
                continue;
            }

            let value = |column: Column| -> Option<String> {
                positions
                    .iter()
                    .find(|(c, _)| *c == column)
                    .and_then(|(_, pos)| row.get(*pos))
                    .map(|cell| cell.trim().to_string())
                    .filter(|cell| !cell.is_empty())
            };

            let record = ReferenceRecord {
                catalog_id: value(Column::CatalogId),
                reference_id: value(Column::ReferenceId),
                substance_name: value(Column::SubstanceName),
                cas_number: value(Column::CasNumber),
                classification: value(Column::Classification),
                reason_code: value(Column::ReasonCode),
                source: value(Column::Source),
                generic_examples: value(Column::GenericExamples),
                reporting_threshold: value(Column::ReportingThreshold)
                    .unwrap_or_else(|| DEFAULT_REPORTING_THRESHOLD.to_string()),
                first_added: value(Column::FirstAdded),
                last_revised: value(Column::LastRevised),
            };

            if record.cas_key().is_none() && record.name_key().is_none() {
                // Header row is row 1
                warnings.push(format!("Row {}: no substance name or CAS RN, not indexable", idx + 2));
            }

            records.push(record);
        }

        Ok((records, warnings))
    }
}

/// Collapse whitespace runs (newlines and NBSP included) and lowercase.
fn normalize_header(header: &str) -> String {
    header.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase()
}

/// Render a spreadsheet cell the way it reads on screen.
fn cell_text(cell: &calamine::DataType) -> String {
    use calamine::DataType;

    match cell {
        DataType::Empty => String::new(),
        DataType::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", *f as i64),
        DataType::DateTime(serial) => excel_serial_to_date(*serial).unwrap_or_else(|| serial.to_string()),
        other => other.to_string(),
    }
}

/// Excel serial day numbers count from 1899-12-30.
fn excel_serial_to_date(serial: f64) -> Option<String> {
    let epoch = chrono::NaiveDate::from_ymd_opt(1899, 12, 30)?;
    let date = epoch.checked_add_signed(chrono::Duration::days(serial.trunc() as i64))?;
    Some(date.format("%Y-%m-%d").to_string())
}
