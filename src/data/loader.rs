use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result, bail};
use arrow::array::{
    Array, ArrayRef, Float32Array, Float64Array, Int32Array, Int64Array, LargeStringArray, StringArray,
};
use arrow::datatypes::DataType;
use arrow::record_batch::RecordBatch;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde::Deserialize;
use serde_json::Value as JsonValue;

use super::model::{LaunchDataset, LaunchRecord, LaunchSite, Outcome};

// ---------------------------------------------------------------------------
// Source schema
// ---------------------------------------------------------------------------

pub const COL_LAUNCH_SITE: &str = "Launch Site";
pub const COL_PAYLOAD_MASS: &str = "Payload Mass (kg)";
pub const COL_CLASS: &str = "class";
pub const COL_BOOSTER_CATEGORY: &str = "Booster Version Category";

/// Columns every source must carry. Anything else is ignored.
pub const REQUIRED_COLUMNS: [&str; 4] = [
    COL_LAUNCH_SITE,
    COL_PAYLOAD_MASS,
    COL_CLASS,
    COL_BOOSTER_CATEGORY,
];

/// A source that does not satisfy the launch-record schema.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LoadError {
    #[error("missing required column '{0}'")]
    MissingColumn(&'static str),
    #[error("row {row}: missing value in '{column}'")]
    MissingValue { row: usize, column: &'static str },
    #[error("row {row}: unknown launch site '{site}'")]
    UnknownSite { row: usize, site: String },
    #[error("row {row}: class must be 0 or 1, got {value}")]
    InvalidOutcome { row: usize, value: String },
    #[error("row {row}: payload mass must be finite and non-negative, got {value}")]
    InvalidPayload { row: usize, value: f64 },
    #[error("unsupported file extension: .{0}")]
    UnsupportedFormat(String),
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load the launch dataset from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row with the required columns
/// * `.json`    – `[{ "Launch Site": ..., "class": ..., ... }, ...]`
/// * `.parquet` – one column per required field
pub fn load_file(path: &Path) -> Result<LaunchDataset> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let dataset = match ext.as_str() {
        "csv" => load_csv(path),
        "json" => load_json(path),
        "parquet" | "pq" => load_parquet(path),
        other => Err(LoadError::UnsupportedFormat(other.to_string()).into()),
    }
    .with_context(|| format!("loading launch records from {}", path.display()))?;

    log::debug!("parsed {} launch records from {}", dataset.len(), path.display());
    Ok(dataset)
}

/// Validate one row's cells and turn them into a record.
fn build_record(
    row: usize,
    site: Option<&str>,
    payload: Option<f64>,
    class: Option<f64>,
    booster_category: Option<String>,
) -> Result<LaunchRecord, LoadError> {
    let site = site.ok_or(LoadError::MissingValue { row, column: COL_LAUNCH_SITE })?;
    let launch_site: LaunchSite = site.parse().map_err(|_| LoadError::UnknownSite {
        row,
        site: site.to_string(),
    })?;

    let class = class.ok_or(LoadError::MissingValue { row, column: COL_CLASS })?;
    let outcome = Outcome::from_class(class).ok_or_else(|| LoadError::InvalidOutcome {
        row,
        value: class.to_string(),
    })?;

    // NaN is how pandas writes an unknown payload.
    let payload_mass_kg = payload.filter(|v| !v.is_nan());
    if let Some(value) = payload_mass_kg {
        if !value.is_finite() || value < 0.0 {
            return Err(LoadError::InvalidPayload { row, value });
        }
    }

    Ok(LaunchRecord {
        launch_site,
        payload_mass_kg,
        outcome,
        booster_category: booster_category.unwrap_or_default(),
    })
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(rename = "Launch Site")]
    launch_site: Option<String>,
    #[serde(rename = "Payload Mass (kg)")]
    payload_mass_kg: Option<f64>,
    #[serde(rename = "class")]
    class: Option<f64>,
    #[serde(rename = "Booster Version Category")]
    booster_category: Option<String>,
}

fn load_csv(path: &Path) -> Result<LaunchDataset> {
    let file = std::fs::File::open(path).context("opening CSV")?;
    read_csv(file)
}

/// Parse CSV text with a header row. Extra columns are ignored.
pub fn read_csv<R: Read>(source: R) -> Result<LaunchDataset> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(source);
    let headers = reader.headers().context("reading CSV headers")?.clone();

    for column in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == column) {
            bail!(LoadError::MissingColumn(column));
        }
    }

    let mut records = Vec::new();
    for (row_no, result) in reader.deserialize::<CsvRow>().enumerate() {
        let row = result.with_context(|| format!("CSV row {row_no}"))?;
        records.push(build_record(
            row_no,
            row.launch_site.as_deref(),
            row.payload_mass_kg,
            row.class,
            row.booster_category,
        )?);
    }

    Ok(LaunchDataset::from_records(records))
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, `df.to_json(orient='records')`):
///
/// ```json
/// [
///   {
///     "Launch Site": "CCAFS LC-40",
///     "Payload Mass (kg)": 525.0,
///     "class": 0,
///     "Booster Version Category": "v1.0"
///   },
///   ...
/// ]
/// ```
///
/// `null` payloads are treated as unknown. Every object must carry every
/// required key.
fn load_json(path: &Path) -> Result<LaunchDataset> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    parse_json(&text)
}

pub fn parse_json(text: &str) -> Result<LaunchDataset> {
    let root: JsonValue = serde_json::from_str(text).context("parsing JSON")?;

    let rows = root
        .as_array()
        .context("Expected top-level JSON array")?;

    let mut records = Vec::with_capacity(rows.len());

    for (i, rec) in rows.iter().enumerate() {
        let obj = rec
            .as_object()
            .with_context(|| format!("Row {i} is not a JSON object"))?;

        for column in REQUIRED_COLUMNS {
            if !obj.contains_key(column) {
                bail!(LoadError::MissingColumn(column));
            }
        }

        let site = json_string(obj.get(COL_LAUNCH_SITE), i, COL_LAUNCH_SITE)?;
        let payload = json_number(obj.get(COL_PAYLOAD_MASS), i, COL_PAYLOAD_MASS)?;
        let class = json_number(obj.get(COL_CLASS), i, COL_CLASS)?;
        let category = json_string(obj.get(COL_BOOSTER_CATEGORY), i, COL_BOOSTER_CATEGORY)?
            .map(str::to_string);

        records.push(build_record(i, site, payload, class, category)?);
    }

    Ok(LaunchDataset::from_records(records))
}

fn json_string<'a>(val: Option<&'a JsonValue>, row: usize, col: &str) -> Result<Option<&'a str>> {
    match val {
        None | Some(JsonValue::Null) => Ok(None),
        Some(v) => v
            .as_str()
            .map(Some)
            .with_context(|| format!("Row {row}, {col}: not a string")),
    }
}

fn json_number(val: Option<&JsonValue>, row: usize, col: &str) -> Result<Option<f64>> {
    match val {
        None | Some(JsonValue::Null) => Ok(None),
        Some(v) => v
            .as_f64()
            .map(Some)
            .with_context(|| format!("Row {row}, {col}: not a number")),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file of launch records.
///
/// Expected schema:
/// - `Launch Site`, `Booster Version Category`: Utf8 or LargeUtf8
/// - `Payload Mass (kg)`: Float64, Float32, Int64 or Int32, nullable
/// - `class`: Int64, Int32, Float64 or Float32
///
/// Works with files written by both **Pandas** (`df.to_parquet()`) and
/// **Polars** (`df.write_parquet()`).
fn load_parquet(path: &Path) -> Result<LaunchDataset> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)
        .context("reading parquet metadata")?;

    // A file with no row groups yields no batches, so check the schema up front.
    let schema = builder.schema();
    for column in REQUIRED_COLUMNS {
        if schema.index_of(column).is_err() {
            bail!(LoadError::MissingColumn(column));
        }
    }

    let reader = builder.build().context("building parquet reader")?;

    let mut records = Vec::new();

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let site_col = required_column(&batch, COL_LAUNCH_SITE)?;
        let payload_col = required_column(&batch, COL_PAYLOAD_MASS)?;
        let class_col = required_column(&batch, COL_CLASS)?;
        let category_col = required_column(&batch, COL_BOOSTER_CATEGORY)?;

        for row in 0..batch.num_rows() {
            let row_no = records.len();
            let site = extract_string(site_col, row)
                .with_context(|| format!("Row {row_no}: failed to read '{COL_LAUNCH_SITE}'"))?;
            let payload = extract_f64(payload_col, row)
                .with_context(|| format!("Row {row_no}: failed to read '{COL_PAYLOAD_MASS}'"))?;
            let class = extract_f64(class_col, row)
                .with_context(|| format!("Row {row_no}: failed to read '{COL_CLASS}'"))?;
            let category = extract_string(category_col, row)
                .with_context(|| format!("Row {row_no}: failed to read '{COL_BOOSTER_CATEGORY}'"))?;

            records.push(build_record(row_no, site.as_deref(), payload, class, category)?);
        }
    }

    Ok(LaunchDataset::from_records(records))
}

// -- Parquet / Arrow helpers --

fn required_column<'a>(batch: &'a RecordBatch, name: &'static str) -> Result<&'a ArrayRef, LoadError> {
    let idx = batch
        .schema()
        .index_of(name)
        .map_err(|_| LoadError::MissingColumn(name))?;
    Ok(batch.column(idx))
}

/// Read a string cell. `None` for null.
fn extract_string(col: &ArrayRef, row: usize) -> Result<Option<String>> {
    if col.is_null(row) {
        return Ok(None);
    }
    let any = col.as_any();
    if let Some(arr) = any.downcast_ref::<StringArray>() {
        Ok(Some(arr.value(row).to_string()))
    } else if let Some(arr) = any.downcast_ref::<LargeStringArray>() {
        Ok(Some(arr.value(row).to_string()))
    } else {
        bail!("Expected Utf8 or LargeUtf8 column, got {:?}", col.data_type())
    }
}

/// Read a numeric cell as `f64`. `None` for null.
fn extract_f64(col: &ArrayRef, row: usize) -> Result<Option<f64>> {
    if col.is_null(row) {
        return Ok(None);
    }
    let any = col.as_any();
    let value = match col.data_type() {
        DataType::Float64 => any.downcast_ref::<Float64Array>().map(|a| a.value(row)),
        DataType::Float32 => any.downcast_ref::<Float32Array>().map(|a| a.value(row) as f64),
        DataType::Int64 => any.downcast_ref::<Int64Array>().map(|a| a.value(row) as f64),
        DataType::Int32 => any.downcast_ref::<Int32Array>().map(|a| a.value(row) as f64),
        other => bail!("Expected numeric column, got {other:?}"),
    };
    value
        .map(Some)
        .with_context(|| format!("column does not match its {:?} type", col.data_type()))
}
