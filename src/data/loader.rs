use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use arrow::array::{
    Array, Float32Array, Float64Array, Int32Array, Int64Array, LargeListArray, ListArray,
};
use arrow::datatypes::DataType;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::model::{COLUMN_NAMES, Column, EventColumns};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load the event columns of a dataset.  Dispatch by extension.
///
/// Supported formats:
/// * `.parquet` – one List column per field (recommended)
/// * `.json`    – `[{ "electron_pt": [...], "jet_pt": [...], ... }, ...]`
/// * `.csv`     – one column per field, each cell a semicolon-separated list
///
/// Every format must provide all columns in [`COLUMN_NAMES`]; anything else
/// is ignored.
pub fn load_file(path: &Path) -> Result<EventColumns> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let columns = match ext.as_str() {
        "parquet" | "pq" => load_parquet(path)?,
        "json" => load_json(path)?,
        "csv" => load_csv(path)?,
        other => bail!("Unsupported file extension: .{other}"),
    };

    log::debug!(
        "{}: {} events, {} jets",
        path.display(),
        columns.len(),
        columns.jet_count()
    );
    Ok(columns)
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (one record per event):
///
/// ```json
/// [
///   {
///     "electron_pt": [31.2],
///     "muon_pt": [],
///     "jet_pt": [55.0, 42.1, ...],
///     "jet_btag": [0.91, 0.12, ...],
///     ...
///   },
///   ...
/// ]
/// ```
fn load_json(path: &Path) -> Result<EventColumns> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let root: JsonValue = serde_json::from_str(&text).context("parsing JSON")?;

    let records = root
        .as_array()
        .context("Expected top-level JSON array")?;

    let mut columns = empty_columns(records.len());

    for (i, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .with_context(|| format!("Event {i} is not a JSON object"))?;

        for name in COLUMN_NAMES {
            let values = json_array_to_f64(obj.get(name), i, name)?;
            if let Some(col) = columns.get_mut(name) {
                col.push(values);
            }
        }
    }

    Ok(EventColumns::from_columns(columns)?)
}

fn json_array_to_f64(val: Option<&JsonValue>, event: usize, col: &str) -> Result<Vec<f64>> {
    let arr = val
        .and_then(|v| v.as_array())
        .with_context(|| format!("Event {event}: missing or invalid '{col}' array"))?;

    arr.iter()
        .enumerate()
        .map(|(j, v)| {
            v.as_f64()
                .with_context(|| format!("Event {event}, {col}[{j}]: not a number"))
        })
        .collect()
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with column names, one row per event.
/// Each field column holds semicolon-separated floats, e.g. `"55.0;42.1;30.7"`.
/// An empty cell is an event with no particles of that kind.
fn load_csv(path: &Path) -> Result<EventColumns> {
    let mut reader = csv::Reader::from_path(path).context("opening CSV")?;
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let indices: Vec<(&'static str, usize)> = COLUMN_NAMES
        .iter()
        .map(|&name| {
            headers
                .iter()
                .position(|h| h == name)
                .map(|idx| (name, idx))
                .with_context(|| format!("CSV missing '{name}' column"))
        })
        .collect::<Result<_>>()?;

    let mut columns = empty_columns(0);

    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;

        for &(name, idx) in &indices {
            let values = parse_semicolon_floats(record.get(idx).unwrap_or(""), row_no, name)?;
            if let Some(col) = columns.get_mut(name) {
                col.push(values);
            }
        }
    }

    Ok(EventColumns::from_columns(columns)?)
}

fn parse_semicolon_floats(s: &str, row: usize, col: &str) -> Result<Vec<f64>> {
    if s.trim().is_empty() {
        return Ok(Vec::new());
    }
    s.split(';')
        .enumerate()
        .map(|(j, tok)| {
            tok.trim()
                .parse::<f64>()
                .with_context(|| format!("Row {row}, {col}[{j}]: '{tok}' is not a number"))
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file of events.
///
/// Expected schema: every name in [`COLUMN_NAMES`] is a List or LargeList
/// column whose items are Float64, Float32, Int64 or Int32. This matches the
/// flat "events" trees of the CMS open-data ttbar samples once converted to
/// Parquet.
fn load_parquet(path: &Path) -> Result<EventColumns> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)
        .context("reading parquet metadata")?;
    let reader = builder.build().context("building parquet reader")?;

    let mut events = EventColumns::default();

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let schema = batch.schema();
        let n_rows = batch.num_rows();

        let mut columns = BTreeMap::new();
        for name in COLUMN_NAMES {
            let Ok(idx) = schema.index_of(name) else {
                bail!("Parquet file missing '{name}' column");
            };
            let col = batch.column(idx);
            let values = (0..n_rows)
                .map(|row| {
                    extract_f64_list(col, row)
                        .with_context(|| format!("Row {row}: failed to read '{name}'"))
                })
                .collect::<Result<Column>>()?;
            columns.insert(name.to_string(), values);
        }

        events.extend(EventColumns::from_columns(columns)?);
    }

    Ok(events)
}

// -- Parquet / Arrow helpers --

fn empty_columns(capacity: usize) -> BTreeMap<String, Column> {
    COLUMN_NAMES
        .iter()
        .map(|name| (name.to_string(), Vec::with_capacity(capacity)))
        .collect()
}

/// Extract a `Vec<f64>` from a List or LargeList column at the given row.
fn extract_f64_list(col: &Arc<dyn Array>, row: usize) -> Result<Vec<f64>> {
    if col.is_null(row) {
        bail!("null value in list column");
    }

    let values_array = match col.data_type() {
        DataType::List(_) => {
            let list_arr = col
                .as_any()
                .downcast_ref::<ListArray>()
                .context("expected ListArray")?;
            list_arr.value(row)
        }
        DataType::LargeList(_) => {
            let list_arr = col
                .as_any()
                .downcast_ref::<LargeListArray>()
                .context("expected LargeListArray")?;
            list_arr.value(row)
        }
        other => bail!("Expected List or LargeList column, got {other:?}"),
    };

    if values_array.null_count() > 0 {
        bail!("null entry inside list");
    }

    let any = values_array.as_any();
    if let Some(arr) = any.downcast_ref::<Float64Array>() {
        Ok(arr.values().to_vec())
    } else if let Some(arr) = any.downcast_ref::<Float32Array>() {
        Ok(arr.values().iter().map(|&v| v as f64).collect())
    } else if let Some(arr) = any.downcast_ref::<Int64Array>() {
        Ok(arr.values().iter().map(|&v| v as f64).collect())
    } else if let Some(arr) = any.downcast_ref::<Int32Array>() {
        Ok(arr.values().iter().map(|&v| v as f64).collect())
    } else {
        bail!(
            "List inner type is {:?}, expected Float64, Float32, Int64 or Int32",
            values_array.data_type()
        )
    }
}
