//! Parquet read-back helpers shared by the stage tests.

use anyhow::{Context, Result};
use arrow::array::{Array, Date32Array, Float64Array, StringArray};
use arrow::record_batch::RecordBatch;
use chrono::{Duration, NaiveDate};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use std::fs::File;
use std::path::Path;

pub fn read_parquet(path: &Path) -> Result<Vec<RecordBatch>> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let reader = ParquetRecordBatchReaderBuilder::try_new(file)?.build()?;
    let mut batches = Vec::new();
    for batch in reader {
        batches.push(batch?);
    }
    Ok(batches)
}

pub fn str_column(batch: &RecordBatch, name: &str) -> Vec<Option<String>> {
    let idx = batch.schema().index_of(name).expect("column present");
    let arr = batch
        .column(idx)
        .as_any()
        .downcast_ref::<StringArray>()
        .expect("utf8 column");
    (0..arr.len())
        .map(|i| (!arr.is_null(i)).then(|| arr.value(i).to_string()))
        .collect()
}

pub fn f64_column(batch: &RecordBatch, name: &str) -> Vec<Option<f64>> {
    let idx = batch.schema().index_of(name).expect("column present");
    let arr = batch
        .column(idx)
        .as_any()
        .downcast_ref::<Float64Array>()
        .expect("float64 column");
    (0..arr.len())
        .map(|i| (!arr.is_null(i)).then(|| arr.value(i)))
        .collect()
}

pub fn date_column(batch: &RecordBatch, name: &str) -> Vec<Option<NaiveDate>> {
    let idx = batch.schema().index_of(name).expect("column present");
    let arr = batch
        .column(idx)
        .as_any()
        .downcast_ref::<Date32Array>()
        .expect("date32 column");
    let epoch = NaiveDate::from_ymd_opt(1970, 1, 1).unwrap();
    (0..arr.len())
        .map(|i| (!arr.is_null(i)).then(|| epoch + Duration::days(arr.value(i) as i64)))
        .collect()
}
