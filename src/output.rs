use anyhow::{bail, Context, Result};
use arrow::array::{ArrayRef, Date32Array, Float64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema as ArrowSchema};
use arrow::record_batch::RecordBatch;
use chrono::NaiveDate;
use parquet::arrow::ArrowWriter;
use std::{fs, fs::File, path::Path, sync::Arc};
use tracing::debug;

use crate::dates;

/// One typed, nullable output column.
pub enum ColumnData {
    Str(Vec<Option<String>>),
    F64(Vec<Option<f64>>),
    Date(Vec<Option<NaiveDate>>),
}

impl ColumnData {
    fn len(&self) -> usize {
        match self {
            ColumnData::Str(v) => v.len(),
            ColumnData::F64(v) => v.len(),
            ColumnData::Date(v) => v.len(),
        }
    }

    fn data_type(&self) -> DataType {
        match self {
            ColumnData::Str(_) => DataType::Utf8,
            ColumnData::F64(_) => DataType::Float64,
            ColumnData::Date(_) => DataType::Date32,
        }
    }

    fn into_array(self) -> ArrayRef {
        match self {
            ColumnData::Str(v) => Arc::new(v.into_iter().collect::<StringArray>()),
            ColumnData::F64(v) => Arc::new(Float64Array::from(v)),
            ColumnData::Date(v) => Arc::new(Date32Array::from(
                v.into_iter()
                    .map(|d| d.map(dates::to_epoch_days))
                    .collect::<Vec<_>>(),
            )),
        }
    }
}

/// A finished clean table, ready to persist as Parquet.
pub struct CleanTable {
    columns: Vec<(String, ColumnData)>,
}

impl CleanTable {
    pub fn new(columns: Vec<(&str, ColumnData)>) -> Result<Self> {
        if columns.is_empty() {
            bail!("a clean table needs at least one column");
        }
        let rows = columns[0].1.len();
        for (name, data) in &columns {
            if data.len() != rows {
                bail!(
                    "column `{}` has {} rows, expected {}",
                    name,
                    data.len(),
                    rows
                );
            }
        }
        Ok(CleanTable {
            columns: columns
                .into_iter()
                .map(|(name, data)| (name.to_string(), data))
                .collect(),
        })
    }

    /// Write the table to `path`, going through a `.tmp` sibling first so an
    /// interrupted run never leaves a truncated file under the final name.
    pub fn write_parquet(self, path: &Path) -> Result<()> {
        let fields: Vec<Field> = self
            .columns
            .iter()
            .map(|(name, data)| Field::new(name, data.data_type(), true))
            .collect();
        let schema = Arc::new(ArrowSchema::new(fields));
        let arrays: Vec<ArrayRef> = self
            .columns
            .into_iter()
            .map(|(_, data)| data.into_array())
            .collect();
        let batch = RecordBatch::try_new(schema.clone(), arrays)
            .context("building output RecordBatch")?;

        let tmp_path = path.with_extension("parquet.tmp");
        let file = File::create(&tmp_path)
            .with_context(|| format!("creating {}", tmp_path.display()))?;
        let mut writer = ArrowWriter::try_new(file, schema, None)
            .with_context(|| format!("opening Parquet writer for {}", path.display()))?;
        writer
            .write(&batch)
            .with_context(|| format!("writing {}", path.display()))?;
        writer
            .close()
            .with_context(|| format!("closing {}", path.display()))?;
        fs::rename(&tmp_path, path).with_context(|| {
            format!("renaming {} to {}", tmp_path.display(), path.display())
        })?;

        debug!(path = %path.display(), rows = batch.num_rows(), "wrote clean table");
        Ok(())
    }
}
