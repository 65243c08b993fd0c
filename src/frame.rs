use anyhow::{bail, Context, Result};
use csv::ReaderBuilder;
use serde::de::DeserializeOwned;
use std::{fs::File, io::Read, path::Path};

/// In-memory copy of one delimited text file, every cell kept as a string.
/// Used for the wide/dynamic sources (WHO extracts, JHU time series, the
/// Twitter mobility panel) where the interesting columns are only known by
/// inspecting the header row. Fixed-schema sources deserialize straight into
/// structs via [`read_csv_rows`] instead.
#[derive(Debug)]
pub struct RawFrame {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RawFrame {
    pub fn from_csv_path(path: &Path) -> Result<Self> {
        let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
        Self::from_reader(file).with_context(|| format!("reading {}", path.display()))
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut rdr = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);
        let headers = rdr
            .headers()
            .context("reading header row")?
            .iter()
            .map(str::to_string)
            .collect();
        let mut rows = Vec::new();
        for (idx, record) in rdr.records().enumerate() {
            let record = record.with_context(|| format!("parsing record {}", idx))?;
            rows.push(record.iter().map(str::to_string).collect());
        }
        Ok(RawFrame { headers, rows })
    }

    pub fn column_index(&self, name: &str) -> Result<usize> {
        match self.headers.iter().position(|h| h == name) {
            Some(idx) => Ok(idx),
            None => bail!("column `{}` not found in {:?}", name, self.headers),
        }
    }
}

/// Cell accessor tolerant of the short records flexible parsing allows.
pub fn cell(row: &[String], idx: usize) -> &str {
    row.get(idx).map(String::as_str).unwrap_or("")
}

/// Deserialize every record of a comma-delimited, headered file.
pub fn read_csv_rows<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    read_rows(path, b',', true)
}

/// Deserialize every record of a tab-delimited file with no header row.
pub fn read_headerless_tsv<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    read_rows(path, b'\t', false)
}

fn read_rows<T: DeserializeOwned>(path: &Path, delimiter: u8, has_headers: bool) -> Result<Vec<T>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(has_headers)
        .delimiter(delimiter)
        .from_path(path)
        .with_context(|| format!("opening {}", path.display()))?;
    let mut rows = Vec::new();
    for (idx, record) in rdr.deserialize().enumerate() {
        let record: T =
            record.with_context(|| format!("record {} in {}", idx, path.display()))?;
        rows.push(record);
    }
    Ok(rows)
}

/// Empty cells are nulls; anything else must parse as a float.
pub fn parse_f64_opt(raw: &str) -> Result<Option<f64>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    let value = raw
        .parse::<f64>()
        .with_context(|| format!("parsing `{}` as a number", raw))?;
    Ok(Some(value))
}

/// Like [`parse_f64_opt`] but the cell must be present.
pub fn parse_f64(raw: &str) -> Result<f64> {
    match parse_f64_opt(raw)? {
        Some(value) => Ok(value),
        None => bail!("expected a number, found an empty cell"),
    }
}
