//! Rainfall by state and date: column projection and rename only.

use anyhow::Result;
use serde::Deserialize;
use tracing::info;

use crate::config::Config;
use crate::frame::read_csv_rows;
use crate::output::{CleanTable, ColumnData};

#[derive(Debug, Deserialize)]
struct RainRow {
    #[serde(rename = "Date")]
    date: String,
    #[serde(rename = "Avg_Precip")]
    avg_precip: Option<f64>,
    #[serde(rename = "State")]
    state: String,
}

pub fn run(cfg: &Config) -> Result<()> {
    let rows: Vec<RainRow> = read_csv_rows(&cfg.raw("rainfall.csv"))?;
    let count = rows.len();

    let mut date_col = Vec::with_capacity(count);
    let mut precip = Vec::with_capacity(count);
    let mut states = Vec::with_capacity(count);
    for row in rows {
        date_col.push(Some(row.date));
        precip.push(row.avg_precip);
        states.push(Some(row.state));
    }
    let table = CleanTable::new(vec![
        ("date", ColumnData::Str(date_col)),
        ("avg_precip", ColumnData::F64(precip)),
        ("state", ColumnData::Str(states)),
    ])?;
    table.write_parquet(&cfg.clean("rain_data.parquet"))?;
    info!(rows = count, "wrote rainfall");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil;

    #[test]
    fn projects_and_renames_the_three_columns() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let raw = dir.path().join("raw");
        std::fs::create_dir_all(&raw)?;
        std::fs::create_dir_all(dir.path().join("clean"))?;
        std::fs::write(
            raw.join("rainfall.csv"),
            "Station,Date,Avg_Precip,State\n\
             USW00024233,2020-03-01,0.12,Washington\n\
             USW00024229,2020-03-01,,Oregon\n",
        )?;

        let cfg = Config::new(dir.path());
        run(&cfg)?;

        let batches = testutil::read_parquet(&cfg.clean("rain_data.parquet"))?;
        let batch = &batches[0];
        assert_eq!(
            testutil::str_column(batch, "date"),
            vec![Some("2020-03-01".to_string()); 2]
        );
        assert_eq!(
            testutil::f64_column(batch, "avg_precip"),
            vec![Some(0.12), None]
        );
        assert_eq!(
            testutil::str_column(batch, "state"),
            vec![Some("Washington".to_string()), Some("Oregon".to_string())]
        );
        Ok(())
    }
}
