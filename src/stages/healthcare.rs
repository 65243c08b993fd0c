//! Healthcare Access and Quality index, one indicator and one year.

use anyhow::Result;
use serde::Deserialize;
use tracing::info;

use crate::config::Config;
use crate::frame::read_csv_rows;
use crate::output::{CleanTable, ColumnData};

const INDICATOR: &str = "Healthcare Access and Quality Index";
const YEAR: u16 = 2016;

const RAW_FILE: &str = "IHME_GBD_2016_HAQ_INDEX_1990_2016_SCALED_CAUSE_VALUES/IHME_GBD_2016_HAQ_INDEX_1990_2016_SCALED_CAUSE_VALUES_Y2018M05D23.csv";

#[derive(Debug, Deserialize)]
struct HaqRow {
    indicator_name: String,
    year_id: u16,
    location_name: String,
    val: f64,
}

pub fn run(cfg: &Config) -> Result<()> {
    let rows: Vec<HaqRow> = read_csv_rows(&cfg.raw(RAW_FILE))?;
    let kept = filter_index(rows);
    let count = kept.len();

    let (mut countries, mut values) = (Vec::with_capacity(count), Vec::with_capacity(count));
    for (country, hqi) in kept {
        countries.push(Some(country));
        values.push(Some(hqi));
    }
    let table = CleanTable::new(vec![
        ("country", ColumnData::Str(countries)),
        ("hqi", ColumnData::F64(values)),
    ])?;
    table.write_parquet(&cfg.clean("healthcare.parquet"))?;
    info!(countries = count, "wrote healthcare quality index");
    Ok(())
}

fn filter_index(rows: Vec<HaqRow>) -> Vec<(String, f64)> {
    rows.into_iter()
        .filter(|row| row.indicator_name == INDICATOR && row.year_id == YEAR)
        .map(|row| (row.location_name, row.val))
        .collect()
}
