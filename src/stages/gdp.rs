//! GDP per capita, one year, with country names scrubbed of the non-ASCII
//! artifacts the upstream serialization leaves behind.

use anyhow::Result;
use serde::Deserialize;
use tracing::info;

use crate::config::Config;
use crate::frame::read_csv_rows;
use crate::output::{CleanTable, ColumnData};

#[derive(Debug, Deserialize)]
struct GdpRow {
    #[serde(rename = "Country Name")]
    country: String,
    #[serde(rename = "2018")]
    gdp_per_capita: Option<f64>,
}

pub fn run(cfg: &Config) -> Result<()> {
    let rows: Vec<GdpRow> = read_csv_rows(&cfg.raw("gdp.csv"))?;
    let count = rows.len();

    let (mut countries, mut values) = (Vec::with_capacity(count), Vec::with_capacity(count));
    for row in rows {
        countries.push(Some(scrub_non_ascii(&row.country)));
        values.push(row.gdp_per_capita);
    }
    let table = CleanTable::new(vec![
        ("country", ColumnData::Str(countries)),
        ("gdp_per_capita", ColumnData::F64(values)),
    ])?;
    table.write_parquet(&cfg.clean("gdp_per_capita.parquet"))?;
    info!(countries = count, "wrote GDP per capita");
    Ok(())
}

/// Drop every non-ASCII character, nothing else. Purely defensive cleanup of
/// mangled country names; ASCII-only names pass through untouched.
fn scrub_non_ascii(name: &str) -> String {
    name.chars().filter(char::is_ascii).collect()
}
