//! Perceived COVID-19 safety ratings, two regional files concatenated.

use anyhow::Result;
use std::path::Path;
use tracing::info;

use crate::config::Config;
use crate::frame::read_headerless_tsv;
use crate::output::{CleanTable, ColumnData};

/// The leading column (a rank) is unused and dropped.
type RatingRow = (String, String, f64);

pub fn run(cfg: &Config) -> Result<()> {
    let mut rows = load_ratings(&cfg.raw("euro_ratings.txt"))?;
    rows.extend(load_ratings(&cfg.raw("asia_ratings.txt"))?);
    let count = rows.len();

    let (mut countries, mut scores) = (Vec::with_capacity(count), Vec::with_capacity(count));
    for (country, score) in rows {
        countries.push(Some(country));
        scores.push(Some(score));
    }
    let table = CleanTable::new(vec![
        ("country", ColumnData::Str(countries)),
        ("covid_safety", ColumnData::F64(scores)),
    ])?;
    table.write_parquet(&cfg.clean("covid_safety.parquet"))?;
    info!(countries = count, "wrote safety ratings");
    Ok(())
}

fn load_ratings(path: &Path) -> Result<Vec<(String, f64)>> {
    let rows: Vec<RatingRow> = read_headerless_tsv(path)?;
    Ok(rows
        .into_iter()
        .map(|(_, country, score)| (country, score))
        .collect())
}
