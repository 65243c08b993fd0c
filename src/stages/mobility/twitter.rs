//! Twitter-derived social distancing index: a wide panel whose first
//! (unnamed) column is the date and whose remaining columns are state
//! abbreviations, melted to long form with full state names.

use anyhow::{anyhow, bail, Result};
use chrono::NaiveDate;
use tracing::info;

use crate::config::Config;
use crate::dates;
use crate::frame::{cell, parse_f64_opt, RawFrame};
use crate::output::{CleanTable, ColumnData};
use crate::states;

pub fn run(cfg: &Config) -> Result<()> {
    let frame =
        RawFrame::from_csv_path(&cfg.raw("social_mobility_index.longitudinal.20200330.csv"))?;
    let rows = melt(&frame)?;
    let count = rows.len();

    let mut date_col = Vec::with_capacity(count);
    let mut state_col = Vec::with_capacity(count);
    let mut values = Vec::with_capacity(count);
    for (date, state, value) in rows {
        date_col.push(Some(date));
        state_col.push(Some(state));
        values.push(value);
    }
    let table = CleanTable::new(vec![
        ("date", ColumnData::Date(date_col)),
        ("state", ColumnData::Str(state_col)),
        ("twitter_social_distancing", ColumnData::F64(values)),
    ])?;
    table.write_parquet(&cfg.clean("twitter_social_distancing_state.parquet"))?;
    info!(rows = count, "wrote Twitter mobility");
    Ok(())
}

/// Melt the panel column by column. The abbreviation headers include a
/// stray `" AK"` variant and the `NA` national placeholder; both resolve
/// through the state table, and because each column melts independently a
/// duplicate full name never collides with or overwrites another column.
/// Unknown headers pass through unchanged.
fn melt(frame: &RawFrame) -> Result<Vec<(NaiveDate, String, Option<f64>)>> {
    if frame.headers.len() < 2 {
        bail!("expected a date column and state columns, found {:?}", frame.headers);
    }

    let dates: Vec<NaiveDate> = frame
        .rows
        .iter()
        .map(|row| {
            let raw = cell(row, 0);
            dates::parse_date(raw).ok_or_else(|| anyhow!("unparseable date `{}`", raw))
        })
        .collect::<Result<_>>()?;

    let mut out = Vec::with_capacity((frame.headers.len() - 1) * frame.rows.len());
    for (col, header) in frame.headers.iter().enumerate().skip(1) {
        let state = states::full_name(header).unwrap_or(header.as_str()).to_string();
        for (row, date) in frame.rows.iter().zip(&dates) {
            out.push((*date, state.clone(), parse_f64_opt(cell(row, col))?));
        }
    }
    Ok(out)
}
