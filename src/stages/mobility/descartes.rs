//! Descartes Lab mobility index, state-level rows only, with the m50 index
//! rescaled from a 0-100 percentage to a 0-1 fraction.

use anyhow::Result;
use serde::Deserialize;
use tracing::info;

use crate::config::Config;
use crate::frame::read_csv_rows;
use crate::output::{CleanTable, ColumnData};

/// Admin level of state rows; county rows carry 2.
const STATE_ADMIN_LEVEL: u8 = 1;

#[derive(Debug, Deserialize)]
struct DlRow {
    date: String,
    admin_level: Option<u8>,
    admin1: String,
    m50: Option<f64>,
    m50_index: Option<f64>,
}

struct StateDay {
    date: String,
    state: String,
    dl_mobility: Option<f64>,
    dl_mobility_relative_to_normal: Option<f64>,
}

pub fn run(cfg: &Config) -> Result<()> {
    let rows: Vec<DlRow> = read_csv_rows(&cfg.raw("DL-us-mobility-daterow.csv"))?;
    let days = clean(rows);
    let count = days.len();

    let mut date_col = Vec::with_capacity(count);
    let mut states = Vec::with_capacity(count);
    let mut mobility = Vec::with_capacity(count);
    let mut relative = Vec::with_capacity(count);
    for day in days {
        date_col.push(Some(day.date));
        states.push(Some(day.state));
        mobility.push(day.dl_mobility);
        relative.push(day.dl_mobility_relative_to_normal);
    }
    let table = CleanTable::new(vec![
        ("date", ColumnData::Str(date_col)),
        ("state", ColumnData::Str(states)),
        ("dl_mobility", ColumnData::F64(mobility)),
        ("dl_mobility_relative_to_normal", ColumnData::F64(relative)),
    ])?;
    table.write_parquet(&cfg.clean("dl_social_distancing_state.parquet"))?;
    info!(rows = count, "wrote Descartes Lab mobility");
    Ok(())
}

fn clean(rows: Vec<DlRow>) -> Vec<StateDay> {
    rows.into_iter()
        .filter(|row| row.admin_level == Some(STATE_ADMIN_LEVEL))
        .map(|row| StateDay {
            date: row.date,
            state: row.admin1,
            dl_mobility: row.m50,
            dl_mobility_relative_to_normal: row.m50_index.map(|index| index / 100.0),
        })
        .collect()
}
