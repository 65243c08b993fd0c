//! Unacast social distancing scoreboard: already long-form, so this is a
//! column projection plus a stable (state, date) sort.

use anyhow::{anyhow, Result};
use chrono::NaiveDate;
use serde::Deserialize;
use tracing::info;

use crate::config::Config;
use crate::dates;
use crate::frame::read_csv_rows;
use crate::output::{CleanTable, ColumnData};

#[derive(Debug, Deserialize)]
struct UnacastRow {
    state_name: String,
    state_population: Option<f64>,
    date: String,
    daily_distance_diff: Option<f64>,
    daily_visitation_diff: Option<f64>,
}

struct StateDay {
    state: String,
    date: NaiveDate,
    state_population: Option<f64>,
    daily_distance_diff: Option<f64>,
    daily_visitation_diff: Option<f64>,
}

pub fn run(cfg: &Config) -> Result<()> {
    let rows: Vec<UnacastRow> = read_csv_rows(&cfg.raw("sds-v3-full-state.csv"))?;
    let days = clean(rows)?;
    let count = days.len();

    let mut states = Vec::with_capacity(count);
    let mut date_col = Vec::with_capacity(count);
    let mut populations = Vec::with_capacity(count);
    let mut distance = Vec::with_capacity(count);
    let mut visitation = Vec::with_capacity(count);
    for day in days {
        states.push(Some(day.state));
        date_col.push(Some(day.date));
        populations.push(day.state_population);
        distance.push(day.daily_distance_diff);
        visitation.push(day.daily_visitation_diff);
    }
    let table = CleanTable::new(vec![
        ("state", ColumnData::Str(states)),
        ("date", ColumnData::Date(date_col)),
        ("state_population", ColumnData::F64(populations)),
        ("daily_distance_diff", ColumnData::F64(distance)),
        ("daily_visitation_diff", ColumnData::F64(visitation)),
    ])?;
    table.write_parquet(&cfg.clean("unacast_social_distancing_state.parquet"))?;
    info!(rows = count, "wrote Unacast mobility");
    Ok(())
}

fn clean(rows: Vec<UnacastRow>) -> Result<Vec<StateDay>> {
    let mut days = rows
        .into_iter()
        .map(|row| {
            let date = dates::parse_date(&row.date)
                .ok_or_else(|| anyhow!("unparseable date `{}`", row.date))?;
            Ok(StateDay {
                state: row.state_name,
                date,
                state_population: row.state_population,
                daily_distance_diff: row.daily_distance_diff,
                daily_visitation_diff: row.daily_visitation_diff,
            })
        })
        .collect::<Result<Vec<_>>>()?;
    days.sort_by(|a, b| a.state.cmp(&b.state).then(a.date.cmp(&b.date)));
    Ok(days)
}
