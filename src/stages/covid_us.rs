//! U.S. COVID-19 time series, reshaped from wide (one column per date) to
//! long (one row per state and date), plus the static population lookup.

use anyhow::{bail, Result};
use chrono::NaiveDate;
use tracing::info;

use crate::config::Config;
use crate::dates;
use crate::frame::{cell, parse_f64_opt, RawFrame};
use crate::output::{CleanTable, ColumnData};

const STATE: &str = "Province_State";
const POPULATION: &str = "Population";

struct Melted {
    state: String,
    date: NaiveDate,
    value: Option<f64>,
}

pub fn run(cfg: &Config) -> Result<()> {
    let infections = RawFrame::from_csv_path(&cfg.raw("time_series_covid19_confirmed_US.csv"))?;
    write_melted(
        &infections,
        cfg,
        "covid_infections_us.parquet",
        "COVID_infections",
    )?;

    let deaths = RawFrame::from_csv_path(&cfg.raw("time_series_covid19_deaths_US.csv"))?;
    write_population(&deaths, cfg)?;
    write_melted(&deaths, cfg, "covid_deaths_us.parquet", "COVID_mortality")?;
    Ok(())
}

fn write_melted(frame: &RawFrame, cfg: &Config, file_name: &str, measure_name: &str) -> Result<()> {
    let rows = melt(frame)?;
    let count = rows.len();
    let mut states = Vec::with_capacity(count);
    let mut dates_col = Vec::with_capacity(count);
    let mut values = Vec::with_capacity(count);
    for row in rows {
        states.push(Some(row.state));
        dates_col.push(Some(row.date));
        values.push(row.value);
    }
    let table = CleanTable::new(vec![
        ("state", ColumnData::Str(states)),
        ("date", ColumnData::Date(dates_col)),
        (measure_name, ColumnData::F64(values)),
    ])?;
    table.write_parquet(&cfg.clean(file_name))?;
    info!(rows = count, measure = measure_name, "wrote US time series");
    Ok(())
}

/// Date columns are the headers that parse as calendar dates; identifier
/// columns (and the deaths file's `Population` column) never do.
fn date_columns(frame: &RawFrame) -> Vec<(usize, NaiveDate)> {
    frame
        .headers
        .iter()
        .enumerate()
        .filter_map(|(idx, header)| dates::parse_date(header).map(|date| (idx, date)))
        .collect()
}

/// Wide-to-long reshape, column-major: all rows of the first date column,
/// then the next, matching long-format stacking.
fn melt(frame: &RawFrame) -> Result<Vec<Melted>> {
    let state_idx = frame.column_index(STATE)?;
    let columns = date_columns(frame);
    if columns.is_empty() {
        bail!("no date columns found in {:?}", &frame.headers);
    }

    let mut out = Vec::with_capacity(columns.len() * frame.rows.len());
    for (col, date) in columns {
        for row in &frame.rows {
            out.push(Melted {
                state: cell(row, state_idx).to_string(),
                date,
                value: parse_f64_opt(cell(row, col))?,
            });
        }
    }
    Ok(out)
}

/// The per-state population, a dedicated column in the deaths file.
fn write_population(frame: &RawFrame, cfg: &Config) -> Result<()> {
    let state_idx = frame.column_index(STATE)?;
    let pop_idx = frame.column_index(POPULATION)?;

    let count = frame.rows.len();
    let (mut states, mut populations) = (Vec::with_capacity(count), Vec::with_capacity(count));
    for row in &frame.rows {
        states.push(Some(cell(row, state_idx).to_string()));
        populations.push(parse_f64_opt(cell(row, pop_idx))?);
    }
    let table = CleanTable::new(vec![
        ("state", ColumnData::Str(states)),
        ("population", ColumnData::F64(populations)),
    ])?;
    table.write_parquet(&cfg.clean("pop_us.parquet"))?;
    info!(rows = count, "wrote US population lookup");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    const WIDE: &str = "\
UID,Province_State,Country_Region,Population,4/17/20,4/18/20,4/19/20
1,Washington,US,7600000,10,12,15
2,Oregon,US,4200000,3,4,
";

    #[test]
    fn melt_covers_the_full_cartesian_product() -> Result<()> {
        let frame = RawFrame::from_reader(WIDE.as_bytes())?;
        let rows = melt(&frame)?;

        // 2 states x 3 date columns, nothing duplicated or dropped.
        assert_eq!(rows.len(), 6);
        let pairs: HashSet<(String, NaiveDate)> = rows
            .iter()
            .map(|r| (r.state.clone(), r.date))
            .collect();
        assert_eq!(pairs.len(), 6);
        for state in ["Washington", "Oregon"] {
            for day in 17..=19 {
                let date = NaiveDate::from_ymd_opt(2020, 4, day).unwrap();
                assert!(pairs.contains(&(state.to_string(), date)));
            }
        }
        Ok(())
    }

    #[test]
    fn melt_is_column_major_and_keeps_nulls() -> Result<()> {
        let frame = RawFrame::from_reader(WIDE.as_bytes())?;
        let rows = melt(&frame)?;
        assert_eq!(rows[0].state, "Washington");
        assert_eq!(rows[0].date, NaiveDate::from_ymd_opt(2020, 4, 17).unwrap());
        assert_eq!(rows[0].value, Some(10.0));
        assert_eq!(rows[1].state, "Oregon");
        assert_eq!(rows[1].date, NaiveDate::from_ymd_opt(2020, 4, 17).unwrap());
        // Oregon's 4/19 cell is empty.
        assert_eq!(rows[5].value, None);
        Ok(())
    }

    #[test]
    fn population_is_not_treated_as_a_date_column() -> Result<()> {
        let frame = RawFrame::from_reader(WIDE.as_bytes())?;
        let columns = date_columns(&frame);
        assert_eq!(columns.len(), 3);
        assert!(columns.iter().all(|(idx, _)| *idx >= 4));
        Ok(())
    }

    #[test]
    fn population_lookup_round_trips() -> Result<()> {
        let dir = tempfile::tempdir()?;
        std::fs::create_dir_all(dir.path().join("clean"))?;
        let cfg = Config::new(dir.path());
        let frame = RawFrame::from_reader(WIDE.as_bytes())?;
        write_population(&frame, &cfg)?;

        let batches = crate::testutil::read_parquet(&cfg.clean("pop_us.parquet"))?;
        let batch = &batches[0];
        assert_eq!(
            crate::testutil::str_column(batch, "state"),
            vec![Some("Washington".to_string()), Some("Oregon".to_string())]
        );
        assert_eq!(
            crate::testutil::f64_column(batch, "population"),
            vec![Some(7_600_000.0), Some(4_200_000.0)]
        );
        Ok(())
    }
}
