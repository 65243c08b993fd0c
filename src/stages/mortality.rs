//! Weekly excess mortality by state, annotated with the contemporaneous
//! national figures so each state can be compared against the U.S. total.

use anyhow::{anyhow, Result};
use chrono::NaiveDate;
use serde::Deserialize;
use std::collections::HashMap;
use tracing::info;

use crate::config::Config;
use crate::dates;
use crate::frame::read_csv_rows;
use crate::output::{CleanTable, ColumnData};

const METHOD_WEIGHTED: &str = "Predicted (weighted)";
const OUTCOME_ALL_CAUSES: &str = "All causes";
const SUPPRESSED: &str = "Suppressed (counts 1-9)";

/// The geography label of the national aggregate rows.
const NATIONAL: &str = "United States";

#[derive(Debug, Deserialize)]
struct ExcessRow {
    #[serde(rename = "Week Ending Date")]
    week_ending: String,
    #[serde(rename = "State")]
    state: String,
    #[serde(rename = "Observed Number")]
    observed: Option<f64>,
    #[serde(rename = "Excess")]
    excess: Option<f64>,
    #[serde(rename = "Type")]
    method: String,
    #[serde(rename = "Outcome")]
    outcome: String,
    #[serde(rename = "Suppress")]
    suppress: String,
}

struct StateWeek {
    date: NaiveDate,
    state: String,
    total_mortality: Option<f64>,
    covid_mortality: Option<f64>,
    covid_mortality_frac: Option<f64>,
    us_total_mortality: Option<f64>,
    us_covid_mortality: Option<f64>,
    us_covid_mortality_frac: Option<f64>,
}

#[derive(Clone, Copy)]
struct NationalRef {
    total: Option<f64>,
    covid: Option<f64>,
    frac: Option<f64>,
}

pub fn run(cfg: &Config) -> Result<()> {
    let rows: Vec<ExcessRow> = read_csv_rows(&cfg.raw("Excess_Deaths_Associated_with_COVID-19.csv"))?;
    let weeks = clean(rows)?;
    let count = weeks.len();

    let mut date_col = Vec::with_capacity(count);
    let mut state_col = Vec::with_capacity(count);
    let mut total = Vec::with_capacity(count);
    let mut covid = Vec::with_capacity(count);
    let mut frac = Vec::with_capacity(count);
    let mut us_total = Vec::with_capacity(count);
    let mut us_covid = Vec::with_capacity(count);
    let mut us_frac = Vec::with_capacity(count);
    for week in weeks {
        date_col.push(Some(week.date));
        state_col.push(Some(week.state));
        total.push(week.total_mortality);
        covid.push(week.covid_mortality);
        frac.push(week.covid_mortality_frac);
        us_total.push(week.us_total_mortality);
        us_covid.push(week.us_covid_mortality);
        us_frac.push(week.us_covid_mortality_frac);
    }

    let table = CleanTable::new(vec![
        ("date", ColumnData::Date(date_col)),
        ("state", ColumnData::Str(state_col)),
        ("total_mortality", ColumnData::F64(total)),
        ("COVID_mortality", ColumnData::F64(covid)),
        ("COVID_mortality_frac", ColumnData::F64(frac)),
        ("US_total_mortality", ColumnData::F64(us_total)),
        ("US_COVID_mortality", ColumnData::F64(us_covid)),
        ("US_COVID_mortality_frac", ColumnData::F64(us_frac)),
    ])?;
    table.write_parquet(&cfg.clean("all_mortality_by_state.parquet"))?;
    info!(rows = count, "wrote state mortality");
    Ok(())
}

/// Filter to the weighted all-causes release, compute the excess fraction,
/// sort by (state, date), and broadcast the national figures by date.
fn clean(rows: Vec<ExcessRow>) -> Result<Vec<StateWeek>> {
    let mut weeks = Vec::new();
    for row in rows {
        if row.method != METHOD_WEIGHTED
            || row.outcome != OUTCOME_ALL_CAUSES
            || row.suppress == SUPPRESSED
        {
            continue;
        }
        let date = dates::parse_date(&row.week_ending)
            .ok_or_else(|| anyhow!("unparseable week ending date `{}`", row.week_ending))?;
        let frac = match (row.excess, row.observed) {
            (Some(excess), Some(observed)) if observed != 0.0 => Some(excess / observed),
            _ => None,
        };
        weeks.push(StateWeek {
            date,
            state: row.state,
            total_mortality: row.observed,
            covid_mortality: row.excess,
            covid_mortality_frac: frac,
            us_total_mortality: None,
            us_covid_mortality: None,
            us_covid_mortality_frac: None,
        });
    }
    weeks.sort_by(|a, b| a.state.cmp(&b.state).then(a.date.cmp(&b.date)));

    // One national value per date; the first match wins if a date repeats.
    let mut national: HashMap<NaiveDate, NationalRef> = HashMap::new();
    for week in weeks.iter().filter(|w| w.state == NATIONAL) {
        national.entry(week.date).or_insert(NationalRef {
            total: week.total_mortality,
            covid: week.covid_mortality,
            frac: week.covid_mortality_frac,
        });
    }

    for week in &mut weeks {
        if let Some(reference) = national.get(&week.date) {
            week.us_total_mortality = reference.total;
            week.us_covid_mortality = reference.covid;
            week.us_covid_mortality_frac = reference.frac;
        }
    }
    Ok(weeks)
}
