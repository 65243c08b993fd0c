//! Global COVID-19 infections and deaths, one fixed snapshot date.

use anyhow::Result;
use tracing::info;

use crate::config::Config;
use crate::frame::{cell, parse_f64_opt, RawFrame};
use crate::output::{CleanTable, ColumnData};

/// The date column extracted from both global time series.
const SNAPSHOT_DATE: &str = "4/18/20";

const PROVINCE: &str = "Province/State";
const COUNTRY: &str = "Country/Region";

pub fn run(cfg: &Config) -> Result<()> {
    let infections =
        RawFrame::from_csv_path(&cfg.raw("time_series_covid19_confirmed_global.csv"))?;
    write_snapshot(
        &infections,
        cfg,
        "covid_infections_global.parquet",
        "covid_infections",
    )?;

    let deaths = RawFrame::from_csv_path(&cfg.raw("time_series_covid19_deaths_global.csv"))?;
    write_snapshot(&deaths, cfg, "covid_deaths_global.parquet", "covid_deaths")?;
    Ok(())
}

fn write_snapshot(
    frame: &RawFrame,
    cfg: &Config,
    file_name: &str,
    measure_name: &str,
) -> Result<()> {
    let rows = snapshot(frame)?;
    let count = rows.len();
    let (mut countries, mut values) = (Vec::with_capacity(count), Vec::with_capacity(count));
    for (country, value) in rows {
        countries.push(Some(country));
        values.push(value);
    }
    let table = CleanTable::new(vec![
        ("country", ColumnData::Str(countries)),
        (measure_name, ColumnData::F64(values)),
    ])?;
    table.write_parquet(&cfg.clean(file_name))?;
    info!(countries = count, measure = measure_name, "wrote global snapshot");
    Ok(())
}

/// Whole-country rows only (blank `Province/State`), projected to the
/// snapshot date column.
fn snapshot(frame: &RawFrame) -> Result<Vec<(String, Option<f64>)>> {
    let province_idx = frame.column_index(PROVINCE)?;
    let country_idx = frame.column_index(COUNTRY)?;
    let value_idx = frame.column_index(SNAPSHOT_DATE)?;

    frame
        .rows
        .iter()
        .filter(|row| cell(row, province_idx).is_empty())
        .map(|row| {
            Ok((
                cell(row, country_idx).to_string(),
                parse_f64_opt(cell(row, value_idx))?,
            ))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sub_national_rows_are_excluded() -> Result<()> {
        let data = "\
Province/State,Country/Region,Lat,Long,4/17/20,4/18/20
,Syldavia,0,0,10,12
Northern,Borduria,0,0,1,2
,Borduria,0,0,5,
";
        let frame = RawFrame::from_reader(data.as_bytes())?;
        let rows = snapshot(&frame)?;
        assert_eq!(
            rows,
            vec![
                ("Syldavia".to_string(), Some(12.0)),
                ("Borduria".to_string(), None),
            ]
        );
        Ok(())
    }

    #[test]
    fn missing_snapshot_column_aborts() -> Result<()> {
        let data = "Province/State,Country/Region,4/17/20\n,Syldavia,10\n";
        let frame = RawFrame::from_reader(data.as_bytes())?;
        assert!(snapshot(&frame).is_err());
        Ok(())
    }
}
