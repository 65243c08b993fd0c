//! Historical infection mortality, averaged over four yearly WHO extracts.
//!
//! Each extract is a CSV export of the "Deaths All ages" sheet: six preamble
//! lines, then a header row whose columns are mostly countries, then one row
//! per cause-of-death category. The blank-code row carries population in
//! thousands; categories 20 and 380 summed give infection deaths.

use anyhow::{anyhow, bail, Context, Result};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tracing::info;

use crate::config::Config;
use crate::frame::{cell, parse_f64, RawFrame};
use crate::output::{CleanTable, ColumnData};

/// The WHO extract years averaged together.
pub const YEARS: [u16; 4] = [2000, 2010, 2015, 2016];

/// Lines above the header row in each extract.
const PREAMBLE_LINES: usize = 6;
/// Data rows past this index are aggregate/regional blocks.
const LAST_COUNTRY_ROW: usize = 218;
/// The first two data rows are leading junk below the header.
const LEADING_JUNK_ROWS: usize = 2;

const CODE_COMMUNICABLE: f64 = 20.0;
const CODE_RESPIRATORY: f64 = 380.0;

/// Header names that are not country columns. Unnamed spacer columns and the
/// `Member State…` legend column are excluded separately.
const META_COLUMNS: &[&str] = &["Sex", "GHE code", "GHE cause"];

struct Tally {
    pop_thousands: f64,
    infection_deaths: f64,
    years: u32,
}

pub fn run(cfg: &Config) -> Result<()> {
    let mut yearly = Vec::with_capacity(YEARS.len());
    for year in YEARS {
        let path = cfg.raw(&format!("GHE2016_Deaths_{}-country.csv", year));
        let frame = load_extract(&path)?;
        let counts =
            yearly_counts(&frame).with_context(|| format!("cleaning {}", path.display()))?;
        yearly.push(counts);
    }

    let rows = aggregate(yearly);
    let count = rows.len();
    let mut countries = Vec::with_capacity(count);
    let mut pops = Vec::with_capacity(count);
    let mut rates = Vec::with_capacity(count);
    for (country, pop, rate) in rows {
        countries.push(Some(country));
        pops.push(Some(pop));
        rates.push(Some(rate));
    }

    let table = CleanTable::new(vec![
        ("country", ColumnData::Str(countries)),
        ("pop_thousands", ColumnData::F64(pops)),
        ("infection_death_rate", ColumnData::F64(rates)),
    ])?;
    table.write_parquet(&cfg.clean("epidemic_rates.parquet"))?;
    info!(countries = count, "wrote epidemic rates");
    Ok(())
}

/// Skip the preamble and parse the rest of the file as a headered frame.
fn load_extract(path: &Path) -> Result<RawFrame> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let mut offset = 0usize;
    for _ in 0..PREAMBLE_LINES {
        match contents[offset..].find('\n') {
            Some(i) => offset += i + 1,
            None => bail!("{} ended before the header row", path.display()),
        }
    }
    RawFrame::from_reader(contents[offset..].as_bytes())
        .with_context(|| format!("reading {}", path.display()))
}

fn is_country_column(header: &str) -> bool {
    !header.is_empty()
        && !header.starts_with("Member State")
        && !META_COLUMNS.contains(&header)
}

/// Per-country (population in thousands, infection deaths) for one extract.
fn yearly_counts(frame: &RawFrame) -> Result<Vec<(String, f64, f64)>> {
    let code_idx = frame.column_index("GHE code")?;
    let country_cols: Vec<usize> = frame
        .headers
        .iter()
        .enumerate()
        .filter(|(_, h)| is_country_column(h))
        .map(|(i, _)| i)
        .collect();
    if country_cols.is_empty() {
        bail!("no country columns found in {:?}", frame.headers);
    }

    let mut population: Option<&Vec<String>> = None;
    let mut communicable: Option<&Vec<String>> = None;
    let mut respiratory: Option<&Vec<String>> = None;
    for row in frame
        .rows
        .iter()
        .take(LAST_COUNTRY_ROW + 1)
        .skip(LEADING_JUNK_ROWS)
    {
        let code = cell(row, code_idx).trim();
        if code.is_empty() {
            population.get_or_insert(row);
        } else if let Ok(code) = code.parse::<f64>() {
            if code == CODE_COMMUNICABLE {
                communicable.get_or_insert(row);
            } else if code == CODE_RESPIRATORY {
                respiratory.get_or_insert(row);
            }
        }
    }
    let population =
        population.ok_or_else(|| anyhow!("population row (blank GHE code) not found"))?;
    let communicable =
        communicable.ok_or_else(|| anyhow!("GHE code {} row not found", CODE_COMMUNICABLE))?;
    let respiratory =
        respiratory.ok_or_else(|| anyhow!("GHE code {} row not found", CODE_RESPIRATORY))?;

    let mut out = Vec::with_capacity(country_cols.len());
    for &col in &country_cols {
        let country = frame.headers[col].clone();
        let pop = parse_f64(cell(population, col))
            .with_context(|| format!("population for {}", country))?;
        // Source death counts are in thousands.
        let deaths = (parse_f64(cell(communicable, col))
            .with_context(|| format!("communicable deaths for {}", country))?
            + parse_f64(cell(respiratory, col))
                .with_context(|| format!("respiratory deaths for {}", country))?)
            * 1000.0;
        out.push((country, pop, deaths));
    }
    Ok(out)
}

/// Fold the yearly counts into (country, mean population, infection death
/// rate), keeping countries in first-seen order. The explicit keyed tally
/// replaces the original system's catch-all "first iteration" detection.
fn aggregate(yearly: Vec<Vec<(String, f64, f64)>>) -> Vec<(String, f64, f64)> {
    let mut order: Vec<String> = Vec::new();
    let mut tallies: HashMap<String, Tally> = HashMap::new();
    for counts in yearly {
        for (country, pop, deaths) in counts {
            if !tallies.contains_key(&country) {
                order.push(country.clone());
            }
            let tally = tallies.entry(country).or_insert(Tally {
                pop_thousands: 0.0,
                infection_deaths: 0.0,
                years: 0,
            });
            tally.pop_thousands += pop;
            tally.infection_deaths += deaths;
            tally.years += 1;
        }
    }

    order
        .into_iter()
        .map(|country| {
            let tally = &tallies[&country];
            let mean_pop = tally.pop_thousands / tally.years as f64;
            let rate =
                tally.infection_deaths / (mean_pop * 1000.0 * YEARS.len() as f64);
            (country, mean_pop, rate)
        })
        .collect()
}
