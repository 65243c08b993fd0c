use chrono::NaiveDate;

/// Formats seen across the raw sources. Order matters: the two-digit-year
/// form must come before the four-digit form so `4/18/20` resolves to 2020
/// rather than the year 20.
const FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%y", "%m/%d/%Y"];

/// Parse a calendar date in any of the source formats. Returns `None` for
/// anything that is not a date, which also serves to distinguish date
/// columns from identifier columns in the wide time-series headers.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
}

/// Days since the Unix epoch, the representation Date32 columns store.
pub fn to_epoch_days(date: NaiveDate) -> i32 {
    let epoch = NaiveDate::from_ymd_opt(1970, 1, 1).unwrap();
    (date - epoch).num_days() as i32
}
