//! The pipeline stages. Each stage reads its raw file(s), applies one
//! filter/reshape, and writes one clean Parquet table; no stage depends on
//! another's output.

pub mod covid_global;
pub mod covid_us;
pub mod epidemic;
pub mod gdp;
pub mod healthcare;
pub mod mobility;
pub mod mortality;
pub mod rainfall;
pub mod safety;

use crate::config::Config;
use anyhow::Result;

/// Every stage in the order the pipeline runs them. The order only mirrors
/// the layout of the raw directory; any other order would work.
pub const STAGES: &[(&str, fn(&Config) -> Result<()>)] = &[
    ("epidemic_rates", epidemic::run),
    ("healthcare", healthcare::run),
    ("covid_safety", safety::run),
    ("covid_global", covid_global::run),
    ("covid_us", covid_us::run),
    ("gdp_per_capita", gdp::run),
    ("state_mortality", mortality::run),
    ("twitter_mobility", mobility::twitter::run),
    ("unacast_mobility", mobility::unacast::run),
    ("descartes_mobility", mobility::descartes::run),
    ("rainfall", rainfall::run),
];

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::Path;

    fn write(raw: &Path, name: &str, contents: &str) {
        let path = raw.join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, contents).unwrap();
    }

    /// A miniature raw directory covering every source file the stages read.
    fn seed_raw(raw: &Path) {
        for year in epidemic::YEARS {
            write(
                raw,
                &format!("GHE2016_Deaths_{}-country.csv", year),
                "title\n\n\n\n\nnotes\n\
                 Sex,GHE code,GHE cause,,Aland,Borduria\n\
                 Persons,,,,,\n\
                 Persons,,,,,\n\
                 Persons,,All causes,,1000,2000\n\
                 Persons,20,Communicable,,1.5,2.5\n\
                 Persons,380,Respiratory,,0.5,0.5\n",
            );
        }
        write(
            raw,
            "IHME_GBD_2016_HAQ_INDEX_1990_2016_SCALED_CAUSE_VALUES/IHME_GBD_2016_HAQ_INDEX_1990_2016_SCALED_CAUSE_VALUES_Y2018M05D23.csv",
            "location_name,indicator_name,year_id,val\n\
             Aland,Healthcare Access and Quality Index,2016,81.3\n\
             Aland,Healthcare Access and Quality Index,1990,60.1\n\
             Borduria,Healthcare Access and Quality Index,2016,44.9\n",
        );
        write(raw, "euro_ratings.txt", "1\tSyldavia\t7.2\n");
        write(raw, "asia_ratings.txt", "1\tWadiya\t6.4\n");
        write(
            raw,
            "time_series_covid19_confirmed_global.csv",
            "Province/State,Country/Region,Lat,Long,4/17/20,4/18/20\n\
             ,Syldavia,0,0,10,12\n\
             North,Borduria,0,0,1,2\n\
             ,Borduria,0,0,5,6\n",
        );
        write(
            raw,
            "time_series_covid19_deaths_global.csv",
            "Province/State,Country/Region,Lat,Long,4/17/20,4/18/20\n\
             ,Syldavia,0,0,1,2\n\
             ,Borduria,0,0,0,1\n",
        );
        write(
            raw,
            "time_series_covid19_confirmed_US.csv",
            "UID,Province_State,Country_Region,4/17/20,4/18/20\n\
             1,Washington,US,10,12\n\
             2,Oregon,US,3,4\n",
        );
        write(
            raw,
            "time_series_covid19_deaths_US.csv",
            "UID,Province_State,Country_Region,Population,4/17/20,4/18/20\n\
             1,Washington,US,7600000,1,2\n\
             2,Oregon,US,4200000,0,1\n",
        );
        write(
            raw,
            "gdp.csv",
            "Country Name,Country Code,2018\nSyldavia,SYL,12000\n",
        );
        write(
            raw,
            "Excess_Deaths_Associated_with_COVID-19.csv",
            "Week Ending Date,State,Observed Number,Excess,Type,Outcome,Suppress\n\
             2020-04-18,United States,60000,9000,Predicted (weighted),All causes,\n\
             2020-04-18,Washington,1100,160,Predicted (weighted),All causes,\n\
             2020-04-18,Washington,1100,160,Predicted (unweighted),All causes,\n",
        );
        write(
            raw,
            "social_mobility_index.longitudinal.20200330.csv",
            ",AK, AK,NA,WA\n2020-03-01,1.0,1.1,0.5,0.8\n",
        );
        write(
            raw,
            "sds-v3-full-state.csv",
            "state_code,state_name,state_population,date,daily_distance_diff,daily_visitation_diff\n\
             WA,Washington,7600000,2020-03-01,-0.2,-0.4\n\
             OR,Oregon,4200000,2020-03-01,-0.1,-0.3\n",
        );
        write(
            raw,
            "DL-us-mobility-daterow.csv",
            "date,country_code,admin_level,admin1,admin2,fips,samples,m50,m50_index\n\
             2020-03-01,US,0,,,,100,5.0,90\n\
             2020-03-01,US,1,Washington,,,100,3.5,85\n\
             2020-03-01,US,2,Washington,King County,53033,100,2.0,40\n",
        );
        write(
            raw,
            "rainfall.csv",
            "Station,Date,Avg_Precip,State\nUSW00024233,2020-03-01,0.12,Washington\n",
        );
    }

    #[test]
    fn every_stage_runs_against_a_miniature_raw_directory() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        seed_raw(&dir.path().join("raw"));
        let cfg = Config::new(dir.path());
        fs::create_dir_all(cfg.clean_dir())?;

        for (name, stage) in STAGES {
            stage(&cfg).unwrap_or_else(|e| panic!("stage {} failed: {:?}", name, e));
        }

        for file in [
            "epidemic_rates.parquet",
            "healthcare.parquet",
            "covid_safety.parquet",
            "covid_infections_global.parquet",
            "covid_deaths_global.parquet",
            "covid_infections_us.parquet",
            "covid_deaths_us.parquet",
            "pop_us.parquet",
            "gdp_per_capita.parquet",
            "all_mortality_by_state.parquet",
            "twitter_social_distancing_state.parquet",
            "unacast_social_distancing_state.parquet",
            "dl_social_distancing_state.parquet",
            "rain_data.parquet",
        ] {
            assert!(cfg.clean(file).is_file(), "{} missing", file);
        }
        Ok(())
    }
}
