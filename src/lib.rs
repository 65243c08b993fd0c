//! Cleans the raw COVID-19 economics datasets into typed Parquet tables.
//!
//! Each stage under [`stages`] reads one or more files from `<base>/raw/`,
//! applies its filter/reshape, and writes one table to `<base>/clean/`.
//! Stages are independent of each other; the binary simply runs them in
//! order.

pub mod config;
pub mod dates;
pub mod frame;
pub mod output;
pub mod stages;
pub mod states;

#[cfg(test)]
pub(crate) mod testutil;
