//! Result aggregation - per-technology raw output onto rectangular grids
//!
//! Raw model output is sparse: a scenario that never builds a technology
//! simply has no rows for it. Downstream alignment needs rectangular data,
//! so both operations here left-merge actual values onto the full
//! calendar x country (or calendar x technology) grid and zero-fill every
//! absent combination. Sparsity is expected, never an error.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AggregateError {
    #[error("failed to read production file {path}: {source}")]
    Read {
        path: String,
        source: csv::Error,
    },

    #[error("failed to write aggregated file {path}: {source}")]
    Write {
        path: String,
        source: csv::Error,
    },
}

/// One row of raw per-technology annual output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductionRecord {
    #[serde(rename = "REGION")]
    pub region: String,
    #[serde(rename = "TECHNOLOGY")]
    pub technology: String,
    #[serde(rename = "FUEL")]
    pub fuel: String,
    #[serde(rename = "YEAR")]
    pub year: i32,
    #[serde(rename = "VALUE")]
    pub value: f64,
}

/// One row of share output: VALUE is the fractional share, the summed raw
/// quantity rides along as absolute_production
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShareRecord {
    #[serde(rename = "REGION")]
    pub region: String,
    #[serde(rename = "TECHNOLOGY")]
    pub technology: String,
    #[serde(rename = "YEAR")]
    pub year: i32,
    #[serde(rename = "VALUE")]
    pub value: f64,
    pub absolute_production: f64,
}

/// The fixed calendar/country universe every aggregated grid is filled to
#[derive(Debug, Clone, PartialEq)]
pub struct AggregationGrid {
    pub first_year: i32,
    pub last_year: i32,
    pub countries: Vec<String>,
    pub region: String,
    /// Width of the country prefix on technology identifiers
    pub country_prefix: usize,
}

impl Default for AggregationGrid {
    fn default() -> Self {
        Self {
            first_year: 2015,
            last_year: 2060,
            countries: ["DK", "SE", "FI", "NO"]
                .iter()
                .map(|c| c.to_string())
                .collect(),
            region: "REGION1".to_string(),
            country_prefix: 2,
        }
    }
}

impl AggregationGrid {
    pub fn years(&self) -> impl Iterator<Item = i32> + '_ {
        self.first_year..=self.last_year
    }

    /// Country prefix of a technology identifier; identifiers too short for
    /// the prefix (or cut mid-character) pass through whole
    fn country_of<'a>(&self, technology: &'a str) -> &'a str {
        technology.get(..self.country_prefix).unwrap_or(technology)
    }
}

fn matches_group(technology: &str, techs: &[String]) -> bool {
    techs.iter().any(|code| technology.contains(code.as_str()))
}

/// Share of a technology group in total production, per (year, country)
///
/// Output carries one row per (country + "all") x calendar year, technology
/// labelled `<country><label>` (bare `<label>` for the "all" rows), VALUE
/// holding the share and absolute_production the group sum.
pub fn calc_share(
    records: &[ProductionRecord],
    techs: &[String],
    label: &str,
    grid: &AggregationGrid,
) -> Vec<ShareRecord> {
    // Group sums and ungrouped totals per (year, country)
    let mut group_sums: BTreeMap<(i32, String), f64> = BTreeMap::new();
    let mut totals: BTreeMap<(i32, String), f64> = BTreeMap::new();

    for record in records {
        let country = grid.country_of(&record.technology).to_string();
        *totals.entry((record.year, country.clone())).or_default() += record.value;
        if matches_group(&record.technology, techs) {
            *group_sums.entry((record.year, country)).or_default() += record.value;
        }
    }

    let mut rows = Vec::new();
    for year in grid.years() {
        // Per-country rows over the full grid, zero-filled
        let mut year_group_sum = 0.0;
        let mut year_total = 0.0;
        for country in &grid.countries {
            let key = (year, country.clone());
            let value = group_sums.get(&key).copied().unwrap_or(0.0);
            let total = totals.get(&key).copied().unwrap_or(0.0);
            year_group_sum += value;
            year_total += total;
            rows.push(ShareRecord {
                region: grid.region.clone(),
                technology: format!("{country}{label}"),
                year,
                value: share_of(value, total),
                absolute_production: value,
            });
        }
        // Cross-country aggregate, sums divided after summing
        rows.push(ShareRecord {
            region: grid.region.clone(),
            technology: label.to_string(),
            year,
            value: share_of(year_group_sum, year_total),
            absolute_production: year_group_sum,
        });
    }

    rows.sort_by(|a, b| (&a.technology, a.year).cmp(&(&b.technology, b.year)));
    rows
}

/// A zero-production (year, country) cell contributes a zero share
fn share_of(value: f64, total: f64) -> f64 {
    if total > 0.0 {
        value / total
    } else {
        0.0
    }
}

/// Raw (non-share) sums over the full country x technology x calendar grid
///
/// Appends one synthetic per-year row tagged with `label` holding the
/// cross-(country, technology) sum.
pub fn calc_sum(
    records: &[ProductionRecord],
    techs: &[String],
    label: &str,
    grid: &AggregationGrid,
) -> Vec<ProductionRecord> {
    let mut actual: BTreeMap<(String, String, i32), f64> = BTreeMap::new();
    for record in records {
        *actual
            .entry((
                record.technology.clone(),
                record.fuel.clone(),
                record.year,
            ))
            .or_default() += record.value;
    }

    let mut rows = Vec::new();
    let mut yearly: BTreeMap<i32, f64> = BTreeMap::new();
    for country in &grid.countries {
        for tech in techs {
            let technology = format!("{country}{tech}");
            let fuel = format!("{country}E1");
            for year in grid.years() {
                let value = actual
                    .get(&(technology.clone(), fuel.clone(), year))
                    .copied()
                    .unwrap_or(0.0);
                *yearly.entry(year).or_default() += value;
                rows.push(ProductionRecord {
                    region: grid.region.clone(),
                    technology: technology.clone(),
                    fuel: fuel.clone(),
                    year,
                    value,
                });
            }
        }
    }

    for (year, value) in yearly {
        rows.push(ProductionRecord {
            region: grid.region.clone(),
            technology: label.to_string(),
            fuel: "E1".to_string(),
            year,
            value,
        });
    }

    rows.sort_by(|a, b| (&a.technology, a.year).cmp(&(&b.technology, b.year)));
    rows
}

/// Load a raw production CSV (REGION,TECHNOLOGY,FUEL,YEAR,VALUE)
pub fn load_production(path: impl AsRef<Path>) -> Result<Vec<ProductionRecord>, AggregateError> {
    let path = path.as_ref();
    let mut reader = csv::Reader::from_path(path).map_err(|source| AggregateError::Read {
        path: path.display().to_string(),
        source,
    })?;
    reader
        .deserialize()
        .collect::<Result<Vec<ProductionRecord>, csv::Error>>()
        .map_err(|source| AggregateError::Read {
            path: path.display().to_string(),
            source,
        })
}

/// Write aggregated rows as CSV
pub fn write_records<T: Serialize>(
    records: &[T],
    path: impl AsRef<Path>,
) -> Result<(), AggregateError> {
    let path = path.as_ref();
    let mut writer = csv::Writer::from_path(path).map_err(|source| AggregateError::Write {
        path: path.display().to_string(),
        source,
    })?;
    for record in records {
        writer
            .serialize(record)
            .map_err(|source| AggregateError::Write {
                path: path.display().to_string(),
                source,
            })?;
    }
    writer.flush().map_err(|source| AggregateError::Write {
        path: path.display().to_string(),
        source: source.into(),
    })
}
