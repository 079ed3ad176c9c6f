//! Shared test helpers for integration tests

#![allow(dead_code)]

use std::path::{Path, PathBuf};

use assert_cmd::cargo;
use assert_cmd::Command;
use tempfile::TempDir;

/// Helper to get a gsa command
pub fn gsa() -> Command {
    Command::new(cargo::cargo_bin!("gsa"))
}

/// Two-parameter catalog: an influential capital cost and an inert one
pub const CATALOG: &str = "\
name,group,indexes,min_value_base_year,max_value_base_year,min_value_end_year,max_value_end_year,dist,interpolation_index,action
CapitalCost,CapitalCost,\"REGION1,HYD1\",100,300,50,150,unif,YEAR,interpolate
DiscountRate,DiscountRate,REGION1,0.05,0.15,0.05,0.15,unif,None,fixed
";

/// Two Morris trajectories over the two parameters (6 runs, delta 0.5)
pub const SAMPLE: &str = "\
0.0,0.5
0.5,0.5
0.5,1.0
1.0,0.5
1.0,0.0
0.5,0.0
";

/// Objective values tracking the first sample column: y = 2 * x0
pub const OBJECTIVES: &str = "\
MODELRUN,OBJECTIVE
model_run_0,0.0
model_run_1,1.0
model_run_2,1.0
model_run_3,2.0
model_run_4,2.0
model_run_5,1.0
";

pub fn write_file(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, contents).unwrap();
    path
}

pub fn setup_experiment() -> (TempDir, PathBuf, PathBuf) {
    let tmp = TempDir::new().unwrap();
    let parameters = write_file(tmp.path(), "parameters.csv", CATALOG);
    let sample = write_file(tmp.path(), "morris_sample.csv", SAMPLE);
    (tmp, parameters, sample)
}
