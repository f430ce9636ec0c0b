pub mod almanac;
mod solutions;

use std::path::PathBuf;

use anyhow::{Context, Result};

pub use almanac::{Almanac, AlmanacError, MapRule, Pipeline, Range, Stage, StageName};
pub use solutions::*;

pub type Solution = fn(&str) -> Result<(u64, u64)>;

pub const ALL_SOLUTIONS: &[(usize, Solution)] = &[(5, day5)];

/// Directory holding the puzzle inputs, `inputs` unless `AOC_INPUT_DIR` is set.
pub fn input_dir() -> PathBuf {
    std::env::var_os("AOC_INPUT_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("inputs"))
}

pub fn load_input(name: &str) -> Result<String> {
    let path = input_dir().join(name);
    std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read input {}", path.display()))
}

pub fn default_input(n: usize) -> Result<String> {
    load_input(&format!("{}.txt", n))
}

/// Parses a run of ASCII digits. Returns `None` on any other character, on empty input, or when
/// the value does not fit into a `u64`.
pub fn parse_number(bytes: &[u8]) -> Option<u64> {
    if bytes.is_empty() {
        return None;
    }
    let mut ret: u64 = 0;
    for &b in bytes {
        if !b.is_ascii_digit() {
            return None;
        }
        ret = ret.checked_mul(10)?.checked_add((b - b'0') as u64)?;
    }
    Some(ret)
}
