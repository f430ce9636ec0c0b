//! Seed almanac: a chain of remapping stages applied to seed numbers.
//!
//! Every stage holds rules `(source_start, length, destination_start)` that shift the half-open
//! interval `[source_start, source_start + length)` onto `[destination_start, ...)`. Numbers not
//! covered by any rule of a stage pass through unchanged. Rules inside one stage never overlap,
//! which is checked when the stage is built.

use std::fmt;

use regex::Regex;
use thiserror::Error;
use tracing::{debug, warn};

use crate::parse_number;

#[derive(Error, Debug)]
pub enum AlmanacError {
    #[error("input is empty")]
    Empty,

    #[error("expected first line to start with \"seeds:\", found {0:?}")]
    MissingSeeds(String),

    #[error("line {line}: invalid number {token:?}")]
    InvalidNumber { line: usize, token: String },

    #[error("line {line}: expected three numbers as a map rule, found {text:?}")]
    MalformedRule { line: usize, text: String },

    #[error("map rules [{first}] and [{second}] overlap")]
    OverlappingRules { first: MapRule, second: MapRule },

    #[error("map rule [{0}] does not fit into 64 bits")]
    RuleOverflow(MapRule),

    #[error("seed range starting at {start} with length {length} does not fit into 64 bits")]
    SeedRangeOverflow { start: u64, length: u64 },

    #[error("seed ranges need an even number of seeds, found {0}")]
    OddSeedCount(usize),

    #[error(transparent)]
    Regex(#[from] regex::Error),
}

/// Half-open interval `[start, start + length)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Range {
    pub start: u64,
    pub length: u64,
}

impl Range {
    pub const fn new(start: u64, length: u64) -> Self {
        Self { start, length }
    }

    fn between(start: u64, end: u64) -> Self {
        Self::new(start, end - start)
    }

    pub const fn end(&self) -> u64 {
        self.start + self.length
    }

    pub const fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Touching at an endpoint is not an overlap.
    pub const fn overlaps(&self, other: &Range) -> bool {
        self.start < other.end() && other.start < self.end()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MapRule {
    // field order matters for the derived Ord
    pub source_start: u64,
    pub length: u64,
    pub destination_start: u64,
}

impl MapRule {
    pub const fn new(source_start: u64, length: u64, destination_start: u64) -> Self {
        Self {
            source_start,
            length,
            destination_start,
        }
    }

    pub const fn source(&self) -> Range {
        Range::new(self.source_start, self.length)
    }

    pub const fn source_end(&self) -> u64 {
        self.source_start + self.length
    }

    pub const fn contains(&self, value: u64) -> bool {
        self.source_start <= value && value < self.source_end()
    }

    /// Shifts `value` by the rule's offset. `value` must lie inside the source interval.
    pub const fn apply(&self, value: u64) -> u64 {
        value - self.source_start + self.destination_start
    }

    fn fits(&self) -> bool {
        self.source_start.checked_add(self.length).is_some()
            && self.destination_start.checked_add(self.length).is_some()
    }
}

impl fmt::Display for MapRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // same order as the almanac lines
        write!(
            f,
            "{} {} {}",
            self.destination_start, self.source_start, self.length
        )
    }
}

/// Categories named by a `<source>-to-<destination> map:` header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageName {
    pub source: String,
    pub destination: String,
}

impl fmt::Display for StageName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-to-{}", self.source, self.destination)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Stage {
    name: Option<StageName>,
    /// Sorted by `source_start`, pairwise disjoint, no zero-length rules.
    rules: Vec<MapRule>,
}

impl Stage {
    /// Builds a stage from rules in any order.
    ///
    /// Rules of length zero are dropped since they map nothing. Overlapping rules and rules whose
    /// source or destination interval would end past `u64::MAX` are rejected.
    pub fn new(rules: impl IntoIterator<Item = MapRule>) -> Result<Self, AlmanacError> {
        let mut rules = rules
            .into_iter()
            .filter(|rule| rule.length != 0)
            .map(|rule| {
                if rule.fits() {
                    Ok(rule)
                } else {
                    Err(AlmanacError::RuleOverflow(rule))
                }
            })
            .collect::<Result<Vec<_>, _>>()?;
        rules.sort_unstable();

        if let Some(pair) = rules
            .windows(2)
            .find(|pair| pair[0].source().overlaps(&pair[1].source()))
        {
            return Err(AlmanacError::OverlappingRules {
                first: pair[0],
                second: pair[1],
            });
        }

        Ok(Self { name: None, rules })
    }

    pub fn with_name(mut self, name: StageName) -> Self {
        self.name = Some(name);
        self
    }

    pub fn name(&self) -> Option<&StageName> {
        self.name.as_ref()
    }

    pub fn rules(&self) -> &[MapRule] {
        &self.rules
    }

    pub fn map_value(&self, value: u64) -> u64 {
        // last rule starting at or before `value`
        let idx = self.rules.partition_point(|rule| rule.source_start <= value);
        match idx.checked_sub(1).and_then(|idx| self.rules.get(idx)) {
            Some(rule) if rule.contains(value) => rule.apply(value),
            _ => value,
        }
    }

    /// Splits `range` along the rule boundaries it crosses and pushes the mapped pieces to `out`.
    ///
    /// Pieces are pushed in source order. Empty pieces are never pushed.
    pub fn map_range(&self, range: Range, out: &mut Vec<Range>) {
        let mut rest = range;
        // rules are disjoint and sorted, so their ends are sorted as well
        let mut idx = self.rules.partition_point(|rule| rule.source_end() <= rest.start);

        while !rest.is_empty() {
            let rule = match self.rules.get(idx) {
                Some(rule) if rule.source().overlaps(&rest) => rule,
                _ => {
                    out.push(rest);
                    return;
                }
            };

            if rest.start < rule.source_start {
                out.push(Range::between(rest.start, rule.source_start));
            }
            let overlap_start = rest.start.max(rule.source_start);
            let overlap_end = rest.end().min(rule.source_end());
            out.push(Range::new(
                rule.apply(overlap_start),
                overlap_end - overlap_start,
            ));

            rest = Range::between(overlap_end, rest.end());
            idx += 1;
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Pipeline {
    stages: Vec<Stage>,
}

impl Pipeline {
    pub fn new(stages: Vec<Stage>) -> Self {
        Self { stages }
    }

    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    pub fn map_value(&self, value: u64) -> u64 {
        self.stages
            .iter()
            .fold(value, |value, stage| stage.map_value(value))
    }

    /// Pushes every range through all stages and returns the resulting pieces, unmerged.
    pub fn map_range_set(&self, ranges: impl IntoIterator<Item = Range>) -> Vec<Range> {
        let mut current: Vec<Range> = ranges.into_iter().filter(|r| !r.is_empty()).collect();
        let mut next = Vec::with_capacity(current.len());

        for (idx, stage) in self.stages.iter().enumerate() {
            for &range in &current {
                stage.map_range(range, &mut next);
            }
            debug!(
                stage = idx,
                name = stage.name().map(tracing::field::display),
                ranges_in = current.len(),
                ranges_out = next.len(),
                "mapped ranges through stage"
            );
            std::mem::swap(&mut current, &mut next);
            next.clear();
        }

        current
    }

    /// Lowest start over all mapped pieces, or `None` when no range holds any value.
    pub fn map_ranges(&self, ranges: impl IntoIterator<Item = Range>) -> Option<u64> {
        self.map_range_set(ranges)
            .iter()
            .map(|range| range.start)
            .min()
    }
}

/// Pairs up seed numbers as `(start, length)`. Empty ranges are skipped.
pub fn seed_ranges(seeds: &[u64]) -> Result<Vec<Range>, AlmanacError> {
    if seeds.len() % 2 != 0 {
        return Err(AlmanacError::OddSeedCount(seeds.len()));
    }
    seeds
        .chunks_exact(2)
        .filter(|pair| pair[1] != 0)
        .map(|pair| {
            let (start, length) = (pair[0], pair[1]);
            match start.checked_add(length) {
                Some(_) => Ok(Range::new(start, length)),
                None => Err(AlmanacError::SeedRangeOverflow { start, length }),
            }
        })
        .collect()
}

pub fn lowest_location_for_values(seeds: &[u64], pipeline: &Pipeline) -> Option<u64> {
    seeds.iter().map(|&seed| pipeline.map_value(seed)).min()
}

pub fn lowest_location_for_ranges(
    seeds: &[u64],
    pipeline: &Pipeline,
) -> Result<Option<u64>, AlmanacError> {
    Ok(pipeline.map_ranges(seed_ranges(seeds)?))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Almanac {
    pub seeds: Vec<u64>,
    pub pipeline: Pipeline,
}

impl Almanac {
    pub fn parse(input: &str) -> Result<Self, AlmanacError> {
        let header = Regex::new(r"^([a-z]+)-to-([a-z]+) map:$")?;
        let mut lines = input
            .lines()
            .enumerate()
            .map(|(idx, line)| (idx + 1, line.trim_end()));

        let (seeds_line, first) = lines
            .find(|(_, line)| !line.is_empty())
            .ok_or(AlmanacError::Empty)?;
        let seeds = first
            .strip_prefix("seeds:")
            .ok_or_else(|| AlmanacError::MissingSeeds(first.to_owned()))?
            .split_whitespace()
            .map(|token| parse_token(seeds_line, token))
            .collect::<Result<Vec<_>, _>>()?;

        let mut stages = Vec::new();
        let mut block: Option<(Option<StageName>, Vec<MapRule>)> = None;
        for (line_no, line) in lines {
            if line.is_empty() {
                if let Some((name, rules)) = block.take() {
                    stages.push(build_stage(name, rules)?);
                }
                continue;
            }

            match &mut block {
                Some((_, rules)) => rules.push(parse_rule(line_no, line)?),
                None => block = Some((parse_stage_name(&header, line), Vec::new())),
            }
        }
        if let Some((name, rules)) = block {
            stages.push(build_stage(name, rules)?);
        }

        for pair in stages.windows(2) {
            if let (Some(prev), Some(next)) = (pair[0].name(), pair[1].name()) {
                if prev.destination != next.source {
                    warn!(%prev, %next, "map categories do not chain");
                }
            }
        }
        debug!(
            seeds = seeds.len(),
            stages = stages.len(),
            "parsed almanac"
        );

        Ok(Self {
            seeds,
            pipeline: Pipeline::new(stages),
        })
    }

    pub fn lowest_location_for_values(&self) -> Option<u64> {
        lowest_location_for_values(&self.seeds, &self.pipeline)
    }

    pub fn lowest_location_for_ranges(&self) -> Result<Option<u64>, AlmanacError> {
        lowest_location_for_ranges(&self.seeds, &self.pipeline)
    }
}

fn parse_token(line: usize, token: &str) -> Result<u64, AlmanacError> {
    parse_number(token.as_bytes()).ok_or_else(|| AlmanacError::InvalidNumber {
        line,
        token: token.to_owned(),
    })
}

fn parse_rule(line_no: usize, line: &str) -> Result<MapRule, AlmanacError> {
    let numbers = line
        .split_whitespace()
        .map(|token| parse_token(line_no, token))
        .collect::<Result<Vec<_>, _>>()?;
    match numbers[..] {
        [destination_start, source_start, length] => {
            Ok(MapRule::new(source_start, length, destination_start))
        }
        _ => Err(AlmanacError::MalformedRule {
            line: line_no,
            text: line.to_owned(),
        }),
    }
}

fn parse_stage_name(header: &Regex, line: &str) -> Option<StageName> {
    let caps = header.captures(line)?;
    Some(StageName {
        source: caps[1].to_owned(),
        destination: caps[2].to_owned(),
    })
}

fn build_stage(name: Option<StageName>, rules: Vec<MapRule>) -> Result<Stage, AlmanacError> {
    let stage = Stage::new(rules)?;
    Ok(match name {
        Some(name) => stage.with_name(name),
        None => stage,
    })
}
