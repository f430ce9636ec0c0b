use anyhow::{Context, Result};

use crate::almanac::Almanac;

pub fn day5(input: &str) -> Result<(u64, u64)> {
    let almanac = Almanac::parse(input).context("failed to parse almanac")?;

    let part1 = almanac
        .lowest_location_for_values()
        .context("almanac lists no seeds")?;
    let part2 = almanac
        .lowest_location_for_ranges()?
        .context("almanac lists no non-empty seed ranges")?;

    Ok((part1, part2))
}
