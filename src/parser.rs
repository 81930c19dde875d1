use nom::branch::alt;
use nom::bytes::complete::{is_not, tag};
use nom::character::complete::digit1;
use nom::combinator::{map, map_res, opt, value};
use nom::multi::{many0, separated_list1};
use nom::sequence::{pair, preceded, separated_pair};
use nom::IResult;

use crate::types::{GenotypeAllele, InfoValue, Region};

/// A single allele call: an index, or `.` for uncalled.
fn allele(input: &str) -> IResult<&str, Option<i32>> {
    alt((
        value(None, tag(".")),
        map(map_res(digit1, str::parse), Some),
    ))(input)
}

/// Parses a GT value such as `0/1`, `1|1` or `./.`.
///
/// The separator in front of an allele carries its phasing; the leading
/// allele has no separator and counts as unphased.
pub(crate) fn genotype(input: &str) -> IResult<&str, Vec<GenotypeAllele>> {
    let (input, first) = allele(input)?;
    let (input, rest) = many0(pair(alt((tag("/"), tag("|"))), allele))(input)?;
    let mut alleles = Vec::with_capacity(rest.len() + 1);
    alleles.push(match first {
        Some(index) => GenotypeAllele::Unphased(index),
        None => GenotypeAllele::UnphasedMissing,
    });
    for (separator, call) in rest {
        let phased = separator == "|";
        alleles.push(match (call, phased) {
            (Some(index), true) => GenotypeAllele::Phased(index),
            (Some(index), false) => GenotypeAllele::Unphased(index),
            (None, true) => GenotypeAllele::PhasedMissing,
            (None, false) => GenotypeAllele::UnphasedMissing,
        });
    }
    Ok((input, alleles))
}

/// One INFO entry: `KEY=VALUE`, or a bare `KEY` flag.
fn info_entry(input: &str) -> IResult<&str, (String, InfoValue)> {
    let (input, key) = is_not(";=\t")(input)?;
    let (input, assigned) = opt(preceded(tag("="), opt(is_not(";\t"))))(input)?;
    let value = match assigned {
        None => InfoValue::Flag,
        Some(text) => InfoValue::Value(text.unwrap_or("").to_owned()),
    };
    Ok((input, (key.to_owned(), value)))
}

/// The INFO column: `;`-separated entries.
pub(crate) fn info(input: &str) -> IResult<&str, Vec<(String, InfoValue)>> {
    separated_list1(tag(";"), info_entry)(input)
}

/// A `CHR:START-END` region, both bounds inclusive.
pub(crate) fn region(input: &str) -> IResult<&str, Region> {
    let (input, (chrom, (start, end))) = separated_pair(
        is_not(":"),
        tag(":"),
        separated_pair(
            map_res(digit1, str::parse),
            tag("-"),
            map_res(digit1, str::parse),
        ),
    )(input)?;
    Ok((
        input,
        Region {
            chrom: chrom.to_owned(),
            start,
            end,
        },
    ))
}
