use std::str::FromStr;

use getset::Getters;
use nom::combinator::all_consuming;
use strum::EnumString;

use crate::parser;

/// Phased or unphased alleles, represented as indices.
///
/// Index 0 is the reference allele, everything from 1 on is an alternate
/// allele in ALT order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GenotypeAllele {
    Unphased(i32),
    Phased(i32),
    UnphasedMissing,
    PhasedMissing,
}

impl GenotypeAllele {
    /// Get the index into the list of alleles.
    pub fn index(self) -> Option<u32> {
        match self {
            GenotypeAllele::Unphased(i) | GenotypeAllele::Phased(i) => Some(i as u32),
            GenotypeAllele::UnphasedMissing | GenotypeAllele::PhasedMissing => None,
        }
    }
}

/// One sample's allele calls at a record.
pub type Genotype = Vec<GenotypeAllele>;

/// A genotype's zygosity with respect to the reference allele.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenotypeClass {
    /// Every allele is the reference allele.
    HomRef,
    /// Exactly one allele is an alternate allele.
    Het,
    /// Every allele is the same alternate allele.
    HomAlt,
    /// Carries alternate alleles but fits none of the above, e.g. `1/2`.
    Other,
    /// At least one allele is uncalled, or there are no alleles at all.
    Missing,
}

impl GenotypeClass {
    /// Classifies a single sample's genotype.
    ///
    /// A genotype with any uncalled allele is `Missing` as a whole; it must
    /// never be mistaken for homozygous-reference.
    ///
    /// # Examples
    ///
    /// ```
    /// use vcf_sift::types::{GenotypeAllele, GenotypeClass};
    ///
    /// let het = [GenotypeAllele::Unphased(0), GenotypeAllele::Unphased(1)];
    /// assert_eq!(GenotypeClass::classify(&het), GenotypeClass::Het);
    ///
    /// let half_called = [GenotypeAllele::UnphasedMissing, GenotypeAllele::Unphased(1)];
    /// assert_eq!(GenotypeClass::classify(&half_called), GenotypeClass::Missing);
    /// ```
    pub fn classify(genotype: &[GenotypeAllele]) -> Self {
        let mut indices = Vec::with_capacity(genotype.len());
        for allele in genotype {
            match allele.index() {
                Some(index) => indices.push(index),
                None => return GenotypeClass::Missing,
            }
        }
        if indices.is_empty() {
            return GenotypeClass::Missing;
        }
        let minor = indices.iter().filter(|&&index| index >= 1).count();
        if minor == 0 {
            GenotypeClass::HomRef
        } else if minor == indices.len() && indices.iter().all(|&index| index == indices[0]) {
            GenotypeClass::HomAlt
        } else if minor == 1 {
            GenotypeClass::Het
        } else {
            GenotypeClass::Other
        }
    }
}

/// A raw INFO value. Values keep the text they were read from; numeric
/// interpretation happens at comparison time, per operator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InfoValue {
    /// Presence-only entry, written without `=` in the INFO column.
    Flag,
    Value(String),
}

impl InfoValue {
    /// The value's string form. Flags read as `"true"`.
    pub fn as_str(&self) -> &str {
        match self {
            InfoValue::Flag => "true",
            InfoValue::Value(value) => value,
        }
    }

    /// The value's numeric form, if it has one. Flags never do.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            InfoValue::Flag => None,
            InfoValue::Value(value) => value.parse().ok(),
        }
    }
}

/// A genomic window, `start` and `end` both inclusive, 1-based.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Region {
    pub chrom: String,
    pub start: u64,
    pub end: u64,
}

#[derive(Debug, thiserror::Error)]
#[error("expected CHR:START-END, got {0:?}")]
pub struct RegionParseError(String);

impl FromStr for Region {
    type Err = RegionParseError;

    /// Parses the common `CHR:START-END` notation.
    ///
    /// # Examples
    ///
    /// ```
    /// use vcf_sift::types::Region;
    ///
    /// let region: Region = "chr7:117120016-117308718".parse().unwrap();
    /// assert_eq!(region.chrom, "chr7");
    /// assert_eq!(region.start, 117120016);
    /// ```
    fn from_str(input: &str) -> Result<Self, Self::Err> {
        all_consuming(parser::region)(input)
            .map(|(_, region)| region)
            .map_err(|_| RegionParseError(input.to_owned()))
    }
}

/// Mendelian inheritance pattern all samples of a record are checked
/// against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum InheritanceModel {
    /// Every sample carries at least one alternate allele.
    Dominant,
    /// Every sample is homozygous for the same alternate allele.
    Recessive,
}

pub type Sample = String;

/// Everything read before the first data line: the raw header lines for
/// verbatim passthrough, and the sample names from the `#CHROM` line.
#[derive(Debug, Clone, Default, Getters)]
#[getset(get = "pub")]
pub struct Header {
    pub(crate) lines: Vec<String>,
    pub(crate) samples: Vec<Sample>,
}

#[cfg(test)]
mod test {
    use super::*;

    fn unphased(indices: &[i32]) -> Genotype {
        indices.iter().map(|&i| GenotypeAllele::Unphased(i)).collect()
    }

    #[test]
    fn classify_diploid() {
        assert_eq!(GenotypeClass::classify(&unphased(&[0, 0])), GenotypeClass::HomRef);
        assert_eq!(GenotypeClass::classify(&unphased(&[0, 1])), GenotypeClass::Het);
        assert_eq!(GenotypeClass::classify(&unphased(&[1, 0])), GenotypeClass::Het);
        assert_eq!(GenotypeClass::classify(&unphased(&[1, 1])), GenotypeClass::HomAlt);
        assert_eq!(GenotypeClass::classify(&unphased(&[2, 2])), GenotypeClass::HomAlt);
        assert_eq!(GenotypeClass::classify(&unphased(&[1, 2])), GenotypeClass::Other);
    }

    #[test]
    fn classify_missing() {
        assert_eq!(
            GenotypeClass::classify(&[GenotypeAllele::UnphasedMissing, GenotypeAllele::UnphasedMissing]),
            GenotypeClass::Missing
        );
        assert_eq!(
            GenotypeClass::classify(&[GenotypeAllele::Unphased(1), GenotypeAllele::PhasedMissing]),
            GenotypeClass::Missing
        );
        assert_eq!(GenotypeClass::classify(&[]), GenotypeClass::Missing);
    }

    #[test]
    fn info_value_coercion() {
        assert_eq!(InfoValue::Value("0.25".into()).as_number(), Some(0.25));
        assert_eq!(InfoValue::Value("missense".into()).as_number(), None);
        assert_eq!(InfoValue::Value("missense".into()).as_str(), "missense");
        assert_eq!(InfoValue::Flag.as_number(), None);
        assert_eq!(InfoValue::Flag.as_str(), "true");
    }

    #[test]
    fn region_from_str() {
        let region: Region = "17:100-200".parse().unwrap();
        assert_eq!(region, Region { chrom: "17".into(), start: 100, end: 200 });
        assert!("17:100".parse::<Region>().is_err());
        assert!("17:100-200-300".parse::<Region>().is_err());
        assert!("17".parse::<Region>().is_err());
    }

    #[test]
    fn model_from_str() {
        assert_eq!("dominant".parse(), Ok(InheritanceModel::Dominant));
        assert_eq!("recessive".parse(), Ok(InheritanceModel::Recessive));
        assert!("codominant".parse::<InheritanceModel>().is_err());
    }
}
