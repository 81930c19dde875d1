use crate::filter::Filter;
use crate::record::VcfRecord;
use crate::types::{GenotypeClass, Region};

/// Keeps records inside a genomic window, bounds inclusive on both ends.
#[derive(Debug, Clone)]
pub struct RegionFilter {
    region: Region,
}

impl RegionFilter {
    pub fn new(region: Region) -> Self {
        Self { region }
    }
}

impl Filter for RegionFilter {
    fn name(&self) -> &str {
        "region"
    }

    fn evaluate(&self, record: &VcfRecord) -> bool {
        record.chrom() == self.region.chrom
            && self.region.start <= record.pos()
            && record.pos() <= self.region.end
    }
}

/// Keeps records with QUAL strictly above the threshold. A record without
/// a QUAL value never passes.
#[derive(Debug, Clone)]
pub struct QualFilter {
    min_qual: f64,
}

impl QualFilter {
    pub fn new(min_qual: f64) -> Self {
        Self { min_qual }
    }
}

impl Filter for QualFilter {
    fn name(&self) -> &str {
        "min-qual"
    }

    fn evaluate(&self, record: &VcfRecord) -> bool {
        record.qual().map_or(false, |qual| qual > self.min_qual)
    }
}

/// Keeps records where the fraction of samples with a fully-called
/// genotype reaches the threshold. A record without samples passes.
#[derive(Debug, Clone)]
pub struct CallRateFilter {
    min_rate: f64,
}

impl CallRateFilter {
    pub fn new(min_rate: f64) -> Self {
        Self { min_rate }
    }
}

impl Filter for CallRateFilter {
    fn name(&self) -> &str {
        "min-call-rate"
    }

    fn evaluate(&self, record: &VcfRecord) -> bool {
        let genotypes = record.genotypes();
        if genotypes.is_empty() {
            return true;
        }
        let called = genotypes
            .iter()
            .filter(|genotype| GenotypeClass::classify(genotype) != GenotypeClass::Missing)
            .count();
        called as f64 / genotypes.len() as f64 >= self.min_rate
    }
}

/// Keeps records whose FILTER column is exactly `PASS`.
#[derive(Debug, Clone)]
pub struct PassFilter;

impl Filter for PassFilter {
    fn name(&self) -> &str {
        "pass"
    }

    fn evaluate(&self, record: &VcfRecord) -> bool {
        record.filters() == "PASS"
    }
}
