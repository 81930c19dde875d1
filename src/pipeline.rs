use anyhow::Result;
use getset::Getters;
use log::info;

use crate::filter::{
    CallRateFilter, Filter, InfoFilter, ModelFilter, PassFilter, QualFilter, RegionFilter,
};
use crate::record::VcfRecord;
use crate::types::{InheritanceModel, Region};

/// Everything a run may switch on. Collected by the CLI, consumed once by
/// [`FilterPipeline::build`].
#[derive(Debug, Clone)]
pub struct FilterConfig {
    pub region: Option<Region>,
    pub min_qual: Option<f64>,
    pub min_call_rate: Option<f64>,
    /// Require `PASS` in the FILTER column. On unless the user opts out.
    pub require_pass: bool,
    /// `FIELD OPERATOR VALUE` expressions, applied in the order given.
    pub info_filters: Vec<String>,
    pub model: Option<InheritanceModel>,
}

impl Default for FilterConfig {
    fn default() -> Self {
        FilterConfig {
            region: None,
            min_qual: None,
            min_call_rate: None,
            require_pass: true,
            info_filters: Vec::new(),
            model: None,
        }
    }
}

/// The ordered filters of one run. Built once before the first record is
/// read, never mutated while streaming.
pub struct FilterPipeline {
    filters: Vec<Box<dyn Filter>>,
}

impl FilterPipeline {
    /// Assembles the active filters in their fixed priority order: region,
    /// quality, call rate, PASS, INFO expressions (in user order), model.
    ///
    /// A malformed expression fails the build; nothing is ever filtered by
    /// a pipeline that is only partially what the user asked for.
    pub fn build(config: &FilterConfig) -> Result<Self> {
        let mut filters: Vec<Box<dyn Filter>> = Vec::new();
        if let Some(region) = &config.region {
            filters.push(Box::new(RegionFilter::new(region.clone())));
        }
        if let Some(min_qual) = config.min_qual {
            filters.push(Box::new(QualFilter::new(min_qual)));
        }
        if let Some(min_rate) = config.min_call_rate {
            filters.push(Box::new(CallRateFilter::new(min_rate)));
        }
        if config.require_pass {
            filters.push(Box::new(PassFilter));
        }
        for expression in &config.info_filters {
            filters.push(Box::new(InfoFilter::compile(expression)?));
        }
        if let Some(model) = config.model {
            filters.push(Box::new(ModelFilter::new(model)));
        }
        Ok(FilterPipeline { filters })
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// `true` if the record survives every active filter.
    ///
    /// Evaluation stops at the first rejection; since the overall decision
    /// is a plain conjunction, the outcome does not depend on filter order,
    /// only the evaluation cost does.
    pub fn evaluate(&self, record: &VcfRecord) -> bool {
        self.filters.iter().all(|filter| filter.evaluate(record))
    }

    /// Same decision as [`FilterPipeline::evaluate`], also updating the
    /// sequential pass counters.
    pub fn evaluate_recording(&self, record: &VcfRecord, stats: &mut FilterStats) -> bool {
        stats.records += 1;
        for (slot, filter) in self.filters.iter().enumerate() {
            if !filter.evaluate(record) {
                return false;
            }
            stats.passed[slot] += 1;
        }
        stats.accepted += 1;
        true
    }

    /// Fresh counters matching this pipeline's filters.
    pub fn stats(&self) -> FilterStats {
        FilterStats {
            names: self.filters.iter().map(|filter| filter.name().to_owned()).collect(),
            passed: vec![0; self.filters.len()],
            records: 0,
            accepted: 0,
        }
    }

    /// Lazily yields the records that survive every filter, in input order.
    pub fn run<'a, I>(&'a self, records: I) -> impl Iterator<Item = VcfRecord> + 'a
    where
        I: Iterator<Item = VcfRecord> + 'a,
    {
        records.filter(move |record| self.evaluate(record))
    }
}

/// How far down the ordered filter list records made it: for each filter,
/// the number of records that reached it and passed. Honors the
/// short-circuit, so a record rejected early is not counted against later
/// filters.
#[derive(Debug, Clone, Getters)]
#[getset(get = "pub")]
pub struct FilterStats {
    names: Vec<String>,
    passed: Vec<u64>,
    records: u64,
    accepted: u64,
}

impl FilterStats {
    /// Writes the counters to the log.
    pub fn report(&self) {
        info!("{} records read, {} accepted", self.records, self.accepted);
        for (name, passed) in self.names.iter().zip(&self.passed) {
            info!("passed {}: {}", name, passed);
        }
    }
}
