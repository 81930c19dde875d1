use crate::filter::Filter;
use crate::record::VcfRecord;
use crate::types::{GenotypeClass, InheritanceModel};

/// Keeps records whose genotypes fit a Mendelian inheritance model across
/// every sample.
///
/// Missing genotypes fail both models: an uncalled sample is never taken
/// as evidence for a carried allele.
#[derive(Debug, Clone)]
pub struct ModelFilter {
    model: InheritanceModel,
}

impl ModelFilter {
    pub fn new(model: InheritanceModel) -> Self {
        Self { model }
    }

    fn fits(&self, class: GenotypeClass) -> bool {
        match self.model {
            // at least one alternate allele, and actually called
            InheritanceModel::Dominant => {
                class != GenotypeClass::HomRef && class != GenotypeClass::Missing
            }
            // two identical alternate alleles
            InheritanceModel::Recessive => class == GenotypeClass::HomAlt,
        }
    }
}

impl Filter for ModelFilter {
    fn name(&self) -> &str {
        match self.model {
            InheritanceModel::Dominant => "model:dominant",
            InheritanceModel::Recessive => "model:recessive",
        }
    }

    fn evaluate(&self, record: &VcfRecord) -> bool {
        // a record without samples has no counterexample and passes
        record
            .genotypes()
            .iter()
            .all(|genotype| self.fits(GenotypeClass::classify(genotype)))
    }
}
