use std::str::FromStr;

use log::warn;
use strum::EnumString;

use crate::filter::Filter;
use crate::record::VcfRecord;

/// Comparison operators accepted in INFO filter expressions. The aliases
/// map one-to-one onto the usual notation: `gt` is `>`, `neq` is `!=`,
/// `ncontains` is "does not contain".
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum Operator {
    Gt,
    Gte,
    Lt,
    Lte,
    Eq,
    Neq,
    Contains,
    Ncontains,
}

impl Operator {
    fn is_ordering(self) -> bool {
        matches!(self, Operator::Gt | Operator::Gte | Operator::Lt | Operator::Lte)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ExpressionError {
    #[error("expected `FIELD OPERATOR VALUE`, got {0:?}")]
    TokenCount(String),
    #[error("unknown operator {0:?}")]
    UnknownOperator(String),
    #[error("non-numeric value {value:?} for operator {operator}")]
    NonNumericValue { operator: String, value: String },
}

/// A compiled `FIELD OPERATOR VALUE` condition over the INFO column.
///
/// Compiled once before the run starts, applied to every record.
#[derive(Debug, Clone)]
pub struct InfoFilter {
    field: String,
    operator: Operator,
    value: String,
    numeric_value: Option<f64>,
    name: String,
}

impl InfoFilter {
    /// Compiles an expression such as `AF gt 0.01` or `ANN contains missense`.
    ///
    /// Ordering operators require a numeric comparison value and are
    /// rejected here, before any input is read; the stored field value is
    /// only checked per record, at evaluation time.
    pub fn compile(expression: &str) -> Result<Self, ExpressionError> {
        let tokens: Vec<&str> = expression.split_whitespace().collect();
        let (field, op, value) = match tokens.as_slice() {
            [field, op, value] => (*field, *op, *value),
            _ => return Err(ExpressionError::TokenCount(expression.to_owned())),
        };
        let operator =
            Operator::from_str(op).map_err(|_| ExpressionError::UnknownOperator(op.to_owned()))?;
        let numeric_value = value.parse::<f64>().ok();
        if operator.is_ordering() && numeric_value.is_none() {
            return Err(ExpressionError::NonNumericValue {
                operator: op.to_owned(),
                value: value.to_owned(),
            });
        }
        Ok(InfoFilter {
            field: field.to_owned(),
            operator,
            value: value.to_owned(),
            numeric_value,
            name: format!("info:{} {} {}", field, op, value),
        })
    }
}

impl Filter for InfoFilter {
    fn name(&self) -> &str {
        &self.name
    }

    fn evaluate(&self, record: &VcfRecord) -> bool {
        // A record without the field never matches, `neq` and `ncontains`
        // included: filters may only narrow the result set.
        let stored = match record.info(&self.field) {
            Some(value) => value,
            None => return false,
        };
        match self.operator {
            Operator::Gt | Operator::Gte | Operator::Lt | Operator::Lte => {
                let threshold = match self.numeric_value {
                    Some(threshold) => threshold,
                    None => return false,
                };
                let stored = match stored.as_number() {
                    Some(number) => number,
                    None => {
                        warn!(
                            "{}: non-numeric value {:?} at {}:{}, rejecting record",
                            self.name,
                            stored.as_str(),
                            record.chrom(),
                            record.pos()
                        );
                        return false;
                    }
                };
                match self.operator {
                    Operator::Gt => stored > threshold,
                    Operator::Gte => stored >= threshold,
                    Operator::Lt => stored < threshold,
                    Operator::Lte => stored <= threshold,
                    _ => unreachable!(),
                }
            }
            Operator::Eq | Operator::Neq => {
                // numeric when both sides are numbers, exact text otherwise
                let equal = match (stored.as_number(), self.numeric_value) {
                    (Some(lhs), Some(rhs)) => lhs == rhs,
                    _ => stored.as_str() == self.value,
                };
                (self.operator == Operator::Eq) == equal
            }
            Operator::Contains => stored.as_str().contains(&self.value),
            Operator::Ncontains => !stored.as_str().contains(&self.value),
        }
    }
}
