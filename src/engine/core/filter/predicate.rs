use std::cmp::Ordering;

use chrono::NaiveDate;

use crate::engine::core::aggregate::AggregateRef;
use crate::engine::types::ScalarValue;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Gt,
    Gte,
    Lt,
    Lte,
    Eq,
    Neq,
}

impl CompareOp {
    #[inline]
    pub fn matches(&self, ord: Ordering) -> bool {
        match self {
            CompareOp::Gt => ord == Ordering::Greater,
            CompareOp::Gte => ord != Ordering::Less,
            CompareOp::Lt => ord == Ordering::Less,
            CompareOp::Lte => ord != Ordering::Greater,
            CompareOp::Eq => ord == Ordering::Equal,
            CompareOp::Neq => ord != Ordering::Equal,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CompareOp::Gt => ">",
            CompareOp::Gte => ">=",
            CompareOp::Lt => "<",
            CompareOp::Lte => "<=",
            CompareOp::Eq => "=",
            CompareOp::Neq => "!=",
        }
    }
}

/// Left-hand side of a comparison: a row column / group dimension, or an
/// aggregate (HAVING only).
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    Field(String),
    Aggregate(AggregateRef),
}

impl Operand {
    pub fn field(name: &str) -> Self {
        Operand::Field(name.to_string())
    }

    pub fn count() -> Self {
        Operand::Aggregate(AggregateRef::Count)
    }

    pub fn aggregate(agg: AggregateRef) -> Self {
        Operand::Aggregate(agg)
    }

    pub fn describe(&self) -> String {
        match self {
            Operand::Field(name) => name.clone(),
            Operand::Aggregate(agg) => agg.to_string(),
        }
    }

    fn compare(self, op: CompareOp, value: impl Into<ScalarValue>) -> Predicate {
        Predicate::Compare {
            operand: self,
            op,
            value: value.into(),
        }
    }

    pub fn gt(self, value: impl Into<ScalarValue>) -> Predicate {
        self.compare(CompareOp::Gt, value)
    }

    pub fn gte(self, value: impl Into<ScalarValue>) -> Predicate {
        self.compare(CompareOp::Gte, value)
    }

    pub fn lt(self, value: impl Into<ScalarValue>) -> Predicate {
        self.compare(CompareOp::Lt, value)
    }

    pub fn lte(self, value: impl Into<ScalarValue>) -> Predicate {
        self.compare(CompareOp::Lte, value)
    }

    pub fn equals(self, value: impl Into<ScalarValue>) -> Predicate {
        self.compare(CompareOp::Eq, value)
    }

    pub fn not_equals(self, value: impl Into<ScalarValue>) -> Predicate {
        self.compare(CompareOp::Neq, value)
    }

    /// Inclusive on both ends
    pub fn between(self, low: impl Into<ScalarValue>, high: impl Into<ScalarValue>) -> Predicate {
        Predicate::Between {
            operand: self,
            low: low.into(),
            high: high.into(),
        }
    }

    pub fn in_list<V: Into<ScalarValue>>(self, values: impl IntoIterator<Item = V>) -> Predicate {
        Predicate::InList {
            operand: self,
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    pub fn is_null(self) -> Predicate {
        Predicate::IsNull(self)
    }

    pub fn is_not_null(self) -> Predicate {
        Predicate::IsNotNull(self)
    }
}

/// Boolean predicate tree for WHERE (rows) and HAVING (groups).
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    Compare {
        operand: Operand,
        op: CompareOp,
        value: ScalarValue,
    },
    Between {
        operand: Operand,
        low: ScalarValue,
        high: ScalarValue,
    },
    InList {
        operand: Operand,
        values: Vec<ScalarValue>,
    },
    IsNull(Operand),
    IsNotNull(Operand),
    /// True on group rows where the dimension was aggregated away (SQL `GROUPING(d) = 1`)
    IsTotal(String),
    /// Half-open `[from, to)` on a date column
    DateRange {
        field: String,
        from: NaiveDate,
        to: NaiveDate,
    },
    And(Vec<Predicate>),
    Or(Vec<Predicate>),
    Not(Box<Predicate>),
}

impl Predicate {
    pub fn and(predicates: Vec<Predicate>) -> Self {
        Predicate::And(predicates)
    }

    pub fn or(predicates: Vec<Predicate>) -> Self {
        Predicate::Or(predicates)
    }

    #[allow(clippy::should_implement_trait)]
    pub fn not(predicate: Predicate) -> Self {
        Predicate::Not(Box::new(predicate))
    }

    pub fn is_total(dimension: &str) -> Self {
        Predicate::IsTotal(dimension.to_string())
    }

    pub fn date_range(field: &str, from: NaiveDate, to: NaiveDate) -> Self {
        Predicate::DateRange {
            field: field.to_string(),
            from,
            to,
        }
    }
}
