use crate::engine::core::aggregate::{AggregateRef, BoundAggregate};
use crate::engine::core::filter::evaluator::{Truth, ValueSource, eval};
use crate::engine::core::filter::predicate::{CompareOp, Operand, Predicate};
use crate::engine::errors::{ConfigurationError, EngineError, TypeError};
use crate::engine::schema::RowSchema;
use crate::engine::types::{LogicalType, ScalarValue};

/// Where an operand's value comes from once bound
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundOperand {
    /// Positional column of an input row
    Column(usize),
    /// Dimension slot of a group key
    Slot(usize),
    Aggregate(BoundAggregate),
}

/// Name resolution for predicates. Rows expose columns; groups expose
/// dimension slots and aggregates.
pub trait BindScope {
    fn bind_field(&self, name: &str) -> Result<(BoundOperand, LogicalType), ConfigurationError>;

    fn bind_aggregate(
        &self,
        agg: &AggregateRef,
    ) -> Result<(BoundOperand, LogicalType), ConfigurationError>;

    /// Slot index for `IsTotal`
    fn bind_total(&self, name: &str) -> Result<usize, ConfigurationError>;
}

/// Binding scope of a pre-aggregation (WHERE) filter
pub struct RowScope<'a> {
    schema: &'a RowSchema,
}

impl<'a> RowScope<'a> {
    pub fn new(schema: &'a RowSchema) -> Self {
        Self { schema }
    }
}

impl BindScope for RowScope<'_> {
    fn bind_field(&self, name: &str) -> Result<(BoundOperand, LogicalType), ConfigurationError> {
        let idx = self
            .schema
            .column_index(name)
            .ok_or_else(|| ConfigurationError::UnknownAttribute(name.to_string()))?;
        let ty = self
            .schema
            .column(idx)
            .map(|(_, def)| def.logical_type)
            .unwrap_or(LogicalType::Null);
        Ok((BoundOperand::Column(idx), ty))
    }

    fn bind_aggregate(
        &self,
        agg: &AggregateRef,
    ) -> Result<(BoundOperand, LogicalType), ConfigurationError> {
        Err(ConfigurationError::AggregateInRowFilter(agg.to_string()))
    }

    fn bind_total(&self, name: &str) -> Result<usize, ConfigurationError> {
        Err(ConfigurationError::AggregateInRowFilter(format!(
            "GROUPING({name})"
        )))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Node {
    Compare {
        operand: BoundOperand,
        op: CompareOp,
        value: ScalarValue,
    },
    Between {
        operand: BoundOperand,
        low: ScalarValue,
        high: ScalarValue,
    },
    InList {
        operand: BoundOperand,
        values: Vec<ScalarValue>,
    },
    IsNull(BoundOperand),
    IsNotNull(BoundOperand),
    IsTotal(usize),
    DateRange {
        operand: BoundOperand,
        from: chrono::NaiveDate,
        to: chrono::NaiveDate,
    },
    And(Vec<Node>),
    Or(Vec<Node>),
    Not(Box<Node>),
}

/// A predicate with names resolved and types checked; safe to evaluate
/// without further errors.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledPredicate {
    root: Node,
}

impl CompiledPredicate {
    pub fn compile(predicate: &Predicate, scope: &dyn BindScope) -> Result<Self, EngineError> {
        Ok(Self {
            root: compile_node(predicate, scope)?,
        })
    }

    pub fn evaluate<S: ValueSource + ?Sized>(&self, source: &S) -> Truth {
        eval(&self.root, source)
    }

    /// Only `True` passes; `Unknown` filters out like `False`.
    #[inline]
    pub fn matches<S: ValueSource + ?Sized>(&self, source: &S) -> bool {
        self.evaluate(source) == Truth::True
    }
}

fn bind_operand(
    operand: &Operand,
    scope: &dyn BindScope,
) -> Result<(BoundOperand, LogicalType), ConfigurationError> {
    match operand {
        Operand::Field(name) => scope.bind_field(name),
        Operand::Aggregate(agg) => scope.bind_aggregate(agg),
    }
}

fn check_comparable(operand: &Operand, left: LogicalType, value: &ScalarValue) -> Result<(), TypeError> {
    let right = value.logical_type();
    if left.comparable_with(right) {
        Ok(())
    } else {
        Err(TypeError::IncompatibleComparison {
            operand: operand.describe(),
            left,
            right,
        })
    }
}

fn compile_node(predicate: &Predicate, scope: &dyn BindScope) -> Result<Node, EngineError> {
    let node = match predicate {
        Predicate::Compare { operand, op, value } => {
            let (bound, ty) = bind_operand(operand, scope)?;
            check_comparable(operand, ty, value)?;
            Node::Compare {
                operand: bound,
                op: *op,
                value: value.clone(),
            }
        }
        Predicate::Between { operand, low, high } => {
            let (bound, ty) = bind_operand(operand, scope)?;
            check_comparable(operand, ty, low)?;
            check_comparable(operand, ty, high)?;
            if low.compare(high) == Some(std::cmp::Ordering::Greater) {
                return Err(TypeError::InvalidRange(operand.describe()).into());
            }
            Node::Between {
                operand: bound,
                low: low.clone(),
                high: high.clone(),
            }
        }
        Predicate::InList { operand, values } => {
            let (bound, ty) = bind_operand(operand, scope)?;
            if values.is_empty() {
                return Err(TypeError::EmptyInList(operand.describe()).into());
            }
            for v in values {
                check_comparable(operand, ty, v)?;
            }
            Node::InList {
                operand: bound,
                values: values.clone(),
            }
        }
        Predicate::IsNull(operand) => Node::IsNull(bind_operand(operand, scope)?.0),
        Predicate::IsNotNull(operand) => Node::IsNotNull(bind_operand(operand, scope)?.0),
        Predicate::IsTotal(name) => Node::IsTotal(scope.bind_total(name)?),
        Predicate::DateRange { field, from, to } => {
            let operand = Operand::Field(field.clone());
            let (bound, ty) = bind_operand(&operand, scope)?;
            if ty != LogicalType::Date {
                return Err(TypeError::IncompatibleComparison {
                    operand: field.clone(),
                    left: ty,
                    right: LogicalType::Date,
                }
                .into());
            }
            if from > to {
                return Err(TypeError::InvalidRange(field.clone()).into());
            }
            Node::DateRange {
                operand: bound,
                from: *from,
                to: *to,
            }
        }
        Predicate::And(children) => Node::And(
            children
                .iter()
                .map(|c| compile_node(c, scope))
                .collect::<Result<_, _>>()?,
        ),
        Predicate::Or(children) => Node::Or(
            children
                .iter()
                .map(|c| compile_node(c, scope))
                .collect::<Result<_, _>>()?,
        ),
        Predicate::Not(inner) => Node::Not(Box::new(compile_node(inner, scope)?)),
    };
    Ok(node)
}
