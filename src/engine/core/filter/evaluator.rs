use std::borrow::Cow;
use std::cmp::Ordering;

use crate::engine::core::filter::binding::{BoundOperand, Node};
use crate::engine::schema::Row;
use crate::engine::types::ScalarValue;

/// Three-valued logic result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Truth {
    True,
    False,
    Unknown,
}

impl Truth {
    #[inline]
    pub fn from_bool(b: bool) -> Self {
        if b { Truth::True } else { Truth::False }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn not(self) -> Self {
        match self {
            Truth::True => Truth::False,
            Truth::False => Truth::True,
            Truth::Unknown => Truth::Unknown,
        }
    }
}

/// Value of a bound operand as seen by one row or group
#[derive(Debug, Clone, PartialEq)]
pub enum Probe<'a> {
    Value(Cow<'a, ScalarValue>),
    Null,
    Aggregated,
}

impl<'a> Probe<'a> {
    pub fn borrowed(value: &'a ScalarValue) -> Self {
        if value.is_null() {
            Probe::Null
        } else {
            Probe::Value(Cow::Borrowed(value))
        }
    }

    pub fn owned(value: ScalarValue) -> Self {
        if value.is_null() {
            Probe::Null
        } else {
            Probe::Value(Cow::Owned(value))
        }
    }
}

/// Something a compiled predicate can be evaluated against
pub trait ValueSource {
    fn probe(&self, operand: &BoundOperand) -> Probe<'_>;
}

impl ValueSource for Row {
    #[inline]
    fn probe(&self, operand: &BoundOperand) -> Probe<'_> {
        match operand {
            BoundOperand::Column(idx) => Probe::borrowed(self.value(*idx)),
            // Row filters never bind slots or aggregates
            BoundOperand::Slot(_) | BoundOperand::Aggregate(_) => Probe::Null,
        }
    }
}

#[inline]
fn compare<S: ValueSource + ?Sized>(
    source: &S,
    operand: &BoundOperand,
    f: impl FnOnce(&ScalarValue) -> Option<bool>,
) -> Truth {
    match source.probe(operand) {
        Probe::Value(v) => f(&v).map(Truth::from_bool).unwrap_or(Truth::Unknown),
        Probe::Null | Probe::Aggregated => Truth::Unknown,
    }
}

pub(crate) fn eval<S: ValueSource + ?Sized>(node: &Node, source: &S) -> Truth {
    match node {
        Node::Compare { operand, op, value } => {
            compare(source, operand, |v| v.compare(value).map(|ord| op.matches(ord)))
        }
        Node::Between { operand, low, high } => compare(source, operand, |v| {
            let lo = v.compare(low)?;
            let hi = v.compare(high)?;
            Some(lo != Ordering::Less && hi != Ordering::Greater)
        }),
        Node::InList { operand, values } => compare(source, operand, |v| {
            let mut unknown = false;
            for candidate in values {
                match v.compare(candidate) {
                    Some(Ordering::Equal) => return Some(true),
                    Some(_) => {}
                    None => unknown = true,
                }
            }
            if unknown { None } else { Some(false) }
        }),
        Node::IsNull(operand) => Truth::from_bool(matches!(source.probe(operand), Probe::Null)),
        Node::IsNotNull(operand) => {
            Truth::from_bool(matches!(source.probe(operand), Probe::Value(_)))
        }
        Node::IsTotal(slot) => Truth::from_bool(matches!(
            source.probe(&BoundOperand::Slot(*slot)),
            Probe::Aggregated
        )),
        Node::DateRange { operand, from, to } => compare(source, operand, |v| {
            let d = v.as_date()?;
            Some(*from <= d && d < *to)
        }),
        Node::And(children) => {
            let mut acc = Truth::True;
            for child in children {
                match eval(child, source) {
                    Truth::False => return Truth::False,
                    Truth::Unknown => acc = Truth::Unknown,
                    Truth::True => {}
                }
            }
            acc
        }
        Node::Or(children) => {
            let mut acc = Truth::False;
            for child in children {
                match eval(child, source) {
                    Truth::True => return Truth::True,
                    Truth::Unknown => acc = Truth::Unknown,
                    Truth::False => {}
                }
            }
            acc
        }
        Node::Not(inner) => eval(inner, source).not(),
    }
}
