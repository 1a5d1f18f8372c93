pub mod binding;
pub mod evaluator;
pub mod predicate;

pub use binding::{BindScope, BoundOperand, CompiledPredicate, RowScope};
pub use evaluator::{Probe, Truth, ValueSource};
pub use predicate::{CompareOp, Operand, Predicate};
