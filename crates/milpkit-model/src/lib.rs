pub mod constraint;
pub mod document;
pub mod error;
pub mod expr;
pub mod variable;

pub use constraint::{LinearConstraint, ObjectiveSense, Sense};
pub use document::{CompiledModel, ConstraintNode, ExprNode, ModelDocument, VariableDecl};
pub use error::ModelError;
pub use expr::{EPSILON, LinearExpression, Operand, format_number, is_near_zero};
pub use variable::{NameGenerator, Variable, VariableKind};
