//! Declarative model documents.
//!
//! A document names its variables, an objective and a list of constraints as
//! plain data, so models can be loaded from JSON and built with the same
//! combinators as hand-written code:
//!
//! ```json
//! {
//!   "sense": "maximize",
//!   "variables": [{ "name": "x1", "kind": "integer" }, { "name": "x2", "kind": "integer" }],
//!   "objective": "x2",
//!   "constraints": [
//!     { "lhs": { "add": [{ "mul": [3, "x1"] }, { "mul": [2, "x2"] }] }, "sense": "<=", "rhs": 6 }
//!   ]
//! }
//! ```

use std::collections::HashMap;

use crate::constraint::{LinearConstraint, ObjectiveSense, Sense};
use crate::error::ModelError;
use crate::expr::{LinearExpression, Operand};
use crate::variable::{NameGenerator, Variable, VariableKind};

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct ModelDocument {
    pub sense: ObjectiveSense,
    #[cfg_attr(feature = "serde", serde(default))]
    pub variables: Vec<VariableDecl>,
    pub objective: ExprNode,
    #[cfg_attr(feature = "serde", serde(default))]
    pub constraints: Vec<ConstraintNode>,
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct VariableDecl {
    /// Generated (`ur1`, `ui1`, `ub1`, ...) when absent
    #[cfg_attr(feature = "serde", serde(default))]
    pub name: Option<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub kind: VariableKind,
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct ConstraintNode {
    pub lhs: ExprNode,
    pub sense: Sense,
    pub rhs: ExprNode,
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
#[derive(Debug, Clone, PartialEq)]
pub enum ExprNode {
    Number(f64),
    Name(String),
    Add { add: Vec<ExprNode> },
    Sub { sub: (Box<ExprNode>, Box<ExprNode>) },
    Mul { mul: (Box<ExprNode>, Box<ExprNode>) },
    Neg { neg: Box<ExprNode> },
}

/// A document resolved into variables, objective and constraints.
#[derive(Debug, Clone)]
pub struct CompiledModel {
    pub sense: ObjectiveSense,
    /// Declaration order
    pub variables: Vec<Variable>,
    pub objective: LinearExpression,
    pub constraints: Vec<LinearConstraint>,
}

impl ModelDocument {
    pub fn compile(&self) -> Result<CompiledModel, ModelError> {
        let mut names = NameGenerator::new();
        let mut variables = Vec::with_capacity(self.variables.len());
        let mut symbols: HashMap<String, Variable> = HashMap::new();

        for decl in &self.variables {
            let var = names.make(decl.kind, decl.name.as_deref());
            if symbols.insert(var.name().to_string(), var.clone()).is_some() {
                return Err(ModelError::DuplicateVariable(var.name().to_string()));
            }
            variables.push(var);
        }

        let scope = Scope { symbols: &symbols };
        let objective = scope.eval(&self.objective)?.into_expression();
        let constraints = self
            .constraints
            .iter()
            .map(|c| {
                let lhs = scope.eval(&c.lhs)?.into_expression();
                let rhs = scope.eval(&c.rhs)?.into_expression();
                Ok(LinearConstraint::new(lhs, c.sense, rhs))
            })
            .collect::<Result<Vec<_>, ModelError>>()?;

        Ok(CompiledModel {
            sense: self.sense,
            variables,
            objective,
            constraints,
        })
    }
}

struct Scope<'a> {
    symbols: &'a HashMap<String, Variable>,
}

impl Scope<'_> {
    fn eval(&self, node: &ExprNode) -> Result<Operand, ModelError> {
        match node {
            ExprNode::Number(value) => Ok(Operand::Scalar(*value)),
            ExprNode::Name(name) => {
                let key: String = name.chars().filter(|c| !c.is_whitespace()).collect();
                self.symbols
                    .get(&key)
                    .cloned()
                    .map(Operand::Variable)
                    .ok_or_else(|| ModelError::UnknownVariable(name.clone()))
            }
            ExprNode::Add { add } => add
                .iter()
                .try_fold(Operand::Scalar(0.0), |acc, item| Ok(acc.plus(self.eval(item)?))),
            ExprNode::Sub { sub: (lhs, rhs) } => Ok(self.eval(lhs)?.minus(self.eval(rhs)?)),
            ExprNode::Mul { mul: (lhs, rhs) } => self.eval(lhs)?.try_mul(self.eval(rhs)?),
            ExprNode::Neg { neg } => Ok(self.eval(neg)?.negated()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name(s: &str) -> ExprNode {
        ExprNode::Name(s.to_string())
    }

    fn mul(a: ExprNode, b: ExprNode) -> ExprNode {
        ExprNode::Mul {
            mul: (Box::new(a), Box::new(b)),
        }
    }

    fn decl(name: Option<&str>, kind: VariableKind) -> VariableDecl {
        VariableDecl {
            name: name.map(str::to_string),
            kind,
        }
    }

    fn small_model() -> ModelDocument {
        ModelDocument {
            sense: ObjectiveSense::Maximize,
            variables: vec![
                decl(Some("x1"), VariableKind::Integer),
                decl(Some("x2"), VariableKind::Integer),
            ],
            objective: name("x2"),
            constraints: vec![
                ConstraintNode {
                    lhs: ExprNode::Add {
                        add: vec![
                            mul(ExprNode::Number(3.0), name("x1")),
                            mul(ExprNode::Number(2.0), name("x2")),
                        ],
                    },
                    sense: Sense::Le,
                    rhs: ExprNode::Number(6.0),
                },
                ConstraintNode {
                    lhs: ExprNode::Add {
                        add: vec![
                            mul(ExprNode::Number(-3.0), name("x1")),
                            mul(name("x2"), ExprNode::Number(2.0)),
                        ],
                    },
                    sense: Sense::Le,
                    rhs: ExprNode::Number(0.0),
                },
            ],
        }
    }

    #[test]
    fn test_compile() {
        let model = small_model().compile().unwrap();
        assert_eq!(model.sense, ObjectiveSense::Maximize);
        assert_eq!(model.variables.len(), 2);
        assert_eq!(model.objective.to_string(), "x2");
        assert_eq!(model.constraints[0].to_string(), "3.0 x1 + 2.0 x2 <= 6.0");
        assert_eq!(model.constraints[1].to_string(), "- 3.0 x1 + 2.0 x2 <= 0.0");
    }

    #[test]
    fn test_unknown_variable() {
        let mut doc = small_model();
        doc.objective = name("x3");
        assert_eq!(
            doc.compile().unwrap_err(),
            ModelError::UnknownVariable("x3".to_string())
        );
    }

    #[test]
    fn test_duplicate_variable() {
        let mut doc = small_model();
        doc.variables.push(decl(Some("x 1"), VariableKind::Binary));
        assert_eq!(
            doc.compile().unwrap_err(),
            ModelError::DuplicateVariable("x1".to_string())
        );
    }

    #[test]
    fn test_symbolic_product_rejected() {
        let mut doc = small_model();
        doc.objective = mul(name("x1"), name("x2"));
        assert!(matches!(
            doc.compile(),
            Err(ModelError::InvalidOperation(_))
        ));
    }

    #[test]
    fn test_anonymous_variables() {
        let doc = ModelDocument {
            sense: ObjectiveSense::Minimize,
            variables: vec![
                decl(None, VariableKind::Binary),
                decl(None, VariableKind::Binary),
                decl(None, VariableKind::Continuous),
            ],
            objective: ExprNode::Sub {
                sub: (Box::new(name("ub2")), Box::new(ExprNode::Neg { neg: Box::new(name("ur1")) })),
            },
            constraints: vec![],
        };
        let model = doc.compile().unwrap();
        let names: Vec<_> = model.variables.iter().map(|v| v.name()).collect();
        assert_eq!(names, vec!["ub1", "ub2", "ur1"]);
        assert_eq!(model.objective.to_string(), "ub2 + ur1");
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_from_json() {
        let json = r#"{
            "sense": "maximize",
            "variables": [{ "name": "x1", "kind": "integer" }, { "name": "x2", "kind": "integer" }],
            "objective": "x2",
            "constraints": [
                { "lhs": { "add": [{ "mul": [3, "x1"] }, { "mul": [2, "x2"] }] }, "sense": "<=", "rhs": 6 },
                { "lhs": { "add": [{ "mul": [-3, "x1"] }, { "mul": ["x2", 2] }] }, "sense": "<=", "rhs": 0 }
            ]
        }"#;
        let doc: ModelDocument = serde_json::from_str(json).unwrap();
        assert_eq!(doc, small_model());
    }
}
