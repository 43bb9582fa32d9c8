use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use crate::error::ModelError;
use crate::expr::{LinearExpression, format_number};
use crate::variable::Variable;

/// Relational operator of a constraint.
///
/// Strict and non-strict operators stay distinct all the way to the
/// exported document.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sense {
    #[cfg_attr(feature = "serde", serde(rename = "<"))]
    Lt,
    #[cfg_attr(feature = "serde", serde(rename = "<="))]
    Le,
    #[cfg_attr(feature = "serde", serde(rename = ">"))]
    Gt,
    #[cfg_attr(feature = "serde", serde(rename = ">="))]
    Ge,
    #[cfg_attr(feature = "serde", serde(rename = "="))]
    Eq,
}

impl Sense {
    pub fn token(self) -> &'static str {
        match self {
            Sense::Lt => "<",
            Sense::Le => "<=",
            Sense::Gt => ">",
            Sense::Ge => ">=",
            Sense::Eq => "=",
        }
    }
}

impl fmt::Display for Sense {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

impl FromStr for Sense {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "<" => Ok(Sense::Lt),
            "<=" => Ok(Sense::Le),
            ">" => Ok(Sense::Gt),
            ">=" => Ok(Sense::Ge),
            "=" | "==" => Ok(Sense::Eq),
            other => Err(ModelError::UnknownSense(other.to_string())),
        }
    }
}

/// Direction of optimization
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectiveSense {
    Minimize,
    Maximize,
}

impl ObjectiveSense {
    /// Header line of an LP document.
    pub fn keyword(self) -> &'static str {
        match self {
            ObjectiveSense::Minimize => "min",
            ObjectiveSense::Maximize => "max",
        }
    }
}

impl FromStr for ObjectiveSense {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "min" | "minimize" => Ok(ObjectiveSense::Minimize),
            "max" | "maximize" => Ok(ObjectiveSense::Maximize),
            other => Err(ModelError::UnknownSense(other.to_string())),
        }
    }
}

/// `Σ cᵢxᵢ <sense> rhs`, with every constant folded into `rhs`.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearConstraint {
    lhs: LinearExpression,
    sense: Sense,
    rhs: f64,
}

impl LinearConstraint {
    /// Build `lhs <sense> rhs` from `lhs - rhs`: the constant of the
    /// difference moves to the right with its sign flipped.
    pub fn new(
        lhs: impl Into<LinearExpression>,
        sense: Sense,
        rhs: impl Into<LinearExpression>,
    ) -> Self {
        let lhs: LinearExpression = lhs.into();
        let rhs: LinearExpression = rhs.into();
        let (lhs, constant) = (lhs - rhs).without_constant();
        Self {
            lhs,
            sense,
            // adding 0.0 turns a -0.0 bound into 0.0
            rhs: -constant + 0.0,
        }
    }

    pub fn lhs(&self) -> &LinearExpression {
        &self.lhs
    }

    pub fn sense(&self) -> Sense {
        self.sense
    }

    pub fn rhs(&self) -> f64 {
        self.rhs
    }

    /// Distinct variables on the left, zero coefficients included.
    pub fn variables(&self) -> BTreeSet<Variable> {
        self.lhs.variables().cloned().collect()
    }
}

impl fmt::Display for LinearConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.lhs, self.sense, format_number(self.rhs))
    }
}
