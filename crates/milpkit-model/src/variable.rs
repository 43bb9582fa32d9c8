use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::constraint::{LinearConstraint, Sense};
use crate::expr::LinearExpression;

/// Domain of a decision variable
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum VariableKind {
    /// Real-valued (x ∈ ℝ)
    #[default]
    Continuous,
    /// Integer-valued (x ∈ ℤ)
    Integer,
    /// Zero or one (x ∈ {0, 1})
    Binary,
}

impl VariableKind {
    /// Letter used in generated names: `ur1`, `ui1`, `ub1`.
    fn prefix(self) -> char {
        match self {
            VariableKind::Continuous => 'r',
            VariableKind::Integer => 'i',
            VariableKind::Binary => 'b',
        }
    }
}

/// A symbolic decision variable.
///
/// Identity is the name alone: two variables created independently with the
/// same name are the same variable for `==`, hashing and ordering, whatever
/// their kind. Constraints are built with the named relational methods
/// (`less_eq`, `equals`, ...), never with the comparison operators.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(from = "RawVariable"))]
#[derive(Debug, Clone)]
pub struct Variable {
    name: String,
    kind: VariableKind,
}

impl Variable {
    /// Create a variable. Whitespace inside `name` is removed.
    pub fn new(kind: VariableKind, name: &str) -> Self {
        Self {
            name: name.chars().filter(|c| !c.is_whitespace()).collect(),
            kind,
        }
    }

    pub fn continuous(name: &str) -> Self {
        Self::new(VariableKind::Continuous, name)
    }

    pub fn integer(name: &str) -> Self {
        Self::new(VariableKind::Integer, name)
    }

    pub fn binary(name: &str) -> Self {
        Self::new(VariableKind::Binary, name)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> VariableKind {
        self.kind
    }

    /// One-term expression `1.0 * self`.
    pub fn to_expression(&self) -> LinearExpression {
        LinearExpression::from(self)
    }

    /// Unary plus.
    pub fn pos(&self) -> LinearExpression {
        self.to_expression()
    }

    pub fn constrain(&self, sense: Sense, rhs: impl Into<LinearExpression>) -> LinearConstraint {
        LinearConstraint::new(self, sense, rhs)
    }

    /// `self < rhs`
    pub fn less_than(&self, rhs: impl Into<LinearExpression>) -> LinearConstraint {
        self.constrain(Sense::Lt, rhs)
    }

    /// `self <= rhs`
    pub fn less_eq(&self, rhs: impl Into<LinearExpression>) -> LinearConstraint {
        self.constrain(Sense::Le, rhs)
    }

    /// `self > rhs`
    pub fn greater_than(&self, rhs: impl Into<LinearExpression>) -> LinearConstraint {
        self.constrain(Sense::Gt, rhs)
    }

    /// `self >= rhs`
    pub fn greater_eq(&self, rhs: impl Into<LinearExpression>) -> LinearConstraint {
        self.constrain(Sense::Ge, rhs)
    }

    /// `self = rhs`
    pub fn equals(&self, rhs: impl Into<LinearExpression>) -> LinearConstraint {
        self.constrain(Sense::Eq, rhs)
    }
}

/// Wire shape of a [`Variable`]; deserialized names go through [`Variable::new`].
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct RawVariable {
    name: String,
    #[serde(default)]
    kind: VariableKind,
}

#[cfg(feature = "serde")]
impl From<RawVariable> for Variable {
    fn from(raw: RawVariable) -> Self {
        Variable::new(raw.kind, &raw.name)
    }
}

impl PartialEq for Variable {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Variable {}

impl Hash for Variable {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

impl PartialOrd for Variable {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Variable {
    fn cmp(&self, other: &Self) -> Ordering {
        self.name.cmp(&other.name)
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Hands out names for anonymous variables.
///
/// Each kind has its own counter, so the first continuous, integer and
/// binary variables are `ur1`, `ui1` and `ub1`. Counters live in the
/// generator, not in the process.
#[derive(Debug, Clone, Default)]
pub struct NameGenerator {
    continuous: u64,
    integer: u64,
    binary: u64,
}

impl NameGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance the counter for `kind` and return the new name.
    pub fn next_name(&mut self, kind: VariableKind) -> String {
        let counter = match kind {
            VariableKind::Continuous => &mut self.continuous,
            VariableKind::Integer => &mut self.integer,
            VariableKind::Binary => &mut self.binary,
        };
        *counter += 1;
        format!("u{}{}", kind.prefix(), counter)
    }

    /// Create a variable with a generated name.
    pub fn variable(&mut self, kind: VariableKind) -> Variable {
        let name = self.next_name(kind);
        Variable::new(kind, &name)
    }

    /// Create a variable, generating a name when `name` is `None`.
    pub fn make(&mut self, kind: VariableKind, name: Option<&str>) -> Variable {
        match name {
            Some(name) => Variable::new(kind, name),
            None => self.variable(kind),
        }
    }

    pub fn continuous(&mut self) -> Variable {
        self.variable(VariableKind::Continuous)
    }

    pub fn integer(&mut self) -> Variable {
        self.variable(VariableKind::Integer)
    }

    pub fn binary(&mut self) -> Variable {
        self.variable(VariableKind::Binary)
    }
}
