use std::collections::BTreeMap;
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, Mul, Neg, Sub};

use crate::constraint::{LinearConstraint, Sense};
use crate::error::ModelError;
use crate::variable::Variable;

/// Magnitude at or below which a coefficient or constant is treated as zero
/// when rendering, and a solution value is snapped to zero when read back.
pub const EPSILON: f64 = 1e-7;

/// `|value| <= EPSILON`
pub fn is_near_zero(value: f64) -> bool {
    value.abs() <= EPSILON
}

// The subtraction itself rounds, so 1.0000001 - 1.0 lands a hair above 1e-7.
fn is_near_unit(value: f64) -> bool {
    (value.abs() - 1.0).abs() <= EPSILON + f64::EPSILON
}

/// Render a number the way it appears in LP documents: always with a
/// fractional part or exponent (`2.0`, `0.5`, `1e-8`).
pub fn format_number(value: f64) -> String {
    format!("{:?}", value)
}

/// Sum of `coefficient * variable` terms plus a constant.
///
/// Terms are keyed by variable identity (the name). Cancelled terms stay in
/// the map with a zero coefficient; rendering drops anything within
/// [`EPSILON`] of zero.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LinearExpression {
    terms: BTreeMap<Variable, f64>,
    constant: f64,
}

impl LinearExpression {
    /// Empty expression (no terms, zero constant).
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_terms<I>(terms: I, constant: f64) -> Self
    where
        I: IntoIterator<Item = (Variable, f64)>,
    {
        let mut expr = Self::from_constant(constant);
        for (var, coeff) in terms {
            *expr.terms.entry(var).or_insert(0.0) += coeff;
        }
        expr
    }

    pub fn from_constant(constant: f64) -> Self {
        Self {
            terms: BTreeMap::new(),
            constant,
        }
    }

    /// Single term `coefficient * var`. A zero coefficient still yields a term.
    pub fn term(var: Variable, coefficient: f64) -> Self {
        let mut terms = BTreeMap::new();
        terms.insert(var, coefficient);
        Self {
            terms,
            constant: 0.0,
        }
    }

    pub fn constant(&self) -> f64 {
        self.constant
    }

    /// Terms in variable-name order, zero coefficients included.
    pub fn terms(&self) -> impl Iterator<Item = (&Variable, f64)> {
        self.terms.iter().map(|(v, &c)| (v, c))
    }

    pub fn variables(&self) -> impl Iterator<Item = &Variable> {
        self.terms.keys()
    }

    pub fn coefficient(&self, var: &Variable) -> Option<f64> {
        self.terms.get(var).copied()
    }

    pub fn num_terms(&self) -> usize {
        self.terms.len()
    }

    /// Sum of both expressions: coefficients add per variable, constants add.
    pub fn merged(mut self, other: &LinearExpression) -> Self {
        for (var, &coeff) in &other.terms {
            match self.terms.get_mut(var) {
                Some(existing) => *existing += coeff,
                None => {
                    self.terms.insert(var.clone(), coeff);
                }
            }
        }
        self.constant += other.constant;
        self
    }

    /// Multiply every coefficient and the constant. Scaling by zero keeps the terms.
    pub fn scale(&self, by: f64) -> Self {
        Self {
            terms: self.terms.iter().map(|(v, &c)| (v.clone(), c * by)).collect(),
            constant: self.constant * by,
        }
    }

    pub fn negated(&self) -> Self {
        self.scale(-1.0)
    }

    /// Unary plus.
    pub fn pos(&self) -> Self {
        self.clone()
    }

    /// Split off the constant, leaving it zero in the returned expression.
    pub fn without_constant(mut self) -> (Self, f64) {
        let constant = self.constant;
        self.constant = 0.0;
        (self, constant)
    }

    pub fn constrain(&self, sense: Sense, rhs: impl Into<LinearExpression>) -> LinearConstraint {
        LinearConstraint::new(self, sense, rhs)
    }

    pub fn less_than(&self, rhs: impl Into<LinearExpression>) -> LinearConstraint {
        self.constrain(Sense::Lt, rhs)
    }

    pub fn less_eq(&self, rhs: impl Into<LinearExpression>) -> LinearConstraint {
        self.constrain(Sense::Le, rhs)
    }

    pub fn greater_than(&self, rhs: impl Into<LinearExpression>) -> LinearConstraint {
        self.constrain(Sense::Gt, rhs)
    }

    pub fn greater_eq(&self, rhs: impl Into<LinearExpression>) -> LinearConstraint {
        self.constrain(Sense::Ge, rhs)
    }

    pub fn equals(&self, rhs: impl Into<LinearExpression>) -> LinearConstraint {
        self.constrain(Sense::Eq, rhs)
    }
}

fn push_sign(out: &mut String, value: f64, leading: bool) {
    if leading || value < 0.0 {
        out.push_str(if value > 0.0 { "+ " } else { "- " });
    }
}

impl fmt::Display for LinearExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts: Vec<String> = Vec::new();

        for (var, &coeff) in &self.terms {
            if is_near_zero(coeff) {
                continue;
            }
            let mut part = String::new();
            push_sign(&mut part, coeff, !parts.is_empty());
            if !is_near_unit(coeff) {
                part.push_str(&format_number(coeff.abs()));
                part.push(' ');
            }
            part.push_str(var.name());
            parts.push(part);
        }

        if !is_near_zero(self.constant) {
            let mut part = String::new();
            push_sign(&mut part, self.constant, !parts.is_empty());
            part.push_str(&format_number(self.constant.abs()));
            parts.push(part);
        }

        f.write_str(&parts.join(" "))
    }
}

impl From<&LinearExpression> for LinearExpression {
    fn from(expr: &LinearExpression) -> Self {
        expr.clone()
    }
}

impl From<Variable> for LinearExpression {
    fn from(var: Variable) -> Self {
        Self::term(var, 1.0)
    }
}

impl From<&Variable> for LinearExpression {
    fn from(var: &Variable) -> Self {
        Self::term(var.clone(), 1.0)
    }
}

impl From<f64> for LinearExpression {
    fn from(constant: f64) -> Self {
        Self::from_constant(constant)
    }
}

impl From<i32> for LinearExpression {
    fn from(constant: i32) -> Self {
        Self::from_constant(f64::from(constant))
    }
}

macro_rules! impl_linear_ops {
    ($($lhs:ty),*) => {$(
        impl<R: Into<LinearExpression>> Add<R> for $lhs {
            type Output = LinearExpression;

            fn add(self, rhs: R) -> LinearExpression {
                let rhs: LinearExpression = rhs.into();
                LinearExpression::from(self).merged(&rhs)
            }
        }

        impl<R: Into<LinearExpression>> Sub<R> for $lhs {
            type Output = LinearExpression;

            fn sub(self, rhs: R) -> LinearExpression {
                let rhs: LinearExpression = rhs.into();
                LinearExpression::from(self).merged(&rhs.negated())
            }
        }

        impl Mul<f64> for $lhs {
            type Output = LinearExpression;

            fn mul(self, rhs: f64) -> LinearExpression {
                LinearExpression::from(self).scale(rhs)
            }
        }

        impl Neg for $lhs {
            type Output = LinearExpression;

            fn neg(self) -> LinearExpression {
                LinearExpression::from(self).negated()
            }
        }

        impl Add<$lhs> for f64 {
            type Output = LinearExpression;

            fn add(self, rhs: $lhs) -> LinearExpression {
                LinearExpression::from(rhs) + self
            }
        }

        impl Sub<$lhs> for f64 {
            type Output = LinearExpression;

            fn sub(self, rhs: $lhs) -> LinearExpression {
                -rhs + self
            }
        }

        impl Mul<$lhs> for f64 {
            type Output = LinearExpression;

            fn mul(self, rhs: $lhs) -> LinearExpression {
                LinearExpression::from(rhs).scale(self)
            }
        }
    )*};
}

impl_linear_ops!(LinearExpression, &LinearExpression, Variable, &Variable);

impl<T: Into<LinearExpression>> Sum<T> for LinearExpression {
    fn sum<I: Iterator<Item = T>>(iter: I) -> Self {
        iter.fold(LinearExpression::new(), |acc, item| {
            let item: LinearExpression = item.into();
            acc.merged(&item)
        })
    }
}

/// A value on either side of an arithmetic combinator whose shape is only
/// known at runtime.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    Scalar(f64),
    Variable(Variable),
    Expression(LinearExpression),
}

impl Operand {
    pub fn into_expression(self) -> LinearExpression {
        match self {
            Operand::Scalar(value) => LinearExpression::from_constant(value),
            Operand::Variable(var) => LinearExpression::from(var),
            Operand::Expression(expr) => expr,
        }
    }

    pub fn is_symbolic(&self) -> bool {
        !matches!(self, Operand::Scalar(_))
    }

    pub fn plus(self, rhs: Operand) -> Operand {
        match (self, rhs) {
            (Operand::Scalar(a), Operand::Scalar(b)) => Operand::Scalar(a + b),
            (lhs, rhs) => Operand::Expression(lhs.into_expression() + rhs.into_expression()),
        }
    }

    pub fn minus(self, rhs: Operand) -> Operand {
        self.plus(rhs.negated())
    }

    pub fn negated(self) -> Operand {
        match self {
            Operand::Scalar(a) => Operand::Scalar(-a),
            other => Operand::Expression(-other.into_expression()),
        }
    }

    /// Product of two operands. At least one side must be a scalar; a
    /// symbolic product would not be linear.
    pub fn try_mul(self, rhs: Operand) -> Result<Operand, ModelError> {
        match (self, rhs) {
            (Operand::Scalar(a), Operand::Scalar(b)) => Ok(Operand::Scalar(a * b)),
            (Operand::Scalar(by), other) | (other, Operand::Scalar(by)) => {
                Ok(Operand::Expression(other.into_expression().scale(by)))
            }
            (lhs, rhs) => Err(ModelError::InvalidOperation(format!(
                "cannot multiply `{}` by `{}`",
                lhs.into_expression(),
                rhs.into_expression()
            ))),
        }
    }
}

impl From<f64> for Operand {
    fn from(value: f64) -> Self {
        Operand::Scalar(value)
    }
}

impl From<Variable> for Operand {
    fn from(var: Variable) -> Self {
        Operand::Variable(var)
    }
}

impl From<LinearExpression> for Operand {
    fn from(expr: LinearExpression) -> Self {
        Operand::Expression(expr)
    }
}
