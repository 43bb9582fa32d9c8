use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::ops::Index;

use milpkit_model::Variable;

/// Values reported by a successful solve
#[derive(Debug, Clone, PartialEq)]
pub struct Solution {
    objective_value: f64,
    values: HashMap<Variable, f64>,
}

impl Solution {
    /// Every variable of `universe` set to 0.0.
    pub fn zeroed(universe: &BTreeSet<Variable>, objective_value: f64) -> Self {
        Self {
            objective_value,
            values: universe.iter().map(|v| (v.clone(), 0.0)).collect(),
        }
    }

    pub fn objective_value(&self) -> f64 {
        self.objective_value
    }

    pub fn set(&mut self, var: Variable, value: f64) {
        self.values.insert(var, value);
    }

    pub fn get(&self, var: &Variable) -> Option<f64> {
        self.values.get(var).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Variable, f64)> {
        self.values.iter().map(|(v, &x)| (v, x))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Values keyed by variable name, in name order.
    pub fn by_name(&self) -> BTreeMap<String, f64> {
        self.values
            .iter()
            .map(|(v, &x)| (v.name().to_string(), x))
            .collect()
    }

    pub fn summary(&self) -> SolutionSummary {
        SolutionSummary {
            objective_value: self.objective_value,
            values: self.by_name(),
        }
    }
}

impl Index<&Variable> for Solution {
    type Output = f64;

    fn index(&self, var: &Variable) -> &f64 {
        &self.values[var]
    }
}

/// Name-keyed view of a [`Solution`] for reporting
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct SolutionSummary {
    pub objective_value: f64,
    pub values: BTreeMap<String, f64>,
}
