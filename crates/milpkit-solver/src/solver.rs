use std::collections::BTreeSet;
use std::process::Command;

use milpkit_model::{LinearConstraint, LinearExpression, ObjectiveSense, Variable};
use tracing::{debug, warn};

use crate::config::SolverConfig;
use crate::error::SolverError;
use crate::export::{export_lp, remove_stale};
use crate::solution::Solution;

/// An external MILP solver reached through its executable.
///
/// A solve exports the model to `config().model_path`, runs the solver to
/// completion and reads the artifact it leaves at `<model_path>.sol`. The
/// call blocks until the solver exits; there is no timeout.
///
/// `Ok(None)` means no solution: the model was infeasible or unbounded, the
/// solver could not be launched or failed, or its artifact was missing or
/// malformed. These cases are not told apart.
pub trait ExternalSolver {
    /// Name for diagnostics
    fn name(&self) -> &str;

    fn config(&self) -> &SolverConfig;

    /// Command that reads the model, optimizes, writes the result artifact
    /// and quits.
    fn command(&self) -> Command;

    /// Parse the result artifact into values for `universe`.
    fn read_solution(&self, universe: &BTreeSet<Variable>)
    -> Result<Option<Solution>, SolverError>;

    /// Delete any previous artifact, then run the solver once.
    ///
    /// Launch failures and abnormal exits are only logged; callers see them
    /// as a missing artifact.
    fn optimize(&self) -> Result<(), SolverError> {
        remove_stale(&self.config().solution_path())?;
        run(self.name(), self.command());
        Ok(())
    }

    /// Export the model, run the solver and read its result.
    ///
    /// Only variables that appear in some constraint are declared. A solver
    /// that reports every column (CPLEX does) fails with
    /// [`SolverError::UnknownVariable`] when the objective uses a variable
    /// no constraint mentions; bound such variables explicitly.
    fn solve(
        &self,
        sense: ObjectiveSense,
        objective: &LinearExpression,
        constraints: &[LinearConstraint],
    ) -> Result<Option<Solution>, SolverError> {
        let config = self.config();
        let universe = export_lp(&config.model_path, sense, objective, constraints, config.quiet)?;
        self.optimize()?;
        self.read_solution(&universe)
    }

    fn minimize(
        &self,
        objective: &LinearExpression,
        constraints: &[LinearConstraint],
    ) -> Result<Option<Solution>, SolverError> {
        self.solve(ObjectiveSense::Minimize, objective, constraints)
    }

    fn maximize(
        &self,
        objective: &LinearExpression,
        constraints: &[LinearConstraint],
    ) -> Result<Option<Solution>, SolverError> {
        self.solve(ObjectiveSense::Maximize, objective, constraints)
    }
}

fn run(name: &str, mut command: Command) {
    debug!(solver = name, command = ?command, "launching solver");
    match command.status() {
        Ok(status) if status.success() => {}
        Ok(status) => warn!(solver = name, %status, "solver exited abnormally"),
        Err(e) => warn!(solver = name, error = %e, "failed to launch solver"),
    }
}
