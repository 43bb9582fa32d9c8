mod config;
mod cplex;
mod error;
mod export;
mod reader;
mod scip;
mod solution;
mod solver;

pub use config::SolverConfig;
pub use cplex::Cplex;
pub use error::SolverError;
pub use export::{collect_variables, export_lp, write_lp};
pub use reader::{
    OPTIMAL_STATUS, parse_text_solution, parse_xml_solution, read_text_solution, read_xml_solution,
};
pub use scip::Scip;
pub use solution::{Solution, SolutionSummary};
pub use solver::ExternalSolver;
