use clap::{Parser, Subcommand, ValueEnum};
use milpkit_model::{CompiledModel, ModelDocument, VariableKind};
use milpkit_solver::{Cplex, ExternalSolver, Scip, SolverConfig, collect_variables, export_lp, write_lp};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "milpkit")]
#[command(about = "Export and solve MILP models with external solvers", long_about = None)]
struct Cli {
    /// Show debug diagnostics (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write the LP document for a JSON model
    Export {
        /// The JSON model
        file: PathBuf,
        /// Destination (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Solve a JSON model and print the variable values
    Solve {
        /// The JSON model
        file: PathBuf,
        #[arg(short, long, value_enum, default_value_t = SolverChoice::Scip)]
        solver: SolverChoice,
        /// Silence solver output
        #[arg(short, long)]
        quiet: bool,
        /// SCIP executable
        #[arg(long, env = "MILPKIT_SCIP", default_value = Scip::DEFAULT_EXECUTABLE)]
        scip_path: PathBuf,
        /// LP document exchanged with the solver (result goes to <file>.sol)
        #[arg(short, long)]
        work_file: Option<PathBuf>,
        /// Output format (json, pretty)
        #[arg(short, long, default_value = "pretty")]
        format: String,
    },
    /// Check a JSON model for errors
    Check {
        /// The JSON model
        file: PathBuf,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum SolverChoice {
    Cplex,
    Scip,
}

fn init_logging(verbose: bool) {
    let default = if verbose {
        "milpkit_solver=debug,milpkit_cli=debug"
    } else {
        "milpkit_solver=info,milpkit_cli=info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn load_model(file: &Path) -> CompiledModel {
    let source = match std::fs::read_to_string(file) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error reading file: {}", e);
            std::process::exit(1);
        }
    };

    let document: ModelDocument = match serde_json::from_str(&source) {
        Ok(d) => d,
        Err(e) => {
            eprintln!("Parse error: {}", e);
            std::process::exit(1);
        }
    };

    match document.compile() {
        Ok(model) => model,
        Err(e) => {
            eprintln!("Model error: {}", e);
            std::process::exit(1);
        }
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Export { file, output } => {
            let model = load_model(&file);
            let result = match output {
                Some(path) => export_lp(
                    &path,
                    model.sense,
                    &model.objective,
                    &model.constraints,
                    false,
                )
                .map(|_| ())
                .map_err(|e| e.to_string()),
                None => {
                    let universe = collect_variables(&model.constraints);
                    let mut stdout = std::io::stdout().lock();
                    write_lp(
                        &mut stdout,
                        model.sense,
                        &model.objective,
                        &model.constraints,
                        &universe,
                    )
                    .map_err(|e| e.to_string())
                }
            };
            if let Err(e) = result {
                eprintln!("Export error: {}", e);
                std::process::exit(1);
            }
        }
        Commands::Solve {
            file,
            solver,
            quiet,
            scip_path,
            work_file,
            format,
        } => {
            let model = load_model(&file);

            let backend: Box<dyn ExternalSolver> = match solver {
                SolverChoice::Cplex => {
                    let path = work_file.unwrap_or_else(|| Cplex::DEFAULT_MODEL_PATH.into());
                    Box::new(Cplex::with_config(SolverConfig::new(path).quiet(quiet)))
                }
                SolverChoice::Scip => {
                    let path = work_file.unwrap_or_else(|| Scip::DEFAULT_MODEL_PATH.into());
                    Box::new(
                        Scip::with_config(SolverConfig::new(path).quiet(quiet))
                            .with_executable(scip_path),
                    )
                }
            };
            tracing::debug!(solver = backend.name(), "solving {}", file.display());

            let solution = match backend.solve(model.sense, &model.objective, &model.constraints) {
                Ok(Some(solution)) => solution,
                Ok(None) => {
                    println!("Status: NO SOLUTION");
                    println!("{} did not report an optimal solution.", backend.name());
                    std::process::exit(1);
                }
                Err(e) => {
                    eprintln!("Solver error: {}", e);
                    std::process::exit(1);
                }
            };

            if format == "json" {
                match serde_json::to_string_pretty(&solution.summary()) {
                    Ok(json) => println!("{}", json),
                    Err(e) => {
                        eprintln!("Error: {}", e);
                        std::process::exit(1);
                    }
                }
            } else {
                println!("Status: OPTIMAL");
                println!("Objective: {}", solution.objective_value());
                println!();
                println!("Variables:");
                for (name, value) in solution.by_name() {
                    println!("  {:20} {:>12}", name, value);
                }
            }
        }
        Commands::Check { file } => {
            let model = load_model(&file);
            let count = |kind: VariableKind| model.variables.iter().filter(|v| v.kind() == kind).count();
            let used = collect_variables(&model.constraints);
            let unconstrained = model.variables.iter().filter(|v| !used.contains(*v)).count();

            println!("✓ {} is valid", file.display());
            println!("  {} continuous variables", count(VariableKind::Continuous));
            println!("  {} integer variables", count(VariableKind::Integer));
            println!("  {} binary variables", count(VariableKind::Binary));
            println!("  {} constraints", model.constraints.len());
            if unconstrained > 0 {
                println!(
                    "  {} variables appear in no constraint and will not be declared",
                    unconstrained
                );
            }
        }
    }
}
