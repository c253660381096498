use std::path::PathBuf;
use std::process;
use std::time::Instant;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use graph_planner::{
    astar, ActionId, Expansion, GraphPlan, Heuristic, HeuristicConfig, PlanningProblem,
    SearchConfig,
};

/// Solve a STRIPS planning problem with A* guided by planning graph heuristics.
#[derive(Parser, Debug)]
#[command(name = "graph-planner")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Domain file with the propositions and actions
    #[arg(default_value = "problems/dwrDomain.txt")]
    domain: PathBuf,

    /// Problem file with the initial and goal states
    #[arg(default_value = "problems/dwrProblem.txt")]
    problem: PathBuf,

    /// Heuristic guiding A*: max, sum or zero
    #[arg(short = 'H', long, default_value = "zero")]
    heuristic: Heuristic,

    /// Build heuristic graphs with action and proposition mutexes
    #[arg(short, long)]
    mutex: bool,

    /// Report a state as unreachable after this many graph levels
    #[arg(long)]
    max_levels: Option<usize>,

    /// Give up after expanding this many search nodes
    #[arg(long)]
    max_expansions: Option<usize>,

    /// Extract the plan from the mutex graph instead of searching
    #[arg(short, long)]
    graphplan: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "graph_planner=debug" } else { "graph_planner=info" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_filter.into());
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    let problem = match PlanningProblem::from_files(&cli.domain, &cli.problem) {
        Ok(problem) => problem,
        Err(e) => {
            error!("{}", e);
            process::exit(1);
        }
    };
    info!(
        domain = %cli.domain.display(),
        problem = %cli.problem.display(),
        actions = problem.domain().action_count(),
        "loaded"
    );

    let start = Instant::now();
    let plan = if cli.graphplan {
        GraphPlan::new(problem.domain(), problem.initial(), problem.goal()).solve(cli.max_levels)
    } else {
        let config = HeuristicConfig {
            heuristic: cli.heuristic,
            expansion: if cli.mutex { Expansion::Mutex } else { Expansion::Relaxed },
            max_levels: cli.max_levels,
        };
        let search = SearchConfig { max_expansions: cli.max_expansions };
        astar(&problem, |state, problem| config.estimate(state, problem), &search)
    };
    let elapsed = start.elapsed().as_secs_f64();

    match plan {
        Some(plan) => {
            println!("Plan found with {} actions in {:.2} seconds", plan.len(), elapsed);
            println!("Search nodes expanded: {}", problem.expanded());
            print_plan(&problem, &plan);
        }
        None => {
            println!("Could not find a plan in {:.2} seconds", elapsed);
            println!("Search nodes expanded: {}", problem.expanded());
        }
    }
}

fn print_plan(problem: &PlanningProblem, plan: &[ActionId]) {
    for (step, id) in plan.iter().enumerate() {
        println!("{:>4}. {}", step + 1, problem.domain().action(*id).name());
    }
}
