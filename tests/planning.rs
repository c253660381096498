use graph_planner::graph::{level_sum, max_level, null_heuristic};
use graph_planner::{
    astar, Domain, Estimate, Expansion, GraphPlan, Heuristic, HeuristicConfig, PlanningGraph,
    PlanningProblem, SearchConfig,
};

const DWR_DOMAIN: &str = include_str!("../problems/dwrDomain.txt");
const DWR_PROBLEM: &str = include_str!("../problems/dwrProblem.txt");

fn names(problem: &PlanningProblem, plan: &[graph_planner::ActionId]) -> Vec<String> {
    plan.iter().map(|id| problem.domain().action(*id).name().to_owned()).collect()
}

#[test]
fn single_move_problem() {
    let problem = PlanningProblem::parse(
        "Propositions:\nA B\nActions:\nName: M\npre: A\nadd: B\ndelete: A\n",
        "Initial state: A\nGoal state: B\n",
    )
    .unwrap();
    let start = problem.start_state();
    assert_eq!(max_level(&start, &problem), Estimate::Finite(1));

    let plan = astar(&problem, max_level, &SearchConfig::default()).unwrap();
    assert_eq!(names(&problem, &plan), vec!["M"]);
    assert_eq!(problem.cost_of_actions(&plan), 1);
}

#[test]
fn unreachable_goal() {
    let problem = PlanningProblem::parse(
        "Propositions:\nA B C\nActions:\nName: M\npre: A\nadd: B\ndelete: A\n",
        "Initial state: A\nGoal state: C\n",
    )
    .unwrap();
    let start = problem.start_state();
    assert_eq!(max_level(&start, &problem), Estimate::Infinite);
    assert_eq!(level_sum(&start, &problem), Estimate::Infinite);

    assert_eq!(astar(&problem, max_level, &SearchConfig::default()), None);
    assert_eq!(astar(&problem, level_sum, &SearchConfig::default()), None);
    // without pruning the search runs out of states instead
    assert_eq!(astar(&problem, null_heuristic, &SearchConfig::default()), None);
    assert!(problem.expanded() >= 2);

    let mut solver = GraphPlan::new(problem.domain(), problem.initial(), problem.goal());
    assert_eq!(solver.solve(None), None);
}

#[test]
fn dock_worker_robot_heuristics() {
    let problem = PlanningProblem::parse(DWR_DOMAIN, DWR_PROBLEM).unwrap();
    let start = problem.start_state();
    // the relaxed graph runs load1 and move12 side by side, unload2 follows
    assert_eq!(max_level(&start, &problem), Estimate::Finite(2));
    // robotAt1 already holds
    assert_eq!(level_sum(&start, &problem), Estimate::Finite(2));

    // with mutexes the robot has to load before leaving and come back after unloading
    let mutex_max = HeuristicConfig {
        heuristic: Heuristic::MaxLevel,
        expansion: Expansion::Mutex,
        max_levels: None,
    };
    assert_eq!(mutex_max.estimate(&start, &problem), Estimate::Finite(4));
}

#[test]
fn dock_worker_robot_search() {
    for heuristic in [Heuristic::Zero, Heuristic::MaxLevel, Heuristic::LevelSum] {
        for expansion in [Expansion::Relaxed, Expansion::Mutex] {
            let problem = PlanningProblem::parse(DWR_DOMAIN, DWR_PROBLEM).unwrap();
            let config = HeuristicConfig { heuristic, expansion, max_levels: None };
            let plan = astar(&problem, |s, p| config.estimate(s, p), &SearchConfig::default())
                .unwrap();
            assert!(problem.validate_plan(&plan), "{:?} {:?}", heuristic, expansion);
            if heuristic != Heuristic::LevelSum {
                assert_eq!(names(&problem, &plan), vec!["load1", "move12", "unload2", "move21"]);
            }
        }
    }
}

#[test]
fn dock_worker_robot_graphplan() {
    let problem = PlanningProblem::parse(DWR_DOMAIN, DWR_PROBLEM).unwrap();
    let mut solver = GraphPlan::new(problem.domain(), problem.initial(), problem.goal());
    let plan = solver.solve(None).unwrap();
    assert!(problem.validate_plan(&plan));
    assert_eq!(solver.graph().depth(), 4);
}

#[test]
fn expansion_bound_stops_search() {
    let problem = PlanningProblem::parse(DWR_DOMAIN, DWR_PROBLEM).unwrap();
    let config = SearchConfig { max_expansions: Some(1) };
    assert_eq!(astar(&problem, null_heuristic, &config), None);
}

#[test]
fn mutex_graph_levels_off() {
    let domain = Domain::parse(DWR_DOMAIN).unwrap();
    let start = domain.state("initial", vec!["robotAt1", "containerAt1", "robotEmpty"]).unwrap();
    let mut graph = PlanningGraph::new(&domain, &start, Expansion::Mutex);
    while !graph.has_leveled_off() {
        graph.expand_next();
        assert!(graph.depth() < 20, "graph never leveled off");
    }
    let last = graph.last().proposition_layer();
    assert_eq!(last.len(), domain.propositions().len());
    // the robot is never in two places at once
    assert!(last.is_mutex(&"robotAt1".into(), &"robotAt2".into()));
    assert!(last.is_mutex(&"containerOnRobot".into(), &"robotEmpty".into()));
}
