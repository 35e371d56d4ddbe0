use crate::{
    bus::{EventPublisher, FanoutPublisher, FileEventPublisher, MemoryEventBus},
    catalog::load_catalog,
    config::PlanningConfig,
    types::{Advisory, BudgetSpec, Disruption, PlanReport, Severity, SweepRow, TimeWindow},
    ItineraryAgent, ItineraryError,
};
use anyhow::Context;
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{error, info};

pub const EXIT_FEASIBLE: u8 = 0;
pub const EXIT_RUNTIME_ERROR: u8 = 1;
pub const EXIT_INPUT_ERROR: u8 = 2;
pub const EXIT_INFEASIBLE: u8 = 3;

pub const DEFAULT_SWEEP_BUDGETS: [&str; 4] = ["5000", "10000", "18000", "30000"];
pub const DEMO_BUDGET: f64 = 18000.0;
pub const DEMO_RAISED_BUDGET: f64 = 30000.0;
pub const DEMO_DELAY_MINUTES: u32 = 360;

/// One scripted step of `--demo`
#[derive(Debug, Clone, PartialEq)]
pub enum DemoStep {
    Disrupt(Disruption),
    Advise(Advisory),
    RaiseBudget(f64),
}

pub fn command() -> Command {
    Command::new("itinerary-agent")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Budget-constrained travel itinerary planner with disruption replanning")
        .arg(
            Arg::new("budget")
                .short('b')
                .long("budget")
                .value_name("AMOUNT")
                .help("Total trip budget")
                .required_unless_present_any(["sweep", "demo"])
                .value_parser(value_parser!(f64)),
        )
        .arg(
            Arg::new("people")
                .short('p')
                .long("people")
                .value_name("COUNT")
                .help("Number of travellers")
                .default_value("1")
                .value_parser(value_parser!(u32)),
        )
        .arg(
            Arg::new("nights")
                .short('n')
                .long("nights")
                .value_name("COUNT")
                .help("Number of nights")
                .default_value("2")
                .value_parser(value_parser!(u32)),
        )
        .arg(
            Arg::new("delay")
                .short('d')
                .long("delay")
                .value_name("MINUTES")
                .help("Simulate a transport delay and replan")
                .value_parser(value_parser!(u32)),
        )
        .arg(
            Arg::new("weather-demo")
                .short('w')
                .long("weather-demo")
                .help("Simulate outdoor-impacting weather and replan")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("close")
                .short('c')
                .long("close")
                .value_name("OPTION_ID")
                .help("Simulate a closure of a catalog option and replan"),
        )
        .arg(
            Arg::new("night")
                .long("night")
                .value_name("NIGHT")
                .help("Night affected by --weather-demo or --close (default: whole trip)")
                .value_parser(value_parser!(u32)),
        )
        .arg(
            Arg::new("catalog")
                .long("catalog")
                .value_name("PATH")
                .help("Catalog JSON file (or set ITINERARY_CATALOG)"),
        )
        .arg(
            Arg::new("events")
                .short('e')
                .long("events")
                .value_name("PATH")
                .help("Append published events to this file as JSON lines"),
        )
        .arg(
            Arg::new("sweep")
                .long("sweep")
                .value_name("BUDGETS")
                .help("Plan each budget in turn (default: 5000 10000 18000 30000)")
                .num_args(0..)
                .default_missing_values(DEFAULT_SWEEP_BUDGETS)
                .value_parser(value_parser!(f64))
                .conflicts_with_all(["budget", "demo", "delay", "weather-demo", "close"]),
        )
        .arg(
            Arg::new("csv")
                .long("csv")
                .value_name("PATH")
                .help("Write the --sweep results to a CSV file")
                .requires("sweep"),
        )
        .arg(
            Arg::new("demo")
                .long("demo")
                .help("Run a scripted session: weather, peak season, delay, budget increase")
                .action(ArgAction::SetTrue)
                .conflicts_with_all(["delay", "weather-demo", "close"]),
        )
}

/// CLI entry point for the itinerary planner
pub async fn run() -> ExitCode {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();
    // stdout carries the JSON reports
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let matches = command().get_matches();
    match execute(&matches).await {
        Ok(code) => ExitCode::from(code),
        Err(err) => {
            error!("Planning failed: {:#}", err);
            eprintln!("error: {:#}", err);
            ExitCode::from(exit_code_for_error(&err))
        }
    }
}

async fn execute(matches: &ArgMatches) -> anyhow::Result<u8> {
    let people = matches.get_one::<u32>("people").copied().unwrap_or(1);
    let nights = matches.get_one::<u32>("nights").copied().unwrap_or(2);

    let bus = Arc::new(MemoryEventBus::default());
    let publisher: Arc<dyn EventPublisher> = match matches.get_one::<String>("events") {
        Some(path) => Arc::new(
            FanoutPublisher::new()
                .with_target(bus.clone())
                .with_target(Arc::new(FileEventPublisher::new(path)?)),
        ),
        None => bus.clone(),
    };

    let mut agent = match matches.get_one::<String>("catalog") {
        Some(path) => {
            let catalog =
                load_catalog(path).with_context(|| format!("loading catalog {}", path))?;
            ItineraryAgent::new(Arc::new(catalog), publisher)
                .with_config(PlanningConfig::from_env()?)
        }
        None => ItineraryAgent::from_env(people, publisher)?,
    };
    info!("Planning session {}", agent.session_id());

    if let Some(budgets) = matches.get_many::<f64>("sweep") {
        let budgets: Vec<f64> = budgets.copied().collect();
        let csv_path = matches.get_one::<String>("csv").map(String::as_str);
        return run_sweep(&mut agent, &budgets, people, nights, csv_path).await;
    }

    let budget = match matches.get_one::<f64>("budget").copied() {
        Some(budget) => budget,
        None if matches.get_flag("demo") => DEMO_BUDGET,
        None => return Err(ItineraryError::Validation("--budget is required".to_string()).into()),
    };
    let spec = BudgetSpec::new(budget, people, nights);
    let disruptions = if matches.get_flag("demo") {
        Vec::new()
    } else {
        requested_disruptions(matches, nights)?
    };

    let mut report = agent.create_plan(spec).await?;
    print_report(&report)?;
    if report.is_rejected() {
        return Ok(EXIT_INPUT_ERROR);
    }

    if matches.get_flag("demo") {
        for step in demo_script(&spec) {
            report = run_demo_step(&mut agent, step).await?;
            print_report(&report)?;
        }
    } else {
        for disruption in disruptions {
            report = agent.handle_disruption(disruption).await?;
            print_report(&report)?;
        }
    }

    let drift = agent.history().drift();
    info!(
        "Session {}: {} event(s), {} disruption(s), {} slot(s) changed, cost delta {:.2}",
        agent.session_id(),
        bus.snapshot().len(),
        agent.history().disruption_count(),
        drift.changed_slots,
        drift.cost_delta
    );

    Ok(exit_code_for_report(&report))
}

async fn run_sweep(
    agent: &mut ItineraryAgent,
    budgets: &[f64],
    people: u32,
    nights: u32,
    csv_path: Option<&str>,
) -> anyhow::Result<u8> {
    let reports = agent.plan_budgets(budgets, people, nights).await?;
    for report in &reports {
        print_report(report)?;
    }

    let rows: Vec<SweepRow> = budgets
        .iter()
        .zip(&reports)
        .map(|(budget, report)| SweepRow::from_report(*budget, report))
        .collect();
    if let Some(path) = csv_path {
        write_sweep_csv(path, &rows)?;
        info!("Wrote {} sweep row(s) to {}", rows.len(), path);
    }

    Ok(exit_code_for_sweep(&reports))
}

/// Weather over the whole trip, peak season, a long delay, then more money.
pub fn demo_script(spec: &BudgetSpec) -> Vec<DemoStep> {
    vec![
        DemoStep::Disrupt(Disruption::outdoor_weather(
            TimeWindow::whole_trip(spec.nights),
            Severity::Severe,
        )),
        DemoStep::Advise(Advisory::peak_season()),
        DemoStep::Disrupt(Disruption::transport_delay(DEMO_DELAY_MINUTES, spec.nights)),
        DemoStep::RaiseBudget(spec.total_budget.max(DEMO_RAISED_BUDGET)),
    ]
}

async fn run_demo_step(agent: &mut ItineraryAgent, step: DemoStep) -> anyhow::Result<PlanReport> {
    let report = match step {
        DemoStep::Disrupt(disruption) => agent.handle_disruption(disruption).await?,
        DemoStep::Advise(advisory) => agent.handle_advisory(advisory).await?,
        DemoStep::RaiseBudget(budget) => agent.update_budget(budget).await?,
    };
    Ok(report)
}

pub fn write_sweep_csv(path: impl AsRef<Path>, rows: &[SweepRow]) -> anyhow::Result<()> {
    let path = path.as_ref();
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("creating CSV file {}", path.display()))?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

fn requested_disruptions(matches: &ArgMatches, nights: u32) -> anyhow::Result<Vec<Disruption>> {
    let window = match matches.get_one::<u32>("night").copied() {
        Some(night) if night == 0 || night > nights => {
            return Err(ItineraryError::Validation(format!(
                "--night must be between 1 and {}, got {}",
                nights, night
            ))
            .into());
        }
        Some(night) => TimeWindow::night(night),
        None => TimeWindow::whole_trip(nights),
    };

    let mut disruptions = Vec::new();
    if let Some(minutes) = matches.get_one::<u32>("delay").copied() {
        disruptions.push(Disruption::transport_delay(minutes, nights));
    }
    if matches.get_flag("weather-demo") {
        disruptions.push(Disruption::outdoor_weather(window, Severity::Severe));
    }
    if let Some(id) = matches.get_one::<String>("close") {
        disruptions.push(Disruption::closure([id.as_str()], window));
    }
    Ok(disruptions)
}

fn print_report(report: &PlanReport) -> anyhow::Result<()> {
    info!("\n{}", report.summary());
    println!("{}", serde_json::to_string_pretty(report)?);
    Ok(())
}

pub fn exit_code_for_report(report: &PlanReport) -> u8 {
    match &report.plan {
        None => EXIT_INPUT_ERROR,
        Some(plan) if plan.feasible => EXIT_FEASIBLE,
        Some(_) => EXIT_INFEASIBLE,
    }
}

/// Worst outcome across the sweep
pub fn exit_code_for_sweep(reports: &[PlanReport]) -> u8 {
    let codes: Vec<u8> = reports.iter().map(exit_code_for_report).collect();
    if codes.contains(&EXIT_INPUT_ERROR) {
        EXIT_INPUT_ERROR
    } else if codes.contains(&EXIT_INFEASIBLE) {
        EXIT_INFEASIBLE
    } else {
        EXIT_FEASIBLE
    }
}

pub fn exit_code_for_error(err: &anyhow::Error) -> u8 {
    match err.downcast_ref::<ItineraryError>() {
        Some(
            ItineraryError::InfeasibleBudget(_)
            | ItineraryError::Validation(_)
            | ItineraryError::Catalog(_)
            | ItineraryError::Config(_),
        ) => EXIT_INPUT_ERROR,
        _ => EXIT_RUNTIME_ERROR,
    }
}
