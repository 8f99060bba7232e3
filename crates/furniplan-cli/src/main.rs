use clap::{Parser, Subcommand, ValueEnum};
use furniplan_advisor::{
    evaluate, sensitivity, to_feasible_integer_plan, Advisor, Dashboard, Event, Parameters, PlanSummary,
    ProductionPlan, ResourceSensitivity, ResourceStatus, ResourceUsage, SessionState,
};
use serde::Serialize;
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(name = "furniplan")]
#[command(about = "Revenue-maximizing production mix for a furniture shop", long_about = None)]
struct Cli {
    /// JSON file with prices, availability, quantities and minimum_per_product
    #[arg(short, long, global = true)]
    params: Option<PathBuf>,
    /// Output format
    #[arg(short, long, value_enum, default_value_t = Format::Pretty, global = true)]
    format: Format,
    /// Log solver activity to stderr (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Pretty,
    Json,
}

#[derive(Clone, Copy, ValueEnum)]
enum PlanChoice {
    Optimal,
    Recommended,
}

#[derive(Subcommand)]
enum Commands {
    /// Show consumption, revenue, the optimal and the recommended plan
    Dashboard {
        /// Replace the current plan first
        #[arg(long, value_enum)]
        apply: Option<PlanChoice>,
    },
    /// Check a production plan against the available resources
    Evaluate {
        /// One quantity per product, in catalog order
        #[arg(required = true)]
        quantities: Vec<u32>,
    },
    /// Solve the revenue LP and output the optimal mix
    Solve {
        /// Minimum units of every product
        #[arg(long, default_value_t = 0)]
        min: u32,
        /// Show shadow prices and slack
        #[arg(short, long)]
        analysis: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    if cli.verbose > 0 {
        let level = if cli.verbose > 1 { Level::TRACE } else { Level::DEBUG };
        let subscriber = FmtSubscriber::builder()
            .with_max_level(level)
            .with_writer(std::io::stderr)
            .finish();
        if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
            eprintln!("Failed to set tracing subscriber: {}", e);
            std::process::exit(1);
        }
    }

    let json = cli.format == Format::Json;
    let state = match load_session(cli.params.as_ref()) {
        Ok(state) => state,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };
    let advisor = Advisor::new();

    match cli.command {
        Commands::Dashboard { apply } => {
            let state = match apply {
                None => state,
                Some(choice) => {
                    let (event, name) = match choice {
                        PlanChoice::Optimal => (Event::ApplyOptimal, "optimal"),
                        PlanChoice::Recommended => (Event::ApplyRecommended, "recommended"),
                    };
                    match state.apply(&event, &advisor) {
                        Ok(next) => next,
                        Err(e) => {
                            eprintln!("Cannot apply {} plan: {}", name, e);
                            std::process::exit(1);
                        }
                    }
                }
            };

            let dashboard = Dashboard::build(&state, &advisor);
            if json {
                print_json(&dashboard);
            } else {
                print_dashboard(&dashboard);
            }
        }
        Commands::Evaluate { quantities } => {
            let plan = ProductionPlan::new(quantities);
            if let Err(e) = state.catalog().check_plan(&plan) {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }

            let evaluation = evaluate(&plan, state.catalog());
            if json {
                print_json(&evaluation);
            } else {
                print_usage(&evaluation.usage);
                println!();
                print_plan("Plan", &PlanSummary::of(&plan, state.catalog()));
                println!();
                print_violations(evaluation.violation_count());
            }
        }
        Commands::Solve { min, analysis } => {
            let catalog = state.catalog();
            let result = advisor.solve_max(catalog, min);
            let plan = to_feasible_integer_plan(catalog, &result);
            let report = sensitivity(catalog, &result);

            if json {
                #[derive(Serialize)]
                struct SolveOutput<'a> {
                    result: &'a furniplan_advisor::LpResult,
                    integer_plan: Option<&'a ProductionPlan>,
                    sensitivity: &'a [ResourceSensitivity],
                }
                print_json(&SolveOutput {
                    result: &result,
                    integer_plan: plan.as_ref(),
                    sensitivity: &report,
                });
            } else {
                let Some(plan) = plan else {
                    println!("Status: {:?}", result.status);
                    println!("Reason: {}", result.message);
                    std::process::exit(1);
                };

                println!("Status: OPTIMAL");
                if min > 0 {
                    println!("Minimum per product: {}", min);
                }
                println!("Continuous revenue: {:.2}", result.objective);
                println!();
                println!("  {:14} {:>12} {:>8}", "Product", "Continuous", "Whole");
                for ((product, x), q) in catalog.products().iter().zip(&result.quantities).zip(plan.quantities()) {
                    println!("  {:14} {:>12.4} {:>8}", product.name, x, q);
                }
                println!();
                println!("Whole-unit revenue: {:.2}", PlanSummary::of(&plan, catalog).revenue);

                if analysis {
                    println!();
                    print_sensitivity(&report);
                }
            }

            if !result.is_feasible() {
                std::process::exit(1);
            }
        }
    }
}

fn load_session(params: Option<&PathBuf>) -> Result<SessionState, furniplan_advisor::ConfigError> {
    match params {
        Some(path) => Parameters::load(path)?.into_session(),
        None => Ok(SessionState::default()),
    }
}

fn print_json<T: Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(s) => println!("{}", s),
        Err(e) => {
            eprintln!("Error: cannot serialize output: {}", e);
            std::process::exit(1);
        }
    }
}

fn print_dashboard(dashboard: &Dashboard) {
    println!("Prices:");
    for product in &dashboard.products {
        println!("  {:14} {:>10.2}", product.name, product.price);
    }
    println!();

    println!("Consumption matrix:");
    print!("  {:10}", "");
    for product in &dashboard.products {
        print!(" {:>13}", product.name);
    }
    println!();
    for (resource, row) in dashboard.resources.iter().zip(&dashboard.matrix) {
        print!("  {:10}", resource.name);
        for units in row {
            print!(" {:>13}", units);
        }
        println!();
    }
    println!();

    print_usage(&dashboard.consumption);
    println!();
    println!("Current revenue: {:.2}", dashboard.current.revenue);
    print_violations(dashboard.violation_count);
    if let Some(max) = dashboard.theoretical_max {
        println!("Theoretical maximum: {:.2}", max);
    }
    println!();

    match (&dashboard.optimal, &dashboard.optimal_notice) {
        (Some(optimal), _) => print_plan("Optimal plan", optimal),
        (None, Some(notice)) => {
            println!("Could not find an optimal plan!");
            println!("Reason: {}", notice);
        }
        (None, None) => {}
    }

    if !dashboard.sensitivity.is_empty() {
        println!();
        print_sensitivity(&dashboard.sensitivity);
    }

    if let Some(recommended) = &dashboard.recommended {
        println!();
        match (&recommended.plan, &recommended.notice) {
            (Some(plan), _) => {
                print_plan(&format!("Recommended plan (at least {} of each)", recommended.minimum), plan)
            }
            (None, notice) => println!("{}", notice.as_deref().unwrap_or("No recommended plan")),
        }
    }

    if let Some(gap) = &dashboard.revenue_gap {
        if gap.absolute > 0.0 {
            println!();
            match gap.percent {
                Some(pct) => println!("Potential gain: +{:.2} (+{:.1}%)", gap.absolute, pct),
                None => println!("Potential gain: +{:.2}", gap.absolute),
            }
        }
    }
}

fn print_usage(usage: &[ResourceUsage]) {
    println!(
        "  {:10} {:>10} {:>10} {:>10}  {}",
        "Resource", "Available", "Consumed", "Remaining", "Status"
    );
    for u in usage {
        let status = match u.status {
            ResourceStatus::Ok => "OK",
            ResourceStatus::Exceeded => "Exceeded",
        };
        println!(
            "  {:10} {:>10} {:>10} {:>10}  {}",
            u.resource, u.available, u.consumed, u.remaining, status
        );
    }
}

fn print_violations(count: usize) {
    if count > 0 {
        println!("{} constraint(s) violated!", count);
    } else {
        println!("All constraints respected.");
    }
}

fn print_plan(title: &str, plan: &PlanSummary) {
    println!("{}:", title);
    for line in &plan.lines {
        println!("  {:14} {:>8} {:>12.2}", line.product, line.quantity, line.revenue);
    }
    println!("Revenue: {:.2}", plan.revenue);
}

fn print_sensitivity(report: &[ResourceSensitivity]) {
    println!("Sensitivity:");
    println!(
        "  {:10} {:>12} {:>10} {:>13}",
        "Resource", "Consumption", "Slack", "Shadow price"
    );
    for row in report {
        let marker = if row.binding { " (binding)" } else { "" };
        println!(
            "  {:10} {:>12.2} {:>10.2} {:>13.4}{}",
            row.resource, row.consumption, row.slack, row.shadow_price, marker
        );
    }
}
