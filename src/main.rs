//! Home Loan Advisor CLI
//!
//! Command-line interface for schedules, plan comparison and advisory reports

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::{Args, Parser, Subcommand};
use rayon::prelude::*;

use home_loan_advisor::format::{format_currency, format_large_number};
use home_loan_advisor::loan::load_lumpsums;
use home_loan_advisor::{build_report, AdvisorInput, AdvisorReport, ScenarioComparator};

#[derive(Parser)]
#[command(name = "home-loan-advisor")]
#[command(about = "Prepay or invest? Simulate a home loan against investing the surplus", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct InputArgs {
    /// Advisor input file (JSON)
    #[arg(short, long)]
    input: PathBuf,

    /// Simulation start date (YYYY-MM-DD); defaults to the file's as_of, then today
    #[arg(long)]
    as_of: Option<NaiveDate>,

    /// Replace the plan's lumpsums with entries from a CSV file (month,amount,description)
    #[arg(long)]
    lumpsums: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the amortization schedule under the input's prepayment plan
    Schedule {
        #[command(flatten)]
        args: InputArgs,

        /// Number of rows to print
        #[arg(short, long, default_value_t = 24)]
        rows: usize,

        /// Write the full schedule to a CSV file
        #[arg(long)]
        csv: Option<PathBuf>,
    },

    /// Compare the plan with no prepayment, per channel and across the split scenarios
    Compare {
        #[command(flatten)]
        args: InputArgs,
    },

    /// Full advisory report
    Advise {
        #[command(flatten)]
        args: InputArgs,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Evaluate several input files in parallel and print one line per file
    Batch {
        /// Input files (JSON)
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Simulation start date (YYYY-MM-DD) for every file
        #[arg(long)]
        as_of: Option<NaiveDate>,
    },
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn load_input(args: &InputArgs) -> Result<(AdvisorInput, NaiveDate)> {
    let mut input = AdvisorInput::load(&args.input)
        .with_context(|| format!("failed to load {}", args.input.display()))?;

    if let Some(path) = &args.lumpsums {
        input.prepayment.lumpsums = load_lumpsums(path)
            .with_context(|| format!("failed to load lumpsums from {}", path.display()))?;
        input.prepayment.enable_lumpsum = !input.prepayment.lumpsums.is_empty();
        input
            .prepayment
            .validate()
            .with_context(|| format!("invalid lumpsums in {}", path.display()))?;
    }

    let as_of = args.as_of.unwrap_or_else(|| input.simulation_start(today()));
    Ok((input, as_of))
}

fn comparator_for(input: &AdvisorInput, as_of: NaiveDate) -> Result<ScenarioComparator> {
    let investment = input.investment_option()?;
    let outstanding = input.outstanding_principal(as_of);
    Ok(ScenarioComparator::new(input.loan.clone(), investment, as_of, outstanding))
}

fn run_schedule(args: &InputArgs, rows: usize, csv: Option<&Path>) -> Result<()> {
    let (input, as_of) = load_input(args)?;
    let comparator = comparator_for(&input, as_of)?;
    let schedule = comparator.run(&input.prepayment);

    println!("Loan as of {}", as_of);
    println!("  Outstanding: {}", format_currency(comparator.opening_balance()));
    println!("  EMI:         {}", format_currency(input.loan.current_emi));
    println!("  Rate:        {}%", input.loan.interest_rate);
    println!();

    println!("{:>5} {:>9} {:>12} {:>12} {:>12} {:>10} {:>10} {:>14} {:>14}",
        "Month", "Date", "EMI", "Interest", "Principal", "Extra", "Lumpsum", "Balance", "CumInterest");
    println!("{}", "-".repeat(108));
    for row in schedule.rows.iter().take(rows) {
        println!("{:>5} {:>9} {:>12.0} {:>12.0} {:>12.0} {:>10.0} {:>10.0} {:>14.0} {:>14.0}",
            row.month, row.date, row.emi, row.interest, row.principal,
            row.extra, row.lumpsum, row.balance, row.cumulative_interest);
    }
    if schedule.rows.len() > rows {
        println!("... {} more months", schedule.rows.len() - rows);
    }

    let summary = schedule.summary();
    println!();
    println!("Summary:");
    println!("  Months:         {}", summary.total_months);
    println!("  Total interest: {}", format_currency(summary.total_interest));
    println!("  Prepaid:        {}", format_currency(summary.total_extra + summary.total_lumpsum));
    if !summary.converged {
        println!("  WARNING: loan not paid off within {} months", summary.total_months);
    }

    if let Some(path) = csv {
        schedule
            .write_csv_path(path)
            .with_context(|| format!("failed to write {}", path.display()))?;
        println!("\nSchedule written to {}", path.display());
    }
    Ok(())
}

fn run_compare(args: &InputArgs) -> Result<()> {
    let (input, as_of) = load_input(args)?;
    let comparator = comparator_for(&input, as_of)?;
    let cmp = comparator.compare_plan(&input.prepayment);

    println!("Plan vs no prepayment ({})", comparator.investment().name);
    println!("  Interest:       {} -> {}", format_large_number(cmp.baseline_interest), format_large_number(cmp.plan_interest));
    println!("  Months:         {} -> {}", cmp.baseline_months, cmp.plan_months);
    println!("  Interest saved: {}", format_large_number(cmp.interest_saved));
    println!("  Months saved:   {}", cmp.months_saved);
    println!("  Prepaid:        {}", format_large_number(cmp.total_prepayment));
    println!("  Invest instead: {} gain", format_large_number(cmp.investment_gain));
    println!("  Net benefit:    {}", format_large_number(cmp.net_benefit));
    if !cmp.is_reliable() {
        println!("  WARNING: a schedule hit the month cap; savings are not meaningful");
    }

    if !cmp.channels.is_empty() {
        println!();
        println!("{:<10} {:>14} {:>14} {:>14} {:>14}", "Channel", "Prepaid", "Saved", "Invested", "Net");
        for c in &cmp.channels {
            println!("{:<10} {:>14.0} {:>14.0} {:>14.0} {:>14.0}",
                c.channel.as_str(), c.total_prepaid, c.interest_saved, c.invested_value, c.net_benefit());
        }
    }

    let catalog = comparator.scenario_catalog(input.surplus_amount);
    println!();
    println!("Split scenarios for {}/month surplus:", format_currency(input.surplus_amount));
    println!("{:<20} {:>8} {:>14} {:>14} {:>14}", "Scenario", "Months", "Interest", "Invested", "Net worth");
    for (idx, entry) in catalog.entries.iter().enumerate() {
        let r = &entry.result;
        println!("{:<20} {:>8} {:>14.0} {:>14.0} {:>14.0}{}",
            entry.label, r.loan_completion_month, r.total_interest_paid, r.investment_returns, r.net_worth,
            if idx == catalog.best_index { "  <- best" } else { "" });
    }
    Ok(())
}

fn print_report(report: &AdvisorReport) {
    let rec = &report.recommendation;
    println!("Advisory report as of {}", report.as_of);
    println!("  Outstanding: {} ({} months left)", format_large_number(report.outstanding_principal), report.remaining_tenure);
    println!();

    println!("Recommendation: {} ({}% prepay / {}% invest)", rec.strategy, rec.prepayment_percent, rec.investment_percent);
    println!("  {}", rec.description);
    for p in &rec.priorities {
        println!("  [{:?}] {}: {}", p.level, p.title, p.description);
    }
    for line in &rec.reasoning {
        println!("  - {}", line);
    }
    if let Some(note) = &rec.penalty_note {
        println!("  Note: {}", note);
    }
    println!();

    let opt = &report.optimal_strategy;
    println!("Suggested prepayment ({:?} confidence, {:?}):", opt.confidence, opt.risk_profile);
    println!("  Monthly: {}  Yearly: {}  Lumpsum: {}",
        format_currency(opt.monthly_prepayment), format_currency(opt.yearly_prepayment), format_currency(opt.lumpsum_prepayment));
    println!("  Est. interest saved: {}  Est. months saved: {}",
        format_large_number(opt.expected_interest_saved), opt.expected_months_saved);
    println!("  {}", opt.rationale);
    println!();

    let score = &report.health_score;
    println!("Financial health: {}/100 ({})", score.score, score.grade.as_str());
    for s in &score.strengths {
        println!("  + {}", s);
    }
    for w in &score.weaknesses {
        println!("  - {}", w);
    }
    for line in &report.health_insights {
        println!("  {}", line);
    }
    println!();

    println!("Insights:");
    for insight in &report.insights {
        println!("  [{:?}] {} - {}", insight.priority, insight.category.as_str(), insight.title);
        println!("      {}", insight.analysis);
        println!("      {}", insight.recommendation);
    }

    for warning in &report.warnings {
        println!("WARNING: {}", warning);
    }
}

fn run_advise(args: &InputArgs, json: bool) -> Result<()> {
    let (input, as_of) = load_input(args)?;
    let report = build_report(&input, as_of)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }
    Ok(())
}

fn run_batch(inputs: &[PathBuf], as_of: Option<NaiveDate>) -> Result<()> {
    let fallback = today();
    let results: Vec<(PathBuf, Result<AdvisorReport>)> = inputs
        .par_iter()
        .map(|path| {
            let report = AdvisorInput::load(path)
                .map_err(anyhow::Error::from)
                .and_then(|input| {
                    let date = as_of.unwrap_or_else(|| input.simulation_start(fallback));
                    build_report(&input, date).map_err(anyhow::Error::from)
                });
            (path.clone(), report)
        })
        .collect();

    let mut failures = 0;
    for (path, result) in &results {
        match result {
            Ok(report) => println!("{}: {} | saves {} in {} months | health {} | best split {}",
                path.display(),
                report.recommendation.strategy,
                format_large_number(report.comparison.interest_saved),
                report.comparison.months_saved,
                report.health_score.grade.as_str(),
                report.scenarios.best().map(|b| b.label.as_str()).unwrap_or("-")),
            Err(e) => {
                failures += 1;
                eprintln!("{}: {:#}", path.display(), e);
            }
        }
    }

    if failures > 0 {
        anyhow::bail!("{} of {} inputs failed", failures, results.len());
    }
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match &cli.command {
        Commands::Schedule { args, rows, csv } => run_schedule(args, *rows, csv.as_deref()),
        Commands::Compare { args } => run_compare(args),
        Commands::Advise { args, json } => run_advise(args, *json),
        Commands::Batch { inputs, as_of } => run_batch(inputs, *as_of),
    }
}
