/*!
 * Bounded Handoff - Demonstration Entry Point
 *
 * Runs the producer/consumer workload against each buffer strategy and
 * prints per-worker results and the final buffer occupancy.
 *
 * Usage: handoff [--json] [--strategy condvar|channel] [--stop-after-ms N]
 */

use anyhow::{bail, Context, Result};
use bounded_handoff::{
    init_tracing, Simulation, SimulationConfig, SimulationReport, StrategyType,
};
use std::thread;
use std::time::Duration;
use tracing::{info, warn};

struct Args {
    json: bool,
    strategy: Option<StrategyType>,
    stop_after: Option<Duration>,
}

fn parse_args() -> Result<Args> {
    let mut args = Args {
        json: false,
        strategy: None,
        stop_after: None,
    };

    let mut iter = std::env::args().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--json" => args.json = true,
            "--strategy" => {
                let value = iter.next().context("--strategy needs a value")?;
                args.strategy = Some(value.parse().map_err(anyhow::Error::msg)?);
            }
            "--stop-after-ms" => {
                let value = iter.next().context("--stop-after-ms needs a value")?;
                let ms: u64 = value.parse().context("--stop-after-ms must be an integer")?;
                args.stop_after = Some(Duration::from_millis(ms));
            }
            other => bail!("unknown argument: {}", other),
        }
    }

    Ok(args)
}

fn run_once(config: SimulationConfig, stop_after: Option<Duration>) -> Result<SimulationReport> {
    let handle = Simulation::start(config)?;

    let report = match stop_after {
        Some(delay) => {
            thread::sleep(delay);
            if handle.is_finished() {
                handle.join()
            } else {
                warn!(after_ms = delay.as_millis() as u64, "Stopping workers early");
                handle.stop()
            }
        }
        None => handle.join(),
    };

    Ok(report)
}

fn print_report(report: &SimulationReport) {
    println!("{}", "-".repeat(70));
    println!("Strategy:          {}", report.strategy);
    println!("Buffer capacity:   {}", report.capacity);
    println!("Completed in:      {} ms", report.elapsed_ms);
    for worker in report.producers.iter().chain(report.consumers.iter()) {
        println!(
            "  {:<12} {:>3}/{:<3} {:?}",
            worker.name, worker.completed, worker.quota, worker.state
        );
    }
    println!("Produced:          {}", report.total_produced);
    println!("Consumed:          {}", report.total_consumed);
    println!("Final buffer size: {}", report.final_occupancy);
}

fn main() -> Result<()> {
    init_tracing();
    let args = parse_args()?;
    let base = SimulationConfig::from_env()?;

    let strategies: Vec<StrategyType> = match args.strategy {
        Some(strategy) => vec![strategy],
        None => StrategyType::ALL.to_vec(),
    };

    let mut reports = Vec::with_capacity(strategies.len());
    for strategy in strategies {
        let config = SimulationConfig {
            strategy,
            ..base.clone()
        };
        info!(%strategy, "Running demonstration");
        let report = run_once(config, args.stop_after)?;

        if !report.is_consistent() {
            warn!(run_id = %report.run_id, "Produced/consumed counts do not reconcile");
        }
        if !args.json {
            print_report(&report);
        }
        reports.push(report);
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
    }

    Ok(())
}
