// Copyright 2020 Xavier Gillard
//
// Permission is hereby granted, free of charge, to any person obtaining a copy of
// this software and associated documentation files (the "Software"), to deal in
// the Software without restriction, including without limitation the rights to
// use, copy, modify, merge, publish, distribute, sublicense, and/or sell copies of
// the Software, and to permit persons to whom the Software is furnished to do so,
// subject to the following conditions:
//
// The above copyright notice and this permission notice shall be included in all
// copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
// IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY, FITNESS
// FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR
// COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER
// IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN
// CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

//! Solves one network design instance with the spanning tree heuristic and
//! writes the resulting design next to it (or in the given output directory).

use std::{path::PathBuf, time::{Duration, Instant}};

use anyhow::Context;
use clap::Parser;
use sth::*;
use sth::io_utils::{read_instance, write_report, Report};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// The directory holding the instance files
    instance: PathBuf,
    /// The fraction of each demand that may be served from a cache
    alpha: f64,
    /// The cost of installing a cache
    beta: f64,
    /// The cost of activating a cache
    gamma: f64,
    /// The bandwidth of an active cache
    cbw: f64,
    /// The time (in seconds) one relaxation is expected to take at most.
    /// Zero or less means no limit.
    limit: f64,
    /// Freeze this fraction of the undecided variables per step instead of
    /// a single one
    #[clap(short, long)]
    speed: Option<f64>,
    /// Where to write the results (defaults to the instance directory)
    #[clap(short, long)]
    output: Option<PathBuf>,
}

fn time_limit(limit: f64) -> Option<Duration> {
    if limit > 0.0 && limit.is_finite() {
        Some(Duration::from_secs_f64(limit))
    } else {
        None
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let instance = read_instance(&args.instance)
        .with_context(|| format!("cannot read instance {}", args.instance.display()))?;

    let mut config = ModelConfigBuilder::default();
    config.alpha(args.alpha)
        .cache_cost(args.beta)
        .activation_cost(args.gamma)
        .cache_bandwidth(args.cbw);
    if let Some(limit) = time_limit(args.limit) {
        config.time_limit(limit);
    }
    let config = config.build()?;

    let policy = args.speed.map(|speed| PolicyKind::Batch { speed }).unwrap_or_default();
    let heuristic = HeuristicConfigBuilder::default().policy(policy).build()?;

    let mut model = NetworkModel::build(&instance, &config);

    let start = Instant::now();
    let completion = model.round(&heuristic);
    let duration = start.elapsed();

    let report = Report::collect(&model, &completion);
    let output = args.output.unwrap_or(args.instance);
    write_report(&output, &report)
        .with_context(|| format!("cannot write results to {}", output.display()))?;

    println!("Duration:    {:.3} seconds", duration.as_secs_f32());
    println!("Objective:   {}",            report.objective);
    println!("Relaxations: {}",            report.relaxations);
    match &completion.status {
        Status::Integral        => println!("Status:      integral"),
        Status::Failed(failure) => println!("Status:      failed ({failure})"),
    }
    println!("Links:       {:?}",          report.links());
    println!("Caches:      {:?}",          report.caches());
    Ok(())
}
