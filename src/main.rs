// SPDX-FileCopyrightText: 2025 stfnw
// SPDX-License-Identifier: MIT

use church_numerals::church;
use church_numerals::eval::{evaluate_, EvalConfig};
use church_numerals::term;

use clap::Parser;
use std::io::Write;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// Upper bound for `--count`. Forcing the numeral for n recurses through n
/// nested closures on the native stack, so larger counts would overflow it.
const MAX_COUNT: u64 = 1000;

#[derive(Parser, Debug)]
#[command(name = "church-numerals")]
#[command(about = "Count with Church numerals built from nested closures")]
struct Args {
    /// Number of numerals to print, starting from zero (at most 1000)
    #[arg(short = 'n', long, default_value_t = 10, value_parser = clap::value_parser!(u64).range(0..=MAX_COUNT))]
    count: u64,
    /// Also print the lambda term of each numeral
    #[arg(long)]
    terms: bool,
    /// Step limit for each evaluator run
    #[arg(long)]
    max_steps: Option<usize>,
}

fn main() -> anyhow::Result<()> {
    // Logs go to stderr, stdout only carries the numbers.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let args = Args::parse();
    let stdout = std::io::stdout();
    run(&args, &mut stdout.lock())
}

/// Print the value of zero, then repeatedly advance to the successor by
/// evaluating `succ` on the previous numeral.
fn run(args: &Args, out: &mut impl Write) -> anyhow::Result<()> {
    let config = EvalConfig::default().with_max_steps(args.max_steps);
    info!(count = args.count, "counting with Church numerals");

    let succ = church::succ();
    let mut prev = church::zero();
    // Term view of `prev`, advanced by reducing `succ` applied to it.
    let mut prev_term = term::zero();

    for i in 0..args.count {
        let n = church::decode_(&prev, args.max_steps)?;
        if args.terms {
            writeln!(out, "{}\t{}", n, prev_term)?;
            let max_steps = args.max_steps.unwrap_or(usize::MAX);
            prev_term = term::reduce(&term::app(term::succ(), prev_term), max_steps)?;
        } else {
            writeln!(out, "{}", n)?;
        }

        let next = evaluate_(succ.clone(), [prev], config)?;
        debug!(i, steps = next.steps, "advanced to successor");
        prev = next.value;
    }

    Ok(())
}
