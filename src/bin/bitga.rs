//! `bitga`: line-oriented front end for the binary GA.
//!
//! ```text
//! $ bitga --seed 42
//! > f: (x, y) -> -x * (y / 2 - 10)
//! > r: [10, 20] [-5, 7]
//! > p: 10 4
//! > !mutate 100
//! ```
//!
//! Set `RUST_LOG=u_bitga=debug` to trace the operators.

use std::io::{self, BufRead, Write};
use std::process::ExitCode;

use tracing::warn;
use tracing_subscriber::EnvFilter;
use u_bitga::driver::{Command, Outcome, Session, Table};
use u_bitga::ga::BgaConfig;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let config = match parse_args(std::env::args().skip(1)) {
        Ok(config) => config,
        Err(msg) => {
            eprintln!("{msg}");
            eprintln!("usage: bitga [--seed N]");
            return ExitCode::from(2);
        }
    };

    match repl(Session::new(config)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("i/o error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<BgaConfig, String> {
    let mut config = BgaConfig::default();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--seed" | "-s" => {
                let value = args.next().ok_or("--seed needs a value")?;
                let seed = value
                    .parse::<u64>()
                    .map_err(|_| format!("invalid seed '{value}'"))?;
                config = config.with_seed(seed);
            }
            other => return Err(format!("unknown argument '{other}'")),
        }
    }
    Ok(config)
}

fn repl(mut session: Session) -> io::Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut lines = stdin.lock().lines();

    loop {
        write!(stdout, "> ")?;
        stdout.flush()?;
        let Some(line) = lines.next().transpose()? else {
            writeln!(stdout)?;
            return Ok(());
        };

        let outcome = Command::parse(&line)
            .and_then(|command| command.map(|c| session.execute(c)).transpose());
        match outcome {
            Ok(Some(Outcome::Quit)) => return Ok(()),
            Ok(Some(outcome)) => report(&mut stdout, &session, &outcome)?,
            Ok(None) => {}
            Err(e) => {
                warn!(error = %e, "command rejected");
                eprintln!("error: {e}");
            }
        }
    }
}

fn report(out: &mut impl Write, session: &Session, outcome: &Outcome) -> io::Result<()> {
    match outcome {
        Outcome::FunctionSet => {
            if let Some(objective) = session.objective() {
                let params = objective.variables().join(", ");
                writeln!(out, "function -> ({params}) -> {objective}")?;
            }
        }
        Outcome::RangesSet => {
            if let Some(ranges) = session.ranges() {
                let text = ranges
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(" ");
                writeln!(out, "ranges -> {text}")?;
            }
        }
        Outcome::Reseeded => {
            if let Some(seed) = session.config().seed {
                writeln!(out, "seed -> {seed}")?;
            }
        }
        Outcome::Populated => {
            if let (Some(population), Some(layout)) = (session.population(), session.layout()) {
                let bits = layout.variables().first().map_or(0, |v| v.bits);
                writeln!(
                    out,
                    "population : npop -> {}, mbits -> {bits}",
                    population.len()
                )?;
                write!(out, "{}", Table::new(population))?;
            }
        }
        Outcome::Evolved { generations } => {
            if let Some(population) = session.population() {
                writeln!(out, "generations -> {generations}")?;
                write!(out, "{}", Table::new(population))?;
            }
            if let Some(best) = session.best() {
                let values = best
                    .phenotype
                    .iter()
                    .map(|v| format!("{v:.3}"))
                    .collect::<Vec<_>>()
                    .join(", ");
                writeln!(out, "solution -> [{values}] cost {:.3}", best.cost)?;
            }
        }
        Outcome::Show => {
            if let Some(population) = session.population() {
                write!(out, "{}", Table::new(population))?;
            }
        }
        Outcome::Quit => {}
    }
    Ok(())
}
