// SPDX-FileCopyrightText: 2026 Eli Array Minkoff
//
// SPDX-License-Identifier: 0BSD

//! Run an intcode program with a known noun and verb, or search for the noun and verb that make
//! it produce a given value

use clap::Parser;
use intcode::prelude::*;
use intcode::search::SearchError;
use log::LevelFilter;
use std::error::Error;
use std::fmt::{self, Debug, Display};
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

const VERSION: &str = concat!(env!("CARGO_CRATE_NAME"), '-', env!("CARGO_PKG_VERSION"));
const STOP_VALUE_HELP: &str = "Value to search for at the target position\n\
    only used if the noun and verb are not both set";

#[derive(Parser)]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_version = VERSION)]
#[command(about = "Intcode noun/verb search", long_about = None)]
struct Args {
    #[arg(help = "The program to run")]
    source: PathBuf,
    #[arg(short, long, default_value_t = 0)]
    #[arg(help = "Position to read the result from")]
    target: i64,
    #[arg(short, long, allow_negative_numbers = true)]
    #[arg(help = "Value to write to position 1")]
    noun: Option<i64>,
    #[arg(short, long, allow_negative_numbers = true)]
    #[arg(help = "Value to write to position 2")]
    verb: Option<i64>,
    #[arg(short, long, allow_negative_numbers = true)]
    #[arg(help = STOP_VALUE_HELP.split_once("\n").unwrap().0)]
    #[arg(long_help = STOP_VALUE_HELP)]
    stop_value: Option<i64>,
    #[arg(help = "Input format for the intcode")]
    #[arg(short, long)]
    #[arg(default_value = "ascii")]
    format: CodeFormat,
    #[arg(long, help = "Fail on unknown opcodes instead of skipping them")]
    strict_opcodes: bool,
    #[arg(long, help = "Print each executed instruction to stderr (fixed mode only)")]
    trace: bool,
    #[arg(long, help = "Log level, overriding RUST_LOG")]
    log_level: Option<LevelFilter>,
}

/// What gets printed once the driver is done
#[derive(Debug)]
enum Report {
    Fixed { noun: i64, verb: i64, value: i64 },
    Found { stop_value: i64, solution: Solution },
}

impl Report {
    fn write(&self, target: i64, out: &mut impl Write) -> io::Result<()> {
        match self {
            Report::Fixed { noun, verb, value } => {
                writeln!(out, "Defined: (noun, verb) = ({noun}, {verb})")?;
                writeln!(out, "Program result at position-{target}: {value}")?;
            }
            Report::Found {
                stop_value,
                solution,
            } => {
                writeln!(
                    out,
                    "Undefined (noun, verb) -- Stop Condition: Program = {stop_value} at position-{target}"
                )?;
                writeln!(out, "Result: {solution}")?;
                writeln!(out, "100 * noun + verb = {}", solution.checksum())?;
            }
        }
        writeln!(out)
    }
}

/// Run once with `noun` and `verb`, printing each executed instruction to stderr
fn traced_run<S: MemorySource>(
    driver: &Driver<S>,
    target: i64,
    noun: i64,
    verb: i64,
) -> Result<i64, SearchError> {
    let mut interp = driver.interpreter()?;
    interp.start_trace();
    interp.seed(noun, verb)?;
    let result = interp.run().and_then(|_| interp.mem_get(target));
    if let Some(trace) = interp.end_trace() {
        for instr in trace.0 {
            eprintln!("{instr}");
        }
    }
    Ok(result?)
}

fn main() -> Result<ExitCode, DisplayedError> {
    let args = Args::parse();

    let mut logger = env_logger::Builder::from_default_env();
    if let Some(level) = args.log_level {
        logger.filter_level(level);
    }
    logger.init();

    let policy = if args.strict_opcodes {
        UnknownOpcodePolicy::Fail
    } else {
        UnknownOpcodePolicy::Ignore
    };
    let driver = Driver::new(FileSource::new(args.source, args.format))
        .target(args.target)
        .policy(policy);

    let report = match Mode::select(args.noun, args.verb, args.stop_value)? {
        Mode::Fixed { noun, verb } => {
            let value = if args.trace {
                traced_run(&driver, args.target, noun, verb)?
            } else {
                driver.execute(noun, verb)?
            };
            Report::Fixed { noun, verb, value }
        }
        Mode::Search { stop_value } => Report::Found {
            stop_value,
            solution: driver.search(stop_value)?,
        },
    };

    report.write(args.target, &mut io::stdout().lock())?;
    Ok(ExitCode::SUCCESS)
}

/// a wrapper around a [`Box`ed][Box] [dyn Error][Error] that uses its implementation of [Display]
/// for the [Debug] impl, to display the Error if returned from `main`
struct DisplayedError(Box<dyn Error>);
impl<E: Error + 'static> From<E> for DisplayedError {
    fn from(e: E) -> Self {
        Self(Box::from(e))
    }
}

impl Debug for DisplayedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.0, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use intcode::InterpreterError;

    fn written(report: Report, target: i64) -> String {
        let mut out = Vec::new();
        report.write(target, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn fixed_report() {
        let report = Report::Fixed {
            noun: 12,
            verb: 2,
            value: 3_562_672,
        };
        assert_eq!(
            written(report, 0),
            "Defined: (noun, verb) = (12, 2)\n\
             Program result at position-0: 3562672\n\n"
        );
    }

    #[test]
    fn search_report() {
        let report = Report::Found {
            stop_value: 19_690_720,
            solution: Solution { noun: 82, verb: 50 },
        };
        assert_eq!(
            written(report, 3),
            "Undefined (noun, verb) -- Stop Condition: Program = 19690720 at position-3\n\
             Result: (noun, verb) = (82, 50)\n\
             100 * noun + verb = 8250\n\n"
        );
    }

    #[test]
    fn traced_run_matches_untraced() {
        let driver = Driver::new(Snapshot::new([1, 9, 10, 3, 2, 3, 11, 0, 99, 30, 40, 50]));
        assert_eq!(traced_run(&driver, 0, 9, 10).unwrap(), 3500);
        assert_eq!(driver.execute(9, 10).unwrap(), 3500);
        assert_eq!(traced_run(&driver, 3, 9, 10).unwrap(), 70);
    }

    #[test]
    fn traced_run_reports_errors() {
        let driver = Driver::new(Snapshot::new([1, 0, 0, 0, 99]));
        assert!(matches!(
            traced_run(&driver, 0, 50, 0),
            Err(SearchError::Interpreter(InterpreterError::InvalidAddress {
                address: 50,
                len: 5
            }))
        ));
        assert!(matches!(
            traced_run(&driver, 9, 0, 0),
            Err(SearchError::Interpreter(InterpreterError::InvalidAddress {
                address: 9,
                len: 5
            }))
        ));
    }
}
