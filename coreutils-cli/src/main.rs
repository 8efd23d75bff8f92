//! Multi-call front end: one binary, one subcommand per engine, each
//! exiting with that engine's own exit-code convention.

use std::io::{self, Write};
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use coreutils_factor::FactorOpts;
use coreutils_od::OdOpts;
use coreutils_sort::SortOpts;

#[derive(Debug, Parser)]
#[command(name = "coreutils", about = "sort / factor / od, one binary")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    Sort(SortOpts),
    Factor(FactorOpts),
    Od(OdOpts),
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let mut argv: Vec<String> = std::env::args().collect();
    if argv.len() > 2 && argv[1] == "sort" {
        match coreutils_sort::rewrite_legacy_args(&argv[2..]) {
            Ok(rewritten) => {
                argv.truncate(2);
                argv.extend(rewritten);
            }
            Err(e) => return report(e.exit_code(), &e),
        }
    }

    let cli = Cli::parse_from(argv);
    match cli.command {
        Command::Sort(opts) => run_sort(opts),
        Command::Factor(opts) => run_factor(opts),
        Command::Od(opts) => run_od(opts),
    }
}

fn run_sort(opts: SortOpts) -> ExitCode {
    let config = match opts.to_config() {
        Ok(c) => c,
        Err(e) => return report(e.exit_code(), &e),
    };
    let engine = coreutils_sort::SortEngine::new(config);
    let stdout = io::stdout();
    let mut out = stdout.lock();
    match engine.run(&opts.files, &mut out) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => report(e.exit_code(), &e),
    }
}

fn run_factor(opts: FactorOpts) -> ExitCode {
    let config = opts.to_config();
    let engine = coreutils_factor::FactorEngine::new(config);
    let stdout = io::stdout();
    let mut out = stdout.lock();

    let result = if opts.numbers.is_empty() {
        let mut input = String::new();
        if let Err(e) = io::stdin().read_line(&mut input) {
            return report(2, &e);
        }
        engine.run_stream(&input, &mut out)
    } else {
        let mut ok = Ok(());
        for n in &opts.numbers {
            if let Err(e) = engine.print_factors(n, &mut out) {
                ok = Err(e);
            }
        }
        ok
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => report(e.exit_code(), &e),
    }
}

fn run_od(opts: OdOpts) -> ExitCode {
    let config = match opts.to_config() {
        Ok(c) => c,
        Err(e) => return report(e.exit_code(), &e),
    };
    let engine = coreutils_od::OdEngine::new(config);
    let stdout = io::stdout();
    let mut out = stdout.lock();

    let result = match &opts.file {
        Some(path) if path.as_os_str() != "-" => {
            std::fs::File::open(path).map_err(coreutils_od::OdError::from).and_then(|f| engine.run(f, &mut out))
        }
        _ => engine.run(io::stdin(), &mut out),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => report(e.exit_code(), &e),
    }
}

fn report(code: i32, err: &dyn std::fmt::Display) -> ExitCode {
    tracing::error!("{err}");
    let _ = writeln!(io::stderr(), "coreutils: {err}");
    ExitCode::from(code as u8)
}
