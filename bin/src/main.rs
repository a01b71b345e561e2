use std::{
    io::{stdin, stdout, BufRead, Write},
    path::PathBuf,
    process::ExitCode,
};

use anyhow::Context;
use clap::Parser;

use diagnostics::Diagnostics;

// Exit codes from sysexits.h
const EX_USAGE: u8 = 64;
const EX_DATAERR: u8 = 65;
const EX_SOFTWARE: u8 = 70;

/// Evaluates expressions from a script, or from an interactive prompt.
#[derive(clap::Parser)]
#[command(version)]
struct Args {
    /// Script to run as a single unit. Starts a prompt when omitted.
    script: Option<PathBuf>,

    /// Print the scanned tokens instead of evaluating.
    #[arg(long)]
    tokens: bool,

    /// Print the parsed syntax tree instead of evaluating.
    #[arg(long, conflicts_with = "tokens")]
    ast: bool,
}

#[derive(Debug, Clone, Copy)]
enum Mode {
    Evaluate,
    Tokens,
    Ast,
}

impl From<&Args> for Mode {
    fn from(args: &Args) -> Self {
        if args.tokens {
            Mode::Tokens
        } else if args.ast {
            Mode::Ast
        } else {
            Mode::Evaluate
        }
    }
}

fn run(source: &str, mode: Mode, output: &mut impl Write) -> anyhow::Result<Diagnostics> {
    let mut diagnostics = Diagnostics::new();

    match mode {
        Mode::Evaluate => interpreter::run_source(source, output, &mut diagnostics)?,
        Mode::Tokens => {
            for token in scanner::lex(source, &mut diagnostics) {
                writeln!(output, "{}", token)?;
            }
        }
        Mode::Ast => {
            let tokens = scanner::lex(source, &mut diagnostics);
            let stmt = parser::Parser::new(tokens).parse_statement(&mut diagnostics);
            if let Some(stmt) = stmt.filter(|_| !diagnostics.had_error()) {
                writeln!(output, "{}", stmt)?;
            }
        }
    }

    if !diagnostics.is_empty() {
        eprintln!("{}", diagnostics);
    }
    Ok(diagnostics)
}

fn run_file(path: PathBuf, mode: Mode) -> anyhow::Result<ExitCode> {
    log::debug!("Running {}", path.display());
    let source = std::fs::read_to_string(&path)
        .with_context(|| format!("Could not read {}", path.display()))?;

    let diagnostics = run(&source, mode, &mut stdout())?;

    Ok(if diagnostics.had_error() {
        ExitCode::from(EX_DATAERR)
    } else if diagnostics.had_runtime_error() {
        ExitCode::from(EX_SOFTWARE)
    } else {
        ExitCode::SUCCESS
    })
}

fn run_prompt(mode: Mode) -> anyhow::Result<ExitCode> {
    let mut lines = stdin().lock().lines();

    loop {
        print!("> ");
        stdout().flush()?;

        // An empty line or the end of input closes the session
        let line = match lines.next() {
            Some(line) => line?,
            None => break,
        };
        if line.is_empty() {
            break;
        }

        // Errors are already printed, the session just goes on
        run(&line, mode, &mut stdout())?;
    }

    Ok(ExitCode::SUCCESS)
}

fn main() -> anyhow::Result<ExitCode> {
    env_logger::init();

    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            e.print()?;
            return Ok(if e.use_stderr() { ExitCode::from(EX_USAGE) } else { ExitCode::SUCCESS });
        }
    };

    let mode = Mode::from(&args);
    match args.script {
        Some(script) => run_file(script, mode),
        None => run_prompt(mode),
    }
}
