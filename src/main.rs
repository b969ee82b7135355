use std::{
    error::Error,
    io::{self, BufRead, Write},
    process::ExitCode,
};

use clap::{Parser, ValueEnum};
use log::error;
use solitaire_solver::{SearchConfig, SearchError, Solution, Solver, TablePreset};

/// Solves cross peg solitaire by meeting in the middle.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// hash table size, and with it the peg count where both halves meet
    #[arg(long, value_enum, default_value_t = Table::Large)]
    table: Table,

    /// print the whole solution without waiting for <return>
    #[arg(long)]
    no_pause: bool,

    /// threads for the join phase, one per core by default
    #[arg(long)]
    threads: Option<usize>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Table {
    /// meet at 21 pegs, 12 MB
    Large,
    /// meet at 22 pegs, 3 MB
    Small,
}

impl From<Table> for TablePreset {
    fn from(table: Table) -> Self {
        match table {
            Table::Large => TablePreset::Large,
            Table::Small => TablePreset::Small,
        }
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            if let Some(SearchError::TableFull { stats }) = err.downcast_ref::<SearchError>() {
                print!("{stats}");
            }
            error!("{err}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<(), Box<dyn Error>> {
    if let Some(threads) = args.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()?;
    }
    let mut solver = Solver::new(SearchConfig::preset(args.table.into()))?;
    let solution = solver.solve()?;
    show_solution(&solver, &solution, !args.no_pause)?;
    Ok(())
}

fn show_solution(solver: &Solver, solution: &Solution, pause: bool) -> io::Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout().lock();
    let jumps = [None].into_iter().chain(solution.jumps(solver.table()));
    writeln!(stdout, "solution:")?;
    for (state, jump) in solution.iter().zip(jumps) {
        if let Some(jump) = jump {
            writeln!(stdout, "jump {jump}")?;
        }
        writeln!(stdout, "{state}")?;
        if pause {
            write!(stdout, "<return> to continue...")?;
            stdout.flush()?;
            stdin.lock().read_line(&mut String::new())?;
        }
    }
    Ok(())
}
