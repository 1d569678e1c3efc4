use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process::exit;
use std::time::Duration;

use anyhow::Context;
use clap::Parser as ArgParser;
use walkdir::WalkDir;

use glint::dimacs::{self, write_result};
use glint::search::Verdict;
use glint::solver::Solver;

/// DPLL SAT solver for DIMACS CNF files.
#[derive(ArgParser)]
#[command(name = "glint", version, about)]
struct Args {
    /// Input CNF file, or a directory to scan for `.cnf` files.
    path: PathBuf,

    /// Wall clock limit per instance in seconds.
    #[arg(long)]
    timeout: Option<f64>,

    /// Do not write `.res` result files next to the inputs.
    #[arg(long)]
    no_results: bool,
}

fn main() {
    tracing_subscriber::fmt()
        .with_timer(tracing_subscriber::fmt::time::uptime())
        .with_writer(std::io::stderr)
        .with_env_filter(tracing_subscriber::EnvFilter::new(
            std::env::var("GLINT_LOG").as_deref().unwrap_or("info"),
        ))
        .init();

    let args = Args::parse();
    match run(&args) {
        Ok(code) => exit(code),
        Err(err) => {
            eprintln!("error: {:#}", err);
            exit(1);
        }
    }
}

fn run(args: &Args) -> anyhow::Result<i32> {
    let timeout = args.timeout.map(Duration::from_secs_f64);
    if args.path.is_dir() {
        run_directory(args, timeout)
    } else {
        let verdict = run_instance(&args.path, timeout, !args.no_results)?;
        println!("{}", verdict);
        // The exit codes minisat established: 10 satisfiable, 20
        // unsatisfiable, 0 undetermined.
        Ok(match verdict {
            Verdict::Sat => 10,
            Verdict::Unsat => 20,
            Verdict::Timeout => 0,
        })
    }
}

/// Runs every `.cnf` file below the given directory and reports a tally.
fn run_directory(args: &Args, timeout: Option<Duration>) -> anyhow::Result<i32> {
    let mut instances: Vec<PathBuf> = WalkDir::new(&args.path)
        .follow_links(true)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| path.extension().map_or(false, |ext| ext == "cnf"))
        .collect();
    instances.sort();

    if instances.is_empty() {
        anyhow::bail!("no .cnf files under {}", args.path.display());
    }

    let mut tally = Tally::default();
    for path in &instances {
        let verdict = run_instance(path, timeout, !args.no_results)?;
        tally.count(verdict);
    }
    tracing::info!(
        instances = instances.len(),
        sat = tally.sat,
        unsat = tally.unsat,
        timeout = tally.timeout,
        "all instances finished"
    );
    Ok(0)
}

/// Parses and solves one instance, logging the outcome and writing the
/// result file when requested.
fn run_instance(
    path: &Path,
    timeout: Option<Duration>,
    write_results: bool,
) -> anyhow::Result<Verdict> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let mut parser = dimacs::Parser::new(BufReader::new(file));

    let mut solver = Solver::default();
    let header = parser
        .header()
        .with_context(|| format!("parsing {}", path.display()))?;
    solver.set_var_count(header.var_count);
    while let Some(clause) = parser
        .next_clause()
        .with_context(|| format!("parsing {}", path.display()))?
    {
        solver.add_clause(clause);
    }

    let (verdict, elapsed) = solver.solve(timeout);

    let stats = &solver.search.stats;
    match elapsed {
        Some(elapsed) => tracing::info!(
            instance = %path.display(),
            %verdict,
            ?elapsed,
            decisions = stats.decisions,
            conflicts = stats.conflicts,
            propagations = stats.propagations,
        ),
        // No result file is produced for a timeout.
        None => tracing::warn!(instance = %path.display(), %verdict, "deadline exceeded"),
    }

    if write_results && verdict != Verdict::Timeout {
        let result_path = path.with_extension("res");
        let file = File::create(&result_path)
            .with_context(|| format!("creating {}", result_path.display()))?;
        let mut writer = BufWriter::new(file);
        write_result(&mut writer, &solver.search.formula, verdict)
            .and_then(|()| writer.flush())
            .with_context(|| format!("writing {}", result_path.display()))?;
    }

    Ok(verdict)
}

/// Verdict counts over a directory run.
#[derive(Default)]
struct Tally {
    sat: u32,
    unsat: u32,
    timeout: u32,
}

impl Tally {
    fn count(&mut self, verdict: Verdict) {
        match verdict {
            Verdict::Sat => self.sat += 1,
            Verdict::Unsat => self.unsat += 1,
            Verdict::Timeout => self.timeout += 1,
        }
    }
}
