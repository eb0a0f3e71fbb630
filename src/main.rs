use std::process::ExitCode;

use clap::Parser;
use nfa_regex::{Config, Regex};

#[derive(Debug, Parser)]
#[command(name = "nfa-regex", version, about = "Match whole strings against a pattern")]
struct CliArgs {
    /// Pattern to compile
    pattern: String,

    /// Strings to match against the pattern
    inputs: Vec<String>,

    /// Print the compiled automaton
    #[arg(long)]
    graph: bool,

    /// Keep the epsilon nodes produced by compilation
    #[arg(long)]
    no_optimize: bool,

    /// Give up on an input after this many executor steps
    #[arg(long, value_name = "N")]
    max_steps: Option<usize>,
}

fn main() -> ExitCode {
    env_logger::init();
    let args = CliArgs::parse();

    let mut config = Config::default().with_optimize(!args.no_optimize);
    if let Some(max_steps) = args.max_steps {
        config = config.with_step_limit(max_steps);
    }

    let re = match Regex::with_config(&args.pattern, config) {
        Ok(re) => re,
        Err(e) => {
            println!("ERROR:{e}");
            return ExitCode::FAILURE;
        }
    };

    if args.graph {
        print!("{re}");
    }

    for input in &args.inputs {
        match re.try_accept(input) {
            Some(true) => println!("MATCH:{input}"),
            Some(false) => println!("NO_MATCH:{input}"),
            None => println!("BUDGET_EXCEEDED:{input}"),
        }
    }
    ExitCode::SUCCESS
}
