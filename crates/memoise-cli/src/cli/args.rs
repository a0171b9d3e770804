use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "memoise",
    version,
    about = "Memoize deterministic functions by argument sequence and inspect the cache"
)]
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run a built-in workload twice and compare computed vs memoised timings
    Demo(DemoArgs),
    /// Run JSON argument lists through one memoised function
    Call(CallArgs),
}

/// Flags shared by every command that builds a wrapper.
#[derive(Parser, Clone, Debug)]
pub struct CacheArgs {
    /// Path to memoise.yaml
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Key strategy: flat | trie (overrides config and MEMOISE_STRATEGY)
    #[arg(long)]
    pub strategy: Option<String>,

    /// Include a snapshot of the cache contents in the output
    #[arg(long)]
    pub dump_cache: bool,

    /// Print machine-readable JSON instead of text
    #[arg(long)]
    pub json: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Workload {
    /// Zero-argument function returning 10
    Constant,
    /// a + b over (2,2), (2,2), (1,2)
    Sum,
    /// n! as a float
    Factorial,
    /// Naive recursive fibonacci
    Fibonacci,
    /// Minimum of N arguments, the first being -1
    Min,
    /// a + b over the full N x N grid
    Grid,
}

#[derive(Parser, Clone, Debug)]
pub struct DemoArgs {
    #[arg(value_enum)]
    pub workload: Workload,

    /// Workload size (factorial/fibonacci input, min argument count, grid side)
    #[arg(long, value_parser = clap::value_parser!(u64).range(0..=10_000))]
    pub n: Option<u64>,

    /// Number of memoised passes after the first
    #[arg(long, default_value_t = 1)]
    pub repeat: u32,

    /// Seed for generated arguments (min workload)
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    #[command(flatten)]
    pub cache: CacheArgs,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum CallFunc {
    /// Sum of numeric arguments
    Sum,
    /// Smallest numeric argument
    Min,
    /// Largest numeric argument
    Max,
    /// Concatenation of all arguments as text
    Concat,
    /// Number of arguments
    Count,
}

#[derive(Parser, Clone, Debug)]
pub struct CallArgs {
    #[arg(long, value_enum)]
    pub func: CallFunc,

    /// JSON array of argument lists, e.g. '[[2,2],[2,2],[1,2]]'
    #[arg(long)]
    pub args: String,

    #[command(flatten)]
    pub cache: CacheArgs,
}
