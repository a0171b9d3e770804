use std::cell::Cell;
use std::time::Instant;

use memoise_core::{CacheSnapshot, CacheStats, KeyStrategy, MemoConfig, Memoized};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use serde_json::Value;

use crate::cli::args::{DemoArgs, Workload};
use crate::cli::helpers::{print_json, resolve_config};
use crate::exit_codes;

#[derive(Debug, Serialize)]
pub struct DemoReport {
    pub workload: String,
    pub strategy: KeyStrategy,
    /// Results of the first pass, one per argument list.
    pub results: Vec<Value>,
    /// How often the wrapped function actually ran.
    pub inner_calls: u32,
    pub computed_us: u64,
    pub memoised_us: u64,
    pub repeat: u32,
    pub stats: CacheStats,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snapshot: Option<CacheSnapshot>,
}

pub fn cmd_demo(args: DemoArgs) -> anyhow::Result<i32> {
    let cfg = resolve_config(&args.cache)?;
    if let Some(n) = args.n {
        let max = max_size(args.workload);
        if n > max {
            eprintln!(
                "error: --n {} is too large for {:?} (max {})",
                n, args.workload, max
            );
            return Ok(exit_codes::INVALID_INPUT);
        }
    }
    let plan = plan(args.workload, args.n, args.seed);
    let report = run_workload(args.workload, &plan, args.repeat, &cfg, args.cache.dump_cache);

    if args.cache.json {
        print_json(&report)?;
    } else {
        print_text(&report);
    }
    Ok(exit_codes::SUCCESS)
}

/// Largest `--n` each workload accepts. Fibonacci is the naive recursion and
/// overflows `u64` past 92; the grid grows quadratically.
pub(crate) fn max_size(workload: Workload) -> u64 {
    match workload {
        Workload::Fibonacci => 40,
        Workload::Factorial => 170,
        Workload::Grid => 100,
        Workload::Constant | Workload::Sum | Workload::Min => 10_000,
    }
}

/// Argument lists fed to the wrapper, in call order.
pub(crate) fn plan(workload: Workload, n: Option<u64>, seed: u64) -> Vec<Vec<i64>> {
    match workload {
        Workload::Constant => vec![vec![]],
        Workload::Sum => vec![vec![2, 2], vec![2, 2], vec![1, 2]],
        Workload::Factorial => vec![vec![n.unwrap_or(100) as i64]],
        Workload::Fibonacci => vec![vec![n.unwrap_or(32) as i64]],
        Workload::Min => {
            let count = n.unwrap_or(100).max(1);
            let mut rng = StdRng::seed_from_u64(seed);
            let mut args = vec![-1];
            args.extend((1..count).map(|_| rng.gen_range(1..=100)));
            vec![args]
        }
        Workload::Grid => {
            let side = n.unwrap_or(5) as i64;
            (0..side)
                .flat_map(|i| (0..side).map(move |j| vec![i, j]))
                .collect()
        }
    }
}

pub(crate) fn compute(workload: Workload, args: &[i64]) -> Value {
    let first = args.first().copied().unwrap_or(0);
    match workload {
        Workload::Constant => Value::from(10),
        Workload::Sum | Workload::Grid => Value::from(args.iter().sum::<i64>()),
        Workload::Factorial => Value::from(factorial(first)),
        Workload::Fibonacci => Value::from(fibonacci(first)),
        Workload::Min => args
            .iter()
            .copied()
            .min()
            .map(Value::from)
            .unwrap_or(Value::Null),
    }
}

fn factorial(n: i64) -> f64 {
    (2..=n).fold(1.0, |acc, k| acc * k as f64)
}

fn fibonacci(n: i64) -> u64 {
    if n <= 1 {
        1
    } else {
        fibonacci(n - 1) + fibonacci(n - 2)
    }
}

fn run_workload(
    workload: Workload,
    plan: &[Vec<i64>],
    repeat: u32,
    cfg: &MemoConfig,
    dump_cache: bool,
) -> DemoReport {
    let calls = Cell::new(0u32);
    let mut memo = Memoized::from_config(
        |args: &[i64]| {
            calls.set(calls.get() + 1);
            compute(workload, args)
        },
        cfg,
    );

    let start = Instant::now();
    let results: Vec<Value> = plan.iter().map(|args| memo.call(args)).collect();
    let computed = start.elapsed();

    let start = Instant::now();
    for _ in 0..repeat {
        for args in plan {
            memo.call(args);
        }
    }
    let memoised = start.elapsed();

    tracing::debug!(
        workload = ?workload,
        inner_calls = calls.get(),
        computed_us = computed.as_micros() as u64,
        memoised_us = memoised.as_micros() as u64,
        "demo finished"
    );

    DemoReport {
        workload: format!("{:?}", workload).to_lowercase(),
        strategy: cfg.strategy,
        results,
        inner_calls: calls.get(),
        computed_us: computed.as_micros() as u64,
        memoised_us: memoised.as_micros() as u64,
        repeat,
        stats: memo.stats(),
        snapshot: dump_cache.then(|| memo.snapshot()),
    }
}

fn print_text(report: &DemoReport) {
    let results: Vec<String> = report.results.iter().map(Value::to_string).collect();
    println!(
        "workload: {} (strategy: {:?})",
        report.workload, report.strategy
    );
    println!("results: {}", results.join(", "));
    println!(
        "inner calls: {} (hits {}, misses {}, entries {})",
        report.inner_calls, report.stats.hits, report.stats.misses, report.stats.entries
    );
    println!("computed: {}us", report.computed_us);
    println!("memoised (x{}): {}us", report.repeat, report.memoised_us);
    if let Some(snapshot) = &report.snapshot {
        println!("cache:");
        for entry in &snapshot.entries {
            println!("  ({}) -> {}", entry.args.join(", "), entry.value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sum_plan_calls_inner_twice() {
        let plan = plan(Workload::Sum, None, 0);
        let report = run_workload(Workload::Sum, &plan, 3, &MemoConfig::default(), false);
        assert_eq!(
            report.results,
            vec![Value::from(4), Value::from(4), Value::from(3)]
        );
        assert_eq!(report.inner_calls, 2);
        assert_eq!(report.stats.hits, 1 + 3 * 3);
        assert!(report.snapshot.is_none());
    }

    #[test]
    fn grid_plan_is_n_squared() {
        let plan = plan(Workload::Grid, Some(5), 0);
        assert_eq!(plan.len(), 25);
        let report = run_workload(Workload::Grid, &plan, 1, &MemoConfig::default(), true);
        assert_eq!(report.inner_calls, 25);
        assert_eq!(report.snapshot.map(|s| s.len()), Some(25));
    }

    #[test]
    fn min_plan_is_seeded() {
        let a = plan(Workload::Min, Some(100), 7);
        let b = plan(Workload::Min, Some(100), 7);
        assert_eq!(a, b);
        assert_eq!(a[0].len(), 100);
        assert_eq!(compute(Workload::Min, &a[0]), Value::from(-1));
    }

    #[test]
    fn constant_is_zero_arity() {
        assert_eq!(plan(Workload::Constant, None, 0), vec![Vec::<i64>::new()]);
        let report = run_workload(
            Workload::Constant,
            &[vec![]],
            4,
            &MemoConfig::default(),
            false,
        );
        assert_eq!(report.results, vec![Value::from(10)]);
        assert_eq!(report.inner_calls, 1);
    }

    #[test]
    fn factorial_matches_reference() {
        let v = compute(Workload::Factorial, &[100]).as_f64().unwrap();
        assert!((v / 9.33262154439441e157 - 1.0).abs() < 1e-12);
        assert_eq!(compute(Workload::Fibonacci, &[10]), Value::from(89u64));
    }
}
