use std::cell::Cell;

use memoise_core::{ArgKey, CacheSnapshot, CacheStats, FallibleMemoized, KeyStrategy};
use serde::Serialize;
use serde_json::Value;

use crate::cli::args::{CallArgs, CallFunc};
use crate::cli::helpers::{print_json, resolve_config};
use crate::exit_codes;

#[derive(Debug, Serialize)]
pub struct CallRecord {
    pub args: Vec<ArgKey>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CallReport {
    pub func: String,
    pub strategy: KeyStrategy,
    pub calls: Vec<CallRecord>,
    pub inner_calls: u32,
    pub stats: CacheStats,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snapshot: Option<CacheSnapshot>,
}

pub fn cmd_call(args: CallArgs) -> anyhow::Result<i32> {
    let cfg = resolve_config(&args.cache)?;

    let lists: Vec<Vec<Value>> = match serde_json::from_str(&args.args) {
        Ok(lists) => lists,
        Err(e) => {
            eprintln!("error: --args must be a JSON array of argument arrays: {}", e);
            return Ok(exit_codes::INVALID_INPUT);
        }
    };
    let mut keyed = Vec::with_capacity(lists.len());
    for (i, list) in lists.iter().enumerate() {
        match ArgKey::from_json_args(list) {
            Ok(keys) => keyed.push(keys),
            Err(e) => {
                eprintln!("error: call {}: {}", i, e);
                return Ok(exit_codes::INVALID_INPUT);
            }
        }
    }

    let func = args.func;
    let inner_calls = Cell::new(0u32);
    let mut memo = FallibleMemoized::from_config(
        |a: &[ArgKey]| {
            inner_calls.set(inner_calls.get() + 1);
            apply(func, a)
        },
        &cfg,
    );

    let mut failed = false;
    let mut records = Vec::with_capacity(keyed.len());
    for keys in keyed {
        let record = match memo.call(&keys) {
            Ok(value) => CallRecord {
                args: keys,
                result: Some(value),
                error: None,
            },
            Err(e) => {
                tracing::warn!(error = %e, "wrapped function failed");
                failed = true;
                CallRecord {
                    args: keys,
                    result: None,
                    error: Some(e),
                }
            }
        };
        records.push(record);
    }

    let report = CallReport {
        func: format!("{:?}", func).to_lowercase(),
        strategy: cfg.strategy,
        calls: records,
        inner_calls: inner_calls.get(),
        stats: memo.stats(),
        snapshot: args.cache.dump_cache.then(|| memo.snapshot()),
    };

    if args.cache.json {
        print_json(&report)?;
    } else {
        print_text(&report);
    }

    Ok(if failed {
        exit_codes::INVALID_INPUT
    } else {
        exit_codes::SUCCESS
    })
}

fn numbers(name: &str, args: &[ArgKey]) -> Result<Vec<f64>, String> {
    args.iter()
        .enumerate()
        .map(|(i, a)| {
            a.as_f64()
                .ok_or_else(|| format!("{}: argument {} is not a number", name, i))
        })
        .collect()
}

/// The functions offered by `memoise call`.
pub(crate) fn apply(func: CallFunc, args: &[ArgKey]) -> Result<Value, String> {
    match func {
        CallFunc::Sum => {
            let ints: Option<Vec<i64>> = args
                .iter()
                .map(|a| match a {
                    ArgKey::Int(i) => Some(*i),
                    _ => None,
                })
                .collect();
            if let Some(ints) = ints {
                return ints
                    .iter()
                    .try_fold(0i64, |acc, x| acc.checked_add(*x))
                    .map(Value::from)
                    .ok_or_else(|| "sum: integer overflow".to_string());
            }
            Ok(Value::from(numbers("sum", args)?.iter().sum::<f64>()))
        }
        CallFunc::Min | CallFunc::Max => {
            let name = if func == CallFunc::Min { "min" } else { "max" };
            let values = numbers(name, args)?;
            let best = values
                .iter()
                .enumerate()
                .reduce(|best, cur| {
                    let better = if func == CallFunc::Min {
                        cur.1 < best.1
                    } else {
                        cur.1 > best.1
                    };
                    if better {
                        cur
                    } else {
                        best
                    }
                })
                .map(|(i, _)| args[i].to_json());
            Ok(best.unwrap_or(Value::Null))
        }
        CallFunc::Concat => Ok(Value::String(
            args.iter()
                .map(|a| match a {
                    ArgKey::Str(s) => s.clone(),
                    other => other.to_json().to_string(),
                })
                .collect(),
        )),
        CallFunc::Count => Ok(Value::from(args.len())),
    }
}

fn print_text(report: &CallReport) {
    for record in &report.calls {
        let args: Vec<String> = record.args.iter().map(ToString::to_string).collect();
        match (&record.result, &record.error) {
            (Some(value), _) => println!("{}({}) = {}", report.func, args.join(", "), value),
            (None, Some(err)) => println!("{}({}) failed: {}", report.func, args.join(", "), err),
            (None, None) => {}
        }
    }
    println!(
        "inner calls: {} (hits {}, misses {}, entries {}, strategy {:?})",
        report.inner_calls,
        report.stats.hits,
        report.stats.misses,
        report.stats.entries,
        report.strategy
    );
    if let Some(snapshot) = &report.snapshot {
        for entry in &snapshot.entries {
            println!("  ({}) -> {}", entry.args.join(", "), entry.value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn keys(v: Value) -> Vec<ArgKey> {
        ArgKey::from_json_args(v.as_array().unwrap()).unwrap()
    }

    #[test]
    fn sum_stays_integral() {
        assert_eq!(apply(CallFunc::Sum, &keys(json!([2, 2]))), Ok(json!(4)));
        assert_eq!(apply(CallFunc::Sum, &keys(json!([1, 0.5]))), Ok(json!(1.5)));
        assert_eq!(apply(CallFunc::Sum, &[]), Ok(json!(0)));
    }

    #[test]
    fn sum_rejects_text() {
        assert_eq!(
            apply(CallFunc::Sum, &keys(json!([1, "x"]))),
            Err("sum: argument 1 is not a number".to_string())
        );
    }

    #[test]
    fn min_max_return_original_argument() {
        let args = keys(json!([3, -1, 2.5]));
        assert_eq!(apply(CallFunc::Min, &args), Ok(json!(-1)));
        assert_eq!(apply(CallFunc::Max, &args), Ok(json!(3)));
        assert_eq!(apply(CallFunc::Min, &[]), Ok(Value::Null));
    }

    #[test]
    fn concat_and_count() {
        let args = keys(json!(["a", 1, null, true]));
        assert_eq!(apply(CallFunc::Concat, &args), Ok(json!("a1nulltrue")));
        assert_eq!(apply(CallFunc::Count, &args), Ok(json!(4)));
    }
}
