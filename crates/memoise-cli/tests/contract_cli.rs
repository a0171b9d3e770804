#![allow(deprecated)]
use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use tempfile::tempdir;

fn memoise() -> Command {
    let mut cmd = Command::cargo_bin("memoise").unwrap();
    cmd.env_remove("MEMOISE_STRATEGY").env("RUST_LOG", "error");
    cmd
}

fn stdout_json(cmd: &mut Command) -> Value {
    let output = cmd.output().unwrap();
    assert!(
        output.status.success(),
        "command failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("stdout must be JSON")
}

#[test]
fn demo_sum_invokes_inner_twice() {
    let v = stdout_json(memoise().args(["demo", "sum", "--json"]));
    assert_eq!(v["results"], serde_json::json!([4, 4, 3]));
    assert_eq!(v["inner_calls"], 2);
    assert_eq!(v["strategy"], "flat");
    assert!(v.get("snapshot").is_none());
}

#[test]
fn demo_grid_with_trie_and_snapshot() {
    let v = stdout_json(memoise().args([
        "demo",
        "grid",
        "--strategy",
        "trie",
        "--dump-cache",
        "--json",
    ]));
    assert_eq!(v["inner_calls"], 25);
    assert_eq!(v["strategy"], "trie");
    assert_eq!(v["snapshot"]["entries"].as_array().unwrap().len(), 25);
}

#[test]
fn demo_constant_text_output() {
    memoise()
        .args(["demo", "constant", "--repeat", "3"])
        .assert()
        .success()
        .stdout(predicate::str::contains("results: 10"))
        .stdout(predicate::str::contains("inner calls: 1"));
}

#[test]
fn call_sum_counts_distinct_lists() {
    let v = stdout_json(memoise().args([
        "call",
        "--func",
        "sum",
        "--args",
        "[[2,2],[2,2],[1,2]]",
        "--json",
    ]));
    assert_eq!(v["inner_calls"], 2);
    assert_eq!(v["stats"]["hits"], 1);
    assert_eq!(v["calls"][2]["result"], 3);
}

#[test]
fn call_failure_is_not_cached() {
    let output = memoise()
        .args(["call", "--func", "sum", "--args", r#"[["a"],["a"]]"#, "--json"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));
    let v: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(v["inner_calls"], 2);
    assert_eq!(v["stats"]["entries"], 0);
    assert_eq!(v["calls"][1]["error"], "sum: argument 0 is not a number");
}

#[test]
fn call_rejects_unhashable_argument() {
    memoise()
        .args(["call", "--func", "count", "--args", "[[1,[2]]]"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains(
            "argument 1 is not usable as a cache key: array",
        ));
}

#[test]
fn call_rejects_malformed_json() {
    memoise()
        .args(["call", "--func", "count", "--args", "[1,2]"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("JSON array of argument arrays"));
}

#[test]
fn config_file_and_version_gate() {
    let dir = tempdir().unwrap();
    let good = dir.path().join("memoise.yaml");
    fs::write(&good, "version: 1\nstrategy: trie\n").unwrap();
    let v = stdout_json(memoise().args(["demo", "sum", "--json", "--config"]).arg(&good));
    assert_eq!(v["strategy"], "trie");

    let bad = dir.path().join("bad.yaml");
    fs::write(&bad, "version: 3\n").unwrap();
    memoise()
        .args(["demo", "sum", "--config"])
        .arg(&bad)
        .assert()
        .code(2)
        .stderr(predicate::str::contains("unsupported config version 3"));
}

#[test]
fn env_strategy_override() {
    let v = stdout_json(
        memoise()
            .env("MEMOISE_STRATEGY", "trie")
            .args(["demo", "constant", "--json"]),
    );
    assert_eq!(v["strategy"], "trie");
}

#[test]
fn strategy_flag_wins_over_invalid_env() {
    let v = stdout_json(
        memoise()
            .env("MEMOISE_STRATEGY", "bogus")
            .args(["demo", "sum", "--strategy", "trie", "--json"]),
    );
    assert_eq!(v["strategy"], "trie");
    assert_eq!(v["inner_calls"], 2);
}

#[test]
fn demo_size_out_of_range_rejected() {
    memoise()
        .args(["demo", "grid", "--n", "100000"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--n"));

    memoise()
        .args(["demo", "fibonacci", "--n", "93"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("too large"));
}

#[test]
fn demo_fibonacci_small_n() {
    let v = stdout_json(memoise().args(["demo", "fibonacci", "--n", "10", "--json"]));
    assert_eq!(v["results"], serde_json::json!([89]));
    assert_eq!(v["inner_calls"], 1);
}
