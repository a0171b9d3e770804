use anyhow::Context;
use memoise_core::{load_config, MemoConfig};

use super::args::CacheArgs;

/// Config file, then `MEMOISE_STRATEGY`, then `--strategy`. The environment
/// is not read when the flag is given.
pub fn resolve_config(args: &CacheArgs) -> anyhow::Result<MemoConfig> {
    let base = match &args.config {
        Some(path) => load_config(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => MemoConfig::default(),
    };
    let cfg = match args.strategy.as_deref() {
        Some(flag) => base.with_strategy_override(Some(flag))?,
        None => base.apply_env()?,
    };
    tracing::debug!(strategy = ?cfg.strategy, trace_snapshots = cfg.trace_snapshots, "resolved config");
    Ok(cfg)
}

pub fn print_json(value: &impl serde::Serialize) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use memoise_core::KeyStrategy;
    use std::io::Write;

    fn cache_args(config: Option<std::path::PathBuf>, strategy: Option<&str>) -> CacheArgs {
        CacheArgs {
            config,
            strategy: strategy.map(str::to_string),
            dump_cache: false,
            json: false,
        }
    }

    #[test]
    fn flag_overrides_file() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        writeln!(f, "version: 1\nstrategy: flat").unwrap();
        let cfg = resolve_config(&cache_args(Some(f.path().to_path_buf()), Some("trie"))).unwrap();
        assert_eq!(cfg.strategy, KeyStrategy::Trie);
    }

    #[test]
    fn bad_config_reports_path() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        writeln!(f, "version: 7").unwrap();
        let err = resolve_config(&cache_args(Some(f.path().to_path_buf()), None)).unwrap_err();
        assert!(format!("{err:#}").contains("unsupported config version 7"));
    }
}
