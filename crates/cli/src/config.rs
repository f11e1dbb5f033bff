//! Optional JSON overrides for the library configuration.
//!
//! ```json
//! { "geometry": { "superscript_threshold": 0.45 }, "solver": { "epsilon": 1e-4 } }
//! ```
//! Missing sections and fields keep their defaults.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use slqe::api::{GeometryCfg, SolverCfg};
use std::fs;
use std::path::Path;

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunCfg {
    pub geometry: GeometryCfg,
    pub solver: SolverCfg,
}

impl RunCfg {
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
        let cfg: Self =
            serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))?;
        cfg.solver
            .validate()
            .with_context(|| format!("invalid solver section in {}", path.display()))?;
        tracing::debug!(path = %path.display(), ?cfg, "config");
        Ok(cfg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn partial_overrides_keep_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("cfg.json");
        fs::write(&path, r#"{"solver": {"epsilon": 0.0001}}"#).unwrap();
        let cfg = RunCfg::load(Some(&path)).unwrap();
        assert_eq!(cfg.solver.epsilon, 1e-4);
        assert_eq!(cfg.solver.max_degree, SolverCfg::default().max_degree);
        assert_eq!(cfg.geometry, GeometryCfg::default());
    }

    #[test]
    fn epsilon_outside_unit_interval_is_rejected() {
        let dir = tempdir().unwrap();
        for eps in ["0", "-0.001", "1.5"] {
            let path = dir.path().join(format!("eps{eps}.json"));
            fs::write(&path, format!(r#"{{"solver": {{"epsilon": {eps}}}}}"#)).unwrap();
            assert!(RunCfg::load(Some(&path)).is_err(), "epsilon {eps}");
        }
    }

    #[test]
    fn no_path_means_defaults() {
        assert_eq!(RunCfg::load(None).unwrap(), RunCfg::default());
    }
}
