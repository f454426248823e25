//! Environment-driven config lookup. Mutates process-wide environment
//! variables, so this binary holds a single test.

use std::ffi::OsString;
use std::fs;
use std::path::PathBuf;
use triage_rota_core::config::{CONFIG_ENV_VAR, OUTPUT_DIR_ENV_VAR};
use triage_rota_core::RotaConfig;

struct EnvGuard {
    saved: Vec<(&'static str, Option<OsString>)>,
}

impl EnvGuard {
    fn capture(keys: &[&'static str]) -> Self {
        Self {
            saved: keys.iter().map(|key| (*key, std::env::var_os(key))).collect(),
        }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        for (key, value) in &self.saved {
            match value {
                Some(value) => std::env::set_var(key, value),
                None => std::env::remove_var(key),
            }
        }
    }
}

#[test]
fn env_selects_config_file_and_overrides_output_dir() {
    let _guard = EnvGuard::capture(&[CONFIG_ENV_VAR, OUTPUT_DIR_ENV_VAR]);
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("from-env.yaml");
    fs::write(&path, "roster:\n  alice: {}\n  bob: {}\npaths:\n  output_dir: site\n").unwrap();

    std::env::set_var(CONFIG_ENV_VAR, &path);
    std::env::remove_var(OUTPUT_DIR_ENV_VAR);
    let config = RotaConfig::load(None).unwrap();
    assert_eq!(config.roster.names(), vec!["alice", "bob"]);
    assert_eq!(config.base_dir, dir.path());
    assert_eq!(config.paths().output_dir, dir.path().join("site"));

    // Relative override is taken as given, relative to the working directory.
    std::env::set_var(OUTPUT_DIR_ENV_VAR, "deploy/out");
    let paths = RotaConfig::load(None).unwrap().paths();
    assert_eq!(paths.output_dir, PathBuf::from("deploy/out"));
    assert_eq!(paths.snapshot, PathBuf::from("deploy/out/triage.json"));
    assert_eq!(paths.calendar, PathBuf::from("deploy/out/triage.ics"));
    assert_eq!(paths.history, dir.path().join("history.json"));

    let absolute = tempfile::tempdir().unwrap();
    std::env::set_var(OUTPUT_DIR_ENV_VAR, absolute.path());
    let paths = RotaConfig::load(None).unwrap().paths();
    assert_eq!(paths.output_dir, absolute.path());

    std::env::set_var(OUTPUT_DIR_ENV_VAR, "");
    let paths = RotaConfig::load(None).unwrap().paths();
    assert_eq!(paths.output_dir, dir.path().join("site"));

    // An explicit path still wins over the environment.
    let explicit = dir.path().join("explicit.yaml");
    fs::write(&explicit, "roster:\n  carol: {}\n").unwrap();
    let config = RotaConfig::load(Some(&explicit)).unwrap();
    assert_eq!(config.roster.names(), vec!["carol"]);
}
