// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
#![allow(clippy::unwrap_used, clippy::expect_used)]
//! Filesystem store behaviour against a scratch directory.

use ripple_app_core::config::{ConfigError, ConfigService, ConfigStore};
use ripple_app_core::config_port::{ConfigPort, RIPPLE_CONFIG_KEY};
use ripple_app_core::prefs::RippleConfig;
use ripple_config_fs::FsConfigStore;

#[test]
fn missing_file_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let store = FsConfigStore::with_base(dir.path()).unwrap();
    assert!(matches!(store.load_raw("nope"), Err(ConfigError::NotFound)));
}

#[test]
fn with_base_creates_nested_directories() {
    let dir = tempfile::tempdir().unwrap();
    let nested = dir.path().join("a").join("b");
    let store = FsConfigStore::with_base(&nested).unwrap();
    assert!(nested.is_dir());
    assert_eq!(store.base(), nested.as_path());
}

#[test]
fn config_round_trips_through_json_file() {
    let dir = tempfile::tempdir().unwrap();
    let svc = ConfigService::new(FsConfigStore::with_base(dir.path()).unwrap());
    assert_eq!(svc.load_config().unwrap(), None);

    let cfg = RippleConfig {
        seed: 7,
        timer_interval_ms: 250,
        max_timestep: Some(30),
        ..RippleConfig::default()
    };
    svc.save_config(&cfg).unwrap();

    let path = svc.store().path_for(RIPPLE_CONFIG_KEY);
    assert!(path.ends_with("ripple.json"));
    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.contains("\"timer_interval_ms\": 250"));

    let reopened = ConfigService::new(FsConfigStore::with_base(dir.path()).unwrap());
    assert_eq!(reopened.load_config().unwrap(), Some(cfg));
}
