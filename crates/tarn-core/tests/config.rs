use std::cmp::Ordering;

use tarn_core::config::{Preference, ResolverConfig, VersionScheme};
use tarn_util::errors::TarnError;

#[test]
fn test_default_config() {
    let config = ResolverConfig::default();
    assert!(!config.debug);
    assert_eq!(config.versioning.scheme, VersionScheme::Maven);
    assert_eq!(config.selection.prefer, Preference::Highest);
}

#[test]
fn test_empty_toml_uses_defaults() {
    let config = ResolverConfig::from_toml_str("").unwrap();
    assert!(!config.debug);
    assert_eq!(config.versioning.scheme, VersionScheme::Maven);
}

#[test]
fn test_full_toml() {
    let config = ResolverConfig::from_toml_str(
        r#"
debug = true

[versioning]
scheme = "semver"

[selection]
prefer = "lowest"
"#,
    )
    .unwrap();
    assert!(config.debug);
    assert_eq!(config.versioning.scheme, VersionScheme::Semver);
    assert_eq!(config.selection.prefer, Preference::Lowest);
}

#[test]
fn test_unknown_scheme_is_config_error() {
    let err = ResolverConfig::from_toml_str("[versioning]\nscheme = \"calver\"\n").unwrap_err();
    assert!(matches!(err, TarnError::Config(_)), "got: {err}");
}

#[test]
fn test_unknown_key_is_config_error() {
    let err = ResolverConfig::from_toml_str("verbose = true\n").unwrap_err();
    assert!(matches!(err, TarnError::Config(_)), "got: {err}");
}

#[test]
fn test_scheme_comparators() {
    let maven = VersionScheme::Maven.comparator();
    assert_eq!(maven.compare("1.9", "1.10"), Ordering::Less);

    let lexical = VersionScheme::Lexical.comparator();
    assert_eq!(lexical.compare("1.9", "1.10"), Ordering::Greater);

    let semver = VersionScheme::Semver.comparator();
    assert_eq!(semver.compare("1.0.0-rc.1", "1.0.0"), Ordering::Less);
}

#[test]
fn test_load_missing_file_returns_default() {
    let dir = tempfile::tempdir().unwrap();
    let config = ResolverConfig::load(&dir.path().join("tarn.toml")).unwrap();
    assert_eq!(config.selection.prefer, Preference::Highest);
}

#[test]
fn test_load_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tarn.toml");
    std::fs::write(&path, "debug = true\n[selection]\nprefer = \"lowest\"\n").unwrap();
    let config = ResolverConfig::load(&path).unwrap();
    assert!(config.debug);
    assert_eq!(config.selection.prefer, Preference::Lowest);
}

#[test]
fn test_load_malformed_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tarn.toml");
    std::fs::write(&path, "debug = [\n").unwrap();
    assert!(ResolverConfig::load(&path).is_err());
}
