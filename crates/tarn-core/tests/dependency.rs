use std::sync::Arc;

use tarn_core::dependency::Dependency;
use tarn_core::element::Element;
use tarn_core::match_rule::{ExactMatch, MavenRange, MinimumVersion, SemverRequirement};
use tarn_util::errors::TarnError;

fn dep(rule: tarn_core::match_rule::SharedMatchRule, hint: &str) -> Dependency {
    Dependency::new("lib", rule, Some(hint.to_string()), false, None).unwrap()
}

#[test]
fn test_exact_match() {
    let d = dep(Arc::new(ExactMatch), "1.0");
    assert!(d.accepts("1.0"));
    assert!(!d.accepts("1.0.0"));
}

#[test]
fn test_minimum_version() {
    let d = dep(Arc::new(MinimumVersion), "1.2");
    assert!(d.accepts("1.2"));
    assert!(d.accepts("1.10"));
    assert!(!d.accepts("1.2-SNAPSHOT"));
}

#[test]
fn test_maven_range() {
    let d = dep(Arc::new(MavenRange), "[1.0,2.0)");
    assert!(d.accepts("1.0"));
    assert!(d.accepts("1.9.9"));
    assert!(!d.accepts("2.0"));

    let bare = dep(Arc::new(MavenRange), "1.5");
    assert!(bare.accepts("3.0"));
    assert!(!bare.accepts("1.4"));
}

#[test]
fn test_semver_requirement() {
    let d = dep(Arc::new(SemverRequirement), "^1.2");
    assert!(d.accepts("1.4.0"));
    assert!(!d.accepts("2.0.0"));
}

#[test]
fn test_missing_hint_accepts_anything() {
    let d: Dependency = Dependency::new("lib", Arc::new(ExactMatch), None, true, None).unwrap();
    assert!(d.is_optional());
    assert!(d.accepts("whatever"));
}

#[test]
fn test_rejects_blank_ids() {
    let err = Dependency::<()>::on("").unwrap_err();
    assert!(matches!(err, TarnError::InvalidDependency { .. }));

    let err = Element::<()>::new("lib", "", vec![], false, None).unwrap_err();
    assert!(matches!(err, TarnError::InvalidElement { .. }));
}

#[test]
fn test_binding_reports_change_once() {
    let mut d: Dependency = Dependency::on("lib").unwrap();
    assert!(d.bind(Some("1.0"), 3));
    assert_eq!(d.resolved_version(), Some("1.0"));
    assert_eq!(d.changed_epoch(), 3);
    assert!(!d.bind(Some("1.0"), 4));
    assert_eq!(d.changed_epoch(), 3);
    assert!(d.bind(None, 5));
}

#[test]
fn test_cycle_eviction_poisons_element() {
    let mut element: Element =
        Element::new("app", "1", vec![Dependency::on("lib").unwrap()], false, None).unwrap();
    assert!(element.is_satisfiable());
    element.remove_from_cycle();
    assert!(!element.is_satisfiable());
    assert_eq!(element.dependencies().len(), 1);
    assert_eq!(element.dependencies()[0].required_id(), "app");
    assert!(!element.dependencies()[0].accepts("1"));
}

#[test]
fn test_user_object_defines_identity() {
    let a = Element::new("lib", "1.0", vec![], false, Some("first")).unwrap();
    let b = Element::new("lib", "2.0", vec![], false, Some("first")).unwrap();
    let c = Element::new("lib", "1.0", vec![], false, Some("second")).unwrap();
    assert_eq!(a, b);
    assert_ne!(a, c);

    let plain: Element<&str> = Element::new("lib", "1.0", vec![], true, None).unwrap();
    assert_ne!(a, plain);
    assert_eq!(plain.to_string(), "lib@1.0");
}
