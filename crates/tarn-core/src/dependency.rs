use std::sync::Arc;

use tarn_util::errors::{TarnError, TarnResult};

use crate::match_rule::{SharedMatchRule, Unsatisfiable, Unspecified};

/// A dependency edge declared by an element on another element id.
///
/// Everything is fixed at construction except the resolved-version slot,
/// which only the resolution phase writes.
#[derive(Debug, Clone)]
pub struct Dependency<U = ()> {
    required_id: String,
    required_version: Option<String>,
    match_rule: SharedMatchRule,
    optional: bool,
    resolved_version: Option<String>,
    changed_epoch: u64,
    user_object: Option<U>,
}

impl<U> Dependency<U> {
    pub fn new(
        required_id: impl Into<String>,
        match_rule: SharedMatchRule,
        required_version: Option<String>,
        optional: bool,
        user_object: Option<U>,
    ) -> TarnResult<Self> {
        let required_id = required_id.into();
        if required_id.is_empty() {
            return Err(TarnError::InvalidDependency {
                message: "required id must not be empty".to_string(),
            });
        }
        if required_version.as_deref() == Some("") {
            return Err(TarnError::InvalidDependency {
                message: format!("empty version hint on dependency to '{required_id}'"),
            });
        }
        Ok(Self {
            required_id,
            required_version,
            match_rule,
            optional,
            resolved_version: None,
            changed_epoch: 0,
            user_object,
        })
    }

    /// A mandatory dependency on any version of `required_id`.
    pub fn on(required_id: impl Into<String>) -> TarnResult<Self> {
        Self::new(required_id, Arc::new(Unspecified), None, false, None)
    }

    /// A dependency that can never be satisfied.
    pub(crate) fn unsatisfiable(required_id: String) -> Self {
        Self {
            required_id,
            required_version: None,
            match_rule: Arc::new(Unsatisfiable),
            optional: false,
            resolved_version: None,
            changed_epoch: 0,
            user_object: None,
        }
    }

    pub fn required_id(&self) -> &str {
        &self.required_id
    }

    pub fn required_version(&self) -> Option<&str> {
        self.required_version.as_deref()
    }

    pub fn match_rule(&self) -> &SharedMatchRule {
        &self.match_rule
    }

    pub fn is_optional(&self) -> bool {
        self.optional
    }

    pub fn user_object(&self) -> Option<&U> {
        self.user_object.as_ref()
    }

    /// Whether this dependency can ever be met and therefore links two sets.
    pub fn is_satisfiable(&self) -> bool {
        self.match_rule.is_satisfiable()
    }

    /// Whether `available` fulfils this dependency.
    pub fn accepts(&self, available: &str) -> bool {
        if !self.match_rule.is_satisfiable() {
            return false;
        }
        match self.required_version.as_deref() {
            None => true,
            hint => self.match_rule.is_satisfied(hint, available),
        }
    }

    /// The version this dependency is currently bound to, if any.
    pub fn resolved_version(&self) -> Option<&str> {
        self.resolved_version.as_deref()
    }

    /// Epoch of the last change to the resolved version.
    pub fn changed_epoch(&self) -> u64 {
        self.changed_epoch
    }

    /// Re-bind the resolved version. Returns `true` if the binding changed.
    pub fn bind(&mut self, version: Option<&str>, epoch: u64) -> bool {
        if self.resolved_version.as_deref() == version {
            return false;
        }
        self.resolved_version = version.map(str::to_string);
        self.changed_epoch = epoch;
        true
    }
}
