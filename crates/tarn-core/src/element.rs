use std::fmt;
use std::hash::{Hash, Hasher};

use tarn_util::errors::{TarnError, TarnResult};

use crate::dependency::Dependency;

/// One concrete version of a named unit with a fixed dependency list.
///
/// Two elements are equal when both carry equal user objects, or when
/// neither carries one and their `(id, version)` pairs match.
#[derive(Debug, Clone)]
pub struct Element<U = ()> {
    id: String,
    version: String,
    dependencies: Vec<Dependency<U>>,
    singleton: bool,
    user_object: Option<U>,
}

impl<U> Element<U> {
    pub fn new(
        id: impl Into<String>,
        version: impl Into<String>,
        dependencies: Vec<Dependency<U>>,
        singleton: bool,
        user_object: Option<U>,
    ) -> TarnResult<Self> {
        let id = id.into();
        let version = version.into();
        if id.is_empty() {
            return Err(TarnError::InvalidElement {
                message: "element id must not be empty".to_string(),
            });
        }
        if version.is_empty() {
            return Err(TarnError::InvalidElement {
                message: format!("element '{id}' has an empty version"),
            });
        }
        Ok(Self {
            id,
            version,
            dependencies,
            singleton,
            user_object,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn dependencies(&self) -> &[Dependency<U>] {
        &self.dependencies
    }

    /// Mutable access to the dependency slots, for binding resolved versions.
    /// The sequence itself stays fixed.
    pub fn dependencies_mut(&mut self) -> &mut [Dependency<U>] {
        &mut self.dependencies
    }

    pub fn is_singleton(&self) -> bool {
        self.singleton
    }

    pub fn user_object(&self) -> Option<&U> {
        self.user_object.as_ref()
    }

    /// Replace every dependency with one that can never be satisfied, so the
    /// element drops out of a cycle without being deleted.
    pub fn remove_from_cycle(&mut self) {
        self.dependencies = vec![Dependency::unsatisfiable(self.id.clone())];
    }

    /// `false` once the element has been evicted from a cycle.
    pub fn is_satisfiable(&self) -> bool {
        self.dependencies.iter().all(Dependency::is_satisfiable)
    }
}

impl<U: PartialEq> PartialEq for Element<U> {
    fn eq(&self, other: &Self) -> bool {
        match (&self.user_object, &other.user_object) {
            (Some(a), Some(b)) => a == b,
            (None, None) => self.id == other.id && self.version == other.version,
            _ => false,
        }
    }
}

impl<U: Eq> Eq for Element<U> {}

impl<U: Hash> Hash for Element<U> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match &self.user_object {
            Some(user) => user.hash(state),
            None => {
                self.id.hash(state);
                self.version.hash(state);
            }
        }
    }
}

impl<U> fmt::Display for Element<U> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.id, self.version)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn rejects_empty_id() {
        let err = Element::<()>::new("", "1.0", vec![], false, None).unwrap_err();
        assert!(matches!(err, TarnError::InvalidElement { .. }));
    }

    #[test]
    fn rejects_empty_version() {
        let err = Element::<()>::new("lib", "", vec![], false, None).unwrap_err();
        assert!(err.to_string().contains("empty version"));
    }

    #[test]
    fn identity_without_user_object() {
        let a = Element::<()>::new("lib", "1.0", vec![], false, None).unwrap();
        let b = Element::<()>::new("lib", "1.0", vec![], true, None).unwrap();
        let c = Element::<()>::new("lib", "2.0", vec![], false, None).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn identity_with_user_object() {
        let a = Element::new("lib", "1.0", vec![], false, Some(7u32)).unwrap();
        let b = Element::new("other", "9.0", vec![], false, Some(7u32)).unwrap();
        let c = Element::new("lib", "1.0", vec![], false, Some(8u32)).unwrap();
        let d = Element::new("lib", "1.0", vec![], false, None).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_ne!(a, d);
    }

    #[test]
    fn hash_agrees_with_eq() {
        let mut set = HashSet::new();
        set.insert(Element::<()>::new("lib", "1.0", vec![], false, None).unwrap());
        set.insert(Element::<()>::new("lib", "1.0", vec![], true, None).unwrap());
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn remove_from_cycle_poisons_dependencies() {
        let deps = vec![Dependency::on("a").unwrap(), Dependency::on("b").unwrap()];
        let mut element = Element::<()>::new("c", "1.0", deps, false, None).unwrap();
        assert!(element.is_satisfiable());
        element.remove_from_cycle();
        assert_eq!(element.dependencies().len(), 1);
        assert!(!element.is_satisfiable());
        assert!(!element.dependencies()[0].accepts("1.0"));
    }

    #[test]
    fn display() {
        let e = Element::<()>::new("lib", "1.0", vec![], false, None).unwrap();
        assert_eq!(e.to_string(), "lib@1.0");
    }
}
