use std::fmt;

use crate::domain::{error::DomainError, sanitize::is_cluster_safe};

/// A single deployment environment (e.g. `dev`, `qa`, `prod`).
///
/// Invariant: lowercase `[a-z0-9-]+`. The identifier ends up inside resource
/// names and namespaces, so it is checked at construction.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Environment(String);

impl Environment {
    pub fn new(name: impl Into<String>) -> Result<Self, DomainError> {
        let name = name.into().trim().to_lowercase();
        if is_cluster_safe(&name) {
            Ok(Self(name))
        } else {
            Err(DomainError::InvalidEnvironment(name))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Environment {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Ordered, non-empty, duplicate-free set of target environments.
///
/// Sourced from configuration, never from the project spec.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Environments(Vec<Environment>);

impl Environments {
    /// Parse environment identifiers, keeping the configured order.
    ///
    /// Repeated identifiers collapse onto their first occurrence.
    pub fn parse<I, S>(names: I) -> Result<Self, DomainError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut envs: Vec<Environment> = Vec::new();
        for name in names {
            let env = Environment::new(name.as_ref())?;
            if !envs.contains(&env) {
                envs.push(env);
            }
        }

        if envs.is_empty() {
            return Err(DomainError::NoEnvironments);
        }
        Ok(Self(envs))
    }

    /// Run `f` once per environment, sequentially, in configured order.
    ///
    /// Stops at the first error; later environments are not visited.
    pub fn for_each<E, F>(&self, mut f: F) -> Result<(), E>
    where
        F: FnMut(&Environment) -> Result<(), E>,
    {
        for env in &self.0 {
            f(env)?;
        }
        Ok(())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Environment> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Look up a configured environment by name.
    pub fn get(&self, name: &str) -> Option<&Environment> {
        let wanted = name.trim().to_lowercase();
        self.0.iter().find(|e| e.as_str() == wanted)
    }
}

impl<'a> IntoIterator for &'a Environments {
    type Item = &'a Environment;
    type IntoIter = std::slice::Iter<'a, Environment>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_keeps_order_and_drops_repeats() {
        let envs = Environments::parse(["dev", "QA", "prod", "dev"]).unwrap();
        let names: Vec<_> = envs.iter().map(Environment::as_str).collect();
        assert_eq!(names, ["dev", "qa", "prod"]);
    }

    #[test]
    fn empty_list_is_rejected() {
        let empty: [&str; 0] = [];
        assert_eq!(Environments::parse(empty), Err(DomainError::NoEnvironments));
    }

    #[test]
    fn unsafe_identifier_is_rejected() {
        assert!(matches!(
            Environments::parse(["dev", "pre prod"]),
            Err(DomainError::InvalidEnvironment(_))
        ));
    }

    #[test]
    fn for_each_visits_in_order_and_stops_on_error() {
        let envs = Environments::parse(["dev", "qa", "prod"]).unwrap();

        let mut seen = Vec::new();
        let result: Result<(), String> = envs.for_each(|env| {
            seen.push(env.to_string());
            if env.as_str() == "qa" {
                return Err("boom".into());
            }
            Ok(())
        });

        assert_eq!(result, Err("boom".to_string()));
        assert_eq!(seen, ["dev", "qa"]);
    }

    #[test]
    fn get_is_case_insensitive() {
        let envs = Environments::parse(["dev", "qa"]).unwrap();
        assert_eq!(envs.get("QA").map(Environment::as_str), Some("qa"));
        assert!(envs.get("prod").is_none());
    }
}
