// ABOUTME: Runtime link from one project's container to another named container.
// ABOUTME: Parses and renders the "<container-name>:<alias>" form.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;

/// A declared dependency on another container, reachable under `alias`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Link {
    pub name: String,
    pub alias: String,
}

impl Link {
    pub fn new(name: impl Into<String>, alias: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            alias: alias.into(),
        }
    }
}

impl FromStr for Link {
    type Err = ValidationError;

    /// Accepts `name` (aliased as itself) or `name:alias`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || ValidationError::MalformedLink(s.to_string());

        let (name, alias) = match s.split_once(':') {
            Some((name, alias)) => (name, alias),
            None => (s, s),
        };

        if name.is_empty() || alias.is_empty() || alias.contains(':') {
            return Err(malformed());
        }
        if name.chars().chain(alias.chars()).any(char::is_whitespace) {
            return Err(malformed());
        }

        Ok(Link::new(name, alias))
    }
}

impl fmt::Display for Link {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.name, self.alias)
    }
}

/// Render a project's link mapping as the duplicate-free set of `name:alias` strings.
pub fn format_links(links: &BTreeMap<String, Link>) -> Vec<String> {
    links
        .values()
        .map(Link::to_string)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_name_and_alias() {
        let link: Link = "db:database".parse().unwrap();
        assert_eq!(link, Link::new("db", "database"));
    }

    #[test]
    fn bare_name_aliases_itself() {
        let link: Link = "redis".parse().unwrap();
        assert_eq!(link.to_string(), "redis:redis");
    }

    #[test]
    fn malformed_links_name_the_literal() {
        for literal in ["", ":alias", "db:", "a:b:c", "my db"] {
            let err = literal.parse::<Link>().unwrap_err();
            assert_eq!(err.literal(), literal);
        }
    }

    #[test]
    fn format_links_is_duplicate_free() {
        let mut links = BTreeMap::new();
        links.insert("db".to_string(), Link::new("db", "database"));
        links.insert("db-again".to_string(), Link::new("db", "database"));
        links.insert("cache".to_string(), Link::new("redis", "cache"));

        let formatted = format_links(&links);
        assert_eq!(formatted, vec!["db:database", "redis:cache"]);
    }

    #[test]
    fn format_links_empty() {
        assert!(format_links(&BTreeMap::new()).is_empty());
    }
}
