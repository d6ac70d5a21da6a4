//! Maps command names and callback data to actions.
//!
//! Rules are either exact strings or prefixes. When several rules match the
//! same payload the most specific one wins: exact rules before prefix rules,
//! longer prefixes before shorter ones. The order is fixed when the router is
//! built, independent of the order rules were registered in.

use anyhow::{anyhow, Result};
use std::cmp::Reverse;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Command,
    Callback,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Matcher {
    Exact(String),
    Prefix(String),
}

impl Matcher {
    pub fn matches(&self, payload: &str) -> bool {
        match self {
            Matcher::Exact(expected) => payload == expected,
            Matcher::Prefix(prefix) => payload.starts_with(prefix.as_str()),
        }
    }

    fn precedence(&self) -> (u8, Reverse<usize>) {
        match self {
            Matcher::Exact(s) => (0, Reverse(s.len())),
            Matcher::Prefix(s) => (1, Reverse(s.len())),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Rule<A> {
    pub matcher: Matcher,
    pub action: A,
}

/// Result of routing one payload.
#[derive(Debug, PartialEq)]
pub enum Route<'a, A> {
    Matched(&'a A),
    Unknown,
}

#[derive(Debug, Clone)]
pub struct Router<A> {
    commands: Vec<Rule<A>>,
    callbacks: Vec<Rule<A>>,
}

impl<A> Router<A> {
    pub fn builder() -> RouterBuilder<A> {
        RouterBuilder {
            commands: Vec::new(),
            callbacks: Vec::new(),
        }
    }

    /// First matching rule in precedence order, or `Route::Unknown`.
    pub fn route(&self, kind: EventKind, payload: &str) -> Route<'_, A> {
        self.rules(kind)
            .iter()
            .find(|rule| rule.matcher.matches(payload))
            .map_or(Route::Unknown, |rule| Route::Matched(&rule.action))
    }

    /// Rules in the order they are evaluated.
    pub fn rules(&self, kind: EventKind) -> &[Rule<A>] {
        match kind {
            EventKind::Command => &self.commands,
            EventKind::Callback => &self.callbacks,
        }
    }
}

pub struct RouterBuilder<A> {
    commands: Vec<Rule<A>>,
    callbacks: Vec<Rule<A>>,
}

impl<A> RouterBuilder<A> {
    pub fn exact(self, kind: EventKind, value: &str, action: A) -> Self {
        self.rule(kind, Matcher::Exact(value.to_string()), action)
    }

    pub fn prefix(self, kind: EventKind, prefix: &str, action: A) -> Self {
        self.rule(kind, Matcher::Prefix(prefix.to_string()), action)
    }

    pub fn rule(mut self, kind: EventKind, matcher: Matcher, action: A) -> Self {
        let rule = Rule { matcher, action };
        match kind {
            EventKind::Command => self.commands.push(rule),
            EventKind::Callback => self.callbacks.push(rule),
        }
        self
    }

    /// Orders the rules by precedence. Fails on an empty prefix or on the
    /// same matcher registered twice for one event kind.
    pub fn build(self) -> Result<Router<A>> {
        Ok(Router {
            commands: Self::order(self.commands)?,
            callbacks: Self::order(self.callbacks)?,
        })
    }

    fn order(mut rules: Vec<Rule<A>>) -> Result<Vec<Rule<A>>> {
        for (i, rule) in rules.iter().enumerate() {
            if let Matcher::Prefix(prefix) = &rule.matcher {
                if prefix.is_empty() {
                    return Err(anyhow!("Empty prefix rule would shadow every payload"));
                }
            }
            if rules[..i].iter().any(|other| other.matcher == rule.matcher) {
                return Err(anyhow!("Duplicate routing rule {:?}", rule.matcher));
            }
        }

        // Stable, so equally specific rules keep their registration order.
        rules.sort_by_key(|rule| rule.matcher.precedence());
        Ok(rules)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_beats_prefix() {
        let router = Router::builder()
            .prefix(EventKind::Callback, "notify_", "prefix")
            .exact(EventKind::Callback, "notify_menu", "exact")
            .build()
            .unwrap();

        assert_eq!(router.route(EventKind::Callback, "notify_menu"), Route::Matched(&"exact"));
        assert_eq!(router.route(EventKind::Callback, "notify_other"), Route::Matched(&"prefix"));
    }

    #[test]
    fn test_event_kinds_are_separate() {
        let router = Router::builder()
            .exact(EventKind::Command, "help", 1)
            .build()
            .unwrap();

        assert_eq!(router.route(EventKind::Command, "help"), Route::Matched(&1));
        assert_eq!(router.route(EventKind::Callback, "help"), Route::Unknown);
    }

    #[test]
    fn test_duplicate_rule_rejected() {
        let result = Router::builder()
            .prefix(EventKind::Callback, "a_", 1)
            .prefix(EventKind::Callback, "a_", 2)
            .build();
        assert!(result.is_err());

        let result = Router::builder()
            .prefix(EventKind::Callback, "", 1)
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn test_exact_and_prefix_with_same_text_coexist() {
        let router = Router::builder()
            .exact(EventKind::Callback, "notify_custom", "menu")
            .prefix(EventKind::Callback, "notify_custom", "prefixed")
            .build()
            .unwrap();
        assert_eq!(router.route(EventKind::Callback, "notify_custom"), Route::Matched(&"menu"));
        assert_eq!(router.route(EventKind::Callback, "notify_custom_x"), Route::Matched(&"prefixed"));
    }
}
