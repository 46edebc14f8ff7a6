use lazy_static::lazy_static;
use regex::Regex;
use serde_json::{Map, Value};
use std::collections::HashSet;

use crate::models::{Detail, Finding, Location};

use super::Analyzer;

lazy_static! {
    static ref ACTION_FORMAT: Regex = Regex::new(r"^[A-Za-z0-9-]+:[A-Za-z0-9*?]+$").unwrap();
}

const CURRENT_VERSION: &str = "2012-10-17";
const OLD_VERSION: &str = "2008-10-17";

/// Structural and permissiveness checks over IAM policy JSON.
#[derive(Debug, Default, Clone, Copy)]
pub struct PolicyLinter;

impl Analyzer for PolicyLinter {
    fn analyze(&self, policy: &str, location: &Location) -> Vec<Finding> {
        let mut lint = Lint {
            location,
            findings: Vec::new(),
        };

        let document: Value = match serde_json::from_str(policy) {
            Ok(value) => value,
            Err(e) => {
                lint.push("MALFORMED_JSON", Detail::Text(e.to_string()));
                return lint.findings;
            }
        };
        let Some(document) = document.as_object() else {
            lint.push("MALFORMED", Detail::Text("Policy is not a JSON object".into()));
            return lint.findings;
        };

        match document.get("Version") {
            None => lint.push("NO_VERSION", Detail::Text("Policy has no Version element".into())),
            Some(Value::String(v)) if v == CURRENT_VERSION => {}
            Some(Value::String(v)) if v == OLD_VERSION => {
                lint.push("OLD_VERSION", Detail::Text(format!("Version is {}", v)))
            }
            Some(other) => lint.push("INVALID_VERSION", Detail::Text(format!("Version is {}", other))),
        }

        let statements: Vec<&Value> = match document.get("Statement") {
            Some(Value::Array(items)) => items.iter().collect(),
            Some(single @ Value::Object(_)) => vec![single],
            Some(_) => {
                lint.push(
                    "MALFORMED",
                    Detail::Text("Statement must be an object or a list of objects".into()),
                );
                return lint.findings;
            }
            None => {
                lint.push("MALFORMED", Detail::Text("Policy contains no Statement".into()));
                return lint.findings;
            }
        };

        let mut sids = HashSet::new();
        for (index, statement) in statements.into_iter().enumerate() {
            match statement.as_object() {
                Some(statement) => lint.statement(index, statement, &mut sids),
                None => lint.malformed(index, "Statement is not an object"),
            }
        }
        lint.findings
    }
}

struct Lint<'l> {
    location: &'l Location,
    findings: Vec<Finding>,
}

impl Lint<'_> {
    fn push(&mut self, issue: &str, detail: Detail) {
        self.findings
            .push(Finding::new(issue, detail, self.location.clone()));
    }

    fn malformed(&mut self, index: usize, message: &str) {
        self.push(
            "MALFORMED",
            Detail::fields([("statement", Value::from(index)), ("message", Value::from(message))]),
        );
    }

    /// Read an Action/Resource-style element. `None` when absent.
    fn string_list<'v>(
        &mut self,
        index: usize,
        statement: &'v Map<String, Value>,
        key: &str,
    ) -> Option<Vec<&'v str>> {
        match statement.get(key)? {
            Value::String(s) => Some(vec![s.as_str()]),
            Value::Array(items) if items.iter().all(Value::is_string) => {
                Some(items.iter().filter_map(Value::as_str).collect())
            }
            _ => {
                self.malformed(index, &format!("{} must be a string or a list of strings", key));
                Some(Vec::new())
            }
        }
    }

    fn statement<'v>(
        &mut self,
        index: usize,
        statement: &'v Map<String, Value>,
        sids: &mut HashSet<&'v str>,
    ) {
        let effect = statement.get("Effect").and_then(Value::as_str);
        if !matches!(effect, Some("Allow" | "Deny")) {
            self.malformed(index, "Effect must be Allow or Deny");
        }

        if let Some(sid) = statement.get("Sid").and_then(Value::as_str)
            && !sid.is_empty()
            && !sids.insert(sid)
        {
            self.push(
                "DUPLICATE_SID",
                Detail::fields([("statement", Value::from(index)), ("sid", Value::from(sid))]),
            );
        }

        let actions = self.string_list(index, statement, "Action");
        let not_actions = self.string_list(index, statement, "NotAction");
        let resources = self.string_list(index, statement, "Resource");
        let not_resources = self.string_list(index, statement, "NotResource");

        match (&actions, &not_actions) {
            (Some(_), Some(_)) => self.malformed(index, "Statement contains both Action and NotAction"),
            (None, None) => self.malformed(index, "Statement contains neither Action nor NotAction"),
            _ => {}
        }

        let has_principal =
            statement.contains_key("Principal") || statement.contains_key("NotPrincipal");
        match (&resources, &not_resources) {
            (Some(_), Some(_)) => {
                self.malformed(index, "Statement contains both Resource and NotResource")
            }
            (None, None) if !has_principal => {
                self.malformed(index, "Statement contains neither Resource nor NotResource")
            }
            _ => {}
        }

        for action in actions.iter().chain(not_actions.iter()).flatten() {
            if *action != "*" && !ACTION_FORMAT.is_match(action) {
                self.push(
                    "INVALID_ACTION",
                    Detail::fields([
                        ("statement", Value::from(index)),
                        ("action", Value::from(*action)),
                    ]),
                );
            }
        }

        if effect != Some("Allow") {
            return;
        }

        if not_actions.is_some() {
            self.push(
                "NOTACTION_WITH_ALLOW",
                Detail::fields([("statement", Value::from(index))]),
            );
        }
        if not_resources.is_some() {
            self.push(
                "NOTRESOURCE_WITH_ALLOW",
                Detail::fields([("statement", Value::from(index))]),
            );
        }

        let all_resources = resources.as_ref().is_some_and(|r| r.contains(&"*"));
        if !all_resources {
            return;
        }
        let actions = actions.unwrap_or_default();
        if actions.contains(&"*") {
            self.push(
                "ADMIN_ACCESS",
                Detail::fields([
                    ("statement", Value::from(index)),
                    ("action", Value::from("*")),
                    ("resource", Value::from("*")),
                ]),
            );
            return;
        }
        for action in actions.iter().filter(|a| a.ends_with(":*")) {
            self.push(
                "SERVICE_WILDCARD",
                Detail::fields([
                    ("statement", Value::from(index)),
                    ("action", Value::from(*action)),
                    ("resource", Value::from("*")),
                ]),
            );
        }
    }
}
