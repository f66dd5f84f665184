//! Single substitution rules.
//!
//! A [`Rule`] locates a pattern inside a [`Scope`] of the template and swaps
//! the `val` capture for a computed value, keeping the `pre` and `post`
//! captures as they are. Rules know nothing about records; the renderer
//! decides which value goes where.

use crate::error::{GenError, Result};
use regex::{Captures, Regex};
use std::ops::Range;

const IPV4: &str = r"\d{1,3}(?:\.\d{1,3}){3}";
/// Next-hop interface of the branch route.
pub const ROUTE_NEXT_HOP: &str = "loopback11";
/// Keyword that opens a VRF section.
pub const VRF_KEYWORD: &str = "vrf";
pub const WAN2_VRF: &str = "wan2";

/// Part of the template a rule may touch.
#[derive(Debug, Clone)]
pub enum Scope {
    Whole,
    /// `network <name>` interface block, up to its `exit` line.
    Block { header: Regex, end: Regex },
    /// `vrf <name>` section, up to the next `vrf ` header or non-indented line.
    Section { header: Regex, next: Regex },
}

impl Scope {
    pub fn interface(name: &str) -> Result<Scope> {
        Ok(Scope::Block {
            header: compile(&format!(
                r"(?m)^[ \t]*network[ \t]+{}[ \t]*\r?$",
                regex::escape(name)
            ))?,
            end: compile(r"(?m)^[ \t]*exit[ \t]*\r?$")?,
        })
    }

    pub fn vrf(name: &str) -> Result<Scope> {
        Ok(Scope::Section {
            header: compile(&format!(
                r"(?m)^[ \t]*{VRF_KEYWORD}[ \t]+{}\b",
                regex::escape(name)
            ))?,
            next: compile(&format!(r"(?m)^(?:[ \t]*{VRF_KEYWORD}[ \t]|\S)"))?,
        })
    }

    /// Byte range of the scope in `text`, `None` when its header is absent.
    pub fn locate(&self, text: &str) -> Option<Range<usize>> {
        match self {
            Scope::Whole => Some(0..text.len()),
            Scope::Block { header, end } => {
                let head = header.find(text)?;
                let stop = end
                    .find_at(text, head.end())
                    .map_or(text.len(), |m| m.start());
                Some(head.start()..stop)
            }
            Scope::Section { header, next } => {
                let head = header.find(text)?;
                let body_start = text[head.end()..]
                    .find('\n')
                    .map_or(text.len(), |i| head.end() + i + 1);
                let stop = next
                    .find_at(text, body_start)
                    .map_or(text.len(), |m| m.start());
                Some(head.start()..stop)
            }
        }
    }
}

/// Locate-pattern / extract-capture / replace-value rule.
#[derive(Debug, Clone)]
pub struct Rule {
    pub name: String,
    pattern: Regex,
    scope: Scope,
    /// Max replacements inside the scope, 0 for all.
    limit: usize,
}

fn compile(pattern: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|e| GenError::Config(format!("Invalid pattern {pattern}: {e}")))
}

impl Rule {
    pub fn new(name: impl Into<String>, pattern: &str, scope: Scope, limit: usize) -> Result<Rule> {
        Ok(Rule {
            name: name.into(),
            pattern: compile(pattern)?,
            scope,
            limit,
        })
    }

    /// `set hostname <value>`, every occurrence.
    pub fn hostname() -> Result<Rule> {
        Rule::new(
            "set hostname",
            r"(?P<pre>set hostname[ \t]+)(?P<val>\S+)",
            Scope::Whole,
            0,
        )
    }

    /// First `ip address <ip>` inside the `network <interface>` block.
    pub fn interface_ip(interface: &str) -> Result<Rule> {
        Rule::new(
            format!("network {interface} ip address"),
            &format!(r"(?P<pre>ip address[ \t]+)(?P<val>{IPV4})"),
            Scope::interface(interface)?,
            1,
        )
    }

    /// `subnet <label> <n> network <net> <mask>`.
    pub fn subnet_network(label: &str) -> Result<Rule> {
        Rule::subnet_line(label, "network", &format!(r"{IPV4}[ \t]+{IPV4}"))
    }

    /// `subnet <label> <n> range <start> <end>`.
    pub fn subnet_range(label: &str) -> Result<Rule> {
        Rule::subnet_line(label, "range", &format!(r"{IPV4}[ \t]+{IPV4}"))
    }

    /// `subnet <label> <n> router <ip>`.
    pub fn subnet_router(label: &str) -> Result<Rule> {
        Rule::subnet_line(label, "router", IPV4)
    }

    fn subnet_line(label: &str, keyword: &str, value: &str) -> Result<Rule> {
        Rule::new(
            format!("subnet {label} {keyword}"),
            &format!(
                r"(?P<pre>subnet[ \t]+{}[ \t]+\d+[ \t]+{keyword}[ \t]+)(?P<val>{value})",
                regex::escape(label)
            ),
            Scope::Whole,
            0,
        )
    }

    /// First `route <net> <mask> loopback11` line inside `scope`.
    pub fn branch_route(scope: Scope) -> Result<Rule> {
        let name = match scope {
            Scope::Section { .. } => format!("{VRF_KEYWORD} {WAN2_VRF} route {ROUTE_NEXT_HOP}"),
            _ => format!("route {ROUTE_NEXT_HOP}"),
        };
        Rule::new(
            name,
            &format!(
                r"(?P<pre>route[ \t]+)(?P<val>{IPV4}[ \t]+{IPV4})(?P<post>[ \t]+{ROUTE_NEXT_HOP}\b)"
            ),
            scope,
            1,
        )
    }

    /// Replace the `val` capture with `value`.
    ///
    /// Returns `None` when the scope or the pattern is not found, leaving
    /// the caller's text untouched.
    pub fn apply(&self, text: &str, value: &str) -> Option<String> {
        let range = self.scope.locate(text)?;
        let scoped = &text[range.clone()];
        if !self.pattern.is_match(scoped) {
            return None;
        }

        let replaced = self.pattern.replacen(scoped, self.limit, |caps: &Captures| {
            format!(
                "{}{}{}",
                caps.name("pre").map_or("", |m| m.as_str()),
                value,
                caps.name("post").map_or("", |m| m.as_str())
            )
        });
        log::trace!("rule '{}' -> {}", self.name, value);

        let mut out = String::with_capacity(text.len() + value.len());
        out.push_str(&text[..range.start]);
        out.push_str(&replaced);
        out.push_str(&text[range.end..]);
        Some(out)
    }
}
