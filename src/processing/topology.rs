//! Template topology classification.
//!
//! A template is either Flat (one LAN on `bvi0`) or Inter (one subnet per
//! VLAN on `bvi0.<vlan>`). The decision is an ordered chain of
//! [`DetectionRule`]s; the first rule that returns a kind wins and its reason
//! is kept for the audit log.

use crate::error::{GenError, Result};
use crate::models::{Diagnostic, VLAN_COLUMN_PREFIX};
use crate::render::FLAT_LAN_COLUMNS;
use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

const FLAT_MARKERS: [&str; 1] = ["flat"];
const INTER_MARKERS: [&str; 2] = ["inter", "vlan"];
/// Template names that say nothing about the topology.
const GENERIC_MARKERS: [&str; 6] = ["generic", "template", "standard", "default", "common", "base"];

lazy_static! {
    static ref VLAN_INTERFACE: Regex =
        Regex::new(r"(?m)^[ \t]*network[ \t]+bvi\d+\.\d+[ \t]*\r?$").expect("Invalid Regex?");
    static ref TOP_INTERFACE: Regex =
        Regex::new(r"(?m)^[ \t]*network[ \t]+bvi\d+[ \t]*\r?$").expect("Invalid Regex?");
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TopologyKind {
    /// Single LAN subnet, no VLAN segmentation.
    Flat,
    /// One subnet per VLAN.
    Inter,
}

impl fmt::Display for TopologyKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            TopologyKind::Flat => write!(f, "Flat"),
            TopologyKind::Inter => write!(f, "Inter"),
        }
    }
}

impl FromStr for TopologyKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "flat" => Ok(TopologyKind::Flat),
            "inter" | "vlan" => Ok(TopologyKind::Inter),
            other => Err(format!("unknown topology '{other}', expected flat or inter")),
        }
    }
}

/// Everything the detector may look at besides the template text.
#[derive(Debug, Clone, Default)]
pub struct TopologyHint {
    /// Kind forced by the caller; skips detection.
    pub requested: Option<TopologyKind>,
    pub template_name: Option<String>,
    pub table_name: Option<String>,
    pub table_columns: Vec<String>,
}

/// Outcome of [`detect`].
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Detection {
    pub kind: TopologyKind,
    pub reason: String,
    pub diagnostics: Vec<Diagnostic>,
}

type Probe = fn(&TopologyHint, &str) -> Option<(TopologyKind, String)>;

/// One step of the classification chain.
pub struct DetectionRule {
    pub name: &'static str,
    pub probe: Probe,
}

/// Rules in priority order.
pub const DETECTION_RULES: [DetectionRule; 5] = [
    DetectionRule {
        name: "requested",
        probe: probe_requested,
    },
    DetectionRule {
        name: "template name",
        probe: probe_template_name,
    },
    DetectionRule {
        name: "table name",
        probe: probe_table_name,
    },
    DetectionRule {
        name: "template content",
        probe: probe_content,
    },
    DetectionRule {
        name: "table columns",
        probe: probe_columns,
    },
];

/// Kind suggested by markers in `name`, Flat checked first.
pub fn name_marker(name: &str) -> Option<TopologyKind> {
    let name = name.to_lowercase();
    if FLAT_MARKERS.iter().any(|m| name.contains(m)) {
        Some(TopologyKind::Flat)
    } else if INTER_MARKERS.iter().any(|m| name.contains(m)) {
        Some(TopologyKind::Inter)
    } else {
        None
    }
}

fn is_generic_name(name: Option<&str>) -> bool {
    match name {
        None => true,
        Some(name) => {
            let name = name.to_lowercase();
            name.trim().is_empty() || GENERIC_MARKERS.iter().any(|m| name.contains(m))
        }
    }
}

fn probe_requested(hint: &TopologyHint, _: &str) -> Option<(TopologyKind, String)> {
    hint.requested
        .map(|kind| (kind, format!("{kind} requested explicitly")))
}

fn probe_template_name(hint: &TopologyHint, _: &str) -> Option<(TopologyKind, String)> {
    let name = hint.template_name.as_deref()?;
    name_marker(name).map(|kind| (kind, format!("template name '{name}' marks {kind}")))
}

fn probe_table_name(hint: &TopologyHint, _: &str) -> Option<(TopologyKind, String)> {
    if !is_generic_name(hint.template_name.as_deref()) {
        return None;
    }
    let name = hint.table_name.as_deref()?;
    name_marker(name).map(|kind| {
        (
            kind,
            format!("template name is generic, table name '{name}' marks {kind}"),
        )
    })
}

fn probe_content(_: &TopologyHint, template: &str) -> Option<(TopologyKind, String)> {
    let vlan_count = VLAN_INTERFACE.find_iter(template).count();
    if vlan_count > 0 {
        return Some((
            TopologyKind::Inter,
            format!("template has {vlan_count} per-VLAN interface(s)"),
        ));
    }
    if TOP_INTERFACE.find_iter(template).count() == 1 {
        return Some((
            TopologyKind::Flat,
            "template has a single top-level interface".to_string(),
        ));
    }
    None
}

fn probe_columns(hint: &TopologyHint, _: &str) -> Option<(TopologyKind, String)> {
    let vlan_column = hint.table_columns.iter().find(|c| {
        c.strip_prefix(VLAN_COLUMN_PREFIX)
            .is_some_and(|id| !id.is_empty() && id.chars().all(|ch| ch.is_ascii_digit()))
    });
    if let Some(column) = vlan_column {
        return Some((
            TopologyKind::Inter,
            format!("table has per-VLAN column '{column}'"),
        ));
    }
    hint.table_columns
        .iter()
        .find(|c| FLAT_LAN_COLUMNS.contains(&c.as_str()))
        .map(|column| {
            (
                TopologyKind::Flat,
                format!("table has LAN column '{column}'"),
            )
        })
}

/// Classify `template` as Flat or Inter.
///
/// Fails with [`GenError::UnresolvedTopology`] when no rule fires. A table
/// name that points at the other kind is reported as a
/// [`Diagnostic::TopologyMismatch`] without changing the decision.
pub fn detect(hint: &TopologyHint, template: &str) -> Result<Detection> {
    log::info!("#Start detect() template={:?} table={:?}", hint.template_name, hint.table_name);

    let (kind, reason) = DETECTION_RULES
        .iter()
        .find_map(|rule| {
            let found = (rule.probe)(hint, template);
            log::trace!("rule '{}' -> {:?}", rule.name, found);
            found
        })
        .ok_or_else(|| {
            GenError::UnresolvedTopology(format!(
                "no marker in template name {:?} or table name {:?}, and no interface pattern in template content",
                hint.template_name, hint.table_name
            ))
        })?;
    log::info!("# Topology {kind}: {reason}");

    let mut diagnostics = Vec::new();
    if let Some(table_kind) = hint.table_name.as_deref().and_then(name_marker) {
        if table_kind != kind {
            let diagnostic = Diagnostic::TopologyMismatch {
                chosen: kind.to_string(),
                table_hint: table_kind.to_string(),
            };
            log::warn!("{diagnostic}");
            diagnostics.push(diagnostic);
        }
    }

    Ok(Detection {
        kind,
        reason,
        diagnostics,
    })
}
