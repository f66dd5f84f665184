//! Generation pipeline steps.
//!
//! - [`ingest`] - site table parsing with delimiter detection
//! - [`topology`] - Flat / Inter classification of a template
//! - [`address_plan`] - network address and DHCP range arithmetic
//! - [`batch`] - rendering every record and collecting results

mod address_plan;
mod batch;
mod ingest;
mod topology;

// Re-export public functions
pub use address_plan::{plan, NetworkPlan};
pub use batch::{generate_batch, BatchOutput, RenderedConfig};
pub use ingest::{ingest, Ingested, SplitStrategy};
pub use topology::{
    detect, name_marker, Detection, DetectionRule, TopologyHint, TopologyKind, DETECTION_RULES,
};
