//! Domain models for the config generator.
//!
//! - [`Ipv4`] - IPv4 address with prefix length and subnet helpers
//! - [`Record`] - one site row from the table
//! - [`VlanMaskTable`] - VLAN id to mask mapping
//! - [`Diagnostic`] - non-fatal findings returned next to the output

mod diagnostic;
mod ipv4;
mod record;
mod vlan;

// Re-export public types
pub use diagnostic::Diagnostic;
pub use ipv4::{
    broadcast_addr, cut_addr, dotted_mask, get_cidr_mask, num_hosts, parse_mask, Ipv4,
    MAX_LENGTH,
};
pub use record::{sanitize_store_id, Record, STORE_COLUMN_MARKER};
pub use vlan::{vlan_column, VlanMaskTable, VLAN_COLUMN_PREFIX};
