//! Template substitution.
//!
//! - [`rule`] - single locate/replace rules with their scopes
//! - [`renderer`] - applies the rules for one record in a fixed order

mod renderer;
mod rule;

pub use renderer::{
    RenderSettings, Rendered, Renderer, Template, BRANCH_ROUTE_COLUMNS, FLAT_INTERFACE,
    FLAT_LAN_COLUMNS, FLAT_LAN_PAIRS, FLAT_SUBNET_LABEL, TNIP_COLUMNS,
};
pub use rule::{Rule, Scope, ROUTE_NEXT_HOP, WAN2_VRF};
