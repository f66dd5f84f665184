//! Per-record rendering of a template.

use super::rule::{Rule, Scope, WAN2_VRF};
use crate::config::Settings;
use crate::error::{GenError, Result};
use crate::models::{sanitize_store_id, vlan_column, Diagnostic, Record, VlanMaskTable};
use crate::processing::{plan, Detection, NetworkPlan, TopologyKind};
use serde::Serialize;

/// Point-to-point tunnel columns and the interface each one addresses.
pub const TNIP_COLUMNS: [(&str, &str); 2] = [("Tnip1", "tnip1"), ("Tnip2", "tnip2")];
/// Flat LAN (ip, mask) column pairs, tried in order.
pub const FLAT_LAN_PAIRS: [(&str, &str); 2] = [("BVI_IP", "Branch_Mask"), ("LAN_IP", "LAN_Mask")];
/// Columns that carry a Flat LAN address.
pub const FLAT_LAN_COLUMNS: [&str; 2] = [FLAT_LAN_PAIRS[0].0, FLAT_LAN_PAIRS[1].0];
pub const FLAT_INTERFACE: &str = "bvi0";
pub const FLAT_SUBNET_LABEL: &str = "lan";
pub const BRANCH_ROUTE_COLUMNS: (&str, &str) = ("VRF_Branch_IP", "VRF_Branch_Mask");

/// Render options taken from [`Settings`].
#[derive(Debug, Clone)]
pub struct RenderSettings {
    pub reserve_count: usize,
    pub fallback_mask: String,
    pub vlan_masks: VlanMaskTable,
}

impl From<&Settings> for RenderSettings {
    fn from(settings: &Settings) -> Self {
        RenderSettings {
            reserve_count: settings.reserve_count,
            fallback_mask: settings.fallback_mask.clone(),
            vlan_masks: settings.vlan_masks.clone(),
        }
    }
}

impl Default for RenderSettings {
    fn default() -> Self {
        RenderSettings::from(&Settings::default())
    }
}

/// Template text with its resolved topology.
#[derive(Serialize, Debug, Clone)]
pub struct Template {
    pub text: String,
    pub detection: Detection,
}

/// Rules for one subnet: interface address plus the three DHCP lines.
#[derive(Debug)]
struct SubnetRules {
    interface: Rule,
    network: Rule,
    range: Rule,
    router: Rule,
}

impl SubnetRules {
    fn new(interface: &str, label: &str) -> Result<SubnetRules> {
        Ok(SubnetRules {
            interface: Rule::interface_ip(interface)?,
            network: Rule::subnet_network(label)?,
            range: Rule::subnet_range(label)?,
            router: Rule::subnet_router(label)?,
        })
    }
}

#[derive(Debug)]
struct VlanRules {
    vlan: String,
    mask: String,
    rules: SubnetRules,
}

#[derive(Debug)]
enum TopologyRules {
    Flat { lan: SubnetRules, route: Rule },
    Inter { vlans: Vec<VlanRules>, route: Rule },
}

/// Output of one record.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Rendered {
    pub key: String,
    pub text: String,
    pub diagnostics: Vec<Diagnostic>,
}

/// Working copy of the template for one record.
struct Pass<'a> {
    key: &'a str,
    text: String,
    diagnostics: Vec<Diagnostic>,
}

impl Pass<'_> {
    fn apply(&mut self, rule: &Rule, value: &str) {
        match rule.apply(&self.text, value) {
            Some(text) => self.text = text,
            None => {
                log::debug!("{}: no match for '{}'", self.key, rule.name);
                self.diagnostics.push(Diagnostic::PatternMissing {
                    key: self.key.to_string(),
                    rule: rule.name.clone(),
                });
            }
        }
    }

    fn apply_subnet(&mut self, rules: &SubnetRules, ip: &str, plan: &NetworkPlan) {
        self.apply(&rules.interface, ip);
        self.apply(
            &rules.network,
            &format!("{} {}", plan.network_address, plan.netmask),
        );
        self.apply(
            &rules.range,
            &format!("{} {}", plan.range_start, plan.range_end),
        );
        self.apply(&rules.router, ip);
    }
}

/// Renders records into one template.
///
/// All patterns are compiled once in [`Renderer::new`]; [`Renderer::render`]
/// only copies the template and substitutes.
#[derive(Debug)]
pub struct Renderer {
    template: Template,
    settings: RenderSettings,
    hostname: Rule,
    tnips: Vec<(&'static str, Rule)>,
    topology: TopologyRules,
}

impl Renderer {
    pub fn new(template: Template, settings: RenderSettings) -> Result<Renderer> {
        let topology = match template.detection.kind {
            TopologyKind::Flat => TopologyRules::Flat {
                lan: SubnetRules::new(FLAT_INTERFACE, FLAT_SUBNET_LABEL)?,
                route: Rule::branch_route(Scope::Whole)?,
            },
            TopologyKind::Inter => TopologyRules::Inter {
                vlans: settings
                    .vlan_masks
                    .iter()
                    .map(|(vlan, mask)| -> Result<VlanRules> {
                        Ok(VlanRules {
                            vlan: vlan.to_string(),
                            mask: mask.to_string(),
                            rules: SubnetRules::new(
                                &format!("{FLAT_INTERFACE}.{vlan}"),
                                &format!("vlan{vlan}"),
                            )?,
                        })
                    })
                    .collect::<Result<Vec<_>>>()?,
                route: Rule::branch_route(Scope::vrf(WAN2_VRF)?)?,
            },
        };

        let tnips = TNIP_COLUMNS
            .iter()
            .map(|(column, interface)| -> Result<(&'static str, Rule)> {
                Ok((*column, Rule::interface_ip(interface)?))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Renderer {
            template,
            settings,
            hostname: Rule::hostname()?,
            tnips,
            topology,
        })
    }

    pub fn kind(&self) -> TopologyKind {
        self.template.detection.kind
    }

    pub fn template(&self) -> &Template {
        &self.template
    }

    /// Substitute one record into a copy of the template.
    ///
    /// Order: hostname, tunnel addresses, topology block, branch route.
    /// Missing template patterns become [`Diagnostic::PatternMissing`];
    /// bad addresses abort with [`GenError::Address`] and a blank store
    /// value with [`GenError::BlankStoreId`].
    pub fn render(&self, record: &Record) -> Result<Rendered> {
        let store_id = record
            .store_id()
            .ok_or_else(|| GenError::MissingStoreColumn {
                found: record.store_columns().iter().map(|c| c.to_string()).collect(),
            })?;
        let key = sanitize_store_id(store_id);
        if key.is_empty() {
            return Err(GenError::BlankStoreId { line: record.line });
        }
        log::debug!("#Start render() line={} key={key}", record.line);

        let mut pass = Pass {
            key: &key,
            text: self.template.text.clone(),
            diagnostics: Vec::new(),
        };

        pass.apply(&self.hostname, &key);

        for (column, rule) in self.tnips.iter() {
            if let Some(ip) = record.non_blank(column) {
                pass.apply(rule, ip);
            }
        }

        match &self.topology {
            TopologyRules::Flat { lan, route } => self.render_flat(&mut pass, record, lan, route)?,
            TopologyRules::Inter { vlans, route } => {
                self.render_inter(&mut pass, record, vlans, route)?
            }
        }

        Ok(Rendered {
            key: key.clone(),
            text: pass.text,
            diagnostics: pass.diagnostics,
        })
    }

    fn render_flat(
        &self,
        pass: &mut Pass,
        record: &Record,
        lan: &SubnetRules,
        route: &Rule,
    ) -> Result<()> {
        let Some((ip, mask)) = FLAT_LAN_PAIRS
            .iter()
            .find_map(|(ip_col, mask_col)| {
                record
                    .non_blank(ip_col)
                    .map(|ip| (ip, record.non_blank(mask_col)))
            })
        else {
            log::warn!(
                "{}: no LAN address in {:?}, LAN block left as is",
                pass.key,
                FLAT_LAN_COLUMNS
            );
            return Ok(());
        };
        let mask = mask.unwrap_or(self.settings.fallback_mask.as_str());

        let lan_plan = plan(ip, mask, self.settings.reserve_count)?;
        pass.apply_subnet(lan, ip, &lan_plan);
        // the branch route mirrors the LAN subnet
        pass.apply(
            route,
            &format!("{} {}", lan_plan.network_address, lan_plan.netmask),
        );
        Ok(())
    }

    fn render_inter(
        &self,
        pass: &mut Pass,
        record: &Record,
        vlans: &[VlanRules],
        route: &Rule,
    ) -> Result<()> {
        for vlan in vlans {
            let Some(ip) = record.non_blank(&vlan_column(&vlan.vlan)) else {
                continue;
            };
            let vlan_plan = plan(ip, &vlan.mask, self.settings.reserve_count)?;
            log::trace!("{}: VLAN {} {:?}", pass.key, vlan.vlan, vlan_plan);
            pass.apply_subnet(&vlan.rules, ip, &vlan_plan);
        }

        let (ip_col, mask_col) = BRANCH_ROUTE_COLUMNS;
        if let (Some(ip), Some(mask)) = (record.non_blank(ip_col), record.non_blank(mask_col)) {
            // validated only, the route keeps the values as written
            plan(ip, mask, 0)?;
            pass.apply(route, &format!("{ip} {mask}"));
        }
        Ok(())
    }
}
