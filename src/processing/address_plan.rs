//! DHCP range planning for one subnet.

use crate::error::{GenError, Result};
use crate::models::Ipv4;
use serde::Serialize;

/// Addresses derived for one subnet.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct NetworkPlan {
    pub network_address: String,
    /// Dotted form of the mask the plan was computed with.
    pub netmask: String,
    pub range_start: String,
    pub range_end: String,
}

/// Compute network address and DHCP range for `ip`/`mask`.
///
/// Host bits in `ip` are ignored for the network. The range starts at the
/// first usable host and ends `reserve_count` hosts before the last usable
/// one, never before the start. Subnets without usable hosts (/31, /32)
/// return the input IP for every address.
///
/// # Examples
/// ```
/// use teldat_config_gen::processing::plan;
/// let p = plan("10.0.0.5", "255.255.255.240", 2).unwrap();
/// assert_eq!(p.network_address, "10.0.0.0");
/// assert_eq!(p.range_start, "10.0.0.1");
/// assert_eq!(p.range_end, "10.0.0.12");
/// ```
pub fn plan(ip: &str, mask: &str, reserve_count: usize) -> Result<NetworkPlan> {
    let (ip, mask) = (ip.trim(), mask.trim());
    let net = Ipv4::with_mask(ip, mask).map_err(|e| GenError::address(ip, mask, e.to_string()))?;
    let netmask = net.netmask().to_string();

    let count = net.num_hosts();
    if count == 0 {
        log::debug!("plan({net}) has no usable hosts, using {ip} for every address");
        return Ok(NetworkPlan {
            network_address: ip.to_string(),
            netmask,
            range_start: ip.to_string(),
            range_end: ip.to_string(),
        });
    }

    let end_index = count
        .saturating_sub(1)
        .saturating_sub(reserve_count as u64);
    // count > 0, so both indexes are in range
    let range_start = net.host(0).unwrap_or(net.addr);
    let range_end = net.host(end_index).unwrap_or(range_start);

    let plan = NetworkPlan {
        network_address: net.lo().to_string(),
        netmask,
        range_start: range_start.to_string(),
        range_end: range_end.to_string(),
    };
    log::trace!("plan({net}, reserve={reserve_count}) = {:?}", plan);
    Ok(plan)
}
