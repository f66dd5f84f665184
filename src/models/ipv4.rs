//! IPv4 address and netmask utilities.
//!
//! Provides [`Ipv4`] for an address with a prefix length, along with the
//! subnet helpers the address planner builds on.

use serde::{Serialize, Serializer};
use std::error::Error;
use std::net::Ipv4Addr;
use std::str::FromStr;

/// Maximum length for an IPv4 subnet mask (32 bits).
pub const MAX_LENGTH: u8 = 32;

/// Convert a CIDR prefix length to a subnet mask as u32.
///
/// # Examples
/// ```
/// use teldat_config_gen::models::get_cidr_mask;
/// assert_eq!(get_cidr_mask(24).unwrap(), 0xFFFFFF00);
/// ```
pub fn get_cidr_mask(len: u8) -> Result<u32, Box<dyn Error>> {
    if len > MAX_LENGTH {
        Err("Network length is too long".into())
    } else {
        let right_len = MAX_LENGTH - len;
        let all_bits = u32::MAX as u64;

        let mask = (all_bits >> right_len) << right_len;

        Ok(mask as u32)
    }
}

/// Dotted netmask for a prefix length, e.g. 28 -> 255.255.255.240.
pub fn dotted_mask(len: u8) -> Result<Ipv4Addr, Box<dyn Error>> {
    Ok(Ipv4Addr::from(get_cidr_mask(len)?))
}

/// Parse a netmask into a prefix length.
///
/// Accepts a dotted netmask (`255.255.255.192`) or a prefix length with or
/// without a leading slash (`26`, `/26`). Non-contiguous masks are rejected.
pub fn parse_mask(mask: &str) -> Result<u8, Box<dyn Error>> {
    let mask = mask.trim();
    if mask.contains('.') {
        let addr = Ipv4Addr::from_str(mask).map_err(|_| format!("Invalid netmask {mask}"))?;
        let bits = u32::from(addr);
        let len = bits.leading_ones() as u8;
        if bits != get_cidr_mask(len)? {
            return Err(format!("Netmask {mask} is not contiguous").into());
        }
        Ok(len)
    } else {
        let len: u8 = mask
            .trim_start_matches('/')
            .parse()
            .map_err(|_| format!("Invalid netmask {mask}"))?;
        if len > MAX_LENGTH {
            return Err("Network length is too long".into());
        }
        Ok(len)
    }
}

/// Get the network address for a given IP and prefix length.
pub fn cut_addr(addr: Ipv4Addr, len: u8) -> Result<Ipv4Addr, Box<dyn Error>> {
    if len > MAX_LENGTH {
        Err("Network length is too long".into())
    } else {
        let right_len = MAX_LENGTH - len;
        let bits = u32::from(addr) as u64;
        let new_bits = (bits >> right_len) << right_len;

        Ok(Ipv4Addr::from(new_bits as u32))
    }
}

/// Calculate the broadcast address for a given IP and prefix length.
pub fn broadcast_addr(addr: Ipv4Addr, len: u8) -> Result<Ipv4Addr, Box<dyn Error>> {
    if len > MAX_LENGTH {
        Err("Network length is too long".into())
    } else {
        let mask = get_cidr_mask(len)?;
        let addr_bits = u32::from(addr);
        let network_bits = addr_bits & mask;
        let broadcast_bits = network_bits | (!mask);
        Ok(Ipv4Addr::from(broadcast_bits))
    }
}

/// Number of usable host addresses (network and broadcast excluded).
///
/// /31 and /32 have no usable hosts here.
pub fn num_hosts(len: u8) -> Result<u64, Box<dyn Error>> {
    if len > MAX_LENGTH {
        Err("Network length is too long".into())
    } else if len >= MAX_LENGTH - 1 {
        Ok(0)
    } else {
        Ok((1u64 << (MAX_LENGTH - len)) - 2)
    }
}

/// IPv4 address with CIDR notation support.
#[derive(Eq, Ord, PartialEq, PartialOrd, Debug, Copy, Clone, Hash)]
pub struct Ipv4 {
    /// The IPv4 address, host bits included.
    pub addr: Ipv4Addr,
    /// The subnet mask length (0-32).
    pub mask: u8,
}

impl Serialize for Ipv4 {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl Ipv4 {
    /// Create a new [`Ipv4`] from a CIDR string (e.g., "10.0.0.0/24").
    pub fn new(addr_cidr: &str) -> Result<Ipv4, Box<dyn Error>> {
        let addr_cidr = addr_cidr.trim();
        let parts: Vec<&str> = addr_cidr.split('/').collect();
        if parts.len() != 2 {
            return Err("Invalid address/mask".into());
        }
        Ipv4::with_mask(parts[0], parts[1])
    }

    /// Create an [`Ipv4`] from an address and a netmask in any form
    /// [`parse_mask`] understands. Host bits are kept.
    pub fn with_mask(addr: &str, mask: &str) -> Result<Ipv4, Box<dyn Error>> {
        let addr: Ipv4Addr = addr
            .trim()
            .parse()
            .map_err(|_| format!("Invalid address {}", addr.trim()))?;
        let mask = parse_mask(mask)?;
        Ok(Ipv4 { addr, mask })
    }

    /// Get the lowest (network) address in the subnet.
    pub fn lo(&self) -> Ipv4Addr {
        // mask is validated on construction
        cut_addr(self.addr, self.mask).unwrap_or(self.addr)
    }

    /// Get the highest (broadcast) address in the subnet.
    pub fn hi(&self) -> Ipv4Addr {
        broadcast_addr(self.addr, self.mask).unwrap_or(self.addr)
    }

    pub fn netmask(&self) -> Ipv4Addr {
        dotted_mask(self.mask).unwrap_or(Ipv4Addr::BROADCAST)
    }

    pub fn num_hosts(&self) -> u64 {
        num_hosts(self.mask).unwrap_or(0)
    }

    /// The `index`-th usable host in ascending order, if it exists.
    pub fn host(&self, index: u64) -> Option<Ipv4Addr> {
        if index >= self.num_hosts() {
            return None;
        }
        let bits = u32::from(self.lo()) as u64 + 1 + index;
        Some(Ipv4Addr::from(bits as u32))
    }

    /// Returns true if `ip` is a usable host of this subnet.
    pub fn is_host(&self, ip: Ipv4Addr) -> bool {
        self.num_hosts() > 0 && ip > self.lo() && ip < self.hi()
    }
}

impl std::fmt::Display for Ipv4 {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}/{}", self.addr, self.mask)
    }
}
