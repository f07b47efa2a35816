//! Compiled-in network parameters and the derivations built on them.
//!
//! Everything here is read-only and never persisted, so none of it takes part in
//! the integrity check of the settings record. The device id suffix keeps several
//! nodes distinguishable on the same network.

use crate::digest::DeviceId;
use alloc::format;
use alloc::string::String;
use core::net::Ipv4Addr;

/// Hostname prefix; the device id is appended.
pub const HOSTNAME_PREFIX: &str = "TempNode-";

/// SSID prefix of the provisioning access point; the device id is appended.
pub const AP_SSID_PREFIX: &str = "TempNode_";

/// Passphrase of the provisioning access point.
pub const AP_PWD: &str = "P@ssw0rd123";

/// Address layout of the provisioning network.
pub const AP_NET_IP: Ipv4Addr = Ipv4Addr::new(192, 168, 1, 1);
pub const AP_SUBNET: Ipv4Addr = Ipv4Addr::new(255, 255, 255, 0);
pub const AP_GATEWAY: Ipv4Addr = Ipv4Addr::new(0, 0, 0, 0);

/// UDP port the periodic status datagram goes out on.
pub const BROADCAST_PORT: u16 = 8888;

pub fn hostname(device_id: &DeviceId) -> String {
    format!("{HOSTNAME_PREFIX}{device_id}")
}

pub fn ap_ssid(device_id: &DeviceId) -> String {
    format!("{AP_SSID_PREFIX}{device_id}")
}

/// The directed broadcast address of the network `ip` sits on: network part kept,
/// host part all ones.
pub fn broadcast_address(ip: Ipv4Addr, subnet: Ipv4Addr) -> Ipv4Addr {
    let ip = u32::from(ip);
    let mask = u32::from(subnet);
    Ipv4Addr::from((ip & mask) | !mask)
}

/// Formats the periodic status datagram. Fields are `::`-separated so receivers
/// can split without a real parser.
pub fn broadcast_payload(ip: Ipv4Addr, device_id: &DeviceId, temp: f32, humidity: f32) -> String {
    format!("TempNode::{ip}::{device_id}::T_{temp}::H_{humidity}")
}
