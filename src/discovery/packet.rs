// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Minimal Ethernet / IPv4 / UDP dissection for captured broadcast frames.

use std::net::Ipv4Addr;

use crate::error::DecodeError;

const ETHERNET_HEADER_LEN: usize = 14;
const VLAN_TAG_LEN: usize = 4;
const IPV4_MIN_HEADER_LEN: usize = 20;
const UDP_HEADER_LEN: usize = 8;

const ETHERTYPE_IPV4: u16 = 0x0800;
const ETHERTYPE_VLAN: u16 = 0x8100;
const ETHERTYPE_QINQ: u16 = 0x88A8;
const IP_PROTOCOL_UDP: u8 = 17;

/// The parts of a captured UDP datagram that discovery needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct UdpPacket<'a> {
    pub source_mac: [u8; 6],
    pub source_ip: Ipv4Addr,
    pub source_port: u16,
    pub destination_port: u16,
    pub payload: &'a [u8],
}

fn ensure(data: &[u8], needed: usize, layer: &'static str) -> Result<(), DecodeError> {
    if data.len() < needed {
        return Err(DecodeError::Truncated {
            layer,
            needed,
            actual: data.len(),
        });
    }
    Ok(())
}

fn be_u16(data: &[u8], at: usize) -> u16 {
    u16::from_be_bytes([data[at], data[at + 1]])
}

/// Dissects an Ethernet II frame carrying an IPv4 UDP datagram.
///
/// 802.1Q / 802.1ad tags are skipped. The UDP payload is bounded by the UDP
/// length field so that link-layer padding is not included.
pub(crate) fn parse_udp_frame(frame: &[u8]) -> Result<UdpPacket<'_>, DecodeError> {
    ensure(frame, ETHERNET_HEADER_LEN, "ethernet")?;

    let mut source_mac = [0u8; 6];
    source_mac.copy_from_slice(&frame[6..12]);

    let mut ether_type = be_u16(frame, 12);
    let mut offset = ETHERNET_HEADER_LEN;
    while ether_type == ETHERTYPE_VLAN || ether_type == ETHERTYPE_QINQ {
        ensure(frame, offset + VLAN_TAG_LEN, "vlan")?;
        ether_type = be_u16(frame, offset + 2);
        offset += VLAN_TAG_LEN;
    }

    if ether_type != ETHERTYPE_IPV4 {
        return Err(DecodeError::UnexpectedFormat(format!(
            "not an IPv4 frame (ethertype {ether_type:#06x})"
        )));
    }

    let ip = &frame[offset..];
    ensure(ip, IPV4_MIN_HEADER_LEN, "ipv4")?;

    let version = ip[0] >> 4;
    if version != 4 {
        return Err(DecodeError::UnexpectedFormat(format!(
            "IP version {version} is not IPv4"
        )));
    }

    let header_len = usize::from(ip[0] & 0x0F) * 4;
    if header_len < IPV4_MIN_HEADER_LEN {
        return Err(DecodeError::InvalidValue {
            field: "ihl".to_string(),
            message: format!("header length {header_len} is below 20"),
        });
    }
    ensure(ip, header_len, "ipv4")?;

    let total_len = usize::from(be_u16(ip, 2));
    let ip = &ip[..total_len.clamp(header_len, ip.len())];

    if ip[9] != IP_PROTOCOL_UDP {
        return Err(DecodeError::UnexpectedFormat(format!(
            "IP protocol {} is not UDP",
            ip[9]
        )));
    }

    let source_ip = Ipv4Addr::new(ip[12], ip[13], ip[14], ip[15]);

    let udp = &ip[header_len..];
    ensure(udp, UDP_HEADER_LEN, "udp")?;

    let udp_len = usize::from(be_u16(udp, 4));
    let payload = &udp[UDP_HEADER_LEN..udp_len.clamp(UDP_HEADER_LEN, udp.len())];

    Ok(UdpPacket {
        source_mac,
        source_ip,
        source_port: be_u16(udp, 0),
        destination_port: be_u16(udp, 2),
        payload,
    })
}

/// Builds an Ethernet II / IPv4 / UDP broadcast frame. Test helper.
#[cfg(test)]
pub(crate) fn build_frame(source_mac: [u8; 6], source_ip: Ipv4Addr, payload: &[u8]) -> Vec<u8> {
    let udp_len = u16::try_from(UDP_HEADER_LEN + payload.len()).unwrap();
    let ip_len = u16::try_from(IPV4_MIN_HEADER_LEN).unwrap() + udp_len;

    let mut frame = Vec::new();
    frame.extend_from_slice(&[0xFF; 6]);
    frame.extend_from_slice(&source_mac);
    frame.extend_from_slice(&ETHERTYPE_IPV4.to_be_bytes());

    frame.push(0x45);
    frame.push(0);
    frame.extend_from_slice(&ip_len.to_be_bytes());
    frame.extend_from_slice(&[0, 0, 0, 0]);
    frame.push(64);
    frame.push(IP_PROTOCOL_UDP);
    frame.extend_from_slice(&[0, 0]);
    frame.extend_from_slice(&source_ip.octets());
    frame.extend_from_slice(&[255, 255, 255, 255]);

    frame.extend_from_slice(&7979u16.to_be_bytes());
    frame.extend_from_slice(&7979u16.to_be_bytes());
    frame.extend_from_slice(&udp_len.to_be_bytes());
    frame.extend_from_slice(&[0, 0]);
    frame.extend_from_slice(payload);
    frame
}
