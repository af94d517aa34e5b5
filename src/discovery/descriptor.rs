// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Decoding of discovery broadcasts into device descriptors.

use std::collections::HashSet;
use std::net::Ipv4Addr;

use serde::Serialize;

use super::BUTTON_PLUS_DEVICE_TYPE;
use super::packet::parse_udp_frame;
use crate::error::DecodeError;
use crate::types::MacAddress;

/// Payload offset of the device type byte.
const DEVICE_TYPE_OFFSET: usize = 6;

/// Connection flags carried in the last byte of a discovery broadcast.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub struct DeviceStatus {
    /// The device is connected to the vendor cloud.
    pub cloud_connected: bool,
    /// The device is registered to an account.
    pub registered: bool,
    /// The device is a child in a mesh network.
    pub mesh_child: bool,
}

impl DeviceStatus {
    /// Decodes the status byte.
    ///
    /// The flags are the first three characters of the byte's binary
    /// representation without zero padding, so `0b101` (5) reads as
    /// cloud-connected, not registered, mesh child, while `0b1000_0000`
    /// reads as cloud-connected only. Bytes below 4 have fewer than three
    /// binary digits and are rejected.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::InvalidValue`] for bytes below 4.
    ///
    /// # Examples
    ///
    /// ```
    /// use mystrom_lib::discovery::DeviceStatus;
    ///
    /// let status = DeviceStatus::from_byte(0b101).unwrap();
    /// assert!(status.cloud_connected);
    /// assert!(!status.registered);
    /// assert!(status.mesh_child);
    /// ```
    pub fn from_byte(byte: u8) -> Result<Self, DecodeError> {
        let digits = format!("{byte:b}");
        let flags: Vec<bool> = digits.chars().take(3).map(|c| c == '1').collect();

        match flags[..] {
            [cloud_connected, registered, mesh_child] => Ok(Self {
                cloud_connected,
                registered,
                mesh_child,
            }),
            _ => Err(DecodeError::InvalidValue {
                field: "status".to_string(),
                message: format!("status byte {byte} has fewer than three binary digits"),
            }),
        }
    }
}

/// A device found by passive discovery. Identity is [`DeviceDescriptor::mac`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct DeviceDescriptor {
    /// Source MAC of the broadcast.
    #[serde(serialize_with = "serialize_mac")]
    pub mac: MacAddress,
    /// Source IPv4 address of the broadcast.
    pub ip: Ipv4Addr,
    /// Product family code.
    pub device_type: u8,
    /// Connection flags.
    pub status: DeviceStatus,
}

fn serialize_mac<S: serde::Serializer>(mac: &MacAddress, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(mac.as_str())
}

impl DeviceDescriptor {
    /// Returns `true` if the device belongs to the Button Plus family.
    #[must_use]
    pub fn is_button_plus(&self) -> bool {
        u16::from(self.device_type) == BUTTON_PLUS_DEVICE_TYPE
    }
}

/// Decodes one captured link-layer frame.
///
/// # Errors
///
/// Returns error if the frame is not an IPv4 UDP datagram, the payload is too
/// short to hold the device type, or the status byte cannot be decoded.
pub fn decode_frame(frame: &[u8]) -> Result<DeviceDescriptor, DecodeError> {
    let packet = parse_udp_frame(frame)?;
    let payload = packet.payload;

    tracing::trace!(
        source_port = packet.source_port,
        destination_port = packet.destination_port,
        len = payload.len(),
        "Captured UDP datagram"
    );

    if payload.len() <= DEVICE_TYPE_OFFSET {
        return Err(DecodeError::Truncated {
            layer: "discovery payload",
            needed: DEVICE_TYPE_OFFSET + 1,
            actual: payload.len(),
        });
    }

    let device_type = payload[DEVICE_TYPE_OFFSET];
    let status = DeviceStatus::from_byte(payload[payload.len() - 1])?;

    Ok(DeviceDescriptor {
        mac: MacAddress::from_bytes(packet.source_mac),
        ip: packet.source_ip,
        device_type,
        status,
    })
}

/// Decodes a batch of captured frames, one descriptor per MAC.
///
/// The first frame seen from a MAC wins; later frames from the same MAC are
/// ignored. Frames that fail to decode are logged and skipped. Output order
/// is the order of first sighting.
pub fn decode_frames<'a, I>(frames: I) -> Vec<DeviceDescriptor>
where
    I: IntoIterator<Item = &'a [u8]>,
{
    let mut seen = HashSet::new();
    let mut devices = Vec::new();

    for frame in frames {
        match decode_frame(frame) {
            Ok(device) => {
                if seen.insert(device.mac.clone()) {
                    tracing::debug!(
                        mac = %device.mac,
                        ip = %device.ip,
                        device_type = device.device_type,
                        "Decoded discovery broadcast"
                    );
                    devices.push(device);
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, len = frame.len(), "Skipping undecodable frame");
            }
        }
    }

    devices
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discovery::packet::build_frame;

    const MAC_A: [u8; 6] = [0xA4, 0xCF, 0x12, 0x0B, 0x7E, 0x01];
    const MAC_B: [u8; 6] = [0xA4, 0xCF, 0x12, 0x0B, 0x7E, 0x02];

    fn payload(device_type: u8, status: u8) -> Vec<u8> {
        let mut p = MAC_A.to_vec();
        p.push(device_type);
        p.push(0x00);
        p.push(status);
        p
    }

    #[test]
    fn decodes_button_plus_broadcast() {
        let frame = build_frame(MAC_A, Ipv4Addr::new(192, 168, 1, 42), &payload(118, 0b101));
        let device = decode_frame(&frame).unwrap();

        assert_eq!(device.mac.as_str(), "A4CF120B7E01");
        assert_eq!(device.ip, Ipv4Addr::new(192, 168, 1, 42));
        assert_eq!(device.device_type, 118);
        assert_eq!(
            device.status,
            DeviceStatus {
                cloud_connected: true,
                registered: false,
                mesh_child: true,
            }
        );
        assert!(device.is_button_plus());
    }

    #[test]
    fn status_uses_leftmost_binary_digits() {
        // 0b1000_0001: the leading three digits are "100", bit 0 is ignored.
        let status = DeviceStatus::from_byte(0b1000_0001).unwrap();
        assert!(status.cloud_connected);
        assert!(!status.registered);
        assert!(!status.mesh_child);

        // 0b110: no padding, so the leftmost digits are "110".
        let status = DeviceStatus::from_byte(0b110).unwrap();
        assert!(status.cloud_connected);
        assert!(status.registered);
        assert!(!status.mesh_child);

        // The leftmost digit of an unpadded binary string is always 1.
        for byte in 4..=u8::MAX {
            assert!(DeviceStatus::from_byte(byte).unwrap().cloud_connected);
        }
    }

    #[test]
    fn status_below_four_is_rejected() {
        for byte in 0..4 {
            assert!(matches!(
                DeviceStatus::from_byte(byte),
                Err(DecodeError::InvalidValue { .. })
            ));
        }
    }

    #[test]
    fn short_payload_is_rejected() {
        let frame = build_frame(MAC_A, Ipv4Addr::new(10, 0, 0, 5), &[1, 2, 3]);
        assert!(matches!(
            decode_frame(&frame),
            Err(DecodeError::Truncated { needed: 7, actual: 3, .. })
        ));
    }

    #[test]
    fn decode_frames_deduplicates_first_seen_wins() {
        let first = build_frame(MAC_A, Ipv4Addr::new(10, 0, 0, 5), &payload(118, 0b111));
        let other = build_frame(MAC_B, Ipv4Addr::new(10, 0, 0, 6), &payload(101, 0b100));
        let repeat = build_frame(MAC_A, Ipv4Addr::new(10, 0, 0, 99), &payload(118, 0b100));

        let devices = decode_frames([first.as_slice(), other.as_slice(), repeat.as_slice()]);

        assert_eq!(devices.len(), 2);
        assert_eq!(devices[0].mac.as_str(), "A4CF120B7E01");
        assert_eq!(devices[0].ip, Ipv4Addr::new(10, 0, 0, 5));
        assert!(devices[0].status.mesh_child);
        assert_eq!(devices[1].mac.as_str(), "A4CF120B7E02");
        assert!(!devices[1].is_button_plus());
    }

    #[test]
    fn decode_frames_skips_garbage() {
        let good = build_frame(MAC_A, Ipv4Addr::new(10, 0, 0, 5), &payload(118, 0b101));
        let garbage = vec![0u8; 5];

        let devices = decode_frames([garbage.as_slice(), good.as_slice()]);
        assert_eq!(devices.len(), 1);
    }

    #[test]
    fn descriptor_serializes_mac_as_string() {
        let frame = build_frame(MAC_A, Ipv4Addr::new(10, 0, 0, 5), &payload(118, 0b101));
        let device = decode_frame(&frame).unwrap();
        let json = serde_json::to_value(&device).unwrap();

        assert_eq!(json["mac"], "A4CF120B7E01");
        assert_eq!(json["ip"], "10.0.0.5");
        assert_eq!(json["device_type"], 118);
        assert_eq!(json["status"]["cloud_connected"], true);
    }
}
