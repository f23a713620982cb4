//! Addressed, checksummed transport on top of the raw link.
//!
//! The link layer in [`crate::link`] moves opaque byte frames between
//! exactly two modules. This module gives those frames a destination, a
//! sender and an integrity check, so several stations can share one radio
//! channel:
//!
//! ```text
//! | dst_addr (u16 LE) | src_addr (u16 LE) | data (0..=32 bytes) | crc (u16 LE) |
//! ```
//!
//! The CRC-16/CCITT trailer covers the header and the data;
//! see [`crate::crc`]. Addresses are 16-bit values where `0` means
//! unconfigured and `0xffff` addresses every station, so
//! [`send()`](RadioLink::send) and [`recv()`](RadioLink::recv) refuse to
//! run until [`set_address()`](RadioLink::set_address) assigned something
//! else. Frames for other stations are dropped silently unless the
//! receiver is promiscuous.
//!
//! Delivery is best effort: a frame that fails its checksum is reported
//! once and discarded, and nothing is retransmitted.

use crate::consts::{
    BROADCAST_ADDR, CRC_LEN, MAX_DATA_SIZE, MAX_FRAME_SIZE, MIN_TRANSPORT_FRAME,
    TRANSPORT_HEADER_LEN,
};
use crate::crc::crc16_ccitt;
use crate::link::{LinkError, RadioLink};
use crate::timer::TickSource;
use embedded_hal::digital::{InputPin, OutputPin};
use heapless::Vec;

/// Addressing header leading every transport frame.
///
/// Both addresses travel in little-endian byte order.
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub struct FrameHeader {
    /// Station the frame is for, or [`BROADCAST_ADDR`] for every station.
    pub dst_addr: u16,
    /// Station the frame came from.
    pub src_addr: u16,
}

impl FrameHeader {
    /// Serializes the header into its wire byte order.
    pub fn to_bytes(&self) -> [u8; TRANSPORT_HEADER_LEN] {
        let dst = self.dst_addr.to_le_bytes();
        let src = self.src_addr.to_le_bytes();
        [dst[0], dst[1], src[0], src[1]]
    }

    /// Reads a header back out of the front of a frame.
    /// Returns `None` if the slice cannot hold one.
    pub fn parse(frame: &[u8]) -> Option<Self> {
        if frame.len() < TRANSPORT_HEADER_LEN {
            return None;
        }
        Some(Self {
            dst_addr: u16::from_le_bytes([frame[0], frame[1]]),
            src_addr: u16::from_le_bytes([frame[2], frame[3]]),
        })
    }
}

/// Assembles header, data and CRC trailer into one link frame.
fn build_frame(header: FrameHeader, data: &[u8]) -> Vec<u8, MAX_FRAME_SIZE> {
    let mut frame: Vec<u8, MAX_FRAME_SIZE> = Vec::new();
    let _ = frame.extend_from_slice(&header.to_bytes());
    let _ = frame.extend_from_slice(data);
    let crc = crc16_ccitt(&frame);
    let _ = frame.extend_from_slice(&crc.to_le_bytes());
    frame
}

impl<TX, RX, ACT, CLK> RadioLink<TX, RX, ACT, CLK>
where
    TX: OutputPin,
    RX: InputPin,
    ACT: OutputPin,
    CLK: TickSource,
{
    /// Sends `data` to the station at `dst_addr`.
    ///
    /// The frame is prefixed with the addressing header and closed with a
    /// CRC-16 trailer, then handed to [`transmit()`](RadioLink::transmit).
    /// Data beyond [`MAX_DATA_SIZE`](crate::consts::MAX_DATA_SIZE) bytes is
    /// silently truncated. Use [`BROADCAST_ADDR`] to address every station.
    ///
    /// # Errors
    /// - [`LinkError::Config`] if no address was assigned with
    ///   [`set_address()`](RadioLink::set_address), or if this end is not
    ///   the transmitter.
    /// - [`LinkError::Busy`] if a previous frame is still draining.
    pub fn send(&mut self, dst_addr: u16, data: &[u8]) -> Result<(), LinkError> {
        if self.address() == 0 {
            return Err(LinkError::Config);
        }
        let len = data.len().min(MAX_DATA_SIZE);
        let header = FrameHeader {
            dst_addr,
            src_addr: self.address(),
        };
        let frame = build_frame(header, &data[..len]);
        self.transmit(&frame)
    }

    /// Receives the next frame addressed to this station.
    ///
    /// Frames for other stations are dropped without notice unless
    /// promiscuous reception is enabled. An accepted frame has its CRC
    /// trailer checked before the data is copied into `buf`; the sender's
    /// address and the data length are returned.
    ///
    /// # Errors
    /// - [`LinkError::Config`] if no address was assigned, or if this end
    ///   is not the receiver, or if `buf` cannot hold the frame's data.
    /// - [`LinkError::NoData`] if nothing addressed to this station has
    ///   arrived.
    /// - [`LinkError::Frame`] if reception was aborted mid-frame.
    /// - [`LinkError::Crc`] if the frame is too short to carry a trailer
    ///   or its checksum does not match; the frame is discarded.
    pub fn recv(&mut self, buf: &mut [u8]) -> Result<(u16, u8), LinkError> {
        if self.address() == 0 {
            return Err(LinkError::Config);
        }
        let mut frame = [0u8; MAX_FRAME_SIZE];
        let (header, size) = loop {
            let size = self.receive(&mut frame)? as usize;
            if size < MIN_TRANSPORT_FRAME {
                self.rx_bad += 1;
                return Err(LinkError::Crc);
            }
            let header = FrameHeader::parse(&frame[..size]).ok_or(LinkError::Crc)?;
            if self.promiscuous()
                || header.dst_addr == self.address()
                || header.dst_addr == BROADCAST_ADDR
            {
                break (header, size);
            }
            // Someone else's frame, keep listening.
        };
        let crc_offset = size - CRC_LEN;
        let wire_crc = u16::from_le_bytes([frame[crc_offset], frame[crc_offset + 1]]);
        if crc16_ccitt(&frame[..crc_offset]) != wire_crc {
            self.rx_bad += 1;
            return Err(LinkError::Crc);
        }
        let data_len = size - TRANSPORT_HEADER_LEN - CRC_LEN;
        if buf.len() < data_len {
            return Err(LinkError::Config);
        }
        buf[..data_len].copy_from_slice(&frame[TRANSPORT_HEADER_LEN..crc_offset]);
        Ok((header.src_addr, data_len as u8))
    }
}
