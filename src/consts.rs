//! Constants shared across the radio link and transport layers.
//!
//! This module fixes the wire-level frame budget, the transport header
//! layout, the reserved addresses and the valid tick-rate range. All sizes
//! are in bytes before line coding; the per-mode tick counts (strobe, sync,
//! word slots) live with the coding tables in [`crate::coding`].
//!
//! ## Frame budget
//!
//! A link frame carries at most [`MAX_FRAME_SIZE`] bytes. The transport
//! layer spends [`TRANSPORT_HEADER_LEN`] of those on the destination/source
//! header and [`CRC_LEN`] on the trailing checksum, and caps user data at
//! [`MAX_DATA_SIZE`] bytes per message.

/// Maximum number of bytes in a single link frame, headers and CRC included.
///
/// The receive state machine rejects any announced byte count above this
/// value, and `transmit` truncates longer buffers to it.
pub const MAX_FRAME_SIZE: usize = 40;

/// Maximum number of user data bytes the transport layer accepts per
/// message; `send` truncates longer payloads to this length.
pub const MAX_DATA_SIZE: usize = 32;

/// Bytes spent on the transport header (16-bit destination plus 16-bit
/// source address).
pub const TRANSPORT_HEADER_LEN: usize = 4;

/// Bytes spent on the trailing CRC-16.
pub const CRC_LEN: usize = 2;

/// Smallest link frame that can carry a transport message: header plus CRC,
/// zero data bytes.
pub const MIN_TRANSPORT_FRAME: usize = TRANSPORT_HEADER_LEN + CRC_LEN;

/// Destination address accepted by every receiver in addition to its own.
pub const BROADCAST_ADDR: u16 = 0xffff;

/// Slowest configurable link rate in bits per second.
pub const MIN_LINK_RATE: u16 = 100;

/// Fastest configurable link rate in bits per second.
pub const MAX_LINK_RATE: u16 = 5000;
