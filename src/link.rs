//! Half-duplex radio link driver for 433 MHz OOK modules.
//!
//! This module provides the [`RadioLink`] struct, a software bit-banged link
//! layer for low-cost 433 MHz RF pairs. One end is configured as the
//! transmitter and the other as the receiver; each end advances its own
//! state machine by exactly one step per call to [`tick()`](RadioLink::tick).
//!
//! The driver is platform independent: it only needs `embedded-hal` digital
//! pins and a periodic caller of `tick()` running at the configured link
//! rate (one tick per wire bit, e.g. every 500 µs at 2000 bps).
//!
//! ## Frame on the wire
//!
//! Every transmission is one link frame:
//!
//! 1. a strobe of alternating bits, settling the receiver's gain control
//! 2. a sync window, driven high for its first half and low for the second
//! 3. a count word carrying the frame length in bytes
//! 4. the data words
//! 5. an all-zero leadout word
//!
//! Words are shaped by the configured [`LineCoding`]; see [`crate::coding`]
//! for the wire word layout. The receiver locks onto the sync window, then
//! re-centers its sampling phase on the falling edge that starts each word.
//!
//! ## Example
//!
//! ```rust
//! # use embedded_hal_mock::eh1::digital::{Mock as Pin, State as PinState, Transaction as PinTransaction};
//! use rflink433::coding::LineCoding;
//! use rflink433::link::{LinkDirection, RadioLink};
//! use rflink433::timer::FreeRunning;
//!
//! fn main() {
//!     # let tx_pin = Pin::new(&[PinTransaction::set(PinState::Low)]);
//!     # let rx_pin = Pin::new(&[]);
//!     let mut link: RadioLink<Pin, Pin, Pin, FreeRunning> = RadioLink::new(
//!         tx_pin,
//!         rx_pin,
//!         None,
//!         FreeRunning,
//!         LinkDirection::Tx,
//!         LineCoding::Balanced4b5b,
//!         2000,
//!     )
//!     .unwrap();
//!
//!     loop {
//!         link.tick(); // Called every 500 µs by a delay loop or timer interrupt
//!         # break; // For testing purposes
//!     }
//!     # link.tx.done();
//!     # link.rx.done();
//! }
//! ```
//!
//! ## Design Notes
//!
//! This module moves raw frames only. It does not address peers or protect
//! data against corruption by itself; the transport layer in
//! [`crate::transport`] adds addressing and a CRC-16 trailer on top.
//!
//! For timer and tick scheduling helpers, see [`crate::timer`].

use crate::coding::LineCoding;
use crate::consts::{MAX_FRAME_SIZE, MAX_LINK_RATE, MIN_LINK_RATE};
use crate::timer::{TickSource, TimerConfig};
use core::convert::Infallible;
use embedded_hal::digital::{InputPin, OutputPin};
use thiserror::Error;

/// Role of a link end, fixed at construction.
///
/// The RF modules this driver targets are simplex devices, so each
/// [`RadioLink`] drives either the transmitter or the receiver module, never
/// both. Build one link per module and give each its own pins.
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub enum LinkDirection {
    /// This end owns the transmitter module and streams frames out.
    Tx,
    /// This end owns the receiver module and samples frames in.
    Rx,
}

/// State machine position of a [`RadioLink`], advanced once per tick.
///
/// Both directions share the state set. A transmitter walks
/// `Ready -> Start -> Strobe -> Sync -> Payload -> Data -> Leadout -> Ready`
/// for every frame. A receiver idles in `Ready` until it locks onto a sync
/// window, mirrors the word states while sampling, and parks in `Recv` with
/// a frame ready (or in `Error` after losing the stream) until the frame is
/// collected.
#[derive(PartialEq, Eq, Clone, Copy, Default, Debug)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub enum LinkState {
    /// Idle. A transmitter accepts a new frame here; a receiver hunts for
    /// a sync window.
    #[default]
    Ready,
    /// Transient reset state entered when a frame has been handed over.
    Start,
    /// The transmitter is toggling the line to settle the receiver's AGC.
    Strobe,
    /// The sync window: half high, half low on the wire.
    Sync,
    /// The count word announcing the frame length is on the wire.
    Payload,
    /// Frame data words are on the wire.
    Data,
    /// The closing all-zero word is on the wire.
    Leadout,
    /// Receive side only: a complete frame is buffered and waiting for
    /// [`receive()`](RadioLink::receive).
    Recv,
    /// Receive side only: reception was aborted. Cleared by
    /// [`receive()`](RadioLink::receive), which reports the failure once.
    Error,
}

/// Errors reported by the link and transport operations.
#[derive(Error, PartialEq, Eq, Clone, Copy, Debug)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub enum LinkError {
    /// The operation does not fit the link configuration: rate out of
    /// bounds, wrong direction for the call, unset address or an undersized
    /// caller buffer.
    #[error("invalid configuration or misuse")]
    Config,
    /// A transmission is still draining; try again once the link is idle.
    #[error("link busy")]
    Busy,
    /// No received frame is pending.
    #[error("no data received")]
    NoData,
    /// Reception aborted: sync was lost mid-frame or the count word was
    /// invalid.
    #[error("framing error")]
    Frame,
    /// The transport checksum did not match the received frame.
    #[error("CRC mismatch")]
    Crc,
}

/// A software bit-banged half-duplex link for 433 MHz OOK radio modules.
///
/// `RadioLink` drives a transmitter module (e.g. FS1000A) or samples a
/// receiver module (e.g. XY-MK-5V) through `embedded-hal` digital pins,
/// with all timing supplied by periodic [`tick()`](RadioLink::tick) calls.
///
/// ## Transmission
///
/// [`transmit()`](RadioLink::transmit) copies a frame into the internal
/// buffer and arms the state machine; subsequent ticks stream the strobe,
/// sync window, count word, data words and leadout onto the TX pin using
/// On-Off Keying, where `HIGH` is carrier on and `LOW` is carrier off.
/// Completion can be awaited with [`poll_done()`](RadioLink::poll_done).
///
/// ## Reception
///
/// Each tick samples the RX pin. After locking onto a sync window the
/// receiver accumulates wire words, re-centering its sampling phase on the
/// falling edge that opens every word. A fully received frame parks the
/// machine in [`LinkState::Recv`] until [`receive()`](RadioLink::receive)
/// collects it; a receiver that loses the stream parks in
/// [`LinkState::Error`] until `receive()` acknowledges the failure.
///
/// ## Type Parameters
///
/// - `TX`: [`embedded_hal::digital::OutputPin`] keying the transmitter
/// - `RX`: [`embedded_hal::digital::InputPin`] sampling the receiver
/// - `ACT`: [`embedded_hal::digital::OutputPin`] for an optional activity
///   indicator, driven high while a frame is moving
/// - `CLK`: [`TickSource`] giving the driver limited control over the tick
///   schedule; use [`crate::timer::FreeRunning`] when there is none
///
/// ## Example
///
/// ```rust
/// # use embedded_hal_mock::eh1::digital::{Mock as Pin, State as PinState, Transaction as PinTransaction};
/// use rflink433::coding::LineCoding;
/// use rflink433::link::{LinkDirection, RadioLink};
/// use rflink433::timer::FreeRunning;
///
/// fn main() {
///     # let tx_pin = Pin::new(&[PinTransaction::set(PinState::Low)]);
///     # let rx_pin = Pin::new(&[]);
///     let mut link: RadioLink<Pin, Pin, Pin, FreeRunning> = RadioLink::new(
///         tx_pin,
///         rx_pin,
///         None,
///         FreeRunning,
///         LinkDirection::Tx,
///         LineCoding::Raw,
///         1000,
///     )
///     .unwrap();
///
///     link.transmit(b"hello").unwrap();
///     loop {
///         link.tick(); // Called every 1 ms by a delay loop or timer interrupt
///         # break; // For testing purposes
///     }
///     # link.tx.done();
///     # link.rx.done();
/// }
/// ```
///
/// ## Notes
///
/// - Only one `RadioLink` instance should drive a given module.
/// - You are responsible for calling `tick()` at the configured link rate
///   using either a hardware timer interrupt or a polling loop.
#[derive(Debug)]
pub struct RadioLink<TX, RX, ACT, CLK>
where
    TX: OutputPin,
    RX: InputPin,
    ACT: OutputPin,
    CLK: TickSource,
{
    /// Current state machine position.
    pub state: LinkState,
    /// TX data pin.
    pub tx: TX,
    /// RX data pin.
    pub rx: RX,
    /// Optional activity indicator pin.
    pub act: Option<ACT>,
    clock: CLK,
    direction: LinkDirection,
    coding: LineCoding,
    rate: u16,
    frame: [u8; MAX_FRAME_SIZE],
    count: u8,
    index: u8,
    bit_timer: u8,
    edge_timer: u8,
    accum: u16,
    tx_level: bool,
    address: u16,
    promiscuous: bool,

    /// Counter of fully transmitted frames.
    /// Incremented when the leadout word drains and the link returns to idle.
    pub tx_good: u16,

    /// Counter of discarded receptions.
    /// Incremented when framing is lost mid-frame, when a count word is
    /// invalid, or when the transport layer rejects a frame.
    pub rx_bad: u16,

    /// Counter of frames received in full.
    /// Incremented when a frame reaches the receive buffer, before any
    /// transport checks.
    pub rx_good: u16,
}

impl<TX, RX, ACT, CLK> RadioLink<TX, RX, ACT, CLK>
where
    TX: OutputPin,
    RX: InputPin,
    ACT: OutputPin,
    CLK: TickSource,
{
    /// Creates a new `RadioLink` for one end of the radio pair.
    ///
    /// # Arguments
    /// - `tx`: The output pin keying the 433 MHz transmitter (carrier on/off).
    /// - `rx`: The input pin sampling the receiver output.
    /// - `act`: An optional activity indicator output, e.g. an LED.
    /// - `clock`: The tick schedule handle; pass [`crate::timer::FreeRunning`]
    ///   when the schedule cannot be adjusted.
    /// - `direction`: Whether this end transmits or receives.
    /// - `coding`: The line coding, which both ends must share.
    /// - `rate`: The link rate in bits per second, `100..=5000`.
    ///
    /// # Returns
    /// A link in [`LinkState::Ready`], with the TX pin driven low (carrier
    /// off) and the activity pin (if any) driven low.
    ///
    /// # Errors
    /// [`LinkError::Config`] if `rate` is out of bounds.
    pub fn new(
        tx: TX,
        rx: RX,
        act: Option<ACT>,
        clock: CLK,
        direction: LinkDirection,
        coding: LineCoding,
        rate: u16,
    ) -> Result<Self, LinkError> {
        if !(MIN_LINK_RATE..=MAX_LINK_RATE).contains(&rate) {
            return Err(LinkError::Config);
        }
        let mut tx = tx;
        let _ = tx.set_low(); // Ensure idle
        let mut act = act;
        if let Some(ref mut pin) = act {
            let _ = pin.set_low();
        }
        Ok(Self {
            state: LinkState::Ready,
            tx,
            rx,
            act,
            clock,
            direction,
            coding,
            rate,
            frame: [0u8; MAX_FRAME_SIZE],
            count: 0,
            index: 0,
            bit_timer: coding.sync_ticks() - 1,
            edge_timer: 0,
            accum: 0,
            tx_level: false,
            address: 0,
            promiscuous: false,
            tx_good: 0,
            rx_bad: 0,
            rx_good: 0,
        })
    }

    /// Sets the transport address of this end.
    /// Address `0` means unconfigured; `0xffff` is reserved for broadcast.
    pub fn set_address(&mut self, address: u16) {
        self.address = address;
    }

    /// Returns the transport address of this end.
    pub fn address(&self) -> u16 {
        self.address
    }

    /// Enables or disables promiscuous reception.
    /// A promiscuous receiver delivers frames regardless of their
    /// destination address.
    pub fn set_promiscuous(&mut self, promiscuous: bool) {
        self.promiscuous = promiscuous;
    }

    /// Returns whether promiscuous reception is enabled.
    pub fn promiscuous(&self) -> bool {
        self.promiscuous
    }

    /// Returns the direction this end was built with.
    pub fn direction(&self) -> LinkDirection {
        self.direction
    }

    /// Returns the line coding this end was built with.
    pub fn coding(&self) -> LineCoding {
        self.coding
    }

    /// Returns the link rate in bits per second.
    pub fn rate(&self) -> u16 {
        self.rate
    }

    /// Computes a [`TimerConfig`] that ticks this link at its rate from a
    /// timer fed by `source_hz`.
    ///
    /// See [`TimerConfig::new`] for the prescaler selection rules.
    pub fn timer_config(&self, source_hz: u32) -> Result<TimerConfig, LinkError> {
        TimerConfig::new(source_hz, self.rate)
    }

    fn write_tx(&mut self, level: bool) {
        if level {
            let _ = self.tx.set_high();
        } else {
            let _ = self.tx.set_low();
        }
    }

    fn write_act(&mut self, level: bool) {
        if let Some(ref mut act) = self.act {
            if level {
                let _ = act.set_high();
            } else {
                let _ = act.set_low();
            }
        }
    }

    fn line_high(&mut self) -> bool {
        self.rx.is_high().unwrap_or(false)
    }

    /// Hands a frame to the transmitter and arms the state machine.
    ///
    /// The data is copied into the internal frame buffer, so the caller's
    /// buffer is free immediately. Anything beyond
    /// [`MAX_FRAME_SIZE`](crate::consts::MAX_FRAME_SIZE) bytes is silently
    /// truncated. An empty frame is legal on the wire but a peer receiver
    /// rejects its count word, so transports should not send one.
    ///
    /// The actual bit-by-bit transmission happens incrementally in
    /// [`tick()`](RadioLink::tick); await completion with
    /// [`poll_done()`](RadioLink::poll_done).
    ///
    /// # Errors
    /// - [`LinkError::Config`] if this end is not the transmitter.
    /// - [`LinkError::Busy`] if a previous frame is still draining.
    pub fn transmit(&mut self, data: &[u8]) -> Result<(), LinkError> {
        if self.direction != LinkDirection::Tx {
            return Err(LinkError::Config);
        }
        if self.state != LinkState::Ready {
            return Err(LinkError::Busy);
        }
        let count = data.len().min(MAX_FRAME_SIZE);
        self.frame[..count].copy_from_slice(&data[..count]);
        self.count = count as u8;
        self.state = LinkState::Start;
        self.clock.restart();
        Ok(())
    }

    /// Collects a received frame, or the failure that ended the reception.
    ///
    /// On success the frame is copied into `buf` and its length returned.
    /// Collecting restarts the state machine, so the receiver starts
    /// hunting for the next sync window on the following tick.
    ///
    /// # Errors
    /// - [`LinkError::Config`] if this end is not the receiver, or if `buf`
    ///   cannot hold the pending frame (the frame is kept).
    /// - [`LinkError::Frame`] if reception was aborted; reported once, then
    ///   the machine restarts.
    /// - [`LinkError::NoData`] if no complete frame is pending.
    pub fn receive(&mut self, buf: &mut [u8]) -> Result<u8, LinkError> {
        if self.direction != LinkDirection::Rx {
            return Err(LinkError::Config);
        }
        if self.state == LinkState::Error {
            self.state = LinkState::Start;
            return Err(LinkError::Frame);
        }
        if self.state != LinkState::Recv {
            return Err(LinkError::NoData);
        }
        let count = self.count as usize;
        if buf.len() < count {
            return Err(LinkError::Config);
        }
        buf[..count].copy_from_slice(&self.frame[..count]);
        self.state = LinkState::Start;
        Ok(self.count)
    }

    /// Non-blocking check for transmit completion.
    ///
    /// Returns [`nb::Error::WouldBlock`] while a frame is draining; ready
    /// otherwise. Wrap in [`nb::block!`] to busy-wait.
    pub fn poll_done(&self) -> nb::Result<(), Infallible> {
        if self.direction == LinkDirection::Tx && self.state != LinkState::Ready {
            Err(nb::Error::WouldBlock)
        } else {
            Ok(())
        }
    }

    /// Advances the state machine by exactly one step.
    ///
    /// This function must be called at the link rate, one call per wire
    /// bit (e.g. every 500 µs at 2000 bps). Transmitters drive one bit per
    /// call; receivers sample at most once per call.
    ///
    /// # Timing
    /// Must be called precisely and regularly, ideally from a hardware
    /// timer interrupt. See [`crate::timer`] for scheduling helpers.
    pub fn tick(&mut self) {
        match self.direction {
            LinkDirection::Tx => self.tick_tx(),
            LinkDirection::Rx => self.tick_rx(),
        }
    }

    fn tick_tx(&mut self) {
        match self.state {
            LinkState::Ready => {
                self.write_act(false);
            }
            LinkState::Start => {
                // A frame was handed over, spin up the transmission.
                self.write_act(true);
                self.state = LinkState::Strobe;
                self.bit_timer = self.coding.strobe_ticks() - 1;
            }
            LinkState::Strobe => {
                // Alternating bits calibrate the receiver's AGC.
                self.tx_level = !self.tx_level;
                let level = self.tx_level;
                self.write_tx(level);
                if self.bit_timer > 0 {
                    self.bit_timer -= 1;
                } else {
                    self.state = LinkState::Sync;
                    self.bit_timer = self.coding.sync_ticks() - 1;
                }
            }
            LinkState::Sync => {
                // Sync window: first half high, second half low.
                let level = self.bit_timer >= (self.coding.sync_ticks() >> 1);
                self.write_tx(level);
                if self.bit_timer > 0 {
                    self.bit_timer -= 1;
                } else {
                    self.state = LinkState::Payload;
                    self.bit_timer = self.coding.word_ticks() - 1;
                }
            }
            LinkState::Payload => {
                // The count word, MSB first, framing bit leading.
                let word = self.coding.wire_word(self.count);
                let level = (word >> self.bit_timer) & 1 != 0;
                self.write_tx(level);
                if self.bit_timer > 0 {
                    self.bit_timer -= 1;
                } else if self.count == 0 {
                    self.state = LinkState::Leadout;
                    self.bit_timer = self.coding.word_ticks() - 1;
                } else {
                    self.state = LinkState::Data;
                    self.index = 0;
                    self.bit_timer = self.coding.word_ticks() - 1;
                }
            }
            LinkState::Data => {
                let word = self.coding.wire_word(self.frame[self.index as usize]);
                let level = (word >> self.bit_timer) & 1 != 0;
                self.write_tx(level);
                if self.bit_timer > 0 {
                    self.bit_timer -= 1;
                } else {
                    self.index += 1;
                    self.bit_timer = self.coding.word_ticks() - 1;
                    if self.index >= self.count {
                        self.state = LinkState::Leadout;
                    }
                }
            }
            LinkState::Leadout => {
                // Closing word, all zeroes behind the framing pair.
                let word = self.coding.leadout_word();
                let level = (word >> self.bit_timer) & 1 != 0;
                self.write_tx(level);
                if self.bit_timer > 0 {
                    self.bit_timer -= 1;
                } else {
                    self.state = LinkState::Ready;
                    self.tx_good += 1;
                }
            }
            _ => {}
        }
    }

    fn tick_rx(&mut self) {
        // Start is transient: reset the sync hunt and listen this same tick.
        if self.state == LinkState::Start {
            self.state = LinkState::Ready;
            self.bit_timer = self.coding.sync_ticks() - 1;
        }
        match self.state {
            LinkState::Ready => {
                self.write_act(false);
                if self.line_high() {
                    // Lock once the carrier has been up for half a sync
                    // window. A stuck-high carrier wraps the countdown and
                    // locks on a later pass.
                    if self.bit_timer == (self.coding.sync_ticks() >> 1) {
                        self.state = LinkState::Sync;
                    }
                    self.bit_timer = self.bit_timer.wrapping_sub(1);
                } else {
                    self.bit_timer = self.coding.sync_ticks() - 1;
                }
            }
            LinkState::Sync => {
                // Ride out the rest of the window; the payload word starts
                // right behind it.
                if self.bit_timer > 0 {
                    self.bit_timer -= 1;
                } else {
                    self.write_act(true);
                    self.state = LinkState::Payload;
                    self.begin_word();
                }
            }
            LinkState::Payload => {
                let high = self.line_high();
                if self.bit_timer == self.coding.word_ticks() - 1 {
                    if high {
                        // Waiting for the falling edge behind the framing
                        // bit. A peer that died mid-frame never provides
                        // one, so the wait is bounded.
                        if self.edge_timer == 0 {
                            self.abort_rx();
                        } else {
                            self.edge_timer -= 1;
                        }
                        return;
                    }
                    // Falling edge: re-center sampling on this word and
                    // take the spacer bit right away.
                    self.clock.advance_phase();
                    self.bit_timer -= 1;
                }
                if high {
                    self.accum |= 1;
                }
                if self.bit_timer > 0 {
                    self.accum <<= 1;
                    self.bit_timer -= 1;
                } else {
                    self.count = self.coding.decode_word(self.accum);
                    // A zero or oversized count cannot be a frame.
                    if self.count == 0 || self.count as usize > MAX_FRAME_SIZE {
                        self.abort_rx();
                        return;
                    }
                    self.index = 0;
                    self.state = LinkState::Data;
                    self.begin_word();
                }
            }
            LinkState::Data => {
                let high = self.line_high();
                if self.bit_timer == self.coding.word_ticks() - 1 {
                    if high {
                        if self.edge_timer == 0 {
                            self.abort_rx();
                        } else {
                            self.edge_timer -= 1;
                        }
                        return;
                    }
                    self.clock.advance_phase();
                    self.bit_timer -= 1;
                }
                if high {
                    self.accum |= 1;
                }
                if self.bit_timer > 0 {
                    self.accum <<= 1;
                    self.bit_timer -= 1;
                } else {
                    self.frame[self.index as usize] = self.coding.decode_word(self.accum);
                    self.index += 1;
                    if self.index >= self.count {
                        self.state = LinkState::Leadout;
                    }
                    self.begin_word();
                }
            }
            LinkState::Leadout => {
                if self.bit_timer == self.coding.word_ticks() - 1 {
                    if self.line_high() {
                        if self.edge_timer == 0 {
                            self.abort_rx();
                        } else {
                            self.edge_timer -= 1;
                        }
                        return;
                    }
                    self.clock.advance_phase();
                    self.bit_timer -= 1;
                }
                // Nothing to sample, just drain the closing word.
                if self.bit_timer == 0 {
                    self.state = LinkState::Recv;
                    self.rx_good += 1;
                } else {
                    self.bit_timer -= 1;
                }
            }
            // Recv and Error hold until receive() restarts the machine.
            _ => {}
        }
    }

    /// Arms the word timers for the next wire word.
    fn begin_word(&mut self) {
        self.bit_timer = self.coding.word_ticks() - 1;
        self.edge_timer = self.coding.word_ticks();
        self.accum = 0;
    }

    fn abort_rx(&mut self) {
        self.state = LinkState::Error;
        self.count = 0;
        self.rx_bad += 1;
    }
}
