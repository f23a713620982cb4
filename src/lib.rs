//! # rflink433
//!
//! A portable, no_std Rust driver for half-duplex packet radio over cheap
//! 433 MHz OOK/ASK transmitter and receiver modules, the kind sold as
//! FS1000A, XY-MK-5V and countless clones.
//!
//! The whole modem is bit-banged in software:
//! - `embedded-hal` traits for the data pins and delays
//! - a lockstep state machine advanced once per bit slot from a timer tick
//! - interrupt-safe link sharing with `critical-section`
//! - tick scheduling from either a timer ISR or a blocking delay loop
//!
//! ## Crate features
//! | Feature               | Description |
//! |-----------------------|-------------|
//! | `std`                 | Disables `#![no_std]`, mainly for host-side tests |
//! | `delay-loop`          | Blocking tick loop over `embedded_hal::delay::DelayNs` |
//! | `timer-isr` (default) | `critical-section` shared-link helpers and macros |
//! | `defmt-0-3`           | `defmt::Format` derives on the public types |
//! | `log`                 | Uses `log` logging |
//!
//! ## Software features
//!
//! - **Transmitter and receiver** in pure software (no UART or DMA)
//! - Frames of up to 40 bytes with a strobe preamble and a sync window
//! - Optional **4b5b balanced line coding** to keep the receiver's AGC fed
//! - Datagram layer with **16-bit addresses**, broadcast and **CRC-16**
//! - Fully portable across AVR (e.g. Arduino Uno) and ARM Cortex-M targets
//! - Feature flags for interrupt-driven or blocking tick scheduling
//!
//! ## Usage
//!
//! ```rust
//! use rflink433::coding::LineCoding;
//! use rflink433::link::{LinkDirection, RadioLink};
//! use rflink433::timer::FreeRunning;
//!
//! # use embedded_hal_mock::eh1::digital::{
//! #     Mock as PinMock, State as PinState, Transaction as PinTransaction,
//! # };
//! # let tx = PinMock::new(&[PinTransaction::set(PinState::Low)]);
//! # let rx = PinMock::new(&[]);
//! let mut link = RadioLink::new(
//!     tx,
//!     rx,
//!     None::<PinMock>,
//!     FreeRunning,
//!     LinkDirection::Tx,
//!     LineCoding::Balanced4b5b,
//!     2000,
//! )?;
//! link.set_address(0x0001);
//! link.send(0xffff, b"hello")?;
//! loop {
//!     link.tick();
//! #   break;
//!     // one tick per bit slot, 500 us at 2000 bit/s
//! }
//! # link.tx.done();
//! # link.rx.done();
//! # Ok::<(), rflink433::link::LinkError>(())
//! ```
//!
//! With the `timer-isr` feature the loop above becomes a compare-match ISR;
//! see the [`timer`] module for the shared-link helpers and the
//! [`TimerConfig`](timer::TimerConfig) values to program the timer with.
//! With `delay-loop` it becomes `run_link_tick_loop(&mut link, &mut delay,
//! 500)`.
//!
//! ## Integration notes
//!
//! - Link rates from 100 to 5000 bit/s are supported; 2000 bit/s works well
//!   with the common modules
//! - Both ends must agree on rate and line coding
//! - Timing precision is critical; prefer a hardware timer over the delay
//!   loop when the platform has one to spare
//! - Only one link instance should be active at a time in interrupt-driven
//!   mode
//!
//! --
//! Designed for `#![no_std]` use in resource-constrained embedded
//! environments.

#![deny(
    bad_style,
    dead_code,
    improper_ctypes,
    non_shorthand_field_patterns,
    no_mangle_generic_items,
    overflowing_literals,
    path_statements,
    patterns_in_fns_without_body,
    unconditional_recursion,
    unused,
    while_true,
    missing_debug_implementations,
    missing_docs,
    trivial_casts,
    trivial_numeric_casts,
    unused_extern_crates,
    unused_import_braces,
    unused_qualifications,
    unused_results
)]
#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(feature = "timer-isr")]
pub use critical_section;

pub use heapless;

pub mod coding;
pub mod consts;
pub mod crc;
pub mod link;
pub mod timer;
pub mod transport;

#[cfg(all(test, feature = "std"))]
mod test_line;
