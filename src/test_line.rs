//! Simulated two-station wiring for loopback tests.
//!
//! Both ends of a link pair see one boolean line level: the transmitter
//! holds the writing half of a [`line_pair`] and the receiver the sampling
//! half, and [`run_lockstep`] advances the two state machines tick for tick
//! the way a shared bit clock would.

use core::cell::Cell;
use core::convert::Infallible;
use std::rc::Rc;

use embedded_hal::digital::{InputPin, OutputPin};

use crate::coding::LineCoding;
use crate::link::{LinkDirection, RadioLink};
use crate::timer::FreeRunning;

/// One end of a simulated radio channel. Writes drive the shared line
/// level, reads sample it.
#[derive(Clone)]
pub(crate) struct LinePin {
    line: Rc<Cell<bool>>,
}

fn line_pair() -> (LinePin, LinePin) {
    let line = Rc::new(Cell::new(false));
    (LinePin { line: line.clone() }, LinePin { line })
}

impl embedded_hal::digital::ErrorType for LinePin {
    type Error = Infallible;
}

impl OutputPin for LinePin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.line.set(false);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.line.set(true);
        Ok(())
    }
}

impl InputPin for LinePin {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        Ok(self.line.get())
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        Ok(!self.line.get())
    }
}

/// A transmitter and a receiver joined by a simulated line.
pub(crate) fn wired_pair(
    coding: LineCoding,
) -> (
    RadioLink<LinePin, LinePin, LinePin, FreeRunning>,
    RadioLink<LinePin, LinePin, LinePin, FreeRunning>,
) {
    let (channel_out, channel_in) = line_pair();
    let (idle_out, idle_in) = line_pair();
    let tx = RadioLink::new(
        channel_out,
        idle_in,
        None,
        FreeRunning,
        LinkDirection::Tx,
        coding,
        2000,
    )
    .unwrap();
    let rx = RadioLink::new(
        idle_out,
        channel_in,
        None,
        FreeRunning,
        LinkDirection::Rx,
        coding,
        2000,
    )
    .unwrap();
    (tx, rx)
}

/// Ticks both ends in lockstep, transmitter first so the receiver
/// samples the level written in the same bit slot.
pub(crate) fn run_lockstep(
    tx: &mut RadioLink<LinePin, LinePin, LinePin, FreeRunning>,
    rx: &mut RadioLink<LinePin, LinePin, LinePin, FreeRunning>,
    ticks: usize,
) {
    for _ in 0..ticks {
        tx.tick();
        rx.tick();
    }
}
