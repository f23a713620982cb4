//! Delay-loop tick scheduling.
//!
//! The simplest way to run a link: no timer peripheral, no interrupts, the
//! main loop just alternates between ticking the state machine and busy
//! waiting out the rest of the bit slot. The tick's own execution time is
//! not compensated for, so the effective rate runs slightly slow; both ends
//! of a link scheduled this way drift together, but against a timer-driven
//! peer prefer the `timer-isr` arrangement.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};

use crate::link::RadioLink;
use crate::timer::TickSource;

/// Drives the link from a blocking delay loop. Does not return.
///
/// `tick_us` is the bit slot duration in microseconds, `1_000_000 / rate`
/// for the rate the link was built with. Since nothing here retimes the
/// schedule, the link is normally built with
/// [`FreeRunning`](crate::timer::FreeRunning) as its tick source.
///
/// ```ignore
/// use rflink433::timer::run_link_tick_loop;
///
/// let mut link = RadioLink::new(tx, rx, None, FreeRunning,
///     LinkDirection::Rx, LineCoding::Balanced4b5b, 2000)?;
/// run_link_tick_loop(&mut link, &mut delay, 500);
/// ```
pub fn run_link_tick_loop<D, TX, RX, ACT, CLK>(
    link: &mut RadioLink<TX, RX, ACT, CLK>,
    delay: &mut D,
    tick_us: u32,
) where
    D: DelayNs,
    TX: OutputPin,
    RX: InputPin,
    ACT: OutputPin,
    CLK: TickSource,
{
    loop {
        link.tick();
        delay.delay_us(tick_us);
    }
}
