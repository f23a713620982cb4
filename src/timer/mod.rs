//! Tick scheduling for the radio link.
//!
//! [`RadioLink::tick`](crate::link::RadioLink::tick) must run at the
//! configured link rate, once per bit slot. This module covers the two ways
//! of arranging that:
//!
//! * with the `timer-isr` feature, the link lives in a
//!   [`critical_section::Mutex`] and is ticked from a periodic compare-match
//!   interrupt ([`isr`] helpers and the [`init_radio_link!`],
//!   [`setup_radio_link!`] and [`tick_radio_link!`] macros);
//! * with the `delay-loop` feature, [`run_link_tick_loop`] busy-waits between
//!   ticks using an [`embedded_hal::delay::DelayNs`] implementation.
//!
//! [`TimerConfig`] translates a link rate into prescaler and compare values
//! for an 8-bit style CTC timer. With a 16 MHz source:
//!
//! | Link rate (bit/s) | Prescaler | Compare | Tick      |
//! |-------------------|-----------|---------|-----------|
//! | 2000              | 64        | 124     | 500 us    |
//! | 1000              | 64        | 249     | 1000 us   |
//! | 500               | 256       | 124     | 2000 us   |
//! | 250               | 256       | 249     | 4000 us   |
//! | 100               | 1024      | 155     | 9984 us   |
//!
//! The tier boundaries keep the compare value inside an 8-bit counter for
//! every rate the link accepts while losing as little resolution as possible
//! to the divider.
//!
//! [`init_radio_link!`]: crate::init_radio_link
//! [`setup_radio_link!`]: crate::setup_radio_link
//! [`tick_radio_link!`]: crate::tick_radio_link

#[cfg(feature = "delay-loop")]
mod delay;

#[cfg_attr(feature = "delay-loop", allow(unused_imports))]
#[cfg(feature = "delay-loop")]
pub use delay::*;

#[cfg(feature = "timer-isr")]
mod isr;

#[cfg_attr(feature = "timer-isr", allow(unused_imports))]
#[cfg(feature = "timer-isr")]
pub use isr::*;

#[cfg(feature = "timer-isr")]
mod macros;

#[cfg_attr(feature = "timer-isr", allow(unused_imports))]
#[cfg(feature = "timer-isr")]
pub use macros::*;

use libm::round;

use crate::consts::{MAX_LINK_RATE, MIN_LINK_RATE};
use crate::link::LinkError;

/// Control the link has over the phase of its own tick schedule.
///
/// The receiver samples the line once per tick, so its alignment inside each
/// bit slot is set by when the ticks fire, not by anything the state machine
/// can do. Two moments want a phase adjustment: arming a transmission (the
/// first strobe edge should be a whole slot away) and catching the leading
/// edge of a received word (subsequent samples should land a fraction of a
/// slot behind the edge, not half a slot). On hardware where `tick` runs
/// from a compare-match interrupt both are a single counter write.
pub trait TickSource {
    /// Restart the current tick period so the next tick fires one full
    /// period from now. Called when a transmission is armed.
    fn restart(&mut self);

    /// Shorten the current tick period to roughly an eighth, so the next
    /// tick fires just behind a word's leading edge. Called by the receiver
    /// once per received word.
    fn advance_phase(&mut self);
}

/// A tick schedule with no adjustable phase.
///
/// Use this when the timer cannot be touched from the link, for instance
/// with delay-loop scheduling or in host-side tests. The receiver then
/// relies on the per-word leading edge alone, which holds alignment within
/// a word but tolerates less oscillator drift between the two ends.
#[derive(PartialEq, Eq, Clone, Copy, Default, Debug)]
pub struct FreeRunning;

impl TickSource for FreeRunning {
    fn restart(&mut self) {}

    fn advance_phase(&mut self) {}
}

/// Clock divider between the timer's source and its counter.
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub enum Prescaler {
    /// Divide the source clock by 64.
    Div64,
    /// Divide the source clock by 256.
    Div256,
    /// Divide the source clock by 1024.
    Div1024,
}

impl Prescaler {
    /// Picks the divider tier for a link rate.
    ///
    /// Fast links need a fine-grained counter, slow links need a long reach;
    /// the boundaries at 1000 and 250 bit/s keep the compare value below 256
    /// for common source clocks.
    pub const fn for_rate(rate: u16) -> Self {
        if rate >= 1000 {
            Prescaler::Div64
        } else if rate >= 250 {
            Prescaler::Div256
        } else {
            Prescaler::Div1024
        }
    }

    /// The division factor as a plain number.
    pub const fn divisor(self) -> u32 {
        match self {
            Prescaler::Div64 => 64,
            Prescaler::Div256 => 256,
            Prescaler::Div1024 => 1024,
        }
    }
}

/// Prescaler and compare value for a CTC-style periodic timer.
///
/// The values program a hardware timer to fire once per bit slot at the
/// link's configured rate. [`RadioLink::timer_config`] builds one of these
/// from the link's own rate; [`TimerConfig::new`] can be used directly when
/// no link exists yet.
///
/// ```
/// use rflink433::timer::{Prescaler, TimerConfig};
///
/// let config = TimerConfig::new(16_000_000, 2000).unwrap();
/// assert_eq!(config.prescaler, Prescaler::Div64);
/// assert_eq!(config.compare, 124);
/// assert_eq!(config.tick_interval_us(16_000_000), 500);
/// ```
///
/// [`RadioLink::timer_config`]: crate::link::RadioLink::timer_config
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub struct TimerConfig {
    /// Clock divider feeding the counter.
    pub prescaler: Prescaler,
    /// Counter value at which the tick fires and the counter clears.
    pub compare: u32,
}

impl TimerConfig {
    /// Computes the timer settings for a tick frequency of `rate` from a
    /// source clock of `source_hz`.
    ///
    /// Returns [`LinkError::Config`] when the rate is outside the supported
    /// 100..=5000 bit/s window or when the source clock is too slow to
    /// produce even one counter step per tick.
    pub const fn new(source_hz: u32, rate: u16) -> Result<Self, LinkError> {
        if rate < MIN_LINK_RATE || rate > MAX_LINK_RATE {
            return Err(LinkError::Config);
        }
        let prescaler = Prescaler::for_rate(rate);
        let ticks = source_hz / prescaler.divisor() / rate as u32;
        if ticks == 0 {
            return Err(LinkError::Config);
        }
        Ok(TimerConfig {
            prescaler,
            compare: ticks - 1,
        })
    }

    /// The actual tick interval in microseconds, rounded to nearest.
    ///
    /// Integer division in [`TimerConfig::new`] quantizes the interval, so
    /// this can differ slightly from `1_000_000 / rate`; at 100 bit/s from
    /// 16 MHz for example the timer ticks every 9984 us rather than
    /// 10000 us. Both ends of a link built from the same source clock see
    /// the same quantization, so the slip only matters against third-party
    /// transmitters.
    pub fn tick_interval_us(&self, source_hz: u32) -> u32 {
        let counter_hz = source_hz as f64 / self.prescaler.divisor() as f64;
        round((self.compare as f64 + 1.0) * 1_000_000.0 / counter_hz) as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prescaler_tiers() {
        assert_eq!(Prescaler::for_rate(5000), Prescaler::Div64);
        assert_eq!(Prescaler::for_rate(1000), Prescaler::Div64);
        assert_eq!(Prescaler::for_rate(999), Prescaler::Div256);
        assert_eq!(Prescaler::for_rate(250), Prescaler::Div256);
        assert_eq!(Prescaler::for_rate(249), Prescaler::Div1024);
        assert_eq!(Prescaler::for_rate(100), Prescaler::Div1024);
    }

    #[test]
    fn test_prescaler_divisors() {
        assert_eq!(Prescaler::Div64.divisor(), 64);
        assert_eq!(Prescaler::Div256.divisor(), 256);
        assert_eq!(Prescaler::Div1024.divisor(), 1024);
    }

    #[test]
    fn test_compare_values_for_16mhz_source() {
        let config = TimerConfig::new(16_000_000, 2000).unwrap();
        assert_eq!(config.prescaler, Prescaler::Div64);
        assert_eq!(config.compare, 124);

        let config = TimerConfig::new(16_000_000, 1000).unwrap();
        assert_eq!(config.prescaler, Prescaler::Div64);
        assert_eq!(config.compare, 249);

        let config = TimerConfig::new(16_000_000, 500).unwrap();
        assert_eq!(config.prescaler, Prescaler::Div256);
        assert_eq!(config.compare, 124);

        let config = TimerConfig::new(16_000_000, 250).unwrap();
        assert_eq!(config.prescaler, Prescaler::Div256);
        assert_eq!(config.compare, 249);

        let config = TimerConfig::new(16_000_000, 100).unwrap();
        assert_eq!(config.prescaler, Prescaler::Div1024);
        assert_eq!(config.compare, 155);
    }

    #[test]
    fn test_compare_fits_8bit_counter_across_range() {
        let mut rate = MIN_LINK_RATE;
        while rate <= MAX_LINK_RATE {
            let config = TimerConfig::new(16_000_000, rate).unwrap();
            assert!(
                config.compare < 256,
                "compare {} too large at rate {}",
                config.compare,
                rate
            );
            rate += 1;
        }
    }

    #[test]
    fn test_rejects_rate_out_of_bounds() {
        assert_eq!(TimerConfig::new(16_000_000, 99), Err(LinkError::Config));
        assert_eq!(TimerConfig::new(16_000_000, 5001), Err(LinkError::Config));
        assert!(TimerConfig::new(16_000_000, 100).is_ok());
        assert!(TimerConfig::new(16_000_000, 5000).is_ok());
    }

    #[test]
    fn test_rejects_source_too_slow_for_rate() {
        assert_eq!(TimerConfig::new(100_000, 5000), Err(LinkError::Config));
    }

    #[test]
    fn test_tick_interval_reports_quantization() {
        let config = TimerConfig::new(16_000_000, 2000).unwrap();
        assert_eq!(config.tick_interval_us(16_000_000), 500);

        let config = TimerConfig::new(16_000_000, 100).unwrap();
        assert_eq!(config.tick_interval_us(16_000_000), 9984);
    }

    #[test]
    fn test_free_running_source_is_inert() {
        let mut clock = FreeRunning;
        clock.restart();
        clock.advance_phase();
        assert_eq!(clock, FreeRunning);
    }
}
