//! Macros for the common one-link-per-firmware case.
//!
//! [`init_radio_link!`] declares the shared `static`, [`setup_radio_link!`]
//! fills it and [`tick_radio_link!`] is the ISR body. They expand to the
//! [`shared_link_init`](crate::timer::shared_link_init) family of helpers
//! and exist so the unwieldy four-parameter type only has to be written
//! once.
//!
//! [`init_radio_link!`]: crate::init_radio_link
//! [`setup_radio_link!`]: crate::setup_radio_link
//! [`tick_radio_link!`]: crate::tick_radio_link

/// Declares a `pub static RADIO_LINK` shared link slot.
///
/// Takes the concrete pin and tick source types as arguments. Expand this
/// once at module scope, then use [`setup_radio_link!`] and
/// [`tick_radio_link!`] in the same scope:
///
/// ```ignore
/// use rflink433::init_radio_link;
/// use some_hal::{PD1, PD2, PD3, Timer2Phase};
///
/// init_radio_link!(PD1, PD2, PD3, Timer2Phase);
/// ```
///
/// [`setup_radio_link!`]: crate::setup_radio_link
/// [`tick_radio_link!`]: crate::tick_radio_link
#[macro_export]
macro_rules! init_radio_link {
    ( $tx:ty, $rx:ty, $act:ty, $clk:ty ) => {
        /// Shared link slot ticked from the radio timer interrupt.
        pub static RADIO_LINK: $crate::timer::SharedLink<$tx, $rx, $act, $clk> =
            $crate::timer::shared_link_init::<$tx, $rx, $act, $clk>();
    };
}

/// Installs a built link into the `RADIO_LINK` declared by
/// [`init_radio_link!`].
///
/// ```ignore
/// let link = RadioLink::new(tx, rx, Some(led), timer, LinkDirection::Rx,
///     LineCoding::Balanced4b5b, 2000)?;
/// setup_radio_link!(link);
/// ```
///
/// [`init_radio_link!`]: crate::init_radio_link
#[macro_export]
macro_rules! setup_radio_link {
    ( $link:expr ) => {
        $crate::timer::shared_link_install(&RADIO_LINK, $link)
    };
}

/// Runs one state machine step on the `RADIO_LINK` declared by
/// [`init_radio_link!`]. Call from the timer's compare-match ISR:
///
/// ```ignore
/// #[interrupt]
/// fn TIMER2_COMPA() {
///     tick_radio_link!();
/// }
/// ```
///
/// [`init_radio_link!`]: crate::init_radio_link
#[macro_export]
macro_rules! tick_radio_link {
    () => {
        $crate::timer::shared_link_tick(&RADIO_LINK)
    };
}

#[cfg(test)]
mod tests {
    use crate::coding::LineCoding;
    use crate::link::{LinkDirection, LinkState, RadioLink};
    use crate::timer::FreeRunning;
    use embedded_hal_mock::eh1::digital::{
        Mock as PinMock, State as PinState, Transaction as PinTransaction,
    };

    init_radio_link!(PinMock, PinMock, PinMock, FreeRunning);

    #[test]
    fn test_macros_declare_and_drive_a_shared_link() {
        let tx = PinMock::new(&[PinTransaction::set(PinState::Low)]);
        let rx = PinMock::new(&[]);
        let link = RadioLink::new(
            tx,
            rx,
            None,
            FreeRunning,
            LinkDirection::Tx,
            LineCoding::Raw,
            1000,
        )
        .unwrap();
        setup_radio_link!(link);

        let state = crate::timer::with_shared_link(&RADIO_LINK, |link| link.state);
        assert_eq!(state, Some(LinkState::Ready));

        tick_radio_link!();
        let state = crate::timer::with_shared_link(&RADIO_LINK, |link| link.state);
        assert_eq!(state, Some(LinkState::Ready));

        let done = crate::timer::with_shared_link(&RADIO_LINK, |link| {
            link.tx.done();
            link.rx.done();
        });
        assert_eq!(done, Some(()));
    }
}
