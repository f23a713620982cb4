//! Interrupt-driven tick scheduling.
//!
//! The link lives in a [`critical_section::Mutex`] so that a periodic timer
//! interrupt and the main loop can share it without data races. The ISR
//! calls [`shared_link_tick`] once per compare match; the main loop reaches
//! the link through [`with_shared_link`] to arm transmissions and collect
//! frames. Program the timer from [`TimerConfig`](crate::timer::TimerConfig)
//! so the compare matches arrive at the link rate.
//!
//! The [`init_radio_link!`], [`setup_radio_link!`] and [`tick_radio_link!`]
//! macros wrap the same pattern for the common single-link case.
//!
//! [`init_radio_link!`]: crate::init_radio_link
//! [`setup_radio_link!`]: crate::setup_radio_link
//! [`tick_radio_link!`]: crate::tick_radio_link

use core::cell::RefCell;

use critical_section::Mutex;
use embedded_hal::digital::{InputPin, OutputPin};

use crate::link::RadioLink;
use crate::timer::TickSource;

/// A [`RadioLink`] shared between a timer interrupt and the main loop.
pub type SharedLink<TX, RX, ACT, CLK> = Mutex<RefCell<Option<RadioLink<TX, RX, ACT, CLK>>>>;

/// Creates an empty shared link slot.
///
/// The result is `const`-constructible so it can live in a `static`:
///
/// ```ignore
/// use rflink433::timer::{shared_link_init, SharedLink};
/// use some_hal::{PD1, PD2, PD3, Timer2Phase};
///
/// static RADIO: SharedLink<PD1, PD2, PD3, Timer2Phase> =
///     shared_link_init::<PD1, PD2, PD3, Timer2Phase>();
/// ```
///
/// Fill the slot with [`shared_link_install`] once the pins and timer are
/// set up.
pub const fn shared_link_init<TX, RX, ACT, CLK>() -> SharedLink<TX, RX, ACT, CLK>
where
    TX: OutputPin,
    RX: InputPin,
    ACT: OutputPin,
    CLK: TickSource,
{
    Mutex::new(RefCell::new(None))
}

/// Installs a built link into a shared slot.
///
/// Construct the link with [`RadioLink::new`] first and handle its
/// configuration errors in main-loop context; the install itself cannot
/// fail. A link already present in the slot is dropped.
pub fn shared_link_install<TX, RX, ACT, CLK>(
    shared: &'static SharedLink<TX, RX, ACT, CLK>,
    link: RadioLink<TX, RX, ACT, CLK>,
) where
    TX: OutputPin,
    RX: InputPin,
    ACT: OutputPin,
    CLK: TickSource,
{
    critical_section::with(|cs| {
        let _ = shared.borrow(cs).replace(Some(link));
    });
}

/// Runs one state machine step on the shared link.
///
/// Call this from the timer's compare-match ISR. An empty slot is a no-op,
/// so the interrupt can be enabled before [`shared_link_install`] runs.
///
/// ```ignore
/// #[interrupt]
/// fn TIMER2_COMPA() {
///     rflink433::timer::shared_link_tick(&RADIO);
/// }
/// ```
pub fn shared_link_tick<TX, RX, ACT, CLK>(shared: &'static SharedLink<TX, RX, ACT, CLK>)
where
    TX: OutputPin,
    RX: InputPin,
    ACT: OutputPin,
    CLK: TickSource,
{
    critical_section::with(|cs| {
        if let Some(link) = shared.borrow(cs).borrow_mut().as_mut() {
            link.tick();
        }
    });
}

/// Calls `f` with mutable access to the shared link.
///
/// Returns `None` when the slot is empty. Ticks are blocked for the
/// duration of the call, so keep `f` short; polling state and copying a
/// frame out are fine, busy-waiting inside is not.
///
/// ```ignore
/// let sent = rflink433::timer::with_shared_link(&RADIO, |link| {
///     link.send(0x0002, b"ping")
/// });
/// ```
pub fn with_shared_link<TX, RX, ACT, CLK, F, R>(
    shared: &'static SharedLink<TX, RX, ACT, CLK>,
    f: F,
) -> Option<R>
where
    TX: OutputPin,
    RX: InputPin,
    ACT: OutputPin,
    CLK: TickSource,
    F: FnOnce(&mut RadioLink<TX, RX, ACT, CLK>) -> R,
{
    critical_section::with(|cs| shared.borrow(cs).borrow_mut().as_mut().map(f))
}
