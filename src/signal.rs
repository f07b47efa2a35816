//! LED blink encoding of an IPv4 address.
//!
//! The node has no display, so it signals where it lives on the network through
//! its LED: each decimal digit of an octet becomes that many slow blinks, digits
//! are divided by a short triple-flash, octets by two of those, and a long rapid
//! flash ends the sequence. `192.168.123.71` in full mode reads as
//!
//! ```text
//! 1                     9       2       . 1               6                   8
//! - ... - - - - - - - - - ... - - ... ... - ... - - - - - - ... - - - - - - - - ... ...
//! ```
//!
//! and so on, with `...` as the digit separator. There is no feedback channel; a
//! human counts blinks. The encoding is deliberately quirk-compatible with the
//! deployed fleet: only a zero *hundreds* digit is suppressed, a zero tens digit is
//! still attempted (emitting no pulses and no trailing separator), so octet `105`
//! reads as one blink, separator, five blinks.

use alloc::vec::Vec;
use core::net::Ipv4Addr;
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};

/// Slow blink timing for digit pulses, milliseconds.
const DIGIT_ON_MS: u32 = 500;
const DIGIT_OFF_MS: u32 = 500;

/// Digit separator: a pause, three quick flashes, a longer pause.
const SEPARATOR_LEAD_MS: u32 = 700;
const SEPARATOR_TAIL_MS: u32 = 900;
const SEPARATOR_FLASHES: u32 = 3;

/// Terminator: a pause followed by a long rapid burst, distinct from a separator.
const TERMINATOR_LEAD_MS: u32 = 1000;
const TERMINATOR_FLASHES: u32 = 20;

/// Quick flash timing shared by separators and the terminator.
const QUICK_ON_MS: u32 = 100;
const QUICK_OFF_MS: u32 = 100;

/// How much of the address gets signaled.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SignalMode {
    /// Only the fourth octet, then the terminator. Enough when the network part of
    /// the address is known.
    Quick,
    /// All four octets, octet separators in between, then the terminator.
    Full,
}

/// One timed LED instruction. `On`/`Off` carry the hold time in milliseconds.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Step {
    On(u32),
    Off(u32),
}

/// Encodes an address into its pulse sequence. Pure: the same address and mode
/// always yield the same steps. The sequence is generated per request and thrown
/// away after playback.
pub fn encode(address: Ipv4Addr, mode: SignalMode) -> Vec<Step> {
    let [first, second, third, fourth] = address.octets();

    let mut steps = Vec::new();
    if mode == SignalMode::Full {
        for octet in [first, second, third] {
            encode_octet(&mut steps, octet);
            octet_separator(&mut steps);
        }
    }

    // the fourth octet is signaled in either mode
    encode_octet(&mut steps, fourth);
    terminator(&mut steps);

    steps
}

/// Emits the up-to-three decimal digits of one octet, most significant first.
///
/// Separator placement is tied to the digits that actually produced pulses: the
/// hundreds digit is skipped entirely below 100, and a digit that blinked zero
/// times is not followed by a separator. Octet value 0 therefore contributes no
/// steps at all, which is valid output.
fn encode_octet(steps: &mut Vec<Step>, octet: u8) {
    let mut rest = octet;
    if encode_digit(steps, octet / 100) {
        digit_separator(steps);
        rest = octet % 100;
    }
    if encode_digit(steps, rest / 10) {
        digit_separator(steps);
    }
    encode_digit(steps, rest % 10);
}

/// One slow blink per unit of the digit's value. Returns whether any pulse was
/// emitted, i.e. whether the digit was non-zero.
fn encode_digit(steps: &mut Vec<Step>, digit: u8) -> bool {
    for _ in 0..digit {
        steps.push(Step::On(DIGIT_ON_MS));
        steps.push(Step::Off(DIGIT_OFF_MS));
    }
    digit > 0
}

fn digit_separator(steps: &mut Vec<Step>) {
    steps.push(Step::Off(SEPARATOR_LEAD_MS));
    for _ in 0..SEPARATOR_FLASHES {
        steps.push(Step::On(QUICK_ON_MS));
        steps.push(Step::Off(QUICK_OFF_MS));
    }
    steps.push(Step::Off(SEPARATOR_TAIL_MS));
}

/// The boundary between two octets is simply two digit separators.
fn octet_separator(steps: &mut Vec<Step>) {
    digit_separator(steps);
    digit_separator(steps);
}

fn terminator(steps: &mut Vec<Step>) {
    steps.push(Step::Off(TERMINATOR_LEAD_MS));
    for _ in 0..TERMINATOR_FLASHES {
        steps.push(Step::On(QUICK_ON_MS));
        steps.push(Step::Off(QUICK_OFF_MS));
    }
}

/// Plays blink sequences on a physical LED.
///
/// The pin is driven active-low: the builtin LED on ESP modules sits between VCC
/// and the GPIO and lights up when the pin sinks current.
pub struct IpSignaler<P: OutputPin, D: DelayNs> {
    pin: P,
    delay: D,
}

impl<P: OutputPin, D: DelayNs> IpSignaler<P, D> {
    pub fn new(pin: P, delay: D) -> Self {
        Self { pin, delay }
    }

    /// Encodes `address` and blinks it out. Blocks for the whole sequence —
    /// several seconds in full mode — and cannot be cancelled; bounding how long
    /// the request button may be held is the caller's job. The LED ends up off.
    pub fn signal(&mut self, address: Ipv4Addr, mode: SignalMode) -> Result<(), P::Error> {
        let steps = encode(address, mode);
        self.play(&steps)
    }

    /// Runs a prepared sequence to completion.
    pub fn play(&mut self, steps: &[Step]) -> Result<(), P::Error> {
        for step in steps {
            match *step {
                Step::On(ms) => {
                    self.pin.set_low()?;
                    self.delay.delay_ms(ms);
                }
                Step::Off(ms) => {
                    self.pin.set_high()?;
                    self.delay.delay_ms(ms);
                }
            }
        }
        self.pin.set_high()?;
        Ok(())
    }

    /// Releases the pin and delay provider.
    pub fn release(self) -> (P, D) {
        (self.pin, self.delay)
    }
}

/// Polls the signal-request button and counts how many whole seconds it stays
/// held. Returns 0 immediately when the button is not pressed, so this is cheap to
/// call from the main loop.
pub fn measure_hold<P: InputPin, D: DelayNs>(pin: &mut P, delay: &mut D) -> Result<u32, P::Error> {
    let mut seconds = 0u32;
    while pin.is_high()? {
        seconds += 1;
        delay.delay_ms(1000);
    }
    Ok(seconds)
}

/// Maps a measured button hold to a signaling mode: a short press asks for the
/// last octet, six seconds or more for the whole address.
pub fn mode_for_hold(seconds: u32) -> Option<SignalMode> {
    match seconds {
        0 => None,
        1..=5 => Some(SignalMode::Quick),
        _ => Some(SignalMode::Full),
    }
}
