//! Entropy from receiver noise
//!
//! The transceiver's PHY_RSSI register carries two random bits drawn from
//! the receiver's thermal noise while it listens. Eight samples make a
//! 16-bit seed for a software generator.

use embedded_hal::delay::DelayNs;
use rand_core::{RngCore, SeedableRng};
use rand_wyrand::WyRand;
use srxe_core::Channel;
use srxe_hal::Transceiver;

use crate::radio::{Radio, RadioError};

/// Number of two-bit samples in a seed
pub const SEED_SAMPLES: u8 = 8;

/// Time between samples (ms)
pub const SAMPLE_INTERVAL_MS: u32 = 1;

/// Collect a 16-bit seed from the receiver noise
///
/// The radio has to listen for the noise bits to change, so an inactive
/// radio is brought up on channel 1 for the duration and shut down again.
pub fn seed<T: Transceiver, D: DelayNs, const RX: usize, const TX: usize>(
    radio: &mut Radio<'_, T, D, RX, TX>,
) -> Result<u16, RadioError> {
    let was_active = radio.is_active();
    if !was_active {
        radio.init(Channel::MIN)?;
    }

    let mut seed: u16 = 0;
    for _ in 0..SEED_SAMPLES {
        seed = (seed << 2) | u16::from(radio.live_signal().random_bits());
        radio.delay_ms(SAMPLE_INTERVAL_MS);
    }

    if !was_active {
        radio.terminate();
    }
    debug!("random seed {=u16:#x}", seed);
    Ok(seed)
}

/// A generator seeded from the receiver noise
pub fn rng<T: Transceiver, D: DelayNs, const RX: usize, const TX: usize>(
    radio: &mut Radio<'_, T, D, RX, TX>,
) -> Result<WyRand, RadioError> {
    Ok(WyRand::seed_from_u64(u64::from(seed(radio)?)))
}

/// A number in `0..max` (`0` when `max` is zero)
pub fn below<R: RngCore>(rng: &mut R, max: u16) -> u16 {
    if max == 0 {
        return 0;
    }
    (rng.next_u32() % u32::from(max)) as u16
}

/// An upper case letter
pub fn letter<R: RngCore>(rng: &mut R) -> char {
    char::from(b'A' + below(rng, 26) as u8)
}
