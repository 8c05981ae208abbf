//! Received signal quality
//!
//! PHY_RSSI packs three things into one byte: the CRC result of the frame
//! being received (bit 7), two bits of receiver noise (bits 5..6) and the
//! signal strength (bits 0..4, 0..=28 in 3dB steps above -90dBm).

use srxe_hal::rssi;

/// Signal strength at RSSI = 1
const RSSI_BASE_DBM: i8 = -90;

/// dB per RSSI step
const RSSI_STEP_DB: i8 = 3;

/// Snapshot of PHY_RSSI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SignalQuality(u8);

impl SignalQuality {
    /// Wrap a raw PHY_RSSI value
    pub const fn from_raw(raw: u8) -> Self {
        Self(raw)
    }

    /// Raw register value
    pub const fn raw(self) -> u8 {
        self.0
    }

    /// The frame's CRC checked out
    pub const fn crc_valid(self) -> bool {
        self.0 & rssi::RX_CRC_VALID != 0
    }

    /// Signal strength, 0..=28
    pub const fn rssi(self) -> u8 {
        self.0 & rssi::RSSI_MASK
    }

    /// Two bits of receiver noise
    pub const fn random_bits(self) -> u8 {
        (self.0 & rssi::RND_VALUE_MASK) >> rssi::RND_VALUE_SHIFT
    }

    /// Signal strength in dBm, or `None` below the -90dBm floor
    pub fn dbm(self) -> Option<i8> {
        match self.rssi() {
            0 => None,
            // Masked to 5 bits, so this cannot overflow
            r => Some(RSSI_BASE_DBM + RSSI_STEP_DB * (r as i8 - 1)),
        }
    }
}
