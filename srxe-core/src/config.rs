//! Radio configuration
//!
//! The handheld stores its radio settings in EEPROM as postcard-serialized
//! binary data (with the `serde` feature). Everything here has a sensible
//! default so a blank EEPROM still yields a working link on channel 1.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Highest TX_PWR register value (lowest output power)
pub const MAX_TX_POWER_LEVEL: u8 = 0x0F;

/// Default settle time between terminate and re-init (ms)
pub const DEFAULT_RESTART_SETTLE_MS: u16 = 50;

/// Configuration errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// TX power level outside 0..=15
    InvalidTxPower,
    /// Buffer too small for the encoded configuration
    Encode,
    /// Stored bytes are not a valid configuration
    Decode,
}

/// Logical radio channel (1..=16)
///
/// Logical channels map onto the 2.4GHz channels 11..=26
/// (2405MHz to 2480MHz in 5MHz steps).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Channel(u8);

impl Channel {
    /// Lowest logical channel
    pub const MIN: u8 = 1;
    /// Highest logical channel
    pub const MAX: u8 = 16;
    /// Offset from logical to physical channel numbers
    pub const PHYSICAL_OFFSET: u8 = 10;

    /// Channel used when the requested one is out of range
    pub const DEFAULT: Channel = Channel(Self::MIN);

    /// Create a channel, rejecting values outside 1..=16
    pub const fn new(channel: u8) -> Option<Self> {
        if channel >= Self::MIN && channel <= Self::MAX {
            Some(Channel(channel))
        } else {
            None
        }
    }

    /// Create a channel, falling back to channel 1 for invalid values
    pub const fn clamped(channel: u8) -> Self {
        match Self::new(channel) {
            Some(channel) => channel,
            None => Self::DEFAULT,
        }
    }

    /// Logical channel number
    pub const fn get(self) -> u8 {
        self.0
    }

    /// Physical channel number (11..=26)
    pub const fn physical(self) -> u8 {
        self.0 + Self::PHYSICAL_OFFSET
    }

    /// Centre frequency in MHz
    pub const fn frequency_mhz(self) -> u16 {
        2405 + 5 * (self.0 as u16 - 1)
    }
}

impl Default for Channel {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Radio transport configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RadioConfig {
    /// Logical channel used by `start()` (invalid values fall back to 1)
    pub channel: u8,
    /// TX_PWR register value (0 = full power)
    pub tx_power: u8,
    /// Upper bound for busy-waits on the chip (ms)
    ///
    /// `None` waits as long as the hardware takes, which is how the
    /// handheld has always behaved. A bound turns a wedged chip into a
    /// timeout error instead of a hang.
    pub busy_wait_limit_ms: Option<u16>,
    /// Pause between terminate and re-init when restarting (ms)
    pub restart_settle_ms: u16,
}

impl Default for RadioConfig {
    fn default() -> Self {
        Self {
            channel: Channel::MIN,
            tx_power: 0,
            busy_wait_limit_ms: None,
            restart_settle_ms: DEFAULT_RESTART_SETTLE_MS,
        }
    }
}

impl RadioConfig {
    /// Configuration for a specific channel, everything else default
    pub fn for_channel(channel: u8) -> Self {
        Self {
            channel,
            ..Self::default()
        }
    }

    /// The configured channel, clamped into range
    pub fn channel(&self) -> Channel {
        Channel::clamped(self.channel)
    }

    /// Check the configuration for values the hardware cannot take
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tx_power > MAX_TX_POWER_LEVEL {
            return Err(ConfigError::InvalidTxPower);
        }
        Ok(())
    }

    /// Serialize into `buffer`, returning the used part
    #[cfg(feature = "serde")]
    pub fn to_slice<'a>(&self, buffer: &'a mut [u8]) -> Result<&'a mut [u8], ConfigError> {
        postcard::to_slice(self, buffer).map_err(|_| ConfigError::Encode)
    }

    /// Deserialize and validate a stored configuration
    #[cfg(feature = "serde")]
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ConfigError> {
        let config: Self = postcard::from_bytes(bytes).map_err(|_| ConfigError::Decode)?;
        config.validate()?;
        Ok(config)
    }
}
