//! Transceiver register abstractions
//!
//! The ATmega128RFA1 exposes its radio as a handful of memory-mapped
//! registers: a command/status pair for the TRX state machine, the SLPTR and
//! TRXRST bits in TRXPR, an IRQ mask/status pair, a few PHY configuration
//! registers and the 128-byte frame buffer starting at TRXFBST.
//!
//! [`Transceiver`] is the narrowest interface the radio driver needs from
//! that register block. Every method maps to one register access on real
//! hardware.

/// TRX_STATUS codes (low five bits of the status register)
pub mod status {
    /// Receiving a frame
    pub const BUSY_RX: u8 = 0x01;
    /// Transmitting a frame
    pub const BUSY_TX: u8 = 0x02;
    /// Listening for frames
    pub const RX_ON: u8 = 0x06;
    /// Powered, neither listening nor transmitting
    pub const TRX_OFF: u8 = 0x08;
    /// PLL locked, ready to transmit
    pub const PLL_ON: u8 = 0x09;
    /// Transceiver asleep
    pub const SLEEP: u8 = 0x0F;
    /// Internal state change still in progress
    pub const STATE_TRANSITION_IN_PROGRESS: u8 = 0x1F;

    /// Mask selecting the status code from TRX_STATUS
    pub const MASK: u8 = 0x1F;
}

/// IRQ_MASK / IRQ_STATUS bits
pub mod irq {
    /// Transceiver woke up
    pub const AWAKE: u8 = 0x80;
    /// Transmission finished
    pub const TX_END: u8 = 0x40;
    /// Address match
    pub const AMI: u8 = 0x20;
    /// CCA/ED measurement done
    pub const CCA_ED_DONE: u8 = 0x10;
    /// Frame reception finished
    pub const RX_END: u8 = 0x08;
    /// Frame reception started
    pub const RX_START: u8 = 0x04;
    /// PLL lost lock
    pub const PLL_UNLOCK: u8 = 0x02;
    /// PLL locked
    pub const PLL_LOCK: u8 = 0x01;

    /// IRQs the radio transport listens to
    pub const TRANSPORT: u8 = RX_START | RX_END | TX_END;
}

/// PHY_RSSI register fields
pub mod rssi {
    /// CRC of the frame being received is valid
    pub const RX_CRC_VALID: u8 = 0x80;
    /// Two random bits sampled from the receiver noise
    pub const RND_VALUE_MASK: u8 = 0x60;
    /// Shift of the random value field
    pub const RND_VALUE_SHIFT: u8 = 5;
    /// Received signal strength (0..=28)
    pub const RSSI_MASK: u8 = 0x1F;
}

/// Size of the hardware frame buffer
pub const FRAME_BUFFER_SIZE: usize = 128;

/// Commands written to the TRX_CMD field of TRX_STATE
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum TrxCommand {
    /// No operation
    Nop = 0x00,
    /// Start transmitting the frame buffer (from PLL_ON)
    TxStart = 0x02,
    /// Go to TRX_OFF regardless of the current activity
    ForceTrxOff = 0x03,
    /// Go to PLL_ON regardless of the current activity
    ForcePllOn = 0x04,
    /// Listen for frames
    RxOn = 0x06,
    /// Go to TRX_OFF once the current activity finishes
    TrxOff = 0x08,
    /// Lock the PLL in preparation for transmit
    PllOn = 0x09,
}

impl TrxCommand {
    /// Get the command as its register value
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// Decode a TRX_CMD field value
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0x00 => Some(TrxCommand::Nop),
            0x02 => Some(TrxCommand::TxStart),
            0x03 => Some(TrxCommand::ForceTrxOff),
            0x04 => Some(TrxCommand::ForcePllOn),
            0x06 => Some(TrxCommand::RxOn),
            0x08 => Some(TrxCommand::TrxOff),
            0x09 => Some(TrxCommand::PllOn),
            _ => None,
        }
    }
}

/// Register-level access to the 2.4GHz transceiver
///
/// Implementations must not block: every method is a register read or
/// write. Waiting for the chip is the driver's job.
pub trait Transceiver {
    /// Read the TRX status code (TRX_STATUS & 0x1F)
    fn status(&mut self) -> u8;

    /// Write a command into TRX_STATE, preserving the TRAC_STATUS bits
    fn command(&mut self, cmd: TrxCommand);

    /// Drive the SLPTR bit
    ///
    /// High puts an idle transceiver to sleep, or starts a transmission
    /// when the PLL is locked. Low wakes a sleeping transceiver.
    fn set_slptr(&mut self, high: bool);

    /// Pulse TRXRST to reset the transceiver logic
    fn reset(&mut self);

    /// Write IRQ_MASK (see [`irq`])
    fn set_irq_mask(&mut self, mask: u8);

    /// Read and clear IRQ_STATUS (see [`irq`])
    fn take_irq_status(&mut self) -> u8;

    /// Set or clear TX_AUTO_CRC_ON in TRX_CTRL_1
    fn set_auto_crc(&mut self, enabled: bool);

    /// Program the physical channel (11..=26) into PHY_CC_CCA
    fn set_channel(&mut self, physical: u8);

    /// Program the TX_PWR field of PHY_TX_PWR (0 = full power)
    fn set_tx_power(&mut self, level: u8);

    /// Read PHY_RSSI (see [`rssi`])
    fn phy_rssi(&mut self) -> u8;

    /// Read TST_RX_LENGTH, the length of the last received frame
    fn rx_length(&mut self) -> u8;

    /// Copy `dest.len()` bytes out of the frame buffer
    fn read_frame(&mut self, dest: &mut [u8]);

    /// Load `psdu` into the frame buffer and write `length` into TRXFBST
    fn write_frame(&mut self, length: u8, psdu: &[u8]);
}

impl<T: Transceiver + ?Sized> Transceiver for &mut T {
    fn status(&mut self) -> u8 {
        (**self).status()
    }

    fn command(&mut self, cmd: TrxCommand) {
        (**self).command(cmd)
    }

    fn set_slptr(&mut self, high: bool) {
        (**self).set_slptr(high)
    }

    fn reset(&mut self) {
        (**self).reset()
    }

    fn set_irq_mask(&mut self, mask: u8) {
        (**self).set_irq_mask(mask)
    }

    fn take_irq_status(&mut self) -> u8 {
        (**self).take_irq_status()
    }

    fn set_auto_crc(&mut self, enabled: bool) {
        (**self).set_auto_crc(enabled)
    }

    fn set_channel(&mut self, physical: u8) {
        (**self).set_channel(physical)
    }

    fn set_tx_power(&mut self, level: u8) {
        (**self).set_tx_power(level)
    }

    fn phy_rssi(&mut self) -> u8 {
        (**self).phy_rssi()
    }

    fn rx_length(&mut self) -> u8 {
        (**self).rx_length()
    }

    fn read_frame(&mut self, dest: &mut [u8]) {
        (**self).read_frame(dest)
    }

    fn write_frame(&mut self, length: u8, psdu: &[u8]) {
        (**self).write_frame(length, psdu)
    }
}
