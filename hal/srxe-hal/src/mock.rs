//! Simulated transceiver for host testing
//!
//! [`SimTransceiver`] models the parts of the ATmega128RFA1 radio that the
//! transport driver depends on: the TRX state machine, the SLPTR/TRXRST
//! control bits, IRQ mask/status, PHY_RSSI and the single frame buffer.
//! Everything is fixed-capacity so the model also works under `no_std`.
//!
//! Model simplifications:
//! - transmissions finish before the next command is applied
//! - TRXRST clears IRQ state but does not move the state machine
//! - commands are ignored while asleep, as on the real chip
//!
//! Faults can be injected to exercise the driver's recovery paths:
//! [`SimTransceiver::refuse_idle`], [`SimTransceiver::stick`] and
//! [`SimTransceiver::hold_transition`].

use embedded_hal::delay::DelayNs;
use heapless::Vec;

use crate::radio::{irq, rssi, status, Transceiver, TrxCommand, FRAME_BUFFER_SIZE};

/// Maximum number of transmitted frames remembered by the model
pub const MAX_SENT_FRAMES: usize = 16;

/// Maximum number of commands remembered by the model
pub const MAX_COMMAND_LOG: usize = 64;

/// RSSI reported for injected frames
const DEFAULT_RSSI: u8 = 20;

/// LQI appended to injected frames
const DEFAULT_LQI: u8 = 0xFF;

/// A frame captured when the simulated chip started transmitting
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentFrame {
    /// Value written into the frame length field
    pub length: u8,
    /// Bytes written into the frame buffer for this frame
    pub psdu: Vec<u8, FRAME_BUFFER_SIZE>,
}

impl SentFrame {
    /// Bytes a receiver would hand to its application
    ///
    /// The last two bytes of an on-air frame are the hardware trailer, so
    /// the receiver keeps `length - 2` bytes.
    pub fn payload(&self) -> &[u8] {
        let len = (self.length as usize)
            .saturating_sub(2)
            .min(self.psdu.len());
        &self.psdu[..len]
    }
}

/// Behavioural model of the 2.4GHz transceiver
#[derive(Debug, Clone)]
pub struct SimTransceiver {
    state: u8,
    irq_mask: u8,
    irq_status: u8,
    auto_crc: bool,
    channel: u8,
    tx_power: u8,
    slptr: bool,
    crc_valid: bool,
    rssi: u8,
    noise: u8,
    rx_length: u8,
    tx_length: u8,
    tx_loaded: usize,
    frame: [u8; FRAME_BUFFER_SIZE],
    resets: u32,
    sent: Vec<SentFrame, MAX_SENT_FRAMES>,
    commands: Vec<TrxCommand, MAX_COMMAND_LOG>,
    refuse_idle: u8,
    stuck: Option<u8>,
    transition_polls: u32,
    pll_lock_polls: u32,
}

impl Default for SimTransceiver {
    fn default() -> Self {
        Self::new()
    }
}

impl SimTransceiver {
    /// Create a transceiver fresh out of power-on reset (TRX_OFF)
    pub fn new() -> Self {
        Self {
            state: status::TRX_OFF,
            irq_mask: 0,
            irq_status: 0,
            auto_crc: false,
            channel: 11,
            tx_power: 0,
            slptr: false,
            crc_valid: false,
            rssi: 0,
            noise: 0x5A,
            rx_length: 0,
            tx_length: 0,
            tx_loaded: 0,
            frame: [0; FRAME_BUFFER_SIZE],
            resets: 0,
            sent: Vec::new(),
            commands: Vec::new(),
            refuse_idle: 0,
            stuck: None,
            transition_polls: 0,
            pll_lock_polls: 0,
        }
    }

    /// Create a transceiver that starts out asleep
    pub fn asleep() -> Self {
        Self {
            state: status::SLEEP,
            slptr: true,
            ..Self::new()
        }
    }

    /// Refuse the next `attempts` transitions into TRX_OFF
    pub fn refuse_idle(mut self, attempts: u8) -> Self {
        self.refuse_idle = attempts;
        self
    }

    /// Report `code` forever and ignore every state change
    pub fn stick(mut self, code: u8) -> Self {
        self.stuck = Some(code);
        self
    }

    /// Report a state transition in progress for the next `polls` reads
    pub fn hold_transition(mut self, polls: u32) -> Self {
        self.transition_polls = polls;
        self
    }

    /// Delay PLL lock by `polls` status reads after each PLL_ON command
    pub fn slow_pll(mut self, polls: u32) -> Self {
        self.pll_lock_polls = polls;
        self
    }

    /// Seed the receiver noise used for the PHY_RSSI random bits
    pub fn with_noise(mut self, noise: u8) -> Self {
        self.noise = noise;
        self
    }

    /// Current status code, without consuming transition polls
    pub fn state(&self) -> u8 {
        self.stuck.unwrap_or(self.state)
    }

    /// Physical channel last programmed
    pub fn channel(&self) -> u8 {
        self.channel
    }

    /// TX power level last programmed
    pub fn tx_power(&self) -> u8 {
        self.tx_power
    }

    /// Whether automatic CRC generation is on
    pub fn auto_crc(&self) -> bool {
        self.auto_crc
    }

    /// Current IRQ mask
    pub fn irq_mask(&self) -> u8 {
        self.irq_mask
    }

    /// Level of the SLPTR pin
    pub fn slptr(&self) -> bool {
        self.slptr
    }

    /// Number of TRXRST pulses seen
    pub fn resets(&self) -> u32 {
        self.resets
    }

    /// Frames transmitted so far
    pub fn sent(&self) -> &[SentFrame] {
        &self.sent
    }

    /// Forget the transmitted frames
    pub fn clear_sent(&mut self) {
        self.sent.clear();
    }

    /// Commands written so far (oldest first, capped at [`MAX_COMMAND_LOG`])
    pub fn commands(&self) -> &[TrxCommand] {
        &self.commands
    }

    /// Deliver a frame from the air
    ///
    /// The frame only arrives while the chip is listening and the matching
    /// IRQs are enabled. The hardware appends an LQI byte and a status byte
    /// after the payload. Returns `true` if the frame was delivered.
    pub fn receive_frame(&mut self, payload: &[u8], crc_ok: bool) -> bool {
        if self.state() != status::RX_ON || payload.len() + 2 > FRAME_BUFFER_SIZE {
            return false;
        }

        self.frame[..payload.len()].copy_from_slice(payload);
        self.frame[payload.len()] = DEFAULT_LQI;
        self.frame[payload.len() + 1] = 0x00;
        self.rx_length = (payload.len() + 2) as u8;
        self.crc_valid = crc_ok;
        self.rssi = DEFAULT_RSSI;
        self.irq_status |= (irq::RX_START | irq::RX_END) & self.irq_mask;
        true
    }

    /// Finish an in-flight transmission
    pub fn complete_transmission(&mut self) {
        if self.state != status::BUSY_TX {
            return;
        }

        let len = self.tx_loaded;
        let mut psdu = Vec::new();
        // Capacity equals FRAME_BUFFER_SIZE, so this cannot fail
        let _ = psdu.extend_from_slice(&self.frame[..len]);
        if self.sent.is_full() {
            self.sent.remove(0);
        }
        let _ = self.sent.push(SentFrame {
            length: self.tx_length,
            psdu,
        });

        self.state = status::PLL_ON;
        self.irq_status |= irq::TX_END & self.irq_mask;
    }

    fn log(&mut self, cmd: TrxCommand) {
        if self.commands.is_full() {
            self.commands.remove(0);
        }
        let _ = self.commands.push(cmd);
    }

    fn enter_idle(&mut self) {
        if self.refuse_idle > 0 {
            self.refuse_idle -= 1;
        } else {
            self.state = status::TRX_OFF;
        }
    }

    fn start_transmission(&mut self) {
        if self.state == status::PLL_ON {
            self.state = status::BUSY_TX;
        }
    }

    fn advance_noise(&mut self) -> u8 {
        self.noise = self.noise.wrapping_mul(37).wrapping_add(11);
        (self.noise >> 3) & 0x03
    }
}

impl Transceiver for SimTransceiver {
    fn status(&mut self) -> u8 {
        if let Some(code) = self.stuck {
            return code;
        }
        if self.transition_polls > 0 {
            self.transition_polls -= 1;
            return status::STATE_TRANSITION_IN_PROGRESS;
        }
        self.state
    }

    fn command(&mut self, cmd: TrxCommand) {
        self.log(cmd);
        if self.stuck.is_some() || self.state == status::SLEEP {
            return;
        }
        if cmd != TrxCommand::TxStart {
            self.complete_transmission();
        }

        match cmd {
            TrxCommand::Nop => {}
            TrxCommand::TxStart => self.start_transmission(),
            TrxCommand::TrxOff | TrxCommand::ForceTrxOff => self.enter_idle(),
            TrxCommand::RxOn => self.state = status::RX_ON,
            TrxCommand::PllOn | TrxCommand::ForcePllOn => {
                self.state = status::PLL_ON;
                self.transition_polls = self.pll_lock_polls;
            }
        }
    }

    fn set_slptr(&mut self, high: bool) {
        let rising = high && !self.slptr;
        self.slptr = high;
        if self.stuck.is_some() {
            return;
        }

        if rising {
            match self.state {
                status::TRX_OFF => self.state = status::SLEEP,
                status::PLL_ON => self.start_transmission(),
                _ => {}
            }
        } else if !high && self.state == status::SLEEP {
            if self.refuse_idle > 0 {
                self.refuse_idle -= 1;
            } else {
                self.state = status::TRX_OFF;
                self.irq_status |= irq::AWAKE & self.irq_mask;
            }
        }
    }

    fn reset(&mut self) {
        self.resets += 1;
        self.irq_status = 0;
    }

    fn set_irq_mask(&mut self, mask: u8) {
        self.irq_mask = mask;
    }

    fn take_irq_status(&mut self) -> u8 {
        core::mem::take(&mut self.irq_status)
    }

    fn set_auto_crc(&mut self, enabled: bool) {
        self.auto_crc = enabled;
    }

    fn set_channel(&mut self, physical: u8) {
        self.channel = physical;
    }

    fn set_tx_power(&mut self, level: u8) {
        self.tx_power = level;
    }

    fn phy_rssi(&mut self) -> u8 {
        let crc = if self.crc_valid { rssi::RX_CRC_VALID } else { 0 };
        let random = self.advance_noise() << rssi::RND_VALUE_SHIFT;
        crc | random | (self.rssi & rssi::RSSI_MASK)
    }

    fn rx_length(&mut self) -> u8 {
        self.rx_length
    }

    fn read_frame(&mut self, dest: &mut [u8]) {
        let len = dest.len().min(FRAME_BUFFER_SIZE);
        dest[..len].copy_from_slice(&self.frame[..len]);
    }

    fn write_frame(&mut self, length: u8, psdu: &[u8]) {
        let len = psdu.len().min(FRAME_BUFFER_SIZE);
        self.frame[..len].copy_from_slice(&psdu[..len]);
        self.tx_length = length;
        self.tx_loaded = len;
    }
}

/// Blocking delay that only records how long it was asked to wait
#[derive(Debug, Clone, Copy, Default)]
pub struct MockDelay {
    elapsed_ns: u64,
    calls: u32,
}

impl MockDelay {
    /// Create a delay with nothing recorded
    pub fn new() -> Self {
        Self::default()
    }

    /// Total requested delay in milliseconds
    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed_ns / 1_000_000
    }

    /// Number of delay requests
    pub fn calls(&self) -> u32 {
        self.calls
    }
}

impl DelayNs for MockDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.elapsed_ns += u64::from(ns);
        self.calls += 1;
    }

    fn delay_us(&mut self, us: u32) {
        self.delay_ns(us.saturating_mul(1_000));
    }

    fn delay_ms(&mut self, ms: u32) {
        self.elapsed_ns += u64::from(ms) * 1_000_000;
        self.calls += 1;
    }
}
