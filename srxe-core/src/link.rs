//! Shared state of one radio link
//!
//! A [`Link`] is everything the mainline driver and the transceiver
//! interrupts share: both ring buffers, the receive overflow counter, the
//! active channel and the signal-quality byte captured at frame start.
//! It is built with a `const fn` so firmware can keep it in a `static`;
//! tests simply create as many as they need.
//!
//! The frame event handlers live here as well. They only need the bytes
//! the IRQ read out of the transceiver, which keeps them testable without
//! any hardware model.

use portable_atomic::{AtomicBool, AtomicU16, AtomicU8, Ordering};

use crate::buffer::RingBuffer;
use crate::config::Channel;
use crate::frame::{rx_payload_len, RX_BUFFER_SIZE, TX_BUFFER_SIZE};
use crate::signal::SignalQuality;

/// What the frame-end handler did with a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrameOutcome {
    /// The link was not active
    Ignored,
    /// The CRC was bad; nothing was stored
    Discarded,
    /// Payload bytes were queued; `dropped` did not fit
    Stored { stored: u8, dropped: u8 },
}

/// Link counters, mostly for debugging reception problems
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LinkStats {
    /// Frames accepted by the frame-end handler
    pub frames_received: u16,
    /// Frames dropped for a bad CRC
    pub frames_discarded: u16,
    /// Transmissions the hardware reported complete
    pub frames_sent: u16,
    /// Length of the last accepted frame, trailer included
    pub last_rx_len: u8,
    /// Payload length of the last frame loaded for transmit
    pub last_tx_len: u8,
}

/// State shared between the radio driver and its interrupt handlers
pub struct Link<const RX: usize = RX_BUFFER_SIZE, const TX: usize = TX_BUFFER_SIZE> {
    rx: RingBuffer<RX>,
    tx: RingBuffer<TX>,
    rx_overflow: AtomicU16,
    /// Reserved for transmit flow control
    tx_idle: AtomicBool,
    /// 0 = inactive, otherwise the logical channel
    channel: AtomicU8,
    signal: AtomicU8,
    frames_received: AtomicU16,
    frames_discarded: AtomicU16,
    frames_sent: AtomicU16,
    last_rx_len: AtomicU8,
    last_tx_len: AtomicU8,
}

impl<const RX: usize, const TX: usize> Default for Link<RX, TX> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const RX: usize, const TX: usize> Link<RX, TX> {
    /// Create an inactive link with empty buffers
    pub const fn new() -> Self {
        Self {
            rx: RingBuffer::new(),
            tx: RingBuffer::new(),
            rx_overflow: AtomicU16::new(0),
            tx_idle: AtomicBool::new(true),
            channel: AtomicU8::new(0),
            signal: AtomicU8::new(0),
            frames_received: AtomicU16::new(0),
            frames_discarded: AtomicU16::new(0),
            frames_sent: AtomicU16::new(0),
            last_rx_len: AtomicU8::new(0),
            last_tx_len: AtomicU8::new(0),
        }
    }

    /// Receive buffer
    pub fn rx(&self) -> &RingBuffer<RX> {
        &self.rx
    }

    /// Transmit buffer
    pub fn tx(&self) -> &RingBuffer<TX> {
        &self.tx
    }

    /// Empty both buffers
    pub fn reset_buffers(&self) {
        self.rx.reset();
        self.tx.reset();
    }

    /// The active channel, if any
    pub fn channel(&self) -> Option<Channel> {
        Channel::new(self.channel.load(Ordering::Acquire))
    }

    /// Check if the link is up
    pub fn is_active(&self) -> bool {
        self.channel.load(Ordering::Acquire) != 0
    }

    /// Mark the link up on `channel` with fresh flags
    pub fn activate(&self, channel: Channel) {
        self.reset_flags();
        self.channel.store(channel.get(), Ordering::Release);
    }

    /// Mark the link down
    ///
    /// The event handlers stop touching the buffers from here on. Flags
    /// and counters are left as they are.
    pub fn deactivate(&self) {
        self.channel.store(0, Ordering::Release);
    }

    /// Clear the overflow counter and mark the transmit path idle
    pub fn reset_flags(&self) {
        self.rx_overflow.store(0, Ordering::Relaxed);
        self.tx_idle.store(true, Ordering::Relaxed);
    }

    /// Received bytes dropped because the receive buffer was full
    pub fn rx_overflow(&self) -> u16 {
        self.rx_overflow.load(Ordering::Relaxed)
    }

    /// Reset the overflow counter
    pub fn clear_rx_overflow(&self) {
        self.rx_overflow.store(0, Ordering::Relaxed);
    }

    /// Transmit path was last seen empty
    pub fn tx_idle(&self) -> bool {
        self.tx_idle.load(Ordering::Relaxed)
    }

    /// Signal quality captured at the start of the last frame
    pub fn signal(&self) -> SignalQuality {
        SignalQuality::from_raw(self.signal.load(Ordering::Relaxed))
    }

    /// Snapshot of the link counters
    pub fn stats(&self) -> LinkStats {
        LinkStats {
            frames_received: self.frames_received.load(Ordering::Relaxed),
            frames_discarded: self.frames_discarded.load(Ordering::Relaxed),
            frames_sent: self.frames_sent.load(Ordering::Relaxed),
            last_rx_len: self.last_rx_len.load(Ordering::Relaxed),
            last_tx_len: self.last_tx_len.load(Ordering::Relaxed),
        }
    }

    /// Note the payload length of a frame handed to the transceiver
    pub fn record_loaded(&self, payload_len: u8) {
        self.last_tx_len.store(payload_len, Ordering::Relaxed);
    }

    /// RX_START: capture PHY_RSSI for the frame that is arriving
    pub fn on_frame_start(&self, phy_rssi: u8) {
        self.signal.store(phy_rssi, Ordering::Relaxed);
    }

    /// RX_END: queue the payload of a received frame
    ///
    /// `frame` is the whole frame as read from the frame buffer, trailer
    /// included. The last two bytes (LQI and status) are not payload.
    /// Bytes that do not fit are counted in the overflow counter and the
    /// rest of the frame is still processed.
    pub fn on_frame_end(&self, frame: &[u8]) -> FrameOutcome {
        if !self.is_active() {
            return FrameOutcome::Ignored;
        }
        if !self.signal().crc_valid() {
            self.frames_discarded.fetch_add(1, Ordering::Relaxed);
            return FrameOutcome::Discarded;
        }

        let payload = &frame[..rx_payload_len(frame.len())];
        let mut dropped: u8 = 0;
        for &byte in payload {
            if self.rx.push(byte).is_err() {
                dropped = dropped.saturating_add(1);
            }
        }
        if dropped > 0 {
            self.rx_overflow
                .fetch_add(u16::from(dropped), Ordering::Relaxed);
        }

        self.frames_received.fetch_add(1, Ordering::Relaxed);
        self.last_rx_len
            .store(frame.len().min(u8::MAX as usize) as u8, Ordering::Relaxed);

        FrameOutcome::Stored {
            stored: (payload.len().min(u8::MAX as usize) as u8).saturating_sub(dropped),
            dropped,
        }
    }

    /// TX_END: a frame left the antenna
    pub fn on_transmit_complete(&self) {
        self.frames_sent.fetch_add(1, Ordering::Relaxed);
    }
}
