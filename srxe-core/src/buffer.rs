//! Interrupt-safe circular byte buffer
//!
//! The radio keeps one buffer per direction. The receive buffer is filled
//! from the frame-end interrupt and drained by the application, the
//! transmit buffer the other way around, so every access that touches the
//! indices runs inside a critical section. On the AVR target that masks
//! interrupts for a handful of instructions; on the host it is a mutex.
//!
//! A full buffer never overwrites old data. Callers decide what a rejected
//! byte means (the receive path counts it, the transmit path reports it).

use core::cell::RefCell;

use critical_section::Mutex;
use srxe_hal::DelayNs;

/// Attempts made by [`RingBuffer::push_blocking`] before giving up
pub const PUSH_ATTEMPTS: u8 = 50;

/// Delay between [`RingBuffer::push_blocking`] attempts (ms)
pub const PUSH_RETRY_MS: u32 = 5;

/// The buffer had no room for another byte
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BufferFull;

#[derive(Debug)]
struct Ring<const N: usize> {
    data: [u8; N],
    /// Bytes currently held
    length: usize,
    /// Index of the oldest byte
    current: usize,
}

impl<const N: usize> Ring<N> {
    fn peek(&self) -> Option<u8> {
        (self.length > 0).then(|| self.data[self.current])
    }

    fn pop(&mut self) -> Option<u8> {
        let byte = self.peek()?;
        self.current += 1;
        if self.current >= N {
            self.current -= N;
        }
        self.length -= 1;
        Some(byte)
    }

    fn push(&mut self, byte: u8) -> Result<u8, BufferFull> {
        if self.length >= N {
            return Err(BufferFull);
        }
        self.data[(self.current + self.length) % N] = byte;
        self.length += 1;
        Ok(byte)
    }
}

/// Fixed-capacity FIFO byte queue shared between mainline and IRQ context
///
/// All methods take `&self`, so a buffer can live in a `static` and be used
/// from interrupt handlers. Capacity is the const parameter `N`.
pub struct RingBuffer<const N: usize> {
    inner: Mutex<RefCell<Ring<N>>>,
}

impl<const N: usize> Default for RingBuffer<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> RingBuffer<N> {
    /// Create an empty buffer
    pub const fn new() -> Self {
        Self {
            inner: Mutex::new(RefCell::new(Ring {
                data: [0; N],
                length: 0,
                current: 0,
            })),
        }
    }

    fn with<R>(&self, f: impl FnOnce(&mut Ring<N>) -> R) -> R {
        critical_section::with(|cs| f(&mut self.inner.borrow_ref_mut(cs)))
    }

    /// Discard the contents and rewind to the start of storage
    pub fn reset(&self) {
        self.with(|ring| {
            ring.length = 0;
            ring.current = 0;
        });
    }

    /// Oldest byte, without removing it
    pub fn peek(&self) -> Option<u8> {
        self.with(|ring| ring.peek())
    }

    /// Remove and return the oldest byte
    pub fn pop(&self) -> Option<u8> {
        self.with(|ring| ring.pop())
    }

    /// Append a byte, returning it on success
    pub fn push(&self, byte: u8) -> Result<u8, BufferFull> {
        self.with(|ring| ring.push(byte))
    }

    /// Append a byte, retrying while the buffer is full
    ///
    /// Makes up to [`PUSH_ATTEMPTS`] attempts with [`PUSH_RETRY_MS`] between
    /// them, so it gives up after roughly 250ms. Only useful when something
    /// else (an interrupt handler) drains the buffer in the meantime.
    pub fn push_blocking<D: DelayNs>(&self, byte: u8, delay: &mut D) -> Result<u8, BufferFull> {
        let mut attempts = PUSH_ATTEMPTS;
        loop {
            match self.push(byte) {
                Ok(byte) => return Ok(byte),
                Err(BufferFull) => {
                    attempts -= 1;
                    if attempts == 0 {
                        return Err(BufferFull);
                    }
                    delay.delay_ms(PUSH_RETRY_MS);
                }
            }
        }
    }

    /// Bytes currently held
    pub fn len(&self) -> usize {
        self.with(|ring| ring.length)
    }

    /// Check if the buffer holds no data
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Check if the buffer has no room left
    pub fn is_full(&self) -> bool {
        self.len() >= N
    }

    /// Room left, in bytes
    pub fn capacity_remaining(&self) -> usize {
        self.with(|ring| N - ring.length)
    }

    /// Total capacity, in bytes
    pub const fn capacity(&self) -> usize {
        N
    }

    /// Logically discard the contents (storage is not zeroed)
    pub fn flush(&self) {
        self.with(|ring| ring.length = 0);
    }
}
