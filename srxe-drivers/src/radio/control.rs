//! Bringing the transceiver up and down

use embedded_hal::delay::DelayNs;
use srxe_core::config::MAX_TX_POWER_LEVEL;
use srxe_core::{Channel, TrxState};
use srxe_hal::{irq, Transceiver, TrxCommand};

use super::{Radio, RadioError};

/// Settling time after each step of the force-to-idle sequence (ms)
const SETTLE_MS: u32 = 1;

impl<'a, T: Transceiver, D: DelayNs, const RX: usize, const TX: usize> Radio<'a, T, D, RX, TX> {
    /// Bring the transport up on `channel` and start listening
    ///
    /// Channels outside 1..=16 fall back to channel 1. Any previous session
    /// is dropped together with its buffered data. On error the transport
    /// stays inactive with event triggers disabled.
    pub fn init(&mut self, channel: u8) -> Result<Channel, RadioError> {
        let channel = Channel::clamped(channel);

        self.link.deactivate();
        self.link.reset_buffers();

        self.wait_while(|state| state == TrxState::Busy)?;
        if !self.state().is_awake() {
            self.trx.set_slptr(false);
        }

        self.trx.reset();
        self.trx.set_irq_mask(0);

        if let Err(err) = self.force_idle() {
            warn!("radio init aborted: {}", err);
            return Err(err);
        }

        self.trx.set_auto_crc(true);
        self.trx.set_irq_mask(irq::TRANSPORT);
        self.trx.set_channel(channel.physical());
        self.trx.set_tx_power(self.tx_power());
        self.trx.command(TrxCommand::RxOn);

        self.link.activate(channel);
        info!("radio up on channel {} ({} MHz)", channel.get(), channel.frequency_mhz());
        Ok(channel)
    }

    /// [`init`](Self::init) on the configured channel
    pub fn start(&mut self) -> Result<Channel, RadioError> {
        self.init(self.config.channel)
    }

    /// Shut the transport down and put the transceiver to sleep
    ///
    /// Does nothing if the transport is not active. Failing to reach idle
    /// first is logged and otherwise ignored.
    pub fn terminate(&mut self) {
        if !self.link.is_active() {
            return;
        }

        self.link.deactivate();
        self.link.reset_flags();

        if let Err(_err) = self.force_idle() {
            warn!("radio terminate: {}", _err);
        }
        self.trx.set_slptr(true);
        self.trx.set_irq_mask(0);
        info!("radio down");
    }

    /// Check if the transport is up
    pub fn is_active(&self) -> bool {
        self.link.is_active()
    }

    /// The channel the transport is up on
    pub fn active_channel(&self) -> Option<Channel> {
        self.link.channel()
    }

    /// Terminate before a power-down, returning the channel to resume on
    pub fn suspend(&mut self) -> Option<Channel> {
        let channel = self.link.channel()?;
        self.terminate();
        Some(channel)
    }

    /// Undo a [`suspend`](Self::suspend)
    ///
    /// `None` means the transport was not active before and stays down.
    pub fn resume(&mut self, channel: Option<Channel>) -> Result<Option<Channel>, RadioError> {
        match channel {
            Some(channel) => self.init(channel.get()).map(Some),
            None => Ok(None),
        }
    }

    /// Move to another channel
    ///
    /// Terminates any active session, lets the chip settle for
    /// `restart_settle_ms` and initializes again.
    pub fn restart(&mut self, channel: u8) -> Result<Channel, RadioError> {
        if self.link.is_active() {
            self.terminate();
            self.delay
                .delay_ms(u32::from(self.config.restart_settle_ms));
        }
        self.init(channel)
    }

    /// Get the transceiver into TRX_OFF, escalating if it refuses
    ///
    /// Tries TRX_OFF, then FORCE_TRX_OFF, then a wake-up through SLPTR,
    /// checking the state after each step.
    fn force_idle(&mut self) -> Result<(), RadioError> {
        self.trx.command(TrxCommand::TrxOff);
        if self.settle() == TrxState::Idle {
            return Ok(());
        }

        debug!("TRX_OFF refused, forcing");
        self.trx.command(TrxCommand::ForceTrxOff);
        if self.settle() == TrxState::Idle {
            return Ok(());
        }

        debug!("FORCE_TRX_OFF refused, waking");
        self.trx.set_slptr(false);
        match self.settle() {
            TrxState::Idle => Ok(()),
            state => Err(RadioError::NotIdle(state)),
        }
    }

    /// Configured TX power, clamped to what TX_PWR accepts
    fn tx_power(&self) -> u8 {
        if self.config.validate().is_err() {
            warn!("tx power {} out of range, using {}", self.config.tx_power, MAX_TX_POWER_LEVEL);
            return MAX_TX_POWER_LEVEL;
        }
        self.config.tx_power
    }

    fn settle(&mut self) -> TrxState {
        self.delay.delay_ms(SETTLE_MS);
        self.state()
    }
}

#[cfg(test)]
mod tests {
    use srxe_core::{Link, RadioConfig};
    use srxe_hal::mock::{MockDelay, SimTransceiver};
    use srxe_hal::status;

    use super::*;

    fn radio(
        link: &Link,
        trx: SimTransceiver,
    ) -> Radio<'_, SimTransceiver, MockDelay> {
        Radio::new(link, trx, MockDelay::new(), RadioConfig::default())
    }

    #[test]
    fn test_init_programs_chip() {
        let link: Link = Link::new();
        let mut radio = radio(&link, SimTransceiver::new());

        assert_eq!(radio.init(3), Ok(Channel::clamped(3)));

        let trx = radio.transceiver();
        assert_eq!(trx.state(), status::RX_ON);
        assert_eq!(trx.channel(), 13);
        assert_eq!(trx.irq_mask(), irq::TRANSPORT);
        assert_eq!(trx.tx_power(), 0);
        assert!(trx.auto_crc());
        assert_eq!(trx.resets(), 1);
        assert_eq!(radio.active_channel(), Some(Channel::clamped(3)));
    }

    #[test]
    fn test_init_escalates_to_force() {
        let link: Link = Link::new();
        let mut trx = SimTransceiver::new().refuse_idle(1);
        trx.command(TrxCommand::RxOn);
        let mut radio = radio(&link, trx);

        assert!(radio.init(1).is_ok());
        let commands = radio.transceiver().commands();
        assert_eq!(
            &commands[1..],
            &[TrxCommand::TrxOff, TrxCommand::ForceTrxOff, TrxCommand::RxOn]
        );
    }

    #[test]
    fn test_init_wakes_sleeping_chip() {
        let link: Link = Link::new();
        let mut radio = radio(&link, SimTransceiver::asleep());

        assert!(radio.init(2).is_ok());
        assert_eq!(radio.transceiver().state(), status::RX_ON);
    }

    #[test]
    fn test_terminate_sleeps() {
        let link: Link = Link::new();
        let mut radio = radio(&link, SimTransceiver::new());
        radio.init(1).unwrap();

        radio.terminate();
        assert!(!radio.is_active());
        assert_eq!(radio.transceiver().state(), status::SLEEP);
        assert_eq!(radio.transceiver().irq_mask(), 0);

        // Second terminate is a no-op
        let issued = radio.transceiver().commands().len();
        radio.terminate();
        assert_eq!(radio.transceiver().commands().len(), issued);
    }

    #[test]
    fn test_init_clamps_tx_power() {
        let link: Link = Link::new();
        let config = RadioConfig {
            tx_power: 0x30,
            ..RadioConfig::default()
        };
        let mut radio = Radio::new(&link, SimTransceiver::new(), MockDelay::new(), config);

        radio.init(1).unwrap();
        assert_eq!(radio.transceiver().tx_power(), MAX_TX_POWER_LEVEL);
    }

    #[test]
    fn test_init_keeps_valid_tx_power() {
        let link: Link = Link::new();
        let config = RadioConfig {
            tx_power: 0x07,
            ..RadioConfig::default()
        };
        let mut radio = Radio::new(&link, SimTransceiver::new(), MockDelay::new(), config);

        radio.init(1).unwrap();
        assert_eq!(radio.transceiver().tx_power(), 0x07);
    }

    #[test]
    fn test_wait_while_respects_limit() {
        let link: Link = Link::new();
        let config = RadioConfig {
            busy_wait_limit_ms: Some(3),
            ..RadioConfig::default()
        };
        let trx = SimTransceiver::new().hold_transition(100);
        let mut radio = Radio::new(&link, trx, MockDelay::new(), config);

        assert_eq!(radio.init(1), Err(RadioError::Timeout));
        assert!(!radio.is_active());

        let (_, delay) = radio.release();
        assert_eq!(delay.elapsed_ms(), 3);
    }
}
