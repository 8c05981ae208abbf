//! Suspend, resume and restart

use srxe_core::{Channel, Link, RadioConfig};
use srxe_drivers::{random, Radio};
use srxe_hal::mock::{MockDelay, SimTransceiver};
use srxe_hal::status;

#[test]
fn test_suspend_and_resume() {
    let link: Link = Link::new();
    let mut radio = Radio::new(&link, SimTransceiver::new(), MockDelay::new(), RadioConfig::default());
    radio.init(9).unwrap();

    let saved = radio.suspend();
    assert_eq!(saved, Some(Channel::clamped(9)));
    assert!(!radio.is_active());
    assert_eq!(radio.transceiver().state(), status::SLEEP);

    assert_eq!(radio.resume(saved), Ok(Some(Channel::clamped(9))));
    assert_eq!(radio.transceiver().state(), status::RX_ON);
    assert_eq!(radio.transceiver().channel(), 19);
}

#[test]
fn test_suspend_inactive_stays_down() {
    let link: Link = Link::new();
    let mut radio = Radio::new(&link, SimTransceiver::new(), MockDelay::new(), RadioConfig::default());

    let saved = radio.suspend();
    assert_eq!(saved, None);
    assert_eq!(radio.resume(saved), Ok(None));
    assert!(!radio.is_active());
}

#[test]
fn test_restart_changes_channel() {
    let link: Link = Link::new();
    let config = RadioConfig {
        restart_settle_ms: 20,
        ..RadioConfig::for_channel(2)
    };
    let mut radio = Radio::new(&link, SimTransceiver::new(), MockDelay::new(), config);
    assert_eq!(radio.start(), Ok(Channel::clamped(2)));
    radio.put_buffer(b"stale").unwrap();

    assert_eq!(radio.restart(14), Ok(Channel::clamped(14)));
    assert_eq!(radio.transceiver().channel(), 24);
    assert!(link.tx().is_empty());

    let (_, delay) = radio.release();
    assert!(delay.elapsed_ms() >= 20);
}

#[test]
fn test_random_seed_leaves_radio_off() {
    let link: Link = Link::new();
    let mut radio = Radio::new(
        &link,
        SimTransceiver::asleep().with_noise(0x3C),
        MockDelay::new(),
        RadioConfig::default(),
    );

    let mut rng = random::rng(&mut radio).unwrap();
    assert!(!radio.is_active());
    assert!(random::below(&mut rng, 100) < 100);
}
