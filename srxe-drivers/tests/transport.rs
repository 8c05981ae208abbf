//! Transport behaviour against the simulated transceiver

use srxe_core::frame::FRAME_PAYLOAD_CAPACITY;
use srxe_core::{Channel, Link, RadioConfig};
use srxe_drivers::{Radio, RadioError};
use srxe_hal::mock::{MockDelay, SimTransceiver};
use srxe_hal::{irq, status, Transceiver, TrxCommand};

type SimRadio<'a> = Radio<'a, SimTransceiver, MockDelay>;

fn radio(link: &Link, trx: SimTransceiver) -> SimRadio<'_> {
    Radio::new(link, trx, MockDelay::new(), RadioConfig::default())
}

fn active(link: &Link) -> SimRadio<'_> {
    let mut radio = radio(link, SimTransceiver::new());
    radio.init(1).unwrap();
    radio
}

#[test]
fn test_get_buffer_zero_fills() {
    let link: Link = Link::new();
    let mut radio = active(&link);
    radio.transceiver_mut().receive_frame(&[0x41, 0x42, 0x43], true);
    radio.poll_events();

    let mut dest = [0xFF; 6];
    assert_eq!(radio.get_buffer(&mut dest), Ok(3));
    assert_eq!(dest, [0x41, 0x42, 0x43, 0, 0, 0]);
}

#[test]
fn test_auto_flush_at_threshold() {
    let link: Link = Link::new();
    let mut radio = active(&link);

    for i in 0..FRAME_PAYLOAD_CAPACITY - 1 {
        radio.put_byte(i as u8).unwrap();
    }
    assert!(radio.transceiver().sent().is_empty());

    radio.put_byte(0xFF).unwrap();

    let sent = radio.transceiver().sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].payload().len(), FRAME_PAYLOAD_CAPACITY);
    assert_eq!(sent[0].payload().last(), Some(&0xFF));
    assert!(link.tx().is_empty());
}

#[test]
fn test_channel_mapping() {
    for (logical, physical) in [(1, 11), (16, 26), (0, 11), (17, 11)] {
        let link: Link = Link::new();
        let mut radio = radio(&link, SimTransceiver::new());
        radio.init(logical).unwrap();
        assert_eq!(radio.transceiver().channel(), physical, "channel {}", logical);
    }
}

#[test]
fn test_inactive_after_terminate() {
    let link: Link = Link::new();
    let mut radio = active(&link);
    radio.put_buffer(b"queued").unwrap();
    radio.terminate();

    assert_eq!(radio.available(), Err(RadioError::Inactive));
    assert_eq!(radio.get_byte(), Err(RadioError::Inactive));
    assert_eq!(radio.put_byte(b'x'), Err(RadioError::Inactive));
    assert_eq!(radio.transmit_now(), Err(RadioError::Inactive));

    let mut dest = [0xAA; 4];
    assert_eq!(radio.get_buffer(&mut dest), Err(RadioError::Inactive));
    assert_eq!(dest, [0xAA; 4]);

    let tx_before = link.tx().len();
    assert_eq!(radio.put_buffer(b"more"), Err(RadioError::Inactive));
    assert_eq!(link.tx().len(), tx_before);
}

#[test]
fn test_init_abort_on_stuck_chip() {
    let link: Link<4, 128> = Link::new();
    let mut radio = Radio::new(&link, SimTransceiver::new(), MockDelay::new(), RadioConfig::default());
    radio.init(1).unwrap();
    radio.transceiver_mut().receive_frame(b"overflow", true);
    radio.poll_events();
    assert_eq!(radio.receive_overflow_count(), 4);

    *radio.transceiver_mut() = SimTransceiver::new().stick(status::RX_ON);
    assert_eq!(
        radio.init(2),
        Err(RadioError::NotIdle(srxe_core::TrxState::Listening))
    );

    assert!(!radio.is_active());
    assert_eq!(radio.transceiver().irq_mask() & irq::TRANSPORT, 0);
    assert_eq!(radio.receive_overflow_count(), 4);
}

#[test]
fn test_put_byte_reports_full_buffer() {
    let link: Link<256, 4> = Link::new();
    let mut radio = Radio::new(&link, SimTransceiver::new(), MockDelay::new(), RadioConfig::default());
    radio.init(1).unwrap();

    for b in 0..4u8 {
        assert_eq!(radio.put_byte(b), Ok(b));
    }
    assert_eq!(radio.put_byte(4), Err(RadioError::TxBufferFull));
    assert_eq!(link.tx().len(), 4);
    assert_eq!(link.tx().peek(), Some(0));
}

#[test]
fn test_failed_auto_send_keeps_bytes_queued() {
    let link: Link = Link::new();
    let config = RadioConfig {
        busy_wait_limit_ms: Some(2),
        ..RadioConfig::default()
    };
    let trx = SimTransceiver::new().slow_pll(50);
    let mut radio = Radio::new(&link, trx, MockDelay::new(), config);
    radio.init(1).unwrap();

    for i in 0..FRAME_PAYLOAD_CAPACITY - 1 {
        radio.put_byte(i as u8).unwrap();
    }

    // The PLL never locks in time, so nothing is sent
    assert_eq!(radio.put_byte(0xAB), Ok(0xAB));
    assert_eq!(link.tx().len(), FRAME_PAYLOAD_CAPACITY);
    assert_eq!(radio.put_byte(0xAC), Ok(0xAC));
    assert_eq!(radio.put_byte(0xAD), Ok(0xAD));
    assert_eq!(link.tx().len(), 128);

    assert_eq!(radio.put_byte(0xAE), Err(RadioError::TxBufferFull));
    assert_eq!(radio.put_byte(0xAF), Err(RadioError::TxBufferFull));
    assert_eq!(link.tx().len(), 128);
    assert!(radio.transceiver().sent().is_empty());
    assert_eq!(radio.transceiver().state(), status::RX_ON);
}

#[test]
fn test_failed_auto_send_from_put_buffer() {
    let link: Link = Link::new();
    let config = RadioConfig {
        busy_wait_limit_ms: Some(2),
        ..RadioConfig::default()
    };
    let trx = SimTransceiver::new().slow_pll(50);
    let mut radio = Radio::new(&link, trx, MockDelay::new(), config);
    radio.init(1).unwrap();

    assert_eq!(radio.put_buffer(&[1; 130]), Ok(130));
    assert_eq!(link.tx().len(), 128);
    assert!(radio.transceiver().sent().is_empty());
}

#[test]
fn test_terminate_on_chip_refusing_idle() {
    let link: Link = Link::new();
    let mut radio = active(&link);

    *radio.transceiver_mut() = SimTransceiver::new().stick(status::RX_ON);
    radio.transceiver_mut().set_irq_mask(irq::TRANSPORT);
    radio.terminate();

    assert!(!radio.is_active());
    assert!(radio.transceiver().slptr());
    assert_eq!(radio.transceiver().irq_mask(), 0);
    assert_eq!(radio.available(), Err(RadioError::Inactive));
}

#[test]
fn test_init_escalates_to_wake() {
    let link: Link = Link::new();
    // The first wake-up is refused and idle commands are ignored while
    // asleep, so only the last escalation step reaches TRX_OFF
    let trx = SimTransceiver::asleep().refuse_idle(1);
    let mut radio = radio(&link, trx);

    assert_eq!(radio.init(4), Ok(Channel::clamped(4)));
    assert_eq!(radio.transceiver().state(), status::RX_ON);
}

#[test]
fn test_frames_ignored_while_inactive() {
    let link: Link = Link::new();
    let mut radio = active(&link);
    radio.terminate();

    // Simulate a late RX_END after shutdown
    radio.transceiver_mut().set_slptr(false);
    radio.transceiver_mut().command(TrxCommand::RxOn);
    radio.transceiver_mut().set_irq_mask(irq::TRANSPORT);
    radio.transceiver_mut().receive_frame(b"late", true);
    radio.poll_events();

    assert!(link.rx().is_empty());
    assert_eq!(radio.stats().frames_received, 0);
}

#[test]
fn test_roundtrip_between_radios() {
    let link_a: Link = Link::new();
    let link_b: Link = Link::new();
    let mut a = active(&link_a);
    let mut b = active(&link_b);

    a.put_str("hello there").unwrap();
    let frame = a.transceiver().sent()[0].clone();

    b.transceiver_mut().receive_frame(frame.payload(), true);
    b.poll_events();

    let mut text = [0u8; 16];
    let n = b.get_buffer(&mut text).unwrap();
    assert_eq!(&text[..n], b"hello there");
    assert!(b.signal_quality().crc_valid());
    assert_eq!(b.stats().frames_received, 1);
}

#[test]
fn test_corrupted_frame_leaves_no_trace() {
    let link: Link = Link::new();
    let mut radio = active(&link);
    radio.transceiver_mut().receive_frame(b"junk", false);
    radio.poll_events();

    assert_eq!(radio.available(), Ok(0));
    assert_eq!(radio.receive_overflow_count(), 0);
    assert_eq!(radio.stats().frames_discarded, 1);
}
