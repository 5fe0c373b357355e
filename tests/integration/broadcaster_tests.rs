//! Broadcaster scheduling tests driven through mock adapters.

use blecast::app::broadcaster::{BroadcastState, Broadcaster};
use blecast::app::events::BroadcastEvent;
use blecast::config::{BroadcastConfig, MAX_INTERVAL_MS};
use blecast::payload::ManufacturerData;
use blecast::{DriverError, Error};

use crate::mock_radio::{RadioCall, ready_broadcaster, settings};

// ── Bounded scheduling ────────────────────────────────────────

#[test]
fn bounded_run_emits_on_interval_then_goes_idle() {
    let (mut b, mut radio, mut sink) = ready_broadcaster(3, 1000, true);
    assert_eq!(b.state(), BroadcastState::Active);

    for now in [0, 500, 1000, 1600, 2200, 3000] {
        b.tick(now, &mut radio, &mut sink);
    }

    assert_eq!(sink.emission_times(), vec![0, 1000, 2200]);
    assert_eq!(radio.begin_count(), 3);
    assert_eq!(radio.end_count(), 1);
    assert_eq!(b.emitted_count(), 3);
    assert_eq!(b.state(), BroadcastState::Idle);
    assert!(
        sink.events.contains(&BroadcastEvent::Completed { count: 3 }),
        "completion must be reported"
    );
    assert_eq!(sink.events.last(), Some(&BroadcastEvent::Stopped));
}

#[test]
fn every_emission_uses_configured_interval() {
    let (mut b, mut radio, mut sink) = ready_broadcaster(2, 250, true);
    b.tick(0, &mut radio, &mut sink);
    b.tick(250, &mut radio, &mut sink);
    let begins: Vec<_> = radio
        .calls
        .iter()
        .filter(|c| matches!(c, RadioCall::Begin { .. }))
        .cloned()
        .collect();
    assert_eq!(
        begins,
        vec![RadioCall::Begin { interval_ms: 250 }, RadioCall::Begin { interval_ms: 250 }]
    );
}

#[test]
fn unbounded_run_keeps_emitting() {
    let (mut b, mut radio, mut sink) = ready_broadcaster(0, 500, true);
    for now in (0..2000).step_by(100) {
        b.tick(now, &mut radio, &mut sink);
    }
    assert_eq!(sink.emission_times(), vec![0, 500, 1000, 1500]);
    assert_eq!(b.state(), BroadcastState::Active);
    assert_eq!(b.total_emissions(), 4);
    assert_eq!(radio.end_count(), 0);
}

#[test]
fn idle_tick_touches_nothing() {
    let (mut b, mut radio, mut sink) = ready_broadcaster(3, 100, false);
    let calls_before = radio.calls.len();
    let events_before = sink.events.len();
    for now in (0..1000).step_by(50) {
        b.tick(now, &mut radio, &mut sink);
    }
    assert_eq!(radio.calls.len(), calls_before);
    assert_eq!(sink.events.len(), events_before);
    assert_eq!(b.state(), BroadcastState::Idle);
}

// ── Start / stop ──────────────────────────────────────────────

#[test]
fn restart_resets_the_count() {
    let (mut b, mut radio, mut sink) = ready_broadcaster(5, 100, true);
    b.tick(0, &mut radio, &mut sink);
    b.tick(100, &mut radio, &mut sink);
    assert_eq!(b.emitted_count(), 2);

    b.start_advertising(&mut sink);
    assert_eq!(b.emitted_count(), 0);
    for now in [150, 250, 350, 450, 550, 650] {
        b.tick(now, &mut radio, &mut sink);
    }

    assert_eq!(b.emitted_count(), 5);
    assert_eq!(b.total_emissions(), 7);
    assert_eq!(radio.begin_count(), 7);
    assert_eq!(b.state(), BroadcastState::Idle);
}

#[test]
fn first_tick_after_restart_emits_immediately() {
    let (mut b, mut radio, mut sink) = ready_broadcaster(10, 1000, true);
    b.tick(0, &mut radio, &mut sink);
    b.start_advertising(&mut sink);
    b.tick(10, &mut radio, &mut sink);
    assert_eq!(sink.emission_times(), vec![0, 10]);
    assert_eq!(b.last_emission_ms(), Some(10));
}

#[test]
fn start_while_idle_after_completion_runs_again() {
    let (mut b, mut radio, mut sink) = ready_broadcaster(1, 100, true);
    b.tick(0, &mut radio, &mut sink);
    assert_eq!(b.state(), BroadcastState::Idle);

    b.start_advertising(&mut sink);
    assert_eq!(b.state(), BroadcastState::Active);
    b.tick(50, &mut radio, &mut sink);
    assert_eq!(radio.begin_count(), 2);
    assert_eq!(b.state(), BroadcastState::Idle);
}

#[test]
fn stop_mid_run_halts_radio_and_emissions() {
    let (mut b, mut radio, mut sink) = ready_broadcaster(10, 100, true);
    b.tick(0, &mut radio, &mut sink);
    b.stop_advertising(&mut radio, &mut sink);
    assert_eq!(b.state(), BroadcastState::Idle);
    assert_eq!(radio.end_count(), 1);

    b.tick(500, &mut radio, &mut sink);
    assert_eq!(radio.begin_count(), 1);
}

#[test]
fn stop_while_idle_is_harmless() {
    let (mut b, mut radio, mut sink) = ready_broadcaster(3, 100, false);
    b.stop_advertising(&mut radio, &mut sink);
    b.stop_advertising(&mut radio, &mut sink);
    assert_eq!(b.state(), BroadcastState::Idle);
    assert_eq!(sink.driver_faults(), 0);
}

#[test]
fn stop_failure_is_reported_but_state_still_idle() {
    let (mut b, mut radio, mut sink) = ready_broadcaster(0, 100, true);
    radio.fail_end = Some(DriverError::StopFailed(-1));
    b.stop_advertising(&mut radio, &mut sink);
    assert_eq!(b.state(), BroadcastState::Idle);
    assert!(sink.events.contains(&BroadcastEvent::DriverFault(DriverError::StopFailed(-1))));
    assert_eq!(sink.events.last(), Some(&BroadcastEvent::Stopped));
}

// ── Mutators ──────────────────────────────────────────────────

#[test]
fn payload_change_is_registered_before_next_emission() {
    let (mut b, mut radio, mut sink) = ready_broadcaster(0, 100, true);
    b.tick(0, &mut radio, &mut sink);

    let next = ManufacturerData::from_slice(&[0xAA, 0xBB]).unwrap();
    b.set_payload(next, &mut radio, &mut sink);
    b.tick(100, &mut radio, &mut sink);

    let tail = &radio.calls[radio.calls.len() - 2..];
    assert_eq!(
        tail,
        &[RadioCall::SetPayload(vec![0xAA, 0xBB]), RadioCall::Begin { interval_ms: 100 }]
    );
    assert!(sink.events.contains(&BroadcastEvent::PayloadUpdated { len: 2 }));
}

#[test]
fn interval_change_applies_on_next_tick() {
    let (mut b, mut radio, mut sink) = ready_broadcaster(0, 1000, true);
    b.tick(0, &mut radio, &mut sink);
    b.set_interval(200).unwrap();
    b.tick(100, &mut radio, &mut sink);
    b.tick(200, &mut radio, &mut sink);
    assert_eq!(sink.emission_times(), vec![0, 200]);
    assert_eq!(radio.calls.last(), Some(&RadioCall::Begin { interval_ms: 200 }));
}

#[test]
fn zero_interval_is_rejected_and_old_value_kept() {
    let (mut b, _radio, _sink) = ready_broadcaster(0, 300, true);
    assert!(b.set_interval(0).is_err());
    assert_eq!(b.settings().interval_ms, 300);
}

#[test]
fn interval_above_ble_maximum_is_rejected_on_every_path() {
    let (mut b, mut radio, mut sink) = ready_broadcaster(0, 300, true);
    assert_eq!(
        b.set_interval(MAX_INTERVAL_MS + 1),
        Err(Error::Config("interval_ms must be <= 10240"))
    );
    let cfg = BroadcastConfig {
        interval_ms: MAX_INTERVAL_MS + 1,
        ..BroadcastConfig::default()
    };
    assert!(b.apply_config(&cfg, &mut radio, &mut sink).is_err());
    assert!(Broadcaster::new(settings(3, MAX_INTERVAL_MS + 1), true).is_err());
    assert_eq!(b.settings().interval_ms, 300);

    b.set_interval(MAX_INTERVAL_MS).unwrap();
    assert_eq!(b.settings().interval_ms, MAX_INTERVAL_MS);
}

#[test]
fn target_lowered_below_progress_stops_emitting() {
    let (mut b, mut radio, mut sink) = ready_broadcaster(10, 100, true);
    for now in [0, 100, 200] {
        b.tick(now, &mut radio, &mut sink);
    }
    b.set_target_count(2);
    for now in (300..=5000).step_by(100) {
        b.tick(now, &mut radio, &mut sink);
    }

    assert_eq!(radio.begin_count(), 3);
    assert_eq!(radio.end_count(), 1);
    assert_eq!(b.emitted_count(), 3);
    assert_eq!(b.state(), BroadcastState::Idle);
    assert_eq!(sink.events.last(), Some(&BroadcastEvent::Stopped));
}

#[test]
fn raising_target_from_unbounded_counts_from_zero() {
    let (mut b, mut radio, mut sink) = ready_broadcaster(0, 100, true);
    b.tick(0, &mut radio, &mut sink);
    b.tick(100, &mut radio, &mut sink);
    b.set_target_count(2);
    b.tick(200, &mut radio, &mut sink);
    b.tick(300, &mut radio, &mut sink);
    assert_eq!(b.emitted_count(), 2);
    assert_eq!(b.total_emissions(), 4);
    assert_eq!(b.state(), BroadcastState::Idle);
}

// ── Driver faults ─────────────────────────────────────────────

#[test]
fn rejected_emission_still_counts_toward_target() {
    let (mut b, mut radio, mut sink) = ready_broadcaster(3, 100, true);
    radio.fail_begin = Some(DriverError::StartFailed(0x103));
    for now in (0..1000).step_by(100) {
        b.tick(now, &mut radio, &mut sink);
    }
    assert_eq!(radio.begin_count(), 3);
    assert_eq!(sink.driver_faults(), 3);
    assert_eq!(b.emitted_count(), 3);
    assert_eq!(b.state(), BroadcastState::Idle);
}

// ── Hot reload ────────────────────────────────────────────────

#[test]
fn apply_config_updates_every_field() {
    let (mut b, mut radio, mut sink) = ready_broadcaster(3, 100, true);
    let mut cfg = BroadcastConfig {
        send_count: 7,
        interval_ms: 400,
        ..BroadcastConfig::default()
    };
    cfg.manufacturer_data.clear();
    cfg.manufacturer_data.push_str("0102").unwrap();

    b.apply_config(&cfg, &mut radio, &mut sink).unwrap();

    assert_eq!(b.settings().send_count, 7);
    assert_eq!(b.settings().interval_ms, 400);
    assert_eq!(b.settings().payload.as_bytes(), &[0x01, 0x02]);
    assert_eq!(radio.payloads().last(), Some(&vec![0x01, 0x02]));
}

#[test]
fn apply_config_with_same_payload_skips_radio() {
    let (mut b, mut radio, mut sink) = ready_broadcaster(3, 100, true);
    let mut cfg = BroadcastConfig::default();
    cfg.manufacturer_data.clear();
    cfg.manufacturer_data.push_str("FFFF1234").unwrap();
    let pushes_before = radio.payloads().len();

    b.apply_config(&cfg, &mut radio, &mut sink).unwrap();
    assert_eq!(radio.payloads().len(), pushes_before);
}

#[test]
fn apply_config_with_bad_hex_changes_nothing() {
    let (mut b, mut radio, mut sink) = ready_broadcaster(3, 100, true);
    let before = b.settings().clone();
    let mut cfg = BroadcastConfig {
        send_count: 99,
        ..BroadcastConfig::default()
    };
    cfg.manufacturer_data.clear();
    cfg.manufacturer_data.push_str("XYZ").unwrap();

    assert!(b.apply_config(&cfg, &mut radio, &mut sink).is_err());
    assert_eq!(b.settings(), &before);
}
