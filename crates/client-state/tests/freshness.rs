//! Timeout and clock skew boundaries.

use std::time::Duration;

use client_state::{ErrorKind, StateConfig, StateError, DEFAULT_MAX_CLOCK_SKEW, DEFAULT_TIMEOUT};
use client_state_testkit::{fixed_edition, TestFixture, FIXTURE_EPOCH};

#[test]
fn test_accepted_at_exact_timeout() {
    let fixture = TestFixture::new();
    let token = fixture.state.protect("v").unwrap();

    fixture.clock.advance(DEFAULT_TIMEOUT.as_secs());
    assert!(fixture.state.restore_value::<String>(&token).is_ok());
}

#[test]
fn test_rejected_one_second_past_timeout() {
    let fixture = TestFixture::new();
    let token = fixture.state.protect("v").unwrap();

    fixture.clock.advance(DEFAULT_TIMEOUT.as_secs() + 1);
    let err = fixture.state.restore_value::<String>(&token).unwrap_err();

    assert!(matches!(
        err,
        StateError::Expired { issued_at, now }
            if issued_at == FIXTURE_EPOCH && now == FIXTURE_EPOCH + 1801
    ));
    assert_eq!(err.kind(), ErrorKind::Freshness);
    assert!(err.is_client_error());
}

#[test]
fn test_accepted_at_exact_skew() {
    let fixture = TestFixture::new();
    let token = fixture.state.protect("v").unwrap();

    fixture.clock.rewind(DEFAULT_MAX_CLOCK_SKEW.as_secs());
    assert!(fixture.state.restore_value::<String>(&token).is_ok());
}

#[test]
fn test_rejected_beyond_skew() {
    let fixture = TestFixture::new();
    let token = fixture.state.protect("v").unwrap();

    fixture.clock.rewind(DEFAULT_MAX_CLOCK_SKEW.as_secs() + 1);
    let err = fixture.state.restore_value::<String>(&token).unwrap_err();

    assert!(matches!(err, StateError::IssuedInFuture { .. }));
    assert_eq!(err.kind(), ErrorKind::Freshness);
}

#[test]
fn test_restore_reports_issue_time() {
    let fixture = TestFixture::new();
    let token = fixture.state.protect("v").unwrap();

    fixture.clock.advance(60);
    let restored = fixture.state.restore_with_timestamp::<String>(&token).unwrap();
    assert_eq!(restored.value, "v");
    assert_eq!(restored.issued_at, FIXTURE_EPOCH);
}

#[test]
fn test_configured_windows() {
    let config = StateConfig::default()
        .with_timeout(Duration::from_secs(60))
        .with_max_clock_skew(Duration::ZERO);
    let fixture = TestFixture::with_config(fixed_edition(1, 0x10), config);
    let token = fixture.state.protect("v").unwrap();

    fixture.clock.rewind(1);
    assert!(fixture.state.restore_value::<String>(&token).is_err());

    fixture.clock.set(FIXTURE_EPOCH + 60);
    assert!(fixture.state.restore_value::<String>(&token).is_ok());

    fixture.clock.advance(1);
    assert!(fixture.state.restore_value::<String>(&token).is_err());
}

#[test]
fn test_persisted_max_age_tracks_timeout() {
    let config = StateConfig::default().with_timeout(Duration::from_secs(90));
    let fixture = TestFixture::with_config(fixed_edition(1, 0x10), config);

    let cookie = fixture.state.persist("k", "/", "v").unwrap();
    assert_eq!(cookie.max_age, Some(90));
}

#[test]
fn test_tampered_stale_token_reports_integrity() {
    let fixture = TestFixture::new();
    let token = fixture.state.protect("v").unwrap();
    // 43 'A's decode to a zeroed 32 byte tag
    let forged = format!("{}{}", token.trim_end_matches(|c: char| c != '|'), "A".repeat(43));

    fixture.clock.advance(DEFAULT_TIMEOUT.as_secs() * 10);
    let err = fixture.state.restore_value::<String>(&forged).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Integrity);
}
