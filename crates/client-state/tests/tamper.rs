//! Every single-character change to a token must be rejected.

use client_state::{Cookie, ErrorKind, StateError};
use client_state_testkit::{FlowState, TestFixture};

/// Replace the character at `at` with a different base64url character.
fn substitute(token: &str, at: usize) -> String {
    let mut bytes = token.as_bytes().to_vec();
    let replacement = if bytes[at] == b'A' { b'B' } else { b'A' };
    bytes[at] = replacement;
    String::from_utf8(bytes).unwrap()
}

#[test]
fn test_every_substitution_rejected() {
    let fixture = TestFixture::new();
    let token = fixture
        .state
        .protect(&FlowState::new("github", "k-123", "/ui#/connections"))
        .unwrap();

    for (at, c) in token.char_indices() {
        if c == '|' {
            continue;
        }
        let forged = substitute(&token, at);
        let result = fixture.state.restore_value::<FlowState>(&forged);
        assert!(result.is_err(), "accepted token altered at {at}: {forged}");
    }
}

#[test]
fn test_mac_field_change_is_integrity_failure() {
    let fixture = TestFixture::new();
    let token = fixture.state.protect("value").unwrap();
    let mac_start = token.rfind('|').unwrap() + 1;

    // Leave the final char alone: its low bits may be padding
    for at in mac_start..token.len() - 1 {
        let err = fixture
            .state
            .restore_value::<String>(&substitute(&token, at))
            .unwrap_err();
        assert!(matches!(err, StateError::Integrity), "position {at}: {err}");
    }
}

#[test]
fn test_ciphertext_change_is_integrity_failure() {
    let fixture = TestFixture::new();
    let token = fixture.state.protect("value").unwrap();
    let fields: Vec<&str> = token.split('|').collect();

    let mut forged = fields.clone();
    let ct = substitute(fields[3], 0);
    forged[3] = &ct;

    let err = fixture
        .state
        .restore_value::<String>(&forged.join("|"))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Integrity);
}

#[test]
fn test_field_swaps_rejected() {
    let fixture = TestFixture::new();
    let token = fixture.state.protect("value").unwrap();
    let fields: Vec<&str> = token.split('|').collect();

    for (i, j) in [(0, 3), (3, 4), (1, 2), (0, 4)] {
        let mut swapped = fields.clone();
        swapped.swap(i, j);
        assert!(
            fixture.state.restore_value::<String>(&swapped.join("|")).is_err(),
            "accepted token with fields {i} and {j} swapped"
        );
    }
}

#[test]
fn test_malformed_tokens_are_format_errors() {
    let fixture = TestFixture::new();
    let token = fixture.state.protect("value").unwrap();

    for bad in [
        String::new(),
        "not a token".to_string(),
        token.replace('|', ","),
        format!("{token}|"),
        format!("|{token}"),
        token.replacen('|', "||", 1),
        format!("{token}="),
    ] {
        let err = fixture.state.restore_value::<String>(&bad).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Format, "token {bad:?}");
        assert!(err.is_client_error());
    }
}

#[test]
fn test_cookie_with_foreign_value_rejected() {
    let fixture = TestFixture::new();
    let cookie = Cookie::new("cred-o2-1", "eyJhbGciOiJIUzI1NiJ9.e30.sig");

    assert!(fixture.state.restore_from::<String>(&cookie).is_err());
}
