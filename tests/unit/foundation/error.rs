use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        KymoError::user_input("x")
            .to_string()
            .contains("user input error:")
    );
    assert!(
        KymoError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(KymoError::Cancelled.to_string().contains("cancelled"));
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = KymoError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}

#[test]
fn only_user_input_is_flagged_as_declined() {
    assert!(KymoError::user_input("no key frames").is_user_input());
    assert!(!KymoError::validation("width").is_user_input());
    assert!(!KymoError::Cancelled.is_user_input());
}
