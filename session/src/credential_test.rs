use super::*;

#[test]
fn credential_rejects_blank_input() {
    assert!(Credential::new("").is_none());
    assert!(Credential::new("   \n").is_none());
}

#[test]
fn credential_trims_whitespace() {
    let token = Credential::new("  abc123\n").unwrap();
    assert_eq!(token.as_str(), "abc123");
}

#[test]
fn credential_debug_hides_raw_value() {
    let token = Credential::new("super-secret").unwrap();
    let debug = format!("{token:?}");
    assert!(!debug.contains("super-secret"));
    assert!(debug.contains("12 bytes"));
}

#[test]
fn user_identity_serde_shape() {
    let user = UserIdentity {
        id: "7".into(),
        name: "Ann".into(),
        email: "a@b.com".into(),
        phone: String::new(),
        verified: true,
    };
    let json = serde_json::to_value(&user).unwrap();
    assert_eq!(json["id"], "7");
    assert_eq!(json["email"], "a@b.com");
    assert_eq!(json["verified"], true);
}
