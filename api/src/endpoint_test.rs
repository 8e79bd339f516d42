use super::*;

#[test]
fn auth_paths_match_server_routes() {
    assert_eq!(Endpoint::Login.path(), "supplier/login");
    assert_eq!(Endpoint::Register.path(), "supplier/add");
    assert_eq!(Endpoint::DecodeToken.path(), "supplier/decode_token");
    assert_eq!(
        Endpoint::VerifyOtp { user_id: "12".into(), otp: "4321".into() }.path(),
        "supplier/verify/12/4321"
    );
}

#[test]
fn product_list_keeps_trailing_slash() {
    assert_eq!(Endpoint::ProductList.path(), "product/");
    assert_eq!(Endpoint::ProductList.method(), Method::POST);
}

#[test]
fn dynamic_segments_are_separate() {
    assert_eq!(Endpoint::ProductUpdate("9".into()).segments(), vec!["product", "update", "9"]);
    assert_eq!(Endpoint::Districts("77".into()).segments(), vec!["city", "get_district_rj", "77"]);
}

#[test]
fn methods_follow_server_contract() {
    assert_eq!(Endpoint::ProductUpdate("1".into()).method(), Method::PUT);
    assert_eq!(Endpoint::ProductPublish("1".into()).method(), Method::GET);
    assert_eq!(Endpoint::Logout.method(), Method::GET);
    assert_eq!(Endpoint::OrderSetAwb("1".into()).method(), Method::POST);
}

#[test]
fn only_reset_and_otp_flows_are_session_exempt() {
    assert!(Endpoint::ForgotPassword.is_session_exempt());
    assert!(Endpoint::RequestOtp.is_session_exempt());
    assert!(Endpoint::VerifyOtp { user_id: "1".into(), otp: "0000".into() }.is_session_exempt());

    for endpoint in [
        Endpoint::Login,
        Endpoint::ChangePassword,
        Endpoint::DecodeToken,
        Endpoint::ProductList,
        Endpoint::ProductGet("1".into()),
        Endpoint::OrderList,
        Endpoint::Provinces,
    ] {
        assert!(!endpoint.is_session_exempt(), "{} should not be exempt", endpoint.name());
    }
}
