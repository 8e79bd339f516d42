use super::*;

#[test]
fn default_base_url_parses() {
    let config = ClientConfig::new(DEFAULT_BASE_URL).unwrap();
    assert_eq!(config.base_url.host_str(), Some("mbapi.dswip.com"));
    assert_eq!(config.timeout, Duration::from_secs(30));
    assert_eq!(config.connect_timeout, Duration::from_secs(10));
}

#[test]
fn rejects_non_http_scheme() {
    let err = ClientConfig::new("ftp://example.com/").unwrap_err();
    assert!(err.to_string().contains("unsupported scheme"));
}

#[test]
fn rejects_relative_url() {
    assert!(ClientConfig::new("supplier/login").is_err());
}

#[test]
fn with_timeout_overrides_default() {
    let config = ClientConfig::new("http://127.0.0.1:9/").unwrap().with_timeout(Duration::from_millis(250));
    assert_eq!(config.timeout, Duration::from_millis(250));
}

#[test]
fn env_parse_falls_back_on_missing_key() {
    assert_eq!(env_parse("LAPAKBENZ_TEST_SURELY_UNSET_KEY", 42_u64), 42);
}

#[test]
fn with_base_url_keeps_timeouts() {
    let config = ClientConfig::new(DEFAULT_BASE_URL)
        .unwrap()
        .with_timeout(Duration::from_secs(5))
        .with_base_url("http://localhost:8080/api/")
        .unwrap();
    assert_eq!(config.base_url.path(), "/api/");
    assert_eq!(config.timeout, Duration::from_secs(5));
    assert!(ClientConfig::new(DEFAULT_BASE_URL).unwrap().with_base_url("mailto:x@y").is_err());
}
