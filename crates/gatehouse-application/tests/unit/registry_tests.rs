//! Tests for provider registries
//!
//! Uses `extern crate gatehouse_providers` (in `unit.rs`) to force linkme
//! registration of real providers.

use gatehouse_application::ports::registry::{
    OriginProviderConfig, StoreProviderConfig, list_origin_providers, list_store_providers,
    resolve_origin_provider, resolve_store_provider,
};
use std::time::Duration;

#[test]
fn test_config_builders() {
    let store = StoreProviderConfig::new("redis")
        .with_address("localhost", 6380)
        .with_credentials(Some("app".to_string()), "secret")
        .with_connect_timeout(Duration::from_secs(2));
    assert_eq!(store.provider, "redis");
    assert_eq!(store.host.as_deref(), Some("localhost"));
    assert_eq!(store.port, Some(6380));
    assert_eq!(store.username.as_deref(), Some("app"));
    assert_eq!(store.password.as_deref(), Some("secret"));
    assert_eq!(store.connect_timeout, Some(Duration::from_secs(2)));

    let origin = OriginProviderConfig::new("http")
        .with_url("http://upstream")
        .with_timeout(Duration::from_secs(3));
    assert_eq!(origin.url.as_deref(), Some("http://upstream"));
    assert_eq!(origin.timeout, Some(Duration::from_secs(3)));
}

#[test]
fn test_all_providers_registered() {
    let stores: Vec<&str> = list_store_providers().iter().map(|(n, _)| *n).collect();
    assert!(stores.contains(&"memory"), "Available: {stores:?}");
    assert!(stores.contains(&"redis"), "Available: {stores:?}");

    let origins: Vec<&str> = list_origin_providers().iter().map(|(n, _)| *n).collect();
    assert!(origins.contains(&"static"), "Available: {origins:?}");
    assert!(origins.contains(&"http"), "Available: {origins:?}");
}

#[test]
fn test_resolve_by_name() {
    let store = resolve_store_provider(&StoreProviderConfig::new("memory")).unwrap();
    assert_eq!(store.provider_name(), "memory");

    let origin = resolve_origin_provider(&OriginProviderConfig::new("static")).unwrap();
    assert_eq!(origin.provider_name(), "static");
}

#[test]
fn test_unknown_provider_error_names_alternatives() {
    let err = resolve_origin_provider(&OriginProviderConfig::new("ftp")).unwrap_err();
    assert!(err.contains("Unknown origin provider 'ftp'"));
    assert!(err.contains("static"));
}
