//! Tests for provider self-registration

use gatehouse_application::ports::registry::{
    OriginProviderConfig, StoreProviderConfig, list_origin_providers, list_store_providers,
    resolve_origin_provider, resolve_store_provider,
};
use std::time::Duration;

#[test]
fn test_memory_store_registered() {
    let providers = list_store_providers();
    assert!(
        providers.iter().any(|(name, _)| *name == "memory"),
        "memory store should be registered. Available: {providers:?}"
    );
}

#[test]
fn test_resolve_memory_store() {
    let store = resolve_store_provider(&StoreProviderConfig::new("memory")).unwrap();
    assert_eq!(store.provider_name(), "memory");
}

#[test]
fn test_unknown_store_lists_available() {
    let err = resolve_store_provider(&StoreProviderConfig::new("etcd")).unwrap_err();
    assert!(err.contains("Unknown store provider 'etcd'"));
    assert!(err.contains("memory"));
}

#[test]
fn test_resolve_static_origin() {
    let config = OriginProviderConfig::new("static").with_latency(Duration::from_millis(5));
    let origin = resolve_origin_provider(&config).unwrap();
    assert_eq!(origin.provider_name(), "static");
    assert!(
        list_origin_providers()
            .iter()
            .any(|(name, _)| *name == "static")
    );
}

#[cfg(feature = "origin-http")]
#[test]
fn test_http_origin_requires_url() {
    let err = resolve_origin_provider(&OriginProviderConfig::new("http")).unwrap_err();
    assert!(err.contains("url"));
}
