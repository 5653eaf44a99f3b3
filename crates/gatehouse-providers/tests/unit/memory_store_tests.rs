//! Tests for the in-memory store provider

use futures::StreamExt;
use gatehouse_domain::ports::{CounterStore, KeyTtl, KeyValueStore, LogStore, PubSubStore};
use gatehouse_domain::value_objects::{
    GroupReadMode, StreamPosition, WorkItemAttributes, WorkItemId,
};
use gatehouse_domain::{Error, StoreProvider};
use gatehouse_providers::store::InMemoryStoreProvider;
use std::time::Duration;

fn attrs(resource_id: &str) -> WorkItemAttributes {
    WorkItemAttributes::from([("resourceId".to_string(), resource_id.to_string())])
}

mod counters {
    use super::*;

    #[tokio::test]
    async fn test_increment_starts_at_one() {
        let store = InMemoryStoreProvider::new();
        assert_eq!(store.increment("c").await.unwrap(), 1);
        assert_eq!(store.increment("c").await.unwrap(), 2);
        assert_eq!(store.ttl("c").await.unwrap(), KeyTtl::Persistent);
    }

    #[tokio::test(start_paused = true)]
    async fn test_counter_expires() {
        let store = InMemoryStoreProvider::new();
        store.increment("c").await.unwrap();
        assert!(store.expire("c", Duration::from_secs(10)).await.unwrap());

        tokio::time::advance(Duration::from_secs(4)).await;
        assert_eq!(
            store.ttl("c").await.unwrap(),
            KeyTtl::Expires(Duration::from_secs(6))
        );

        tokio::time::advance(Duration::from_secs(6)).await;
        assert_eq!(store.ttl("c").await.unwrap(), KeyTtl::Missing);
        assert_eq!(store.increment("c").await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_expire_missing_key() {
        let store = InMemoryStoreProvider::new();
        assert!(!store.expire("absent", Duration::from_secs(1)).await.unwrap());
        assert_eq!(store.ttl("absent").await.unwrap(), KeyTtl::Missing);
    }

    #[tokio::test]
    async fn test_increment_non_integer_value_fails() {
        let store = InMemoryStoreProvider::new();
        store
            .set_with_ttl("k", "text", Duration::from_secs(60))
            .await
            .unwrap();
        assert!(matches!(
            store.increment("k").await,
            Err(Error::Infrastructure { .. })
        ));
    }
}

mod key_value {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_set_get_expire() {
        let store = InMemoryStoreProvider::new();
        store
            .set_with_ttl("k", "v", Duration::from_secs(5))
            .await
            .unwrap();
        assert_eq!(store.get("k").await.unwrap().as_deref(), Some("v"));

        tokio::time::advance(Duration::from_secs(5)).await;
        assert_eq!(store.get("k").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_delete_reports_existence() {
        let store = InMemoryStoreProvider::new();
        store
            .set_with_ttl("k", "v", Duration::from_secs(5))
            .await
            .unwrap();
        assert!(store.delete("k").await.unwrap());
        assert!(!store.delete("k").await.unwrap());
    }

    #[tokio::test]
    async fn test_unavailable_store_fails_every_call() {
        let store = InMemoryStoreProvider::new();
        store.set_unavailable(true);

        assert!(matches!(
            store.get("k").await,
            Err(Error::StoreUnavailable { .. })
        ));
        assert!(store.increment("c").await.unwrap_err().is_transient());
        assert!(store.ping().await.is_err());

        store.set_unavailable(false);
        assert!(store.ping().await.is_ok());
    }
}

mod pubsub {
    use super::*;

    #[tokio::test]
    async fn test_publish_without_subscribers() {
        let store = InMemoryStoreProvider::new();
        assert_eq!(store.publish("ch", "x").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_messages_arrive_in_publish_order() {
        let store = InMemoryStoreProvider::new();
        let mut messages = store.subscribe("ch").await.unwrap();
        assert_eq!(store.subscriber_count("ch"), 1);

        assert_eq!(store.publish("ch", "one").await.unwrap(), 1);
        store.publish("ch", "two").await.unwrap();

        assert_eq!(messages.next().await.as_deref(), Some("one"));
        assert_eq!(messages.next().await.as_deref(), Some("two"));
    }

    #[tokio::test]
    async fn test_disconnect_ends_stream() {
        let store = InMemoryStoreProvider::new();
        let mut messages = store.subscribe("ch").await.unwrap();
        store.disconnect_subscribers();
        assert_eq!(messages.next().await, None);
    }
}

mod logs {
    use super::*;

    #[tokio::test]
    async fn test_append_assigns_increasing_ids() {
        let store = InMemoryStoreProvider::new();
        let a = store.append("log", &attrs("a")).await.unwrap();
        let b = store.append("log", &attrs("b")).await.unwrap();
        assert!(b > a);
        assert_eq!(store.latest_id("log").await.unwrap(), Some(b));
        assert_eq!(store.latest_id("other").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_read_after_position() {
        let store = InMemoryStoreProvider::new();
        let a = store.append("log", &attrs("a")).await.unwrap();
        store.append("log", &attrs("b")).await.unwrap();

        let all = store
            .read("log", StreamPosition::Start, 10, None)
            .await
            .unwrap();
        assert_eq!(all.len(), 2);

        let rest = store
            .read("log", StreamPosition::After(a), 10, None)
            .await
            .unwrap();
        assert_eq!(rest.len(), 1);
        assert_eq!(rest[0].attribute("resourceId"), Some("b"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_blocking_read_times_out_empty() {
        let store = InMemoryStoreProvider::new();
        let items = store
            .read(
                "log",
                StreamPosition::Latest,
                1,
                Some(Duration::from_millis(500)),
            )
            .await
            .unwrap();
        assert!(items.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_blocking_read_wakes_on_append() {
        let store = InMemoryStoreProvider::new_shared();
        let reader = {
            let store = store.clone();
            tokio::spawn(async move {
                store
                    .read("log", StreamPosition::Latest, 1, Some(Duration::from_secs(5)))
                    .await
            })
        };
        tokio::task::yield_now().await;
        store.append("log", &attrs("late")).await.unwrap();

        let items = reader.await.unwrap().unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].attribute("resourceId"), Some("late"));
    }

    #[tokio::test]
    async fn test_create_group_is_idempotent() {
        let store = InMemoryStoreProvider::new();
        assert!(
            store
                .create_group("log", "g", StreamPosition::Start)
                .await
                .unwrap()
        );
        assert!(
            !store
                .create_group("log", "g", StreamPosition::Start)
                .await
                .unwrap()
        );
    }

    #[tokio::test]
    async fn test_group_read_marks_pending_until_ack() {
        let store = InMemoryStoreProvider::new();
        store
            .create_group("log", "g", StreamPosition::Start)
            .await
            .unwrap();
        let id = store.append("log", &attrs("a")).await.unwrap();

        let items = store
            .read_group("log", "g", "c1", GroupReadMode::New, 10, None)
            .await
            .unwrap();
        assert_eq!(items.len(), 1);

        let pending = store.pending("log", "g", 10).await.unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].id, id);
        assert_eq!(pending[0].consumer, "c1");
        assert_eq!(pending[0].delivery_count, 1);

        // Already delivered, so a second new read gets nothing
        let again = store
            .read_group("log", "g", "c2", GroupReadMode::New, 10, None)
            .await
            .unwrap();
        assert!(again.is_empty());

        assert!(store.acknowledge("log", "g", id).await.unwrap());
        assert!(!store.acknowledge("log", "g", id).await.unwrap());
        assert!(store.pending("log", "g", 10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_group_created_at_latest_skips_history() {
        let store = InMemoryStoreProvider::new();
        store.append("log", &attrs("old")).await.unwrap();
        store
            .create_group("log", "g", StreamPosition::Latest)
            .await
            .unwrap();
        store.append("log", &attrs("new")).await.unwrap();

        let items = store
            .read_group("log", "g", "c", GroupReadMode::New, 10, None)
            .await
            .unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].attribute("resourceId"), Some("new"));
    }

    #[tokio::test]
    async fn test_pending_history_is_per_consumer() {
        let store = InMemoryStoreProvider::new();
        store
            .create_group("log", "g", StreamPosition::Start)
            .await
            .unwrap();
        store.append("log", &attrs("a")).await.unwrap();
        store.append("log", &attrs("b")).await.unwrap();

        store
            .read_group("log", "g", "c1", GroupReadMode::New, 1, None)
            .await
            .unwrap();
        store
            .read_group("log", "g", "c2", GroupReadMode::New, 1, None)
            .await
            .unwrap();

        let own = store
            .read_group("log", "g", "c1", GroupReadMode::own_pending(), 10, None)
            .await
            .unwrap();
        assert_eq!(own.len(), 1);
        assert_eq!(own[0].attribute("resourceId"), Some("a"));

        let after = store
            .read_group(
                "log",
                "g",
                "c1",
                GroupReadMode::PendingAfter(own[0].id),
                10,
                None,
            )
            .await
            .unwrap();
        assert!(after.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_claim_idle_transfers_ownership() {
        let store = InMemoryStoreProvider::new();
        store
            .create_group("log", "g", StreamPosition::Start)
            .await
            .unwrap();
        let id = store.append("log", &attrs("a")).await.unwrap();
        store
            .read_group("log", "g", "c1", GroupReadMode::New, 1, None)
            .await
            .unwrap();

        let early = store
            .claim_idle("log", "g", "c2", Duration::from_secs(30), 10)
            .await
            .unwrap();
        assert!(early.is_empty());

        tokio::time::advance(Duration::from_secs(30)).await;
        let claimed = store
            .claim_idle("log", "g", "c2", Duration::from_secs(30), 10)
            .await
            .unwrap();
        assert_eq!(claimed.len(), 1);
        assert_eq!(claimed[0].id, id);

        let pending = store.pending("log", "g", 10).await.unwrap();
        assert_eq!(pending[0].consumer, "c2");
        assert_eq!(pending[0].delivery_count, 2);
    }

    #[tokio::test]
    async fn test_read_group_without_group_fails() {
        let store = InMemoryStoreProvider::new();
        let result = store
            .read_group("log", "missing", "c", GroupReadMode::New, 1, None)
            .await;
        assert!(matches!(result, Err(Error::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_capped_append_trims_oldest() {
        let store = InMemoryStoreProvider::new();
        for name in ["a", "b", "c", "d"] {
            store.append_capped("log", &attrs(name), 2).await.unwrap();
        }
        let items = store
            .read("log", StreamPosition::Start, 10, None)
            .await
            .unwrap();
        let names: Vec<_> = items
            .iter()
            .filter_map(|item| item.attribute("resourceId"))
            .collect();
        assert_eq!(names, vec!["c", "d"]);

        let next = store.append("log", &attrs("e")).await.unwrap();
        assert!(next > items[1].id);
    }

    #[tokio::test(start_paused = true)]
    async fn test_claim_drops_pending_for_trimmed_records() {
        let store = InMemoryStoreProvider::new();
        store
            .create_group("log", "g", StreamPosition::Start)
            .await
            .unwrap();
        store.append("log", &attrs("a")).await.unwrap();
        store
            .read_group("log", "g", "c1", GroupReadMode::New, 1, None)
            .await
            .unwrap();
        store.append_capped("log", &attrs("b"), 1).await.unwrap();

        tokio::time::advance(Duration::from_secs(30)).await;
        let claimed = store
            .claim_idle("log", "g", "c2", Duration::from_secs(30), 10)
            .await
            .unwrap();
        assert!(claimed.is_empty());
        assert!(store.pending("log", "g", 10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_dropped_log_loses_its_groups() {
        let store = InMemoryStoreProvider::new();
        store
            .create_group("log", "g", StreamPosition::Start)
            .await
            .unwrap();
        assert!(store.drop_log("log").unwrap());
        assert!(!store.drop_log("log").unwrap());

        let result = store
            .read_group("log", "g", "c", GroupReadMode::New, 1, None)
            .await;
        assert!(matches!(result, Err(Error::NotFound { .. })));
        assert!(store.create_group("log", "g", StreamPosition::Start).await.unwrap());
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_wakes_blocked_group_reader() {
        let store = std::sync::Arc::new(InMemoryStoreProvider::new());
        store
            .create_group("log", "g", StreamPosition::Start)
            .await
            .unwrap();

        let reader = store.clone();
        let blocked = tokio::spawn(async move {
            reader
                .read_group(
                    "log",
                    "g",
                    "c",
                    GroupReadMode::New,
                    1,
                    Some(Duration::from_secs(5)),
                )
                .await
        });
        tokio::task::yield_now().await;
        store.drop_log("log").unwrap();

        let result = blocked.await.unwrap();
        assert!(matches!(result, Err(Error::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_ids_never_reused_after_min() {
        let store = InMemoryStoreProvider::new();
        let id = store.append("log", &attrs("a")).await.unwrap();
        assert!(id > WorkItemId::MIN);
    }
}
