//! Integration tests for the SQLite storage layer
//!
//! Tests the key-value port against in-memory and on-disk SQLite databases.

use controvlearn::argument::{Claim, Stance};
use controvlearn::config::DatabaseConfig;
use controvlearn::storage::{
    clear_topic, load_json, load_json_or_default, save_json, topic_key, KeyValueStore,
    SqliteStorage, TopicDataKind, PROGRESS_KEY,
};
use tempfile::TempDir;

/// Create an in-memory storage instance for testing
async fn create_test_storage() -> SqliteStorage {
    SqliteStorage::new_in_memory()
        .await
        .expect("Failed to create in-memory storage")
}

#[cfg(test)]
mod kv_tests {
    use super::*;

    #[tokio::test]
    async fn test_get_missing_key() {
        let storage = create_test_storage().await;
        assert_eq!(storage.get("nope").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_set_overwrites() {
        let storage = create_test_storage().await;

        storage.set(PROGRESS_KEY, "{\"completedSteps\":[1]}").await.unwrap();
        storage
            .set(PROGRESS_KEY, "{\"completedSteps\":[1,2]}")
            .await
            .unwrap();

        assert_eq!(
            storage.get(PROGRESS_KEY).await.unwrap().as_deref(),
            Some("{\"completedSteps\":[1,2]}")
        );
    }

    #[tokio::test]
    async fn test_remove_is_idempotent() {
        let storage = create_test_storage().await;

        storage.set("k", "v").await.unwrap();
        storage.remove("k").await.unwrap();
        storage.remove("k").await.unwrap();
        assert_eq!(storage.get("k").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_prefix_listing_is_sorted_and_literal() {
        let storage = create_test_storage().await;

        storage.set("topic_1_dialogue", "{}").await.unwrap();
        storage.set("topic_1_claims", "[]").await.unwrap();
        storage.set("topic_10_claims", "[]").await.unwrap();
        storage.set("topic_1%_claims", "[]").await.unwrap();

        let keys = storage.keys_with_prefix("topic_1_").await.unwrap();
        assert_eq!(keys, vec!["topic_1_claims", "topic_1_dialogue"]);
    }
}

#[cfg(test)]
mod json_tests {
    use super::*;

    #[tokio::test]
    async fn test_claims_round_trip() {
        let storage = create_test_storage().await;
        let key = topic_key("1", TopicDataKind::Claims);
        let claims = vec![Claim {
            id: "C1".to_string(),
            sentence_id: "s1".to_string(),
            text: "福岛核事故已经过去十多年".to_string(),
            stance: Stance::Pro,
        }];

        save_json(&storage, &key, &claims).await.unwrap();
        let loaded: Option<Vec<Claim>> = load_json(&storage, &key).await.unwrap();
        assert_eq!(loaded, Some(claims));
    }

    #[tokio::test]
    async fn test_malformed_value_defaults() {
        let storage = create_test_storage().await;
        let key = topic_key("1", TopicDataKind::Claims);

        storage.set(&key, "[{\"id\":").await.unwrap();
        let loaded: Vec<Claim> = load_json_or_default(&storage, &key).await.unwrap();
        assert!(loaded.is_empty());
    }

    #[tokio::test]
    async fn test_clear_topic_keeps_global_keys() {
        let storage = create_test_storage().await;

        storage.set(PROGRESS_KEY, "{}").await.unwrap();
        for kind in TopicDataKind::ALL {
            storage.set(&topic_key("2", kind), "null").await.unwrap();
        }

        let removed = clear_topic(&storage, "2").await.unwrap();
        assert_eq!(removed.len(), TopicDataKind::ALL.len());
        assert!(storage.get(PROGRESS_KEY).await.unwrap().is_some());
    }
}

#[cfg(test)]
mod file_tests {
    use super::*;

    #[tokio::test]
    async fn test_data_survives_reopen() {
        let dir = TempDir::new().unwrap();
        let config = DatabaseConfig {
            path: dir.path().join("nested").join("learner.db"),
            max_connections: 2,
        };

        {
            let storage = SqliteStorage::new(&config).await.unwrap();
            storage.set("ControvLearn_topics", "[]").await.unwrap();
            storage.pool().close().await;
        }

        let storage = SqliteStorage::new(&config).await.unwrap();
        assert_eq!(
            storage.get("ControvLearn_topics").await.unwrap().as_deref(),
            Some("[]")
        );
    }
}
