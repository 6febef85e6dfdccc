//! Integration tests for the message log over the in-memory backend.

use std::collections::HashSet;
use std::sync::Arc;

use common::ListStorage;
use common::storage::in_memory::InMemoryStorage;
use message_log::{Config, Error, Message, MessageLog, PageRequest};

fn config(capacity: u64) -> Config {
    Config {
        log_key: "chat".to_string(),
        capacity,
        ..Default::default()
    }
}

fn contents(messages: &[Message]) -> Vec<&str> {
    messages.iter().map(|m| m.content()).collect()
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn should_assign_unique_contiguous_offsets_to_concurrent_pushes() {
    // given
    let storage: Arc<dyn ListStorage> = Arc::new(InMemoryStorage::new());
    let log = Arc::new(MessageLog::new(storage, config(1024)).await.unwrap());

    // when
    let handles: Vec<_> = (0..64)
        .map(|i| {
            let log = log.clone();
            tokio::spawn(async move {
                let message = Message::new("writer", format!("m{}", i)).unwrap();
                log.push_message(&message).await.unwrap()
            })
        })
        .collect();
    let offsets: Vec<u64> = futures::future::join_all(handles)
        .await
        .into_iter()
        .map(|r| r.unwrap())
        .collect();

    // then
    let unique: HashSet<u64> = offsets.iter().copied().collect();
    assert_eq!(unique, (0..64).collect::<HashSet<u64>>());

    let page = log
        .get_messages(&PageRequest::new(0, 100).unwrap())
        .await
        .unwrap();
    assert_eq!(page.len(), 64);
}

#[tokio::test]
async fn should_resume_offsets_after_reopen() {
    // given
    let storage: Arc<dyn ListStorage> = Arc::new(InMemoryStorage::new());
    {
        let log = MessageLog::new(storage.clone(), config(3)).await.unwrap();
        for content in ["A", "B", "C", "D", "E"] {
            log.push_message(&Message::new("s", content).unwrap())
                .await
                .unwrap();
        }
    }

    // when
    let log = MessageLog::new(storage, config(3)).await.unwrap();
    let offset = log
        .push_message(&Message::new("s", "F").unwrap())
        .await
        .unwrap();

    // then
    assert_eq!(offset, 5);
    let page = log
        .get_messages(&PageRequest::new(0, 10).unwrap())
        .await
        .unwrap();
    assert_eq!(contents(&page), vec!["D", "E", "F"]);
    let page = log
        .get_messages(&PageRequest::new(4, 1).unwrap())
        .await
        .unwrap();
    assert_eq!(contents(&page), vec!["E"]);
}

#[tokio::test]
async fn should_keep_logs_with_different_keys_apart() {
    // given
    let storage: Arc<dyn ListStorage> = Arc::new(InMemoryStorage::new());
    let first = MessageLog::new(storage.clone(), config(10)).await.unwrap();
    let second = MessageLog::new(
        storage,
        Config {
            log_key: "other".to_string(),
            ..config(10)
        },
    )
    .await
    .unwrap();

    // when
    first
        .push_message(&Message::new("a", "first").unwrap())
        .await
        .unwrap();
    let offset = second
        .push_message(&Message::new("b", "second").unwrap())
        .await
        .unwrap();

    // then
    assert_eq!(offset, 0);
    let page = second.get_messages(&PageRequest::default()).await.unwrap();
    assert_eq!(contents(&page), vec!["second"]);
}

#[tokio::test]
async fn should_reject_zero_capacity() {
    // given
    let storage: Arc<dyn ListStorage> = Arc::new(InMemoryStorage::new());

    // when
    let result = MessageLog::new(storage, config(0)).await;

    // then
    assert!(matches!(result, Err(Error::InvalidInput(_))));
}
