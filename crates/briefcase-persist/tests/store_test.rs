use briefcase_persist::{ConversationStore, JsonFileConversationStore, MemoryConversationStore, StoreError};
use briefcase_types::{ChatMessage, Conversation};
use std::path::PathBuf;

fn sample(title: &str) -> Conversation {
    let mut conv = Conversation::new();
    conv.set_title(title);
    conv.append(ChatMessage::user("Do I need a co-founder agreement?"));
    conv.append(ChatMessage::assistant("Yes, before you split equity."));
    conv
}

fn temp_dir() -> PathBuf {
    std::env::temp_dir().join(format!("briefcase-store-{}", uuid::Uuid::new_v4()))
}

async fn exercise_store(store: &dyn ConversationStore) {
    let mut conv = sample("Founders");
    store.save(&conv).await.unwrap();

    let loaded = store.load(&conv.id).await.unwrap().unwrap();
    assert_eq!(loaded, conv);

    conv.append(ChatMessage::user("What about vesting?"));
    store.save(&conv).await.unwrap();
    assert_eq!(store.load(&conv.id).await.unwrap().unwrap().messages().len(), 3);

    let other = sample("Trademarks");
    store.save(&other).await.unwrap();
    assert_eq!(store.list().await.unwrap().len(), 2);

    store.delete(&conv.id).await.unwrap();
    assert!(store.load(&conv.id).await.unwrap().is_none());
    assert!(matches!(
        store.delete(&conv.id).await,
        Err(StoreError::ConversationNotFound(_))
    ));
    assert_eq!(store.list().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_memory_store_contract() {
    exercise_store(&MemoryConversationStore::new()).await;
}

#[tokio::test]
async fn test_json_file_store_contract() {
    let dir = temp_dir();
    let store = JsonFileConversationStore::open(&dir).await.unwrap();
    exercise_store(&store).await;
    tokio::fs::remove_dir_all(&dir).await.unwrap();
}

#[tokio::test]
async fn test_json_file_store_survives_reopen() {
    let dir = temp_dir();
    let conv = sample("Persisted");
    {
        let store = JsonFileConversationStore::open(&dir).await.unwrap();
        store.save(&conv).await.unwrap();
    }

    let reopened = JsonFileConversationStore::open(&dir).await.unwrap();
    assert_eq!(reopened.load(&conv.id).await.unwrap().unwrap().title, "Persisted");
    tokio::fs::remove_dir_all(&dir).await.unwrap();
}

#[tokio::test]
async fn test_json_file_store_rejects_path_ids() {
    let dir = temp_dir();
    let store = JsonFileConversationStore::open(&dir).await.unwrap();

    assert!(matches!(store.load("../etc/passwd").await, Err(StoreError::InvalidId(_))));
    assert!(matches!(store.load("").await, Err(StoreError::InvalidId(_))));
    tokio::fs::remove_dir_all(&dir).await.unwrap();
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_json_file_store_overlapping_saves_of_one_id() {
    let dir = temp_dir();
    let store = JsonFileConversationStore::open(&dir).await.unwrap();
    let conv = sample("Contended");

    let saves: Vec<_> = (0..16)
        .map(|i| {
            let store = store.clone();
            let mut conv = conv.clone();
            conv.set_title(format!("Revision {}", i));
            tokio::spawn(async move { store.save(&conv).await })
        })
        .collect();

    for save in saves {
        save.await.unwrap().unwrap();
    }

    let loaded = store.load(&conv.id).await.unwrap().unwrap();
    assert!(loaded.title.starts_with("Revision "));
    assert_eq!(store.list().await.unwrap().len(), 1);
    tokio::fs::remove_dir_all(&dir).await.unwrap();
}
