//! Store tests (local backend in a temp dir, record helpers, PostgREST filters).

use chrono::{TimeZone, Utc};

use super::supabase::in_filter;
use super::{
    ChatRecord, LOCAL_USER_ID, LocalStore, MessageRecord, Sender, Store, StoreError,
    SupabaseStore, group_by_chat, parse_timestamp,
};
use crate::core::auth::{AuthError, Session, SessionUser};
use crate::core::config::SupabaseConfig;

fn temp_store() -> (tempfile::TempDir, LocalStore) {
    let dir = tempfile::tempdir().unwrap();
    let store = LocalStore::new(dir.path().join("chats"));
    (dir, store)
}

fn message_at(chat_id: &str, sender: Sender, content: &str, secs: i64) -> MessageRecord {
    MessageRecord {
        chat_id: chat_id.to_string(),
        user_id: LOCAL_USER_ID.to_string(),
        content: content.to_string(),
        sender,
        created_at: Utc.timestamp_opt(secs, 0).unwrap(),
    }
}

#[test]
fn new_chat_record_id_and_title() {
    let now = Utc.timestamp_millis_opt(1_700_000_000_123).unwrap();
    let chat = ChatRecord::new("u1", 2, now);
    assert_eq!(chat.chat_id, "chat-1700000000123");
    assert_eq!(chat.title, "Chat 3");
    assert_eq!(chat.user_id, "u1");
}

#[test]
fn label_falls_back_to_short_id() {
    let mut chat = ChatRecord::new("u1", 0, Utc::now());
    assert_eq!(chat.label(), "Chat 1");
    chat.chat_id = "chat-1700000000123".into();
    chat.title = String::new();
    assert_eq!(chat.label(), "Chat chat-170...");
}

#[test]
fn sender_serializes_lowercase() {
    let json = serde_json::to_string(&Sender::Bot).unwrap();
    assert_eq!(json, "\"bot\"");
    let parsed: Sender = serde_json::from_str("\"user\"").unwrap();
    assert_eq!(parsed, Sender::User);
}

#[test]
fn local_roundtrip_chats_and_messages() {
    let (_dir, store) = temp_store();
    assert!(store.list_chats(LOCAL_USER_ID).unwrap().is_empty());

    let first = ChatRecord::new(LOCAL_USER_ID, 0, Utc.timestamp_opt(100, 0).unwrap());
    let second = ChatRecord::new(LOCAL_USER_ID, 1, Utc.timestamp_opt(200, 0).unwrap());
    store.insert_chat(&first).unwrap();
    store.insert_chat(&second).unwrap();

    store
        .insert_message(&message_at(&first.chat_id, Sender::User, "Merhaba", 101))
        .unwrap();
    store
        .insert_message(&message_at(&second.chat_id, Sender::User, "Selam", 201))
        .unwrap();
    store
        .insert_message(&message_at(&first.chat_id, Sender::Bot, "Merhaba!", 102))
        .unwrap();

    let chats = store.list_chats(LOCAL_USER_ID).unwrap();
    let titles: Vec<&str> = chats.iter().map(|c| c.title.as_str()).collect();
    assert_eq!(titles, ["Chat 1", "Chat 2"]);

    let ids: Vec<String> = chats.iter().map(|c| c.chat_id.clone()).collect();
    let messages = store.list_messages(&ids).unwrap();
    let contents: Vec<&str> = messages.iter().map(|m| m.content.as_str()).collect();
    assert_eq!(contents, ["Merhaba", "Merhaba!", "Selam"]);

    let grouped = group_by_chat(messages);
    assert_eq!(grouped[&first.chat_id].len(), 2);
    assert_eq!(grouped[&first.chat_id][1].sender, Sender::Bot);
    assert_eq!(grouped[&second.chat_id].len(), 1);
}

#[test]
fn local_filters_by_user() {
    let (_dir, store) = temp_store();
    store
        .insert_chat(&ChatRecord::new("someone-else", 0, Utc::now()))
        .unwrap();
    assert!(store.list_chats(LOCAL_USER_ID).unwrap().is_empty());
}

#[test]
fn local_rejects_duplicate_chat() {
    let (_dir, store) = temp_store();
    let chat = ChatRecord::new(LOCAL_USER_ID, 0, Utc::now());
    store.insert_chat(&chat).unwrap();
    assert!(matches!(
        store.insert_chat(&chat),
        Err(StoreError::DuplicateChat(_))
    ));
}

#[test]
fn local_rejects_path_like_ids() {
    let (_dir, store) = temp_store();
    let msg = message_at("../escape", Sender::User, "x", 0);
    assert!(matches!(
        store.insert_message(&msg),
        Err(StoreError::InvalidChatId(_))
    ));
}

#[test]
fn local_messages_of_unknown_chat_are_empty() {
    let (_dir, store) = temp_store();
    let messages = store.list_messages(&["chat-1".to_string()]).unwrap();
    assert!(messages.is_empty());
}

#[test]
fn local_writes_leave_no_temp_files() {
    let (_dir, store) = temp_store();
    let chat = ChatRecord::new(LOCAL_USER_ID, 0, Utc::now());
    store.insert_chat(&chat).unwrap();
    store
        .insert_message(&message_at(&chat.chat_id, Sender::User, "hi", 1))
        .unwrap();
    let names: Vec<String> = std::fs::read_dir(store.dir())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert!(names.iter().all(|n| !n.ends_with(".tmp")), "{names:?}");
    assert!(names.contains(&"chats.json".to_string()));
    assert!(names.contains(&format!("chat_{}.json", chat.chat_id)));
}

#[tokio::test]
async fn store_dispatches_to_local_backend() {
    let (_dir, local) = temp_store();
    let store = Store::Local(local);
    assert_eq!(store.backend_name(), "local");
    assert!(store.list_messages(&[]).await.unwrap().is_empty());

    let chat = ChatRecord::new(LOCAL_USER_ID, 0, Utc::now());
    store.insert_chat(&chat).await.unwrap();
    store
        .insert_message(&MessageRecord::new(
            &chat.chat_id,
            LOCAL_USER_ID,
            Sender::User,
            "hi",
        ))
        .await
        .unwrap();
    let chats = store.list_chats(LOCAL_USER_ID).await.unwrap();
    assert_eq!(chats, vec![chat]);
}

#[test]
fn supabase_rows_decode_with_extra_columns() {
    let body = r#"[{"id": 7, "user_id": "u1", "chat_id": "chat-1", "title": "Chat 1",
                    "created_at": "2024-05-01T10:00:00.123456+00:00"}]"#;
    let chats: Vec<ChatRecord> = serde_json::from_str(body).unwrap();
    assert_eq!(chats[0].chat_id, "chat-1");
    assert_eq!(chats[0].created_at.timestamp(), 1_714_557_600);
}

#[test]
fn in_filter_quotes_ids() {
    let ids = vec!["chat-1".to_string(), "chat-2".to_string()];
    assert_eq!(in_filter(&ids), r#"in.("chat-1","chat-2")"#);
}

#[test]
fn chat_row_with_null_title_uses_short_id_label() {
    let body = r#"[{"id":1,"user_id":"u1","chat_id":"chat-1700000000123","title":null,
                   "created_at":"2024-05-01T10:00:00.123456+00:00"}]"#;
    let chats: Vec<ChatRecord> = serde_json::from_str(body).unwrap();
    assert_eq!(chats[0].title, "");
    assert_eq!(chats[0].label(), "Chat chat-170...");
    assert_eq!(chats[0].created_at.timestamp(), 1_714_557_600);
}

#[test]
fn chat_row_without_offset_is_read_as_utc() {
    let body = r#"[{"user_id":"u1","chat_id":"c1","title":"Chat 1",
                   "created_at":"2024-05-01T10:00:00.5"}]"#;
    let chats: Vec<ChatRecord> = serde_json::from_str(body).unwrap();
    assert_eq!(chats[0].created_at.timestamp(), 1_714_557_600);
}

#[test]
fn message_row_with_null_timestamp_still_loads() {
    let body = r#"[{"chat_id":"c1","user_id":"u1","content":"selam","sender":"bot",
                   "created_at":null}]"#;
    let messages: Vec<MessageRecord> = serde_json::from_str(body).unwrap();
    assert_eq!(messages[0].sender, Sender::Bot);
}

#[test]
fn postgres_timestamp_spellings() {
    let expected = Utc.timestamp_opt(1_714_557_600, 0).unwrap();
    for raw in [
        "2024-05-01T10:00:00Z",
        "2024-05-01T12:00:00+02:00",
        "2024-05-01 10:00:00+00",
        "2024-05-01 10:00:00",
        "2024-05-01T10:00:00",
    ] {
        assert_eq!(parse_timestamp(raw), Some(expected), "{raw}");
    }
    assert_eq!(parse_timestamp("yesterday"), None);
}

#[test]
fn garbage_timestamp_is_an_error() {
    let body = r#"{"user_id":"u1","chat_id":"c1","created_at":"soon"}"#;
    assert!(serde_json::from_str::<ChatRecord>(body).is_err());
}

/// Nothing listens on this port; any request fails in transport.
fn offline_supabase(expires_in: i64) -> SupabaseStore {
    let config = SupabaseConfig {
        url: "http://127.0.0.1:9".into(),
        anon_key: "anon".into(),
    };
    let session = Session {
        access_token: "token-1".into(),
        refresh_token: "refresh-1".into(),
        expires_at: Utc::now().timestamp() + expires_in,
        user: SessionUser {
            id: "u1".into(),
            email: Some("a@b.c".into()),
        },
    };
    SupabaseStore::new(config, session)
}

#[tokio::test]
async fn supabase_store_uses_valid_token_as_is() {
    let store = offline_supabase(3600);
    assert_eq!(store.access_token().await.unwrap(), "token-1");
}

#[tokio::test]
async fn supabase_store_refreshes_expiring_token_before_writing() {
    let store = Store::Supabase(offline_supabase(10));
    let chat = ChatRecord::new("u1", 0, Utc::now());
    let err = store.insert_chat(&chat).await.unwrap_err();
    assert!(
        matches!(err, StoreError::Auth(AuthError::Http(_))),
        "expected the refresh to be attempted first, got {err:?}"
    );
}
