//! Action creators against the mock backend
//!
//! Drives `BlogService` with a real `Store` and checks both the store state
//! and what reached the backend.

use std::sync::Arc;
use std::time::Duration;

use libquill::api::mock::MockBlogApi;
use libquill::error::{ApiError, EditorError};
use libquill::notification::NotificationKind;
use libquill::service::{BlogService, PUBLISHED_MESSAGE};
use libquill::session::{MemorySessionStore, SessionStore};
use libquill::store::{Loadable, Store};
use libquill::types::{Paragraph, Post, PostQuery, Topic};
use libquill::{PostEditor, QuillError};

fn topic(url: &str) -> Topic {
    Topic {
        uuid: format!("{}-uuid", url),
        title: url.to_uppercase(),
        description: format!("All about {}", url),
        url: url.to_string(),
    }
}

fn post(id: u64, topic: &str) -> Post {
    Post {
        id,
        uuid: format!("post-{}", id),
        title: format!("Post {}", id),
        description: String::new(),
        text: String::new(),
        likes: 0,
        image_url: String::new(),
        created_at: None,
        user: None,
        topic: Some(topic.to_string()),
        paragraphs: vec![Paragraph::Text(format!("Body {}", id))],
    }
}

struct Harness {
    api: MockBlogApi,
    sessions: MemorySessionStore,
    service: BlogService,
    store: Store,
}

fn harness() -> Harness {
    let api = MockBlogApi::with_topics(vec![topic("rust"), topic("sql")]);
    let sessions = MemorySessionStore::new();
    let service = BlogService::new(Arc::new(api.clone()), Arc::new(sessions.clone()));
    Harness {
        api,
        sessions,
        service,
        store: Store::new(),
    }
}

fn filled_editor() -> PostEditor {
    let mut editor = PostEditor::new();
    editor.set_title("Lifetimes");
    editor.set_description("Without the pain");
    editor.append_paragraph();
    editor.edit_paragraph_content(0, "Start here").unwrap();
    editor
}

#[tokio::test]
async fn test_publish_without_topic_makes_no_request() {
    let mut h = harness();
    let session = {
        h.api.add_account("ferris", "crab");
        h.service.login(&mut h.store, "ferris", "crab").await.unwrap()
    };
    let editor = filled_editor();
    let before = editor.clone();

    let result = h
        .service
        .publish(&mut h.store, Some(&session), &editor)
        .await;

    assert!(matches!(
        result,
        Err(QuillError::Editor(EditorError::MissingTopic))
    ));
    assert_eq!(h.api.call_count("create_post"), 0);
    assert_eq!(editor, before);

    let shown = h.store.state().notification.as_ref().unwrap();
    assert_eq!(shown.notification.kind, NotificationKind::Error);
}

#[tokio::test]
async fn test_successful_publish_notifies_success() {
    let mut h = harness();
    h.api.add_account("ferris", "crab");
    let session = h.service.login(&mut h.store, "ferris", "crab").await.unwrap();
    h.service
        .fetch_posts(&mut h.store, &PostQuery::newest(), false)
        .await
        .unwrap();

    let mut editor = filled_editor();
    editor.select_topic(topic("rust"));

    let created = h
        .service
        .publish(&mut h.store, Some(&session), &editor)
        .await
        .unwrap();

    assert_eq!(h.api.call_count("create_post"), 1);
    assert_eq!(h.api.created_posts()[0].topic, "rust");
    assert_eq!(created.author_name(), "ferris");

    let state = h.store.state();
    assert_eq!(state.post_list()[0].id, created.id);
    let shown = state.notification.as_ref().unwrap();
    assert_eq!(shown.notification.kind, NotificationKind::Success);
    assert_eq!(shown.notification.content, PUBLISHED_MESSAGE);
}

#[tokio::test]
async fn test_failed_publish_notifies_error_not_success() {
    let mut h = harness();
    h.api.add_account("ferris", "crab");
    let session = h.service.login(&mut h.store, "ferris", "crab").await.unwrap();
    h.api
        .fail_with(Some(ApiError::Server("500: database down".to_string())));

    let mut editor = filled_editor();
    editor.select_topic(topic("rust"));

    let result = h
        .service
        .publish(&mut h.store, Some(&session), &editor)
        .await;

    assert!(result.is_err());
    let shown = h.store.state().notification.as_ref().unwrap();
    assert_eq!(shown.notification.kind, NotificationKind::Error);
    assert!(shown.notification.content.contains("database down"));
}

#[tokio::test]
async fn test_publish_requires_session() {
    let mut h = harness();
    let mut editor = filled_editor();
    editor.select_topic(topic("rust"));

    let result = h.service.publish(&mut h.store, None, &editor).await;

    assert!(matches!(result, Err(ref e) if e.exit_code() == 2));
    assert_eq!(h.api.call_count("create_post"), 0);
}

#[tokio::test]
async fn test_login_persists_and_restore_checks_token() {
    let mut h = harness();
    h.api.add_account("ferris", "crab");
    h.service.login(&mut h.store, "ferris", "crab").await.unwrap();
    assert!(h.sessions.load().unwrap().is_some());

    // A fresh front end picks the session up again
    let mut fresh = Store::new();
    let restored = h.service.restore_session(&mut fresh).await.unwrap();

    assert_eq!(restored.unwrap().user.username, "ferris");
    assert!(fresh.state().session_checked);
    assert!(fresh.state().is_logged_in());
    assert_eq!(h.api.call_count("check_session"), 1);
}

#[tokio::test]
async fn test_register_logs_into_the_new_account() {
    let mut h = harness();

    let session = h
        .service
        .register(&mut h.store, " newcomer ", "quill-pw")
        .await
        .unwrap();

    assert_eq!(session.user.username, "newcomer");
    assert_eq!(h.sessions.load().unwrap(), Some(session));
    assert_eq!(h.api.call_count("register"), 1);
    assert_eq!(h.api.call_count("login"), 1);

    let state = h.store.state();
    assert!(state.is_logged_in());
    let shown = state.notification.as_ref().unwrap();
    assert_eq!(shown.notification.kind, NotificationKind::Success);
    assert_eq!(shown.notification.content, "Welcome, newcomer!");
}

#[tokio::test]
async fn test_register_taken_username_reports_error() {
    let mut h = harness();
    h.api.add_account("ferris", "crab");

    let result = h.service.register(&mut h.store, "ferris", "other").await;

    assert!(matches!(
        result,
        Err(QuillError::Api(ApiError::BadRequest(_)))
    ));
    assert_eq!(h.api.call_count("login"), 0);
    assert!(h.sessions.load().unwrap().is_none());
    assert!(!h.store.state().is_logged_in());
    let shown = h.store.state().notification.as_ref().unwrap();
    assert_eq!(shown.notification.kind, NotificationKind::Error);
    assert!(shown.notification.content.starts_with("Registration failed"));
}

#[tokio::test]
async fn test_restore_discards_rejected_token() {
    let mut h = harness();
    let user = h.api.add_account("ferris", "crab");
    h.sessions
        .save(&libquill::Session {
            token: "expired".to_string(),
            user,
        })
        .unwrap();

    let restored = h.service.restore_session(&mut h.store).await.unwrap();

    assert!(restored.is_none());
    assert!(h.sessions.load().unwrap().is_none());
    assert!(h.store.state().session_checked);
    assert!(!h.store.state().is_logged_in());
}

#[tokio::test]
async fn test_restore_keeps_session_when_offline() {
    let mut h = harness();
    h.api.add_account("ferris", "crab");
    h.service.login(&mut h.store, "ferris", "crab").await.unwrap();
    h.api
        .fail_with(Some(ApiError::Network("connection refused".to_string())));

    let mut fresh = Store::new();
    let restored = h.service.restore_session(&mut fresh).await.unwrap();

    assert!(restored.is_some());
    assert!(h.sessions.load().unwrap().is_some());
}

#[tokio::test]
async fn test_logout_clears_everything() {
    let mut h = harness();
    h.api.add_account("ferris", "crab");
    h.service.login(&mut h.store, "ferris", "crab").await.unwrap();

    h.service.logout(&mut h.store).unwrap();

    assert!(!h.store.state().is_logged_in());
    assert!(h.sessions.load().unwrap().is_none());
}

#[tokio::test]
async fn test_load_more_appends_older_page() {
    let mut h = harness();
    for id in 1..=14 {
        h.api.seed_post(post(id, "rust"));
    }

    h.service
        .fetch_posts(&mut h.store, &PostQuery::newest(), false)
        .await
        .unwrap();
    assert!(h.store.state().has_more_posts);

    let cursor = h.store.state().oldest_post_id().unwrap();
    h.service
        .fetch_posts(&mut h.store, &PostQuery::older_than(cursor), true)
        .await
        .unwrap();

    let ids: Vec<u64> = h.store.state().post_list().iter().map(|p| p.id).collect();
    assert_eq!(ids, (1..=14).rev().collect::<Vec<_>>());
    assert!(!h.store.state().has_more_posts);
}

#[tokio::test]
async fn test_topic_posts_and_missing_topic() {
    let mut h = harness();
    h.api.seed_post(post(1, "rust"));
    h.api.seed_post(post(2, "sql"));

    let posts = h
        .service
        .fetch_topic_posts(&mut h.store, "rust")
        .await
        .unwrap();
    assert_eq!(posts.len(), 1);
    assert_eq!(h.store.state().posts_in_topic("rust").unwrap()[0].id, 1);

    let missing = h.service.fetch_topic_posts(&mut h.store, "cobol").await;
    assert!(matches!(
        missing,
        Err(QuillError::Api(ApiError::NotFound(_)))
    ));
    assert!(h
        .store
        .state()
        .topic_posts
        .as_ref()
        .is_some_and(|keyed| keyed.key == "cobol" && keyed.data.error().is_some()));
}

#[tokio::test]
async fn test_like_and_delete_update_store() {
    let mut h = harness();
    h.api.add_account("ferris", "crab");
    let session = h.service.login(&mut h.store, "ferris", "crab").await.unwrap();

    let mut editor = filled_editor();
    editor.select_topic(topic("sql"));
    let created = h
        .service
        .publish(&mut h.store, Some(&session), &editor)
        .await
        .unwrap();
    h.service
        .fetch_post(&mut h.store, &created.route_id())
        .await
        .unwrap();

    h.service
        .like_post(&mut h.store, &session, created.id)
        .await
        .unwrap();
    assert_eq!(h.store.state().post(&created.route_id()).unwrap().likes, 1);

    h.service
        .delete_post(&mut h.store, &session, created.id)
        .await
        .unwrap();
    assert!(h.store.state().current_post.is_none());
    assert_eq!(h.api.post_count(), 0);
}

#[tokio::test]
async fn test_user_posts_only_lists_own() {
    let mut h = harness();
    let other = h.api.add_account("alice", "pw");
    let mut theirs = post(1, "rust");
    theirs.user = Some(other);
    h.api.seed_post(theirs);

    h.api.add_account("ferris", "crab");
    let session = h.service.login(&mut h.store, "ferris", "crab").await.unwrap();
    let mut editor = filled_editor();
    editor.select_topic(topic("rust"));
    h.service
        .publish(&mut h.store, Some(&session), &editor)
        .await
        .unwrap();

    h.service
        .fetch_user_posts(&mut h.store, &session)
        .await
        .unwrap();

    match &h.store.state().user_posts {
        Loadable::Ready(posts) => {
            assert_eq!(posts.len(), 1);
            assert_eq!(posts[0].author_name(), "ferris");
        }
        other => panic!("expected user posts, got {:?}", other),
    }
}

#[tokio::test]
async fn test_slow_backend_still_completes() {
    let api = MockBlogApi::with_topics(vec![topic("rust")]).with_delay(Duration::from_millis(20));
    let service = BlogService::new(Arc::new(api), Arc::new(MemorySessionStore::new()));
    let mut store = Store::new();

    let topics = service.fetch_topics(&mut store).await.unwrap();

    assert_eq!(topics.len(), 1);
    assert_eq!(store.state().topic_list().len(), 1);
}
