//! Drives the data-access client against a live server on a loopback port.

use portfolio_site::client::{
    ApiClient, ApiError, AuthContext, ClientConfig, Mutation, Query, Resource,
};
use portfolio_site::create_app;
use portfolio_site::db::models::{
    BlogPost, NewBlogPost, NewPortfolioProject, PortfolioProject, PostStatus, Profile,
    ProjectCategory, SiteSettings,
};
use portfolio_site::db::{seed, MemoryStore};
use portfolio_site::routes::AppState;
use reqwest::StatusCode;
use serde_json::{json, Map, Value};
use std::sync::Arc;

const ADMIN_EMAIL: &str = "admin@example.com";
const ADMIN_PASSWORD: &str = "admin";

/// Start a server over freshly seeded demo data and return its API base URL.
async fn spawn_server() -> String {
    let store = MemoryStore::new();
    seed::seed_demo(&store, ADMIN_EMAIL, ADMIN_PASSWORD, 4)
        .await
        .unwrap();
    let state = AppState::new(Arc::new(store), "integration-secret", 4);
    let app = create_app(state, &[]);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}/api")
}

fn client(base_url: &str) -> ApiClient {
    ApiClient::new(ClientConfig::new(base_url), AuthContext::new()).unwrap()
}

async fn signed_in(base_url: &str) -> ApiClient {
    let client = client(base_url);
    client
        .sign_in_with_password(ADMIN_EMAIL, ADMIN_PASSWORD)
        .await
        .unwrap();
    client
}

fn patch(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => panic!("patch must be an object"),
    }
}

#[tokio::test]
async fn test_sign_in_stores_session_and_unlocks_admin_listing() {
    let base = spawn_server().await;
    let client = client(&base);
    let mut changes = client.subscribe();

    let user = client
        .sign_in_with_password(ADMIN_EMAIL, ADMIN_PASSWORD)
        .await
        .unwrap();
    assert_eq!(user.email, ADMIN_EMAIL);
    assert_eq!(client.session().await, Some(user.clone()));
    assert!(changes.has_changed().unwrap());
    assert_eq!(changes.borrow_and_update().as_ref(), Some(&user));

    let posts = client
        .fetch::<BlogPost>(&Query::new(Resource::BlogPosts).admin())
        .await
        .unwrap();
    assert_eq!(posts.len(), 3);
    assert!(posts.iter().any(|p| p.status == PostStatus::Draft));

    client.sign_out().await;
    assert!(client.user().await.is_none());
    let err = client
        .execute(&Query::new(Resource::BlogPosts).admin())
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(StatusCode::UNAUTHORIZED));
}

#[tokio::test]
async fn test_wrong_password_is_http_401_and_leaves_no_session() {
    let base = spawn_server().await;
    let client = client(&base);
    let err = client
        .sign_in_with_password(ADMIN_EMAIL, "not-the-password")
        .await
        .unwrap_err();
    match err {
        ApiError::Http { status, message } => {
            assert_eq!(status, StatusCode::UNAUTHORIZED);
            assert_eq!(message.as_deref(), Some("Invalid credentials"));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(client.session().await.is_none());
}

#[tokio::test]
async fn test_public_posts_are_published_newest_first() {
    let base = spawn_server().await;
    let posts = client(&base)
        .fetch::<BlogPost>(&Query::new(Resource::BlogPosts))
        .await
        .unwrap();
    assert_eq!(posts.len(), 2);
    assert!(posts.iter().all(|p| p.status == PostStatus::Published));
    assert!(posts[0].created_at >= posts[1].created_at);
}

#[tokio::test]
async fn test_filter_and_order_are_applied_locally() {
    let base = spawn_server().await;
    let client = client(&base);

    let featured = client
        .fetch::<PortfolioProject>(
            &Query::new(Resource::PortfolioProjects)
                .eq("featured", true)
                .order("sort_order", false),
        )
        .await
        .unwrap();
    assert_eq!(featured.len(), 2);
    assert!(featured.iter().all(|p| p.featured));
    assert!(featured[0].sort_order > featured[1].sort_order);

    let classic = client
        .fetch::<PortfolioProject>(
            &Query::new(Resource::PortfolioProjects).eq("category", "classic"),
        )
        .await
        .unwrap();
    assert_eq!(classic.len(), 2);
    assert!(classic
        .iter()
        .all(|p| p.category == ProjectCategory::Classic));

    let first = client
        .single::<PortfolioProject>(&Query::new(Resource::PortfolioProjects).order("title", true))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(first.title, "AI assistant for e-commerce");

    let none = client
        .single::<PortfolioProject>(&Query::new(Resource::PortfolioProjects).eq("title", "nope"))
        .await
        .unwrap();
    assert!(none.is_none());
}

#[tokio::test]
async fn test_site_settings_single_row_is_public() {
    let base = spawn_server().await;
    let settings = client(&base)
        .single::<SiteSettings>(&Query::new(Resource::SiteSettings))
        .await
        .unwrap()
        .unwrap();
    assert!(!settings.hero_title.is_empty());
}

#[tokio::test]
async fn test_insert_then_fetch_project() {
    let base = spawn_server().await;
    let client = signed_in(&base).await;

    let inserted = client
        .insert::<PortfolioProject>(&NewPortfolioProject {
            title: "Booking engine".to_string(),
            description: "Reservations for a small hotel".to_string(),
            category: ProjectCategory::Classic,
            tags: vec!["rust".to_string()],
            image_url: None,
            live_url: None,
            github_url: None,
            featured: false,
            sort_order: 10,
            is_published: true,
        })
        .await
        .unwrap()
        .unwrap();

    let fetched = client
        .single::<PortfolioProject>(
            &Query::new(Resource::PortfolioProjects).eq("id", inserted.id.to_string()),
        )
        .await
        .unwrap()
        .unwrap();
    assert_eq!(fetched, inserted);
}

#[tokio::test]
async fn test_update_changes_only_patched_fields() {
    let base = spawn_server().await;
    let client = signed_in(&base).await;

    let draft = client
        .single::<BlogPost>(
            &Query::new(Resource::BlogPosts)
                .admin()
                .eq("status", "draft"),
        )
        .await
        .unwrap()
        .unwrap();

    let updated = client
        .update::<BlogPost>(
            &draft.id.to_string(),
            patch(json!({"title": "Headless commerce, revisited"})),
        )
        .await
        .unwrap();
    assert_eq!(updated.title, "Headless commerce, revisited");
    assert_eq!(updated.slug, draft.slug);
    assert_eq!(updated.content, draft.content);
    assert_eq!(updated.status, PostStatus::Draft);

    let published = client
        .update::<BlogPost>(&draft.id.to_string(), patch(json!({"status": "published"})))
        .await
        .unwrap();
    assert!(published.published_at.is_some());
}

#[tokio::test]
async fn test_update_unknown_key_is_404() {
    let base = spawn_server().await;
    let client = signed_in(&base).await;
    let err = client
        .update::<PortfolioProject>(
            &uuid::Uuid::new_v4().to_string(),
            patch(json!({"title": "Ghost"})),
        )
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(StatusCode::NOT_FOUND));
}

#[tokio::test]
async fn test_delete_removes_the_row() {
    let base = spawn_server().await;
    let client = signed_in(&base).await;

    let post = client
        .insert::<BlogPost>(&NewBlogPost {
            title: "Short-lived".to_string(),
            slug: "short-lived".to_string(),
            excerpt: None,
            content: "<p>gone soon</p>".to_string(),
            image_url: None,
            status: PostStatus::Draft,
            tags: vec![],
            meta_title: None,
            meta_description: None,
            published_at: None,
        })
        .await
        .unwrap()
        .unwrap();

    let by_id = Query::new(Resource::BlogPosts)
        .admin()
        .eq("id", post.id.to_string());
    assert_eq!(client.execute(&by_id).await.unwrap().len(), 1);

    client
        .mutate(&Mutation::Delete {
            resource: Resource::BlogPosts,
            key: post.id.to_string(),
        })
        .await
        .unwrap();
    assert!(client.execute(&by_id).await.unwrap().is_empty());

    // Deleting again is not an error.
    client
        .delete(Resource::BlogPosts, &post.id.to_string())
        .await
        .unwrap();
}

#[tokio::test]
async fn test_admin_writes_without_token_are_rejected() {
    let base = spawn_server().await;
    let anonymous = client(&base);

    let err = anonymous
        .delete(Resource::PortfolioProjects, &uuid::Uuid::new_v4().to_string())
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(StatusCode::UNAUTHORIZED));
    assert!(err.is_auth_error());

    let forged = ApiClient::new(
        ClientConfig::new(base.as_str()),
        AuthContext::with_token("header.e30.signature"),
    )
    .unwrap();
    let err = forged
        .execute(&Query::new(Resource::PortfolioProjects).admin())
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(StatusCode::FORBIDDEN));
}

#[tokio::test]
async fn test_malformed_admin_writes_without_token_are_401() {
    let base = spawn_server().await;
    let anonymous = client(&base);

    let incomplete = Mutation::Insert {
        resource: Resource::BlogPosts,
        record: json!({"title": "no slug or content"}),
    };
    match anonymous.mutate(&incomplete).await.unwrap_err() {
        ApiError::Http { status, message } => {
            assert_eq!(status, StatusCode::UNAUTHORIZED);
            assert_eq!(message.as_deref(), Some("Authorization required"));
        }
        other => panic!("unexpected error: {other}"),
    }

    let err = anonymous
        .update::<PortfolioProject>("not-a-uuid", patch(json!({"title": "x"})))
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(StatusCode::UNAUTHORIZED));

    let err = anonymous
        .delete(Resource::BlogPosts, "not-a-uuid")
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(StatusCode::UNAUTHORIZED));
}

#[tokio::test]
async fn test_malformed_body_error_carries_message() {
    let base = spawn_server().await;
    let client = signed_in(&base).await;
    let err = client
        .mutate(&Mutation::Insert {
            resource: Resource::BlogPosts,
            record: json!({"title": "no slug or content"}),
        })
        .await
        .unwrap_err();
    match err {
        ApiError::Http { status, message } => {
            assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
            assert_eq!(message.as_deref(), Some("Invalid request body"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_profile_update_keyed_by_user_id() {
    let base = spawn_server().await;
    let client = signed_in(&base).await;
    let me = client.user().await.unwrap();

    let profile = client
        .single::<Profile>(&Query::new(Resource::Profiles).eq("user_id", me.id.clone()))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(profile.email, ADMIN_EMAIL);

    let updated = client
        .update::<Profile>(&me.id, patch(json!({"full_name": "Portfolio Owner"})))
        .await
        .unwrap();
    assert_eq!(updated.full_name.as_deref(), Some("Portfolio Owner"));
    assert_eq!(updated.email, ADMIN_EMAIL);

    client.update_password("changed-password").await.unwrap();
    let fresh = self::client(&base);
    assert!(fresh
        .sign_in_with_password(ADMIN_EMAIL, "changed-password")
        .await
        .is_ok());
}

#[tokio::test]
async fn test_unknown_resource_name_is_typed_error() {
    let err = "comments".parse::<Resource>().unwrap_err();
    assert!(matches!(err, ApiError::UnknownResource(name) if name == "comments"));
}
