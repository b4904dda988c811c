//! Integration tests for the users crate against a real SQLite database

use std::error::Error;
use std::sync::Arc;

use circle_config::DatabaseConfig;
use circle_database::initialize_database;
use circle_users::{
    FollowAction, LoginRequest, MemoryBlobStore, ProfileEdit, RegisterRequest, SessionIssuer,
    UserError, UserServices, UserSummary,
};
use sqlx::SqlitePool;
use tempfile::TempDir;

type TestResult<T = ()> = Result<T, Box<dyn Error>>;

struct TestContext {
    _temp_dir: TempDir,
    pool: SqlitePool,
    services: UserServices,
}

impl TestContext {
    async fn new() -> TestResult<Self> {
        let temp_dir = TempDir::new()?;
        let config = DatabaseConfig {
            url: format!("sqlite://{}", temp_dir.path().join("users.db").display()),
            max_connections: 4,
        };
        let pool = initialize_database(&config).await?;

        let sessions = SessionIssuer::new("integration-test-secret", "circle", "circle-users");
        let services = UserServices::new(
            pool.clone(),
            sessions,
            Some(Arc::new(MemoryBlobStore::new())),
            5,
        );

        Ok(Self {
            _temp_dir: temp_dir,
            pool,
            services,
        })
    }

    async fn register(&self, username: &str) -> TestResult<UserSummary> {
        let summary = self
            .services
            .auth
            .register(registration(username, &format!("{username}@example.com")))
            .await?;
        Ok(summary)
    }

    async fn user_count(&self) -> TestResult<i64> {
        let count = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    async fn edge_count(&self) -> TestResult<i64> {
        let count = sqlx::query_scalar("SELECT COUNT(*) FROM follows")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    async fn assert_symmetric(&self, a: &str, b: &str) -> TestResult {
        let a_profile = self.services.profiles.get_profile(a).await?;
        let b_profile = self.services.profiles.get_profile(b).await?;

        assert_eq!(
            a_profile.following.contains(&b.to_string()),
            b_profile.followers.contains(&a.to_string())
        );
        assert_eq!(
            b_profile.following.contains(&a.to_string()),
            a_profile.followers.contains(&b.to_string())
        );
        Ok(())
    }
}

fn registration(username: &str, email: &str) -> RegisterRequest {
    RegisterRequest {
        username: username.to_string(),
        email: email.to_string(),
        password: "correct horse battery staple".to_string(),
    }
}

fn login(email: &str, password: &str) -> LoginRequest {
    LoginRequest {
        email: email.to_string(),
        password: password.to_string(),
    }
}

#[tokio::test]
async fn register_creates_user_with_empty_relations() -> TestResult {
    let ctx = TestContext::new().await?;

    let alice = ctx.register("alice").await?;

    assert_eq!(alice.username, "alice");
    assert_eq!(alice.email, "alice@example.com");
    assert!(alice.followers.is_empty());
    assert!(alice.following.is_empty());
    assert!(alice.posts.is_empty());
    assert_eq!(ctx.user_count().await?, 1);
    Ok(())
}

#[tokio::test]
async fn duplicate_registration_is_a_conflict() -> TestResult {
    let ctx = TestContext::new().await?;
    ctx.register("alice").await?;

    let result = ctx
        .services
        .auth
        .register(registration("alice again", "  ALICE@example.com "))
        .await;

    assert!(matches!(result, Err(UserError::Conflict(_))));
    assert_eq!(ctx.user_count().await?, 1);
    Ok(())
}

#[tokio::test]
async fn concurrent_registrations_have_exactly_one_winner() -> TestResult {
    let ctx = TestContext::new().await?;

    let (first, second) = tokio::join!(
        ctx.services
            .auth
            .register(registration("first", "race@example.com")),
        ctx.services
            .auth
            .register(registration("second", "race@example.com"))
    );

    let outcomes = [first, second];
    let winners = outcomes.iter().filter(|result| result.is_ok()).count();
    let conflicts = outcomes
        .iter()
        .filter(|result| matches!(result, Err(UserError::Conflict(_))))
        .count();

    assert_eq!(winners, 1);
    assert_eq!(conflicts, 1);
    assert_eq!(ctx.user_count().await?, 1);
    Ok(())
}

#[tokio::test]
async fn register_rejects_blank_fields_and_bad_email() -> TestResult {
    let ctx = TestContext::new().await?;

    let blank = ctx
        .services
        .auth
        .register(RegisterRequest {
            username: "   ".into(),
            email: "a@example.com".into(),
            password: "pw".into(),
        })
        .await;
    assert!(matches!(blank, Err(UserError::Validation(_))));

    let bad_email = ctx
        .services
        .auth
        .register(registration("bob", "not-an-email"))
        .await;
    assert!(matches!(bad_email, Err(UserError::Validation(_))));

    assert_eq!(ctx.user_count().await?, 0);
    Ok(())
}

#[tokio::test]
async fn login_issues_token_for_the_user() -> TestResult {
    let ctx = TestContext::new().await?;
    let alice = ctx.register("alice").await?;

    let outcome = ctx
        .services
        .auth
        .login(login("Alice@Example.com", "correct horse battery staple"))
        .await?;

    assert_eq!(outcome.user.id, alice.id);
    assert_eq!(outcome.expires_in_seconds, 86_400);
    assert_eq!(ctx.services.auth.authenticate(&outcome.token)?, alice.id);

    let json = serde_json::to_string(&outcome.user)?;
    assert!(!json.contains("argon2"));
    assert!(!json.contains("password"));
    Ok(())
}

#[tokio::test]
async fn unknown_email_and_wrong_password_fail_identically() -> TestResult {
    let ctx = TestContext::new().await?;
    ctx.register("alice").await?;

    let unknown = ctx
        .services
        .auth
        .login(login("nobody@example.com", "whatever"))
        .await
        .expect_err("unknown email must fail");
    let wrong = ctx
        .services
        .auth
        .login(login("alice@example.com", "wrong"))
        .await
        .expect_err("wrong password must fail");

    assert!(matches!(unknown, UserError::Authentication));
    assert!(matches!(wrong, UserError::Authentication));
    assert_eq!(unknown.to_string(), wrong.to_string());
    Ok(())
}

#[tokio::test]
async fn password_whitespace_is_part_of_the_credential() -> TestResult {
    let ctx = TestContext::new().await?;
    ctx.services
        .auth
        .register(RegisterRequest {
            username: "padded".into(),
            email: "padded@example.com".into(),
            password: "  secret  ".into(),
        })
        .await?;

    let trimmed = ctx
        .services
        .auth
        .login(login("padded@example.com", "secret"))
        .await;
    assert!(matches!(trimmed, Err(UserError::Authentication)));

    let exact = ctx
        .services
        .auth
        .login(login("padded@example.com", "  secret  "))
        .await?;
    assert!(!exact.token.is_empty());
    Ok(())
}

#[tokio::test]
async fn login_with_missing_fields_is_validation_error() -> TestResult {
    let ctx = TestContext::new().await?;

    let result = ctx.services.auth.login(login("", "pw")).await;
    assert!(matches!(result, Err(UserError::Validation(_))));
    Ok(())
}

#[tokio::test]
async fn follow_twice_restores_prior_state() -> TestResult {
    let ctx = TestContext::new().await?;
    let alice = ctx.register("alice").await?;
    let bob = ctx.register("bob").await?;

    let first = ctx.services.follows.toggle_follow(&alice.id, &bob.id).await?;
    assert_eq!(first.action, FollowAction::Followed);
    assert_eq!(first.message(), "User followed successfully");
    ctx.assert_symmetric(&alice.id, &bob.id).await?;

    let bob_profile = ctx.services.profiles.get_profile(&bob.id).await?;
    assert_eq!(bob_profile.followers, vec![alice.id.clone()]);

    let second = ctx.services.follows.toggle_follow(&alice.id, &bob.id).await?;
    assert_eq!(second.action, FollowAction::Unfollowed);
    ctx.assert_symmetric(&alice.id, &bob.id).await?;

    let alice_profile = ctx.services.profiles.get_profile(&alice.id).await?;
    assert!(alice_profile.following.is_empty());
    assert_eq!(ctx.edge_count().await?, 0);
    Ok(())
}

#[tokio::test]
async fn mutual_follows_stay_symmetric() -> TestResult {
    let ctx = TestContext::new().await?;
    let alice = ctx.register("alice").await?;
    let bob = ctx.register("bob").await?;
    let carol = ctx.register("carol").await?;

    let toggles = [
        (&alice.id, &bob.id),
        (&bob.id, &alice.id),
        (&carol.id, &alice.id),
        (&alice.id, &bob.id),
        (&bob.id, &carol.id),
    ];

    for (actor, target) in toggles {
        ctx.services.follows.toggle_follow(actor, target).await?;
        for (a, b) in [(&alice.id, &bob.id), (&alice.id, &carol.id), (&bob.id, &carol.id)] {
            ctx.assert_symmetric(a, b).await?;
        }
    }

    let alice_profile = ctx.services.profiles.get_profile(&alice.id).await?;
    assert!(alice_profile.following.is_empty());
    assert_eq!(alice_profile.followers, vec![bob.id.clone(), carol.id.clone()]);
    Ok(())
}

#[tokio::test]
async fn self_follow_is_rejected_without_mutation() -> TestResult {
    let ctx = TestContext::new().await?;
    let alice = ctx.register("alice").await?;

    let result = ctx.services.follows.toggle_follow(&alice.id, &alice.id).await;

    assert!(matches!(result, Err(UserError::SelfAction)));
    assert_eq!(ctx.edge_count().await?, 0);
    Ok(())
}

#[tokio::test]
async fn follow_unknown_user_is_not_found() -> TestResult {
    let ctx = TestContext::new().await?;
    let alice = ctx.register("alice").await?;

    let result = ctx.services.follows.toggle_follow(&alice.id, "missing").await;

    assert!(matches!(result, Err(UserError::NotFound(_))));
    assert_eq!(ctx.edge_count().await?, 0);
    Ok(())
}

#[tokio::test]
async fn profile_edit_and_suggestions_flow() -> TestResult {
    let ctx = TestContext::new().await?;
    let alice = ctx.register("alice").await?;
    for name in ["bob", "carol", "dave", "erin", "frank", "grace"] {
        ctx.register(name).await?;
    }

    let edited = ctx
        .services
        .profiles
        .edit_profile(
            &alice.id,
            ProfileEdit {
                bio: Some("rustacean".into()),
                image: Some(circle_users::ImageUpload::new(&b"img"[..], "image/png")),
                ..Default::default()
            },
        )
        .await?;
    assert_eq!(edited.bio.as_deref(), Some("rustacean"));
    assert!(edited
        .profile_picture
        .as_deref()
        .is_some_and(|uri| uri.starts_with("memory://")));

    let suggested = ctx.services.suggestions.suggested_users(&alice.id).await?;
    assert_eq!(suggested.len(), 5);
    assert!(suggested.iter().all(|user| user.id != alice.id));
    assert_eq!(suggested[0].username, "bob");
    Ok(())
}
