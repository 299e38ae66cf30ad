use learnsphere_core::{GenerateRequest, ImageRequest};
use learnsphere_error::{GeminiError, GeminiErrorKind, LearnSphereErrorKind};
use learnsphere_models::{MockBehavior, MockTransport};
use learnsphere_rate_limit::{CredentialPool, RotatingClient};
use std::time::Duration;

fn client(keys: &str, mock: MockTransport) -> anyhow::Result<RotatingClient<MockTransport>> {
    Ok(RotatingClient::new(mock, CredentialPool::parse(keys)?))
}

fn prompt() -> GenerateRequest {
    GenerateRequest::from_prompt("What is 6 x 7?")
}

#[tokio::test]
async fn success_does_not_rotate() -> anyhow::Result<()> {
    let client = client("k1,k2,k3", MockTransport::new(MockBehavior::text("42")))?;

    let response = client.generate(&prompt()).await?;

    assert_eq!(response.text, "42");
    assert_eq!(client.pool().current_index(), 0);
    assert_eq!(client.transport().keys_used(), vec!["k1"]);
    Ok(())
}

#[tokio::test]
async fn success_after_earlier_rotation_stays_put() -> anyhow::Result<()> {
    let client = client("k1,k2,k3", MockTransport::new(MockBehavior::text("ok")))?;
    client.pool().rotate_from(0);
    client.pool().rotate_from(1);

    client.generate(&prompt()).await?;

    assert_eq!(client.pool().current_index(), 2);
    assert_eq!(client.transport().keys_used(), vec!["k3"]);
    Ok(())
}

#[tokio::test]
async fn quota_rotates_to_next_key() -> anyhow::Result<()> {
    let mock = MockTransport::new(MockBehavior::text("42")).with_key("k1", MockBehavior::quota());
    let client = client("k1,k2", mock)?;

    let response = client.generate(&prompt()).await?;

    assert_eq!(response.text, "42");
    assert_eq!(client.pool().current_index(), 1);
    assert_eq!(client.transport().keys_used(), vec!["k1", "k2"]);
    Ok(())
}

#[tokio::test]
async fn single_key_exhausts_after_one_attempt() -> anyhow::Result<()> {
    let client = client("k1", MockTransport::new(MockBehavior::quota()))?;

    let err = client.generate(&prompt()).await.unwrap_err();

    assert!(err.is_pool_exhausted());
    assert_eq!(client.transport().call_count(), 1);
    Ok(())
}

#[tokio::test]
async fn every_key_tried_exactly_once_before_exhaustion() -> anyhow::Result<()> {
    let client = client("k1,k2,k3,k4", MockTransport::new(MockBehavior::quota()))?;

    let err = client.generate(&prompt()).await.unwrap_err();

    match err.kind() {
        LearnSphereErrorKind::PoolExhausted(exhausted) => assert_eq!(exhausted.attempts, 4),
        other => panic!("expected pool exhaustion, got {other}"),
    }
    assert_eq!(client.transport().keys_used(), vec!["k1", "k2", "k3", "k4"]);
    Ok(())
}

#[tokio::test]
async fn exhaustion_starts_from_current_cursor() -> anyhow::Result<()> {
    let client = client("k1,k2,k3", MockTransport::new(MockBehavior::quota()))?;
    client.pool().rotate_from(0);

    assert!(client.generate(&prompt()).await.unwrap_err().is_pool_exhausted());
    assert_eq!(client.transport().keys_used(), vec!["k2", "k3", "k1"]);
    Ok(())
}

#[tokio::test]
async fn permanent_error_short_circuits() -> anyhow::Result<()> {
    let mock = MockTransport::new(MockBehavior::text("unused"))
        .with_key("k1", MockBehavior::http_error(400, "API key not valid"));
    let client = client("k1,k2,k3", mock)?;

    let err = client.generate(&prompt()).await.unwrap_err();

    assert!(!err.is_pool_exhausted());
    match err.kind() {
        LearnSphereErrorKind::Gemini(gemini) => {
            assert!(matches!(
                gemini.kind,
                GeminiErrorKind::HttpError { status_code: 400, .. }
            ));
        }
        other => panic!("expected the transport error, got {other}"),
    }
    assert_eq!(client.pool().current_index(), 0);
    assert_eq!(client.transport().call_count(), 1);
    Ok(())
}

#[tokio::test]
async fn permanent_error_after_rotation_stops_rotation() -> anyhow::Result<()> {
    let mock = MockTransport::new(MockBehavior::text("unused"))
        .with_key("k1", MockBehavior::quota())
        .with_key("k2", MockBehavior::http_error(500, "internal"));
    let client = client("k1,k2,k3", mock)?;

    let err = client.generate(&prompt()).await.unwrap_err();

    assert!(!err.is_pool_exhausted());
    assert_eq!(client.transport().keys_used(), vec!["k1", "k2"]);
    assert_eq!(client.pool().current_index(), 1);
    Ok(())
}

#[tokio::test]
async fn embedded_quota_body_rotates() -> anyhow::Result<()> {
    let embedded = GeminiError::new(GeminiErrorKind::ApiRequest(
        r#"{"error":{"code":429,"status":"RESOURCE_EXHAUSTED"}}"#.to_string(),
    ));
    let mock = MockTransport::new(MockBehavior::text("ok"))
        .with_key("k1", MockBehavior::Fail(embedded));
    let client = client("k1,k2", mock)?;

    assert_eq!(client.generate(&prompt()).await?.text, "ok");
    assert_eq!(client.pool().current_index(), 1);
    Ok(())
}

#[tokio::test]
async fn cursor_persists_across_calls() -> anyhow::Result<()> {
    let mock = MockTransport::new(MockBehavior::text("ok")).with_key("k1", MockBehavior::quota());
    let client = client("k1,k2", mock)?;

    client.generate(&prompt()).await?;
    client.generate(&prompt()).await?;

    assert_eq!(client.transport().keys_used(), vec!["k1", "k2", "k2"]);
    Ok(())
}

#[tokio::test]
async fn clones_share_rotation_state() -> anyhow::Result<()> {
    let mock = MockTransport::new(MockBehavior::text("ok")).with_key("k1", MockBehavior::quota());
    let client = client("k1,k2", mock)?;
    let other = client.clone();

    client.generate(&prompt()).await?;

    assert_eq!(other.pool().current_index(), 1);
    Ok(())
}

#[tokio::test]
async fn execute_hands_out_bound_index() -> anyhow::Result<()> {
    let mock = MockTransport::new(MockBehavior::text("ok")).with_key("k1", MockBehavior::quota());
    let client = client("k1,k2", mock)?;

    let index = client
        .execute(|bound| async move {
            bound.generate(&prompt()).await?;
            Ok::<_, GeminiError>(bound.index())
        })
        .await?;

    assert_eq!(index, 1);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn timeout_is_permanent_and_keeps_cursor() -> anyhow::Result<()> {
    let client = client("k1,k2", MockTransport::new(MockBehavior::text("late")))?
        .with_request_timeout(Some(Duration::from_secs(5)));

    let err = client
        .execute(|_bound| async move {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok::<_, GeminiError>(())
        })
        .await
        .unwrap_err();

    match err.kind() {
        LearnSphereErrorKind::Gemini(gemini) => {
            assert_eq!(gemini.kind, GeminiErrorKind::Timeout(5));
        }
        other => panic!("expected a timeout, got {other}"),
    }
    assert_eq!(client.pool().current_index(), 0);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn rotation_delay_is_applied_between_attempts() -> anyhow::Result<()> {
    let client = client("k1,k2,k3", MockTransport::new(MockBehavior::quota()))?
        .with_rotation_delay(Duration::from_millis(500));

    let started = tokio::time::Instant::now();
    assert!(client.generate(&prompt()).await.unwrap_err().is_pool_exhausted());

    assert!(started.elapsed() >= Duration::from_millis(1000));
    assert_eq!(client.transport().call_count(), 3);
    Ok(())
}

#[tokio::test]
async fn images_rotate_like_text() -> anyhow::Result<()> {
    let mock = MockTransport::new(MockBehavior::text("unused")).with_key("k1", MockBehavior::quota());
    let client = client("k1,k2", mock)?;

    let images = client.generate_images(&ImageRequest::new("a volcano")).await?;

    assert_eq!(images.len(), 1);
    assert_eq!(client.transport().keys_used(), vec!["k1", "k2"]);
    Ok(())
}
