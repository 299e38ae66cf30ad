use futures::StreamExt;
use learnsphere_core::{Citation, GenerateRequest, decorate_with_citations};
use learnsphere_error::{GeminiError, StatusCarrier};
use learnsphere_interface::StreamChunk;
use learnsphere_models::{MockBehavior, MockTransport};
use learnsphere_rate_limit::{CredentialPool, RotatingClient, STREAM_INTERRUPTED_MESSAGE};

fn client(keys: &str, mock: MockTransport) -> anyhow::Result<RotatingClient<MockTransport>> {
    Ok(RotatingClient::new(mock, CredentialPool::parse(keys)?))
}

fn prompt() -> GenerateRequest {
    GenerateRequest::from_prompt("Say hello")
}

fn cite(title: Option<&str>, uri: &str) -> Citation {
    Citation::new(title.map(str::to_string), uri)
}

#[tokio::test]
async fn mid_stream_failure_ends_with_one_apology() -> anyhow::Result<()> {
    let mock = MockTransport::new(MockBehavior::chunks_then_fail(
        ["Hel", "lo, ", "world"],
        GeminiError::http(500, "backend went away"),
    ));
    let client = client("k1", mock)?;

    let items: Vec<String> = client.generate_stream(&prompt()).await?.collect().await;

    assert_eq!(items.len(), 4);
    assert_eq!(&items[..3], ["Hel", "lo, ", "world"]);
    assert_eq!(items[3], STREAM_INTERRUPTED_MESSAGE);
    Ok(())
}

#[tokio::test]
async fn mid_stream_quota_error_is_not_retried() -> anyhow::Result<()> {
    let mock = MockTransport::new(MockBehavior::text("unused")).with_key(
        "k1",
        MockBehavior::chunks_then_fail(["partial"], GeminiError::http(429, "quota")),
    );
    let client = client("k1,k2", mock)?;

    let items: Vec<String> = client.generate_stream(&prompt()).await?.collect().await;

    assert_eq!(items.len(), 2);
    assert_eq!(client.transport().keys_used(), vec!["k1"]);
    assert_eq!(client.pool().current_index(), 0);
    Ok(())
}

#[tokio::test]
async fn custom_interruption_fragment() -> anyhow::Result<()> {
    let mock = MockTransport::new(MockBehavior::chunks_then_fail(
        ["a"],
        GeminiError::http(503, "unavailable"),
    ));
    let client = client("k1", mock)?;

    let items: Vec<String> = client
        .generate_stream_with(&prompt(), |e| format!("[failed: {}]", e.status_code().unwrap_or(0)))
        .await?
        .collect()
        .await;

    assert_eq!(items, vec!["a".to_string(), "[failed: 503]".to_string()]);
    Ok(())
}

#[tokio::test]
async fn empty_interruption_fragment_falls_back_to_default() -> anyhow::Result<()> {
    let mock = MockTransport::new(MockBehavior::chunks_then_fail(
        ["a"],
        GeminiError::http(503, "unavailable"),
    ));
    let client = client("k1", mock)?;

    let items: Vec<String> = client
        .generate_stream_with(&prompt(), |_| String::new())
        .await?
        .collect()
        .await;

    assert_eq!(items.last().map(String::as_str), Some(STREAM_INTERRUPTED_MESSAGE));
    Ok(())
}

#[tokio::test]
async fn open_failure_rotates() -> anyhow::Result<()> {
    let mock = MockTransport::new(MockBehavior::chunks(["fine"])).with_key("k1", MockBehavior::quota());
    let client = client("k1,k2", mock)?;

    let items: Vec<String> = client.generate_stream(&prompt()).await?.collect().await;

    assert_eq!(items, vec!["fine".to_string()]);
    assert_eq!(client.pool().current_index(), 1);
    Ok(())
}

#[tokio::test]
async fn quota_as_first_item_rotates() -> anyhow::Result<()> {
    let mock = MockTransport::new(MockBehavior::chunks(["second key"])).with_key(
        "k1",
        MockBehavior::chunks_then_fail(Vec::<String>::new(), GeminiError::http(429, "quota")),
    );
    let client = client("k1,k2", mock)?;

    let items: Vec<String> = client.generate_stream(&prompt()).await?.collect().await;

    assert_eq!(items, vec!["second key".to_string()]);
    assert_eq!(client.transport().keys_used(), vec!["k1", "k2"]);
    Ok(())
}

#[tokio::test]
async fn quota_after_textless_chunk_rotates() -> anyhow::Result<()> {
    let mock = MockTransport::new(MockBehavior::chunks(["from k2"])).with_key(
        "k1",
        MockBehavior::Stream {
            chunks: vec![StreamChunk::default()],
            fail_with: Some(GeminiError::http(429, "quota")),
        },
    );
    let client = client("k1,k2", mock)?;

    let items: Vec<String> = client.generate_stream(&prompt()).await?.collect().await;

    assert_eq!(items, vec!["from k2".to_string()]);
    assert_eq!(client.transport().keys_used(), vec!["k1", "k2"]);
    assert_eq!(client.pool().current_index(), 1);
    Ok(())
}

#[tokio::test]
async fn sources_before_first_text_are_kept() -> anyhow::Result<()> {
    let mock = MockTransport::new(MockBehavior::Stream {
        chunks: vec![
            StreamChunk {
                text: String::new(),
                citations: vec![cite(Some("A"), "https://a.example")],
                finish_reason: None,
            },
            StreamChunk::text("body"),
        ],
        fail_with: None,
    });
    let client = client("k1", mock)?;

    let items: Vec<String> = client.generate_stream(&prompt()).await?.collect().await;

    assert_eq!(
        items,
        vec![
            "body".to_string(),
            "\n\n**Sources:**\n* [A](https://a.example)".to_string(),
        ]
    );
    Ok(())
}

#[tokio::test]
async fn initiation_exhaustion_is_an_error() -> anyhow::Result<()> {
    let client = client("k1,k2", MockTransport::new(MockBehavior::quota()))?;

    let result = client.generate_stream(&prompt()).await;

    assert!(result.err().is_some_and(|e| e.is_pool_exhausted()));
    assert_eq!(client.transport().call_count(), 2);
    Ok(())
}

#[tokio::test]
async fn initiation_permanent_failure_is_an_error() -> anyhow::Result<()> {
    let mock = MockTransport::new(MockBehavior::http_error(400, "bad request"));
    let client = client("k1,k2", mock)?;

    let result = client.generate_stream(&prompt()).await;

    assert!(result.err().is_some_and(|e| !e.is_pool_exhausted()));
    assert_eq!(client.transport().call_count(), 1);
    Ok(())
}

#[tokio::test]
async fn empty_chunks_are_skipped() -> anyhow::Result<()> {
    let mock = MockTransport::new(MockBehavior::chunks(["", "x", "", "y"]));
    let client = client("k1", mock)?;

    let items: Vec<String> = client.generate_stream(&prompt()).await?.collect().await;

    assert_eq!(items, vec!["x".to_string(), "y".to_string()]);
    Ok(())
}

#[tokio::test]
async fn stream_concatenation_matches_single_shot() -> anyhow::Result<()> {
    let sources = vec![
        cite(Some("A"), "https://a.example"),
        cite(Some("B"), "https://b.example"),
        cite(Some("A again"), "https://a.example"),
        cite(None, "https://c.example"),
    ];
    let chunks = vec![
        StreamChunk {
            text: "Penicillin was ".to_string(),
            citations: sources[..2].to_vec(),
            finish_reason: None,
        },
        StreamChunk {
            text: "discovered in 1928.".to_string(),
            citations: sources[2..].to_vec(),
            finish_reason: None,
        },
    ];
    let mock = MockTransport::new(MockBehavior::Stream {
        chunks,
        fail_with: None,
    });
    let client = client("k1", mock)?;

    let whole = client.generate(&prompt()).await?.decorated_text();
    let streamed: String = client
        .generate_stream(&prompt())
        .await?
        .collect::<Vec<_>>()
        .await
        .concat();

    assert_eq!(streamed, whole);
    assert_eq!(
        whole,
        decorate_with_citations("Penicillin was discovered in 1928.", &sources)
    );
    assert_eq!(whole.matches("\n* [").count(), 3);
    Ok(())
}

#[tokio::test]
async fn interrupted_stream_omits_citations() -> anyhow::Result<()> {
    let mock = MockTransport::new(MockBehavior::Stream {
        chunks: vec![StreamChunk {
            text: "partial".to_string(),
            citations: vec![cite(Some("A"), "https://a.example")],
            finish_reason: None,
        }],
        fail_with: Some(GeminiError::http(500, "gone")),
    });
    let client = client("k1", mock)?;

    let streamed = client
        .generate_stream(&prompt())
        .await?
        .collect::<Vec<_>>()
        .await
        .concat();

    assert!(!streamed.contains("**Sources:**"));
    assert!(streamed.ends_with(STREAM_INTERRUPTED_MESSAGE));
    Ok(())
}
