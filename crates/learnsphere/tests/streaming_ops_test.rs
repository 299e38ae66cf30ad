use futures::StreamExt;
use learnsphere::{
    Citation, CredentialPool, GeminiError, GeminiSettings, HIGH_DEMAND_APOLOGY, Input, Message,
    MockBehavior, MockOperation, MockTransport, Role, RotatingClient, StudyCompanion, Tool,
    generic_apology,
};

fn companion(keys: &str, mock: MockTransport) -> anyhow::Result<StudyCompanion<MockTransport>> {
    let client = RotatingClient::new(mock, CredentialPool::parse(keys)?);
    Ok(StudyCompanion::new(client, &GeminiSettings::default()))
}

fn mock_of(companion: &StudyCompanion<MockTransport>) -> &MockTransport {
    companion.client().transport()
}

#[tokio::test]
async fn interrupted_answer_ends_with_the_operation_apology() -> anyhow::Result<()> {
    let mock = MockTransport::new(MockBehavior::chunks_then_fail(
        ["Hel", "lo, ", "world"],
        GeminiError::http(500, "backend went away"),
    ));
    let companion = companion("k1", mock)?;

    let items: Vec<String> = companion
        .solve_problem_stream("Say hello")
        .await
        .collect()
        .await;

    assert_eq!(items.len(), 4);
    assert_eq!(&items[..3], ["Hel", "lo, ", "world"]);
    assert_eq!(items[3], generic_apology("solve_problem_stream"));
    Ok(())
}

#[tokio::test]
async fn exhausted_pool_streams_a_single_high_demand_apology() -> anyhow::Result<()> {
    let companion = companion("k1,k2", MockTransport::new(MockBehavior::quota()))?;

    let items: Vec<String> = companion
        .grade_essay_stream("An essay.")
        .await
        .collect()
        .await;

    assert_eq!(items, vec![HIGH_DEMAND_APOLOGY.to_string()]);
    assert_eq!(mock_of(&companion).call_count(), 2);
    Ok(())
}

#[tokio::test]
async fn permanent_failure_streams_the_generic_apology() -> anyhow::Result<()> {
    let mock = MockTransport::new(MockBehavior::http_error(400, "bad request"));
    let companion = companion("k1,k2", mock)?;

    let items: Vec<String> = companion
        .summarize_video_stream("https://youtu.be/abc")
        .await
        .collect()
        .await;

    assert_eq!(items, vec![generic_apology("summarize_video_stream")]);
    assert_eq!(mock_of(&companion).keys_used(), vec!["k1"]);
    Ok(())
}

#[tokio::test]
async fn solve_uses_tutor_instruction_and_search() -> anyhow::Result<()> {
    let companion = companion("k1", MockTransport::new(MockBehavior::text("Rayleigh.")))?;

    let _: String = companion
        .solve_problem_stream("Why is the sky blue?")
        .await
        .collect()
        .await;

    let calls = mock_of(&companion).calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(*calls[0].operation(), MockOperation::Stream);
    let request = calls[0].request().clone().ok_or_else(|| anyhow::anyhow!("no request"))?;
    assert_eq!(request.model.as_deref(), Some("gemini-2.5-flash"));
    assert_eq!(request.tools, vec![Tool::GoogleSearch]);
    assert!(
        request
            .system_instruction
            .as_deref()
            .is_some_and(|s| s.contains("LearnSphere AI"))
    );
    assert_eq!(request.messages, vec![Message::user("Why is the sky blue?")]);
    Ok(())
}

#[tokio::test]
async fn search_answers_end_with_deduplicated_sources() -> anyhow::Result<()> {
    let a = Citation::new(Some("A".to_string()), "https://a.example");
    let b = Citation::new(None, "https://b.example");
    let mock = MockTransport::new(MockBehavior::cited(
        "Answer.",
        vec![a.clone(), b.clone(), a.clone()],
    ));
    let companion = companion("k1", mock)?;

    let text: String = companion
        .solve_problem_stream("question")
        .await
        .collect()
        .await;

    assert_eq!(
        text,
        "Answer.\n\n**Sources:**\n* [A](https://a.example)\n* [https://b.example](https://b.example)"
    );
    Ok(())
}

#[tokio::test]
async fn image_question_sends_image_then_text() -> anyhow::Result<()> {
    let companion = companion("k1", MockTransport::new(MockBehavior::text("x = 3")))?;
    let image = vec![0x89, 0x50, 0x4E, 0x47];

    let answer: String = companion
        .ask_about_image_stream(&image, "image/png", "Solve it")
        .await
        .collect()
        .await;
    assert_eq!(answer, "x = 3");

    let calls = mock_of(&companion).calls();
    let request = calls[0].request().clone().ok_or_else(|| anyhow::anyhow!("no request"))?;
    assert!(request.tools.is_empty());
    assert_eq!(request.messages.len(), 1);
    assert_eq!(
        request.messages[0].content,
        vec![
            Input::InlineData {
                mime: "image/png".to_string(),
                data: image,
            },
            Input::Text("Solve it".to_string()),
        ]
    );
    Ok(())
}

#[tokio::test]
async fn chat_sends_history_before_the_new_turn() -> anyhow::Result<()> {
    let companion = companion("k1", MockTransport::new(MockBehavior::chunks(["Sure", "!"])))?;
    let history = vec![Message::user("Hi"), Message::model("Hello! How can I help?")];

    let reply: String = companion
        .tutor_chat_stream(&history, "Quiz me on cells")
        .await
        .collect()
        .await;
    assert_eq!(reply, "Sure!");

    let calls = mock_of(&companion).calls();
    let request = calls[0].request().clone().ok_or_else(|| anyhow::anyhow!("no request"))?;
    let roles: Vec<Role> = request.messages.iter().map(|m| m.role).collect();
    assert_eq!(roles, vec![Role::User, Role::Model, Role::User]);
    assert_eq!(request.messages[2], Message::user("Quiz me on cells"));
    assert!(
        request
            .system_instruction
            .as_deref()
            .is_some_and(|s| s.contains("friendly and encouraging AI Tutor"))
    );
    Ok(())
}

#[tokio::test]
async fn text_operations_rotate_past_rate_limited_keys() -> anyhow::Result<()> {
    let mock = MockTransport::new(MockBehavior::text("# Cells\n- divide"))
        .with_key("k1", MockBehavior::quota());
    let companion = companion("k1,k2", mock)?;

    let note = companion.optimize_note("um so cells divide").await;

    assert_eq!(note, "# Cells\n- divide");
    assert_eq!(mock_of(&companion).keys_used(), vec!["k1", "k2"]);
    assert_eq!(companion.client().pool().current_index(), 1);
    Ok(())
}

#[tokio::test]
async fn text_operations_return_apologies_instead_of_errors() -> anyhow::Result<()> {
    let companion = companion("k1", MockTransport::new(MockBehavior::quota()))?;
    assert_eq!(companion.study_fact("Biology").await, HIGH_DEMAND_APOLOGY);

    let companion = companion_with_error()?;
    assert_eq!(
        companion.suggestion_reply("Bug", "It crashed").await,
        generic_apology("suggestion_reply")
    );
    assert_eq!(
        companion.audio_recap_script("A note").await,
        generic_apology("audio_recap_script")
    );
    Ok(())
}

fn companion_with_error() -> anyhow::Result<StudyCompanion<MockTransport>> {
    companion(
        "k1",
        MockTransport::new(MockBehavior::http_error(500, "internal")),
    )
}
