// tests/llm_backends.rs
use research_pipeline::llm::{GenerationRequest, HostedBackend, LocalBackend, TextGenerator};
use serde_json::json;
use wiremock::matchers::{bearer_token, body_json, body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn req<'a>(prompt: &'a str) -> GenerationRequest<'a> {
    GenerationRequest {
        system: "Summarize the item in 2-3 sentences.",
        prompt,
        temperature: 0.3,
    }
}

#[tokio::test]
async fn hosted_sends_system_and_user_messages() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(bearer_token("sk-test"))
        .and(body_json(json!({
            "model": "meta-llama/llama-3.1-8b-instruct",
            "messages": [
                {"role": "system", "content": "Summarize the item in 2-3 sentences."},
                {"role": "user", "content": "Title: x"}
            ],
            "temperature": 0.3
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "gen-1",
            "choices": [
                {"index": 0, "message": {"role": "assistant", "content": "  A concise summary.\n"}},
                {"index": 1, "message": {"role": "assistant", "content": "ignored"}}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let backend = HostedBackend::new(
        &format!("{}/v1/", server.uri()),
        "sk-test",
        "meta-llama/llama-3.1-8b-instruct",
    )
    .unwrap();
    let out = backend.generate(&req("Title: x")).await.unwrap();
    assert_eq!(out, "A concise summary.");
}

#[tokio::test]
async fn hosted_without_choices_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"choices": []})))
        .mount(&server)
        .await;

    let backend = HostedBackend::new(&server.uri(), "k", "m").unwrap();
    let err = backend.generate(&req("p")).await.unwrap_err();
    assert!(err.to_string().contains("no choices"));
}

#[tokio::test]
async fn hosted_unauthorized_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let backend = HostedBackend::new(&server.uri(), "bad", "m").unwrap();
    assert!(backend.generate(&req("p")).await.is_err());
}

#[tokio::test]
async fn local_posts_prompt_without_streaming() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .and(body_partial_json(json!({
            "model": "llama3.1:8b",
            "prompt": "Title: x",
            "stream": false,
            "options": {"temperature": 0.3}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "model": "llama3.1:8b",
            "response": " Local answer. ",
            "done": true
        })))
        .expect(1)
        .mount(&server)
        .await;

    let backend = LocalBackend::new("llama3.1:8b")
        .unwrap()
        .with_base_url(server.uri());
    assert_eq!(backend.generate(&req("Title: x")).await.unwrap(), "Local answer.");

    let received = server.received_requests().await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&received[0].body).unwrap();
    assert!(body.get("system").is_none());
}

#[tokio::test]
async fn local_missing_response_field_is_empty_text() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"done": true})))
        .mount(&server)
        .await;

    let backend = LocalBackend::new("m").unwrap().with_base_url(server.uri());
    assert_eq!(backend.generate(&req("p")).await.unwrap(), "");
}

#[tokio::test]
async fn local_non_json_body_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let backend = LocalBackend::new("m").unwrap().with_base_url(server.uri());
    assert!(backend.generate(&req("p")).await.is_err());
}
