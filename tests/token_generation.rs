use alloy::primitives::Address;
use mockito::{Matcher, Server, ServerGuard};
use og_auto_bot::{
    config::{DeployConfig, LlmConfig, LlmProvider, DEFAULT_DEPLOY_GAS_LIMIT, FALLBACK_MODEL},
    network::RetryConfig,
    token_gen::{llm::LlmClient, TokenGenerationService, TokenGenerator},
    types::TokenKind,
};
use serde_json::json;

const OWNER: Address = Address::repeat_byte(0x42);

fn provider(name: &str, base_url: String, model: &str) -> LlmProvider {
    LlmProvider {
        name: name.to_string(),
        api_key: Some("test-key".to_string()),
        base_url,
        model: model.to_string(),
    }
}

fn completion(content: &str) -> String {
    json!({"choices": [{"message": {"role": "assistant", "content": content}}]}).to_string()
}

fn generator(providers: Vec<LlmProvider>) -> TokenGenerator {
    let config = LlmConfig {
        providers,
        timeout_secs: 5,
    };
    let retry = RetryConfig {
        max_attempts: 2,
        initial_delay_ms: 10,
        max_delay_ms: 20,
        exponential_base: 2.0,
    };
    let llm = LlmClient::new(&config).unwrap().with_retry(retry);
    let deploy = DeployConfig {
        solc_path: "solc".to_string(),
        solc_version: "0.8.20".to_string(),
        gas_limit: DEFAULT_DEPLOY_GAS_LIMIT,
        timeout_secs: 5,
    };
    TokenGenerator::from_parts(llm, deploy)
}

async fn reply_with(server: &mut ServerGuard, content: &str, hits: usize) -> mockito::Mock {
    server
        .mock("POST", "/chat/completions")
        .match_header("authorization", "Bearer test-key")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(completion(content))
        .expect(hits)
        .create_async()
        .await
}

const MOON: &str = r#"{"kind": "erc20_mintable", "params": {"name": "Moon", "symbol": "MOON", "decimals": 9, "initial_supply": 5000}}"#;
const STAR: &str = r#"{"kind": "erc20_fixed", "params": {"name": "Star", "symbol": "STAR", "decimals": 6, "initial_supply": "100"}}"#;

#[tokio::test]
async fn first_provider_answers() {
    let mut nous = Server::new_async().await;
    let mut openrouter = Server::new_async().await;
    let first = reply_with(&mut nous, MOON, 1).await;
    let second = reply_with(&mut openrouter, STAR, 0).await;

    let spec = generator(vec![
        provider("nous", nous.url(), "model-a"),
        provider("openrouter", openrouter.url(), "model-b"),
    ])
    .select_token(OWNER)
    .await;

    first.assert_async().await;
    second.assert_async().await;
    assert_eq!(spec.kind, TokenKind::Mintable);
    assert_eq!(spec.params.name, "Moon");
    assert_eq!(spec.params.decimals, 9);
    assert_eq!(spec.params.initial_supply, "5000");
    assert_eq!(spec.params.cap, None);
}

#[tokio::test]
async fn second_provider_covers_a_failing_first() {
    let mut nous = Server::new_async().await;
    let mut openrouter = Server::new_async().await;
    let failing = nous
        .mock("POST", "/chat/completions")
        .with_status(500)
        .with_body("upstream down")
        .expect(1)
        .create_async()
        .await;
    let answering = openrouter
        .mock("POST", "/chat/completions")
        .match_header("x-title", "og-auto")
        .match_header("http-referer", "https://local.dev")
        .with_status(200)
        .with_body(completion(&format!("```json\n{}\n```", STAR)))
        .expect(1)
        .create_async()
        .await;

    let spec = generator(vec![
        provider("nous", nous.url(), "model-a"),
        provider("openrouter", openrouter.url(), "model-b"),
    ])
    .select_token(OWNER)
    .await;

    failing.assert_async().await;
    answering.assert_async().await;
    assert_eq!(spec.kind, TokenKind::FixedSupply);
    assert_eq!(spec.params.symbol, "STAR");
}

#[tokio::test]
async fn provider_without_key_is_skipped() {
    let mut nous = Server::new_async().await;
    let mut openrouter = Server::new_async().await;
    let unused = reply_with(&mut nous, MOON, 0).await;
    let used = reply_with(&mut openrouter, STAR, 1).await;

    let mut keyless = provider("nous", nous.url(), "model-a");
    keyless.api_key = None;
    let spec = generator(vec![keyless, provider("openrouter", openrouter.url(), "model-b")])
        .select_token(OWNER)
        .await;

    unused.assert_async().await;
    used.assert_async().await;
    assert_eq!(spec.params.name, "Star");
}

#[tokio::test]
async fn all_providers_failing_falls_back_to_a_local_token() {
    let mut nous = Server::new_async().await;
    let mut openrouter = Server::new_async().await;
    nous.mock("POST", "/chat/completions").with_status(503).create_async().await;
    openrouter
        .mock("POST", "/chat/completions")
        .with_status(200)
        .with_body(completion("I cannot help with that."))
        .create_async()
        .await;

    let spec = generator(vec![
        provider("nous", nous.url(), "model-a"),
        provider("openrouter", openrouter.url(), "model-b"),
    ])
    .select_token(OWNER)
    .await;

    assert_eq!(spec.kind, TokenKind::CappedBurnable);
    assert!(spec.params.name.starts_with("Farm"));
    assert!(spec.params.symbol.starts_with('F'));
    assert_eq!(spec.params.decimals, 18);
    assert_eq!(spec.params.initial_supply, "1000000000000000000000");
    assert_eq!(spec.params.cap.as_deref(), Some("100000000000000000000000"));
}

#[tokio::test]
async fn unreachable_provider_falls_through() {
    let mut openrouter = Server::new_async().await;
    let used = reply_with(&mut openrouter, MOON, 1).await;

    let spec = generator(vec![
        provider("nous", "http://127.0.0.1:9".to_string(), "model-a"),
        provider("openrouter", openrouter.url(), "model-b"),
    ])
    .select_token(OWNER)
    .await;

    used.assert_async().await;
    assert_eq!(spec.params.symbol, "MOON");
}

#[tokio::test]
async fn invalid_model_retries_with_the_fallback_model() {
    let mut nous = Server::new_async().await;
    let rejected = nous
        .mock("POST", "/chat/completions")
        .match_body(Matcher::PartialJson(json!({"model": "retired-model"})))
        .with_status(400)
        .with_body(r#"{"error": "retired-model is not a valid model ID"}"#)
        .expect(1)
        .create_async()
        .await;
    let accepted = nous
        .mock("POST", "/chat/completions")
        .match_body(Matcher::PartialJson(json!({"model": FALLBACK_MODEL})))
        .with_status(200)
        .with_body(completion(MOON))
        .expect(1)
        .create_async()
        .await;

    let spec = generator(vec![provider("nous", nous.url(), "retired-model")])
        .select_token(OWNER)
        .await;

    rejected.assert_async().await;
    accepted.assert_async().await;
    assert_eq!(spec.params.name, "Moon");
}

#[tokio::test]
async fn request_carries_schema_prompt_and_sampling_settings() {
    let mut nous = Server::new_async().await;
    let mock = nous
        .mock("POST", "/chat/completions")
        .match_body(Matcher::AllOf(vec![
            Matcher::PartialJson(json!({
                "model": "model-a",
                "temperature": 0.6,
                "max_tokens": 256,
            })),
            Matcher::Regex("erc20_capped_burnable".to_string()),
        ]))
        .with_status(200)
        .with_body(completion(MOON))
        .expect(1)
        .create_async()
        .await;

    generator(vec![provider("nous", nous.url(), "model-a")])
        .select_token(OWNER)
        .await;
    mock.assert_async().await;
}
