#[cfg(test)]
mod client_tests {
    use rusafety::{
        client::{ApiKey, GeminiClient, GenerationClient, GenerationRequest, OpenAiCompatClient, ResponseMode},
        error::GenerationError,
        prompt::PromptTemplate,
    };
    use serde_json::json;
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{body_partial_json, header, method, path},
    };

    fn key() -> ApiKey {
        ApiKey::new("secret-key").unwrap()
    }

    fn request(template: PromptTemplate, mode: ResponseMode) -> GenerationRequest {
        GenerationRequest::new(template, "작업명: 외부 비계 해체 작업", "test-model", mode)
    }

    #[tokio::test]
    async fn test_gemini_json_mode_request() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1beta/models/test-model:generateContent"))
            .and(header("x-goog-api-key", "secret-key"))
            .and(body_partial_json(json!({
                "generationConfig": {"responseMimeType": "application/json"}
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "candidates": [{"content": {"parts": [{"text": "[{\"a\": "}, {"text": "1}]"}]}}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = GeminiClient::new(Some(server.uri().as_str()), 5).unwrap();
        let text = client
            .generate(&key(), &request(PromptTemplate::RiskTable, ResponseMode::Json))
            .await
            .unwrap();
        assert_eq!(text, "[{\"a\": 1}]");
    }

    #[tokio::test]
    async fn test_gemini_error_status_is_surfaced() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(403).set_body_string("API key not valid"))
            .mount(&server)
            .await;

        let client = GeminiClient::new(Some(server.uri().as_str()), 5).unwrap();
        let err = client
            .generate(&key(), &request(PromptTemplate::RiskTable, ResponseMode::Json))
            .await
            .unwrap_err();
        match err {
            GenerationError::Status { code, body } => {
                assert_eq!(code, 403);
                assert!(body.contains("API key not valid"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_gemini_empty_candidates() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"candidates": []})))
            .mount(&server)
            .await;

        let client = GeminiClient::new(Some(server.uri().as_str()), 5).unwrap();
        let err = client
            .generate(&key(), &request(PromptTemplate::RiskTable, ResponseMode::Unconstrained))
            .await
            .unwrap_err();
        assert!(matches!(err, GenerationError::EmptyResponse));
    }

    #[tokio::test]
    async fn test_openai_compat_rate_limit() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(429).insert_header("retry-after", "7"))
            .mount(&server)
            .await;

        let client = OpenAiCompatClient::new(Some(server.uri().as_str()), 5).unwrap();
        let err = client
            .generate(&key(), &request(PromptTemplate::RiskTable, ResponseMode::Json))
            .await
            .unwrap_err();
        assert!(matches!(err, GenerationError::RateLimited { retry_after_secs: 7 }));
    }

    #[tokio::test]
    async fn test_openai_compat_json_object_only_for_recommendations() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(header("authorization", "Bearer secret-key"))
            .and(body_partial_json(json!({"response_format": {"type": "json_object"}})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [{"message": {"content": "{\"protectors\": \"안전모\"}"}}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = OpenAiCompatClient::new(Some(server.uri().as_str()), 5).unwrap();
        let text = client
            .generate(
                &key(),
                &request(PromptTemplate::EquipmentRecommendation, ResponseMode::Json),
            )
            .await
            .unwrap();
        assert_eq!(text, "{\"protectors\": \"안전모\"}");
    }
}
