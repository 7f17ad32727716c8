//! Chat completions with primary/fallback failover.

use astrix_core::{ModelInvocation, ModelRoute, PromptPayload};
use serde::Serialize;
use serde_json::Value;
use tracing::{error, info, warn};

use super::GroqClient;
use crate::error::{GroqError, GroqResult};
use crate::http::{HttpBackend, ResponseBody, UpstreamRequest};

/// Wire body for `chat/completions`: the model plus the assembled prompt.
#[derive(Debug, Serialize)]
struct ChatCompletionBody<'a> {
    model: &'a str,
    #[serde(flatten)]
    payload: &'a PromptPayload,
}

impl<B: HttpBackend> GroqClient<B> {
    fn model_for(&self, route: ModelRoute) -> &str {
        match route {
            ModelRoute::Primary => &self.config.primary_model,
            ModelRoute::Fallback => &self.config.fallback_model,
        }
    }

    /// Run `payload` against each route in order until one answers 200.
    pub(crate) async fn complete_chat(
        &self,
        payload: &PromptPayload,
    ) -> GroqResult<ModelInvocation> {
        let mut failures = Vec::new();

        for route in ModelRoute::ORDER {
            let model = self.model_for(route);
            match self.complete_with(model, payload).await {
                Ok(raw) => {
                    info!(target: "astrix.chat", model, ?route, "Chat completion succeeded");
                    return Ok(ModelInvocation::new(raw, route, model));
                }
                Err(err) if route.is_fallback() => {
                    error!(target: "astrix.chat", model, error = %err, "Fallback model failed");
                    failures.push(err);
                }
                Err(err) => {
                    warn!(target: "astrix.chat", model, error = %err, "Primary model failed, trying fallback");
                    failures.push(err);
                }
            }
        }

        Err(GroqError::ModelsExhausted { failures })
    }

    async fn complete_with(&self, model: &str, payload: &PromptPayload) -> GroqResult<Value> {
        let body = serde_json::to_value(ChatCompletionBody { model, payload })?;
        let request = UpstreamRequest::post(self.endpoints.chat.clone()).json(body);
        let response = self.transport.send(&request).await?;

        if response.status != 200 {
            return Err(response.into_status_error());
        }
        match response.body {
            ResponseBody::Json(value) => Ok(value),
            ResponseBody::Text(_) => Err(GroqError::InvalidResponse {
                message: "chat completion body is not JSON".to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GroqClientConfig;
    use crate::http::RequestBody;
    use crate::http::testing::FakeBackend;
    use astrix_core::{ChatRequest, PromptAssembler};
    use serde_json::json;

    fn payload() -> PromptPayload {
        PromptAssembler::new(20).build(
            &ChatRequest::new("hello"),
            "2026-10-16".parse().unwrap(),
        )
    }

    fn client(fake: &FakeBackend) -> GroqClient<FakeBackend> {
        let config = GroqClientConfig::new()
            .with_primary_model("primary-m")
            .with_fallback_model("fallback-m");
        GroqClient::with_backend(config, fake.clone()).unwrap()
    }

    fn json_body(request: &UpstreamRequest) -> &Value {
        match &request.body {
            RequestBody::Json(value) => value,
            other => panic!("expected JSON body, got {other:?}"),
        }
    }

    fn completion() -> Value {
        json!({"choices": [{"message": {"content": "{\"messages\": [\"hi\"]}"}}]})
    }

    #[tokio::test(start_paused = true)]
    async fn test_primary_success_uses_one_call() {
        let fake = FakeBackend::new().push_json(200, completion());
        let invocation = client(&fake).complete_chat(&payload()).await.unwrap();

        assert_eq!(invocation.route(), ModelRoute::Primary);
        assert_eq!(invocation.model(), "primary-m");
        assert!(!invocation.fallback_used());
        assert_eq!(invocation.raw(), &completion());

        let requests = fake.requests();
        assert_eq!(requests.len(), 1);
        assert!(requests[0].url.as_str().ends_with("/chat/completions"));

        let body = json_body(&requests[0]);
        assert_eq!(body["model"], "primary-m");
        assert_eq!(body["temperature"], 0.7);
        assert_eq!(body["max_completion_tokens"], 1024);
        assert_eq!(body["top_p"], 0.95);
        assert_eq!(body["stream"], false);
        assert_eq!(body["response_format"], json!({"type": "json_object"}));
        assert_eq!(body["messages"][0]["role"], "system");
    }

    #[tokio::test(start_paused = true)]
    async fn test_primary_failure_falls_back_with_same_payload() {
        let fake = FakeBackend::new()
            .push_json(500, json!({"error": {"message": "boom"}}))
            .push_json(200, completion());
        let invocation = client(&fake).complete_chat(&payload()).await.unwrap();

        assert_eq!(invocation.route(), ModelRoute::Fallback);
        assert_eq!(invocation.model(), "fallback-m");
        assert!(invocation.fallback_used());

        let requests = fake.requests();
        assert_eq!(requests.len(), 2);
        let mut primary = json_body(&requests[0]).clone();
        let mut fallback = json_body(&requests[1]).clone();
        assert_eq!(primary["model"], "primary-m");
        assert_eq!(fallback["model"], "fallback-m");
        primary.as_object_mut().unwrap().remove("model");
        fallback.as_object_mut().unwrap().remove("model");
        assert_eq!(primary, fallback);
    }

    #[tokio::test(start_paused = true)]
    async fn test_non_200_success_status_triggers_fallback() {
        let fake = FakeBackend::new()
            .push_json(202, json!({}))
            .push_json(200, completion());
        let invocation = client(&fake).complete_chat(&payload()).await.unwrap();

        assert!(invocation.fallback_used());
    }

    #[tokio::test(start_paused = true)]
    async fn test_network_failure_on_primary_falls_back() {
        let fake = FakeBackend::new()
            .push_network_error("reset")
            .push_network_error("reset")
            .push_network_error("reset")
            .push_json(200, completion());
        let invocation = client(&fake).complete_chat(&payload()).await.unwrap();

        assert!(invocation.fallback_used());
        assert_eq!(fake.call_count(), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn test_both_routes_failing_is_exhausted() {
        let fake = FakeBackend::new()
            .push_json(500, json!({"error": "primary down"}))
            .push_status(400);
        let result = client(&fake).complete_chat(&payload()).await;

        match result {
            Err(GroqError::ModelsExhausted { failures }) => {
                assert_eq!(failures.len(), 2);
                assert!(matches!(
                    failures[0],
                    GroqError::UnexpectedStatus { status: 500, .. }
                ));
                assert!(matches!(
                    failures[1],
                    GroqError::UnexpectedStatus { status: 400, .. }
                ));
            }
            other => panic!("expected ModelsExhausted, got {other:?}"),
        }
        assert_eq!(fake.call_count(), 2);
    }
}
