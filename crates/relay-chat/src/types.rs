//! Caller-facing and upstream-facing shapes of a chat request

use relay_config::UpstreamConfig;
use serde::Serialize;
use serde_json::Value;

use crate::error::ChatError;

pub const INVALID_MESSAGES: &str = "Invalid or missing messages array in request";
pub const INVALID_SYSTEM: &str = "Missing or invalid system prompt in request";
pub const INVALID_TEMPERATURE: &str = "temperature must be a number";
pub const INVALID_MODEL: &str = "model must be a string";

/// Chat request as sent by the caller
///
/// Message objects are opaque and forwarded as-is.
#[derive(Debug, Clone, PartialEq)]
pub struct InboundChatRequest {
    pub messages: Vec<Value>,
    pub system: String,
    pub temperature: Option<f64>,
    pub model: Option<String>,
}

impl InboundChatRequest {
    /// Validate a raw JSON body
    ///
    /// Checks run in order and the first failure wins: `messages`, then
    /// `system`, then the optional `temperature` and `model`.
    pub fn from_value(value: Value) -> Result<Self, ChatError> {
        let Value::Object(mut body) = value else {
            return Err(ChatError::InvalidRequest(INVALID_MESSAGES.to_owned()));
        };

        let messages = match body.remove("messages") {
            Some(Value::Array(messages)) if !messages.is_empty() => messages,
            _ => return Err(ChatError::InvalidRequest(INVALID_MESSAGES.to_owned())),
        };

        let system = match body.remove("system") {
            Some(Value::String(system)) if !system.is_empty() => system,
            _ => return Err(ChatError::InvalidRequest(INVALID_SYSTEM.to_owned())),
        };

        let temperature = match body.remove("temperature") {
            None | Some(Value::Null) => None,
            Some(Value::Number(n)) => n.as_f64(),
            Some(_) => return Err(ChatError::InvalidRequest(INVALID_TEMPERATURE.to_owned())),
        };

        let model = match body.remove("model") {
            None | Some(Value::Null) => None,
            Some(Value::String(model)) => Some(model),
            Some(_) => return Err(ChatError::InvalidRequest(INVALID_MODEL.to_owned())),
        };

        Ok(Self {
            messages,
            system,
            temperature,
            model,
        })
    }
}

/// Messages API request body
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutboundChatRequest {
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f64,
    pub messages: Vec<Value>,
    pub system: String,
}

/// How inbound requests are mapped onto the upstream shape
#[derive(Debug, Clone)]
pub struct OutboundPolicy {
    pub max_tokens: u32,
    pub default_model: String,
    pub default_temperature: f64,
    /// When false, caller-supplied model and temperature are ignored
    pub allow_request_overrides: bool,
}

impl From<&UpstreamConfig> for OutboundPolicy {
    fn from(config: &UpstreamConfig) -> Self {
        Self {
            max_tokens: config.max_tokens,
            default_model: config.default_model.clone(),
            default_temperature: config.default_temperature,
            allow_request_overrides: config.allow_request_overrides,
        }
    }
}

impl OutboundPolicy {
    pub fn build(&self, inbound: InboundChatRequest) -> OutboundChatRequest {
        let (model, temperature) = if self.allow_request_overrides {
            (
                inbound.model.unwrap_or_else(|| self.default_model.clone()),
                inbound.temperature.unwrap_or(self.default_temperature),
            )
        } else {
            (self.default_model.clone(), self.default_temperature)
        };

        OutboundChatRequest {
            model,
            max_tokens: self.max_tokens,
            temperature,
            messages: inbound.messages,
            system: inbound.system,
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn policy(allow_request_overrides: bool) -> OutboundPolicy {
        OutboundPolicy {
            max_tokens: 1000,
            default_model: "claude-2.1".to_owned(),
            default_temperature: 0.7,
            allow_request_overrides,
        }
    }

    fn rejection(value: Value) -> String {
        match InboundChatRequest::from_value(value) {
            Err(ChatError::InvalidRequest(message)) => message,
            other => panic!("expected InvalidRequest, got {other:?}"),
        }
    }

    #[test]
    fn minimal_request() {
        let inbound = InboundChatRequest::from_value(json!({
            "messages": [{"role": "user", "content": "hello"}],
            "system": "be nice"
        }))
        .unwrap();

        assert_eq!(inbound.messages.len(), 1);
        assert_eq!(inbound.system, "be nice");
        assert_eq!(inbound.temperature, None);
        assert_eq!(inbound.model, None);
    }

    #[test]
    fn message_shape_is_not_checked() {
        let inbound = InboundChatRequest::from_value(json!({
            "messages": ["just a string", {"anything": [1, 2, 3]}],
            "system": "s"
        }))
        .unwrap();

        assert_eq!(inbound.messages[0], json!("just a string"));
    }

    #[test]
    fn messages_must_be_non_empty_array() {
        assert_eq!(rejection(json!({"system": "s"})), INVALID_MESSAGES);
        assert_eq!(rejection(json!({"messages": [], "system": "s"})), INVALID_MESSAGES);
        assert_eq!(rejection(json!({"messages": "hi", "system": "s"})), INVALID_MESSAGES);
        assert_eq!(rejection(json!({"messages": null, "system": "s"})), INVALID_MESSAGES);
        assert_eq!(rejection(json!([{"role": "user"}])), INVALID_MESSAGES);
    }

    #[test]
    fn system_must_be_non_empty_string() {
        let messages = json!([{"role": "user", "content": "hi"}]);

        assert_eq!(rejection(json!({"messages": messages})), INVALID_SYSTEM);
        assert_eq!(rejection(json!({"messages": messages, "system": ""})), INVALID_SYSTEM);
        assert_eq!(rejection(json!({"messages": messages, "system": 42})), INVALID_SYSTEM);
        assert_eq!(rejection(json!({"messages": messages, "system": ["a"]})), INVALID_SYSTEM);
    }

    #[test]
    fn messages_checked_before_system() {
        assert_eq!(rejection(json!({})), INVALID_MESSAGES);
    }

    #[test]
    fn optional_fields_are_typed() {
        let messages = json!([{"role": "user", "content": "hi"}]);

        assert_eq!(
            rejection(json!({"messages": messages, "system": "s", "temperature": "hot"})),
            INVALID_TEMPERATURE
        );
        assert_eq!(
            rejection(json!({"messages": messages, "system": "s", "model": 3})),
            INVALID_MODEL
        );

        let inbound = InboundChatRequest::from_value(json!({
            "messages": messages,
            "system": "s",
            "temperature": null,
            "model": null
        }))
        .unwrap();
        assert_eq!(inbound.temperature, None);
        assert_eq!(inbound.model, None);
    }

    #[test]
    fn defaults_fill_missing_fields() {
        let inbound = InboundChatRequest::from_value(json!({
            "messages": [{"role": "user", "content": "hello"}],
            "system": "be nice"
        }))
        .unwrap();

        let outbound = policy(true).build(inbound);

        insta::assert_json_snapshot!(outbound, @r#"
        {
          "model": "claude-2.1",
          "max_tokens": 1000,
          "temperature": 0.7,
          "messages": [
            {
              "content": "hello",
              "role": "user"
            }
          ],
          "system": "be nice"
        }
        "#);
    }

    #[test]
    fn overrides_pass_through_when_allowed() {
        let inbound = InboundChatRequest::from_value(json!({
            "messages": [{"role": "user", "content": "hello"}],
            "system": "be nice",
            "model": "claude-3-opus-20240229",
            "temperature": 0.1
        }))
        .unwrap();

        let outbound = policy(true).build(inbound);
        assert_eq!(outbound.model, "claude-3-opus-20240229");
        assert!((outbound.temperature - 0.1).abs() < f64::EPSILON);
        assert_eq!(outbound.max_tokens, 1000);
    }

    #[test]
    fn overrides_ignored_when_disallowed() {
        let inbound = InboundChatRequest::from_value(json!({
            "messages": [{"role": "user", "content": "hello"}],
            "system": "be nice",
            "model": "claude-3-opus-20240229",
            "temperature": 0.1
        }))
        .unwrap();

        let outbound = policy(false).build(inbound);
        assert_eq!(outbound.model, "claude-2.1");
        assert!((outbound.temperature - 0.7).abs() < f64::EPSILON);
    }
}
