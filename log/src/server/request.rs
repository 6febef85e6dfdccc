//! HTTP request types for the message log server.

use serde::Deserialize;

use crate::model::{DEFAULT_PAGE_LIMIT, Message, PageRequest};
use crate::{Error, Result};

/// Query parameters for `GET /messages`.
///
/// Both parameters are optional. Signed integers are accepted so that a
/// negative value produces a validation error instead of a parse failure.
#[derive(Debug, Default, Deserialize)]
pub struct GetMessagesParams {
    /// Absolute offset of the first message to return (default 0).
    pub offset: Option<i64>,
    /// Maximum number of messages to return (default 10).
    pub limit: Option<i64>,
}

impl GetMessagesParams {
    /// Validates the parameters and converts them to a [`PageRequest`].
    pub fn page_request(&self) -> Result<PageRequest> {
        let offset = self.offset.unwrap_or(0);
        let offset = u64::try_from(offset)
            .map_err(|_| Error::InvalidInput(format!("offset must be >= 0, got {}", offset)))?;

        let limit = match self.limit {
            Some(limit) if limit < 1 => {
                return Err(Error::InvalidInput(format!(
                    "limit must be >= 1, got {}",
                    limit
                )));
            }
            Some(limit) => limit as u64,
            None => DEFAULT_PAGE_LIMIT,
        };

        PageRequest::new(offset, limit)
    }
}

/// Parses and validates a `POST /messages` body.
///
/// The body is a JSON object `{"sender": "...", "content": "..."}`.
pub fn parse_push_message(body: &[u8]) -> Result<Message> {
    let message: Message = serde_json::from_slice(body)
        .map_err(|e| Error::InvalidInput(format!("Invalid JSON: {}", e)))?;
    message.validate()?;
    Ok(message)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_default_offset_and_limit() {
        // given
        let params = GetMessagesParams::default();

        // when
        let page = params.page_request().unwrap();

        // then
        assert_eq!(page.offset(), 0);
        assert_eq!(page.limit(), 10);
    }

    #[test]
    fn should_use_provided_offset_and_limit() {
        let params = GetMessagesParams {
            offset: Some(5),
            limit: Some(3),
        };
        let page = params.page_request().unwrap();
        assert_eq!(page.offset(), 5);
        assert_eq!(page.limit(), 3);
    }

    #[test]
    fn should_reject_negative_offset() {
        // given
        let params = GetMessagesParams {
            offset: Some(-1),
            limit: None,
        };

        // when
        let result = params.page_request();

        // then
        assert!(matches!(result, Err(Error::InvalidInput(msg)) if msg.contains("offset")));
    }

    #[test]
    fn should_reject_zero_limit() {
        let params = GetMessagesParams {
            offset: None,
            limit: Some(0),
        };
        assert!(matches!(params.page_request(), Err(Error::InvalidInput(msg)) if msg.contains("limit")));
    }

    #[test]
    fn should_deserialize_params_from_query_json() {
        let params: GetMessagesParams = serde_json::from_str(r#"{"offset": 7}"#).unwrap();
        assert_eq!(params.offset, Some(7));
        assert!(params.limit.is_none());
    }

    #[test]
    fn should_parse_push_message_body() {
        // given
        let body = br#"{"sender": "alice", "content": "hello"}"#;

        // when
        let message = parse_push_message(body).unwrap();

        // then
        assert_eq!(message.sender(), "alice");
        assert_eq!(message.content(), "hello");
    }

    #[test]
    fn should_return_error_for_invalid_json() {
        let result = parse_push_message(b"not valid json");
        assert!(matches!(result, Err(Error::InvalidInput(msg)) if msg.contains("Invalid JSON")));
    }

    #[test]
    fn should_return_error_for_missing_field() {
        let result = parse_push_message(br#"{"sender": "alice"}"#);
        assert!(matches!(result, Err(Error::InvalidInput(msg)) if msg.contains("content")));
    }

    #[test]
    fn should_return_error_for_oversized_sender() {
        // given
        let body = format!(r#"{{"sender": "{}", "content": "x"}}"#, "s".repeat(129));

        // when
        let result = parse_push_message(body.as_bytes());

        // then
        assert!(matches!(result, Err(Error::InvalidInput(msg)) if msg.contains("sender")));
    }
}
