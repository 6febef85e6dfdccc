//! HTTP response types for the message log server.

use serde::Serialize;

use crate::model::{Message, Offset};

/// Response body for `POST /messages`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MessageCreated {
    /// Offset assigned to the appended message.
    pub offset: Offset,
}

/// Response body for `GET /messages`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MessagePage {
    /// Retained messages in ascending offset order.
    pub messages: Vec<Message>,
}
