use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Message payload of an [`ApiResult`]: one plain text or a per-field map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ApiMessage {
    Text(String),
    Fields(HashMap<String, String>),
}

impl Default for ApiMessage {
    fn default() -> Self {
        ApiMessage::Text(String::new())
    }
}

impl ApiMessage {
    /// Flattens the message into one displayable string.
    pub fn to_text(&self) -> String {
        match self {
            ApiMessage::Text(text) => text.clone(),
            ApiMessage::Fields(fields) => {
                let mut parts: Vec<&str> = fields.values().map(String::as_str).collect();
                parts.sort_unstable();
                parts.join("; ")
            }
        }
    }
}

/// JSON envelope every backend endpoint replies with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResult<T> {
    pub status: bool,
    #[serde(default)]
    pub msg: ApiMessage,
    #[serde(default)]
    pub data: Option<T>,
    #[serde(default)]
    pub total_row: i64,
}

impl<T> ApiResult<T> {
    /// A successful reply carrying `data`.
    pub fn ok(data: T) -> Self {
        Self {
            status: true,
            msg: ApiMessage::default(),
            data: Some(data),
            total_row: 0,
        }
    }

    /// A failed reply with a message.
    pub fn failure(msg: impl Into<String>) -> Self {
        Self {
            status: false,
            msg: ApiMessage::Text(msg.into()),
            data: None,
            total_row: 0,
        }
    }

    /// `Some` only when the backend flagged success *and* sent a payload.
    pub fn into_data(self) -> Option<T> {
        if self.status { self.data } else { None }
    }
}
