use std::str::FromStr;

use anyhow::{anyhow, Context};
use serde_json::json;
use uuid::Uuid;

#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum Error {
    #[error("Unknown error: {0}")]
    Unknown(String),

    #[error("Backend is not configured")]
    NotConfigured,

    #[error("Permission denied")]
    PermissionDenied,

    #[error("No essay with id {0}")]
    EssayNotFound(Uuid),

    #[error("Null byte in string is not allowed {0:?}")]
    NullByteInString(String),

    #[error("Answer is too long ({0} characters)")]
    AnswerTooLong(usize),

    #[error("Content must not be empty")]
    EmptyContent,
}

impl Error {
    pub fn status_code(&self) -> http::StatusCode {
        use http::StatusCode;
        match self {
            Error::Unknown(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Error::NotConfigured => StatusCode::SERVICE_UNAVAILABLE,
            Error::PermissionDenied => StatusCode::FORBIDDEN,
            Error::EssayNotFound(_) => StatusCode::NOT_FOUND,
            Error::NullByteInString(_) => StatusCode::BAD_REQUEST,
            Error::AnswerTooLong(_) => StatusCode::BAD_REQUEST,
            Error::EmptyContent => StatusCode::BAD_REQUEST,
        }
    }

    pub fn contents(&self) -> Vec<u8> {
        serde_json::to_vec(&match self {
            Error::Unknown(msg) => json!({
                "message": msg,
                "type": "unknown",
            }),
            Error::NotConfigured => json!({
                "message": "backend is not configured",
                "type": "not-configured",
            }),
            Error::PermissionDenied => json!({
                "message": "permission denied",
                "type": "permission-denied",
            }),
            Error::EssayNotFound(id) => json!({
                "message": "no such essay",
                "type": "essay-not-found",
                "id": id,
            }),
            Error::NullByteInString(s) => json!({
                "message": "there was a null byte in argument string",
                "type": "null-byte",
                "string": s,
            }),
            Error::AnswerTooLong(len) => json!({
                "message": "answer is too long",
                "type": "answer-too-long",
                "length": len,
            }),
            Error::EmptyContent => json!({
                "message": "content must not be empty",
                "type": "empty-content",
            }),
        })
        .expect("serializing error contents")
    }

    pub fn parse(body: &[u8]) -> anyhow::Result<Error> {
        let data: serde_json::Value =
            serde_json::from_slice(body).context("parsing error contents")?;
        Ok(
            match data
                .get("type")
                .and_then(|t| t.as_str())
                .ok_or_else(|| anyhow!("error type is not a string"))?
            {
                "unknown" => Error::Unknown(String::from(
                    data.get("message")
                        .and_then(|msg| msg.as_str())
                        .unwrap_or(""),
                )),
                "not-configured" => Error::NotConfigured,
                "permission-denied" => Error::PermissionDenied,
                "essay-not-found" => Error::EssayNotFound(
                    data.get("id")
                        .and_then(|id| id.as_str())
                        .and_then(|id| Uuid::from_str(id).ok())
                        .ok_or_else(|| anyhow!("essay-not-found error without a proper id"))?,
                ),
                "null-byte" => Error::NullByteInString(String::from(
                    data.get("string").and_then(|s| s.as_str()).ok_or_else(|| {
                        anyhow!("error is a null-byte-in-string without a string")
                    })?,
                )),
                "answer-too-long" => Error::AnswerTooLong(
                    data.get("length")
                        .and_then(|l| l.as_u64())
                        .ok_or_else(|| anyhow!("answer-too-long error without a length"))?
                        as usize,
                ),
                "empty-content" => Error::EmptyContent,
                _ => return Err(anyhow!("error contents has unknown type")),
            },
        )
    }
}
