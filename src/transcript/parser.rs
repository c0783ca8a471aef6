//! Transcript record parsing
//!
//! Two JSON Lines shapes are understood:
//!
//! - plain chat exports: `{"role": "user", "content": "..."}` (or `text`)
//! - session logs: `{"type": "user", "uuid": "...", "message": {"role": "user",
//!   "content": "..." | [{"type": "text", "text": "..."}]}}`
//!
//! Records without any readable text (tool calls, tool results, summaries)
//! are skipped rather than reported.

use serde::Deserialize;
use serde_json::Value;

use crate::core::errors::TranscriptError;
use crate::core::types::Role;

/// One message read from a transcript line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptRecord {
    /// Identity supplied by the file, used to replace streamed updates
    pub key: Option<String>,
    pub role: Role,
    /// Role marker as written in the file (`user`, `assistant`, ...)
    pub author: String,
    pub text: String,
}

/// Message content: a bare string or a list of typed parts
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Content {
    Text(String),
    Parts(Vec<Part>),
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Part {
    Text(String),
    Typed {
        #[serde(rename = "type")]
        kind: Option<String>,
        text: Option<String>,
    },
}

impl Content {
    fn into_text(self) -> String {
        match self {
            Content::Text(text) => text,
            Content::Parts(parts) => parts
                .into_iter()
                .filter_map(|part| match part {
                    Part::Text(text) => Some(text),
                    Part::Typed {
                        kind,
                        text: Some(text),
                    } if kind.as_deref().map_or(true, |kind| kind == "text") => Some(text),
                    Part::Typed { .. } => None,
                })
                .filter(|text| !text.trim().is_empty())
                .collect::<Vec<_>>()
                .join("\n"),
        }
    }
}

#[derive(Debug, Deserialize)]
struct PlainRecord {
    role: String,
    #[serde(alias = "text")]
    content: Option<Content>,
    id: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct SessionRecord {
    #[serde(rename = "type")]
    kind: String,
    uuid: Option<String>,
    message: Option<SessionMessage>,
    content: Option<Content>,
    #[serde(rename = "isMeta", default)]
    is_meta: bool,
}

#[derive(Debug, Deserialize)]
struct SessionMessage {
    role: Option<String>,
    content: Option<Content>,
}

/// Parse one line; `Ok(None)` for blank lines and records without text
pub fn parse_line(line: &str, line_no: usize) -> Result<Option<TranscriptRecord>, TranscriptError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    let value: Value = serde_json::from_str(line).map_err(|source| TranscriptError::Parse {
        line: line_no,
        source,
    })?;

    let Some(object) = value.as_object() else {
        return Err(TranscriptError::Unsupported {
            line: line_no,
            reason: "expected a JSON object".to_string(),
        });
    };
    let kind = object
        .get("type")
        .map(|kind| kind.as_str().unwrap_or_default().to_string());
    let has_role = object.contains_key("role");

    let record = match kind.as_deref() {
        Some("user" | "assistant" | "system") => {
            let record: SessionRecord =
                serde_json::from_value(value).map_err(|source| TranscriptError::Parse {
                    line: line_no,
                    source,
                })?;
            from_session(record)
        }
        Some(_) => None,
        None if has_role => {
            let record: PlainRecord =
                serde_json::from_value(value).map_err(|source| TranscriptError::Parse {
                    line: line_no,
                    source,
                })?;
            from_plain(record)
        }
        None => {
            return Err(TranscriptError::Unsupported {
                line: line_no,
                reason: "record has neither `role` nor `type`".to_string(),
            });
        }
    };

    Ok(record.filter(|record| !record.text.trim().is_empty()))
}

fn from_plain(record: PlainRecord) -> Option<TranscriptRecord> {
    let key = record.id.map(|id| match id {
        Value::String(s) => s,
        other => other.to_string(),
    });
    Some(TranscriptRecord {
        key,
        role: Role::from_marker(&record.role),
        author: record.role,
        text: record.content?.into_text(),
    })
}

fn from_session(record: SessionRecord) -> Option<TranscriptRecord> {
    if record.is_meta {
        return None;
    }

    let (author, content) = match record.message {
        Some(message) => (
            message.role.unwrap_or_else(|| record.kind.clone()),
            message.content.or(record.content),
        ),
        None => (record.kind.clone(), record.content),
    };

    Some(TranscriptRecord {
        key: record.uuid,
        role: Role::from_marker(&author),
        author,
        text: content?.into_text(),
    })
}
