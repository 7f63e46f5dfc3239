//! Listen stream: Server-Sent Events parsing and event decoding.
//!
//! The transport delivers the response body in arbitrary chunks. Feed them
//! to [`SseParser::push`], then decode each completed [`SseEvent`] with
//! [`ListenEvent::decode`]:
//!
//! | SSE `event` | Decoded as |
//! |---|---|
//! | `welcome` | [`ListenEvent::Welcome`] |
//! | `mutation` | [`ListenEvent::Mutation`] with the document after the change |
//! | `disconnect` | [`ListenEvent::Disconnect`]; the server will not send more |
//! | anything else | [`ListenEvent::Other`] |
//!
//! Reconnecting is up to the caller.

use serde::Deserialize;
use serde::de::DeserializeOwned;

/// A parsed SSE event.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct SseEvent {
    pub event: Option<String>,
    pub data: String,
    pub id: Option<String>,
    pub retry: Option<u64>,
}

impl SseEvent {
    fn is_empty(&self) -> bool {
        self.event.is_none() && self.data.is_empty() && self.id.is_none() && self.retry.is_none()
    }
}

/// Incremental SSE parser that accepts chunks and yields events.
#[derive(Debug, Default)]
pub struct SseParser {
    buffer: String,
    current: SseEvent,
}

impl SseParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a text chunk and return any completed events.
    pub fn push(&mut self, chunk: &str) -> Vec<SseEvent> {
        self.buffer.push_str(chunk);
        let mut events = Vec::new();

        while let Some(pos) = self.buffer.find('\n') {
            let line: String = self.buffer.drain(..=pos).collect();
            let line = line.trim_end_matches(['\r', '\n']);
            if let Some(event) = self.process_line(line) {
                events.push(event);
            }
        }

        events
    }

    /// Flush a final event the stream ended without terminating.
    pub fn finish(mut self) -> Option<SseEvent> {
        let rest = std::mem::take(&mut self.buffer);
        let rest = rest.trim_end_matches('\r');
        if !rest.is_empty() {
            self.process_line(rest);
        }
        if self.current.is_empty() {
            None
        } else {
            Some(self.current)
        }
    }

    fn process_line(&mut self, line: &str) -> Option<SseEvent> {
        if line.is_empty() {
            if self.current.is_empty() {
                return None;
            }
            return Some(std::mem::take(&mut self.current));
        }
        if line.starts_with(':') {
            return None;
        }

        let (field, value) = line.split_once(':').unwrap_or((line, ""));
        let value = value.strip_prefix(' ').unwrap_or(value);

        match field {
            "event" => self.current.event = Some(value.to_string()),
            "data" => {
                if !self.current.data.is_empty() {
                    self.current.data.push('\n');
                }
                self.current.data.push_str(value);
            }
            "id" => self.current.id = Some(value.to_string()),
            "retry" => {
                if let Ok(parsed) = value.parse::<u64>() {
                    self.current.retry = Some(parsed);
                }
            }
            _ => {}
        }
        None
    }
}

/// A document change delivered on the listen stream.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListenMutation<T> {
    pub event_id: String,
    pub document_id: String,
    /// `update`, `appear` or `disappear`.
    pub transition: String,
    /// Absent when the document was deleted.
    pub result: Option<T>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ListenEvent<T> {
    Welcome,
    Mutation(ListenMutation<T>),
    Disconnect { reason: Option<String> },
    Other(SseEvent),
}

#[derive(Deserialize)]
struct DisconnectData {
    #[serde(default)]
    reason: Option<String>,
}

impl<T: DeserializeOwned> ListenEvent<T> {
    /// Decode an SSE event. Undecodable mutation payloads yield `None` and
    /// are logged; the stream itself stays usable.
    pub fn decode(event: SseEvent) -> Option<Self> {
        match event.event.as_deref() {
            Some("welcome") => Some(ListenEvent::Welcome),
            Some("mutation") => match serde_json::from_str(&event.data) {
                Ok(mutation) => Some(ListenEvent::Mutation(mutation)),
                Err(e) => {
                    log::warn!("could not decode listen mutation: {e}");
                    None
                }
            },
            Some("disconnect") => {
                let reason = serde_json::from_str::<DisconnectData>(&event.data)
                    .ok()
                    .and_then(|d| d.reason);
                Some(ListenEvent::Disconnect { reason })
            }
            _ => Some(ListenEvent::Other(event)),
        }
    }
}
