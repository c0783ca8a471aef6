//! Transcript host document
//!
//! A chat transcript read from a JSON Lines file, laid out as terminal lines.
//! It is the primary surface the minimap mirrors: appended records are
//! document mutations, and its scroll geometry is measured in lines.

pub mod layout;
pub mod parser;
pub mod watcher;

use std::time::{Duration, Instant};

use crate::core::traits::HostDocument;
use crate::core::types::{MessageNode, Mutation, NodeId, Role, ScrollBehavior, ScrollMetrics};

use layout::{stack, wrap_text, MessageSpan};
pub use parser::{parse_line, TranscriptRecord};
pub use watcher::TranscriptWatcher;

/// A message as held by the transcript
#[derive(Debug, Clone)]
pub struct TranscriptMessage {
    pub id: NodeId,
    pub key: Option<String>,
    pub role: Role,
    pub author: String,
    pub text: String,
    wrapped: Vec<String>,
}

impl TranscriptMessage {
    /// Text wrapped to the current viewport width
    pub fn wrapped(&self) -> &[String] {
        &self.wrapped
    }
}

/// Kind of a rendered transcript line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Header,
    Body,
    Separator,
}

/// One visible line of the transcript
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptLine<'a> {
    pub id: NodeId,
    pub role: Role,
    pub kind: LineKind,
    pub text: &'a str,
}

#[derive(Debug, Clone, Copy)]
struct ScrollAnimation {
    from: f64,
    to: f64,
    started: Option<Instant>,
}

/// Chat transcript laid out for a terminal viewport
#[derive(Debug, Clone)]
pub struct Transcript {
    location: String,
    loaded: bool,
    messages: Vec<TranscriptMessage>,
    spans: Vec<MessageSpan>,
    next_id: u64,
    wrap_width: usize,
    viewport_width: f64,
    viewport_height: usize,
    offset: f64,
    animation: Option<ScrollAnimation>,
    smooth_duration: Duration,
}

impl Transcript {
    pub fn new(location: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            loaded: false,
            messages: Vec::new(),
            spans: Vec::new(),
            next_id: 1,
            wrap_width: 80,
            viewport_width: 0.0,
            viewport_height: 0,
            offset: 0.0,
            animation: None,
            smooth_duration: Duration::from_millis(180),
        }
    }

    pub fn with_smooth_scroll(mut self, duration: Duration) -> Self {
        self.smooth_duration = duration;
        self
    }

    /// Transcript already holding `records`, marked loaded
    pub fn from_records(
        location: impl Into<String>,
        records: impl IntoIterator<Item = TranscriptRecord>,
    ) -> Self {
        let mut transcript = Self::new(location);
        for record in records {
            transcript.apply(record);
        }
        transcript.mark_loaded();
        transcript
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn mark_loaded(&mut self) {
        self.loaded = true;
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn messages(&self) -> &[TranscriptMessage] {
        &self.messages
    }

    pub fn message(&self, id: NodeId) -> Option<&TranscriptMessage> {
        self.messages.iter().find(|message| message.id == id)
    }

    pub fn user_count(&self) -> usize {
        self.messages.iter().filter(|m| m.role.is_user()).count()
    }

    /// Append a record, or replace the message carrying the same key
    pub fn apply(&mut self, record: TranscriptRecord) -> Mutation {
        let existing = record.key.as_ref().and_then(|key| {
            self.messages
                .iter()
                .position(|message| message.key.as_ref() == Some(key))
        });

        let mutation = match existing {
            Some(position) => {
                let wrap_width = self.wrap_width;
                let message = &mut self.messages[position];
                let role_changed = message.role != record.role;
                message.role = record.role;
                message.author = record.author;
                message.wrapped = wrap_text(&record.text, wrap_width);
                message.text = record.text;
                if role_changed {
                    Mutation::RoleChanged { id: message.id }
                } else {
                    Mutation::TextChanged { id: message.id }
                }
            }
            None => {
                let id = NodeId(self.next_id);
                self.next_id += 1;
                self.messages.push(TranscriptMessage {
                    id,
                    key: record.key,
                    role: record.role,
                    author: record.author,
                    wrapped: wrap_text(&record.text, self.wrap_width),
                    text: record.text,
                });
                Mutation::NodesAdded { messages: 1 }
            }
        };
        self.restack();
        mutation
    }

    /// Drop every message (the file was truncated or replaced)
    pub fn reset(&mut self) -> Option<Mutation> {
        if self.messages.is_empty() {
            return None;
        }
        let removed = self.messages.len();
        self.messages.clear();
        self.animation = None;
        self.restack();
        Some(Mutation::Reset { messages: removed })
    }

    /// Resize the viewport
    ///
    /// `terminal_width` is compared against the minimap threshold; text is
    /// wrapped to `wrap_width`.
    pub fn set_viewport(&mut self, terminal_width: u16, wrap_width: usize, height: usize) {
        self.viewport_width = f64::from(terminal_width);
        self.viewport_height = height;
        let wrap_width = wrap_width.max(1);
        if wrap_width != self.wrap_width {
            self.wrap_width = wrap_width;
            for message in &mut self.messages {
                message.wrapped = wrap_text(&message.text, wrap_width);
            }
        }
        self.restack();
    }

    fn restack(&mut self) {
        self.spans = stack(self.messages.iter().map(|m| m.wrapped.len()));
        self.offset = self.offset.clamp(0.0, self.max_offset());
    }

    pub fn total_lines(&self) -> usize {
        self.spans.last().map(|span| span.bottom()).unwrap_or(0)
    }

    pub fn viewport_height(&self) -> usize {
        self.viewport_height
    }

    pub fn max_offset(&self) -> f64 {
        (self.total_lines() as f64 - self.viewport_height as f64).max(0.0)
    }

    pub fn offset(&self) -> f64 {
        self.offset
    }

    /// First visible line
    pub fn top_line(&self) -> usize {
        self.offset.round() as usize
    }

    fn set_offset(&mut self, offset: f64) -> bool {
        let clamped = if offset.is_finite() {
            offset.clamp(0.0, self.max_offset())
        } else {
            0.0
        };
        let moved = (clamped - self.offset).abs() > f64::EPSILON;
        self.offset = clamped;
        moved
    }

    /// User scroll by a number of lines; returns whether the view moved
    pub fn scroll_by(&mut self, delta: f64) -> bool {
        self.animation = None;
        self.set_offset(self.offset + delta)
    }

    pub fn scroll_to_top(&mut self) -> bool {
        self.animation = None;
        self.set_offset(0.0)
    }

    pub fn scroll_to_bottom(&mut self) -> bool {
        self.animation = None;
        self.set_offset(self.max_offset())
    }

    pub fn is_animating(&self) -> bool {
        self.animation.is_some()
    }

    /// Step a smooth scroll; returns whether the view moved
    pub fn advance_scroll(&mut self, now: Instant) -> bool {
        let Some(mut animation) = self.animation else {
            return false;
        };
        let started = *animation.started.get_or_insert(now);
        let progress = if self.smooth_duration.is_zero() {
            1.0
        } else {
            (now.saturating_duration_since(started).as_secs_f64()
                / self.smooth_duration.as_secs_f64())
            .min(1.0)
        };
        let eased = 1.0 - (1.0 - progress).powi(3);
        let moved = self.set_offset(animation.from + (animation.to - animation.from) * eased);

        self.animation = (progress < 1.0).then_some(animation);
        moved
    }

    fn span_of(&self, id: NodeId) -> Option<MessageSpan> {
        let position = self.messages.iter().position(|m| m.id == id)?;
        self.spans.get(position).copied()
    }

    /// Lines currently inside the viewport
    pub fn visible_lines(&self) -> Vec<TranscriptLine<'_>> {
        let top = self.top_line();
        let bottom = top + self.viewport_height;
        let mut lines = Vec::with_capacity(self.viewport_height);

        for (message, span) in self.messages.iter().zip(&self.spans) {
            if span.bottom() <= top {
                continue;
            }
            if span.top >= bottom {
                break;
            }
            let body = message.wrapped.iter().map(|line| (LineKind::Body, line.as_str()));
            let all = std::iter::once((LineKind::Header, message.author.as_str()))
                .chain(body)
                .chain(std::iter::once((LineKind::Separator, "")));
            for (line_no, (kind, text)) in (span.top..).zip(all) {
                if line_no >= top && line_no < bottom {
                    lines.push(TranscriptLine {
                        id: message.id,
                        role: message.role,
                        kind,
                        text,
                    });
                }
            }
        }
        lines
    }
}

impl HostDocument for Transcript {
    fn is_ready(&self) -> bool {
        self.loaded
    }

    fn message_nodes(&self) -> Vec<MessageNode> {
        self.messages
            .iter()
            .map(|message| MessageNode::new(message.id, message.role, message.text.clone()))
            .collect()
    }

    fn primary_metrics(&self) -> ScrollMetrics {
        ScrollMetrics::new(
            self.offset,
            self.total_lines() as f64,
            self.viewport_height as f64,
        )
    }

    fn scroll_primary_to(&mut self, offset: f64) {
        self.animation = None;
        self.set_offset(offset);
    }

    fn scroll_into_view(&mut self, id: NodeId, behavior: ScrollBehavior) {
        let Some(span) = self.span_of(id) else {
            tracing::debug!("scroll_into_view: {} is not in the transcript", id);
            return;
        };
        let target = (span.center() - self.viewport_height as f64 / 2.0)
            .floor()
            .clamp(0.0, self.max_offset());
        match behavior {
            ScrollBehavior::Instant => self.scroll_primary_to(target),
            ScrollBehavior::Smooth => {
                self.animation = Some(ScrollAnimation {
                    from: self.offset,
                    to: target,
                    started: None,
                });
            }
        }
    }

    fn viewport_width(&self) -> f64 {
        self.viewport_width
    }
}
