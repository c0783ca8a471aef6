//! Transcript file watcher
//!
//! Polls a JSON Lines file for appended records. Partial trailing lines are
//! held back until their newline arrives; a file that shrinks is treated as
//! rewritten and re-read from the start.

use std::fs::File;
use std::io::{ErrorKind, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crate::core::errors::TranscriptError;
use crate::core::types::Mutation;

use super::parser::parse_line;
use super::Transcript;

/// Incrementally reads a transcript file into a [`Transcript`]
#[derive(Debug)]
pub struct TranscriptWatcher {
    path: PathBuf,
    interval: Duration,
    next_poll: Option<Instant>,
    position: u64,
    partial: Vec<u8>,
    line_no: usize,
    skipped: usize,
}

impl TranscriptWatcher {
    pub fn new(path: impl Into<PathBuf>, interval: Duration) -> Self {
        Self {
            path: path.into(),
            interval,
            next_poll: None,
            position: 0,
            partial: Vec::new(),
            line_no: 0,
            skipped: 0,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Lines that could not be parsed so far
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    /// When the next poll is due; `None` means immediately
    pub fn next_deadline(&self) -> Option<Instant> {
        self.next_poll
    }

    pub fn is_due(&self, now: Instant) -> bool {
        self.next_poll.map_or(true, |deadline| now >= deadline)
    }

    /// Read new records if the poll interval has elapsed
    pub fn poll(
        &mut self,
        transcript: &mut Transcript,
        now: Instant,
    ) -> Result<Vec<Mutation>, TranscriptError> {
        if !self.is_due(now) {
            return Ok(Vec::new());
        }
        self.next_poll = Some(now + self.interval);
        self.read_new(transcript)
    }

    /// Read everything appended since the last call
    ///
    /// A missing file is not an error: the transcript simply stays not
    /// ready until the file appears.
    pub fn read_new(&mut self, transcript: &mut Transcript) -> Result<Vec<Mutation>, TranscriptError> {
        let len = match std::fs::metadata(&self.path) {
            Ok(metadata) => metadata.len(),
            Err(err) if err.kind() == ErrorKind::NotFound => {
                tracing::trace!("{} does not exist yet", self.path.display());
                return Ok(Vec::new());
            }
            Err(err) => return Err(TranscriptError::io(&self.path, err)),
        };

        let mut mutations = Vec::new();
        if len < self.position {
            tracing::info!(
                "{} shrank from {} to {} bytes, reloading",
                self.path.display(),
                self.position,
                len
            );
            self.position = 0;
            self.partial.clear();
            self.line_no = 0;
            mutations.extend(transcript.reset());
        }

        if len > self.position {
            let mut file = File::open(&self.path).map_err(|err| TranscriptError::io(&self.path, err))?;
            file.seek(SeekFrom::Start(self.position))
                .map_err(|err| TranscriptError::io(&self.path, err))?;
            let mut bytes = Vec::new();
            let read = file
                .read_to_end(&mut bytes)
                .map_err(|err| TranscriptError::io(&self.path, err))?;
            self.position += read as u64;
            self.partial.extend_from_slice(&bytes);
            mutations.extend(self.drain_lines(transcript));
        }

        if !transcript.is_loaded() {
            tracing::info!(
                "Loaded {} ({} messages)",
                self.path.display(),
                transcript.messages().len()
            );
            transcript.mark_loaded();
        }
        Ok(mutations)
    }

    fn drain_lines(&mut self, transcript: &mut Transcript) -> Vec<Mutation> {
        let Some(last_newline) = self.partial.iter().rposition(|b| *b == b'\n') else {
            return Vec::new();
        };
        let complete: Vec<u8> = self.partial.drain(..=last_newline).collect();

        let mut mutations = Vec::new();
        for raw in complete[..last_newline].split(|b| *b == b'\n') {
            self.line_no += 1;
            let line = String::from_utf8_lossy(raw);
            match parse_line(&line, self.line_no) {
                Ok(Some(record)) => mutations.push(transcript.apply(record)),
                Ok(None) => {}
                Err(err) => {
                    self.skipped += 1;
                    tracing::warn!("Skipping {}: {}", self.path.display(), err);
                }
            }
        }
        mutations
    }
}
