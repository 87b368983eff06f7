use serde::{Deserialize, Serialize};

use crate::constants::{
    SPEECH_MAX_PER_WINDOW, SPEECH_MAX_TEXT_LEN, SPEECH_MIN_GAP_MS, SPEECH_WINDOW_MS,
};
use crate::error::{ConfigError, ConfigResult};
use crate::types::{SpeakRequest, SpeechCause};

#[derive(Clone, Copy, Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct SpeechOptions {
    pub min_gap_ms: u64,
    pub window_ms: u64,
    pub max_per_window: usize,
    pub max_text_len: usize,
}

impl Default for SpeechOptions {
    fn default() -> Self {
        Self {
            min_gap_ms: SPEECH_MIN_GAP_MS,
            window_ms: SPEECH_WINDOW_MS,
            max_per_window: SPEECH_MAX_PER_WINDOW,
            max_text_len: SPEECH_MAX_TEXT_LEN,
        }
    }
}

impl SpeechOptions {
    pub fn validate(&self) -> ConfigResult<()> {
        if self.max_per_window == 0 {
            return Err(ConfigError::invalid(
                "speech.max_per_window",
                "must allow at least one request",
            ));
        }
        if self.max_text_len == 0 {
            return Err(ConfigError::invalid("speech.max_text_len", "must be positive"));
        }
        Ok(())
    }
}

/// Rate limiter in front of the text-to-speech collaborator. Requests over the
/// limit are dropped, not queued.
pub struct SpeechLimiter {
    options: SpeechOptions,
    history: Vec<u64>,
    pending: Vec<SpeakRequest>,
}

impl SpeechLimiter {
    pub fn new(options: SpeechOptions) -> Self {
        Self {
            options,
            history: Vec::new(),
            pending: Vec::new(),
        }
    }

    /// Returns whether the request was accepted.
    pub fn request(&mut self, text: &str, cause: SpeechCause, now_ms: u64) -> bool {
        let text = text.trim();
        if text.is_empty() {
            return false;
        }

        self.history
            .retain(|at| now_ms.saturating_sub(*at) < self.options.window_ms);
        if let Some(&last) = self.history.last() {
            if now_ms.saturating_sub(last) < self.options.min_gap_ms {
                return false;
            }
        }
        if self.history.len() >= self.options.max_per_window {
            return false;
        }
        self.history.push(now_ms);

        let text: String = text.chars().take(self.options.max_text_len).collect();
        self.pending.push(SpeakRequest {
            text,
            cause,
            at_ms: now_ms,
        });
        true
    }

    pub fn drain(&mut self) -> Vec<SpeakRequest> {
        std::mem::take(&mut self.pending)
    }

    pub fn pending(&self) -> &[SpeakRequest] {
        &self.pending
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimum_gap_drops_bursts() {
        let mut limiter = SpeechLimiter::new(SpeechOptions::default());
        assert!(limiter.request("hello", SpeechCause::Note, 0));
        assert!(!limiter.request("again", SpeechCause::Note, 500));
        assert!(limiter.request("later", SpeechCause::Damage, 1_500));
        let spoken: Vec<String> = limiter.drain().into_iter().map(|r| r.text).collect();
        assert_eq!(spoken, vec!["hello", "later"]);
        assert!(limiter.pending().is_empty());
    }

    #[test]
    fn window_caps_total_requests() {
        let mut limiter = SpeechLimiter::new(SpeechOptions {
            min_gap_ms: 0,
            window_ms: 1_000,
            max_per_window: 2,
            ..SpeechOptions::default()
        });
        assert!(limiter.request("a", SpeechCause::Door, 0));
        assert!(limiter.request("b", SpeechCause::Door, 100));
        assert!(!limiter.request("c", SpeechCause::Door, 200));
        assert!(limiter.request("d", SpeechCause::Door, 1_050));
    }

    #[test]
    fn long_text_is_truncated_and_blank_text_ignored() {
        let mut limiter = SpeechLimiter::new(SpeechOptions {
            max_text_len: 4,
            ..SpeechOptions::default()
        });
        assert!(!limiter.request("   ", SpeechCause::Item, 0));
        assert!(limiter.request("whispering", SpeechCause::Item, 0));
        assert_eq!(limiter.drain()[0].text, "whis");
    }
}
