use std::time::Duration;

use crate::scoring::Outcome;
use crate::sequence::Mode;

pub const INITIAL_STAGE: usize = 3;
pub const DEFAULT_REVEAL_INTERVAL: Duration = Duration::from_millis(1000);
pub const DEFAULT_HEARTBEAT_INTERVAL: Duration = Duration::from_millis(250);

pub const WELCOME_TEXT: &str = "Press Start to begin";
pub const RECALL_PROMPT: &str = "Enter the sequence:";
pub const CORRECT_TEXT: &str = "Correct! Increasing difficulty.";
pub const INCORRECT_TEXT: &str = "Incorrect. Restarting test.";

#[derive(Debug, Clone, PartialEq)]
pub struct SessionConfig {
    pub mode: Mode,
    pub reveal_interval: Duration,
    pub heartbeat_interval: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            mode: Mode::default(),
            reveal_interval: DEFAULT_REVEAL_INTERVAL,
            heartbeat_interval: DEFAULT_HEARTBEAT_INTERVAL,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Revealing,
    AwaitingResponse,
}

#[derive(Debug, Clone)]
pub struct SessionState {
    pub stage: usize,
    pub sequence: Vec<char>,
    pub cursor: usize,
    pub mode: Mode,
    pub phase: Phase,
    // What the presentation surface shows
    pub display_text: String,
    pub input_text: String,
    pub input_visible: bool,
    pub submit_enabled: bool,
    pub start_enabled: bool,
    // Running totals
    pub rounds_played: usize,
    pub rounds_correct: usize,
    pub best_span: usize,
}

impl SessionState {
    pub fn new(mode: Mode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    /// Apply the adaptive staging rule for a scored round
    pub fn record_outcome(&mut self, outcome: Outcome) {
        self.rounds_played += 1;
        match outcome {
            Outcome::Correct => {
                self.rounds_correct += 1;
                self.best_span = self.best_span.max(self.sequence.len());
                self.stage += 1;
            }
            Outcome::Incorrect => self.stage = INITIAL_STAGE,
        }
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            stage: INITIAL_STAGE,
            sequence: Vec::new(),
            cursor: 0,
            mode: Mode::default(),
            phase: Phase::Idle,
            display_text: WELCOME_TEXT.to_string(),
            input_text: String::new(),
            input_visible: false,
            submit_enabled: false,
            start_enabled: true,
            rounds_played: 0,
            rounds_correct: 0,
            best_span: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_state() {
        let state = SessionState::default();
        assert_eq!(state.stage, 3);
        assert_eq!(state.phase, Phase::Idle);
        assert_eq!(state.display_text, "Press Start to begin");
        assert!(state.start_enabled);
        assert!(!state.submit_enabled);
        assert!(!state.input_visible);
        assert!(state.sequence.is_empty());
    }

    #[test]
    fn test_correct_increments_stage() {
        let mut state = SessionState::new(Mode::LetterNumber);
        state.sequence = vec!['1', '2', '3'];
        state.record_outcome(Outcome::Correct);
        assert_eq!(state.stage, 4);
        assert_eq!(state.best_span, 3);
        assert_eq!(state.rounds_played, 1);
        assert_eq!(state.rounds_correct, 1);
        assert_eq!(state.mode, Mode::LetterNumber);
    }

    #[test]
    fn test_incorrect_resets_stage() {
        let mut state = SessionState {
            stage: 7,
            best_span: 6,
            ..SessionState::default()
        };
        state.record_outcome(Outcome::Incorrect);
        assert_eq!(state.stage, INITIAL_STAGE);
        assert_eq!(state.best_span, 6);
        assert_eq!(state.rounds_played, 1);
        assert_eq!(state.rounds_correct, 0);
    }

    #[test]
    fn test_default_config_intervals() {
        let config = SessionConfig::default();
        assert_eq!(config.reveal_interval, Duration::from_millis(1000));
        assert_eq!(config.heartbeat_interval, Duration::from_millis(250));
        assert_eq!(config.mode, Mode::DigitOnly);
    }
}
