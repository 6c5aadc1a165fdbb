use std::time::Duration;

use rand::{rngs::StdRng, SeedableRng};
use tracing::{debug, error, info, warn};

use crate::clock::Clock;
use crate::event_log::{EventSink, LogRecord};
use crate::scoring::{self, Outcome};
use crate::sequence::{self, Mode};
use crate::session::{
    Phase, SessionConfig, SessionState, CORRECT_TEXT, INCORRECT_TEXT, RECALL_PROMPT,
};

/// Heartbeats further behind than this are dropped instead of replayed
const MAX_HEARTBEAT_BACKLOG: Duration = Duration::from_secs(5);

/// Something the subject asked the surface to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    Start,
    Submit,
    ToggleMode,
    Type(char),
    Backspace,
}

/// Owns the session and drives it from user intents and clock ticks.
///
/// Time only enters through [`Clock`]: the one-shot reveal deadline and the
/// repeating heartbeat deadline are both checked in [`Controller::on_tick`].
pub struct Controller<C: Clock> {
    clock: C,
    config: SessionConfig,
    state: SessionState,
    sink: Option<Box<dyn EventSink>>,
    sink_healthy: bool,
    rng: StdRng,
    reveal_due: Option<i64>,
    next_heartbeat: i64,
}

fn interval_millis(interval: Duration) -> i64 {
    i64::try_from(interval.as_millis())
        .unwrap_or(i64::MAX)
        .max(1)
}

impl<C: Clock> Controller<C> {
    pub fn new(clock: C, config: SessionConfig, sink: Option<Box<dyn EventSink>>) -> Self {
        Self::with_rng(clock, config, sink, StdRng::from_entropy())
    }

    pub fn with_rng(
        clock: C,
        config: SessionConfig,
        sink: Option<Box<dyn EventSink>>,
        rng: StdRng,
    ) -> Self {
        let next_heartbeat = clock
            .now_millis()
            .saturating_add(interval_millis(config.heartbeat_interval));
        Self {
            state: SessionState::new(config.mode),
            clock,
            config,
            sink,
            sink_healthy: true,
            rng,
            reveal_due: None,
            next_heartbeat,
        }
    }

    pub fn dispatch(&mut self, intent: Intent) -> bool {
        match intent {
            Intent::Start => self.start(),
            Intent::Submit => self.submit().is_some(),
            Intent::ToggleMode => {
                self.toggle_mode();
                true
            }
            Intent::Type(c) => self.type_char(c),
            Intent::Backspace => self.backspace(),
        }
    }

    /// Begin a new round. Ignored unless the start button is enabled.
    pub fn start(&mut self) -> bool {
        self.on_tick();
        if !self.state.start_enabled {
            debug!(phase = ?self.state.phase, "start ignored, round in progress");
            return false;
        }

        let now = self.clock.now_millis();
        self.state.sequence =
            sequence::generate(&mut self.rng, self.state.stage, self.state.mode);
        self.state.cursor = 0;
        self.state.input_text.clear();
        self.state.input_visible = false;
        self.state.submit_enabled = false;
        self.state.start_enabled = false;
        self.state.phase = Phase::Revealing;

        debug!(
            stage = self.state.stage,
            mode = %self.state.mode,
            "round started"
        );

        // a new round replaces whatever reveal deadline was armed before
        self.advance_reveal(now);
        true
    }

    fn advance_reveal(&mut self, now: i64) {
        match self.state.sequence.get(self.state.cursor) {
            Some(&c) => {
                self.state.display_text = c.to_string();
                self.state.cursor += 1;
                self.reveal_due =
                    Some(now.saturating_add(interval_millis(self.config.reveal_interval)));
            }
            None => {
                self.reveal_due = None;
                self.state.display_text = RECALL_PROMPT.to_string();
                self.state.input_visible = true;
                self.state.submit_enabled = true;
                self.state.phase = Phase::AwaitingResponse;
                debug!("reveal finished, awaiting response");
            }
        }
    }

    /// Fire every deadline that has passed on the clock.
    ///
    /// Intents that change logged state call this first, so rows are always
    /// appended in time order.
    pub fn on_tick(&mut self) {
        let now = self.clock.now_millis();
        let heartbeat = interval_millis(self.config.heartbeat_interval);
        let behind = now.saturating_sub(self.next_heartbeat);

        if behind > interval_millis(MAX_HEARTBEAT_BACKLOG) {
            warn!(
                behind_ms = behind,
                "heartbeat schedule fell behind, skipping ahead"
            );
            self.next_heartbeat = now;
        }

        while self.next_heartbeat <= now {
            self.log(self.next_heartbeat, None);
            self.next_heartbeat = self.next_heartbeat.saturating_add(heartbeat);
            if self.next_heartbeat == i64::MAX {
                break;
            }
        }

        if self.reveal_due.is_some_and(|due| due <= now) {
            self.advance_reveal(now);
        }
    }

    /// Score the typed response. Ignored unless the submit button is enabled.
    pub fn submit(&mut self) -> Option<Outcome> {
        self.on_tick();
        if !self.state.submit_enabled {
            debug!(phase = ?self.state.phase, "submit ignored, nothing to score");
            return None;
        }

        // mode is read now, not when the round started
        let outcome = scoring::score(
            &self.state.sequence,
            self.state.mode,
            &self.state.input_text,
        );
        let now = self.clock.now_millis();
        self.log(now, Some(outcome));

        self.state.record_outcome(outcome);
        self.state.display_text = match outcome {
            Outcome::Correct => CORRECT_TEXT,
            Outcome::Incorrect => INCORRECT_TEXT,
        }
        .to_string();
        self.state.start_enabled = true;
        self.state.input_visible = false;
        self.state.input_text.clear();
        self.state.submit_enabled = false;
        self.state.phase = Phase::Idle;

        info!(%outcome, next_stage = self.state.stage, "response scored");
        Some(outcome)
    }

    pub fn toggle_mode(&mut self) {
        self.on_tick();
        self.state.mode = self.state.mode.toggled();
        debug!(mode = %self.state.mode, "mode switched");
    }

    pub fn type_char(&mut self, c: char) -> bool {
        if !self.state.input_visible || c.is_control() {
            return false;
        }
        self.state.input_text.push(c);
        true
    }

    pub fn backspace(&mut self) -> bool {
        self.state.input_visible && self.state.input_text.pop().is_some()
    }

    fn log(&mut self, time_ms: i64, outcome: Option<Outcome>) {
        let Some(sink) = self.sink.as_mut() else {
            return;
        };

        let record = LogRecord {
            time_ms,
            mode: self.state.mode,
            length: self.state.sequence.len(),
            is_typing: self.state.phase != Phase::Revealing,
            outcome,
        };

        match sink.append(&record) {
            Ok(()) => {
                if !self.sink_healthy {
                    info!("event log writes recovered");
                    self.sink_healthy = true;
                }
            }
            Err(e) if self.sink_healthy => {
                warn!(error = %e, "event log write failed, continuing without it");
                self.sink_healthy = false;
            }
            Err(e) => debug!(error = %e, "event log write failed again"),
        }
    }

    /// Close the event log. Called again on drop, where it is a no-op.
    pub fn shutdown(&mut self) {
        if let Some(mut sink) = self.sink.take() {
            match sink.close() {
                Ok(()) => info!("event log closed"),
                Err(e) => error!(error = %e, "event log did not close cleanly"),
            }
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn mode(&self) -> Mode {
        self.state.mode
    }

    pub fn stage(&self) -> usize {
        self.state.stage
    }

    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    pub fn display_text(&self) -> &str {
        &self.state.display_text
    }

    pub fn input_visible(&self) -> bool {
        self.state.input_visible
    }

    pub fn input_text(&self) -> &str {
        &self.state.input_text
    }

    pub fn submit_enabled(&self) -> bool {
        self.state.submit_enabled
    }

    pub fn start_enabled(&self) -> bool {
        self.state.start_enabled
    }

    pub fn mode_button_label(&self) -> &'static str {
        self.state.mode.switch_label()
    }

    pub fn has_event_log(&self) -> bool {
        self.sink.is_some()
    }
}

impl<C: Clock> Drop for Controller<C> {
    fn drop(&mut self) {
        self.shutdown();
    }
}
