//! Terminal input plumbing for the main loop.
//!
//! Input is read on a background thread and handed over through a channel, so
//! the loop can wait for a key and still wake up in time for the next
//! deadline. The controller owns all timing; [`Runner::step`] only bounds how
//! long the loop sleeps.

use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use std::time::Duration;

use crossterm::event::{self, Event as CtEvent, KeyEvent, KeyEventKind};
use tracing::{debug, error};

/// What the main loop wakes up for
#[derive(Clone, Debug)]
pub enum AppEvent {
    Key(KeyEvent),
    Resize,
    /// Nothing arrived within the tick interval
    Tick,
    /// The input side hung up; no further keys will ever arrive
    InputClosed,
}

pub trait AppEventSource: Send + 'static {
    /// Wait up to `timeout` for the next event.
    fn recv_timeout(&self, timeout: Duration) -> Result<AppEvent, RecvTimeoutError>;
}

/// Event source fed by a channel.
///
/// [`spawn_terminal_reader`] feeds it from crossterm; tests feed it by hand.
pub struct ChannelEventSource {
    rx: Receiver<AppEvent>,
}

impl ChannelEventSource {
    pub fn new(rx: Receiver<AppEvent>) -> Self {
        Self { rx }
    }
}

impl AppEventSource for ChannelEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<AppEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Keys and resizes the loop cares about. Release events only show up on
/// some platforms and would double every keystroke.
fn translate(event: CtEvent) -> Option<AppEvent> {
    match event {
        CtEvent::Key(key) if key.kind != KeyEventKind::Release => Some(AppEvent::Key(key)),
        CtEvent::Resize(_, _) => Some(AppEvent::Resize),
        _ => None,
    }
}

/// Start reading the terminal on a background thread.
///
/// The thread ends when the terminal read fails or the source is dropped. In
/// the first case the sender goes away with it and [`Runner::step`] reports
/// [`AppEvent::InputClosed`].
pub fn spawn_terminal_reader() -> ChannelEventSource {
    let (tx, rx) = mpsc::channel();

    thread::spawn(move || loop {
        let event = match event::read() {
            Ok(event) => event,
            Err(e) => {
                error!(error = %e, "terminal input reader stopped");
                return;
            }
        };
        if let Some(app_event) = translate(event) {
            if tx.send(app_event).is_err() {
                debug!("event loop gone, input reader exiting");
                return;
            }
        }
    });

    ChannelEventSource::new(rx)
}

/// Hands the main loop one event at a time
pub struct Runner<E: AppEventSource> {
    source: E,
    tick: Duration,
}

impl<E: AppEventSource> Runner<E> {
    pub fn new(source: E, tick: Duration) -> Self {
        Self { source, tick }
    }

    pub fn tick(&self) -> Duration {
        self.tick
    }

    pub fn step(&self) -> AppEvent {
        match self.source.recv_timeout(self.tick) {
            Ok(event) => event,
            Err(RecvTimeoutError::Timeout) => AppEvent::Tick,
            Err(RecvTimeoutError::Disconnected) => AppEvent::InputClosed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEventState, KeyModifiers};

    fn runner(rx: Receiver<AppEvent>) -> Runner<ChannelEventSource> {
        Runner::new(ChannelEventSource::new(rx), Duration::from_millis(1))
    }

    #[test]
    fn step_returns_tick_on_timeout() {
        let (_tx, rx) = mpsc::channel();
        assert!(matches!(runner(rx).step(), AppEvent::Tick));
    }

    #[test]
    fn step_reports_closed_input_once_sender_is_gone() {
        let (tx, rx) = mpsc::channel();
        tx.send(AppEvent::Resize).unwrap();
        drop(tx);
        let runner = runner(rx);

        // queued events drain first
        assert!(matches!(runner.step(), AppEvent::Resize));
        assert!(matches!(runner.step(), AppEvent::InputClosed));
        assert!(matches!(runner.step(), AppEvent::InputClosed));
    }

    #[test]
    fn step_passes_through_events() {
        let (tx, rx) = mpsc::channel();
        tx.send(AppEvent::Key(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE)))
            .unwrap();
        let runner = runner(rx);

        match runner.step() {
            AppEvent::Key(key) => assert_eq!(key.code, KeyCode::Enter),
            other => panic!("expected Enter key, got {other:?}"),
        }
        assert_eq!(runner.tick(), Duration::from_millis(1));
    }

    #[test]
    fn translate_drops_key_releases() {
        let press = KeyEvent::new(KeyCode::Char('7'), KeyModifiers::NONE);
        let release = KeyEvent::new_with_kind_and_state(
            KeyCode::Char('7'),
            KeyModifiers::NONE,
            KeyEventKind::Release,
            KeyEventState::NONE,
        );

        assert!(matches!(translate(CtEvent::Key(press)), Some(AppEvent::Key(_))));
        assert!(translate(CtEvent::Key(release)).is_none());
        assert!(matches!(translate(CtEvent::Resize(80, 24)), Some(AppEvent::Resize)));
        assert!(translate(CtEvent::FocusGained).is_none());
    }
}
