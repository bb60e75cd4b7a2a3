//! Application orchestration layer
//!
//! Wires the input thread, the reveal driver and the renderer together around a single event
//! loop. The loop owns the conversation view; everything else talks to it over channels.

use crate::config::Config;
use crate::error::Result;
use crate::input::{spawn_input_thread, InputAction};
use crate::message::Message;
use crate::render::ui::{ChatView, UIRenderer};
use crate::render::{LoopControl, RenderLoopState};
use crate::reveal::RevealDriver;
use log::{debug, info, warn};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

/// How long the input thread blocks waiting for a terminal event before rechecking shutdown.
const INPUT_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Application orchestrator
pub struct Application {
    title: String,
    messages: Vec<Message>,
    config: Config,
    ui_renderer: Box<dyn UIRenderer>,
}

impl Application {
    pub fn new(
        title: impl Into<String>,
        messages: Vec<Message>,
        config: Config,
        ui_renderer: Box<dyn UIRenderer>,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            title: title.into(),
            messages,
            config,
            ui_renderer,
        })
    }

    /// Run the interactive viewer until the user quits.
    pub async fn run(&mut self) -> Result<()> {
        let (input_tx, input_rx) = mpsc::unbounded_channel();
        let shutdown = Arc::new(AtomicBool::new(false));
        let input_thread =
            spawn_input_thread(input_tx, Arc::clone(&shutdown), INPUT_POLL_INTERVAL);

        let result = self.run_loop(input_rx).await;

        shutdown.store(true, Ordering::SeqCst);
        if input_thread.join().is_err() {
            warn!("input thread panicked");
        }
        result
    }

    /// Event loop fed by an arbitrary source of input actions.
    ///
    /// The terminal is restored even when the loop fails.
    pub async fn run_loop(
        &mut self,
        mut input_rx: mpsc::UnboundedReceiver<InputAction>,
    ) -> Result<()> {
        self.ui_renderer.initialize()?;
        let result = self.event_loop(&mut input_rx).await;
        let cleanup = self.ui_renderer.cleanup();
        result.and(cleanup)
    }

    async fn event_loop(
        &mut self,
        input_rx: &mut mpsc::UnboundedReceiver<InputAction>,
    ) -> Result<()> {
        let (width, height) = self.ui_renderer.get_terminal_size()?;
        let mut view = ChatView::new(
            self.title.clone(),
            width,
            height,
            self.config.show_timestamps,
        );

        let (driver, mut tick_rx) = RevealDriver::channel(self.config.tick_interval);
        let mut state = RenderLoopState::new(driver, self.config.animate);
        state.load_messages(&mut view, self.messages.clone());
        info!(
            "showing {} messages, {} revealing",
            view.bubbles.len(),
            view.revealing_count()
        );

        self.ui_renderer.render(&view)?;

        loop {
            let control = tokio::select! {
                action = input_rx.recv() => match action {
                    Some(action) => state.process_action(action, &mut view),
                    None => {
                        debug!("input channel closed");
                        LoopControl::Quit
                    }
                },
                Some(tick) = tick_rx.recv() => state.handle_tick(tick, &mut view),
            };

            match control {
                LoopControl::Quit => break,
                LoopControl::Redraw => self.ui_renderer.render(&view)?,
                LoopControl::Unchanged => {}
            }
        }

        state.shutdown();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::ui::MockUIRenderer;

    fn app(messages: Vec<Message>) -> (Application, MockUIRenderer) {
        let surface = MockUIRenderer::default();
        let config = Config {
            tick_interval: Duration::from_millis(20),
            ..Config::default()
        };
        let app =
            Application::new("chat.json", messages, config, Box::new(surface.clone())).unwrap();
        (app, surface)
    }

    fn send_after(tx: &mpsc::UnboundedSender<InputAction>, millis: u64, action: InputAction) {
        let tx = tx.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(millis)).await;
            let _ = tx.send(action);
        });
    }

    #[tokio::test(start_paused = true)]
    async fn quit_renders_once_and_restores_terminal() {
        let (mut app, surface) = app(vec![Message::user("hi")]);
        let (tx, rx) = mpsc::unbounded_channel();
        tx.send(InputAction::Quit).unwrap();

        app.run_loop(rx).await.unwrap();

        assert_eq!(surface.frame_count(), 1);
        assert!(!surface.is_active());
    }

    #[tokio::test(start_paused = true)]
    async fn animated_reply_reveals_over_ticks() {
        let (mut app, surface) = app(vec![
            Message::user("hi"),
            Message::bot("abc").animated(),
        ]);
        let (tx, rx) = mpsc::unbounded_channel();
        send_after(&tx, 200, InputAction::Quit);

        app.run_loop(rx).await.unwrap();

        let frames = surface.frames.lock().unwrap();
        assert_eq!(frames[0], vec!["hi".to_string(), String::new()]);
        assert_eq!(
            frames.last().unwrap(),
            &vec!["hi".to_string(), "abc".to_string()]
        );
        let revealed: Vec<usize> = frames.iter().map(|frame| frame[1].len()).collect();
        assert!(revealed.windows(2).all(|pair| pair[0] <= pair[1]));
        assert_eq!(frames.len(), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn replay_restarts_the_last_reply() {
        let (mut app, surface) = app(vec![Message::bot("ok").animated()]);
        let (tx, rx) = mpsc::unbounded_channel();
        send_after(&tx, 100, InputAction::ReplayLast);
        send_after(&tx, 110, InputAction::Quit);

        app.run_loop(rx).await.unwrap();

        let frames = surface.frames.lock().unwrap();
        assert!(frames.iter().any(|frame| frame[0] == "ok"));
        assert_eq!(frames.last().unwrap(), &vec![String::new()]);
    }

    #[tokio::test(start_paused = true)]
    async fn closed_input_channel_ends_the_loop() {
        let (mut app, surface) = app(vec![Message::bot("done")]);
        let (tx, rx) = mpsc::unbounded_channel::<InputAction>();
        drop(tx);

        app.run_loop(rx).await.unwrap();
        assert_eq!(surface.frame_count(), 1);
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = Config {
            tick_interval: Duration::ZERO,
            ..Config::default()
        };
        let surface = Box::new(MockUIRenderer::default());
        assert!(Application::new("t", Vec::new(), config, surface).is_err());
    }
}
