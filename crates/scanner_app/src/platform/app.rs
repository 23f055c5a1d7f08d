use std::collections::VecDeque;
use std::io::Write;
use std::sync::Arc;

use client_logging::{client_debug, client_info, client_warn};
use scanner_core::{update, AppState, Msg};
use scanner_link::{service_endpoint, ConnectionManager, WsConnector};
use tokio::io::{AsyncBufReadExt, BufReader};

use super::effects::EffectRunner;
use super::flush::FlushScheduler;
use super::ui::input::{self, Command};
use super::ui::render;
use super::ClientConfig;

/// Runs one screen: connect, then interleave user input, link callbacks and
/// flush ticks on the current task until the user quits.
pub async fn run_app(config: ClientConfig) -> anyhow::Result<()> {
    let endpoint = service_endpoint(&config.origin, &config.path)?;
    let (link, mut link_events) =
        ConnectionManager::new(Arc::new(WsConnector), endpoint, config.link_settings());

    let mut screen = Screen::new(EffectRunner::new(link));
    let mut flush = FlushScheduler::new(config.flush_interval());
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut input_open = true;

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    screen.start();
    println!("{}", input::HELP);
    screen.render_now();

    loop {
        tokio::select! {
            _ = flush.tick() => screen.dispatch(Msg::Tick),
            Some(event) = link_events.recv() => screen.handle_link_event(event),
            line = lines.next_line(), if input_open => match line {
                Ok(Some(line)) => match input::parse_command(&line) {
                    Ok(Command::Dispatch(msgs)) => msgs.into_iter().for_each(|msg| screen.dispatch(msg)),
                    Ok(Command::Show) => screen.render_now(),
                    Ok(Command::Help) => println!("{}", input::HELP),
                    Ok(Command::Quit) => break,
                    Err(err) => println!("{err}"),
                },
                Ok(None) => {
                    client_info!("stdin closed; still tracking jobs until interrupted");
                    input_open = false;
                }
                Err(err) => {
                    client_warn!("stdin read failed: {}", err);
                    input_open = false;
                }
            },
            _ = &mut ctrl_c => break,
        }
    }

    screen.shutdown();
    Ok(())
}

/// Owns the state of one screen instance and everything it talks to.
struct Screen {
    state: AppState,
    effects: EffectRunner,
    inbox: VecDeque<Msg>,
}

impl Screen {
    fn new(effects: EffectRunner) -> Self {
        Self {
            state: AppState::new(),
            effects,
            inbox: VecDeque::new(),
        }
    }

    fn start(&mut self) {
        let msgs = self.effects.start();
        self.dispatch_all(msgs);
    }

    fn handle_link_event(&mut self, event: scanner_link::LinkEvent) {
        let msgs = self.effects.handle_link_event(event);
        self.dispatch_all(msgs);
    }

    fn dispatch(&mut self, msg: Msg) {
        self.dispatch_all(vec![msg]);
    }

    /// Applies messages, and whatever they lead to, in arrival order; renders
    /// once at the end if anything visible changed.
    fn dispatch_all(&mut self, msgs: Vec<Msg>) {
        self.inbox.extend(msgs);
        while let Some(msg) = self.inbox.pop_front() {
            client_debug!("dispatch {:?}", msg);
            let state = std::mem::take(&mut self.state);
            let (state, effects) = update(state, msg);
            self.state = state;
            let follow_up = self.effects.run(effects);
            self.inbox.extend(follow_up);
        }
        if self.state.consume_dirty() {
            self.render_now();
        }
    }

    fn render_now(&self) {
        let mut stdout = std::io::stdout().lock();
        let mut frame = String::from("\n");
        for line in render::render(&self.state.view()) {
            frame.push_str(&line);
            frame.push('\n');
        }
        if let Err(err) = stdout.write_all(frame.as_bytes()).and_then(|()| stdout.flush()) {
            client_warn!("failed to draw view: {}", err);
        }
    }

    fn shutdown(&mut self) {
        self.effects.shutdown();
        client_info!("screen closed");
    }
}
