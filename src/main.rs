//! Terminal platformer runner (default binary).
//!
//! Fixed 16 ms tick loop over crossterm input and the diffing framebuffer
//! renderer. Frame pacing is measured and fed back to the session so motion
//! stays consistent when the loop runs slower or faster than 60 Hz.

use std::fs::OpenOptions;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyEventKind};

use super_capy::core::{FrameRateProbe, GameSession, GameSnapshot, SimEvent};
use super_capy::input::{command_for_key, should_quit, HostCommand, InputHandler};
use super_capy::store::{JsonFileStore, KeyValueStore, ScoreBook, UnavailableStore};
use super_capy::term::{FrameBuffer, GameView, TerminalRenderer, Viewport};
use super_capy::types::{GameStatus, LEVEL_COUNT, TICK_MS};
use super_capy::HostConfig;

fn main() -> Result<()> {
    let config = HostConfig::from_env().apply_args(std::env::args().skip(1))?;
    init_logging(&config)?;

    let mut book = ScoreBook::new(open_store(&config));
    let mut session = GameSession::from_request(config.seed, config.level.as_deref())
        .with_speed_base(config.speed);
    session.set_best_score(book.best_score());
    log::info!(
        "starting at level {} (seed {}, best {}, unlocked {})",
        session.level_number(),
        config.seed,
        book.best_score(),
        book.max_unlocked_level()
    );

    let mut term = TerminalRenderer::new();
    term.enter()?;

    let result = run(&mut term, &mut session, &mut book);

    // Always try to restore terminal state.
    let _ = term.exit();
    result
}

fn init_logging(config: &HostConfig) -> Result<()> {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    builder.format_timestamp_millis();
    if let Some(path) = &config.log_path {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("opening log file {}", path.display()))?;
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }
    let _ = builder.try_init();
    Ok(())
}

fn open_store(config: &HostConfig) -> Box<dyn KeyValueStore> {
    let Some(path) = &config.store_path else {
        return Box::new(UnavailableStore);
    };
    match JsonFileStore::open(path) {
        Ok(store) => Box::new(store),
        Err(e) => {
            log::warn!("progress store disabled: {e}");
            Box::new(UnavailableStore)
        }
    }
}

fn run(term: &mut TerminalRenderer, session: &mut GameSession, book: &mut ScoreBook) -> Result<()> {
    let view = GameView::default();
    let mut fb = FrameBuffer::new(0, 0);
    let mut snap = GameSnapshot::default();
    let mut input = InputHandler::new();
    let mut probe = FrameRateProbe::new();

    if !term.keyboard_enhanced() {
        log::debug!(
            "no key release events; releasing keys after {} ms",
            input.key_release_timeout_ms()
        );
    }

    let tick_duration = Duration::from_millis(TICK_MS as u64);
    let mut last_tick = Instant::now();
    let mut last_columns = 0;

    loop {
        // Render.
        let (w, h) = crossterm::terminal::size().unwrap_or((80, 24));
        if w != last_columns {
            session.set_viewport_width(view.viewport_units(w));
            last_columns = w;
        }
        session.snapshot_into(&mut snap);
        view.render_into(&snap, Viewport::new(w, h), &mut fb);
        term.draw_swap(&mut fb)?;

        // Input with timeout until next tick.
        let timeout = tick_duration.saturating_sub(last_tick.elapsed());
        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) => match key.kind {
                    KeyEventKind::Press | KeyEventKind::Repeat => {
                        if should_quit(key) {
                            return Ok(());
                        }
                        if key.kind == KeyEventKind::Press {
                            if let Some(command) = command_for_key(key) {
                                apply_command(session, command);
                                input.reset();
                                continue;
                            }
                        }
                        input.handle_key_press(key.code);
                    }
                    KeyEventKind::Release => {
                        input.handle_key_release(key.code);
                    }
                },
                Event::Resize(..) => term.invalidate(),
                _ => {}
            }
        }

        // Tick.
        let elapsed = last_tick.elapsed();
        if elapsed >= tick_duration {
            last_tick = Instant::now();

            if let Some(measurement) = probe.record_frame(elapsed.as_secs_f32() * 1000.0) {
                if session.set_speed_measurement(Some(measurement)) {
                    log::debug!("speed factor now {:.3}", session.speed_factor());
                }
            }

            input.update();
            for ev in session.tick(input.state()) {
                match ev {
                    SimEvent::LevelWon => {
                        book.record_score(session.score());
                        book.unlock((session.level_number() + 1).min(LEVEL_COUNT));
                    }
                    SimEvent::PlayerDied => {
                        book.record_score(session.score());
                    }
                    _ => {}
                }
            }
        }
    }
}

fn apply_command(session: &mut GameSession, command: HostCommand) {
    match (command, session.status()) {
        (HostCommand::Reload, _) => session.reload_level(),
        (HostCommand::NextLevel, GameStatus::Won) => session.advance_to_next_level(),
        (HostCommand::Confirm, GameStatus::Won) => session.advance_to_next_level(),
        (HostCommand::Confirm, GameStatus::Lost) => session.reload_level(),
        _ => {}
    }
}
