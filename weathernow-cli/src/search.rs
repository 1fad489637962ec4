//! Full-screen search prompt with suggestions as you type.

use std::{
    io::{self, Write},
    sync::Arc,
    thread,
};

use anyhow::{Context, Result};
use crossterm::{
    cursor::MoveTo,
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
    },
    execute, queue,
    style::{Attribute, Print, SetAttribute},
    terminal::{
        self, BeginSynchronizedUpdate, Clear, ClearType, EndSynchronizedUpdate,
        EnterAlternateScreen, LeaveAlternateScreen,
    },
};
use tokio::sync::mpsc;
use tracing::debug;
use weathernow_core::{
    Config, Key, LookupOutcome, LookupStatus, LookupTicket, OpenMeteoClient, WeatherSession,
};

use crate::render;

const TITLE: &str = "Weather Now: quick weather conditions for any city  (Esc or Ctrl-C to quit)";
const PROMPT: &str = "> ";
const INPUT_ROW: u16 = 1;
const FIRST_SUGGESTION_ROW: u16 = 2;

pub async fn run(config: &Config, initial: Option<String>) -> Result<()> {
    let client = Arc::new(OpenMeteoClient::from_config(config)?);
    let (mut session, mut batches) =
        WeatherSession::new(client.clone(), client, config.suggestion_settings());
    let (outcome_tx, mut outcomes) = mpsc::unbounded_channel::<LookupOutcome>();

    if let Some(initial) = initial {
        session.on_query_changed(&initial);
    }

    let guard = TerminalGuard::enter()?;
    let mut events = spawn_event_reader();
    let mut out = io::stdout();

    loop {
        draw(&mut out, &session).context("Failed to draw search screen")?;

        tokio::select! {
            Some(batch) = batches.recv() => {
                session.apply_suggestions(batch);
            }
            Some(outcome) = outcomes.recv() => {
                session.finish_lookup(outcome);
            }
            event = events.recv() => {
                let Some(event) = event else { break };
                match handle_event(event.context("Failed to read terminal event")?, &mut session) {
                    Step::Continue => {}
                    Step::Lookup(ticket) => spawn_lookup(ticket, &outcome_tx),
                    Step::Quit => break,
                }
            }
        }
    }

    drop(guard);
    if let LookupStatus::Success(view) = session.status() {
        for line in render::report(view) {
            println!("{line}");
        }
    }
    Ok(())
}

#[derive(Debug)]
enum Step {
    Continue,
    Lookup(LookupTicket),
    Quit,
}

impl From<Option<LookupTicket>> for Step {
    fn from(ticket: Option<LookupTicket>) -> Self {
        ticket.map_or(Step::Continue, Step::Lookup)
    }
}

fn handle_event(event: Event, session: &mut WeatherSession) -> Step {
    match event {
        Event::Key(key) if key.kind != KeyEventKind::Release => handle_key(key, session),
        Event::Mouse(MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            row,
            ..
        }) => match suggestion_at_row(row, session) {
            Some(index) => session.click(index).into(),
            None => {
                session.blur();
                Step::Continue
            }
        },
        _ => Step::Continue,
    }
}

fn handle_key(key: KeyEvent, session: &mut WeatherSession) -> Step {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Char('c') | KeyCode::Char('d') if ctrl => Step::Quit,
        KeyCode::Esc if !session.suggestions().is_visible() => Step::Quit,
        KeyCode::Char(c) if !ctrl => {
            let mut text = session.query().to_owned();
            text.push(c);
            session.on_query_changed(&text);
            Step::Continue
        }
        KeyCode::Backspace => {
            let mut text = session.query().to_owned();
            if text.pop().is_some() {
                session.on_query_changed(&text);
            }
            Step::Continue
        }
        KeyCode::Down => session.on_key(Key::ArrowDown).into(),
        KeyCode::Up => session.on_key(Key::ArrowUp).into(),
        KeyCode::Enter => session.on_key(Key::Enter).into(),
        KeyCode::Esc => session.on_key(Key::Escape).into(),
        _ => session.on_key(Key::Other).into(),
    }
}

fn spawn_lookup(ticket: LookupTicket, outcomes: &mpsc::UnboundedSender<LookupOutcome>) {
    debug!(generation = ticket.generation(), target = ?ticket.target(), "starting lookup");
    let outcomes = outcomes.clone();
    tokio::spawn(async move {
        let _ = outcomes.send(ticket.run().await);
    });
}

/// Terminal events on a plain thread; `event::read` blocks.
fn spawn_event_reader() -> mpsc::UnboundedReceiver<io::Result<Event>> {
    let (tx, rx) = mpsc::unbounded_channel();
    thread::spawn(move || {
        loop {
            let event = event::read();
            let failed = event.is_err();
            if tx.send(event).is_err() || failed {
                break;
            }
        }
    });
    rx
}

fn suggestion_at_row(row: u16, session: &WeatherSession) -> Option<usize> {
    let suggestions = session.suggestions();
    if !suggestions.is_visible() {
        return None;
    }
    let index = usize::from(row.checked_sub(FIRST_SUGGESTION_ROW)?);
    (index < suggestions.items().len()).then_some(index)
}

#[derive(Debug, PartialEq)]
struct Line {
    text: String,
    highlighted: bool,
}

impl Line {
    fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            highlighted: false,
        }
    }
}

fn frame(session: &WeatherSession) -> Vec<Line> {
    let mut lines = vec![Line::plain(TITLE), Line::plain(format!("{PROMPT}{}", session.query()))];

    let suggestions = session.suggestions();
    if suggestions.is_visible() {
        for (i, candidate) in suggestions.items().iter().enumerate() {
            let highlighted = suggestions.highlighted() == Some(i);
            let marker = if highlighted { '›' } else { ' ' };
            lines.push(Line {
                text: format!("{marker} {}", candidate.label()),
                highlighted,
            });
        }
    }

    lines.push(Line::plain(""));
    lines.extend(render::status(session.status()).into_iter().map(Line::plain));
    lines
}

fn draw(out: &mut impl Write, session: &WeatherSession) -> io::Result<()> {
    queue!(out, BeginSynchronizedUpdate, Clear(ClearType::All))?;

    for (row, line) in frame(session).iter().enumerate() {
        queue!(out, MoveTo(0, row as u16))?;
        if line.highlighted {
            queue!(
                out,
                SetAttribute(Attribute::Reverse),
                Print(&line.text),
                SetAttribute(Attribute::Reset)
            )?;
        } else {
            queue!(out, Print(&line.text))?;
        }
    }

    let column = PROMPT.chars().count() + session.query().chars().count();
    queue!(out, MoveTo(column as u16, INPUT_ROW), EndSynchronizedUpdate)?;
    out.flush()
}

/// Raw mode + alternate screen for as long as it lives.
struct TerminalGuard;

impl TerminalGuard {
    fn enter() -> Result<Self> {
        terminal::enable_raw_mode().context("Failed to enable raw mode")?;
        if let Err(err) = execute!(io::stdout(), EnterAlternateScreen, EnableMouseCapture) {
            let _ = terminal::disable_raw_mode();
            return Err(err).context("Failed to enter alternate screen");
        }
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = execute!(io::stdout(), DisableMouseCapture, LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
    }
}
