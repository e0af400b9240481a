//! Terminal app state: the inline chat surface plus local state for the
//! interactive widgets (mortgage sliders, viewing forms). Widget state is
//! keyed by message id and block index so it survives re-renders while the
//! turn is still streaming.

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Paragraph, Wrap};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tracing::warn;

use crate::chat::types::Role;
use crate::chat::{ChatStatus, RenderBlock, Surface};
use crate::leads::{LeadOutcome, LeadSink};
use crate::session::{ChatSession, RenderedMessage, SessionEvent, QUICK_REPLIES};
use crate::specui::{render as render_spec, StateBag};
use crate::widgets::mortgage::MortgageState;
use crate::widgets::viewing::{FormPhase, ViewingForm};
use crate::widgets::WidgetBlock;

use super::render;

/// One focusable interactive widget, in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Focusable {
    Mortgage(String),
    Form(String),
}

pub struct App {
    session: ChatSession,
    leads: LeadSink,
    messages: Vec<RenderedMessage>,
    status: ChatStatus,
    input: String,
    scroll_offset: usize,
    banner: Vec<Line<'static>>,
    mortgages: HashMap<String, MortgageState>,
    forms: HashMap<String, ViewingForm>,
    focusables: Vec<Focusable>,
    focus: Option<usize>,
    /// Outcome of a spawned lead submission, picked up on the next tick.
    lead_slot: Arc<Mutex<Option<(String, LeadOutcome)>>>,
}

impl App {
    pub fn new(session: ChatSession, leads: LeadSink) -> Self {
        let agent = session.agent().clone();
        let mut banner = vec![
            Line::from(Span::styled(
                format!("Chat with {} · {}", agent.name, agent.phone),
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                "Ask about neighbourhoods, taxes, mortgages, or booking a viewing.",
                Style::default().fg(Color::DarkGray),
            )),
        ];
        for (i, reply) in QUICK_REPLIES.iter().enumerate() {
            banner.push(Line::from(Span::styled(
                format!("  {}. {}", i + 1, reply),
                Style::default().fg(Color::DarkGray),
            )));
        }
        banner.push(Line::from(""));
        Self {
            session,
            leads,
            messages: Vec::new(),
            status: ChatStatus::Idle,
            input: String::new(),
            scroll_offset: 0,
            banner,
            mortgages: HashMap::new(),
            forms: HashMap::new(),
            focusables: Vec::new(),
            focus: None,
            lead_slot: Arc::new(Mutex::new(None)),
        }
    }

    /// Pull the latest composed view out of the session and sync local
    /// widget state with it.
    pub async fn refresh(&mut self) {
        self.status = self.session.status().await;
        self.messages = self.session.rendered(Surface::Inline).await;

        self.focusables.clear();
        for message in &self.messages {
            for (idx, block) in message.blocks.iter().enumerate() {
                let key = format!("{}/{}", message.id, idx);
                match block {
                    RenderBlock::Widget(WidgetBlock::MortgageCalculator { initial, .. }) => {
                        self.mortgages.entry(key.clone()).or_insert(*initial);
                        self.focusables.push(Focusable::Mortgage(key));
                    }
                    RenderBlock::Widget(WidgetBlock::ViewingForm { seed }) => {
                        self.forms
                            .entry(key.clone())
                            .or_insert_with(|| ViewingForm::new(seed.clone()));
                        self.focusables.push(Focusable::Form(key));
                    }
                    _ => {}
                }
            }
        }
        if let Some(i) = self.focus {
            if i >= self.focusables.len() {
                self.focus = None;
            }
        }
    }

    pub fn handle_event(&mut self, _event: SessionEvent) {
        // The event is only a wake-up; refresh() re-reads the session.
    }

    /// Apply results of background lead submissions.
    pub fn poll_background(&mut self) {
        let taken = self.lead_slot.lock().unwrap().take();
        if let Some((key, outcome)) = taken {
            if let Some(form) = self.forms.get_mut(&key) {
                if outcome.ok {
                    form.mark_confirmed();
                } else {
                    form.mark_failed(
                        outcome
                            .error
                            .unwrap_or_else(|| "Something went wrong.".to_string()),
                    );
                }
            }
        }
    }

    /// Returns true when the app should exit.
    pub fn handle_key(&mut self, key: KeyEvent) -> Result<bool> {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            match key.code {
                KeyCode::Char('c') | KeyCode::Char('d') => return Ok(true),
                KeyCode::Char('l') => {
                    let session = self.session.clone();
                    tokio::spawn(async move { session.clear().await });
                    self.mortgages.clear();
                    self.forms.clear();
                    self.focus = None;
                    return Ok(false);
                }
                _ => return Ok(false),
            }
        }

        // A focused viewing form in edit mode owns most keys.
        if let Some(Focusable::Form(key_name)) = self.focus.and_then(|i| self.focusables.get(i)).cloned() {
            if let Some(form) = self.forms.get_mut(&key_name) {
                if matches!(form.phase, FormPhase::Editing | FormPhase::Failed) {
                    match key.code {
                        KeyCode::Esc => {
                            self.focus = None;
                            return Ok(false);
                        }
                        KeyCode::Tab => {
                            form.next_field();
                            return Ok(false);
                        }
                        KeyCode::Char(ch) => {
                            form.active_value_mut().push(ch);
                            return Ok(false);
                        }
                        KeyCode::Backspace => {
                            form.active_value_mut().pop();
                            return Ok(false);
                        }
                        KeyCode::Enter => {
                            if form.phase == FormPhase::Failed {
                                form.retry();
                                return Ok(false);
                            }
                            if form.can_submit() {
                                form.mark_submitting();
                                let submission = form.to_submission();
                                let leads = self.leads.clone();
                                let slot = self.lead_slot.clone();
                                let slot_key = key_name.clone();
                                tokio::spawn(async move {
                                    let outcome = leads.submit(&submission).await;
                                    *slot.lock().unwrap() = Some((slot_key, outcome));
                                });
                            }
                            return Ok(false);
                        }
                        _ => {}
                    }
                }
            }
        }

        match key.code {
            KeyCode::Tab => {
                self.focus = match self.focus {
                    None if !self.focusables.is_empty() => Some(0),
                    Some(i) if i + 1 < self.focusables.len() => Some(i + 1),
                    _ => None,
                };
            }
            KeyCode::BackTab => {
                self.focus = match self.focus {
                    None if !self.focusables.is_empty() => Some(self.focusables.len() - 1),
                    Some(0) | None => None,
                    Some(i) => Some(i - 1),
                };
            }
            KeyCode::Esc => {
                if self.focus.is_some() {
                    self.focus = None;
                } else if self.status != ChatStatus::Idle {
                    let session = self.session.clone();
                    tokio::spawn(async move { session.stop().await });
                } else {
                    self.input.clear();
                }
            }
            KeyCode::Left | KeyCode::Right if self.focused_mortgage().is_some() => {
                let delta = if key.code == KeyCode::Left { -25_000.0 } else { 25_000.0 };
                if let Some(state) = self.focused_mortgage() {
                    state.adjust_price(delta);
                }
            }
            KeyCode::Char('+') | KeyCode::Char('=') if self.focused_mortgage().is_some() => {
                if let Some(state) = self.focused_mortgage() {
                    state.adjust_rate(0.1);
                }
            }
            KeyCode::Char('-') if self.focused_mortgage().is_some() => {
                if let Some(state) = self.focused_mortgage() {
                    state.adjust_rate(-0.1);
                }
            }
            KeyCode::Char(']') if self.focused_mortgage().is_some() => {
                if let Some(state) = self.focused_mortgage() {
                    state.adjust_down_payment(5.0);
                }
            }
            KeyCode::Char('[') if self.focused_mortgage().is_some() => {
                if let Some(state) = self.focused_mortgage() {
                    state.adjust_down_payment(-5.0);
                }
            }
            KeyCode::Char(ch @ '1'..='4') if self.input.is_empty() && self.focus.is_none() => {
                let idx = (ch as usize) - ('1' as usize);
                if let Some(reply) = QUICK_REPLIES.get(idx) {
                    self.submit_text(reply.to_string());
                }
            }
            KeyCode::Char(ch) => {
                self.input.push(ch);
            }
            KeyCode::Backspace => {
                self.input.pop();
            }
            KeyCode::Enter => {
                let text = self.input.trim().to_string();
                if !text.is_empty() {
                    self.input.clear();
                    self.submit_text(text);
                }
            }
            KeyCode::Up => {
                self.scroll_offset = self.scroll_offset.saturating_add(1);
            }
            KeyCode::Down => {
                self.scroll_offset = self.scroll_offset.saturating_sub(1);
            }
            KeyCode::PageUp => {
                self.scroll_offset = self.scroll_offset.saturating_add(10);
            }
            KeyCode::PageDown => {
                self.scroll_offset = self.scroll_offset.saturating_sub(10);
            }
            _ => {}
        }
        Ok(false)
    }

    fn focused_mortgage(&mut self) -> Option<&mut MortgageState> {
        if let Some(Focusable::Mortgage(key)) = self.focus.and_then(|i| self.focusables.get(i)) {
            let key = key.clone();
            return self.mortgages.get_mut(&key);
        }
        None
    }

    fn submit_text(&mut self, text: String) {
        let session = self.session.clone();
        self.scroll_offset = 0;
        tokio::spawn(async move {
            if let Err(e) = session.send(&text).await {
                warn!("send rejected: {}", e);
            }
        });
    }

    fn message_lines(&self) -> Vec<Line<'static>> {
        let mut lines: Vec<Line<'static>> = Vec::new();
        for message in &self.messages {
            match message.role {
                Role::User => {
                    for block in &message.blocks {
                        if let RenderBlock::Text { text } = block {
                            lines.extend(render::render_user_message(text));
                        }
                    }
                }
                Role::Assistant => {
                    for (idx, block) in message.blocks.iter().enumerate() {
                        let key = format!("{}/{}", message.id, idx);
                        let focused = matches!(
                            self.focus.and_then(|i| self.focusables.get(i)),
                            Some(Focusable::Mortgage(k) | Focusable::Form(k)) if *k == key
                        );
                        match block {
                            RenderBlock::Text { text } => {
                                lines.extend(render::render_assistant_text(text));
                            }
                            RenderBlock::Widget(WidgetBlock::MortgageCalculator { .. }) => {
                                if let Some(state) = self.mortgages.get(&key) {
                                    lines.extend(render::render_mortgage(state, focused));
                                }
                            }
                            RenderBlock::Widget(WidgetBlock::ViewingForm { .. }) => {
                                if let Some(form) = self.forms.get(&key) {
                                    lines.extend(render::render_viewing(form, focused));
                                }
                            }
                            RenderBlock::Widget(widget) => {
                                lines.extend(render::render_widget(widget));
                            }
                            RenderBlock::Spec { spec } => {
                                let bag = StateBag::seeded(&spec.initial_state);
                                lines.extend(render::render_spec_nodes(&render_spec(spec, &bag)));
                            }
                            RenderBlock::Typing => {
                                lines.extend(render::render_typing());
                            }
                        }
                    }
                }
            }
            lines.push(Line::from(""));
        }
        lines
    }

    pub fn render(&mut self, f: &mut ratatui::Frame) {
        use ratatui::layout::{Constraint, Direction, Layout};

        // Fixed bottom: divider(1) + input(1) + status(1)
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(1), Constraint::Length(3)])
            .split(f.area());
        let content_area = chunks[0];
        let input_area = chunks[1];
        let width = content_area.width;
        let content_height = content_area.height as usize;

        let mut all_lines: Vec<Line<'static>> = self.banner.clone();
        all_lines.extend(self.message_lines());

        // Account for wrapping when clamping the scroll position.
        let total_wrapped: usize = all_lines
            .iter()
            .map(|line| {
                let w = line.width();
                if w == 0 || width == 0 {
                    1
                } else {
                    (w + width as usize - 1) / width as usize
                }
            })
            .sum();
        let max_scroll = total_wrapped.saturating_sub(content_height);
        self.scroll_offset = self.scroll_offset.min(max_scroll);
        let scroll_y = max_scroll.saturating_sub(self.scroll_offset);

        let output = Paragraph::new(Text::from(all_lines))
            .wrap(Wrap { trim: false })
            .scroll((scroll_y as u16, 0));
        f.render_widget(output, content_area);

        let divider = "─".repeat(width as usize);
        let input_line = Line::from(vec![
            Span::styled(
                "> ",
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(self.input.clone()),
        ]);

        let (status_label, status_color) = match self.status {
            ChatStatus::Idle => ("idle", Color::DarkGray),
            ChatStatus::Submitted => ("sending", Color::Yellow),
            ChatStatus::Streaming => ("replying", Color::Green),
        };
        let mut status_spans = vec![Span::styled(
            format!(" {status_label} "),
            Style::default().fg(Color::Black).bg(status_color),
        )];
        let hint = if self.focus.is_some() {
            "  Esc unfocus · Tab next"
        } else if self.status != ChatStatus::Idle {
            "  Esc stop"
        } else {
            "  Tab focus widgets · 1-4 quick replies · Ctrl+L clear · Ctrl+C quit"
        };
        status_spans.push(Span::styled(hint, Style::default().fg(Color::DarkGray)));

        let bottom = Paragraph::new(vec![
            Line::from(Span::styled(divider, Style::default().fg(Color::DarkGray))),
            input_line,
            Line::from(status_spans),
        ]);
        f.render_widget(bottom, input_area);

        let cursor_y = input_area.y + 1;
        let cursor_x = input_area.x + 2 + self.input.len() as u16;
        f.set_cursor_position((cursor_x, cursor_y));
    }
}
