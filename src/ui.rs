//! TUI module using ratatui.
//!
//! One screen: URL field, style and model selectors, question field, output
//! pane and a status line. Each Enter press runs one action to completion
//! before input is read again.

use crate::session::{Orchestrator, Outcome, Session};
use crate::summary::{ModelId, SummaryRequest, SummaryStyle};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, Paragraph, Wrap};
use ratatui::{DefaultTerminal, Frame};
use tracing::debug;

const TITLE: &str = "🌐 Webpage Summarizer & Q&A 🤖";
const SUMMARIZE_BUSY: &str = "Extracting and summarizing content... ⏳";
const ANSWER_BUSY: &str = "Generating answer... ⏳";
const HELP: &str = "Tab: next field  ←/→: change option  Enter: run  Ctrl-U: clear  Esc: quit";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Url,
    Style,
    Model,
    Question,
}

impl Focus {
    const ORDER: [Focus; 4] = [Focus::Url, Focus::Style, Focus::Model, Focus::Question];

    fn next(self) -> Self {
        cycle(&Self::ORDER, self, true)
    }

    fn prev(self) -> Self {
        cycle(&Self::ORDER, self, false)
    }
}

/// What the event loop must do after a key press
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Summarize,
    Answer,
    Quit,
}

/// Widget state of the TUI
#[derive(Debug, Clone)]
pub struct App {
    pub url: String,
    pub question: String,
    pub style: SummaryStyle,
    pub model: ModelId,
    pub focus: Focus,
    output: Option<Outcome>,
    busy: Option<&'static str>,
}

impl App {
    pub fn new(request: SummaryRequest) -> Self {
        Self {
            url: String::new(),
            question: String::new(),
            style: request.style,
            model: request.model,
            focus: Focus::Url,
            output: None,
            busy: None,
        }
    }

    pub fn request(&self) -> SummaryRequest {
        SummaryRequest::new(self.style, self.model)
    }

    pub fn output(&self) -> Option<&Outcome> {
        self.output.as_ref()
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Option<Action> {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Esc => return Some(Action::Quit),
            KeyCode::Char('c') if ctrl => return Some(Action::Quit),
            KeyCode::Char('u') if ctrl => {
                if let Some(field) = self.focused_input() {
                    field.clear();
                }
            }
            KeyCode::Tab => self.focus = self.focus.next(),
            KeyCode::BackTab => self.focus = self.focus.prev(),
            KeyCode::Enter => {
                return Some(match self.focus {
                    Focus::Question => Action::Answer,
                    _ => Action::Summarize,
                })
            }
            KeyCode::Left | KeyCode::Right => {
                let forward = key.code == KeyCode::Right;
                match self.focus {
                    Focus::Style => self.style = cycle(&SummaryStyle::ALL, self.style, forward),
                    Focus::Model => self.model = cycle(&ModelId::ALL, self.model, forward),
                    _ => {}
                }
            }
            KeyCode::Backspace => {
                if let Some(field) = self.focused_input() {
                    field.pop();
                }
            }
            KeyCode::Char(c) if !ctrl => {
                if let Some(field) = self.focused_input() {
                    field.push(c);
                }
            }
            _ => {}
        }
        None
    }

    fn focused_input(&mut self) -> Option<&mut String> {
        match self.focus {
            Focus::Url => Some(&mut self.url),
            Focus::Question => Some(&mut self.question),
            Focus::Style | Focus::Model => None,
        }
    }

    fn start(&mut self, message: &'static str) {
        self.busy = Some(message);
    }

    fn finish(&mut self, outcome: Outcome) {
        self.busy = None;
        self.output = Some(outcome);
    }

    pub fn render(&self, frame: &mut Frame<'_>, session: &Session) {
        let [title, url, selectors, question, output, status] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .areas(frame.area());
        let [style_area, model_area] =
            Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)])
                .areas(selectors);

        frame.render_widget(
            Paragraph::new(TITLE).style(Style::new().add_modifier(Modifier::BOLD)),
            title,
        );
        self.render_input(frame, url, Focus::Url, "Website URL", &self.url);
        self.render_selector(frame, style_area, Focus::Style, "Summary Type", self.style.label());
        self.render_selector(frame, model_area, Focus::Model, "Model Type", self.model.as_str());
        self.render_input(
            frame,
            question,
            Focus::Question,
            "Ask a question based on the webpage",
            &self.question,
        );

        frame.render_widget(
            Paragraph::new(output_text(self.output.as_ref()))
                .block(Block::bordered().title("Output"))
                .wrap(Wrap { trim: false }),
            output,
        );
        frame.render_widget(Paragraph::new(self.status_line(session)), status);
    }

    fn render_input(
        &self,
        frame: &mut Frame<'_>,
        area: Rect,
        field: Focus,
        title: &str,
        value: &str,
    ) {
        frame.render_widget(
            Paragraph::new(value).block(self.block(field, title)),
            area,
        );
        if self.focus == field && self.busy.is_none() {
            let offset = u16::try_from(value.chars().count()).unwrap_or(u16::MAX);
            let x = area.x.saturating_add(1).saturating_add(offset);
            frame.set_cursor_position((x.min(area.right().saturating_sub(2)), area.y + 1));
        }
    }

    fn render_selector(
        &self,
        frame: &mut Frame<'_>,
        area: Rect,
        field: Focus,
        title: &str,
        value: &str,
    ) {
        let line = Line::from(vec![
            Span::raw("◀ "),
            Span::raw(value.to_string()),
            Span::raw(" ▶"),
        ]);
        frame.render_widget(Paragraph::new(line).block(self.block(field, title)), area);
    }

    fn block(&self, field: Focus, title: &str) -> Block<'static> {
        let block = Block::bordered().title(title.to_string());
        if self.focus == field {
            block.border_style(Style::new().fg(Color::Yellow))
        } else {
            block
        }
    }

    fn status_line(&self, session: &Session) -> Line<'static> {
        if let Some(busy) = self.busy {
            return Line::from(Span::styled(busy, Style::new().fg(Color::Cyan)));
        }
        match session.page() {
            Some(page) => Line::from(format!(
                "Stored: {} ({} chars, {})  |  {}",
                page.title.as_deref().unwrap_or(&page.url),
                page.char_count(),
                page.fetched_at.format("%H:%M:%S"),
                HELP
            )),
            None => Line::from(HELP),
        }
    }
}

fn output_text(outcome: Option<&Outcome>) -> Text<'static> {
    let Some(outcome) = outcome else {
        return Text::from("Enter a URL and press Enter to summarize.");
    };
    let mut lines = Vec::new();
    if let Some(heading) = outcome.heading() {
        lines.push(Line::from(Span::styled(
            heading.to_string(),
            Style::new().add_modifier(Modifier::BOLD),
        )));
        lines.push(Line::default());
    }
    match outcome {
        Outcome::Summary { text, .. } | Outcome::Answer { text } => {
            lines.extend(text.lines().map(|line| Line::from(line.to_string())));
        }
        Outcome::Warning(message) => lines.push(Line::from(Span::styled(
            format!("⚠️ {message}"),
            Style::new().fg(Color::Yellow),
        ))),
        Outcome::Error(message) => lines.push(Line::from(Span::styled(
            message.clone(),
            Style::new().fg(Color::Red),
        ))),
    }
    Text::from(lines)
}

fn cycle<T: Copy + PartialEq>(all: &[T], current: T, forward: bool) -> T {
    let len = all.len();
    let idx = all.iter().position(|item| *item == current).unwrap_or(0);
    let next = if forward { (idx + 1) % len } else { (idx + len - 1) % len };
    all[next]
}

/// Run the TUI until the user quits
pub async fn run(orchestrator: &Orchestrator, request: SummaryRequest) -> std::io::Result<()> {
    let mut terminal = ratatui::init();
    let result = event_loop(&mut terminal, orchestrator, App::new(request)).await;
    ratatui::restore();
    result
}

async fn event_loop(
    terminal: &mut DefaultTerminal,
    orchestrator: &Orchestrator,
    mut app: App,
) -> std::io::Result<()> {
    let mut session = Session::new();
    debug!(extractor = orchestrator.extractor_name(), "tui started");

    loop {
        terminal.draw(|frame| app.render(frame, &session))?;

        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        match app.handle_key(key) {
            Some(Action::Quit) => return Ok(()),
            Some(Action::Summarize) => {
                app.start(SUMMARIZE_BUSY);
                terminal.draw(|frame| app.render(frame, &session))?;
                let outcome = orchestrator
                    .summarize(&mut session, &app.url, app.request())
                    .await;
                app.finish(outcome);
            }
            Some(Action::Answer) => {
                app.start(ANSWER_BUSY);
                terminal.draw(|frame| app.render(frame, &session))?;
                let outcome = orchestrator
                    .answer(&mut session, &app.question, app.model)
                    .await;
                app.finish(outcome);
            }
            None => {}
        }
    }
}
