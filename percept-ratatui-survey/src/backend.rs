//! Ratatui frontend for the pairwise image survey.
//!
//! Shows the question, both images side by side, the per-question time bar
//! and any open modal. The survey controller decides flow; this module only
//! turns key presses and clicks into controller calls and draws the view.

use std::io::{self, Stdout};
use std::time::Duration;

use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, MouseButton,
        MouseEventKind,
    },
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use percept::{
    Answer, Choice, ImageLoader, Modal, SubmissionOutcome, Submitter, Survey, SurveyAction,
    SurveyConfig, SurveyError,
};
use ratatui::{
    Frame, Terminal,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    prelude::CrosstermBackend,
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Gauge, Paragraph, Wrap},
};
use thiserror::Error;

use crate::view::{ShownImage, TerminalView, emphasis_runs};

/// Smallest terminal the survey can be drawn in.
const MIN_WIDTH: u16 = 60;
const MIN_HEIGHT: u16 = 20;

/// Error type for the Ratatui survey frontend.
#[derive(Debug, Error)]
pub enum RatatuiSurveyError {
    /// User left the survey before it finished (e.g., confirmed Esc).
    #[error("Survey cancelled by user")]
    Cancelled,

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Terminal setup/restore error.
    #[error("Terminal error: {0}")]
    Terminal(String),

    /// The survey itself failed.
    #[error(transparent)]
    Survey(#[from] SurveyError),
}

/// Color theme for the TUI.
#[derive(Debug, Clone)]
pub struct Theme {
    pub primary: Color,
    pub secondary: Color,
    pub text: Color,
    pub highlight: Color,
    pub error: Color,
    pub success: Color,
    pub border: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            primary: Color::Cyan,
            secondary: Color::Blue,
            text: Color::White,
            highlight: Color::Yellow,
            error: Color::Red,
            success: Color::Green,
            border: Color::Gray,
        }
    }
}

/// How a survey session in the terminal ended.
#[derive(Debug, Clone)]
pub struct SurveyExit {
    /// Every recorded answer, whether or not it was saved.
    pub answers: Vec<Answer>,
    /// The submission result, if the survey reached its end.
    pub outcome: Option<SubmissionOutcome>,
    /// Where the survey asked to go next.
    pub navigated_to: Option<String>,
}

/// Ratatui-based terminal frontend for pairwise image surveys.
#[derive(Debug, Clone)]
pub struct RatatuiSurvey {
    /// Title shown at the top.
    title: String,
    /// Color theme for the UI.
    theme: Theme,
    /// How often the time bar is refreshed.
    tick_rate: Duration,
}

impl Default for RatatuiSurvey {
    fn default() -> Self {
        Self::new()
    }
}

impl RatatuiSurvey {
    /// Create a frontend with default settings.
    pub fn new() -> Self {
        Self {
            title: "Survey".to_string(),
            theme: Theme::default(),
            tick_rate: Duration::from_millis(100),
        }
    }

    /// Set the title shown at the top.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Set a custom color theme.
    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    /// Set the time bar refresh interval.
    pub fn with_tick_rate(mut self, tick_rate: Duration) -> Self {
        self.tick_rate = tick_rate;
        self
    }

    /// Run the survey until it navigates away, finishes or is cancelled.
    pub fn run<L, S>(
        &self,
        config: SurveyConfig,
        loader: L,
        submitter: S,
    ) -> Result<SurveyExit, RatatuiSurveyError>
    where
        L: ImageLoader,
        S: Submitter,
    {
        let mut terminal = self.setup_terminal()?;
        let result = self.run_loop(&mut terminal, config, loader, submitter);
        self.restore_terminal(&mut terminal)?;
        result
    }

    fn setup_terminal(&self) -> Result<Terminal<CrosstermBackend<Stdout>>, RatatuiSurveyError> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;
        Ok(terminal)
    }

    fn restore_terminal(
        &self,
        terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    ) -> Result<(), RatatuiSurveyError> {
        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
        terminal.show_cursor()?;
        Ok(())
    }

    fn run_loop<L, S>(
        &self,
        terminal: &mut Terminal<CrosstermBackend<Stdout>>,
        config: SurveyConfig,
        loader: L,
        submitter: S,
    ) -> Result<SurveyExit, RatatuiSurveyError>
    where
        L: ImageLoader,
        S: Submitter,
    {
        let size = terminal.size()?;
        if size.width < MIN_WIDTH || size.height < MIN_HEIGHT {
            return Err(RatatuiSurveyError::Terminal(format!(
                "terminal is {}x{}, the survey needs at least {MIN_WIDTH}x{MIN_HEIGHT}",
                size.width, size.height
            )));
        }

        terminal.draw(|frame| draw_splash(frame, &self.title, &self.theme))?;
        let mut survey = Survey::builder(config, TerminalView::new(), loader, submitter).start()?;

        loop {
            survey.tick();
            terminal.draw(|frame| draw_ui(frame, survey.view(), &self.title, &self.theme))?;

            if survey.view().navigated_to.is_some() {
                break;
            }
            if !event::poll(self.tick_rate)? {
                continue;
            }

            let flow = match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    handle_key(&mut survey, key.code)?
                }
                Event::Mouse(mouse) if mouse.kind == MouseEventKind::Down(MouseButton::Left) => {
                    let size = terminal.size()?;
                    let area = Rect::new(0, 0, size.width, size.height);
                    handle_click(&mut survey, area, mouse.column, mouse.row)?;
                    Flow::Continue
                }
                _ => Flow::Continue,
            };

            match flow {
                Flow::Continue => {}
                Flow::Stop => break,
                Flow::Cancel => return Err(RatatuiSurveyError::Cancelled),
            }
        }

        Ok(SurveyExit {
            answers: survey.answers().to_vec(),
            outcome: survey.outcome().cloned(),
            navigated_to: survey.view().navigated_to.clone(),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Stop,
    Cancel,
}

/// Pick an image, ignoring clicks the survey is not waiting for.
fn choose<L, S>(survey: &mut Survey<TerminalView, L, S>, choice: Choice) -> Result<(), SurveyError>
where
    L: ImageLoader,
    S: Submitter,
{
    survey.view_mut().highlighted = choice.option();
    match survey.choose(choice) {
        Err(SurveyError::NotPresenting) => {
            tracing::debug!("click ignored while images load");
            Ok(())
        }
        other => other,
    }
}

fn handle_key<L, S>(
    survey: &mut Survey<TerminalView, L, S>,
    code: KeyCode,
) -> Result<Flow, SurveyError>
where
    L: ImageLoader,
    S: Submitter,
{
    let view = survey.view_mut();

    if view.confirm_leave {
        match code {
            KeyCode::Char('y') | KeyCode::Char('Y') => return Ok(Flow::Cancel),
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => view.confirm_leave = false,
            _ => {}
        }
        return Ok(Flow::Continue);
    }

    if let Some(modal) = view.modals.last() {
        let last = modal.buttons().len().saturating_sub(1);
        match code {
            KeyCode::Left | KeyCode::Up | KeyCode::BackTab => {
                view.modal_selected = view.modal_selected.saturating_sub(1);
            }
            KeyCode::Right | KeyCode::Down | KeyCode::Tab => {
                view.modal_selected = (view.modal_selected + 1).min(last);
            }
            KeyCode::Enter => {
                if let Some(action) = modal.press(view.modal_selected).copied() {
                    survey.modal_action(action)?;
                }
            }
            KeyCode::Esc => return Ok(request_leave(view)),
            _ => {}
        }
        return Ok(Flow::Continue);
    }

    if view.done {
        return Ok(match code {
            KeyCode::Enter | KeyCode::Esc | KeyCode::Char('q') => Flow::Stop,
            _ => Flow::Continue,
        });
    }

    match code {
        KeyCode::Left => view.highlighted = 0,
        KeyCode::Right => view.highlighted = 1,
        KeyCode::Enter | KeyCode::Char(' ') => {
            let highlighted = view.highlighted;
            if let Some(choice) = Choice::from_option(highlighted) {
                choose(survey, choice)?;
            }
        }
        KeyCode::Char('1') => choose(survey, Choice::Left)?,
        KeyCode::Char('2') => choose(survey, Choice::Right)?,
        KeyCode::Esc => return Ok(request_leave(view)),
        _ => {}
    }
    Ok(Flow::Continue)
}

/// Leave at once, or ask first while unsaved answers would be lost.
fn request_leave(view: &mut TerminalView) -> Flow {
    if view.unload_guard.is_some() {
        view.confirm_leave = true;
        Flow::Continue
    } else {
        Flow::Stop
    }
}

fn handle_click<L, S>(
    survey: &mut Survey<TerminalView, L, S>,
    area: Rect,
    column: u16,
    row: u16,
) -> Result<(), SurveyError>
where
    L: ImageLoader,
    S: Submitter,
{
    let view = survey.view();
    if !view.modals.is_empty() || view.confirm_leave || view.end_message.is_some() {
        return Ok(());
    }

    let areas = SurveyAreas::new(area, view.time_bar.is_some());
    let hit = |rect: Rect| {
        column >= rect.x && column < rect.x + rect.width && row >= rect.y && row < rect.y + rect.height
    };
    if hit(areas.left) {
        choose(survey, Choice::Left)
    } else if hit(areas.right) {
        choose(survey, Choice::Right)
    } else {
        Ok(())
    }
}

/// Screen regions of the survey layout.
struct SurveyAreas {
    header: Rect,
    question: Rect,
    time_bar: Rect,
    left: Rect,
    right: Rect,
    help: Rect,
}

impl SurveyAreas {
    fn new(area: Rect, with_time_bar: bool) -> Self {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .margin(1)
            .constraints([
                Constraint::Length(3),                                // Header
                Constraint::Length(3),                                // Question
                Constraint::Length(if with_time_bar { 1 } else { 0 }), // Time bar
                Constraint::Min(8),                                   // Images
                Constraint::Length(3),                                // Help
            ])
            .split(area);

        let images = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(chunks[3]);

        Self {
            header: chunks[0],
            question: chunks[1],
            time_bar: chunks[2],
            left: images[0],
            right: images[1],
            help: chunks[4],
        }
    }
}

fn draw_splash(frame: &mut Frame, title: &str, theme: &Theme) {
    let area = frame.area();
    let paragraph = Paragraph::new(format!("{title}\n\nLoading..."))
        .style(Style::default().fg(theme.primary))
        .alignment(Alignment::Center);
    let centered = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(45),
            Constraint::Min(3),
            Constraint::Percentage(45),
        ])
        .split(area);
    frame.render_widget(paragraph, centered[1]);
}

fn draw_ui(frame: &mut Frame, view: &TerminalView, title: &str, theme: &Theme) {
    if let Some(message) = &view.end_message {
        draw_end(frame, view, message, theme);
    } else {
        draw_survey(frame, view, title, theme);
    }

    if let Some(modal) = view.modals.last() {
        draw_modal(frame, modal, view.modal_selected, theme);
    }
    if view.confirm_leave {
        let message = view.unload_guard.as_deref().unwrap_or_default();
        draw_confirm_leave(frame, message, theme);
    }
}

fn draw_survey(frame: &mut Frame, view: &TerminalView, title: &str, theme: &Theme) {
    let areas = SurveyAreas::new(frame.area(), view.time_bar.is_some());

    // Header
    let header = Paragraph::new(title.to_string())
        .style(Style::default().fg(theme.primary).bold())
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::BOTTOM)
                .border_style(Style::default().fg(theme.border)),
        );
    frame.render_widget(header, areas.header);

    // Question with emphasized variables
    let spans: Vec<Span> = emphasis_runs(&view.question)
        .into_iter()
        .map(|(text, bold)| {
            let style = if bold {
                Style::default().fg(theme.highlight).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(theme.text)
            };
            Span::styled(text.to_string(), style)
        })
        .collect();
    let question = Paragraph::new(Line::from(spans))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    frame.render_widget(question, areas.question);

    // Time bar
    if let Some(state) = &view.time_bar {
        let color = if state.exceeding {
            theme.error
        } else {
            theme.primary
        };
        let gauge = Gauge::default()
            .ratio((state.progress_percent / 100.0).clamp(0.0, 1.0))
            .label(state.label.clone())
            .gauge_style(Style::default().fg(color));
        frame.render_widget(gauge, areas.time_bar);
    }

    // Images
    let images = view.images.as_ref();
    draw_image(
        frame,
        areas.left,
        " [1] ",
        images.map(|(left, _)| left),
        view,
        view.highlighted == 0,
        theme,
    );
    draw_image(
        frame,
        areas.right,
        " [2] ",
        images.map(|(_, right)| right),
        view,
        view.highlighted == 1,
        theme,
    );

    // Help
    let help = Paragraph::new("←/→ highlight • Enter choose • 1/2 pick directly • Esc leave")
        .style(Style::default().fg(theme.secondary))
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::TOP)
                .border_style(Style::default().fg(theme.border)),
        );
    frame.render_widget(help, areas.help);
}

fn draw_image(
    frame: &mut Frame,
    area: Rect,
    label: &str,
    image: Option<&ShownImage>,
    view: &TerminalView,
    highlighted: bool,
    theme: &Theme,
) {
    let border = if highlighted && !view.loading {
        theme.highlight
    } else {
        theme.border
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border))
        .title(label.to_string())
        .title_style(Style::default().fg(theme.primary));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let content = match image {
        None => Paragraph::new("Loading...").style(Style::default().fg(theme.secondary)),
        Some(image) => match image.preview(inner.width, inner.height.saturating_sub(1)) {
            Some(mut lines) => {
                lines.push(Line::from(Span::styled(
                    image.url.clone(),
                    Style::default().fg(theme.border),
                )));
                Paragraph::new(lines)
            }
            None => Paragraph::new(format!(
                "{}\n{}x{}",
                image.url, image.width, image.height
            ))
            .style(Style::default().fg(theme.text)),
        },
    };
    frame.render_widget(content.alignment(Alignment::Center), inner);
}

fn draw_end(frame: &mut Frame, view: &TerminalView, message: &str, theme: &Theme) {
    let area = frame.area();
    let color = if view.done { theme.success } else { theme.primary };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(color))
        .title(" Complete ")
        .title_style(Style::default().fg(color).bold());

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let text = if view.done {
        "Thank you!\n\nPress Enter to finish.".to_string()
    } else {
        message.to_string()
    };
    let paragraph = Paragraph::new(text)
        .style(Style::default().fg(theme.text))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });

    let centered = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(40),
            Constraint::Min(3),
            Constraint::Percentage(40),
        ])
        .split(inner);

    frame.render_widget(paragraph, centered[1]);
}

fn draw_modal(frame: &mut Frame, modal: &Modal<SurveyAction>, selected: usize, theme: &Theme) {
    let area = centered_rect(60, 40, frame.area());
    frame.render_widget(Clear, area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.error))
        .title(format!(" {} ", modal.title()))
        .title_style(Style::default().fg(theme.error).bold());
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([Constraint::Min(3), Constraint::Length(1)])
        .split(inner);

    let body = Paragraph::new(modal.plain_body())
        .style(Style::default().fg(theme.text))
        .wrap(Wrap { trim: true });
    frame.render_widget(body, chunks[0]);

    let mut spans = Vec::new();
    for (index, label) in modal.labels().into_iter().enumerate() {
        let style = if index == selected {
            Style::default().fg(theme.highlight).add_modifier(Modifier::REVERSED)
        } else {
            Style::default().fg(theme.text)
        };
        spans.push(Span::styled(format!("[ {label} ]"), style));
        spans.push(Span::raw("  "));
    }
    let buttons = Paragraph::new(Line::from(spans)).alignment(Alignment::Center);
    frame.render_widget(buttons, chunks[1]);
}

fn draw_confirm_leave(frame: &mut Frame, message: &str, theme: &Theme) {
    let area = centered_rect(50, 25, frame.area());
    frame.render_widget(Clear, area);

    let paragraph = Paragraph::new(format!("{message}\n\n[y] leave   [n] stay"))
        .style(Style::default().fg(theme.text))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.highlight))
                .title(" Leave survey? "),
        );
    frame.render_widget(paragraph, area);
}

/// A rectangle of the given percentage size centered in `area`.
fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}
