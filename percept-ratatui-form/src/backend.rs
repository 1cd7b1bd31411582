//! Ratatui frontend for [`RegularForm`].
//!
//! Displays every question at once in a scrollable form with keyboard navigation.

use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers,
    },
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use percept::{
    AGREEMENT_LABELS, FormOutcome, RegularForm, RegularQuestion, RegularResponse, SCALE_POINTS,
    Submitter, SurveyError,
};
use ratatui::{
    Frame, Terminal,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    prelude::CrosstermBackend,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState},
};
use std::io::{self, Stdout};
use thiserror::Error;

/// Error type for the Ratatui form frontend.
#[derive(Debug, Error)]
pub enum RatatuiFormError {
    /// User cancelled the form (e.g., pressed Esc).
    #[error("Form cancelled by user")]
    Cancelled,

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Terminal setup/restore error.
    #[error("Terminal error: {0}")]
    Terminal(String),

    /// The answers could not be submitted.
    #[error(transparent)]
    Survey(#[from] SurveyError),
}

/// Color theme for the TUI form.
#[derive(Debug, Clone)]
pub struct Theme {
    pub primary: Color,
    pub secondary: Color,
    pub background: Color,
    pub text: Color,
    pub highlight: Color,
    pub error: Color,
    pub success: Color,
    pub border: Color,
    pub selected_bg: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            primary: Color::Cyan,
            secondary: Color::Blue,
            background: Color::Reset,
            text: Color::White,
            highlight: Color::Yellow,
            error: Color::Red,
            success: Color::Green,
            border: Color::Gray,
            selected_bg: Color::DarkGray,
        }
    }
}

/// Ratatui form frontend that displays all questions at once.
#[derive(Debug, Clone)]
pub struct RatatuiForm {
    /// Title shown at the top of the form.
    title: String,
    /// Color theme for the UI.
    theme: Theme,
}

impl Default for RatatuiForm {
    fn default() -> Self {
        Self::new()
    }
}

impl RatatuiForm {
    /// Create a new Ratatui form frontend with default settings.
    pub fn new() -> Self {
        Self {
            title: "Form".to_string(),
            theme: Theme::default(),
        }
    }

    /// Set the title shown at the top of the form.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Set a custom color theme.
    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    /// Let the user fill in `form` until the backend accepts it.
    ///
    /// Returns the `next_step` the backend named, if any. Validation and
    /// backend errors stay on screen next to their questions.
    pub fn run<S: Submitter>(
        &self,
        form: &mut RegularForm<S>,
    ) -> Result<Option<String>, RatatuiFormError> {
        let mut terminal = self.setup_terminal()?;
        let result = self.run_loop(&mut terminal, form);
        self.restore_terminal(&mut terminal)?;
        result
    }

    fn setup_terminal(&self) -> Result<Terminal<CrosstermBackend<Stdout>>, RatatuiFormError> {
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
    ) -> Result<(), RatatuiFormError> {
        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
        terminal.show_cursor()?;
        Ok(())
    }

    fn run_loop<S: Submitter>(
        &self,
        terminal: &mut Terminal<CrosstermBackend<Stdout>>,
        form: &mut RegularForm<S>,
    ) -> Result<Option<String>, RatatuiFormError> {
        let mut state = FormState::new(form.questions().len());

        loop {
            terminal.draw(|frame| draw_form(frame, &mut state, form, &self.title, &self.theme))?;

            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                match handle_key(&mut state, form, key)? {
                    Flow::Continue => {}
                    Flow::Cancel => return Err(RatatuiFormError::Cancelled),
                    Flow::Saved(next_step) => return Ok(next_step),
                }
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Flow {
    Continue,
    Cancel,
    Saved(Option<String>),
}

/// What pressing select on the highlighted line does.
#[derive(Debug, Clone, Copy)]
enum Pick {
    Toggle(usize),
    Select(usize),
    Other,
    Row { row: usize, column: usize },
}

/// Cursor and scroll state; answers live in the form itself.
struct FormState {
    focused_idx: usize,
    /// Whether the submit button is focused
    submit_focused: bool,
    /// Highlighted line per question (option, "other" entry or matrix row)
    highlights: Vec<usize>,
    /// Highlighted scale column per matrix question
    columns: Vec<usize>,
    /// Text cursor per question, in characters
    cursors: Vec<usize>,
    /// Scroll offset in rows
    scroll_offset: u16,
}

impl FormState {
    fn new(questions: usize) -> Self {
        Self {
            focused_idx: 0,
            submit_focused: false,
            highlights: vec![0; questions],
            columns: vec![0; questions],
            cursors: vec![0; questions],
            scroll_offset: 0,
        }
    }

    fn next_field(&mut self) {
        if self.submit_focused {
            return;
        }
        if self.focused_idx + 1 < self.highlights.len() {
            self.focused_idx += 1;
        } else {
            self.submit_focused = true;
        }
    }

    fn prev_field(&mut self) {
        if self.submit_focused {
            self.submit_focused = false;
        } else {
            self.focused_idx = self.focused_idx.saturating_sub(1);
        }
    }

    fn focus_first_error<S: Submitter>(&mut self, form: &RegularForm<S>) {
        if let Some(&index) = form.errors().keys().next() {
            self.focused_idx = index;
            self.submit_focused = false;
        }
    }

    fn focused<'a, S: Submitter>(&self, form: &'a RegularForm<S>) -> Option<&'a RegularQuestion> {
        if self.submit_focused {
            return None;
        }
        form.questions().get(self.focused_idx)
    }

    fn is_selection_field<S: Submitter>(&self, form: &RegularForm<S>) -> bool {
        self.focused(form)
            .is_some_and(|question| selectable_lines(question) > 0)
    }

    /// Whether typed characters go into a text answer.
    fn is_editing_text<S: Submitter>(&self, form: &RegularForm<S>) -> bool {
        let Some(question) = self.focused(form) else {
            return false;
        };
        match question {
            RegularQuestion::OpenShort { .. } => true,
            RegularQuestion::MultipleChoice { options, .. }
            | RegularQuestion::SingleChoice { options, .. } => {
                self.highlights[self.focused_idx] == options.len()
                    && other_text(&form.responses()[self.focused_idx]).is_some()
            }
            _ => false,
        }
    }

    fn option_up<S: Submitter>(&mut self, form: &RegularForm<S>) {
        if let Some(question) = self.focused(form) {
            let lines = selectable_lines(question);
            if lines > 0 {
                let highlight = &mut self.highlights[self.focused_idx];
                *highlight = (*highlight + lines - 1) % lines;
            }
        }
    }

    fn option_down<S: Submitter>(&mut self, form: &RegularForm<S>) {
        if let Some(question) = self.focused(form) {
            let lines = selectable_lines(question);
            if lines > 0 {
                let highlight = &mut self.highlights[self.focused_idx];
                *highlight = (*highlight + 1) % lines;
            }
        }
    }

    fn column_left(&mut self) {
        let column = &mut self.columns[self.focused_idx];
        *column = column.saturating_sub(1);
    }

    fn column_right(&mut self) {
        let column = &mut self.columns[self.focused_idx];
        *column = (*column + 1).min(SCALE_POINTS - 1);
    }

    fn pick_highlighted<S: Submitter>(&self, form: &RegularForm<S>) -> Option<Pick> {
        let highlight = self.highlights[self.focused_idx];
        pick_at(self.focused(form)?, highlight, self.columns[self.focused_idx])
    }

    fn apply<S: Submitter>(&mut self, form: &mut RegularForm<S>, pick: Pick) {
        let index = self.focused_idx;
        let Some(response) = form.response_mut(index) else {
            return;
        };
        match pick {
            Pick::Toggle(option) => response.toggle(option),
            Pick::Select(option) => response.select(option),
            Pick::Other => {
                response.toggle_other();
                self.cursors[index] = other_text(response).map_or(0, |text| text.chars().count());
            }
            Pick::Row { row, column } => {
                response.select_row(row, column);
                self.columns[index] = column;
            }
        }
        form.clear_error(index);
    }

    /// Quick select with digit keys, 1-based.
    fn pick_number<S: Submitter>(&mut self, form: &mut RegularForm<S>, number: usize) {
        let Some(question) = self.focused(form) else {
            return;
        };
        let Some(option) = number.checked_sub(1) else {
            return;
        };
        let highlight = self.highlights[self.focused_idx];
        let pick = match question {
            RegularQuestion::MultipleChoice { options, .. } if option < options.len() => {
                Pick::Toggle(option)
            }
            RegularQuestion::SingleChoice { options, .. } if option < options.len() => {
                Pick::Select(option)
            }
            RegularQuestion::AgreementScale { .. } if option < SCALE_POINTS => Pick::Select(option),
            RegularQuestion::Matrix { rows, .. } if option < SCALE_POINTS => {
                let row = highlight.min(rows.len().saturating_sub(1));
                Pick::Row {
                    row,
                    column: option,
                }
            }
            _ => return,
        };
        let rows = match question {
            RegularQuestion::Matrix { rows, .. } => Some(rows.len()),
            _ => None,
        };
        self.apply(form, pick);
        if let Some(rows) = rows {
            // move on to the next row
            let highlight = &mut self.highlights[self.focused_idx];
            *highlight = (*highlight + 1).min(rows.saturating_sub(1));
        } else {
            self.highlights[self.focused_idx] = option;
        }
    }

    fn edit_text<S: Submitter>(&mut self, form: &mut RegularForm<S>, edit: impl FnOnce(&mut String, &mut usize)) {
        let index = self.focused_idx;
        if let Some(text) = form.response_mut(index).and_then(RegularResponse::text_mut) {
            edit(text, &mut self.cursors[index]);
            form.clear_error(index);
        }
    }

    fn cursor_home(&mut self) {
        self.cursors[self.focused_idx] = 0;
    }

    fn cursor_end<S: Submitter>(&mut self, form: &RegularForm<S>) {
        let index = self.focused_idx;
        self.cursors[index] = text_of(&form.responses()[index]).map_or(0, |text| text.chars().count());
    }

    /// Calculate the Y position of a question in the virtual scroll area
    fn field_y_position<S: Submitter>(&self, form: &RegularForm<S>, target_idx: usize) -> u16 {
        form.questions()
            .iter()
            .take(target_idx)
            .enumerate()
            .map(|(idx, question)| field_height(question, idx > 0))
            .sum()
    }

    /// Adjust scroll offset to keep the focused question visible
    fn adjust_scroll<S: Submitter>(&mut self, form: &RegularForm<S>, viewport_height: u16) {
        if self.submit_focused {
            return;
        }
        let Some(question) = form.questions().get(self.focused_idx) else {
            return;
        };
        let field_y = self.field_y_position(form, self.focused_idx);
        let spacing = if self.focused_idx > 0 { FIELD_SPACING } else { 0 };
        let field_bottom = field_y + spacing + field_height(question, false);

        if field_y < self.scroll_offset {
            self.scroll_offset = field_y;
        }
        if field_bottom > self.scroll_offset + viewport_height {
            self.scroll_offset = field_bottom.saturating_sub(viewport_height);
        }
    }
}

fn handle_key<S: Submitter>(
    state: &mut FormState,
    form: &mut RegularForm<S>,
    key: KeyEvent,
) -> Result<Flow, SurveyError> {
    let editing = state.is_editing_text(form);

    match key.code {
        KeyCode::Esc => return Ok(Flow::Cancel),
        // Ctrl+Enter or F10 submits from anywhere
        KeyCode::Enter if key.modifiers.contains(KeyModifiers::CONTROL) => {
            return submit(state, form);
        }
        KeyCode::F(10) => return submit(state, form),
        KeyCode::Enter => {
            if state.submit_focused {
                return submit(state, form);
            }
            match state.pick_highlighted(form) {
                Some(pick) => state.apply(form, pick),
                None => state.next_field(),
            }
        }
        KeyCode::BackTab | KeyCode::Tab if key.modifiers.contains(KeyModifiers::SHIFT) => {
            state.prev_field();
        }
        KeyCode::Tab => state.next_field(),
        KeyCode::Up => {
            if state.is_selection_field(form) {
                state.option_up(form);
            } else {
                state.prev_field();
            }
        }
        KeyCode::Down => {
            if state.is_selection_field(form) {
                state.option_down(form);
            } else {
                state.next_field();
            }
        }
        KeyCode::Left if key.modifiers.contains(KeyModifiers::CONTROL) => state.prev_field(),
        KeyCode::Right if key.modifiers.contains(KeyModifiers::CONTROL) => state.next_field(),
        KeyCode::Left if editing => state.edit_text(form, |_, cursor| {
            *cursor = cursor.saturating_sub(1);
        }),
        KeyCode::Right if editing => state.edit_text(form, |text, cursor| {
            *cursor = (*cursor + 1).min(text.chars().count());
        }),
        KeyCode::Left => {
            if matches!(state.focused(form), Some(RegularQuestion::Matrix { .. })) {
                state.column_left();
            }
        }
        KeyCode::Right => {
            if matches!(state.focused(form), Some(RegularQuestion::Matrix { .. })) {
                state.column_right();
            }
        }
        KeyCode::Char(c) if editing => state.edit_text(form, |text, cursor| {
            text.insert(byte_offset(text, *cursor), c);
            *cursor += 1;
        }),
        KeyCode::Char(' ') => {
            if let Some(pick) = state.pick_highlighted(form) {
                state.apply(form, pick);
            }
        }
        // Number keys: quick select (1-9)
        KeyCode::Char(c) if c.is_ascii_digit() => {
            if let Some(number) = c.to_digit(10) {
                state.pick_number(form, number as usize);
            }
        }
        KeyCode::Backspace if editing => state.edit_text(form, |text, cursor| {
            if *cursor > 0 {
                *cursor -= 1;
                text.remove(byte_offset(text, *cursor));
            }
        }),
        KeyCode::Delete if editing => state.edit_text(form, |text, cursor| {
            if *cursor < text.chars().count() {
                text.remove(byte_offset(text, *cursor));
            }
        }),
        KeyCode::Home if editing => state.cursor_home(),
        KeyCode::End if editing => state.cursor_end(form),
        KeyCode::PageDown => {
            for _ in 0..5 {
                state.next_field();
            }
        }
        KeyCode::PageUp => {
            for _ in 0..5 {
                state.prev_field();
            }
        }
        _ => {}
    }
    Ok(Flow::Continue)
}

fn submit<S: Submitter>(state: &mut FormState, form: &mut RegularForm<S>) -> Result<Flow, SurveyError> {
    match form.submit()? {
        FormOutcome::Saved { next_step } => Ok(Flow::Saved(next_step)),
        FormOutcome::Invalid | FormOutcome::Rejected { .. } => {
            state.focus_first_error(form);
            Ok(Flow::Continue)
        }
        FormOutcome::Failed => Ok(Flow::Continue),
    }
}

fn pick_at(question: &RegularQuestion, highlight: usize, column: usize) -> Option<Pick> {
    match question {
        RegularQuestion::MultipleChoice { options, .. } if highlight < options.len() => {
            Some(Pick::Toggle(highlight))
        }
        RegularQuestion::SingleChoice { options, .. } if highlight < options.len() => {
            Some(Pick::Select(highlight))
        }
        RegularQuestion::MultipleChoice { .. } | RegularQuestion::SingleChoice { .. }
            if question.other_enabled() =>
        {
            Some(Pick::Other)
        }
        RegularQuestion::AgreementScale { .. } if highlight < SCALE_POINTS => {
            Some(Pick::Select(highlight))
        }
        RegularQuestion::Matrix { rows, .. } if highlight < rows.len() => Some(Pick::Row {
            row: highlight,
            column,
        }),
        _ => None,
    }
}

/// Number of lines the highlight can move over.
fn selectable_lines(question: &RegularQuestion) -> usize {
    match question {
        RegularQuestion::MultipleChoice { options, .. }
        | RegularQuestion::SingleChoice { options, .. } => {
            options.len() + usize::from(question.other_enabled())
        }
        RegularQuestion::Matrix { rows, .. } => rows.len(),
        RegularQuestion::AgreementScale { .. } => SCALE_POINTS,
        RegularQuestion::OpenShort { .. } => 0,
    }
}

fn other_text(response: &RegularResponse) -> Option<&str> {
    match response {
        RegularResponse::MultipleChoice { other, .. } | RegularResponse::SingleChoice { other, .. } => {
            other.as_deref()
        }
        _ => None,
    }
}

fn text_of(response: &RegularResponse) -> Option<&str> {
    match response {
        RegularResponse::OpenShort { text } => Some(text),
        _ => other_text(response),
    }
}

fn byte_offset(text: &str, chars: usize) -> usize {
    text.char_indices().nth(chars).map_or(text.len(), |(at, _)| at)
}

/// Extra vertical space between questions
const FIELD_SPACING: u16 = 1;

fn field_height(question: &RegularQuestion, include_spacing: bool) -> u16 {
    let lines = match question {
        RegularQuestion::Matrix { rows, .. } => rows.len() + 1,
        RegularQuestion::OpenShort { .. } => 1,
        _ => selectable_lines(question),
    };
    let base_height = 2 + lines as u16;
    if include_spacing {
        base_height + FIELD_SPACING
    } else {
        base_height
    }
}

fn draw_form<S: Submitter>(
    frame: &mut Frame,
    state: &mut FormState,
    form: &RegularForm<S>,
    title: &str,
    theme: &Theme,
) {
    let area = frame.area();
    frame.render_widget(
        Block::default().style(Style::default().bg(theme.background)),
        area,
    );

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title
            Constraint::Min(10),   // Form content
            Constraint::Length(1), // Summary
            Constraint::Length(3), // Submit button
            Constraint::Length(1), // Help bar
        ])
        .split(area);

    let title = Paragraph::new(title.to_string())
        .style(
            Style::default()
                .fg(theme.primary)
                .add_modifier(Modifier::BOLD),
        )
        .block(
            Block::default()
                .borders(Borders::BOTTOM)
                .border_style(Style::default().fg(theme.border)),
        );
    frame.render_widget(title, chunks[0]);

    // Form content area - reserve space for scrollbar on the right
    let form_area = chunks[1];
    let content_width = form_area.width.saturating_sub(2);
    let viewport_height = form_area.height;

    state.adjust_scroll(form, viewport_height);
    let scroll_offset = state.scroll_offset;
    let total_height = state.field_y_position(form, form.questions().len());

    let mut virtual_y: u16 = 0;
    for (idx, question) in form.questions().iter().enumerate() {
        let height_with_spacing = field_height(question, idx > 0);
        let height = field_height(question, false);
        let spacing = height_with_spacing - height;
        let field_top = virtual_y + spacing;
        virtual_y += height_with_spacing;

        // Skip questions clipped at the top (they look weird)
        if field_top < scroll_offset {
            continue;
        }
        if field_top >= scroll_offset + viewport_height {
            break;
        }

        let visible_top = field_top - scroll_offset;
        let field_area = Rect {
            x: form_area.x + 1,
            y: form_area.y + visible_top,
            width: content_width,
            height: height.min(viewport_height - visible_top),
        };
        let is_focused = !state.submit_focused && idx == state.focused_idx;
        draw_field(frame, form, idx, state, field_area, is_focused, theme);
    }

    if total_height > viewport_height {
        let scrollbar_area = Rect {
            x: form_area.x + form_area.width.saturating_sub(1),
            y: form_area.y,
            width: 1,
            height: viewport_height,
        };

        let mut scrollbar_state = ScrollbarState::new(total_height as usize)
            .position(scroll_offset as usize)
            .viewport_content_length(viewport_height as usize);

        let scrollbar = Scrollbar::new(ScrollbarOrientation::VerticalRight)
            .begin_symbol(Some("▲"))
            .end_symbol(Some("▼"))
            .track_symbol(Some("│"))
            .thumb_symbol("█");

        frame.render_stateful_widget(scrollbar, scrollbar_area, &mut scrollbar_state);
    }

    if let Some(summary) = form.summary() {
        let summary = Paragraph::new(format!("⚠ {summary}"))
            .style(Style::default().fg(theme.error))
            .alignment(Alignment::Center);
        frame.render_widget(summary, chunks[2]);
    }

    let submit_style = if state.submit_focused {
        Style::default()
            .fg(theme.text)
            .bg(theme.primary)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default()
            .fg(theme.primary)
            .add_modifier(Modifier::BOLD)
    };
    let submit_text = if state.submit_focused {
        "  [ Submit ]  "
    } else {
        "    Submit    "
    };
    let submit_button = Paragraph::new(submit_text)
        .style(submit_style)
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(if state.submit_focused {
                    theme.primary
                } else {
                    theme.border
                })),
        );
    frame.render_widget(submit_button, chunks[3]);

    let help_text = "Tab: Next  ↑/↓: Navigate  Space/Enter: Select  1-9: Quick pick  Esc: Cancel";
    let help = Paragraph::new(help_text).style(Style::default().fg(theme.border));
    frame.render_widget(help, chunks[4]);
}

fn draw_field<S: Submitter>(
    frame: &mut Frame,
    form: &RegularForm<S>,
    idx: usize,
    state: &FormState,
    area: Rect,
    is_focused: bool,
    theme: &Theme,
) {
    let question = &form.questions()[idx];
    let response = &form.responses()[idx];
    let error = form.error(idx);

    let border_color = if error.is_some() {
        theme.error
    } else if is_focused {
        theme.primary
    } else {
        theme.border
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color))
        .title(format!(" {}. {} ", idx + 1, question.title()))
        .title_style(Style::default().fg(if is_focused {
            theme.highlight
        } else {
            theme.text
        }));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let highlight = state.highlights[idx];
    let line_style = |line: usize, selected: bool| {
        if is_focused && line == highlight {
            Style::default()
                .fg(if selected { theme.success } else { theme.text })
                .bg(theme.selected_bg)
                .add_modifier(Modifier::BOLD)
        } else if selected {
            Style::default().fg(theme.success)
        } else {
            Style::default().fg(theme.text)
        }
    };

    let mut lines: Vec<Line> = Vec::new();
    let mut cursor = None;
    match (question, response) {
        (
            RegularQuestion::MultipleChoice { options, .. },
            RegularResponse::MultipleChoice { checked, other },
        ) => {
            for (option, label) in options.iter().enumerate() {
                let selected = checked.contains(&option);
                let marker = if selected { "[✓]" } else { "[ ]" };
                lines.push(Line::styled(format!("{marker} {label}"), line_style(option, selected)));
            }
            if question.other_enabled() {
                let marker = if other.is_some() { "[✓]" } else { "[ ]" };
                lines.push(other_line(marker, other.as_deref(), line_style(options.len(), other.is_some())));
                cursor = other.as_ref().map(|_| (lines.len() - 1, OTHER_TEXT_COLUMN));
            }
        }
        (
            RegularQuestion::SingleChoice { options, .. },
            RegularResponse::SingleChoice { checked, other },
        ) => {
            for (option, label) in options.iter().enumerate() {
                let selected = *checked == Some(option);
                let marker = if selected { "(●)" } else { "( )" };
                lines.push(Line::styled(format!("{marker} {label}"), line_style(option, selected)));
            }
            if question.other_enabled() {
                let marker = if other.is_some() { "(●)" } else { "( )" };
                lines.push(other_line(marker, other.as_deref(), line_style(options.len(), other.is_some())));
                cursor = other.as_ref().map(|_| (lines.len() - 1, OTHER_TEXT_COLUMN));
            }
        }
        (RegularQuestion::Matrix { rows, .. }, RegularResponse::Matrix { rows: chosen }) => {
            lines.push(Line::styled(
                format!(
                    "1 = {} … {} = {}",
                    AGREEMENT_LABELS[0],
                    SCALE_POINTS,
                    AGREEMENT_LABELS[SCALE_POINTS - 1]
                ),
                Style::default().fg(theme.secondary),
            ));
            for (row, label) in rows.iter().enumerate() {
                let picked = chosen.get(row).copied().flatten();
                let mut spans: Vec<Span> = (0..SCALE_POINTS)
                    .map(|column| {
                        let marker = if picked == Some(column) { "(●)" } else { "( )" };
                        let style = if is_focused && row == highlight && column == state.columns[idx] {
                            Style::default()
                                .fg(theme.highlight)
                                .bg(theme.selected_bg)
                                .add_modifier(Modifier::BOLD)
                        } else if picked == Some(column) {
                            Style::default().fg(theme.success)
                        } else {
                            Style::default().fg(theme.text)
                        };
                        Span::styled(format!("{marker} "), style)
                    })
                    .collect();
                spans.push(Span::styled(label.clone(), line_style(row, picked.is_some())));
                lines.push(Line::from(spans));
            }
        }
        (RegularQuestion::AgreementScale { .. }, RegularResponse::AgreementScale { checked }) => {
            for (point, label) in AGREEMENT_LABELS.iter().enumerate() {
                let selected = *checked == Some(point);
                let marker = if selected { "(●)" } else { "( )" };
                lines.push(Line::styled(format!("{marker} {label}"), line_style(point, selected)));
            }
        }
        (RegularQuestion::OpenShort { .. }, RegularResponse::OpenShort { text }) => {
            lines.push(Line::styled(text.clone(), Style::default().fg(theme.text)));
            cursor = Some((0, 0));
        }
        _ => {}
    }
    frame.render_widget(Paragraph::new(lines), inner);

    if is_focused
        && state.is_editing_focus(question, highlight)
        && let Some((line, offset)) = cursor
    {
        let cursor_x = inner.x + offset + state.cursors[idx] as u16;
        let cursor_y = inner.y + line as u16;
        if cursor_x < inner.x + inner.width && cursor_y < inner.y + inner.height {
            frame.set_cursor_position((cursor_x, cursor_y));
        }
    }

    // Error on the bottom border
    if let Some(error) = error {
        let error_text = Paragraph::new(format!("⚠ {error}")).style(Style::default().fg(theme.error));
        let error_area = Rect {
            x: area.x + 1,
            y: area.y + area.height.saturating_sub(1),
            width: area.width.saturating_sub(2),
            height: 1,
        };
        frame.render_widget(error_text, error_area);
    }
}

impl FormState {
    /// Whether the highlight sits on the line holding the text cursor.
    fn is_editing_focus(&self, question: &RegularQuestion, highlight: usize) -> bool {
        match question {
            RegularQuestion::OpenShort { .. } => true,
            RegularQuestion::MultipleChoice { options, .. }
            | RegularQuestion::SingleChoice { options, .. } => highlight == options.len(),
            _ => false,
        }
    }
}

/// Column where typed "other" text starts, after `"[ ] Other: "`.
const OTHER_TEXT_COLUMN: u16 = 11;

fn other_line(marker: &str, text: Option<&str>, style: Style) -> Line<'static> {
    Line::styled(format!("{marker} Other: {}", text.unwrap_or_default()), style)
}
