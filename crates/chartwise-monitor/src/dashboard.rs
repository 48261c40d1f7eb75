//! TUI Dashboard using ratatui.

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Sparkline, Table, Tabs, Wrap},
    Frame, Terminal,
};
use std::io;
use std::time::Duration;

use chartwise_analysis::{AnalysisReport, TickerAnalysis};

/// Title of the first tab.
pub const SUMMARY_TAB: &str = "Overall Summary";

/// Dashboard state.
#[derive(Debug, Clone, Default)]
pub struct DashboardState {
    pub title: String,
    /// Latest report; `None` until the first cycle finishes
    pub report: Option<AnalysisReport>,
    pub messages: Vec<String>,
}

impl DashboardState {
    /// Tab titles: the summary followed by one per analyzed ticker.
    pub fn tab_titles(&self) -> Vec<String> {
        let mut titles = vec![SUMMARY_TAB.to_string()];
        if let Some(report) = &self.report {
            titles.extend(report.tickers.iter().map(|t| t.ticker().to_string()));
        }
        titles
    }
}

/// Convert `#rrggbb` to a terminal color; anything else is gray.
pub fn hex_color(hex: &str) -> Color {
    let digits = hex.trim().trim_start_matches('#');
    if digits.len() != 6 || !digits.is_ascii() {
        return Color::Gray;
    }
    let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();
    match (channel(0), channel(2), channel(4)) {
        (Some(r), Some(g), Some(b)) => Color::Rgb(r, g, b),
        _ => Color::Gray,
    }
}

/// TUI Dashboard.
pub struct Dashboard {
    refresh_ms: u64,
}

impl Dashboard {
    /// Create a new dashboard.
    pub fn new(refresh_ms: u64) -> Self {
        Self { refresh_ms }
    }

    /// Run the dashboard until the user quits.
    pub fn run<F>(&self, mut get_state: F) -> io::Result<()>
    where
        F: FnMut() -> DashboardState,
    {
        // Setup terminal
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let res = self.run_loop(&mut terminal, &mut get_state);

        // Restore terminal
        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        res
    }

    fn run_loop<B, F>(&self, terminal: &mut Terminal<B>, get_state: &mut F) -> io::Result<()>
    where
        B: Backend,
        F: FnMut() -> DashboardState,
    {
        let mut selected = 0usize;
        loop {
            let state = get_state();
            let tabs = state.tab_titles().len();
            selected = selected.min(tabs - 1);
            terminal.draw(|f| self.ui(f, &state, selected))?;

            if event::poll(Duration::from_millis(self.refresh_ms))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    match key.code {
                        KeyCode::Char('q') | KeyCode::Esc => return Ok(()),
                        KeyCode::Right | KeyCode::Tab | KeyCode::Char('l') => {
                            selected = (selected + 1) % tabs;
                        }
                        KeyCode::Left | KeyCode::BackTab | KeyCode::Char('h') => {
                            selected = (selected + tabs - 1) % tabs;
                        }
                        _ => {}
                    }
                }
            }
        }
    }

    /// Draw one frame with tab `selected` active.
    pub fn ui(&self, frame: &mut Frame, state: &DashboardState, selected: usize) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .margin(1)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Length(3), // Tabs
                Constraint::Min(10),   // Body
                Constraint::Length(6), // Messages
            ])
            .split(frame.area());

        self.render_header(frame, chunks[0], state);
        self.render_tabs(frame, chunks[1], state, selected);

        let ticker = state
            .report
            .as_ref()
            .and_then(|r| selected.checked_sub(1).and_then(|i| r.tickers.get(i)));
        match (&state.report, ticker) {
            (Some(_), Some(analysis)) => self.render_ticker(frame, chunks[2], analysis),
            (Some(report), None) => self.render_summary(frame, chunks[2], report),
            (None, _) => {
                let waiting = Paragraph::new("Waiting for the first analysis cycle...")
                    .block(Block::default().borders(Borders::ALL).title(SUMMARY_TAB));
                frame.render_widget(waiting, chunks[2]);
            }
        }

        self.render_messages(frame, chunks[3], state);
    }

    fn render_header(&self, frame: &mut Frame, area: Rect, state: &DashboardState) {
        let mut spans = vec![
            Span::styled("Chartwise", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(" | "),
            Span::styled(&state.title, Style::default().fg(Color::Cyan)),
        ];
        if let Some(at) = state.report.as_ref().and_then(|r| r.fetched_at) {
            spans.push(Span::raw(format!(" | data {}", at.format("%H:%M:%S UTC"))));
        }
        spans.push(Span::raw(" | ←/→ switch tabs, 'q' to quit"));

        let header = Paragraph::new(Line::from(spans))
            .block(Block::default().borders(Borders::ALL).title("Dashboard"));
        frame.render_widget(header, area);
    }

    fn render_tabs(&self, frame: &mut Frame, area: Rect, state: &DashboardState, selected: usize) {
        let tabs = Tabs::new(state.tab_titles())
            .select(selected)
            .block(Block::default().borders(Borders::ALL))
            .highlight_style(
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            );
        frame.render_widget(tabs, area);
    }

    fn render_summary(&self, frame: &mut Frame, area: Rect, report: &AnalysisReport) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(5), Constraint::Length(6)])
            .split(area);

        let header_cells = ["Stock", "Recommendation"]
            .iter()
            .map(|h| Cell::from(*h).style(Style::default().add_modifier(Modifier::BOLD)));
        let header = Row::new(header_cells).height(1);

        let rows = report.summary_rows().into_iter().map(|row| {
            Row::new(vec![
                Cell::from(row.stock),
                Cell::from(row.recommendation).style(
                    Style::default()
                        .fg(Color::Black)
                        .bg(hex_color(row.color)),
                ),
            ])
        });

        let table = Table::new(rows, [Constraint::Percentage(40), Constraint::Percentage(60)])
            .header(header)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title("Overall Structured Recommendations"),
            );
        frame.render_widget(table, chunks[0]);

        let notices: Vec<Line> = if report.notices.is_empty() {
            vec![Line::from(format!(
                "Stock data loaded successfully for: {}",
                report
                    .tickers
                    .iter()
                    .map(|t| t.ticker())
                    .collect::<Vec<_>>()
                    .join(", ")
            ))]
        } else {
            report
                .notices
                .iter()
                .map(|n| Line::styled(n.to_string(), Style::default().fg(Color::Yellow)))
                .collect()
        };
        let paragraph = Paragraph::new(notices)
            .wrap(Wrap { trim: true })
            .block(Block::default().borders(Borders::ALL).title("Notices"));
        frame.render_widget(paragraph, chunks[1]);
    }

    fn render_ticker(&self, frame: &mut Frame, area: Rect, analysis: &TickerAnalysis) {
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
            .split(area);
        let left = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(6), Constraint::Length(8)])
            .split(columns[0]);
        let right = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(6),
                Constraint::Length(8),
            ])
            .split(columns[1]);

        let snap = &analysis.snapshot;

        // Indicator readings
        let mut rows = vec![Row::new(vec![
            Cell::from("Last Close"),
            Cell::from(snap.last_close.map(|c| format!("{:.2}", c)).unwrap_or_default()),
        ])];
        rows.extend(snap.readings.iter().map(|r| {
            Row::new(vec![
                Cell::from(r.name.clone()),
                Cell::from(r.latest.map(|v| format!("{:.2}", v)).unwrap_or_else(|| "-".into())),
            ])
        }));
        let table = Table::new(rows, [Constraint::Percentage(55), Constraint::Percentage(45)])
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(format!("Analysis for {} ({} bars)", snap.ticker, snap.bars)),
            );
        frame.render_widget(table, left[0]);

        // Close-price sparkline, rescaled to the visible range
        let min = snap.closes.iter().copied().fold(f64::INFINITY, f64::min);
        let max = snap.closes.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let span = (max - min).max(f64::EPSILON);
        let width = left[1].width.saturating_sub(2) as usize;
        let skip = snap.closes.len().saturating_sub(width);
        let data: Vec<u64> = snap.closes[skip..]
            .iter()
            .map(|c| (((c - min) / span) * 100.0).round() as u64 + 1)
            .collect();
        let sparkline = Sparkline::default()
            .data(&data)
            .style(Style::default().fg(Color::Cyan))
            .block(Block::default().borders(Borders::ALL).title("Close"));
        frame.render_widget(sparkline, left[1]);

        // Final call
        let call = &analysis.technical.recommendation;
        let final_call = Paragraph::new(Line::from(Span::styled(
            format!("Final Call: {}", call),
            Style::default()
                .fg(Color::Black)
                .bg(hex_color(call.color()))
                .add_modifier(Modifier::BOLD),
        )))
        .block(Block::default().borders(Borders::ALL));
        frame.render_widget(final_call, right[0]);

        // Justification
        let mut justification: Vec<Line> = analysis
            .technical
            .justification
            .format_markdown()
            .lines()
            .map(|l| Line::from(l.to_string()))
            .collect();
        if let Some(error) = &analysis.technical.error {
            justification.push(Line::styled(error.clone(), Style::default().fg(Color::Red)));
        }
        let paragraph = Paragraph::new(justification)
            .wrap(Wrap { trim: true })
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title("Technical Justification"),
            );
        frame.render_widget(paragraph, right[1]);

        // Sentiment
        let (lines, border) = match &analysis.sentiment {
            Some(sentiment) => {
                let mut lines = vec![
                    Line::from(vec![
                        Span::styled("Sentiment: ", Style::default().add_modifier(Modifier::BOLD)),
                        Span::raw(sentiment.sentiment.to_string()),
                    ]),
                    Line::from(sentiment.explanation.clone()),
                ];
                if let Some(error) = &sentiment.error {
                    lines.push(Line::styled(error.clone(), Style::default().fg(Color::Red)));
                }
                (lines, hex_color(sentiment.sentiment.border_color()))
            }
            None => (vec![Line::from("Sentiment analysis disabled")], Color::Gray),
        };
        let paragraph = Paragraph::new(lines).wrap(Wrap { trim: true }).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(border))
                .title("Market Sentiment Analysis"),
        );
        frame.render_widget(paragraph, right[2]);
    }

    fn render_messages(&self, frame: &mut Frame, area: Rect, state: &DashboardState) {
        let messages: Vec<Line> = state
            .messages
            .iter()
            .rev()
            .take(4)
            .map(|m| Line::from(m.as_str()))
            .collect();

        let paragraph =
            Paragraph::new(messages).block(Block::default().borders(Borders::ALL).title("Log"));
        frame.render_widget(paragraph, area);
    }
}
