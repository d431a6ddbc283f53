use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState, Wrap},
    Frame, Terminal,
};
use scf_casebook::{
    clamp_height, export_exhibit, Config, Exhibit, Presentation, Presenter, Severity,
    SubstitutionStatus, TableView, ViewOptions,
};
use std::io;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Exhibits,
    Tables,
    Debug,
}

impl Page {
    pub fn next(&self) -> Self {
        match self {
            Page::Exhibits => Page::Tables,
            Page::Tables => Page::Debug,
            Page::Debug => Page::Exhibits,
        }
    }

    pub fn previous(&self) -> Self {
        match self {
            Page::Exhibits => Page::Debug,
            Page::Tables => Page::Exhibits,
            Page::Debug => Page::Tables,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            Page::Exhibits => "Exhibits",
            Page::Tables => "Tables",
            Page::Debug => "Debug",
        }
    }
}

pub struct App {
    presenter: Presenter,
    config: Config,
    pub state: TableState,
    pub current_page: Page,
    pub options: ViewOptions,
    pub presentation: Presentation,
    pub table_index: usize,
    pub status: Option<String>,
}

impl App {
    pub fn new(presenter: Presenter, config: Config) -> Self {
        let mut state = TableState::default();
        state.select(Some(0));

        let options = ViewOptions {
            debug: config.debug,
            height: config.height,
            show_tables: false,
        };
        let presentation = presenter.render(Exhibit::ALL[0], &options);

        Self {
            presenter,
            config,
            state,
            current_page: Page::Exhibits,
            options,
            presentation,
            table_index: 0,
            status: None,
        }
    }

    pub fn selected_exhibit(&self) -> Exhibit {
        let i = self.state.selected().unwrap_or(0);
        Exhibit::ALL[i.min(Exhibit::ALL.len() - 1)]
    }

    /// Re-render the selected exhibit with the current options
    pub fn refresh(&mut self) {
        self.presentation = self.presenter.render(self.selected_exhibit(), &self.options);
        let table_count = self.presentation.tables.as_ref().map_or(0, Vec::len);
        if self.table_index >= table_count {
            self.table_index = 0;
        }
    }

    pub fn next(&mut self) {
        let len = Exhibit::ALL.len();
        let i = match self.state.selected() {
            Some(i) if i + 1 < len => i + 1,
            _ => 0,
        };
        self.state.select(Some(i));
        self.table_index = 0;
        self.refresh();
    }

    pub fn previous(&mut self) {
        let len = Exhibit::ALL.len();
        let i = match self.state.selected() {
            Some(0) | None => len - 1,
            Some(i) => i - 1,
        };
        self.state.select(Some(i));
        self.table_index = 0;
        self.refresh();
    }

    pub fn next_page(&mut self) {
        self.current_page = self.current_page.next();
    }

    pub fn previous_page(&mut self) {
        self.current_page = self.current_page.previous();
    }

    pub fn toggle_tables(&mut self) {
        self.options.show_tables = !self.options.show_tables;
        self.current_page = if self.options.show_tables {
            Page::Tables
        } else {
            Page::Exhibits
        };
        self.refresh();
    }

    pub fn toggle_debug(&mut self) {
        self.options.debug = !self.options.debug;
        self.current_page = if self.options.debug {
            Page::Debug
        } else {
            Page::Exhibits
        };
        self.refresh();
    }

    pub fn adjust_height(&mut self, up: bool) {
        if !self.options.debug {
            self.status = Some("Height is fixed at 3000px outside debug mode (d)".to_string());
            return;
        }

        let height = if up {
            self.options.height.saturating_add(100)
        } else {
            self.options.height.saturating_sub(100)
        };
        self.options.height = clamp_height(height);
        self.status = Some(format!("Viewer height {}px", self.options.height));
        self.refresh();
    }

    pub fn next_table(&mut self) {
        let count = self.presentation.tables.as_ref().map_or(0, Vec::len);
        if count > 0 {
            self.table_index = (self.table_index + 1) % count;
        }
    }

    pub fn previous_table(&mut self) {
        let count = self.presentation.tables.as_ref().map_or(0, Vec::len);
        if count > 0 {
            self.table_index = (self.table_index + count - 1) % count;
        }
    }

    pub fn current_table(&self) -> Option<&TableView> {
        self.presentation
            .tables
            .as_ref()
            .and_then(|tables| tables.get(self.table_index))
    }

    pub fn export_selected(&mut self) {
        let exhibit = self.selected_exhibit();
        self.status = Some(
            match export_exhibit(self.presenter.store(), exhibit, &self.config.export_dir) {
                Ok(entry) => format!(
                    "Exported {} to {}",
                    exhibit,
                    self.config.export_dir.join(entry.file).display()
                ),
                Err(e) => format!("Export failed: {}", e),
            },
        );
    }
}

pub fn run_ui(app: &mut App) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run the app
    let res = run_app(&mut terminal, app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("Error: {:?}", err);
    }

    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> io::Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            app.status = None;

            match key.code {
                KeyCode::Char('q') | KeyCode::Esc => return Ok(()),
                KeyCode::Tab => {
                    if key.modifiers.contains(KeyModifiers::SHIFT) {
                        app.previous_page();
                    } else {
                        app.next_page();
                    }
                }
                KeyCode::BackTab => app.previous_page(),
                KeyCode::Down | KeyCode::Char('j') => app.next(),
                KeyCode::Up | KeyCode::Char('k') => app.previous(),
                KeyCode::Right | KeyCode::Char(']') => app.next_table(),
                KeyCode::Left | KeyCode::Char('[') => app.previous_table(),
                KeyCode::Char('t') => app.toggle_tables(),
                KeyCode::Char('d') => app.toggle_debug(),
                KeyCode::Char('+') | KeyCode::Char('=') => app.adjust_height(true),
                KeyCode::Char('-') => app.adjust_height(false),
                KeyCode::Char('e') => app.export_selected(),
                _ => {}
            }
        }
    }
}

fn ui(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header with navigation
            Constraint::Min(0),    // Content area
            Constraint::Length(3), // Status bar
        ])
        .split(f.size());

    render_header(f, chunks[0], app);

    match app.current_page {
        Page::Exhibits => {
            let content_chunks = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([
                    Constraint::Percentage(45), // Selector list
                    Constraint::Percentage(55), // Exhibit summary
                ])
                .split(chunks[1]);

            render_selector(f, content_chunks[0], app);
            render_summary(f, content_chunks[1], app);
        }
        Page::Tables => render_table_view(f, chunks[1], app),
        Page::Debug => render_debug_panel(f, chunks[1], app),
    }

    render_status_bar(f, chunks[2], app);
}

fn render_header(f: &mut Frame, area: Rect, app: &App) {
    let pages = [Page::Exhibits, Page::Tables, Page::Debug];

    let mut tab_spans = vec![];
    for (i, page) in pages.iter().enumerate() {
        if i > 0 {
            tab_spans.push(Span::raw(" │ "));
        }
        let style = if *page == app.current_page {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
        } else {
            Style::default().fg(Color::DarkGray)
        };

        tab_spans.push(Span::styled(page.title().to_string(), style));
    }

    tab_spans.push(Span::raw("  |  "));
    tab_spans.push(Span::styled(
        app.selected_exhibit().label(),
        Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
    ));
    tab_spans.push(Span::raw("  |  "));
    tab_spans.push(Span::styled(
        format!("{}px", app.presentation.height),
        Style::default().fg(Color::Cyan),
    ));
    if app.options.debug {
        tab_spans.push(Span::raw("  "));
        tab_spans.push(Span::styled("DEBUG", Style::default().fg(Color::Magenta)));
    }
    if app.options.show_tables {
        tab_spans.push(Span::raw("  "));
        tab_spans.push(Span::styled("TABLES", Style::default().fg(Color::Green)));
    }

    let header = Paragraph::new(vec![Line::from(tab_spans)]).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title(" SCF Casebook "),
    );

    f.render_widget(header, area);
}

fn render_selector(f: &mut Frame, area: Rect, app: &mut App) {
    let header_cells = ["Selector", "Title"].iter().map(|h| {
        Cell::from(*h).style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
    });

    let header = Row::new(header_cells)
        .style(Style::default().bg(Color::DarkGray))
        .height(1);

    let rows = Exhibit::ALL.iter().map(|exhibit| {
        let color = match exhibit {
            Exhibit::Q1 | Exhibit::Q2 | Exhibit::Q3 | Exhibit::Q4 | Exhibit::Q5 | Exhibit::Q6 => {
                Color::Cyan
            }
            _ => Color::White,
        };

        Row::new(vec![
            Cell::from(exhibit.label()).style(Style::default().fg(color)),
            Cell::from(exhibit.title()),
        ])
        .height(1)
    });

    let table = Table::new(rows, [Constraint::Length(11), Constraint::Min(20)])
        .header(header)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::White))
                .title(" Exhibits "),
        )
        .highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("→ ");

    f.render_stateful_widget(table, area, &mut app.state);
}

fn render_summary(f: &mut Frame, area: Rect, app: &App) {
    let exhibit = app.selected_exhibit();
    let p = &app.presentation;

    let label = Style::default().fg(Color::Yellow);
    let mut lines = vec![
        Line::from(Span::styled(
            p.title.clone(),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
    ];

    if let Some(error) = &p.error {
        let red = Style::default().fg(Color::Red);
        lines.push(Line::from(Span::styled(error.message.clone(), red)));
        if let Some(traceback) = &error.traceback {
            for line in traceback.lines() {
                let gray = Style::default().fg(Color::DarkGray);
                lines.push(Line::from(Span::styled(line.to_string(), gray)));
            }
        }
    } else {
        lines.push(Line::from(vec![
            Span::styled("Document: ", label),
            Span::raw(format!("{} characters", p.document.chars().count())),
        ]));
        lines.push(Line::from(vec![
            Span::styled("Viewer height: ", label),
            Span::raw(format!("{}px", p.height)),
        ]));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled("Sections", label)));
    for header in exhibit.headers().iter().skip(1) {
        lines.push(Line::from(format!("  • {}", header)));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled("Tables", label)));
    for key in exhibit.tables() {
        lines.push(Line::from(format!("  • {}", key)));
    }

    let summary = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::White))
                .title(format!(" {} ", exhibit.slug())),
        );

    f.render_widget(summary, area);
}

fn render_table_view(f: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::White));

    let Some(view) = app.current_table() else {
        let hint = Paragraph::new("Press t to show the tables behind this exhibit.")
            .block(block.title(" Tables "));
        f.render_widget(hint, area);
        return;
    };

    let count = app.presentation.tables.as_ref().map_or(0, Vec::len);

    let header = Row::new(view.columns.iter().map(|c| {
        Cell::from(c.clone()).style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
    }))
    .style(Style::default().bg(Color::DarkGray))
    .height(1);

    let rows = view
        .rows
        .iter()
        .map(|row| Row::new(row.iter().map(|cell| Cell::from(truncate(cell, 40)))).height(1));

    let widths: Vec<Constraint> = view
        .columns
        .iter()
        .enumerate()
        .map(|(i, column)| {
            let widest = view
                .rows
                .iter()
                .filter_map(|row| row.get(i))
                .map(|cell| cell.chars().count())
                .chain(std::iter::once(column.chars().count()))
                .max()
                .unwrap_or(0);
            Constraint::Length(widest.min(40) as u16)
        })
        .collect();

    let table = Table::new(rows, widths).header(header).block(block.title(format!(
        " {} ({}/{}) ",
        view.name,
        app.table_index + 1,
        count
    )));

    f.render_widget(table, area);
}

fn render_debug_panel(f: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Magenta))
        .title(" Debug ");

    let Some(panel) = &app.presentation.debug else {
        let hint = Paragraph::new("Press d to enable debug mode.").block(block);
        f.render_widget(hint, area);
        return;
    };

    let label = Style::default().fg(Color::Yellow);
    let mut lines = vec![
        Line::from(Span::styled(panel.render_report.summary(), label)),
    ];

    for s in &panel.render_report.substitutions {
        let (mark, color) = match s.status {
            SubstitutionStatus::Substituted => ("✓", Color::Green),
            SubstitutionStatus::Fallback => ("!", Color::Yellow),
            SubstitutionStatus::MissingPlaceholder => ("✗", Color::Red),
        };
        lines.push(Line::from(vec![
            Span::styled(format!("  {} ", mark), Style::default().fg(color)),
            Span::raw(format!("{} ({} bytes)", s.placeholder, s.bytes)),
        ]));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(panel.integrity.summary(), label)));
    for finding in &panel.integrity.findings {
        let color = match finding.severity {
            Severity::Critical => Color::Red,
            Severity::Warning => Color::Yellow,
        };
        lines.push(Line::from(vec![
            Span::styled(format!("  {} ", finding.severity.as_str()), Style::default().fg(color)),
            Span::raw(format!(
                "{} [{}] {}: {} vs {}",
                finding.table, finding.record, finding.field, finding.stated, finding.note
            )),
        ]));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        format!(
            "Document head ({} of {} characters)",
            panel.document_head.chars().count(),
            panel.document_length
        ),
        label,
    )));
    for line in panel.document_head.lines().take(20) {
        let gray = Style::default().fg(Color::DarkGray);
        lines.push(Line::from(Span::styled(line.to_string(), gray)));
    }

    let debug = Paragraph::new(lines).wrap(Wrap { trim: false }).block(block);
    f.render_widget(debug, area);
}

fn render_status_bar(f: &mut Frame, area: Rect, app: &App) {
    let selected = app.state.selected().map(|i| i + 1).unwrap_or(0);

    let mut status_spans = vec![Span::styled(
        format!(" {}/{} ", selected, Exhibit::ALL.len()),
        Style::default().fg(Color::Cyan),
    )];

    if let Some(message) = &app.status {
        status_spans.push(Span::raw(" | "));
        status_spans.push(Span::styled(message.clone(), Style::default().fg(Color::Green)));
    }

    for (key, action) in [
        ("↑/↓", " Exhibit"),
        ("Tab", " Page"),
        ("t", " Tables"),
        ("d", " Debug"),
        ("+/-", " Height"),
        ("e", " Export"),
    ] {
        status_spans.push(Span::raw(" | "));
        status_spans.push(Span::styled(key, Style::default().fg(Color::Yellow)));
        status_spans.push(Span::raw(action));
    }
    status_spans.push(Span::raw(" | "));
    status_spans.push(Span::styled("q", Style::default().fg(Color::Red)));
    status_spans.push(Span::raw(" Quit"));

    let status_bar = Paragraph::new(vec![Line::from(status_spans)]).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White)),
    );

    f.render_widget(status_bar, area);
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_len - 3).collect();
        format!("{}...", head)
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn app() -> App {
        App::new(Presenter::new(), Config::default())
    }

    #[test]
    fn test_selection_wraps() {
        let mut app = app();
        assert_eq!(app.selected_exhibit(), Exhibit::Q1);

        app.previous();
        assert_eq!(app.selected_exhibit(), Exhibit::Exhibit8);
        assert_eq!(app.presentation.exhibit, Some(Exhibit::Exhibit8));

        app.next();
        assert_eq!(app.selected_exhibit(), Exhibit::Q1);
    }

    #[test]
    fn test_toggle_tables_loads_views() {
        let mut app = app();
        assert!(app.current_table().is_none());

        app.toggle_tables();
        assert_eq!(app.current_page, Page::Tables);
        assert_eq!(app.current_table().unwrap().name, "pgFinancialData");

        app.next_table();
        assert_eq!(app.current_table().unwrap().name, "pgCostCuttingData");
        app.previous_table();
        app.previous_table();
        assert_eq!(app.current_table().unwrap().name, "pgCashCycleData");
    }

    #[test]
    fn test_height_needs_debug() {
        let mut app = app();

        app.adjust_height(true);
        assert_eq!(app.presentation.height, 3000);

        app.toggle_debug();
        assert_eq!(app.current_page, Page::Debug);
        for _ in 0..30 {
            app.adjust_height(true);
        }
        assert_eq!(app.presentation.height, 5000);
        assert!(app.presentation.debug.is_some());
    }

    #[test]
    fn test_truncate_counts_chars() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("Negative cash conversion cycle", 10), "Negative...");
        assert_eq!(truncate("P&G → Fibria → banks", 8), "P&G →...");
    }
}
