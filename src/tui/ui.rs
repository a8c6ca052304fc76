use chrono::{Datelike, Local};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::app::{App, InputMode};
use crate::models::NewsItem;
use crate::picker::{year_options, CalendarCell, MONTH_NAMES, WEEKDAY_NAMES};
use crate::view::ViewStatus;

const ACCENT: Color = Color::Indexed(62);
const MUTED: Color = Color::DarkGray;

pub fn draw(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(frame.area());

    draw_header(frame, app, chunks[0]);
    draw_filters(frame, app, chunks[1]);
    draw_results(frame, app, chunks[2]);
    draw_pagination(frame, app, chunks[3]);
    draw_status(frame, app, chunks[4]);

    match app.mode {
        InputMode::Calendar => draw_calendar(frame, app),
        InputMode::Help => draw_help(frame, app),
        InputMode::Normal | InputMode::Search => {}
    }
}

fn draw_header(frame: &mut Frame, app: &App, area: Rect) {
    let language = app.localizer.active();
    let line = Line::from(vec![
        Span::styled(
            app.localizer.t("news"),
            Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        Span::styled(
            format!("{}: {}", app.localizer.t("language"), language.native_name()),
            Style::default().fg(MUTED),
        ),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

fn input_block(title: &str, focused: bool) -> Block<'_> {
    let border = if focused { Color::Yellow } else { ACCENT };
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border))
        .title(title)
}

fn draw_filters(frame: &mut Frame, app: &App, area: Rect) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(40),
            Constraint::Percentage(30),
            Constraint::Percentage(30),
        ])
        .split(area);

    let searching = app.mode == InputMode::Search;
    let mut search = app.view.search().to_string();
    if searching {
        search.push('█');
    }
    let title = format!("{} [/]", app.localizer.t("search"));
    frame.render_widget(
        Paragraph::new(search).block(input_block(&title, searching)),
        columns[0],
    );

    let category = app
        .view
        .category()
        .label()
        .unwrap_or_else(|| app.localizer.t("categories"));
    frame.render_widget(
        Paragraph::new(category).block(input_block("[c]", false)),
        columns[1],
    );

    let range = app
        .picker
        .label()
        .unwrap_or_else(|| app.localizer.t("dateRange").to_string());
    frame.render_widget(
        Paragraph::new(range).block(input_block("[d]", app.mode == InputMode::Calendar)),
        columns[2],
    );
}

fn news_card(item: &NewsItem, width: usize) -> Vec<Line<'static>> {
    let mut lines = vec![
        Line::from(Span::styled(
            item.published_local(),
            Style::default().fg(MUTED),
        )),
        Line::from(Span::styled(
            item.title.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
    ];
    for wrapped in textwrap::wrap(&item.description, width.max(10)) {
        lines.push(Line::from(wrapped.into_owned()));
    }
    lines.push(Line::from(Span::styled(
        item.source.name.clone(),
        Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
    )));
    if let Some(image) = &item.image {
        lines.push(Line::from(Span::styled(
            image.clone(),
            Style::default().fg(MUTED).add_modifier(Modifier::ITALIC),
        )));
    }
    lines
}

fn draw_results(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default().borders(Borders::ALL);

    match app.view.status() {
        ViewStatus::Loading => {
            let text = format!("{} {}...", app.spinner(), app.localizer.t("loading"));
            frame.render_widget(
                Paragraph::new(text).alignment(Alignment::Center).block(block),
                area,
            );
        }
        ViewStatus::Empty => {
            frame.render_widget(
                Paragraph::new(app.localizer.t("noNews"))
                    .alignment(Alignment::Center)
                    .style(Style::default().fg(MUTED))
                    .block(block),
                area,
            );
        }
        ViewStatus::Items => {
            let news = app.view.current_news();
            let constraints = vec![Constraint::Ratio(1, news.len() as u32); news.len()];
            let cards = Layout::default()
                .direction(Direction::Horizontal)
                .constraints(constraints)
                .split(area);

            for (item, card) in news.iter().zip(cards.iter()) {
                let width = card.width.saturating_sub(2) as usize;
                frame.render_widget(
                    Paragraph::new(Text::from(news_card(item, width)))
                        .wrap(Wrap { trim: false })
                        .block(Block::default().borders(Borders::ALL)),
                    *card,
                );
            }
        }
    }
}

fn draw_pagination(frame: &mut Frame, app: &App, area: Rect) {
    let current = app.view.current_page();
    let total = app.view.total_pages();
    let enabled = Style::default().fg(ACCENT);
    let disabled = Style::default().fg(MUTED).add_modifier(Modifier::DIM);

    let mut spans = vec![Span::styled(
        " ← ",
        if current == 1 { disabled } else { enabled },
    )];
    for page in app.view.page_numbers() {
        let style = if page == current {
            Style::default()
                .fg(Color::White)
                .bg(ACCENT)
                .add_modifier(Modifier::BOLD)
        } else {
            enabled
        };
        spans.push(Span::styled(format!(" {page} "), style));
    }
    spans.push(Span::styled(
        " → ",
        if current >= total { disabled } else { enabled },
    ));

    frame.render_widget(
        Paragraph::new(Line::from(spans)).alignment(Alignment::Center),
        area,
    );
}

fn draw_status(frame: &mut Frame, app: &App, area: Rect) {
    let (text, style) = match &app.status_message {
        Some(message) => (message.clone(), Style::default().fg(Color::Red)),
        None => (
            format!(
                "{} {}/{}  ·  {} items  ·  {}",
                app.localizer.t("page"),
                app.view.current_page(),
                app.view.total_pages().max(1),
                app.view.news_data().len(),
                app.localizer.t("help")
            ),
            Style::default().fg(MUTED),
        ),
    };
    frame.render_widget(Paragraph::new(text).style(style), area);
}

fn cell_style(cell: &CalendarCell) -> Style {
    let mut style = Style::default();
    if !cell.in_view_month {
        style = style.fg(MUTED);
    }
    if cell.selected {
        style = style.bg(Color::LightBlue).fg(Color::Black);
    }
    if cell.range_start || cell.range_end {
        style = style.bg(ACCENT).fg(Color::White).add_modifier(Modifier::BOLD);
    }
    if cell.is_today {
        style = style.add_modifier(Modifier::UNDERLINED);
    }
    if cell.is_cursor {
        style = style.add_modifier(Modifier::REVERSED);
    }
    style
}

fn draw_calendar(frame: &mut Frame, app: &App) {
    let area = centered_rect(34, 15, frame.area());
    let today = Local::now().date_naive();
    let picker = &app.picker;

    let month = MONTH_NAMES
        .get(picker.view_month() as usize)
        .copied()
        .unwrap_or_default();
    let years = year_options(today);
    let mut lines = vec![
        Line::from(Span::styled(
            format!("{} {}", month, picker.view_year()),
            Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
        ))
        .alignment(Alignment::Center),
        Line::from(
            WEEKDAY_NAMES
                .iter()
                .map(|d| Span::styled(format!("{:>4}", &d[..2]), Style::default().fg(ACCENT)))
                .collect::<Vec<_>>(),
        ),
    ];

    let grid = picker.grid(today);
    for week in grid.chunks(7) {
        let mut spans = Vec::with_capacity(14);
        for cell in week {
            spans.push(Span::raw("  "));
            spans.push(Span::styled(
                format!("{:>2}", cell.date.day()),
                cell_style(cell),
            ));
        }
        lines.push(Line::from(spans));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(format!(
        "c {}  x {}  t {}",
        app.localizer.t("confirm"),
        app.localizer.t("clear"),
        app.localizer.t("today")
    )));
    lines.push(Line::from(Span::styled(
        format!(
            "[ ] month  {{ }} year ({}-{})",
            years.first().copied().unwrap_or_default(),
            years.last().copied().unwrap_or_default()
        ),
        Style::default().fg(MUTED),
    )));

    frame.render_widget(Clear, area);
    frame.render_widget(
        Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(ACCENT))
                .title(app.localizer.t("dateRange")),
        ),
        area,
    );
}

fn draw_help(frame: &mut Frame, app: &App) {
    let area = centered_rect(48, 16, frame.area());
    let rows = [
        ("/", app.localizer.t("search")),
        ("c / C", app.localizer.t("categories")),
        ("d", app.localizer.t("dateRange")),
        ("l", app.localizer.t("language")),
        ("n / p, ← / →", app.localizer.t("page")),
        ("1-9", app.localizer.t("page")),
        ("o", "Open in browser"),
        ("r", "Refresh"),
        ("q", "Quit"),
    ];
    let lines: Vec<Line> = rows
        .iter()
        .map(|(key, label)| {
            Line::from(vec![
                Span::styled(
                    format!("{key:>14}  "),
                    Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
                ),
                Span::raw(*label),
            ])
        })
        .collect();

    frame.render_widget(Clear, area);
    frame.render_widget(
        Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title("?")),
        area,
    );
}

fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
