use ratatui::prelude::*;
use ratatui::widgets::{Bar, BarChart, BarGroup, Block, Cell, Clear, Gauge, Paragraph, Row, Table};

use crate::scoring::{format_final_score, Metric, MetricScore, PipelineRecord, ScoreRecord, STAGE_COUNT};
use crate::session::Record;
use crate::tui::app::{App, FlashKind, InputMode};
use crate::tui::form::{Field, Worksheet};
use crate::tui::theme::ThemeColors;

pub fn draw(frame: &mut Frame, app: &mut App) {
    let area = frame.area();

    // Handle very small terminal sizes gracefully
    if area.height < 16 || area.width < 60 {
        let msg = Paragraph::new("Terminal too small").alignment(Alignment::Center);
        frame.render_widget(msg, area);
        return;
    }

    // Layout: Title(1) + Body(fill) + Status(1)
    let chunks = Layout::vertical([
        Constraint::Length(1), // Title bar
        Constraint::Fill(1),   // Form + results
        Constraint::Length(1), // Status bar
    ])
    .split(area);

    let body = Layout::horizontal([Constraint::Length(52), Constraint::Fill(1)]).split(chunks[1]);

    render_title(frame, chunks[0], app);
    render_form(frame, body[0], app);
    render_results(frame, body[1], app);
    render_status_bar(frame, chunks[2], app);

    if app.input_mode == InputMode::Help {
        render_help_popup(frame, &app.theme);
    }
}

fn render_title(frame: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let title = format!("💎 Hidden Gem Filter · {}", app.worksheet.title());
    let count = format!("{} coins", app.worksheet.record_count());

    let padding_len = (area.width as usize)
        .saturating_sub(title.chars().count() + count.len() + 1);

    let line = Line::from(vec![
        Span::styled(title, Style::default().fg(theme.title_color).bold()),
        Span::raw(" ".repeat(padding_len)),
        Span::styled(count, Style::default().fg(theme.muted)),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

fn render_form(frame: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let fields = app.fields();
    let focused = app.focused_field();

    let block = Block::bordered()
        .title(" Coin Information ")
        .border_style(Style::default().fg(theme.muted));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let sections = Layout::vertical([Constraint::Fill(1), Constraint::Length(3)]).split(inner);

    let lines: Vec<Line> = fields
        .iter()
        .map(|field| field_line(*field, *field == focused, app))
        .collect();
    frame.render_widget(Paragraph::new(lines), sections[0]);

    match &app.worksheet {
        Worksheet::Scorecard { .. } => render_live_score(frame, sections[1], app),
        Worksheet::Pipeline { .. } => render_progress(frame, sections[1], app),
    }
}

fn field_line<'a>(field: Field, focused: bool, app: &'a App) -> Line<'a> {
    let theme = &app.theme;
    let marker = if focused { "▶ " } else { "  " };
    let label_style = if focused {
        theme.focus_style
    } else {
        Style::default().fg(theme.label_color)
    };

    let mut spans = vec![
        Span::styled(marker, theme.focus_style),
        Span::styled(format!("{:<33}", truncate(field.label(), 33)), label_style),
    ];

    match (field, &app.worksheet) {
        (Field::Metric(metric), Worksheet::Scorecard { metrics, .. }) => {
            let value = metrics.get(metric).get();
            spans.extend(slider(value, theme));
        }
        (Field::Stage(stage), Worksheet::Pipeline { answers, .. }) => {
            let (text, color) = if answers.get(stage) {
                ("✅ Yes", theme.score_high)
            } else {
                ("❌ No", theme.score_low)
            };
            spans.push(Span::styled(text, Style::default().fg(color)));
        }
        _ => {
            let value = app.form.text(field).unwrap_or_default();
            spans.push(Span::raw(truncate_tail(value, 14)));
            if focused {
                spans.push(Span::styled("▏", Style::default().fg(theme.cursor_color)));
            }
        }
    }

    Line::from(spans)
}

fn slider(value: u8, theme: &ThemeColors) -> Vec<Span<'static>> {
    let color = theme.score_color(value as f64);
    let filled = value as usize;
    let empty = (MetricScore::MAX as usize).saturating_sub(filled);
    vec![
        Span::styled("●".repeat(filled), Style::default().fg(color)),
        Span::styled("○".repeat(empty), Style::default().fg(theme.bar_empty)),
        Span::styled(format!(" {}", value), Style::default().fg(color).bold()),
    ]
}

fn render_live_score(frame: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let score = app.worksheet.current_score().unwrap_or_default();
    let lines = vec![
        Line::from(Span::styled("Final Confluence Score", Style::default().fg(theme.muted))),
        Line::from(Span::styled(
            format!("{}/5", format_final_score(score)),
            Style::default().fg(theme.score_color(score)).bold(),
        )),
    ];
    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), area);
}

fn render_progress(frame: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let Some(outcome) = app.worksheet.current_outcome() else {
        return;
    };

    let color = theme.verdict_color(outcome.verdict);
    let label = format!(
        "{}/{} passed · {} {}",
        outcome.passes,
        STAGE_COUNT,
        outcome.verdict.icon(),
        outcome.verdict.label()
    );
    let gauge = Gauge::default()
        .block(Block::bordered().title(" Progress ").border_style(Style::default().fg(theme.muted)))
        .gauge_style(Style::default().fg(color).bg(theme.bar_empty))
        .percent(outcome.progress_percent as u16)
        .label(label);
    frame.render_widget(gauge, area);
}

fn render_results(frame: &mut Frame, area: Rect, app: &mut App) {
    if matches!(app.worksheet, Worksheet::Scorecard { .. }) {
        let chunks = Layout::vertical([Constraint::Fill(1), Constraint::Length(12)]).split(area);
        render_table(frame, chunks[0], app);
        render_chart(frame, chunks[1], app);
    } else {
        let chunks = Layout::vertical([Constraint::Fill(1), Constraint::Length(6)]).split(area);
        render_table(frame, chunks[0], app);
        render_stage_detail(frame, chunks[1], app);
    }
}

fn render_table(frame: &mut Frame, area: Rect, app: &mut App) {
    let theme = app.theme.clone();
    let block = Block::bordered()
        .title(" Coin Scores ")
        .border_style(Style::default().fg(theme.muted));

    if app.worksheet.record_count() == 0 {
        let empty_msg = Paragraph::new("No coins added yet.")
            .alignment(Alignment::Center)
            .style(Style::default().fg(theme.muted))
            .block(block);
        frame.render_widget(empty_msg, area);
        return;
    }

    let table = match &app.worksheet {
        Worksheet::Scorecard { store, .. } => scorecard_table(store.all(), &theme),
        Worksheet::Pipeline { store, .. } => pipeline_table(store.all(), &theme),
    }
    .block(block)
    .row_highlight_style(theme.row_selected);

    frame.render_stateful_widget(table, area, &mut app.table_state);
}

fn scorecard_table<'a>(records: &'a [ScoreRecord], theme: &ThemeColors) -> Table<'a> {
    let rows = records.iter().enumerate().map(|(idx, record)| {
        let score = record.final_score();
        let mut cells = vec![
            Cell::from(format!("{}.", idx + 1)).style(Style::default().fg(theme.index_color)),
            Cell::from(record.coin()).style(Style::default().bold()),
            Cell::from(record.sector()),
        ];
        cells.extend(
            record
                .metrics()
                .iter()
                .map(|(_, s)| Cell::from(s.get().to_string())),
        );
        cells.push(
            Cell::from(format_final_score(score))
                .style(Style::default().fg(theme.score_color(score)).bold()),
        );
        cells.push(Cell::from(single_line(record.notes())));
        striped(Row::new(cells), idx, theme)
    });

    let mut widths = vec![
        Constraint::Length(4),
        Constraint::Length(10),
        Constraint::Length(10),
    ];
    widths.extend(std::iter::repeat(Constraint::Length(4)).take(crate::scoring::METRIC_COUNT));
    widths.push(Constraint::Length(6));
    widths.push(Constraint::Fill(1));

    let mut header = vec!["#", "Coin", "Sector"];
    header.extend(Metric::ALL.iter().map(|m| m.short()));
    header.extend(["Score", "Notes"]);

    Table::new(rows, widths).header(
        Row::new(header)
            .style(theme.header_style)
            .bottom_margin(1),
    )
}

fn pipeline_table<'a>(records: &'a [PipelineRecord], theme: &ThemeColors) -> Table<'a> {
    let rows = records.iter().enumerate().map(|(idx, record)| {
        let verdict = record.verdict();
        striped(
            Row::new(vec![
                Cell::from(format!("{}.", idx + 1)).style(Style::default().fg(theme.index_color)),
                Cell::from(record.coin()).style(Style::default().bold()),
                Cell::from(record.sector()),
                Cell::from(format!("{}/{}", record.passes(), STAGE_COUNT)),
                Cell::from(format!("{}%", record.progress_percent())),
                Cell::from(format!("{} {}", verdict.icon(), verdict.label()))
                    .style(Style::default().fg(theme.verdict_color(verdict))),
                Cell::from(single_line(record.notes())),
            ]),
            idx,
            theme,
        )
    });

    let widths = [
        Constraint::Length(4),
        Constraint::Length(12),
        Constraint::Length(12),
        Constraint::Length(7),
        Constraint::Length(6),
        Constraint::Length(14),
        Constraint::Fill(1),
    ];

    let mut header = vec!["#"];
    header.extend(PipelineRecord::HEADERS.iter().copied());

    Table::new(rows, widths).header(
        Row::new(header)
            .style(theme.header_style)
            .bottom_margin(1),
    )
}

// Alternating row background (odd rows get subtle background)
fn striped<'a>(row: Row<'a>, idx: usize, theme: &ThemeColors) -> Row<'a> {
    if idx % 2 == 1 {
        row.style(Style::default().bg(theme.row_alt_bg))
    } else {
        row
    }
}

fn render_chart(frame: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let Worksheet::Scorecard { store, .. } = &app.worksheet else {
        return;
    };

    let block = Block::bordered()
        .title(" Score Comparison ")
        .border_style(Style::default().fg(theme.muted));

    if store.is_empty() {
        frame.render_widget(block, area);
        return;
    }

    // Bars carry hundredths so two-decimal scores keep their height
    let bars: Vec<Bar> = store
        .all()
        .iter()
        .map(|record| {
            let score = record.final_score();
            Bar::default()
                .value((score * 100.0).round() as u64)
                .label(Line::from(truncate(record.coin(), 7)))
                .text_value(format_final_score(score))
                .style(Style::default().fg(theme.score_color(score)))
        })
        .collect();

    let chart = BarChart::default()
        .block(block)
        .data(BarGroup::default().bars(&bars))
        .bar_width(7)
        .bar_gap(1)
        .max(MetricScore::MAX as u64 * 100);

    frame.render_widget(chart, area);
}

fn render_stage_detail(frame: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let block = Block::bordered()
        .title(" Stage ")
        .border_style(Style::default().fg(theme.muted));

    let lines = match app.focused_field() {
        Field::Stage(stage) => {
            let tools = stage
                .tools()
                .iter()
                .map(|t| format!("{} ({})", t.name, t.url))
                .collect::<Vec<_>>()
                .join(", ");
            vec![
                Line::from(Span::styled(stage.title(), theme.focus_style)),
                Line::from(stage.question()),
                Line::from(vec![
                    Span::styled("Tools: ", Style::default().fg(theme.muted)),
                    Span::raw(tools),
                ]),
            ]
        }
        _ => vec![Line::from(Span::styled(
            "Move to a stage to see its question and research tools.",
            Style::default().fg(theme.muted),
        ))],
    };

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_status_bar(frame: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;

    let text = if let Some((ref msg, kind, _)) = app.flash_message {
        let msg_color = match kind {
            FlashKind::Success => theme.flash_success,
            FlashKind::Warning => theme.flash_warning,
            FlashKind::Error => theme.flash_error,
        };
        Line::from(Span::styled(msg.clone(), Style::default().fg(msg_color)))
    } else {
        let hints: Vec<(&str, &str)> = match app.focused_field() {
            Field::Metric(_) => vec![("←/→ 1-5", ":score "), ("Tab", ":next "), ("Enter", ":add ")],
            Field::Stage(_) => vec![
                ("←/→ y/n", ":answer "),
                ("Tab", ":next "),
                ("Enter", ":add "),
                ("^O", ":tool "),
            ],
            _ => vec![("Tab", ":next "), ("Enter", ":add ")],
        };

        let mut spans = Vec::new();
        for (key, label) in hints.into_iter().chain([("^E", ":export "), ("F1", ":help "), ("Esc", ":quit")]) {
            spans.push(Span::styled(key, Style::default().fg(theme.status_key_color)));
            spans.push(Span::raw(label));
            spans.push(Span::raw(" "));
        }
        Line::from(spans)
    };

    frame.render_widget(
        Paragraph::new(text).style(Style::default().bg(theme.status_bar_bg)),
        area,
    );
}

/// Create a centered rectangle with fixed width and height
fn centered_rect_fixed(width: u16, height: u16, area: Rect) -> Rect {
    // Clamp dimensions to area bounds
    let width = width.min(area.width);
    let height = height.min(area.height);

    // Calculate centered position
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;

    Rect {
        x,
        y,
        width,
        height,
    }
}

/// Render the help overlay popup
fn render_help_popup(frame: &mut Frame, theme: &ThemeColors) {
    let popup_area = centered_rect_fixed(54, 15, frame.area());

    // Clear the background
    frame.render_widget(Clear, popup_area);

    let block = Block::bordered()
        .title(Span::styled(" Keyboard Shortcuts ", theme.popup_title))
        .border_style(Style::default().fg(theme.popup_border));
    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    let key_style = Style::default().fg(theme.status_key_color).bold();
    let entries = [
        ("Tab / Down       ", "Next field"),
        ("Shift-Tab / Up   ", "Previous field"),
        ("Left / Right     ", "Move slider, answer no / yes"),
        ("1-5              ", "Set slider value"),
        ("y / n / Space    ", "Answer or toggle a stage"),
        ("Enter            ", "Add coin to the table"),
        ("Ctrl-E           ", "Export CSV"),
        ("Ctrl-O           ", "Open stage research tool"),
        ("PgUp / PgDn      ", "Move table selection"),
        ("Esc / Ctrl-C     ", "Quit"),
    ];

    let mut help_lines: Vec<Line> = entries
        .iter()
        .map(|(key, desc)| Line::from(vec![Span::styled(*key, key_style), Span::raw(*desc)]))
        .collect();
    help_lines.push(Line::from(""));
    help_lines.push(Line::from(Span::styled(
        "Press any key to close",
        Style::default().fg(theme.muted),
    )));

    frame.render_widget(Paragraph::new(help_lines), inner);
}

fn truncate(text: &str, max_width: usize) -> String {
    crate::output::truncate_text(text, max_width)
}

// Keep the end of a long value visible while typing
fn truncate_tail(text: &str, max_width: usize) -> String {
    let count = text.chars().count();
    if count <= max_width {
        text.to_string()
    } else {
        let tail: String = text.chars().skip(count - max_width + 1).collect();
        format!("…{}", tail)
    }
}

fn single_line(text: &str) -> String {
    text.replace(['\r', '\n'], " ")
}
