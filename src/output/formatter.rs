use std::io::IsTerminal;
use owo_colors::OwoColorize;
use terminal_size::{Width, terminal_size};

use crate::scoring::{
    format_final_score, PipelineOutcome, PipelineRecord, ScoreRecord, Verdict, STAGE_COUNT,
};
use crate::session::Record;

const EMPTY_MESSAGE: &str = "No coins added yet.";
const MAX_COLUMN_WIDTH: usize = 24;

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Get terminal width, defaulting to None for pipes (unlimited)
fn get_terminal_width() -> Option<usize> {
    terminal_size().map(|(Width(w), _)| w as usize)
}

/// Truncate text to fit available width, accounting for Unicode
pub fn truncate_text(text: &str, max_width: usize) -> String {
    let chars: Vec<char> = text.chars().collect();
    if chars.len() <= max_width {
        text.to_string()
    } else if max_width > 3 {
        format!("{}...", chars[..max_width - 3].iter().collect::<String>())
    } else {
        chars[..max_width].iter().collect()
    }
}

/// Format a final score as "3.40/5"
pub fn format_score(score: f64) -> String {
    format!("{}/5", format_final_score(score))
}

/// Horizontal bar of `width` cells filled in proportion to `ratio` (0.0-1.0)
pub fn bar(ratio: f64, width: usize) -> String {
    let filled = (ratio.clamp(0.0, 1.0) * width as f64).round() as usize;
    let empty = width.saturating_sub(filled);
    format!("{}{}", "█".repeat(filled), "░".repeat(empty))
}

/// Format scorecard rows as an aligned table: Index, Coin, Sector, Score, Notes
pub fn format_scorecard_table(records: &[ScoreRecord], use_colors: bool) -> String {
    if records.is_empty() {
        return EMPTY_MESSAGE.to_string();
    }

    let coin_width = column_width(records.iter().map(|r| r.coin()), "Coin");
    let sector_width = column_width(records.iter().map(|r| r.sector()), "Sector");
    let notes_width = notes_budget(3 + 1 + coin_width + 2 + sector_width + 2 + 6 + 2);

    let header = format!(
        "{:>3} {:<cw$}  {:<sw$}  {:>6}  {}",
        "#",
        "Coin",
        "Sector",
        "Score",
        "Notes",
        cw = coin_width,
        sw = sector_width
    );

    let rows = records.iter().enumerate().map(|(idx, record)| {
        let index_str = format!("{:>2}.", idx + 1);
        let coin = fit_column(record.coin(), coin_width);
        let sector = fit_column(record.sector(), sector_width);
        let score = format!("{:>6}", format_final_score(record.final_score()));
        let notes = fit_notes(record.notes(), notes_width);

        if use_colors {
            format!(
                "{} {}  {}  {}  {}",
                index_str.dimmed(),
                coin.bold(),
                sector.cyan(),
                colorize_score(&score, record.final_score()),
                notes.dimmed()
            )
        } else {
            format!("{} {}  {}  {}  {}", index_str, coin, sector, score, notes)
        }
    });

    std::iter::once(header_line(header, use_colors))
        .chain(rows)
        .map(|line| line.trim_end().to_string())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format pipeline rows as an aligned table: Index, Coin, Sector, Passes, Progress, Verdict, Notes
pub fn format_pipeline_table(records: &[PipelineRecord], use_colors: bool) -> String {
    if records.is_empty() {
        return EMPTY_MESSAGE.to_string();
    }

    let coin_width = column_width(records.iter().map(|r| r.coin()), "Coin");
    let sector_width = column_width(records.iter().map(|r| r.sector()), "Sector");
    let verdict_width = "Strong Gem".len();
    let notes_width =
        notes_budget(3 + 1 + coin_width + 2 + sector_width + 2 + 6 + 2 + 4 + 2 + verdict_width + 2);

    let header = format!(
        "{:>3} {:<cw$}  {:<sw$}  {:>6}  {:>4}  {:<vw$}  {}",
        "#",
        "Coin",
        "Sector",
        "Passes",
        "%",
        "Verdict",
        "Notes",
        cw = coin_width,
        sw = sector_width,
        vw = verdict_width
    );

    let rows = records.iter().enumerate().map(|(idx, record)| {
        let index_str = format!("{:>2}.", idx + 1);
        let coin = fit_column(record.coin(), coin_width);
        let sector = fit_column(record.sector(), sector_width);
        let passes = format!("{:>6}", format!("{}/{}", record.passes(), STAGE_COUNT));
        let progress = format!("{:>4}", format!("{}%", record.progress_percent()));
        let verdict = format!("{:<width$}", record.verdict().label(), width = verdict_width);
        let notes = fit_notes(record.notes(), notes_width);

        if use_colors {
            format!(
                "{} {}  {}  {}  {}  {}  {}",
                index_str.dimmed(),
                coin.bold(),
                sector.cyan(),
                passes,
                progress,
                colorize_verdict(&verdict, record.verdict()),
                notes.dimmed()
            )
        } else {
            format!(
                "{} {}  {}  {}  {}  {}  {}",
                index_str, coin, sector, passes, progress, verdict, notes
            )
        }
    });

    std::iter::once(header_line(header, use_colors))
        .chain(rows)
        .map(|line| line.trim_end().to_string())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Text bar chart of final score per coin, scaled to the 5-point maximum
pub fn format_score_chart(records: &[ScoreRecord], use_colors: bool) -> String {
    if records.is_empty() {
        return String::new();
    }

    let coin_width = column_width(records.iter().map(|r| r.coin()), "");
    let bar_width = 20;

    records
        .iter()
        .map(|record| {
            let coin = fit_column(record.coin(), coin_width);
            let bar_str = bar(record.final_score() / 5.0, bar_width);
            let score = format_final_score(record.final_score());
            if use_colors {
                format!(
                    "{}  {} {}",
                    coin,
                    colorize_score(&bar_str, record.final_score()),
                    score.bold()
                )
            } else {
                format!("{}  {} {}", coin, bar_str, score)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Single-entry summary: "Passes 4/6  ██████████░░░░░ 67%  Monitor"
pub fn format_outcome(outcome: &PipelineOutcome, use_colors: bool) -> String {
    let bar_str = bar(outcome.progress_percent as f64 / 100.0, 15);
    let verdict = format!("{} {}", outcome.verdict.icon(), outcome.verdict.label());
    if use_colors {
        format!(
            "Passes {}/{}  {} {}%  {}",
            outcome.passes,
            STAGE_COUNT,
            bar_str,
            outcome.progress_percent,
            colorize_verdict(&verdict, outcome.verdict).bold()
        )
    } else {
        format!(
            "Passes {}/{}  {} {}%  {}",
            outcome.passes, STAGE_COUNT, bar_str, outcome.progress_percent, verdict
        )
    }
}

/// Format a scorecard entry's detail (verbose mode)
pub fn format_score_detail(record: &ScoreRecord) -> String {
    let mut lines = vec![format!("{} ({})", record.coin(), record.sector())];
    for (metric, score) in record.metrics().iter() {
        lines.push(format!(
            "  {:<34} {} {}",
            metric.label(),
            bar(score.get() as f64 / 5.0, 5),
            score.get()
        ));
    }
    lines.push(format!("  Final Confluence Score: {}", format_score(record.final_score())));
    lines.join("\n")
}

fn header_line(header: String, use_colors: bool) -> String {
    if use_colors {
        header.bold().underline().to_string()
    } else {
        header
    }
}

fn colorize_score(text: &str, score: f64) -> String {
    if score >= 4.0 {
        text.green().to_string()
    } else if score >= 3.0 {
        text.yellow().to_string()
    } else {
        text.red().to_string()
    }
}

fn colorize_verdict(text: &str, verdict: Verdict) -> String {
    match verdict {
        Verdict::StrongGem => text.green().to_string(),
        Verdict::Monitor => text.yellow().to_string(),
        Verdict::Skip => text.red().to_string(),
    }
}

fn column_width<'a>(values: impl Iterator<Item = &'a str>, header: &str) -> usize {
    values
        .map(|v| v.chars().count())
        .chain(std::iter::once(header.chars().count()))
        .max()
        .unwrap_or(0)
        .min(MAX_COLUMN_WIDTH)
}

/// Truncate then pad so overlong values keep later columns aligned
fn fit_column(value: &str, width: usize) -> String {
    format!("{:<width$}", truncate_text(value, width), width = width)
}

/// Width left for notes after the fixed columns; None when piped
fn notes_budget(fixed_width: usize) -> Option<usize> {
    get_terminal_width().map(|w| w.saturating_sub(fixed_width).max(10))
}

// Notes may hold newlines; the table keeps one line per record
fn fit_notes(notes: &str, width: Option<usize>) -> String {
    let single_line = notes.replace(['\r', '\n'], " ");
    match width {
        Some(w) => truncate_text(&single_line, w),
        None => single_line,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::{compute_verdict, Answers, Metric, MetricScore, Metrics};

    fn scorecard(coin: &str, value: i64, notes: &str) -> ScoreRecord {
        ScoreRecord::new(
            coin,
            "AI",
            Metrics::uniform(MetricScore::new(Metric::Liquidity, value).unwrap()),
            notes,
        )
    }

    #[test]
    fn test_long_names_keep_columns_aligned() {
        let long = "X".repeat(40);
        let records = vec![
            ScoreRecord::new(long.as_str(), long.as_str(), Metrics::default(), ""),
            ScoreRecord::new("BTC", "L1", Metrics::default(), ""),
        ];
        let result = format_scorecard_table(&records, false);
        let lines: Vec<&str> = result.lines().collect();
        assert!(lines[1].contains("..."));
        assert!(!lines[1].contains(&long));
        assert_eq!(lines[1].find("3.00"), lines[2].find("3.00"));
        assert_eq!(lines[1].chars().count(), lines[2].chars().count());

        let answers = Answers::default();
        let records = vec![
            PipelineRecord::new(long.as_str(), "AI", &answers, ""),
            PipelineRecord::new("SOL", "AI", &answers, ""),
        ];
        let result = format_pipeline_table(&records, false);
        let lines: Vec<&str> = result.lines().collect();
        assert_eq!(lines[1].find("0/6"), lines[2].find("0/6"));
    }

    #[test]
    fn test_empty_tables() {
        assert_eq!(format_scorecard_table(&[], false), "No coins added yet.");
        assert_eq!(format_pipeline_table(&[], false), "No coins added yet.");
        assert_eq!(format_score_chart(&[], false), "");
    }

    #[test]
    fn test_scorecard_table_rows() {
        let records = vec![scorecard("FET", 4, "strong"), scorecard("RNDR", 2, "")];
        let result = format_scorecard_table(&records, false);
        let lines: Vec<&str> = result.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].contains("Coin"));
        assert!(lines[0].contains("Score"));
        assert!(lines[1].starts_with(" 1. FET"));
        assert!(lines[1].contains("4.00"));
        assert!(lines[1].contains("strong"));
        assert!(lines[2].starts_with(" 2. RNDR"));
        assert!(lines[2].contains("2.00"));
    }

    #[test]
    fn test_table_keeps_multiline_notes_on_one_line() {
        let records = vec![scorecard("FET", 3, "one\ntwo")];
        let result = format_scorecard_table(&records, false);
        assert_eq!(result.lines().count(), 2);
        assert!(result.contains("one two"));
    }

    #[test]
    fn test_pipeline_table_rows() {
        let records = vec![PipelineRecord::new(
            "TIA",
            "Modular",
            &Answers::new([true, true, true, true, false, false]),
            "",
        )];
        let result = format_pipeline_table(&records, false);
        let lines: Vec<&str> = result.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[1].contains("4/6"));
        assert!(lines[1].contains("67%"));
        assert!(lines[1].contains("Monitor"));
    }

    #[test]
    fn test_score_chart_scales_to_five() {
        let records = vec![scorecard("FET", 5, ""), scorecard("RNDR", 1, "")];
        let result = format_score_chart(&records, false);
        let lines: Vec<&str> = result.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains(&"█".repeat(20)));
        assert!(lines[0].ends_with("5.00"));
        assert!(lines[1].contains(&format!("{}{}", "█".repeat(4), "░".repeat(16))));
    }

    #[test]
    fn test_format_outcome() {
        let outcome = compute_verdict(&Answers::new([true; 6]));
        let result = format_outcome(&outcome, false);
        assert!(result.starts_with("Passes 6/6"));
        assert!(result.contains("100%"));
        assert!(result.contains("Strong Gem"));
    }

    #[test]
    fn test_format_score() {
        assert_eq!(format_score(3.4), "3.40/5");
        assert_eq!(format_score(3.0), "3.00/5");
    }

    #[test]
    fn test_bar_bounds() {
        assert_eq!(bar(0.0, 4), "░░░░");
        assert_eq!(bar(1.0, 4), "████");
        assert_eq!(bar(2.0, 4), "████");
        assert_eq!(bar(0.5, 4), "██░░");
    }

    #[test]
    fn test_score_detail_lists_every_metric() {
        let result = format_score_detail(&scorecard("FET", 3, ""));
        assert_eq!(result.lines().count(), 12);
        assert!(result.contains("Smart Money Inflow"));
        assert!(result.ends_with("3.00/5"));
    }

    #[test]
    fn test_truncate_text() {
        assert_eq!(truncate_text("Short", 20), "Short");
        assert_eq!(truncate_text("This is a very long note", 15), "This is a ve...");
        assert_eq!(truncate_text("Hello world", 3), "Hel");
    }
}
