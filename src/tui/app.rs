use crate::error::ValidationError;
use crate::export;
use crate::scoring::{MetricScore, PipelineRecord, ScoreRecord};
use crate::session::{Record, SessionStore};
use crate::tui::form::{Field, Form, Worksheet};
use crate::tui::theme::ThemeColors;
use std::path::PathBuf;
use std::time::Instant;

const FLASH_SECS: u64 = 3;

#[derive(Debug, Clone, PartialEq)]
pub enum InputMode {
    Editing,
    Help,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlashKind {
    Success,
    Warning,
    Error,
}

pub struct App {
    pub form: Form,
    pub worksheet: Worksheet,
    pub input_mode: InputMode,
    pub table_state: ratatui::widgets::TableState,
    pub flash_message: Option<(String, FlashKind, Instant)>,
    pub should_quit: bool,
    pub export_dir: PathBuf,
    pub theme: ThemeColors,
    exported_rows: usize,
}

impl App {
    pub fn new(worksheet: Worksheet, export_dir: PathBuf, theme: ThemeColors) -> Self {
        Self {
            form: Form::default(),
            worksheet,
            input_mode: InputMode::Editing,
            table_state: ratatui::widgets::TableState::default(),
            flash_message: None,
            should_quit: false,
            export_dir,
            theme,
            exported_rows: 0,
        }
    }

    /// Weighted 1-5 slider worksheet
    pub fn scorecard(starting: MetricScore, export_dir: PathBuf, theme: ThemeColors) -> Self {
        Self::new(Worksheet::scorecard(starting), export_dir, theme)
    }

    /// Six-stage yes/no checklist worksheet
    pub fn pipeline(export_dir: PathBuf, theme: ThemeColors) -> Self {
        Self::new(Worksheet::pipeline(), export_dir, theme)
    }

    pub fn fields(&self) -> Vec<Field> {
        self.worksheet.fields()
    }

    pub fn focused_field(&self) -> Field {
        let fields = self.fields();
        fields
            .get(self.form.focus())
            .copied()
            .unwrap_or(Field::Coin)
    }

    pub fn focus_next(&mut self) {
        let count = self.fields().len();
        self.form.focus_next(count);
    }

    pub fn focus_previous(&mut self) {
        let count = self.fields().len();
        self.form.focus_previous(count);
    }

    /// Route a typed character to the focused field
    ///
    /// Text fields append it; sliders take a digit 1-5; stages take y, n or space.
    pub fn type_char(&mut self, c: char) {
        let field = self.focused_field();
        if let Some(text) = self.form.text_mut(field) {
            text.push(c);
            return;
        }

        match (field, &mut self.worksheet) {
            (Field::Metric(metric), Worksheet::Scorecard { metrics, .. }) => {
                if let Some(digit) = c.to_digit(10) {
                    if let Ok(score) = MetricScore::new(metric, digit as i64) {
                        metrics.set(metric, score);
                    }
                }
            }
            (Field::Stage(stage), Worksheet::Pipeline { answers, .. }) => match c {
                'y' | 'Y' => answers.set(stage, true),
                'n' | 'N' => answers.set(stage, false),
                ' ' => answers.toggle(stage),
                _ => {}
            },
            _ => {}
        }
    }

    pub fn backspace(&mut self) {
        let field = self.focused_field();
        if let Some(text) = self.form.text_mut(field) {
            text.pop();
        }
    }

    /// Left/Right on the focused control: step a slider, or set a stage to no/yes
    pub fn adjust(&mut self, delta: i64) {
        let field = self.focused_field();
        match (field, &mut self.worksheet) {
            (Field::Metric(metric), Worksheet::Scorecard { metrics, .. }) => {
                let stepped = metrics.get(metric).step(delta);
                metrics.set(metric, stepped);
            }
            (Field::Stage(stage), Worksheet::Pipeline { answers, .. }) => {
                if delta != 0 {
                    answers.set(stage, delta > 0);
                }
            }
            _ => {}
        }
    }

    /// Build a record from the current inputs and append it to the session.
    ///
    /// The inputs stay as they are afterwards so a similar coin can be
    /// scored with a few tweaks.
    pub fn add_entry(&mut self) {
        let coin = self.form.coin.clone();
        let sector = self.form.sector.clone();
        let notes = self.form.notes.clone();

        let result: Result<(String, usize), ValidationError> = match &mut self.worksheet {
            Worksheet::Scorecard { metrics, store } => {
                let record = ScoreRecord::new(coin, sector, *metrics, notes);
                append(store, record)
            }
            Worksheet::Pipeline { answers, store } => {
                let record = PipelineRecord::new(coin, sector, answers, notes);
                append(store, record)
            }
        };

        match result {
            Ok((coin, count)) => {
                self.table_state.select(Some(count - 1));
                self.show_flash(format!("Added {} ✅", coin), FlashKind::Success);
            }
            Err(e) => {
                log::debug!("Add rejected: {}", e);
                self.show_flash(format!("{}. Nothing was added.", e), FlashKind::Warning);
            }
        }
    }

    /// Write the whole session to the export directory as CSV
    pub fn export(&mut self) {
        if self.worksheet.record_count() == 0 {
            self.show_flash("Nothing to export yet".to_string(), FlashKind::Warning);
            return;
        }

        let result = match &self.worksheet {
            Worksheet::Scorecard { store, .. } => write_store(&self.export_dir, store),
            Worksheet::Pipeline { store, .. } => write_store(&self.export_dir, store),
        };

        match result {
            Ok((path, rows)) => {
                self.exported_rows = rows;
                self.show_flash(
                    format!("Exported {} rows to {}", rows, path.display()),
                    FlashKind::Success,
                );
            }
            Err(e) => {
                log::error!("Export failed: {:#}", e);
                self.show_flash(format!("Export failed: {}", e), FlashKind::Error);
            }
        }
    }

    /// Open the first research tool of the focused stage in the browser
    pub fn open_focused_tool(&mut self) {
        let stage = match self.focused_field() {
            Field::Stage(stage) => stage,
            _ => {
                self.show_flash(
                    "Focus a stage to open its research tool".to_string(),
                    FlashKind::Warning,
                );
                return;
            }
        };

        let Some(tool) = stage.tools().first() else {
            return;
        };

        match crate::browser::open_tool(tool) {
            Ok(()) => self.show_flash(format!("Opened: {}", tool.name), FlashKind::Success),
            Err(e) => self.show_flash(format!("Failed to open browser: {}", e), FlashKind::Error),
        }
    }

    /// Rows added since the last successful export
    pub fn unexported_rows(&self) -> usize {
        self.worksheet.record_count().saturating_sub(self.exported_rows)
    }

    pub fn next_row(&mut self) {
        let count = self.worksheet.record_count();
        if count == 0 {
            return;
        }
        let i = match self.table_state.selected() {
            Some(i) if i + 1 < count => i + 1,
            Some(_) => 0,
            None => 0,
        };
        self.table_state.select(Some(i));
    }

    pub fn previous_row(&mut self) {
        let count = self.worksheet.record_count();
        if count == 0 {
            return;
        }
        let i = match self.table_state.selected() {
            Some(0) | None => count - 1,
            Some(i) => i - 1,
        };
        self.table_state.select(Some(i));
    }

    pub fn update_flash(&mut self) {
        if let Some((_, _, timestamp)) = self.flash_message {
            if timestamp.elapsed().as_secs() >= FLASH_SECS {
                self.flash_message = None;
            }
        }
    }

    pub fn show_flash(&mut self, msg: String, kind: FlashKind) {
        self.flash_message = Some((msg, kind, Instant::now()));
    }

    /// Show help overlay
    pub fn show_help(&mut self) {
        self.input_mode = InputMode::Help;
    }

    /// Dismiss help overlay
    pub fn dismiss_help(&mut self) {
        self.input_mode = InputMode::Editing;
    }
}

fn append<R: Record>(
    store: &mut SessionStore<R>,
    record: R,
) -> Result<(String, usize), ValidationError> {
    let coin = store.append(record)?.coin().to_string();
    Ok((coin, store.len()))
}

fn write_store<R: Record>(
    dir: &std::path::Path,
    store: &SessionStore<R>,
) -> anyhow::Result<(PathBuf, usize)> {
    let path = export::export_path::<R>(dir);
    export::write_csv(&path, store.all())?;
    Ok((path, store.len()))
}
