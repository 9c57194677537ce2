use crate::scoring::{
    compute_final_score, compute_verdict, Answers, Metric, MetricScore, Metrics, PipelineOutcome,
    PipelineRecord, ScoreRecord, Stage,
};
use crate::session::SessionStore;

/// A focusable input on the worksheet form
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Coin,
    Sector,
    Metric(Metric),
    Stage(Stage),
    Notes,
}

impl Field {
    pub fn label(&self) -> &'static str {
        match self {
            Field::Coin => "Coin Name / Symbol",
            Field::Sector => "Sector (e.g., AI, DeFi, Gaming)",
            Field::Metric(metric) => metric.label(),
            Field::Stage(stage) => stage.title(),
            Field::Notes => "Notes (optional)",
        }
    }

    pub fn is_text(&self) -> bool {
        matches!(self, Field::Coin | Field::Sector | Field::Notes)
    }
}

/// Free-text inputs and the focus cursor shared by both worksheets
#[derive(Debug, Clone, Default)]
pub struct Form {
    pub coin: String,
    pub sector: String,
    pub notes: String,
    focus: usize,
}

impl Form {
    pub fn focus(&self) -> usize {
        self.focus
    }

    pub fn focus_next(&mut self, field_count: usize) {
        if field_count > 0 {
            self.focus = (self.focus + 1) % field_count;
        }
    }

    pub fn focus_previous(&mut self, field_count: usize) {
        if field_count > 0 {
            self.focus = (self.focus + field_count - 1) % field_count;
        }
    }

    pub fn text(&self, field: Field) -> Option<&str> {
        match field {
            Field::Coin => Some(&self.coin),
            Field::Sector => Some(&self.sector),
            Field::Notes => Some(&self.notes),
            _ => None,
        }
    }

    pub fn text_mut(&mut self, field: Field) -> Option<&mut String> {
        match field {
            Field::Coin => Some(&mut self.coin),
            Field::Sector => Some(&mut self.sector),
            Field::Notes => Some(&mut self.notes),
            _ => None,
        }
    }
}

/// The worksheet variant: its own inputs plus the session rows they produce
#[derive(Debug, Clone)]
pub enum Worksheet {
    Scorecard {
        metrics: Metrics,
        store: SessionStore<ScoreRecord>,
    },
    Pipeline {
        answers: Answers,
        store: SessionStore<PipelineRecord>,
    },
}

impl Worksheet {
    pub fn scorecard(starting: MetricScore) -> Self {
        Worksheet::Scorecard {
            metrics: Metrics::uniform(starting),
            store: SessionStore::new(),
        }
    }

    pub fn pipeline() -> Self {
        Worksheet::Pipeline {
            answers: Answers::default(),
            store: SessionStore::new(),
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Worksheet::Scorecard { .. } => "Scorecard",
            Worksheet::Pipeline { .. } => "Pipeline",
        }
    }

    /// Fields in focus order: coin, sector, the variant's inputs, notes
    pub fn fields(&self) -> Vec<Field> {
        let mut fields = vec![Field::Coin, Field::Sector];
        match self {
            Worksheet::Scorecard { .. } => fields.extend(Metric::ALL.iter().map(|m| Field::Metric(*m))),
            Worksheet::Pipeline { .. } => fields.extend(Stage::ALL.iter().map(|s| Field::Stage(*s))),
        }
        fields.push(Field::Notes);
        fields
    }

    pub fn record_count(&self) -> usize {
        match self {
            Worksheet::Scorecard { store, .. } => store.len(),
            Worksheet::Pipeline { store, .. } => store.len(),
        }
    }

    /// Live final score of the scorecard inputs
    pub fn current_score(&self) -> Option<f64> {
        match self {
            Worksheet::Scorecard { metrics, .. } => Some(compute_final_score(metrics)),
            Worksheet::Pipeline { .. } => None,
        }
    }

    /// Live outcome of the pipeline answers
    pub fn current_outcome(&self) -> Option<PipelineOutcome> {
        match self {
            Worksheet::Scorecard { .. } => None,
            Worksheet::Pipeline { answers, .. } => Some(compute_verdict(answers)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scorecard_fields() {
        let fields = Worksheet::scorecard(MetricScore::NEUTRAL).fields();
        assert_eq!(fields.len(), 13);
        assert_eq!(fields[0], Field::Coin);
        assert_eq!(fields[2], Field::Metric(Metric::MarketContext));
        assert_eq!(fields[12], Field::Notes);
    }

    #[test]
    fn test_pipeline_fields() {
        let fields = Worksheet::pipeline().fields();
        assert_eq!(fields.len(), 9);
        assert_eq!(fields[2], Field::Stage(Stage::Discovery));
        assert_eq!(fields[7], Field::Stage(Stage::LiquiditySafety));
    }

    #[test]
    fn test_focus_wraps() {
        let mut form = Form::default();
        form.focus_previous(3);
        assert_eq!(form.focus(), 2);
        form.focus_next(3);
        assert_eq!(form.focus(), 0);
        form.focus_next(3);
        assert_eq!(form.focus(), 1);
    }

    #[test]
    fn test_text_only_for_text_fields() {
        let mut form = Form::default();
        form.text_mut(Field::Coin).unwrap().push_str("SOL");
        assert_eq!(form.text(Field::Coin), Some("SOL"));
        assert!(form.text_mut(Field::Stage(Stage::OnChain)).is_none());
        assert!(!Field::Metric(Metric::SectorFlow).is_text());
        assert!(Field::Notes.is_text());
    }

    #[test]
    fn test_live_values() {
        let scorecard = Worksheet::scorecard(MetricScore::clamped(5));
        assert_eq!(scorecard.current_score(), Some(5.0));
        assert!(scorecard.current_outcome().is_none());

        let pipeline = Worksheet::pipeline();
        assert!(pipeline.current_score().is_none());
        assert_eq!(pipeline.current_outcome().unwrap().passes, 0);
    }
}
