use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::error::ValidationError;
use crate::session::Record;

pub const METRIC_COUNT: usize = 10;

/// One of the ten scorecard criteria, in column order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Metric {
    MarketContext,
    SectorFlow,
    SmartMoney,
    ExchangeFlow,
    VolumeOi,
    ChartSetup,
    ObvStrength,
    SocialBuzz,
    Liquidity,
    ContractSafety,
}

impl Metric {
    pub const ALL: [Metric; METRIC_COUNT] = [
        Metric::MarketContext,
        Metric::SectorFlow,
        Metric::SmartMoney,
        Metric::ExchangeFlow,
        Metric::VolumeOi,
        Metric::ChartSetup,
        Metric::ObvStrength,
        Metric::SocialBuzz,
        Metric::Liquidity,
        Metric::ContractSafety,
    ];

    /// CSV column and table header
    pub fn column(&self) -> &'static str {
        match self {
            Metric::MarketContext => "Market Context",
            Metric::SectorFlow => "Sector Flow",
            Metric::SmartMoney => "Smart Money",
            Metric::ExchangeFlow => "Exchange Flow",
            Metric::VolumeOi => "Volume & OI",
            Metric::ChartSetup => "Chart Setup",
            Metric::ObvStrength => "OBV Strength",
            Metric::SocialBuzz => "Social Buzz",
            Metric::Liquidity => "Liquidity",
            Metric::ContractSafety => "Contract Safety",
        }
    }

    /// Longer label shown next to the slider
    pub fn label(&self) -> &'static str {
        match self {
            Metric::MarketContext => "Market Context",
            Metric::SectorFlow => "Sector Flow",
            Metric::SmartMoney => "Smart Money Inflow",
            Metric::ExchangeFlow => "Exchange Flow (Outflows Bullish)",
            Metric::VolumeOi => "Volume & Open Interest",
            Metric::ChartSetup => "Chart Structure",
            Metric::ObvStrength => "OBV & Volume Strength",
            Metric::SocialBuzz => "Social Buzz (Narrative Stage)",
            Metric::Liquidity => "Liquidity / Volume",
            Metric::ContractSafety => "Contract & Security",
        }
    }

    /// Abbreviated header for narrow table columns, at most 4 chars
    pub fn short(&self) -> &'static str {
        match self {
            Metric::MarketContext => "Mkt",
            Metric::SectorFlow => "SecF",
            Metric::SmartMoney => "SmM",
            Metric::ExchangeFlow => "ExF",
            Metric::VolumeOi => "VOI",
            Metric::ChartSetup => "Cht",
            Metric::ObvStrength => "OBV",
            Metric::SocialBuzz => "Soc",
            Metric::Liquidity => "Liq",
            Metric::ContractSafety => "Safe",
        }
    }

    fn index(&self) -> usize {
        *self as usize
    }
}

/// A single slider value, always within 1-5.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct MetricScore(u8);

impl MetricScore {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;
    pub const NEUTRAL: MetricScore = MetricScore(3);

    /// Accept a raw integer for `metric`, rejecting anything outside 1-5
    pub fn new(metric: Metric, value: i64) -> Result<Self, ValidationError> {
        if (Self::MIN as i64..=Self::MAX as i64).contains(&value) {
            Ok(MetricScore(value as u8))
        } else {
            Err(ValidationError::MetricOutOfRange {
                metric: metric.column(),
                value,
            })
        }
    }

    /// Clamp any value into 1-5
    pub fn clamped(value: i64) -> Self {
        MetricScore(value.clamp(Self::MIN as i64, Self::MAX as i64) as u8)
    }

    pub fn get(&self) -> u8 {
        self.0
    }

    /// Move the slider by `delta` steps, stopping at either end
    pub fn step(&self, delta: i64) -> Self {
        Self::clamped(self.0 as i64 + delta)
    }
}

impl Default for MetricScore {
    fn default() -> Self {
        Self::NEUTRAL
    }
}

/// The ten slider positions of one scorecard entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Metrics([MetricScore; METRIC_COUNT]);

impl Metrics {
    /// Every metric at the same starting position
    pub fn uniform(score: MetricScore) -> Self {
        Metrics([score; METRIC_COUNT])
    }

    pub fn from_scores(scores: [MetricScore; METRIC_COUNT]) -> Self {
        Metrics(scores)
    }

    pub fn get(&self, metric: Metric) -> MetricScore {
        self.0[metric.index()]
    }

    pub fn set(&mut self, metric: Metric, score: MetricScore) {
        self.0[metric.index()] = score;
    }

    /// Pairs of (metric, score) in column order
    pub fn iter(&self) -> impl Iterator<Item = (Metric, MetricScore)> + '_ {
        Metric::ALL.iter().copied().zip(self.0.iter().copied())
    }
}

impl Serialize for Metrics {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(METRIC_COUNT))?;
        for (metric, score) in self.iter() {
            map.serialize_entry(metric.column(), &score)?;
        }
        map.end()
    }
}

/// Mean of the ten metrics, rounded to two decimals.
pub fn compute_final_score(metrics: &Metrics) -> f64 {
    let sum: u32 = metrics.iter().map(|(_, s)| s.get() as u32).sum();
    round2(sum as f64 / METRIC_COUNT as f64)
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Format a final score the way it is stored and exported ("3.40")
pub fn format_final_score(score: f64) -> String {
    format!("{:.2}", score)
}

/// One scorecard row. The final score is derived from the metrics when the
/// record is built and cannot be set on its own.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreRecord {
    coin: String,
    sector: String,
    metrics: Metrics,
    final_score: f64,
    notes: String,
}

impl ScoreRecord {
    pub fn new(
        coin: impl Into<String>,
        sector: impl Into<String>,
        metrics: Metrics,
        notes: impl Into<String>,
    ) -> Self {
        Self {
            coin: coin.into().trim().to_string(),
            sector: sector.into().trim().to_string(),
            final_score: compute_final_score(&metrics),
            metrics,
            notes: notes.into(),
        }
    }

    pub fn sector(&self) -> &str {
        &self.sector
    }

    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    pub fn final_score(&self) -> f64 {
        self.final_score
    }

    pub fn notes(&self) -> &str {
        &self.notes
    }
}

const SCORECARD_HEADERS: [&str; METRIC_COUNT + 4] = [
    "Coin",
    "Sector",
    "Market Context",
    "Sector Flow",
    "Smart Money",
    "Exchange Flow",
    "Volume & OI",
    "Chart Setup",
    "OBV Strength",
    "Social Buzz",
    "Liquidity",
    "Contract Safety",
    "Final Score",
    "Notes",
];

impl Record for ScoreRecord {
    const HEADERS: &'static [&'static str] = &SCORECARD_HEADERS;
    const EXPORT_FILE_NAME: &'static str = "hidden_gem_scores.csv";

    fn coin(&self) -> &str {
        &self.coin
    }

    fn csv_fields(&self) -> Vec<String> {
        let mut fields = Vec::with_capacity(Self::HEADERS.len());
        fields.push(self.coin.clone());
        fields.push(self.sector.clone());
        fields.extend(self.metrics.iter().map(|(_, s)| s.get().to_string()));
        fields.push(format_final_score(self.final_score));
        fields.push(self.notes.clone());
        fields
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metric_index_matches_column_order() {
        for (i, metric) in Metric::ALL.iter().enumerate() {
            assert_eq!(metric.index(), i);
        }
        let mut metrics = Metrics::default();
        metrics.set(Metric::ContractSafety, MetricScore::clamped(5));
        let last = metrics.iter().last().unwrap();
        assert_eq!(last, (Metric::ContractSafety, MetricScore::clamped(5)));
    }

    #[test]
    fn test_short_headers_fit_metric_columns() {
        for metric in Metric::ALL {
            assert!(!metric.short().is_empty());
            assert!(metric.short().chars().count() <= 4, "{:?}", metric);
        }
    }

    fn metrics_from(values: [u8; METRIC_COUNT]) -> Metrics {
        let mut metrics = Metrics::default();
        for (metric, value) in Metric::ALL.iter().zip(values) {
            metrics.set(*metric, MetricScore::new(*metric, value as i64).unwrap());
        }
        metrics
    }

    #[test]
    fn test_all_threes_score_three() {
        let metrics = Metrics::uniform(MetricScore::NEUTRAL);
        assert_eq!(compute_final_score(&metrics), 3.0);
    }

    #[test]
    fn test_extremes() {
        assert_eq!(compute_final_score(&metrics_from([1; 10])), 1.0);
        assert_eq!(compute_final_score(&metrics_from([5; 10])), 5.0);
    }

    #[test]
    fn test_mean_of_mixed_scores() {
        // sum = 34
        let metrics = metrics_from([5, 4, 3, 2, 1, 5, 4, 3, 4, 3]);
        assert_eq!(compute_final_score(&metrics), 3.4);
    }

    #[test]
    fn test_score_stays_in_range_and_has_two_decimals() {
        for low in 1..=5u8 {
            for high in low..=5u8 {
                for split in 0..=METRIC_COUNT {
                    let mut values = [low; METRIC_COUNT];
                    for v in values.iter_mut().take(split) {
                        *v = high;
                    }
                    let score = compute_final_score(&metrics_from(values));
                    assert!((1.0..=5.0).contains(&score));
                    let expected = values.iter().map(|v| *v as f64).sum::<f64>() / 10.0;
                    assert!((score - expected).abs() < 0.005);
                    assert!(((score * 100.0).round() - score * 100.0).abs() < 1e-9);
                }
            }
        }
    }

    #[test]
    fn test_metric_score_rejects_out_of_range() {
        assert_eq!(
            MetricScore::new(Metric::Liquidity, 0),
            Err(ValidationError::MetricOutOfRange {
                metric: "Liquidity",
                value: 0
            })
        );
        assert!(MetricScore::new(Metric::Liquidity, 6).is_err());
        assert!(MetricScore::new(Metric::Liquidity, -3).is_err());
        assert_eq!(MetricScore::new(Metric::Liquidity, 5).unwrap().get(), 5);
    }

    #[test]
    fn test_metric_score_step_clamps() {
        let score = MetricScore::NEUTRAL;
        assert_eq!(score.step(1).get(), 4);
        assert_eq!(score.step(10).get(), 5);
        assert_eq!(score.step(-10).get(), 1);
    }

    #[test]
    fn test_record_derives_final_score() {
        let record = ScoreRecord::new(
            "  SOL ",
            "L1",
            metrics_from([5, 4, 3, 2, 1, 5, 4, 3, 4, 3]),
            "",
        );
        assert_eq!(record.coin(), "SOL");
        assert_eq!(record.final_score(), 3.4);
    }

    #[test]
    fn test_csv_fields_match_headers() {
        let record = ScoreRecord::new("SOL", "L1", Metrics::default(), "solid");
        let fields = record.csv_fields();
        assert_eq!(fields.len(), ScoreRecord::HEADERS.len());
        assert_eq!(fields[0], "SOL");
        assert_eq!(fields[2], "3");
        assert_eq!(fields[12], "3.00");
        assert_eq!(fields[13], "solid");
    }

    #[test]
    fn test_headers_follow_metric_columns() {
        for (i, metric) in Metric::ALL.iter().enumerate() {
            assert_eq!(ScoreRecord::HEADERS[i + 2], metric.column());
        }
    }

    #[test]
    fn test_json_uses_metric_columns() {
        let record = ScoreRecord::new("SOL", "L1", Metrics::default(), "");
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["coin"], "SOL");
        assert_eq!(json["metrics"]["Smart Money"], 3);
        assert_eq!(json["final_score"], 3.0);
    }
}
