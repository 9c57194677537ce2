use serde::Serialize;
use std::fmt;

use crate::session::Record;

pub const STAGE_COUNT: usize = 6;

/// An external research tool recommended for a stage. Only linked, never queried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tool {
    pub name: &'static str,
    pub url: &'static str,
}

/// One due-diligence checkpoint of the checklist pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Discovery,
    SmartMoney,
    OnChain,
    Technical,
    Sentiment,
    LiquiditySafety,
}

impl Stage {
    pub const ALL: [Stage; STAGE_COUNT] = [
        Stage::Discovery,
        Stage::SmartMoney,
        Stage::OnChain,
        Stage::Technical,
        Stage::Sentiment,
        Stage::LiquiditySafety,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            Stage::Discovery => "Discovery",
            Stage::SmartMoney => "Smart Money",
            Stage::OnChain => "On-Chain",
            Stage::Technical => "Technical",
            Stage::Sentiment => "Sentiment",
            Stage::LiquiditySafety => "Liquidity & Safety",
        }
    }

    pub fn question(&self) -> &'static str {
        match self {
            Stage::Discovery => "Early, low-cap project in a sector that is gaining attention?",
            Stage::SmartMoney => "Tracked smart-money wallets accumulating?",
            Stage::OnChain => "Holders growing and exchange balances falling?",
            Stage::Technical => "Clean structure with rising volume or an OBV breakout?",
            Stage::Sentiment => "Social buzz rising but not yet euphoric?",
            Stage::LiquiditySafety => "Enough liquidity and a clean contract audit?",
        }
    }

    pub fn tools(&self) -> &'static [Tool] {
        match self {
            Stage::Discovery => &[
                Tool { name: "CoinGecko", url: "https://www.coingecko.com" },
                Tool { name: "DexScreener", url: "https://dexscreener.com" },
            ],
            Stage::SmartMoney => &[Tool { name: "Nansen", url: "https://www.nansen.ai" }],
            Stage::OnChain => &[Tool { name: "Birdeye", url: "https://birdeye.so" }],
            Stage::Technical => &[Tool { name: "TradingView", url: "https://www.tradingview.com" }],
            Stage::Sentiment => &[Tool { name: "LunarCrush", url: "https://lunarcrush.com" }],
            Stage::LiquiditySafety => &[
                Tool { name: "Token Sniffer", url: "https://tokensniffer.com" },
                Tool { name: "DexScreener", url: "https://dexscreener.com" },
            ],
        }
    }

    fn index(&self) -> usize {
        *self as usize
    }
}

/// Yes/no answers to the six stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Answers([bool; STAGE_COUNT]);

impl Answers {
    pub fn new(answers: [bool; STAGE_COUNT]) -> Self {
        Answers(answers)
    }

    pub fn get(&self, stage: Stage) -> bool {
        self.0[stage.index()]
    }

    pub fn set(&mut self, stage: Stage, passed: bool) {
        self.0[stage.index()] = passed;
    }

    pub fn toggle(&mut self, stage: Stage) {
        let i = stage.index();
        self.0[i] = !self.0[i];
    }

    pub fn iter(&self) -> impl Iterator<Item = (Stage, bool)> + '_ {
        Stage::ALL.iter().copied().zip(self.0.iter().copied())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    StrongGem,
    Monitor,
    Skip,
}

impl Verdict {
    pub fn from_passes(passes: u8) -> Self {
        match passes {
            p if p as usize >= STAGE_COUNT => Verdict::StrongGem,
            4..=5 => Verdict::Monitor,
            _ => Verdict::Skip,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Verdict::StrongGem => "Strong Gem",
            Verdict::Monitor => "Monitor",
            Verdict::Skip => "Skip",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Verdict::StrongGem => "💎",
            Verdict::Monitor => "👀",
            Verdict::Skip => "⛔",
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Derived values of one set of answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PipelineOutcome {
    pub passes: u8,
    pub progress_percent: u8,
    pub verdict: Verdict,
}

/// Count the passed stages and map them to a progress percentage and a verdict.
pub fn compute_verdict(answers: &Answers) -> PipelineOutcome {
    let passes = answers.iter().filter(|(_, passed)| *passed).count() as u8;
    let progress_percent = (passes as f64 * 100.0 / STAGE_COUNT as f64).round() as u8;
    PipelineOutcome {
        passes,
        progress_percent,
        verdict: Verdict::from_passes(passes),
    }
}

/// One checklist row. Passes, progress and verdict come from the answers
/// given to the constructor.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PipelineRecord {
    coin: String,
    sector: String,
    passes: u8,
    progress_percent: u8,
    verdict: Verdict,
    notes: String,
}

impl PipelineRecord {
    pub fn new(
        coin: impl Into<String>,
        sector: impl Into<String>,
        answers: &Answers,
        notes: impl Into<String>,
    ) -> Self {
        let outcome = compute_verdict(answers);
        Self {
            coin: coin.into().trim().to_string(),
            sector: sector.into().trim().to_string(),
            passes: outcome.passes,
            progress_percent: outcome.progress_percent,
            verdict: outcome.verdict,
            notes: notes.into(),
        }
    }

    pub fn sector(&self) -> &str {
        &self.sector
    }

    pub fn passes(&self) -> u8 {
        self.passes
    }

    pub fn progress_percent(&self) -> u8 {
        self.progress_percent
    }

    pub fn verdict(&self) -> Verdict {
        self.verdict
    }

    pub fn notes(&self) -> &str {
        &self.notes
    }
}

impl Record for PipelineRecord {
    const HEADERS: &'static [&'static str] =
        &["Coin", "Sector", "Passes", "Progress %", "Verdict", "Notes"];
    const EXPORT_FILE_NAME: &'static str = "hidden_gem_pipeline.csv";

    fn coin(&self) -> &str {
        &self.coin
    }

    fn csv_fields(&self) -> Vec<String> {
        vec![
            self.coin.clone(),
            self.sector.clone(),
            self.passes.to_string(),
            self.progress_percent.to_string(),
            self.verdict.label().to_string(),
            self.notes.clone(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_index_matches_order() {
        for (i, stage) in Stage::ALL.iter().enumerate() {
            assert_eq!(stage.index(), i);
        }
        let mut answers = Answers::default();
        answers.set(Stage::LiquiditySafety, true);
        assert!(answers.get(Stage::LiquiditySafety));
        assert!(!answers.get(Stage::Discovery));
    }

    #[test]
    fn test_four_passes_is_monitor() {
        let answers = Answers::new([true, true, true, true, false, false]);
        let outcome = compute_verdict(&answers);
        assert_eq!(outcome.passes, 4);
        assert_eq!(outcome.progress_percent, 67);
        assert_eq!(outcome.verdict, Verdict::Monitor);
    }

    #[test]
    fn test_all_pass_is_strong_gem() {
        let outcome = compute_verdict(&Answers::new([true; STAGE_COUNT]));
        assert_eq!(outcome.passes, 6);
        assert_eq!(outcome.progress_percent, 100);
        assert_eq!(outcome.verdict, Verdict::StrongGem);
    }

    #[test]
    fn test_no_pass_is_skip() {
        let outcome = compute_verdict(&Answers::default());
        assert_eq!(outcome.passes, 0);
        assert_eq!(outcome.progress_percent, 0);
        assert_eq!(outcome.verdict, Verdict::Skip);
    }

    #[test]
    fn test_every_combination() {
        let expected_progress = [0, 17, 33, 50, 67, 83, 100];
        for bits in 0u8..64 {
            let mut raw = [false; STAGE_COUNT];
            for (i, slot) in raw.iter_mut().enumerate() {
                *slot = bits & (1 << i) != 0;
            }
            let outcome = compute_verdict(&Answers::new(raw));
            let count = raw.iter().filter(|b| **b).count() as u8;

            assert_eq!(outcome.passes, count);
            assert_eq!(outcome.progress_percent, expected_progress[count as usize]);
            assert!(outcome.progress_percent <= 100);
            match count {
                6 => assert_eq!(outcome.verdict, Verdict::StrongGem),
                4 | 5 => assert_eq!(outcome.verdict, Verdict::Monitor),
                _ => assert_eq!(outcome.verdict, Verdict::Skip),
            }
        }
    }

    #[test]
    fn test_order_does_not_matter() {
        let a = compute_verdict(&Answers::new([true, true, true, true, false, false]));
        let b = compute_verdict(&Answers::new([false, true, false, true, true, true]));
        assert_eq!(a, b);
    }

    #[test]
    fn test_answers_toggle_and_set() {
        let mut answers = Answers::default();
        answers.toggle(Stage::OnChain);
        assert!(answers.get(Stage::OnChain));
        answers.toggle(Stage::OnChain);
        assert!(!answers.get(Stage::OnChain));
        answers.set(Stage::Sentiment, true);
        assert!(answers.get(Stage::Sentiment));
        assert_eq!(compute_verdict(&answers).passes, 1);
    }

    #[test]
    fn test_record_bakes_outcome() {
        let answers = Answers::new([true, true, true, true, true, false]);
        let record = PipelineRecord::new(" TIA ", "Modular", &answers, "watch unlocks");
        assert_eq!(record.coin(), "TIA");
        assert_eq!(record.passes(), 5);
        assert_eq!(record.progress_percent(), 83);
        assert_eq!(record.verdict(), Verdict::Monitor);
        assert_eq!(
            record.csv_fields(),
            vec!["TIA", "Modular", "5", "83", "Monitor", "watch unlocks"]
        );
    }

    #[test]
    fn test_every_stage_has_a_tool() {
        for stage in Stage::ALL {
            assert!(!stage.tools().is_empty(), "{} has no tools", stage.title());
            for tool in stage.tools() {
                assert!(tool.url.starts_with("https://"));
            }
        }
    }
}
