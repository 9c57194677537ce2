pub mod pipeline;
pub mod scorecard;
pub mod validation;

pub use pipeline::{
    compute_verdict, Answers, PipelineOutcome, PipelineRecord, Stage, Tool, Verdict, STAGE_COUNT,
};
pub use scorecard::{
    compute_final_score, format_final_score, Metric, MetricScore, Metrics, ScoreRecord,
    METRIC_COUNT,
};
pub use validation::{parse_answer, validate_answers, validate_metrics};
