pub mod formatter;

pub use formatter::{
    bar, format_outcome, format_pipeline_table, format_score, format_score_chart,
    format_score_detail, format_scorecard_table, should_use_colors, truncate_text,
};
