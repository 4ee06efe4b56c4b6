pub mod formatter;

pub use formatter::{
    format_criterion_stats, format_json, format_ranked_table, format_result_detail, format_score,
    format_strength_profile, format_tsv, should_use_colors, ScoreFormat,
};
