pub mod formatter;
pub mod report;

pub use formatter::{
    format_factors, format_method_detail, format_ranking, format_validation, format_weights,
    should_use_colors, RankingView, ScoreBand,
};
pub use report::{save_report, Report};
