use owo_colors::OwoColorize;
use std::io::IsTerminal;
use terminal_size::{terminal_size, Width};

use crate::catalog::Catalog;
use crate::scoring::{InputError, MethodResult, ScoringResult, ValidationReport};

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Get terminal width, defaulting to None for pipes (unlimited)
fn get_terminal_width() -> Option<usize> {
    terminal_size().map(|(Width(w), _)| w as usize)
}

/// Truncate a name to fit available width, accounting for Unicode
fn truncate_name(name: &str, max_width: usize) -> String {
    let chars: Vec<char> = name.chars().collect();
    if chars.len() <= max_width {
        name.to_string()
    } else if max_width > 3 {
        format!("{}...", chars[..max_width - 3].iter().collect::<String>())
    } else {
        chars[..max_width].iter().collect()
    }
}

/// Colour band for a single weight or score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreBand {
    Eliminating,
    Poor,
    Fair,
    Good,
    Excellent,
}

impl ScoreBand {
    pub fn of(score: i32, threshold: i32) -> Self {
        if score <= threshold {
            ScoreBand::Eliminating
        } else if score <= 0 {
            ScoreBand::Poor
        } else if score <= 2 {
            ScoreBand::Fair
        } else if score <= 4 {
            ScoreBand::Good
        } else {
            ScoreBand::Excellent
        }
    }
}

/// Colour already-padded text by the band of `score`.
fn paint(text: &str, score: i32, threshold: i32, use_colors: bool) -> String {
    if !use_colors {
        return text.to_string();
    }
    match ScoreBand::of(score, threshold) {
        ScoreBand::Eliminating => text.red().bold().to_string(),
        ScoreBand::Poor => text.bright_red().to_string(),
        ScoreBand::Fair => text.yellow().to_string(),
        ScoreBand::Good => text.green().to_string(),
        ScoreBand::Excellent => text.bright_green().bold().to_string(),
    }
}

fn heading(text: &str, use_colors: bool) -> String {
    if use_colors {
        text.bold().underline().to_string()
    } else {
        text.to_string()
    }
}

/// Which parts of a ranking to show.
#[derive(Debug, Clone, Copy, Default)]
pub struct RankingView {
    pub use_colors: bool,
    pub recommended_only: bool,
    /// Show at most this many recommended methods
    pub top: Option<usize>,
}

/// Format a scoring result as a ranked table.
///
/// Columns: rank, method, total, then one column per category.
/// Eliminated methods follow the recommended ones, each with its reasons.
pub fn format_ranking(result: &ScoringResult, catalog: &Catalog, view: RankingView) -> String {
    let threshold = catalog.elimination_threshold();
    let name_width = column_width(result, get_terminal_width());
    let mut lines = vec![
        format!(
            "{} recommended methods, {} eliminated",
            result.recommended_methods.len(),
            result.eliminated_methods.len()
        ),
        String::new(),
    ];

    lines.push(heading("Recommended methods", view.use_colors));
    if result.recommended_methods.is_empty() {
        lines.push("  No method survives elimination for these inputs.".to_string());
    }
    let total = result.recommended_methods.len();
    let shown = view.top.map_or(total, |n| n.min(total));
    for method in &result.recommended_methods[..shown] {
        lines.push(format_ranked_line(result, method, name_width, threshold, view.use_colors));
    }
    if shown < total {
        lines.push(format!("  ... {} more not shown", total - shown));
    }

    if !view.recommended_only && !result.eliminated_methods.is_empty() {
        lines.push(String::new());
        lines.push(heading("Eliminated methods", view.use_colors));
        for method in &result.eliminated_methods {
            lines.push(format_ranked_line(result, method, name_width, threshold, view.use_colors));
            for reason in &method.elimination_reasons {
                let reason = format!("       - {}", reason);
                lines.push(if view.use_colors {
                    reason.dimmed().to_string()
                } else {
                    reason
                });
            }
        }
    }

    lines.join("\n")
}

fn column_width(result: &ScoringResult, term_width: Option<usize>) -> usize {
    let widest = result
        .results
        .iter()
        .map(|r| r.method.chars().count())
        .max()
        .unwrap_or(0);

    // Rank 4 + total 6 + four categories at 6 each, plus separators
    let fixed_width = 4 + 1 + 6 + 4 * 6 + 4;
    match term_width {
        Some(width) if width > fixed_width + 10 => widest.min(width - fixed_width),
        Some(_) => widest.min(10),
        None => widest,
    }
}

fn format_ranked_line(
    result: &ScoringResult,
    method: &MethodResult,
    name_width: usize,
    threshold: i32,
    use_colors: bool,
) -> String {
    let rank = result.rank_of(&method.method).unwrap_or(0);
    let index_str = format!("{:>3}.", rank);
    let name = truncate_name(&method.method, name_width);
    let name_padded = format!("{:<width$}", name, width = name_width);
    let total = format!("{:>6}", method.total_score);
    let cells = method.category_scores.iter().map(|(_, score)| {
        paint(&format!("{:>6}", score.score), score.score, threshold, use_colors)
    });
    let categories = cells.collect::<Vec<_>>().join("");

    let (index_str, total) = match (use_colors, method.is_eliminated) {
        (false, _) => (index_str, total),
        (true, true) => (index_str.dimmed().to_string(), total.red().to_string()),
        (true, false) => (paint_rank(&index_str, rank), total.bold().to_string()),
    };
    format!("{} {} {} {}", index_str, name_padded, total, categories)
}

/// Gold, silver and bronze for the podium; everything else dimmed.
fn paint_rank(text: &str, rank: usize) -> String {
    match rank {
        1 => text.yellow().bold().to_string(),
        2 => text.white().bold().to_string(),
        3 => text.truecolor(217, 119, 6).bold().to_string(),
        _ => text.dimmed().to_string(),
    }
}

/// Format one method's per-category, per-factor breakdown.
pub fn format_method_detail(result: &MethodResult, catalog: &Catalog, use_colors: bool) -> String {
    let threshold = catalog.elimination_threshold();
    let mut lines = Vec::new();

    let status = if result.is_eliminated {
        "eliminated"
    } else {
        "viable"
    };
    lines.push(format!(
        "{}  total {} ({})",
        heading(&result.method, use_colors),
        result.total_score,
        status
    ));

    for (category, score) in result.category_scores.iter() {
        let label = &catalog.category(category).label;
        lines.push(format!("  {:<40}{:>6}", label, score.score));
        for entry in &score.breakdown {
            let factor_label = catalog
                .factor(&entry.factor)
                .map(|f| f.label.as_str())
                .unwrap_or(entry.factor.as_str());
            let weight = paint(&format!("{:>4}", entry.score), entry.score, threshold, use_colors);
            lines.push(format!("    {:<20}{:<18}{}", factor_label, entry.option, weight));
        }
    }

    if !result.elimination_reasons.is_empty() {
        lines.push("  Elimination reasons:".to_string());
        for reason in &result.elimination_reasons {
            lines.push(format!("    - {}", reason));
        }
    }

    lines.join("\n")
}

/// Format validation errors, one per line, with legal options where relevant.
pub fn format_validation(report: &ValidationReport) -> String {
    if report.is_valid() {
        return "All inputs are valid.".to_string();
    }

    report
        .errors()
        .iter()
        .map(|field| match &field.error {
            InputError::InvalidOption { value, options, .. } => format!(
                "  - {}: {} '{}' (expected one of: {})",
                field.factor,
                field.error,
                value,
                options.join(", ")
            ),
            InputError::Required { .. } => format!("  - {}: {}", field.factor, field.error),
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format the weight tables of the given methods.
/// Methods the catalog does not know are skipped.
pub fn format_weights(catalog: &Catalog, methods: &[&str], use_colors: bool) -> String {
    let threshold = catalog.elimination_threshold();
    let mut blocks = Vec::new();

    for method in methods {
        let Some(table) = catalog.method_weights(method) else {
            continue;
        };
        let mut lines = vec![heading(method, use_colors)];
        for factor in catalog.factors() {
            let cells: Vec<String> = factor
                .options
                .iter()
                .map(|option| {
                    let weight = table
                        .get(&factor.key)
                        .and_then(|options| options.get(option))
                        .copied()
                        .unwrap_or(0);
                    format!(
                        "{} {}",
                        option,
                        paint(&weight.to_string(), weight, threshold, use_colors)
                    )
                })
                .collect();
            lines.push(format!("  {:<20}{}", factor.label, cells.join(" | ")));
        }
        blocks.push(lines.join("\n"));
    }

    blocks.join("\n\n")
}

/// Format catalog provenance and the factors a caller must supply.
pub fn format_factors(catalog: &Catalog, use_colors: bool) -> String {
    let source = catalog.source();
    let mut lines = vec![
        format!("Catalog version {}", catalog.version()),
        format!("  Weights: {} ({})", source.excel_file, source.excel_version),
        format!("  Reference: {}", source.reference_paper),
        format!("  Algorithm: {}", source.algorithm_source),
        format!(
            "  Elimination threshold: {} (any weight at or below disqualifies a method)",
            catalog.elimination_threshold()
        ),
    ];

    for info in catalog.categories() {
        lines.push(String::new());
        lines.push(heading(&info.label, use_colors));
        for key in &info.factors {
            let Some(factor) = catalog.factor(key) else {
                continue;
            };
            let key_text = if use_colors {
                key.cyan().to_string()
            } else {
                key.to_string()
            };
            lines.push(format!("  {} ({})", key_text, factor.label));
            lines.push(format!("    options: {}", factor.options.join(", ")));
            if !factor.tooltip.is_empty() {
                lines.push(format!("    {}", factor.tooltip));
            }
        }
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::{calculate_method_result, calculate_scores, validate_inputs, InputRecord};

    fn base_inputs() -> InputRecord {
        InputRecord::new()
            .with("shape", "Equidimensional")
            .with("thickness", "V. Thick")
            .with("plunge", "Steep")
            .with("grade", "Moderate")
            .with("depth", "100-600m")
            .with("rmr_ore", "Moderate")
            .with("rss_ore", "Moderate")
            .with("rmr_hw", "Moderate")
            .with("rss_hw", "Moderate")
            .with("rmr_fw", "Moderate")
            .with("rss_fw", "Moderate")
    }

    #[test]
    fn test_score_bands() {
        assert_eq!(ScoreBand::of(-49, -49), ScoreBand::Eliminating);
        assert_eq!(ScoreBand::of(-48, -49), ScoreBand::Poor);
        assert_eq!(ScoreBand::of(0, -49), ScoreBand::Poor);
        assert_eq!(ScoreBand::of(2, -49), ScoreBand::Fair);
        assert_eq!(ScoreBand::of(4, -49), ScoreBand::Good);
        assert_eq!(ScoreBand::of(5, -49), ScoreBand::Excellent);
    }

    #[test]
    fn test_truncate_name() {
        assert_eq!(truncate_name("Open Pit", 20), "Open Pit");
        assert_eq!(truncate_name("Shrinkage Stoping", 10), "Shrinka...");
        assert_eq!(truncate_name("Longwall", 3), "Lon");
    }

    #[test]
    fn test_column_width_unlimited_for_pipes() {
        let catalog = Catalog::builtin().unwrap();
        let result = calculate_scores(&catalog, &base_inputs());
        assert_eq!(column_width(&result, None), "Shrinkage Stoping".len());
        assert_eq!(column_width(&result, Some(20)), 10);
    }

    #[test]
    fn test_ranking_lists_every_method_once() {
        let catalog = Catalog::builtin().unwrap();
        let result = calculate_scores(&catalog, &base_inputs());
        let output = format_ranking(&result, &catalog, RankingView::default());
        for method in catalog.methods() {
            assert_eq!(
                output.lines().filter(|l| l.contains(method.as_str()) && l.contains('.')).count(),
                1,
                "{} should appear once",
                method
            );
        }
        assert!(output.contains("Eliminated methods"));
        assert!(output.contains("- General Shape: Equidimensional (score: -49)"));
    }

    #[test]
    fn test_ranking_recommended_only() {
        let catalog = Catalog::builtin().unwrap();
        let result = calculate_scores(&catalog, &base_inputs());
        let view = RankingView {
            recommended_only: true,
            ..RankingView::default()
        };
        let output = format_ranking(&result, &catalog, view);
        assert!(!output.contains("Eliminated methods"));
        assert!(!output.contains("Longwall"));
        assert!(output.contains("Open Pit"));
    }

    #[test]
    fn test_ranking_summary_line() {
        let catalog = Catalog::builtin().unwrap();
        let result = calculate_scores(&catalog, &base_inputs());
        let output = format_ranking(&result, &catalog, RankingView::default());
        let expected = format!(
            "{} recommended methods, {} eliminated",
            result.recommended_methods.len(),
            result.eliminated_methods.len()
        );
        assert_eq!(output.lines().next(), Some(expected.as_str()));
    }

    #[test]
    fn test_ranking_top_limits_recommended() {
        let catalog = Catalog::builtin().unwrap();
        let result = calculate_scores(&catalog, &base_inputs());
        assert!(result.recommended_methods.len() > 3);

        let view = RankingView {
            top: Some(3),
            ..RankingView::default()
        };
        let output = format_ranking(&result, &catalog, view);
        for (i, method) in result.recommended_methods.iter().enumerate() {
            let listed = output.lines().any(|l| l.contains(method.method.as_str()));
            assert_eq!(listed, i < 3, "{} listed: {}", method.method, listed);
        }
        let hidden = result.recommended_methods.len() - 3;
        assert!(output.contains(&format!("... {} more not shown", hidden)));
        // Eliminated methods are still listed below the recommended ones
        assert!(output.contains("Eliminated methods"));
    }

    #[test]
    fn test_ranking_top_larger_than_list() {
        let catalog = Catalog::builtin().unwrap();
        let result = calculate_scores(&catalog, &base_inputs());
        let view = RankingView {
            top: Some(50),
            ..RankingView::default()
        };
        let output = format_ranking(&result, &catalog, view);
        assert!(!output.contains("more not shown"));
        assert_eq!(output, format_ranking(&result, &catalog, RankingView::default()));
    }

    #[test]
    fn test_ranked_line_colours_category_cells() {
        let catalog = Catalog::builtin().unwrap();
        let result = calculate_scores(&catalog, &base_inputs());
        let first = &result.ranked_methods[0];
        let plain = format_ranked_line(&result, first, 20, -49, false);
        let coloured = format_ranked_line(&result, first, 20, -49, true);
        assert!(!plain.contains('\u{1b}'));
        assert!(coloured.contains('\u{1b}'));
        let cell = paint(
            &format!("{:>6}", first.category_scores.geometry.score),
            first.category_scores.geometry.score,
            -49,
            true,
        );
        assert!(coloured.contains(&cell));
    }

    #[test]
    fn test_method_detail() {
        let catalog = Catalog::builtin().unwrap();
        let result = calculate_method_result(&catalog, "Open Pit", &base_inputs());
        let output = format_method_detail(&result, &catalog, false);
        assert!(output.starts_with("Open Pit  total 34 (viable)"));
        assert!(output.contains("Geometry & Grade Distribution"));
        assert!(output.contains("General Shape"));
        assert!(!output.contains("Elimination reasons"));
    }

    #[test]
    fn test_validation_output() {
        let catalog = Catalog::builtin().unwrap();
        let inputs = base_inputs().with("depth", "Bottomless");
        let mut inputs = inputs;
        inputs.remove("shape");
        let output = format_validation(&validate_inputs(&catalog, &inputs));
        assert!(output.contains("shape: General Shape is required"));
        assert!(output.contains(
            "depth: Invalid option for Depth 'Bottomless' (expected one of: <100m, 100-600m, >600m)"
        ));
    }

    #[test]
    fn test_weights_output_skips_unknown_methods() {
        let catalog = Catalog::builtin().unwrap();
        let output = format_weights(&catalog, &["Longwall", "Glory Hole"], false);
        assert!(output.starts_with("Longwall"));
        assert!(output.contains("Equidimensional -49 | Platy/Tabular 4 | Irregular -49"));
        assert!(!output.contains("Glory Hole"));
    }

    #[test]
    fn test_factors_output() {
        let catalog = Catalog::builtin().unwrap();
        let output = format_factors(&catalog, false);
        assert!(output.contains("Elimination threshold: -49"));
        assert!(output.contains("rss_fw (RSS Footwall)"));
        assert!(output.contains("options: <100m, 100-600m, >600m"));
    }
}
