use owo_colors::OwoColorize;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::IsTerminal;
use terminal_size::{terminal_size, Width};

use crate::analysis::StrengthProfile;
use crate::scoring::{MatchingResult, ScoreRange};

const STAR_COUNT: usize = 5;

/// How a score is rendered for humans.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum ScoreFormat {
    /// Two decimals, e.g. "4.67"
    #[default]
    Raw,
    /// Position within the score range, e.g. "93.4%"
    Percentage,
    /// Five-star rating, e.g. "★★★★☆"
    Stars,
}

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Fraction of the way from `range.min` to `range.max`, clamped to [0, 1]
fn range_fraction(score: f64, range: ScoreRange) -> f64 {
    ((score - range.min) / range.span()).clamp(0.0, 1.0)
}

pub fn format_score(score: f64, format: ScoreFormat, range: ScoreRange) -> String {
    match format {
        ScoreFormat::Raw => format!("{:.2}", score),
        ScoreFormat::Percentage => format!("{:.1}%", range_fraction(score, range) * 100.0),
        ScoreFormat::Stars => {
            let filled = (range_fraction(score, range) * STAR_COUNT as f64).round() as usize;
            format!("{}{}", "★".repeat(filled), "☆".repeat(STAR_COUNT - filled))
        }
    }
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

/// Ranked results, one per line: index, score, name, id.
/// No headers. Names are truncated to the terminal width when there is one.
pub fn format_ranked_table(
    results: &[MatchingResult<'_>],
    format: ScoreFormat,
    range: ScoreRange,
    use_colors: bool,
) -> String {
    if results.is_empty() {
        return "No alternatives to rank.".to_string();
    }

    let score_width = match format {
        ScoreFormat::Raw => 6,
        ScoreFormat::Percentage => 6,
        ScoreFormat::Stars => STAR_COUNT,
    };
    let separator = "  ";
    let term_width = get_terminal_width();

    results
        .iter()
        .enumerate()
        .map(|(idx, result)| {
            let index_str = format!("{:>2}.", idx + 1);
            let score_str = format_score(result.final_score, format, range);
            let score_padded = format!("{:>width$}", score_str, width = score_width);

            let id = &result.alternative.id;
            let fixed_width = index_str.len() + 1 + score_width + separator.len() * 2 + id.len();
            let name = match term_width {
                Some(width) if width > fixed_width + 10 => {
                    truncate_name(&result.alternative.name, width - fixed_width)
                }
                Some(_) => truncate_name(&result.alternative.name, 20),
                None => result.alternative.name.clone(),
            };

            if use_colors {
                format!(
                    "{} {}{}{}{}{}",
                    index_str.dimmed(),
                    score_padded.bold(),
                    separator,
                    name,
                    separator,
                    id.cyan()
                )
            } else {
                format!(
                    "{} {}{}{}{}{}",
                    index_str, score_padded, separator, name, separator, id
                )
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Multi-line breakdown of one result (for --detail)
pub fn format_result_detail(
    result: &MatchingResult<'_>,
    format: ScoreFormat,
    range: ScoreRange,
    use_colors: bool,
) -> String {
    let mut lines = Vec::new();
    let header = format!("{} ({})", result.alternative.name, result.alternative.id);
    lines.push(if use_colors {
        header.bold().to_string()
    } else {
        header
    });
    lines.push(format!(
        "  Final: {}",
        format_score(result.final_score, format, range)
    ));
    lines.push(format!(
        "  Core factor: {}",
        format_score(result.core_factor_score, format, range)
    ));
    lines.push(format!(
        "  Secondary factor: {}",
        format_score(result.secondary_factor_score, format, range)
    ));
    for (name, score) in &result.gap_details {
        lines.push(format!("    {}: {}", name, format_score(*score, format, range)));
    }
    lines.join("\n")
}

/// Tab-separated values for scripting
/// Columns: final, id, name, core, secondary (no headers, no colors)
pub fn format_tsv(results: &[MatchingResult<'_>]) -> String {
    results
        .iter()
        .map(|r| {
            format!(
                "{:.4}\t{}\t{}\t{:.4}\t{:.4}",
                r.final_score,
                r.alternative.id,
                r.alternative.name,
                r.core_factor_score,
                r.secondary_factor_score
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn format_json(results: &[MatchingResult<'_>]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(results)
}

/// One "name: value" line per criterion under a heading
pub fn format_criterion_stats(title: &str, stats: &BTreeMap<String, f64>, use_colors: bool) -> String {
    let heading = if use_colors {
        title.bold().to_string()
    } else {
        title.to_string()
    };
    if stats.is_empty() {
        return format!("{}\n  (no data)", heading);
    }

    let name_width = stats.keys().map(|k| k.chars().count()).max().unwrap_or(0);
    let body = stats
        .iter()
        .map(|(name, value)| format!("  {:<width$}  {:.4}", name, value, width = name_width))
        .collect::<Vec<_>>()
        .join("\n");
    format!("{}\n{}", heading, body)
}

pub fn format_strength_profile(
    result: &MatchingResult<'_>,
    profile: &StrengthProfile,
    use_colors: bool,
) -> String {
    let list = |items: &[(String, f64)]| {
        if items.is_empty() {
            "-".to_string()
        } else {
            items
                .iter()
                .map(|(name, score)| format!("{} ({:.2})", name, score))
                .collect::<Vec<_>>()
                .join(", ")
        }
    };

    let strengths = list(&profile.strengths);
    let weaknesses = list(&profile.weaknesses);
    if use_colors {
        format!(
            "{}\n  Strengths: {}\n  Weaknesses: {}",
            result.alternative.name.bold(),
            strengths.green(),
            weaknesses.red()
        )
    } else {
        format!(
            "{}\n  Strengths: {}\n  Weaknesses: {}",
            result.alternative.name, strengths, weaknesses
        )
    }
}
