//! Output formatting for CLI

use crate::pipeline::{MetricsSummary, TrainingSummary};

/// Print a section header
pub fn print_section(title: &str) {
    println!("\n{}", "=".repeat(60));
    println!("{title}");
    println!("{}", "=".repeat(60));
}

/// Format a number with thousands separators
pub fn format_number(n: usize) -> String {
    let s = n.to_string();
    let mut result = String::new();
    for (i, c) in s.chars().rev().enumerate() {
        if i > 0 && i.is_multiple_of(3) {
            result.insert(0, ',');
        }
        result.insert(0, c);
    }
    result
}

/// Format `count` out of `total` as `count (xx.x%)`
pub fn format_share(count: usize, total: usize) -> String {
    let pct = if total == 0 {
        0.0
    } else {
        100.0 * count as f64 / total as f64
    };
    format!("{} ({pct:.1}%)", format_number(count))
}

/// Print a key-value pair
pub fn print_kv(key: &str, value: &str) {
    println!("  {:20} {}", format!("{}:", key), value);
}

/// Print the end-of-training summary block
pub fn print_training_summary(summary: &TrainingSummary) {
    print_section("Training Summary");
    print_kv("Episodes", &format_number(summary.episodes));
    print_kv("X wins", &format_share(summary.x_wins, summary.episodes));
    print_kv("O wins", &format_share(summary.o_wins, summary.episodes));
    print_kv("Draws", &format_share(summary.draws, summary.episodes));
    print_kv("Final epsilon", &format!("{:.4}", summary.final_epsilon));
    print_kv("States learned", &format_number(summary.states_learned));
    print_kv("Q-values learned", &format_number(summary.values_learned));
}

/// Print per-game averages gathered while training
pub fn print_metrics(metrics: &MetricsSummary) {
    print_kv("Avg game length", &format_game_length(metrics.avg_game_length));
}

/// Format an average move count
pub fn format_game_length(moves: f64) -> String {
    format!("{moves:.2} moves")
}
