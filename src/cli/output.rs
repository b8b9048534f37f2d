//! Output formatting for CLI

use crate::{analysis::SimulationStats, pipeline::BatchResult};

/// Print a section header
pub fn print_section(title: &str) {
    println!("\n{}", "=".repeat(60));
    println!("{title}");
    println!("{}", "=".repeat(60));
}

/// Print a subsection header
pub fn print_subsection(title: &str) {
    println!("\n{title}");
    println!("{}", "-".repeat(40));
}

/// Format an amount with thousands separators
pub fn format_number(n: i64) -> String {
    let s = n.unsigned_abs().to_string();
    let mut result = String::new();
    for (i, c) in s.chars().rev().enumerate() {
        if i > 0 && i.is_multiple_of(3) {
            result.insert(0, ',');
        }
        result.insert(0, c);
    }
    if n < 0 {
        result.insert(0, '-');
    }
    result
}

/// Print a key-value pair
pub fn print_kv(key: &str, value: &str) {
    println!("  {:28} {}", format!("{}:", key), value);
}

fn percent(rate: f64) -> String {
    format!("{:.1}%", rate * 100.0)
}

/// Print the statistics of one simulation
pub fn print_stats(stats: &SimulationStats) {
    print_kv("Games", &format_number(stats.games as i64));
    print_kv("Wins", &format!("{} ({})", stats.wins, percent(stats.win_rate)));
    print_kv(
        "Bankruptcies",
        &format!("{} ({})", stats.bankruptcies, percent(stats.bankruptcy_rate)),
    );
    if let Some(turns) = stats.mean_turns_before_bankruptcy {
        print_kv("Mean turns to bankruptcy", &format!("{turns:.1}"));
    }
    print_kv(
        "Final cash",
        &format!(
            "{} ± {}",
            format_number(stats.mean_final_cash.round() as i64),
            format_number(stats.std_final_cash.round() as i64)
        ),
    );
    print_kv(
        "Properties bought per game",
        &format!("{:.2}", stats.mean_properties_bought),
    );
    if let Some((name, count)) = stats.property_purchases.iter().max_by_key(|(_, count)| **count) {
        print_kv("Most bought property", &format!("{name} ({count})"));
    }
    if let Some((name, rent)) = stats.rent_revenue.iter().max_by_key(|(_, rent)| **rent) {
        print_kv("Top rent property", &format!("{name} ({})", format_number(*rent)));
    }
}

/// Print one row per compared simulation
pub fn print_comparison_table(results: &[BatchResult]) {
    println!(
        "{:<32} {:>7} {:>9} {:>9} {:>12} {:>12}",
        "Simulation", "Games", "Win", "Bankrupt", "Turns to BR", "Final cash"
    );
    println!("{}", "-".repeat(86));
    for result in results {
        let stats = &result.stats;
        let turns = stats
            .mean_turns_before_bankruptcy
            .map(|t| format!("{t:.1}"))
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:<32} {:>7} {:>9} {:>9} {:>12} {:>12}",
            result.title,
            stats.games,
            percent(stats.win_rate),
            percent(stats.bankruptcy_rate),
            turns,
            format_number(stats.mean_final_cash.round() as i64)
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(0), "0");
        assert_eq!(format_number(950), "950");
        assert_eq!(format_number(1500), "1,500");
        assert_eq!(format_number(-1234567), "-1,234,567");
    }
}
