//! Terminal output utilities.

use crate::Generation;
use colored::Colorize;

/// Format a value as a quoted, right-aligned field.
///
/// # Arguments
/// * `value` - The value to format
/// * `width` - The minimum width of the field
pub fn format_field<T: ToString>(value: T, width: usize) -> String {
    let value_str = value.to_string();
    let quoted = format!("\"{value_str}\"");
    let quoted_len = quoted.len();

    if quoted_len >= width {
        quoted
    } else {
        format!("{quoted:>width$}")
    }
}

/// Summary rows: one per generated config.
pub fn summary_rows(generation: &Generation) -> Vec<String> {
    generation
        .output
        .configs
        .iter()
        .enumerate()
        .map(|(i, c)| {
            format!(
                "{cnt},{line},{key}",
                cnt = format_field(i + 1, 6),
                line = format_field(c.line, 8),
                key = format_field(&c.key, 30),
            )
        })
        .collect()
}

/// Print topology decision, generated keys and diagnostics to stdout.
pub fn print_summary(generation: &Generation) {
    println!(
        "#{} {} ({})",
        "TOPOLOGY".on_blue(),
        generation.detection.kind,
        generation.detection.reason
    );
    println!(r#" "cnt",  "line",                         "key""#);
    for row in summary_rows(generation) {
        println!("{row}");
    }
    for diagnostic in generation.diagnostics.iter() {
        println!("#{}# {}", "WARN".on_red(), diagnostic);
    }
    println!(
        "#{} {} config(s), {} diagnostic(s)",
        "DONE".on_green(),
        generation.output.configs.len(),
        generation.diagnostics.len()
    );
}
