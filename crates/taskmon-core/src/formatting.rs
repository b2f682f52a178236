/// Turn a kernel task identifier into a display label: underscores become
/// spaces and each word is capitalized.
///
/// # Examples
///
/// ```
/// use taskmon_core::formatting::pretty_task_name;
///
/// assert_eq!(pretty_task_name("uart_flight_data"), "Uart Flight Data");
/// assert_eq!(pretty_task_name("altitude"), "Altitude");
/// assert_eq!(pretty_task_name(""), "");
/// ```
pub fn pretty_task_name(name: &str) -> String {
    name.split('_')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Format a percentage with one decimal place and a `%` suffix.
///
/// # Examples
///
/// ```
/// use taskmon_core::formatting::format_percent;
///
/// assert_eq!(format_percent(1.25), "1.2%");
/// assert_eq!(format_percent(0.0), "0.0%");
/// assert_eq!(format_percent(87.5), "87.5%");
/// ```
pub fn format_percent(pct: f64) -> String {
    format!("{:.1}%", pct)
}

/// Format an integer count with thousands separators.
///
/// # Examples
///
/// ```
/// use taskmon_core::formatting::format_count;
///
/// assert_eq!(format_count(0), "0");
/// assert_eq!(format_count(999), "999");
/// assert_eq!(format_count(1234567), "1,234,567");
/// ```
pub fn format_count(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    let offset = digits.len() % 3;
    for (i, ch) in digits.chars().enumerate() {
        if i != 0 && (i + 3 - offset) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pretty_task_name_multi_word() {
        assert_eq!(pretty_task_name("uart_kernel_data"), "Uart Kernel Data");
    }

    #[test]
    fn test_pretty_task_name_collapses_repeated_underscores() {
        assert_eq!(pretty_task_name("main__rotor"), "Main Rotor");
    }

    #[test]
    fn test_format_percent_truncates_to_one_decimal() {
        assert_eq!(format_percent(33.333), "33.3%");
    }

    #[test]
    fn test_format_count_grouping() {
        assert_eq!(format_count(1_000), "1,000");
        assert_eq!(format_count(10_000), "10,000");
        assert_eq!(format_count(100), "100");
        assert_eq!(format_count(1_000_000), "1,000,000");
    }
}
