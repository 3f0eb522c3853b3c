/// default when tenure input is empty or unparseable
pub const DEFAULT_TENURE_MONTHS: u32 = 12;

/// Parse a human tenure string into a month count.
///
/// Recognizes "N Years", "N Months", and combinations ("2 Years 6 Months").
/// A bare number with neither token ("3", "36x") is read as a YEAR count.
/// That is a legacy convention carried over from persisted plans: changing
/// it to months silently changes financial outputs for existing data, so it
/// must not be "fixed" here. Malformed input degrades to
/// [`DEFAULT_TENURE_MONTHS`] instead of failing the caller; the result is
/// floored at 1.
pub fn parse_tenure(raw: &str) -> u32 {
    let lowered = raw.trim().to_lowercase();
    if lowered.is_empty() {
        return DEFAULT_TENURE_MONTHS;
    }

    let years = number_before(&lowered, "year");
    let months = number_before(&lowered, "month");

    let total = match (years, months) {
        (None, None) => {
            // legacy fallback: bare digits are YEARS, not months
            let digits: String = lowered.chars().filter(|c| c.is_ascii_digit()).collect();
            match digits.parse::<u32>() {
                Ok(y) => y.saturating_mul(12),
                Err(_) => DEFAULT_TENURE_MONTHS,
            }
        }
        (y, m) => y.unwrap_or(0).saturating_mul(12) + m.unwrap_or(0),
    };

    total.max(1)
}

/// integer immediately preceding `token`, skipping whitespace between them
fn number_before(haystack: &str, token: &str) -> Option<u32> {
    let idx = haystack.find(token)?;
    let head = &haystack[..idx];

    let digits: String = head
        .trim_end()
        .chars()
        .rev()
        .take_while(|c| c.is_ascii_digit())
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect();

    digits.parse().ok()
}
