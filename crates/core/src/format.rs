//! Text helpers shared by the launch and chat flows.

/// Groups digits in threes: `1234567` becomes `1,234,567`.
pub fn format_amount(amount: u64) -> String {
    let digits = amount.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Wallet balances get more decimals the smaller they are.
pub fn format_balance(balance: f64) -> String {
    if balance < 0.01 {
        format!("{:.6}", balance)
    } else if balance < 1.0 {
        format!("{:.5}", balance)
    } else {
        format!("{:.4}", balance)
    }
}

/// Pulls `http(s)://` URLs out of `text`.
///
/// Returns the remaining text and the URLs in first-seen order without
/// duplicates.
pub fn extract_links(text: &str) -> (String, Vec<String>) {
    let mut links: Vec<String> = Vec::new();
    let mut remaining = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(start) = find_url_start(rest) {
        remaining.push_str(&rest[..start]);
        let tail = &rest[start..];
        let end = tail.find(char::is_whitespace).unwrap_or(tail.len());
        let url = &tail[..end];
        if !links.iter().any(|l| l == url) {
            links.push(url.to_string());
        }
        rest = &tail[end..];
    }
    remaining.push_str(rest);

    (remaining, links)
}

fn find_url_start(text: &str) -> Option<usize> {
    match (text.find("http://"), text.find("https://")) {
        (Some(a), Some(b)) => Some(a.min(b)),
        (a, b) => a.or(b),
    }
}
