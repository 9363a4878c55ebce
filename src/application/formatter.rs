//! Alert Formatting
//!
//! Renders qualifying tokens as Telegram (legacy) Markdown. Output depends
//! only on the record and the evaluation instant.

use crate::domain::{SourceTag, Thresholds, TokenRecord};

const UNKNOWN_NAME: &str = "Unknown";
const PLACEHOLDER: &str = "N/A";
/// Long descriptions are cut to keep alerts well under Telegram's 4096-char cap
const MAX_DESCRIPTION_CHARS: usize = 300;

/// Magnitude formatting: K/M/B at 1e3/1e6/1e9, always two decimals
pub fn format_compact(value: f64) -> String {
    let value = if value.is_finite() { value } else { 0.0 };
    if value >= 1e9 {
        format!("{:.2}B", value / 1e9)
    } else if value >= 1e6 {
        format!("{:.2}M", value / 1e6)
    } else if value >= 1e3 {
        format!("{:.2}K", value / 1e3)
    } else {
        format!("{:.2}", value)
    }
}

pub fn format_price(price_usd: f64) -> String {
    if price_usd.is_finite() && price_usd > 0.0 {
        format!("${:.8}", price_usd)
    } else {
        PLACEHOLDER.to_string()
    }
}

/// Escape characters that legacy Markdown treats as markup
pub fn escape_markdown(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if is_markup(c) {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Bold text that may contain markup characters. Legacy Markdown rejects
/// escapes inside an entity, so the bold run is closed before each escaped
/// character and reopened after it.
pub fn bold_markdown(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 4);
    let mut run = String::new();
    for c in text.chars() {
        if is_markup(c) {
            push_bold(&mut out, &mut run);
            out.push('\\');
            out.push(c);
        } else {
            run.push(c);
        }
    }
    push_bold(&mut out, &mut run);
    out
}

fn push_bold(out: &mut String, run: &mut String) {
    if !run.is_empty() {
        out.push('*');
        out.push_str(run);
        out.push('*');
        run.clear();
    }
}

fn is_markup(c: char) -> bool {
    matches!(c, '_' | '*' | '`' | '[')
}

fn hashtag(symbol: &str) -> Option<String> {
    let tag: String = symbol.chars().filter(|c| c.is_ascii_alphanumeric()).collect();
    (!tag.is_empty()).then(|| format!("#{}", tag))
}

fn truncate_chars(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let cut: String = text.chars().take(max).collect();
        format!("{}…", cut.trim_end())
    }
}

/// Alert for one token evaluated at `now_ms`
pub fn format_token_alert(token: &TokenRecord, now_ms: i64) -> String {
    let risk_marker = if token.risky { "⚠️" } else { "✅" };
    let name = token.name.as_deref().unwrap_or(UNKNOWN_NAME);
    let symbol = token.symbol.as_deref().unwrap_or(PLACEHOLDER);
    let holders = if token.holders > 0 {
        token.holders.to_string()
    } else {
        PLACEHOLDER.to_string()
    };
    let mint = &token.mint;

    let mut lines = vec![
        format!("🪙 *New Token Detected* {}", risk_marker),
        String::new(),
        format!("{} ({})", bold_markdown(name), escape_markdown(symbol)),
        format!("📍 *Address:* `{}`", mint),
        format!("💰 *Market Cap:* ${}", format_compact(token.market_cap_usd)),
        format!("💧 *Liquidity:* ${}", format_compact(token.liquidity_usd)),
        format!("📊 *Price:* {}", format_price(token.price_usd)),
        format!("👥 *Holders:* {}", holders),
        format!("⏰ *Age:* {} minutes", token.age_minutes(now_ms)),
        String::new(),
        "🔗 *Links:*".to_string(),
        format!("• [DexScreener](https://dexscreener.com/solana/{})", mint),
        format!("• [Solscan](https://solscan.io/token/{})", mint),
        format!("• [Jupiter](https://jup.ag/swap/SOL-{})", mint),
    ];

    if let Some(description) = token.description.as_deref().filter(|d| !d.trim().is_empty()) {
        lines.push(String::new());
        lines.push(format!(
            "📝 *Description:* {}",
            escape_markdown(&truncate_chars(description.trim(), MAX_DESCRIPTION_CHARS))
        ));
    }

    let mut tags = "#Solana #NewToken".to_string();
    if let Some(tag) = token.symbol.as_deref().and_then(hashtag) {
        tags.push(' ');
        tags.push_str(&tag);
    }
    lines.push(String::new());
    lines.push(tags);

    lines.join("\n")
}

/// Posted once after seeding
pub fn format_startup_message(
    thresholds: &Thresholds,
    interval_minutes: u64,
    sources: &[SourceTag],
) -> String {
    let sources = if sources.is_empty() {
        "rpc-scan only".to_string()
    } else {
        sources.iter().map(|s| s.as_str()).collect::<Vec<_>>().join(", ")
    };

    format!(
        "🚀 Solana Token Monitor is now active!\n\n\
         ⏱ Interval: {} min\n\
         ⏰ Max age: {} min\n\
         💧 Min liquidity: ${}\n\
         💰 Min market cap: ${}\n\
         📡 Sources: {}",
        interval_minutes,
        thresholds.max_age_minutes,
        format_compact(thresholds.min_liquidity_usd),
        format_compact(thresholds.min_market_cap_usd),
        escape_markdown(&sources),
    )
}
