//! Message rendering for dispatched signals (Telegram HTML).
//!
//! A strategy either uses the default template of its bot's game type or a
//! custom template. Custom templates may split into stage sections:
//!
//! ```text
//! ::pre::Get ready: {tail} lows in a row
//! ::confirm::Enter now, cash out at {target}
//! ```
//!
//! A template without markers is used for both stages. A stage whose section
//! is missing or blank falls back to the default template.

use chrono::{DateTime, Local};

use crate::domain::{Bot, Stage, Strategy};

const PRE_MARKER: &str = "::pre::";
const CONFIRM_MARKER: &str = "::confirm::";

/// Everything a template can refer to.
#[derive(Debug, Clone, Copy)]
pub struct SignalContext<'a> {
    pub bot: &'a Bot,
    pub strategy: &'a Strategy,
    pub stage: Stage,
    pub tail: usize,
    /// Newest outcome value.
    pub value: f64,
    pub confidence: u8,
    pub target: &'a str,
    pub at: DateTime<Local>,
}

/// Render the message for a signal.
#[must_use]
pub fn render(ctx: &SignalContext<'_>) -> String {
    ctx.strategy
        .custom_template()
        .and_then(|template| section(template, ctx.stage))
        .map_or_else(|| default_message(ctx), |tpl| fill(tpl, ctx))
}

/// The part of `template` that applies to `stage`, if any.
#[must_use]
pub fn section(template: &str, stage: Stage) -> Option<&str> {
    let pre_at = template.find(PRE_MARKER);
    let confirm_at = template.find(CONFIRM_MARKER);

    let body = match (pre_at, confirm_at) {
        (None, None) => template,
        _ => {
            let (marker, start) = match stage {
                Stage::Pre => (PRE_MARKER, pre_at?),
                Stage::Confirmed => (CONFIRM_MARKER, confirm_at?),
            };
            let from = start + marker.len();
            let rest = &template[from..];
            let end = [PRE_MARKER, CONFIRM_MARKER]
                .iter()
                .filter_map(|m| rest.find(m))
                .min()
                .unwrap_or(rest.len());
            &rest[..end]
        }
    };

    let body = body.trim();
    (!body.is_empty()).then_some(body)
}

/// Substitute `{placeholder}` tokens. Unknown placeholders are left intact.
#[must_use]
pub fn fill(template: &str, ctx: &SignalContext<'_>) -> String {
    let mut out = String::with_capacity(template.len() + 32);
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        match after.find('}') {
            Some(close) => {
                let name = &after[..close];
                match placeholder(name, ctx) {
                    Some(value) => out.push_str(&value),
                    None => {
                        out.push('{');
                        out.push_str(name);
                        out.push('}');
                    }
                }
                rest = &after[close + 1..];
            }
            None => {
                out.push_str(&rest[open..]);
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out
}

fn placeholder(name: &str, ctx: &SignalContext<'_>) -> Option<String> {
    let strategy = ctx.strategy;
    let counters = &strategy.counters;
    let value = match name {
        "name" => escape_html(&strategy.name),
        "pattern" => escape_html(&strategy.pattern),
        "action" => escape_html(&strategy.action),
        "need" => strategy.need.to_string(),
        "tail" => ctx.tail.to_string(),
        "mult" => format!("{:.2}x", ctx.value),
        "confidence" => ctx.confidence.to_string(),
        "target" => escape_html(ctx.target),
        "date" => ctx.at.format("%d/%m/%Y").to_string(),
        "time" => ctx.at.format("%H:%M:%S").to_string(),
        "wins" => counters.wins.to_string(),
        "losses" => counters.losses.to_string(),
        "accuracy" => counters.accuracy_percent().to_string(),
        "signals" => counters.total_signals.to_string(),
        _ => return None,
    };
    Some(value)
}

/// Default template for the bot's game type.
#[must_use]
pub fn default_message(ctx: &SignalContext<'_>) -> String {
    let strategy = ctx.strategy;
    let header = match ctx.stage {
        Stage::Pre => "⏳ <b>GET READY</b>",
        Stage::Confirmed => "✅ <b>CONFIRMED ENTRY</b>",
    };
    let timestamp = ctx.at.format("%d/%m/%Y %H:%M:%S");
    let pattern = escape_html(&strategy.parsed_pattern().label());
    let action = escape_html(&strategy.action);
    let name = escape_html(&strategy.name);

    match ctx.bot.game_type.trim().to_ascii_lowercase().as_str() {
        "aviator" => format!(
            "✈️ <b>AVIATOR SIGNAL</b> ✈️\n\
            {header}\n\
            \n\
            📋 Strategy: {name}\n\
            📊 Pattern: {pattern} ({tail}/{need})\n\
            🎲 Action: {action}\n\
            🎯 Target: {target}\n\
            📈 Confidence: {confidence}%\n\
            🔢 Last: {value:.2}x\n\
            \n\
            ⚠️ <i>Cash out at the target multiplier!</i>\n\
            \n\
            🤖 {timestamp}",
            tail = ctx.tail,
            need = strategy.need,
            target = escape_html(ctx.target),
            confidence = ctx.confidence,
            value = ctx.value,
        ),
        "mines" => format!(
            "💎 <b>MINES SIGNAL</b> 💎\n\
            {header}\n\
            \n\
            📋 Strategy: {name}\n\
            📊 Pattern: {pattern}\n\
            🎲 Action: {action}\n\
            📈 Confidence: {confidence}%\n\
            \n\
            ⚠️ <i>Play responsibly!</i>\n\
            \n\
            🤖 {timestamp}",
            confidence = ctx.confidence,
        ),
        _ => format!(
            "🎯 <b>SIGNAL DETECTED</b> 🎯\n\
            {header}\n\
            \n\
            📋 Strategy: {name}\n\
            📊 Pattern: {pattern} ({tail}/{need})\n\
            🎲 Action: {action}\n\
            📈 Confidence: {confidence}%\n\
            \n\
            ⚠️ <i>Play responsibly!</i>\n\
            \n\
            🤖 {timestamp}",
            tail = ctx.tail,
            need = strategy.need,
            confidence = ctx.confidence,
        ),
    }
}

/// Escape text for Telegram's HTML parse mode.
#[must_use]
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}
