//! Pattern evaluation against a bot's outcome buffer.
//!
//! Every pattern reduces to a "tail": the length of the matching run ending
//! at the newest outcome. Stages are derived from the tail and `need`:
//!
//! - pre-signal when `tail == need - 1` (and `need >= 2`)
//! - confirmed when `tail >= need`
//!
//! Sequence patterns are the exception: they confirm when the newest
//! outcomes spell the whole sequence and pre-signal when they spell all but
//! its last token.

use crate::domain::{Evaluation, OutcomeToken, Pattern};

/// Evaluate `pattern` over `buffer` (oldest first).
///
/// `threshold` splits low from high multipliers. A buffer shorter than
/// `need` never matches.
#[must_use]
pub fn evaluate(pattern: &Pattern, buffer: &[f64], need: u32, threshold: f64) -> Evaluation {
    let need = need as usize;
    if need == 0 || buffer.len() < need {
        return Evaluation::none(0);
    }

    match pattern {
        Pattern::LowMults => staged(run_length(buffer, |v| v < threshold), need),
        Pattern::HighMults => staged(run_length(buffer, |v| v >= threshold), need),
        Pattern::Sequence(tokens) => sequence(tokens, buffer, threshold),
        Pattern::Streak(_) => {
            let tokens: Vec<OutcomeToken> = buffer
                .iter()
                .map(|&v| OutcomeToken::classify(v, threshold))
                .collect();
            let Some(&newest) = tokens.last() else {
                return Evaluation::none(0);
            };
            let tail = tokens.iter().rev().take_while(|&&t| t == newest).count();
            staged(tail, need)
        }
    }
}

/// Consecutive newest entries satisfying `pred`.
fn run_length(buffer: &[f64], pred: impl Fn(f64) -> bool) -> usize {
    buffer.iter().rev().take_while(|&&v| pred(v)).count()
}

fn staged(tail: usize, need: usize) -> Evaluation {
    Evaluation {
        tail,
        pre: need >= 2 && tail == need - 1,
        confirmed: tail >= need,
    }
}

fn sequence(expected: &[OutcomeToken], buffer: &[f64], threshold: f64) -> Evaluation {
    let k = expected.len();
    if k == 0 {
        return Evaluation::none(0);
    }

    let ends_with = |wanted: &[OutcomeToken]| {
        wanted.len() <= buffer.len()
            && buffer[buffer.len() - wanted.len()..]
                .iter()
                .zip(wanted)
                .all(|(&v, &t)| OutcomeToken::classify(v, threshold) == t)
    };

    let confirmed = ends_with(expected);
    let pre = k >= 2 && ends_with(&expected[..k - 1]);
    let tail = if confirmed {
        k
    } else if pre {
        k - 1
    } else {
        0
    };

    Evaluation {
        tail,
        pre,
        confirmed,
    }
}
