use std::{iter::Peekable, str::CharIndices};

use thiserror::Error;

use crate::classifier::Prediction;
use crate::dataset::Ticket;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ListParseError {
    #[error("prediction is empty")]
    Empty,
    #[error("expected '[' at offset {0}")]
    ExpectedOpenBracket(usize),
    #[error("expected a quoted tag at offset {0}")]
    ExpectedString(usize),
    #[error("expected ',' or ']' at offset {0}")]
    ExpectedSeparator(usize),
    #[error("unterminated string starting at offset {0}")]
    UnterminatedString(usize),
    #[error("unexpected input after list at offset {0}")]
    TrailingInput(usize),
}

/// Parse a bracketed list of single- or double-quoted strings, such as
/// `['Billing inquiry', "Refund request"]`. Nothing else is accepted:
/// surrounding prose, code fences and bare words are all rejected.
pub fn parse_tag_list(text: &str) -> Result<Vec<String>, ListParseError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(ListParseError::Empty);
    }
    let mut chars = text.char_indices().peekable();
    match chars.next() {
        Some((_, '[')) => {}
        _ => return Err(ListParseError::ExpectedOpenBracket(0)),
    }

    let mut items = Vec::new();
    loop {
        skip_ws(&mut chars);
        match chars.peek().copied() {
            Some((_, ']')) => {
                chars.next();
                break;
            }
            Some((start, q @ ('\'' | '"'))) => {
                chars.next();
                items.push(read_quoted(&mut chars, q, start)?);
            }
            Some((pos, _)) => return Err(ListParseError::ExpectedString(pos)),
            None => return Err(ListParseError::ExpectedString(text.len())),
        }

        skip_ws(&mut chars);
        match chars.next() {
            // a trailing comma before ']' is allowed
            Some((_, ',')) => {}
            Some((_, ']')) => break,
            Some((pos, _)) => return Err(ListParseError::ExpectedSeparator(pos)),
            None => return Err(ListParseError::ExpectedSeparator(text.len())),
        }
    }

    match chars.next() {
        None => Ok(items),
        Some((pos, _)) => Err(ListParseError::TrailingInput(pos)),
    }
}

fn skip_ws(chars: &mut Peekable<CharIndices<'_>>) {
    while chars.next_if(|(_, c)| c.is_whitespace()).is_some() {}
}

fn read_quoted(
    chars: &mut Peekable<CharIndices<'_>>,
    quote: char,
    start: usize,
) -> Result<String, ListParseError> {
    let mut out = String::new();
    while let Some((_, c)) = chars.next() {
        match c {
            c if c == quote => return Ok(out),
            '\\' => match chars.next() {
                Some((_, 'n')) => out.push('\n'),
                Some((_, 't')) => out.push('\t'),
                Some((_, e @ ('\\' | '\'' | '"'))) => out.push(e),
                Some((_, other)) => {
                    out.push('\\');
                    out.push(other);
                }
                None => break,
            },
            '\n' => break,
            c => out.push(c),
        }
    }
    Err(ListParseError::UnterminatedString(start))
}

/// Number of tags the model is asked to answer with.
pub const TOP_N: usize = 3;

/// 1 if `true_tag` matches a parsed tag (case-insensitive), 0 otherwise.
///
/// For `k < TOP_N` only the first `k` tags count. For `k >= TOP_N` the whole
/// list counts, so extra tags past the third still match. Unparseable text
/// scores 0.
pub fn top_k_accuracy(prediction_text: &str, true_tag: &str, k: usize) -> u8 {
    let Ok(tags) = parse_tag_list(prediction_text) else {
        return 0;
    };
    let window = if k >= TOP_N { tags.len() } else { k };
    let wanted = true_tag.to_lowercase();
    u8::from(tags.iter().take(window).any(|t| t.to_lowercase() == wanted))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MatchFlags {
    pub top1: bool,
    pub top3: bool,
}

pub fn score(prediction: &Prediction, true_tag: &str) -> MatchFlags {
    match prediction {
        Prediction::Answered(text) => MatchFlags {
            top1: top_k_accuracy(text, true_tag, 1) == 1,
            top3: top_k_accuracy(text, true_tag, TOP_N) == 1,
        },
        Prediction::Failed(_) => MatchFlags::default(),
    }
}

/// One scored ticket.
#[derive(Debug)]
pub struct EvaluationRow {
    pub ticket: Ticket,
    pub prediction: Prediction,
    pub flags: MatchFlags,
}

impl EvaluationRow {
    pub fn new(ticket: Ticket, prediction: Prediction) -> Self {
        let flags = score(&prediction, &ticket.label);
        Self {
            ticket,
            prediction,
            flags,
        }
    }
}

/// Aggregate accuracy as percentages in `0.0..=100.0`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Accuracy {
    pub top1: f64,
    pub top3: f64,
}

/// Mean of the match flags. An empty table reports 0%.
pub fn accuracy(rows: &[EvaluationRow]) -> Accuracy {
    if rows.is_empty() {
        return Accuracy::default();
    }
    let n = rows.len() as f64;
    let pct = |hits: usize| hits as f64 / n * 100.0;
    Accuracy {
        top1: pct(rows.iter().filter(|r| r.flags.top1).count()),
        top3: pct(rows.iter().filter(|r| r.flags.top3).count()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ClassificationError;

    #[test]
    fn parses_python_style_lists() {
        assert_eq!(
            parse_tag_list("['Billing inquiry', 'Refund request', 'Product inquiry']").unwrap(),
            vec!["Billing inquiry", "Refund request", "Product inquiry"]
        );
        assert_eq!(
            parse_tag_list("  [\"Technical issue\",'Refund request',]\n").unwrap(),
            vec!["Technical issue", "Refund request"]
        );
        assert_eq!(parse_tag_list(r"['it\'s']").unwrap(), vec!["it's"]);
        assert!(parse_tag_list("[]").unwrap().is_empty());
    }

    #[test]
    fn rejects_anything_but_a_literal_list() {
        assert_eq!(parse_tag_list(""), Err(ListParseError::Empty));
        assert_eq!(
            parse_tag_list("Tags: ['Refund request']"),
            Err(ListParseError::ExpectedOpenBracket(0))
        );
        assert_eq!(parse_tag_list("[Refund request]"), Err(ListParseError::ExpectedString(1)));
        assert_eq!(parse_tag_list("['a' 'b']"), Err(ListParseError::ExpectedSeparator(5)));
        assert_eq!(parse_tag_list("['a', 'b"), Err(ListParseError::UnterminatedString(6)));
        assert_eq!(parse_tag_list("['a'] and more"), Err(ListParseError::TrailingInput(5)));
        assert!(parse_tag_list("['a',").is_err());
        assert!(parse_tag_list("[1, 2, 3]").is_err());
        assert!(parse_tag_list("__import__('os')").is_err());
    }

    #[test]
    fn top_k_is_zero_or_one_for_garbage() {
        for text in ["", "   ", "no list here", "42", "[[", "['a'", "]", "Error: timeout", "['x',,]"] {
            assert_eq!(top_k_accuracy(text, "Refund request", 1), 0, "{text:?}");
            assert_eq!(top_k_accuracy(text, "Refund request", 3), 0, "{text:?}");
        }
    }

    #[test]
    fn true_tag_first_matches_both() {
        let text = "['Refund request', 'Billing inquiry', 'Product inquiry']";
        assert_eq!(top_k_accuracy(text, "Refund request", 1), 1);
        assert_eq!(top_k_accuracy(text, "Refund request", 3), 1);
    }

    #[test]
    fn true_tag_later_matches_only_top3() {
        let second = "['Billing inquiry', 'Refund request', 'Product inquiry']";
        let third = "['Billing inquiry', 'Product inquiry', 'Refund request']";
        for text in [second, third] {
            assert_eq!(top_k_accuracy(text, "Refund request", 1), 0);
            assert_eq!(top_k_accuracy(text, "Refund request", 3), 1);
        }
    }

    #[test]
    fn top3_counts_tags_past_the_third() {
        let text = "['Billing inquiry', 'Product inquiry', 'Technical issue', 'Refund request']";
        assert_eq!(top_k_accuracy(text, "Refund request", 3), 1);
        assert_eq!(top_k_accuracy(text, "Refund request", 1), 0);
        assert_eq!(
            score(&Prediction::Answered(text.into()), "Refund request"),
            MatchFlags {
                top1: false,
                top3: true
            }
        );
    }

    #[test]
    fn top1_only_looks_at_first_tag() {
        assert_eq!(top_k_accuracy("['Refund request']", "Refund request", 1), 1);
        assert_eq!(top_k_accuracy("[]", "Refund request", 1), 0);
        assert_eq!(
            top_k_accuracy("['Billing inquiry', 'Refund request']", "Refund request", 1),
            0
        );
    }

    #[test]
    fn matching_ignores_case_only() {
        let text = "['REFUND REQUEST', 'billing inquiry', 'Product inquiry']";
        assert_eq!(top_k_accuracy(text, "Refund request", 1), 1);
        assert_eq!(top_k_accuracy(text, "Billing Inquiry", 3), 1);
        assert_eq!(top_k_accuracy("['Refund requests']", "Refund request", 3), 0);
        assert_eq!(top_k_accuracy("[' Refund request']", "Refund request", 3), 0);
    }

    #[test]
    fn failed_prediction_scores_nothing() {
        let failed = Prediction::Failed(ClassificationError::EmptyResponse);
        assert_eq!(score(&failed, "Refund request"), MatchFlags::default());

        let marker = Prediction::Answered(failed.raw_text());
        assert_eq!(score(&marker, "Refund request"), MatchFlags::default());
    }

    fn row(label: &str, text: &str) -> EvaluationRow {
        EvaluationRow::new(
            Ticket {
                id: 0,
                description: "d".into(),
                label: label.into(),
            },
            Prediction::Answered(text.into()),
        )
    }

    #[test]
    fn accuracy_is_mean_of_flags() {
        let rows = vec![
            row("Refund request", "['Refund request', 'Billing inquiry', 'Product inquiry']"),
            row("Refund request", "['Billing inquiry', 'Refund request', 'Product inquiry']"),
            row("Refund request", "garbage"),
            row("Refund request", "['Billing inquiry', 'Technical issue', 'Product inquiry']"),
        ];
        let acc = accuracy(&rows);
        assert_eq!(acc.top1, 25.0);
        assert_eq!(acc.top3, 50.0);
    }

    #[test]
    fn empty_table_reports_zero() {
        assert_eq!(accuracy(&[]), Accuracy { top1: 0.0, top3: 0.0 });
    }
}
