use crate::scoring::EvaluationRow;
use crate::tags::Tag;

/// A labeled ticket embedded as a worked example in few-shot prompts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FewShotExample {
    pub description: String,
    pub tag: Tag,
}

/// Up to `per_tag` examples for each tag, taken from the zero-shot table.
///
/// Tags are visited in vocabulary order and rows in table order, so the same
/// table always yields the same examples. Labels must equal the tag exactly.
pub fn collect_examples(zero_shot: &[EvaluationRow], per_tag: usize) -> Vec<FewShotExample> {
    Tag::ALL
        .into_iter()
        .flat_map(|tag| {
            zero_shot
                .iter()
                .filter(move |row| Tag::from_label(&row.ticket.label) == Some(tag))
                .take(per_tag)
                .map(move |row| FewShotExample {
                    description: row.ticket.description.clone(),
                    tag,
                })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::Prediction;
    use crate::dataset::Ticket;

    fn table(labels: &[&str]) -> Vec<EvaluationRow> {
        labels
            .iter()
            .enumerate()
            .map(|(id, label)| {
                EvaluationRow::new(
                    Ticket {
                        id,
                        description: format!("ticket {id}"),
                        label: label.to_string(),
                    },
                    Prediction::Answered(String::new()),
                )
            })
            .collect()
    }

    #[test]
    fn groups_by_tag_in_vocabulary_order() {
        let rows = table(&[
            "Refund request",
            "Technical issue",
            "Refund request",
            "Billing inquiry",
            "Technical issue",
        ]);
        let examples = collect_examples(&rows, 5);
        let got: Vec<(&str, Tag)> = examples
            .iter()
            .map(|e| (e.description.as_str(), e.tag))
            .collect();
        assert_eq!(
            got,
            vec![
                ("ticket 1", Tag::TechnicalIssue),
                ("ticket 4", Tag::TechnicalIssue),
                ("ticket 3", Tag::BillingInquiry),
                ("ticket 0", Tag::RefundRequest),
                ("ticket 2", Tag::RefundRequest),
            ]
        );
    }

    #[test]
    fn caps_examples_per_tag() {
        let rows = table(&["Product inquiry"; 8]);
        let examples = collect_examples(&rows, 5);
        assert_eq!(examples.len(), 5);
        assert_eq!(examples[4].description, "ticket 4");
    }

    #[test]
    fn ignores_unknown_and_differently_cased_labels() {
        let rows = table(&["product inquiry", "Shipping", ""]);
        assert!(collect_examples(&rows, 5).is_empty());
    }

    #[test]
    fn collection_is_deterministic() {
        let rows = table(&["Billing inquiry", "Cancellation request", "Billing inquiry"]);
        assert_eq!(collect_examples(&rows, 5), collect_examples(&rows, 5));
    }
}
