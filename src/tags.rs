use std::fmt;

/// Closed set of categories shared by the ground truth and the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tag {
    TechnicalIssue,
    BillingInquiry,
    CancellationRequest,
    ProductInquiry,
    RefundRequest,
}

impl Tag {
    /// Vocabulary order. Prompts and few-shot grouping follow it.
    pub const ALL: [Tag; 5] = [
        Tag::TechnicalIssue,
        Tag::BillingInquiry,
        Tag::CancellationRequest,
        Tag::ProductInquiry,
        Tag::RefundRequest,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Tag::TechnicalIssue => "Technical issue",
            Tag::BillingInquiry => "Billing inquiry",
            Tag::CancellationRequest => "Cancellation request",
            Tag::ProductInquiry => "Product inquiry",
            Tag::RefundRequest => "Refund request",
        }
    }

    /// Exact, case-sensitive lookup as used for dataset labels.
    pub fn from_label(label: &str) -> Option<Tag> {
        Tag::ALL.into_iter().find(|t| t.as_str() == label)
    }

    /// `Technical issue, Billing inquiry, ...`
    pub fn joined() -> String {
        Tag::ALL
            .iter()
            .map(Tag::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Render tags as a single-quoted bracketed list, e.g. `['Refund request']`.
///
/// This is the literal list shape the prompts ask the model to answer with
/// and the shape `scoring::parse_tag_list` accepts.
pub fn render_tag_list<S: AsRef<str>>(tags: &[S]) -> String {
    let items: Vec<String> = tags
        .iter()
        .map(|t| {
            let escaped = t.as_ref().replace('\\', "\\\\").replace('\'', "\\'");
            format!("'{escaped}'")
        })
        .collect();
    format!("[{}]", items.join(", "))
}
