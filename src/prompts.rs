use crate::few_shot::FewShotExample;
use crate::tags::{render_tag_list, Tag};

pub struct Prompts;

impl Prompts {
    /// Instruction-only prompt for a single ticket.
    pub fn zero_shot(ticket_text: &str) -> String {
        format!(
            r#"
You are an intelligent support assistant. Read the support ticket below and classify it into the 3 most relevant tags from the following list:

Tags: {tags}

Ticket Description:
"""
{ticket}
"""

Respond only with a Python list of the 3 most relevant tags.
"#,
            tags = Tag::joined(),
            ticket = ticket_text,
        )
    }

    /// Instruction, numbered worked examples, then the target ticket with a
    /// trailing `Tags:` cue for the model to complete.
    pub fn few_shot(examples: &[FewShotExample], ticket_text: &str) -> String {
        let mut prompt = String::from(
            "You are a helpful support assistant. Based on the examples below, classify the following ticket into the 3 most relevant tags from this list:\n\n",
        );
        prompt.push_str(&format!("Tags: {}\n\n", Tag::joined()));
        prompt.push_str("Respond only with a Python list of the 3 most relevant tags.\n\n");

        for (i, ex) in examples.iter().enumerate() {
            prompt.push_str(&format!(
                "Example {n}:\nTicket: \"\"\"{desc}\"\"\"\nTags: {tags}\n\n",
                n = i + 1,
                desc = ex.description,
                tags = render_tag_list(&[ex.tag.as_str()]),
            ));
        }

        prompt.push_str(&format!("Ticket: \"\"\"{ticket_text}\"\"\"\n"));
        prompt.push_str("Tags:");
        prompt
    }
}
