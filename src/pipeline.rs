use indicatif::{ProgressBar, ProgressStyle};
use tracing::{info, warn};

use crate::classifier::{Classifier, Prediction};
use crate::config::RunSettings;
use crate::dataset::{self, Ticket};
use crate::errors::TaggerError;
use crate::few_shot::collect_examples;
use crate::io_utils::{write_evaluation, FEW_SHOT_HEADERS, ZERO_SHOT_HEADERS};
use crate::prompts::Prompts;
use crate::scoring::{accuracy, Accuracy, EvaluationRow};

/// Accuracies of both passes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunOutcome {
    pub zero_shot: Accuracy,
    pub few_shot: Accuracy,
    pub few_shot_examples: usize,
}

fn progress_bar(len: usize, label: &'static str, visible: bool) -> ProgressBar {
    if !visible {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new(len as u64);
    if let Ok(style) =
        ProgressStyle::with_template("{msg}: {bar:40} {pos}/{len} [{elapsed_precise}]")
    {
        pb.set_style(style);
    }
    pb.set_message(label);
    pb
}

/// Classify every ticket in order, one request at a time, and score it.
/// A failed call becomes a non-matching row; the pass always completes.
pub async fn evaluate<C, F>(
    classifier: &C,
    tickets: &[Ticket],
    label: &'static str,
    show_progress: bool,
    build_prompt: F,
) -> Vec<EvaluationRow>
where
    C: Classifier,
    F: Fn(&str) -> String,
{
    let pb = progress_bar(tickets.len(), label, show_progress);
    let mut rows = Vec::with_capacity(tickets.len());
    for ticket in tickets {
        let prompt = build_prompt(&ticket.description);
        let result = classifier.classify(&prompt).await;
        if let Err(e) = &result {
            pb.suspend(|| warn!("{}: ticket {} failed: {}", label, ticket.id, e));
        }
        rows.push(EvaluationRow::new(
            ticket.clone(),
            Prediction::from_result(result),
        ));
        pb.inc(1);
    }
    pb.finish_and_clear();
    rows
}

fn report(pass: &str, acc: Accuracy) {
    println!("\n{pass} Top-1 Accuracy: {:.2}%", acc.top1);
    println!("{pass} Top-3 Accuracy: {:.2}%", acc.top3);
}

/// Load, sample, run the zero-shot pass, then the few-shot pass built from
/// the zero-shot table. Writes both result files.
pub async fn run<C: Classifier>(
    classifier: &C,
    settings: &RunSettings,
) -> Result<RunOutcome, TaggerError> {
    let tickets = dataset::load_tickets(&settings.dataset, &settings.columns())?;
    let sample = dataset::sample(&tickets, settings.sample_size, settings.seed);
    info!(
        "Evaluating {} of {} tickets from {}",
        sample.len(),
        tickets.len(),
        settings.dataset.display()
    );

    let zero_shot = evaluate(
        classifier,
        &sample,
        "Classifying tickets",
        settings.show_progress,
        Prompts::zero_shot,
    )
    .await;
    let zero_shot_acc = accuracy(&zero_shot);
    report("Zero-shot", zero_shot_acc);
    write_evaluation(&settings.zero_shot_output, &ZERO_SHOT_HEADERS, &zero_shot)?;
    info!("Zero-shot results saved to {}", settings.zero_shot_output.display());

    let examples = collect_examples(&zero_shot, settings.examples_per_tag);
    info!("Collected {} few-shot examples", examples.len());

    // same tickets, drawn again in a fresh order
    let few_shot_set = dataset::sample(&sample, sample.len(), settings.seed);
    let few_shot = evaluate(
        classifier,
        &few_shot_set,
        "Few-shot classifying",
        settings.show_progress,
        |text| Prompts::few_shot(&examples, text),
    )
    .await;
    let few_shot_acc = accuracy(&few_shot);
    report("Few-shot", few_shot_acc);
    write_evaluation(&settings.few_shot_output, &FEW_SHOT_HEADERS, &few_shot)?;
    info!("Few-shot results saved to {}", settings.few_shot_output.display());

    Ok(RunOutcome {
        zero_shot: zero_shot_acc,
        few_shot: few_shot_acc,
        few_shot_examples: examples.len(),
    })
}
