#![allow(dead_code)]

use phishing_detector::vectorizer::DfThreshold;
use phishing_detector::{
    InferenceContext, Label, PhishingClassifier, VectorizerParams,
};
use std::path::Path;

pub const PHISHING_LABEL: &str = "Phishing Email";
pub const SAFE_LABEL: &str = "Safe Email";

const PHISHING_TEMPLATES: &[&str] = &[
    "URGENT: your bank account has been suspended. Verify your password at http://secure-login{}.example to avoid closure.",
    "Congratulations winner! Claim your free prize money today, click the link and confirm your credit card details. Ref {}",
    "Security alert: unusual login detected on account {}. Confirm your password immediately or access will be suspended.",
    "You have won a lottery cash reward of {} dollars. Send your bank details to claim the free money transfer.",
];

const SAFE_TEMPLATES: &[&str] = &[
    "Hi team, attached is the agenda for tomorrow's project meeting in room {}. Let me know if the schedule works.",
    "Thanks for the quarterly report draft {}, I added comments on the budget section before Friday's review.",
    "Lunch on Thursday? The new cafe near the office has a good menu, happy to book a table for {}.",
    "Reminder: the code review for release {} is scheduled for Monday afternoon with the engineering team.",
];

fn render(template: &str, i: usize) -> String {
    template.replace("{}", &i.to_string())
}

/// Emails with their CSV category strings.
pub fn labeled_rows(n_phishing: usize, n_safe: usize) -> Vec<(String, &'static str)> {
    let phishing = (0..n_phishing).map(|i| {
        let template = PHISHING_TEMPLATES[i % PHISHING_TEMPLATES.len()];
        (render(template, i), PHISHING_LABEL)
    });
    let safe = (0..n_safe).map(|i| {
        let template = SAFE_TEMPLATES[i % SAFE_TEMPLATES.len()];
        (render(template, i), SAFE_LABEL)
    });
    phishing.chain(safe).collect()
}

/// Writes rows in the layout of the public phishing email dataset, plus a few unusable rows.
pub fn write_csv(path: &Path, rows: &[(String, &str)]) {
    let mut writer = csv::Writer::from_path(path).unwrap();
    writer.write_record(["", "Email Text", "Email Type"]).unwrap();

    let mut index = 0;
    for (text, label) in rows {
        writer
            .write_record([index.to_string().as_str(), text.as_str(), *label])
            .unwrap();
        index += 1;
    }

    for (text, label) in [("", SAFE_LABEL), ("   ", PHISHING_LABEL), ("Who knows", "Spam")] {
        writer
            .write_record([index.to_string().as_str(), text, label])
            .unwrap();
        index += 1;
    }
    writer.flush().unwrap();
}

/// Small in-memory context trained without touching the filesystem.
pub fn sample_context() -> InferenceContext {
    let rows = labeled_rows(12, 12);
    let texts: Vec<&str> = rows.iter().map(|(text, _)| text.as_str()).collect();
    let labels: Vec<Label> = rows
        .iter()
        .map(|(_, label)| {
            if *label == PHISHING_LABEL {
                Label::Phishing
            } else {
                Label::Legitimate
            }
        })
        .collect();

    let params = VectorizerParams {
        min_df: DfThreshold::Count(2),
        ..VectorizerParams::default()
    };
    let vectorizer = params.fit(&texts).unwrap();
    let features = vectorizer.transform_batch(&texts);
    let classifier =
        PhishingClassifier::train(&features, &labels, vectorizer.vocabulary_size(), 8).unwrap();

    InferenceContext::new(vectorizer, classifier).unwrap()
}
