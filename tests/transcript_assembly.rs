// Section-order invariants for the transcript assembler.

use llm_review::contract::UsageRecord;
use llm_review::transcript::{
    assemble, QaEntry, CONTEXT_HEADER, DIFF_HEADER, DOCUMENT_HEADER, REVIEW_HEADER, USAGE_HEADER,
};

fn position(sections: &[String], needle: &str) -> usize {
    sections
        .iter()
        .position(|s| s.starts_with(needle))
        .unwrap_or_else(|| panic!("section {needle:?} missing from {sections:?}"))
}

#[test]
fn section_order_is_invariant_with_all_sections_present() {
    let qa = vec![
        QaEntry {
            question: "Is the lock needed?".to_string(),
            answer: "Yes, the map is shared.".to_string(),
        },
        QaEntry {
            question: "What about retries?".to_string(),
            answer: "Out of scope here.".to_string(),
        },
    ];
    let usage = [UsageRecord {
        prompt_tokens: 10,
        completion_tokens: 4,
        total_tokens: 14,
    }];

    let sections = assemble("Review body", &qa, "+x\n", "reviewer notes", Some(&usage));

    let document = position(&sections, DOCUMENT_HEADER);
    let review = position(&sections, REVIEW_HEADER);
    let first_q = position(&sections, "### Q: Is the lock needed?");
    let second_q = position(&sections, "### Q: What about retries?");
    let diff = position(&sections, DIFF_HEADER);
    let context = position(&sections, CONTEXT_HEADER);
    let usage_pos = position(&sections, USAGE_HEADER);

    assert!(document < review);
    assert!(review < first_q);
    assert!(first_q < second_q);
    assert!(second_q < diff);
    assert!(diff < context);
    assert!(context < usage_pos);
    assert_eq!(sections[usage_pos + 1], "prompt: 10, completion: 4, total: 14\n");
}

#[test]
fn optional_sections_are_omitted_without_their_triggers() {
    let sections = assemble("Review body", &[], "+x\n", "", None);

    assert!(!sections.iter().any(|s| s.starts_with(CONTEXT_HEADER)));
    assert!(!sections.iter().any(|s| s.starts_with(USAGE_HEADER)));
    assert!(!sections.iter().any(|s| s.starts_with("### Q:")));
}

#[test]
fn minimal_document_matches_expected_shape() {
    let sections = assemble("Looks fine.", &[], "+print('hi')\n", "", None);

    assert_eq!(
        sections,
        vec![
            "# AI Code Review\n".to_string(),
            "## Review\n".to_string(),
            "Looks fine.\n".to_string(),
            "## Diff reviewed\n".to_string(),
            "```diff\n+print('hi')\n\n```\n".to_string(),
        ]
    );
}

#[test]
fn qa_pairs_keep_submission_order() {
    let qa: Vec<QaEntry> = (1..=3)
        .map(|i| QaEntry {
            question: format!("Question {i}"),
            answer: format!("Answer {i}"),
        })
        .collect();

    let sections = assemble("Review body", &qa, "+x\n", "", None);

    let q1 = position(&sections, "### Q: Question 1");
    let q2 = position(&sections, "### Q: Question 2");
    let q3 = position(&sections, "### Q: Question 3");
    assert!(q1 < q2 && q2 < q3);
    assert_eq!(sections[q1 + 1], "Answer 1\n");
}
