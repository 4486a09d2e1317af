//! Two-tier extraction of report fields from completion text
//!
//! The remote model is asked for a JSON object, but its output is untrusted
//! free text. Extraction first tries to parse JSON (bare, fenced in markdown,
//! or embedded in prose), then falls back to locating labeled report sections,
//! and fills anything still missing with a fixed placeholder. It never fails:
//! every completion maps to a response with both fields populated.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;

use crate::report::ReportResponse;

/// Substituted when no differential diagnosis can be located
pub const DIAGNOSIS_PLACEHOLDER: &str = "No diagnosis found.";

/// Substituted when no concise impression can be located
pub const IMPRESSION_PLACEHOLDER: &str = "No impression found.";

// Section labels as models actually emit them: at the start of a line with
// optional numbering, markdown heading marks, bold markers, and a trailing
// colon, or inline as a bold span. A bare mid-sentence mention of the phrase
// is not a label.
static DIAGNOSIS_LABEL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?im)(?:^[ \t]*(?:\d+[.)][ \t]*)?(?:#{1,6}[ \t]*)?\*{0,2}|\*\*)[ \t]*differential[ \t]+diagnos(?:es|is)[ \t]*:?[ \t]*\*{0,2}[ \t]*:?",
    )
    .expect("Hardcoded label pattern should be valid")
});

static IMPRESSION_LABEL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?im)(?:^[ \t]*(?:\d+[.)][ \t]*)?(?:#{1,6}[ \t]*)?\*{0,2}|\*\*)[ \t]*concise[ \t]+impression[ \t]*:?[ \t]*\*{0,2}[ \t]*:?",
    )
    .expect("Hardcoded label pattern should be valid")
});

/// Structured form the model is prompted to return
#[derive(Deserialize)]
struct StructuredReport {
    differential_diagnosis: Option<String>,
    concise_impression: Option<String>,
}

/// Extract both report fields from a model completion.
///
/// Fields that cannot be located degrade to their placeholder; the result
/// always carries both fields as non-empty strings.
pub fn extract_report(completion: &str) -> ReportResponse {
    if let Some(report) = structured_report(completion) {
        return report;
    }

    let (diagnosis, impression) = labeled_sections(completion);

    ReportResponse {
        differential_diagnosis: diagnosis.unwrap_or_else(|| DIAGNOSIS_PLACEHOLDER.to_string()),
        concise_impression: impression.unwrap_or_else(|| IMPRESSION_PLACEHOLDER.to_string()),
    }
}

/// Parse the completion as a JSON object carrying both fields.
///
/// Returns `None` unless some candidate slice parses and both fields are
/// present and non-blank; partial objects fall through to label matching.
fn structured_report(text: &str) -> Option<ReportResponse> {
    for candidate in json_candidates(text) {
        let Ok(report) = serde_json::from_str::<StructuredReport>(candidate) else {
            continue;
        };

        let diagnosis = report.differential_diagnosis.filter(|s| !s.trim().is_empty());
        let impression = report.concise_impression.filter(|s| !s.trim().is_empty());

        if let (Some(differential_diagnosis), Some(concise_impression)) = (diagnosis, impression) {
            return Some(ReportResponse {
                differential_diagnosis,
                concise_impression,
            });
        }
    }

    None
}

/// Candidate JSON slices, strictest first
fn json_candidates(text: &str) -> Vec<&str> {
    let trimmed = text.trim();
    let mut candidates = vec![trimmed];

    // Wrapped in ```json ... ```
    if let Some(block) = fenced_block(trimmed, "```json") {
        candidates.push(block);
    }

    // Wrapped in ``` ... ```
    if let Some(block) = fenced_block(trimmed, "```") {
        candidates.push(block);
    }

    // Embedded in prose: widest brace-delimited slice
    if let (Some(start), Some(end)) = (trimmed.find('{'), trimmed.rfind('}')) {
        if start < end {
            candidates.push(&trimmed[start..=end]);
        }
    }

    candidates
}

/// Content of the first code fence opened by `opener`, if it is closed
fn fenced_block<'a>(text: &'a str, opener: &str) -> Option<&'a str> {
    let start = text.find(opener)? + opener.len();
    let end = text[start..].find("```")?;
    Some(text[start..start + end].trim())
}

/// Locate labeled sections anywhere in the completion.
///
/// Each section runs from the end of its label to the start of the other
/// label (when that follows it) or to the end of text, so the two sections
/// may appear in either order. Blank sections count as missing.
fn labeled_sections(text: &str) -> (Option<String>, Option<String>) {
    let diagnosis_label = DIAGNOSIS_LABEL.find(text);
    let impression_label = IMPRESSION_LABEL.find(text);

    let diagnosis =
        diagnosis_label.and_then(|label| section_after(text, label, impression_label));
    let impression =
        impression_label.and_then(|label| section_after(text, label, diagnosis_label));

    (diagnosis, impression)
}

fn section_after(
    text: &str,
    label: regex::Match<'_>,
    other_label: Option<regex::Match<'_>>,
) -> Option<String> {
    let start = label.end();
    let end = match other_label {
        Some(other) if other.start() >= start => other.start(),
        _ => text.len(),
    };

    let content = text[start..end].trim();
    if content.is_empty() {
        None
    } else {
        Some(content.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_json_object() {
        let report = extract_report(
            r#"{"differential_diagnosis": "Pneumonia vs atelectasis", "concise_impression": "Right lower lobe opacity."}"#,
        );

        assert_eq!(report.differential_diagnosis, "Pneumonia vs atelectasis");
        assert_eq!(report.concise_impression, "Right lower lobe opacity.");
    }

    #[test]
    fn test_json_in_markdown_fence() {
        let completion = "```json\n{\"differential_diagnosis\": \"Pulmonary edema\", \"concise_impression\": \"Interstitial thickening.\"}\n```";
        let report = extract_report(completion);

        assert_eq!(report.differential_diagnosis, "Pulmonary edema");
        assert_eq!(report.concise_impression, "Interstitial thickening.");
    }

    #[test]
    fn test_json_in_bare_fence() {
        let completion = "```\n{\"differential_diagnosis\": \"A\", \"concise_impression\": \"B\"}\n```";
        let report = extract_report(completion);

        assert_eq!(report.differential_diagnosis, "A");
        assert_eq!(report.concise_impression, "B");
    }

    #[test]
    fn test_json_embedded_in_prose() {
        let completion = "Here is the structured report you asked for:\n\n{\"differential_diagnosis\": \"Nodule\", \"concise_impression\": \"Follow-up CT advised.\"} Hope this helps!";
        let report = extract_report(completion);

        assert_eq!(report.differential_diagnosis, "Nodule");
        assert_eq!(report.concise_impression, "Follow-up CT advised.");
    }

    #[test]
    fn test_json_preferred_over_labels() {
        // When both a labeled section and a parseable object are present,
        // the object wins.
        let completion = "**Differential Diagnosis** ignored\n{\"differential_diagnosis\": \"from json\", \"concise_impression\": \"also from json\"}";
        let report = extract_report(completion);

        assert_eq!(report.differential_diagnosis, "from json");
        assert_eq!(report.concise_impression, "also from json");
    }

    #[test]
    fn test_bold_labels_split_sections() {
        let completion = "**Differential Diagnosis** X\n**Concise Impression** Y";
        let report = extract_report(completion);

        assert_eq!(report.differential_diagnosis, "X");
        assert_eq!(report.concise_impression, "Y");
    }

    #[test]
    fn test_heading_labels_with_multiline_sections() {
        let completion = "## Differential Diagnosis\n- Pneumonia\n- Atelectasis\n\n## Concise Impression\nOpacity likely infectious.";
        let report = extract_report(completion);

        assert_eq!(report.differential_diagnosis, "- Pneumonia\n- Atelectasis");
        assert_eq!(report.concise_impression, "Opacity likely infectious.");
    }

    #[test]
    fn test_numbered_bold_labels_with_colons() {
        let completion =
            "1. **Differential Diagnosis:** Pericardial effusion\n2. **Concise Impression:** Enlarged cardiac silhouette.";
        let report = extract_report(completion);

        assert_eq!(report.differential_diagnosis, "Pericardial effusion");
        assert_eq!(report.concise_impression, "Enlarged cardiac silhouette.");
    }

    #[test]
    fn test_labels_are_case_insensitive_and_accept_plural() {
        let completion = "DIFFERENTIAL DIAGNOSES: a\nconcise impression: b";
        let report = extract_report(completion);

        assert_eq!(report.differential_diagnosis, "a");
        assert_eq!(report.concise_impression, "b");
    }

    #[test]
    fn test_labels_in_reversed_order() {
        let completion = "**Concise Impression** Y\n**Differential Diagnosis** X";
        let report = extract_report(completion);

        assert_eq!(report.differential_diagnosis, "X");
        assert_eq!(report.concise_impression, "Y");
    }

    #[test]
    fn test_preamble_before_first_label_is_discarded() {
        let completion =
            "Sure, here is the report.\n\n**Differential Diagnosis** X\n**Concise Impression** Y";
        let report = extract_report(completion);

        assert_eq!(report.differential_diagnosis, "X");
        assert_eq!(report.concise_impression, "Y");
    }

    #[test]
    fn test_loose_whitespace_around_labels() {
        let completion = "  **Differential Diagnosis**   :   X   \n\n **Concise Impression**: \tY\t";
        let report = extract_report(completion);

        assert_eq!(report.differential_diagnosis, "X");
        assert_eq!(report.concise_impression, "Y");
    }

    #[test]
    fn test_mid_sentence_mention_is_not_a_label() {
        let completion = "A broad differential diagnosis was considered by the team.";
        let report = extract_report(completion);

        assert_eq!(report.differential_diagnosis, DIAGNOSIS_PLACEHOLDER);
        assert_eq!(report.concise_impression, IMPRESSION_PLACEHOLDER);
    }

    #[test]
    fn test_lone_diagnosis_label() {
        let report = extract_report("**Differential Diagnosis** Rib fracture");

        assert_eq!(report.differential_diagnosis, "Rib fracture");
        assert_eq!(report.concise_impression, IMPRESSION_PLACEHOLDER);
    }

    #[test]
    fn test_lone_impression_label() {
        let report = extract_report("**Concise Impression** No acute findings.");

        assert_eq!(report.differential_diagnosis, DIAGNOSIS_PLACEHOLDER);
        assert_eq!(report.concise_impression, "No acute findings.");
    }

    #[test]
    fn test_blank_section_degrades_to_placeholder() {
        let completion = "**Differential Diagnosis**\n**Concise Impression** Y";
        let report = extract_report(completion);

        assert_eq!(report.differential_diagnosis, DIAGNOSIS_PLACEHOLDER);
        assert_eq!(report.concise_impression, "Y");
    }

    #[test]
    fn test_plain_prose_yields_placeholders() {
        let report = extract_report("I cannot provide a diagnosis for these findings.");

        assert_eq!(report.differential_diagnosis, DIAGNOSIS_PLACEHOLDER);
        assert_eq!(report.concise_impression, IMPRESSION_PLACEHOLDER);
    }

    #[test]
    fn test_empty_completion_yields_placeholders() {
        let report = extract_report("");

        assert_eq!(report.differential_diagnosis, DIAGNOSIS_PLACEHOLDER);
        assert_eq!(report.concise_impression, IMPRESSION_PLACEHOLDER);
    }

    #[test]
    fn test_empty_json_object_yields_placeholders() {
        let report = extract_report("{}");

        assert_eq!(report.differential_diagnosis, DIAGNOSIS_PLACEHOLDER);
        assert_eq!(report.concise_impression, IMPRESSION_PLACEHOLDER);
    }

    #[test]
    fn test_json_with_blank_values_yields_placeholders() {
        let report =
            extract_report(r#"{"differential_diagnosis": "", "concise_impression": "   "}"#);

        assert_eq!(report.differential_diagnosis, DIAGNOSIS_PLACEHOLDER);
        assert_eq!(report.concise_impression, IMPRESSION_PLACEHOLDER);
    }

    #[test]
    fn test_partial_json_falls_through_to_labels() {
        // An object carrying only one field is not used as-is; the raw text
        // has no labels either, so both fields degrade.
        let report = extract_report(r#"{"differential_diagnosis": "Pneumonia"}"#);

        assert_eq!(report.differential_diagnosis, DIAGNOSIS_PLACEHOLDER);
        assert_eq!(report.concise_impression, IMPRESSION_PLACEHOLDER);
    }

    #[test]
    fn test_unterminated_fence_falls_back_to_brace_slice() {
        let completion =
            "```json\n{\"differential_diagnosis\": \"A\", \"concise_impression\": \"B\"}";
        let report = extract_report(completion);

        assert_eq!(report.differential_diagnosis, "A");
        assert_eq!(report.concise_impression, "B");
    }

    #[test]
    fn test_extraction_is_deterministic() {
        let completion = "**Differential Diagnosis** X\n**Concise Impression** Y";

        assert_eq!(extract_report(completion), extract_report(completion));
    }
}
