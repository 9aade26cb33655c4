use exam_core::model::{AnalysisResult, Difficulty, DocumentId, Priority, Topic};

pub const DEMO_ANALYSIS_ID: &str = "mock-id-123";
pub const DEMO_OVERALL_SCORE: u32 = 27;

/// Fixed "Digital Logic Design" analysis shown when the remote analysis fails.
///
/// Carries the user's analysis name so the result still reads as theirs.
#[must_use]
pub fn demo_analysis(exam_name: &str) -> AnalysisResult {
    let nand = Topic::new(
        "Universal NAND Gate Implementation",
        "Recognize NAND as universal, then replace each AND, OR, NOT in the target function \
         with equivalent NAND structures, drawing the final gate-level circuit.",
        Priority::High,
        Difficulty::Easy,
    )
    .with_side_topics(strings(&[
        "basic NAND gate symbol and truth table",
        "Boolean algebra basics",
        "gate-level implementation using NAND",
    ]))
    .with_question_types(strings(&[
        "Given F = AB + C, draw the NAND-only implementation.",
        "Show step-by-step conversion of a SOP expression to NAND network.",
        "Explain why NAND can realize any Boolean function.",
    ]));

    let kmap = Topic::new(
        "K-Map Minimization (4 Variables)",
        "Master the grouping of 1s (minterms) in a 4-variable Karnaugh Map to derive the \
         minimal Sum-of-Products (SOP) expression.",
        Priority::High,
        Difficulty::Medium,
    )
    .with_side_topics(strings(&[
        "Gray code labeling",
        "Grouping (Pairs, Quads, Octets)",
        "Don't Care conditions",
    ]))
    .with_question_types(strings(&[
        "Minimize f(A,B,C,D) = Σm(0,1,2,5,8,9,10) using K-Map.",
        "Find the essential prime implicants for the given function.",
        "Design a logic circuit after minimizing the expression.",
    ]));

    let mut result = AnalysisResult::new(exam_name, vec![nand, kmap]);
    result.id = Some(DocumentId::new(DEMO_ANALYSIS_ID));
    result.overall_score = DEMO_OVERALL_SCORE;
    result.key_insights = strings(&["Focus on NAND gates", "K-Maps are high priority"]);
    result
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_string()).collect()
}
