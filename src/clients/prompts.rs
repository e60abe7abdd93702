//! 发给模型的固定提示词

/// OCR 指令
pub const TRANSCRIBE_INSTRUCTION: &str = "Extract all text from this image exactly as written. \
Preserve line breaks, spacing, and formatting. \
If it is a multiple-choice question, state which option the student marked.";

/// 批改系统消息
pub const GRADING_SYSTEM_MESSAGE: &str =
    "You are an expert teacher assistant that grades student work. Be fair and accurate.";

/// 构建批改用户消息
pub fn build_grading_message(student_text: &str, rubric_text: &str) -> String {
    format!(
        r#"**Student's Handwritten Answers:**
----------
{}
----------

**Grading Rubric:**
----------
{}
----------

**Grading Instructions:**
1. Evaluate each answer against the rubric
2. Award partial credit where appropriate
3. Ignore minor spelling/grammar errors
4. Provide specific feedback for each question
5. Highlight correct, incorrect and partially correct answers
6. Calculate total score/marks
7. Format final output as:
   - Question-by-question breakdown
   - Detailed feedback
   - TOTAL SCORE: [score]/[max possible]"#,
        student_text, rubric_text
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grading_message_embeds_both_blocks() {
        let message = build_grading_message("Q1: 42", "Q1. 42 (3 points)");

        assert!(message.contains("----------\nQ1: 42\n----------"));
        assert!(message.contains("----------\nQ1. 42 (3 points)\n----------"));
        assert!(message.ends_with("TOTAL SCORE: [score]/[max possible]"));
    }
}
