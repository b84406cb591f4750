use serde::{Deserialize, Serialize};

use crate::generator::{Problem, ProblemId};

const ANSWER_TOLERANCE: f64 = 1e-4;

/// Tri-state outcome of one submission. `Skipped` is never a wrong answer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Correct,
    Incorrect,
    Skipped,
}

impl Verdict {
    pub fn is_correct(self) -> Option<bool> {
        match self {
            Verdict::Correct => Some(true),
            Verdict::Incorrect => Some(false),
            Verdict::Skipped => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AnswerResult {
    pub problem_id: ProblemId,
    pub user_answer: Option<String>,
    pub verdict: Verdict,
    pub correct_answer: i64,
}

impl AnswerResult {
    pub fn submitted(problem: &Problem, raw: &str) -> Self {
        let trimmed = trim_answer(raw);
        Self {
            problem_id: problem.id,
            user_answer: (!trimmed.is_empty()).then(|| trimmed.to_string()),
            verdict: validate(trimmed, problem.correct_answer),
            correct_answer: problem.correct_answer,
        }
    }

    pub fn skipped(problem: &Problem) -> Self {
        Self {
            problem_id: problem.id,
            user_answer: None,
            verdict: Verdict::Skipped,
            correct_answer: problem.correct_answer,
        }
    }
}

/// Whitespace and a stray byte-order mark are not part of the answer.
fn trim_answer(raw: &str) -> &str {
    raw.trim_matches(|c: char| c.is_whitespace() || c == '\u{FEFF}')
}

/// Classify free-text input against the expected answer.
pub fn validate(raw: &str, correct_answer: i64) -> Verdict {
    let trimmed = trim_answer(raw);
    if trimmed.is_empty() {
        return Verdict::Skipped;
    }
    match parse_leading_number(trimmed) {
        Some(parsed) if (parsed - correct_answer as f64).abs() < ANSWER_TOLERANCE => {
            Verdict::Correct
        }
        _ => Verdict::Incorrect,
    }
}

/// Parse the longest numeric prefix of `s`, ignoring trailing garbage
/// (`"42abc"` reads as 42). Returns `None` when no mantissa digit leads.
pub fn parse_leading_number(s: &str) -> Option<f64> {
    let bytes = s.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end += 1;
    }
    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - int_start;

    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        let frac_digits = frac_end - frac_start;
        if digits + frac_digits > 0 {
            end = frac_end;
            digits += frac_digits;
        }
    }
    if digits == 0 {
        return None;
    }

    if end < bytes.len() && matches!(bytes[end], b'e' | b'E') {
        let mut exp_end = end + 1;
        if exp_end < bytes.len() && matches!(bytes[exp_end], b'+' | b'-') {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    s[..end].parse::<f64>().ok()
}
