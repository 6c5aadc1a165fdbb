use itertools::Itertools;

use crate::sequence::Mode;

#[derive(Clone, Debug, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum Outcome {
    Correct,
    Incorrect,
}

/// Trim surrounding whitespace and uppercase. Internal whitespace is kept.
pub fn normalize(response: &str) -> String {
    response.trim().to_uppercase()
}

/// The answer a subject must type back for `sequence` under `mode`
pub fn expected_answer(sequence: &[char], mode: Mode) -> String {
    match mode {
        Mode::DigitOnly => sequence.iter().collect(),
        // digits sort before letters, each class by character value
        Mode::LetterNumber => sequence
            .iter()
            .sorted_by_key(|c| (c.is_ascii_alphabetic(), **c))
            .collect(),
    }
}

pub fn score(sequence: &[char], mode: Mode, response: &str) -> Outcome {
    if normalize(response) == expected_answer(sequence, mode) {
        Outcome::Correct
    } else {
        Outcome::Incorrect
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digit_only_expected_is_presentation_order() {
        assert_eq!(expected_answer(&['2', '7', '4'], Mode::DigitOnly), "274");
    }

    #[test]
    fn test_letter_number_expected_sorts_digits_first() {
        assert_eq!(
            expected_answer(&['C', '5', 'A', '2'], Mode::LetterNumber),
            "25AC"
        );
        assert_eq!(
            expected_answer(&['Z', 'B', '9', '0', 'B'], Mode::LetterNumber),
            "09BBZ"
        );
    }

    #[test]
    fn test_digit_only_scoring() {
        let seq = ['2', '7', '4'];
        assert_eq!(score(&seq, Mode::DigitOnly, "274"), Outcome::Correct);
        assert_eq!(score(&seq, Mode::DigitOnly, "  274\t"), Outcome::Correct);
        assert_eq!(score(&seq, Mode::DigitOnly, "2 7 4"), Outcome::Incorrect);
        assert_eq!(score(&seq, Mode::DigitOnly, "247"), Outcome::Incorrect);
        assert_eq!(score(&seq, Mode::DigitOnly, "2745"), Outcome::Incorrect);
    }

    #[test]
    fn test_letter_number_scoring() {
        let seq = ['C', '5', 'A', '2'];
        assert_eq!(score(&seq, Mode::LetterNumber, "25AC"), Outcome::Correct);
        assert_eq!(score(&seq, Mode::LetterNumber, "25CA"), Outcome::Incorrect);
        // presentation order is wrong in this mode
        assert_eq!(score(&seq, Mode::LetterNumber, "C5A2"), Outcome::Incorrect);
    }

    #[test]
    fn test_scoring_ignores_case_and_outer_whitespace() {
        let seq = ['A', '1', 'B'];
        assert_eq!(
            score(&seq, Mode::DigitOnly, " a1B "),
            score(&seq, Mode::DigitOnly, "A1b")
        );
        assert_eq!(score(&seq, Mode::DigitOnly, " a1B "), Outcome::Correct);
        assert_eq!(score(&seq, Mode::LetterNumber, " 1ab "), Outcome::Correct);
    }

    #[test]
    fn test_empty_response_is_incorrect() {
        assert_eq!(score(&['1', '2', '3'], Mode::DigitOnly, ""), Outcome::Incorrect);
        assert_eq!(
            score(&['1', '2', '3'], Mode::DigitOnly, "   "),
            Outcome::Incorrect
        );
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("  ab c "), "AB C");
        assert_eq!(normalize(""), "");
    }

    #[test]
    fn test_outcome_display() {
        assert_eq!(Outcome::Correct.to_string(), "Correct");
        assert_eq!(Outcome::Incorrect.to_string(), "Incorrect");
    }
}
