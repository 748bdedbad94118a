//! Word-count analysis over stored messages.

use crate::model::Message;

/// Shown when the board is empty.
pub const NO_MESSAGES: &str = "There are no messages to analyze.";

/// Counts words separated by spaces, tabs, carriage returns or line feeds.
///
/// Blank text has no words.
///
/// # Examples
///
/// ```
/// use board::analysis::count_words;
///
/// assert_eq!(count_words("one  two\tthree\r\nfour"), 4);
/// assert_eq!(count_words("   "), 0);
/// ```
pub fn count_words(text: &str) -> usize {
    if text.trim().is_empty() {
        return 0;
    }

    text.split([' ', '\t', '\n', '\r'])
        .filter(|word| !word.is_empty())
        .count()
}

/// Builds the analysis sentence for a set of messages.
pub fn summarize(messages: &[Message]) -> String {
    if messages.is_empty() {
        return NO_MESSAGES.to_string();
    }

    let words: u64 = messages.iter().map(|m| count_words(&m.text) as u64).sum();
    format!(
        "The average message length is {} words.",
        format_average(words, messages.len() as u64)
    )
}

/// Formats `total / count` with at most two decimals, rounding half away
/// from zero and trimming trailing zeros (`2`, `2.5`, `2.33`).
///
/// `count` must be non-zero.
pub fn format_average(total: u64, count: u64) -> String {
    let (total, count) = (u128::from(total), u128::from(count));
    let hundredths = (total * 200 + count) / (count * 2);
    let (whole, fraction) = (hundredths / 100, hundredths % 100);

    match fraction {
        0 => whole.to_string(),
        f if f % 10 == 0 => format!("{whole}.{}", f / 10),
        f => format!("{whole}.{f:02}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn messages(texts: &[&str]) -> Vec<Message> {
        texts
            .iter()
            .enumerate()
            .map(|(i, text)| Message {
                id: i as u32 + 1,
                text: text.to_string(),
            })
            .collect()
    }

    #[test]
    fn test_count_words() {
        assert_eq!(count_words(""), 0);
        assert_eq!(count_words("single"), 1);
        assert_eq!(count_words("  leading and trailing  "), 3);
        assert_eq!(count_words("line\nbreaks\r\nand\ttabs"), 4);
        // Other punctuation does not split words
        assert_eq!(count_words("comma,separated;words"), 1);
        // Non-breaking space alone is blank
        assert_eq!(count_words("\u{a0}"), 0);
    }

    #[test]
    fn test_format_average() {
        assert_eq!(format_average(4, 2), "2");
        assert_eq!(format_average(5, 2), "2.5");
        assert_eq!(format_average(7, 3), "2.33");
        assert_eq!(format_average(2, 3), "0.67");
        assert_eq!(format_average(0, 5), "0");
        assert_eq!(format_average(1, 200), "0.01");
        assert_eq!(format_average(1, 400), "0");
        assert_eq!(format_average(101, 10), "10.1");
        assert_eq!(format_average(u64::MAX, 1), u64::MAX.to_string());
    }

    #[test]
    fn test_summarize_empty() {
        assert_eq!(summarize(&[]), "There are no messages to analyze.");
    }

    #[test]
    fn test_summarize_average() {
        let msgs = messages(&["one two three", "four five", "six seven"]);
        assert_eq!(summarize(&msgs), "The average message length is 2.33 words.");

        let msgs = messages(&["a b", "c d e f"]);
        assert_eq!(summarize(&msgs), "The average message length is 3 words.");
    }

    #[test]
    fn test_summarize_counts_blank_messages() {
        let msgs = messages(&["one two three", "   "]);
        assert_eq!(summarize(&msgs), "The average message length is 1.5 words.");
    }
}
