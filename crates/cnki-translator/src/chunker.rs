//! Sentence-aligned splitting of long input.

use std::mem;

const SENTENCE_TERMINATORS: [char; 3] = ['.', '?', '!'];

/// Appended to every sentence, whatever its original terminator
pub const SENTENCE_SEPARATOR: &str = ". ";

/// Trimmed, non-empty sentences in input order.
///
/// Text without any terminator has no sentences; otherwise an unterminated
/// tail counts as the last sentence.
pub fn sentences(text: &str) -> Vec<&str> {
    if !text.contains(SENTENCE_TERMINATORS) {
        return Vec::new();
    }

    text.split(SENTENCE_TERMINATORS)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

/// Greedily packs sentences into chunks of at most `max_length` characters.
///
/// Lengths count chars and include the separator. A sentence longer than
/// `max_length` is emitted whole as its own chunk.
pub fn split(text: &str, max_length: usize) -> Vec<String> {
    let separator_len = SENTENCE_SEPARATOR.chars().count();

    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for sentence in sentences(text) {
        let piece_len = sentence.chars().count() + separator_len;

        if !current.is_empty() && current_len + piece_len > max_length {
            chunks.push(mem::take(&mut current));
            current_len = 0;
        }

        current.push_str(sentence);
        current.push_str(SENTENCE_SEPARATOR);
        current_len += piece_len;
    }

    if !current.is_empty() {
        chunks.push(current);
    }

    chunks
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strip(chunks: &[String]) -> Vec<String> {
        chunks
            .iter()
            .flat_map(|c| c.split(SENTENCE_SEPARATOR))
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn no_terminator_no_chunks() {
        assert!(split("no punctuation at all", 100).is_empty());
        assert!(split("", 100).is_empty());
        assert!(split("   ", 1).is_empty());
    }

    #[test]
    fn only_terminators_no_chunks() {
        assert!(split(" . ?! .. ", 100).is_empty());
    }

    #[test]
    fn fits_in_one_chunk() {
        assert_eq!(split("A. B. C.", 1000), vec!["A. B. C. "]);
    }

    #[test]
    fn terminators_are_normalized() {
        assert_eq!(
            split("Is it?  Yes!It is.", 1000),
            vec!["Is it. Yes. It is. "]
        );
    }

    #[test]
    fn unterminated_tail_is_kept() {
        assert_eq!(split("First. second part", 1000), vec!["First. second part. "]);
    }

    #[test]
    fn packs_up_to_limit() {
        // Each piece is "Xx. " = 4 chars
        let chunks = split("Aa. Bb. Cc. Dd. Ee.", 8);
        assert_eq!(chunks, vec!["Aa. Bb. ", "Cc. Dd. ", "Ee. "]);
    }

    #[test]
    fn oversize_sentence_stays_whole() {
        let long = "x".repeat(30);
        let text = format!("Hi. {long}. Yo.");
        let chunks = split(&text, 10);

        assert_eq!(chunks, vec!["Hi. ".to_string(), format!("{long}. "), "Yo. ".to_string()]);
        // Leading oversize sentence does not emit an empty chunk first
        assert_eq!(split(&format!("{long}."), 10), vec![format!("{long}. ")]);
    }

    #[test]
    fn bounded_and_order_preserving() {
        let text = "The model converges quickly. Results are shown in Table 2! \
                    Why does it work? Because the loss is convex. \
                    深度学习模型的性能显著提升. Further work remains.";
        let expected: Vec<String> = sentences(text).iter().map(|s| s.to_string()).collect();

        for max_length in [1, 5, 20, 31, 60, 200, 10_000] {
            let chunks = split(text, max_length);

            assert!(chunks.iter().all(|c| !c.is_empty()));
            assert_eq!(strip(&chunks), expected, "max_length = {max_length}");

            for chunk in &chunks {
                let single = chunk.matches(SENTENCE_SEPARATOR).count() == 1;
                assert!(
                    chunk.chars().count() <= max_length || single,
                    "chunk {chunk:?} exceeds {max_length}"
                );
            }
        }
    }

    #[test]
    fn counts_chars_not_bytes() {
        // Pieces are 5 chars but 11 bytes each
        let chunks = split("深度学. 习模型. ", 10);
        assert_eq!(chunks, vec!["深度学. 习模型. "]);
    }
}
