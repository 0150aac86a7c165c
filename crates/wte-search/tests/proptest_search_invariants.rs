//! Property-based invariant tests for the search and replace engines.
//!
//! 1. Consecutive forward finds never return the same match start.
//! 2. Forward finds visit matches in strictly increasing order.
//! 3. Blank patterns leave buffer, selection and status untouched.
//! 4. `reset_position` makes the next find behave like a fresh engine.
//! 5. Case-insensitive search agrees with search over lowercased input.
//! 6. `replace_one` followed by `undo` restores the text and the match.
//! 7. Forward `replace_all` from the start agrees with `str::replace`.
//! 8. Backward `replace_all` terminates even when the replacement contains
//!    the pattern, and agrees with a right-to-left reference.
//! 9. Every replacement is individually undoable.


use proptest::prelude::*;
use wte_search::{
    Direction, ReplaceEngine, ReplaceOutcome, SearchEngine, SearchHost, SearchOutcome,
    SearchSettings,
};
use wte_text::TextBuffer;

// ── Helpers ─────────────────────────────────────────────────────────────

#[derive(Default)]
struct RecordingHost {
    statuses: Vec<String>,
}

impl SearchHost for RecordingHost {
    fn notify_status(&mut self, message: &str) {
        self.statuses.push(message.to_string());
    }
}

fn text_strategy() -> impl Strategy<Value = String> {
    "[abAB \n]{0,40}"
}

fn pattern_strategy() -> impl Strategy<Value = String> {
    "[ab]{1,3}"
}

fn replacement_strategy() -> impl Strategy<Value = String> {
    "[abx]{0,4}"
}

fn exact(pattern: &str) -> SearchSettings {
    SearchSettings::new(pattern).with_case_sensitive(true)
}

fn forward_starts(text: &str, pattern: &str) -> Vec<usize> {
    let mut buffer = TextBuffer::with_text(text);
    let mut host = RecordingHost::default();
    let mut finder = SearchEngine::new(exact(pattern));
    let mut starts = Vec::new();
    while let Ok(SearchOutcome::Found { start, .. }) = finder.find_forward(&mut buffer, &mut host)
    {
        starts.push(start);
    }
    starts
}

/// Replace right to left, each scan limited to text before the last hit.
fn replace_from_right(text: &str, pattern: &str, replacement: &str) -> (String, usize) {
    let mut out = text.to_string();
    let mut end = text.len();
    let mut count = 0;
    while let Some(i) = text[..end].rfind(pattern) {
        out.replace_range(i..i + pattern.len(), replacement);
        end = i;
        count += 1;
    }
    (out, count)
}

// ═════════════════════════════════════════════════════════════════════════
// 1–2. Forward progress
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn consecutive_forward_finds_never_repeat(
        text in text_strategy(),
        pattern in pattern_strategy(),
    ) {
        let mut buffer = TextBuffer::with_text(&text);
        let mut host = RecordingHost::default();
        let mut finder = SearchEngine::new(exact(&pattern));

        let first = finder.find_forward(&mut buffer, &mut host).unwrap();
        let second = finder.find_forward(&mut buffer, &mut host).unwrap();
        if let (Some(a), Some(b)) = (first.start(), second.start()) {
            prop_assert_ne!(a, b);
        }
    }

    #[test]
    fn forward_finds_are_strictly_increasing(
        text in text_strategy(),
        pattern in pattern_strategy(),
    ) {
        let starts = forward_starts(&text, &pattern);
        prop_assert!(starts.windows(2).all(|w| w[0] < w[1]));
        for start in &starts {
            prop_assert!(text[*start..].starts_with(pattern.as_str()));
        }
        // Overlapping matches are all visited.
        let expected: Vec<usize> = (0..text.len())
            .filter(|&i| text[i..].starts_with(pattern.as_str()))
            .collect();
        prop_assert_eq!(starts, expected);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 3–5. Blank patterns, reset, case folding
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn blank_pattern_is_a_noop(
        text in text_strategy(),
        pattern in "[ \t\n]{0,3}",
        backward in any::<bool>(),
    ) {
        let mut buffer = TextBuffer::with_text(&text);
        let len = buffer.len_chars();
        buffer.select(len / 2, len).unwrap();
        let before = buffer.selection();
        let mut host = RecordingHost::default();
        let direction = if backward { Direction::Backward } else { Direction::Forward };
        let mut finder = SearchEngine::new(SearchSettings::new(&pattern).with_direction(direction));

        prop_assert_eq!(finder.find(&mut buffer, &mut host).unwrap(), SearchOutcome::Skipped);
        prop_assert_eq!(buffer.text(), text);
        prop_assert_eq!(buffer.selection(), before);
        prop_assert!(host.statuses.is_empty());
    }

    #[test]
    fn reset_position_matches_fresh_engine(
        text in text_strategy(),
        pattern in pattern_strategy(),
        steps in 0usize..4,
        caret_seed in any::<usize>(),
    ) {
        let mut buffer = TextBuffer::with_text(&text);
        let mut host = RecordingHost::default();
        let mut used = SearchEngine::new(exact(&pattern));
        for _ in 0..steps {
            used.find_forward(&mut buffer, &mut host).unwrap();
        }
        let caret = caret_seed % (buffer.len_chars() + 1);
        buffer.set_caret(caret).unwrap();
        used.reset_position();

        let mut fresh_buffer = TextBuffer::with_text(&text);
        fresh_buffer.set_caret(caret).unwrap();
        let mut fresh = SearchEngine::new(exact(&pattern));

        prop_assert_eq!(
            used.find_forward(&mut buffer, &mut host).unwrap(),
            fresh.find_forward(&mut fresh_buffer, &mut host).unwrap()
        );
    }

    #[test]
    fn case_insensitive_matches_lowercased_search(
        text in text_strategy(),
        pattern in "[abAB]{1,3}",
    ) {
        let mut buffer = TextBuffer::with_text(&text);
        let mut host = RecordingHost::default();
        let mut finder = SearchEngine::new(SearchSettings::new(&pattern));
        let folded = finder.find_forward(&mut buffer, &mut host).unwrap();

        let lowered = text.to_lowercase().find(&pattern.to_lowercase());
        prop_assert_eq!(folded.start(), lowered);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 6–9. Replacement
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn replace_one_then_undo_round_trips(
        text in "[abA ]{0,40}",
        pattern in pattern_strategy(),
        replacement in replacement_strategy(),
    ) {
        let mut buffer = TextBuffer::with_text(&text);
        let mut host = RecordingHost::default();
        let mut replacer = ReplaceEngine::new(exact(&pattern).with_replacement(&replacement));

        // Land on the first match, if any.
        replacer.replace_one(&mut buffer, &mut host).unwrap();
        prop_assume!(replacer.matches_current_selection(&buffer));

        let outcome = replacer.replace_one(&mut buffer, &mut host).unwrap();
        prop_assert!(
            matches!(outcome, ReplaceOutcome::Replaced { .. }),
            "expected ReplaceOutcome::Replaced"
        );
        if replacement != pattern {
            prop_assert!(buffer.can_undo());
            prop_assert!(buffer.undo());
        }
        prop_assert_eq!(buffer.text(), text);
        prop_assert!(replacer.matches_current_selection(&buffer));
    }

    #[test]
    fn forward_replace_all_agrees_with_str_replace(
        text in text_strategy(),
        pattern in pattern_strategy(),
        replacement in replacement_strategy(),
    ) {
        let mut buffer = TextBuffer::with_text(&text);
        let mut host = RecordingHost::default();
        let mut replacer = ReplaceEngine::new(exact(&pattern).with_replacement(&replacement));

        let count = replacer.replace_all(&mut buffer, &mut host).unwrap();
        prop_assert_eq!(buffer.text(), text.replace(&pattern, &replacement));
        prop_assert_eq!(count, text.matches(pattern.as_str()).count());
    }

    #[test]
    fn backward_replace_all_terminates_with_self_containing_replacement(
        text in text_strategy(),
        pattern in pattern_strategy(),
        prefix in "[abx]{0,2}",
        suffix in "[abx]{0,2}",
    ) {
        let replacement = format!("{prefix}{pattern}{suffix}");
        let mut buffer = TextBuffer::with_text(&text);
        buffer.set_caret(buffer.len_chars()).unwrap();
        let mut host = RecordingHost::default();
        let mut replacer = ReplaceEngine::new(
            exact(&pattern)
                .with_replacement(&replacement)
                .with_direction(Direction::Backward),
        );

        let count = replacer.replace_all(&mut buffer, &mut host).unwrap();
        let (expected, expected_count) = replace_from_right(&text, &pattern, &replacement);
        prop_assert_eq!(count, expected_count);
        prop_assert_eq!(buffer.text(), expected);
    }

    #[test]
    fn forward_replace_all_terminates_with_self_containing_replacement(
        text in text_strategy(),
        pattern in pattern_strategy(),
        prefix in "[abx]{0,2}",
        suffix in "[abx]{0,2}",
    ) {
        let replacement = format!("{prefix}{pattern}{suffix}");
        let mut buffer = TextBuffer::with_text(&text);
        let mut host = RecordingHost::default();
        let mut replacer = ReplaceEngine::new(exact(&pattern).with_replacement(&replacement));

        replacer.replace_all(&mut buffer, &mut host).unwrap();
        prop_assert_eq!(buffer.text(), text.replace(&pattern, &replacement));
    }

    #[test]
    fn every_replacement_is_undoable(
        text in text_strategy(),
        pattern in pattern_strategy(),
        replacement in replacement_strategy(),
    ) {
        prop_assume!(pattern != replacement);
        let mut buffer = TextBuffer::with_text(&text);
        let mut host = RecordingHost::default();
        let mut replacer = ReplaceEngine::new(exact(&pattern).with_replacement(&replacement));

        let count = replacer.replace_all(&mut buffer, &mut host).unwrap();
        for _ in 0..count {
            prop_assert!(buffer.undo());
        }
        prop_assert_eq!(buffer.text(), text);
        prop_assert_eq!(buffer.is_dirty(), count > 0);
    }
}
