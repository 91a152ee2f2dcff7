/*!
 * Document segmentation.
 *
 * Splits raw document text into an ordered sequence of bounded segments so
 * that each translation request stays within the engines' context and rate
 * limits. Cuts prefer line breaks over hard character boundaries to avoid
 * severing table rows or code lines mid-token.
 */

use log::debug;

/// Split `text` into ordered segments of at most `max_size` characters.
///
/// The cursor advances through the text; each segment's tentative end is
/// `cursor + max_size`. When the tentative end falls short of the text's end,
/// the cut is moved back to the nearest line break strictly after the cursor,
/// searching from the tentative end inclusive, if any. Slices are trimmed of
/// surrounding whitespace and empty slices are dropped, so the returned
/// segments are non-empty and ordered.
///
/// Sizes are counted in characters, not bytes, so multi-byte text is never
/// cut inside a UTF-8 sequence.
pub fn segment(text: &str, max_size: usize) -> Vec<String> {
    debug_assert!(max_size > 0, "segment max_size must be positive");
    if max_size == 0 || text.is_empty() {
        return Vec::new();
    }

    let chars: Vec<(usize, char)> = text.char_indices().collect();
    let total = chars.len();
    let mut segments = Vec::new();
    let mut cursor = 0usize;

    while cursor < total {
        let mut end = (cursor + max_size).min(total);

        if end < total {
            // Prefer cutting at a line break to keep structural lines intact;
            // the tentative end index itself is a valid cut point
            if let Some(newline) = (cursor..=end).rev().find(|&i| chars[i].1 == '\n') {
                if newline > cursor {
                    end = newline;
                }
            }
        }

        let start_byte = chars[cursor].0;
        let end_byte = if end == total { text.len() } else { chars[end].0 };
        let slice = text[start_byte..end_byte].trim();

        if !slice.is_empty() {
            segments.push(slice.to_string());
        }

        cursor = end;
    }

    debug!(
        "Segmented {} characters into {} segments (max {} chars each)",
        total,
        segments.len(),
        max_size
    );

    segments
}
