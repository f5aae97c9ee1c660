//! Text measurement, wrapping and auto-sizing.
//!
//! Width is approximated from character count; no real font metrics are
//! consulted at layout time. The wrapper is greedy: it fills each line as far
//! as the active character budget allows and hard-splits a single token that
//! could never fit on its own line. Hard-splitting breaks mid-word, which is
//! the documented trade-off for guaranteeing that no line ever exceeds its
//! budget.

/// Average glyph advance as a fraction of the font size.
const CHAR_WIDTH_FACTOR: f32 = 0.6;

/// Approximate rendered width of `text` at `font_size`, in pixels.
pub fn estimate_width(text: &str, font_size: u32) -> f32 {
    text.chars().count() as f32 * font_size as f32 * CHAR_WIDTH_FACTOR
}

/// Character budget that fits inside `max_width` pixels at `font_size`.
pub fn chars_for_width(max_width: u32, font_size: u32) -> usize {
    // Integer form of max_width / (font_size * CHAR_WIDTH_FACTOR); float
    // division here would wobble around exact column fits.
    ((max_width as usize * 10) / (font_size as usize * 6).max(1)).max(1)
}

/// Greedy word wrap.
///
/// The first produced line is budgeted by `primary_limit`; every subsequent
/// line by `secondary_limit` when given, `primary_limit` otherwise. A token
/// longer than the active budget is chopped into budget-sized chunks.
/// Blank input yields no lines.
pub fn wrap(text: &str, primary_limit: usize, secondary_limit: Option<usize>) -> Vec<String> {
    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut current_len = 0usize;

    for token in text.split_whitespace() {
        let mut token: Vec<char> = token.chars().collect();
        loop {
            let limit = if lines.is_empty() {
                primary_limit
            } else {
                secondary_limit.unwrap_or(primary_limit)
            };

            if current_len > 0 {
                // Joining must leave the line strictly inside the budget.
                if current_len + 1 + token.len() < limit {
                    current.push(' ');
                    current.extend(token.iter());
                    current_len += 1 + token.len();
                    break;
                }
                lines.push(std::mem::take(&mut current));
                current_len = 0;
                continue;
            }

            if token.len() < limit {
                current = token.iter().collect();
                current_len = token.len();
                break;
            }

            // Token can never fit: emit a full budget-sized chunk and retry
            // with the remainder under the then-active budget.
            let rest = token.split_off(limit);
            lines.push(token.iter().collect());
            if rest.is_empty() {
                break;
            }
            token = rest;
        }
    }

    if current_len > 0 {
        lines.push(current);
    }
    lines
}

/// Result of an auto-size pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Fit {
    pub font_size: u32,
    pub char_limit: usize,
}

/// Shrink the font and widen the character budget until the wrapped text
/// fits in `max_lines`, or the font floor is reached.
///
/// Each round multiplies the size by 0.9 (floored) and the budget by 1.15
/// (floored). The size is strictly non-increasing, so the loop terminates.
/// Hitting the floor is a soft fail: the over-length text is accepted as-is.
pub fn fit(
    text: &str,
    font_size: u32,
    char_limit: usize,
    min_font_size: u32,
    max_lines: usize,
) -> Fit {
    let mut font_size = font_size;
    let mut char_limit = char_limit;

    loop {
        if wrap(text, char_limit, None).len() <= max_lines {
            break;
        }
        if font_size <= min_font_size {
            font_size = min_font_size;
            break;
        }
        font_size = ((font_size as f32 * 0.9).floor() as u32).max(min_font_size);
        char_limit = (char_limit as f32 * 1.15).floor() as usize;
    }

    Fit {
        font_size,
        char_limit,
    }
}
