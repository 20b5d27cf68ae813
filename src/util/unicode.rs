use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// Display width in terminal cells.
pub fn display_width(s: &str) -> usize {
    s.graphemes(true).map(grapheme_width).sum()
}

/// Width of one grapheme cluster. Clusters that render as a single glyph
/// (ZWJ emoji sequences, flags) are capped at two cells.
fn grapheme_width(g: &str) -> usize {
    let w = UnicodeWidthStr::width(g);
    if g.chars().count() > 1 { w.min(2) } else { w }
}

/// Truncate to at most `max_cells` cells, ending with `…` when cut.
pub fn truncate_to_width(s: &str, max_cells: usize) -> String {
    if display_width(s) <= max_cells {
        return s.to_string();
    }
    if max_cells == 0 {
        return String::new();
    }

    let budget = max_cells - 1;
    let mut used = 0;
    let mut out = String::new();
    for g in s.graphemes(true) {
        let w = grapheme_width(g);
        if used + w > budget {
            break;
        }
        used += w;
        out.push_str(g);
    }
    out.push('\u{2026}');
    out
}

/// Byte offset of the grapheme boundary after `offset`, if any.
pub fn next_grapheme_boundary(s: &str, offset: usize) -> Option<usize> {
    let rest = s.get(offset..)?;
    rest.graphemes(true).next().map(|g| offset + g.len())
}

/// Byte offset of the grapheme boundary before `offset`, if any.
pub fn prev_grapheme_boundary(s: &str, offset: usize) -> Option<usize> {
    let head = s.get(..offset)?;
    head.graphemes(true).next_back().map(|g| offset - g.len())
}

/// Cell column of a byte offset.
pub fn byte_offset_to_display_col(s: &str, offset: usize) -> usize {
    display_width(&s[..offset.min(s.len())])
}

fn is_space(g: &str) -> bool {
    g.chars().all(char::is_whitespace)
}

/// Start of the word left of `offset` (whitespace-delimited).
pub fn word_boundary_left(s: &str, offset: usize) -> usize {
    let head = &s[..offset.min(s.len())];
    let mut pos = head.len();
    let mut graphemes = head.grapheme_indices(true).rev().peekable();

    while let Some((i, _)) = graphemes.next_if(|(_, g)| is_space(g)) {
        pos = i;
    }
    while let Some((i, _)) = graphemes.next_if(|(_, g)| !is_space(g)) {
        pos = i;
    }
    pos
}

/// Start of the next word right of `offset` (whitespace-delimited).
pub fn word_boundary_right(s: &str, offset: usize) -> usize {
    let start = offset.min(s.len());
    let mut graphemes = s[start..].grapheme_indices(true).peekable();

    while graphemes.next_if(|(_, g)| !is_space(g)).is_some() {}
    while graphemes.next_if(|(_, g)| is_space(g)).is_some() {}

    graphemes.peek().map_or(s.len(), |(i, _)| start + i)
}
