//! Split oversized notice text into platform-sized chunks.

/// Preferred cut markers, highest priority first. A cut lands just after the
/// marker so the marker stays with the preceding chunk.
const BOUNDARY_MARKERS: &[&str] = &["**\n", "\n"];

/// Split `content` into chunks of at most `limit` characters.
///
/// Each cut is placed after the latest bold-block terminator (`**\n`) inside
/// the window, else after the latest line break, else exactly at `limit`.
/// Concatenating the chunks reproduces `content`. A `limit` of zero is
/// treated as one.
pub fn split_content(content: &str, limit: usize) -> Vec<&str> {
    let limit = limit.max(1);
    let mut chunks = Vec::new();
    let mut rest = content;

    while let Some(window_end) = byte_offset_of_char(rest, limit) {
        let cut = boundary_cut(&rest[..window_end]).unwrap_or(window_end);
        let (part, tail) = rest.split_at(cut);
        chunks.push(part);
        rest = tail;
    }
    chunks.push(rest);

    chunks
}

/// Byte offset of the `n`-th character, or `None` when `text` has at most `n`
/// characters (it already fits).
fn byte_offset_of_char(text: &str, n: usize) -> Option<usize> {
    let (offset, _) = text.char_indices().nth(n)?;
    Some(offset)
}

/// End offset of the best marker occurrence in `window`, by marker priority.
fn boundary_cut(window: &str) -> Option<usize> {
    BOUNDARY_MARKERS
        .iter()
        .find_map(|marker| window.rfind(marker).map(|start| start + marker.len()))
}
