//! Reverse line scan over a description.
//!
//! # Responsibility
//! - Walk CRLF-separated lines from the last one upward.
//! - Stop at the first line the caller does not accept.
//! - Report the byte boundary between kept text and the consumed tail.
//!
//! # Invariants
//! - Only the exact sequence `\r\n` separates lines; lone `\r` or `\n` do not.
//! - The retained text is always a prefix of the input.
//! - An empty input is never offered to the caller.

/// Line separator recognized by the scan.
pub const LINE_BREAK: &str = "\r\n";

/// Result of [`scan_trailing_lines`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanOutcome<'t> {
    /// Input prefix above the consumed lines, without the separator that preceded them.
    pub retained: &'t str,
    /// Number of accepted lines, counted from the bottom.
    pub consumed_lines: usize,
}

/// Offers lines of `text` to `accept`, bottom-up, until one is refused.
///
/// `accept` errors abort the scan and are returned unchanged.
pub fn scan_trailing_lines<'t, F, E>(text: &'t str, mut accept: F) -> Result<ScanOutcome<'t>, E>
where
    F: FnMut(&'t str) -> Result<bool, E>,
{
    let mut boundary = text.len();
    let mut consumed_lines = 0;

    if !text.is_empty() {
        let lines = text.split(LINE_BREAK).collect::<Vec<_>>();
        for line in lines.into_iter().rev() {
            if !accept(line)? {
                break;
            }
            consumed_lines += 1;
            // The first line starts at offset 0 and has no separator before it.
            boundary = (boundary - line.len()).saturating_sub(LINE_BREAK.len());
        }
    }

    Ok(ScanOutcome {
        retained: &text[..boundary],
        consumed_lines,
    })
}
