//! Reply signing and comment pagination.
//!
//! Replies written back to the board are signed with [`REPLY_MARKER`]. The
//! marker is what the intake endpoint looks for to avoid reacting to its own
//! comments, so its exact text is a compatibility contract with every reply
//! already posted on existing boards.

/// Signature placed at the top of every generated reply.
pub const REPLY_MARKER: &str = "[🤖 AI Reply]";

/// Maximum comment length accepted by the board provider, in characters.
pub const DEFAULT_COMMENT_LIMIT: usize = 16_384;

/// Room reserved for the widest part header we emit.
const PART_HEADER_RESERVE: usize = "[Part 9999/9999]\n".len();

const PARAGRAPH_BREAK: &str = "\n\n";
const SENTENCE_BREAK: &str = " ";

/// Returns `true` if `text` contains the reply marker anywhere.
pub fn is_own_reply(text: &str) -> bool {
    text.contains(REPLY_MARKER)
}

/// Prefixes a generated reply with the reply marker.
pub fn sign_reply(reply: &str) -> String {
    format!("{REPLY_MARKER}\n{}", reply.trim())
}

/// Splits `text` into comments no longer than `limit` characters.
///
/// Text that fits is returned as a single, unchanged comment. Longer text is
/// split on blank lines first, then on sentence boundaries, and only as a
/// last resort at arbitrary character positions; the pieces are packed
/// greedily and each comment is headed `[Part i/N]`.
///
/// If `text` starts with [`REPLY_MARKER`], every part repeats the marker ahead
/// of its header so that no part can be mistaken for a human comment.
pub fn paginate_comment(text: &str, limit: usize) -> Vec<String> {
    if char_len(text) <= limit {
        return vec![text.to_string()];
    }

    let (signature, body) = match text.strip_prefix(REPLY_MARKER) {
        Some(rest) => (Some(REPLY_MARKER), rest.trim_start()),
        None => (None, text),
    };
    let reserve = PART_HEADER_RESERVE + signature.map_or(0, |s| char_len(s) + 1);
    let budget = limit.saturating_sub(reserve).max(1);

    let chunks = pack(pieces(body, budget), budget);
    if chunks.is_empty() {
        return vec![text.to_string()];
    }

    let total = chunks.len();
    tracing::debug!(parts = total, limit, "splitting oversized comment");
    chunks
        .into_iter()
        .enumerate()
        .map(|(index, chunk)| {
            let header = format!("[Part {}/{}]", index + 1, total);
            match signature {
                Some(sig) => format!("{sig} {header}\n{chunk}"),
                None => format!("{header}\n{chunk}"),
            }
        })
        .collect()
}

/// A unit of text that is never split further, with the separator that goes
/// in front of it when it shares a comment with the previous unit.
struct Piece<'a> {
    text: String,
    joiner: &'a str,
}

fn pieces(body: &str, budget: usize) -> Vec<Piece<'static>> {
    let mut out = Vec::new();
    for paragraph in body
        .split(PARAGRAPH_BREAK)
        .map(str::trim)
        .filter(|p| !p.is_empty())
    {
        if char_len(paragraph) <= budget {
            out.push(Piece {
                text: paragraph.to_string(),
                joiner: PARAGRAPH_BREAK,
            });
            continue;
        }

        let mut joiner = PARAGRAPH_BREAK;
        for sentence in sentences(paragraph) {
            if char_len(sentence) <= budget {
                out.push(Piece {
                    text: sentence.to_string(),
                    joiner,
                });
            } else {
                for fragment in hard_split(sentence, budget) {
                    out.push(Piece {
                        text: fragment,
                        joiner,
                    });
                    joiner = "";
                }
            }
            joiner = SENTENCE_BREAK;
        }
    }
    out
}

fn pack(pieces: Vec<Piece<'_>>, budget: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();
    for piece in pieces {
        if current.is_empty() {
            current = piece.text;
            continue;
        }
        if char_len(&current) + char_len(piece.joiner) + char_len(&piece.text) <= budget {
            current.push_str(piece.joiner);
            current.push_str(&piece.text);
        } else {
            chunks.push(std::mem::take(&mut current));
            current = piece.text;
        }
    }
    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}

/// Splits a paragraph after `.`, `!`, or `?` when followed by whitespace.
fn sentences(paragraph: &str) -> Vec<&str> {
    let mut out = Vec::new();
    let mut start = 0;
    let mut chars = paragraph.char_indices().peekable();
    while let Some((idx, ch)) = chars.next() {
        if !matches!(ch, '.' | '!' | '?') {
            continue;
        }
        if let Some(&(next_idx, next)) = chars.peek() {
            if next.is_whitespace() {
                let sentence = paragraph[start..idx + ch.len_utf8()].trim();
                if !sentence.is_empty() {
                    out.push(sentence);
                }
                start = next_idx;
            }
        }
    }
    let tail = paragraph[start..].trim();
    if !tail.is_empty() {
        out.push(tail);
    }
    out
}

fn hard_split(text: &str, budget: usize) -> Vec<String> {
    text.chars()
        .collect::<Vec<_>>()
        .chunks(budget)
        .map(|chunk| chunk.iter().collect())
        .collect()
}

fn char_len(text: &str) -> usize {
    text.chars().count()
}
