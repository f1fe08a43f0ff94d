use crate::domain::{ChatId, UserId};

/// An incoming chat message already recognized as a poll command.
#[derive(Clone, Debug)]
pub struct IncomingCommand {
    pub chat_id: ChatId,
    pub user_id: UserId,
    pub username: Option<String>,
    pub text: String,
}

/// Capabilities / feature flags of a messenger implementation.
#[derive(Clone, Copy, Debug)]
pub struct MessagingCapabilities {
    pub max_message_len: usize,
}

/// Split `text` into chunks of at most `limit` bytes, preferring line breaks.
///
/// Lines longer than `limit` are cut on char boundaries.
pub fn split_text_chunks(text: &str, limit: usize) -> Vec<String> {
    let limit = limit.max(1);
    if text.len() <= limit {
        return vec![text.to_string()];
    }

    let mut out = Vec::new();
    let mut chunk = String::new();
    for line in text.split_inclusive('\n') {
        if chunk.len() + line.len() > limit && !chunk.is_empty() {
            out.push(std::mem::take(&mut chunk));
        }
        if line.len() <= limit {
            chunk.push_str(line);
            continue;
        }
        for ch in line.chars() {
            if chunk.len() + ch.len_utf8() > limit && !chunk.is_empty() {
                out.push(std::mem::take(&mut chunk));
            }
            chunk.push(ch);
        }
    }
    if !chunk.is_empty() {
        out.push(chunk);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_text_is_single_chunk() {
        assert_eq!(split_text_chunks("Poll removed.", 4096), vec!["Poll removed."]);
    }

    #[test]
    fn splits_on_line_boundaries() {
        let text = "T\n 1. a (0 votes)\n 2. b (0 votes)";
        let chunks = split_text_chunks(text, 20);
        assert_eq!(chunks, vec!["T\n 1. a (0 votes)\n", " 2. b (0 votes)"]);
        assert_eq!(chunks.concat(), text);
    }

    #[test]
    fn long_line_is_cut_under_limit() {
        let text = "é".repeat(50);
        let chunks = split_text_chunks(&text, 7);
        assert!(chunks.iter().all(|c| c.len() <= 7));
        assert_eq!(chunks.concat(), text);
    }
}
