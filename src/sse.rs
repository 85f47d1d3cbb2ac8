//! Decoder for the upstream's `text/event-stream` body.
//!
//! Each logical message is a line prefixed `data:`; the payload is either a
//! JSON delta object or the ` [DONE]` sentinel that terminates the stream.

use anyhow::Result;
use serde_json::Value;
use std::io::BufRead;
use tracing::warn;

/// Read `data:` lines from the stream, invoking `sink` with each content
/// fragment as it arrives. Returns once the `[DONE]` sentinel is seen or the
/// stream ends; nothing is emitted for the sentinel itself.
///
/// A JSON parse failure on a single line is logged and skipped; one
/// malformed fragment never aborts the whole stream.
pub fn decode_stream<R: BufRead, F: FnMut(&str)>(reader: R, mut sink: F) -> Result<()> {
    for line in reader.lines() {
        let line = line?;
        let line = line.trim_end_matches('\r');
        if line.is_empty() {
            continue;
        }
        let Some(data) = line.strip_prefix("data:") else {
            continue;
        };
        if data == " [DONE]" {
            break;
        }
        match serde_json::from_str::<Value>(data) {
            Ok(event) => {
                if let Some(content) = delta_content(&event) {
                    sink(content);
                }
            }
            Err(err) => warn!(%err, "skipping malformed stream fragment"),
        }
    }
    Ok(())
}

fn delta_content(event: &Value) -> Option<&str> {
    event
        .get("choices")?
        .get(0)?
        .get("delta")?
        .get("content")?
        .as_str()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(raw: &str) -> Vec<String> {
        let mut out = Vec::new();
        decode_stream(raw.as_bytes(), |frag| out.push(frag.to_string())).unwrap();
        out
    }

    #[test]
    fn test_emits_fragment_then_terminates_on_done() {
        let raw = "data: {\"choices\":[{\"delta\":{\"content\":\"Hi\"}}]}\n\ndata: [DONE]\n\n";
        assert_eq!(decode(raw), vec!["Hi"]);
    }

    #[test]
    fn test_nothing_after_done_is_processed() {
        let raw = concat!(
            "data: [DONE]\n",
            "data: {\"choices\":[{\"delta\":{\"content\":\"late\"}}]}\n",
        );
        assert!(decode(raw).is_empty());
    }

    #[test]
    fn test_blank_and_cr_lines_are_skipped() {
        let raw = "\r\n\ndata: {\"choices\":[{\"delta\":{\"content\":\"a\"}}]}\r\n";
        assert_eq!(decode(raw), vec!["a"]);
    }

    #[test]
    fn test_malformed_fragment_is_skipped() {
        let raw = concat!(
            "data: {not json}\n",
            "data: {\"choices\":[{\"delta\":{\"content\":\"ok\"}}]}\n",
            "data: [DONE]\n",
        );
        assert_eq!(decode(raw), vec!["ok"]);
    }

    #[test]
    fn test_delta_without_content_emits_nothing() {
        let raw = "data: {\"choices\":[{\"delta\":{\"role\":\"assistant\"}}]}\ndata: [DONE]\n";
        assert!(decode(raw).is_empty());
    }

    #[test]
    fn test_non_data_lines_are_ignored() {
        let raw = "event: ping\ndata: {\"choices\":[{\"delta\":{\"content\":\"x\"}}]}\n";
        assert_eq!(decode(raw), vec!["x"]);
    }
}
