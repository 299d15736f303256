//! Line framing for streaming response bodies
//!
//! Providers stream either Server-Sent Events (`data: {...}` lines, `[DONE]`
//! terminator) or newline-delimited JSON. Both arrive as arbitrary byte
//! chunks; these helpers reassemble complete lines.

use std::collections::VecDeque;

use futures::stream::{self, Stream, StreamExt};

use super::error::{ProviderError, ProviderResult};

struct FrameState<B> {
    bytes: B,
    buf: String,
    pending: VecDeque<String>,
    done: bool,
}

/// Non-empty lines of a response body, in arrival order
///
/// A transport error is yielded once and terminates the stream. A trailing
/// unterminated line is flushed at end of body.
fn lines(response: reqwest::Response) -> impl Stream<Item = ProviderResult<String>> + Send {
    let state = FrameState {
        bytes: response.bytes_stream().boxed(),
        buf: String::new(),
        pending: VecDeque::new(),
        done: false,
    };

    stream::unfold(state, |mut s| async move {
        loop {
            if let Some(line) = s.pending.pop_front() {
                return Some((Ok(line), s));
            }
            if s.done {
                return None;
            }
            match s.bytes.next().await {
                Some(Ok(chunk)) => {
                    s.buf.push_str(&String::from_utf8_lossy(&chunk));
                    while let Some(pos) = s.buf.find('\n') {
                        let line = s.buf[..pos].trim_end_matches('\r').to_string();
                        s.buf.drain(..=pos);
                        if !line.is_empty() {
                            s.pending.push_back(line);
                        }
                    }
                }
                Some(Err(e)) => {
                    s.done = true;
                    return Some((Err(ProviderError::Http(e)), s));
                }
                None => {
                    s.done = true;
                    let rest = s.buf.trim().to_string();
                    if !rest.is_empty() {
                        s.pending.push_back(rest);
                    }
                }
            }
        }
    })
}

/// SSE `data:` payloads, stopping at the `[DONE]` sentinel
pub fn sse_data_lines(
    response: reqwest::Response,
) -> impl Stream<Item = ProviderResult<String>> + Send {
    lines(response)
        .map(|res| res.map(|line| line.strip_prefix("data:").map(|d| d.trim_start().to_string())))
        .take_while(|item| {
            let done = matches!(item, Ok(Some(payload)) if payload == "[DONE]");
            futures::future::ready(!done)
        })
        .filter_map(|item| async move {
            match item {
                Ok(Some(payload)) => Some(Ok(payload)),
                // Comments, event names, blank keep-alives
                Ok(None) => None,
                Err(e) => Some(Err(e)),
            }
        })
}

/// Newline-delimited JSON objects (Ollama's streaming format)
pub fn json_lines(response: reqwest::Response) -> impl Stream<Item = ProviderResult<String>> + Send {
    lines(response)
}
