//! Locating the JSON object inside a free-form model reply.
//!
//! Models wrap their JSON inconsistently: a ```json fence, a bare ``` fence,
//! JSON surrounded by prose, or bare JSON. The strategies below are tried in
//! order of decreasing structural confidence and the first hit wins. Nothing
//! here checks that the candidate parses; that happens in `normalize`.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

/// A ``` fence and the info-string tag that follows it on the same line.
/// Openers and closers look alike; pairing happens in [`fenced_blocks`].
static FENCE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"```[ \t]*([A-Za-z0-9_+.\-]*)").expect("Invalid fence regex")
});

/// Which strategy produced a candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionStrategy {
    /// Interior of a ```json fence.
    JsonFence,
    /// Interior of an unannotated ``` fence.
    PlainFence,
    /// From the first `{` to the last `}`.
    BraceSpan,
    /// Nothing matched; the whole reply is the candidate.
    WholeText,
}

/// Text that should contain the model's JSON object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JsonCandidate<'a> {
    pub text: &'a str,
    pub strategy: ExtractionStrategy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FenceTag {
    Json,
    Untagged,
    /// Any other language, e.g. `python` or `jsonc`.
    Other,
}

impl FenceTag {
    fn classify(tag: &str) -> Self {
        if tag.is_empty() {
            FenceTag::Untagged
        } else if tag.eq_ignore_ascii_case("json") {
            FenceTag::Json
        } else {
            FenceTag::Other
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct FencedBlock<'a> {
    tag: FenceTag,
    body: &'a str,
}

/// Fenced blocks in order. Fences pair strictly open, close, open, close,
/// so a closing fence is never read as an opener. A trailing unclosed fence
/// is ignored, as are blocks with a blank body.
fn fenced_blocks(raw: &str) -> Vec<FencedBlock<'_>> {
    let mut blocks = Vec::new();
    let mut fences = FENCE_REGEX.captures_iter(raw);

    while let Some(open) = fences.next() {
        let Some(close) = fences.next() else {
            break;
        };
        let (Some(tag), Some(close)) = (open.get(1), close.get(0)) else {
            continue;
        };

        let body = raw[tag.end()..close.start()].trim();
        if !body.is_empty() {
            blocks.push(FencedBlock {
                tag: FenceTag::classify(tag.as_str()),
                body,
            });
        }
    }

    blocks
}

fn first_block<'a>(blocks: &[FencedBlock<'a>], tag: FenceTag) -> Option<&'a str> {
    blocks.iter().find(|b| b.tag == tag).map(|b| b.body)
}

fn brace_span(raw: &str) -> Option<&str> {
    let start = raw.find('{')?;
    let end = raw.rfind('}')?;
    (end > start).then(|| &raw[start..=end])
}

/// Find the JSON candidate in a raw model reply.
///
/// Always returns a candidate; when no strategy matches, the entire input is
/// returned unchanged.
pub fn extract_json_candidate(raw: &str) -> JsonCandidate<'_> {
    let blocks = fenced_blocks(raw);

    if let Some(text) = first_block(&blocks, FenceTag::Json) {
        return JsonCandidate {
            text,
            strategy: ExtractionStrategy::JsonFence,
        };
    }

    if let Some(text) = first_block(&blocks, FenceTag::Untagged) {
        return JsonCandidate {
            text,
            strategy: ExtractionStrategy::PlainFence,
        };
    }

    if let Some(text) = brace_span(raw) {
        return JsonCandidate {
            text,
            strategy: ExtractionStrategy::BraceSpan,
        };
    }

    JsonCandidate {
        text: raw,
        strategy: ExtractionStrategy::WholeText,
    }
}
