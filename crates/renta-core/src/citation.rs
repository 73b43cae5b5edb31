//! Citation markers in answer text.
//!
//! The model cites documents with bracketed 1-based indices (`[1]`, `[2]`)
//! into the session's source list. Rendering splits the answer on those
//! markers, keeps all other text verbatim and resolves each marker to the
//! URL of the source it points at. A marker with no matching source renders
//! as nothing at all.

use std::sync::LazyLock;

use regex::Regex;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::source::Source;

static MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[[0-9]+\]").expect("citation marker pattern is valid"));

/// A piece of rendered answer text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Segment {
    /// Plain answer text, verbatim.
    Text { text: String },
    /// A resolved marker: `label` is the marker as written (`[2]`), `index`
    /// its 1-based number and `url` the cited source.
    Citation {
        label: String,
        index: usize,
        url: String,
    },
}

/// Split `answer` into text and resolved citation segments.
///
/// Markers whose index falls outside `1..=sources.len()` (including `[0]`
/// and numbers too large to parse) are dropped silently.
#[must_use]
pub fn segments(answer: &str, sources: &[Source]) -> Vec<Segment> {
    let mut out = Vec::new();
    let mut last = 0;

    for marker in MARKER.find_iter(answer) {
        push_text(&mut out, &answer[last..marker.start()]);
        last = marker.end();

        let label = marker.as_str();
        match resolve(label, sources) {
            Some((index, source)) => out.push(Segment::Citation {
                label: label.to_string(),
                index,
                url: source.source.clone(),
            }),
            None => tracing::debug!(marker = label, "dropping unresolved citation marker"),
        }
    }

    push_text(&mut out, &answer[last..]);
    out
}

fn push_text(out: &mut Vec<Segment>, text: &str) {
    if !text.is_empty() {
        out.push(Segment::Text {
            text: text.to_string(),
        });
    }
}

fn resolve<'a>(label: &str, sources: &'a [Source]) -> Option<(usize, &'a Source)> {
    let index: usize = label.trim_matches(['[', ']']).parse().ok()?;
    let source = sources.get(index.checked_sub(1)?)?;
    Some((index, source))
}

/// Short display name for a source URL: the host, without a leading `www.`.
///
/// `https://www.example.com/a/b` becomes `example.com`. Returns `None` when the
/// URL has no `//` separator or an empty host.
#[must_use]
pub fn host_label(url: &str) -> Option<String> {
    let (_, rest) = url.split_once("//")?;
    let host = rest.split('/').next().unwrap_or_default();
    let host = host.strip_prefix("www.").unwrap_or(host);
    if host.is_empty() {
        return None;
    }
    Some(host.to_string())
}

/// One line of the numbered source list shown after completion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SourceEntry {
    /// 1-based position, matching the citation markers.
    pub ordinal: usize,
    /// Host label, or the raw URL when it has no recognizable host.
    pub label: String,
    pub url: String,
}

/// Number the sources and derive their display labels.
#[must_use]
pub fn source_entries(sources: &[Source]) -> Vec<SourceEntry> {
    sources
        .iter()
        .enumerate()
        .map(|(i, source)| SourceEntry {
            ordinal: i + 1,
            label: host_label(&source.source).unwrap_or_else(|| source.source.clone()),
            url: source.source.clone(),
        })
        .collect()
}
