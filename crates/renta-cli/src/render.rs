//! Terminal rendering of answers and their sources.
//!
//! Citation markers become the marker text itself, wrapped in an OSC 8
//! hyperlink to the cited source when the terminal gets hyperlinks. The
//! numbered source list printed after completion uses the same numbers.

use renta_core::SessionState;
use renta_core::citation::{self, Segment, SourceEntry};

use crate::ui;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Style {
    pub hyperlinks: bool,
    pub color: bool,
}

impl Style {
    #[must_use]
    pub fn from_prefs() -> Self {
        let prefs = ui::prefs();
        Self {
            hyperlinks: prefs.hyperlinks,
            color: prefs.color,
        }
    }
}

#[must_use]
pub fn render_segments(segments: &[Segment], style: Style) -> String {
    let mut out = String::new();
    for segment in segments {
        match segment {
            Segment::Text { text } => out.push_str(text),
            Segment::Citation { label, url, .. } if style.hyperlinks => {
                out.push_str(&hyperlink(url, label));
            }
            Segment::Citation { label, .. } => out.push_str(label),
        }
    }
    out
}

/// The numbered source list, one `[n] host  url` line per source.
#[must_use]
pub fn render_sources(entries: &[SourceEntry], style: Style) -> String {
    if entries.is_empty() {
        return String::new();
    }

    let mut lines = vec![String::from("Sources:")];
    for entry in entries {
        let label = if style.hyperlinks {
            hyperlink(&entry.url, &entry.label)
        } else {
            entry.label.clone()
        };
        let line = if entry.label == entry.url {
            format!("  [{}] {label}", entry.ordinal)
        } else if style.color {
            format!("  [{}] {label}  \u{1b}[2m{}\u{1b}[0m", entry.ordinal, entry.url)
        } else {
            format!("  [{}] {label}  {}", entry.ordinal, entry.url)
        };
        lines.push(line);
    }
    lines.join("\n")
}

const DISCLAIMER: &str = "RentaGPT uses AI (GPT-3) to answer questions about the \
Manual Práctico de Renta 2022. It is an experimental project and may produce \
inaccurate information.";

const RENTA_MANUAL_URL: &str = "https://sede.agenciatributaria.gob.es/Sede/Ayuda/22Manual/100.html";

/// The question, shown above its answer.
#[must_use]
pub fn render_heading(query: &str, style: Style) -> String {
    if style.color {
        format!("\u{1b}[1m{query}\u{1b}[0m\n\n")
    } else {
        format!("{query}\n\n")
    }
}

/// Note printed under a finished answer.
#[must_use]
pub fn render_disclaimer(style: Style) -> String {
    let text = if style.hyperlinks {
        DISCLAIMER.replace(
            "Manual Práctico de Renta 2022",
            &hyperlink(RENTA_MANUAL_URL, "Manual Práctico de Renta 2022"),
        )
    } else {
        DISCLAIMER.to_string()
    };
    if style.color {
        format!("\u{1b}[2m{text}\u{1b}[0m")
    } else {
        text
    }
}

fn hyperlink(url: &str, text: &str) -> String {
    format!("\u{1b}]8;;{url}\u{1b}\\{text}\u{1b}]8;;\u{1b}\\")
}

/// Prints a streaming answer incrementally.
///
/// Text is released up to, but not including, a marker that might still be
/// growing (`[1` at the end of the answer so far). Until the first source
/// list arrives, text stops before the first complete marker so that it is
/// resolved against real sources rather than dropped.
#[derive(Debug, Default)]
pub struct StreamRenderer {
    emitted: usize,
    sources_seen: bool,
}

impl StreamRenderer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub const fn sources_arrived(&mut self) {
        self.sources_seen = true;
    }

    /// Render whatever part of `state.answer` is safe to print now. With
    /// `finished`, everything left is released.
    pub fn advance(&mut self, state: &SessionState, finished: bool, style: Style) -> String {
        let answer = state.answer.as_str();
        let end = if finished {
            answer.len()
        } else {
            self.safe_end(answer)
        };
        if end <= self.emitted {
            return String::new();
        }

        let chunk = &answer[self.emitted..end];
        self.emitted = end;
        render_segments(&citation::segments(chunk, &state.sources), style)
    }

    fn safe_end(&self, answer: &str) -> usize {
        let pending = &answer[self.emitted..];
        let mut end = answer.len() - partial_marker_len(pending);
        if !self.sources_seen
            && let Some(start) = first_marker_start(pending)
        {
            end = end.min(self.emitted + start);
        }
        end
    }
}

fn first_marker_start(text: &str) -> Option<usize> {
    text.match_indices('[').map(|(i, _)| i).find(|&i| {
        let rest = &text.as_bytes()[i + 1..];
        let digits = rest.iter().take_while(|b| b.is_ascii_digit()).count();
        digits > 0 && rest.get(digits) == Some(&b']')
    })
}

fn partial_marker_len(text: &str) -> usize {
    let Some(open) = text.rfind('[') else {
        return 0;
    };
    if text.as_bytes()[open + 1..].iter().all(u8::is_ascii_digit) {
        text.len() - open
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use renta_core::{SessionEvent, Source};
    use rstest::rstest;

    use super::*;

    const PLAIN: Style = Style {
        hyperlinks: false,
        color: false,
    };

    fn streaming(answer: &str, urls: &[&str]) -> SessionState {
        let mut state = SessionState::new().apply(SessionEvent::Submitted("q".into()));
        if !urls.is_empty() {
            state = state.apply(SessionEvent::SourcesReceived(
                urls.iter().map(|url| Source::new(*url)).collect(),
            ));
        }
        state.apply(SessionEvent::FragmentReceived(answer.into()))
    }

    #[test]
    fn hyperlinked_citation_keeps_marker_text() {
        let segments = citation::segments("ver [1]", &[Source::new("https://a.es/x")]);
        let out = render_segments(
            &segments,
            Style {
                hyperlinks: true,
                color: false,
            },
        );
        assert_eq!(out, "ver \u{1b}]8;;https://a.es/x\u{1b}\\[1]\u{1b}]8;;\u{1b}\\");
    }

    #[test]
    fn unresolved_marker_renders_nothing() {
        let segments = citation::segments("a [3] b", &[Source::new("https://a.es")]);
        assert_eq!(render_segments(&segments, PLAIN), "a  b");
    }

    #[test]
    fn sources_list_uses_host_labels() {
        let entries = citation::source_entries(&[
            Source::new("https://www.example.com/a"),
            Source::new("file-without-host"),
        ]);
        assert_eq!(
            render_sources(&entries, PLAIN),
            "Sources:\n  [1] example.com  https://www.example.com/a\n  [2] file-without-host"
        );
    }

    #[test]
    fn empty_sources_render_nothing() {
        assert_eq!(render_sources(&[], PLAIN), "");
    }

    #[test]
    fn heading_puts_query_above_answer() {
        assert_eq!(render_heading("¿IRPF?", PLAIN), "¿IRPF?\n\n");
        assert!(
            render_heading(
                "¿IRPF?",
                Style {
                    hyperlinks: false,
                    color: true
                }
            )
            .starts_with("\u{1b}[1m¿IRPF?")
        );
    }

    #[test]
    fn disclaimer_warns_about_inaccuracy() {
        let plain = render_disclaimer(PLAIN);
        assert!(plain.contains("experimental"));
        assert!(plain.contains("inaccurate"));
        assert!(!plain.contains('\u{1b}'));

        let linked = render_disclaimer(Style {
            hyperlinks: true,
            color: false,
        });
        assert!(linked.contains(RENTA_MANUAL_URL));
    }

    #[rstest]
    #[case("plain text", None)]
    #[case("see [1] here", Some(4))]
    #[case("[nota] then [12]", Some(12))]
    #[case("open [ bracket", None)]
    fn finds_first_complete_marker(#[case] text: &str, #[case] expected: Option<usize>) {
        assert_eq!(first_marker_start(text), expected);
    }

    #[rstest]
    #[case("done.", 0)]
    #[case("see [", 1)]
    #[case("see [12", 3)]
    #[case("see [1]", 0)]
    #[case("a [b", 0)]
    fn measures_trailing_partial_marker(#[case] text: &str, #[case] expected: usize) {
        assert_eq!(partial_marker_len(text), expected);
    }

    #[test]
    fn holds_back_marker_split_across_fragments() {
        let mut renderer = StreamRenderer::new();
        renderer.sources_arrived();

        let state = streaming("Grava el alquiler [", &["https://a.es"]);
        assert_eq!(renderer.advance(&state, false, PLAIN), "Grava el alquiler ");

        let state = state.apply(SessionEvent::FragmentReceived("1] y más".into()));
        assert_eq!(renderer.advance(&state, false, PLAIN), "[1] y más");
    }

    #[test]
    fn waits_for_sources_before_resolving_markers() {
        let mut renderer = StreamRenderer::new();

        let state = streaming("Texto [1] final", &[]);
        assert_eq!(renderer.advance(&state, false, PLAIN), "Texto ");
        assert_eq!(renderer.advance(&state, false, PLAIN), "");

        let state = state.apply(SessionEvent::SourcesReceived(vec![Source::new("https://a.es")]));
        renderer.sources_arrived();
        assert_eq!(renderer.advance(&state, false, PLAIN), "[1] final");
    }

    #[test]
    fn finishing_releases_everything() {
        let mut renderer = StreamRenderer::new();
        let state = streaming("Sin fuentes [2] y [", &[]);

        assert_eq!(renderer.advance(&state, false, PLAIN), "Sin fuentes ");
        assert_eq!(renderer.advance(&state, true, PLAIN), " y [");
    }
}
