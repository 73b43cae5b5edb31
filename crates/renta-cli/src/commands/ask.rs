use std::io::Write;

use anyhow::Context;
use renta_auth::CredentialStore;
use renta_client::{ClientError, SessionController};
use renta_config::RentaConfig;
use renta_core::citation;
use renta_core::responses::AskResponse;
use renta_core::{SessionEvent, SessionPhase, SessionState, View};

use crate::cli::root_commands::AskArgs;
use crate::cli::{GlobalFlags, OutputFormat};
use crate::output::output;
use crate::progress::Progress;
use crate::render::{self, StreamRenderer, Style};

/// Handle `renta ask`.
pub async fn handle(
    args: &AskArgs,
    flags: &GlobalFlags,
    config: &RentaConfig,
) -> anyhow::Result<()> {
    let controller = SessionController::from_config(config)?;
    let store = CredentialStore::from_config(&config.credential)?;
    let api_key = load_api_key(&store)?;

    let (state, result) =
        run_session(&controller, &args.query(), &api_key, flags, SessionState::new()).await;
    if let Err(error) = result
        && error.is_input_error()
    {
        return Err(error.into());
    }

    if flags.format != OutputFormat::Table {
        output(&AskResponse::from(&state), flags.format)?;
    }

    if state.phase == SessionPhase::Error {
        anyhow::bail!(
            state
                .error
                .unwrap_or_else(|| String::from("the session failed"))
        );
    }
    Ok(())
}

/// The stored API key. Questions can only be asked with a key of the
/// configured length, so anything else fails before a connection is opened.
pub(crate) fn load_api_key(store: &CredentialStore) -> anyhow::Result<String> {
    let stored = store
        .require_valid()
        .context("store a valid OpenAI API key with `renta key set`")?;
    Ok(stored.value)
}

/// Run one session from `state` and return where it ended.
///
/// In table format the answer is printed while it streams; other formats
/// print nothing here.
pub(crate) async fn run_session(
    controller: &SessionController,
    query: &str,
    api_key: &str,
    flags: &GlobalFlags,
    state: SessionState,
) -> (SessionState, Result<(), ClientError>) {
    let mut presenter = Presenter::new(flags.format == OutputFormat::Table);
    let mut state = state;

    let result = controller
        .submit(query, api_key, &mut |event: SessionEvent| {
            state = std::mem::take(&mut state).apply(event.clone());
            presenter.observe(&event, &state);
        })
        .await;

    presenter.close(&state);
    (state, result)
}

/// Terminal side of a session, driven by [`SessionState::view`]: a spinner
/// while the search view is loading, then the query heading and the answer
/// as it arrives, then sources and the disclaimer once done.
struct Presenter {
    live: bool,
    style: Style,
    spinner: Option<Progress>,
    renderer: StreamRenderer,
    shown: Option<View>,
}

impl Presenter {
    fn new(live: bool) -> Self {
        Self {
            live,
            style: Style::from_prefs(),
            spinner: None,
            renderer: StreamRenderer::new(),
            shown: None,
        }
    }

    fn observe(&mut self, event: &SessionEvent, state: &SessionState) {
        if !self.live {
            return;
        }
        if matches!(event, SessionEvent::SourcesReceived(_)) {
            self.renderer.sources_arrived();
        }
        let finished = matches!(event, SessionEvent::Completed | SessionEvent::Failed(_));

        let view = state.view();
        match view {
            View::Search { loading: true } => {
                let message = if state.phase == SessionPhase::Streaming {
                    "Writing the answer…"
                } else {
                    "Asking RentaGPT…"
                };
                match &self.spinner {
                    Some(spinner) => spinner.set_message(message),
                    None => self.spinner = Some(Progress::spinner(message)),
                }
            }
            View::Search { loading: false } => self.clear_spinner(),
            View::Answer { .. } => {
                if !matches!(self.shown, Some(View::Answer { .. })) {
                    self.clear_spinner();
                    write_stdout(&render::render_heading(&state.query, self.style));
                }
                write_stdout(&self.renderer.advance(state, finished, self.style));
            }
        }
        self.shown = Some(view);
    }

    fn clear_spinner(&mut self) {
        if let Some(spinner) = self.spinner.take() {
            spinner.finish_clear();
        }
    }

    fn close(mut self, state: &SessionState) {
        if !self.live {
            return;
        }
        self.clear_spinner();

        if let View::Answer { done } = state.view() {
            println!();
            if done {
                let sources =
                    render::render_sources(&citation::source_entries(&state.sources), self.style);
                if !sources.is_empty() {
                    println!("\n{sources}");
                }
                println!("\n{}", render::render_disclaimer(self.style));
            }
        }
    }
}

fn write_stdout(text: &str) {
    if text.is_empty() {
        return;
    }
    let mut stdout = std::io::stdout().lock();
    if let Err(error) = write!(stdout, "{text}").and_then(|()| stdout.flush()) {
        tracing::debug!(%error, "failed to write answer text");
    }
}

#[cfg(test)]
mod tests {
    use futures_util::{SinkExt, StreamExt};
    use pretty_assertions::assert_eq;
    use renta_auth::AuthError;
    use tokio::net::TcpListener;
    use tokio_tungstenite::tungstenite::Message;

    use super::*;
    use crate::cli::ColorMode;

    const VALID: &str = "sk-0123456789abcdefghijklmnopqrstuvwxyzABCDEFGHIJKL";

    fn json_flags() -> GlobalFlags {
        GlobalFlags {
            format: OutputFormat::Json,
            quiet: true,
            color: ColorMode::Never,
            endpoint: None,
            host: None,
        }
    }

    fn bot(kind: &str, message: &str) -> String {
        serde_json::json!({"sender": "bot", "type": kind, "message": message}).to_string()
    }

    fn sources(urls: &[&str]) -> String {
        let sources: Vec<_> = urls
            .iter()
            .map(|url| serde_json::json!({ "source": url }))
            .collect();
        bot("info", &serde_json::json!({ "sources": sources }).to_string())
    }

    /// Serve one scripted connection per entry in `sessions`. With `hang_up`
    /// the connection is dropped after the frames instead of drained.
    async fn serve(sessions: Vec<(Vec<String>, bool)>) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let url = format!("ws://{}/chat", listener.local_addr().expect("addr"));

        tokio::spawn(async move {
            for (frames, hang_up) in sessions {
                let (stream, _) = listener.accept().await.expect("accept");
                let mut ws = tokio_tungstenite::accept_async(stream)
                    .await
                    .expect("handshake");
                let _request = ws.next().await;
                for frame in frames {
                    if ws.send(Message::text(frame)).await.is_err() {
                        break;
                    }
                }
                if !hang_up {
                    while let Some(Ok(_)) = ws.next().await {}
                }
            }
        });

        url
    }

    #[test]
    fn short_stored_key_is_rejected_before_asking() {
        let tmp = tempfile::TempDir::new().expect("tmp dir");
        let store = CredentialStore::file_only(tmp.path().join("credentials"), 51);
        std::fs::write(store.file_path(), "sk-too-short").expect("write key");

        let err = load_api_key(&store).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<AuthError>(),
            Some(AuthError::InvalidLength {
                expected: 51,
                actual: 12
            })
        ));
        assert!(format!("{err:#}").contains("renta key set"));
    }

    #[test]
    fn valid_stored_key_is_returned() {
        let tmp = tempfile::TempDir::new().expect("tmp dir");
        let store = CredentialStore::file_only(tmp.path().join("credentials"), 51);
        store.save(VALID).expect("save");

        assert_eq!(load_api_key(&store).expect("key"), VALID);
    }

    #[tokio::test]
    async fn sources_only_appear_once_the_answer_is_done() {
        let url = serve(vec![
            (
                vec![
                    sources(&["https://www.example.com/a"]),
                    bot("stream", "Parcial [1]"),
                ],
                true,
            ),
            (
                vec![
                    bot("start", ""),
                    sources(&["https://www.example.com/a", "https://other.org/b"]),
                    bot("stream", "Income tax applies. [1]"),
                    bot("stream", " See also [2]."),
                    bot("end", ""),
                ],
                false,
            ),
        ])
        .await;
        let controller = SessionController::new(url);
        let flags = json_flags();

        let (dropped, result) =
            run_session(&controller, "¿IRPF?", VALID, &flags, SessionState::new()).await;
        assert!(result.is_err());
        assert_eq!(dropped.phase, SessionPhase::Error);
        assert_eq!(dropped.sources.len(), 1);
        assert_eq!(dropped.view(), View::Answer { done: false });
        assert!(AskResponse::from(&dropped).sources.is_empty());

        let reset = dropped.apply(SessionEvent::Reset);
        assert_eq!(reset, SessionState::new());

        let (done, result) = run_session(&controller, "¿IRPF?", VALID, &flags, reset).await;
        result.expect("second session completes");
        assert_eq!(done.phase, SessionPhase::Complete);
        assert_eq!(done.answer, "Income tax applies. [1] See also [2].");

        let response = AskResponse::from(&done);
        let labels: Vec<&str> = response.sources.iter().map(|s| s.label.as_str()).collect();
        assert_eq!(labels, ["example.com", "other.org"]);
    }
}
