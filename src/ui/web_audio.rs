use crate::events::{Broadcaster, Subscription};
use crate::media::{MediaController, MediaEvent, MediaNotice, MediaSource};
use dioxus::prelude::*;
use serde::Deserialize;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, info, warn};

/// DOM id of the `<audio>` element rendered by the player bar
pub const AUDIO_ELEMENT_ID: &str = "podcastr-audio";

/// Returned by command scripts that run before the element is mounted
const MISSING_ELEMENT: &str = "audio element missing";

/// Messages posted by the script installed in `run_bridge`, stamped with the
/// generation of the source the element held at the time
#[derive(Debug, Deserialize)]
struct BridgeEnvelope {
    generation: u64,
    message: BridgeMessage,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "event", rename_all = "lowercase")]
enum BridgeMessage {
    LoadedMetadata { duration: Option<f64> },
    TimeUpdate { position: Option<f64> },
    Play,
    Pause,
    Ended,
    Rejected { reason: String },
    Error { message: String },
}

impl BridgeEnvelope {
    fn into_notice(self) -> Option<MediaNotice> {
        let event = match self.message {
            BridgeMessage::LoadedMetadata { duration } => MediaEvent::MetadataLoaded { duration },
            BridgeMessage::TimeUpdate { position } => MediaEvent::TimeUpdate {
                position: position.unwrap_or(0.0),
            },
            BridgeMessage::Play => MediaEvent::Played,
            BridgeMessage::Pause => MediaEvent::Paused,
            BridgeMessage::Ended => MediaEvent::Ended,
            BridgeMessage::Rejected { reason } => rejection(reason)?,
            BridgeMessage::Error { message } => MediaEvent::Error { message },
        };
        Some(MediaNotice {
            generation: self.generation,
            event,
        })
    }
}

/// Map a failed `audio.play()` to an event. A start cut short by a newer
/// load or pause (`AbortError`) is not a refusal and reports nothing.
fn rejection(reason: String) -> Option<MediaEvent> {
    if reason.starts_with("AbortError") {
        debug!("Play interrupted: {}", reason);
        return None;
    }
    Some(MediaEvent::PlayRejected { reason })
}

/// What the element should hold, kept so a late-mounted element can catch up
#[derive(Default)]
struct ElementState {
    source: Option<MediaSource>,
    play_requested: bool,
}

impl ElementState {
    fn generation(&self) -> u64 {
        self.source.as_ref().map_or(0, |source| source.generation)
    }
}

/// Media controller backed by the webview's `<audio>` element
///
/// Commands run as scripts in the webview. Must be used from inside the
/// Dioxus runtime.
#[derive(Clone, Default)]
pub struct WebAudio {
    events: Broadcaster<MediaNotice>,
    state: Arc<Mutex<ElementState>>,
}

fn element() -> String {
    format!(
        r#"const audio = document.getElementById("{}");
if (!audio) {{ return "{}"; }}
"#,
        AUDIO_ELEMENT_ID, MISSING_ELEMENT
    )
}

fn load_source(source: &MediaSource) -> String {
    let url = serde_json::to_string(&source.url).unwrap_or_else(|_| "\"\"".to_string());
    format!(
        "audio.loop = {};\naudio.dataset.generation = \"{}\";\naudio.src = {};\naudio.load();\n",
        source.looping, source.generation, url
    )
}

/// Bring an element that missed earlier commands up to date. If it already
/// has metadata, report it again: it may have arrived before the listeners.
fn catch_up(state: &ElementState) -> String {
    let Some(source) = &state.source else {
        return String::new();
    };
    let start = if state.play_requested {
        "audio.play().catch((err) => forward(\"rejected\", { reason: describe(err) }));\n"
    } else {
        ""
    };
    format!(
        r#"if (!audio.getAttribute("src")) {{
{}{}}} else if (audio.readyState >= 1) {{
  forward("loadedmetadata", {{ duration: finite(audio.duration) }});
  forward("timeupdate", {{ position: finite(audio.currentTime) }});
}}
"#,
        load_source(source),
        start
    )
}

fn bridge_script(state: &ElementState) -> String {
    format!(
        r#"{}
const forward = (event, extra) => dioxus.send({{
  generation: Number(audio.dataset.generation || 0),
  message: Object.assign({{ event }}, extra || {{}}),
}});
const finite = (value) => (Number.isFinite(value) ? value : null);
const describe = (err) => (err && err.name ? err.name + ": " + err.message : String(err));
audio.addEventListener("loadedmetadata", () => forward("loadedmetadata", {{ duration: finite(audio.duration) }}));
audio.addEventListener("timeupdate", () => forward("timeupdate", {{ position: finite(audio.currentTime) }}));
audio.addEventListener("play", () => forward("play"));
audio.addEventListener("pause", () => forward("pause"));
audio.addEventListener("ended", () => forward("ended"));
audio.addEventListener("error", () => forward("error", {{ message: audio.error ? audio.error.message || "code " + audio.error.code : "unknown media error" }}));
{}await new Promise(() => {{}});
"#,
        element(),
        catch_up(state)
    )
}

impl WebAudio {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forward the element's events until the webview goes away.
    /// Start this once the element is mounted.
    pub async fn run_bridge(&self) {
        info!("Attaching audio bridge to #{}", AUDIO_ELEMENT_ID);
        let script = bridge_script(&self.lock());
        let mut eval = document::eval(&script);
        loop {
            match eval.recv::<BridgeEnvelope>().await {
                Ok(envelope) => {
                    if let Some(notice) = envelope.into_notice() {
                        self.events.publish(notice);
                    }
                }
                Err(e) => {
                    warn!("Audio bridge stopped: {:?}", e);
                    break;
                }
            }
        }
    }

    fn lock(&self) -> MutexGuard<'_, ElementState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn run(&self, command: &'static str, body: String) {
        let script = format!("{}{}", element(), body);
        spawn(async move {
            match document::eval(&script).await {
                Ok(serde_json::Value::String(problem)) if problem == MISSING_ELEMENT => {
                    debug!("Audio {} deferred until the element mounts", command)
                }
                Ok(serde_json::Value::String(problem)) => {
                    warn!("Audio {} failed: {}", command, problem)
                }
                Ok(_) => debug!("Audio {} done", command),
                Err(e) => warn!("Audio {} failed: {:?}", command, e),
            }
        });
    }
}

impl MediaController for WebAudio {
    fn load(&self, source: &MediaSource) {
        {
            let mut state = self.lock();
            state.source = Some(source.clone());
            state.play_requested = false;
        }
        self.run("load", format!("{}return null;", load_source(source)));
    }

    fn unload(&self) {
        {
            let mut state = self.lock();
            state.source = None;
            state.play_requested = false;
        }
        self.run(
            "unload",
            "audio.pause();\naudio.removeAttribute(\"src\");\naudio.load();\nreturn null;"
                .to_string(),
        );
    }

    fn play(&self) {
        let generation = {
            let mut state = self.lock();
            state.play_requested = true;
            state.generation()
        };
        let events = self.events.clone();
        let script = format!(
            r#"{}
try {{
  await audio.play();
  return null;
}} catch (err) {{
  return err && err.name ? err.name + ": " + err.message : String(err);
}}
"#,
            element()
        );
        spawn(async move {
            let reason = match document::eval(&script).await {
                Ok(serde_json::Value::String(reason)) if reason == MISSING_ELEMENT => {
                    debug!("Play deferred until the element mounts");
                    return;
                }
                Ok(serde_json::Value::String(reason)) => reason,
                Ok(_) => return,
                Err(e) => format!("{:?}", e),
            };
            if let Some(event) = rejection(reason) {
                events.publish(MediaNotice { generation, event });
            }
        });
    }

    fn pause(&self) {
        self.lock().play_requested = false;
        self.run("pause", "audio.pause();\nreturn null;".to_string());
    }

    fn seek(&self, position: u64) {
        self.run(
            "seek",
            format!("audio.currentTime = {};\nreturn null;", position),
        );
    }

    fn set_looping(&self, looping: bool) {
        if let Some(source) = self.lock().source.as_mut() {
            source.looping = looping;
        }
        self.run(
            "set_looping",
            format!("audio.loop = {};\nreturn null;", looping),
        );
    }

    fn subscribe(&self) -> Subscription<MediaNotice> {
        self.events.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> Option<MediaNotice> {
        serde_json::from_str::<BridgeEnvelope>(json)
            .unwrap()
            .into_notice()
    }

    fn event(json: &str) -> MediaEvent {
        parse(json).unwrap().event
    }

    #[test]
    fn test_bridge_messages() {
        assert_eq!(
            parse(r#"{"generation":3,"message":{"event":"loadedmetadata","duration":1800.5}}"#),
            Some(MediaNotice {
                generation: 3,
                event: MediaEvent::MetadataLoaded {
                    duration: Some(1800.5)
                },
            })
        );
        assert_eq!(
            event(r#"{"generation":1,"message":{"event":"loadedmetadata","duration":null}}"#),
            MediaEvent::MetadataLoaded { duration: None }
        );
        assert_eq!(
            event(r#"{"generation":1,"message":{"event":"timeupdate","position":12.25}}"#),
            MediaEvent::TimeUpdate { position: 12.25 }
        );
        assert_eq!(
            event(r#"{"generation":1,"message":{"event":"ended"}}"#),
            MediaEvent::Ended
        );
        assert_eq!(
            event(r#"{"generation":1,"message":{"event":"error","message":"decode failed"}}"#),
            MediaEvent::Error {
                message: "decode failed".to_string()
            }
        );
    }

    #[test]
    fn test_interrupted_play_is_not_a_rejection() {
        assert_eq!(
            rejection(
                "AbortError: The play() request was interrupted by a new load request."
                    .to_string()
            ),
            None
        );
        assert_eq!(
            parse(r#"{"generation":2,"message":{"event":"rejected","reason":"AbortError: interrupted by a call to pause()"}}"#),
            None
        );

        assert_eq!(
            rejection("NotAllowedError: play() failed".to_string()),
            Some(MediaEvent::PlayRejected {
                reason: "NotAllowedError: play() failed".to_string()
            })
        );
    }

    #[test]
    fn test_late_bridge_restores_the_current_source() {
        let mut state = ElementState::default();
        assert_eq!(catch_up(&state), "");

        state.source = Some(MediaSource {
            url: "https://example.com/\"quoted\".mp3".to_string(),
            looping: true,
            expected_duration: 60,
            generation: 4,
        });
        let script = catch_up(&state);
        assert!(script.contains(r#"audio.src = "https://example.com/\"quoted\".mp3";"#));
        assert!(script.contains("audio.dataset.generation = \"4\";"));
        assert!(script.contains("audio.loop = true;"));
        assert!(script.contains("audio.readyState >= 1"));
        assert!(!script.contains("audio.play()"));

        state.play_requested = true;
        assert!(catch_up(&state).contains("audio.play()"));
    }
}
