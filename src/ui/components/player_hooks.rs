use crate::session::{PlayerActions, SessionHandle, SessionSnapshot};
use crate::AppContext;
use dioxus::prelude::*;

/// Hook to access the player session
pub fn use_session() -> SessionHandle {
    let context = use_context::<AppContext>();
    context.session.clone()
}

/// Latest session snapshot shared across the app
/// This allows components to synchronously read the session on first render
#[derive(Clone)]
pub struct SharedSessionState {
    pub state: Signal<SessionSnapshot>,
}

/// Provider component to make the session snapshot available throughout the app
#[component]
pub fn SessionStateProvider(children: Element) -> Element {
    let session = use_session();
    let state_signal = use_signal(|| session.snapshot());
    let shared_state = SharedSessionState {
        state: state_signal,
    };

    use_context_provider(|| shared_state.clone());

    // Keep the snapshot current for as long as the provider is mounted
    use_hook(move || {
        let mut changes = session.subscribe();
        let mut state_signal = shared_state.state;
        spawn(async move {
            while let Some(snapshot) = changes.recv().await {
                state_signal.set(snapshot);
            }
        });
    });

    rsx! {
        {children}
    }
}

/// Hook to read the current session snapshot
pub fn use_session_state() -> Signal<SessionSnapshot> {
    let state = use_context::<SharedSessionState>();
    state.state
}
