use crate::config;
use crate::episode::Episode;
use crate::session::SessionHandle;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppContext {
    pub session: SessionHandle,
    pub config: config::Config,
    /// Episodes offered in the list; selecting one hands the list to the session
    pub episodes: Arc<Vec<Episode>>,
}
