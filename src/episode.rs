use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use tracing::info;

/// Errors that can occur while loading an episode list
#[derive(Error, Debug)]
pub enum EpisodeError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid episode list: {0}")]
    Json(#[from] serde_json::Error),
}

/// A single playable podcast item
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Episode {
    pub title: String,
    /// Hosts and guests, as displayed under the title
    pub members: String,
    /// Cover image URL
    pub thumbnail: String,
    /// Length in whole seconds
    pub duration: u64,
    /// Playable media URL
    pub url: String,
}

/// Read an episode list from a JSON array on disk
pub fn load_episodes(path: &Path) -> Result<Vec<Episode>, EpisodeError> {
    let contents = std::fs::read_to_string(path)?;
    let episodes: Vec<Episode> = serde_json::from_str(&contents)?;
    info!("Loaded {} episodes from {}", episodes.len(), path.display());
    Ok(episodes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_episodes() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("episodes.json");
        std::fs::write(
            &path,
            r#"[{
                "title": "Faladev #30",
                "members": "Diego e Richard",
                "thumbnail": "https://example.com/30.jpg",
                "duration": 3981,
                "url": "https://example.com/30.m4a"
            }]"#,
        )
        .unwrap();

        let episodes = load_episodes(&path).unwrap();
        assert_eq!(episodes.len(), 1);
        assert_eq!(episodes[0].duration, 3981);
        assert_eq!(episodes[0].members, "Diego e Richard");
    }

    #[test]
    fn test_load_episodes_errors() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("missing.json");
        assert!(matches!(load_episodes(&missing), Err(EpisodeError::Io(_))));

        let broken = dir.path().join("broken.json");
        std::fs::write(&broken, "[{\"title\": 1}]").unwrap();
        assert!(matches!(load_episodes(&broken), Err(EpisodeError::Json(_))));
    }
}
