#![allow(dead_code)]

use podcastr::episode::Episode;
use podcastr::player::{PlayerEvents, PlayerView};

/// Initialize tracing for tests with proper test output handling
pub fn tracing_init() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

pub fn episode(n: u64, duration: u64) -> Episode {
    Episode {
        title: format!("Episode {}", n),
        members: "Diego Fernandes".to_string(),
        thumbnail: format!("https://example.com/{}.jpg", n),
        duration,
        url: format!("https://example.com/{}.m4a", n),
    }
}

/// Feed queued notifications to the view until nothing new arrives
pub fn settle(view: &mut PlayerView, events: &mut PlayerEvents) {
    for _ in 0..100 {
        let batch = events.drain();
        if batch.is_empty() {
            return;
        }
        for event in batch {
            view.handle(event);
        }
    }
    panic!("player did not settle");
}
