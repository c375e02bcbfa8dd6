//! Language preference: a single persisted scalar plus an observer hook so
//! side effects (persistence, rendering direction) stay out of the chat
//! logic itself.

use std::fs;
use std::path::PathBuf;

use tracing::warn;

/// Reacts to the user switching languages mid-session.
pub trait LanguageObserver {
    fn language_changed(&mut self, language: &str);
}

/// Fan-out point for language-change events.
#[derive(Default)]
pub struct LanguageEvents {
    observers: Vec<Box<dyn LanguageObserver>>,
}

impl LanguageEvents {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, observer: Box<dyn LanguageObserver>) {
        self.observers.push(observer);
    }

    pub fn emit(&mut self, language: &str) {
        for observer in &mut self.observers {
            observer.language_changed(language);
        }
    }
}

/// Persists the preference as a one-line file. A failed write is logged and
/// otherwise ignored; the preference is a convenience, not state the app
/// depends on.
#[derive(Debug, Clone)]
pub struct LanguageStore {
    path: PathBuf,
}

impl LanguageStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn load(&self) -> Option<String> {
        fs::read_to_string(&self.path)
            .ok()
            .map(|raw| raw.trim().to_string())
            .filter(|language| !language.is_empty())
    }
}

impl LanguageObserver for LanguageStore {
    fn language_changed(&mut self, language: &str) {
        if let Err(err) = fs::write(&self.path, language) {
            warn!(error = %err, path = %self.path.display(), "failed to persist language preference");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_round_trips_preference() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lang");
        let mut store = LanguageStore::new(&path);
        assert!(store.load().is_none());
        store.language_changed("ar");
        assert_eq!(store.load().as_deref(), Some("ar"));
        store.language_changed("en");
        assert_eq!(store.load().as_deref(), Some("en"));
    }

    #[test]
    fn test_events_notify_every_observer() {
        struct Recorder(std::sync::mpsc::Sender<String>);
        impl LanguageObserver for Recorder {
            fn language_changed(&mut self, language: &str) {
                let _ = self.0.send(language.to_string());
            }
        }

        let (tx, rx) = std::sync::mpsc::channel();
        let mut events = LanguageEvents::new();
        events.subscribe(Box::new(Recorder(tx.clone())));
        events.subscribe(Box::new(Recorder(tx)));
        events.emit("fr");
        assert_eq!(rx.try_iter().count(), 2);
    }
}
