//! Per-tick buffer of outgoing notifications.

use barrage_core::events::{AudioEvent, SceneEvent, UiEvent};

/// Events collected during a tick, drained into the snapshot.
#[derive(Debug, Default)]
pub struct Outbox {
    pub audio: Vec<AudioEvent>,
    pub ui: Vec<UiEvent>,
    pub scene: Vec<SceneEvent>,
}

impl Outbox {
    pub fn audio(&mut self, event: AudioEvent) {
        self.audio.push(event);
    }

    pub fn ui(&mut self, event: UiEvent) {
        self.ui.push(event);
    }

    pub fn scene(&mut self, event: SceneEvent) {
        self.scene.push(event);
    }

    pub fn action_text(&mut self, text: impl Into<String>) {
        self.ui.push(UiEvent::ActionIndicator { text: text.into() });
    }

    /// Take everything collected so far.
    pub fn drain(&mut self) -> (Vec<AudioEvent>, Vec<UiEvent>, Vec<SceneEvent>) {
        (
            std::mem::take(&mut self.audio),
            std::mem::take(&mut self.ui),
            std::mem::take(&mut self.scene),
        )
    }

    pub fn clear(&mut self) {
        self.audio.clear();
        self.ui.clear();
        self.scene.clear();
    }
}
