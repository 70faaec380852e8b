use super::types::InputEvent;

/// Per-frame input event buffer.
///
/// The runtime fills this between redraws; the application drains it once
/// per frame (typically straight into a [`ViewRouter`](super::ViewRouter))
/// and the runtime clears it after the frame callback returns.
#[derive(Debug, Default)]
pub struct InputFrame {
    /// Raw events in arrival order.
    pub events: Vec<InputEvent>,
}

impl InputFrame {
    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn push_event(&mut self, ev: InputEvent) {
        self.events.push(ev);
    }
}
