use std::collections::HashSet;

/// Keyboard keys the engine understands, independent of the windowing layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    A, B, C, D, E, F, G, H, I, J, K, L, M,
    N, O, P, Q, R, S, T, U, V, W, X, Y, Z,
    Digit0, Digit1, Digit2, Digit3, Digit4,
    Digit5, Digit6, Digit7, Digit8, Digit9,
    F1, F2, F3, F4, F5, F6, F7, F8, F9, F10, F11, F12,
    Enter,
    Escape,
    Space,
    Tab,
    Backspace,
    ShiftLeft,
    ShiftRight,
    ControlLeft,
    ControlRight,
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
}

/// Input event types the engine understands.
/// Carries no game-specific meaning.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// A key went down. `repeat` is set for auto-repeat events while held.
    KeyDown { key: Key, repeat: bool },
    /// A key was released.
    KeyUp { key: Key },
    /// Relative pointer motion. Positive `dy` means the pointer moved up.
    MouseMotion { dx: f32, dy: f32 },
    /// Scroll wheel motion in lines. Positive `dy` scrolls up/away.
    Scroll { dy: f32 },
}

impl InputEvent {
    /// True for the initial press of `key` (auto-repeats excluded).
    pub fn is_press(&self, key: Key) -> bool {
        matches!(self, InputEvent::KeyDown { key: k, repeat: false } if *k == key)
    }
}

/// A queue of input events plus the set of keys currently held.
/// The windowing layer pushes events; the game reads them once per frame.
pub struct InputQueue {
    events: Vec<InputEvent>,
    held: HashSet<Key>,
}

impl InputQueue {
    pub fn new() -> Self {
        Self {
            events: Vec::with_capacity(32),
            held: HashSet::new(),
        }
    }

    /// Push a new input event, updating the held-key set.
    pub fn push(&mut self, event: InputEvent) {
        match event {
            InputEvent::KeyDown { key, .. } => {
                self.held.insert(key);
            }
            InputEvent::KeyUp { key } => {
                self.held.remove(&key);
            }
            _ => {}
        }
        self.events.push(event);
    }

    /// Drain all pending events. Held keys are unaffected.
    pub fn drain(&mut self) -> Vec<InputEvent> {
        std::mem::take(&mut self.events)
    }

    /// Iterate over pending events without consuming them.
    pub fn iter(&self) -> impl Iterator<Item = &InputEvent> {
        self.events.iter()
    }

    /// Whether `key` is currently held down.
    pub fn is_held(&self, key: Key) -> bool {
        self.held.contains(&key)
    }

    /// Forget all held keys (e.g. on focus loss, when releases go unseen).
    pub fn release_all(&mut self) {
        self.held.clear();
    }

    /// Check if there are pending events.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Number of pending events.
    pub fn len(&self) -> usize {
        self.events.len()
    }
}

impl Default for InputQueue {
    fn default() -> Self {
        Self::new()
    }
}
