//! Translate winit input into engine [`InputEvent`]s.

use orrery_engine::{InputEvent, Key};
use winit::event::{ElementState, MouseScrollDelta};
use winit::keyboard::KeyCode;

/// Pixels of touchpad scroll that count as one wheel line.
const PIXELS_PER_LINE: f64 = 20.0;

pub fn map_key(code: KeyCode) -> Option<Key> {
    let key = match code {
        KeyCode::KeyA => Key::A,
        KeyCode::KeyB => Key::B,
        KeyCode::KeyC => Key::C,
        KeyCode::KeyD => Key::D,
        KeyCode::KeyE => Key::E,
        KeyCode::KeyF => Key::F,
        KeyCode::KeyG => Key::G,
        KeyCode::KeyH => Key::H,
        KeyCode::KeyI => Key::I,
        KeyCode::KeyJ => Key::J,
        KeyCode::KeyK => Key::K,
        KeyCode::KeyL => Key::L,
        KeyCode::KeyM => Key::M,
        KeyCode::KeyN => Key::N,
        KeyCode::KeyO => Key::O,
        KeyCode::KeyP => Key::P,
        KeyCode::KeyQ => Key::Q,
        KeyCode::KeyR => Key::R,
        KeyCode::KeyS => Key::S,
        KeyCode::KeyT => Key::T,
        KeyCode::KeyU => Key::U,
        KeyCode::KeyV => Key::V,
        KeyCode::KeyW => Key::W,
        KeyCode::KeyX => Key::X,
        KeyCode::KeyY => Key::Y,
        KeyCode::KeyZ => Key::Z,
        KeyCode::Digit0 => Key::Digit0,
        KeyCode::Digit1 => Key::Digit1,
        KeyCode::Digit2 => Key::Digit2,
        KeyCode::Digit3 => Key::Digit3,
        KeyCode::Digit4 => Key::Digit4,
        KeyCode::Digit5 => Key::Digit5,
        KeyCode::Digit6 => Key::Digit6,
        KeyCode::Digit7 => Key::Digit7,
        KeyCode::Digit8 => Key::Digit8,
        KeyCode::Digit9 => Key::Digit9,
        KeyCode::F1 => Key::F1,
        KeyCode::F2 => Key::F2,
        KeyCode::F3 => Key::F3,
        KeyCode::F4 => Key::F4,
        KeyCode::F5 => Key::F5,
        KeyCode::F6 => Key::F6,
        KeyCode::F7 => Key::F7,
        KeyCode::F8 => Key::F8,
        KeyCode::F9 => Key::F9,
        KeyCode::F10 => Key::F10,
        KeyCode::F11 => Key::F11,
        KeyCode::F12 => Key::F12,
        KeyCode::Enter | KeyCode::NumpadEnter => Key::Enter,
        KeyCode::Escape => Key::Escape,
        KeyCode::Space => Key::Space,
        KeyCode::Tab => Key::Tab,
        KeyCode::Backspace => Key::Backspace,
        KeyCode::ShiftLeft => Key::ShiftLeft,
        KeyCode::ShiftRight => Key::ShiftRight,
        KeyCode::ControlLeft => Key::ControlLeft,
        KeyCode::ControlRight => Key::ControlRight,
        KeyCode::ArrowUp => Key::ArrowUp,
        KeyCode::ArrowDown => Key::ArrowDown,
        KeyCode::ArrowLeft => Key::ArrowLeft,
        KeyCode::ArrowRight => Key::ArrowRight,
        _ => return None,
    };
    Some(key)
}

/// Key press or release. Unmapped keys produce nothing.
pub fn key_event(code: KeyCode, state: ElementState, repeat: bool) -> Option<InputEvent> {
    let key = map_key(code)?;
    Some(match state {
        ElementState::Pressed => InputEvent::KeyDown { key, repeat },
        ElementState::Released => InputEvent::KeyUp { key },
    })
}

/// Raw device motion. Screen y grows downward; the engine wants "up" positive.
pub fn mouse_motion(dx: f64, dy: f64) -> InputEvent {
    InputEvent::MouseMotion {
        dx: dx as f32,
        dy: -dy as f32,
    }
}

/// Wheel motion in lines, positive away from the user.
pub fn scroll(delta: MouseScrollDelta) -> InputEvent {
    let dy = match delta {
        MouseScrollDelta::LineDelta(_, y) => y,
        MouseScrollDelta::PixelDelta(pos) => (pos.y / PIXELS_PER_LINE) as f32,
    };
    InputEvent::Scroll { dy }
}

#[cfg(test)]
mod tests {
    use super::*;
    use winit::dpi::PhysicalPosition;

    #[test]
    fn demo_keys_are_mapped() {
        for (code, key) in [
            (KeyCode::KeyW, Key::W),
            (KeyCode::KeyQ, Key::Q),
            (KeyCode::Digit3, Key::Digit3),
            (KeyCode::F4, Key::F4),
            (KeyCode::Enter, Key::Enter),
            (KeyCode::NumpadEnter, Key::Enter),
            (KeyCode::ShiftLeft, Key::ShiftLeft),
            (KeyCode::Escape, Key::Escape),
        ] {
            assert_eq!(map_key(code), Some(key), "{code:?}");
        }
    }

    #[test]
    fn unknown_keys_are_dropped() {
        assert_eq!(map_key(KeyCode::CapsLock), None);
        assert_eq!(key_event(KeyCode::CapsLock, ElementState::Pressed, false), None);
    }

    #[test]
    fn press_and_release() {
        assert_eq!(
            key_event(KeyCode::KeyF, ElementState::Pressed, true),
            Some(InputEvent::KeyDown { key: Key::F, repeat: true })
        );
        assert_eq!(
            key_event(KeyCode::KeyF, ElementState::Released, false),
            Some(InputEvent::KeyUp { key: Key::F })
        );
    }

    #[test]
    fn mouse_y_is_flipped() {
        assert_eq!(mouse_motion(3.0, 4.0), InputEvent::MouseMotion { dx: 3.0, dy: -4.0 });
    }

    #[test]
    fn scroll_units() {
        assert_eq!(scroll(MouseScrollDelta::LineDelta(0.0, 1.0)), InputEvent::Scroll { dy: 1.0 });
        let px = scroll(MouseScrollDelta::PixelDelta(PhysicalPosition::new(0.0, 40.0)));
        assert_eq!(px, InputEvent::Scroll { dy: 2.0 });
    }
}
