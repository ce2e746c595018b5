#[derive(Clone, Debug)]
pub struct PointerEvent {
    pub kind: PointerEventKind,
    pub x: f64,
    pub y: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerEventKind {
    Enter,
    Leave,
    Motion,
    Press(PointerButton),
    Release(PointerButton),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerButton {
    Left,
    Right,
    Middle,
    Other(u32),
}

impl PointerButton {
    /// Map a Linux evdev button code to a pointer button.
    pub fn from_code(code: u32) -> Self {
        match code {
            272 => PointerButton::Left,   // BTN_LEFT
            273 => PointerButton::Right,  // BTN_RIGHT
            274 => PointerButton::Middle, // BTN_MIDDLE
            other => PointerButton::Other(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pointer_button_from_code() {
        assert_eq!(PointerButton::from_code(272), PointerButton::Left);
        assert_eq!(PointerButton::from_code(273), PointerButton::Right);
        assert_eq!(PointerButton::from_code(274), PointerButton::Middle);
        assert_eq!(PointerButton::from_code(280), PointerButton::Other(280));
    }

    #[test]
    fn test_pointer_button_equality() {
        assert_eq!(PointerButton::Left, PointerButton::Left);
        assert_eq!(PointerButton::Other(5), PointerButton::Other(5));
        assert_ne!(PointerButton::Left, PointerButton::Right);
    }

    #[test]
    fn test_press_is_not_release() {
        assert_ne!(
            PointerEventKind::Press(PointerButton::Left),
            PointerEventKind::Release(PointerButton::Left)
        );
    }
}
