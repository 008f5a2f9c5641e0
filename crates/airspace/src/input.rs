use scene::picking::ScreenPos;

/// Pointer input delivered to the active tool.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum InputEvent {
    PrimaryClick(ScreenPos),
    SecondaryClick(ScreenPos),
    PointerMove(ScreenPos),
    /// Scroll delta; only its sign matters.
    Wheel(f64),
}
