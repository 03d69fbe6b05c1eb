/// Event consumed by the outline renderer at the start of a frame.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Interaction {
    /// Drag delta in physical pixels.
    Pan { dx: f32, dy: f32 },

    /// Tap location in physical pixels, origin top-left, +Y down.
    Tap { x: f32, y: f32 },

    /// New drawable size in physical pixels.
    Resize { width: u32, height: u32 },
}

/// Platform-agnostic pointer event fed to the gesture recognizer.
///
/// Positions are physical pixels, origin top-left.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum PointerEvent {
    Pressed { x: f32, y: f32 },
    Moved { x: f32, y: f32 },
    Released { x: f32, y: f32 },

    /// Scroll delta already converted to pixels.
    Wheel { dx: f32, dy: f32 },

    /// Cursor left the window or focus was lost; any press in progress is abandoned.
    Cancelled,
}

/// Gesture produced from pointer events.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Gesture {
    Pan { dx: f32, dy: f32 },
    Tap { x: f32, y: f32 },
}

impl From<Gesture> for Interaction {
    fn from(g: Gesture) -> Self {
        match g {
            Gesture::Pan { dx, dy } => Interaction::Pan { dx, dy },
            Gesture::Tap { x, y } => Interaction::Tap { x, y },
        }
    }
}
