use std::collections::BTreeSet;

use foundation::math::Vec2;

/// Input delivered by the render surface, in canvas pixels.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    Wheel { delta_y: f64, position: Vec2 },
    MouseMove { position: Vec2 },
    LeftDown { position: Vec2 },
    LeftUp { position: Vec2 },
    LeftClick { position: Vec2 },
    LeftDoubleClick { position: Vec2 },
    ContextMenu { position: Vec2 },
    KeyDown { key: String },
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum InputKind {
    Wheel,
    MouseMove,
    LeftDown,
    LeftUp,
    LeftClick,
    LeftDoubleClick,
    ContextMenu,
    KeyDown,
}

impl InputEvent {
    pub fn kind(&self) -> InputKind {
        match self {
            InputEvent::Wheel { .. } => InputKind::Wheel,
            InputEvent::MouseMove { .. } => InputKind::MouseMove,
            InputEvent::LeftDown { .. } => InputKind::LeftDown,
            InputEvent::LeftUp { .. } => InputKind::LeftUp,
            InputEvent::LeftClick { .. } => InputKind::LeftClick,
            InputEvent::LeftDoubleClick { .. } => InputKind::LeftDoubleClick,
            InputEvent::ContextMenu { .. } => InputKind::ContextMenu,
            InputEvent::KeyDown { .. } => InputKind::KeyDown,
        }
    }

    pub fn position(&self) -> Option<Vec2> {
        match self {
            InputEvent::Wheel { position, .. }
            | InputEvent::MouseMove { position }
            | InputEvent::LeftDown { position }
            | InputEvent::LeftUp { position }
            | InputEvent::LeftClick { position }
            | InputEvent::LeftDoubleClick { position }
            | InputEvent::ContextMenu { position } => Some(*position),
            InputEvent::KeyDown { .. } => None,
        }
    }
}

/// What the surface should do with the browser/OS default behavior after dispatch.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct EventDisposition {
    pub handled: bool,
    pub default_prevented: bool,
}

impl EventDisposition {
    pub fn ignored() -> Self {
        Self::default()
    }

    pub fn handled() -> Self {
        Self {
            handled: true,
            default_prevented: false,
        }
    }

    pub fn prevented() -> Self {
        Self {
            handled: true,
            default_prevented: true,
        }
    }
}

/// Screen-space event handler bound to one render surface.
///
/// Tracks which input kinds have an action bound. Once destroyed it accepts nothing.
#[derive(Debug, Default, Clone)]
pub struct EventHandler {
    bound: BTreeSet<InputKind>,
    destroyed: bool,
}

impl EventHandler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_input_action(&mut self, kind: InputKind) {
        if !self.destroyed {
            self.bound.insert(kind);
        }
    }

    pub fn remove_input_action(&mut self, kind: InputKind) {
        self.bound.remove(&kind);
    }

    pub fn has_input_action(&self, kind: InputKind) -> bool {
        self.bound.contains(&kind)
    }

    pub fn accepts(&self, event: &InputEvent) -> bool {
        !self.destroyed && self.bound.contains(&event.kind())
    }

    pub fn destroy(&mut self) {
        self.bound.clear();
        self.destroyed = true;
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }
}

#[cfg(test)]
mod tests {
    use super::{EventHandler, InputEvent, InputKind};
    use foundation::math::Vec2;

    #[test]
    fn accepts_only_bound_kinds() {
        let mut handler = EventHandler::new();
        handler.set_input_action(InputKind::LeftClick);

        let click = InputEvent::LeftClick {
            position: Vec2::new(1.0, 2.0),
        };
        let dbl = InputEvent::LeftDoubleClick {
            position: Vec2::new(1.0, 2.0),
        };
        assert!(handler.accepts(&click));
        assert!(!handler.accepts(&dbl));

        handler.remove_input_action(InputKind::LeftClick);
        assert!(!handler.accepts(&click));
    }

    #[test]
    fn destroyed_handler_rejects_everything() {
        let mut handler = EventHandler::new();
        handler.set_input_action(InputKind::KeyDown);
        handler.destroy();

        let key = InputEvent::KeyDown {
            key: "r".to_string(),
        };
        assert!(handler.is_destroyed());
        assert!(!handler.accepts(&key));

        handler.set_input_action(InputKind::KeyDown);
        assert!(!handler.has_input_action(InputKind::KeyDown));
    }

    #[test]
    fn key_events_have_no_position() {
        let key = InputEvent::KeyDown {
            key: "R".to_string(),
        };
        assert_eq!(key.kind(), InputKind::KeyDown);
        assert!(key.position().is_none());
    }
}
