//! Input and window events routed through the layer stack.
//!
//! Every event is a [`GameEvent`]: a tagged payload plus a `handled` flag.
//! Layers inspect events with an [`EventDispatcher`], which only calls a
//! typed handler when the runtime kind matches the handler's type.

use std::fmt;
use std::ops::BitOr;

use bevy::input::keyboard::KeyCode;
use bevy::input::mouse::MouseButton;
use bevy::math::Vec2;

/// Runtime kind of an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    KeyPressed,
    KeyReleased,
    MouseButtonPressed,
    MouseButtonReleased,
    MouseMoved,
    MouseScrolled,
    WindowClose,
}

/// Bitmask of coarse event categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct EventCategory(u8);

impl EventCategory {
    pub const NONE: Self = Self(0);
    pub const WINDOW: Self = Self(1 << 0);
    pub const INPUT: Self = Self(1 << 1);
    pub const KEYBOARD: Self = Self(1 << 2);
    pub const MOUSE: Self = Self(1 << 3);

    /// Whether any bit of `other` is set in `self`.
    pub fn intersects(self, other: Self) -> bool {
        self.0 & other.0 != 0
    }

    pub fn bits(self) -> u8 {
        self.0
    }
}

impl BitOr for EventCategory {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

/// A keyboard key went down.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KeyPressed {
    pub key: KeyCode,
    /// True for OS key-repeat presses.
    pub repeat: bool,
}

/// A keyboard key went up.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KeyReleased {
    pub key: KeyCode,
}

/// A mouse button went down at `position` (window pixels, origin top-left).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MouseButtonPressed {
    pub button: MouseButton,
    pub position: Vec2,
}

/// A mouse button went up at `position`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MouseButtonReleased {
    pub button: MouseButton,
    pub position: Vec2,
}

/// The pointer moved. `delta` is raw motion, also reported while the cursor is locked.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MouseMoved {
    pub position: Vec2,
    pub delta: Vec2,
}

/// Scroll wheel offset, in lines.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MouseScrolled {
    pub offset: Vec2,
}

/// The user asked to close the window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowClose;

/// Payload of a [`GameEvent`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EventData {
    KeyPressed(KeyPressed),
    KeyReleased(KeyReleased),
    MouseButtonPressed(MouseButtonPressed),
    MouseButtonReleased(MouseButtonReleased),
    MouseMoved(MouseMoved),
    MouseScrolled(MouseScrolled),
    WindowClose(WindowClose),
}

/// Implemented by each concrete event payload so it can be dispatched by type.
pub trait EventType: Sized {
    const KIND: EventKind;
    const NAME: &'static str;

    fn category() -> EventCategory;

    /// Borrow the payload if `data` holds this type.
    fn from_data_mut(data: &mut EventData) -> Option<&mut Self>;
}

macro_rules! event_type {
    ($ty:ident, $category:expr) => {
        impl EventType for $ty {
            const KIND: EventKind = EventKind::$ty;
            const NAME: &'static str = stringify!($ty);

            fn category() -> EventCategory {
                $category
            }

            fn from_data_mut(data: &mut EventData) -> Option<&mut Self> {
                match data {
                    EventData::$ty(inner) => Some(inner),
                    _ => None,
                }
            }
        }

        impl From<$ty> for EventData {
            fn from(value: $ty) -> Self {
                EventData::$ty(value)
            }
        }
    };
}

event_type!(KeyPressed, EventCategory::INPUT | EventCategory::KEYBOARD);
event_type!(KeyReleased, EventCategory::INPUT | EventCategory::KEYBOARD);
event_type!(MouseButtonPressed, EventCategory::INPUT | EventCategory::MOUSE);
event_type!(MouseButtonReleased, EventCategory::INPUT | EventCategory::MOUSE);
event_type!(MouseMoved, EventCategory::INPUT | EventCategory::MOUSE);
event_type!(MouseScrolled, EventCategory::INPUT | EventCategory::MOUSE);
event_type!(WindowClose, EventCategory::WINDOW);

impl EventData {
    pub fn kind(&self) -> EventKind {
        match self {
            EventData::KeyPressed(_) => EventKind::KeyPressed,
            EventData::KeyReleased(_) => EventKind::KeyReleased,
            EventData::MouseButtonPressed(_) => EventKind::MouseButtonPressed,
            EventData::MouseButtonReleased(_) => EventKind::MouseButtonReleased,
            EventData::MouseMoved(_) => EventKind::MouseMoved,
            EventData::MouseScrolled(_) => EventKind::MouseScrolled,
            EventData::WindowClose(_) => EventKind::WindowClose,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            EventData::KeyPressed(_) => KeyPressed::NAME,
            EventData::KeyReleased(_) => KeyReleased::NAME,
            EventData::MouseButtonPressed(_) => MouseButtonPressed::NAME,
            EventData::MouseButtonReleased(_) => MouseButtonReleased::NAME,
            EventData::MouseMoved(_) => MouseMoved::NAME,
            EventData::MouseScrolled(_) => MouseScrolled::NAME,
            EventData::WindowClose(_) => WindowClose::NAME,
        }
    }

    pub fn category(&self) -> EventCategory {
        match self {
            EventData::KeyPressed(_) => KeyPressed::category(),
            EventData::KeyReleased(_) => KeyReleased::category(),
            EventData::MouseButtonPressed(_) => MouseButtonPressed::category(),
            EventData::MouseButtonReleased(_) => MouseButtonReleased::category(),
            EventData::MouseMoved(_) => MouseMoved::category(),
            EventData::MouseScrolled(_) => MouseScrolled::category(),
            EventData::WindowClose(_) => WindowClose::category(),
        }
    }
}

/// An event travelling down the layer stack.
#[derive(Debug, Clone, PartialEq)]
pub struct GameEvent {
    data: EventData,
    handled: bool,
}

impl GameEvent {
    pub fn new(data: impl Into<EventData>) -> Self {
        Self {
            data: data.into(),
            handled: false,
        }
    }

    pub fn kind(&self) -> EventKind {
        self.data.kind()
    }

    pub fn name(&self) -> &'static str {
        self.data.name()
    }

    pub fn data(&self) -> &EventData {
        &self.data
    }

    pub fn category_flags(&self) -> EventCategory {
        self.data.category()
    }

    pub fn in_category(&self, category: EventCategory) -> bool {
        self.category_flags().intersects(category)
    }

    pub fn is_handled(&self) -> bool {
        self.handled
    }

    /// Claim the event so lower layers never see it.
    pub fn mark_handled(&mut self) {
        self.handled = true;
    }
}

impl fmt::Display for GameEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Routes one event to typed handlers.
///
/// ```ignore
/// let mut dispatcher = EventDispatcher::new(event);
/// dispatcher.dispatch::<KeyPressed>(|key| key.key == KeyCode::Escape);
/// ```
pub struct EventDispatcher<'a> {
    event: &'a mut GameEvent,
}

impl<'a> EventDispatcher<'a> {
    pub fn new(event: &'a mut GameEvent) -> Self {
        Self { event }
    }

    /// Run `handler` if the event is a `T`, storing its result in the handled flag.
    ///
    /// Returns whether the kinds matched.
    pub fn dispatch<T: EventType>(&mut self, handler: impl FnOnce(&mut T) -> bool) -> bool {
        if self.event.kind() != T::KIND {
            return false;
        }
        match T::from_data_mut(&mut self.event.data) {
            Some(payload) => {
                self.event.handled = handler(payload);
                true
            }
            None => false,
        }
    }

    pub fn event(&self) -> &GameEvent {
        self.event
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(key: KeyCode) -> GameEvent {
        GameEvent::new(KeyPressed { key, repeat: false })
    }

    #[test]
    fn test_dispatch_only_matches_kind() {
        let mut event = key(KeyCode::KeyW);
        let mut dispatcher = EventDispatcher::new(&mut event);

        let mut scroll_called = false;
        let matched = dispatcher.dispatch::<MouseScrolled>(|_| {
            scroll_called = true;
            true
        });
        assert!(!matched);
        assert!(!scroll_called);

        let matched = dispatcher.dispatch::<KeyPressed>(|pressed| pressed.key == KeyCode::KeyW);
        assert!(matched);
        assert!(event.is_handled());
    }

    #[test]
    fn test_handler_result_overwrites_flag() {
        let mut event = key(KeyCode::Space);
        event.mark_handled();

        let mut dispatcher = EventDispatcher::new(&mut event);
        dispatcher.dispatch::<KeyPressed>(|_| false);
        assert!(!event.is_handled());
    }

    #[test]
    fn test_categories() {
        let event = key(KeyCode::KeyA);
        assert!(event.in_category(EventCategory::KEYBOARD));
        assert!(event.in_category(EventCategory::INPUT));
        assert!(!event.in_category(EventCategory::MOUSE));

        let close = GameEvent::new(WindowClose);
        assert_eq!(close.category_flags(), EventCategory::WINDOW);
        assert_eq!(close.kind(), EventKind::WindowClose);
        assert_eq!(close.to_string(), "WindowClose");

        let scroll = GameEvent::new(MouseScrolled { offset: Vec2::Y });
        assert_eq!(
            scroll.category_flags().bits(),
            (EventCategory::INPUT | EventCategory::MOUSE).bits()
        );
    }
}
