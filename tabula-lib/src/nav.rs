//! Keyboard focus over the visible rows
//!
//! The navigator only tracks which visible row has focus. Selection and
//! activation are left to the caller: Enter and Space hand the focused index
//! to a callback.

/// Modifier keys held with a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Modifiers {
    /// Control key held
    pub ctrl: bool,
    /// Alt key held
    pub alt: bool,
}

impl Modifiers {
    /// No modifiers
    pub const NONE: Self = Self {
        ctrl: false,
        alt: false,
    };
}

/// Key codes the grid reacts to, plus character keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    /// Character key
    Char(char),
    /// Enter/Return
    Enter,
    /// Escape
    Escape,
    /// Space
    Space,
    /// Arrow up
    Up,
    /// Arrow down
    Down,
    /// Home
    Home,
    /// End
    End,
    /// Page up
    PageUp,
    /// Page down
    PageDown,
}

/// A key combination (key + modifiers)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyCombo {
    /// The key code
    pub key: Key,
    /// Modifier keys
    pub modifiers: Modifiers,
}

impl KeyCombo {
    /// Create a key combo without modifiers
    pub const fn key(key: Key) -> Self {
        Self {
            key,
            modifiers: Modifiers::NONE,
        }
    }

    /// Add ctrl modifier
    pub const fn ctrl(mut self) -> Self {
        self.modifiers.ctrl = true;
        self
    }

    /// Add alt modifier
    pub const fn alt(mut self) -> Self {
        self.modifiers.alt = true;
        self
    }
}

impl From<Key> for KeyCombo {
    fn from(key: Key) -> Self {
        Self::key(key)
    }
}

/// Result of handling a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventResult {
    /// Event was ignored, try other handlers.
    Ignored,
    /// Event was consumed, stop propagation.
    Consumed,
}

/// Focus cursor over the visible rows of a grid.
///
/// | Key | Effect |
/// |-----|--------|
/// | Up / Down | previous / next row |
/// | Home / End | first / last row |
/// | PageUp / PageDown | move by the page step |
/// | Enter, Space | activate the focused row |
/// | Escape | clear focus |
///
/// With no focus, any movement key focuses the first row. Keys held with
/// Ctrl or Alt are ignored.
///
/// # Example
///
/// ```
/// use tabula_lib::nav::{EventResult, Key, KeyCombo, KeyboardNavigator};
///
/// let mut nav = KeyboardNavigator::new(10).with_page_step(5);
/// nav.handle_key(&KeyCombo::key(Key::Down), |_| {});
/// nav.handle_key(&KeyCombo::key(Key::PageDown), |_| {});
/// assert_eq!(nav.focused(), Some(5));
///
/// let mut activated = None;
/// let result = nav.handle_key(&KeyCombo::key(Key::Enter), |i| activated = Some(i));
/// assert_eq!(result, EventResult::Consumed);
/// assert_eq!(activated, Some(5));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyboardNavigator {
    focused: Option<usize>,
    row_count: usize,
    page_step: usize,
}

impl KeyboardNavigator {
    /// Creates a navigator over `row_count` visible rows with nothing focused.
    pub fn new(row_count: usize) -> Self {
        Self {
            focused: None,
            row_count,
            page_step: 10,
        }
    }

    /// Sets how far PageUp and PageDown move. A step of 0 is treated as 1.
    pub fn with_page_step(mut self, step: usize) -> Self {
        self.page_step = step.max(1);
        self
    }

    /// Returns the focused row index.
    pub fn focused(&self) -> Option<usize> {
        self.focused
    }

    /// Returns the focused row out of the visible rows.
    pub fn focused_row<'a, R>(&self, visible: &'a [R]) -> Option<&'a R> {
        visible.get(self.focused?)
    }

    /// Returns the number of visible rows.
    pub fn row_count(&self) -> usize {
        self.row_count
    }

    /// Updates the number of visible rows, pulling focus back in range.
    pub fn set_row_count(&mut self, row_count: usize) {
        self.row_count = row_count;
        self.focused = match (self.focused, row_count) {
            (_, 0) => None,
            (Some(i), n) => Some(i.min(n - 1)),
            (None, _) => None,
        };
    }

    /// Focuses a row. Returns `false` if the index is out of range.
    pub fn focus(&mut self, index: usize) -> bool {
        if index < self.row_count {
            self.focused = Some(index);
            true
        } else {
            false
        }
    }

    /// Clears focus.
    pub fn blur(&mut self) {
        self.focused = None;
    }

    /// Handles a key press. `activate` receives the focused index on Enter
    /// or Space.
    pub fn handle_key(&mut self, key: &KeyCombo, activate: impl FnOnce(usize)) -> EventResult {
        if key.modifiers.ctrl || key.modifiers.alt {
            return EventResult::Ignored;
        }

        match key.key {
            Key::Up => self.move_to(|i, _| i.saturating_sub(1)),
            Key::Down => self.move_to(|i, last| (i + 1).min(last)),
            Key::Home => self.move_to(|_, _| 0),
            Key::End => self.move_to(|_, last| last),
            Key::PageUp => {
                let step = self.page_step;
                self.move_to(|i, _| i.saturating_sub(step))
            }
            Key::PageDown => {
                let step = self.page_step;
                self.move_to(|i, last| i.saturating_add(step).min(last))
            }
            Key::Enter | Key::Space => match self.focused {
                Some(index) => {
                    activate(index);
                    EventResult::Consumed
                }
                None => EventResult::Ignored,
            },
            Key::Escape => match self.focused.take() {
                Some(_) => EventResult::Consumed,
                None => EventResult::Ignored,
            },
            _ => EventResult::Ignored,
        }
    }

    /// Moves focus with `step(current, last)`; unfocused moves go to row 0.
    fn move_to(&mut self, step: impl FnOnce(usize, usize) -> usize) -> EventResult {
        if self.row_count == 0 {
            return EventResult::Ignored;
        }
        let last = self.row_count - 1;
        let next = match self.focused {
            Some(current) => step(current, last),
            None => 0,
        };
        if self.focused == Some(next) {
            return EventResult::Ignored;
        }
        self.focused = Some(next);
        EventResult::Consumed
    }
}
