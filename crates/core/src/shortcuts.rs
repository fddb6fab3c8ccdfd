//! Keyboard shortcuts for formatting.
//!
//! Shortcuts only fire while Ctrl or Cmd is held, so plain typing never
//! reaches them. Listeners are registered on a [`KeyboardHub`] and stay
//! active for as long as their [`Subscription`] is alive.

use crate::{Alignment, Error, Result};
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use std::str::FromStr;

/// Modifier key state for a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Modifiers {
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Self = Self {
        ctrl: false,
        alt: false,
        shift: false,
        meta: false,
    };

    pub const CTRL: Self = Self {
        ctrl: true,
        alt: false,
        shift: false,
        meta: false,
    };

    pub const META: Self = Self {
        ctrl: false,
        alt: false,
        shift: false,
        meta: true,
    };

    /// Ctrl on most platforms, Cmd on macOS.
    pub fn has_command_key(&self) -> bool {
        self.ctrl || self.meta
    }
}

/// A key press with its modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyEvent {
    pub key: char,
    pub modifiers: Modifiers,
}

impl KeyEvent {
    pub fn new(key: char, modifiers: Modifiers) -> Self {
        Self { key, modifiers }
    }

    pub fn plain(key: char) -> Self {
        Self::new(key, Modifiers::NONE)
    }

    pub fn ctrl(key: char) -> Self {
        Self::new(key, Modifiers::CTRL)
    }

    pub fn meta(key: char) -> Self {
        Self::new(key, Modifiers::META)
    }
}

impl FromStr for KeyEvent {
    type Err = Error;

    /// Parse combinations such as `ctrl+b` or `cmd+shift+J`.
    fn from_str(s: &str) -> Result<Self> {
        let invalid = || Error::InvalidKey(s.to_string());
        let mut modifiers = Modifiers::NONE;
        let mut key = None;

        for part in s.split('+').map(str::trim) {
            match part.to_lowercase().as_str() {
                "ctrl" | "control" => modifiers.ctrl = true,
                "alt" | "option" => modifiers.alt = true,
                "shift" => modifiers.shift = true,
                "cmd" | "meta" | "super" => modifiers.meta = true,
                _ => {
                    let mut chars = part.chars();
                    match (chars.next(), chars.next(), key) {
                        (Some(c), None, None) => key = Some(c),
                        _ => return Err(invalid()),
                    }
                }
            }
        }

        key.map(|key| Self::new(key, modifiers)).ok_or_else(invalid)
    }
}

/// A ribbon action reachable from the keyboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShortcutAction {
    ToggleBold,
    ToggleItalic,
    ToggleUnderline,
    Align(Alignment),
}

/// Map a key press to its formatting shortcut.
pub fn resolve_shortcut(event: &KeyEvent) -> Option<ShortcutAction> {
    if !event.modifiers.has_command_key() {
        return None;
    }

    match event.key.to_ascii_lowercase() {
        'b' => Some(ShortcutAction::ToggleBold),
        'i' => Some(ShortcutAction::ToggleItalic),
        'u' => Some(ShortcutAction::ToggleUnderline),
        'l' => Some(ShortcutAction::Align(Alignment::Left)),
        'e' => Some(ShortcutAction::Align(Alignment::Center)),
        'r' => Some(ShortcutAction::Align(Alignment::Right)),
        'j' => Some(ShortcutAction::Align(Alignment::Justify)),
        _ => None,
    }
}

type Keymap = Box<dyn Fn(&KeyEvent) -> Option<ShortcutAction>>;

#[derive(Default)]
struct HubInner {
    next_id: u64,
    keymaps: Vec<(u64, Keymap)>,
}

/// Window-wide key dispatcher.
#[derive(Clone, Default)]
pub struct KeyboardHub {
    inner: Rc<RefCell<HubInner>>,
}

impl KeyboardHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a keymap until the returned subscription is dropped.
    pub fn subscribe(
        &self,
        keymap: impl Fn(&KeyEvent) -> Option<ShortcutAction> + 'static,
    ) -> Subscription {
        let mut inner = self.inner.borrow_mut();
        let id = inner.next_id;
        inner.next_id += 1;
        inner.keymaps.push((id, Box::new(keymap)));
        log::debug!("Keyboard listener {} subscribed", id);

        Subscription {
            hub: Rc::downgrade(&self.inner),
            id,
        }
    }

    /// Offer a key press to the live keymaps, oldest first.
    ///
    /// `None` means no shortcut claimed the key and it should be handled as
    /// ordinary input.
    pub fn dispatch(&self, event: &KeyEvent) -> Option<ShortcutAction> {
        self.inner
            .borrow()
            .keymaps
            .iter()
            .find_map(|(_, keymap)| keymap(event))
    }

    pub fn listener_count(&self) -> usize {
        self.inner.borrow().keymaps.len()
    }
}

/// Keeps a keymap registered; dropping it unsubscribes.
#[must_use = "dropping the subscription unregisters the shortcuts"]
pub struct Subscription {
    hub: Weak<RefCell<HubInner>>,
    id: u64,
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(hub) = self.hub.upgrade() {
            hub.borrow_mut().keymaps.retain(|(id, _)| *id != self.id);
            log::debug!("Keyboard listener {} released", self.id);
        }
    }
}
