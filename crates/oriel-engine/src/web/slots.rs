use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::coords::Rect;

/// Placement of one native-drawn component, as set by page script.
///
/// Coordinates are window-space logical pixels (top-left origin), matching
/// the layout rectangles the page measures for its placeholder elements.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ComponentSlot {
    pub rect: Rect,
    pub visible: bool,
}

impl ComponentSlot {
    pub fn new(rect: Rect, visible: bool) -> Self {
        Self { rect, visible }
    }
}

/// Name → slot table written by bridge callbacks and read by the frame
/// loop.
///
/// `set` is insert-or-update with last-write-wins; slots are never removed,
/// a page hides a component by writing `visible: false`.
#[derive(Debug, Default)]
pub struct SlotMap {
    slots: HashMap<String, ComponentSlot>,
}

/// Single-threaded shared handle to a [`SlotMap`].
pub type SharedSlots = Rc<RefCell<SlotMap>>;

impl SlotMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, name: &str, slot: ComponentSlot) {
        self.slots.insert(name.to_owned(), slot);
    }

    pub fn get(&self, name: &str) -> Option<ComponentSlot> {
        self.slots.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, ComponentSlot)> + '_ {
        self.slots.iter().map(|(n, s)| (n.as_str(), *s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_inserts_then_updates() {
        let mut slots = SlotMap::new();
        slots.set("panel", ComponentSlot::new(Rect::new(10.0, 20.0, 100.0, 50.0), true));
        slots.set("panel", ComponentSlot::new(Rect::new(15.0, 25.0, 100.0, 50.0), true));
        assert_eq!(slots.len(), 1);
        assert_eq!(slots.get("panel").unwrap().rect.x, 15.0);
    }

    #[test]
    fn names_are_independent() {
        let mut slots = SlotMap::new();
        slots.set("left", ComponentSlot::new(Rect::new(0.0, 0.0, 1.0, 1.0), true));
        slots.set("right", ComponentSlot::new(Rect::new(9.0, 9.0, 2.0, 2.0), false));
        assert_eq!(slots.len(), 2);
        assert!(slots.get("left").unwrap().visible);
        assert!(!slots.get("right").unwrap().visible);
        assert_eq!(slots.get("middle"), None);
    }

    #[test]
    fn hiding_keeps_the_slot() {
        let mut slots = SlotMap::new();
        let rect = Rect::new(10.0, 20.0, 100.0, 50.0);
        slots.set("panel", ComponentSlot::new(rect, true));
        slots.set("panel", ComponentSlot::new(rect, false));

        let slot = slots.get("panel").unwrap();
        assert!(!slot.visible);
        assert_eq!(slot.rect, rect);
    }
}
