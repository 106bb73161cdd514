/// Keys the scene reacts to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    F1,
    F2,
    F3,
    F4,
    Escape,
}

impl Key {
    fn bit(self) -> u32 {
        1 << self as u32
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct KeySet(pub u32);

impl KeySet {
    pub const EMPTY: Self = Self(0);

    pub fn contains(self, key: Key) -> bool {
        self.0 & key.bit() != 0
    }

    pub fn with(self, key: Key) -> Self {
        Self(self.0 | key.bit())
    }
}

impl FromIterator<Key> for KeySet {
    fn from_iter<I: IntoIterator<Item = Key>>(iter: I) -> Self {
        iter.into_iter().fold(Self::EMPTY, Self::with)
    }
}

/// Keyboard state of one frame together with the frame before it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InputSnapshot {
    pub current: KeySet,
    pub previous: KeySet,
}

impl InputSnapshot {
    pub fn new(current: KeySet, previous: KeySet) -> Self {
        Self { current, previous }
    }

    /// Snapshot of the following frame.
    pub fn next(&self, current: KeySet) -> Self {
        Self {
            current,
            previous: self.current,
        }
    }

    pub fn key_down(&self, key: Key) -> bool {
        self.current.contains(key)
    }

    /// Down this frame but not the frame before.
    pub fn key_press(&self, key: Key) -> bool {
        self.current.contains(key) && !self.previous.contains(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_press_fires_on_the_first_frame_only() {
        let held: KeySet = [Key::F1].into_iter().collect();
        let first = InputSnapshot::default().next(held);
        let second = first.next(held);
        let released = second.next(KeySet::EMPTY);

        assert!(first.key_press(Key::F1));
        assert!(second.key_down(Key::F1));
        assert!(!second.key_press(Key::F1));
        assert!(!released.key_down(Key::F1));
        assert!(!first.key_press(Key::F2));
    }
}
