//! Bounded command history with up/down navigation.

// ============================================================================
// CommandHistory
// ============================================================================

/// Submitted command lines in a fixed-capacity circular buffer.
///
/// When full, a new entry overwrites the oldest one. A navigation cursor
/// walks the entries from newest to oldest; `None` means the user is editing
/// a fresh line.
#[derive(Clone, Debug)]
pub struct CommandHistory {
    slots: Vec<Option<String>>,
    head: usize,
    len: usize,
    cursor: Option<usize>,
}

impl CommandHistory {
    /// Creates an empty history holding at most `capacity` lines.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "CommandHistory capacity must be greater than 0");

        Self {
            slots: vec![None; capacity],
            head: 0,
            len: 0,
            cursor: None,
        }
    }

    fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Line at a logical index, 0 being the oldest.
    pub fn get(&self, index: usize) -> Option<&str> {
        if index >= self.len {
            return None;
        }
        self.slots[(self.head + index) % self.capacity()].as_deref()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Record a submitted line and reset navigation.
    ///
    /// Blank lines and immediate repeats are not recorded.
    pub fn push(&mut self, line: &str) {
        self.cursor = None;
        let newest = self.len.checked_sub(1).and_then(|i| self.get(i));
        if line.trim().is_empty() || newest == Some(line) {
            return;
        }

        let slot = (self.head + self.len) % self.capacity();
        self.slots[slot] = Some(line.to_string());
        if self.len == self.capacity() {
            self.head = (self.head + 1) % self.capacity();
        } else {
            self.len += 1;
        }
    }

    /// Step to an older line (ArrowUp). Stays on the oldest line.
    pub fn older(&mut self) -> Option<&str> {
        let index = match self.cursor {
            _ if self.len == 0 => return None,
            None => self.len - 1,
            Some(i) => i.saturating_sub(1),
        };
        self.cursor = Some(index);
        self.get(index)
    }

    /// Step to a newer line (ArrowDown). Past the newest line, returns
    /// `None` and navigation resets to a fresh line.
    pub fn newer(&mut self) -> Option<&str> {
        let index = match self.cursor {
            Some(i) if i + 1 < self.len => i + 1,
            _ => {
                self.cursor = None;
                return None;
            }
        };
        self.cursor = Some(index);
        self.get(index)
    }

    /// Forget the navigation position.
    pub fn reset_cursor(&mut self) {
        self.cursor = None;
    }
}

// ============================================================================
// Tests
// ============================================================================
