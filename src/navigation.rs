/// Cursor over a non-empty sentence sequence, clamped to `[0, len - 1]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Navigator {
    cursor: usize,
    len: usize,
}

impl Navigator {
    /// `len` is clamped to at least one so the cursor always has a target.
    pub fn new(len: usize) -> Self {
        Self {
            cursor: 0,
            len: len.max(1),
        }
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn sentence_count(&self) -> usize {
        self.len
    }

    pub fn is_first(&self) -> bool {
        self.cursor == 0
    }

    pub fn is_last(&self) -> bool {
        self.cursor == self.len - 1
    }

    /// Move forward; returns whether the cursor moved.
    pub fn next(&mut self) -> bool {
        if self.cursor < self.len - 1 {
            self.cursor += 1;
            true
        } else {
            false
        }
    }

    /// Move back; returns whether the cursor moved.
    pub fn back(&mut self) -> bool {
        if self.cursor >= 1 {
            self.cursor -= 1;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_new_starts_at_zero() {
        let nav = Navigator::new(5);
        assert_eq!(nav.cursor(), 0);
        assert_eq!(nav.sentence_count(), 5);
        assert!(nav.is_first());
        assert!(!nav.is_last());
    }

    #[test]
    fn test_back_at_first_is_noop() {
        let mut nav = Navigator::new(5);
        assert!(!nav.back());
        assert_eq!(nav.cursor(), 0);
    }

    #[test]
    fn test_next_at_last_is_noop() {
        let mut nav = Navigator::new(5);
        for _ in 0..4 {
            assert!(nav.next());
        }
        assert_eq!(nav.cursor(), 4);
        assert!(nav.is_last());

        assert!(!nav.next());
        assert_eq!(nav.cursor(), 4);
    }

    #[test]
    fn test_single_sentence() {
        let mut nav = Navigator::new(1);
        assert!(nav.is_first() && nav.is_last());
        assert!(!nav.next());
        assert!(!nav.back());
        assert_eq!(nav.cursor(), 0);
    }

    #[test]
    fn test_zero_len_treated_as_one() {
        let mut nav = Navigator::new(0);
        assert_eq!(nav.sentence_count(), 1);
        assert!(!nav.next());
        assert_eq!(nav.cursor(), 0);
    }

    proptest! {
        #[test]
        fn prop_cursor_stays_in_bounds(len in 1usize..20, moves in proptest::collection::vec(any::<bool>(), 0..100)) {
            let mut nav = Navigator::new(len);
            for forward in moves {
                if forward { nav.next(); } else { nav.back(); }
                prop_assert!(nav.cursor() < len);
            }
        }
    }
}
