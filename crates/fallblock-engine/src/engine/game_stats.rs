use serde::Serialize;

/// Counters for locked pieces and line clears.
///
/// Updated once per lock. There is no scoring or leveling; drivers that want
/// them can derive their own from these counters.
///
/// # Example
///
/// ```
/// use fallblock_engine::GameStats;
///
/// let mut stats = GameStats::new();
/// stats.record_lock(4);
/// stats.record_lock(0);
///
/// assert_eq!(stats.locked_pieces(), 2);
/// assert_eq!(stats.total_cleared_lines(), 4);
/// assert_eq!(stats.line_cleared_counter()[4], 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameStats {
    locked_pieces: usize,
    total_cleared_lines: usize,
    line_cleared_counter: [usize; 5],
}

impl Default for GameStats {
    fn default() -> Self {
        Self::new()
    }
}

impl GameStats {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            locked_pieces: 0,
            total_cleared_lines: 0,
            line_cleared_counter: [0; 5],
        }
    }

    #[must_use]
    pub const fn locked_pieces(&self) -> usize {
        self.locked_pieces
    }

    #[must_use]
    pub const fn total_cleared_lines(&self) -> usize {
        self.total_cleared_lines
    }

    /// Returns a histogram of locks by number of rows cleared.
    ///
    /// Index `n` counts locks that cleared exactly `n` rows; a single lock
    /// clears at most four.
    #[must_use]
    pub const fn line_cleared_counter(&self) -> &[usize; 5] {
        &self.line_cleared_counter
    }

    /// Records one lock that cleared `cleared_lines` rows.
    ///
    /// # Panics
    ///
    /// Panics if `cleared_lines > 4`, which no piece can produce.
    pub fn record_lock(&mut self, cleared_lines: usize) {
        assert!(
            cleared_lines < self.line_cleared_counter.len(),
            "a single lock cannot clear {cleared_lines} rows"
        );
        self.locked_pieces += 1;
        self.total_cleared_lines += cleared_lines;
        self.line_cleared_counter[cleared_lines] += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_accumulate() {
        let mut stats = GameStats::new();
        for lines in [0, 1, 1, 2, 3, 4] {
            stats.record_lock(lines);
        }
        assert_eq!(stats.locked_pieces(), 6);
        assert_eq!(stats.total_cleared_lines(), 11);
        assert_eq!(stats.line_cleared_counter(), &[1, 2, 1, 1, 1]);
    }

    #[test]
    #[should_panic(expected = "cannot clear 5 rows")]
    fn test_impossible_clear_panics() {
        GameStats::new().record_lock(5);
    }
}
