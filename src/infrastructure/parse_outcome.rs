// Result of a lenient text parse
#[derive(Debug, Clone, PartialEq)]
pub struct ParseOutcome<T> {
    pub items: Vec<T>,
    /// Units (rows, lines, tokens) that did not parse and were dropped
    pub skipped: usize,
}

impl<T> Default for ParseOutcome<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            skipped: 0,
        }
    }
}
