/// Knobs for a single comparison
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompareOptions {
    /// Descend into referenced definitions (directly or through array items)
    pub follow_references: bool,

    /// Maximum number of reference hops; `None` relies on the recursion guard alone
    pub max_depth: Option<usize>,
}

impl Default for CompareOptions {
    fn default() -> Self {
        Self {
            follow_references: true,
            max_depth: None,
        }
    }
}

impl CompareOptions {
    pub fn shallow() -> Self {
        Self {
            follow_references: false,
            max_depth: None,
        }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = Some(max_depth);
        self
    }
}
