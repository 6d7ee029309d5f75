/// Budgets for the bounded entry points.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Limits {
    /// Budget for a single `run` or `exec_big`.
    pub budget: usize,
    /// Largest budget `denote` tries before giving up.
    pub search_limit: usize,
}

impl Default for Limits {
    fn default() -> Limits {
        Limits {
            budget: 1000,
            search_limit: 4096,
        }
    }
}

impl Limits {
    pub fn with_budget(self, budget: usize) -> Limits {
        Limits {
            budget,
            search_limit: self.search_limit.max(budget),
        }
    }
}
