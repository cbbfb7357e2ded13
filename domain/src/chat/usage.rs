//! Token usage accounting.
//!
//! [`Usage`] values accumulate across generation calls, tool-triggered
//! re-generations, and models. Accumulation is associative and commutative:
//! every token field sums, and cost sums when present on either side.

use serde::{Deserialize, Serialize};

/// Token counts and optional cost estimate for one or more generation calls.
///
/// `total_tokens == prompt_tokens + completion_tokens` is a caller
/// convention, not enforced here: providers occasionally report a total
/// that includes cache or reasoning tokens.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u64,
    pub completion_tokens: u64,
    pub total_tokens: u64,
    /// Estimated USD cost, when the model's pricing is known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cost: Option<f64>,
}

impl Usage {
    /// Create a usage record with `total_tokens` derived from the parts.
    pub fn new(prompt_tokens: u64, completion_tokens: u64) -> Self {
        Self {
            prompt_tokens,
            completion_tokens,
            total_tokens: prompt_tokens + completion_tokens,
            cost: None,
        }
    }

    pub fn with_cost(mut self, cost: f64) -> Self {
        self.cost = Some(cost);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.total_tokens == 0 && self.cost.is_none()
    }
}

impl std::ops::Add for Usage {
    type Output = Usage;

    fn add(self, rhs: Usage) -> Usage {
        Usage {
            prompt_tokens: self.prompt_tokens + rhs.prompt_tokens,
            completion_tokens: self.completion_tokens + rhs.completion_tokens,
            total_tokens: self.total_tokens + rhs.total_tokens,
            cost: match (self.cost, rhs.cost) {
                (None, None) => None,
                (a, b) => Some(a.unwrap_or(0.0) + b.unwrap_or(0.0)),
            },
        }
    }
}

impl std::ops::AddAssign for Usage {
    fn add_assign(&mut self, rhs: Usage) {
        *self = *self + rhs;
    }
}

impl std::iter::Sum for Usage {
    fn sum<I: Iterator<Item = Usage>>(iter: I) -> Usage {
        iter.fold(Usage::default(), |acc, u| acc + u)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_derives_total() {
        let usage = Usage::new(100, 50);
        assert_eq!(usage.total_tokens, 150);
        assert!(usage.cost.is_none());
    }

    #[test]
    fn test_accumulation_is_associative() {
        let a = Usage::new(10, 5).with_cost(0.01);
        let b = Usage::new(20, 10);
        let c = Usage::new(30, 15).with_cost(0.02);

        let left = (a + b) + c;
        let right = a + (b + c);
        assert_eq!(left, right);
        assert_eq!(left.prompt_tokens, 60);
        assert_eq!(left.completion_tokens, 30);
        assert_eq!(left.total_tokens, 90);
    }

    #[test]
    fn test_cost_absent_when_both_absent() {
        let sum = Usage::new(1, 1) + Usage::new(2, 2);
        assert!(sum.cost.is_none());
    }

    #[test]
    fn test_cost_additive_when_one_present() {
        let sum = Usage::new(1, 1).with_cost(0.5) + Usage::new(2, 2);
        assert_eq!(sum.cost, Some(0.5));

        let sum = sum + Usage::new(0, 0).with_cost(0.25);
        assert_eq!(sum.cost, Some(0.75));
    }

    #[test]
    fn test_sum_over_iterator() {
        let total: Usage = [Usage::new(1, 2), Usage::new(3, 4), Usage::new(5, 6)]
            .into_iter()
            .sum();
        assert_eq!(total.prompt_tokens, 9);
        assert_eq!(total.completion_tokens, 12);
        assert_eq!(total.total_tokens, 21);
    }
}
