//! Auto-market (grid) direction tracking.
//!
//! A grid order alternates between buying and selling the same pair. The
//! storage slot remembers the direction of the last execution as a forward
//! flag (`true` = the start order's direction). For a new execution:
//!
//! | saved forward | same pair as start | new forward |
//! |---------------|--------------------|-------------|
//! | 1             | yes                | 1           |
//! | 1             | no                 | 0           |
//! | 0             | yes                | 1           |
//! | 0             | no                 | 0           |
//!
//! The new flag always follows the pair; comparing it with the saved flag
//! tells the caller whether the grid flipped, in which case the slot's fill
//! history no longer applies.

use crate::types::Order;

/// Direction flag after `order` executes
///
/// Returns `None` if the order carries no start order.
///
/// ```
/// use batch_witness::engine::calculate_auto_market_forward;
/// use batch_witness::types::{Order, OrderType, StartOrder};
///
/// let order = Order::new(1, 1, 2, 1, 100, 100)
///     .with_auto_market(OrderType::AutoMarketFixedS, StartOrder::new(1, 2));
///
/// assert_eq!(calculate_auto_market_forward(true, &order), Some(false));
/// ```
pub fn calculate_auto_market_forward(saved_forward: bool, order: &Order) -> Option<bool> {
    let same_token = order.same_token_as_start()?;
    let new_forward = match (saved_forward, same_token) {
        (true, true) => true,
        (true, false) => false,
        (false, true) => true,
        (false, false) => false,
    };
    Some(new_forward)
}

/// Whether executing `order` flips the grid relative to `saved_forward`
pub fn is_forward_flip(saved_forward: bool, order: &Order) -> Option<bool> {
    calculate_auto_market_forward(saved_forward, order).map(|f| f != saved_forward)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{OrderType, StartOrder};

    fn grid(token_s: u32, token_b: u32) -> Order {
        Order::new(1, 1, token_s, token_b, 100, 100)
            .with_auto_market(OrderType::AutoMarketFixedB, StartOrder::new(1, 2))
    }

    #[test]
    fn test_truth_table() {
        let same = grid(1, 2);
        let other = grid(2, 1);
        assert_eq!(calculate_auto_market_forward(true, &same), Some(true));
        assert_eq!(calculate_auto_market_forward(true, &other), Some(false));
        assert_eq!(calculate_auto_market_forward(false, &same), Some(true));
        assert_eq!(calculate_auto_market_forward(false, &other), Some(false));
    }

    #[test]
    fn test_partial_pair_match_is_not_same_token() {
        // Only token S matches the start order
        let order = grid(1, 3);
        assert_eq!(calculate_auto_market_forward(true, &order), Some(false));
    }

    #[test]
    fn test_flip_detection() {
        assert_eq!(is_forward_flip(true, &grid(1, 2)), Some(false));
        assert_eq!(is_forward_flip(true, &grid(2, 1)), Some(true));
        assert_eq!(is_forward_flip(false, &grid(1, 2)), Some(true));
        assert_eq!(is_forward_flip(false, &grid(2, 1)), Some(false));
    }

    #[test]
    fn test_missing_start_order() {
        let order = Order::new(1, 1, 1, 2, 100, 100);
        assert_eq!(calculate_auto_market_forward(true, &order), None);
        assert_eq!(is_forward_flip(false, &order), None);
    }
}
