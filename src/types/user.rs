//! Users and the batch input.

use crate::config::{CircuitParams, BATCH_TOKENS};
use crate::error::{Result, WitnessError};
use crate::types::Order;

/// One account's orders within a batch
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct User {
    pub account_id: u32,

    /// Padding user, skipped by every computation
    pub is_noop: bool,

    /// Orders in circuit slot order
    pub orders: Vec<Order>,
}

impl User {
    pub fn new(account_id: u32, orders: Vec<Order>) -> Self {
        Self {
            account_id,
            is_noop: false,
            orders,
        }
    }

    /// Padding user occupying an unused slot
    pub fn noop() -> Self {
        Self {
            is_noop: true,
            ..Self::default()
        }
    }

    /// Orders that take part in the batch
    pub fn active_orders(&self) -> impl Iterator<Item = (usize, &Order)> {
        self.orders
            .iter()
            .enumerate()
            .filter(|(_, order)| !order.is_noop)
    }
}

/// A batch of pre-matched orders across up to three settlement tokens
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Batch {
    /// Settlement tokens: first, second, third
    pub tokens: [u32; BATCH_TOKENS],

    /// Users in circuit slot order
    pub users: Vec<User>,
}

impl Batch {
    pub fn new(tokens: [u32; BATCH_TOKENS], users: Vec<User>) -> Self {
        Self { tokens, users }
    }

    /// Check the batch fits the circuit layout
    ///
    /// # Errors
    ///
    /// * [`WitnessError::TooManyUsers`] if there are more users than slots
    /// * [`WitnessError::TooManyOrders`] if a user exceeds its slot capacity
    pub fn validate_shape(&self, params: &CircuitParams) -> Result<()> {
        let max_users = params.user_order_caps.len();
        if self.users.len() > max_users {
            return Err(WitnessError::TooManyUsers {
                count: self.users.len(),
                max: max_users,
            });
        }
        for (user_index, user) in self.users.iter().enumerate() {
            let max = params.user_order_caps[user_index];
            if user.orders.len() > max {
                return Err(WitnessError::TooManyOrders {
                    user_index,
                    count: user.orders.len(),
                    max,
                });
            }
        }
        Ok(())
    }

    /// Number of non-noop orders of non-noop users
    pub fn active_order_count(&self) -> usize {
        self.users
            .iter()
            .filter(|user| !user.is_noop)
            .map(|user| user.active_orders().count())
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order() -> Order {
        Order::new(1, 1, 1, 2, 100, 50)
    }

    #[test]
    fn test_shape_ok() {
        let batch = Batch::new(
            [1, 2, 3],
            vec![
                User::new(1, vec![order(), order(), order(), order()]),
                User::new(2, vec![order(), order()]),
                User::new(3, vec![order()]),
            ],
        );
        assert!(batch.validate_shape(&CircuitParams::default()).is_ok());
        assert_eq!(batch.active_order_count(), 7);
    }

    #[test]
    fn test_too_many_orders_for_second_user() {
        let batch = Batch::new(
            [1, 2, 3],
            vec![User::new(1, vec![order()]), User::new(2, vec![order(), order(), order()])],
        );
        assert_eq!(
            batch.validate_shape(&CircuitParams::default()),
            Err(WitnessError::TooManyOrders {
                user_index: 1,
                count: 3,
                max: 2
            })
        );
    }

    #[test]
    fn test_too_many_users() {
        let users = (0..7).map(|i| User::new(i, vec![])).collect();
        let batch = Batch::new([1, 2, 3], users);
        assert_eq!(
            batch.validate_shape(&CircuitParams::default()),
            Err(WitnessError::TooManyUsers { count: 7, max: 6 })
        );
    }

    #[test]
    fn test_noop_orders_are_not_active() {
        let user = User::new(1, vec![Order::noop(), order(), Order::noop()]);
        let active: Vec<usize> = user.active_orders().map(|(i, _)| i).collect();
        assert_eq!(active, vec![1]);

        let batch = Batch::new([1, 2, 3], vec![User::noop(), user]);
        assert_eq!(batch.active_order_count(), 1);
    }
}
