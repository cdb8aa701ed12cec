//! The currency seam consulted by shop operations.
//!
//! Coins live outside the farm engine. Shop operations borrow a
//! [`CurrencyStore`] for the duration of a single call, ask it to debit or
//! credit, and only touch the inventory when the store agrees.

/// A coin balance that shop operations can debit and credit.
pub trait CurrencyStore {
    /// Current balance.
    fn coins(&self) -> u64;

    /// Debit `amount` coins. Returns `false` (and changes nothing) when the
    /// balance is insufficient.
    fn spend_coins(&mut self, amount: u64) -> bool;

    /// Credit `amount` coins.
    fn add_coins(&mut self, amount: u64);
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::CurrencyStore;

    /// Minimal in-memory balance for shop tests.
    #[derive(Debug, Default)]
    pub struct Purse(pub u64);

    impl CurrencyStore for Purse {
        fn coins(&self) -> u64 {
            self.0
        }

        fn spend_coins(&mut self, amount: u64) -> bool {
            match self.0.checked_sub(amount) {
                Some(rest) => {
                    self.0 = rest;
                    true
                }
                None => false,
            }
        }

        fn add_coins(&mut self, amount: u64) {
            self.0 = self.0.saturating_add(amount);
        }
    }
}
