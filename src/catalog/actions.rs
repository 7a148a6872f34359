/// Stock operations performed inside the catalog actor.
///
/// Both run with exclusive access to the product, which makes the
/// check-then-write of `DecrementIfSufficient` atomic under concurrent orders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StockAction {
    /// Reduce stock by the given quantity only if enough remains.
    ///
    /// # Errors
    /// Fails with `InsufficientStock` and leaves stock untouched when the
    /// requested amount exceeds what is available.
    DecrementIfSufficient(u32),
    /// Give back stock taken by an abandoned placement.
    Release(u32),
}
