//! Order types for batch spot trades.
//!
//! ## Order Types
//!
//! The circuit encodes the trade kind as a raw `u8`. Two values are special:
//!
//! - `6`: auto-market (grid) order with a fixed amount S
//! - `7`: auto-market (grid) order with a fixed amount B
//!
//! Auto-market orders alternate direction each time they execute; the
//! direction is derived from the order's token pair relative to the
//! [`StartOrder`] that opened the grid.
//!
//! ## Signatures
//!
//! Signatures are opaque to this crate. They are carried through to the
//! witness as the three 32-byte EdDSA components.

use ssz_rs::prelude::*;

/// Raw type of an auto-market order with a fixed amount S
pub const AUTO_MARKET_FIXED_S: u8 = 6;

/// Raw type of an auto-market order with a fixed amount B
pub const AUTO_MARKET_FIXED_B: u8 = 7;

// ============================================================================
// OrderType enum
// ============================================================================

/// Trade kind of an order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OrderType {
    /// Any non-grid order; the raw circuit value is preserved
    Standard(u8),
    /// Grid order repeating with a fixed amount S (type 6)
    AutoMarketFixedS,
    /// Grid order repeating with a fixed amount B (type 7)
    AutoMarketFixedB,
}

impl Default for OrderType {
    fn default() -> Self {
        OrderType::Standard(0)
    }
}

impl OrderType {
    /// Convert to the raw circuit value
    pub fn to_u8(self) -> u8 {
        match self {
            OrderType::Standard(raw) => raw,
            OrderType::AutoMarketFixedS => AUTO_MARKET_FIXED_S,
            OrderType::AutoMarketFixedB => AUTO_MARKET_FIXED_B,
        }
    }

    /// Convert from the raw circuit value
    pub fn from_u8(value: u8) -> Self {
        match value {
            AUTO_MARKET_FIXED_S => OrderType::AutoMarketFixedS,
            AUTO_MARKET_FIXED_B => OrderType::AutoMarketFixedB,
            raw => OrderType::Standard(raw),
        }
    }

    /// Whether this is a grid order that flips direction
    #[inline]
    pub fn is_auto_market(self) -> bool {
        matches!(self, OrderType::AutoMarketFixedS | OrderType::AutoMarketFixedB)
    }
}

// ============================================================================
// StartOrder / Signature
// ============================================================================

/// Token pair of the order that opened an auto-market grid
///
/// Its `(token_s, token_b)` pair defines the grid's initial direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct StartOrder {
    pub token_s: u32,
    pub token_b: u32,
}

impl StartOrder {
    pub fn new(token_s: u32, token_b: u32) -> Self {
        Self { token_s, token_b }
    }
}

/// EdDSA signature components, carried verbatim into the witness
#[derive(Debug, Clone, PartialEq, Eq, Default, SimpleSerialize)]
pub struct Signature {
    pub rx: [u8; 32],
    pub ry: [u8; 32],
    pub s: [u8; 32],
}

impl Signature {
    pub fn new(rx: [u8; 32], ry: [u8; 32], s: [u8; 32]) -> Self {
        Self { rx, ry, s }
    }

    /// True for the placeholder signature of an empty slot
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

// ============================================================================
// Order struct
// ============================================================================

/// A pre-matched order submitted in a batch.
///
/// All amounts are raw token units. The `delta_filled_*` fields are the
/// settled quantities for this batch; `fee` is the gas fee in
/// `fee_token_id` and is rounded to the gas fee float encoding once
/// by the batch processor.
///
/// ## Example
///
/// ```
/// use batch_witness::types::Order;
///
/// // Sell 100 of token 1 for 50 of token 2, fully filled in this batch
/// let order = Order::new(7, 1, 1, 2, 100, 50)
///     .with_fill(100, 50)
///     .with_fees(20, 0, 1, 10);
///
/// assert_eq!(order.delta_filled_s, 100);
/// assert!(!order.is_auto_market());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Order {
    /// Owning account
    pub account_id: u32,

    /// Logical storage ID tracking this order's cumulative fill
    pub storage_id: u32,

    /// Token sold
    pub token_s: u32,

    /// Token bought
    pub token_b: u32,

    /// Total amount of token S the order is willing to sell
    pub amount_s: u128,

    /// Total amount of token B the order wants in return
    pub amount_b: u128,

    /// Trading fee rate in basis points, charged on the B side
    pub fee_bips: u16,

    /// Token the gas fee is paid in
    pub fee_token_id: u32,

    /// Gas fee in `fee_token_id`
    pub fee: u128,

    /// Amount of token S settled in this batch
    pub delta_filled_s: u128,

    /// Amount of token B settled in this batch
    pub delta_filled_b: u128,

    /// Trading fee declared by the submitter
    pub trading_fee: u128,

    /// Raw circuit order type, see [`OrderType`]
    pub order_type_raw: u8,

    /// Fill limit is measured on the B side when set, S side otherwise
    pub fill_amount_b_or_s: bool,

    /// Padding order, skipped by every computation
    pub is_noop: bool,

    pub signature: Signature,

    /// Grid origin, required for auto-market orders
    pub start_order: Option<StartOrder>,
}

impl Order {
    /// Create a standard order with no fill and no fees
    ///
    /// # Arguments
    ///
    /// * `account_id` - Owning account
    /// * `storage_id` - Logical storage ID
    /// * `token_s` / `token_b` - Sold / bought token
    /// * `amount_s` / `amount_b` - Order amounts
    pub fn new(
        account_id: u32,
        storage_id: u32,
        token_s: u32,
        token_b: u32,
        amount_s: u128,
        amount_b: u128,
    ) -> Self {
        Self {
            account_id,
            storage_id,
            token_s,
            token_b,
            amount_s,
            amount_b,
            ..Self::default()
        }
    }

    /// Padding order occupying an unused slot
    pub fn noop() -> Self {
        Self {
            is_noop: true,
            ..Self::default()
        }
    }

    /// Set the settled amounts for this batch
    pub fn with_fill(mut self, delta_filled_s: u128, delta_filled_b: u128) -> Self {
        self.delta_filled_s = delta_filled_s;
        self.delta_filled_b = delta_filled_b;
        self
    }

    /// Set trading fee rate, declared trading fee and gas fee
    pub fn with_fees(mut self, fee_bips: u16, trading_fee: u128, fee_token_id: u32, fee: u128) -> Self {
        self.fee_bips = fee_bips;
        self.trading_fee = trading_fee;
        self.fee_token_id = fee_token_id;
        self.fee = fee;
        self
    }

    /// Limit fills on the B side instead of the S side
    pub fn limit_by_b(mut self) -> Self {
        self.fill_amount_b_or_s = true;
        self
    }

    /// Turn this into a grid order opened by `start_order`
    pub fn with_auto_market(mut self, order_type: OrderType, start_order: StartOrder) -> Self {
        self.order_type_raw = order_type.to_u8();
        self.start_order = Some(start_order);
        self
    }

    pub fn with_signature(mut self, signature: Signature) -> Self {
        self.signature = signature;
        self
    }

    /// Get the order type
    #[inline]
    pub fn order_type(&self) -> OrderType {
        OrderType::from_u8(self.order_type_raw)
    }

    #[inline]
    pub fn is_auto_market(&self) -> bool {
        self.order_type().is_auto_market()
    }

    /// Whether the order trades the same pair, in the same direction, as its
    /// start order. `None` when the order has no start order.
    pub fn same_token_as_start(&self) -> Option<bool> {
        self.start_order
            .map(|start| self.token_s == start.token_s && self.token_b == start.token_b)
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
