//! Ownable resources: loyalty cards, vouchers and gift cards.

pub mod card;
pub mod gift_card;
pub mod header;
pub mod voucher;

pub use card::{Card, NewCard};
pub use gift_card::{GiftCard, GiftCardBalance, NewGiftCard};
pub use header::ResourceHeader;
pub use voucher::{NewVoucher, Voucher};
