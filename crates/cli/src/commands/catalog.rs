//! Shipping options and vouchers.

use mma_shop_core::Price;
use mma_shop_store::checkout::{ShippingOption, VOUCHERS};

/// Log every shipping option and voucher.
pub fn list() {
    tracing::info!("Shipping options:");
    for option in ShippingOption::ALL {
        tracing::info!("  {} ({}) - {}", option.slug(), option.name(), Price::vnd(option.fee()));
    }
    tracing::info!("Vouchers:");
    for voucher in &VOUCHERS {
        tracing::info!("  {} - {}", voucher.code, voucher.description);
    }
}
