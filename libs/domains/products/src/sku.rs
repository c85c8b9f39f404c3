//! SKU assignment from the shared `sku` counter.

/// Counter name in the `counters` collection
pub const SKU_SEQUENCE: &str = "sku";

/// Zero-pad to at least four digits; larger values are never truncated
pub fn format_sku(sequence: i64) -> String {
    format!("{:04}", sequence)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_sku_pads_to_four_digits() {
        assert_eq!(format_sku(1), "0001");
        assert_eq!(format_sku(7), "0007");
        assert_eq!(format_sku(999), "0999");
        assert_eq!(format_sku(1000), "1000");
    }

    #[test]
    fn test_format_sku_never_truncates() {
        assert_eq!(format_sku(10001), "10001");
        assert_eq!(format_sku(1_234_567), "1234567");
    }
}
