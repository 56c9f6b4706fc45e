use chrono::Utc;
use uuid::Uuid;

/// Generator for globally unique, human-scannable order numbers
///
/// Format: `ORD-YYYYMMDD-XXXXXXXXXXXX` where the suffix is drawn from a
/// random UUID, so concurrent calls cannot collide.
pub struct OrderNumberGenerator;

impl OrderNumberGenerator {
    /// Produce the next order number
    pub fn next() -> String {
        let date = Utc::now().format("%Y%m%d");
        let suffix = Uuid::new_v4().simple().to_string().to_uppercase();
        format!("ORD-{}-{}", date, &suffix[..12])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_order_number_format() {
        let number = OrderNumberGenerator::next();
        assert!(number.starts_with("ORD-"));

        let parts: Vec<&str> = number.split('-').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[1].len(), 8);
        assert!(parts[1].chars().all(|c| c.is_ascii_digit()));
        assert_eq!(parts[2].len(), 12);
        assert!(parts[2].chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_order_numbers_are_unique() {
        let mut seen = HashSet::new();
        for _ in 0..1000 {
            assert!(seen.insert(OrderNumberGenerator::next()));
        }
    }
}
