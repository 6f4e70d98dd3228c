//! Unit cost derivation for items bought in packages

/// Cost of a single unit given the package cost and the package quantity
///
/// Zero, negative or non-finite package quantities yield a unit cost of 0.
pub fn derive_unit_cost(package_cost: f64, package_quantity: f64) -> f64 {
    if package_quantity.is_finite() && package_quantity > 0.0 {
        package_cost / package_quantity
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_cost_from_package() {
        assert_eq!(derive_unit_cost(1000.0, 1000.0), 1.0);
        assert_eq!(derive_unit_cost(2500.0, 12.0), 2500.0 / 12.0);
    }

    #[test]
    fn test_empty_package_costs_nothing() {
        assert_eq!(derive_unit_cost(1000.0, 0.0), 0.0);
        assert_eq!(derive_unit_cost(1000.0, -5.0), 0.0);
        assert_eq!(derive_unit_cost(1000.0, f64::NAN), 0.0);
    }
}
