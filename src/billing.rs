//! VAT resolution and total computation for comandas.
//!
//! Rates are fractions in `[0, 1]` (0.21 = 21%). All money math is `Decimal`
//! end to end; nothing here touches the database.

use rust_decimal::Decimal;

use crate::error::{AppError, AppResult};

/// Fallback rate when neither the comanda nor the global settings carry one.
pub const DEFAULT_IVA: Decimal = Decimal::from_parts(21, 0, 0, false, 2);

/// Rate to persist on a write (create/update).
///
/// An explicit rate in the request wins, then the rate already stored on the
/// comanda, then the global setting, then [`DEFAULT_IVA`].
pub fn resolve_iva(
    explicit: Option<Decimal>,
    stored: Option<Decimal>,
    global: Option<Decimal>,
) -> Decimal {
    explicit.or(stored).or(global).unwrap_or(DEFAULT_IVA)
}

/// Rate to show on a read.
///
/// A cerrada comanda keeps the rate it was settled with even if the global
/// setting changed afterwards. An abierta comanda falls through its stored
/// rate, the global setting, and [`DEFAULT_IVA`] in that order.
pub fn display_iva(cerrada: bool, stored: Option<Decimal>, global: Option<Decimal>) -> Decimal {
    if cerrada {
        if let Some(rate) = stored {
            return rate;
        }
    }
    stored.or(global).unwrap_or(DEFAULT_IVA)
}

/// Line total for a detalle: unit price snapshot times quantity.
pub fn line_total(precio_unitario: Decimal, cantidad: i32) -> Decimal {
    precio_unitario * Decimal::from(cantidad)
}

/// Grand total: subtotal plus VAT.
pub fn total_con_iva(subtotal: Decimal, iva: Decimal) -> Decimal {
    subtotal + subtotal * iva
}

pub fn validate_iva(iva: Decimal) -> AppResult<()> {
    if iva < Decimal::ZERO || iva > Decimal::ONE {
        return Err(AppError::Validation(
            "iva must be a fraction between 0 and 1".into(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(value: i64, scale: u32) -> Decimal {
        Decimal::new(value, scale)
    }

    #[test]
    fn write_precedence_explicit_wins() {
        let rate = resolve_iva(Some(d(10, 2)), Some(d(15, 2)), Some(d(21, 2)));
        assert_eq!(rate, d(10, 2));
    }

    #[test]
    fn write_precedence_falls_through_stored_then_global() {
        assert_eq!(resolve_iva(None, Some(d(15, 2)), Some(d(21, 2))), d(15, 2));
        assert_eq!(resolve_iva(None, None, Some(d(15, 2))), d(15, 2));
        assert_eq!(resolve_iva(None, None, None), DEFAULT_IVA);
    }

    #[test]
    fn display_rate_of_cerrada_comanda_ignores_global_changes() {
        let rate = display_iva(true, Some(d(10, 2)), Some(d(21, 2)));
        assert_eq!(rate, d(10, 2));
    }

    #[test]
    fn display_rate_of_abierta_comanda_uses_global_when_unset() {
        assert_eq!(display_iva(false, None, Some(d(15, 2))), d(15, 2));
        assert_eq!(display_iva(false, Some(d(10, 2)), Some(d(15, 2))), d(10, 2));
        assert_eq!(display_iva(false, None, None), DEFAULT_IVA);
    }

    #[test]
    fn cerrada_comanda_without_stored_rate_still_falls_back() {
        assert_eq!(display_iva(true, None, Some(d(15, 2))), d(15, 2));
        assert_eq!(display_iva(true, None, None), DEFAULT_IVA);
    }

    #[test]
    fn totals_for_sample_comanda() {
        // 2 x 5.00 + 1 x 3.00
        let subtotal = line_total(d(500, 2), 2) + line_total(d(300, 2), 1);
        assert_eq!(subtotal, d(1300, 2));
        assert_eq!(total_con_iva(subtotal, d(21, 2)), d(1573, 2));
        assert_eq!(total_con_iva(subtotal, d(10, 2)), d(1430, 2));
    }

    #[test]
    fn iva_bounds_are_inclusive() {
        assert!(validate_iva(Decimal::ZERO).is_ok());
        assert!(validate_iva(Decimal::ONE).is_ok());
        assert!(validate_iva(d(21, 2)).is_ok());
        assert!(validate_iva(d(-1, 2)).is_err());
        assert!(validate_iva(d(101, 2)).is_err());
    }
}
