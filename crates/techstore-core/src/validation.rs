//! # Validation Module
//!
//! Schema-level input validation, run before anything reaches the
//! network layer.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: THIS MODULE (schema rules)                                    │
//! │  ├── Field format checks (tax id, email, price range)                   │
//! │  └── Rejected before submission, shown next to the field                │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Local domain checks                                           │
//! │  ├── Stock availability against the cached snapshot                     │
//! │  └── Can be stale vs. the server - known race, checked anyway           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Remote API                                                    │
//! │  └── Authoritative constraints (uniqueness, referential integrity)      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::{CoreError, CoreResult, ValidationError, ValidationResult};
use crate::types::{CreateClient, CreateProduct, CreateSale, Product};
use crate::{DNI_LEN, MAX_PRICE, MAX_STOCK, RUC_LEN};

// =============================================================================
// Field Validators
// =============================================================================

/// Validates a DNI (8 digits) or RUC (11 digits).
///
/// ## Example
/// ```rust
/// use techstore_core::validation::validate_dni_ruc;
///
/// assert!(validate_dni_ruc("12345678").is_ok());
/// assert!(validate_dni_ruc("20601234567").is_ok());
/// assert!(validate_dni_ruc("123").is_err());
/// ```
pub fn validate_dni_ruc(value: &str) -> ValidationResult<()> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Required {
            field: "dniRuc".to_string(),
        });
    }

    if !value.chars().all(|c| c.is_ascii_digit()) {
        return Err(ValidationError::InvalidFormat {
            field: "dniRuc".to_string(),
            reason: "must contain only digits".to_string(),
        });
    }

    if value.len() != DNI_LEN && value.len() != RUC_LEN {
        return Err(ValidationError::InvalidFormat {
            field: "dniRuc".to_string(),
            reason: format!("must have {} digits (DNI) or {} digits (RUC)", DNI_LEN, RUC_LEN),
        });
    }

    Ok(())
}

/// Validates an email address shape. Empty is allowed (optional field).
pub fn validate_email(email: &str) -> ValidationResult<()> {
    let email = email.trim();
    if email.is_empty() {
        return Ok(());
    }

    let mut parts = email.splitn(2, '@');
    let local = parts.next().unwrap_or_default();
    let domain = parts.next().unwrap_or_default();

    if local.is_empty() || domain.is_empty() || !domain.contains('.') || domain.ends_with('.') {
        return Err(ValidationError::InvalidFormat {
            field: "email".to_string(),
            reason: "must look like name@domain.tld".to_string(),
        });
    }

    Ok(())
}

/// Validates a phone number: 9-15 characters of digits, `+`, `-`, space.
/// Empty is allowed (optional field).
pub fn validate_phone(phone: &str) -> ValidationResult<()> {
    let phone = phone.trim();
    if phone.is_empty() {
        return Ok(());
    }

    if phone.len() < 9 {
        return Err(ValidationError::TooShort {
            field: "telefono".to_string(),
            min: 9,
        });
    }
    if phone.len() > 15 {
        return Err(ValidationError::TooLong {
            field: "telefono".to_string(),
            max: 15,
        });
    }
    if !phone
        .chars()
        .all(|c| c.is_ascii_digit() || c == '+' || c == '-' || c == ' ')
    {
        return Err(ValidationError::InvalidFormat {
            field: "telefono".to_string(),
            reason: "must contain only digits, +, - and spaces".to_string(),
        });
    }

    Ok(())
}

/// Validates a non-empty display name, bounded at 200 characters.
pub fn validate_name(field: &str, value: &str) -> ValidationResult<()> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }
    if value.len() > 200 {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: 200,
        });
    }

    Ok(())
}

/// Validates a price: non-negative, bounded. Zero is allowed.
pub fn validate_price(precio: f64) -> ValidationResult<()> {
    if !precio.is_finite() || precio < 0.0 || precio > MAX_PRICE {
        return Err(ValidationError::OutOfRange {
            field: "precio".to_string(),
            min: 0,
            max: MAX_PRICE as i64,
        });
    }
    Ok(())
}

/// Validates a stock level: non-negative integer, bounded.
pub fn validate_stock(stock: i64) -> ValidationResult<()> {
    if !(0..=MAX_STOCK).contains(&stock) {
        return Err(ValidationError::OutOfRange {
            field: "stock".to_string(),
            min: 0,
            max: MAX_STOCK,
        });
    }
    Ok(())
}

/// Validates a line-item quantity (strictly positive).
pub fn validate_quantity(cantidad: i64) -> ValidationResult<()> {
    if cantidad <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "cantidad".to_string(),
        });
    }
    Ok(())
}

// =============================================================================
// Composite Validators
// =============================================================================

/// Validates a product payload before submission.
pub fn validate_new_product(product: &CreateProduct) -> ValidationResult<()> {
    validate_name("nombre", &product.nombre)?;
    validate_name("codigo", &product.codigo)?;
    validate_price(product.precio)?;
    validate_stock(product.stock)?;
    Ok(())
}

/// Validates a client payload before submission.
pub fn validate_new_client(client: &CreateClient) -> ValidationResult<()> {
    validate_name("nombre", &client.nombre)?;
    validate_dni_ruc(&client.dni_ruc)?;
    validate_phone(&client.telefono)?;
    validate_email(&client.email)?;
    Ok(())
}

/// Validates a sale payload: a payment method, at least one line, all
/// quantities positive.
pub fn validate_new_sale(sale: &CreateSale) -> CoreResult<()> {
    if sale.metodo_pago.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "metodoPago".to_string(),
        }
        .into());
    }
    if sale.detalles.is_empty() {
        return Err(CoreError::EmptySale);
    }
    for detalle in &sale.detalles {
        validate_quantity(detalle.cantidad)?;
        validate_price(detalle.precio_unitario)?;
    }
    Ok(())
}

// =============================================================================
// Local Domain Checks
// =============================================================================

/// Rejects a line item that would oversell the cached stock snapshot.
///
/// The snapshot can be stale relative to concurrent server-side stock
/// changes; the server remains authoritative on submission.
pub fn ensure_stock(product: &Product, cantidad: i64) -> CoreResult<()> {
    if product.can_sell(cantidad) {
        Ok(())
    } else {
        Err(CoreError::InsufficientStock {
            codigo: product.codigo.clone(),
            available: product.stock,
            requested: cantidad,
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CreateSaleDetail;

    #[test]
    fn test_validate_dni_ruc() {
        assert!(validate_dni_ruc("12345678").is_ok());
        assert!(validate_dni_ruc("20601234567").is_ok());

        assert!(validate_dni_ruc("").is_err());
        assert!(validate_dni_ruc("1234567").is_err());
        assert!(validate_dni_ruc("123456789").is_err());
        assert!(validate_dni_ruc("1234567a").is_err());
    }

    #[test]
    fn test_validate_email() {
        assert!(validate_email("").is_ok());
        assert!(validate_email("ana@example.com").is_ok());

        assert!(validate_email("ana@").is_err());
        assert!(validate_email("@example.com").is_err());
        assert!(validate_email("ana@example").is_err());
        assert!(validate_email("ana@example.").is_err());
    }

    #[test]
    fn test_validate_phone() {
        assert!(validate_phone("").is_ok());
        assert!(validate_phone("987654321").is_ok());
        assert!(validate_phone("+51 987-654-321").is_ok());

        assert!(validate_phone("12345").is_err());
        assert!(validate_phone("1234567890123456").is_err());
        assert!(validate_phone("98765432x").is_err());
    }

    #[test]
    fn test_validate_price_and_stock() {
        assert!(validate_price(0.0).is_ok());
        assert!(validate_price(1099.99).is_ok());
        assert!(validate_price(-1.0).is_err());
        assert!(validate_price(f64::NAN).is_err());
        assert!(validate_price(2_000_000.0).is_err());

        assert!(validate_stock(0).is_ok());
        assert!(validate_stock(10_000).is_ok());
        assert!(validate_stock(-1).is_err());
        assert!(validate_stock(10_001).is_err());
    }

    #[test]
    fn test_validate_new_sale() {
        let mut sale = CreateSale {
            cliente_id: 1,
            metodo_pago: "efectivo".to_string(),
            detalles: vec![CreateSaleDetail {
                producto_id: 1,
                cantidad: 2,
                precio_unitario: 100.0,
            }],
            tipo_documento: None,
        };
        assert!(validate_new_sale(&sale).is_ok());

        sale.detalles.clear();
        assert!(matches!(validate_new_sale(&sale), Err(CoreError::EmptySale)));

        sale.detalles.push(CreateSaleDetail {
            producto_id: 1,
            cantidad: 0,
            precio_unitario: 100.0,
        });
        assert!(validate_new_sale(&sale).is_err());
    }

    #[test]
    fn test_ensure_stock() {
        let product = crate::enrich::placeholder_product(1, 10.0);
        // Placeholder stock is 0.
        let err = ensure_stock(&product, 1).unwrap_err();
        assert!(matches!(err, CoreError::InsufficientStock { requested: 1, .. }));

        let mut in_stock = product.clone();
        in_stock.stock = 5;
        assert!(ensure_stock(&in_stock, 5).is_ok());
        assert!(ensure_stock(&in_stock, 6).is_err());
    }
}
