//! # Record Enrichment
//!
//! Sales arrive from the API with bare foreign keys. Views (invoices,
//! exports, tables) want the client and product records attached. This
//! module resolves those references against the in-memory collections
//! and, when a reference cannot be resolved, attaches an **explicit**
//! placeholder stub instead of silently fabricating a look-alike record,
//! so callers can always tell real data from synthesized data.

use serde::{Deserialize, Serialize};

use crate::documents::{calculate_totals, document_number_for_sale, Totals};
use crate::types::{Client, InvoiceMetadata, Product, Sale, SaleDetail};

// =============================================================================
// Resolved
// =============================================================================

/// A reference resolved against a local collection.
///
/// `Placeholder` carries a synthesized stand-in record; the data is
/// usable for display, but exports and documents can flag it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "resolution", content = "record", rename_all = "camelCase")]
pub enum Resolved<T> {
    Found(T),
    Placeholder(T),
}

impl<T> Resolved<T> {
    /// The carried record, real or synthesized.
    #[inline]
    pub fn value(&self) -> &T {
        match self {
            Resolved::Found(v) | Resolved::Placeholder(v) => v,
        }
    }

    #[inline]
    pub fn is_placeholder(&self) -> bool {
        matches!(self, Resolved::Placeholder(_))
    }
}

// =============================================================================
// Placeholder stubs
// =============================================================================

/// Generic stand-in for a client reference that did not resolve.
pub fn placeholder_client(cliente_id: i64) -> Client {
    Client {
        id: cliente_id,
        nombre: "Cliente Genérico".to_string(),
        dni_ruc: "00000000".to_string(),
        direccion: "Sin dirección".to_string(),
        telefono: String::new(),
        email: String::new(),
    }
}

/// Stand-in for a product reference, priced from the line's snapshot.
pub fn placeholder_product(producto_id: i64, precio_unitario: f64) -> Product {
    Product {
        id: producto_id,
        categoria_id: None,
        nombre: format!("Producto {}", producto_id),
        marca: "N/A".to_string(),
        modelo: "N/A".to_string(),
        descripcion: "Producto no especificado".to_string(),
        precio: precio_unitario,
        stock: 0,
        codigo: format!("PROD-{}", producto_id),
        fecha_registro: String::new(),
        categoria: None,
    }
}

// =============================================================================
// Enriched sale
// =============================================================================

/// One line item with its resolved product and effective subtotal.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrichedLine {
    pub detalle: SaleDetail,
    pub producto: Resolved<Product>,
    pub subtotal: f64,
}

/// A sale ready for rendering: resolved references, derived invoice
/// metadata and computed totals.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrichedSale {
    pub sale: Sale,
    pub cliente: Resolved<Client>,
    pub lineas: Vec<EnrichedLine>,
    pub invoice: InvoiceMetadata,
    pub totals: Totals,
}

impl EnrichedSale {
    /// True when any attached record is a synthesized stand-in.
    pub fn has_placeholders(&self) -> bool {
        self.cliente.is_placeholder() || self.lineas.iter().any(|l| l.producto.is_placeholder())
    }
}

/// Resolves a sale against the cached client and product collections.
///
/// Resolution order per reference: record embedded by the API, then the
/// local collection, then an explicit placeholder. Classification and
/// numbering run on the resolved view, so a looked-up business client
/// drives Factura issuance even when the wire record came bare.
pub fn enrich_sale(sale: &Sale, clients: &[Client], products: &[Product]) -> EnrichedSale {
    let cliente = match &sale.cliente {
        Some(embedded) => Resolved::Found(embedded.clone()),
        None => match clients.iter().find(|c| c.id == sale.cliente_id) {
            Some(found) => Resolved::Found(found.clone()),
            None => Resolved::Placeholder(placeholder_client(sale.cliente_id)),
        },
    };

    let lineas: Vec<EnrichedLine> = sale
        .detalles
        .iter()
        .map(|detalle| {
            let producto = match &detalle.producto {
                Some(embedded) => Resolved::Found(embedded.clone()),
                None => match products.iter().find(|p| p.id == detalle.producto_id) {
                    Some(found) => Resolved::Found(found.clone()),
                    None => Resolved::Placeholder(placeholder_product(
                        detalle.producto_id,
                        detalle.precio_unitario,
                    )),
                },
            };
            EnrichedLine {
                subtotal: detalle.line_subtotal(),
                detalle: detalle.clone(),
                producto,
            }
        })
        .collect();

    // Classify and number on the resolved view of the sale.
    let mut resolved_sale = sale.clone();
    resolved_sale.cliente = Some(cliente.value().clone());
    let invoice = document_number_for_sale(&resolved_sale);
    resolved_sale.tipo_documento = Some(invoice.tipo_documento);
    resolved_sale.serie = Some(invoice.serie.clone());
    resolved_sale.numero_documento = Some(invoice.numero.clone());

    let totals = calculate_totals(&sale.detalles);

    EnrichedSale {
        sale: resolved_sale,
        cliente,
        lineas,
        invoice,
        totals,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DocumentType;

    fn bare_sale() -> Sale {
        Sale {
            id: 9,
            cliente_id: 4,
            fecha: "2024-03-15T10:30:00".to_string(),
            total: 236.0,
            metodo_pago: "tarjeta".to_string(),
            detalles: vec![SaleDetail {
                id: 1,
                venta_id: 9,
                producto_id: 55,
                cantidad: 2,
                precio_unitario: 100.0,
                subtotal: None,
                producto: None,
            }],
            cliente: None,
            tipo_documento: None,
            serie: None,
            numero_documento: None,
        }
    }

    #[test]
    fn test_unresolvable_references_become_placeholders() {
        let enriched = enrich_sale(&bare_sale(), &[], &[]);

        assert!(enriched.cliente.is_placeholder());
        assert_eq!(enriched.cliente.value().nombre, "Cliente Genérico");
        assert!(enriched.lineas[0].producto.is_placeholder());
        assert_eq!(enriched.lineas[0].producto.value().precio, 100.0);
        assert!(enriched.has_placeholders());
    }

    #[test]
    fn test_local_collections_resolve_references() {
        let clients = vec![Client {
            id: 4,
            nombre: "María Torres".to_string(),
            dni_ruc: "45678912".to_string(),
            direccion: "Jr. Lima 100".to_string(),
            telefono: "987654321".to_string(),
            email: "maria@example.com".to_string(),
        }];
        let products = vec![placeholder_product(55, 100.0)];

        let enriched = enrich_sale(&bare_sale(), &clients, &products);

        assert!(!enriched.cliente.is_placeholder());
        assert_eq!(enriched.cliente.value().nombre, "María Torres");
        // The product came from the collection, even though its content
        // happens to look like a stub.
        assert!(!enriched.lineas[0].producto.is_placeholder());
    }

    #[test]
    fn test_looked_up_ruc_client_drives_factura() {
        let clients = vec![Client {
            id: 4,
            nombre: "ACME SAC".to_string(),
            dni_ruc: "20601234567".to_string(),
            direccion: String::new(),
            telefono: String::new(),
            email: String::new(),
        }];

        let enriched = enrich_sale(&bare_sale(), &clients, &[]);
        assert_eq!(enriched.invoice.tipo_documento, DocumentType::Factura);
        assert_eq!(enriched.invoice.serie, "F001");
        assert_eq!(enriched.sale.serie.as_deref(), Some("F001"));
    }

    #[test]
    fn test_placeholder_client_keeps_boleta() {
        let enriched = enrich_sale(&bare_sale(), &[], &[]);
        // Placeholder dni "00000000" has DNI length; amount 236 is under
        // the Factura threshold.
        assert_eq!(enriched.invoice.tipo_documento, DocumentType::Boleta);
    }

    #[test]
    fn test_totals_attached() {
        let enriched = enrich_sale(&bare_sale(), &[], &[]);
        assert_eq!(enriched.totals.subtotal, 200.0);
        assert_eq!(enriched.totals.igv, 36.0);
        assert_eq!(enriched.totals.total, 236.0);
        assert_eq!(enriched.lineas[0].subtotal, 200.0);
    }
}
