//! Payment payload construction and gateway redirect selection.

use std::collections::HashSet;

use portalpagos_api::types::{
    PaymentPayload, PreferenceRequest, PreferenceResponse, SistemaPago,
};

use crate::error::PortalError;
use crate::transform::ResultadoBusqueda;

/// Builds the `/create_preference` request from the current selection.
///
/// The payload covers every selected item from the *unfiltered* debt
/// list: once selected, an item stays in the payment even if the month
/// filter later hides it. `total` is the amount shown on screen at
/// confirmation time and doubles as the gateway unit price.
pub fn armar_preferencia(
    resultado: &ResultadoBusqueda,
    sistema: SistemaPago,
    termino: &str,
    email: &str,
    seleccion: &HashSet<String>,
    total: f64,
) -> PreferenceRequest {
    let elegidas: Vec<_> = resultado
        .deudas
        .iter()
        .filter(|d| seleccion.contains(&d.id))
        .collect();

    let deuda_global = elegidas.iter().find(|d| d.es_deuda_global());
    let mut meses = std::collections::BTreeMap::new();
    let mut meses_montos = std::collections::BTreeMap::new();
    for item in &elegidas {
        if let Some(mes) = item.mes() {
            let clave = mes.nombre().to_string();
            meses.insert(clave.clone(), true);
            // Agua can carry two items per month (residential plus
            // commercial); the backend expects one amount per month key.
            *meses_montos.entry(clave).or_insert(0.0) += item.monto;
        }
    }

    let payload = PaymentPayload {
        record_id: resultado.record_id.clone(),
        item_type: sistema.item_type().to_string(),
        dni: (sistema.search_param() == "dni").then(|| termino.to_string()),
        nombre_contribuyente: (sistema.search_param() == "nombre")
            .then(|| termino.to_string()),
        email: email.to_string(),
        total_amount: total,
        deuda: deuda_global.is_some(),
        deuda_monto: deuda_global.map(|d| d.monto).unwrap_or(0.0),
        meses,
        meses_montos,
    };

    PreferenceRequest {
        items_to_pay: payload,
        title: format!("Pago de {}", sistema.nombre()),
        unit_price: total,
    }
}

/// Picks the gateway redirect URL from a preference response: the
/// production `init_point` wins over `sandbox_init_point`; neither
/// present is an explicit error, never a silent redirect.
pub fn url_de_pago(respuesta: &PreferenceResponse) -> Result<String, PortalError> {
    if respuesta.preference_id.is_none() {
        return Err(PortalError::SinUrlDePago);
    }
    respuesta
        .init_point
        .clone()
        .or_else(|| respuesta.sandbox_init_point.clone())
        .ok_or(PortalError::SinUrlDePago)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::transformar;
    use portalpagos_api::types::RegistroDeuda;
    use serde_json::json;

    fn resultado_tasas() -> ResultadoBusqueda {
        let r: RegistroDeuda = serde_json::from_value(json!({
            "id": "rec1",
            "fields": { "deuda": 1200, "enero": 100, "julio": 80 }
        }))
        .unwrap();
        transformar(&r, SistemaPago::Tasas, "30123456")
    }

    #[test]
    fn payload_includes_selected_hidden_items() {
        let resultado = resultado_tasas();
        // julio is a future month (hidden by default) but was selected.
        let seleccion: HashSet<String> =
            ["deuda-rec1", "enero-rec1", "julio-rec1"].iter().map(|s| s.to_string()).collect();
        let req = armar_preferencia(
            &resultado,
            SistemaPago::Tasas,
            "30123456",
            "vecino@example.com",
            &seleccion,
            1380.0,
        );
        let p = &req.items_to_pay;
        assert!(p.deuda);
        assert_eq!(p.deuda_monto, 1200.0);
        assert_eq!(p.meses.get("enero"), Some(&true));
        assert_eq!(p.meses.get("julio"), Some(&true));
        assert_eq!(p.meses_montos.get("julio"), Some(&80.0));
        assert_eq!(p.item_type, "lote");
        assert_eq!(req.title, "Pago de Tasas Retributivas");
        assert_eq!(req.unit_price, 1380.0);
    }

    #[test]
    fn payload_skips_unselected_items() {
        let resultado = resultado_tasas();
        let seleccion: HashSet<String> = ["enero-rec1".to_string()].into_iter().collect();
        let req = armar_preferencia(
            &resultado,
            SistemaPago::Tasas,
            "30123456",
            "vecino@example.com",
            &seleccion,
            100.0,
        );
        let p = &req.items_to_pay;
        assert!(!p.deuda);
        assert_eq!(p.deuda_monto, 0.0);
        assert_eq!(p.meses.len(), 1);
    }

    #[test]
    fn patente_carries_dni_otras_carries_nombre() {
        let resultado = resultado_tasas();
        let seleccion: HashSet<String> = ["enero-rec1".to_string()].into_iter().collect();

        let pat = armar_preferencia(
            &resultado,
            SistemaPago::Patente,
            "27999888",
            "a@b.c",
            &seleccion,
            100.0,
        );
        assert_eq!(pat.items_to_pay.dni.as_deref(), Some("27999888"));
        assert!(pat.items_to_pay.nombre_contribuyente.is_none());

        let otras = armar_preferencia(
            &resultado,
            SistemaPago::Otras,
            "Ana Suárez",
            "a@b.c",
            &seleccion,
            100.0,
        );
        assert!(otras.items_to_pay.dni.is_none());
        assert_eq!(
            otras.items_to_pay.nombre_contribuyente.as_deref(),
            Some("Ana Suárez")
        );

        // Tasas/Agua search by generic query: neither key applies.
        let tasas = armar_preferencia(
            &resultado,
            SistemaPago::Tasas,
            "30123456",
            "a@b.c",
            &seleccion,
            100.0,
        );
        assert!(tasas.items_to_pay.dni.is_none());
        assert!(tasas.items_to_pay.nombre_contribuyente.is_none());
    }

    #[test]
    fn agua_sums_residential_and_commercial_per_month() {
        let r: RegistroDeuda = serde_json::from_value(json!({
            "id": "rec3",
            "fields": { "Marzo agua": 150, "Marzo Comercial": 70 }
        }))
        .unwrap();
        let resultado = transformar(&r, SistemaPago::Agua, "30123456");
        let seleccion: HashSet<String> = resultado.deudas.iter().map(|d| d.id.clone()).collect();
        let req = armar_preferencia(
            &resultado,
            SistemaPago::Agua,
            "30123456",
            "a@b.c",
            &seleccion,
            220.0,
        );
        assert_eq!(req.items_to_pay.meses_montos.get("marzo"), Some(&220.0));
    }

    #[test]
    fn url_prefers_production_over_sandbox() {
        let resp = PreferenceResponse {
            preference_id: Some("p-1".to_string()),
            init_point: Some("https://mp/prod".to_string()),
            sandbox_init_point: Some("https://mp/sandbox".to_string()),
        };
        assert_eq!(url_de_pago(&resp).unwrap(), "https://mp/prod");
    }

    #[test]
    fn url_falls_back_to_sandbox() {
        let resp = PreferenceResponse {
            preference_id: Some("p-1".to_string()),
            init_point: None,
            sandbox_init_point: Some("https://mp/sandbox".to_string()),
        };
        assert_eq!(url_de_pago(&resp).unwrap(), "https://mp/sandbox");
    }

    #[test]
    fn url_missing_both_is_an_error() {
        let resp = PreferenceResponse {
            preference_id: Some("p-1".to_string()),
            init_point: None,
            sandbox_init_point: None,
        };
        assert!(matches!(url_de_pago(&resp), Err(PortalError::SinUrlDePago)));
    }

    #[test]
    fn url_missing_preference_id_is_an_error() {
        let resp = PreferenceResponse {
            preference_id: None,
            init_point: Some("https://mp/prod".to_string()),
            sandbox_init_point: None,
        };
        assert!(url_de_pago(&resp).is_err());
    }
}
