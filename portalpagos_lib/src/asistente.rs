//! The debt search & selection wizard.
//!
//! `Asistente` is a pure state machine: it owns the step, the search
//! result, and the selection, while all network traffic happens outside
//! and is fed in through [`Asistente::aplicar_busqueda`]. Searches are
//! tied to tickets so a late response from a superseded search can never
//! overwrite fresher state.

use std::collections::HashSet;

use portalpagos_api::types::{PreferenceRequest, RegistroDeuda, SistemaPago};

use crate::error::PortalError;
use crate::filtro;
use crate::meses::Mes;
use crate::pago;
use crate::transform::{transformar, DeudaItem, ResultadoBusqueda};
use crate::validation;

/// Wizard step. Linear flow with one optional detour:
/// Identificación → (Selección) → Deuda → Confirmación.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Paso {
    Identificacion,
    /// Disambiguation between multiple matching records.
    Seleccion,
    Deuda,
    Confirmacion,
}

/// Handle for one in-flight search. Stale tickets are ignored when the
/// response arrives.
#[derive(Clone, Debug)]
pub struct TicketBusqueda {
    seq: u64,
    termino: String,
}

impl TicketBusqueda {
    /// The sanitized search term this ticket was armed with.
    pub fn termino(&self) -> &str {
        &self.termino
    }
}

/// What applying a search response did to the wizard.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ResultadoBusquedaAplicada {
    /// The ticket was superseded by a newer search; nothing changed.
    Obsoleto,
    /// Multiple candidates; the wizard moved to the disambiguation step.
    Candidatos(usize),
    /// A single result was transformed; the wizard moved to debt selection.
    Deudas,
}

pub struct Asistente {
    sistema: SistemaPago,
    mes_actual: Mes,
    paso: Paso,
    seq: u64,
    termino: String,
    candidatos: Vec<RegistroDeuda>,
    resultado: Option<ResultadoBusqueda>,
    seleccion: HashSet<String>,
    ver_todo: bool,
    email: String,
}

impl Asistente {
    pub fn new(sistema: SistemaPago) -> Self {
        Self::con_mes(sistema, Mes::actual())
    }

    /// Builds a wizard pinned to a specific current month. Visibility
    /// depends on the calendar, so tests use this constructor.
    pub fn con_mes(sistema: SistemaPago, mes_actual: Mes) -> Self {
        Self {
            sistema,
            mes_actual,
            paso: Paso::Identificacion,
            seq: 0,
            termino: String::new(),
            candidatos: Vec::new(),
            resultado: None,
            seleccion: HashSet::new(),
            ver_todo: false,
            email: String::new(),
        }
    }

    pub fn sistema(&self) -> SistemaPago {
        self.sistema
    }

    pub fn paso(&self) -> Paso {
        self.paso
    }

    pub fn resultado(&self) -> Option<&ResultadoBusqueda> {
        self.resultado.as_ref()
    }

    pub fn candidatos(&self) -> &[RegistroDeuda] {
        &self.candidatos
    }

    pub fn seleccion(&self) -> &HashSet<String> {
        &self.seleccion
    }

    pub fn ver_todo(&self) -> bool {
        self.ver_todo
    }

    /// Validates the search key and arms a new search, discarding any
    /// previous result and selection.
    pub fn iniciar_busqueda(&mut self, entrada: &str) -> Result<TicketBusqueda, PortalError> {
        let termino = validation::validar_termino(entrada)?;
        self.seq += 1;
        self.termino = termino.clone();
        self.paso = Paso::Identificacion;
        self.candidatos.clear();
        self.resultado = None;
        self.seleccion.clear();
        self.ver_todo = false;
        Ok(TicketBusqueda {
            seq: self.seq,
            termino,
        })
    }

    /// Feeds a search response back into the wizard.
    ///
    /// An empty response, or a single record that transforms into zero
    /// debts, is the "no payable debt found" business error: the wizard
    /// stays on Identificación. Multiple records move to the
    /// disambiguation step, except for installment plans, which always
    /// take the first result.
    pub fn aplicar_busqueda(
        &mut self,
        ticket: &TicketBusqueda,
        registros: Vec<RegistroDeuda>,
    ) -> Result<ResultadoBusquedaAplicada, PortalError> {
        if ticket.seq != self.seq {
            tracing::debug!(
                "descartando respuesta de búsqueda obsoleta (seq {} < {})",
                ticket.seq,
                self.seq
            );
            return Ok(ResultadoBusquedaAplicada::Obsoleto);
        }
        if registros.is_empty() {
            return Err(PortalError::SinDeudas);
        }
        if registros.len() == 1 || self.sistema == SistemaPago::Otras {
            let resultado = transformar(&registros[0], self.sistema, &ticket.termino);
            if resultado.deudas.is_empty() {
                return Err(PortalError::SinDeudas);
            }
            if self.sistema == SistemaPago::Otras {
                // Installment plans are paid in full: everything selected,
                // not user-editable.
                self.seleccion = resultado.deudas.iter().map(|d| d.id.clone()).collect();
            }
            self.resultado = Some(resultado);
            self.ver_todo = false;
            self.paso = Paso::Deuda;
            Ok(ResultadoBusquedaAplicada::Deudas)
        } else {
            let n = registros.len();
            self.candidatos = registros;
            self.ver_todo = false;
            self.paso = Paso::Seleccion;
            Ok(ResultadoBusquedaAplicada::Candidatos(n))
        }
    }

    /// Resolves the disambiguation step by record id.
    ///
    /// A candidate with zero payable debts routes back to the search
    /// step with an error; an empty confirmation is never shown.
    pub fn elegir_candidato(&mut self, record_id: &str) -> Result<(), PortalError> {
        if self.paso != Paso::Seleccion {
            return Err(PortalError::PasoInvalido("elegir candidato"));
        }
        let registro = self
            .candidatos
            .iter()
            .find(|r| r.id == record_id)
            .ok_or_else(|| {
                PortalError::InvalidInput(format!("registro desconocido '{}'", record_id))
            })?;
        let resultado = transformar(registro, self.sistema, &self.termino);
        if resultado.deudas.is_empty() {
            self.candidatos.clear();
            self.paso = Paso::Identificacion;
            return Err(PortalError::SinDeudas);
        }
        // The default-visible items start selected on this path.
        self.ver_todo = false;
        self.seleccion = filtro::visibles(&resultado.deudas, self.sistema, false, self.mes_actual)
            .into_iter()
            .map(|d| d.id.clone())
            .collect();
        self.resultado = Some(resultado);
        self.candidatos.clear();
        self.paso = Paso::Deuda;
        Ok(())
    }

    /// Drops the current result and returns to the search step.
    pub fn volver_a_buscar(&mut self) {
        self.paso = Paso::Identificacion;
        self.candidatos.clear();
        self.resultado = None;
        self.seleccion.clear();
        self.ver_todo = false;
    }

    /// Toggles one line item. A no-op for installment plans, whose items
    /// are permanently selected.
    pub fn alternar(&mut self, id: &str) {
        if self.sistema == SistemaPago::Otras {
            return;
        }
        let existe = self
            .resultado
            .as_ref()
            .is_some_and(|r| r.deudas.iter().any(|d| d.id == id));
        if !existe {
            return;
        }
        if !self.seleccion.remove(id) {
            self.seleccion.insert(id.to_string());
        }
    }

    /// Select-all / deselect-all over the currently *visible* items only.
    pub fn alternar_todo(&mut self) {
        if self.sistema == SistemaPago::Otras {
            return;
        }
        let visibles: Vec<String> = self.visibles().iter().map(|d| d.id.clone()).collect();
        let todas_elegidas =
            !visibles.is_empty() && visibles.iter().all(|id| self.seleccion.contains(id));
        if todas_elegidas {
            self.seleccion.clear();
        } else {
            self.seleccion = visibles.into_iter().collect();
        }
    }

    pub fn ver_todo_el_anio(&mut self, ver_todo: bool) {
        self.ver_todo = ver_todo;
    }

    /// Line items visible under the current month filter.
    pub fn visibles(&self) -> Vec<&DeudaItem> {
        match &self.resultado {
            Some(r) => filtro::visibles(&r.deudas, self.sistema, self.ver_todo, self.mes_actual),
            None => Vec::new(),
        }
    }

    /// Payable total: selected ∩ visible. Items hidden by the month
    /// filter never count toward the on-screen total, selected or not.
    pub fn total(&self) -> f64 {
        self.visibles()
            .iter()
            .filter(|d| self.seleccion.contains(&d.id))
            .map(|d| d.monto + d.recargo)
            .sum()
    }

    /// Moves to the confirmation step. Blocked while the total is zero.
    pub fn continuar_a_confirmacion(&mut self) -> Result<(), PortalError> {
        if self.paso != Paso::Deuda {
            return Err(PortalError::PasoInvalido("continuar al pago"));
        }
        if self.total() <= 0.0 {
            return Err(PortalError::InvalidInput(
                "seleccione al menos una deuda para continuar".to_string(),
            ));
        }
        self.paso = Paso::Confirmacion;
        Ok(())
    }

    /// Back from confirmation to the selection table.
    pub fn volver_a_seleccion(&mut self) {
        if self.paso == Paso::Confirmacion {
            self.paso = Paso::Deuda;
        }
    }

    pub fn definir_email(&mut self, email: &str) {
        self.email = email.trim().to_string();
    }

    pub fn email_valido(&self) -> bool {
        validation::email_valido(&self.email)
    }

    /// Builds the preference request for submission. Requires the
    /// confirmation step, a valid email, and a positive total; nothing
    /// is sent to the backend otherwise.
    pub fn armar_pago(&self) -> Result<PreferenceRequest, PortalError> {
        if self.paso != Paso::Confirmacion {
            return Err(PortalError::PasoInvalido("generar el pago"));
        }
        if !self.email_valido() {
            return Err(PortalError::InvalidInput(
                "Por favor, ingrese un email válido para continuar.".to_string(),
            ));
        }
        let total = self.total();
        if total <= 0.0 {
            return Err(PortalError::InvalidInput(
                "seleccione al menos una deuda para continuar".to_string(),
            ));
        }
        let resultado = self
            .resultado
            .as_ref()
            .ok_or(PortalError::PasoInvalido("generar el pago"))?;
        Ok(pago::armar_preferencia(
            resultado,
            self.sistema,
            &self.termino,
            &self.email,
            &self.seleccion,
            total,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn registro(id: &str, fields: serde_json::Value) -> RegistroDeuda {
        serde_json::from_value(json!({ "id": id, "fields": fields })).unwrap()
    }

    fn tasas_junio() -> Asistente {
        Asistente::con_mes(SistemaPago::Tasas, Mes::Junio)
    }

    #[test]
    fn flujo_directo_con_un_resultado() {
        let mut w = tasas_junio();
        let ticket = w.iniciar_busqueda("30123456").unwrap();
        let r = registro("rec1", json!({ "enero": 100, "junio": 50, "julio": 80 }));
        let aplicado = w.aplicar_busqueda(&ticket, vec![r]).unwrap();
        assert_eq!(aplicado, ResultadoBusquedaAplicada::Deudas);
        assert_eq!(w.paso(), Paso::Deuda);
        // direct path starts with nothing selected
        assert!(w.seleccion().is_empty());
        let periodos: Vec<&str> = w.visibles().iter().map(|d| d.periodo.as_str()).collect();
        assert_eq!(periodos, vec!["Enero", "Junio"]);
    }

    #[test]
    fn busqueda_vacia_es_error_de_negocio() {
        let mut w = tasas_junio();
        let ticket = w.iniciar_busqueda("30123456").unwrap();
        let err = w.aplicar_busqueda(&ticket, vec![]).unwrap_err();
        assert!(matches!(err, PortalError::SinDeudas));
        assert_eq!(w.paso(), Paso::Identificacion);
    }

    #[test]
    fn resultado_sin_deudas_es_error_de_negocio() {
        let mut w = tasas_junio();
        let ticket = w.iniciar_busqueda("30123456").unwrap();
        let r = registro("rec1", json!({ "contribuyente": "C" }));
        let err = w.aplicar_busqueda(&ticket, vec![r]).unwrap_err();
        assert!(matches!(err, PortalError::SinDeudas));
    }

    #[test]
    fn respuesta_obsoleta_se_descarta() {
        let mut w = tasas_junio();
        let vieja = w.iniciar_busqueda("30123456").unwrap();
        let nueva = w.iniciar_busqueda("27999888").unwrap();

        let r_vieja = registro("viejo", json!({ "junio": 10 }));
        let aplicado = w.aplicar_busqueda(&vieja, vec![r_vieja]).unwrap();
        assert_eq!(aplicado, ResultadoBusquedaAplicada::Obsoleto);
        assert!(w.resultado().is_none());
        assert_eq!(w.paso(), Paso::Identificacion);

        let r_nueva = registro("nuevo", json!({ "junio": 20 }));
        let aplicado = w.aplicar_busqueda(&nueva, vec![r_nueva]).unwrap();
        assert_eq!(aplicado, ResultadoBusquedaAplicada::Deudas);
        assert_eq!(w.resultado().unwrap().record_id, "nuevo");
    }

    #[test]
    fn multiples_resultados_van_a_desambiguacion() {
        let mut w = Asistente::con_mes(SistemaPago::Agua, Mes::Junio);
        let ticket = w.iniciar_busqueda("30123456").unwrap();
        let r1 = registro("a", json!({ "lote": "A-114", "Junio agua": 10 }));
        let r2 = registro("b", json!({ "lote": "B-031", "Junio agua": 20 }));
        let aplicado = w.aplicar_busqueda(&ticket, vec![r1, r2]).unwrap();
        assert_eq!(aplicado, ResultadoBusquedaAplicada::Candidatos(2));
        assert_eq!(w.paso(), Paso::Seleccion);

        w.elegir_candidato("b").unwrap();
        assert_eq!(w.paso(), Paso::Deuda);
        assert_eq!(w.resultado().unwrap().record_id, "b");
        // disambiguation path preselects the default-visible items
        assert!(w.seleccion().contains("Junio-agua-b"));
        assert_eq!(w.total(), 20.0);
    }

    #[test]
    fn candidato_sin_deudas_vuelve_a_buscar() {
        let mut w = Asistente::con_mes(SistemaPago::Agua, Mes::Junio);
        let ticket = w.iniciar_busqueda("30123456").unwrap();
        let r1 = registro("a", json!({ "Junio agua": 10 }));
        let r2 = registro("b", json!({ "lote": "B-031" }));
        w.aplicar_busqueda(&ticket, vec![r1, r2]).unwrap();

        let err = w.elegir_candidato("b").unwrap_err();
        assert!(matches!(err, PortalError::SinDeudas));
        assert_eq!(w.paso(), Paso::Identificacion);
        assert!(w.resultado().is_none());
    }

    #[test]
    fn otras_toma_el_primer_resultado_y_selecciona_todo() {
        let mut w = Asistente::con_mes(SistemaPago::Otras, Mes::Junio);
        let ticket = w.iniciar_busqueda("Ana Suárez").unwrap();
        let r1 = registro("p1", json!({ "monto total deuda": 25000 }));
        let r2 = registro("p2", json!({ "monto total deuda": 10 }));
        let aplicado = w.aplicar_busqueda(&ticket, vec![r1, r2]).unwrap();
        assert_eq!(aplicado, ResultadoBusquedaAplicada::Deudas);
        assert_eq!(w.resultado().unwrap().record_id, "p1");
        assert_eq!(w.total(), 25000.0);

        // selection is not user-editable
        w.alternar("p1");
        assert_eq!(w.total(), 25000.0);
        w.alternar_todo();
        assert_eq!(w.total(), 25000.0);
    }

    #[test]
    fn alternar_todo_opera_sobre_visibles() {
        let mut w = tasas_junio();
        let ticket = w.iniciar_busqueda("30123456").unwrap();
        let r = registro("rec1", json!({ "enero": 100, "junio": 50, "julio": 80 }));
        w.aplicar_busqueda(&ticket, vec![r]).unwrap();

        w.alternar_todo();
        // julio is hidden, so only the two visible items got selected
        assert_eq!(w.seleccion().len(), 2);
        assert_eq!(w.total(), 150.0);

        w.alternar_todo();
        assert!(w.seleccion().is_empty());
        assert_eq!(w.total(), 0.0);
    }

    #[test]
    fn total_excluye_items_ocultos_aunque_esten_seleccionados() {
        let mut w = tasas_junio();
        let ticket = w.iniciar_busqueda("30123456").unwrap();
        let r = registro("rec1", json!({ "enero": 100, "julio": 80 }));
        w.aplicar_busqueda(&ticket, vec![r]).unwrap();

        w.ver_todo_el_anio(true);
        w.alternar("julio-rec1");
        w.alternar("enero-rec1");
        assert_eq!(w.total(), 180.0);

        // hiding julio again drops it from the on-screen total...
        w.ver_todo_el_anio(false);
        assert_eq!(w.total(), 100.0);

        // ...but it stays in the payload once the payment is built
        w.continuar_a_confirmacion().unwrap();
        w.definir_email("vecino@example.com");
        let req = w.armar_pago().unwrap();
        assert_eq!(req.items_to_pay.meses.get("julio"), Some(&true));
        assert_eq!(req.unit_price, 100.0);
    }

    #[test]
    fn continuar_bloqueado_con_total_cero() {
        let mut w = tasas_junio();
        let ticket = w.iniciar_busqueda("30123456").unwrap();
        let r = registro("rec1", json!({ "junio": 50 }));
        w.aplicar_busqueda(&ticket, vec![r]).unwrap();
        assert!(w.continuar_a_confirmacion().is_err());
        w.alternar("junio-rec1");
        assert!(w.continuar_a_confirmacion().is_ok());
    }

    #[test]
    fn email_invalido_bloquea_el_pago() {
        let mut w = tasas_junio();
        let ticket = w.iniciar_busqueda("30123456").unwrap();
        let r = registro("rec1", json!({ "junio": 50 }));
        w.aplicar_busqueda(&ticket, vec![r]).unwrap();
        w.alternar("junio-rec1");
        w.continuar_a_confirmacion().unwrap();

        w.definir_email("not-an-email");
        assert!(!w.email_valido());
        assert!(matches!(
            w.armar_pago().unwrap_err(),
            PortalError::InvalidInput(_)
        ));

        w.definir_email("vecino@example.com");
        assert!(w.armar_pago().is_ok());
    }

    #[test]
    fn volver_a_buscar_descarta_todo() {
        let mut w = tasas_junio();
        let ticket = w.iniciar_busqueda("30123456").unwrap();
        let r = registro("rec1", json!({ "junio": 50 }));
        w.aplicar_busqueda(&ticket, vec![r]).unwrap();
        w.alternar("junio-rec1");

        w.volver_a_buscar();
        assert_eq!(w.paso(), Paso::Identificacion);
        assert!(w.resultado().is_none());
        assert!(w.seleccion().is_empty());
        assert_eq!(w.total(), 0.0);
    }

    #[test]
    fn nueva_busqueda_reinicia_seleccion_y_filtro() {
        let mut w = tasas_junio();
        let ticket = w.iniciar_busqueda("30123456").unwrap();
        let r = registro("rec1", json!({ "junio": 50 }));
        w.aplicar_busqueda(&ticket, vec![r]).unwrap();
        w.alternar("junio-rec1");
        w.ver_todo_el_anio(true);

        let _ticket2 = w.iniciar_busqueda("27999888").unwrap();
        assert!(w.seleccion().is_empty());
        assert!(!w.ver_todo());
        assert!(w.resultado().is_none());
    }

    #[test]
    fn termino_invalido_no_arma_busqueda() {
        let mut w = tasas_junio();
        assert!(w.iniciar_busqueda("   ").is_err());
    }
}
