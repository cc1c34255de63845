//! Debt transformation: raw backend records into payable line items.
//!
//! Each payment system stores its debts under a different field layout
//! (month names lowercase for Tasas, capitalized for Patente and Agua,
//! a single total for installment plans). The casing differences mirror
//! the backend schema as-is; normalizing them here could mask upstream
//! data bugs.

use portalpagos_api::types::{RegistroDeuda, SistemaPago};

use crate::meses::Mes;

/// Structural kind of a line item. Downstream logic (visibility filter,
/// payload construction) dispatches on this tag instead of re-parsing
/// display labels.
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum TipoItem {
    /// Accumulated prior debt ("Deuda Acumulada").
    Acumulada,
    /// Single installment-plan debt ("Deuda General").
    General,
    /// A monthly installment.
    Mensual(Mes),
}

/// One payable line item derived from a raw record.
#[derive(Clone, Debug)]
pub struct DeudaItem {
    /// Unique id, derived from the period and the record id.
    pub id: String,
    /// Display label for the period column.
    pub periodo: String,
    /// Category label for the concept column.
    pub descripcion: String,
    pub monto: f64,
    /// Late-fee surcharge. Reserved: always 0 until business rules for
    /// overdue periods are confirmed.
    pub recargo: f64,
    pub tipo: TipoItem,
}

impl DeudaItem {
    /// The month this item belongs to, when it is a monthly installment.
    pub fn mes(&self) -> Option<Mes> {
        match self.tipo {
            TipoItem::Mensual(mes) => Some(mes),
            _ => None,
        }
    }

    /// Accumulated and general debts sit outside the monthly calendar.
    pub fn es_deuda_global(&self) -> bool {
        matches!(self.tipo, TipoItem::Acumulada | TipoItem::General)
    }
}

/// The outcome of transforming one selected raw record.
#[derive(Clone, Debug)]
pub struct ResultadoBusqueda {
    pub contribuyente: String,
    pub referencia: String,
    /// Line items in display order: accumulated debt first (when
    /// present), then months January through December.
    pub deudas: Vec<DeudaItem>,
    pub record_id: String,
}

/// Converts a raw record into a normalized search result for the given
/// payment system. The search term is the fallback reference number.
///
/// Zero, negative, absent, or unparsable amounts never produce items.
/// Callers must treat an empty `deudas` list as "no payable debt found"
/// and show an error instead of proceeding.
pub fn transformar(
    registro: &RegistroDeuda,
    sistema: SistemaPago,
    termino: &str,
) -> ResultadoBusqueda {
    let record_id = registro.id.clone();
    let mut deudas = Vec::new();

    let (contribuyente, referencia) = match sistema {
        SistemaPago::Otras => (
            registro
                .texto("nombre y apellido")
                .unwrap_or("N/A")
                .to_string(),
            termino.to_string(),
        ),
        _ => (
            registro
                .texto("titular")
                .or_else(|| registro.texto("contribuyente"))
                .unwrap_or("N/A")
                .to_string(),
            registro
                .texto("patente")
                .or_else(|| registro.texto("lote"))
                .unwrap_or(termino)
                .to_string(),
        ),
    };

    match sistema {
        SistemaPago::Agua => {
            for mes in Mes::ALL {
                let campo_agua = format!("{} agua", mes.capitalizado());
                if let Some(monto) = registro.monto_positivo(&campo_agua) {
                    deudas.push(DeudaItem {
                        id: format!("{}-agua-{}", mes.capitalizado(), record_id),
                        periodo: format!("{} (Agua)", mes.capitalizado()),
                        descripcion: "Cuota Agua".to_string(),
                        monto,
                        recargo: 0.0,
                        tipo: TipoItem::Mensual(mes),
                    });
                }
                let campo_comercial = format!("{} Comercial", mes.capitalizado());
                if let Some(monto) = registro.monto_positivo(&campo_comercial) {
                    deudas.push(DeudaItem {
                        id: format!("{}-comercial-{}", mes.capitalizado(), record_id),
                        periodo: format!("{} (Comercial)", mes.capitalizado()),
                        descripcion: "Cuota Comercial".to_string(),
                        monto,
                        recargo: 0.0,
                        tipo: TipoItem::Mensual(mes),
                    });
                }
            }
        }
        SistemaPago::Tasas => {
            if let Some(monto) = registro.monto_positivo("deuda") {
                deudas.push(acumulada(&record_id, sistema, monto));
            }
            for mes in Mes::ALL {
                if let Some(monto) = registro.monto_positivo(mes.nombre()) {
                    deudas.push(DeudaItem {
                        id: format!("{}-{}", mes.nombre(), record_id),
                        periodo: mes.capitalizado().to_string(),
                        descripcion: "Cuota Mensual".to_string(),
                        monto,
                        recargo: 0.0,
                        tipo: TipoItem::Mensual(mes),
                    });
                }
            }
        }
        SistemaPago::Patente => {
            if let Some(monto) = registro.monto_positivo("Deuda patente") {
                deudas.push(acumulada(&record_id, sistema, monto));
            }
            for mes in Mes::ALL {
                if let Some(monto) = registro.monto_positivo(mes.capitalizado()) {
                    deudas.push(DeudaItem {
                        id: format!("{}-{}", mes.capitalizado(), record_id),
                        periodo: mes.capitalizado().to_string(),
                        descripcion: "Cuota Mensual".to_string(),
                        monto,
                        recargo: 0.0,
                        tipo: TipoItem::Mensual(mes),
                    });
                }
            }
        }
        SistemaPago::Otras => {
            if let Some(monto) = registro.monto_positivo("monto total deuda") {
                deudas.push(DeudaItem {
                    id: record_id.clone(),
                    periodo: "Deuda General".to_string(),
                    descripcion: registro
                        .texto("deuda en concepto de")
                        .unwrap_or("Deuda General")
                        .to_string(),
                    monto,
                    recargo: 0.0,
                    tipo: TipoItem::General,
                });
            }
        }
    }

    ResultadoBusqueda {
        contribuyente,
        referencia,
        deudas,
        record_id,
    }
}

fn acumulada(record_id: &str, sistema: SistemaPago, monto: f64) -> DeudaItem {
    DeudaItem {
        id: format!("deuda-{}", record_id),
        periodo: "Deuda Acumulada".to_string(),
        descripcion: format!("Deuda {}", sistema.nombre()),
        monto,
        recargo: 0.0,
        tipo: TipoItem::Acumulada,
    }
}
