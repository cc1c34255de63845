//! Month visibility filter for the debt-selection step.

use portalpagos_api::types::SistemaPago;

use crate::meses::Mes;
use crate::transform::DeudaItem;

/// Returns the line items visible on the selection screen.
///
/// Accumulated and general debts are always shown. Monthly items are
/// shown when they belong to the current month, or to a past month with
/// an outstanding amount; future months stay hidden unless `ver_todo`
/// is set. Installment plans (Otras) bypass the filter entirely.
pub fn visibles<'a>(
    deudas: &'a [DeudaItem],
    sistema: SistemaPago,
    ver_todo: bool,
    mes_actual: Mes,
) -> Vec<&'a DeudaItem> {
    if sistema == SistemaPago::Otras || ver_todo {
        return deudas.iter().collect();
    }
    deudas
        .iter()
        .filter(|d| match d.mes() {
            None => d.es_deuda_global(),
            Some(mes) => {
                mes.indice() == mes_actual.indice()
                    || (mes.indice() < mes_actual.indice() && d.monto > 0.0)
            }
        })
        .collect()
}
