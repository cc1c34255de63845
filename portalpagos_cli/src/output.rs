use std::collections::HashSet;

use anyhow::Result;
use portalpagos_lib::types::{HistorialRecord, RegistroDeuda, SistemaPago};
use portalpagos_lib::DeudaItem;
use serde::Serialize;
use tabled::{Table, Tabled};

#[derive(Clone, Debug)]
pub enum OutputFormat {
    Table,
    Json,
}

#[derive(Tabled, Serialize)]
struct CandidatoRow {
    #[tabled(rename = "Registro")]
    #[serde(rename = "Registro")]
    registro: String,
    #[tabled(rename = "Referencia")]
    #[serde(rename = "Referencia")]
    referencia: String,
    #[tabled(rename = "Contribuyente")]
    #[serde(rename = "Contribuyente")]
    contribuyente: String,
}

#[derive(Tabled, Serialize)]
struct DeudaRow {
    #[tabled(rename = "Sel")]
    #[serde(rename = "Sel")]
    seleccionada: String,
    #[tabled(rename = "Período")]
    #[serde(rename = "Período")]
    periodo: String,
    #[tabled(rename = "Concepto")]
    #[serde(rename = "Concepto")]
    concepto: String,
    #[tabled(rename = "Monto")]
    #[serde(rename = "Monto")]
    monto: String,
}

#[derive(Tabled, Serialize)]
struct HistorialRow {
    #[tabled(rename = "Estado")]
    #[serde(rename = "Estado")]
    estado: String,
    #[tabled(rename = "Nro. de Operación")]
    #[serde(rename = "Nro. de Operación")]
    operacion: String,
    #[tabled(rename = "Fecha y Hora")]
    #[serde(rename = "Fecha y Hora")]
    fecha: String,
    #[tabled(rename = "Monto Total")]
    #[serde(rename = "Monto Total")]
    monto: String,
}

pub fn format_monto(monto: f64) -> String {
    format!("${:.2}", monto)
}

// -- Row builders --

/// The disambiguation list shows a system-appropriate identifier: the
/// plate for Patente, the water connection for Agua, the lot for Tasas.
fn build_candidato_rows(registros: &[RegistroDeuda], sistema: SistemaPago) -> Vec<CandidatoRow> {
    registros
        .iter()
        .map(|r| {
            let referencia = match sistema {
                SistemaPago::Patente => r
                    .texto("patente")
                    .unwrap_or("Patente Desconocida")
                    .to_string(),
                SistemaPago::Agua => {
                    format!("Conexión: {}", r.texto("lote").unwrap_or("Desconocida"))
                }
                _ => match r.texto("lote") {
                    Some(lote) => format!("Lote: {}", lote),
                    None => "Lote Desconocido".to_string(),
                },
            };
            let contribuyente = r
                .texto("titular")
                .or_else(|| r.texto("contribuyente"))
                .unwrap_or("Desconocido")
                .to_string();
            CandidatoRow {
                registro: r.id.clone(),
                referencia,
                contribuyente,
            }
        })
        .collect()
}

fn build_deuda_rows(deudas: &[&DeudaItem], seleccion: &HashSet<String>) -> Vec<DeudaRow> {
    deudas
        .iter()
        .map(|d| DeudaRow {
            seleccionada: if seleccion.contains(&d.id) { "x" } else { "" }.to_string(),
            periodo: d.periodo.clone(),
            concepto: d.descripcion.clone(),
            monto: format_monto(d.monto + d.recargo),
        })
        .collect()
}

fn build_historial_row(record: &HistorialRecord) -> HistorialRow {
    HistorialRow {
        estado: record.fields.estado.clone(),
        operacion: record
            .fields
            .mp_payment_id
            .clone()
            .unwrap_or_else(|| "#N/A".to_string()),
        fecha: record
            .fields
            .timestamp
            .map(|t| {
                t.with_timezone(&chrono::Local)
                    .format("%d/%m/%Y %H:%M")
                    .to_string()
            })
            .unwrap_or_else(|| "N/A".to_string()),
        monto: format_monto(record.fields.monto),
    }
}

// -- Table output --

pub fn print_candidatos_table(registros: &[RegistroDeuda], sistema: SistemaPago) {
    println!("{}", Table::new(build_candidato_rows(registros, sistema)));
}

pub fn print_deudas_table(deudas: &[&DeudaItem], seleccion: &HashSet<String>) {
    println!("{}", Table::new(build_deuda_rows(deudas, seleccion)));
}

pub fn print_historial_table(record: &HistorialRecord) {
    println!("{}", Table::new(vec![build_historial_row(record)]));
}

// -- JSON output --

pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub fn print_candidatos_json(registros: &[RegistroDeuda], sistema: SistemaPago) -> Result<()> {
    print_json(&build_candidato_rows(registros, sistema))
}

pub fn print_deudas_json(deudas: &[&DeudaItem], seleccion: &HashSet<String>) -> Result<()> {
    print_json(&build_deuda_rows(deudas, seleccion))
}

pub fn print_historial_json(record: &HistorialRecord) -> Result<()> {
    print_json(&build_historial_row(record))
}
