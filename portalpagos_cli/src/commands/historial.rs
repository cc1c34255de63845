use std::time::Duration;

use anyhow::Result;
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use portalpagos_lib::ClientePortal;

use crate::output::{print_historial_json, print_historial_table, OutputFormat};

#[derive(Args)]
pub struct HistorialArgs {
    /// Gateway payment id (the "Nro. de Operación" on the receipt)
    #[arg(long)]
    pub payment_id: String,

    /// Keep polling until the payment reaches a final state
    #[arg(long)]
    pub watch: bool,

    /// Seconds between polls when watching
    #[arg(long, default_value = "30")]
    pub intervalo: u64,
}

fn es_estado_final(estado: &str) -> bool {
    !matches!(estado, "pending" | "in_process")
}

pub async fn run(
    args: &HistorialArgs,
    cliente: &ClientePortal,
    format: &OutputFormat,
) -> Result<()> {
    let record = cliente.historial(&args.payment_id).await?;
    match format {
        OutputFormat::Json => print_historial_json(&record)?,
        OutputFormat::Table => print_historial_table(&record),
    }

    if !args.watch || es_estado_final(&record.fields.estado) {
        return Ok(());
    }

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::with_template("{spinner} {msg}")?);
    spinner.enable_steady_tick(Duration::from_millis(120));
    spinner.set_message(format!(
        "esperando el estado final del pago {}",
        args.payment_id
    ));

    let mut intervalo = tokio::time::interval(Duration::from_secs(args.intervalo.max(1)));
    intervalo.tick().await; // the first tick fires immediately

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                spinner.finish_and_clear();
                println!("Consulta interrumpida.");
                return Ok(());
            }
            _ = intervalo.tick() => {}
        }

        let record = match cliente.historial(&args.payment_id).await {
            Ok(r) => r,
            Err(e) => {
                // one failed poll is not fatal while watching
                tracing::warn!("consulta de historial falló: {}", e);
                continue;
            }
        };
        if es_estado_final(&record.fields.estado) {
            spinner.finish_and_clear();
            match format {
                OutputFormat::Json => print_historial_json(&record)?,
                OutputFormat::Table => print_historial_table(&record),
            }
            return Ok(());
        }
        spinner.set_message(format!(
            "pago {} sigue en '{}'",
            args.payment_id, record.fields.estado
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn estados_pendientes_no_son_finales() {
        assert!(!es_estado_final("pending"));
        assert!(!es_estado_final("in_process"));
        assert!(es_estado_final("approved"));
        assert!(es_estado_final("rejected"));
    }
}
