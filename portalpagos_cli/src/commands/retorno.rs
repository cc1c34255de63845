use anyhow::Result;
use clap::Args;
use portalpagos_lib::retorno::{self, Retorno};

use crate::output::{print_json, OutputFormat};

#[derive(Args)]
pub struct RetornoArgs {
    /// Full return URL the gateway redirected to
    #[arg(long)]
    pub url: String,
}

pub fn run(args: &RetornoArgs, format: &OutputFormat) -> Result<()> {
    match retorno::interpretar(&args.url) {
        Retorno::Resultado {
            estado,
            payment_id,
            historial_record_id,
        } => match format {
            OutputFormat::Json => print_json(&serde_json::json!({
                "estado": estado.to_string(),
                "payment_id": payment_id,
                "historial_record_id": historial_record_id,
                "url_limpia": retorno::sin_parametros(&args.url),
            }))?,
            OutputFormat::Table => {
                println!("Estado: {}", estado);
                println!("Nro. de Operación: {}", payment_id);
                println!("Registro de historial: {}", historial_record_id);
                if let Some(limpia) = retorno::sin_parametros(&args.url) {
                    println!("URL sin parámetros: {}", limpia);
                }
            }
        },
        Retorno::MenuPrincipal => match format {
            OutputFormat::Json => print_json(&serde_json::json!({
                "destino": "menu_principal",
            }))?,
            OutputFormat::Table => {
                println!("Parámetros de retorno incompletos: volver al menú principal.");
            }
        },
    }
    Ok(())
}
