use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use portalpagos_lib::ClientePortal;

#[derive(Args)]
pub struct ComprobanteArgs {
    /// History record id the receipt belongs to
    #[arg(long)]
    pub registro: String,

    /// Output file (defaults to comprobante-<registro>.pdf)
    #[arg(long)]
    pub salida: Option<PathBuf>,
}

pub async fn run(args: &ComprobanteArgs, cliente: &ClientePortal) -> Result<()> {
    let bytes = cliente.comprobante(&args.registro).await?;
    let salida = args
        .salida
        .clone()
        .unwrap_or_else(|| PathBuf::from(format!("comprobante-{}.pdf", args.registro)));
    std::fs::write(&salida, &bytes)
        .with_context(|| format!("no se pudo escribir {}", salida.display()))?;
    println!(
        "Comprobante guardado en {} ({} bytes)",
        salida.display(),
        bytes.len()
    );
    Ok(())
}
