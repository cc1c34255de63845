mod commands;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use portalpagos_lib::ClientePortal;

use crate::output::OutputFormat;

#[derive(Parser)]
#[command(name = "portalpagos")]
#[command(about = "Portal de pagos municipal: consulta y pago de deudas")]
struct Cli {
    /// Output format: table or json
    #[arg(long, default_value = "table", global = true)]
    output: String,

    /// Base URL of the payment backend API
    #[arg(
        long,
        global = true,
        env = "PORTAL_API_URL",
        default_value = "http://localhost:10000/api"
    )]
    api_url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search outstanding debts and show the selection table
    Deudas(commands::deudas::DeudasArgs),
    /// Run the full payment flow and print the gateway redirect URL
    Pagar(commands::pagar::PagarArgs),
    /// Look up a payment by its gateway payment id
    Historial(commands::historial::HistorialArgs),
    /// Download the receipt document for a payment record
    Comprobante(commands::comprobante::ComprobanteArgs),
    /// Interpret a gateway return URL
    Retorno(commands::retorno::RetornoArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("portalpagos=info".parse().unwrap()),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();

    let format = match cli.output.as_str() {
        "json" => OutputFormat::Json,
        _ => OutputFormat::Table,
    };

    let cliente = ClientePortal::with_base_url(&cli.api_url);

    match &cli.command {
        Commands::Deudas(args) => commands::deudas::run(args, &cliente, &format).await?,
        Commands::Pagar(args) => commands::pagar::run(args, &cliente, &format).await?,
        Commands::Historial(args) => commands::historial::run(args, &cliente, &format).await?,
        Commands::Comprobante(args) => commands::comprobante::run(args, &cliente).await?,
        Commands::Retorno(args) => commands::retorno::run(args, &format)?,
    }

    Ok(())
}
