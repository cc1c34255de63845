use anyhow::Result;
use clap::Args;
use portalpagos_lib::{
    Asistente, ClientePortal, ResultadoBusquedaAplicada, SistemaPago,
};

use crate::output::{
    format_monto, print_candidatos_json, print_candidatos_table, print_deudas_json,
    print_deudas_table, OutputFormat,
};

#[derive(Args)]
pub struct DeudasArgs {
    /// Payment system: tasas, agua, patente, otras
    #[arg(long)]
    pub sistema: String,

    /// Search key: DNI for tasas/agua/patente, full name for otras
    #[arg(long)]
    pub busqueda: String,

    /// Record id to pick when the search matches several records
    #[arg(long)]
    pub registro: Option<String>,

    /// Show every month of the year, not just due periods
    #[arg(long)]
    pub todo_el_anio: bool,
}

pub async fn run(args: &DeudasArgs, cliente: &ClientePortal, format: &OutputFormat) -> Result<()> {
    let sistema = args
        .sistema
        .parse::<SistemaPago>()
        .map_err(anyhow::Error::msg)?;
    let mut asistente = Asistente::new(sistema);

    let aplicado = cliente
        .buscar_en_asistente(&mut asistente, &args.busqueda)
        .await?;

    if let ResultadoBusquedaAplicada::Candidatos(n) = aplicado {
        match &args.registro {
            Some(registro) => asistente.elegir_candidato(registro)?,
            None => {
                match format {
                    OutputFormat::Json => {
                        print_candidatos_json(asistente.candidatos(), sistema)?
                    }
                    OutputFormat::Table => {
                        println!("Se encontraron {} registros para '{}':", n, args.busqueda);
                        print_candidatos_table(asistente.candidatos(), sistema);
                        println!("Repita el comando con --registro <id> para ver sus deudas.");
                    }
                }
                return Ok(());
            }
        }
    }

    if args.todo_el_anio {
        asistente.ver_todo_el_anio(true);
    }

    let visibles = asistente.visibles();
    match format {
        OutputFormat::Json => print_deudas_json(&visibles, asistente.seleccion())?,
        OutputFormat::Table => {
            if let Some(resultado) = asistente.resultado() {
                if !resultado.contribuyente.is_empty() {
                    println!("Contribuyente: {}", resultado.contribuyente);
                }
                if !resultado.referencia.is_empty() {
                    println!("{}", resultado.referencia);
                }
            }
            print_deudas_table(&visibles, asistente.seleccion());
            println!("Total seleccionado: {}", format_monto(asistente.total()));
        }
    }
    Ok(())
}
