use anyhow::{bail, Result};
use clap::Args;
use portalpagos_lib::{
    pago, Asistente, ClientePortal, Mes, ResultadoBusquedaAplicada, SistemaPago, TipoItem,
};

use crate::output::{
    format_monto, print_candidatos_table, print_json, OutputFormat,
};

#[derive(Args)]
pub struct PagarArgs {
    /// Payment system: tasas, agua, patente, otras
    #[arg(long)]
    pub sistema: String,

    /// Search key: DNI for tasas/agua/patente, full name for otras
    #[arg(long)]
    pub busqueda: String,

    /// Record id to pick when the search matches several records
    #[arg(long)]
    pub registro: Option<String>,

    /// Periods to pay, comma separated: month names plus "deuda" for the
    /// accumulated balance (e.g. "deuda,enero,febrero")
    #[arg(long)]
    pub periodos: Option<String>,

    /// Pay every currently due period
    #[arg(long)]
    pub todo: bool,

    /// Email address for the payment receipt
    #[arg(long)]
    pub email: String,
}

/// One token of `--periodos`.
enum Periodo {
    Deuda,
    Mes(Mes),
}

fn parse_periodos(entrada: &str) -> Result<Vec<Periodo>> {
    entrada
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(|token| {
            if token.eq_ignore_ascii_case("deuda") {
                Ok(Periodo::Deuda)
            } else {
                match Mes::from_nombre(token) {
                    Some(mes) => Ok(Periodo::Mes(mes)),
                    None => bail!("período desconocido '{}'", token),
                }
            }
        })
        .collect()
}

pub async fn run(args: &PagarArgs, cliente: &ClientePortal, format: &OutputFormat) -> Result<()> {
    let sistema = args
        .sistema
        .parse::<SistemaPago>()
        .map_err(anyhow::Error::msg)?;
    if sistema != SistemaPago::Otras && args.periodos.is_none() && !args.todo {
        bail!("indique qué pagar: --periodos o --todo");
    }

    let mut asistente = Asistente::new(sistema);
    let aplicado = cliente
        .buscar_en_asistente(&mut asistente, &args.busqueda)
        .await?;

    if let ResultadoBusquedaAplicada::Candidatos(n) = aplicado {
        let Some(registro) = &args.registro else {
            println!("Se encontraron {} registros para '{}':", n, args.busqueda);
            print_candidatos_table(asistente.candidatos(), sistema);
            bail!("varios registros coinciden; repita con --registro <id>");
        };
        asistente.elegir_candidato(registro)?;
    }

    if sistema != SistemaPago::Otras {
        aplicar_seleccion(&mut asistente, args)?;
    }

    asistente.continuar_a_confirmacion()?;
    asistente.definir_email(&args.email);
    let request = asistente.armar_pago()?;
    let total = asistente.total();

    let respuesta = cliente.crear_preferencia(&request).await?;
    let url = pago::url_de_pago(&respuesta)?;

    match format {
        OutputFormat::Json => print_json(&serde_json::json!({
            "preference_id": respuesta.preference_id,
            "total": total,
            "url_de_pago": url,
        }))?,
        OutputFormat::Table => {
            println!("Total a pagar: {}", format_monto(total));
            println!("Continúe el pago en: {}", url);
        }
    }
    Ok(())
}

/// Replaces the wizard's default selection with what the flags asked
/// for. `--periodos` can name months outside the due window, so the
/// full-year view is enabled first; otherwise a named future month
/// would not count toward the total.
fn aplicar_seleccion(asistente: &mut Asistente, args: &PagarArgs) -> Result<()> {
    if args.todo {
        let visibles: Vec<String> = asistente.visibles().iter().map(|d| d.id.clone()).collect();
        for id in visibles {
            if !asistente.seleccion().contains(&id) {
                asistente.alternar(&id);
            }
        }
        return Ok(());
    }

    let periodos = match &args.periodos {
        Some(p) => parse_periodos(p)?,
        None => return Ok(()),
    };
    let pagar_deuda = periodos.iter().any(|p| matches!(p, Periodo::Deuda));
    let meses: Vec<Mes> = periodos
        .iter()
        .filter_map(|p| match p {
            Periodo::Mes(mes) => Some(*mes),
            Periodo::Deuda => None,
        })
        .collect();

    asistente.ver_todo_el_anio(true);
    let objetivo: Vec<(String, bool)> = asistente
        .resultado()
        .map(|r| {
            r.deudas
                .iter()
                .map(|d| {
                    let querida = match d.tipo {
                        TipoItem::Acumulada | TipoItem::General => pagar_deuda,
                        TipoItem::Mensual(mes) => meses.contains(&mes),
                    };
                    (d.id.clone(), querida)
                })
                .collect()
        })
        .unwrap_or_default();
    for (id, querida) in objetivo {
        if asistente.seleccion().contains(&id) != querida {
            asistente.alternar(&id);
        }
    }
    Ok(())
}
