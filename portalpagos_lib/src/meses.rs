//! Calendar months as the backend names them.

use chrono::{Datelike, Local};

/// A calendar month. The backend's record fields are keyed by Spanish
/// month name, lowercase or capitalized depending on the table.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug)]
pub enum Mes {
    Enero,
    Febrero,
    Marzo,
    Abril,
    Mayo,
    Junio,
    Julio,
    Agosto,
    Septiembre,
    Octubre,
    Noviembre,
    Diciembre,
}

impl Mes {
    /// All twelve months, January through December.
    pub const ALL: [Mes; 12] = [
        Mes::Enero,
        Mes::Febrero,
        Mes::Marzo,
        Mes::Abril,
        Mes::Mayo,
        Mes::Junio,
        Mes::Julio,
        Mes::Agosto,
        Mes::Septiembre,
        Mes::Octubre,
        Mes::Noviembre,
        Mes::Diciembre,
    ];

    /// Zero-based month index (Enero = 0).
    pub fn indice(&self) -> usize {
        *self as usize
    }

    /// Lowercase name, as the Tasas table keys its fields.
    pub fn nombre(&self) -> &'static str {
        match self {
            Mes::Enero => "enero",
            Mes::Febrero => "febrero",
            Mes::Marzo => "marzo",
            Mes::Abril => "abril",
            Mes::Mayo => "mayo",
            Mes::Junio => "junio",
            Mes::Julio => "julio",
            Mes::Agosto => "agosto",
            Mes::Septiembre => "septiembre",
            Mes::Octubre => "octubre",
            Mes::Noviembre => "noviembre",
            Mes::Diciembre => "diciembre",
        }
    }

    /// Capitalized name, as the Patente and Agua tables key their fields.
    pub fn capitalizado(&self) -> &'static str {
        match self {
            Mes::Enero => "Enero",
            Mes::Febrero => "Febrero",
            Mes::Marzo => "Marzo",
            Mes::Abril => "Abril",
            Mes::Mayo => "Mayo",
            Mes::Junio => "Junio",
            Mes::Julio => "Julio",
            Mes::Agosto => "Agosto",
            Mes::Septiembre => "Septiembre",
            Mes::Octubre => "Octubre",
            Mes::Noviembre => "Noviembre",
            Mes::Diciembre => "Diciembre",
        }
    }

    /// Case-insensitive lookup by Spanish name.
    pub fn from_nombre(nombre: &str) -> Option<Mes> {
        let lower = nombre.trim().to_lowercase();
        Mes::ALL.iter().copied().find(|m| m.nombre() == lower)
    }

    /// The current calendar month, from the local clock.
    pub fn actual() -> Mes {
        // month0() is already zero-based.
        Mes::ALL[Local::now().month0() as usize]
    }
}

impl std::fmt::Display for Mes {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.capitalizado())
    }
}
