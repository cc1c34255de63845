//! Input validation for the wizard's two free-text fields.

use std::sync::OnceLock;

use regex::Regex;

use crate::error::PortalError;

pub const MAX_TERMINO_LEN: usize = 100;

fn email_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // Same acceptance rule the portal has always used: something@something.something.
    RE.get_or_init(|| Regex::new(r"\S+@\S+\.\S+").expect("email regex compiles"))
}

/// Syntactic email check. Deliverability is the mail server's problem.
pub fn email_valido(email: &str) -> bool {
    email_re().is_match(email)
}

/// Validates and sanitizes a search term (DNI, name, or plate): strips
/// ASCII control characters, trims whitespace, and enforces a length cap.
pub fn validar_termino(input: &str) -> Result<String, PortalError> {
    if input.len() > MAX_TERMINO_LEN {
        return Err(PortalError::InvalidInput(format!(
            "la búsqueda supera el máximo de {} caracteres",
            MAX_TERMINO_LEN
        )));
    }
    let saneado: String = input
        .chars()
        .filter(|c| !c.is_ascii_control() || *c == ' ')
        .collect::<String>()
        .trim()
        .to_string();
    if saneado.is_empty() {
        return Err(PortalError::InvalidInput(
            "ingrese un valor para buscar".to_string(),
        ));
    }
    Ok(saneado)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_accepts_plain_addresses() {
        assert!(email_valido("vecino@example.com"));
        assert!(email_valido("a@b.c"));
    }

    #[test]
    fn email_rejects_malformed() {
        assert!(!email_valido("not-an-email"));
        assert!(!email_valido("sin-arroba.com"));
        assert!(!email_valido("falta@dominio"));
        assert!(!email_valido(""));
    }

    #[test]
    fn termino_normal() {
        assert_eq!(validar_termino("30123456").unwrap(), "30123456");
        assert_eq!(validar_termino("  Juan Pérez  ").unwrap(), "Juan Pérez");
    }

    #[test]
    fn termino_strips_control_chars() {
        assert_eq!(validar_termino("301\x0023456\x01").unwrap(), "30123456");
    }

    #[test]
    fn termino_empty_after_trim_rejected() {
        assert!(validar_termino("   ").is_err());
        assert!(validar_termino("").is_err());
    }

    #[test]
    fn termino_too_long_rejected() {
        let largo = "9".repeat(MAX_TERMINO_LEN + 1);
        assert!(validar_termino(&largo).is_err());
    }
}
