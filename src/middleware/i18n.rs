// src/middleware/i18n.rs

use axum::extract::FromRequestParts;
use axum::http::{header, request::Parts};

const DEFAULT_LANG: &str = "en";

// Extrator de idioma usado para traduzir as mensagens de erro
#[derive(Debug, Clone)]
pub struct Locale(pub String);

impl Locale {
    pub fn is_portuguese(&self) -> bool {
        self.0 == "pt"
    }

    fn from_header(header_str: &str) -> Self {
        let lang = accept_language::parse(header_str)
            .first() // Pega o idioma preferido (ex: "pt-BR")
            .map(|tag| {
                // "pt-BR" -> "pt"
                tag.split('-').next().unwrap_or(tag).to_lowercase()
            })
            .unwrap_or_else(|| DEFAULT_LANG.to_string());

        Locale(lang)
    }
}

impl Default for Locale {
    fn default() -> Self {
        Locale(DEFAULT_LANG.to_string())
    }
}

impl<S> FromRequestParts<S> for Locale
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let locale = parts
            .headers
            .get(header::ACCEPT_LANGUAGE)
            .and_then(|value| value.to_str().ok())
            .map(Locale::from_header)
            .unwrap_or_default();

        Ok(locale)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn picks_primary_language_of_first_tag() {
        let locale = Locale::from_header("pt-BR,pt;q=0.9,en;q=0.8");
        assert_eq!(locale.0, "pt");
        assert!(locale.is_portuguese());
    }

    #[test]
    fn falls_back_to_english() {
        assert_eq!(Locale::from_header("").0, "en");
        assert!(!Locale::default().is_portuguese());
    }
}
