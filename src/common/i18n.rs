// src/common/i18n.rs

use std::collections::HashMap;
use std::sync::Arc;

// Catálogo de mensagens em memória (pt/en). O idioma vem do extrator
// Locale (cabeçalho Accept-Language); idioma desconhecido cai no inglês
// e, em último caso, a chave é devolvida como está.
#[derive(Clone)]
pub struct I18nStore {
    messages: Arc<HashMap<String, HashMap<String, String>>>,
}

impl Default for I18nStore {
    fn default() -> Self {
        Self::new()
    }
}

impl I18nStore {
    pub fn new() -> Self {
        let mut messages = HashMap::new();
        messages.insert("pt".to_string(), catalog_pt());
        messages.insert("en".to_string(), catalog_en());
        Self {
            messages: Arc::new(messages),
        }
    }

    pub fn translate(&self, lang: &str, key: &str) -> String {
        self.messages
            .get(lang)
            .and_then(|catalog| catalog.get(key))
            .or_else(|| self.messages.get("en").and_then(|catalog| catalog.get(key)))
            .cloned()
            .unwrap_or_else(|| key.to_string())
    }
}

fn catalog(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(key, message)| (key.to_string(), message.to_string()))
        .collect()
}

fn catalog_pt() -> HashMap<String, String> {
    catalog(&[
        ("validation.invalid_fields", "Um ou mais campos são inválidos."),
        ("auth.email_exists", "Este e-mail já está em uso."),
        ("auth.invalid_credentials", "E-mail ou senha inválidos."),
        ("auth.invalid_token", "Token de autenticação inválido ou ausente."),
        ("auth.user_not_found", "Usuário não encontrado."),
        ("tenancy.access_denied", "Você não tem acesso a esta empresa."),
        ("resource.not_found", "Recurso não encontrado"),
        ("quote.invalid_transition", "Transição de status inválida para este orçamento."),
        ("quote.expired", "Este orçamento expirou."),
        ("quote.already_responded", "Este orçamento já foi respondido."),
        ("quote.not_accepted", "Os custos reais só podem ser lançados em orçamentos aceitos."),
        ("access_code.invalid", "Código de acesso inválido ou inativo."),
        ("access_code.exhausted", "Código de acesso esgotado."),
        ("access_code.expired", "Código de acesso expirado."),
        ("admin.key_invalid", "Chave administrativa inválida ou ausente."),
        ("pdf.font_missing", "Fonte do PDF não encontrada no servidor."),
        ("db.unique_violation", "Registro duplicado."),
        ("internal.unexpected", "Ocorreu um erro inesperado."),
    ])
}

fn catalog_en() -> HashMap<String, String> {
    catalog(&[
        ("validation.invalid_fields", "One or more fields are invalid."),
        ("auth.email_exists", "This e-mail is already in use."),
        ("auth.invalid_credentials", "Invalid e-mail or password."),
        ("auth.invalid_token", "Missing or invalid authentication token."),
        ("auth.user_not_found", "User not found."),
        ("tenancy.access_denied", "You do not have access to this company."),
        ("resource.not_found", "Resource not found"),
        ("quote.invalid_transition", "Invalid status transition for this quote."),
        ("quote.expired", "This quote has expired."),
        ("quote.already_responded", "This quote has already been responded to."),
        ("quote.not_accepted", "Actual costs can only be recorded on accepted quotes."),
        ("access_code.invalid", "Invalid or inactive access code."),
        ("access_code.exhausted", "Access code has no uses left."),
        ("access_code.expired", "Access code has expired."),
        ("admin.key_invalid", "Missing or invalid admin key."),
        ("pdf.font_missing", "PDF font not found on the server."),
        ("db.unique_violation", "Duplicate record."),
        ("internal.unexpected", "An unexpected error occurred."),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn traduz_no_idioma_pedido() {
        let store = I18nStore::new();
        assert_eq!(
            store.translate("pt", "auth.invalid_credentials"),
            "E-mail ou senha inválidos."
        );
        assert_eq!(
            store.translate("en", "auth.invalid_credentials"),
            "Invalid e-mail or password."
        );
    }

    #[test]
    fn idioma_desconhecido_cai_no_ingles() {
        let store = I18nStore::new();
        assert_eq!(
            store.translate("fr", "auth.user_not_found"),
            "User not found."
        );
    }

    #[test]
    fn chave_desconhecida_volta_como_esta() {
        let store = I18nStore::new();
        assert_eq!(store.translate("pt", "nao.existe"), "nao.existe");
    }
}
