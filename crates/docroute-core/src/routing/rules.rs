//! The destination rule table.
//!
//! Paths follow the filing taxonomy:
//!
//! ```text
//! 00_TRIAGEM_POR_PESSOA/<person|organization folder>/...
//! 03_MADEIRAS/Romaneios
//! 04_FRETES/Documentos
//! 05_BANCOS/<bank>/<CPF|CNPJ>/...
//! 06_FINANCEIRO/<year>/<month>/...
//! 07_CLIENTES/Notas_Fiscais
//! 08_FORNECEDORES/Notas_Fiscais
//! ```

use std::path::PathBuf;

use chrono::{Datelike, NaiveDate};

use crate::models::config::RoutingConfig;
use crate::models::document::{AttributeBundle, DocumentType};

/// Portuguese month names, January first.
pub const MONTH_NAMES: [&str; 12] = [
    "Janeiro",
    "Fevereiro",
    "Março",
    "Abril",
    "Maio",
    "Junho",
    "Julho",
    "Agosto",
    "Setembro",
    "Outubro",
    "Novembro",
    "Dezembro",
];

/// Folder used when a month token does not map to a month.
pub const UNKNOWN_MONTH: &str = "Outros";

/// Preview words that mark an incoming (purchase) invoice.
const INCOMING_MARKERS: [&str; 2] = ["entrada", "compra"];

/// Everything a rule may look at.
#[derive(Debug, Clone, Copy)]
pub struct RoutingContext<'a> {
    pub bundle: &'a AttributeBundle,
    pub config: &'a RoutingConfig,
    /// Processing date, used when the document carries no date.
    pub today: NaiveDate,
}

impl<'a> RoutingContext<'a> {
    pub fn new(bundle: &'a AttributeBundle, config: &'a RoutingConfig, today: NaiveDate) -> Self {
        Self {
            bundle,
            config,
            today,
        }
    }

    pub fn root(&self) -> PathBuf {
        self.config.base_path.clone()
    }

    pub fn document_type(&self) -> Option<DocumentType> {
        self.bundle.document_type
    }

    /// Year of the first extracted date, or the processing year.
    pub fn year(&self) -> String {
        match self.bundle.first_date() {
            Some(date) => date.year().to_string(),
            None => self.today.year().to_string(),
        }
    }

    /// Month folder name of the first extracted date, or of the processing date.
    pub fn month_name(&self) -> &'static str {
        match self.bundle.first_date() {
            Some(date) => month_name(date.month()),
            None => MONTH_NAMES[self.today.month0() as usize],
        }
    }

    /// `CNPJ` when any organization id is present, `CPF` otherwise.
    pub fn holder_kind(&self) -> &'static str {
        if self.bundle.has_organization_id() {
            "CNPJ"
        } else {
            "CPF"
        }
    }

    pub fn is_financial(&self) -> bool {
        self.document_type().is_some_and(|t| t.is_financial())
    }

    /// Heuristic: the preview mentions an incoming entry or a purchase.
    pub fn is_incoming(&self) -> bool {
        let preview = self.bundle.preview.to_lowercase();
        INCOMING_MARKERS.iter().any(|m| preview.contains(m))
    }
}

/// Map a two-digit month token to its folder name.
pub fn month_name(token: &str) -> &'static str {
    match token.parse::<usize>() {
        Ok(n @ 1..=12) if token.len() == 2 => MONTH_NAMES[n - 1],
        _ => UNKNOWN_MONTH,
    }
}

/// A predicate over the bundle paired with the destination it yields.
#[derive(Debug, Clone, Copy)]
pub struct DestinationRule {
    /// Short name used in logs and dry-run output.
    pub name: &'static str,
    /// Whether the rule matches.
    pub applies: fn(&RoutingContext<'_>) -> bool,
    /// Destination directory for a matching document.
    pub destination: fn(&RoutingContext<'_>) -> PathBuf,
}

impl DestinationRule {
    /// Destination for this document, if the rule matches.
    pub fn evaluate(&self, ctx: &RoutingContext<'_>) -> Option<PathBuf> {
        (self.applies)(ctx).then(|| (self.destination)(ctx))
    }
}

/// The rule table, in priority order.
pub fn default_rules() -> Vec<DestinationRule> {
    vec![
        DestinationRule {
            name: "person-triage",
            applies: |ctx| ctx.bundle.has_person_id(),
            destination: person_triage,
        },
        DestinationRule {
            name: "organization-triage",
            applies: |ctx| ctx.bundle.has_organization_id(),
            destination: organization_triage,
        },
        DestinationRule {
            name: "bank",
            applies: |ctx| ctx.bundle.bank.is_some(),
            destination: bank_folder,
        },
        DestinationRule {
            name: "financial",
            applies: |ctx| ctx.is_financial(),
            destination: financial_folder,
        },
        DestinationRule {
            name: "freight",
            applies: |ctx| ctx.document_type() == Some(DocumentType::Freight),
            destination: |ctx| ctx.root().join("04_FRETES").join("Documentos"),
        },
        DestinationRule {
            name: "timber",
            applies: |ctx| ctx.document_type() == Some(DocumentType::TimberManifest),
            destination: |ctx| ctx.root().join("03_MADEIRAS").join("Romaneios"),
        },
        DestinationRule {
            name: "clients",
            applies: |ctx| {
                ctx.document_type() == Some(DocumentType::Invoice) && ctx.bundle.has_organization_id()
            },
            destination: |ctx| ctx.root().join("07_CLIENTES").join("Notas_Fiscais"),
        },
        DestinationRule {
            name: "suppliers",
            applies: |ctx| ctx.document_type() == Some(DocumentType::Invoice) && ctx.is_incoming(),
            destination: |ctx| ctx.root().join("08_FORNECEDORES").join("Notas_Fiscais"),
        },
    ]
}

fn triage_root(ctx: &RoutingContext<'_>, folder: &str) -> PathBuf {
    ctx.root().join("00_TRIAGEM_POR_PESSOA").join(folder)
}

fn person_triage(ctx: &RoutingContext<'_>) -> PathBuf {
    let base = triage_root(ctx, &ctx.config.person_folder);

    match ctx.document_type() {
        Some(DocumentType::Statement | DocumentType::PaymentProof | DocumentType::Card) => {
            base.join("Bancos")
        }
        Some(DocumentType::Bill) => base.join("Financeiro").join("Contas_Pagar"),
        Some(DocumentType::Invoice) => base.join("Financeiro").join("Receitas"),
        _ => base.join("Documentos_Pessoais"),
    }
}

fn organization_triage(ctx: &RoutingContext<'_>) -> PathBuf {
    let base = triage_root(ctx, &ctx.config.organization_folder);

    match ctx.document_type() {
        Some(DocumentType::Statement | DocumentType::PaymentProof) => base.join("Bancos"),
        Some(DocumentType::Invoice) => base.join("Clientes"),
        Some(DocumentType::Freight) => base.join("Fretes"),
        Some(DocumentType::TimberManifest) => base.join("Madeiras"),
        _ => base.join("Documentos_Empresa"),
    }
}

fn bank_folder(ctx: &RoutingContext<'_>) -> PathBuf {
    let bank_name = ctx
        .bundle
        .bank
        .as_ref()
        .map(|b| b.display_name())
        .unwrap_or_default();
    let base = ctx
        .root()
        .join("05_BANCOS")
        .join(bank_name)
        .join(ctx.holder_kind());

    match ctx.document_type() {
        Some(DocumentType::Statement) => base.join("Extratos").join(ctx.year()),
        Some(DocumentType::PaymentProof) => base.join("Comprovantes").join("Transferencias"),
        Some(DocumentType::Card) => base.join("Cartoes").join("Faturas"),
        Some(DocumentType::Bill) => base.join("Comprovantes").join("Boletos"),
        _ => base.join("Conta_Corrente"),
    }
}

fn financial_folder(ctx: &RoutingContext<'_>) -> PathBuf {
    let base = ctx
        .root()
        .join("06_FINANCEIRO")
        .join(ctx.year())
        .join(ctx.month_name());

    match ctx.document_type() {
        Some(DocumentType::Bill) => base.join("Contas_Pagar"),
        Some(DocumentType::Invoice) => base.join("Receitas"),
        _ => base.join("Despesas"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::document::DocumentDate;
    use pretty_assertions::assert_eq;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 7, 4).unwrap()
    }

    #[test]
    fn test_month_name_mapping() {
        assert_eq!(month_name("01"), "Janeiro");
        assert_eq!(month_name("03"), "Março");
        assert_eq!(month_name("12"), "Dezembro");
        assert_eq!(month_name("13"), UNKNOWN_MONTH);
        assert_eq!(month_name("00"), UNKNOWN_MONTH);
        assert_eq!(month_name("1"), UNKNOWN_MONTH);
    }

    #[test]
    fn test_year_and_month_from_first_date() {
        let config = RoutingConfig::default();
        let bundle = AttributeBundle {
            dates: vec![
                DocumentDate::parse("2023-11-30").unwrap(),
                DocumentDate::parse("15/03/2024").unwrap(),
            ],
            ..Default::default()
        };
        let ctx = RoutingContext::new(&bundle, &config, today());

        assert_eq!(ctx.year(), "2023");
        assert_eq!(ctx.month_name(), "Novembro");
    }

    #[test]
    fn test_year_and_month_fallback_to_processing_date() {
        let config = RoutingConfig::default();
        let bundle = AttributeBundle::default();
        let ctx = RoutingContext::new(&bundle, &config, today());

        assert_eq!(ctx.year(), "2025");
        assert_eq!(ctx.month_name(), "Julho");
    }

    #[test]
    fn test_dash_day_first_date_uses_year_component() {
        let config = RoutingConfig::default();
        let bundle = AttributeBundle {
            dates: vec![DocumentDate::parse("15-03-2024").unwrap()],
            ..Default::default()
        };
        let ctx = RoutingContext::new(&bundle, &config, today());

        assert_eq!(ctx.year(), "2024");
        assert_eq!(ctx.month_name(), "Março");
    }

    #[test]
    fn test_incoming_heuristic() {
        let config = RoutingConfig::default();
        let bundle = AttributeBundle {
            preview: "NOTA FISCAL DE ENTRADA".to_string(),
            ..Default::default()
        };
        assert!(RoutingContext::new(&bundle, &config, today()).is_incoming());

        let bundle = AttributeBundle {
            preview: "nota fiscal de saída".to_string(),
            ..Default::default()
        };
        assert!(!RoutingContext::new(&bundle, &config, today()).is_incoming());
    }

    #[test]
    fn test_rule_names_unique() {
        let rules = default_rules();
        let mut names: Vec<&str> = rules.iter().map(|r| r.name).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), rules.len());
    }
}
