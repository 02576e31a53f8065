//! Keyword-frequency document type classification.

use serde::Serialize;
use tracing::trace;

use crate::models::document::DocumentType;

/// Keyword table per document type, in declaration order.
pub const TYPE_KEYWORDS: &[(DocumentType, &[&str])] = &[
    (
        DocumentType::Statement,
        &["extrato", "saldo", "lançamentos", "lancamentos", "movimentação", "movimentacao"],
    ),
    (
        DocumentType::PaymentProof,
        &["comprovante", "transferência", "transferencia", "pix", "ted", "doc"],
    ),
    (
        DocumentType::Card,
        &["cartão", "cartao", "fatura", "crédito", "credito", "débito", "debito"],
    ),
    (
        DocumentType::Contract,
        &["contrato", "partes", "cláusula", "clausula", "contratante", "contratado"],
    ),
    (
        DocumentType::Invoice,
        &["nota fiscal", "nf-e", "nfe", "danfe", "invoice"],
    ),
    (
        DocumentType::TimberManifest,
        &["romaneio", "madeira", "m³", "m3", "tora", "cubagem"],
    ),
    (
        DocumentType::Freight,
        &["frete", "transporte", "carga", "ctrc", "conhecimento"],
    ),
    (
        DocumentType::Bill,
        &["boleto", "código de barras", "codigo de barras", "linha digitável", "linha digitavel"],
    ),
    (DocumentType::Receipt, &["recibo", "recebi", "pagamento"]),
];

/// Outcome of classifying a text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Classification {
    /// Winning document type.
    pub document_type: DocumentType,
    /// Number of distinct keywords of the winning type found.
    pub score: usize,
    /// Full keyword list of the winning type.
    pub keywords: Vec<&'static str>,
}

/// Scores every declared type and picks the best.
///
/// Ties go to the type declared first in [`TYPE_KEYWORDS`].
#[derive(Debug, Clone, Copy, Default)]
pub struct DocumentClassifier;

impl DocumentClassifier {
    pub fn new() -> Self {
        Self
    }

    /// Per-type keyword counts, zero-score types excluded, in table order.
    pub fn scores(&self, text: &str) -> Vec<(DocumentType, usize)> {
        let lowered = text.to_lowercase();

        TYPE_KEYWORDS
            .iter()
            .map(|(doc_type, keywords)| {
                let count = keywords.iter().filter(|k| lowered.contains(*k)).count();
                (*doc_type, count)
            })
            .filter(|(_, count)| *count > 0)
            .collect()
    }

    /// Pick one type, or `None` when no keyword occurs.
    pub fn classify(&self, text: &str) -> Option<Classification> {
        let scores = self.scores(text);
        trace!(?scores, "document type scores");

        // Strictly-greater keeps the earliest declared type on ties
        let mut best: Option<(DocumentType, usize)> = None;
        for (doc_type, score) in scores {
            if best.is_none_or(|(_, top)| score > top) {
                best = Some((doc_type, score));
            }
        }

        best.map(|(document_type, score)| Classification {
            document_type,
            score,
            keywords: keywords_for(document_type).to_vec(),
        })
    }
}

/// Keyword list declared for a type.
pub fn keywords_for(doc_type: DocumentType) -> &'static [&'static str] {
    TYPE_KEYWORDS
        .iter()
        .find(|(t, _)| *t == doc_type)
        .map(|(_, keywords)| *keywords)
        .unwrap_or(&[])
}

/// Classify a text with the default table.
pub fn classify(text: &str) -> Option<DocumentType> {
    DocumentClassifier::new().classify(text).map(|c| c.document_type)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_table_covers_every_type_in_order() {
        let declared: Vec<DocumentType> = TYPE_KEYWORDS.iter().map(|(t, _)| *t).collect();
        assert_eq!(declared, DocumentType::ALL.to_vec());
    }

    #[test]
    fn test_highest_count_wins() {
        let text = "Boleto bancário - código de barras - linha digitável - recibo";
        assert_eq!(classify(text), Some(DocumentType::Bill));
    }

    #[test]
    fn test_tie_goes_to_first_declared() {
        // Statement: extrato, saldo, lançamentos (3)
        // Contract: contrato, partes, cláusula (3)
        // Freight: frete (1)
        let text = "extrato saldo lançamentos contrato partes cláusula frete";
        let result = DocumentClassifier::new().classify(text).unwrap();
        assert_eq!(result.document_type, DocumentType::Statement);
        assert_eq!(result.score, 3);
    }

    #[test]
    fn test_tie_order_independent_of_text_order() {
        let text = "contrato partes cláusula extrato saldo lançamentos";
        assert_eq!(classify(text), Some(DocumentType::Statement));
    }

    #[test]
    fn test_unclassified() {
        assert_eq!(classify("lorem ipsum"), None);
        assert_eq!(classify(""), None);
    }

    #[test]
    fn test_keywords_reported() {
        let result = DocumentClassifier::new().classify("ROMANEIO de madeira").unwrap();
        assert_eq!(result.document_type, DocumentType::TimberManifest);
        assert_eq!(result.keywords, keywords_for(DocumentType::TimberManifest).to_vec());
    }

    #[test]
    fn test_scores_exclude_zero() {
        let scores = DocumentClassifier::new().scores("frete e carga");
        assert_eq!(scores, vec![(DocumentType::Freight, 2)]);
    }
}
