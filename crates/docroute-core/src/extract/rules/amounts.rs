//! Monetary amount extraction (Brazilian real format: `R$ 1.234,56`).

use rust_decimal::Decimal;
use std::str::FromStr;

use super::patterns::{AMOUNT_PATTERN, AMOUNT_WITH_CURRENCY};
use super::{ExtractionMatch, FieldExtractor};
use crate::models::document::MonetaryAmount;

/// Amount field extractor.
pub struct AmountExtractor;

impl AmountExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for AmountExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for AmountExtractor {
    type Output = ExtractionMatch<Decimal>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.extract_all(text).into_iter().next()
    }

    /// Currency-prefixed matches first, then bare matches in text order.
    /// A bare match inside an already prefixed match is the same occurrence
    /// and is skipped.
    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        let mut results: Vec<Self::Output> = Vec::new();

        for m in AMOUNT_WITH_CURRENCY.find_iter(text) {
            if let Some(value) = parse_brl_amount(m.as_str()) {
                results.push(ExtractionMatch::new(value, m.as_str()).with_position(m.start(), m.end()));
            }
        }

        let prefixed: Vec<(usize, usize)> = results.iter().filter_map(|r| r.position).collect();

        for m in AMOUNT_PATTERN.find_iter(text) {
            if prefixed
                .iter()
                .any(|&(start, end)| m.start() >= start && m.end() <= end)
            {
                continue;
            }
            if let Some(value) = parse_brl_amount(m.as_str()) {
                results.push(ExtractionMatch::new(value, m.as_str()).with_position(m.start(), m.end()));
            }
        }

        results
    }
}

/// Extract positive amounts, largest first, keeping at most `limit`.
pub fn extract_amounts(text: &str, limit: usize) -> Vec<MonetaryAmount> {
    let mut amounts: Vec<MonetaryAmount> = AmountExtractor::new()
        .extract_all(text)
        .into_iter()
        .map(|m| MonetaryAmount::new(m.value, m.source))
        .collect();

    amounts.sort_by(|a, b| b.value.cmp(&a.value));
    amounts.truncate(limit);
    amounts
}

/// Parse a Brazilian-formatted amount (e.g. `R$ 1.234,56`).
///
/// Returns `None` for unparsable input and for values that are not positive.
pub fn parse_brl_amount(s: &str) -> Option<Decimal> {
    let cleaned: String = s
        .chars()
        .filter(|c| !matches!(c, 'R' | '$' | '.') && !c.is_whitespace())
        .map(|c| if c == ',' { '.' } else { c })
        .collect();

    Decimal::from_str(&cleaned)
        .ok()
        .filter(|value| value.is_sign_positive() && !value.is_zero())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_parse_brl_amount() {
        assert_eq!(parse_brl_amount("R$ 1.234,56"), Some(dec("1234.56")));
        assert_eq!(parse_brl_amount("R$1.234,56"), Some(dec("1234.56")));
        assert_eq!(parse_brl_amount("12.345.678,90"), Some(dec("12345678.90")));
        assert_eq!(parse_brl_amount("0,00"), None);
        assert_eq!(parse_brl_amount("abc"), None);
    }

    #[test]
    fn test_prefixed_amount_counted_once() {
        let amounts = extract_amounts("Total: R$ 1.234,56", 10);
        assert_eq!(amounts.len(), 1);
        assert_eq!(amounts[0].value, dec("1234.56"));
        assert_eq!(amounts[0].text, "R$ 1.234,56");
    }

    #[test]
    fn test_sorted_descending_and_truncated() {
        let text = (1..=12)
            .map(|i| format!("item {},00", i))
            .collect::<Vec<_>>()
            .join("\n");
        let amounts = extract_amounts(&text, 10);

        assert_eq!(amounts.len(), 10);
        assert_eq!(amounts[0].value, dec("12.00"));
        assert_eq!(amounts[9].value, dec("3.00"));
    }

    #[test]
    fn test_zero_amounts_discarded() {
        let amounts = extract_amounts("Desconto R$ 0,00 Tarifa 0,00 Saldo 10,50", 10);
        let values: Vec<Decimal> = amounts.iter().map(|a| a.value).collect();
        assert_eq!(values, vec![dec("10.50")]);
    }

    #[test]
    fn test_extract_all_amounts() {
        let extractor = AmountExtractor::new();
        let text = "Valor: R$ 100,00, Juros: 1.234,56";

        let results = extractor.extract_all(text);
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].source, "R$ 100,00");
    }
}
