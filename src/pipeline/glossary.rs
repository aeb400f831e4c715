//! Terminology glossary: load the English → target term map and apply it as
//! placeholder translation.
//!
//! The glossary file is YAML with one top-level key (default `terms`) holding
//! the mapping:
//!
//! ```yaml
//! terms:
//!   digital signature: 数字签名
//!   signature: 签名
//!   lattice: 格
//! ```
//!
//! ## Substitution order
//!
//! Terms are applied longest first. Once "digital signature" has become
//! "数字签名" there is no English "signature" left inside it for the shorter
//! term to split. Matching is case-insensitive and bounded by word
//! boundaries so "sign" never rewrites the inside of "signature".

use crate::error::PipelineError;
use regex::{NoExpand, Regex, RegexBuilder};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, warn};

/// Top-level YAML key holding the term map.
pub const DEFAULT_GLOSSARY_KEY: &str = "terms";

/// A compiled glossary, ready to apply.
#[derive(Debug, Clone, Default)]
pub struct Glossary {
    /// `(english, target, matcher)`, longest English term first.
    entries: Vec<(String, String, Regex)>,
}

impl Glossary {
    /// Compile a glossary from `(english, target)` pairs.
    ///
    /// Blank English terms are skipped; they would match at every word
    /// boundary.
    pub fn from_terms<I, K, V>(terms: I) -> Result<Self, PipelineError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut pairs: Vec<(String, String)> = terms
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .filter(|(k, _)| {
                let keep = !k.trim().is_empty();
                if !keep {
                    warn!("Skipping blank glossary term");
                }
                keep
            })
            .collect();

        // Longest first; ties broken alphabetically so runs are reproducible.
        pairs.sort_by(|(a, _), (b, _)| {
            b.chars()
                .count()
                .cmp(&a.chars().count())
                .then_with(|| a.cmp(b))
        });

        let entries = pairs
            .into_iter()
            .map(|(en, target)| {
                let pattern = format!(r"\b{}\b", regex::escape(&en));
                let re = RegexBuilder::new(&pattern)
                    .case_insensitive(true)
                    .build()
                    .map_err(|e| PipelineError::InvalidGlossaryTerm {
                        term: en.clone(),
                        detail: e.to_string(),
                    })?;
                Ok((en, target, re))
            })
            .collect::<Result<Vec<_>, PipelineError>>()?;

        Ok(Self { entries })
    }

    /// Parse a YAML glossary document, reading the mapping under `key`.
    ///
    /// A missing key or an empty document yields an empty glossary.
    pub fn from_yaml_str(yaml: &str, key: &str, origin: &Path) -> Result<Self, PipelineError> {
        let malformed = |detail: String| PipelineError::MalformedGlossary {
            path: origin.to_path_buf(),
            detail,
        };

        let doc: Option<BTreeMap<String, serde_yaml::Value>> =
            serde_yaml::from_str(yaml).map_err(|e| malformed(e.to_string()))?;

        let terms = match doc.and_then(|mut d| d.remove(key)) {
            None | Some(serde_yaml::Value::Null) => {
                debug!("Glossary key '{}' absent in {}", key, origin.display());
                BTreeMap::new()
            }
            Some(value) => serde_yaml::from_value::<BTreeMap<String, String>>(value)
                .map_err(|e| malformed(format!("'{key}' must map terms to strings: {e}")))?,
        };

        Self::from_terms(terms)
    }

    /// Read and parse a glossary file.
    pub async fn load(path: &Path, key: &str) -> Result<Self, PipelineError> {
        let yaml = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| PipelineError::ReadFailed {
                path: path.to_path_buf(),
                source: e,
            })?;
        Self::from_yaml_str(&yaml, key, path)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// English terms in application order.
    pub fn terms(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(en, t, _)| (en.as_str(), t.as_str()))
    }

    /// Substitute every glossary term in `text`.
    pub fn apply(&self, text: &str) -> String {
        let mut result = text.to_string();
        for (_, target, re) in &self.entries {
            result = re.replace_all(&result, NoExpand(target)).into_owned();
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn glossary(pairs: &[(&str, &str)]) -> Glossary {
        Glossary::from_terms(pairs.iter().copied()).unwrap()
    }

    #[test]
    fn test_longer_terms_first() {
        let g = glossary(&[("signature", "签名"), ("digital signature", "数字签名")]);
        let out = g.apply("A digital signature scheme. Each signature is short.");
        assert_eq!(out, "A 数字签名 scheme. Each 签名 is short.");
        assert!(!out.contains("digital 签名"));
    }

    #[test]
    fn test_case_insensitive() {
        let g = glossary(&[("lattice", "格")]);
        assert_eq!(g.apply("Lattice problems and LATTICE bases"), "格 problems and 格 bases");
    }

    #[test]
    fn test_word_boundaries() {
        let g = glossary(&[("sign", "签")]);
        assert_eq!(g.apply("sign the signature"), "签 the signature");
    }

    #[test]
    fn test_replacement_is_literal() {
        let g = glossary(&[("cost", "$1 成本")]);
        assert_eq!(g.apply("the cost"), "the $1 成本");
    }

    #[test]
    fn test_regex_metacharacters_in_term() {
        let g = glossary(&[("SIS (short)", "短整数解")]);
        assert_eq!(g.apply("the SIS (short) problem"), "the 短整数解 problem");
    }

    #[test]
    fn test_blank_terms_skipped() {
        let g = glossary(&[("", "x"), ("  ", "y"), ("hash", "哈希")]);
        assert_eq!(g.len(), 1);
        assert_eq!(g.apply("a hash"), "a 哈希");
    }

    #[test]
    fn test_order_is_deterministic() {
        let g = glossary(&[("b", "2"), ("a", "1"), ("ccc", "3")]);
        let order: Vec<&str> = g.terms().map(|(en, _)| en).collect();
        assert_eq!(order, vec!["ccc", "a", "b"]);
    }

    #[test]
    fn test_from_yaml() {
        let yaml = "terms:\n  digital signature: 数字签名\n  lattice: 格\n";
        let g = Glossary::from_yaml_str(yaml, "terms", Path::new("terms.yaml")).unwrap();
        assert_eq!(g.len(), 2);
        assert_eq!(g.apply("lattice"), "格");
    }

    #[test]
    fn test_from_yaml_missing_key_is_empty() {
        let g = Glossary::from_yaml_str("other: {}\n", "terms", Path::new("t.yaml")).unwrap();
        assert!(g.is_empty());
        let g = Glossary::from_yaml_str("", "terms", Path::new("t.yaml")).unwrap();
        assert!(g.is_empty());
        let g = Glossary::from_yaml_str("terms:\n", "terms", Path::new("t.yaml")).unwrap();
        assert!(g.is_empty());
    }

    #[test]
    fn test_from_yaml_wrong_shape() {
        let err = Glossary::from_yaml_str("terms:\n  - a\n  - b\n", "terms", Path::new("t.yaml"))
            .unwrap_err();
        assert!(matches!(err, PipelineError::MalformedGlossary { .. }), "got: {err}");
    }

    #[test]
    fn test_from_yaml_invalid() {
        let err = Glossary::from_yaml_str("terms: [unclosed", "terms", Path::new("t.yaml"))
            .unwrap_err();
        assert!(matches!(err, PipelineError::MalformedGlossary { .. }));
    }
}
