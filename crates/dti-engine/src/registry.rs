//! Target registry built from the sequence-database FASTA at startup.
//!
//! Header form `>sp|P12345|NAME_HUMAN Description...` — the accession is
//! the second `|`-delimited field, the description is everything after
//! the first space. Records without a `|` in the id are skipped (they are
//! not addressable targets).

use std::collections::HashMap;
use std::path::Path;

use tracing::info;

use dti_common::{DtiError, Result, TargetInfo};

#[derive(Debug, Clone)]
struct TargetRecord {
    sequence: String,
    description: Option<String>,
}

/// Immutable identifier → sequence/description lookup.
#[derive(Debug, Clone)]
pub struct TargetRegistry {
    records: HashMap<String, TargetRecord>,
}

impl TargetRegistry {
    pub fn load_fasta(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let registry = Self::parse_fasta(&raw)?;
        info!(targets = registry.len(), "target registry loaded");
        Ok(registry)
    }

    pub fn parse_fasta(raw: &str) -> Result<Self> {
        let mut records: HashMap<String, TargetRecord> = HashMap::new();
        let mut current: Option<(String, Option<String>, String)> = None;

        let mut flush =
            |current: &mut Option<(String, Option<String>, String)>,
             records: &mut HashMap<String, TargetRecord>| {
                if let Some((id, description, sequence)) = current.take() {
                    records.entry(id).or_insert(TargetRecord {
                        sequence,
                        description,
                    });
                }
            };

        for line in raw.lines() {
            let line = line.trim_end();
            if let Some(header) = line.strip_prefix('>') {
                flush(&mut current, &mut records);
                let (id_part, desc_part) = match header.split_once(' ') {
                    Some((id, desc)) => (id, Some(desc.trim().to_string())),
                    None => (header, None),
                };
                let fields: Vec<&str> = id_part.split('|').collect();
                if fields.len() >= 2 && !fields[1].is_empty() {
                    let desc = desc_part.filter(|d| !d.is_empty());
                    current = Some((fields[1].to_string(), desc, String::new()));
                } else {
                    current = None;
                }
            } else if let Some((_, _, seq)) = current.as_mut() {
                seq.push_str(line.trim());
            }
        }
        flush(&mut current, &mut records);

        if records.is_empty() {
            return Err(DtiError::Artifact(
                "target FASTA contains no addressable records".into(),
            ));
        }
        Ok(Self { records })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.records.contains_key(id)
    }

    /// Residue sequence for a target, or `UnknownTarget`.
    pub fn sequence(&self, id: &str) -> Result<&str> {
        self.records
            .get(id)
            .map(|r| r.sequence.as_str())
            .ok_or_else(|| DtiError::UnknownTarget(id.to_string()))
    }

    /// All known target identifiers, sorted.
    pub fn ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.records.keys().cloned().collect();
        ids.sort();
        ids
    }

    /// Identifier + description pairs, sorted by identifier, with the
    /// documented fallback for missing descriptions.
    pub fn infos(&self) -> Vec<TargetInfo> {
        self.ids()
            .into_iter()
            .map(|id| {
                let name = self.records[&id]
                    .description
                    .clone()
                    .unwrap_or_else(|| "Unknown description".to_string());
                TargetInfo { id, name }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FASTA: &str = "\
>sp|P12345|KIN_HUMAN Tyrosine kinase receptor
MKTAYIAKQR
QISFVKSHFS
>sp|Q99999|ORP_HUMAN
GAVLIM
>NOPIPE_RECORD
AAAA
";

    #[test]
    fn accession_and_description_extracted() {
        let reg = TargetRegistry::parse_fasta(FASTA).unwrap();
        assert_eq!(reg.len(), 2);
        assert_eq!(reg.sequence("P12345").unwrap(), "MKTAYIAKQRQISFVKSHFS");
        let infos = reg.infos();
        assert_eq!(infos[0].id, "P12345");
        assert_eq!(infos[0].name, "Tyrosine kinase receptor");
    }

    #[test]
    fn missing_description_falls_back() {
        let reg = TargetRegistry::parse_fasta(FASTA).unwrap();
        let infos = reg.infos();
        assert_eq!(infos[1].id, "Q99999");
        assert_eq!(infos[1].name, "Unknown description");
    }

    #[test]
    fn header_without_pipe_skipped() {
        let reg = TargetRegistry::parse_fasta(FASTA).unwrap();
        assert!(!reg.contains("NOPIPE_RECORD"));
        assert_eq!(reg.len(), 2);
    }

    #[test]
    fn unknown_target_error() {
        let reg = TargetRegistry::parse_fasta(FASTA).unwrap();
        assert!(matches!(
            reg.sequence("ZZZZZZ").unwrap_err(),
            DtiError::UnknownTarget(id) if id == "ZZZZZZ"
        ));
    }

    #[test]
    fn ids_sorted() {
        let reg = TargetRegistry::parse_fasta(FASTA).unwrap();
        assert_eq!(reg.ids(), vec!["P12345".to_string(), "Q99999".to_string()]);
    }

    #[test]
    fn empty_fasta_rejected() {
        assert!(TargetRegistry::parse_fasta("").is_err());
        assert!(TargetRegistry::parse_fasta(">NOPE\nAAAA\n").is_err());
    }
}
