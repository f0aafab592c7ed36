//! Reference dictionary of contig names, identifiers, and lengths.

use std::collections::BTreeMap;

use crate::error::{Error, Result};

/// Index of the contigs of one genome assembly.
///
/// The name to id map may contain aliases (e.g., `"1"` and `"chr1"` mapping to the same id),
/// while the id to name map stores the primary name only.  Use `ReferenceDictionaryBuilder`
/// for construction.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "ReferenceDictionaryBuilder")]
pub struct ReferenceDictionary {
    contig_name_to_id: BTreeMap<String, i32>,
    contig_id_to_name: BTreeMap<i32, String>,
    contig_id_to_length: BTreeMap<i32, i32>,
}

impl ReferenceDictionary {
    /// Id of the contig with the given name or alias.
    pub fn contig_id(&self, name: &str) -> Option<i32> {
        self.contig_name_to_id.get(name).copied()
    }

    /// Primary name of the contig with the given id.
    pub fn contig_name(&self, id: i32) -> Option<&str> {
        self.contig_id_to_name.get(&id).map(String::as_str)
    }

    /// Length of the contig with the given id.
    pub fn contig_length(&self, id: i32) -> Option<i32> {
        self.contig_id_to_length.get(&id).copied()
    }

    /// Whether the dictionary knows about the contig id.
    pub fn contains_id(&self, id: i32) -> bool {
        self.contig_id_to_name.contains_key(&id)
    }

    pub fn contig_name_to_id(&self) -> &BTreeMap<String, i32> {
        &self.contig_name_to_id
    }

    pub fn contig_id_to_name(&self) -> &BTreeMap<i32, String> {
        &self.contig_id_to_name
    }

    pub fn contig_id_to_length(&self) -> &BTreeMap<i32, i32> {
        &self.contig_id_to_length
    }
}

/// Builder for `ReferenceDictionary`.
///
/// Not meant to be shared between threads while filling; `build()` must complete before any
/// transcript model refers to the resulting dictionary.
#[derive(Debug, Clone, Default, serde::Deserialize)]
pub struct ReferenceDictionaryBuilder {
    #[serde(default)]
    contig_name_to_id: BTreeMap<String, i32>,
    #[serde(default)]
    contig_id_to_name: BTreeMap<i32, String>,
    #[serde(default)]
    contig_id_to_length: BTreeMap<i32, i32>,
}

impl ReferenceDictionaryBuilder {
    /// Register a contig with its primary name and length.
    pub fn put_contig(&mut self, id: i32, name: impl Into<String>, length: i32) -> &mut Self {
        let name = name.into();
        self.contig_name_to_id.insert(name.clone(), id);
        self.contig_id_to_name.insert(id, name);
        self.contig_id_to_length.insert(id, length);
        self
    }

    /// Register a name (or alias) for a contig id.
    pub fn put_contig_id(&mut self, name: impl Into<String>, id: i32) -> &mut Self {
        self.contig_name_to_id.insert(name.into(), id);
        self
    }

    /// Register the primary name of a contig id.
    pub fn put_contig_name(&mut self, id: i32, name: impl Into<String>) -> &mut Self {
        self.contig_id_to_name.insert(id, name.into());
        self
    }

    /// Register the length of a contig id.
    pub fn put_contig_length(&mut self, id: i32, length: i32) -> &mut Self {
        self.contig_id_to_length.insert(id, length);
        self
    }

    /// Check consistency of the three maps and build the dictionary.
    pub fn build(self) -> Result<ReferenceDictionary> {
        for (id, name) in &self.contig_id_to_name {
            if self.contig_name_to_id.get(name) != Some(id) {
                return Err(Error::InvalidModel(format!(
                    "contig {:?} (id {}) is missing from the name index",
                    name, id
                )));
            }
            match self.contig_id_to_length.get(id) {
                Some(length) if *length >= 0 => (),
                Some(length) => {
                    return Err(Error::InvalidModel(format!(
                        "contig {:?} has negative length {}",
                        name, length
                    )))
                }
                None => {
                    return Err(Error::InvalidModel(format!(
                        "contig {:?} (id {}) has no length",
                        name, id
                    )))
                }
            }
        }
        if let Some((name, id)) = self
            .contig_name_to_id
            .iter()
            .find(|(_, id)| !self.contig_id_to_name.contains_key(id))
        {
            return Err(Error::InvalidModel(format!(
                "name {:?} refers to unknown contig id {}",
                name, id
            )));
        }
        if let Some(id) = self
            .contig_id_to_length
            .keys()
            .find(|id| !self.contig_id_to_name.contains_key(id))
        {
            return Err(Error::InvalidModel(format!(
                "length given for unknown contig id {}",
                id
            )));
        }

        Ok(ReferenceDictionary {
            contig_name_to_id: self.contig_name_to_id,
            contig_id_to_name: self.contig_id_to_name,
            contig_id_to_length: self.contig_id_to_length,
        })
    }
}

impl TryFrom<ReferenceDictionaryBuilder> for ReferenceDictionary {
    type Error = Error;

    fn try_from(value: ReferenceDictionaryBuilder) -> Result<Self> {
        value.build()
    }
}
