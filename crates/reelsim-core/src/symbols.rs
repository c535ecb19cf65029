//! Symbol definitions and the configured alphabet

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};

/// Symbol role classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum SymbolRole {
    /// Regular paying symbol
    Normal = 0,
    /// Higher paying regular symbol
    Premium = 1,
    /// Wild - substitutes for others on a payline
    Wild = 2,
    /// Bonus - triggers the bonus feature by grid-wide count
    Bonus = 3,
}

/// Index of a symbol in its [`SymbolSet`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SymbolId(pub u16);

impl SymbolId {
    /// Position in the alphabet
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// A symbol definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolDef {
    /// Display name (e.g., "Cherry", "P1", "W")
    pub name: String,
    /// Symbol role
    pub role: SymbolRole,
}

impl SymbolDef {
    pub fn new(name: impl Into<String>, role: SymbolRole) -> Self {
        Self {
            name: name.into(),
            role,
        }
    }
}

/// Ordered, immutable alphabet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolSet {
    symbols: Vec<SymbolDef>,
}

impl SymbolSet {
    /// Build an alphabet, rejecting empty sets and duplicate names
    pub fn new(symbols: Vec<SymbolDef>) -> ConfigResult<Self> {
        if symbols.is_empty() {
            return Err(ConfigError::EmptySymbols);
        }
        if symbols.len() > u16::MAX as usize {
            return Err(ConfigError::InvalidGeometry(format!(
                "{} symbols exceed the alphabet limit",
                symbols.len()
            )));
        }
        for (i, symbol) in symbols.iter().enumerate() {
            if symbols[..i].iter().any(|s| s.name == symbol.name) {
                return Err(ConfigError::DuplicateSymbol(symbol.name.clone()));
            }
        }
        Ok(Self { symbols })
    }

    /// Build an alphabet of normal symbols from names
    pub fn from_names<S: AsRef<str>>(names: &[S]) -> ConfigResult<Self> {
        Self::new(
            names
                .iter()
                .map(|n| SymbolDef::new(n.as_ref(), SymbolRole::Normal))
                .collect(),
        )
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Get symbol definition by ID
    pub fn get(&self, id: SymbolId) -> Option<&SymbolDef> {
        self.symbols.get(id.index())
    }

    /// Symbol name, or "?" for an ID outside the alphabet
    pub fn name(&self, id: SymbolId) -> &str {
        self.get(id).map(|s| s.name.as_str()).unwrap_or("?")
    }

    /// Look up a symbol by name
    pub fn id_of(&self, name: &str) -> Option<SymbolId> {
        self.symbols
            .iter()
            .position(|s| s.name == name)
            .map(|i| SymbolId(i as u16))
    }

    /// Look up a symbol by name, failing with [`ConfigError::UnknownSymbol`]
    pub fn require(&self, name: &str) -> ConfigResult<SymbolId> {
        self.id_of(name)
            .ok_or_else(|| ConfigError::UnknownSymbol(name.to_string()))
    }

    /// First symbol with the given role
    pub fn first_with_role(&self, role: SymbolRole) -> Option<SymbolId> {
        self.symbols
            .iter()
            .position(|s| s.role == role)
            .map(|i| SymbolId(i as u16))
    }

    /// All symbol IDs in alphabet order
    pub fn ids(&self) -> impl Iterator<Item = SymbolId> + '_ {
        (0..self.symbols.len()).map(|i| SymbolId(i as u16))
    }

    pub fn iter(&self) -> impl Iterator<Item = (SymbolId, &SymbolDef)> + '_ {
        self.symbols
            .iter()
            .enumerate()
            .map(|(i, s)| (SymbolId(i as u16), s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_by_name() {
        let set = SymbolSet::from_names(&["Cherry", "Lemon", "Seven"]).unwrap();
        assert_eq!(set.id_of("Lemon"), Some(SymbolId(1)));
        assert_eq!(set.name(SymbolId(2)), "Seven");
        assert_eq!(set.name(SymbolId(9)), "?");
        assert!(set.require("Bar").is_err());
    }

    #[test]
    fn test_rejects_empty_and_duplicates() {
        assert!(matches!(
            SymbolSet::new(Vec::new()),
            Err(ConfigError::EmptySymbols)
        ));
        assert!(matches!(
            SymbolSet::from_names(&["A", "K", "A"]),
            Err(ConfigError::DuplicateSymbol(name)) if name == "A"
        ));
    }

    #[test]
    fn test_roles() {
        let set = SymbolSet::new(vec![
            SymbolDef::new("A", SymbolRole::Normal),
            SymbolDef::new("P1", SymbolRole::Premium),
            SymbolDef::new("W", SymbolRole::Wild),
            SymbolDef::new("B", SymbolRole::Bonus),
        ])
        .unwrap();
        assert_eq!(set.first_with_role(SymbolRole::Wild), Some(SymbolId(2)));
        assert_eq!(set.first_with_role(SymbolRole::Bonus), Some(SymbolId(3)));
    }
}
