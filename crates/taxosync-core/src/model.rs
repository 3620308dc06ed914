//! Domain model for the taxon reconciliation engine
//!
//! Names are normalized (leading/trailing whitespace trimmed) exactly
//! once, when a [`RowInput`] or [`ResolutionKey`] is constructed. The
//! remote store matches names case-sensitively, so no case folding is
//! performed. Internal whitespace is preserved; hybrid epithets may
//! legitimately contain spaces.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Taxonomic rank in the remote tree definition.
///
/// `Phylum` and `Class` only appear when anchoring the fixed root; each
/// imported row traverses the four working ranks Order→Family→Genus→Species.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Rank {
    Phylum,
    Class,
    Order,
    Family,
    Genus,
    Species,
}

/// The four ranks traversed for every imported row, in descent order.
pub const WORKING_RANKS: [Rank; 4] = [Rank::Order, Rank::Family, Rank::Genus, Rank::Species];

impl Rank {
    pub fn as_str(&self) -> &'static str {
        match self {
            Rank::Phylum => "Phylum",
            Rank::Class => "Class",
            Rank::Order => "Order",
            Rank::Family => "Family",
            Rank::Genus => "Genus",
            Rank::Species => "Species",
        }
    }

    pub fn is_species(&self) -> bool {
        matches!(self, Rank::Species)
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Rank {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Phylum" => Ok(Rank::Phylum),
            "Class" => Ok(Rank::Class),
            "Order" => Ok(Rank::Order),
            "Family" => Ok(Rank::Family),
            "Genus" => Ok(Rank::Genus),
            "Species" => Ok(Rank::Species),
            other => Err(format!("unknown rank: '{}'", other)),
        }
    }
}

/// Opaque identifier assigned by the remote store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaxonId(pub i64);

impl fmt::Display for TaxonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One taxon node as observed or created by this run.
///
/// Updates during a run are limited to `author` and the synonym link
/// (`is_accepted` + `accepted`); nodes are never deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxonRecord {
    pub id: TaxonId,
    pub rank: Rank,
    pub name: String,
    /// Immediate ancestor; `None` only for the top of the remote tree.
    pub parent: Option<TaxonId>,
    /// Meaningful only at Species rank.
    pub author: Option<String>,
    /// Meaningful only at Species rank; `false` implies `accepted` is set.
    pub is_accepted: bool,
    /// Link from a non-accepted species to its accepted counterpart.
    pub accepted: Option<TaxonId>,
    /// Provenance marker stamped on nodes created (not fetched) by a run.
    pub remarks: Option<String>,
}

/// Cache key for one resolution: (rank, normalized name, parent id).
///
/// Two rows requesting the same key resolve to the same node identity
/// within a run.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResolutionKey {
    pub rank: Rank,
    pub name: String,
    pub parent: TaxonId,
}

impl ResolutionKey {
    pub fn new(rank: Rank, name: &str, parent: TaxonId) -> Self {
        Self {
            rank,
            name: normalize_name(name),
            parent,
        }
    }
}

impl fmt::Display for ResolutionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} '{}' under {}", self.rank, self.name, self.parent)
    }
}

/// Trim leading/trailing whitespace from a taxon name.
pub fn normalize_name(name: &str) -> String {
    name.trim().to_string()
}

/// Normalize an optional author string, mapping empty/blank to `None`.
pub fn normalize_author(author: Option<&str>) -> Option<String> {
    author
        .map(str::trim)
        .filter(|a| !a.is_empty())
        .map(str::to_string)
}

/// The primary Order→Family→Genus→Species names of one row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainNames {
    pub order: String,
    pub family: String,
    pub genus: String,
    pub species: String,
}

impl ChainNames {
    pub fn new(order: &str, family: &str, genus: &str, species: &str) -> Self {
        Self {
            order: normalize_name(order),
            family: normalize_name(family),
            genus: normalize_name(genus),
            species: normalize_name(species),
        }
    }

    /// The (rank, name) steps in descent order.
    pub fn steps(&self) -> [(Rank, &str); 4] {
        [
            (Rank::Order, self.order.as_str()),
            (Rank::Family, self.family.as_str()),
            (Rank::Genus, self.genus.as_str()),
            (Rank::Species, self.species.as_str()),
        ]
    }
}

/// Accepted counterpart of a synonym row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcceptedBranch {
    pub genus: String,
    pub species: String,
    pub author: Option<String>,
}

impl AcceptedBranch {
    pub fn new(genus: &str, species: &str, author: Option<&str>) -> Self {
        Self {
            genus: normalize_name(genus),
            species: normalize_name(species),
            author: normalize_author(author),
        }
    }
}

/// One validated input row.
///
/// The two accepted shapes are encoded as variants: an accepted row never
/// carries accepted-branch fields, a synonym row always carries all three.
/// Malformed rows are rejected by the row source before they reach the
/// engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowInput {
    /// The species is the currently accepted name.
    Accepted {
        chain: ChainNames,
        author: Option<String>,
    },
    /// The species is a synonym of `accepted`.
    Synonym {
        chain: ChainNames,
        author: Option<String>,
        accepted: AcceptedBranch,
    },
}

impl RowInput {
    pub fn accepted(chain: ChainNames, author: Option<&str>) -> Self {
        RowInput::Accepted {
            chain,
            author: normalize_author(author),
        }
    }

    pub fn synonym(chain: ChainNames, author: Option<&str>, accepted: AcceptedBranch) -> Self {
        RowInput::Synonym {
            chain,
            author: normalize_author(author),
            accepted,
        }
    }

    pub fn chain(&self) -> &ChainNames {
        match self {
            RowInput::Accepted { chain, .. } | RowInput::Synonym { chain, .. } => chain,
        }
    }

    pub fn author(&self) -> Option<&str> {
        match self {
            RowInput::Accepted { author, .. } | RowInput::Synonym { author, .. } => {
                author.as_deref()
            }
        }
    }

    pub fn is_accepted(&self) -> bool {
        matches!(self, RowInput::Accepted { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rank_roundtrip() {
        for rank in [Rank::Phylum, Rank::Class, Rank::Order, Rank::Family, Rank::Genus, Rank::Species] {
            assert_eq!(rank.as_str().parse::<Rank>().unwrap(), rank);
        }
        assert!("Kingdom".parse::<Rank>().is_err());
    }

    #[test]
    fn test_rank_ordering_matches_descent() {
        assert!(Rank::Class < Rank::Order);
        assert!(Rank::Order < Rank::Family);
        assert!(Rank::Genus < Rank::Species);
        let mut sorted = WORKING_RANKS;
        sorted.sort();
        assert_eq!(sorted, WORKING_RANKS);
    }

    #[test]
    fn test_normalize_name_trims() {
        assert_eq!(normalize_name("  Tenrecidae "), "Tenrecidae");
        // internal whitespace preserved
        assert_eq!(normalize_name(" x laevis "), "x laevis");
    }

    #[test]
    fn test_normalize_author_blank_is_none() {
        assert_eq!(normalize_author(None), None);
        assert_eq!(normalize_author(Some("")), None);
        assert_eq!(normalize_author(Some("   ")), None);
        assert_eq!(
            normalize_author(Some(" Major, 1896 ")),
            Some("Major, 1896".to_string())
        );
    }

    #[test]
    fn test_resolution_key_normalizes() {
        let a = ResolutionKey::new(Rank::Genus, " Microgale", TaxonId(7));
        let b = ResolutionKey::new(Rank::Genus, "Microgale ", TaxonId(7));
        assert_eq!(a, b);
        let c = ResolutionKey::new(Rank::Genus, "Microgale", TaxonId(8));
        assert_ne!(a, c);
    }

    #[test]
    fn test_chain_steps_order() {
        let chain = ChainNames::new("Afrosoricida", "Tenrecidae", "Microgale", "talazaci");
        let steps = chain.steps();
        assert_eq!(steps[0], (Rank::Order, "Afrosoricida"));
        assert_eq!(steps[3], (Rank::Species, "talazaci"));
    }

    #[test]
    fn test_row_input_accessors() {
        let chain = ChainNames::new("Afrosoricida", "Tenrecidae", "Oryzorictes", "talpoides");
        let row = RowInput::synonym(
            chain.clone(),
            Some("G.Grandidier, 1899"),
            AcceptedBranch::new("Oryzorictes", "hova", Some("A.Grandidier, 1870")),
        );
        assert!(!row.is_accepted());
        assert_eq!(row.chain(), &chain);
        assert_eq!(row.author(), Some("G.Grandidier, 1899"));
    }
}
