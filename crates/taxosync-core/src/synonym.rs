//! Synonym linker
//!
//! Resolves the accepted Genus/Species branch of a synonym row and links
//! the non-accepted species to its accepted counterpart. The accepted
//! branch is anchored under the Family already resolved for the row's
//! primary chain; the Genus is re-resolved independently because the
//! accepted branch may diverge from the primary Genus.
//!
//! Resolution goes through the shared [`HierarchyResolver`], so the same
//! accepted species referenced by many synonym rows collapses to one
//! node.

use crate::error::ImportError;
use crate::gateway::{TaxonGateway, TaxonPatch};
use crate::model::{AcceptedBranch, Rank, TaxonRecord};
use crate::resolver::HierarchyResolver;
use std::sync::Arc;
use tracing::debug;

pub struct SynonymLinker {
    gateway: Arc<dyn TaxonGateway>,
    resolver: Arc<HierarchyResolver>,
}

impl SynonymLinker {
    pub fn new(gateway: Arc<dyn TaxonGateway>, resolver: Arc<HierarchyResolver>) -> Self {
        Self { gateway, resolver }
    }

    /// Link `species` to the accepted species described by `branch`,
    /// resolving (or creating) the accepted Genus/Species under `family`.
    ///
    /// Returns the accepted species node. Idempotent: a species already
    /// linked to the same accepted node is left untouched.
    pub async fn link_synonym(
        &self,
        species: &TaxonRecord,
        family: &TaxonRecord,
        branch: &AcceptedBranch,
    ) -> Result<TaxonRecord, ImportError> {
        let steps = [
            (Rank::Genus, branch.genus.as_str()),
            (Rank::Species, branch.species.as_str()),
        ];
        let chain = self.resolver.resolve_chain(family, &steps).await?;
        let accepted = chain
            .last()
            .cloned()
            .ok_or_else(|| ImportError::integrity("empty accepted branch"))?;

        if accepted.id == species.id {
            return Err(ImportError::integrity(format!(
                "species {} '{}' cannot be a synonym of itself",
                species.id, species.name
            )));
        }
        // An accepted-species pointer must not itself be a synonym.
        if !accepted.is_accepted {
            return Err(ImportError::integrity(format!(
                "accepted target {} '{}' is itself marked as a synonym",
                accepted.id, accepted.name
            )));
        }

        if !species.is_accepted && species.accepted == Some(accepted.id) {
            debug!(species = %species.id, accepted = %accepted.id, "synonym link already in place");
            return Ok(accepted);
        }

        debug!(species = %species.id, accepted = %accepted.id, "linking synonym");
        self.gateway
            .update(species.id, TaxonPatch::synonym_of(accepted.id))
            .await?;

        Ok(accepted)
    }
}
