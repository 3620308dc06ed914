//! HTTP implementation of the core's `TaxonGateway`
//!
//! Bootstraps the tree context once per run (tree definition, rank
//! definition items, fixed root node), then serves record-oriented
//! calls. Updates are fetch-merge-PUT because the store requires the
//! full resource, including its version counter, on every write.

use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, info};

use taxosync_core::{
    GatewayError, NewTaxon, Rank, RecordSetHandle, RecordSetScope, TaxonGateway, TaxonId,
    TaxonPatch, TaxonRecord, WORKING_RANKS,
};

use crate::api::endpoints;
use crate::api::types::{
    parse_resource_id, resource_uri, ResourceList, TaxonResource, TreeDefItemResource,
};
use crate::error::{CliError, Result};
use crate::session::Session;

/// From the store's table id listing; required when creating a record set.
const TAXON_TABLE_ID: i64 = 4;

/// Name of the phylum the fixed root is created under when absent.
const ROOT_PHYLUM: &str = "Chordata";

/// One rank definition item of the discipline's taxon tree.
#[derive(Debug, Clone)]
struct DefItem {
    id: i64,
    rank_id: i64,
    uri: String,
}

/// Gateway over an authenticated [`Session`].
pub struct HttpTaxonGateway {
    session: Session,
    tree_def: i64,
    collection_id: i64,
    def_items: HashMap<Rank, DefItem>,
    ranks_by_item: HashMap<i64, Rank>,
}

impl HttpTaxonGateway {
    /// Discover the tree context and anchor the fixed root node.
    ///
    /// Returns the gateway and the root record. When the root Class node
    /// does not exist it is created under the `Chordata` phylum, stamped
    /// with `remarks`.
    pub async fn bootstrap(
        session: Session,
        root_name: &str,
        remarks: &str,
    ) -> Result<(Self, TaxonRecord)> {
        let discipline_id = session.discipline_id().await?;
        let discipline = session
            .get_json(&endpoints::resource_url(
                session.base_url(),
                "discipline",
                discipline_id,
            ))
            .await?;
        let tree_def = discipline
            .get("taxontreedef")
            .and_then(Value::as_str)
            .and_then(parse_resource_id)
            .ok_or_else(|| CliError::api("discipline has no taxon tree definition"))?;

        let mut gateway = Self {
            collection_id: session.collection_id()?,
            session,
            tree_def,
            def_items: HashMap::new(),
            ranks_by_item: HashMap::new(),
        };

        gateway.load_def_item(Rank::Class).await?;
        for rank in WORKING_RANKS {
            gateway.load_def_item(rank).await?;
        }
        info!(tree_def, "fetched tree definition items");

        let root = gateway.anchor_root(root_name, remarks).await?;
        Ok((gateway, root))
    }

    async fn load_def_item(&mut self, rank: Rank) -> Result<()> {
        let url = endpoints::defitem_query_url(self.session.base_url(), rank.as_str(), self.tree_def);
        let list: ResourceList<TreeDefItemResource> =
            serde_json::from_value(self.session.get_json(&url).await?)?;
        let item = list.objects.into_iter().next().ok_or_else(|| {
            CliError::api(format!(
                "tree definition {} has no '{}' rank",
                self.tree_def, rank
            ))
        })?;
        self.ranks_by_item.insert(item.id, rank);
        self.def_items.insert(
            rank,
            DefItem {
                id: item.id,
                rank_id: item.rank_id,
                uri: item.resource_uri,
            },
        );
        Ok(())
    }

    /// Find the root Class node, creating it under `Chordata` if missing.
    async fn anchor_root(&mut self, root_name: &str, remarks: &str) -> Result<TaxonRecord> {
        if let Some(root) = self.find_by_rank(Rank::Class, root_name).await? {
            debug!(root = %root.id, name = root_name, "found existing root");
            return Ok(root);
        }

        self.load_def_item(Rank::Phylum).await?;
        let phylum = self
            .find_by_rank(Rank::Phylum, ROOT_PHYLUM)
            .await?
            .ok_or_else(|| {
                CliError::api(format!(
                    "cannot create root '{root_name}': no '{ROOT_PHYLUM}' phylum on this tree"
                ))
            })?;

        let root = self
            .create(NewTaxon {
                rank: Rank::Class,
                name: root_name.to_string(),
                parent: phylum.id,
                remarks: remarks.to_string(),
            })
            .await?;
        info!(root = %root.id, name = root_name, "created root node");
        Ok(root)
    }

    fn def_item(&self, rank: Rank) -> std::result::Result<&DefItem, GatewayError> {
        self.def_items
            .get(&rank)
            .ok_or_else(|| GatewayError::malformed(format!("no definition item for rank {rank}")))
    }

    async fn find_by_rank(
        &self,
        rank: Rank,
        name: &str,
    ) -> std::result::Result<Option<TaxonRecord>, GatewayError> {
        let item = self.def_item(rank)?;
        let url = endpoints::taxon_rank_query_url(self.session.base_url(), name, item.id);
        let list: ResourceList<TaxonResource> = serde_json::from_value(
            self.session.get_json(&url).await?,
        )
        .map_err(|e| GatewayError::malformed(e.to_string()))?;
        list.objects
            .into_iter()
            .next()
            .map(|r| self.to_record(r))
            .transpose()
    }

    fn to_record(&self, res: TaxonResource) -> std::result::Result<TaxonRecord, GatewayError> {
        let item_id = parse_resource_id(&res.definition_item).ok_or_else(|| {
            GatewayError::malformed(format!(
                "taxon {} has malformed definition item '{}'",
                res.id, res.definition_item
            ))
        })?;
        let rank = *self.ranks_by_item.get(&item_id).ok_or_else(|| {
            GatewayError::malformed(format!(
                "taxon {} belongs to unknown definition item {item_id}",
                res.id
            ))
        })?;
        Ok(TaxonRecord {
            id: TaxonId(res.id),
            rank,
            name: res.name,
            parent: res.parent.as_deref().and_then(parse_resource_id).map(TaxonId),
            author: res.author,
            is_accepted: res.is_accepted,
            accepted: res
                .accepted_taxon
                .as_deref()
                .and_then(parse_resource_id)
                .map(TaxonId),
            remarks: res.remarks,
        })
    }
}

#[async_trait]
impl TaxonGateway for HttpTaxonGateway {
    async fn find(
        &self,
        rank: Rank,
        name: &str,
        parent: TaxonId,
    ) -> std::result::Result<Vec<TaxonRecord>, GatewayError> {
        let item = self.def_item(rank)?;
        let url = endpoints::taxon_query_url(self.session.base_url(), name, item.id, parent.0);
        let list: ResourceList<TaxonResource> = serde_json::from_value(
            self.session.get_json(&url).await?,
        )
        .map_err(|e| GatewayError::malformed(e.to_string()))?;
        list.objects
            .into_iter()
            .map(|r| self.to_record(r))
            .collect()
    }

    async fn create(&self, taxon: NewTaxon) -> std::result::Result<TaxonRecord, GatewayError> {
        let item = self.def_item(taxon.rank)?;
        let body = serde_json::json!({
            // full name is generated server side on save
            "name": taxon.name,
            "author": Value::Null,
            "acceptedtaxon": Value::Null,
            "isaccepted": true,
            "ishybrid": false,
            "rankid": item.rank_id,
            "version": 0,
            "remarks": taxon.remarks,
            "definition": resource_uri("taxontreedef", self.tree_def),
            "definitionitem": item.uri,
            "parent": resource_uri("taxon", taxon.parent.0),
        });
        let url = endpoints::collection_url(self.session.base_url(), "taxon");
        let created: TaxonResource = serde_json::from_value(
            self.session.post_json(&url, &body).await?,
        )
        .map_err(|e| GatewayError::malformed(e.to_string()))?;
        debug!(id = created.id, name = %taxon.name, rank = %taxon.rank, "created taxon");
        self.to_record(created)
    }

    async fn update(
        &self,
        id: TaxonId,
        patch: TaxonPatch,
    ) -> std::result::Result<TaxonRecord, GatewayError> {
        let url = endpoints::resource_url(self.session.base_url(), "taxon", id.0);
        // The store wants the full resource back, version included.
        let mut current = self.session.get_json(&url).await?;
        let fields = current
            .as_object_mut()
            .ok_or_else(|| GatewayError::malformed(format!("taxon {id} is not an object")))?;
        if let Some(author) = patch.author {
            fields.insert("author".to_string(), Value::String(author));
        }
        if let Some(is_accepted) = patch.is_accepted {
            fields.insert("isaccepted".to_string(), Value::Bool(is_accepted));
        }
        if let Some(accepted) = patch.accepted {
            fields.insert(
                "acceptedtaxon".to_string(),
                Value::String(resource_uri("taxon", accepted.0)),
            );
        }
        let updated: TaxonResource = serde_json::from_value(
            self.session.put_json(&url, &current).await?,
        )
        .map_err(|e| GatewayError::malformed(e.to_string()))?;
        debug!(id = %id, "updated taxon");
        self.to_record(updated)
    }

    async fn create_record_set(
        &self,
        scope: &RecordSetScope,
        name: &str,
    ) -> std::result::Result<RecordSetHandle, GatewayError> {
        let body = serde_json::json!({
            "collectionmemberid": self.collection_id,
            "dbtableid": TAXON_TABLE_ID,
            "name": name,
            "type": 0,
            "version": 0,
            "specifyuser": scope.owner,
        });
        let url = endpoints::collection_url(self.session.base_url(), "recordset");
        let created = self.session.post_json(&url, &body).await?;
        let id = created
            .get("id")
            .and_then(Value::as_i64)
            .ok_or_else(|| GatewayError::malformed("record set response has no id"))?;
        info!(id, name, "created record set");
        Ok(RecordSetHandle {
            id,
            name: name.to_string(),
        })
    }

    async fn add_record_set_items(
        &self,
        handle: &RecordSetHandle,
        ids: &[TaxonId],
    ) -> std::result::Result<(), GatewayError> {
        let url = endpoints::collection_url(self.session.base_url(), "recordsetitem");
        let record_set = resource_uri("recordset", handle.id);
        for id in ids {
            let body = serde_json::json!({
                "recordid": id.0,
                "recordset": record_set,
            });
            self.session.post_json(&url, &body).await?;
        }
        debug!(record_set = handle.id, count = ids.len(), "added record set items");
        Ok(())
    }
}
