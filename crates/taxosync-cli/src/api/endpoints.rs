//! URL builders for the remote store API

/// Login context endpoint, used for both session probe and login PUT.
pub fn login_url(base: &str) -> String {
    format!("{}/context/login/", base.trim_end_matches('/'))
}

/// Current-user context endpoint.
pub fn user_url(base: &str) -> String {
    format!("{}/context/user.json", base.trim_end_matches('/'))
}

/// Single-resource endpoint for a table row.
pub fn resource_url(base: &str, table: &str, id: i64) -> String {
    format!(
        "{}/api/specify/{}/{}/",
        base.trim_end_matches('/'),
        table.to_lowercase(),
        id
    )
}

/// Collection endpoint for creating rows in a table.
pub fn collection_url(base: &str, table: &str) -> String {
    format!(
        "{}/api/specify/{}/",
        base.trim_end_matches('/'),
        table.to_lowercase()
    )
}

/// Query taxa by name, rank definition item and parent id.
pub fn taxon_query_url(base: &str, name: &str, definition_item: i64, parent: i64) -> String {
    format!(
        "{}/api/specify/taxon/?name={}&definitionitem={}&parent={}",
        base.trim_end_matches('/'),
        urlencoding::encode(name),
        definition_item,
        parent
    )
}

/// Query taxa by name and rank definition item only, with no parent
/// constraint. Used when anchoring the fixed root.
pub fn taxon_rank_query_url(base: &str, name: &str, definition_item: i64) -> String {
    format!(
        "{}/api/specify/taxon/?name={}&definitionitem={}",
        base.trim_end_matches('/'),
        urlencoding::encode(name),
        definition_item
    )
}

/// Query tree definition items by rank name within a tree definition.
pub fn defitem_query_url(base: &str, rank_name: &str, tree_def: i64) -> String {
    format!(
        "{}/api/specify/taxontreedefitem/?name={}&treedef={}",
        base.trim_end_matches('/'),
        urlencoding::encode(rank_name),
        tree_def
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_trailing_slash_stripped() {
        assert_eq!(
            login_url("http://localhost:8000/"),
            "http://localhost:8000/context/login/"
        );
        assert_eq!(
            resource_url("http://localhost:8000/", "Taxon", 9),
            "http://localhost:8000/api/specify/taxon/9/"
        );
    }

    #[test]
    fn test_taxon_query_encodes_name() {
        let url = taxon_query_url("http://localhost:8000", "Oryzorictes hova", 14, 3);
        assert_eq!(
            url,
            "http://localhost:8000/api/specify/taxon/?name=Oryzorictes%20hova&definitionitem=14&parent=3"
        );
    }

    #[test]
    fn test_defitem_query() {
        let url = defitem_query_url("http://localhost:8000", "Species", 1);
        assert_eq!(
            url,
            "http://localhost:8000/api/specify/taxontreedefitem/?name=Species&treedef=1"
        );
    }
}
