//! CSV row source
//!
//! Reads the nine-column input sheet and validates each record into one
//! of the two row shapes before anything reaches the engine: an accepted
//! row carries no accepted-branch columns, a synonym row carries the
//! accepted genus and species (author optional). Header and cell
//! whitespace is trimmed on read.

use std::path::Path;

use serde::Deserialize;

use taxosync_core::{AcceptedBranch, ChainNames, RowInput};

use crate::error::{CliError, Result};

/// Raw CSV record, column names as they appear in the sheet.
#[derive(Debug, Deserialize)]
struct RawRow {
    #[serde(rename = "Order")]
    order: String,
    #[serde(rename = "Family")]
    family: String,
    #[serde(rename = "Genus")]
    genus: String,
    #[serde(rename = "Species")]
    species: String,
    #[serde(rename = "isAccepted")]
    is_accepted: String,
    #[serde(rename = "Author", default)]
    author: String,
    #[serde(rename = "AcceptedGenus", default)]
    accepted_genus: String,
    #[serde(rename = "AcceptedSpecies", default)]
    accepted_species: String,
    #[serde(rename = "AcceptedAuthor", default)]
    accepted_author: String,
}

/// Read and validate all rows from `path`.
///
/// Fails on the first malformed row; `index` in the error is the
/// 1-based data row number.
pub fn read_rows(path: &Path) -> Result<Vec<RowInput>> {
    if !path.exists() {
        return Err(CliError::FileNotFound(path.display().to_string()));
    }
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)?;

    let mut rows = Vec::new();
    for (i, record) in reader.deserialize::<RawRow>().enumerate() {
        let index = i + 1;
        let raw = record.map_err(|e| CliError::row_shape(index, e.to_string()))?;
        rows.push(validate_row(index, raw)?);
    }
    Ok(rows)
}

fn validate_row(index: usize, raw: RawRow) -> Result<RowInput> {
    for (column, value) in [
        ("Order", &raw.order),
        ("Family", &raw.family),
        ("Genus", &raw.genus),
        ("Species", &raw.species),
    ] {
        if value.trim().is_empty() {
            return Err(CliError::row_shape(index, format!("'{column}' is empty")));
        }
    }

    let chain = ChainNames::new(&raw.order, &raw.family, &raw.genus, &raw.species);
    let author = blank_to_none(&raw.author);

    match raw.is_accepted.trim() {
        "Yes" => {
            if !raw.accepted_genus.trim().is_empty()
                || !raw.accepted_species.trim().is_empty()
                || !raw.accepted_author.trim().is_empty()
            {
                return Err(CliError::row_shape(
                    index,
                    "accepted row must not carry AcceptedGenus/AcceptedSpecies/AcceptedAuthor",
                ));
            }
            Ok(RowInput::accepted(chain, author))
        }
        "No" => {
            if raw.accepted_genus.trim().is_empty() || raw.accepted_species.trim().is_empty() {
                return Err(CliError::row_shape(
                    index,
                    "synonym row requires AcceptedGenus and AcceptedSpecies",
                ));
            }
            let branch = AcceptedBranch::new(
                &raw.accepted_genus,
                &raw.accepted_species,
                blank_to_none(&raw.accepted_author),
            );
            Ok(RowInput::synonym(chain, author, branch))
        }
        other => Err(CliError::row_shape(
            index,
            format!("isAccepted must be 'Yes' or 'No', got '{other}'"),
        )),
    }
}

fn blank_to_none(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use std::io::Write;

    const HEADER: &str =
        "Order,Family,Genus,Species,isAccepted,Author,AcceptedGenus,AcceptedSpecies,AcceptedAuthor";

    fn write_csv(lines: &[&str]) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "{HEADER}").unwrap();
        for line in lines {
            writeln!(file, "{line}").unwrap();
        }
        file
    }

    #[test]
    fn test_reads_accepted_row() {
        let file = write_csv(&["Afrosoricida,Tenrecidae,Microgale,talazaci,Yes,\"Major, 1896\",,,"]);
        let rows = read_rows(file.path()).unwrap();
        assert_eq!(rows.len(), 1);
        assert!(rows[0].is_accepted());
        assert_eq!(rows[0].author(), Some("Major, 1896"));
        assert_eq!(rows[0].chain().species, "talazaci");
    }

    #[test]
    fn test_reads_synonym_row() {
        let file = write_csv(&[
            "Afrosoricida,Tenrecidae,Oryzorictes,talpoides,No,\"G.Grandidier, 1899\",Oryzorictes,hova,\"A.Grandidier, 1870\"",
        ]);
        let rows = read_rows(file.path()).unwrap();
        match &rows[0] {
            RowInput::Synonym { accepted, .. } => {
                assert_eq!(accepted.genus, "Oryzorictes");
                assert_eq!(accepted.species, "hova");
                assert_eq!(accepted.author.as_deref(), Some("A.Grandidier, 1870"));
            }
            other => panic!("expected synonym row, got {other:?}"),
        }
    }

    #[test]
    fn test_cells_are_trimmed() {
        let file = write_csv(&[" Afrosoricida , Tenrecidae , Microgale , talazaci ,Yes,,,,"]);
        let rows = read_rows(file.path()).unwrap();
        assert_eq!(rows[0].chain().order, "Afrosoricida");
        assert_eq!(rows[0].author(), None);
    }

    #[test]
    fn test_synonym_missing_accepted_species_rejected() {
        let file = write_csv(&["Afrosoricida,Tenrecidae,Oryzorictes,talpoides,No,,Oryzorictes,,"]);
        let err = read_rows(file.path()).unwrap_err();
        match err {
            CliError::RowShape { index, .. } => assert_eq!(index, 1),
            other => panic!("expected RowShape, got {other:?}"),
        }
    }

    #[test]
    fn test_accepted_row_with_accepted_columns_rejected() {
        let file = write_csv(&["Afrosoricida,Tenrecidae,Microgale,talazaci,Yes,,Microgale,cowani,"]);
        assert!(matches!(
            read_rows(file.path()).unwrap_err(),
            CliError::RowShape { index: 1, .. }
        ));
    }

    #[test]
    fn test_bad_is_accepted_flag_rejected() {
        let file = write_csv(&["Afrosoricida,Tenrecidae,Microgale,talazaci,Maybe,,,,"]);
        assert!(matches!(
            read_rows(file.path()).unwrap_err(),
            CliError::RowShape { index: 1, .. }
        ));
    }

    #[test]
    fn test_empty_rank_rejected() {
        let file = write_csv(&["Afrosoricida,,Microgale,talazaci,Yes,,,,"]);
        assert!(matches!(
            read_rows(file.path()).unwrap_err(),
            CliError::RowShape { index: 1, .. }
        ));
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            read_rows(Path::new("/nonexistent/taxa.csv")).unwrap_err(),
            CliError::FileNotFound(_)
        ));
    }
}
