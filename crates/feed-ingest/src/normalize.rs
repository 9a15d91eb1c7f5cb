//! Column-name normalization and pruning of empty rows/columns.

use std::collections::BTreeSet;

use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

use feed_model::IngestStats;

use crate::csv::ResolvedSchema;

/// A raw header name and its normalized form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedColumn {
    pub raw: String,
    pub name: String,
}

/// Normalizes every header field of a resolved schema, in order.
pub fn normalize(schema: &ResolvedSchema) -> Vec<NormalizedColumn> {
    normalize_header(&schema.header)
}

/// Normalizes a list of raw header names, in order.
pub fn normalize_header(header: &[String]) -> Vec<NormalizedColumn> {
    header
        .iter()
        .map(|raw| NormalizedColumn {
            raw: raw.clone(),
            name: normalize_name(raw),
        })
        .collect()
}

/// Cleans one column name.
///
/// In order: trim, lower-case, collapse whitespace runs into `_`, drop
/// everything that is not alphanumeric or `_`, then decompose (NFD) and
/// drop combining marks. Total and idempotent; distinct inputs may collide
/// (`"Código"` and `"Codigo"` both give `"codigo"`).
pub fn normalize_name(raw: &str) -> String {
    let lowered = raw.trim().to_lowercase();

    let mut underscored = String::with_capacity(lowered.len());
    let mut in_whitespace = false;
    for c in lowered.chars() {
        if c.is_whitespace() {
            if !in_whitespace {
                underscored.push('_');
            }
            in_whitespace = true;
        } else {
            underscored.push(c);
            in_whitespace = false;
        }
    }

    underscored
        .chars()
        .filter(|&c| is_word_char(c))
        .nfd()
        .filter(|&c| !is_combining_mark(c) && is_word_char(c))
        .collect()
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Result of pruning a materialized grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Pruned {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Option<String>>>,
    pub stats: IngestStats,
}

/// Drops all-null columns, resolves name collisions and drops all-null rows.
///
/// Columns whose normalized name is empty are named `column_{n}` (1-based
/// position). When two surviving columns share a name, the later one wins.
pub(crate) fn prune(columns: &[NormalizedColumn], rows: Vec<Vec<Option<String>>>) -> Pruned {
    let mut stats = IngestStats::default();

    let populated: Vec<usize> = (0..columns.len())
        .filter(|&idx| rows.iter().any(|row| row[idx].is_some()))
        .collect();
    stats.dropped_columns = columns.len() - populated.len();

    let name_of = |idx: usize| {
        let name = &columns[idx].name;
        if name.is_empty() {
            format!("column_{}", idx + 1)
        } else {
            name.clone()
        }
    };

    // Walk backwards so the last column with a given name is the one kept.
    let mut seen = BTreeSet::new();
    let mut kept: Vec<(usize, String)> = Vec::with_capacity(populated.len());
    for &idx in populated.iter().rev() {
        let name = name_of(idx);
        if seen.insert(name.clone()) {
            kept.push((idx, name));
        } else {
            stats.collided_columns += 1;
            tracing::warn!(
                column = %name,
                raw = %columns[idx].raw,
                "Column name collides with a later column; keeping the later one"
            );
        }
    }
    kept.reverse();

    let mut out_rows = Vec::with_capacity(rows.len());
    for mut row in rows {
        let cells: Vec<Option<String>> = kept.iter().map(|(idx, _)| row[*idx].take()).collect();
        if cells.iter().all(Option::is_none) {
            stats.dropped_rows += 1;
        } else {
            out_rows.push(cells);
        }
    }

    Pruned {
        columns: kept.into_iter().map(|(_, name)| name).collect(),
        rows: out_rows,
        stats,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn cols(names: &[&str]) -> Vec<NormalizedColumn> {
        normalize_header(&names.iter().map(|s| s.to_string()).collect::<Vec<_>>())
    }

    fn cell(value: &str) -> Option<String> {
        Some(value.to_string())
    }

    #[test]
    fn test_normalize_accents() {
        assert_eq!(normalize_name("Código"), "codigo");
        assert_eq!(normalize_name("Ação"), "acao");
        assert_eq!(normalize_name("Ano"), "ano");
        assert_eq!(normalize_name("Região"), "regiao");
    }

    #[test]
    fn test_normalize_whitespace_and_symbols() {
        assert_eq!(normalize_name("  Qtde. Teórica  "), "qtde_teorica");
        assert_eq!(normalize_name("Part. (%)"), "part_");
        assert_eq!(normalize_name("Valor   US$"), "valor_us");
        assert_eq!(normalize_name("a\t\tb"), "a_b");
    }

    #[test]
    fn test_normalize_can_be_empty() {
        assert_eq!(normalize_name("%"), "");
        assert_eq!(normalize_name("   "), "");
    }

    #[test]
    fn test_normalize_collision_is_deterministic() {
        assert_eq!(normalize_name("Código"), normalize_name("Codigo"));
    }

    #[test]
    fn test_prune_drops_empty_columns_and_rows() {
        let columns = cols(&["a", "b", ""]);
        let rows = vec![
            vec![cell("1"), None, None],
            vec![None, None, None],
            vec![cell("3"), cell("x"), None],
        ];
        let pruned = prune(&columns, rows);
        assert_eq!(pruned.columns, vec!["a", "b"]);
        assert_eq!(pruned.rows, vec![vec![cell("1"), None], vec![cell("3"), cell("x")]]);
        assert_eq!(pruned.stats.dropped_columns, 1);
        assert_eq!(pruned.stats.dropped_rows, 1);
    }

    #[test]
    fn test_prune_names_unnamed_columns_by_position() {
        let columns = cols(&["a", "%"]);
        let rows = vec![vec![cell("1"), cell("2")]];
        let pruned = prune(&columns, rows);
        assert_eq!(pruned.columns, vec!["a", "column_2"]);
    }

    #[test]
    fn test_prune_later_column_wins_collision() {
        let columns = cols(&["Código", "Nome", "Codigo"]);
        let rows = vec![vec![cell("old"), cell("n"), cell("new")]];
        let pruned = prune(&columns, rows);
        assert_eq!(pruned.columns, vec!["nome", "codigo"]);
        assert_eq!(pruned.rows, vec![vec![cell("n"), cell("new")]]);
        assert_eq!(pruned.stats.collided_columns, 1);
    }

    proptest! {
        #[test]
        fn prop_normalize_is_idempotent(raw in "[ A-Za-zÀ-ÖØ-öø-ÿ0-9_%().,/$-]{0,32}") {
            let once = normalize_name(&raw);
            prop_assert_eq!(normalize_name(&once), once.clone());
        }

        #[test]
        fn prop_normalized_names_are_word_chars(raw in "\\PC{0,24}") {
            let name = normalize_name(&raw);
            prop_assert!(name.chars().all(|c| c.is_alphanumeric() || c == '_'));
            prop_assert!(!name.chars().any(is_combining_mark));
        }
    }
}
