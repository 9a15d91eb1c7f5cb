//! Row materialization against a resolved schema.

use feed_model::Table;

use crate::error::MaterializeError;
use crate::normalize::{normalize, prune};

use super::header::{ResolvedSchema, clean_line, split_fields};

/// Builds the table from the data lines of `text`.
///
/// Column names are normalized from `schema.header`. Data lines start at
/// `schema.data_start` and are split one at a time, so a quoted field never
/// spans lines. Blank lines are ignored. A line whose field count differs
/// from the header is skipped and counted, never padded or truncated. Empty
/// cells become nulls, then all-null columns and rows are pruned.
pub fn materialize(text: &str, schema: &ResolvedSchema) -> Result<Table, MaterializeError> {
    let columns = normalize(schema);
    let width = schema.len();

    let mut data_lines = 0;
    let mut skipped_lines = 0;
    let mut rows = Vec::new();
    for (index, line) in text.lines().enumerate().skip(schema.data_start) {
        if line.trim().is_empty() {
            continue;
        }
        data_lines += 1;

        let line = clean_line(line, schema.delimiter, schema.trim_trailing_delimiter);
        let fields = split_fields(line, schema.delimiter);
        if fields.len() == width {
            rows.push(fields.into_iter().map(non_empty).collect::<Vec<_>>());
        } else {
            skipped_lines += 1;
            tracing::trace!(
                line = index,
                expected = width,
                found = fields.len(),
                "Skipping ragged line"
            );
        }
    }

    if skipped_lines > 0 {
        tracing::warn!(skipped_lines, data_lines, "Skipped lines whose field count did not match the header");
    }

    let mut pruned = prune(&columns, rows);
    pruned.stats.skipped_lines = skipped_lines;

    if pruned.rows.is_empty() {
        return Err(MaterializeError::EmptyResult {
            data_lines,
            skipped_lines,
        });
    }
    if pruned.columns.len() < 2 {
        return Err(MaterializeError::SingleColumn {
            column: pruned.columns.into_iter().next().unwrap_or_default(),
        });
    }

    let mut table = Table::new(pruned.columns);
    for row in pruned.rows {
        // Widths already match the header, so this cannot be refused.
        table.push_row(row);
    }
    Ok(table.with_stats(pruned.stats))
}

fn non_empty(cell: String) -> Option<String> {
    if cell.is_empty() { None } else { Some(cell) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::csv::header::{HeaderLayout, resolve};
    use feed_model::Delimiter;

    fn run(text: &str, candidates: &[Delimiter], layout: HeaderLayout) -> Result<Table, MaterializeError> {
        let schema = resolve(text, candidates, layout).unwrap();
        materialize(text, &schema)
    }

    #[test]
    fn test_materialize_basic() {
        let table = run(
            "Código;Ação;Ano\nPETR4;Petrobras;2024\nVALE3;Vale;2023\n",
            &[Delimiter::SEMICOLON],
            HeaderLayout::default(),
        )
        .unwrap();
        assert_eq!(table.columns(), ["codigo", "acao", "ano"]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.row(1).unwrap().get("acao"), Some("Vale"));
    }

    #[test]
    fn test_materialize_skips_ragged_lines() {
        let table = run(
            "a,b,c\n1,2,3\n4,5\n7,8,9\n",
            &[Delimiter::COMMA],
            HeaderLayout::default(),
        )
        .unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.stats().skipped_lines, 1);
        assert_eq!(table.column("a").unwrap(), vec![Some("1"), Some("7")]);
    }

    #[test]
    fn test_materialize_empty_cells_are_null() {
        let table = run("a;b\n1;\n;2\n", &[Delimiter::SEMICOLON], HeaderLayout::default()).unwrap();
        assert_eq!(table.column("a").unwrap(), vec![Some("1"), None]);
        assert_eq!(table.column("b").unwrap(), vec![None, Some("2")]);
    }

    #[test]
    fn test_materialize_ignores_blank_lines() {
        let table = run("a;b\n\n1;2\n   \n3;4\n", &[Delimiter::SEMICOLON], HeaderLayout::default()).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.stats().skipped_lines, 0);
    }

    #[test]
    fn test_materialize_trailing_delimiter() {
        let layout = HeaderLayout {
            header_row: 1,
            trim_trailing_delimiter: true,
        };
        let table = run(
            "Carteira do Dia\nCódigo;Ação;Qtde.;\nPETR4;PETROBRAS;4.5;\nVALE3;VALE;3.2;\n",
            &[Delimiter::SEMICOLON],
            layout,
        )
        .unwrap();
        assert_eq!(table.columns(), ["codigo", "acao", "qtde"]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.stats().skipped_lines, 0);
    }

    #[test]
    fn test_materialize_whitespace_delimiter() {
        let table = run(
            "Pais  Quantidade   Valor\nBrasil 10 200\nChile\t5\t90\n",
            &[Delimiter::Whitespace],
            HeaderLayout::default(),
        )
        .unwrap();
        assert_eq!(table.columns(), ["pais", "quantidade", "valor"]);
        assert_eq!(table.column("valor").unwrap(), vec![Some("200"), Some("90")]);
    }

    #[test]
    fn test_materialize_all_lines_skipped() {
        let err = run("a;b;c\n1;2\n3\n", &[Delimiter::SEMICOLON], HeaderLayout::default()).unwrap_err();
        assert_eq!(
            err,
            MaterializeError::EmptyResult {
                data_lines: 2,
                skipped_lines: 2,
            }
        );
    }

    #[test]
    fn test_materialize_header_only() {
        let err = run("a;b\n", &[Delimiter::SEMICOLON], HeaderLayout::default()).unwrap_err();
        assert!(matches!(err, MaterializeError::EmptyResult { data_lines: 0, .. }));
    }

    #[test]
    fn test_materialize_single_surviving_column() {
        let err = run("a;b\n1;\n2;\n", &[Delimiter::SEMICOLON], HeaderLayout::default()).unwrap_err();
        assert_eq!(
            err,
            MaterializeError::SingleColumn {
                column: "a".to_string()
            }
        );
    }

    #[test]
    fn test_materialize_quoted_delimiter() {
        let table = run(
            "nome,obs\n\"Silva, J.\",ok\n",
            &[Delimiter::COMMA],
            HeaderLayout::default(),
        )
        .unwrap();
        assert_eq!(table.row(0).unwrap().get("nome"), Some("Silva, J."));
    }

    #[test]
    fn test_materialize_stray_quote_skips_only_its_line() {
        let table = run(
            "a;b\n1;2\n\"x;3\n4;5\n6;7\n8;9\n",
            &[Delimiter::SEMICOLON],
            HeaderLayout::default(),
        )
        .unwrap();
        assert_eq!(table.len(), 4);
        assert_eq!(table.stats().skipped_lines, 1);
        assert_eq!(
            table.column("a").unwrap(),
            vec![Some("1"), Some("4"), Some("6"), Some("8")]
        );
    }

    #[test]
    fn test_materialize_trailing_empty_tab_field() {
        let table = run("a\tb\tc\n1\t2\t3\n4\t5\t", &[Delimiter::TAB], HeaderLayout::default()).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.stats().skipped_lines, 0);
        assert_eq!(table.column("c").unwrap(), vec![Some("3"), None]);
    }

    #[test]
    fn test_materialize_names_columns_from_schema() {
        let text = "Região;Produto;Região\nSul;Vinho;RS\n";
        let schema = resolve(text, &[Delimiter::SEMICOLON], HeaderLayout::default()).unwrap();
        let table = materialize(text, &schema).unwrap();
        assert_eq!(table.columns(), ["produto", "regiao"]);
        assert_eq!(table.row(0).unwrap().get("regiao"), Some("RS"));
        assert_eq!(table.stats().collided_columns, 1);
    }
}
