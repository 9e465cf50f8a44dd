//! Substring search over tables and columns.

use crate::ast::{Column, Schema, Table};
use crate::query;
use serde::Serialize;

/// A table or column matched by a query.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Hit<'a> {
    Table {
        name: &'a str,
        remarks: Option<&'a str>,
    },
    Column {
        name: &'a str,
        remarks: Option<&'a str>,
    },
}

impl<'a> Hit<'a> {
    fn table(table: &'a Table) -> Self {
        Hit::Table {
            name: &table.name,
            remarks: table.remarks.as_deref(),
        }
    }

    fn column(column: &'a Column) -> Self {
        Hit::Column {
            name: &column.name,
            remarks: column.remarks.as_deref(),
        }
    }

    pub fn name(&self) -> &'a str {
        match self {
            Hit::Table { name, .. } | Hit::Column { name, .. } => *name,
        }
    }

    pub fn remarks(&self) -> Option<&'a str> {
        match self {
            Hit::Table { remarks, .. } | Hit::Column { remarks, .. } => *remarks,
        }
    }

    /// Case-sensitive substring match on name or remarks.
    /// Missing remarks behave as the empty string.
    pub fn matches(&self, query: &str) -> bool {
        self.name().contains(query) || self.remarks().unwrap_or("").contains(query)
    }
}

/// All tables followed by all columns, each group in document order,
/// keeping those that match `query`. An empty query keeps everything.
pub fn search<'a>(schema: &'a Schema, query: &str) -> Vec<Hit<'a>> {
    let hits: Vec<Hit<'a>> = query::tables(schema)
        .iter()
        .map(Hit::table)
        .chain(query::columns(schema).map(Hit::column))
        .filter(|hit| hit.matches(query))
        .collect();

    tracing::debug!(query, hits = hits.len(), "search completed");
    hits
}

/// Events produced by the search page.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchEvent {
    QueryChanged(String),
    Submitted,
}

/// Search page model. Hits only change on submit.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchState<'a> {
    pub query: String,
    pub hits: Vec<Hit<'a>>,
}

impl<'a> SearchState<'a> {
    pub fn update(&self, schema: &'a Schema, event: SearchEvent) -> SearchState<'a> {
        match event {
            SearchEvent::QueryChanged(query) => SearchState {
                query,
                hits: self.hits.clone(),
            },
            SearchEvent::Submitted => SearchState {
                query: self.query.clone(),
                hits: search(schema, &self.query),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_schema;

    const CLINICAL: &str = r#"
        <database>
            <tables>
                <table name="PATIENT" remarks="Clinical patient record">
                    <column name="birth_date" remarks="Date of birth"/>
                </table>
            </tables>
        </database>
    "#;

    const TWO_TABLES: &str = r#"
        <database>
            <table name="person" remarks="A person">
                <column name="person_id" remarks="Identifier"/>
                <column name="year_of_birth"/>
            </table>
            <table name="death">
                <column name="death_date" remarks="When the person died"/>
            </table>
        </database>
    "#;

    fn names<'a>(hits: &[Hit<'a>]) -> Vec<&'a str> {
        hits.iter().map(|h| h.name()).collect()
    }

    #[test]
    fn test_patient_fixture() {
        let schema = parse_schema(CLINICAL).unwrap();
        let hits = search(&schema, "patient");
        assert_eq!(hits.len(), 1);
        assert!(matches!(hits[0], Hit::Table { name: "PATIENT", .. }));
    }

    #[test]
    fn test_empty_query_returns_everything_tables_first() {
        let schema = parse_schema(TWO_TABLES).unwrap();
        let hits = search(&schema, "");
        assert_eq!(
            names(&hits),
            vec!["person", "death", "person_id", "year_of_birth", "death_date"]
        );
        assert!(matches!(hits[1], Hit::Table { .. }));
        assert!(matches!(hits[2], Hit::Column { .. }));
    }

    #[test]
    fn test_name_or_remarks() {
        let schema = parse_schema(TWO_TABLES).unwrap();
        // "person" is in two names and in one remarks
        assert_eq!(names(&search(&schema, "person")), vec!["person", "person_id", "death_date"]);
    }

    #[test]
    fn test_case_sensitive() {
        let schema = parse_schema(TWO_TABLES).unwrap();
        assert!(search(&schema, "PERSON").is_empty());
    }

    #[test]
    fn test_missing_remarks_does_not_fail() {
        let schema = parse_schema(TWO_TABLES).unwrap();
        assert_eq!(names(&search(&schema, "birth")), vec!["year_of_birth"]);
    }

    #[test]
    fn test_state_transitions() {
        let schema = parse_schema(TWO_TABLES).unwrap();
        let initial = SearchState::default();
        assert!(initial.hits.is_empty());

        let typed = initial.update(&schema, SearchEvent::QueryChanged("death".into()));
        assert_eq!(typed.query, "death");
        assert!(typed.hits.is_empty());
        assert_eq!(initial.query, "");

        let submitted = typed.update(&schema, SearchEvent::Submitted);
        assert_eq!(names(&submitted.hits), vec!["death", "death_date"]);

        let retyped = submitted.update(&schema, SearchEvent::QueryChanged("x".into()));
        assert_eq!(retyped.hits, submitted.hits);
    }
}
