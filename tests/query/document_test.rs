//! Query documents and settings loaded from the files under `demos/`.

use std::path::PathBuf;

use insta::assert_snapshot;
use mptsql::compile::compile_query;
use mptsql::config::Settings;
use mptsql::query::document::QueryDocument;
use mptsql::rdf::ntriples;
use mptsql::sql::Dialect;
use mptsql::tables::TableManager;

fn demo(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("demos").join(name)
}

fn compile_demo(document: &str, dialect: Option<Dialect>) -> String {
    let settings = Settings::from_file(demo("mptsql.toml")).unwrap();
    let tables = settings.table_manager().unwrap();
    let dialect = dialect.unwrap_or_else(|| settings.dialect().unwrap());

    let doc = QueryDocument::from_file(demo(document)).unwrap();
    let output = compile_query(
        &tables,
        doc.to_query().unwrap(),
        doc.targets.as_slice(),
        doc.ordering(),
        dialect,
    )
    .unwrap();
    assert_eq!(output.targets, vec!["person", "friend", "name"]);
    output.sql.join("\n")
}

#[test]
fn test_demo_settings() {
    let settings = Settings::from_file(demo("mptsql.toml")).unwrap();
    assert_eq!(settings.dialect().unwrap(), Dialect::Postgres);

    let tables = settings.table_manager().unwrap();
    let names: Vec<_> = tables
        .predicates()
        .iter()
        .filter_map(|p| tables.table_for(p))
        .collect();
    assert_eq!(names, vec!["t_knows", "t_age", "t_name"]);
}

#[test]
fn test_compile_toml_document() {
    assert_snapshot!(
        compile_demo("friends.toml", None),
        @r#"SELECT t_knows.s, t_knows.o, t_name.o FROM t_knows JOIN t_age ON (t_knows.s = t_age.s AND t_age.o > '"30"') LEFT OUTER JOIN t_name ON (t_knows.o = t_name.s) ORDER BY t_name.o ASC"#
    );
}

#[test]
fn test_json_document_matches_toml() {
    assert_eq!(
        compile_demo("friends.json", None),
        compile_demo("friends.toml", None)
    );
}

#[test]
fn test_dialect_override() {
    let oracle = compile_demo("friends.toml", Some(Dialect::Oracle));
    assert_eq!(oracle, compile_demo("friends.toml", None));
}

#[test]
fn test_demo_ntriples_parse() {
    let content = std::fs::read_to_string(demo("people.nt")).unwrap();
    let triples: Vec<_> = content
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with('#'))
        .map(|l| ntriples::parse_triple(l).unwrap())
        .collect();

    assert_eq!(triples.len(), 6);
    assert_eq!(triples[5].object.lexical(), "Caf\u{e9} Carol");
    assert_eq!(
        triples[3].to_string(),
        "<http://example.org/bob> <http://xmlns.com/foaf/0.1/name> \"Bob\"@en ."
    );
}
