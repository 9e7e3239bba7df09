//! Planner integration tests: join shapes produced from multi-element queries.

use insta::assert_snapshot;
use mptsql::planner::{Plan, Planner, QueryError};
use mptsql::query::{GraphPattern, GraphQuery, NodeFilter};
use mptsql::rdf::{IriRef, Node, NodePattern, TriplePattern};
use mptsql::sql::{Dialect, SortDir};
use mptsql::tables::InMemoryTableManager;
use sqlparser::dialect::GenericDialect;
use sqlparser::parser::Parser;

fn tables() -> InMemoryTableManager {
    ["p", "q", "r"]
        .into_iter()
        .map(|p| {
            (
                IriRef::new(format!("http://example.org/{}", p)).unwrap(),
                format!("t_{}", p),
            )
        })
        .collect()
}

fn tp(s: &str, p: &str, o: &str) -> TriplePattern {
    TriplePattern::parse(s, &format!("<http://example.org/{}>", p), o).unwrap()
}

fn gp(triples: &[(&str, &str, &str)]) -> GraphPattern {
    GraphPattern::new(triples.iter().map(|(s, p, o)| tp(s, p, o)).collect())
}

fn plan(query: &GraphQuery, targets: &[&str]) -> Result<Plan, QueryError> {
    plan_ordered(query, targets, None)
}

fn plan_ordered(
    query: &GraphQuery,
    targets: &[&str],
    ordering: Option<(&str, SortDir)>,
) -> Result<Plan, QueryError> {
    let tables = tables();
    let targets: Vec<String> = targets.iter().map(|t| t.to_string()).collect();
    Planner::new(&tables).plan(query, &targets, ordering)
}

fn sql(query: &GraphQuery, targets: &[&str]) -> String {
    let sql = plan(query, targets).unwrap().to_sql(Dialect::Postgres);
    if let Err(e) = Parser::parse_sql(&GenericDialect {}, &sql) {
        panic!("SQL does not parse: {}\n{}", e, sql);
    }
    sql
}

// ============================================================================
// Required elements
// ============================================================================

#[test]
fn test_self_join() {
    let query = GraphQuery::default().with_required(gp(&[("?a", "p", "?b"), ("?b", "p", "?c")]));
    assert_snapshot!(
        sql(&query, &["a", "c"]),
        @"SELECT t_p.s, t_p_1.o FROM t_p JOIN t_p AS t_p_1 ON (t_p.o = t_p_1.s)"
    );
}

#[test]
fn test_multi_triple_element_is_nested() {
    let query = GraphQuery::default()
        .with_required(gp(&[("?a", "p", "?b")]))
        .with_required(gp(&[("?b", "q", "?c"), ("?c", "r", "?d")]));
    assert_snapshot!(
        sql(&query, &["a", "d"]),
        @"SELECT t_p.s, t_r.o FROM t_p JOIN (t_q JOIN t_r ON (t_q.o = t_r.s)) ON (t_p.o = t_q.s)"
    );
}

#[test]
fn test_repeated_variable_in_triple() {
    let query = GraphQuery::default().with_required(gp(&[("?x", "p", "?x")]));
    assert_snapshot!(sql(&query, &["x"]), @"SELECT t_p.s FROM t_p WHERE t_p.s = t_p.o");
}

#[test]
fn test_constant_subject_on_seed_goes_to_where() {
    let query = GraphQuery::default().with_required(gp(&[
        ("<http://example.org/alice>", "p", "?f"),
        ("?f", "q", "?n"),
    ]));
    assert_snapshot!(
        sql(&query, &["f", "n"]),
        @"SELECT t_p.o, t_q.o FROM t_p JOIN t_q ON (t_p.o = t_q.s) WHERE t_p.s = '<http://example.org/alice>'"
    );
}

#[test]
fn test_filter_between_joined_tables() {
    let filter = NodeFilter::new(
        NodePattern::var("b").unwrap(),
        "<>",
        NodePattern::var("d").unwrap(),
    )
    .unwrap();
    let query = GraphQuery::default()
        .with_required(gp(&[("?a", "p", "?b"), ("?a", "q", "?d")]).with_filter(filter));
    assert_snapshot!(
        sql(&query, &["a"]),
        @"SELECT t_p.s FROM t_p JOIN t_q ON (t_p.s = t_q.s AND t_p.o <> t_q.o)"
    );
}

// ============================================================================
// Optional elements
// ============================================================================

#[test]
fn test_optional_multi_triple_with_constant() {
    let query = GraphQuery::default()
        .with_required(gp(&[("?s", "p", "?o")]))
        .with_optional(gp(&[("?s", "q", "?x"), ("?x", "r", "\"v\"")]));
    assert_snapshot!(
        sql(&query, &["s", "x"]),
        @r#"SELECT t_p.s, t_q.o FROM t_p LEFT OUTER JOIN (t_q JOIN t_r ON (t_q.o = t_r.s AND t_r.o = '"v"')) ON (t_p.s = t_q.s)"#
    );
}

#[test]
fn test_optionals_join_against_required_columns() {
    let query = GraphQuery::default()
        .with_required(gp(&[("?s", "p", "?o")]))
        .with_optional(gp(&[("?s", "q", "?x")]))
        .with_optional(gp(&[("?s", "r", "?y")]));
    assert_snapshot!(
        sql(&query, &["s", "x", "y"]),
        @"SELECT t_p.s, t_q.o, t_r.o FROM t_p LEFT OUTER JOIN t_q ON (t_p.s = t_q.s) LEFT OUTER JOIN t_r ON (t_p.s = t_r.s)"
    );
}

#[test]
fn test_optional_inner_join_references_outer_alias() {
    // `?s` is bound by the required element, so the nested ON names `t_p`
    let query = GraphQuery::default()
        .with_required(gp(&[("?s", "p", "?o")]))
        .with_optional(gp(&[("?y", "r", "?z"), ("?s", "q", "?y")]));
    assert_snapshot!(
        sql(&query, &["s", "z"]),
        @"SELECT t_p.s, t_r.o FROM t_p LEFT OUTER JOIN (t_r JOIN t_q ON (t_p.s = t_q.s AND t_r.s = t_q.o)) ON (t_p.s = t_q.s)"
    );
}

#[test]
fn test_order_by_optional_variable() {
    let query = GraphQuery::default()
        .with_required(gp(&[("?s", "p", "?o")]))
        .with_optional(gp(&[("?s", "q", "?label")]));
    let sql = plan_ordered(&query, &["s", "label"], Some(("label", SortDir::Asc)))
        .unwrap()
        .to_sql(Dialect::Postgres);
    assert_snapshot!(
        sql,
        @"SELECT t_p.s, t_q.o FROM t_p LEFT OUTER JOIN t_q ON (t_p.s = t_q.s) ORDER BY t_q.o ASC"
    );
}

#[test]
fn test_optional_filter_stays_in_on_clause() {
    let filter = NodeFilter::new(NodePattern::var("x").unwrap(), ">", Node::plain("10")).unwrap();
    let query = GraphQuery::default()
        .with_required(gp(&[("?s", "p", "?o")]))
        .with_optional(gp(&[("?s", "q", "?x")]).with_filter(filter));
    let sql = sql(&query, &["s", "x"]);
    assert!(!sql.contains("WHERE"), "{}", sql);
    assert_snapshot!(
        sql,
        @r#"SELECT t_p.s, t_q.o FROM t_p LEFT OUTER JOIN t_q ON (t_p.s = t_q.s AND t_q.o > '"10"')"#
    );
}

// ============================================================================
// Failures
// ============================================================================

#[test]
fn test_optional_without_required() {
    let query = GraphQuery::default().with_optional(gp(&[("?s", "p", "?o")]));
    assert_eq!(plan(&query, &["s"]), Err(QueryError::OptionalWithoutRequired));
}

#[test]
fn test_filter_on_unbound_variable() {
    let filter = NodeFilter::new(NodePattern::var("zz").unwrap(), "=", Node::plain("1")).unwrap();
    let query = GraphQuery::default()
        .with_required(gp(&[("?a", "p", "?b"), ("?b", "q", "?c")]).with_filter(filter));
    assert!(matches!(
        plan(&query, &["a"]),
        Err(QueryError::FilterUnbound(f)) if f == "FILTER(?zz = \"1\")"
    ));
}

#[test]
fn test_empty_plan() {
    assert_eq!(plan(&GraphQuery::default(), &[]), Ok(Plan::Empty));
}
