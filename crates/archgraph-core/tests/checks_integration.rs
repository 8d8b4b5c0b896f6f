//! Integration test: TOML configuration and edge snapshot end-to-end.
//!
//! Uses fixture files under `tests/fixtures/layered/` to verify that the
//! full TOML → DTO → domain model → `run_checks` pipeline reports the
//! expected findings, plus the graph-level properties every checker relies on.

use archgraph_core::declarative::{self, ExtractionSource};
use archgraph_core::{
    find_cycles, project_edges, run_checks, CheckContext, DependencyRule, Diagram, DiagramCheck,
    Edge, Filter, Projection, RuleMode, Severity, SlicePattern, SuffixTable, Violation,
};
use std::path::PathBuf;

fn fixture_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/layered")
}

fn fixture_edges() -> Vec<Edge> {
    let json = std::fs::read_to_string(fixture_root().join("edges.json")).unwrap();
    serde_json::from_str(&json).unwrap()
}

fn edges(pairs: &[(&str, &str)]) -> Vec<Edge> {
    pairs.iter().map(|(s, t)| Edge::new(*s, *t)).collect()
}

// ── Configured pipeline ──

#[test]
fn fixture_config_reports_expected_findings() {
    let config = declarative::load_config_from_file(&fixture_root().join("archgraph.toml")).unwrap();
    assert_eq!(
        config.extraction.source,
        Some(ExtractionSource::EdgeFile(fixture_root().join("edges.json")))
    );

    let result = run_checks(&CheckContext::new("fixture"), &fixture_edges(), &config.checks);
    assert_eq!(result.checks_run, 6);
    assert_eq!(result.edges_checked, 6);

    let count = |name: &str| result.for_check(name).len();
    assert_eq!(count("no-layer-cycles"), 1);
    assert_eq!(count("services-not-controllers"), 1);
    assert_eq!(count("mistyped-rule"), 1);
    assert_eq!(count("layers"), 1);
    assert_eq!(count("controllers-not-repositories"), 0);
    assert_eq!(count("service-naming"), 1);

    assert!(matches!(
        result.for_check("mistyped-rule")[0].violation,
        Violation::EmptyResult(_)
    ));
    assert_eq!(result.count_by_severity(), (3, 1, 1));
    assert!(result.has_errors());
}

#[test]
fn fixture_cycle_keeps_raw_imports() {
    let config = declarative::load_config_from_file(&fixture_root().join("archgraph.toml")).unwrap();
    let result = run_checks(
        &CheckContext::new("fixture"),
        &fixture_edges(),
        &config.select(&["no-layer-cycles".to_string()]).checks,
    );

    let Violation::Cycle(v) = &result.findings[0].violation else {
        panic!("expected cycle violation");
    };
    insta::assert_snapshot!(v.describe(), @r"
    cycle detected: controllers -> services -> controllers
        - src/controllers/user.controller.ts -> src/services/user.service.ts [value, named]
        - src/services/user.service.ts -> src/controllers/user.controller.ts [type, named]
    ");
}

#[test]
fn json_report_is_tagged() {
    let config = declarative::load_config_from_file(&fixture_root().join("archgraph.toml")).unwrap();
    let result = run_checks(&CheckContext::default(), &fixture_edges(), &config.checks);
    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json["findings"][0]["check"], "no-layer-cycles");
    assert_eq!(json["findings"][0]["violation"]["kind"], "cycle");
    assert_eq!(json["findings"][0]["severity"], "error");
    let first_edge = &json["findings"][0]["violation"]["cycle"]["edges"][0];
    assert_eq!(first_edge["sourceLabel"], "controllers");
    assert_eq!(first_edge["cumulatedEdges"][0]["importKinds"][0], "value");
}

// ── Graph properties ──

#[test]
fn projection_partitions_raw_edges() {
    let raw = fixture_edges();
    let projections = [
        Projection::Identity,
        Projection::Slices(SlicePattern::from_glob("src/(*)/**").unwrap()),
        Projection::Suffix(SuffixTable::new([
            (".controller.ts", "controllers"),
            (".service.ts", "services"),
        ])),
    ];
    for projection in &projections {
        let projected = project_edges(&raw, projection);
        let mapped = raw.iter().filter(|e| projection.project(e).is_some()).count();
        let total: usize = projected.iter().map(|p| p.cumulated_edges.len()).sum();
        assert_eq!(total, mapped, "{projection}");

        let mut pairs: Vec<_> = projected
            .iter()
            .map(|p| (&p.source_label, &p.target_label))
            .collect();
        pairs.sort();
        pairs.dedup();
        assert_eq!(pairs.len(), projected.len(), "{projection}");
    }
}

#[test]
fn empty_inputs_stay_empty() {
    let none: Vec<Edge> = Vec::new();
    assert!(project_edges(&none, &Projection::Identity).is_empty());
    assert!(find_cycles(&[]).is_empty());

    let rule = DependencyRule::new(
        RuleMode::ShouldNot,
        vec![Filter::path_glob("src/**").unwrap()],
        vec![],
    )
    .unwrap();
    let violations = rule.check(&none);
    assert_eq!(violations.len(), 1);
    assert!(matches!(violations[0], Violation::EmptyResult(_)));
}

#[test]
fn scenario_three_cycle() {
    let cycles = find_cycles(&project_edges(
        &edges(&[("a", "b"), ("b", "c"), ("c", "a")]),
        &Projection::Identity,
    ));
    assert_eq!(cycles.len(), 1);
    assert_eq!(cycles[0].to_string(), "a -> b -> c -> a");
}

#[test]
fn scenario_two_independent_cycles() {
    let cycles = find_cycles(&project_edges(
        &edges(&[("a", "b"), ("b", "a"), ("a", "d"), ("d", "a")]),
        &Projection::Identity,
    ));
    let rendered: Vec<String> = cycles.iter().map(ToString::to_string).collect();
    assert_eq!(rendered, vec!["a -> b -> a", "a -> d -> a"]);
}

#[test]
fn scenario_should_not_direction() {
    let rule = DependencyRule::new(
        RuleMode::ShouldNot,
        vec![Filter::path_glob("services/**").unwrap()],
        vec![Filter::path_glob("controllers/**").unwrap()],
    )
    .unwrap();

    assert_eq!(
        rule.check(&edges(&[("services/x", "controllers/y")])).len(),
        1
    );
    let reverse = edges(&[("controllers/y", "services/x")]);
    assert!(rule.check(&reverse).is_empty());
}

#[test]
fn scenario_diagram_round_trip() {
    let with = Diagram::parse("@startuml\ncomponent [A]\ncomponent [B]\n[A] --> [B]\n@enduml").unwrap();
    let without = Diagram::parse("@startuml\ncomponent [A]\ncomponent [B]\n@enduml").unwrap();
    let forward = project_edges(&edges(&[("A", "B")]), &Projection::Identity);

    assert!(DiagramCheck::new(with.clone()).check(&forward).is_empty());
    assert_eq!(DiagramCheck::new(without).check(&forward).len(), 1);

    let backward = project_edges(&edges(&[("B", "A")]), &Projection::Identity);
    for ignore in [false, true] {
        let check = DiagramCheck::new(with.clone()).ignore_unknown_nodes(ignore);
        assert_eq!(check.check(&backward).len(), 1);
    }
}

#[test]
fn repeated_runs_are_identical() {
    let config = declarative::load_config_from_file(&fixture_root().join("archgraph.toml")).unwrap();
    let ctx = CheckContext::new("twice");
    let edges = fixture_edges();
    let first = run_checks(&ctx, &edges, &config.checks);
    let second = run_checks(&ctx, &edges, &config.checks);
    assert_eq!(first.findings, second.findings);
    assert_eq!(first.format_report(Severity::Info), second.format_report(Severity::Info));
}
