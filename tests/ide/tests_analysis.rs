//! AnalysisHost snapshot tests.

use std::thread;

use crate::helpers::*;
use helm_ls::project::{ValuesFileRole, ValuesFilesConfig};
use helm_ls::{AnalysisHost, Location, Position};
use tokio_util::sync::CancellationToken;

const CHART_VALUES: &str = "file:///chart/values.yaml";
const CHART_TEMPLATE: &str = "file:///chart/templates/test.yaml";

fn host_with_fixture() -> AnalysisHost {
    let host = AnalysisHost::new();
    host.set_values_file(CHART_VALUES, VALUES).unwrap();
    host.set_template(CHART_TEMPLATE, TEMPLATE);
    host
}

#[test]
fn test_goto_through_host() {
    let host = host_with_fixture();
    let result = host
        .analysis()
        .goto_definition(CHART_TEMPLATE, Position::new(9, 26), &CancellationToken::new())
        .unwrap();
    assert_eq!(
        result.locations,
        vec![Location::point(CHART_VALUES, Position::new(3, 2))]
    );
}

#[test]
fn test_additional_values_follow_main() {
    let host = host_with_fixture();
    assert_eq!(
        host.set_values_file("file:///chart/values.prod.yaml", VALUES)
            .unwrap(),
        Some(ValuesFileRole::Additional)
    );
    assert_eq!(
        host.set_values_file("file:///chart/values.lint.yaml", VALUES)
            .unwrap(),
        None
    );

    let result = host
        .analysis()
        .goto_definition(CHART_TEMPLATE, Position::new(8, 13), &CancellationToken::new())
        .unwrap();
    let uris: Vec<_> = result.locations.iter().map(|l| l.uri.as_ref()).collect();
    assert_eq!(uris, vec![CHART_VALUES, "file:///chart/values.prod.yaml"]);
}

#[test]
fn test_custom_values_file_names() {
    let host = AnalysisHost::new();
    host.set_config(ValuesFilesConfig {
        main_values_file: "defaults.yaml".to_string(),
        additional_values_files_glob_pattern: "env-*.yaml".to_string(),
        ..Default::default()
    });
    assert_eq!(
        host.set_values_file("file:///chart/defaults.yaml", "a: 1\n")
            .unwrap(),
        Some(ValuesFileRole::Main)
    );
    assert_eq!(
        host.set_values_file("file:///chart/values.yaml", "a: 1\n")
            .unwrap(),
        None
    );
    assert_eq!(
        host.set_values_file("file:///chart/env-dev.yaml", "a: 1\n")
            .unwrap(),
        Some(ValuesFileRole::Additional)
    );
}

#[test]
fn test_removed_template_is_gone_from_new_snapshots_only() {
    let host = host_with_fixture();
    let before = host.analysis();
    host.remove_template(CHART_TEMPLATE);
    let cancel = CancellationToken::new();

    assert!(
        before
            .goto_definition(CHART_TEMPLATE, Position::new(2, 8), &cancel)
            .is_some()
    );
    assert!(
        host.analysis()
            .goto_definition(CHART_TEMPLATE, Position::new(2, 8), &cancel)
            .is_none()
    );
}

#[test]
fn test_template_edit_updates_definitions() {
    let host = host_with_fixture();
    host.set_template(CHART_TEMPLATE, "\n\n{{ $variable := 1 }}{{ $variable }}");
    let result = host
        .analysis()
        .goto_definition(CHART_TEMPLATE, Position::new(2, 25), &CancellationToken::new())
        .unwrap();
    assert_eq!(
        result.locations,
        vec![Location::point(CHART_TEMPLATE, Position::new(2, 3))]
    );
}

#[test]
fn test_concurrent_reads_during_reloads() {
    let host = host_with_fixture();
    let expected_first = Location::point(CHART_VALUES, Position::new(1, 0));

    thread::scope(|scope| {
        for _ in 0..4 {
            let host = &host;
            let expected_first = expected_first.clone();
            scope.spawn(move || {
                let cancel = CancellationToken::new();
                for _ in 0..50 {
                    let analysis = host.analysis();
                    let first = analysis
                        .goto_definition(CHART_TEMPLATE, Position::new(8, 13), &cancel)
                        .unwrap();
                    let second = analysis
                        .goto_definition(CHART_TEMPLATE, Position::new(8, 13), &cancel)
                        .unwrap();
                    // One snapshot, one answer, whatever the writer does.
                    assert_eq!(first, second);
                    assert!(
                        first.locations.is_empty() || first.locations[0].uri == expected_first.uri
                    );
                }
            });
        }
        scope.spawn(|| {
            for i in 0..50 {
                let padding = "\n".repeat(i % 3);
                host.set_values_file(CHART_VALUES, &format!("{padding}{VALUES}"))
                    .unwrap();
            }
        });
    });

    let result = host
        .analysis()
        .goto_definition(CHART_TEMPLATE, Position::new(8, 13), &CancellationToken::new())
        .unwrap();
    // The last reload used 49 % 3 == 1 line of padding.
    assert_eq!(
        result.locations,
        vec![Location::point(CHART_VALUES, Position::new(2, 0))]
    );
}
