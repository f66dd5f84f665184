//! Integration tests for teldat-config-gen
//!
//! These tests run the complete workflow from raw table bytes to rendered
//! configs using the fixtures in src/tests/test_data.

use teldat_config_gen::models::Diagnostic;
use teldat_config_gen::output::write_configs;
use teldat_config_gen::{
    generate, ingest, run, GenError, Settings, SplitStrategy, TopologyHint, TopologyKind,
};

const INTER_TEMPLATE: &str = include_str!("../src/tests/test_data/teldat_inter_template.txt");
const FLAT_TEMPLATE: &str = include_str!("../src/tests/test_data/teldat_flat_template.txt");
const INTER_TABLE: &str = include_str!("../src/tests/test_data/sites_inter.csv");
const FLAT_TABLE: &str = include_str!("../src/tests/test_data/sites_flat.txt");

fn hint(template: &str, table: &str) -> TopologyHint {
    TopologyHint {
        template_name: Some(template.to_string()),
        table_name: Some(table.to_string()),
        ..Default::default()
    }
}

#[test]
fn test_inter_workflow() {
    let generation = run(
        INTER_TEMPLATE,
        INTER_TABLE.as_bytes(),
        hint("TELDAT_RS123_TEMPLATE_NEW_2025", "teldat_sites"),
        &Settings::default(),
    )
    .expect("Inter run failed");

    assert_eq!(generation.strategy, SplitStrategy::Comma);
    assert_eq!(generation.detection.kind, TopologyKind::Inter);

    let keys: Vec<&str> = generation
        .output
        .configs
        .iter()
        .map(|c| c.key.as_str())
        .collect();
    assert_eq!(keys, vec!["North_Mall", "Riverside", "Airport_2"]);

    // "Broken Row" has 3 of 8 fields
    assert_eq!(
        generation.diagnostics,
        vec![Diagnostic::RowSkipped {
            line: 4,
            prefix: "Broken Row,10.255.30.1,10.255.".to_string(),
            expected: 8,
            actual: 3,
        }]
    );

    let north = generation.output.get("North_Mall").unwrap();
    assert!(north.contains("set hostname North_Mall\n"));
    assert!(north.contains("subnet vlan3137 1 network 10.50.0.16 255.255.255.240\n"));
    assert!(north.contains("subnet vlan3137 1 range 10.50.0.17 10.50.0.28\n"));
    assert!(north.contains("vrf wan2\n   route 10.50.0.0 255.255.255.0 loopback11\n"));

    let riverside = generation.output.get("Riverside").unwrap();
    assert!(riverside.contains("subnet vlan3100 1 range 10.60.0.1 10.60.0.12\n"));
    // blank VLAN3137 and VRF columns keep the template values
    assert!(riverside.contains("subnet vlan3137 1 range 10.0.0.18 10.0.0.28\n"));
    assert!(riverside.contains("vrf wan2\n   route 10.0.0.0 255.255.255.0 loopback11\n"));
    assert!(riverside.contains("   ip address 10.255.1.1 255.255.255.252\n"));
}

#[test]
fn test_flat_workflow_route_matches_lan() {
    let generation = run(
        FLAT_TEMPLATE,
        FLAT_TABLE.as_bytes(),
        hint("teldat_flat_template", "sites"),
        &Settings::default(),
    )
    .expect("Flat run failed");

    assert_eq!(generation.strategy, SplitStrategy::Aligned);
    assert_eq!(generation.detection.kind, TopologyKind::Flat);
    assert!(generation.diagnostics.is_empty());

    let harbour = generation.output.get("Harbour_View").unwrap();
    assert!(harbour.contains("subnet lan 1 network 172.17.90.128 255.255.255.192\n"));
    assert!(harbour.contains("route 172.17.90.128 255.255.255.192 loopback11\n"));

    let old_town = generation.output.get("Old_Town").unwrap();
    assert!(old_town.contains("subnet lan 1 range 172.17.91.1 172.17.91.252\n"));
}

#[test]
fn test_reserve_count_from_settings() {
    let settings = Settings {
        reserve_count: 10,
        ..Settings::default()
    };
    let generation = run(
        FLAT_TEMPLATE,
        FLAT_TABLE.as_bytes(),
        TopologyHint::default(),
        &settings,
    )
    .unwrap();
    let harbour = generation.output.get("Harbour_View").unwrap();
    // 62 hosts, index 51
    assert!(harbour.contains("subnet lan 1 range 172.17.90.129 172.17.90.180\n"));
}

#[test]
fn test_unclassifiable_template_is_fatal() {
    let template = "set hostname X\nfeature ip\nexit\n";
    let table = "StoreName  Tnip1\nS1  10.0.0.1\n";
    let err = run(
        template,
        table.as_bytes(),
        hint("rs123_2025", "sites"),
        &Settings::default(),
    )
    .unwrap_err();
    assert!(matches!(err, GenError::UnresolvedTopology(_)));
}

#[test]
fn test_table_name_mismatch_is_reported() {
    let generation = run(
        INTER_TEMPLATE,
        INTER_TABLE.as_bytes(),
        hint("rs123_2025", "flat_sites"),
        &Settings::default(),
    )
    .unwrap();
    assert_eq!(generation.detection.kind, TopologyKind::Inter);
    assert!(generation
        .diagnostics
        .iter()
        .any(|d| matches!(d, Diagnostic::TopologyMismatch { .. })));
}

#[test]
fn test_missing_store_column_is_fatal() {
    let table = "Site,Tnip1,Tnip2,VLAN3100,VLAN3137,VLAN3138,X\nA,1.1.1.1,,,,,\n";
    let err = run(
        INTER_TEMPLATE,
        table.as_bytes(),
        TopologyHint::default(),
        &Settings::default(),
    )
    .unwrap_err();
    assert!(matches!(err, GenError::MissingStoreColumn { .. }));
}

#[test]
fn test_generate_and_ingest_separately() {
    let renderer = generate(INTER_TEMPLATE, &TopologyHint::default()).unwrap();
    let ingested = ingest(INTER_TABLE.as_bytes()).unwrap();
    assert_eq!(ingested.records.len(), 3);
    let rendered = renderer.render(&ingested.records[2]).unwrap();
    assert_eq!(rendered.key, "Airport_2");
    assert!(rendered.text.contains("subnet vlan3138 1 range 10.70.0.33 10.70.0.60\n"));
}

#[test]
fn test_write_configs_one_file_per_site() {
    let generation = run(
        INTER_TEMPLATE,
        INTER_TABLE.as_bytes(),
        TopologyHint::default(),
        &Settings::default(),
    )
    .unwrap();
    let dir = tempfile::tempdir().unwrap();
    let written = write_configs(&generation, dir.path()).unwrap();
    assert_eq!(written.len(), 3);
    assert!(dir.path().join("Airport_2_TELDAT_CONFIG.txt").exists());
}

#[test]
fn test_store_ids_with_path_separators_stay_in_output_dir() {
    let table = "StoreName  BVI_IP\n../escaped  10.0.0.1\nA/B  10.0.1.1\n";
    let generation = run(
        FLAT_TEMPLATE,
        table.as_bytes(),
        TopologyHint::default(),
        &Settings::default(),
    )
    .unwrap();
    let keys: Vec<&str> = generation
        .output
        .configs
        .iter()
        .map(|c| c.key.as_str())
        .collect();
    assert_eq!(keys, vec![".._escaped", "A_B"]);

    let root = tempfile::tempdir().unwrap();
    let out = root.path().join("out");
    let written = write_configs(&generation, &out).unwrap();
    assert_eq!(written.len(), 2);
    for path in written.iter() {
        assert_eq!(path.parent(), Some(out.as_path()));
        assert!(path.exists());
    }
    assert!(!root.path().join("escaped_TELDAT_CONFIG.txt").exists());
}
