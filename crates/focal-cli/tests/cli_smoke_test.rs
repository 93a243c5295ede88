use assert_cmd::prelude::*;
use serde_json::Value;
use std::fs;
use std::path::PathBuf;
use std::process::Command;

/// Path-graph 0-1-2-3-4-5 plus a triangle 6-7-8, written to a temp dir.
fn write_graph(dir: &tempfile::TempDir) -> PathBuf {
    let path = dir.path().join("graph.json");
    let graph = serde_json::json!({
        "numNodes": 9,
        "edges": [
            {"source": 0, "target": 1}, {"source": 1, "target": 2}, {"source": 2, "target": 3},
            {"source": 3, "target": 4}, {"source": 4, "target": 5},
            {"source": 6, "target": 7}, {"source": 7, "target": 8}, {"source": 8, "target": 6}
        ]
    });
    fs::write(&path, graph.to_string()).expect("write graph");
    path
}

fn run_json(args: &[&str]) -> Value {
    let exe = assert_cmd::cargo_bin!("focal-cli");
    let out = Command::new(exe).args(args).assert().success();
    serde_json::from_slice(&out.get_output().stdout).expect("stdout is JSON")
}

#[test]
fn resolve_prints_hop_buckets() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let graph = write_graph(&tmp);
    let v = run_json(&["resolve", "--groups", "0", graph.to_string_lossy().as_ref()]);
    assert_eq!(v["neighborsByHop"], serde_json::json!([[1], [2]]));
    assert_eq!(v["isSelected"]["0"], 0);
}

#[test]
fn spiral_layout_places_selection_and_neighbors() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let graph = write_graph(&tmp);
    let v = run_json(&[
        "layout",
        "--layout",
        "spiral",
        "--groups",
        "2",
        graph.to_string_lossy().as_ref(),
    ]);
    let coords = v["layout"]["coordinates"].as_array().expect("coordinates");
    assert_eq!(coords.len(), 9);
    let placed: Vec<usize> = (0..9).filter(|&i| !coords[i].is_null()).collect();
    assert_eq!(placed, vec![0, 1, 2, 3, 4]);
}

#[test]
fn pair_layout_reads_graph_from_stdin() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let graph = write_graph(&tmp);
    let exe = assert_cmd::cargo_bin!("focal-cli");
    let out = assert_cmd::Command::new(exe)
        .args(["layout", "--layout", "d3", "--pair", "0,7", "-"])
        .pipe_stdin(&graph)
        .expect("stdin")
        .assert()
        .success();
    let v: Value = serde_json::from_slice(&out.get_output().stdout).expect("stdout is JSON");
    assert_eq!(v["groups"], serde_json::json!([[0], [7]]));
}

#[test]
fn initial_layout_covers_all_nodes() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let graph = write_graph(&tmp);
    let v = run_json(&["initial", "--bounded", graph.to_string_lossy().as_ref()]);
    assert_eq!(v["coordinates"].as_array().map(Vec::len), Some(9));
}

#[test]
fn usage_errors_exit_with_code_2() {
    let exe = assert_cmd::cargo_bin!("focal-cli");
    Command::new(exe).args(["--layout", "grid"]).assert().code(2);
}

#[test]
fn out_of_range_edges_are_rejected() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let path = tmp.path().join("bad.json");
    fs::write(&path, r#"{"numNodes": 2, "edges": [{"source": 0, "target": 5}]}"#).expect("write");
    let exe = assert_cmd::cargo_bin!("focal-cli");
    Command::new(exe)
        .arg(path.to_string_lossy().as_ref())
        .assert()
        .code(1);
}
