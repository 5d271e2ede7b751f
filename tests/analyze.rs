//! End-to-end batch scenarios: parse -> analyze -> report -> rewrite,
//! driven over a fake version-control client.

mod helper;

use std::collections::HashMap;

use depfresh::parser::{EntryStatus, GpmParser, ManifestParser};
use depfresh::report::{Report, ReportFormat};
use depfresh::resolve::BatchAnalyzer;
use helper::{FakeClient, RepoState};
use tempfile::TempDir;

fn commit_repo(latest: &str, diff: &str) -> RepoState {
    RepoState {
        latest_commit: latest.to_string(),
        commit_timestamp: "2024-01-15 10:00:00 +0000 (2 weeks ago)".to_string(),
        remote_url: "https://github.com/acme/mypkg.git".to_string(),
        diff: diff.to_string(),
        ..RepoState::default()
    }
}

#[test]
fn outdated_commit_pin_end_to_end() {
    let root = TempDir::new().unwrap();
    let client = FakeClient::new().with_repo("mypkg", commit_repo("e5f6a7b", "3 files changed"));
    let parser = GpmParser::new("/repo", "/repo/Godeps");
    let mut manifest = parser.parse("mypkg a1b2c3d\n");

    BatchAnalyzer::new(&client, root.path())
        .analyze(&mut manifest.entries)
        .unwrap();

    let entry = &manifest.entries[0];
    assert_eq!(entry.status, EntryStatus::Outdated);
    assert_eq!(entry.resolved_version, "e5f6a7b");
    assert_eq!(entry.diff_summary, "3 files changed");
    assert_eq!(
        entry.compare_url,
        "https://github.com/acme/mypkg/compare/a1b2c3d...e5f6a7b"
    );

    let outcome = parser.rewrite(&manifest);
    assert!(outcome.changed);
    assert_eq!(outcome.text, "mypkg e5f6a7b\n");
}

#[test]
fn up_to_date_commit_pin_end_to_end() {
    let root = TempDir::new().unwrap();
    let client = FakeClient::new().with_repo("mypkg", commit_repo("a1b2c3d", ""));
    let parser = GpmParser::new("/repo", "/repo/Godeps");
    let mut manifest = parser.parse("mypkg a1b2c3d\n");

    BatchAnalyzer::new(&client, root.path())
        .analyze(&mut manifest.entries)
        .unwrap();

    assert_eq!(manifest.entries[0].status, EntryStatus::UpToDate);

    let outcome = parser.rewrite(&manifest);
    assert!(!outcome.changed);
    assert_eq!(outcome.text, "mypkg a1b2c3d\n");
}

#[test]
fn ssh_path_is_skipped_and_never_fetched() {
    let root = TempDir::new().unwrap();
    let client = FakeClient::new();
    let parser = GpmParser::new("/repo", "/repo/Godeps");
    let mut manifest = parser.parse("git@internal:team/pkg 1.0\n");

    BatchAnalyzer::new(&client, root.path())
        .analyze(&mut manifest.entries)
        .unwrap();

    let entry = &manifest.entries[0];
    assert_eq!(entry.status, EntryStatus::Skipped);
    assert_eq!(
        entry.summary,
        "packages with @ in their paths aren't supported (yet)"
    );
    assert!(client.fetched.borrow().is_empty());
    assert!(client.pulled.borrow().is_empty());
}

#[test]
fn problem_entry_does_not_stop_the_batch() {
    let root = TempDir::new().unwrap();
    let client = FakeClient::new().with_repo("mypkg", commit_repo("a1b2c3d", ""));
    let parser = GpmParser::new("/repo", "/repo/Godeps");
    let mut manifest = parser.parse("github.com/gone/pkg abc123\nmypkg a1b2c3d\n");

    BatchAnalyzer::new(&client, root.path())
        .analyze(&mut manifest.entries)
        .unwrap();

    assert_eq!(manifest.entries[0].status, EntryStatus::Problem);
    assert!(manifest.entries[0].summary.contains("repository not found"));
    assert_eq!(manifest.entries[1].status, EntryStatus::UpToDate);
}

#[test]
fn tag_pin_resolves_against_latest_release_tag() {
    let root = TempDir::new().unwrap();
    let state = RepoState {
        latest_tag: Some((
            "newcafe".to_string(),
            "v1.2".to_string(),
            "2024-01-15 (2 weeks ago)".to_string(),
        )),
        tag_commits: HashMap::from([
            ("v1.0".to_string(), "oldcafe".to_string()),
            ("v1.2".to_string(), "newcafe".to_string()),
        ]),
        remote_url: "https://github.com/acme/tagged".to_string(),
        diff: "12 files changed".to_string(),
        ..RepoState::default()
    };
    let client = FakeClient::new().with_repo("github.com/acme/tagged", state);
    let parser = GpmParser::new("/repo", "/repo/Godeps");
    let mut manifest = parser.parse("github.com/acme/tagged v1.0\n");

    BatchAnalyzer::new(&client, root.path())
        .analyze(&mut manifest.entries)
        .unwrap();

    let entry = &manifest.entries[0];
    assert_eq!(entry.status, EntryStatus::Outdated);
    assert_eq!(entry.resolved_version, "v1.2");
    assert_eq!(
        entry.compare_url,
        "https://github.com/acme/tagged/compare/oldcafe...newcafe"
    );

    let outcome = parser.rewrite(&manifest);
    assert_eq!(outcome.text, "github.com/acme/tagged v1.2\n");
}

#[test]
fn diff_failure_downgrades_outdated_entry_and_excludes_it_from_rewrite() {
    let root = TempDir::new().unwrap();
    let mut state = commit_repo("e5f6a7b", "");
    state.diff_fails = true;
    let client = FakeClient::new().with_repo("mypkg", state);
    let parser = GpmParser::new("/repo", "/repo/Godeps");
    let mut manifest = parser.parse("mypkg a1b2c3d\n");

    BatchAnalyzer::new(&client, root.path())
        .analyze(&mut manifest.entries)
        .unwrap();

    assert_eq!(manifest.entries[0].status, EntryStatus::Problem);

    let outcome = parser.rewrite(&manifest);
    assert!(!outcome.changed);
    assert_eq!(outcome.text, "mypkg a1b2c3d\n");
}

#[test]
fn existing_checkout_is_pulled_instead_of_fetched() {
    let root = TempDir::new().unwrap();
    std::fs::create_dir_all(root.path().join("mypkg")).unwrap();
    let client = FakeClient::new().with_repo("mypkg", commit_repo("a1b2c3d", ""));
    let parser = GpmParser::new("/repo", "/repo/Godeps");
    let mut manifest = parser.parse("mypkg a1b2c3d\n");

    BatchAnalyzer::new(&client, root.path())
        .analyze(&mut manifest.entries)
        .unwrap();

    assert!(client.fetched.borrow().is_empty());
    assert_eq!(client.pulled.borrow().len(), 1);
}

#[test]
fn duplicate_paths_resolve_independently_to_the_same_answer() {
    let root = TempDir::new().unwrap();
    let client = FakeClient::new().with_repo("mypkg", commit_repo("e5f6a7b", "3 files changed"));
    let parser = GpmParser::new("/repo", "/repo/Godeps");
    let mut manifest = parser.parse("mypkg a1b2c3d\nmypkg a1b2c3d\n");

    BatchAnalyzer::new(&client, root.path())
        .analyze(&mut manifest.entries)
        .unwrap();

    assert_eq!(manifest.entries[0].status, EntryStatus::Outdated);
    assert_eq!(manifest.entries[1].status, EntryStatus::Outdated);
    assert_eq!(
        manifest.entries[0].resolved_version,
        manifest.entries[1].resolved_version
    );
}

#[test]
fn report_counts_match_resolution_outcomes() {
    let root = TempDir::new().unwrap();
    let client = FakeClient::new()
        .with_repo("uptodate", commit_repo("a1b2c3d", ""))
        .with_repo("stale", commit_repo("e5f6a7b", "3 files changed"));
    let parser = GpmParser::new("/repo", "/repo/Godeps");
    let mut manifest = parser.parse(
        "uptodate a1b2c3d\nstale a1b2c3d\ngit@internal:team/pkg 1.0\ngithub.com/gone/pkg abc123\n",
    );

    BatchAnalyzer::new(&client, root.path())
        .analyze(&mut manifest.entries)
        .unwrap();

    let report = Report::build(&manifest.entries);
    assert_eq!(report.up_to_date, 1);
    assert_eq!(report.outdated, 1);
    assert_eq!(report.skipped, 1);
    assert_eq!(report.problem, 1);

    let json = report.render(ReportFormat::Json).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["entries"].as_array().unwrap().len(), 4);
}
