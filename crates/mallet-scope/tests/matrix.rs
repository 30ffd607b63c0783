use mallet_scope::matrix::BuildScopeMatrix;
use mallet_scope::path::{BuildPath, ProjectPath};
use mallet_scope::query::BuildScopeQuery;
use mallet_scope::scope::BuildScope;

fn main_path() -> ProjectPath {
    ProjectPath::new("main", 1, 2)
}

fn test_path() -> ProjectPath {
    ProjectPath::new("test", 2, 1)
}

fn compile_path() -> BuildPath {
    BuildPath::new("compile", 1, false)
}

fn runtime_path() -> BuildPath {
    BuildPath::new("runtime", 2, true)
}

fn full_matrix() -> BuildScopeMatrix {
    BuildScopeMatrix::new(
        vec![main_path(), test_path()],
        vec![compile_path(), runtime_path()],
        vec![],
    )
    .unwrap()
}

#[test]
fn matrix_completeness() {
    let matrix = full_matrix();
    let ids: Vec<&str> = matrix.all().map(|s| s.id.as_str()).collect();
    assert_eq!(
        ids,
        vec!["main-compile", "test-compile", "test-runtime", "main-runtime"]
    );
    assert_eq!(matrix.len(), 4);
}

#[test]
fn reverse_build_path_flips_enumeration() {
    // The runtime build path is reverse, so its row enumerates test before
    // main and the order counter reflects that.
    let matrix = full_matrix();
    assert_eq!(matrix.get("main-compile").unwrap().order, 1);
    assert_eq!(matrix.get("test-compile").unwrap().order, 2);
    assert_eq!(matrix.get("test-runtime").unwrap().order, 3);
    assert_eq!(matrix.get("main-runtime").unwrap().order, 4);
}

#[test]
fn empty_project_paths_fail() {
    let result = BuildScopeMatrix::new(vec![], vec![compile_path()], vec![]);
    assert!(result.is_err());
}

#[test]
fn empty_build_paths_fail() {
    let result = BuildScopeMatrix::new(vec![main_path()], vec![], vec![]);
    assert!(result.is_err());
}

#[test]
fn query_all_includes_extras() {
    let extra = BuildScope::combined(
        "everything",
        [main_path(), test_path()],
        [compile_path(), runtime_path()],
        99,
    );
    let matrix = BuildScopeMatrix::new(
        vec![main_path(), test_path()],
        vec![compile_path(), runtime_path()],
        vec![extra],
    )
    .unwrap();

    let all = matrix.query(&[BuildScopeQuery::All]).unwrap();
    assert_eq!(all.len(), 5);
    assert!(all.iter().any(|s| s.id == "everything"));
}

#[test]
fn query_by_project_path() {
    let matrix = full_matrix();
    let scopes = matrix
        .query(&[BuildScopeQuery::ByProjectPath(test_path())])
        .unwrap();
    let ids: Vec<&str> = scopes.iter().map(|s| s.id.as_str()).collect();
    assert_eq!(ids, vec!["test-compile", "test-runtime"]);
}

#[test]
fn query_by_build_path() {
    let matrix = full_matrix();
    let scopes = matrix
        .query(&[BuildScopeQuery::ByBuildPath(runtime_path())])
        .unwrap();
    let ids: Vec<&str> = scopes.iter().map(|s| s.id.as_str()).collect();
    assert_eq!(ids, vec!["test-runtime", "main-runtime"]);
}

#[test]
fn query_select_matches_both_paths() {
    let matrix = full_matrix();
    let scopes = matrix
        .query(&[BuildScopeQuery::Select(main_path(), runtime_path())])
        .unwrap();
    assert_eq!(scopes.len(), 1);
    assert_eq!(scopes[0].id, "main-runtime");
}

#[test]
fn query_select_degrades_to_empty() {
    let matrix = full_matrix();
    let unknown = ProjectPath::new("bench", 3, 3);
    let scopes = matrix
        .query(&[BuildScopeQuery::Select(unknown, compile_path())])
        .unwrap();
    assert!(scopes.is_empty());
}

#[test]
fn query_singleton_resolves() {
    let matrix = full_matrix();
    let scopes = matrix
        .query(&[BuildScopeQuery::Singleton(main_path(), compile_path())])
        .unwrap();
    assert_eq!(scopes.len(), 1);
    assert_eq!(scopes[0].id, "main-compile");
}

#[test]
fn query_singleton_missing_fails() {
    let matrix = full_matrix();
    let unknown = BuildPath::new("deploy", 9, false);
    let result = matrix.query(&[BuildScopeQuery::Singleton(test_path(), unknown)]);
    let err = result.unwrap_err();
    assert!(err.to_string().contains("No such build scope"));
}

#[test]
fn query_union_deduplicates() {
    let matrix = full_matrix();
    let scopes = matrix
        .query(&[
            BuildScopeQuery::ByProjectPath(main_path()),
            BuildScopeQuery::ByBuildPath(compile_path()),
        ])
        .unwrap();
    // main-compile satisfies both queries but appears once.
    let ids: Vec<&str> = scopes.iter().map(|s| s.id.as_str()).collect();
    assert_eq!(ids, vec!["main-compile", "main-runtime", "test-compile"]);
}

#[test]
fn aggregate_universes_union_extras() {
    let extra_path = ProjectPath::new("it", 3, 3);
    let extra = BuildScope::combined("it", [extra_path.clone()], [compile_path()], 9);
    let matrix = BuildScopeMatrix::new(
        vec![main_path()],
        vec![compile_path()],
        vec![extra],
    )
    .unwrap();

    let projects: Vec<&str> = matrix.project_paths().map(|p| p.id.as_str()).collect();
    assert!(projects.contains(&"it"));
    assert!(projects.contains(&"main"));
}
