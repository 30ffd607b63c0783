use mallet_scope::config::{ScopeManager, ScopeProfile};
use mallet_scope::dependency::ResolutionMode;
use mallet_scope::path::BuildPath;
use mallet_scope::query::BuildScopeQuery;

#[test]
fn maven4_matrix_is_complete() {
    let manager = ScopeManager::new(ScopeProfile::maven4()).unwrap();
    let ids: Vec<&str> = manager.matrix().all().map(|s| s.id.as_str()).collect();
    assert_eq!(
        ids,
        vec!["main-compile", "test-compile", "test-runtime", "main-runtime"]
    );
}

#[test]
fn maven4_width_ordering() {
    let manager = ScopeManager::new(ScopeProfile::maven4()).unwrap();
    let width = |id: &str| manager.scope_width(id).unwrap();

    assert!(width("compile") > width("runtime"));
    assert!(width("runtime") > width("provided"));
    assert!(width("provided") > width("test"));
    assert!(width("test") > width("none"));
    assert_eq!(width("none"), 0);
}

#[test]
fn profile_flags_surface_on_manager() {
    let modern = ScopeManager::new(ScopeProfile::maven4()).unwrap();
    assert_eq!(modern.profile_id(), "maven4");
    assert!(!modern.broken_runtime_resolution());

    let legacy = ScopeManager::new(ScopeProfile::maven3()).unwrap();
    assert_eq!(legacy.profile_id(), "maven3");
    assert!(legacy.broken_runtime_resolution());
}

#[test]
fn maven4_system_scope_not_transitive() {
    let manager = ScopeManager::new(ScopeProfile::maven4()).unwrap();
    let system = manager.system_scope().unwrap();
    assert!(!system.transitive);
}

#[test]
fn maven3_system_scope_transitive() {
    let manager = ScopeManager::new(ScopeProfile::maven3()).unwrap();
    let system = manager.system_scope().unwrap();
    assert!(system.transitive);
}

#[test]
fn maven3_combined_test_scope() {
    let manager = ScopeManager::new(ScopeProfile::maven3()).unwrap();
    let matrix = manager.matrix();

    // Legacy matrix: main cells generated, one hand-built combined test scope.
    let ids: Vec<&str> = matrix.all().map(|s| s.id.as_str()).collect();
    assert_eq!(ids, vec!["main-compile", "main-runtime", "test"]);

    // The combined scope answers both build-path queries.
    for build_path in [
        BuildPath::new("compile", 1, false),
        BuildPath::new("runtime", 2, true),
    ] {
        let scopes = matrix
            .query(&[BuildScopeQuery::ByBuildPath(build_path)])
            .unwrap();
        assert!(scopes.iter().any(|s| s.id == "test"));
    }
}

#[test]
fn maven3_runtime_spans_combined_test() {
    let manager = ScopeManager::new(ScopeProfile::maven3()).unwrap();
    assert!(manager.scope_width("runtime").unwrap() > manager.scope_width("test").unwrap());
}

#[test]
fn resolution_scopes_looked_up_by_id() {
    let manager = ScopeManager::new(ScopeProfile::maven4()).unwrap();
    for id in ["main-compile", "main-runtime", "test-compile", "test-runtime"] {
        assert!(manager.resolution_scope(id).is_some(), "missing {id}");
    }
    assert!(manager.resolution_scope("deploy").is_none());
}

#[test]
fn main_runtime_mode_softens_under_broken_flag() {
    let modern = ScopeManager::new(ScopeProfile::maven4()).unwrap();
    assert_eq!(
        modern.resolution_scope("main-runtime").unwrap().mode,
        ResolutionMode::Remove
    );

    let legacy = ScopeManager::new(ScopeProfile::maven3()).unwrap();
    assert_eq!(
        legacy.resolution_scope("main-runtime").unwrap().mode,
        ResolutionMode::Eliminate
    );
}

#[test]
fn widened_system_scope_survives_exclusion() {
    let manager = ScopeManager::new(ScopeProfile::maven4()).unwrap();
    let main_compile = manager.resolution_scope("main-compile").unwrap();

    assert!(main_compile.is_excluded("test"));
    assert!(!main_compile.is_excluded("system"));
    assert!(!main_compile.is_excluded("compile"));
}

#[test]
fn direct_selector_filters_excluded_scopes() {
    use mallet_scope::selectors::{DependencyEdge, DependencySelector};

    let manager = ScopeManager::new(ScopeProfile::maven4()).unwrap();
    let main_runtime = manager.resolution_scope("main-runtime").unwrap();
    let selector = main_runtime.direct_selector();

    assert!(!selector.accept(&DependencyEdge::new("org.a:a", "test", false)));
    assert!(selector.accept(&DependencyEdge::new("org.a:a", "runtime", false)));
}

#[test]
fn unknown_excluded_scope_fails_assembly() {
    use mallet_scope::dependency::ResolutionScope;

    let mut profile = ScopeProfile::maven4();
    profile.resolution_scopes.push(ResolutionScope::new(
        "bogus",
        ResolutionMode::Eliminate,
        ["no-such-scope".to_string()],
        [],
        vec![BuildScopeQuery::All],
    ));
    assert!(ScopeManager::new(profile).is_err());
}
