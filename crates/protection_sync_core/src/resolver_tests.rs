use super::*;
use config_manager::{
    BranchSettings, ProtectionPolicy, PullRequestReviewPolicy, RepositoryOverride,
};

fn reviews(count: u32) -> ProtectionPolicy {
    ProtectionPolicy {
        required_pull_request_reviews: Some(PullRequestReviewPolicy {
            required_approving_review_count: Some(count),
            ..Default::default()
        }),
        ..Default::default()
    }
}

/// Organization default of 2 reviews on `main` and `develop`, with `payments-api`
/// overriding `main` only.
fn payments_config() -> GovernanceConfig {
    let mut config = GovernanceConfig::default();
    config
        .branches
        .insert("main".to_string(), BranchSettings::protected(reviews(2)));
    config
        .branches
        .insert("develop".to_string(), BranchSettings::protected(reviews(2)));

    let mut override_branches = BranchSettingsMap::new();
    override_branches.insert("main".to_string(), BranchSettings::protected(reviews(1)));
    config.repositories.push(RepositoryOverride {
        name: "payments-api".to_string(),
        branches: override_branches,
    });

    config
}

#[test]
fn test_override_replaces_defaults() {
    let config = payments_config();

    let resolved = resolve(&config, "payments-api");

    assert_eq!(resolved.len(), 1);
    assert_eq!(resolved["main"], reviews(1));
    assert!(!resolved.contains_key("develop"));
}

#[test]
fn test_other_repositories_get_defaults() {
    let config = payments_config();

    let resolved = resolve(&config, "billing-service");

    assert_eq!(resolved.len(), 2);
    assert_eq!(resolved["main"], reviews(2));
    assert_eq!(resolved["develop"], reviews(2));
}

#[test]
fn test_override_match_is_exact() {
    let config = payments_config();

    let resolved = resolve(&config, "Payments-API");

    assert_eq!(resolved["main"], reviews(2));
}

#[test]
fn test_no_policy_resolves_empty() {
    let config = GovernanceConfig::default();

    assert!(resolve(&config, "anything").is_empty());
}

#[test]
fn test_empty_override_resolves_empty() {
    let mut config = payments_config();
    config.repositories.push(RepositoryOverride {
        name: "sandbox".to_string(),
        branches: BranchSettingsMap::new(),
    });

    assert!(resolve(&config, "sandbox").is_empty());
}

#[test]
fn test_branch_without_protection_is_dropped() {
    let mut config = GovernanceConfig::default();
    config
        .branches
        .insert("main".to_string(), BranchSettings::protected(reviews(2)));
    config
        .branches
        .insert("release".to_string(), BranchSettings::default());

    let resolved = resolve(&config, "web");

    assert_eq!(resolved.keys().collect::<Vec<_>>(), vec!["main"]);
}

#[test]
fn test_resolve_is_ordered_by_branch_name() {
    let config = payments_config();

    let resolved = resolve(&config, "web");

    assert_eq!(resolved.keys().collect::<Vec<_>>(), vec!["develop", "main"]);
}

#[test]
fn test_resolve_default_ignores_overrides() {
    let config = payments_config();

    let resolved = resolve_default(&config);

    assert_eq!(resolved["main"], reviews(2));
    assert_eq!(resolved.len(), 2);
}
