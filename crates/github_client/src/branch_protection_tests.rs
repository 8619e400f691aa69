use super::*;
use serde_json::{from_str, json, to_value};

#[test]
fn test_payload_serializes_required_keys_as_null() {
    let payload = RemoteProtectionPayload::default();

    let body = to_value(&payload).expect("Failed to serialize RemoteProtectionPayload");

    assert_eq!(
        body,
        json!({
            "required_status_checks": null,
            "enforce_admins": null,
            "required_pull_request_reviews": null,
            "restrictions": null
        })
    );
}

#[test]
fn test_payload_omits_unset_optional_flags() {
    let payload = RemoteProtectionPayload {
        allow_force_pushes: Some(false),
        ..Default::default()
    };

    let body = to_value(&payload).expect("Failed to serialize RemoteProtectionPayload");

    assert_eq!(body["allow_force_pushes"], false);
    assert!(body.get("allow_deletions").is_none());
    assert!(body.get("lock_branch").is_none());
    assert!(body.get("allow_fork_syncing").is_none());
}

#[test]
fn test_payload_serializes_full_shape() {
    let payload = RemoteProtectionPayload {
        required_status_checks: Some(RequiredStatusChecks {
            strict: true,
            contexts: vec!["ci/build".to_string(), "ci/test".to_string()],
        }),
        enforce_admins: Some(true),
        required_pull_request_reviews: Some(RequiredPullRequestReviews {
            dismiss_stale_reviews: Some(true),
            require_code_owner_reviews: Some(false),
            required_approving_review_count: Some(2),
            require_last_push_approval: None,
        }),
        restrictions: Some(BranchRestrictions {
            users: vec!["octocat".to_string()],
            teams: vec!["release-managers".to_string()],
            apps: vec![],
        }),
        required_linear_history: Some(true),
        ..Default::default()
    };

    let body = to_value(&payload).expect("Failed to serialize RemoteProtectionPayload");

    assert_eq!(body["required_status_checks"]["strict"], true);
    assert_eq!(
        body["required_status_checks"]["contexts"],
        json!(["ci/build", "ci/test"])
    );
    assert_eq!(body["enforce_admins"], true);
    assert_eq!(
        body["required_pull_request_reviews"],
        json!({
            "dismiss_stale_reviews": true,
            "require_code_owner_reviews": false,
            "required_approving_review_count": 2
        })
    );
    assert_eq!(
        body["restrictions"],
        json!({"users": ["octocat"], "teams": ["release-managers"], "apps": []})
    );
    assert_eq!(body["required_linear_history"], true);
}

#[test]
fn test_empty_restrictions_are_not_null() {
    let payload = RemoteProtectionPayload {
        restrictions: Some(BranchRestrictions::default()),
        ..Default::default()
    };

    let body = to_value(&payload).expect("Failed to serialize RemoteProtectionPayload");

    assert_eq!(
        body["restrictions"],
        json!({"users": [], "teams": [], "apps": []})
    );
}

#[test]
fn test_branch_protection_deserialization() {
    let json_str = r#"{
        "url": "https://api.github.com/repos/octo-org/api/branches/main/protection",
        "required_status_checks": {
            "url": "https://api.github.com/repos/octo-org/api/branches/main/protection/required_status_checks",
            "strict": true,
            "contexts": ["ci/build"],
            "checks": [{"context": "ci/build", "app_id": 15368}]
        },
        "enforce_admins": {"url": "https://example.invalid", "enabled": true},
        "required_pull_request_reviews": {
            "dismiss_stale_reviews": true,
            "require_code_owner_reviews": false,
            "required_approving_review_count": 2,
            "require_last_push_approval": true
        },
        "restrictions": {
            "users": [{"login": "octocat", "id": 1}],
            "teams": [{"slug": "admins", "id": 2}],
            "apps": [{"slug": "release-bot", "id": 3}]
        },
        "required_linear_history": {"enabled": true},
        "allow_force_pushes": {"enabled": false},
        "allow_deletions": {"enabled": false},
        "required_conversation_resolution": {"enabled": true},
        "lock_branch": {"enabled": false},
        "allow_fork_syncing": {"enabled": false}
    }"#;

    let protection: BranchProtection =
        from_str(json_str).expect("Failed to deserialize BranchProtection");

    assert_eq!(
        protection.required_status_checks,
        Some(StatusChecksState {
            strict: true,
            contexts: vec!["ci/build".to_string()],
        })
    );
    assert_eq!(protection.enforce_admins, Some(EnabledSetting { enabled: true }));
    assert_eq!(
        protection
            .required_pull_request_reviews
            .as_ref()
            .and_then(|r| r.required_approving_review_count),
        Some(2)
    );
    assert!(protection.block_creations.is_none());
}

#[test]
fn test_branch_protection_minimal_document() {
    let protection: BranchProtection = from_str(r#"{"url": "https://example.invalid"}"#)
        .expect("Failed to deserialize BranchProtection");

    assert_eq!(protection, BranchProtection::default());
    assert_eq!(protection.to_payload(), RemoteProtectionPayload::default());
}

#[test]
fn test_to_payload_flattens_read_model() {
    let protection = BranchProtection {
        required_status_checks: Some(StatusChecksState {
            strict: false,
            contexts: vec!["lint".to_string()],
        }),
        enforce_admins: Some(EnabledSetting { enabled: false }),
        restrictions: Some(RestrictionsState {
            users: vec![UserRef {
                login: "octocat".to_string(),
            }],
            teams: vec![SlugRef {
                slug: "core".to_string(),
            }],
            apps: vec![],
        }),
        allow_force_pushes: Some(EnabledSetting { enabled: true }),
        ..Default::default()
    };

    let payload = protection.to_payload();

    assert_eq!(
        payload.required_status_checks,
        Some(RequiredStatusChecks {
            strict: false,
            contexts: vec!["lint".to_string()],
        })
    );
    assert_eq!(payload.enforce_admins, Some(false));
    assert_eq!(
        payload.restrictions,
        Some(BranchRestrictions {
            users: vec!["octocat".to_string()],
            teams: vec!["core".to_string()],
            apps: vec![],
        })
    );
    assert_eq!(payload.allow_force_pushes, Some(true));
    assert_eq!(payload.allow_deletions, None);
}
