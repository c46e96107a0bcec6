//! 用户服务测试

mod common;

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use hrms_core::domain::seed::default_users;
use hrms_core::{
    CreateUserInput, HrmsError, Latency, ServiceOptions, UpdateUserInput, UserFilter, UserStatus,
};

use common::{new_user, services, services_with};

#[tokio::test]
async fn test_create_user_defaults() {
    let services = services();

    let user = services
        .users
        .create_user(CreateUserInput::new("a@x.com", "A", "B", "employee"))
        .await
        .unwrap();

    assert_eq!(user.status, UserStatus::Pending);
    assert_eq!(user.employee_id.as_deref(), Some("EMP009"));
    assert_eq!(user.email, "a@x.com");
    assert_eq!(user.role_id, "employee");
    assert_eq!(user.created_at, user.updated_at);
    assert!(!user.id.is_empty());

    let stored = services.users.get_user_by_id(&user.id).await.unwrap();
    assert_eq!(stored, Some(user));
    assert_eq!(services.users.get_users().await.unwrap().len(), 9);
}

#[tokio::test]
async fn test_create_user_duplicate_email() {
    let services = services();

    services.users.create_user(new_user("dup@x.com")).await.unwrap();
    let err = services
        .users
        .create_user(new_user("dup@x.com"))
        .await
        .unwrap_err();

    assert!(matches!(err, HrmsError::DuplicateEmail(ref email) if email == "dup@x.com"));
    assert_eq!(services.users.get_users().await.unwrap().len(), 9);
}

#[tokio::test]
async fn test_email_match_is_case_sensitive() {
    let services = services();

    services.users.create_user(new_user("case@x.com")).await.unwrap();
    assert!(services.users.create_user(new_user("CASE@x.com")).await.is_ok());
}

#[tokio::test]
async fn test_seeded_email_collides() {
    let services = services();

    let err = services
        .users
        .create_user(new_user("sarah.mitchell@acme-hr.com"))
        .await
        .unwrap_err();
    assert!(matches!(err, HrmsError::DuplicateEmail(_)));
}

#[tokio::test]
async fn test_employee_ids_strictly_increase() {
    let services = services();

    let mut ids = Vec::new();
    for i in 0..5 {
        let user = services
            .users
            .create_user(new_user(&format!("seq{}@x.com", i)))
            .await
            .unwrap();
        ids.push(user.employee_id.unwrap());
    }

    assert_eq!(ids, ["EMP009", "EMP010", "EMP011", "EMP012", "EMP013"]);
}

#[tokio::test]
async fn test_explicit_employee_id_moves_the_sequence() {
    let services = services();

    let manual = services
        .users
        .create_user(new_user("manual@x.com").with_employee_id("EMP050"))
        .await
        .unwrap();
    assert_eq!(manual.employee_id.as_deref(), Some("EMP050"));

    let next = services.users.create_user(new_user("next@x.com")).await.unwrap();
    assert_eq!(next.employee_id.as_deref(), Some("EMP051"));

    // 非 EMP 格式不影响序列，也不检查重复
    services
        .users
        .create_user(new_user("contractor@x.com").with_employee_id("EMP051"))
        .await
        .unwrap();
    services
        .users
        .create_user(new_user("c2@x.com").with_employee_id("CTR-900"))
        .await
        .unwrap();
    let last = services.users.create_user(new_user("last@x.com")).await.unwrap();
    assert_eq!(last.employee_id.as_deref(), Some("EMP052"));
}

#[tokio::test]
async fn test_wide_employee_id_keeps_sequence_increasing() {
    let services = services();

    services
        .users
        .create_user(new_user("wide@x.com").with_employee_id("EMP10000000000"))
        .await
        .unwrap();
    let next = services.users.create_user(new_user("after-wide@x.com")).await.unwrap();
    assert_eq!(next.employee_id.as_deref(), Some("EMP10000000001"));
}

#[tokio::test]
async fn test_employee_id_at_u32_max() {
    let services = services();

    services
        .users
        .create_user(new_user("edge@x.com").with_employee_id("EMP4294967295"))
        .await
        .unwrap();
    let next = services.users.create_user(new_user("after-edge@x.com")).await.unwrap();
    assert_eq!(next.employee_id.as_deref(), Some("EMP4294967296"));
}

#[tokio::test]
async fn test_unallocatable_employee_id_is_rejected() {
    let services = services();
    let too_wide = format!("EMP{}", "9".repeat(40));

    let err = services
        .users
        .create_user(new_user("huge@x.com").with_employee_id(too_wide.clone()))
        .await
        .unwrap_err();
    assert!(matches!(err, HrmsError::Validation(_)));

    let err = services
        .users
        .update_user(
            "5",
            UpdateUserInput {
                employee_id: Some(too_wide),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, HrmsError::Validation(_)));

    // 拒绝后序列不受影响
    let next = services.users.create_user(new_user("ok@x.com")).await.unwrap();
    assert_eq!(next.employee_id.as_deref(), Some("EMP009"));
}

#[tokio::test]
async fn test_snapshot_reads_are_stable() {
    let services = services();

    let first = services.users.get_users().await.unwrap();
    let second = services.users.get_users().await.unwrap();
    assert_eq!(first, second);

    let roles_first = services.roles.get_roles().await.unwrap();
    let roles_second = services.roles.get_roles().await.unwrap();
    assert_eq!(roles_first, roles_second);
}

#[tokio::test]
async fn test_snapshot_is_a_copy() {
    let services = services();

    let mut snapshot = services.users.get_users().await.unwrap();
    snapshot.clear();
    assert_eq!(services.users.get_users().await.unwrap().len(), 8);
}

#[tokio::test]
async fn test_update_round_trip() {
    let services = services();

    let before = services.users.get_user_by_id("5").await.unwrap().unwrap();
    let updated = services
        .users
        .update_user(
            "5",
            UpdateUserInput {
                first_name: Some("X".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let after = services.users.get_user_by_id("5").await.unwrap().unwrap();
    assert_eq!(after, updated);
    assert_eq!(after.first_name, "X");
    assert_eq!(after.last_name, before.last_name);
    assert_eq!(after.email, before.email);
    assert!(after.updated_at > before.updated_at);
    assert_eq!(after.created_at, before.created_at);
}

#[tokio::test]
async fn test_back_to_back_updates_advance_updated_at() {
    let services = services();

    let user = services.users.create_user(new_user("fast@x.com")).await.unwrap();
    let mut previous = user.updated_at;
    for i in 0..5 {
        let updated = services
            .users
            .update_user(
                &user.id,
                UpdateUserInput {
                    phone: Some(format!("+1 555-01{:02}", i)),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert!(updated.updated_at > previous);
        previous = updated.updated_at;
    }
}

#[tokio::test]
async fn test_update_missing_user() {
    let services = services();

    let err = services
        .users
        .update_user("nonexistent", UpdateUserInput::default())
        .await
        .unwrap_err();
    assert!(matches!(err, HrmsError::NotFound(ref id) if id == "nonexistent"));
}

#[tokio::test]
async fn test_update_email_rules() {
    let services = services();

    // 保持自身邮箱不变
    let same = services
        .users
        .update_user(
            "2",
            UpdateUserInput {
                email: Some("james.carter@acme-hr.com".to_string()),
                ..Default::default()
            },
        )
        .await;
    assert!(same.is_ok());

    // 占用他人邮箱
    let err = services
        .users
        .update_user(
            "2",
            UpdateUserInput {
                email: Some("priya.sharma@acme-hr.com".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, HrmsError::DuplicateEmail(_)));

    // 改为新邮箱
    let changed = services
        .users
        .update_user(
            "2",
            UpdateUserInput {
                email: Some("j.carter@acme-hr.com".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(changed.email, "j.carter@acme-hr.com");

    // 旧邮箱释放后可被新用户使用
    assert!(services
        .users
        .create_user(new_user("james.carter@acme-hr.com"))
        .await
        .is_ok());
}

#[tokio::test]
async fn test_emails_stay_unique() {
    let services = services();

    for i in 0..4 {
        let _ = services.users.create_user(new_user(&format!("u{}@x.com", i % 2))).await;
    }
    let _ = services
        .users
        .update_user(
            "3",
            UpdateUserInput {
                email: Some("u0@x.com".to_string()),
                ..Default::default()
            },
        )
        .await;

    let users = services.users.get_users().await.unwrap();
    let emails: HashSet<&str> = users.iter().map(|u| u.email.as_str()).collect();
    assert_eq!(emails.len(), users.len());
}

#[tokio::test]
async fn test_delete_user() {
    let services = services();

    services.users.delete_user("6").await.unwrap();
    assert!(services.users.get_user_by_id("6").await.unwrap().is_none());
    assert_eq!(services.users.get_users().await.unwrap().len(), 7);

    let err = services.users.delete_user("6").await.unwrap_err();
    assert!(matches!(err, HrmsError::NotFound(_)));
}

#[tokio::test]
async fn test_delete_nonexistent_user() {
    let services = services();

    let err = services.users.delete_user("nonexistent").await.unwrap_err();
    assert!(matches!(err, HrmsError::NotFound(ref id) if id == "nonexistent"));
}

#[tokio::test]
async fn test_activate_and_deactivate() {
    let services = services();

    let pending = services.users.create_user(new_user("p@x.com")).await.unwrap();
    assert_eq!(pending.status, UserStatus::Pending);

    let active = services.users.activate_user(&pending.id).await.unwrap();
    assert_eq!(active.status, UserStatus::Active);

    let inactive = services.users.deactivate_user(&pending.id).await.unwrap();
    assert_eq!(inactive.status, UserStatus::Inactive);

    let err = services.users.activate_user("missing").await.unwrap_err();
    assert!(matches!(err, HrmsError::NotFound(_)));
}

#[tokio::test]
async fn test_status_transitions_unrestricted_by_default() {
    let services = services();

    // 种子用户 8 为 pending
    let user = services.users.deactivate_user("8").await.unwrap();
    assert_eq!(user.status, UserStatus::Inactive);

    let user = services
        .users
        .update_user("8", UpdateUserInput::status(UserStatus::Pending))
        .await
        .unwrap();
    assert_eq!(user.status, UserStatus::Pending);
}

#[tokio::test]
async fn test_strict_status_transitions() {
    let services = services_with(ServiceOptions::immediate().strict_status_transitions(true));

    let err = services.users.deactivate_user("8").await.unwrap_err();
    assert!(matches!(
        err,
        HrmsError::InvalidStatusTransition {
            from: UserStatus::Pending,
            to: UserStatus::Inactive
        }
    ));

    services.users.activate_user("8").await.unwrap();
    services.users.deactivate_user("8").await.unwrap();
    services.users.activate_user("8").await.unwrap();

    let err = services
        .users
        .update_user("8", UpdateUserInput::status(UserStatus::Pending))
        .await
        .unwrap_err();
    assert!(matches!(err, HrmsError::InvalidStatusTransition { .. }));
}

#[tokio::test]
async fn test_assign_role_allows_orphans_by_default() {
    let services = services();

    let user = services.users.assign_user_role("5", "team_lead").await.unwrap();
    assert_eq!(user.role_id, "team_lead");

    let orphan = services.users.assign_user_role("5", "ghost_role").await.unwrap();
    assert_eq!(orphan.role_id, "ghost_role");

    let err = services
        .users
        .assign_user_role("missing", "employee")
        .await
        .unwrap_err();
    assert!(matches!(err, HrmsError::NotFound(_)));
}

#[tokio::test]
async fn test_strict_role_refs() {
    let services = services_with(ServiceOptions::immediate().strict_role_refs(true));

    let err = services
        .users
        .assign_user_role("5", "ghost_role")
        .await
        .unwrap_err();
    assert!(matches!(err, HrmsError::RoleNotFound(ref id) if id == "ghost_role"));

    let err = services
        .users
        .create_user(CreateUserInput::new("o@x.com", "O", "R", "ghost_role"))
        .await
        .unwrap_err();
    assert!(matches!(err, HrmsError::RoleNotFound(_)));

    assert!(services.users.assign_user_role("5", "hr_manager").await.is_ok());
}

#[tokio::test]
async fn test_get_users_by_role() {
    let services = services();

    let employees = services.users.get_users_by_role("employee").await.unwrap();
    assert_eq!(employees.len(), 4);
    assert!(employees.iter().all(|u| u.role_id == "employee"));

    assert!(services
        .users
        .get_users_by_role("nobody")
        .await
        .unwrap()
        .is_empty());

    // 精确匹配
    assert!(services
        .users
        .get_users_by_role("Employee")
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn test_find_users() {
    let services = services();

    let users = services
        .users
        .find_users(
            UserFilter::new()
                .department("Engineering")
                .status(UserStatus::Active),
        )
        .await
        .unwrap();
    let ids: Vec<&str> = users.iter().map(|u| u.id.as_str()).collect();
    assert_eq!(ids, ["4", "5"]);

    let users = services
        .users
        .find_users(UserFilter::new().search("acme-hr.com").limit(3))
        .await
        .unwrap();
    assert_eq!(users.len(), 3);
}

#[tokio::test]
async fn test_reset_restores_seed() {
    let services = services();

    services.users.create_user(new_user("extra@x.com")).await.unwrap();
    services.users.delete_user("1").await.unwrap();
    services.users.activate_user("8").await.unwrap();
    services
        .users
        .update_user(
            "3",
            UpdateUserInput {
                last_name: Some("Changed".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    services.users.reset_users().await.unwrap();
    assert_eq!(services.users.get_users().await.unwrap(), default_users());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_creates_allocate_distinct_employee_ids() {
    let services = Arc::new(services_with(
        ServiceOptions::immediate().with_latency(Latency::from_millis(4)),
    ));

    let handles: Vec<_> = (0..20)
        .map(|i| {
            let services = services.clone();
            tokio::spawn(async move {
                services
                    .users
                    .create_user(new_user(&format!("c{}@x.com", i)))
                    .await
            })
        })
        .collect();

    let mut employee_ids = HashSet::new();
    for handle in handles {
        let user = handle.await.unwrap().unwrap();
        employee_ids.insert(user.employee_id.unwrap());
    }

    let expected: HashSet<String> = (9..29).map(|n| format!("EMP{:03}", n)).collect();
    assert_eq!(employee_ids, expected);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_creates_with_same_email() {
    let services = Arc::new(services_with(
        ServiceOptions::immediate().with_latency(Latency::from_millis(4)),
    ));

    let handles: Vec<_> = (0..10)
        .map(|_| {
            let services = services.clone();
            tokio::spawn(async move { services.users.create_user(new_user("race@x.com")).await })
        })
        .collect();

    let results = futures::future::join_all(handles).await;
    let ok = results
        .iter()
        .filter(|r| matches!(r, Ok(Ok(_))))
        .count();
    let duplicates = results
        .iter()
        .filter(|r| matches!(r, Ok(Err(HrmsError::DuplicateEmail(_)))))
        .count();

    assert_eq!(ok, 1);
    assert_eq!(duplicates, 9);
}

#[tokio::test(start_paused = true)]
async fn test_simulated_latency() {
    let services = services_with(ServiceOptions::default());

    let start = tokio::time::Instant::now();
    services.users.get_users().await.unwrap();
    assert!(start.elapsed() >= Duration::from_millis(100));

    let start = tokio::time::Instant::now();
    services.users.get_user_by_id("1").await.unwrap();
    let elapsed = start.elapsed();
    assert!(elapsed >= Duration::from_millis(50));
    assert!(elapsed < Duration::from_millis(100));
}
