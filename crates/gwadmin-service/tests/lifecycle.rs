mod common;

use common::Fixture;
use gwadmin_core::ErrorKind;
use gwadmin_core::traits::cache::CacheProvider;

#[tokio::test]
async fn test_delete_tenant_is_complete_and_idempotent() {
    let f = Fixture::new().await;
    let tenant_id = f.tenant_a.id;
    let token = f.session_for(&f.users_a[1]).await;

    f.lifecycle.delete_tenant(tenant_id).await.unwrap();

    assert!(f.stores.groups.find_by_tenant(tenant_id).await.unwrap().is_empty());
    assert!(f.stores.users.find_by_tenant(tenant_id).await.unwrap().is_empty());
    assert!(f.stores.tenants.find_by_id(tenant_id).await.unwrap().is_none());
    assert!(f.directory.sessions().validate(&token).await.unwrap().is_none());

    // Second run on the now-absent id is a no-op.
    f.lifecycle.delete_tenant(tenant_id).await.unwrap();

    // The other tenant is untouched.
    assert!(f.stores.users.find_by_id(f.admin_b.id).await.unwrap().is_some());
}

#[tokio::test]
async fn test_delete_tenant_drops_domain_memo() {
    let f = Fixture::new().await;
    f.directory
        .resolve_tenant_by_web_domain("a.example.com")
        .await
        .unwrap()
        .unwrap();
    assert!(f.cache.exists("tenant:domain:a.example.com").await.unwrap());

    f.lifecycle.delete_tenant(f.tenant_a.id).await.unwrap();

    assert!(!f.cache.exists("tenant:domain:a.example.com").await.unwrap());
    assert!(
        f.directory
            .resolve_tenant_by_web_domain("a.example.com")
            .await
            .unwrap()
            .is_none()
    );
}

#[tokio::test]
async fn test_delete_user_purges_sessions_and_blocks() {
    let f = Fixture::new().await;
    let user = &f.users_a[1];
    let token = f.session_for(user).await;
    f.guard.record_failure(&user.public_id, "1.1.1.1").await.unwrap();
    f.guard.record_failure(&user.public_id, "2.2.2.2").await.unwrap();
    assert_eq!(f.db.block_count().await, 2);

    f.lifecycle.delete_user(user.id).await.unwrap();

    assert_eq!(f.db.block_count().await, 0);
    assert!(f.directory.sessions().validate(&token).await.unwrap().is_none());
    assert!(f.stores.users.find_by_id(user.id).await.unwrap().is_none());
    assert!(!f.directory.is_group_member(f.groups_a[0].id, user.id).await.unwrap());

    f.lifecycle.delete_user(user.id).await.unwrap();
}

#[tokio::test]
async fn test_delete_channel_requires_cascade() {
    let f = Fixture::new().await;

    let err = f.lifecycle.delete_channel(f.channel.id, false).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidInputParameter);
    assert!(f.stores.tenants.find_by_id(f.tenant_a.id).await.unwrap().is_some());

    f.lifecycle.delete_channel(f.channel.id, true).await.unwrap();
    assert!(f.stores.channels.find_by_id(f.channel.id).await.unwrap().is_none());
    assert!(f.stores.tenants.find_by_id(f.tenant_a.id).await.unwrap().is_none());
    assert!(f.stores.tenants.find_by_id(f.tenant_b.id).await.unwrap().is_some());

    f.lifecycle.delete_channel(f.channel.id, false).await.unwrap();
}

#[tokio::test]
async fn test_delete_empty_channel_without_cascade() {
    let f = Fixture::new().await;
    f.lifecycle.delete_tenant(f.tenant_a.id).await.unwrap();
    f.lifecycle.delete_channel(f.channel.id, false).await.unwrap();
    assert!(f.stores.channels.find_by_id(f.channel.id).await.unwrap().is_none());
}
