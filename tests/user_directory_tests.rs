use std::sync::Arc;

use tempfile::TempDir;

use wellbeing_bot::storage::users::UserDirectory;

#[tokio::test]
async fn test_register_is_idempotent_and_persistent() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("users.json");

    let users = UserDirectory::new(&path);
    assert_eq!(users.count().await.unwrap(), 0);

    assert!(users.register(300).await.unwrap());
    assert!(users.register(100).await.unwrap());
    assert!(!users.register(300).await.unwrap());
    assert_eq!(users.all().await.unwrap(), vec![100, 300]);

    let reopened = UserDirectory::new(&path);
    assert_eq!(reopened.all().await.unwrap(), vec![100, 300]);
}

#[tokio::test]
async fn test_concurrent_registration_loses_nobody() {
    let dir = TempDir::new().unwrap();
    let users = Arc::new(UserDirectory::new(dir.path().join("users.json")));

    let mut handles = Vec::new();
    for user_id in 1..=25_i64 {
        let users = users.clone();
        handles.push(tokio::spawn(async move { users.register(user_id).await }));
    }
    for handle in handles {
        assert!(handle.await.unwrap().unwrap());
    }

    assert_eq!(users.all().await.unwrap(), (1..=25).collect::<Vec<i64>>());
}
