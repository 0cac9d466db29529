//! PostgreSQL-backed tests for `PgUserRepository` and `UserService`.
//!
//! Each test starts its own container through `test_utils::TestDatabase`.

use domain_users::{
    ChangeSet, CreateUser, ListUsersQuery, NormalizedFilters, PgUserRepository, UpdateUser, User,
    UserError, UserRepository, UserService,
};
use test_utils::{assertions::assert_some, TestDataBuilder, TestDatabase};

fn input(first_name: &str, last_name: &str) -> CreateUser {
    CreateUser {
        first_name: first_name.to_string(),
        last_name: last_name.to_string(),
        email: None,
        phone: None,
    }
}

async fn seed(repo: &PgUserRepository, names: &[(&str, &str)]) -> Vec<User> {
    let mut users = Vec::new();
    for (first, last) in names {
        users.push(repo.create(User::new(input(first, last))).await.unwrap());
    }
    users
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_crud_roundtrip() {
    let db = TestDatabase::new().await;
    let repo = PgUserRepository::new(db.connection());
    let data = TestDataBuilder::from_test_name("test_crud_roundtrip");

    let mut new_user = User::new(input("Anna", "Smith"));
    new_user.phone = Some(data.phone());
    let created = repo.create(new_user.clone()).await.unwrap();
    assert_eq!(created.id, new_user.id);

    let fetched = assert_some(repo.get_by_id(created.id).await.unwrap(), "created user");
    assert_eq!(fetched.first_name, "Anna");
    assert_eq!(fetched.phone, Some(data.phone()));
    assert_eq!(fetched.email, None);

    let changes = domain_users::changeset::merge(&UpdateUser {
        email: Some(data.email("anna")),
        ..UpdateUser::default()
    })
    .unwrap();
    let updated = repo.update(created.id, &changes).await.unwrap();
    assert_eq!(updated.email, Some(data.email("anna")));
    assert_eq!(updated.first_name, "Anna");
    assert_eq!(updated.phone, Some(data.phone()));
    assert!(updated.updated_at >= fetched.updated_at);

    assert!(repo.delete(created.id).await.unwrap());
    assert!(!repo.delete(created.id).await.unwrap());
    assert!(repo.get_by_id(created.id).await.unwrap().is_none());
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_update_missing_is_not_found() {
    let db = TestDatabase::new().await;
    let repo = PgUserRepository::new(db.connection());
    let missing = TestDataBuilder::from_test_name("test_update_missing_is_not_found").missing_id();

    let changes = domain_users::changeset::merge(&UpdateUser {
        last_name: Some("Jones".to_string()),
        ..UpdateUser::default()
    })
    .unwrap();
    let err = repo.update(missing, &changes).await.unwrap_err();
    assert!(matches!(err, UserError::NotFound(id) if id == missing));

    let err = repo.update(missing, &ChangeSet::default()).await.unwrap_err();
    assert!(matches!(err, UserError::NotFound(_)));
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_filters_are_case_insensitive_substrings() {
    let db = TestDatabase::new().await;
    let repo = PgUserRepository::new(db.connection());
    seed(
        &repo,
        &[("Anna", "Smith"), ("Joanna", "Brown"), ("Tom", "Annis"), ("  ANNE ", "Brown")],
    )
    .await;

    let filters = domain_users::filter::normalize("ann", "");
    assert_eq!(repo.count(&filters).await.unwrap(), 3);

    let filters = domain_users::filter::normalize("Ann", "BROWN");
    let mut names: Vec<String> = repo
        .list(&filters, 0, 10)
        .await
        .unwrap()
        .into_iter()
        .map(|u| u.first_name)
        .collect();
    names.sort();
    assert_eq!(names, vec!["ANNE", "Joanna"]);
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_filter_wildcards_are_literal() {
    let db = TestDatabase::new().await;
    let repo = PgUserRepository::new(db.connection());
    seed(&repo, &[("100%", "Real"), ("1000", "Other"), ("a_b", "Under"), ("axb", "Plain")]).await;

    let percent = domain_users::filter::normalize("0%", "");
    let found = repo.list(&percent, 0, 10).await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].first_name, "100%");

    let underscore = domain_users::filter::normalize("a_", "");
    assert_eq!(repo.count(&underscore).await.unwrap(), 1);
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_list_orders_newest_first_and_pages() {
    let db = TestDatabase::new().await;
    let repo = PgUserRepository::new(db.connection());
    let users = seed(&repo, &[("A", "X"), ("B", "X"), ("C", "X"), ("D", "X"), ("E", "X")]).await;

    let all = NormalizedFilters::default();
    let page: Vec<_> = repo
        .list(&all, 2, 2)
        .await
        .unwrap()
        .into_iter()
        .map(|u| u.id)
        .collect();
    assert_eq!(page, vec![users[2].id, users[1].id]);

    assert!(repo.list(&all, 10, 10).await.unwrap().is_empty());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
#[ignore = "requires Docker"]
async fn test_list_page_total_matches_window_under_inserts() {
    let db = TestDatabase::new().await;
    let repo = PgUserRepository::new(db.connection());
    seed(&repo, &[("A", "X"), ("B", "X"), ("C", "X")]).await;

    let writer = {
        let repo = repo.clone();
        tokio::spawn(async move {
            for i in 0..50 {
                repo.create(User::new(input(&format!("W{i}"), "X")))
                    .await
                    .unwrap();
            }
        })
    };

    let all = NormalizedFilters::default();
    for _ in 0..50 {
        let page = repo.list_page(&all, 2, 5).await.unwrap();
        let expected = page.total_count.saturating_sub(2).min(5) as usize;
        assert_eq!(page.users.len(), expected);
    }

    writer.await.unwrap();
    let page = repo.list_page(&all, 100, 5).await.unwrap();
    assert_eq!(page.total_count, 53);
    assert!(page.users.is_empty());
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_service_over_postgres() {
    let db = TestDatabase::new().await;
    let service = UserService::new(PgUserRepository::new(db.connection()));

    for i in 0..25 {
        service.create_user(input(&format!("User{i}"), "Bulk")).await.unwrap();
    }

    let (data, meta) = service
        .list_users(ListUsersQuery {
            page: Some("1".to_string()),
            limit: Some("10".to_string()),
            ..ListUsersQuery::default()
        })
        .await
        .unwrap();
    assert_eq!(data.len(), 10);
    assert_eq!(meta.offset, 0);
    assert_eq!(meta.page_count, 3);

    let (data, meta) = service
        .list_users(ListUsersQuery {
            page: Some("10".to_string()),
            ..ListUsersQuery::default()
        })
        .await
        .unwrap();
    assert!(data.is_empty());
    assert_eq!(meta.total_count, 25);

    let victim = service.create_user(input("Gone", "Soon")).await.unwrap();
    service.delete_user(victim.id).await.unwrap();
    assert!(matches!(
        service.delete_user(victim.id).await,
        Err(UserError::NotFound(_))
    ));

    db.truncate(&["users"]).await;
    let (_, meta) = service.list_users(ListUsersQuery::default()).await.unwrap();
    assert_eq!(meta.total_count, 0);
}
