//! SQLite repository integration tests.

#[cfg(test)]
mod tests {
    use chrono::{DateTime, Duration, Utc};
    use financy_types::{
        Category, CategoryId, CategoryRepository, NewTransaction, NewUser, Patch, RepoError,
        TransactionChanges, TransactionId, TransactionRepository, TransactionType, User, UserId,
        UserRepository,
    };

    use crate::SqliteRepo;

    async fn setup_repo() -> SqliteRepo {
        SqliteRepo::new("sqlite::memory:").await.unwrap()
    }

    async fn create_user(repo: &SqliteRepo, email: &str) -> User {
        repo.create_user(NewUser {
            name: "Alice".to_string(),
            email: email.to_string(),
            password_hash: "$argon2id$hash".to_string(),
        })
        .await
        .unwrap()
    }

    fn new_tx(user_id: UserId, title: &str, date: DateTime<Utc>) -> NewTransaction {
        NewTransaction {
            title: title.to_string(),
            amount: 20.5,
            transaction_type: TransactionType::Expense,
            date,
            notes: None,
            user_id,
            category_id: None,
        }
    }

    fn day(s: &str) -> DateTime<Utc> {
        format!("{s}T00:00:00Z").parse().unwrap()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Users
    // ─────────────────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_create_and_find_user() {
        let repo = setup_repo().await;
        let user = create_user(&repo, "alice@x.com").await;

        let by_email = repo.find_user_by_email("alice@x.com").await.unwrap().unwrap();
        assert_eq!(by_email.id, user.id);
        assert_eq!(by_email.password_hash, "$argon2id$hash");

        let by_id = repo.find_user_by_id(user.id).await.unwrap().unwrap();
        assert_eq!(by_id.email, "alice@x.com");
    }

    #[tokio::test]
    async fn test_find_user_not_found() {
        let repo = setup_repo().await;

        assert!(repo.find_user_by_email("nobody@x.com").await.unwrap().is_none());
        assert!(repo.find_user_by_id(UserId::new()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_email_is_conflict() {
        let repo = setup_repo().await;
        create_user(&repo, "alice@x.com").await;

        let result = repo
            .create_user(NewUser {
                name: "Other".to_string(),
                email: "alice@x.com".to_string(),
                password_hash: "h".to_string(),
            })
            .await;

        assert!(matches!(result, Err(RepoError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_update_user_credentials() {
        let repo = setup_repo().await;
        let user = create_user(&repo, "alice@x.com").await;

        let updated = repo
            .update_user_credentials(user.id, "Alice B".into(), "$argon2id$new".into())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.name, "Alice B");
        assert_eq!(updated.password_hash, "$argon2id$new");
        assert_eq!(updated.email, "alice@x.com");

        let missing = repo
            .update_user_credentials(UserId::new(), "X".into(), "h".into())
            .await
            .unwrap();
        assert!(missing.is_none());
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Categories
    // ─────────────────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_category_name_unique_per_owner() {
        let repo = setup_repo().await;
        let alice = create_user(&repo, "alice@x.com").await;
        let bob = create_user(&repo, "bob@x.com").await;

        repo.create_category(Category::new("Food".into(), alice.id))
            .await
            .unwrap();
        repo.create_category(Category::new("Food".into(), bob.id))
            .await
            .unwrap();

        let dup = repo
            .create_category(Category::new("Food".into(), alice.id))
            .await;
        assert!(matches!(dup, Err(RepoError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_list_categories_newest_first_and_scoped() {
        let repo = setup_repo().await;
        let alice = create_user(&repo, "alice@x.com").await;
        let bob = create_user(&repo, "bob@x.com").await;

        let mut older = Category::new("Rent".into(), alice.id);
        older.created_at = Utc::now() - Duration::hours(1);
        repo.create_category(older).await.unwrap();
        repo.create_category(Category::new("Food".into(), alice.id))
            .await
            .unwrap();
        repo.create_category(Category::new("Games".into(), bob.id))
            .await
            .unwrap();

        let names: Vec<String> = repo
            .list_categories(alice.id)
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, vec!["Food", "Rent"]);
    }

    #[tokio::test]
    async fn test_find_category_is_owner_scoped() {
        let repo = setup_repo().await;
        let alice = create_user(&repo, "alice@x.com").await;
        let bob = create_user(&repo, "bob@x.com").await;

        let food = repo
            .create_category(Category::new("Food".into(), alice.id))
            .await
            .unwrap();

        assert!(repo.find_category(food.id, alice.id).await.unwrap().is_some());
        assert!(repo.find_category(food.id, bob.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_rename_category() {
        let repo = setup_repo().await;
        let alice = create_user(&repo, "alice@x.com").await;
        let bob = create_user(&repo, "bob@x.com").await;

        let food = repo
            .create_category(Category::new("Food".into(), alice.id))
            .await
            .unwrap();
        repo.create_category(Category::new("Rent".into(), alice.id))
            .await
            .unwrap();

        let renamed = repo
            .rename_category(food.id, alice.id, "Groceries".into())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(renamed.name, "Groceries");
        assert!(renamed.updated_at >= food.updated_at);

        let foreign = repo
            .rename_category(food.id, bob.id, "Mine".into())
            .await
            .unwrap();
        assert!(foreign.is_none());

        let clash = repo.rename_category(food.id, alice.id, "Rent".into()).await;
        assert!(matches!(clash, Err(RepoError::Conflict(_))));

        let missing = repo
            .rename_category(CategoryId::new(), alice.id, "X".into())
            .await
            .unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_delete_category_twice() {
        let repo = setup_repo().await;
        let alice = create_user(&repo, "alice@x.com").await;
        let food = repo
            .create_category(Category::new("Food".into(), alice.id))
            .await
            .unwrap();

        assert!(repo.delete_category(food.id, alice.id).await.unwrap());
        assert!(!repo.delete_category(food.id, alice.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_delete_category_clears_transactions() {
        let repo = setup_repo().await;
        let alice = create_user(&repo, "alice@x.com").await;
        let food = repo
            .create_category(Category::new("Food".into(), alice.id))
            .await
            .unwrap();

        let mut input = new_tx(alice.id, "Lunch", day("2026-02-28"));
        input.category_id = Some(food.id);
        let tx = repo.create_transaction(input).await.unwrap();
        assert_eq!(tx.category.as_ref().map(|c| c.name.as_str()), Some("Food"));

        assert!(repo.delete_category(food.id, alice.id).await.unwrap());

        let tx = repo.find_transaction(tx.id, alice.id).await.unwrap().unwrap();
        assert_eq!(tx.category_id, None);
        assert!(tx.category.is_none());
    }

    #[tokio::test]
    async fn test_delete_category_of_other_owner_is_noop() {
        let repo = setup_repo().await;
        let alice = create_user(&repo, "alice@x.com").await;
        let bob = create_user(&repo, "bob@x.com").await;
        let food = repo
            .create_category(Category::new("Food".into(), alice.id))
            .await
            .unwrap();

        assert!(!repo.delete_category(food.id, bob.id).await.unwrap());
        assert!(repo.find_category(food.id, alice.id).await.unwrap().is_some());
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Transactions
    // ─────────────────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_create_transaction_roundtrip() {
        let repo = setup_repo().await;
        let alice = create_user(&repo, "alice@x.com").await;

        let mut input = new_tx(alice.id, "Salary", day("2026-03-01"));
        input.transaction_type = TransactionType::Income;
        input.amount = 1500.25;
        input.notes = Some("march".into());

        let tx = repo.create_transaction(input).await.unwrap();
        let fetched = repo.find_transaction(tx.id, alice.id).await.unwrap().unwrap();

        assert_eq!(fetched.title, "Salary");
        assert_eq!(fetched.amount, 1500.25);
        assert_eq!(fetched.transaction_type, TransactionType::Income);
        assert_eq!(fetched.date, day("2026-03-01"));
        assert_eq!(fetched.notes.as_deref(), Some("march"));
        assert_eq!(fetched.category_id, None);
    }

    #[tokio::test]
    async fn test_list_transactions_newest_date_first_and_scoped() {
        let repo = setup_repo().await;
        let alice = create_user(&repo, "alice@x.com").await;
        let bob = create_user(&repo, "bob@x.com").await;

        repo.create_transaction(new_tx(alice.id, "Old", day("2026-01-10")))
            .await
            .unwrap();
        repo.create_transaction(new_tx(alice.id, "New", day("2026-02-28")))
            .await
            .unwrap();
        repo.create_transaction(new_tx(bob.id, "Bob's", day("2026-02-01")))
            .await
            .unwrap();

        let titles: Vec<String> = repo
            .list_transactions(alice.id)
            .await
            .unwrap()
            .into_iter()
            .map(|t| t.title)
            .collect();
        assert_eq!(titles, vec!["New", "Old"]);
    }

    #[tokio::test]
    async fn test_update_transaction_partial() {
        let repo = setup_repo().await;
        let alice = create_user(&repo, "alice@x.com").await;
        let food = repo
            .create_category(Category::new("Food".into(), alice.id))
            .await
            .unwrap();

        let mut input = new_tx(alice.id, "Lunch", day("2026-02-28"));
        input.notes = Some("with team".into());
        let tx = repo.create_transaction(input).await.unwrap();

        let updated = repo
            .update_transaction(
                tx.id,
                alice.id,
                TransactionChanges {
                    amount: Some(30.0),
                    notes: Patch::Null,
                    category_id: Patch::Value(food.id),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .unwrap();

        assert_eq!(updated.title, "Lunch");
        assert_eq!(updated.amount, 30.0);
        assert_eq!(updated.notes, None);
        assert_eq!(updated.category.map(|c| c.name), Some("Food".to_string()));
        assert!(updated.updated_at >= tx.updated_at);
    }

    #[tokio::test]
    async fn test_update_transaction_of_other_owner() {
        let repo = setup_repo().await;
        let alice = create_user(&repo, "alice@x.com").await;
        let bob = create_user(&repo, "bob@x.com").await;
        let tx = repo
            .create_transaction(new_tx(alice.id, "Lunch", day("2026-02-28")))
            .await
            .unwrap();

        let result = repo
            .update_transaction(
                tx.id,
                bob.id,
                TransactionChanges {
                    title: Some("Stolen".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert!(result.is_none());

        let unchanged = repo.find_transaction(tx.id, alice.id).await.unwrap().unwrap();
        assert_eq!(unchanged.title, "Lunch");
    }

    #[tokio::test]
    async fn test_delete_transaction() {
        let repo = setup_repo().await;
        let alice = create_user(&repo, "alice@x.com").await;
        let bob = create_user(&repo, "bob@x.com").await;
        let tx = repo
            .create_transaction(new_tx(alice.id, "Lunch", day("2026-02-28")))
            .await
            .unwrap();

        assert!(!repo.delete_transaction(tx.id, bob.id).await.unwrap());
        assert!(repo.delete_transaction(tx.id, alice.id).await.unwrap());
        assert!(!repo.delete_transaction(tx.id, alice.id).await.unwrap());
        assert!(
            !repo
                .delete_transaction(TransactionId::new(), alice.id)
                .await
                .unwrap()
        );
    }
}
