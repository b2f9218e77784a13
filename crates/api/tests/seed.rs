//! Tests for startup seeding of the admin account.

use sqlx::PgPool;
use taskboard_api::auth::password::verify_password;
use taskboard_api::config::SeedAdmin;
use taskboard_api::seed::ensure_admin;
use taskboard_core::roles::UserRole;
use taskboard_db::repositories::ProfileRepo;

fn seed() -> SeedAdmin {
    SeedAdmin {
        email: "Root@Example.com".to_string(),
        password: "correct horse battery".to_string(),
        full_name: "Root".to_string(),
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_seed_admin_created_once(pool: PgPool) {
    assert!(ensure_admin(&pool, &seed()).await.unwrap());
    assert!(!ensure_admin(&pool, &seed()).await.unwrap());

    assert_eq!(ProfileRepo::count(&pool).await.unwrap(), 1);

    let profile = ProfileRepo::find_by_email(&pool, "root@example.com")
        .await
        .unwrap()
        .expect("seeded admin should exist");
    assert_eq!(profile.role, UserRole::Admin);
    assert!(profile.is_active);

    let credentials = ProfileRepo::find_credentials_by_email(&pool, "root@example.com")
        .await
        .unwrap()
        .unwrap();
    assert!(verify_password("correct horse battery", &credentials.password_hash).unwrap());
}
