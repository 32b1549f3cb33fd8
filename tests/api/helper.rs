use diesel::prelude::*;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

use argon2::{password_hash::SaltString, Argon2, PasswordHasher};
use diesel::r2d2::{ConnectionManager, Pool};
use ecommerce_api::config::configuration::Settings;
use ecommerce_api::db::{create_database, drop_database, PgPool};
use ecommerce_api::schema::products::dsl as product_dsl;
use ecommerce_api::schema::users::dsl as user_dsl;
use ecommerce_api::startup::Application;
use ecommerce_api::telemetry::{get_subscriber, init_subscriber};
use once_cell::sync::Lazy;
use serde_json::Value;
use uuid::Uuid;

static TRACING: Lazy<()> = Lazy::new(|| {
    let default_filter_level = "info".to_string();
    let subscriber_name = "test".to_string();
    // We cannot assign the output of `get_subscriber` to a variable based on the value of `TEST_LOG`
    // because the sink is part of the type returned by `get_subscriber`, therefore they are not the
    // same type. We could work around it, but this is the most straight-forward way of moving forward.
    if std::env::var("TEST_LOG").is_ok() {
        let subscriber = get_subscriber(subscriber_name, default_filter_level, std::io::stdout);
        init_subscriber(subscriber);
    } else {
        let subscriber = get_subscriber(subscriber_name, default_filter_level, std::io::sink);
        init_subscriber(subscriber);
    };
});

pub struct TestUser {
    pub name: String,
    pub address: String,
    pub email: String,
    pub password: String,
    pub admin: bool,
}

impl TestUser {
    pub fn generate() -> Self {
        Self {
            name: "Test User".to_string(),
            address: "12 Test Street".to_string(),
            email: "user@test.com".to_string(),
            password: Uuid::new_v4().to_string(),
            admin: false,
        }
    }

    pub fn generate_admin() -> Self {
        Self {
            name: "Test Admin".to_string(),
            address: "1 Admin Lane".to_string(),
            email: "admin@test.com".to_string(),
            password: Uuid::new_v4().to_string(),
            admin: true,
        }
    }

    fn store(&self, pool: &PgPool) -> i32 {
        let salt_argon = SaltString::generate(&mut rand::thread_rng());
        let hashed_password = Argon2::default()
            .hash_password(self.password.as_bytes(), &salt_argon)
            .unwrap()
            .to_string();
        let mut conn = pool.get().expect("Failed to get db connection from pool");

        diesel::insert_into(user_dsl::users)
            .values((
                user_dsl::name.eq(self.name.clone()),
                user_dsl::address.eq(self.address.clone()),
                user_dsl::email.eq(self.email.clone()),
                user_dsl::password_hash.eq(hashed_password),
                user_dsl::admin.eq(self.admin),
            ))
            .returning(user_dsl::id)
            .get_result::<i32>(&mut conn)
            .expect("Failed to create test user.")
    }
}

pub struct TestApp {
    pub port: u16,
    pub address: String,
    pub db_pool: PgPool,
    pub database_name: String,
    pub test_db_url: String,
    pub jwt_secret: String,
    pub test_user: TestUser,
    pub test_user_id: i32,
    pub test_admin: TestUser,
    pub test_admin_id: i32,
    pub api_client: reqwest::Client,
}

impl TestApp {
    pub async fn login(&self, email: &str, password: &str) -> String {
        let response = self
            .api_client
            .post(&format!("{}/login", &self.address))
            .json(&serde_json::json!({
                "email": email,
                "password": password
            }))
            .send()
            .await
            .expect("Failed to execute request.");
        assert!(response.status().is_success());
        let body: Value = response.json().await.unwrap();
        body["access_token"]
            .as_str()
            .expect("access_token not found")
            .to_string()
    }

    pub fn drop_database(&self) {
        drop_database(&self.test_db_url, &self.database_name);
    }
}

pub fn run_db_migrations(conn: &mut impl MigrationHarness<diesel::pg::Pg>) {
    conn.run_pending_migrations(MIGRATIONS)
        .expect("Could not run migrations");
}

/******************************************/
// Adding seed data to products table
/******************************************/
pub fn seed_products(pool: &PgPool) -> Vec<i32> {
    let data: Vec<(String, f64)> = vec![
        ("Laptop".to_string(), 50000.0),
        ("Smart Phone".to_string(), 20000.0),
        ("Dress".to_string(), 5000.0),
        ("Bottle".to_string(), 1000.0),
        ("Cap".to_string(), 500.0),
    ];
    let mut conn = pool.get().expect("Failed to get db connection from Pool");
    data.into_iter()
        .map(|(name, price)| {
            diesel::insert_into(product_dsl::products)
                .values((
                    product_dsl::product_name.eq(name),
                    product_dsl::price.eq(price),
                ))
                .returning(product_dsl::id)
                .get_result::<i32>(&mut conn)
                .expect("Failed to seed products")
        })
        .collect()
}

pub async fn spawn_app() -> TestApp {
    // To Ensure that the tracing stack is only initialized once
    Lazy::force(&TRACING);

    let settings = Settings::new().expect("Failed to load configurations");
    let database_name = Uuid::new_v4().to_string();
    let test_db_url = settings.database.test_url.clone();
    create_database(&test_db_url, &database_name);

    let new_database_url = format!("{}/{}", test_db_url, database_name);
    let manager = ConnectionManager::<PgConnection>::new(new_database_url);
    let pool = Pool::builder()
        .build(manager)
        .expect("Failed to create pool.");
    // Run migrations
    let mut conn = pool.get().expect("Couldn't get db connection from Pool");
    run_db_migrations(&mut conn);

    let application = Application::build(0, pool.clone(), settings.jwt.secret.clone())
        .await
        .expect("Failed to build application");
    let application_port = application.port();
    let address = format!("http://127.0.0.1:{}", application_port);
    let _ = tokio::spawn(application.run_until_stopped());

    let client = reqwest::Client::builder()
        .cookie_store(true)
        .build()
        .unwrap();

    let test_user = TestUser::generate();
    let test_admin = TestUser::generate_admin();
    let test_user_id = test_user.store(&pool);
    let test_admin_id = test_admin.store(&pool);

    TestApp {
        port: application_port,
        address,
        db_pool: pool,
        database_name,
        test_db_url,
        jwt_secret: settings.jwt.secret,
        test_user,
        test_user_id,
        test_admin,
        test_admin_id,
        api_client: client,
    }
}
