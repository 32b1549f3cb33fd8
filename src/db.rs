use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::sql_query;

pub type PgPool = Pool<ConnectionManager<PgConnection>>;

/******************************************/
// Establishing Db Connection
/******************************************/
pub fn establish_connection(database_url: &str) -> PgPool {
    let manager = ConnectionManager::<PgConnection>::new(database_url);
    Pool::builder()
        .build(manager)
        .expect("Failed to create pool.")
}

/******************************************/
// Creating new db for tests
/******************************************/
pub fn create_database(maintenance_url: &str, database_name: &str) {
    let mut connection =
        PgConnection::establish(maintenance_url).expect("Failed to connect to Postgres");

    let create_db_query = format!(r#"CREATE DATABASE "{}";"#, database_name);
    sql_query(&create_db_query)
        .execute(&mut connection)
        .expect("Failed to create database");
}

/******************************************/
// Dropping db code
/******************************************/
pub fn drop_database(maintenance_url: &str, database_name: &str) {
    let mut connection = PgConnection::establish(maintenance_url)
        .expect("Failed to connect to the maintenance database");

    // The database cannot be dropped while test connections are still open,
    // so terminate them first.
    let terminate_query = format!(
        r#"
        SELECT pg_terminate_backend(pid)
        FROM pg_stat_activity
        WHERE datname = '{}';
    "#,
        database_name
    );

    if let Err(e) = sql_query(&terminate_query).execute(&mut connection) {
        eprintln!("Failed to terminate connections: {}", e);
        return;
    }

    let drop_query = format!(r#"DROP DATABASE IF EXISTS "{}";"#, database_name);

    if let Err(e) = sql_query(&drop_query).execute(&mut connection) {
        eprintln!("Failed to drop database: {}", e);
    }
}
