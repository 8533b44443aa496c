//! Destination schema and seed rows.
//!
//! Table and column names are fixed by the application that reads the store.

use rusqlite::{params, Connection};
use sha2::{Digest, Sha256};

use super::Store;
use crate::error::StoreResult;
use crate::logs::{log_info, log_success};
use crate::models::{DEFAULT_PARTITION, DEFAULT_PARTITION_ADDRESS};

/// Seeded administrator account.
pub const ADMIN_USERNAME: &str = "admin";
pub const ADMIN_PASSWORD: &str = "admin";
pub const ADMIN_DISPLAY_NAME: &str = "Administrator";
pub const ADMIN_EMAIL: &str = "admin@example.com";

const SCHEMA_SQL: &str = r#"
DROP TABLE IF EXISTS productos;
DROP TABLE IF EXISTS almacenes;
DROP TABLE IF EXISTS users;

CREATE TABLE productos (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    codigo_barras TEXT NOT NULL,
    nombre TEXT NOT NULL,
    descripcion TEXT,
    descripcion_empaque TEXT,
    color TEXT,
    cantidad INTEGER NOT NULL DEFAULT 0,
    almacen TEXT NOT NULL,
    image_path TEXT,
    UNIQUE(codigo_barras, almacen)
);

CREATE TABLE almacenes (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    nombre TEXT NOT NULL,
    direccion TEXT
);

CREATE TABLE users (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    username TEXT NOT NULL UNIQUE,
    password_hash TEXT NOT NULL,
    nombre TEXT,
    email TEXT,
    is_admin BOOLEAN NOT NULL DEFAULT 0,
    created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
    updated_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
);
"#;

/// Lowercase hex SHA-256, the credential format the reading application expects.
pub fn password_hash(password: &str) -> String {
    hex::encode(Sha256::digest(password.as_bytes()))
}

/// Drop and recreate every managed table, then seed the default partition
/// and the admin account.
///
/// **Destructive**: all rows in `productos`, `almacenes` and `users` are lost.
/// Running it twice yields the same state as running it once.
pub fn provision(store: &mut Store) -> StoreResult<()> {
    log_info("Provisioning destination schema (existing tables are dropped)");

    let tx = store.connection_mut().transaction()?;
    tx.execute_batch(SCHEMA_SQL)?;
    seed_default_partition(&tx)?;
    seed_admin_account(&tx)?;
    tx.commit()?;

    log_success("Schema ready");
    Ok(())
}

/// Insert the default partition unless one with that name exists.
/// Returns whether a row was inserted.
pub fn seed_default_partition(conn: &Connection) -> StoreResult<bool> {
    let existing: i64 = conn.query_row(
        "SELECT COUNT(*) FROM almacenes WHERE nombre = ?1",
        params![DEFAULT_PARTITION],
        |row| row.get(0),
    )?;
    if existing > 0 {
        return Ok(false);
    }

    conn.execute(
        "INSERT INTO almacenes (nombre, direccion) VALUES (?1, ?2)",
        params![DEFAULT_PARTITION, DEFAULT_PARTITION_ADDRESS],
    )?;
    Ok(true)
}

/// Insert the admin account unless the username is taken.
/// Returns whether a row was inserted.
pub fn seed_admin_account(conn: &Connection) -> StoreResult<bool> {
    let existing: i64 = conn.query_row(
        "SELECT COUNT(*) FROM users WHERE username = ?1",
        params![ADMIN_USERNAME],
        |row| row.get(0),
    )?;
    if existing > 0 {
        return Ok(false);
    }

    conn.execute(
        "INSERT INTO users (username, password_hash, nombre, email, is_admin)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            ADMIN_USERNAME,
            password_hash(ADMIN_PASSWORD),
            ADMIN_DISPLAY_NAME,
            ADMIN_EMAIL,
            true
        ],
    )?;
    Ok(true)
}
