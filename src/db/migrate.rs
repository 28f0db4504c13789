use crate::ui::messages::success;
use rusqlite::{Connection, OptionalExtension, Result};

/// Ensure that the `log` table exists.
/// Applied migrations are recorded there as `migration_applied` rows.
fn ensure_log_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS log (
            id        INTEGER PRIMARY KEY AUTOINCREMENT,
            date      TEXT NOT NULL,
            operation TEXT NOT NULL,
            target    TEXT DEFAULT '',
            message   TEXT NOT NULL
        );
        "#,
    )?;
    Ok(())
}

struct Migration {
    version: &'static str,
    description: &'static str,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[
    Migration {
        version: "20250301_0001_create_registry",
        description: "Created locations, workstations, MAC addresses and OS types",
        sql: r#"
        CREATE TABLE IF NOT EXISTS locations (
            id                INTEGER PRIMARY KEY AUTOINCREMENT,
            name              TEXT NOT NULL,
            slug              TEXT NOT NULL UNIQUE,
            earliest_opening  TEXT NOT NULL,
            latest_closing    TEXT NOT NULL,
            timezone          TEXT NOT NULL DEFAULT 'UTC',
            is_default        INTEGER NOT NULL DEFAULT 0
        );

        CREATE TABLE IF NOT EXISTS workstations (
            id           INTEGER PRIMARY KEY AUTOINCREMENT,
            name         TEXT NOT NULL,
            location_id  INTEGER NOT NULL REFERENCES locations(id) ON DELETE CASCADE,
            track        INTEGER NOT NULL DEFAULT 1
        );

        CREATE TABLE IF NOT EXISTS mac_addresses (
            id              INTEGER PRIMARY KEY AUTOINCREMENT,
            workstation_id  INTEGER NOT NULL REFERENCES workstations(id) ON DELETE CASCADE,
            address         TEXT NOT NULL UNIQUE,
            nic             TEXT NOT NULL CHECK(nic IN ('ethernet','wireless','other'))
        );

        CREATE TABLE IF NOT EXISTS os_types (
            id       INTEGER PRIMARY KEY AUTOINCREMENT,
            name     TEXT NOT NULL CHECK(name IN ('windows','osx','linux')),
            version  TEXT
        );

        CREATE INDEX IF NOT EXISTS idx_workstations_location ON workstations(location_id, name);
        CREATE INDEX IF NOT EXISTS idx_mac_addresses_workstation ON mac_addresses(workstation_id);
        CREATE UNIQUE INDEX IF NOT EXISTS idx_os_types_name_version
            ON os_types(name, IFNULL(version, ''));
        "#,
    },
    Migration {
        version: "20250301_0002_create_layout",
        description: "Created layout rows and cells",
        sql: r#"
        CREATE TABLE IF NOT EXISTS layout_rows (
            id           INTEGER PRIMARY KEY AUTOINCREMENT,
            location_id  INTEGER NOT NULL REFERENCES locations(id) ON DELETE CASCADE,
            sort_order   INTEGER NOT NULL CHECK(sort_order >= 0)
        );

        CREATE TABLE IF NOT EXISTS layout_cells (
            id              INTEGER PRIMARY KEY AUTOINCREMENT,
            row_id          INTEGER NOT NULL REFERENCES layout_rows(id) ON DELETE CASCADE,
            workstation_id  INTEGER REFERENCES workstations(id) ON DELETE SET NULL,
            sort_order      INTEGER NOT NULL CHECK(sort_order >= 0)
        );

        CREATE INDEX IF NOT EXISTS idx_layout_rows_location ON layout_rows(location_id, sort_order);
        CREATE INDEX IF NOT EXISTS idx_layout_cells_row ON layout_cells(row_id, sort_order);
        "#,
    },
    Migration {
        version: "20250301_0003_create_sessions",
        description: "Created sessions",
        sql: r#"
        CREATE TABLE IF NOT EXISTS sessions (
            id              INTEGER PRIMARY KEY AUTOINCREMENT,
            workstation_id  INTEGER NOT NULL REFERENCES workstations(id) ON DELETE CASCADE,
            os_type_id      INTEGER NOT NULL REFERENCES os_types(id),
            start_ts        TEXT NOT NULL,
            start_date      TEXT NOT NULL,
            start_time      TEXT NOT NULL,
            end_ts          TEXT,
            end_date        TEXT,
            end_time        TEXT,
            CHECK(end_ts IS NULL OR end_ts > start_ts)
        );

        CREATE INDEX IF NOT EXISTS idx_sessions_workstation_open ON sessions(workstation_id, end_ts);
        CREATE INDEX IF NOT EXISTS idx_sessions_start ON sessions(start_ts);
        CREATE INDEX IF NOT EXISTS idx_sessions_start_date ON sessions(start_date);
        "#,
    },
    Migration {
        version: "20250301_0004_create_applications",
        description: "Created applications, reported names and application uses",
        sql: r#"
        CREATE TABLE IF NOT EXISTS applications (
            id    INTEGER PRIMARY KEY AUTOINCREMENT,
            name  TEXT NOT NULL UNIQUE
        );

        CREATE TABLE IF NOT EXISTS reported_applications (
            id              INTEGER PRIMARY KEY AUTOINCREMENT,
            name            TEXT NOT NULL,
            application_id  INTEGER NOT NULL REFERENCES applications(id) ON DELETE CASCADE,
            location_id     INTEGER NOT NULL REFERENCES locations(id) ON DELETE CASCADE,
            UNIQUE(name, location_id)
        );

        CREATE TABLE IF NOT EXISTS application_uses (
            id              INTEGER PRIMARY KEY AUTOINCREMENT,
            application_id  INTEGER NOT NULL REFERENCES applications(id) ON DELETE CASCADE,
            session_id      INTEGER NOT NULL REFERENCES sessions(id) ON DELETE CASCADE,
            duration        INTEGER NOT NULL DEFAULT 0 CHECK(duration >= 0),
            UNIQUE(session_id, application_id)
        );
        "#,
    },
];

fn is_applied(conn: &Connection, version: &str) -> Result<bool> {
    let mut chk = conn.prepare_cached(
        "SELECT 1 FROM log
         WHERE operation = 'migration_applied' AND target = ?1
         LIMIT 1",
    )?;
    Ok(chk.query_row([version], |_| Ok(())).optional()?.is_some())
}

/// Apply one migration and mark it in the same transaction, so a failure
/// leaves neither half-created tables nor a stale marker.
fn apply(conn: &Connection, m: &Migration) -> Result<()> {
    let tx = conn.unchecked_transaction()?;

    tx.execute_batch(m.sql)?;
    tx.execute(
        "INSERT INTO log (date, operation, target, message)
         VALUES (datetime('now'), 'migration_applied', ?1, ?2)",
        [m.version, m.description],
    )?;

    tx.commit()
}

/// Versions of every known migration that is not applied yet.
pub fn pending_migrations(conn: &Connection) -> Result<Vec<&'static str>> {
    ensure_log_table(conn)?;

    let mut out = Vec::new();
    for m in MIGRATIONS {
        if !is_applied(conn, m.version)? {
            out.push(m.version);
        }
    }
    Ok(out)
}

/// Public entry point: run all pending migrations.
///
/// Invoked by db::init_db().
pub fn run_pending_migrations(conn: &Connection) -> Result<()> {
    // 1) Ensure log table
    ensure_log_table(conn)?;

    // 2) Apply, in order, everything not yet marked
    for m in MIGRATIONS {
        if is_applied(conn, m.version)? {
            continue;
        }

        apply(conn, m)?;
        success(format!("Migration applied: {} → {}", m.version, m.description));
    }

    Ok(())
}
