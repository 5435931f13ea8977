use anyhow::Result;
use rusqlite::Connection;
use serde::Serialize;

const DB_PATH: &str = "data/senate.sqlite";

pub fn connect() -> Result<Connection> {
    std::fs::create_dir_all("data")?;
    let conn = Connection::open(DB_PATH)?;
    conn.execute_batch("PRAGMA journal_mode=WAL;")?;
    Ok(conn)
}

pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS members (
            id               TEXT PRIMARY KEY,
            name             TEXT NOT NULL,
            image            TEXT,
            honorific_prefix TEXT,
            party            TEXT NOT NULL,
            term             TEXT NOT NULL,
            source           TEXT NOT NULL,
            scraped_at       TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE TABLE IF NOT EXISTS wikinames (
            name       TEXT PRIMARY KEY,
            created_at TEXT NOT NULL DEFAULT (datetime('now'))
        );
        ",
    )?;
    Ok(())
}

/// Destructive run-start reset. An absent table is a no-op.
pub fn reset_members(conn: &Connection) -> Result<()> {
    conn.execute_batch("DROP TABLE IF EXISTS members;")?;
    Ok(())
}

/// One legislator, keyed by `id`. `id` is TEXT so filename-derived
/// identifiers keep their leading zeros.
#[derive(Debug, Clone, Serialize)]
pub struct MemberRow {
    pub id: String,
    pub name: String,
    pub image: String,
    pub honorific_prefix: Option<String>,
    pub party: String,
    pub term: String,
    pub source: String,
}

/// Upsert by id: a re-run overwrites the previous row for the same member.
pub fn upsert_member(conn: &Connection, row: &MemberRow) -> Result<()> {
    conn.execute(
        "INSERT OR REPLACE INTO members
         (id, name, image, honorific_prefix, party, term, source)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        rusqlite::params![
            row.id,
            row.name,
            row.image,
            row.honorific_prefix,
            row.party,
            row.term,
            row.source,
        ],
    )?;
    Ok(())
}

/// Upsert the wiki-harvested full names by name. Returns how many were new.
pub fn upsert_wikinames(conn: &Connection, names: &[String]) -> Result<usize> {
    let tx = conn.unchecked_transaction()?;
    let mut count = 0;
    {
        let mut stmt = tx.prepare("INSERT OR IGNORE INTO wikinames (name) VALUES (?1)")?;
        for name in names {
            count += stmt.execute(rusqlite::params![name])?;
        }
    }
    tx.commit()?;
    Ok(count)
}

// ── Roster listing ──

pub struct RosterRow {
    pub id: String,
    pub honorific_prefix: String,
    pub name: String,
    pub party: String,
    pub term: String,
}

pub fn fetch_roster(conn: &Connection, limit: usize) -> Result<Vec<RosterRow>> {
    let sql = format!(
        "SELECT id, COALESCE(honorific_prefix, ''), name, party, term
         FROM members
         ORDER BY CAST(id AS INTEGER), id
         LIMIT {}",
        limit
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map([], |row| {
            Ok(RosterRow {
                id: row.get(0)?,
                honorific_prefix: row.get(1)?,
                name: row.get(2)?,
                party: row.get(3)?,
                term: row.get(4)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

// ── Stats ──

pub struct Stats {
    pub members: usize,
    pub honorifics: usize,
    pub wikinames: usize,
}

pub fn get_stats(conn: &Connection) -> Result<Stats> {
    let members: usize = conn.query_row("SELECT COUNT(*) FROM members", [], |r| r.get(0))?;
    let honorifics: usize = conn.query_row(
        "SELECT COUNT(DISTINCT honorific_prefix) FROM members
         WHERE honorific_prefix IS NOT NULL AND honorific_prefix != ''",
        [],
        |r| r.get(0),
    )?;
    let wikinames: usize = conn.query_row("SELECT COUNT(*) FROM wikinames", [], |r| r.get(0))?;
    Ok(Stats {
        members,
        honorifics,
        wikinames,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_conn() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        init_schema(&conn).unwrap();
        conn
    }

    fn member(id: &str, name: &str) -> MemberRow {
        MemberRow {
            id: id.to_string(),
            name: name.to_string(),
            image: String::new(),
            honorific_prefix: None,
            party: "NCPO".to_string(),
            term: "2557".to_string(),
            source: "http://example/page=1".to_string(),
        }
    }

    #[test]
    fn upsert_same_id_keeps_second_write() {
        let conn = test_conn();
        upsert_member(&conn, &member("42", "first")).unwrap();
        upsert_member(&conn, &member("42", "second")).unwrap();

        let stats = get_stats(&conn).unwrap();
        assert_eq!(stats.members, 1);
        let name: String = conn
            .query_row("SELECT name FROM members WHERE id = '42'", [], |r| r.get(0))
            .unwrap();
        assert_eq!(name, "second");
    }

    #[test]
    fn wikinames_upsert_by_name() {
        let conn = test_conn();
        let names = vec!["ก".to_string(), "ข".to_string(), "ก".to_string()];
        let new = upsert_wikinames(&conn, &names).unwrap();
        assert_eq!(new, 2);
        assert_eq!(get_stats(&conn).unwrap().wikinames, 2);
    }

    #[test]
    fn reset_drops_members_and_tolerates_absence() {
        let conn = Connection::open_in_memory().unwrap();
        // No tables yet: the drop must be a no-op, not an error.
        reset_members(&conn).unwrap();

        init_schema(&conn).unwrap();
        upsert_member(&conn, &member("1", "x")).unwrap();
        reset_members(&conn).unwrap();
        init_schema(&conn).unwrap();
        assert_eq!(get_stats(&conn).unwrap().members, 0);
    }

    #[test]
    fn roster_orders_by_numeric_id() {
        let conn = test_conn();
        upsert_member(&conn, &member("10", "b")).unwrap();
        upsert_member(&conn, &member("2", "a")).unwrap();
        let rows = fetch_roster(&conn, 50).unwrap();
        let ids: Vec<&str> = rows.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["2", "10"]);
    }

    #[test]
    fn distinct_honorific_count() {
        let conn = test_conn();
        let mut a = member("1", "x");
        a.honorific_prefix = Some("นาย".to_string());
        let mut b = member("2", "y");
        b.honorific_prefix = Some("นาย".to_string());
        upsert_member(&conn, &a).unwrap();
        upsert_member(&conn, &b).unwrap();
        upsert_member(&conn, &member("3", "z")).unwrap();
        assert_eq!(get_stats(&conn).unwrap().honorifics, 1);
    }
}
