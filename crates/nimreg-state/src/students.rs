use nimreg_core::error::StoreError;
use nimreg_core::types::Student;
use rusqlite::{Connection, params};

/// Insert a new student row. Fails if the NIM already exists
/// (PRIMARY KEY constraint).
pub fn save(conn: &Connection, student: &Student) -> Result<(), StoreError> {
    conn.execute(
        "INSERT INTO students (nim, name, age, address) VALUES (?1, ?2, ?3, ?4)",
        params![student.nim, student.name, student.age, student.address],
    )
    .map_err(StoreError::sqlite)?;
    Ok(())
}

/// Look up a student by NIM.
pub fn find_by_nim(conn: &Connection, nim: &str) -> Result<Student, StoreError> {
    let mut stmt = conn
        .prepare("SELECT nim, name, age, address FROM students WHERE nim = ?1")
        .map_err(StoreError::sqlite)?;

    let result = stmt.query_row(params![nim], |row| {
        Ok(Student {
            nim: row.get(0)?,
            name: row.get(1)?,
            age: row.get(2)?,
            address: row.get(3)?,
        })
    });

    match result {
        Ok(student) => Ok(student),
        Err(rusqlite::Error::QueryReturnedNoRows) => Err(StoreError::NotFound),
        Err(e) => Err(StoreError::sqlite(e)),
    }
}

/// List every student, ordered by NIM.
pub fn list_all(conn: &Connection) -> Result<Vec<Student>, StoreError> {
    let mut stmt = conn
        .prepare("SELECT nim, name, age, address FROM students ORDER BY nim")
        .map_err(StoreError::sqlite)?;

    let rows = stmt
        .query_map([], |row| {
            Ok(Student {
                nim: row.get(0)?,
                name: row.get(1)?,
                age: row.get(2)?,
                address: row.get(3)?,
            })
        })
        .map_err(StoreError::sqlite)?;

    rows.collect::<Result<Vec<_>, _>>()
        .map_err(StoreError::sqlite)
}

/// Overwrite name/age/address for the row matching the student's NIM.
/// Matching no row is reported as `NotFound`; this is not an upsert.
pub fn update_by_nim(conn: &Connection, student: &Student) -> Result<(), StoreError> {
    let affected = conn
        .execute(
            "UPDATE students SET name = ?1, age = ?2, address = ?3 WHERE nim = ?4",
            params![student.name, student.age, student.address, student.nim],
        )
        .map_err(StoreError::sqlite)?;

    if affected == 0 {
        return Err(StoreError::NotFound);
    }
    Ok(())
}

/// Delete the row matching `nim`. Matching no row is reported as `NotFound`.
pub fn delete_by_nim(conn: &Connection, nim: &str) -> Result<(), StoreError> {
    let affected = conn
        .execute("DELETE FROM students WHERE nim = ?1", params![nim])
        .map_err(StoreError::sqlite)?;

    if affected == 0 {
        return Err(StoreError::NotFound);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;
    use crate::schema;
    use tempfile::{TempDir, tempdir};

    fn setup_test_db() -> (TempDir, Connection) {
        let dir = tempdir().unwrap();
        let conn = db::open_connection(&dir.path().join("test.db")).unwrap();
        schema::create_tables(&conn).unwrap();
        (dir, conn)
    }

    fn sample_student() -> Student {
        Student {
            nim: "13518000".to_string(),
            name: "Alice Wijaya".to_string(),
            age: 21,
            address: "Jl. Ganesha 10, Bandung".to_string(),
        }
    }

    #[test]
    fn test_save_and_find_by_nim() {
        let (_dir, conn) = setup_test_db();
        let student = sample_student();

        save(&conn, &student).unwrap();

        let found = find_by_nim(&conn, &student.nim).unwrap();
        assert_eq!(found, student);
    }

    #[test]
    fn test_save_duplicate_nim_fails() {
        let (_dir, conn) = setup_test_db();
        let student = sample_student();
        save(&conn, &student).unwrap();

        // Same NIM should fail (PRIMARY KEY constraint)
        let result = save(&conn, &student);
        assert!(matches!(result, Err(StoreError::Sqlite(_))));
    }

    #[test]
    fn test_find_by_nim_reports_not_found() {
        let (_dir, conn) = setup_test_db();
        let result = find_by_nim(&conn, "99999999");
        assert!(matches!(result, Err(StoreError::NotFound)));
    }

    #[test]
    fn test_update_by_nim() {
        let (_dir, conn) = setup_test_db();
        let student = sample_student();
        save(&conn, &student).unwrap();

        let mut updated = student.clone();
        updated.name = "Alice Kusuma".to_string();
        updated.age = 22;
        updated.address = "Jl. Dago 42, Bandung".to_string();

        update_by_nim(&conn, &updated).unwrap();

        let found = find_by_nim(&conn, &student.nim).unwrap();
        assert_eq!(found.name, "Alice Kusuma");
        assert_eq!(found.age, 22);
        assert_eq!(found.address, "Jl. Dago 42, Bandung");
        // NIM must remain unchanged
        assert_eq!(found.nim, student.nim);
    }

    #[test]
    fn test_update_nonexistent_nim_reports_not_found() {
        let (_dir, conn) = setup_test_db();
        let result = update_by_nim(&conn, &sample_student());
        assert!(matches!(result, Err(StoreError::NotFound)));
    }

    #[test]
    fn test_update_is_not_an_upsert() {
        let (_dir, conn) = setup_test_db();
        let student = sample_student();

        let _ = update_by_nim(&conn, &student);

        // The failed update must not have created a row
        let result = find_by_nim(&conn, &student.nim);
        assert!(matches!(result, Err(StoreError::NotFound)));
    }

    #[test]
    fn test_delete_by_nim() {
        let (_dir, conn) = setup_test_db();
        let student = sample_student();
        save(&conn, &student).unwrap();

        delete_by_nim(&conn, &student.nim).unwrap();

        let result = find_by_nim(&conn, &student.nim);
        assert!(matches!(result, Err(StoreError::NotFound)));
    }

    #[test]
    fn test_delete_nonexistent_nim_reports_not_found() {
        let (_dir, conn) = setup_test_db();
        let result = delete_by_nim(&conn, "99999999");
        assert!(matches!(result, Err(StoreError::NotFound)));
    }

    #[test]
    fn test_list_all_empty_store() {
        let (_dir, conn) = setup_test_db();
        let students = list_all(&conn).unwrap();
        assert!(students.is_empty());
    }

    #[test]
    fn test_list_all_ordered_by_nim() {
        let (_dir, conn) = setup_test_db();
        let mut a = sample_student();
        a.nim = "13518002".to_string();
        let mut b = sample_student();
        b.nim = "13518001".to_string();
        b.name = "Budi Santoso".to_string();

        save(&conn, &a).unwrap();
        save(&conn, &b).unwrap();

        let students = list_all(&conn).unwrap();
        assert_eq!(students.len(), 2);
        assert_eq!(students[0].nim, "13518001");
        assert_eq!(students[1].nim, "13518002");
    }

    #[test]
    fn test_zero_valued_fields_are_persisted_as_is() {
        let (_dir, conn) = setup_test_db();
        // No input validation beyond JSON decoding: empty strings and a
        // zero age are stored verbatim.
        let student = Student {
            nim: String::new(),
            name: String::new(),
            age: 0,
            address: String::new(),
        };

        save(&conn, &student).unwrap();

        let found = find_by_nim(&conn, "").unwrap();
        assert_eq!(found, student);
    }
}
