//! Student repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide stable CRUD APIs over the canonical `students` table.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - Write paths must call `StudentForm::validate()` before SQL mutations.
//! - `roll` uniqueness is enforced by the store; a collision fails the whole
//!   statement and leaves the prior row intact.
//! - Read paths must reject invalid persisted state instead of masking it.

use crate::db::DbError;
use crate::model::student::{Student, StudentForm, StudentId, StudentValidationError};
use rusqlite::{params, Connection, ErrorCode, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

const STUDENT_SELECT_SQL: &str = "SELECT
    id,
    roll,
    name,
    department,
    year,
    email
FROM students";

const REQUIRED_COLUMNS: &[&str] = &["id", "roll", "name", "department", "year", "email"];

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for student persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(StudentValidationError),
    Db(DbError),
    /// No record exists with the targeted id.
    NotFound(StudentId),
    /// The submitted roll already belongs to a different record.
    DuplicateRoll(String),
    /// A persisted row failed shape checks on read.
    InvalidData(String),
    /// The connection has not been through store bootstrap.
    UninitializedConnection,
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "student not found: {id}"),
            Self::DuplicateRoll(roll) => {
                write!(f, "roll number `{roll}` is already taken")
            }
            Self::InvalidData(message) => write!(f, "invalid persisted student data: {message}"),
            Self::UninitializedConnection => {
                write!(f, "connection has not been initialized via open_store")
            }
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "table `{table}` is missing required column `{column}`")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<StudentValidationError> for RepoError {
    fn from(value: StudentValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Query options for listing students.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StudentListQuery {
    /// Optional substring filter matched case-insensitively against roll,
    /// name, or department. Blank text behaves as no filter.
    pub filter: Option<String>,
}

impl StudentListQuery {
    /// Builds a query from raw search-box text.
    pub fn with_filter(text: impl Into<String>) -> Self {
        Self {
            filter: Some(text.into()),
        }
    }
}

/// Repository interface for student CRUD operations.
pub trait StudentRepository {
    /// Validates and inserts a new record, returning it with its assigned id.
    fn create_student(&self, form: &StudentForm) -> RepoResult<Student>;
    /// Replaces all mutable fields of an existing record.
    fn update_student(&self, id: StudentId, form: &StudentForm) -> RepoResult<Student>;
    /// Gets one record by id.
    fn get_student(&self, id: StudentId) -> RepoResult<Option<Student>>;
    /// Lists records ordered by id descending, optionally filtered.
    fn list_students(&self, query: &StudentListQuery) -> RepoResult<Vec<Student>>;
    /// Hard-deletes one record by id.
    fn delete_student(&self, id: StudentId) -> RepoResult<()>;
}

/// SQLite-backed student repository owning its store connection.
pub struct SqliteStudentRepository {
    conn: Connection,
}

impl SqliteStudentRepository {
    /// Constructs a repository from a migrated/ready connection.
    ///
    /// Rejects connections that skipped [`crate::db::open_store`] or whose
    /// `students` table does not match the expected shape.
    pub fn try_new(conn: Connection) -> RepoResult<Self> {
        ensure_connection_ready(&conn)?;
        Ok(Self { conn })
    }

    /// Read access to the underlying connection, for diagnostics and tests.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

impl StudentRepository for SqliteStudentRepository {
    fn create_student(&self, form: &StudentForm) -> RepoResult<Student> {
        let input = form.validate()?;

        self.conn
            .execute(
                "INSERT INTO students (roll, name, department, year, email)
                 VALUES (?1, ?2, ?3, ?4, ?5);",
                params![
                    input.roll.as_str(),
                    input.name.as_str(),
                    input.department.as_str(),
                    input.year,
                    input.email.as_str(),
                ],
            )
            .map_err(|err| map_roll_conflict(err, &input.roll))?;

        let id = self.conn.last_insert_rowid();
        Ok(input.into_student(id))
    }

    fn update_student(&self, id: StudentId, form: &StudentForm) -> RepoResult<Student> {
        // A nonexistent target is definitive; report it before judging the
        // submitted field values.
        if self.get_student(id)?.is_none() {
            return Err(RepoError::NotFound(id));
        }

        let input = form.validate()?;

        let changed = self
            .conn
            .execute(
                "UPDATE students
                 SET roll = ?1, name = ?2, department = ?3, year = ?4, email = ?5
                 WHERE id = ?6;",
                params![
                    input.roll.as_str(),
                    input.name.as_str(),
                    input.department.as_str(),
                    input.year,
                    input.email.as_str(),
                    id,
                ],
            )
            .map_err(|err| map_roll_conflict(err, &input.roll))?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        Ok(input.into_student(id))
    }

    fn get_student(&self, id: StudentId) -> RepoResult<Option<Student>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{STUDENT_SELECT_SQL} WHERE id = ?1;"))?;

        let mut rows = stmt.query(params![id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_student_row(row)?));
        }

        Ok(None)
    }

    fn list_students(&self, query: &StudentListQuery) -> RepoResult<Vec<Student>> {
        let filter = query
            .filter
            .as_deref()
            .map(str::trim)
            .filter(|text| !text.is_empty());

        let mut sql = String::from(STUDENT_SELECT_SQL);
        let pattern = filter.map(|text| format!("%{}%", escape_like_pattern(text)));
        if pattern.is_some() {
            // SQLite LIKE is case-insensitive for ASCII, which is the
            // documented matching behavior of the search box.
            sql.push_str(
                " WHERE roll LIKE ?1 ESCAPE '\\'
                     OR name LIKE ?1 ESCAPE '\\'
                     OR department LIKE ?1 ESCAPE '\\'",
            );
        }
        sql.push_str(" ORDER BY id DESC;");

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = match &pattern {
            Some(pattern) => stmt.query(params![pattern])?,
            None => stmt.query([])?,
        };

        let mut students = Vec::new();
        while let Some(row) = rows.next()? {
            students.push(parse_student_row(row)?);
        }

        Ok(students)
    }

    fn delete_student(&self, id: StudentId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM students WHERE id = ?1;", params![id])?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        Ok(())
    }
}

fn ensure_connection_ready(conn: &Connection) -> RepoResult<()> {
    let version: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    if version == 0 {
        return Err(RepoError::UninitializedConnection);
    }

    let mut stmt = conn.prepare("PRAGMA table_info(students);")?;
    let mut rows = stmt.query([])?;
    let mut columns = Vec::new();
    while let Some(row) = rows.next()? {
        columns.push(row.get::<_, String>("name")?);
    }

    for required in REQUIRED_COLUMNS {
        if !columns.iter().any(|column| column == required) {
            return Err(RepoError::MissingRequiredColumn {
                table: "students",
                column: required,
            });
        }
    }

    Ok(())
}

fn parse_student_row(row: &Row<'_>) -> RepoResult<Student> {
    let id: StudentId = row.get("id")?;
    if id <= 0 {
        return Err(RepoError::InvalidData(format!(
            "invalid id value `{id}` in students.id"
        )));
    }

    let roll: String = row.get("roll")?;
    if roll.is_empty() {
        return Err(RepoError::InvalidData(format!(
            "empty roll in students row id={id}"
        )));
    }

    Ok(Student {
        id,
        roll,
        name: row.get("name")?,
        department: row.get("department")?,
        year: row.get("year")?,
        email: row.get("email")?,
    })
}

/// Maps a UNIQUE-constraint failure on `students.roll` to `DuplicateRoll`.
fn map_roll_conflict(err: rusqlite::Error, roll: &str) -> RepoError {
    if let rusqlite::Error::SqliteFailure(info, Some(message)) = &err {
        if info.code == ErrorCode::ConstraintViolation && message.contains("students.roll") {
            return RepoError::DuplicateRoll(roll.to_string());
        }
    }
    err.into()
}

fn escape_like_pattern(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::escape_like_pattern;

    #[test]
    fn escape_like_pattern_escapes_wildcards() {
        assert_eq!(escape_like_pattern("50%_x\\y"), "50\\%\\_x\\\\y");
        assert_eq!(escape_like_pattern("plain"), "plain");
    }
}
