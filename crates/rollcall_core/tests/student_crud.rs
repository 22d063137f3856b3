use rollcall_core::db::{open_store, StoreConfig};
use rollcall_core::{
    RepoError, SqliteStudentRepository, Student, StudentForm, StudentListQuery, StudentRepository,
    StudentService, StudentValidationError,
};
use rusqlite::Connection;

fn empty_repo() -> SqliteStudentRepository {
    let conn = open_store(&StoreConfig::in_memory()).unwrap();
    SqliteStudentRepository::try_new(conn).unwrap()
}

fn seeded_repo() -> SqliteStudentRepository {
    let conn = open_store(&StoreConfig::in_memory().with_seed(true)).unwrap();
    SqliteStudentRepository::try_new(conn).unwrap()
}

fn form(roll: &str, name: &str, department: &str, year: &str, email: &str) -> StudentForm {
    StudentForm {
        roll: roll.to_string(),
        name: name.to_string(),
        department: department.to_string(),
        year: year.to_string(),
        email: if email.is_empty() {
            None
        } else {
            Some(email.to_string())
        },
    }
}

fn count(repo: &SqliteStudentRepository) -> usize {
    repo.list_students(&StudentListQuery::default())
        .unwrap()
        .len()
}

#[test]
fn create_and_get_roundtrip() {
    let repo = empty_repo();

    let created = repo
        .create_student(&form("CS110", "Meera Iyer", "CSE", "2", "meera@example.com"))
        .unwrap();
    assert!(created.id > 0);

    let loaded = repo.get_student(created.id).unwrap().unwrap();
    assert_eq!(loaded, created);
    assert_eq!(loaded.roll, "CS110");
    assert_eq!(loaded.name, "Meera Iyer");
    assert_eq!(loaded.department, "CSE");
    assert_eq!(loaded.year, 2);
    assert_eq!(loaded.email, "meera@example.com");
}

#[test]
fn create_trims_fields_and_defaults_missing_email() {
    let repo = empty_repo();

    let created = repo
        .create_student(&form("  CS110  ", " Meera Iyer ", "  CSE ", " 2 ", ""))
        .unwrap();

    assert_eq!(created.roll, "CS110");
    assert_eq!(created.name, "Meera Iyer");
    assert_eq!(created.department, "CSE");
    assert_eq!(created.email, "");

    let loaded = repo.get_student(created.id).unwrap().unwrap();
    assert_eq!(loaded, created);
}

#[test]
fn create_rejects_blank_roll_without_inserting() {
    let repo = empty_repo();

    let err = repo
        .create_student(&form("   ", "Meera Iyer", "CSE", "2", ""))
        .unwrap_err();
    assert!(matches!(
        err,
        RepoError::Validation(StudentValidationError::MissingRoll)
    ));
    assert_eq!(count(&repo), 0);
}

#[test]
fn create_rejects_blank_name_and_unparseable_year() {
    let repo = empty_repo();

    let err = repo
        .create_student(&form("CS110", "  ", "CSE", "2", ""))
        .unwrap_err();
    assert!(matches!(
        err,
        RepoError::Validation(StudentValidationError::MissingName)
    ));

    let err = repo
        .create_student(&form("CS110", "Meera Iyer", "CSE", "second", ""))
        .unwrap_err();
    assert!(matches!(
        err,
        RepoError::Validation(StudentValidationError::InvalidYear { .. })
    ));

    assert_eq!(count(&repo), 0);
}

#[test]
fn create_with_taken_roll_fails_and_leaves_store_unchanged() {
    let repo = empty_repo();

    let original = repo
        .create_student(&form("CS110", "Meera Iyer", "CSE", "2", "meera@example.com"))
        .unwrap();

    let err = repo
        .create_student(&form("CS110", "Someone Else", "ECE", "4", ""))
        .unwrap_err();
    assert!(matches!(err, RepoError::DuplicateRoll(roll) if roll == "CS110"));

    assert_eq!(count(&repo), 1);
    assert_eq!(repo.get_student(original.id).unwrap().unwrap(), original);
}

#[test]
fn update_replaces_all_fields() {
    let repo = empty_repo();

    let created = repo
        .create_student(&form("CS110", "Meera Iyer", "CSE", "2", ""))
        .unwrap();

    let updated = repo
        .update_student(
            created.id,
            &form("CS111", "Meera R Iyer", "ECE", "3", "meera@example.com"),
        )
        .unwrap();
    assert_eq!(updated.id, created.id);

    let loaded = repo.get_student(created.id).unwrap().unwrap();
    assert_eq!(loaded.roll, "CS111");
    assert_eq!(loaded.name, "Meera R Iyer");
    assert_eq!(loaded.department, "ECE");
    assert_eq!(loaded.year, 3);
    assert_eq!(loaded.email, "meera@example.com");
}

#[test]
fn update_reports_not_found_before_validating_fields() {
    let repo = empty_repo();

    // Invalid form on a nonexistent target: the missing record wins.
    let err = repo
        .update_student(4242, &form("", "", "", "no-year", ""))
        .unwrap_err();
    assert!(matches!(err, RepoError::NotFound(4242)));
}

#[test]
fn update_into_another_records_roll_is_rejected_atomically() {
    let repo = empty_repo();

    let keeper = repo
        .create_student(&form("CS110", "Meera Iyer", "CSE", "2", ""))
        .unwrap();
    let target = repo
        .create_student(&form("CS111", "Arjun Nair", "CSE", "3", ""))
        .unwrap();

    let err = repo
        .update_student(target.id, &form("CS110", "Arjun Nair", "ECE", "4", "x@y.z"))
        .unwrap_err();
    assert!(matches!(err, RepoError::DuplicateRoll(roll) if roll == "CS110"));

    // A collision must leave the prior row fully intact.
    assert_eq!(repo.get_student(target.id).unwrap().unwrap(), target);
    assert_eq!(repo.get_student(keeper.id).unwrap().unwrap(), keeper);
}

#[test]
fn updating_a_record_to_its_own_roll_is_not_a_collision() {
    let repo = empty_repo();

    let created = repo
        .create_student(&form("CS110", "Meera Iyer", "CSE", "2", ""))
        .unwrap();

    let updated = repo
        .update_student(created.id, &form("CS110", "Meera Iyer", "CSE", "3", ""))
        .unwrap();
    assert_eq!(updated.roll, "CS110");
    assert_eq!(updated.year, 3);
}

#[test]
fn delete_is_terminal_and_second_delete_reports_not_found() {
    let repo = empty_repo();

    let created = repo
        .create_student(&form("CS110", "Meera Iyer", "CSE", "2", ""))
        .unwrap();

    repo.delete_student(created.id).unwrap();
    assert!(repo.get_student(created.id).unwrap().is_none());

    let err = repo.delete_student(created.id).unwrap_err();
    assert!(matches!(err, RepoError::NotFound(id) if id == created.id));
}

#[test]
fn list_orders_by_id_descending() {
    let repo = empty_repo();

    let first = repo
        .create_student(&form("CS110", "Meera Iyer", "CSE", "2", ""))
        .unwrap();
    let second = repo
        .create_student(&form("CS111", "Arjun Nair", "CSE", "3", ""))
        .unwrap();

    let listed = repo.list_students(&StudentListQuery::default()).unwrap();
    let ids: Vec<_> = listed.iter().map(|student| student.id).collect();
    assert_eq!(ids, vec![second.id, first.id]);
}

#[test]
fn filter_matches_roll_name_or_department_case_insensitively() {
    let repo = empty_repo();

    repo.create_student(&form("CS101", "Asha Patel", "CSE", "3", ""))
        .unwrap();
    repo.create_student(&form("EC201", "Priya Singh", "ECE", "4", ""))
        .unwrap();
    repo.create_student(&form("CS102", "Rohit Kumar", "CSE", "2", ""))
        .unwrap();

    let rolls = |query: &StudentListQuery| -> Vec<String> {
        repo.list_students(query)
            .unwrap()
            .into_iter()
            .map(|student| student.roll)
            .collect()
    };

    // Roll prefix, id-descending order.
    assert_eq!(
        rolls(&StudentListQuery::with_filter("CS1")),
        vec!["CS102", "CS101"]
    );
    // Case-insensitive.
    assert_eq!(
        rolls(&StudentListQuery::with_filter("cs1")),
        vec!["CS102", "CS101"]
    );
    // Name substring.
    assert_eq!(rolls(&StudentListQuery::with_filter("Priya")), vec!["EC201"]);
    // Department substring matches across all three departments here.
    assert_eq!(
        rolls(&StudentListQuery::with_filter("ECE")),
        vec!["EC201"]
    );
    // Blank/whitespace filter behaves as no filter.
    assert_eq!(rolls(&StudentListQuery::with_filter("   ")).len(), 3);
    // No hits is an empty list, not an error.
    assert!(rolls(&StudentListQuery::with_filter("ME999")).is_empty());
}

#[test]
fn filter_treats_like_wildcards_literally() {
    let repo = empty_repo();

    repo.create_student(&form("CS110", "Meera Iyer", "CSE", "2", ""))
        .unwrap();

    assert!(repo
        .list_students(&StudentListQuery::with_filter("%"))
        .unwrap()
        .is_empty());
    assert!(repo
        .list_students(&StudentListQuery::with_filter("_S110"))
        .unwrap()
        .is_empty());
}

#[test]
fn service_end_to_end_scenario_on_seeded_store() {
    let service = StudentService::new(seeded_repo());

    let seeded: Vec<String> = service
        .list_students(&StudentListQuery::default())
        .unwrap()
        .into_iter()
        .map(|student| student.roll)
        .collect();
    assert_eq!(seeded, vec!["EC201", "CS102", "CS101"]);

    let created = service
        .create_student(&form("CS103", "Dev Rao", "CSE", "1", ""))
        .unwrap();
    assert!(created.id > 3);

    let err = service
        .update_student(created.id, &form("CS101", "Dev Rao", "CSE", "1", ""))
        .unwrap_err();
    assert!(matches!(err, RepoError::DuplicateRoll(roll) if roll == "CS101"));

    service.delete_student(created.id).unwrap();

    let err = service.get_student(created.id).unwrap_err();
    assert!(matches!(err, RepoError::NotFound(id) if id == created.id));
}

#[test]
fn service_get_maps_absent_record_to_not_found() {
    let service = StudentService::new(empty_repo());

    let err = service.get_student(99).unwrap_err();
    assert!(matches!(err, RepoError::NotFound(99)));
}

#[test]
fn filter_on_seed_data_returns_exactly_the_cs_records() {
    let service = StudentService::new(seeded_repo());

    let rolls: Vec<String> = service
        .list_students(&StudentListQuery::with_filter("CS1"))
        .unwrap()
        .into_iter()
        .map(|student| student.roll)
        .collect();
    assert_eq!(rolls, vec!["CS102", "CS101"]);
}

#[test]
fn repository_rejects_unbootstrapped_connection() {
    let conn = Connection::open_in_memory().unwrap();

    let result = SqliteStudentRepository::try_new(conn);
    assert!(matches!(result, Err(RepoError::UninitializedConnection)));
}

#[test]
fn repository_rejects_connection_missing_required_column() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(
        "CREATE TABLE students (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            roll TEXT UNIQUE NOT NULL,
            name TEXT NOT NULL
        );
        PRAGMA user_version = 1;",
    )
    .unwrap();

    let result = SqliteStudentRepository::try_new(conn);
    assert!(matches!(
        result,
        Err(RepoError::MissingRequiredColumn {
            table: "students",
            column: "department"
        })
    ));
}

#[test]
fn repository_rejects_invalid_persisted_rows() {
    let repo = empty_repo();

    repo.connection()
        .execute(
            "INSERT INTO students (roll, name, department, year, email)
             VALUES ('', 'Ghost Row', '', 1, '');",
            [],
        )
        .unwrap();

    let err = repo
        .list_students(&StudentListQuery::default())
        .unwrap_err();
    assert!(matches!(err, RepoError::InvalidData(_)));
}

#[test]
fn created_student_roundtrips_through_serde() {
    let repo = empty_repo();

    let created = repo
        .create_student(&form("CS110", "Meera Iyer", "CSE", "2", "meera@example.com"))
        .unwrap();

    let json = serde_json::to_string(&created).unwrap();
    let parsed: Student = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, created);
}
