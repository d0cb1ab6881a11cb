// tests/integration_test.rs

//! Integration tests for gemlock
//!
//! These tests drive the database, index, resolver and lockfile together.

use gemlock::db;
use gemlock::db::models::SpecificationEntry;
use gemlock::packages::parse_records;
use gemlock::{
    Error, InstalledIndex, LockResolver, Lockfile, PackageIdentifier, PackageIndex,
    VersionConstraint,
};
use rusqlite::Connection;
use tempfile::NamedTempFile;

const RAILS_SPECS: &str = r#"[
    {"name": "rails", "version": "1.0.0", "dependencies": [
        {"name": "rake", "requirement": ">= 0.6.2"},
        {"name": "activesupport", "requirement": "= 1.2.5"},
        {"name": "activerecord", "requirement": "= 1.13.2"},
        {"name": "actionpack", "requirement": "= 1.11.2"},
        {"name": "actionmailer", "requirement": "= 1.1.5"},
        {"name": "actionwebservice", "requirement": "= 1.0.0"}
    ]},
    {"name": "rake", "version": "0.6.2"},
    {"name": "rake", "version": "0.7.0.1"},
    {"name": "activesupport", "version": "1.2.5"},
    {"name": "activerecord", "version": "1.13.2", "dependencies": [
        {"name": "activesupport", "requirement": "= 1.2.5"}
    ]},
    {"name": "actionpack", "version": "1.11.2", "dependencies": [
        {"name": "activesupport", "requirement": "= 1.2.5"}
    ]},
    {"name": "actionmailer", "version": "1.1.5", "dependencies": [
        {"name": "actionpack", "requirement": "= 1.11.2"}
    ]},
    {"name": "actionwebservice", "version": "1.0.0", "dependencies": [
        {"name": "actionpack", "requirement": "= 1.11.2"},
        {"name": "activerecord", "requirement": "= 1.13.2"},
        {"name": "soap4r", "requirement": ">= 1.5"}
    ]}
]"#;

/// Create an initialized database holding the given JSON specifications
fn create_db(json: &str) -> (NamedTempFile, Connection) {
    let temp_file = NamedTempFile::new().unwrap();
    let db_path = temp_file.path().to_str().unwrap().to_string();

    db::init(&db_path).unwrap();
    let mut conn = db::open(&db_path).unwrap();

    let specs = parse_records(json).unwrap();
    db::transaction(&mut conn, |tx| {
        for spec in &specs {
            db::register(tx, spec)?;
        }
        Ok(())
    })
    .unwrap();

    (temp_file, conn)
}

fn root(full_name: &str) -> PackageIdentifier {
    PackageIdentifier::parse_full_name(full_name).unwrap()
}

#[test]
fn test_database_lifecycle() {
    let temp_file = NamedTempFile::new().unwrap();
    let db_path = temp_file.path().to_str().unwrap().to_string();

    // Remove the temp file so init can create it
    drop(temp_file);

    assert!(db::init(&db_path).is_ok(), "Database initialization should succeed");
    assert!(
        std::path::Path::new(&db_path).exists(),
        "Database file should exist after initialization"
    );

    let conn = db::open(&db_path).unwrap();
    let result: Result<i32, _> = conn.query_row("SELECT 1", [], |row| row.get(0));
    assert_eq!(result.unwrap(), 1, "Should be able to execute queries");
}

#[test]
fn test_database_init_creates_parent_directories() {
    let temp_dir = tempfile::tempdir().unwrap();
    let db_path = temp_dir
        .path()
        .join("nested/path/to/gemlock.db")
        .to_str()
        .unwrap()
        .to_string();

    assert!(db::init(&db_path).is_ok(), "Should create parent directories");
    assert!(std::path::Path::new(&db_path).exists());
}

#[test]
fn test_import_registers_all_specifications() {
    let (_temp, conn) = create_db(RAILS_SPECS);

    let all = SpecificationEntry::list_all(&conn).unwrap();
    assert_eq!(all.len(), 8);
    assert_eq!(SpecificationEntry::find_by_name(&conn, "rake").unwrap().len(), 2);
}

#[test]
fn test_lenient_lockdown_of_rails() {
    let (_temp, conn) = create_db(RAILS_SPECS);
    let index = InstalledIndex::new(&conn);

    let resolution = LockResolver::new(&index)
        .resolve(&[root("rails-1.0.0")], false)
        .unwrap();
    let text = Lockfile::from_resolution(&resolution).render();

    let expected = "\
require \"rubygems\"
gem 'rails', '= 1.0.0'
gem 'rake', '= 0.7.0.1'
gem 'activesupport', '= 1.2.5'
gem 'activerecord', '= 1.13.2'
gem 'actionpack', '= 1.11.2'
gem 'actionmailer', '= 1.1.5'
gem 'actionwebservice', '= 1.0.0'
# Unable to satisfy 'soap4r (>= 1.5)' from currently installed gems.
";
    assert_eq!(text, expected);
    assert_eq!(resolution.diagnostics().len(), 1);
    assert_eq!(resolution.diagnostics()[0].requiring, root("actionwebservice-1.0.0"));
}

#[test]
fn test_strict_lockdown_fails_without_output() {
    let (_temp, conn) = create_db(RAILS_SPECS);
    let index = InstalledIndex::new(&conn);

    let result = LockResolver::new(&index).resolve(&[root("rails-1.0.0")], true);
    match result {
        Err(Error::UnsatisfiableDependency(diagnostic)) => {
            assert_eq!(diagnostic.dependency.name, "soap4r");
        }
        other => panic!("expected unsatisfiable dependency, got {:?}", other),
    }
}

#[test]
fn test_strict_lockdown_succeeds_when_complete() {
    let (_temp, conn) = create_db(RAILS_SPECS);
    let index = InstalledIndex::new(&conn);

    let resolution = LockResolver::new(&index)
        .resolve(&[root("activerecord-1.13.2")], true)
        .unwrap();

    let pinned: Vec<_> = resolution.locked().iter().map(|id| id.full_name()).collect();
    assert_eq!(pinned, vec!["activerecord-1.13.2", "activesupport-1.2.5"]);
    assert!(resolution.is_complete());
}

#[test]
fn test_unknown_root_is_fatal_in_both_modes() {
    let (_temp, conn) = create_db(RAILS_SPECS);
    let index = InstalledIndex::new(&conn);
    let resolver = LockResolver::new(&index);

    for strict in [true, false] {
        let err = resolver.resolve(&[root("rails-9.9.9")], strict).unwrap_err();
        assert!(matches!(err, Error::SpecificationNotFound(_)));
        assert_eq!(err.to_string(), "Specification not found for rails-9.9.9");
    }
}

#[test]
fn test_lockfile_replays_to_installed_specifications() {
    let (_temp, conn) = create_db(RAILS_SPECS);
    let index = InstalledIndex::new(&conn);

    let resolution = LockResolver::new(&index)
        .resolve(&[root("rails-1.0.0")], false)
        .unwrap();
    let lockfile = Lockfile::parse(&Lockfile::from_resolution(&resolution).render()).unwrap();

    // Every pin names an installed specification satisfying "= version"
    for pin in lockfile.pins() {
        assert!(index.lookup(pin).unwrap().is_some(), "{} should be installed", pin);
        let exact = VersionConstraint::parse(&format!("= {}", pin.version)).unwrap();
        assert_eq!(index.search(&pin.name, &exact).unwrap().len(), 1);
    }
    assert_eq!(lockfile.pins().count(), resolution.locked().len());
}
