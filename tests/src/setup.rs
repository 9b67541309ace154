use gust_core::driver::Driver;
use gust_driver_sqlite::Sqlite;

/// Chooses the driver a test runs against.
pub trait Setup {
    /// The driver, and the temporary directory holding its files if any
    fn driver(&self) -> (Box<dyn Driver>, Option<tempfile::TempDir>);
}

pub enum SetupSqlite {
    InMemory,

    /// A database file in a fresh temporary directory
    File,
}

impl SetupSqlite {
    pub fn in_memory() -> SetupSqlite {
        SetupSqlite::InMemory
    }

    pub fn file() -> SetupSqlite {
        SetupSqlite::File
    }
}

impl Setup for SetupSqlite {
    fn driver(&self) -> (Box<dyn Driver>, Option<tempfile::TempDir>) {
        match self {
            SetupSqlite::InMemory => (Box::new(Sqlite::in_memory()), None),
            SetupSqlite::File => {
                let dir = tempfile::tempdir().expect("failed to create temp dir");
                let driver = Sqlite::open(dir.path().join("gust.db"));
                (Box::new(driver), Some(dir))
            }
        }
    }
}
