use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use rusqlite::Connection;

use crate::config::AppConfig;

pub struct AppState {
    pub db: Arc<Mutex<Connection>>,
    pub config: AppConfig,
}

impl AppState {
    pub fn new(conn: Connection, config: AppConfig) -> Self {
        Self {
            db: Arc::new(Mutex::new(conn)),
            config,
        }
    }

    /// Lock the shared connection. A panic while the lock was held leaves no
    /// open transaction behind (rusqlite rolls back on drop), so a poisoned
    /// lock is recovered rather than failing every later request.
    pub fn conn(&self) -> MutexGuard<'_, Connection> {
        self.db.lock().unwrap_or_else(|poisoned| {
            tracing::warn!("recovering poisoned database lock");
            PoisonError::into_inner(poisoned)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;

    #[test]
    fn test_conn_survives_poisoned_lock() {
        let state = Arc::new(AppState::new(db::init_db(":memory:").unwrap(), AppConfig::default()));

        let poisoner = Arc::clone(&state);
        let result = std::thread::spawn(move || {
            let _guard = poisoner.db.lock().unwrap();
            panic!("panic while holding the lock");
        })
        .join();
        assert!(result.is_err());
        assert!(state.db.is_poisoned());

        let count: i64 = state
            .conn()
            .query_row("SELECT COUNT(*) FROM bookings", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 0);
    }
}
