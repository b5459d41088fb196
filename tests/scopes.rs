use std::sync::{
    atomic::{AtomicU8, Ordering},
    Arc,
};

use coffer::{registry, Container, InstantiateErrorKind, ParameterStore, CONTAINER_SCOPE};

struct DatabaseConnection {
    dsn: String,
}

struct SessionStorage {
    connection: Arc<DatabaseConnection>,
}

#[test]
fn test_request_lifecycle() {
    let connection_count = Arc::new(AtomicU8::new(0));
    let storage_count = Arc::new(AtomicU8::new(0));

    let parameters: ParameterStore = [("db_host", "localhost"), ("db_dsn", "postgres://%db_host%/app")]
        .into_iter()
        .collect();

    let registry = registry! {
        "database_connection" => {
            let connection_count = connection_count.clone();
            move |container: Container| -> Result<Arc<DatabaseConnection>, InstantiateErrorKind> {
                connection_count.fetch_add(1, Ordering::SeqCst);
                let coffer::ParameterValue::String(dsn) = container.parameter("db_dsn")? else {
                    return Err(anyhow::anyhow!("db_dsn must be a string").into());
                };
                let connection = Arc::new(DatabaseConnection { dsn });
                container.set("database_connection", connection.clone());
                Ok(connection)
            }
        },
        "session_storage" => {
            let storage_count = storage_count.clone();
            move |container: Container| -> Result<Arc<SessionStorage>, InstantiateErrorKind> {
                storage_count.fetch_add(1, Ordering::SeqCst);
                if !container.is_scope_active("request") {
                    return Err(anyhow::anyhow!("the request scope is not active").into());
                }
                let connection = container.get_downcast::<DatabaseConnection>("database_connection")?;
                let storage = Arc::new(SessionStorage { connection });
                container.set_scoped("session_storage", storage.clone(), "request").map_err(anyhow::Error::new)?;
                Ok(storage)
            }
        },
    };

    let container = Container::with_parameters(registry, parameters);
    container.compile().unwrap();
    container.add_scope("request", CONTAINER_SCOPE).unwrap();

    // first request
    container.enter_scope("request").unwrap();
    let storage = container.get_downcast::<SessionStorage>("session_storage").unwrap();
    assert_eq!(storage.connection.dsn, "postgres://localhost/app");
    let again = container.get_downcast::<SessionStorage>("session_storage").unwrap();
    assert!(Arc::ptr_eq(&storage, &again));
    container.leave_scope("request").unwrap();

    // between requests the storage is gone and its factory refuses to build it
    assert!(container.get("session_storage").is_err());

    // a second request builds fresh scoped services over the shared connection
    container.enter_scope("request").unwrap();
    let fresh = container.get_downcast::<SessionStorage>("session_storage").unwrap();
    assert!(!Arc::ptr_eq(&storage, &fresh));
    container.leave_scope("request").unwrap();

    assert_eq!(connection_count.load(Ordering::SeqCst), 1);
    assert_eq!(storage_count.load(Ordering::SeqCst), 3);
}
