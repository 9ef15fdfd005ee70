use crate::config::StoreConfig;
use crate::error::app_error::AppError;
use crate::models::booking::Booking;
use crate::models::car::Car;
use crate::models::user::{User, UserRole};
use rocket::fairing::AdHoc;
use serde::{Deserialize, Serialize};
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info};

/// The whole store document. Every read and write moves this value as a unit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub cars: Vec<Car>,
    #[serde(default)]
    pub users: Vec<User>,
    #[serde(default)]
    pub bookings: Vec<Booking>,
}

impl Snapshot {
    /// Starter fleet and accounts for a fresh deployment.
    pub fn sample() -> Self {
        let car = |id: u64, name: &str, brand: &str, price_per_day: i64, image: &str| Car {
            id,
            name: name.to_string(),
            brand: brand.to_string(),
            price_per_day,
            fuel_type: "Diesel".to_string(),
            image: image.to_string(),
            availability: true,
            rc_doc: None,
            insurance_doc: None,
        };
        let user = |id: u64, name: &str, email: &str, phone: &str, role: UserRole, password: &str| User {
            id,
            name: name.to_string(),
            email: email.to_string(),
            phone: phone.to_string(),
            role,
            password: Some(password.to_string()),
        };

        Self {
            cars: vec![
                car(
                    1,
                    "Scorpio-N",
                    "Mahindra",
                    4500,
                    "https://images.unsplash.com/photo-1533106497176-45ae19e68ba2?auto=format&fit=crop&q=80&w=800",
                ),
                car(
                    2,
                    "Thar Rooftop",
                    "Mahindra",
                    3500,
                    "https://images.unsplash.com/photo-1533473359331-0135ef1b58bf?auto=format&fit=crop&q=80&w=800",
                ),
                car(
                    3,
                    "Fortuner Legender",
                    "Toyota",
                    8500,
                    "https://images.unsplash.com/photo-1541899481282-d53bffe3c35d?auto=format&fit=crop&q=80&w=800",
                ),
            ],
            users: vec![
                user(1, "Admin User", "admin@driveeasy.com", "9876543210", UserRole::Admin, "admin123"),
                user(2, "Test User", "user@driveeasy.com", "9876543211", UserRole::User, "user123"),
            ],
            bookings: Vec::new(),
        }
    }

    pub fn is_unseeded(&self) -> bool {
        self.cars.is_empty() && self.users.is_empty()
    }
}

/// Whole-document persistence. Implementations never write partially.
#[async_trait::async_trait]
pub trait DocumentStore: Send + Sync {
    async fn load(&self) -> Result<Snapshot, AppError>;
    async fn save(&self, snapshot: &Snapshot) -> Result<(), AppError>;
}

/// JSON file on disk, used by the HTTP server.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
    pretty: bool,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>, pretty: bool) -> Self {
        Self { path: path.into(), pretty }
    }
}

#[async_trait::async_trait]
impl DocumentStore for FileStore {
    async fn load(&self) -> Result<Snapshot, AppError> {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "store document absent, starting empty");
                return Ok(Snapshot::default());
            }
            Err(e) => return Err(AppError::storage(format!("Failed to read {}", self.path.display()), e)),
        };

        serde_json::from_str(&raw).map_err(|e| AppError::serialization(format!("Malformed store document {}", self.path.display()), e))
    }

    async fn save(&self, snapshot: &Snapshot) -> Result<(), AppError> {
        let raw = if self.pretty {
            serde_json::to_string_pretty(snapshot)
        } else {
            serde_json::to_string(snapshot)
        }
        .map_err(|e| AppError::serialization("Failed to serialize store document", e))?;

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| AppError::storage(format!("Failed to create {}", parent.display()), e))?;
        }

        tokio::fs::write(&self.path, raw)
            .await
            .map_err(|e| AppError::storage(format!("Failed to write {}", self.path.display()), e))
    }
}

/// Serialized document held in process, the embedded counterpart of the file store.
/// Seeds itself with [`Snapshot::sample`] on first access.
#[derive(Debug, Default)]
pub struct MemoryStore {
    document: Mutex<Option<String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that starts with empty collections instead of the sample data.
    pub fn empty() -> Self {
        Self::with_document(r#"{"cars":[],"users":[],"bookings":[]}"#)
    }

    pub fn with_document(document: impl Into<String>) -> Self {
        Self {
            document: Mutex::new(Some(document.into())),
        }
    }
}

#[async_trait::async_trait]
impl DocumentStore for MemoryStore {
    async fn load(&self) -> Result<Snapshot, AppError> {
        let mut document = self.document.lock().await;
        if let Some(raw) = document.as_deref() {
            return serde_json::from_str(raw).map_err(|e| AppError::serialization("Malformed in-memory document", e));
        }

        let sample = Snapshot::sample();
        let raw = serde_json::to_string(&sample).map_err(|e| AppError::serialization("Failed to serialize sample data", e))?;
        *document = Some(raw);
        Ok(sample)
    }

    async fn save(&self, snapshot: &Snapshot) -> Result<(), AppError> {
        let raw = serde_json::to_string(snapshot).map_err(|e| AppError::serialization("Failed to serialize store document", e))?;
        *self.document.lock().await = Some(raw);
        Ok(())
    }
}

/// Shared handle to the configured backend. Read-modify-write cycles issued through one
/// handle are serialized; separate processes sharing a file are not coordinated.
#[derive(Clone)]
pub struct StoreHandle {
    backend: Arc<dyn DocumentStore>,
    lock: Arc<Mutex<()>>,
}

impl StoreHandle {
    pub fn new(backend: impl DocumentStore + 'static) -> Self {
        Self {
            backend: Arc::new(backend),
            lock: Arc::new(Mutex::new(())),
        }
    }

    pub async fn read(&self) -> Result<Snapshot, AppError> {
        let _guard = self.lock.lock().await;
        self.backend.load().await
    }

    /// Load, apply `change`, and save when it succeeds. An error leaves the document untouched.
    pub async fn try_update<T, F>(&self, change: F) -> Result<T, AppError>
    where
        F: FnOnce(&mut Snapshot) -> Result<T, AppError> + Send,
        T: Send,
    {
        let _guard = self.lock.lock().await;
        let mut snapshot = self.backend.load().await?;
        let outcome = change(&mut snapshot)?;
        self.backend.save(&snapshot).await?;
        Ok(outcome)
    }

    /// Load, apply `change`, and save only on `Ok(Some(_))`. The check and the write happen
    /// under one lock, so a decision made on the loaded state still holds when it is saved.
    pub async fn try_mutate<T, F>(&self, change: F) -> Result<Option<T>, AppError>
    where
        F: FnOnce(&mut Snapshot) -> Result<Option<T>, AppError> + Send,
        T: Send,
    {
        let _guard = self.lock.lock().await;
        let mut snapshot = self.backend.load().await?;
        let outcome = change(&mut snapshot)?;
        if outcome.is_some() {
            self.backend.save(&snapshot).await?;
        }
        Ok(outcome)
    }

    /// Load, apply `change`, and save when it returns `Some`. `None` leaves the document untouched.
    pub async fn mutate<T, F>(&self, change: F) -> Result<Option<T>, AppError>
    where
        F: FnOnce(&mut Snapshot) -> Option<T> + Send,
        T: Send,
    {
        self.try_mutate(|snapshot| Ok(change(snapshot))).await
    }

    /// Write the sample fleet and accounts when the document holds neither cars nor users.
    pub async fn seed_if_empty(&self) -> Result<bool, AppError> {
        let seeded = self
            .mutate(|snapshot| {
                if snapshot.is_unseeded() {
                    *snapshot = Snapshot::sample();
                    Some(())
                } else {
                    None
                }
            })
            .await?;
        Ok(seeded.is_some())
    }
}

pub fn stage_store(store_config: StoreConfig) -> AdHoc {
    AdHoc::try_on_ignite("JSON store", move |rocket| async move {
        let store = StoreHandle::new(FileStore::new(&store_config.path, store_config.pretty));

        if store_config.seed_sample_data {
            match store.seed_if_empty().await {
                Ok(true) => info!(path = %store_config.path, "Seeded store with sample cars and users"),
                Ok(false) => debug!(path = %store_config.path, "Store already populated"),
                Err(e) => {
                    tracing::error!("Failed to initialize store at {}: {}", store_config.path, e);
                    return Err(rocket);
                }
            }
        }

        info!(path = %store_config.path, "JSON store ready");
        Ok(rocket.manage(store))
    })
}
