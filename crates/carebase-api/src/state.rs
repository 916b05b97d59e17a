//! Application state wiring all services together.
//!
//! Services are generic over repository/embedder/index traits, but
//! `AppState` pins them to the concrete infra implementations. The
//! embedding model and LanceDB index are loaded once and shared via `Arc`.

use std::path::PathBuf;
use std::sync::Arc;

use carebase_core::load::{DataLoader, LoadSummary};
use carebase_core::service::appointment::AppointmentInfoService;
use carebase_core::service::patient::PatientService;
use carebase_core::service::search::SearchService;
use carebase_infra::sheets::XlsxRecordSource;
use carebase_infra::sqlite::appointment::SqliteAppointmentRepository;
use carebase_infra::sqlite::doctor::SqliteDoctorRepository;
use carebase_infra::sqlite::patient::SqlitePatientRepository;
use carebase_infra::sqlite::pool::DatabasePool;
use carebase_infra::sqlite::prescription::SqlitePrescriptionRepository;
use carebase_infra::vector::{FastEmbedder, LanceEmbeddingIndex, LanceVectorStore};
use carebase_types::error::LoadError;

/// Concrete type aliases for the service generics pinned to infra implementations.
pub type ConcretePatientService =
    PatientService<SqlitePatientRepository, Arc<FastEmbedder>, Arc<LanceEmbeddingIndex>>;

pub type ConcreteAppointmentService = AppointmentInfoService<
    SqliteAppointmentRepository,
    SqliteDoctorRepository,
    SqlitePrescriptionRepository,
>;

pub type ConcreteSearchService =
    SearchService<SqlitePatientRepository, Arc<FastEmbedder>, Arc<LanceEmbeddingIndex>>;

type ConcreteDataLoader = DataLoader<
    XlsxRecordSource,
    Arc<FastEmbedder>,
    Arc<LanceEmbeddingIndex>,
    SqlitePatientRepository,
    SqliteDoctorRepository,
    SqliteAppointmentRepository,
    SqlitePrescriptionRepository,
>;

/// Shared application state holding all services.
#[derive(Clone)]
pub struct AppState {
    pub patient_service: Arc<ConcretePatientService>,
    pub appointment_service: Arc<ConcreteAppointmentService>,
    pub search_service: Arc<ConcreteSearchService>,
    embedder: Arc<FastEmbedder>,
    index: Arc<LanceEmbeddingIndex>,
    pub db_pool: DatabasePool,
    pub data_dir: PathBuf,
}

impl AppState {
    /// Initialize the application state: connect to the database, open the
    /// vector store, load the embedding model, wire services.
    pub async fn init(data_dir: PathBuf) -> anyhow::Result<Self> {
        tokio::fs::create_dir_all(&data_dir).await?;

        let db_url = format!(
            "sqlite://{}?mode=rwc",
            data_dir.join("carebase.db").display()
        );
        let db_pool = DatabasePool::new(&db_url).await?;

        let vector_store = LanceVectorStore::new(data_dir.join("vector_store")).await?;
        let index = Arc::new(LanceEmbeddingIndex::new(vector_store));

        // Model load is slow on first run (downloads ONNX weights); keep it
        // off the async executor.
        let embedder = tokio::task::spawn_blocking(FastEmbedder::new).await??;
        let embedder = Arc::new(embedder);

        let patient_service = PatientService::new(
            SqlitePatientRepository::new(db_pool.clone()),
            Arc::clone(&embedder),
            Arc::clone(&index),
        );

        let appointment_service = AppointmentInfoService::new(
            SqliteAppointmentRepository::new(db_pool.clone()),
            SqliteDoctorRepository::new(db_pool.clone()),
            SqlitePrescriptionRepository::new(db_pool.clone()),
        );

        let search_service = SearchService::new(
            SqlitePatientRepository::new(db_pool.clone()),
            Arc::clone(&embedder),
            Arc::clone(&index),
        );

        Ok(Self {
            patient_service: Arc::new(patient_service),
            appointment_service: Arc::new(appointment_service),
            search_service: Arc::new(search_service),
            embedder,
            index,
            db_pool,
            data_dir,
        })
    }

    /// Run the startup data load from the given spreadsheet source.
    /// Any failure here is fatal to startup.
    pub async fn run_startup_load(&self, source: XlsxRecordSource) -> Result<LoadSummary, LoadError> {
        let loader: ConcreteDataLoader = DataLoader::new(
            source,
            Arc::clone(&self.embedder),
            Arc::clone(&self.index),
            SqlitePatientRepository::new(self.db_pool.clone()),
            SqliteDoctorRepository::new(self.db_pool.clone()),
            SqliteAppointmentRepository::new(self.db_pool.clone()),
            SqlitePrescriptionRepository::new(self.db_pool.clone()),
        );
        loader.load_all().await
    }
}
