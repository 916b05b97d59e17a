//! LanceDB-backed embedding index for the free-text columns.
//!
//! Implements `EmbeddingIndex` from `carebase-core`. Each embedded column
//! lives in its own table keyed by the owning row's primary key; upserts
//! are delete-then-add so reloads replace rather than duplicate. Nearest
//! neighbor search runs with cosine distance against `patient_history`.

use std::sync::Arc;

use arrow_array::{
    FixedSizeListArray, Float32Array, Int64Array, RecordBatch, RecordBatchIterator, StringArray,
};
use arrow_schema::{DataType, Field, Schema};
use futures_util::TryStreamExt;
use lancedb::query::{ExecutableQuery, QueryBase};

use carebase_core::embedding::index::{EmbeddingIndex, Neighbor};
use carebase_types::error::RepositoryError;
use chrono::NaiveDate;

use super::lance::LanceVectorStore;
use super::schema::{
    doctor_specialty_schema, patient_history_schema, prescription_diagnosis_schema,
    EMBEDDING_DIMENSION,
};

pub const PATIENT_HISTORY_TABLE: &str = "patient_history";
pub const DOCTOR_SPECIALTY_TABLE: &str = "doctor_specialty";
pub const PRESCRIPTION_DIAGNOSIS_TABLE: &str = "prescription_diagnosis";

/// LanceDB-backed implementation of `EmbeddingIndex`.
pub struct LanceEmbeddingIndex {
    store: LanceVectorStore,
}

impl LanceEmbeddingIndex {
    pub fn new(store: LanceVectorStore) -> Self {
        Self { store }
    }

    async fn ensure(
        &self,
        table_name: &str,
        schema: Schema,
    ) -> Result<lancedb::Table, RepositoryError> {
        self.store
            .ensure_table(table_name, Arc::new(schema))
            .await
            .map_err(|e| RepositoryError::Query(format!("Failed to ensure table {table_name}: {e}")))
    }

    fn vector_column(embedding: &[f32]) -> Result<FixedSizeListArray, RepositoryError> {
        if embedding.len() != EMBEDDING_DIMENSION as usize {
            return Err(RepositoryError::Query(format!(
                "embedding has {} dimensions, expected {EMBEDDING_DIMENSION}",
                embedding.len()
            )));
        }
        let values = Float32Array::from(embedding.to_vec());
        let field = Arc::new(Field::new("item", DataType::Float32, true));
        Ok(FixedSizeListArray::new(
            field,
            EMBEDDING_DIMENSION,
            Arc::new(values),
            None,
        ))
    }

    async fn replace_row(
        table: &lancedb::Table,
        filter: &str,
        batch: RecordBatch,
    ) -> Result<(), RepositoryError> {
        table
            .delete(filter)
            .await
            .map_err(|e| RepositoryError::Query(format!("Failed to delete old row: {e}")))?;

        let schema = batch.schema();
        let reader = RecordBatchIterator::new(vec![Ok(batch)], schema);
        table
            .add(reader)
            .execute()
            .await
            .map_err(|e| RepositoryError::Query(format!("Failed to add row: {e}")))?;

        Ok(())
    }
}

impl EmbeddingIndex for LanceEmbeddingIndex {
    async fn upsert_history(
        &self,
        patient_id: i64,
        embedding: &[f32],
    ) -> Result<(), RepositoryError> {
        let table = self
            .ensure(PATIENT_HISTORY_TABLE, patient_history_schema())
            .await?;

        let batch = RecordBatch::try_new(
            Arc::new(patient_history_schema()),
            vec![
                Arc::new(Int64Array::from(vec![patient_id])),
                Arc::new(Self::vector_column(embedding)?),
            ],
        )
        .map_err(|e| RepositoryError::Query(format!("Failed to build record batch: {e}")))?;

        Self::replace_row(&table, &format!("id = {patient_id}"), batch).await
    }

    async fn upsert_specialty(
        &self,
        doctor_id: i64,
        embedding: &[f32],
    ) -> Result<(), RepositoryError> {
        let table = self
            .ensure(DOCTOR_SPECIALTY_TABLE, doctor_specialty_schema())
            .await?;

        let batch = RecordBatch::try_new(
            Arc::new(doctor_specialty_schema()),
            vec![
                Arc::new(Int64Array::from(vec![doctor_id])),
                Arc::new(Self::vector_column(embedding)?),
            ],
        )
        .map_err(|e| RepositoryError::Query(format!("Failed to build record batch: {e}")))?;

        Self::replace_row(&table, &format!("doctor_id = {doctor_id}"), batch).await
    }

    async fn upsert_diagnosis(
        &self,
        patient_id: i64,
        doctor_id: i64,
        date: NaiveDate,
        embedding: &[f32],
    ) -> Result<(), RepositoryError> {
        let table = self
            .ensure(PRESCRIPTION_DIAGNOSIS_TABLE, prescription_diagnosis_schema())
            .await?;

        let date_str = date.format("%Y-%m-%d").to_string();
        let key = format!("{patient_id}:{doctor_id}:{date_str}");

        let batch = RecordBatch::try_new(
            Arc::new(prescription_diagnosis_schema()),
            vec![
                Arc::new(StringArray::from(vec![key.clone()])),
                Arc::new(Int64Array::from(vec![patient_id])),
                Arc::new(Int64Array::from(vec![doctor_id])),
                Arc::new(StringArray::from(vec![date_str])),
                Arc::new(Self::vector_column(embedding)?),
            ],
        )
        .map_err(|e| RepositoryError::Query(format!("Failed to build record batch: {e}")))?;

        Self::replace_row(&table, &format!("key = '{key}'"), batch).await
    }

    async fn nearest_history(
        &self,
        query: &[f32],
        limit: usize,
    ) -> Result<Vec<Neighbor>, RepositoryError> {
        if !self.store.table_exists(PATIENT_HISTORY_TABLE).await {
            return Ok(vec![]);
        }

        let table = self
            .ensure(PATIENT_HISTORY_TABLE, patient_history_schema())
            .await?;

        let results = table
            .vector_search(query)
            .map_err(|e| RepositoryError::Query(format!("Vector search setup failed: {e}")))?
            .distance_type(lancedb::DistanceType::Cosine)
            .limit(limit)
            .execute()
            .await
            .map_err(|e| RepositoryError::Query(format!("Vector search failed: {e}")))?;

        let batches: Vec<RecordBatch> = results
            .try_collect()
            .await
            .map_err(|e| RepositoryError::Query(format!("Failed to collect results: {e}")))?;

        let mut neighbors = Vec::new();
        for batch in &batches {
            if batch.num_rows() == 0 {
                continue;
            }

            let id_col = batch
                .column_by_name("id")
                .and_then(|c| c.as_any().downcast_ref::<Int64Array>())
                .ok_or_else(|| {
                    RepositoryError::Query("id column missing from search results".to_string())
                })?;
            let distance_col = batch
                .column_by_name("_distance")
                .and_then(|c| c.as_any().downcast_ref::<Float32Array>());

            for i in 0..batch.num_rows() {
                neighbors.push(Neighbor {
                    patient_id: id_col.value(i),
                    distance: distance_col.map_or(0.0, |d| d.value(i)),
                });
            }
        }

        Ok(neighbors)
    }
}
