//! In-memory object store for tests

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::StorageError;

use super::types::StorageObject;
use super::ObjectStore;

/// Object store backed by a map. Only buckets passed at construction exist.
pub struct MemoryObjectStore {
    buckets: HashSet<String>,
    objects: RwLock<HashMap<(String, String), StorageObject>>,
}

impl MemoryObjectStore {
    pub fn with_buckets(buckets: &[&str]) -> Self {
        Self {
            buckets: buckets.iter().map(|b| b.to_string()).collect(),
            objects: RwLock::new(HashMap::new()),
        }
    }

    /// Seed an object directly, bypassing the trait
    pub async fn insert(&self, bucket: &str, key: &str, data: Vec<u8>) {
        self.objects.write().await.insert(
            (bucket.to_string(), key.to_string()),
            StorageObject::new(key, data),
        );
    }

    pub async fn object_count(&self, bucket: &str) -> usize {
        self.objects
            .read()
            .await
            .keys()
            .filter(|(b, _)| b == bucket)
            .count()
    }

    pub async fn keys(&self, bucket: &str) -> Vec<String> {
        self.objects
            .read()
            .await
            .keys()
            .filter(|(b, _)| b == bucket)
            .map(|(_, k)| k.clone())
            .collect()
    }

    fn check_bucket(&self, bucket: &str) -> Result<(), StorageError> {
        if self.buckets.contains(bucket) {
            Ok(())
        } else {
            Err(StorageError::BucketNotFound(bucket.to_string()))
        }
    }
}

#[async_trait]
impl ObjectStore for MemoryObjectStore {
    async fn get_object(&self, bucket: &str, key: &str) -> Result<StorageObject, StorageError> {
        self.check_bucket(bucket)?;
        self.objects
            .read()
            .await
            .get(&(bucket.to_string(), key.to_string()))
            .cloned()
            .ok_or_else(|| StorageError::ObjectNotFound {
                bucket: bucket.to_string(),
                key: key.to_string(),
            })
    }

    async fn put_object(&self, bucket: &str, object: StorageObject) -> Result<(), StorageError> {
        self.check_bucket(bucket)?;
        self.objects
            .write()
            .await
            .insert((bucket.to_string(), object.key.clone()), object);
        Ok(())
    }
}
