use super::StorageService;
use crate::{Error, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Object captured by [`MockStorageClient`], including its delivery metadata.
#[derive(Debug, Clone)]
pub struct StoredObject {
    pub data: Vec<u8>,
    pub content_type: String,
    pub cache_control: String,
    pub public_read: bool,
}

#[derive(Clone)]
pub struct MockStorageClient {
    objects: Arc<Mutex<HashMap<String, StoredObject>>>,
    fail_store_fragments: Arc<Mutex<Vec<String>>>,
    fetch_count: Arc<Mutex<usize>>,
    store_count: Arc<Mutex<usize>>,
}

fn object_id(bucket: &str, key: &str) -> String {
    format!("{bucket}/{key}")
}

impl MockStorageClient {
    pub fn new() -> Self {
        Self {
            objects: Arc::new(Mutex::new(HashMap::new())),
            fail_store_fragments: Arc::new(Mutex::new(Vec::new())),
            fetch_count: Arc::new(Mutex::new(0)),
            store_count: Arc::new(Mutex::new(0)),
        }
    }

    pub fn with_object(self, bucket: &str, key: &str, data: Vec<u8>) -> Self {
        self.objects.lock().unwrap().insert(
            object_id(bucket, key),
            StoredObject {
                data,
                content_type: String::new(),
                cache_control: String::new(),
                public_read: false,
            },
        );
        self
    }

    /// Force `store_object` to fail for any key containing `fragment`.
    pub fn with_store_failure(self, fragment: &str) -> Self {
        self.fail_store_fragments
            .lock()
            .unwrap()
            .push(fragment.to_string());
        self
    }

    pub fn get_object(&self, bucket: &str, key: &str) -> Option<StoredObject> {
        self.objects
            .lock()
            .unwrap()
            .get(&object_id(bucket, key))
            .cloned()
    }

    pub fn get_fetch_count(&self) -> usize {
        *self.fetch_count.lock().unwrap()
    }

    pub fn get_store_count(&self) -> usize {
        *self.store_count.lock().unwrap()
    }
}

impl Default for MockStorageClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl StorageService for MockStorageClient {
    async fn fetch_object(&self, bucket: &str, key: &str) -> Result<Vec<u8>> {
        let mut count = self.fetch_count.lock().unwrap();
        *count += 1;

        let objects = self.objects.lock().unwrap();
        match objects.get(&object_id(bucket, key)) {
            Some(object) => Ok(object.data.clone()),
            None => Err(Error::StorageRead(format!(
                "Object not found: s3://{bucket}/{key}"
            ))),
        }
    }

    async fn store_object(
        &self,
        bucket: &str,
        key: &str,
        data: &[u8],
        content_type: &str,
        cache_control: &str,
        public_read: bool,
    ) -> Result<()> {
        let mut count = self.store_count.lock().unwrap();
        *count += 1;

        let failing = self
            .fail_store_fragments
            .lock()
            .unwrap()
            .iter()
            .any(|fragment| key.contains(fragment.as_str()));
        if failing {
            return Err(Error::StorageWrite(format!(
                "Injected store failure: s3://{bucket}/{key}"
            )));
        }

        self.objects.lock().unwrap().insert(
            object_id(bucket, key),
            StoredObject {
                data: data.to_vec(),
                content_type: content_type.to_string(),
                cache_control: cache_control.to_string(),
                public_read,
            },
        );
        Ok(())
    }

    async fn presigned_get_url(
        &self,
        bucket: &str,
        key: &str,
        expires_in: Duration,
    ) -> Result<String> {
        Ok(format!(
            "https://{bucket}.s3.amazonaws.com/{key}?X-Amz-Expires={}&X-Amz-Signature=mock",
            expires_in.as_secs()
        ))
    }
}
