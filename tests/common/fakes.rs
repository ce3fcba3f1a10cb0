use async_trait::async_trait;
use fieldsync::AppError;
use fieldsync::application::ports::{
    IdentityProvider, ObjectStorage, RecordFilter, RecordStore, Transcriber,
};
use fieldsync::domain::value_objects::offline::UserId;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::Mutex;

/// Scripted failures: each queued error is returned by one call, then calls succeed.
#[derive(Default)]
pub struct FailureScript {
    errors: Mutex<VecDeque<AppError>>,
}

impl FailureScript {
    pub fn push(&self, error: AppError) {
        self.errors.lock().unwrap().push_back(error);
    }

    pub fn fail_times(&self, times: usize, make: impl Fn() -> AppError) {
        for _ in 0..times {
            self.push(make());
        }
    }

    fn next(&self) -> Option<AppError> {
        self.errors.lock().unwrap().pop_front()
    }
}

#[derive(Default)]
pub struct RecordingStorage {
    pub uploads: Mutex<Vec<(String, usize, Option<String>)>>,
    pub removed: Mutex<Vec<String>>,
    pub upload_failures: FailureScript,
}

impl RecordingStorage {
    pub fn uploaded_paths(&self) -> Vec<String> {
        self.uploads
            .lock()
            .unwrap()
            .iter()
            .map(|(path, _, _)| path.clone())
            .collect()
    }
}

#[async_trait]
impl ObjectStorage for RecordingStorage {
    async fn upload(
        &self,
        path: &str,
        bytes: Vec<u8>,
        content_type: Option<&str>,
    ) -> Result<String, AppError> {
        if let Some(err) = self.upload_failures.next() {
            return Err(err);
        }
        self.uploads.lock().unwrap().push((
            path.to_string(),
            bytes.len(),
            content_type.map(str::to_string),
        ));
        Ok(path.to_string())
    }

    fn public_url(&self, path: &str) -> String {
        format!("https://backend.example.test/storage/v1/object/public/project-photos/{path}")
    }

    async fn remove(&self, paths: &[String]) -> Result<(), AppError> {
        self.removed.lock().unwrap().extend(paths.iter().cloned());
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RecordedWrite {
    Insert {
        table: String,
        record: Value,
    },
    Update {
        table: String,
        filter: RecordFilter,
        patch: Value,
    },
}

#[derive(Default)]
pub struct RecordingRecords {
    pub writes: Mutex<Vec<RecordedWrite>>,
    pub insert_failures: FailureScript,
    pub update_failures: FailureScript,
}

impl RecordingRecords {
    pub fn writes(&self) -> Vec<RecordedWrite> {
        self.writes.lock().unwrap().clone()
    }
}

#[async_trait]
impl RecordStore for RecordingRecords {
    async fn insert(&self, table: &str, record: Value) -> Result<(), AppError> {
        if let Some(err) = self.insert_failures.next() {
            return Err(err);
        }
        self.writes.lock().unwrap().push(RecordedWrite::Insert {
            table: table.to_string(),
            record,
        });
        Ok(())
    }

    async fn update(
        &self,
        table: &str,
        filter: RecordFilter,
        patch: Value,
    ) -> Result<(), AppError> {
        if let Some(err) = self.update_failures.next() {
            return Err(err);
        }
        self.writes.lock().unwrap().push(RecordedWrite::Update {
            table: table.to_string(),
            filter,
            patch,
        });
        Ok(())
    }
}

pub struct ScriptedTranscriber {
    pub text: Mutex<String>,
    pub calls: Mutex<Vec<(String, String)>>,
    pub failures: FailureScript,
}

impl ScriptedTranscriber {
    pub fn new(text: &str) -> Self {
        Self {
            text: Mutex::new(text.to_string()),
            calls: Mutex::new(Vec::new()),
            failures: FailureScript::default(),
        }
    }
}

#[async_trait]
impl Transcriber for ScriptedTranscriber {
    async fn transcribe(&self, audio_base64: &str, mime_type: &str) -> Result<String, AppError> {
        self.calls
            .lock()
            .unwrap()
            .push((audio_base64.to_string(), mime_type.to_string()));
        if let Some(err) = self.failures.next() {
            return Err(err);
        }
        Ok(self.text.lock().unwrap().clone())
    }
}

pub struct FixedIdentity(pub Option<UserId>);

impl IdentityProvider for FixedIdentity {
    fn current_user_id(&self) -> Option<UserId> {
        self.0.clone()
    }
}
