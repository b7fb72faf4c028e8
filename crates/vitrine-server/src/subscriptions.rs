//! Append-only CSV log of newsletter / stock-alert subscriptions.

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use serde::Serialize;

const HEADER: [&str; 5] = ["created_at", "email", "name", "phone", "interest"];

#[derive(Debug, Clone, Serialize)]
pub struct Subscription {
    pub created_at: DateTime<Utc>,
    pub email: String,
    pub name: Option<String>,
    pub phone: Option<String>,
    /// Model or category the subscriber asked about.
    pub interest: Option<String>,
}

/// Serializes appends from concurrent requests to one file.
#[derive(Debug, Clone)]
pub struct SubscriptionStore {
    path: PathBuf,
    lock: Arc<Mutex<()>>,
}

impl SubscriptionStore {
    #[must_use]
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            lock: Arc::new(Mutex::new(())),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends one row, writing the header first when the file is new.
    /// Blocking; call from `spawn_blocking`.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the directory or file cannot be written.
    pub fn append(&self, subscription: &Subscription) -> std::io::Result<()> {
        let _guard = self
            .lock
            .lock()
            .map_err(|_| std::io::Error::other("subscription store lock poisoned"))?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        let is_new = file.metadata()?.len() == 0;

        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);
        if is_new {
            writer.write_record(HEADER)?;
        }
        writer.write_record([
            subscription.created_at.to_rfc3339().as_str(),
            subscription.email.as_str(),
            subscription.name.as_deref().unwrap_or_default(),
            subscription.phone.as_deref().unwrap_or_default(),
            subscription.interest.as_deref().unwrap_or_default(),
        ])?;
        writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn subscription(email: &str) -> Subscription {
        Subscription {
            created_at: Utc::now(),
            email: email.to_string(),
            name: Some("Ana, da Silva".to_string()),
            phone: None,
            interest: Some("iPhone 15".to_string()),
        }
    }

    #[test]
    fn append_writes_header_once() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = SubscriptionStore::new(dir.path().join("nested/subscriptions.csv"));

        store
            .append(&subscription("a@example.com"))
            .expect("first append");
        store
            .append(&subscription("b@example.com"))
            .expect("second append");

        let content = std::fs::read_to_string(store.path()).expect("read csv");
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "created_at,email,name,phone,interest");
        assert!(lines[1].contains("a@example.com"));
        assert!(lines[2].contains("b@example.com"));
    }

    #[test]
    fn append_quotes_fields_with_commas() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = SubscriptionStore::new(dir.path().join("subscriptions.csv"));
        store
            .append(&subscription("a@example.com"))
            .expect("append");

        let mut reader = csv::Reader::from_path(store.path()).expect("open csv");
        let record = reader.records().next().expect("row").expect("parse row");
        assert_eq!(&record[2], "Ana, da Silva");
        assert_eq!(&record[3], "");
    }
}
