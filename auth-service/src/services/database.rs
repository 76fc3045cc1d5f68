//! MongoDB store adapter.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mongodb::{
    bson::{doc, to_bson, Bson, Document},
    error::{ErrorKind, WriteFailure},
    options::{IndexOptions, UpdateOptions},
    Client as MongoClient, Collection, Database, IndexModel,
};
use serde::Serialize;
use service_core::error::AppError;

use crate::models::{Device, DeviceUid, Namespace, PrivateKey, User};
use crate::services::{Store, StoreError};

#[derive(Clone)]
pub struct MongoDb {
    client: MongoClient,
    db: Database,
}

const DUPLICATE_KEY: i32 = 11000;

fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
    match err.kind.as_ref() {
        ErrorKind::Write(WriteFailure::WriteError(e)) => e.code == DUPLICATE_KEY,
        ErrorKind::Command(e) => e.code == DUPLICATE_KEY,
        _ => false,
    }
}

fn bson_of<T: Serialize>(value: &T) -> Result<Bson, StoreError> {
    to_bson(value).map_err(|e| StoreError::Backend(e.into()))
}

impl MongoDb {
    pub async fn connect(uri: &str, database: &str) -> Result<Self, AppError> {
        tracing::info!("Connecting to MongoDB");
        let client = MongoClient::with_uri_str(uri).await.map_err(|e| {
            tracing::error!("Failed to connect to MongoDB: {}", e);
            AppError::from(e)
        })?;
        let db = client.database(database);
        tracing::info!(database = %database, "Successfully connected to MongoDB database");
        Ok(Self { client, db })
    }

    pub async fn initialize_indexes(&self) -> Result<(), AppError> {
        tracing::info!("Creating MongoDB indexes for auth-service");

        // Unique uid makes concurrent upserts of one device converge on a
        // single record.
        let device_uid_index = IndexModel::builder()
            .keys(doc! { "uid": 1 })
            .options(
                IndexOptions::builder()
                    .name("device_uid_unique".to_string())
                    .unique(true)
                    .build(),
            )
            .build();
        self.devices()
            .create_index(device_uid_index, None)
            .await
            .map_err(|e| {
                tracing::error!("Failed to create uid index on devices collection: {}", e);
                AppError::from(e)
            })?;

        let device_name_index = IndexModel::builder()
            .keys(doc! { "tenant_id": 1, "name": 1 })
            .options(
                IndexOptions::builder()
                    .name("device_tenant_name_lookup".to_string())
                    .build(),
            )
            .build();
        self.devices()
            .create_index(device_name_index, None)
            .await
            .map_err(AppError::from)?;

        let lookups = [
            ("users", "username", "user_username_lookup"),
            ("users", "email", "user_email_lookup"),
            ("namespaces", "tenant_id", "namespace_tenant_lookup"),
            ("namespaces", "members", "namespace_members_lookup"),
            ("sessions", "uid", "session_uid_lookup"),
            ("private_keys", "fingerprint", "private_key_fingerprint_lookup"),
        ];

        for (collection, field, name) in lookups {
            let index = IndexModel::builder()
                .keys(doc! { field: 1 })
                .options(IndexOptions::builder().name(name.to_string()).build())
                .build();
            self.db
                .collection::<Document>(collection)
                .create_index(index, None)
                .await
                .map_err(|e| {
                    tracing::error!("Failed to create index {} on {}: {}", name, collection, e);
                    AppError::from(e)
                })?;
            tracing::info!("Created index on {}.{}", collection, field);
        }

        Ok(())
    }

    pub async fn health_check(&self) -> Result<(), AppError> {
        self.client
            .database("admin")
            .run_command(doc! { "ping": 1 }, None)
            .await
            .map_err(|e| {
                tracing::error!("MongoDB health check failed: {}", e);
                AppError::from(e)
            })?;
        Ok(())
    }

    pub fn namespaces(&self) -> Collection<Namespace> {
        self.db.collection("namespaces")
    }

    pub fn users(&self) -> Collection<User> {
        self.db.collection("users")
    }

    pub fn devices(&self) -> Collection<Device> {
        self.db.collection("devices")
    }

    pub fn sessions(&self) -> Collection<Document> {
        self.db.collection("sessions")
    }

    pub fn private_keys(&self) -> Collection<PrivateKey> {
        self.db.collection("private_keys")
    }

    async fn device_name_for(
        &self,
        uid: &DeviceUid,
        tenant_id: &str,
        hostname: &str,
    ) -> Result<String, StoreError> {
        let taken = self
            .devices()
            .find_one(
                doc! { "tenant_id": tenant_id, "name": hostname, "uid": { "$ne": uid.as_str() } },
                None,
            )
            .await?
            .is_some();

        Ok(if taken {
            format!("{}-{}", hostname, &uid.as_str()[..6])
        } else {
            hostname.to_string()
        })
    }
}

#[async_trait]
impl Store for MongoDb {
    async fn namespace_get(&self, tenant_id: &str) -> Result<Option<Namespace>, StoreError> {
        Ok(self
            .namespaces()
            .find_one(doc! { "tenant_id": tenant_id }, None)
            .await?)
    }

    async fn namespace_get_first(&self, user_id: &str) -> Result<Option<Namespace>, StoreError> {
        Ok(self
            .namespaces()
            .find_one(doc! { "members": user_id }, None)
            .await?)
    }

    async fn user_get_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        Ok(self
            .users()
            .find_one(doc! { "username": username }, None)
            .await?)
    }

    async fn user_get_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        Ok(self.users().find_one(doc! { "email": email }, None).await?)
    }

    async fn user_get_by_id(&self, id: &str) -> Result<Option<User>, StoreError> {
        Ok(self.users().find_one(doc! { "_id": id }, None).await?)
    }

    async fn device_upsert(&self, device: &Device, hostname: &str) -> Result<(), StoreError> {
        // $setOnInsert fields are ignored when the record already exists, so
        // the display name is fixed by whichever request created it.
        let name = self
            .device_name_for(&device.uid, &device.tenant_id, hostname)
            .await?;

        // Tenant and key are part of the match. A uid owned by another tenant
        // or key misses the filter and the insert hits the unique uid index.
        let filter = doc! {
            "uid": device.uid.as_str(),
            "tenant_id": device.tenant_id.as_str(),
            "public_key": device.public_key.as_str(),
        };
        let update = doc! {
            "$set": {
                "identity": bson_of(&device.identity)?,
                "info": bson_of(&device.info)?,
                "last_seen": bson_of(&device.last_seen)?,
            },
            "$setOnInsert": {
                "name": name,
                "online": false,
            },
        };

        self.devices()
            .update_one(filter, update, UpdateOptions::builder().upsert(true).build())
            .await
            .map_err(|e| {
                if is_duplicate_key(&e) {
                    StoreError::Conflict("device")
                } else {
                    StoreError::from(e)
                }
            })?;
        Ok(())
    }

    async fn device_set_online(&self, uid: &DeviceUid, online: bool) -> Result<(), StoreError> {
        let result = self
            .devices()
            .update_one(
                doc! { "uid": uid.as_str() },
                doc! { "$set": { "online": online } },
                None,
            )
            .await?;

        if result.matched_count == 0 {
            return Err(StoreError::NotFound("device"));
        }
        Ok(())
    }

    async fn device_get_by_uid(
        &self,
        uid: &DeviceUid,
        tenant_id: &str,
    ) -> Result<Option<Device>, StoreError> {
        Ok(self
            .devices()
            .find_one(doc! { "uid": uid.as_str(), "tenant_id": tenant_id }, None)
            .await?)
    }

    async fn session_set_last_seen(
        &self,
        session_uid: &str,
        at: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        let result = self
            .sessions()
            .update_one(
                doc! { "uid": session_uid },
                doc! { "$set": { "last_seen": bson_of(&at)? } },
                None,
            )
            .await?;

        if result.matched_count == 0 {
            return Err(StoreError::NotFound("session"));
        }
        Ok(())
    }

    async fn private_key_get(&self, fingerprint: &str) -> Result<Option<PrivateKey>, StoreError> {
        Ok(self
            .private_keys()
            .find_one(doc! { "fingerprint": fingerprint }, None)
            .await?)
    }
}
