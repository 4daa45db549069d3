use chrono::{DateTime, Utc};
use serde::Serialize;
use serde::de::DeserializeOwned;
use uuid::Uuid;

/// A value that can live in a [`Collection`](super::Collection).
///
/// An empty id means "not assigned yet"; `create` fills it in together with
/// the timestamps.
pub trait Record: Clone + Serialize + DeserializeOwned + Send + Sync + 'static {
    fn id(&self) -> &str;
    fn set_id(&mut self, id: String);
    fn created_at(&self) -> Option<DateTime<Utc>>;
    fn stamp(&mut self, created_at: DateTime<Utc>, updated_at: DateTime<Utc>);
}

/// Globally unique opaque identifier.
pub fn generate_id() -> String {
    Uuid::new_v4().to_string()
}

/// Implements [`Record`] for a struct with `id`, `created_at` and
/// `updated_at` fields.
#[macro_export]
macro_rules! impl_record {
    ($ty:ty) => {
        impl $crate::store::Record for $ty {
            fn id(&self) -> &str {
                &self.id
            }

            fn set_id(&mut self, id: String) {
                self.id = id;
            }

            fn created_at(&self) -> Option<chrono::DateTime<chrono::Utc>> {
                self.created_at
            }

            fn stamp(
                &mut self,
                created_at: chrono::DateTime<chrono::Utc>,
                updated_at: chrono::DateTime<chrono::Utc>,
            ) {
                self.created_at = Some(created_at);
                self.updated_at = Some(updated_at);
            }
        }
    };
}
