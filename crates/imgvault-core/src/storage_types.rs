use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

/// Object store that holds an image's bytes.
///
/// Persisted on every row so deletes reach the backend the object was written to,
/// even if the process has since been reconfigured.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    serde::Serialize,
    serde::Deserialize,
    utoipa::ToSchema,
)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(
    feature = "sqlx",
    sqlx(type_name = "storage_provider", rename_all = "lowercase")
)]
#[serde(rename_all = "lowercase")]
pub enum StorageProvider {
    S3,
    #[default]
    Minio,
}

impl StorageProvider {
    pub fn as_str(&self) -> &'static str {
        match self {
            StorageProvider::S3 => "s3",
            StorageProvider::Minio => "minio",
        }
    }
}

impl FromStr for StorageProvider {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "s3" => Ok(StorageProvider::S3),
            "minio" => Ok(StorageProvider::Minio),
            _ => Err(anyhow::anyhow!("Invalid storage provider: {}", s)),
        }
    }
}

impl Display for StorageProvider {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_str_is_case_insensitive() {
        assert_eq!("S3".parse::<StorageProvider>().unwrap(), StorageProvider::S3);
        assert_eq!(
            " MinIO ".parse::<StorageProvider>().unwrap(),
            StorageProvider::Minio
        );
        assert!("gcs".parse::<StorageProvider>().is_err());
    }

    #[test]
    fn test_default_is_minio() {
        assert_eq!(StorageProvider::default(), StorageProvider::Minio);
    }

    #[test]
    fn test_serde_uses_lowercase_tag() {
        let json = serde_json::to_string(&StorageProvider::S3).unwrap();
        assert_eq!(json, "\"s3\"");
        let parsed: StorageProvider = serde_json::from_str("\"minio\"").unwrap();
        assert_eq!(parsed, StorageProvider::Minio);
    }
}
