//! Route loaders

use async_trait::async_trait;
use std::future::Future;
use thiserror::Error;

use super::Params;
use crate::api::{ApiError, Query};

/// Data produced by loaders and fetchers
pub trait LoaderData: Clone + Send + Sync + 'static {}

impl<T: Clone + Send + Sync + 'static> LoaderData for T {}

/// Arguments passed to a loader
#[derive(Debug, Clone, Default)]
pub struct LoadArgs {
    pub params: Params,
    pub query: Query,
}

impl LoadArgs {
    pub fn new(params: Params, query: Query) -> Self {
        Self { params, query }
    }

    /// Value of a path parameter
    pub fn param(&self, name: &str) -> Result<&str, LoadError> {
        self.params
            .get(name)
            .map(String::as_str)
            .ok_or_else(|| LoadError::MissingParam(name.to_string()))
    }
}

#[derive(Error, Debug)]
pub enum LoadError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("Invalid loader arguments: {0}")]
    InvalidArgs(String),

    #[error("Missing route parameter: {0}")]
    MissingParam(String),

    #[error("Load cancelled")]
    Cancelled,
}

/// Fetches the data a route needs
#[async_trait]
pub trait Loader<D>: Send + Sync {
    async fn load(&self, args: LoadArgs) -> Result<D, LoadError>;
}

/// Loader backed by an async closure
pub struct FnLoader<F>(F);

/// Wrap an async closure as a [`Loader`]
pub fn loader_fn<F>(f: F) -> FnLoader<F> {
    FnLoader(f)
}

#[async_trait]
impl<D, F, Fut> Loader<D> for FnLoader<F>
where
    D: LoaderData,
    F: Fn(LoadArgs) -> Fut + Send + Sync,
    Fut: Future<Output = Result<D, LoadError>> + Send,
{
    async fn load(&self, args: LoadArgs) -> Result<D, LoadError> {
        (self.0)(args).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fn_loader_reads_params() {
        let loader = loader_fn(|args: LoadArgs| async move {
            Ok::<_, LoadError>(format!("project {}", args.param("projectId")?))
        });
        let mut params = Params::new();
        params.insert("projectId".to_string(), "p1".to_string());

        let data = loader.load(LoadArgs::new(params, Query::new())).await.unwrap();
        assert_eq!(data, "project p1");
    }

    #[tokio::test]
    async fn test_missing_param() {
        let loader = loader_fn(|args: LoadArgs| async move {
            args.param("projectId").map(str::to_string)
        });
        let err = loader.load(LoadArgs::default()).await.unwrap_err();
        assert!(matches!(err, LoadError::MissingParam(name) if name == "projectId"));
    }
}
