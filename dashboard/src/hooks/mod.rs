pub mod use_api;

pub use use_api::{
    ApiConfig, ApiHandle, ApiState, CURSOR_PARAM, Endpoint, FetchError,
    FetchOptions, use_api, use_api_with_merge,
};

/// Distinguishes "never resolved" from "resolved to an empty value".
#[derive(Debug, Clone, PartialEq, Default)]
pub enum FetchState<T> {
    #[default]
    NotFetched,
    Fetched(T),
}

impl<T> FetchState<T> {
    pub fn is_fetched(&self) -> bool {
        matches!(self, Self::Fetched(_))
    }

    pub fn as_ref(&self) -> Option<&T> {
        match self {
            Self::NotFetched => None,
            Self::Fetched(value) => Some(value),
        }
    }
}
