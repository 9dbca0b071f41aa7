//! Backend HTTP contract.
//!
//! Every endpoint answers with a JSON envelope; anything other than
//! `success: true` is a failure regardless of the HTTP status code.

pub mod http;

use async_trait::async_trait;
use serde::Deserialize;

use crate::board::model::Target;
use crate::board::validate::NewTargetRequest;
use crate::error::BoardError;

pub use http::{ClientOptions, HttpApi};

#[derive(Clone, Debug, Default, Deserialize)]
pub struct ApiEnvelope {
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub targets: Option<Vec<Target>>,
}

/// Successful reply to a mutating call.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ActionReply {
    pub message: Option<String>,
}

impl ApiEnvelope {
    pub fn is_success(&self) -> bool {
        self.success == Some(true)
    }

    fn rejection(self) -> BoardError {
        BoardError::Application {
            message: self.error.or(self.message).filter(|m| !m.trim().is_empty()),
        }
    }

    pub fn into_reply(self) -> Result<ActionReply, BoardError> {
        if !self.is_success() {
            return Err(self.rejection());
        }
        Ok(ActionReply {
            message: self.message.filter(|m| !m.trim().is_empty()),
        })
    }

    pub fn into_targets(self) -> Result<Vec<Target>, BoardError> {
        if !self.is_success() {
            return Err(self.rejection());
        }
        Ok(self.targets.unwrap_or_default())
    }
}

#[async_trait]
pub trait TargetApi: Send + Sync {
    /// `GET /api/targets?status=<status>`
    async fn list_targets(&self, status: &str) -> Result<Vec<Target>, BoardError>;

    /// `POST /api/targets`
    async fn create_target(&self, request: &NewTargetRequest) -> Result<ActionReply, BoardError>;

    /// `DELETE /api/targets/{id}`
    async fn delete_target(&self, id: u64) -> Result<ActionReply, BoardError>;

    /// `POST /api/targets/{id}/complete`
    async fn complete_target(&self, id: u64) -> Result<ActionReply, BoardError>;

    /// `POST /delete/{filename}`
    async fn delete_image(&self, filename: &str) -> Result<ActionReply, BoardError>;
}
