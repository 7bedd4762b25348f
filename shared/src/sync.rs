//! Wire protocol with the maintenance server.
//!
//! Every request is a JSON `POST` and every response is plain text: `"OK"`
//! on success, anything else is an error message for the user. The
//! [`SyncTransport`] trait is the seam between this protocol and whatever
//! actually moves bytes (gloo-net in the browser, an in-memory double in
//! tests).

use async_trait::async_trait;
use serde_json::Value;

use crate::error::SyncError;
use crate::forms::FormSubmission;
use crate::{CategoryId, ItemId, ItemPayload};

/// Body the server sends back on success
pub const OK_RESPONSE: &str = "OK";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    /// Batch save of every dirty item
    Batch,
    UpdateItem,
    DeleteItem,
    DeleteCategory,
    /// Create form action URL
    Form(String),
}

impl Endpoint {
    pub fn path(&self) -> &str {
        match self {
            Endpoint::Batch => "",
            Endpoint::UpdateItem => "update/item",
            Endpoint::DeleteItem => "delete/item",
            Endpoint::DeleteCategory => "delete/category",
            Endpoint::Form(action) => action,
        }
    }
}

/// A request ready to be posted
#[derive(Debug, Clone, PartialEq)]
pub struct SyncRequest {
    pub endpoint: Endpoint,
    pub body: Value,
}

impl SyncRequest {
    pub fn batch(payloads: &[ItemPayload]) -> Result<Self, SyncError> {
        Ok(Self {
            endpoint: Endpoint::Batch,
            body: serde_json::to_value(payloads)?,
        })
    }

    pub fn update_item(payload: &ItemPayload) -> Result<Self, SyncError> {
        Ok(Self {
            endpoint: Endpoint::UpdateItem,
            body: serde_json::to_value(payload)?,
        })
    }

    pub fn delete_item(id: ItemId) -> Self {
        Self {
            endpoint: Endpoint::DeleteItem,
            body: Value::from(id),
        }
    }

    pub fn delete_category(id: CategoryId) -> Self {
        Self {
            endpoint: Endpoint::DeleteCategory,
            body: Value::from(id),
        }
    }

    pub fn form(form: &FormSubmission) -> Self {
        Self {
            endpoint: Endpoint::Form(form.action.clone()),
            body: form.to_body(),
        }
    }
}

/// Interpret a plain-text server response
pub fn interpret_response(text: &str) -> Result<(), SyncError> {
    if text.trim() == OK_RESPONSE {
        Ok(())
    } else {
        Err(SyncError::Rejected(text.to_string()))
    }
}

/// Moves a JSON body to an endpoint path and returns the response text
#[async_trait(?Send)]
pub trait SyncTransport {
    async fn post_json(&self, path: &str, body: &Value) -> Result<String, SyncError>;
}

/// Sends tracker changes and applies the "OK" response contract
#[derive(Debug, Clone)]
pub struct SyncClient<T> {
    transport: T,
}

impl<T: SyncTransport> SyncClient<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub async fn send(&self, request: &SyncRequest) -> Result<(), SyncError> {
        let path = request.endpoint.path();
        let result = match self.transport.post_json(path, &request.body).await {
            Ok(text) => interpret_response(&text),
            Err(e) => Err(e),
        };

        match &result {
            Ok(()) => tracing::info!(endpoint = path, "sync accepted"),
            Err(e) => tracing::warn!(endpoint = path, error = %e, "sync failed"),
        }
        result
    }

    /// Post every payload in one request
    pub async fn send_batch(&self, payloads: &[ItemPayload]) -> Result<(), SyncError> {
        self.send(&SyncRequest::batch(payloads)?).await
    }

    /// Post a single update or delete straight away
    pub async fn send_immediate(&self, request: &SyncRequest) -> Result<(), SyncError> {
        self.send(request).await
    }

    pub async fn submit_form(&self, form: &FormSubmission) -> Result<(), SyncError> {
        self.send(&SyncRequest::form(form)).await
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::cell::RefCell;
    use std::collections::VecDeque;

    use super::*;

    /// Records requests and replays canned responses
    #[derive(Default)]
    pub struct RecordingTransport {
        pub sent: RefCell<Vec<(String, Value)>>,
        pub replies: RefCell<VecDeque<Result<String, SyncError>>>,
    }

    impl RecordingTransport {
        pub fn replying(replies: Vec<Result<String, SyncError>>) -> Self {
            Self {
                sent: RefCell::new(Vec::new()),
                replies: RefCell::new(replies.into()),
            }
        }
    }

    #[async_trait(?Send)]
    impl SyncTransport for RecordingTransport {
        async fn post_json(&self, path: &str, body: &Value) -> Result<String, SyncError> {
            self.sent.borrow_mut().push((path.to_string(), body.clone()));
            self.replies
                .borrow_mut()
                .pop_front()
                .unwrap_or_else(|| Ok(OK_RESPONSE.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::RecordingTransport;
    use super::*;
    use crate::{ItemDetails, Status};
    use serde_json::json;

    fn payload(id: ItemId) -> ItemPayload {
        ItemPayload {
            id,
            title: format!("Item {}", id),
            category_id: 1,
            details: ItemDetails {
                status: Status::Ok,
                status_description: "OK".to_string(),
                cost: 100,
                note: String::new(),
                visible: true,
                removed: false,
            },
        }
    }

    #[test]
    fn test_interpret_response() {
        assert_eq!(interpret_response("OK"), Ok(()));
        assert_eq!(interpret_response("OK\n"), Ok(()));
        assert_eq!(
            interpret_response("Invalid category"),
            Err(SyncError::Rejected("Invalid category".to_string()))
        );
        assert!(interpret_response("ok").is_err());
    }

    #[test]
    fn test_delete_bodies_are_bare_ids() {
        assert_eq!(SyncRequest::delete_item(12).body, json!(12));
        assert_eq!(SyncRequest::delete_category(3).endpoint, Endpoint::DeleteCategory);
    }

    #[tokio::test]
    async fn test_send_batch_posts_array_to_root() {
        let client = SyncClient::new(RecordingTransport::default());
        client.send_batch(&[payload(1), payload(2)]).await.unwrap();

        let sent = client.transport().sent.borrow();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].0, "");
        assert_eq!(sent[0].1.as_array().map(Vec::len), Some(2));
        assert_eq!(sent[0].1[0]["details"]["cost"], json!(100));
    }

    #[tokio::test]
    async fn test_rejection_text_is_returned_verbatim() {
        let client = SyncClient::new(RecordingTransport::replying(vec![Ok(
            "Invalid category".to_string(),
        )]));
        let err = client.send_batch(&[payload(1)]).await.unwrap_err();
        assert_eq!(err.to_string(), "Invalid category");
    }

    #[tokio::test]
    async fn test_transport_failure_is_propagated() {
        let client = SyncClient::new(RecordingTransport::replying(vec![Err(
            SyncError::Transport("offline".to_string()),
        )]));
        let err = client
            .send_immediate(&SyncRequest::delete_item(4))
            .await
            .unwrap_err();
        assert_eq!(err, SyncError::Transport("offline".to_string()));
        assert_eq!(client.transport().sent.borrow()[0].0, "delete/item");
    }

    #[tokio::test]
    async fn test_submit_form_posts_to_action() {
        let client = SyncClient::new(RecordingTransport::default());
        let form = FormSubmission::new("create/category").field("title", "Yard");
        client.submit_form(&form).await.unwrap();

        let sent = client.transport().sent.borrow();
        assert_eq!(sent[0].0, "create/category");
        assert_eq!(sent[0].1, json!({ "title": "Yard", "removed": false }));
    }
}
