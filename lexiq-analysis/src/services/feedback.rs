//! Feedback collection

use chrono::Utc;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use lexiq_common::{InMemoryStore, Store};

use crate::models::{Feedback, FeedbackData, FeedbackReceipt};

pub struct FeedbackService {
    store: Arc<dyn Store<String, Feedback>>,
}

impl Default for FeedbackService {
    fn default() -> Self {
        Self::new(Arc::new(InMemoryStore::new()))
    }
}

impl FeedbackService {
    pub fn new(store: Arc<dyn Store<String, Feedback>>) -> Self {
        Self { store }
    }

    /// Store feedback; anonymous submissions drop the user id
    pub fn submit(&self, user_id: &str, data: FeedbackData) -> FeedbackReceipt {
        let feedback_id = Uuid::new_v4().to_string();
        let user_id = (!data.anonymous).then(|| user_id.to_string());

        info!(
            feedback_id = %feedback_id,
            feedback_type = %data.feedback_type,
            "Feedback received"
        );

        self.store.put(
            feedback_id.clone(),
            Feedback {
                feedback_id: feedback_id.clone(),
                user_id,
                data,
                created_at: Utc::now(),
                status: "received".to_string(),
                response: None,
            },
        );

        FeedbackReceipt {
            feedback_id,
            status: "received".to_string(),
            message: "Thank you for your feedback!".to_string(),
        }
    }

    /// Non-anonymous feedback submitted by a user, oldest first
    pub fn list_for_user(&self, user_id: &str) -> Vec<Feedback> {
        let mut items: Vec<Feedback> = self
            .store
            .values()
            .into_iter()
            .filter(|f| f.user_id.as_deref() == Some(user_id))
            .collect();
        items.sort_by_key(|f| f.created_at);
        items
    }
}
