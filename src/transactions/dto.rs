use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct CreateTransactionRequest {
    pub user_id: Option<Uuid>,
    pub items: Option<Vec<OrderItemRequest>>,
}

/// One purchase line: (book, quantity).
#[derive(Debug, Clone, Deserialize)]
pub struct OrderItemRequest {
    pub book_id: Uuid,
    pub quantity: i32,
}

#[derive(Debug, Serialize)]
pub struct CheckoutResponse {
    pub transaction_id: Uuid,
    pub total_quantity: i64,
    pub total_price: i64,
}

#[derive(Debug, Serialize)]
pub struct TransactionSummary {
    pub id: Uuid,
    pub total_quantity: i64,
    pub total_price: i64,
}

#[derive(Debug, Serialize)]
pub struct TransactionLineItem {
    pub book_id: Uuid,
    pub book_title: String,
    pub quantity: i32,
    pub subtotal_price: i64,
}

#[derive(Debug, Serialize)]
pub struct TransactionDetail {
    pub id: Uuid,
    pub items: Vec<TransactionLineItem>,
    pub total_quantity: i64,
    pub total_price: i64,
}

#[derive(Debug, Serialize)]
pub struct StatisticsResponse {
    pub total_transactions: i64,
    pub average_transaction_amount: i64,
    pub most_book_sales_genre: String,
    pub fewest_book_sales_genre: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_request_tolerates_missing_parts() {
        let req: CreateTransactionRequest = serde_json::from_str("{}").unwrap();
        assert!(req.user_id.is_none());
        assert!(req.items.is_none());
    }

    #[test]
    fn item_request_requires_both_fields() {
        assert!(serde_json::from_str::<OrderItemRequest>(
            r#"{"book_id":"4b4a6e4e-7d44-4f52-9e68-dd98a0b3a1b2"}"#
        )
        .is_err());
    }
}
