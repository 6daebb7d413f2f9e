//! Currency catalogue, payment history and submission against a stub service.

use std::sync::Arc;
use std::time::Duration;

use rust_decimal_macros::dec;

use fx_payments_client::api::{ApiErrorResponse, PaymentApi, TransportError};
use fx_payments_client::config::PaginationConfig;
use fx_payments_client::notifications::{NotificationCenter, NotificationKind};
use fx_payments_client::payments::{
    Currencies, PaymentHistory, PaymentSubmitter, SubmitError, CURRENCIES_FAILURE, HISTORY_FAILURE, SUBMIT_SUCCESS,
};
use fx_payments_client::resilience::RetryPolicy;
use fx_payments_client::validation::{Field, PaymentForm};

mod common;
use common::StubApi;

fn valid_form() -> PaymentForm {
    PaymentForm {
        amount: Some(dec!(100.50)),
        currency: "EUR".into(),
        recipient: "Jane Doe".into(),
        recipient_account: "DE89 3704 0044 0532 0130 00".into(),
    }
}

fn history(api: &Arc<StubApi>, center: &NotificationCenter) -> PaymentHistory {
    let api: Arc<dyn PaymentApi> = api.clone();
    PaymentHistory::spawn(
        api,
        &PaginationConfig::default(),
        RetryPolicy::default(),
        center.clone(),
        0,
    )
}

#[tokio::test(start_paused = true)]
async fn test_currency_catalogue() {
    let api = Arc::new(StubApi::new(0));
    let currencies = Currencies::spawn(api, RetryPolicy::default(), NotificationCenter::default());
    currencies.settled().await.unwrap();

    assert_eq!(currencies.list().len(), 3);
    assert_eq!(currencies.decimals("JPY"), Some(0));
    assert_eq!(currencies.decimals("XXX"), None);
    assert_eq!(currencies.get("KWD").map(|c| c.decimals), Some(3));
    assert_eq!(currencies.format_amount(dec!(1234.5), "KWD"), "1,234.500");
    assert_eq!(currencies.format_amount(dec!(1234.5), "JPY"), "1,235");
    assert_eq!(currencies.format_amount(dec!(1234.5), "XXX"), "1,234.50");
}

#[tokio::test(start_paused = true)]
async fn test_currency_failure_notifies_and_reload_recovers() {
    let api = Arc::new(StubApi::new(0));
    {
        let mut queue = api.currencies.lock().unwrap();
        for _ in 0..3 {
            queue.push_back(Err(common::unreachable()));
        }
    }
    let center = NotificationCenter::default();
    let currencies = Currencies::spawn(api, RetryPolicy::default(), center.clone());

    let state = currencies.settled().await.unwrap();
    assert!(state.is_error());
    assert!(currencies.list().is_empty());
    let notification = center.current().unwrap();
    assert_eq!(notification.kind, NotificationKind::Error);
    assert_eq!(notification.message, CURRENCIES_FAILURE);

    currencies.reload().await.unwrap();
    assert!(!currencies.settled().await.unwrap().is_error());
    assert_eq!(currencies.list().len(), 3);
}

#[tokio::test(start_paused = true)]
async fn test_history_navigation() {
    let api = Arc::new(StubApi::new(45));
    let history = history(&api, &NotificationCenter::default());
    history.settled().await.unwrap();

    let pagination = history.pagination();
    assert_eq!(pagination.total_pages, 3);
    assert!(pagination.is_first());
    assert_eq!((pagination.showing_from(), pagination.showing_to()), (1, 20));
    assert_eq!(history.payments().len(), 20);
    assert_eq!(history.visible_pages(), vec![0, 1, 2]);

    assert!(history.go_to_page(2).await.unwrap().is_some());
    history.settled().await.unwrap();
    let pagination = history.pagination();
    assert_eq!(history.current_page(), 2);
    assert!(pagination.is_last());
    assert_eq!((pagination.showing_from(), pagination.showing_to()), (41, 45));
    assert_eq!(history.payments().len(), 5);

    // Same page, past the end, and next from the last page are ignored.
    assert_eq!(history.go_to_page(2).await.unwrap(), None);
    assert_eq!(history.go_to_page(3).await.unwrap(), None);
    assert_eq!(history.next_page().await.unwrap(), None);

    assert!(history.previous_page().await.unwrap().is_some());
    history.settled().await.unwrap();
    assert_eq!(history.current_page(), 1);

    assert_eq!(api.requested_pages(), vec![0, 2, 1]);
}

#[tokio::test(start_paused = true)]
async fn test_history_failure_and_retry() {
    let api = Arc::new(StubApi::new(10));
    api.fail_pages(3);
    let center = NotificationCenter::default();
    let history = history(&api, &center);

    assert!(history.settled().await.unwrap().is_error());
    assert_eq!(center.current().map(|n| n.message), Some(HISTORY_FAILURE.to_string()));

    api.set_page_latency(10);
    history.retry_load().await.unwrap();
    assert!(history.is_loading());
    assert!(!history.is_error());
    let state = history.settled().await.unwrap();
    assert!(!state.is_error());
    assert_eq!(state.data.content.len(), 10);
    assert_eq!(api.requested_pages(), vec![0, 0, 0, 0]);
}

#[tokio::test(start_paused = true)]
async fn test_submit_success_rotates_key_and_resets_history() {
    let api = Arc::new(StubApi::new(45));
    let center = NotificationCenter::default();
    let history = history(&api, &center);
    let submitter = PaymentSubmitter::new(api.clone(), center.clone());
    let follower = history.follow_created(submitter.subscribe_created());

    history.settled().await.unwrap();
    history.go_to_page(2).await.unwrap();
    let before = history.settled().await.unwrap().generation();

    let first_key = submitter.idempotency_key();
    let payment = submitter.submit(&valid_form(), Some(2)).await.unwrap();
    assert_eq!(payment.currency, "EUR");
    assert_ne!(submitter.idempotency_key(), first_key);
    assert!(!submitter.is_submitting());
    assert_eq!(center.current().map(|n| n.message), Some(SUBMIT_SUCCESS.to_string()));

    let submissions = api.submissions.lock().unwrap().clone();
    assert_eq!(submissions.len(), 1);
    assert_eq!(submissions[0].0.recipient_account, "DE89370400440532013000");
    assert_eq!(submissions[0].1, first_key);

    let mut states = history.loader().subscribe();
    states
        .wait_for(|s| s.generation() > before && !s.is_loading())
        .await
        .unwrap();
    assert_eq!(history.current_page(), 0);
    assert_eq!(api.requested_pages().last(), Some(&0));

    // Success notifications dismiss themselves.
    tokio::time::sleep(Duration::from_millis(5000)).await;
    common::settle().await;
    assert_eq!(center.current(), None);

    drop(submitter);
    follower.await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_failed_submit_keeps_key() {
    let api = Arc::new(StubApi::new(0));
    let conflict = ApiErrorResponse {
        timestamp: None,
        status: 409,
        errors: vec!["Duplicate payment".into()],
    };
    api.created
        .lock()
        .unwrap()
        .push_back(Err(TransportError::status("/api/v1/payments", 409, Some(conflict))));

    let center = NotificationCenter::default();
    let submitter = PaymentSubmitter::new(api.clone(), center.clone());

    let err = submitter.submit(&valid_form(), Some(2)).await.unwrap_err();
    assert!(matches!(err, SubmitError::Transport(ref e) if e.status_code() == Some(409)));
    let notification = center.current().unwrap();
    assert_eq!(notification.kind, NotificationKind::Error);
    assert_eq!(notification.message, "Duplicate payment");

    // Resubmitting reuses the key so the service can deduplicate.
    submitter.submit(&valid_form(), Some(2)).await.unwrap();
    let keys = api.keys();
    assert_eq!(keys.len(), 2);
    assert_eq!(keys[0], keys[1]);
}

#[tokio::test]
async fn test_invalid_form_is_not_sent() {
    let api = Arc::new(StubApi::new(0));
    let center = NotificationCenter::default();
    let submitter = PaymentSubmitter::new(api.clone(), center.clone());

    let form = PaymentForm {
        amount: Some(dec!(0.5)),
        recipient_account: "DE00370400440532013000".into(),
        ..valid_form()
    };
    let errors = match submitter.submit(&form, Some(0)).await {
        Err(SubmitError::Invalid(errors)) => errors,
        other => panic!("expected validation errors, got {other:?}"),
    };
    let fields: Vec<Field> = errors.iter().map(|e| e.field()).collect();
    assert_eq!(fields, vec![Field::Amount, Field::RecipientAccount]);

    assert!(api.keys().is_empty());
    assert_eq!(center.current(), None);
}
