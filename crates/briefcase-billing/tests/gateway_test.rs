use briefcase_billing::{BillingError, BillingGateway, CheckoutConfig, StatusMirror, StripeClient};
use mockito::{Matcher, Server};
use std::sync::Arc;

fn gateway_for(server: &Server) -> BillingGateway {
    let stripe = StripeClient::new("sk_test_123", Some(server.url())).unwrap();
    BillingGateway::new(
        Arc::new(stripe),
        CheckoutConfig {
            price_id: "price_pro".to_string(),
            success_url: "https://briefcase.test/success?session_id={CHECKOUT_SESSION_ID}".to_string(),
            cancel_url: "https://briefcase.test/pricing".to_string(),
        },
    )
}

fn session_json(status: &str, payment_status: &str, subscription: Option<&str>) -> String {
    serde_json::json!({
        "id": "cs_test_1",
        "object": "checkout.session",
        "url": "https://checkout.stripe.com/c/pay/cs_test_1",
        "status": status,
        "payment_status": payment_status,
        "subscription": subscription,
        "client_reference_id": "user-1"
    })
    .to_string()
}

#[tokio::test]
async fn test_subscription_round_trip() {
    let mut server = Server::new_async().await;
    let create = server
        .mock("POST", "/checkout/sessions")
        .match_header("authorization", "Bearer sk_test_123")
        .match_body(Matcher::AllOf(vec![
            Matcher::UrlEncoded("mode".to_string(), "subscription".to_string()),
            Matcher::UrlEncoded("line_items[0][price]".to_string(), "price_pro".to_string()),
            Matcher::UrlEncoded("client_reference_id".to_string(), "user-1".to_string()),
        ]))
        .with_status(200)
        .with_body(session_json("open", "unpaid", None))
        .create_async()
        .await;
    let unpaid = server
        .mock("GET", "/checkout/sessions/cs_test_1")
        .with_status(200)
        .with_body(session_json("open", "unpaid", None))
        .create_async()
        .await;

    let gateway = gateway_for(&server);
    let mirror = StatusMirror::new();

    let session = gateway.create_checkout("user-1", None).await.unwrap();
    create.assert_async().await;
    assert_eq!(session.url.as_deref(), Some("https://checkout.stripe.com/c/pay/cs_test_1"));
    mirror.begin_checkout(&session.id).unwrap();

    let status = mirror.refresh(&gateway).await.unwrap();
    assert!(!status.is_subscribed);
    assert!(!mirror.is_subscribed());

    unpaid.remove_async().await;
    let _paid = server
        .mock("GET", "/checkout/sessions/cs_test_1")
        .with_status(200)
        .with_body(session_json("complete", "paid", Some("sub_1")))
        .create_async()
        .await;

    let status = mirror.refresh(&gateway).await.unwrap();
    assert!(status.is_subscribed);
    assert_eq!(status.subscription_id.as_deref(), Some("sub_1"));
    assert!(mirror.is_subscribed());
}

#[tokio::test]
async fn test_cancel_checks_session_owner() {
    let mut server = Server::new_async().await;
    let _session = server
        .mock("GET", "/checkout/sessions/cs_test_1")
        .with_status(200)
        .with_body(session_json("complete", "paid", Some("sub_1")))
        .create_async()
        .await;
    let cancel = server
        .mock("DELETE", "/subscriptions/sub_1")
        .with_status(200)
        .with_body(r#"{"id":"sub_1","status":"canceled"}"#)
        .expect(1)
        .create_async()
        .await;

    let gateway = gateway_for(&server);

    let err = gateway.cancel("cs_test_1", "someone-else").await.unwrap_err();
    assert!(matches!(err, BillingError::SessionOwnership(_)));

    let subscription = gateway.cancel("cs_test_1", "user-1").await.unwrap();
    assert_eq!(subscription.status, "canceled");
    cancel.assert_async().await;
}

#[tokio::test]
async fn test_cancel_without_subscription() {
    let mut server = Server::new_async().await;
    let _session = server
        .mock("GET", "/checkout/sessions/cs_test_1")
        .with_status(200)
        .with_body(session_json("open", "unpaid", None))
        .create_async()
        .await;

    let err = gateway_for(&server).cancel("cs_test_1", "user-1").await.unwrap_err();
    assert!(matches!(err, BillingError::NoSubscription(_)));
}

#[tokio::test]
async fn test_processor_error_message_is_surfaced() {
    let mut server = Server::new_async().await;
    let _session = server
        .mock("GET", "/checkout/sessions/cs_missing")
        .with_status(404)
        .with_body(r#"{"error":{"message":"No such checkout.session: 'cs_missing'","type":"invalid_request_error"}}"#)
        .create_async()
        .await;

    let err = gateway_for(&server).verify("cs_missing").await.unwrap_err();
    match err {
        BillingError::Processor { status, message } => {
            assert_eq!(status, 404);
            assert!(message.contains("No such checkout.session"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_mirror_without_session_reports_unsubscribed() {
    let server = Server::new_async().await;
    let status = StatusMirror::new().refresh(&gateway_for(&server)).await.unwrap();
    assert!(!status.is_subscribed);
}

#[tokio::test]
async fn test_verify_for_requires_session_owner() {
    let mut server = Server::new_async().await;
    let _paid = server
        .mock("GET", "/checkout/sessions/cs_test_1")
        .with_status(200)
        .with_body(session_json("complete", "paid", Some("sub_1")))
        .create_async()
        .await;

    let gateway = gateway_for(&server);

    let err = gateway.verify_for("cs_test_1", "user-2").await.unwrap_err();
    assert!(matches!(err, BillingError::SessionOwnership(_)));

    let status = gateway.verify_for("cs_test_1", "user-1").await.unwrap();
    assert!(status.is_subscribed);
    assert_eq!(status.subscription_id.as_deref(), Some("sub_1"));
}
