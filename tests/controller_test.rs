//! Chat controller tests against a mocked advisory server.

use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use shopscout::classify::QuestionStyle;
use shopscout::controller::{AdvisoryClient, ChatController, SubmitOutcome};
use shopscout::types::MessageKind;

fn advisory_reply(content: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "choices": [{ "message": { "content": content, "role": "assistant" } }]
    }))
}

async fn controller(server: &MockServer) -> ChatController {
    ChatController::new(
        AdvisoryClient::new(server.uri()),
        "en",
        QuestionStyle::SplitSentences,
    )
}

#[test_log::test(tokio::test)]
async fn test_submit_appends_user_then_assistant_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat"))
        .and(body_partial_json(json!({
            "messages": [{ "role": "user", "content": "I need a laptop" }],
            "language": "en"
        })))
        .respond_with(advisory_reply("What country are you in?"))
        .expect(1)
        .mount(&server)
        .await;

    let mut controller = controller(&server).await;
    let outcome = controller.submit("I need a laptop").await;

    assert_eq!(outcome, SubmitOutcome::Submitted);
    let messages = controller.messages();
    assert_eq!(messages.len(), 2);
    assert!(messages[0].is_outgoing);
    assert_eq!(messages[0].content, "I need a laptop");
    assert!(!messages[1].is_outgoing);
    assert_eq!(messages[1].kind, MessageKind::Question);
    assert_eq!(messages[1].content, "What country are you in?");
    assert!(!controller.is_loading());
}

#[test_log::test(tokio::test)]
async fn test_blank_submit_is_a_no_op() {
    let server = MockServer::start().await;
    let mut controller = controller(&server).await;
    assert_eq!(controller.submit("   ").await, SubmitOutcome::Ignored);
    assert!(controller.messages().is_empty());
    assert_eq!(server.received_requests().await.unwrap().len(), 0);
}

#[test_log::test(tokio::test)]
async fn test_server_error_leaves_conversation_intact() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat"))
        .respond_with(
            ResponseTemplate::new(500).set_body_json(json!({ "error": "Gemini API key not configured" })),
        )
        .mount(&server)
        .await;

    let mut controller = controller(&server).await;
    controller.submit("hello").await;
    let before = controller.messages().to_vec();

    let outcome = controller.submit("hello again").await;
    match outcome {
        SubmitOutcome::Failed(reason) => assert!(reason.contains("500")),
        other => panic!("expected failure, got {other:?}"),
    }

    let messages = controller.messages();
    // Both failed submits keep only the user's own messages.
    assert_eq!(messages.len(), before.len() + 1);
    assert!(messages.iter().all(|message| message.is_outgoing));
    assert!(!controller.is_loading());
}

#[test_log::test(tokio::test)]
async fn test_reply_missing_content_path_is_a_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "choices": [] })))
        .mount(&server)
        .await;

    let mut controller = controller(&server).await;
    let outcome = controller.submit("hello").await;
    assert!(matches!(outcome, SubmitOutcome::Failed(_)));
    assert_eq!(controller.messages().len(), 1);
}

#[test_log::test(tokio::test)]
async fn test_envelope_reply_becomes_a_product_message() {
    let envelope = json!({
        "type": "product_recommendations",
        "analysis": "You need a portable laptop under $1000.",
        "country": "USA",
        "options": [{
            "name": "Laptop X",
            "price": 899.99,
            "imageUrl": "https://images.unsplash.com/photo-1488590528505-98d2b5aba04b",
            "features": ["13 inch"],
            "matchReason": "Fits the budget",
            "shoppingLinks": [
                "https://www.amazon.com/s?k=Laptop%20X",
                "https://www.bestbuy.com/site/searchpage.jsp?st=Laptop%20X"
            ]
        }],
        "topRecommendation": { "optionIndex": 0, "reason": "Best value" }
    })
    .to_string();

    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat"))
        .respond_with(advisory_reply(&envelope))
        .mount(&server)
        .await;

    let mut controller = controller(&server).await;
    let outcome = controller.submit("I need a laptop under $1000 in the USA").await;
    assert_eq!(outcome, SubmitOutcome::Submitted);

    let messages = controller.messages();
    assert_eq!(messages.len(), 3);
    assert_eq!(messages[1].kind, MessageKind::Text);
    assert_eq!(messages[1].content, "You need a portable laptop under $1000.");
    assert_eq!(messages[2].kind, MessageKind::Product);
    let product = messages[2].product.as_ref().unwrap();
    assert_eq!(product.name, "Laptop X");
    assert_eq!(product.price, 899.99);
    assert_eq!(product.description, "You need a portable laptop under $1000.");
    let links = product.shopping_links.as_ref().unwrap();
    assert!(links.iter().any(|link| link.contains("amazon.com")));
    assert!(links.iter().any(|link| link.contains("bestbuy.com")));
}

#[test_log::test(tokio::test)]
async fn test_second_round_sends_full_transcript() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat"))
        .respond_with(advisory_reply("What country are you in?"))
        .up_to_n_times(1)
        .mount(&server)
        .await;

    let mut controller = controller(&server).await;
    controller.submit("I need a laptop").await;

    let full = Mock::given(method("POST"))
        .and(path("/chat"))
        .and(body_partial_json(json!({
            "messages": [
                { "role": "user", "content": "I need a laptop" },
                { "role": "assistant", "content": "What country are you in?" },
                { "role": "user", "content": "USA" }
            ]
        })))
        .respond_with(advisory_reply("And your budget?"))
        .expect(1);
    server.register(full).await;

    let outcome = controller.submit("USA").await;
    assert_eq!(outcome, SubmitOutcome::Submitted);
}
