use example_web::db::{current_txn_policy, TxnPolicy};
use example_web::repos::examples::ExampleInput;
use example_web::AppError;
use web_test_support::unique_str;

use crate::support::build_test_state;

fn input(name: &str) -> ExampleInput {
    serde_json::from_value(serde_json::json!({ "name": name })).unwrap()
}

#[tokio::test]
async fn ok_commits() {
    assert_eq!(current_txn_policy(), TxnPolicy::CommitOnOk);
    let state = build_test_state().await;
    let repo = state.examples.clone();
    let name = unique_str("kept");
    let to_create = input(&name);

    let created = state
        .txn
        .with_txn(move |txn| Box::pin(async move { repo.create(txn, to_create).await }))
        .await
        .unwrap();

    let found = state.examples.find(state.db(), created.id).await.unwrap();
    assert_eq!(found.map(|e| e.name), Some(name));
}

#[tokio::test]
async fn err_rolls_back_and_keeps_the_error() {
    let state = build_test_state().await;
    let repo = state.examples.clone();

    let err = state
        .txn
        .with_txn(move |txn| {
            Box::pin(async move {
                repo.create(txn, input("discarded")).await?;
                Err::<(), _>(AppError::internal("boom after write"))
            })
        })
        .await
        .unwrap_err();
    assert!(err.to_string().contains("boom after write"));

    assert_eq!(state.examples.count(state.db()).await.unwrap(), 3);
}

#[tokio::test]
async fn value_flows_out_of_the_transaction() {
    let state = build_test_state().await;
    let repo = state.examples.clone();

    let names = state
        .txn
        .with_txn(move |txn| {
            Box::pin(async move {
                let all = repo.list(txn).await?;
                Ok(all.into_iter().map(|e| e.name).collect::<Vec<_>>())
            })
        })
        .await
        .unwrap();
    assert_eq!(names, vec!["alpha", "beta", "gamma"]);
}
