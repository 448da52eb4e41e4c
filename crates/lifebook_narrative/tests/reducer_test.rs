//! Tests for sequential chunk reduction.

mod test_utils;

use lifebook_core::{Chunk, TokenEstimator};
use lifebook_interface::PromptInputs;
use lifebook_narrative::{ChunkReducer, Chunker, FACTS_INPUT};
use test_utils::{MockChain, executor, facts};

fn three_chunks() -> Vec<Chunk> {
    // Target of 1 token forces one fact per chunk once over the threshold.
    Chunker::new(TokenEstimator::heuristic(), 1, 0).chunk(&facts(&["alpha", "beta", "gamma"]))
}

#[tokio::test]
async fn test_zero_chunks_make_no_call() {
    let chain = MockChain::success("chapter", "unused");
    let report = ChunkReducer::new(executor())
        .reduce(&[], &chain, &PromptInputs::new())
        .await
        .unwrap();

    assert_eq!(report.narrative(), "");
    assert_eq!(*report.chunks(), 0);
    assert_eq!(chain.call_count(), 0);
}

#[tokio::test]
async fn test_single_chunk_output_is_the_answer() {
    let chain = MockChain::echo("chapter", FACTS_INPUT, "story");
    let chunks = Chunker::default().chunk(&facts(&["A", "B"]));

    let report = ChunkReducer::new(executor())
        .reduce(&chunks, &chain, &PromptInputs::new().with("chapter_title", "Roots"))
        .await
        .unwrap();

    assert_eq!(report.narrative(), "story[- A\n- B]");
    assert_eq!(chain.call_count(), 1);
    assert_eq!(chain.input(0, "chapter_title").as_deref(), Some("Roots"));
}

#[tokio::test(start_paused = true)]
async fn test_single_chunk_failure_is_fatal() {
    let chain = MockChain::failing("chapter");
    let chunks = Chunker::default().chunk(&facts(&["A"]));

    let err = ChunkReducer::new(executor())
        .reduce(&chunks, &chain, &PromptInputs::new())
        .await
        .unwrap_err();

    assert!(err.is_generation_failed());
    assert_eq!(chain.call_count(), 3);
}

#[tokio::test]
async fn test_multiple_chunks_run_in_order() {
    let chain = MockChain::echo("chapter", FACTS_INPUT, "n");
    let chunks = three_chunks();
    assert_eq!(chunks.len(), 3);

    let report = ChunkReducer::new(executor())
        .reduce(&chunks, &chain, &PromptInputs::new())
        .await
        .unwrap();

    assert_eq!(
        report.narrative(),
        "n[- alpha]\n\nn[- beta]\n\nn[- gamma]"
    );
    assert_eq!(*report.soft_failures(), 0);
    let sent: Vec<_> = (0..3)
        .map(|i| chain.input(i, FACTS_INPUT).unwrap())
        .collect();
    assert_eq!(sent, vec!["- alpha", "- beta", "- gamma"]);
}

#[tokio::test(start_paused = true)]
async fn test_failed_middle_chunk_degrades_to_raw_bullets() {
    let chain = MockChain::new("chapter", |inputs, _| {
        let bullets = inputs.get(FACTS_INPUT).unwrap_or_default();
        if bullets.contains("beta") {
            Err(test_utils::mock_chain::provider_failure())
        } else {
            Ok(format!("prose about {}", bullets.trim_start_matches("- ")))
        }
    });

    let report = ChunkReducer::new(executor())
        .reduce(&three_chunks(), &chain, &PromptInputs::new())
        .await
        .unwrap();

    assert_eq!(
        report.narrative(),
        "prose about alpha\n\n- beta\n\nprose about gamma"
    );
    assert_eq!(*report.chunks(), 3);
    assert_eq!(*report.soft_failures(), 1);
    // 1 + 3 attempts for beta + 1
    assert_eq!(chain.call_count(), 5);
}
