//! Model selector integration tests

#[cfg(test)]
mod tests {
    use crate::assert_contains;
    use crate::common::{RequestFactory, SelectorFactory};
    use adaptive_router::core::selector::SelectionPhase;
    use adaptive_router::{FeatureExtractor, MLModelSelector, RequestOutcome};
    use std::collections::HashSet;

    #[test]
    fn test_warm_up_covers_all_models() {
        let selector = MLModelSelector::in_memory(SelectorFactory::ollama());
        let request = RequestFactory::question();

        let mut seen = HashSet::new();
        for _ in 0..selector.models().len() {
            let rec = selector.recommend_for(&request);
            assert!(seen.insert(rec.model.clone()), "{} repeated", rec.model);
        }
        assert_eq!(seen.len(), 3);
        for model in ["llama3", "mistral", "phi3"] {
            assert_contains!(seen, |m| m.as_str() == model);
        }
    }

    #[test]
    fn test_better_model_wins_majority() {
        let selector = MLModelSelector::in_memory(SelectorFactory::pair("openai", "sharp", "dull"));
        let request = RequestFactory::question();

        for _ in 0..12 {
            selector
                .update_for(&request, "sharp", &RequestOutcome::success(0.4, 0.001))
                .unwrap();
            selector
                .update_for(&request, "dull", &RequestOutcome::failure(12.0))
                .unwrap();
        }

        let wins = (0..10)
            .filter(|_| selector.recommend_for(&request).model == "sharp")
            .count();
        assert!(wins > 5, "sharp chosen {} of 10", wins);
    }

    #[test]
    fn test_learning_stays_within_feature_key() {
        let selector = MLModelSelector::in_memory(SelectorFactory::pair("openai", "a", "b"));
        let question = RequestFactory::question();
        for _ in 0..5 {
            selector
                .update_for(&question, "a", &RequestOutcome::success(0.4, 0.0))
                .unwrap();
            selector
                .update_for(&question, "b", &RequestOutcome::success(0.4, 0.0))
                .unwrap();
        }

        assert_eq!(
            selector.recommend_for(&question).phase,
            SelectionPhase::Exploit
        );
        assert_eq!(
            selector.recommend_for(&RequestFactory::code()).phase,
            SelectionPhase::WarmUp
        );
    }

    #[test]
    fn test_feature_examples() {
        let extractor = FeatureExtractor::default();
        let key = |prompt: &str| extractor.extract_features(prompt, None).feature_key();

        assert!(key("def f(): pass").starts_with("code_"));
        assert!(key("Please summarize this article").starts_with("summarization_"));
        assert!(key("What is the capital of France?").starts_with("question_answer_"));
        assert!(key("").starts_with("generic_"));
    }
}
