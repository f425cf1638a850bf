//! Request feature extraction
//!
//! Buckets a prompt into a coarse `category_complexity` key. Statistics are
//! kept per key so that, for example, short questions and long code reviews
//! never share bandit arms.

use crate::config::FeatureConfig;
use crate::utils::error::{Result, RouterError};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::warn;

/// Compile a built-in pattern; an invalid pattern degrades to one that never matches
fn pattern(source: &str) -> Regex {
    Regex::new(source).unwrap_or_else(|e| {
        tracing::error!("Failed to compile feature regex: {}", e);
        // [^\s\S] matches "neither whitespace nor non-whitespace" = empty set
        Regex::new(r"[^\s\S]").unwrap()
    })
}

static CODE_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        // Python-style definitions
        r"(?m)^\s*(async\s+)?(def|class)\s+\w+",
        // JavaScript / Rust / Go style functions
        r"\bfunction\s*\w*\s*\(",
        r"\b(fn|func)\s+\w+\s*[(<]",
        // Imports: `import a.b, c;`, `import numpy as np`, `import { x } from "y"`, `import "y";`
        r"(?m)^\s*import\s+(\w+(\.\w+)*(\s*,\s*\w+(\.\w+)*)*\s*;?|\w+(\.\w+)*\s+as\s+\w+|[\w*{}, ]+\s+from\s+['\x22][^'\x22]+['\x22]\s*;?|['\x22][^'\x22]+['\x22]\s*;?)\s*$",
        r"(?m)^\s*from\s+[\w.]+\s+import\s+",
        r"(?m)^\s*#include\s*[<\x22]",
        r"(?m)^\s*(use|using)\s+[\w:.]+\s*;",
        // Markup
        r"</[a-zA-Z][\w-]*\s*>",
        r"<[a-zA-Z][\w-]*(\s[^<>]*)?/>",
        // Fenced blocks
        r"```",
    ]
    .iter()
    .map(|p| pattern(p))
    .collect()
});

static SUMMARIZATION_KEYWORDS: Lazy<Regex> = Lazy::new(|| {
    pattern(r"(?i)\b(summari[sz]e|summari[sz]ing|summary|tl;?dr|condense|recap|key points|brief overview)\b")
});

static ANALYSIS_KEYWORDS: Lazy<Regex> = Lazy::new(|| {
    pattern(r"(?i)\b(analy[sz]e|analysis|compare|comparison|evaluate|assess|critique|pros and cons|trade-?offs?|diagnose|investigate)\b")
});

static CREATIVE_KEYWORDS: Lazy<Regex> = Lazy::new(|| {
    pattern(r"(?i)\b(story|poem|poetry|haiku|lyrics|song|creative|imagine|brainstorm|fiction|invent|compose|slogan)\b")
});

static QUESTION_LEAD_IN: Lazy<Regex> = Lazy::new(|| {
    pattern(r"(?i)^\s*(what|why|how|when|where|who|whom|whose|which|is|are|was|were|can|could|does|do|did|should|would|will|may)\b")
});

static COMPLEXITY_KEYWORDS: Lazy<Regex> = Lazy::new(|| {
    pattern(r"(?i)\b(architecture|architect|detailed|in[- ]depth|comprehensive|step[- ]by[- ]step|thorough(ly)?|elaborate|end[- ]to[- ]end)\b")
});

/// What kind of work a request asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskCategory {
    Code,
    Analysis,
    Creative,
    Summarization,
    QuestionAnswer,
    Generic,
}

impl TaskCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskCategory::Code => "code",
            TaskCategory::Analysis => "analysis",
            TaskCategory::Creative => "creative",
            TaskCategory::Summarization => "summarization",
            TaskCategory::QuestionAnswer => "question_answer",
            TaskCategory::Generic => "generic",
        }
    }
}

impl fmt::Display for TaskCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rough effort estimate for a request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Complexity {
    Simple,
    Medium,
    Complex,
}

impl Complexity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Complexity::Simple => "simple",
            Complexity::Medium => "medium",
            Complexity::Complex => "complex",
        }
    }
}

impl fmt::Display for Complexity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Coarse description of a request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestFeatures {
    pub category: TaskCategory,
    pub complexity: Complexity,
    /// Prompt length in characters
    pub prompt_length: usize,
    pub word_count: usize,
    pub has_code: bool,
    pub has_image: bool,
}

impl RequestFeatures {
    /// Features used when extraction fails
    pub fn fallback(has_image: bool) -> Self {
        Self {
            category: TaskCategory::Generic,
            complexity: Complexity::Medium,
            prompt_length: 0,
            word_count: 0,
            has_code: false,
            has_image,
        }
    }

    /// Partition key, `"{category}_{complexity}"`
    pub fn feature_key(&self) -> String {
        format!("{}_{}", self.category, self.complexity)
    }
}

/// Stateless prompt classifier
#[derive(Debug, Clone, Default)]
pub struct FeatureExtractor {
    config: FeatureConfig,
}

impl FeatureExtractor {
    pub fn new(config: FeatureConfig) -> Self {
        Self { config }
    }

    /// Classify a prompt, degrading to `generic_medium` on failure
    pub fn extract_features(&self, prompt: &str, image_path: Option<&str>) -> RequestFeatures {
        self.try_extract(prompt, image_path).unwrap_or_else(|e| {
            warn!("Feature extraction failed, using defaults: {}", e);
            RequestFeatures::fallback(has_image(image_path))
        })
    }

    /// Classify a prompt, reporting prompts that cannot be analysed
    pub fn try_extract(&self, prompt: &str, image_path: Option<&str>) -> Result<RequestFeatures> {
        if prompt.contains('\0') {
            return Err(RouterError::feature_extraction(
                "prompt contains NUL bytes",
            ));
        }

        let has_image = has_image(image_path);
        let word_count = prompt.split_whitespace().count();
        let has_code = detect_code(prompt, word_count);

        Ok(RequestFeatures {
            category: categorize(prompt, has_code),
            complexity: self.complexity(prompt, word_count, has_code, has_image),
            prompt_length: prompt.chars().count(),
            word_count,
            has_code,
            has_image,
        })
    }

    fn complexity(&self, prompt: &str, words: usize, has_code: bool, has_image: bool) -> Complexity {
        if words > self.config.complex_word_limit
            || (has_code && has_image)
            || COMPLEXITY_KEYWORDS.is_match(prompt)
        {
            Complexity::Complex
        } else if words <= self.config.simple_word_limit && !has_code && !has_image {
            Complexity::Simple
        } else {
            Complexity::Medium
        }
    }
}

fn has_image(image_path: Option<&str>) -> bool {
    image_path.is_some_and(|p| !p.trim().is_empty())
}

fn detect_code(prompt: &str, words: usize) -> bool {
    if CODE_PATTERNS.iter().any(|re| re.is_match(prompt)) {
        return true;
    }

    let symbols = prompt.chars().filter(|c| matches!(c, '{' | '}' | ';')).count();
    symbols >= 4 && symbols * 10 >= words
}

fn categorize(prompt: &str, has_code: bool) -> TaskCategory {
    if has_code {
        TaskCategory::Code
    } else if SUMMARIZATION_KEYWORDS.is_match(prompt) {
        TaskCategory::Summarization
    } else if ANALYSIS_KEYWORDS.is_match(prompt) {
        TaskCategory::Analysis
    } else if CREATIVE_KEYWORDS.is_match(prompt) {
        TaskCategory::Creative
    } else if QUESTION_LEAD_IN.is_match(prompt) || prompt.trim_end().ends_with('?') {
        TaskCategory::QuestionAnswer
    } else {
        TaskCategory::Generic
    }
}
