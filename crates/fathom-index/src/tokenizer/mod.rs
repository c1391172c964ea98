//! Multilingual tokenization for English, Chinese, and mixed text.
//!
//! Language detection classifies code points as ASCII-alphabetic or CJK
//! (Unified Ideographs block) and routes the text to the matching path.
//! Chinese segmentation is longest-match against a small curated
//! dictionary; English is whitespace/punctuation splitting with length
//! bounds and stopword filtering.

mod dictionary;
mod stopwords;

use std::collections::{HashMap, HashSet};

use fathom_core::config::TokenizerConfig;

/// Text language, detected or hinted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    Auto,
    English,
    Chinese,
    Mixed,
}

impl Language {
    /// Map a chunk's language hint onto a tokenization path. Unknown or
    /// empty hints mean auto-detection.
    pub fn from_hint(hint: &str) -> Self {
        match hint {
            "zh" => Self::Chinese,
            "en" => Self::English,
            _ => Self::Auto,
        }
    }
}

/// CJK Unified Ideographs block.
fn is_cjk(c: char) -> bool {
    ('\u{4E00}'..='\u{9FFF}').contains(&c)
}

/// Deterministic tokenizer shared by the BM25 index and query paths.
pub struct Tokenizer {
    config: TokenizerConfig,
    english_stopwords: HashSet<String>,
    chinese_stopwords: HashSet<String>,
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self::new(TokenizerConfig::default())
    }
}

impl Tokenizer {
    pub fn new(config: TokenizerConfig) -> Self {
        Self {
            config,
            english_stopwords: stopwords::ENGLISH.iter().map(|s| s.to_string()).collect(),
            chinese_stopwords: stopwords::CHINESE.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Classify a text by scanning its code points.
    ///
    /// Rules, in order: chinese > 0.3 and english > 0.1 → Mixed;
    /// chinese > 0.3 → Chinese; english > 0.3 → English; else Mixed.
    pub fn detect_language(&self, text: &str) -> Language {
        let mut total = 0usize;
        let mut chinese = 0usize;
        let mut english = 0usize;
        for c in text.chars() {
            total += 1;
            if is_cjk(c) {
                chinese += 1;
            } else if c.is_ascii_alphabetic() {
                english += 1;
            }
        }
        if total == 0 {
            return Language::English;
        }

        let chinese_ratio = chinese as f64 / total as f64;
        let english_ratio = english as f64 / total as f64;
        if chinese_ratio > 0.3 {
            if english_ratio > 0.1 {
                Language::Mixed
            } else {
                Language::Chinese
            }
        } else if english_ratio > 0.3 {
            Language::English
        } else {
            Language::Mixed
        }
    }

    /// Tokenize a text. Empty input yields an empty sequence.
    pub fn tokenize(&self, text: &str, lang: Language) -> Vec<String> {
        if text.is_empty() {
            return Vec::new();
        }
        let lang = match lang {
            Language::Auto => self.detect_language(text),
            other => other,
        };
        match lang {
            Language::English => self.tokenize_english(text),
            Language::Chinese => self.tokenize_chinese(text),
            _ => self.tokenize_mixed(text),
        }
    }

    /// Tokenize a batch of texts with a shared language setting.
    pub fn tokenize_batch(&self, texts: &[String], lang: Language) -> Vec<Vec<String>> {
        texts.iter().map(|t| self.tokenize(t, lang)).collect()
    }

    /// Token → occurrence count for a single text.
    pub fn token_counts(&self, text: &str, lang: Language) -> HashMap<String, usize> {
        let mut counts = HashMap::new();
        for token in self.tokenize(text, lang) {
            *counts.entry(token).or_insert(0) += 1;
        }
        counts
    }

    /// Whitespace collapse plus the configured lowercase/punctuation
    /// passes, without splitting into tokens.
    pub fn preprocess_text(&self, text: &str) -> String {
        let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
        let lowered = if self.config.lowercase {
            collapsed.to_lowercase()
        } else {
            collapsed
        };
        if self.config.remove_punctuation {
            lowered
                .chars()
                .map(|c| if c.is_ascii_punctuation() { ' ' } else { c })
                .collect()
        } else {
            lowered
        }
    }

    pub fn add_stopwords<I, S>(&mut self, words: I, lang: Language)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let set = self.stopword_set_mut(lang);
        for word in words {
            set.insert(word.into());
        }
    }

    pub fn remove_stopwords<'a, I>(&mut self, words: I, lang: Language)
    where
        I: IntoIterator<Item = &'a str>,
    {
        let set = self.stopword_set_mut(lang);
        for word in words {
            set.remove(word);
        }
    }

    fn stopword_set_mut(&mut self, lang: Language) -> &mut HashSet<String> {
        match lang {
            Language::Chinese => &mut self.chinese_stopwords,
            _ => &mut self.english_stopwords,
        }
    }

    fn is_stopword(&self, word: &str, lang: Language) -> bool {
        if !self.config.filter_stopwords {
            return false;
        }
        match lang {
            Language::English => self.english_stopwords.contains(word),
            Language::Chinese => self.chinese_stopwords.contains(word),
            _ => self.english_stopwords.contains(word) || self.chinese_stopwords.contains(word),
        }
    }

    fn within_length_bounds(&self, token: &str) -> bool {
        let len = token.chars().count();
        len >= self.config.min_token_length && len <= self.config.max_token_length
    }

    fn tokenize_english(&self, text: &str) -> Vec<String> {
        let processed = self.preprocess_text(text);
        processed
            .split_whitespace()
            .filter(|t| self.within_length_bounds(t))
            .filter(|t| !self.is_stopword(t, Language::English))
            .map(str::to_string)
            .collect()
    }

    fn tokenize_chinese(&self, text: &str) -> Vec<String> {
        let chars: Vec<char> = text.chars().collect();
        let mut tokens: Vec<String> = Vec::new();
        // Latin alphanumerics interleaved with CJK accumulate separately
        // and are emitted on boundary transitions.
        let mut latin = String::new();
        // Unsegmented CJK run, emitted as one token unless
        // `keep_single_char` splits it.
        let mut run = String::new();

        let mut i = 0;
        while i < chars.len() {
            let c = chars[i];
            if c.is_ascii_alphanumeric() {
                if !run.is_empty() {
                    tokens.push(std::mem::take(&mut run));
                }
                latin.push(c);
                i += 1;
            } else if is_cjk(c) {
                if !latin.is_empty() {
                    self.flush_latin(&mut latin, &mut tokens);
                }
                let mut matched = 0usize;
                if self.config.enable_chinese_segmentation {
                    let longest = dictionary::MAX_WORD_CHARS.min(chars.len() - i);
                    for len in (2..=longest).rev() {
                        let candidate: String = chars[i..i + len].iter().collect();
                        if dictionary::dictionary().contains(candidate.as_str()) {
                            if !run.is_empty() {
                                tokens.push(std::mem::take(&mut run));
                            }
                            tokens.push(candidate);
                            matched = len;
                            break;
                        }
                    }
                }
                if matched > 0 {
                    i += matched;
                } else {
                    if self.config.keep_single_char {
                        if !run.is_empty() {
                            tokens.push(std::mem::take(&mut run));
                        }
                        tokens.push(c.to_string());
                    } else {
                        run.push(c);
                    }
                    i += 1;
                }
            } else {
                // Separator or other script: boundary for both accumulators.
                if !latin.is_empty() {
                    self.flush_latin(&mut latin, &mut tokens);
                }
                if !run.is_empty() {
                    tokens.push(std::mem::take(&mut run));
                }
                i += 1;
            }
        }
        if !latin.is_empty() {
            self.flush_latin(&mut latin, &mut tokens);
        }
        if !run.is_empty() {
            tokens.push(run);
        }

        tokens.retain(|t| !t.is_empty() && !self.is_stopword(t, Language::Chinese));
        tokens
    }

    fn flush_latin(&self, latin: &mut String, tokens: &mut Vec<String>) {
        if latin.chars().count() >= self.config.min_token_length {
            tokens.push(std::mem::take(latin));
        } else {
            latin.clear();
        }
    }

    fn tokenize_mixed(&self, text: &str) -> Vec<String> {
        let mut tokens = Vec::new();
        let mut segment = String::new();
        let mut current = Language::English;

        for c in text.chars() {
            if c.is_ascii() {
                if current == Language::Chinese && !segment.is_empty() {
                    tokens.extend(self.tokenize_chinese(&segment));
                    segment.clear();
                }
                current = Language::English;
                segment.push(c);
            } else if is_cjk(c) {
                if current == Language::English && !segment.is_empty() {
                    tokens.extend(self.tokenize_english(&segment));
                    segment.clear();
                }
                current = Language::Chinese;
                segment.push(c);
            }
            // Code points outside both classes are dropped.
        }
        if !segment.is_empty() {
            match current {
                Language::Chinese => tokens.extend(self.tokenize_chinese(&segment)),
                _ => tokens.extend(self.tokenize_english(&segment)),
            }
        }
        tokens
    }
}
