//! Language profiles and first-line detection rules.
use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::lexer::LexerId;

/// Editor metadata for one language, bound to a lexer by id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LanguageProfile {
    pub lexer: LexerId,
    /// Keyword list index to space-separated keywords.
    pub keywords: BTreeMap<i32, String>,
    pub comment_line: String,
    pub comment_line_at_start: bool,
    pub comment_stream_start: String,
    pub comment_stream_end: String,
    pub function_regex: String,
    pub function_regex_sort: i32,
    pub function_regex_trim: Vec<String>,
    pub auto_complete_regex: String,
    /// Keyword list that receives user functions; 0 disables the feature.
    pub user_functions: i32,
    pub user_keywords: BTreeSet<String>,
    pub user_keywords_dirty: bool,
    pub autocompletion: String,
}

impl LanguageProfile {
    /// Adds a user function name. Returns whether it was new.
    pub fn add_user_function(&mut self, name: &str) -> bool {
        if self.user_functions == 0 {
            return false;
        }
        let inserted = self.user_keywords.insert(name.to_string());
        if inserted {
            self.user_keywords_dirty = true;
        }
        inserted
    }

    /// Writes the user keywords into their keyword list if they changed.
    pub fn regenerate_user_keywords(&mut self) {
        if !self.user_keywords_dirty {
            return;
        }
        if self.user_functions != 0 {
            let mut words = String::new();
            for w in &self.user_keywords {
                words.push_str(w);
                words.push(' ');
            }
            self.keywords.insert(self.user_functions, words);
        }
        self.user_keywords_dirty = false;
    }
}

/// Where a detection string has to occur in the first line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DetectionAnchor {
    /// `+` rules: anywhere in the line.
    Anywhere,
    /// `-` rules: at offset 0.
    LineStart,
}

/// A content-sniffing rule applied to a document's first line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DetectionRule {
    pub language: String,
    pub needle: String,
    pub anchor: DetectionAnchor,
    /// Extensions whose ordinary mapping yields to content detection.
    pub extensions: Vec<String>,
}

impl DetectionRule {
    pub fn new(language: &str, needle: &str, anchor: DetectionAnchor) -> Self {
        Self {
            language: language.to_string(),
            needle: needle.to_string(),
            anchor,
            extensions: Vec::new(),
        }
    }

    /// Parses the `+Lang` / `-Lang` spelling.
    pub fn from_tagged(tagged: &str, needle: &str) -> Option<Self> {
        let anchor = match tagged.chars().next()? {
            '+' => DetectionAnchor::Anywhere,
            '-' => DetectionAnchor::LineStart,
            _ => return None,
        };
        Some(Self::new(&tagged[1..], needle, anchor))
    }

    /// Whether `first_line` satisfies this rule.
    pub fn matches(&self, first_line: &str) -> bool {
        match self.anchor {
            DetectionAnchor::Anywhere => first_line.contains(&self.needle),
            DetectionAnchor::LineStart => first_line.find(&self.needle) == Some(0),
        }
    }

    /// Whether `ext` is one of the rule's extensions.
    pub fn claims_extension(&self, ext: &str) -> bool {
        self.extensions.iter().any(|e| e.eq_ignore_ascii_case(ext))
    }
}

/// Rules every load starts with, ahead of rules from configuration files.
pub fn builtin_detection_rules() -> Vec<DetectionRule> {
    [
        ("+C/C++", "*- C++ -*"),
        ("-Xml", "<?xml"),
        ("-Bash", "<?php"),
        ("-Bash", "#!/bin/sh"),
        ("-Bash", "#!/bin/bash"),
        ("-Bash", "#! /bin/bash"),
        ("-Html", "<html>"),
        ("-Html", "<!DOCTYPE html>"),
        ("-Java", "#!groovy"),
        ("-Java", "#!/usr/bin/env groovy"),
    ]
    .into_iter()
    .filter_map(|(tagged, needle)| DetectionRule::from_tagged(tagged, needle))
    .collect()
}
