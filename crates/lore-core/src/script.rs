//! Validated Cypher graph scripts.
//!
//! Models return Cypher as free text, often wrapped in Markdown fences
//! and sometimes spanning several statements. `GraphScript::parse`
//! normalizes that text and runs the syntactic checks we can do without
//! a full Cypher parser: balanced quoting and bracketing, a recognized
//! opening keyword, and quote-aware statement splitting (bolt executes
//! one statement per query). The script is otherwise treated as opaque;
//! semantic validation is the database's job.

use serde::{Deserialize, Serialize};

use crate::error::{LoreError, LoreResult};

/// Cypher keywords that may legally open a script statement.
const OPENING_KEYWORDS: &[&str] = &["CREATE", "MERGE", "MATCH", "UNWIND", "WITH", "CALL"];

/// Keywords that mutate the graph. Used to reject generated read queries
/// that would write.
const MUTATING_KEYWORDS: &[&str] = &[
    "CREATE", "MERGE", "DELETE", "DETACH", "SET", "REMOVE", "DROP",
];

/// A validated graph-construction script.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphScript {
    text: String,
    statements: Vec<String>,
}

impl GraphScript {
    /// Parse raw model output into a validated script.
    pub fn parse(raw: &str) -> LoreResult<Self> {
        let text = strip_comments(&strip_code_fences(raw));
        if text.trim().is_empty() {
            return Err(LoreError::InvalidScript("script is empty".to_string()));
        }

        check_balanced(&text)?;

        let statements = split_statements(&text);
        if statements.is_empty() {
            return Err(LoreError::InvalidScript(
                "script contains no statements".to_string(),
            ));
        }

        for statement in &statements {
            let keyword = first_keyword(statement);
            if !OPENING_KEYWORDS.contains(&keyword.as_str()) {
                return Err(LoreError::InvalidScript(format!(
                    "statement does not start with a Cypher keyword: {}",
                    truncate(statement, 80)
                )));
            }
        }

        Ok(Self {
            text: text.trim().to_string(),
            statements,
        })
    }

    /// The normalized script text.
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Individual statements, in script order.
    pub fn statements(&self) -> &[String] {
        &self.statements
    }
}

impl std::fmt::Display for GraphScript {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.text)
    }
}

/// Whether a single Cypher query only reads the graph.
///
/// String literals are blanked out before scanning, so node names such
/// as 'Set Theory' or 'Merge Sort' do not read as mutation keywords.
pub fn is_read_only(cypher: &str) -> bool {
    let scrubbed = strip_string_literals(cypher);
    let read_only =
        words(&scrubbed).all(|word| !MUTATING_KEYWORDS.contains(&word.to_uppercase().as_str()));
    read_only
}

/// Replace quoted content with spaces, honoring string escapes.
fn strip_string_literals(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_string: Option<char> = None;
    let mut escaped = false;

    for ch in text.chars() {
        if let Some(quote) = in_string {
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == quote {
                in_string = None;
            }
            out.push(' ');
            continue;
        }
        if matches!(ch, '\'' | '"' | '`') {
            in_string = Some(ch);
            out.push(' ');
        } else {
            out.push(ch);
        }
    }
    out
}

/// Remove surrounding Markdown code fences, keeping fenced content.
pub fn strip_code_fences(raw: &str) -> String {
    let trimmed = raw.trim();
    if !trimmed.contains("```") {
        return trimmed.to_string();
    }

    let mut fenced = String::new();
    let mut in_fence = false;
    for line in trimmed.lines() {
        if line.trim_start().starts_with("```") {
            in_fence = !in_fence;
            continue;
        }
        if in_fence {
            fenced.push_str(line);
            fenced.push('\n');
        }
    }

    if fenced.trim().is_empty() {
        // Fence markers present but nothing inside them; keep the rest.
        trimmed
            .lines()
            .filter(|line| !line.trim_start().starts_with("```"))
            .collect::<Vec<_>>()
            .join("\n")
    } else {
        fenced
    }
}

/// Drop `//` line comments models like to interleave.
fn strip_comments(text: &str) -> String {
    text.lines()
        .filter(|line| !line.trim_start().starts_with("//"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Verify quotes and brackets are balanced, honoring string escapes.
fn check_balanced(text: &str) -> LoreResult<()> {
    let mut in_string: Option<char> = None;
    let mut escaped = false;
    let mut parens = 0i64;
    let mut brackets = 0i64;
    let mut braces = 0i64;

    for ch in text.chars() {
        if let Some(quote) = in_string {
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == quote {
                in_string = None;
            }
            continue;
        }
        match ch {
            '\'' | '"' | '`' => in_string = Some(ch),
            '(' => parens += 1,
            ')' => parens -= 1,
            '[' => brackets += 1,
            ']' => brackets -= 1,
            '{' => braces += 1,
            '}' => braces -= 1,
            _ => {}
        }
        if parens < 0 || brackets < 0 || braces < 0 {
            return Err(LoreError::InvalidScript(
                "unbalanced brackets".to_string(),
            ));
        }
    }

    if in_string.is_some() {
        return Err(LoreError::InvalidScript("unterminated string".to_string()));
    }
    if parens != 0 || brackets != 0 || braces != 0 {
        return Err(LoreError::InvalidScript("unbalanced brackets".to_string()));
    }
    Ok(())
}

/// Split on semicolons that sit outside string literals.
pub fn split_statements(text: &str) -> Vec<String> {
    let mut statements = Vec::new();
    let mut current = String::new();
    let mut in_string: Option<char> = None;
    let mut escaped = false;

    for ch in text.chars() {
        if let Some(quote) = in_string {
            current.push(ch);
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == quote {
                in_string = None;
            }
            continue;
        }
        match ch {
            '\'' | '"' | '`' => {
                in_string = Some(ch);
                current.push(ch);
            }
            ';' => {
                let stmt = current.trim().to_string();
                if !stmt.is_empty() {
                    statements.push(stmt);
                }
                current.clear();
            }
            _ => current.push(ch),
        }
    }

    let stmt = current.trim().to_string();
    if !stmt.is_empty() {
        statements.push(stmt);
    }
    statements
}

fn first_keyword(statement: &str) -> String {
    words(statement)
        .next()
        .map(|w| w.to_uppercase())
        .unwrap_or_default()
}

fn words(text: &str) -> impl Iterator<Item = &str> {
    text.split(|c: char| !c.is_alphanumeric() && c != '_')
        .filter(|w| !w.is_empty())
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let cut: String = text.chars().take(max).collect();
        format!("{cut}...")
    }
}
