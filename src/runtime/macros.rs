/*!
 * Channel Name Evaluation
 * Seam for the macro evaluator that turns name expressions into external names
 */

use ahash::AHashMap;

/// Expands a channel name expression into its external name
pub trait MacroEvaluator: Send + Sync {
    fn eval(&self, expr: &str) -> String;
}

/// Evaluator that returns expressions unchanged
#[derive(Debug, Clone, Copy, Default)]
pub struct NoMacros;

impl MacroEvaluator for NoMacros {
    fn eval(&self, expr: &str) -> String {
        expr.to_string()
    }
}

/// `{name}` substitution from a fixed table
///
/// Unknown macros expand to nothing; an unterminated `{` is copied verbatim.
#[derive(Debug, Clone, Default)]
pub struct MacroTable {
    values: AHashMap<String, String>,
}

impl MacroTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(name.into(), value.into());
        self
    }
}

impl MacroEvaluator for MacroTable {
    fn eval(&self, expr: &str) -> String {
        let mut out = String::with_capacity(expr.len());
        let mut rest = expr;
        while let Some(start) = rest.find('{') {
            out.push_str(&rest[..start]);
            let after = &rest[start + 1..];
            match after.find('}') {
                Some(end) => {
                    if let Some(value) = self.values.get(&after[..end]) {
                        out.push_str(value);
                    }
                    rest = &after[end + 1..];
                }
                None => {
                    out.push_str(&rest[start..]);
                    rest = "";
                }
            }
        }
        out.push_str(rest);
        out
    }
}
