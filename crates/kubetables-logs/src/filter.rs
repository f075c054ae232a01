use regex::Regex;

use crate::error::Error;

/// Compiled name filter, used for container names and record sources
#[derive(Clone)]
pub struct CompiledFilter {
    /// Regex pattern (if any)
    regex: Option<Regex>,

    /// Original pattern string
    pattern: String,
}

impl CompiledFilter {
    /// Create a new filter from a pattern string.
    ///
    /// The pattern is searched anywhere in the input, so `api` matches
    /// `public-api`. An empty pattern matches everything.
    pub fn new(pattern: &str) -> Result<Self, Error> {
        let regex = if pattern.is_empty() {
            None
        } else {
            Some(Regex::new(pattern).map_err(|source| Error::Filter {
                pattern: pattern.to_string(),
                source,
            })?)
        };

        Ok(Self {
            regex,
            pattern: pattern.to_string(),
        })
    }

    /// Filter that keeps everything
    pub fn match_all() -> Self {
        Self {
            regex: None,
            pattern: String::new(),
        }
    }

    /// Check if a name matches this filter
    pub fn is_match(&self, text: &str) -> bool {
        match &self.regex {
            Some(re) => re.is_match(text),
            None => true,
        }
    }

    /// Get the original pattern
    pub fn pattern(&self) -> &str {
        &self.pattern
    }
}

impl Default for CompiledFilter {
    fn default() -> Self {
        Self::match_all()
    }
}

impl std::fmt::Debug for CompiledFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompiledFilter")
            .field("pattern", &self.pattern)
            .finish()
    }
}
